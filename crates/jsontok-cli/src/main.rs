//! `jsontok` CLI: parse, bind, fetch and inspect JSON from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Parse lenient JSON from stdin and re-emit it pretty-printed
//! echo '{"name": "Alice", "scores": [95, 87,], "admin": false,}' | jsontok parse
//!
//! # Compact output, file to file
//! jsontok parse --compact -i data.json -o clean.json
//!
//! # Typed parse against a schema document
//! jsontok bind --schema user.schema.json -i user.json
//!
//! # GET a URL and parse the body
//! jsontok get https://api.example.com/users --query page=2 --header "Authorization=Bearer xyz"
//!
//! # Count values by kind
//! jsontok stats -i data.json
//! ```
//!
//! Logs go to stderr. `RUST_LOG` selects the level (default `warn`);
//! `--verbose` raises it to `debug`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jsontok_core::{TypeDesc, Value};
use serde::Serialize;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "jsontok",
    version,
    about = "Lenient JSON parser with type-directed binding"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log parser and client activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse JSON without a schema and re-emit it
    Parse {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Emit compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Parse JSON against a schema document
    Bind {
        /// Schema file describing the target type
        #[arg(short, long)]
        schema: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Emit compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// GET a URL and parse the response body
    Get {
        /// Absolute http(s) URL
        url: String,
        /// Query parameter as key=value (repeatable)
        #[arg(short, long, value_parser = parse_key_value)]
        query: Vec<(String, String)>,
        /// Request header as name=value (repeatable)
        #[arg(short = 'H', long, value_parser = parse_key_value)]
        header: Vec<(String, String)>,
        /// Schema file for a typed parse of the body
        #[arg(short, long)]
        schema: Option<String>,
        /// Emit compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Count values by kind and report the maximum nesting depth
    Stats {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Parse {
            input,
            output,
            compact,
        } => {
            let text = read_input(input.as_deref())?;
            let value = jsontok_core::parse(&text).context("Failed to parse JSON")?;
            write_output(output.as_deref(), &render(&value, compact)?)?;
        }
        Commands::Bind {
            schema,
            input,
            output,
            compact,
        } => {
            let desc = load_schema(&schema)?;
            let text = read_input(input.as_deref())?;
            let typed = jsontok_core::parse_typed(&text, &desc)
                .with_context(|| format!("Failed to parse JSON as {desc}"))?;
            write_output(output.as_deref(), &render(&typed, compact)?)?;
        }
        Commands::Get {
            url,
            query,
            header,
            schema,
            compact,
        } => {
            let client = jsontok_core::JsonClient::new(&url)
                .context("Invalid URL")?
                .with_hook(move |request| {
                    header
                        .iter()
                        .fold(request, |request, (name, value)| request.set(name, value))
                });
            let params: jsontok_core::QueryParams = query.into_iter().collect();
            let rendered = match schema {
                Some(schema) => {
                    let desc = load_schema(&schema)?;
                    let typed = client
                        .get_typed("", Some(&params), &desc)
                        .with_context(|| format!("Failed to fetch {url}"))?;
                    render(&typed, compact)?
                }
                None => {
                    let value = client
                        .get("", Some(&params))
                        .with_context(|| format!("Failed to fetch {url}"))?;
                    render(&value, compact)?
                }
            };
            write_output(None, &rendered)?;
        }
        Commands::Stats { input } => {
            let text = read_input(input.as_deref())?;
            let value = jsontok_core::parse(&text).context("Failed to parse JSON")?;
            let stats = Stats::collect(&value);
            println!("Objects:    {}", stats.objects);
            println!("Arrays:     {}", stats.arrays);
            println!("Strings:    {}", stats.strings);
            println!("Numbers:    {}", stats.numbers);
            println!("Booleans:   {}", stats.booleans);
            println!("Nulls:      {}", stats.nulls);
            println!("Max depth:  {}", stats.max_depth);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Accepts `key=value`; the value may itself contain `=`.
fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn load_schema(path: &str) -> Result<TypeDesc> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file: {}", path))?;
    TypeDesc::from_schema(&text).with_context(|| format!("Invalid schema: {}", path))
}

fn render<T: Serialize>(value: &T, compact: bool) -> Result<String> {
    let mut out = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    out.push('\n');
    Ok(out)
}

/// Value counts for the `stats` subcommand. Scalars at the root have depth 0.
#[derive(Debug, Default, PartialEq, Eq)]
struct Stats {
    objects: usize,
    arrays: usize,
    strings: usize,
    numbers: usize,
    booleans: usize,
    nulls: usize,
    max_depth: usize,
}

impl Stats {
    fn collect(value: &Value) -> Self {
        let mut stats = Stats::default();
        stats.visit(value, 0);
        stats
    }

    fn visit(&mut self, value: &Value, depth: usize) {
        self.max_depth = self.max_depth.max(depth);
        match value {
            Value::Null => self.nulls += 1,
            Value::Bool(_) => self.booleans += 1,
            Value::Integer(_) | Value::Float(_) => self.numbers += 1,
            Value::Str(_) => self.strings += 1,
            Value::Arr(items) => {
                self.arrays += 1;
                for item in items {
                    self.visit(item, depth + 1);
                }
            }
            Value::Obj(map) => {
                self.objects += 1;
                for item in map.values() {
                    self.visit(item, depth + 1);
                }
            }
        }
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

//! GET-and-parse HTTP client.
//!
//! Requests are built from a base URL, a relative path and ordered query
//! parameters. The whole response body is read as text and handed to the
//! parser. Query values are not percent-encoded; callers pass values that
//! are already safe for a query string.

use crate::bind::{from_str, JsonBind};
use crate::error::{JsonError, Result};
use crate::parser::{parse, parse_typed};
use crate::typed::Typed;
use crate::types::TypeDesc;
use crate::value::Value;
use std::fmt;
use tracing::debug;
use url::Url;

/// Ordered query parameters. Entries without a value are left out of the
/// query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, Option<String>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, value: impl fmt::Display) -> &mut Self {
        self.pairs.push((key.into(), Some(value.to_string())));
        self
    }

    /// Record a parameter that may be absent.
    pub fn add_opt<V: fmt::Display>(&mut self, key: impl Into<String>, value: Option<V>) -> &mut Self {
        self.pairs
            .push((key.into(), value.map(|v| v.to_string())));
        self
    }

    /// Builder-style [`QueryParams::add`].
    pub fn with(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.add(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// `k1=v1&k2=v2`, skipping absent values. No escaping is applied.
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| format!("{k}={v}")))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: fmt::Display> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.add(k, v);
        }
        params
    }
}

type RequestHook = Box<dyn Fn(ureq::Request) -> ureq::Request + Send + Sync>;

/// A JSON-over-HTTP GET client.
pub struct JsonClient {
    base_url: Url,
    agent: ureq::Agent,
    hook: Option<RequestHook>,
}

impl fmt::Debug for JsonClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonClient")
            .field("base_url", &self.base_url.as_str())
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

impl JsonClient {
    /// `base_url` must be an absolute `http` or `https` URL. Relative paths
    /// resolve against it the way a browser resolves links, so a base
    /// without a trailing slash replaces its last segment.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| JsonError::InvalidUrl(format!("{base_url}: {err}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(JsonError::InvalidUrl(format!(
                "{base_url}: base url must use http or https scheme"
            )));
        }
        Ok(Self {
            base_url,
            agent: ureq::AgentBuilder::new().build(),
            hook: None,
        })
    }

    pub fn with_agent(mut self, agent: ureq::Agent) -> Self {
        self.agent = agent;
        self
    }

    /// Install a hook that may customize every request before it is sent,
    /// e.g. to add headers or a timeout.
    pub fn with_hook(
        mut self,
        hook: impl Fn(ureq::Request) -> ureq::Request + Send + Sync + 'static,
    ) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `rel` (plus the query string, when non-empty) against the base.
    pub fn request_url(&self, rel: &str, params: Option<&QueryParams>) -> Result<Url> {
        let mut target = rel.to_string();
        let query = params.map(QueryParams::to_query_string).unwrap_or_default();
        if !query.is_empty() {
            target.push('?');
            target.push_str(&query);
        }
        self.base_url
            .join(&target)
            .map_err(|err| JsonError::InvalidUrl(format!("{target}: {err}")))
    }

    /// GET and return the raw body.
    pub fn get_text(&self, rel: &str, params: Option<&QueryParams>) -> Result<String> {
        let url = self.request_url(rel, params)?;
        debug!(%url, "GET");

        let mut request = self.agent.get(url.as_str());
        if let Some(hook) = &self.hook {
            request = hook(request);
        }
        let response = request
            .set("Accept", "application/json")
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(code, _) => {
                    JsonError::Http(format!("GET {url} returned status {code}"))
                }
                ureq::Error::Transport(err) => JsonError::Http(format!("GET {url} failed: {err}")),
            })?;
        let body = response
            .into_string()
            .map_err(|err| JsonError::Http(format!("failed to read response body: {err}")))?;
        debug!(bytes = body.len(), "got response");
        Ok(body)
    }

    /// GET and parse untyped.
    pub fn get(&self, rel: &str, params: Option<&QueryParams>) -> Result<Value> {
        parse(&self.get_text(rel, params)?)
    }

    /// GET and parse against a type description.
    pub fn get_typed(
        &self,
        rel: &str,
        params: Option<&QueryParams>,
        desc: &TypeDesc,
    ) -> Result<Typed> {
        parse_typed(&self.get_text(rel, params)?, desc)
    }

    /// GET and bind into `T`.
    pub fn get_as<T: JsonBind>(&self, rel: &str, params: Option<&QueryParams>) -> Result<T> {
        from_str(&self.get_text(rel, params)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string_keeps_order_and_skips_absent() {
        let mut params = QueryParams::new();
        params
            .add("q", "rust")
            .add_opt::<u32>("page", None)
            .add("limit", 10)
            .add_opt("sort", Some("asc"));
        assert_eq!(params.to_query_string(), "q=rust&limit=10&sort=asc");
    }

    #[test]
    fn query_string_is_not_escaped() {
        let params = QueryParams::new().with("name", "a b&c");
        assert_eq!(params.to_query_string(), "name=a b&c");
    }

    #[test]
    fn query_params_from_iterator() {
        let params: QueryParams = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(params.to_query_string(), "a=1&b=2");
        assert_eq!(params.iter().count(), 2);
    }

    #[test]
    fn request_url_joins_path_and_query() {
        let client = JsonClient::new("http://localhost:8080/api/").unwrap();
        let params = QueryParams::new().with("id", 7);
        let url = client.request_url("users", Some(&params)).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/users?id=7");
    }

    #[test]
    fn request_url_without_params_has_no_query() {
        let client = JsonClient::new("http://localhost:8080/api/").unwrap();
        let mut empty = QueryParams::new();
        empty.add_opt::<String>("page", None);
        assert!(!empty.is_empty());
        let url = client.request_url("users", Some(&empty)).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/users");
        let url = client.request_url("users", None).unwrap();
        assert_eq!(url.query(), None);
    }

    #[test]
    fn request_url_replaces_last_segment_without_trailing_slash() {
        let client = JsonClient::new("http://localhost:8080/api/v1").unwrap();
        let url = client.request_url("users", None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/users");
    }

    #[test]
    fn new_rejects_non_http_scheme() {
        let err = JsonClient::new("ftp://example.com/").unwrap_err();
        assert!(matches!(err, JsonError::InvalidUrl(_)));
        assert!(JsonClient::new("not a url").is_err());
    }
}

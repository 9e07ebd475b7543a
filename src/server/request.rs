//! Owned request data extracted from the transport.
//!
//! The raw `may_minihttp::Request` borrows from the connection buffer, so the
//! dispatch pipeline works on an owned [`HttpRequest`] snapshot instead. This
//! is also what lets the request handle live inside a pooled `Context`.

use crate::error::FormError;
use http::Method;
use may_minihttp::Request;
use std::collections::HashMap;
use std::io::Read;
use tracing::debug;

/// Parsed HTTP request data carried through the pipeline.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Request path without the query string.
    pub path: String,
    /// Raw query string (empty when absent).
    pub raw_query: String,
    /// HTTP headers, lowercase keys.
    pub headers: HashMap<String, String>,
    /// Cookies parsed from the Cookie header.
    pub cookies: HashMap<String, String>,
    /// Raw peer address string as reported by the transport boundary,
    /// possibly `host:port` or `[v6]:port`. Empty when unknown.
    pub remote_addr: String,
    /// Raw request body, `None` when the request carried none.
    pub body: Option<Vec<u8>>,
    /// Flat query/form parameter map, populated by [`HttpRequest::parse_form`].
    /// Last value wins per key.
    pub form: HashMap<String, String>,
    /// Named capture groups extracted by the router for the matched pattern.
    pub path_params: HashMap<String, String>,
}

impl HttpRequest {
    /// Fetch a header value by (lowercase) name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Parse the query string and, for `application/x-www-form-urlencoded`
    /// bodies, the body itself into the flat `form` map. Later occurrences of
    /// a key overwrite earlier ones; body parameters overwrite query
    /// parameters.
    pub fn parse_form(&mut self) -> Result<(), FormError> {
        self.form.clear();
        for (k, v) in url::form_urlencoded::parse(self.raw_query.as_bytes()) {
            self.form.insert(k.to_string(), v.to_string());
        }
        let is_urlencoded = self
            .header("content-type")
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));
        if is_urlencoded {
            if let Some(body) = &self.body {
                let text = std::str::from_utf8(body).map_err(|_| FormError::BodyEncoding)?;
                for (k, v) in url::form_urlencoded::parse(text.as_bytes()) {
                    self.form.insert(k.to_string(), v.to_string());
                }
            }
        }
        Ok(())
    }
}

/// Split cookie pairs out of the Cookie header.
pub fn parse_cookies(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .get("cookie")
        .map(|c| {
            c.split(';')
                .filter_map(|pair| {
                    let mut parts = pair.trim().splitn(2, '=');
                    let name = parts.next()?.trim().to_string();
                    let value = parts.next().unwrap_or("").trim().to_string();
                    Some((name, value))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Extract an owned [`HttpRequest`] from a raw `may_minihttp::Request`.
///
/// The transport does not surface the TCP peer address, so `remote_addr`
/// falls back to the `x-forwarded-for` (first hop) or `x-real-ip` headers.
pub fn parse_request(req: Request) -> HttpRequest {
    let method = Method::from_bytes(req.method().as_bytes()).unwrap_or(Method::GET);
    let raw_path = req.path().to_string();
    let (path, raw_query) = match raw_path.split_once('?') {
        Some((p, q)) => (p.to_string(), q.to_string()),
        None => (raw_path, String::new()),
    };

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let cookies = parse_cookies(&headers);

    let remote_addr = headers
        .get("x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .or_else(|| headers.get("x-real-ip").map(String::as_str))
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let body = {
        let mut buf = Vec::new();
        match req.body().read_to_end(&mut buf) {
            Ok(n) if n > 0 => Some(buf),
            _ => None,
        }
    };

    debug!(
        method = %method,
        path = %path,
        header_count = headers.len(),
        body_bytes = body.as_ref().map(Vec::len).unwrap_or(0),
        "request parsed"
    );

    HttpRequest {
        method,
        path,
        raw_query,
        headers,
        cookies,
        remote_addr,
        body,
        form: HashMap::new(),
        path_params: HashMap::new(),
    }
}

//! Per-request state carrier.
//!
//! A [`Context`] bundles the request and response handles, the terminal
//! status, the request start time and the per-request tracing span. Contexts
//! are pooled: the dispatcher acquires one per request, binds it, runs the
//! pipeline, then resets and releases it. A non-zero `status` marks the
//! request *finished* and halts every later pipeline stage.

use crate::error::{status_for_io_error, BodyError};
use crate::server::request::HttpRequest;
use crate::server::response::{status_reason, ResponseWriter};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::Span;

/// Pooled per-request state.
#[derive(Debug, Default)]
pub struct Context {
    /// Owned request handle.
    pub request: HttpRequest,
    /// Buffered response handle.
    pub response: ResponseWriter,
    status: u16,
    started: Option<Instant>,
    span: Option<Span>,
}

impl Context {
    /// Whether a terminal status has been set for this request.
    pub fn is_finished(&self) -> bool {
        self.status != 0
    }

    /// Terminal status (0 = undecided).
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Mark the request finished with `status` without writing a body.
    pub fn finish(&mut self, status: u16) {
        self.status = status;
        self.response.set_status(status);
    }

    /// Per-request tracing span, when bound.
    pub fn span(&self) -> Option<&Span> {
        self.span.as_ref()
    }

    /// Time elapsed since this context was bound to the current request.
    pub fn elapsed(&self) -> Duration {
        self.started.map(|s| s.elapsed()).unwrap_or_default()
    }

    pub(crate) fn bind(&mut self, request: HttpRequest, span: Span) {
        self.request = request;
        self.started = Some(Instant::now());
        self.span = Some(span);
    }

    /// Clear every field back to its default value. A context must never be
    /// returned to the pool without going through here; a partially reset
    /// context is a correctness bug, not an optimization.
    pub(crate) fn reset(&mut self) {
        self.request = HttpRequest::default();
        self.response = ResponseWriter::default();
        self.status = 0;
        self.started = None;
        self.span = None;
    }

    pub(crate) fn take_response(&mut self) -> ResponseWriter {
        std::mem::take(&mut self.response)
    }

    // ---- request accessors -------------------------------------------------

    /// Flat query/form parameter map, last value wins per key.
    pub fn query(&self) -> &HashMap<String, String> {
        &self.request.form
    }

    /// Decode the JSON request body into `T`.
    ///
    /// Fails when the body is absent or malformed; an empty body is treated
    /// as end-of-input and yields `T::default()` with no fields populated.
    pub fn json_body<T: DeserializeOwned + Default>(&self) -> Result<T, BodyError> {
        let body = self.request.body.as_deref().ok_or(BodyError::Missing)?;
        if body.is_empty() {
            return Ok(T::default());
        }
        Ok(serde_json::from_slice(body)?)
    }

    /// All cookies sent with the request.
    pub fn cookies(&self) -> &HashMap<String, String> {
        &self.request.cookies
    }

    /// Single cookie value, empty string if absent.
    pub fn cookie(&self, name: &str) -> &str {
        self.request
            .cookies
            .get(name)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Remote host with the port (and IPv6 bracket syntax) stripped from the
    /// raw peer address.
    pub fn remote(&self) -> &str {
        let addr = self.request.remote_addr.as_str();
        let Some(colon) = addr.find(':') else {
            return addr;
        };
        if let Some(close) = addr.find(']') {
            return addr[..close].trim_start_matches('[');
        }
        &addr[..colon]
    }

    // ---- response helpers --------------------------------------------------

    /// Write raw bytes to the response body.
    pub fn text(&mut self, bytes: &[u8]) {
        self.response.write(bytes);
    }

    /// Finish the request with a redirect to `url`.
    pub fn redirect(&mut self, url: &str, status: u16) {
        self.status = status;
        self.response.set_status(status);
        self.response.set_header("Location", url);
        self.response.set_header("Content-Type", "text/html; charset=utf-8");
        let body = format!("<a href=\"{url}\">{}</a>.\n", status_reason(status));
        self.response.write(body.as_bytes());
    }

    /// Finish the request with an error status and its standard text body.
    /// Any partially written response is discarded.
    pub fn error(&mut self, status: u16) {
        self.status = status;
        self.response.replace_with_error(status);
    }

    /// Stream a file to the client as an attachment.
    ///
    /// Filesystem errors are mapped to an HTTP status (404 for nonexistence,
    /// 403 for permission denial, 500 otherwise) at this call site.
    pub fn download(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let meta = match fs::metadata(path) {
            Ok(meta) => meta,
            Err(err) => {
                self.error(status_for_io_error(&err));
                return;
            }
        };
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.error(status_for_io_error(&err));
                return;
            }
        };
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("download");
        self.response
            .set_header("Content-Length", &meta.len().to_string());
        self.response
            .set_header("Content-Type", "application/octet-stream");
        self.response.set_header(
            "Content-Disposition",
            &format!("attachment;filename={filename}"),
        );
        self.status = 200;
        self.response.set_status(200);
        self.response.write(&bytes);
    }

    /// Write the uniform JSON envelope `{"code": .., "msg": .., "data": ..}`
    /// for a byte/string payload. A payload that already is valid JSON is
    /// embedded verbatim; anything else is wrapped as a JSON string.
    ///
    /// Does not finish the request; lifecycle stages after the write still
    /// run.
    pub fn json_raw(&mut self, payload: &[u8], code: i64, err: Option<&str>) {
        let data = match std::str::from_utf8(payload) {
            Ok(text) if serde_json::from_str::<serde_json::Value>(text).is_ok() => text.to_string(),
            Ok(text) => quote_json_string(text),
            Err(_) => quote_json_string(&String::from_utf8_lossy(payload)),
        };
        let msg = err.unwrap_or("").to_string();
        self.write_envelope(code, msg, data);
    }

    /// Write the uniform JSON envelope for any serializable value.
    ///
    /// This never fails outwardly: a marshal failure forces `code` to the
    /// sentinel 101 and appends the marshal error to `msg`.
    pub fn json<T: Serialize>(&mut self, value: &T, code: i64, err: Option<&str>) {
        let mut msg = err.unwrap_or("").to_string();
        let (code, data) = match serde_json::to_string(value) {
            Ok(data) => (code, data),
            Err(marshal_err) => {
                msg.push_str(&format!("\n  json marshal data: {marshal_err}"));
                (101, "null".to_string())
            }
        };
        self.write_envelope(code, msg, data);
    }

    fn write_envelope(&mut self, code: i64, mut msg: String, data: String) {
        if msg.is_empty() {
            msg = "success".to_string();
        }
        let body = format!("{{\"code\": {code}, \"msg\": \"{msg}\", \"data\": {data}}}");
        self.response
            .set_header("Content-Type", "application/json;charset=UTF-8");
        self.response.write(body.as_bytes());
    }
}

fn quote_json_string(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{text}\""))
}

//! Buffered response handle.
//!
//! Handlers and middleware write into a [`ResponseWriter`]; the transport
//! bridge flushes the finished buffer into the wire response once the
//! pipeline is done. Buffering is what allows the containment boundary to
//! replace a half-written body with a clean 500.

use http::StatusCode;
use may_minihttp::Response;

/// Canonical reason phrase for a status code.
pub fn status_reason(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown")
}

/// Buffered per-request response state.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResponseWriter {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseWriter {
    /// Status that will be written to the wire (0 = unset, flushed as 200).
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    /// Set a header, replacing any existing value for the same name.
    pub fn set_header(&mut self, name: &str, value: &str) {
        if let Some(entry) = self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            entry.1 = value.to_string();
        } else {
            self.headers.push((name.to_string(), value.to_string()));
        }
    }

    /// Append a header without replacing existing values.
    pub fn append_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Append bytes to the response body.
    pub fn write(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Replace the response with the plain-text representation of an error
    /// status: reason phrase body, `text/plain`, no stale headers.
    pub(crate) fn replace_with_error(&mut self, status: u16) {
        self.headers.clear();
        self.body.clear();
        self.status = status;
        self.set_header("Content-Type", "text/plain; charset=utf-8");
        self.set_header("X-Content-Type-Options", "nosniff");
        self.body.extend_from_slice(status_reason(status).as_bytes());
        self.body.push(b'\n');
    }

    /// Flush the buffer into the transport response.
    pub fn flush(self, res: &mut Response) {
        let status = if self.status == 0 { 200 } else { self.status };
        res.status_code(status as usize, status_reason(status));
        for (name, value) in &self.headers {
            let header = format!("{name}: {value}").into_boxed_str();
            res.header(Box::leak(header));
        }
        res.body_vec(self.body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(404), "Not Found");
        assert_eq!(status_reason(405), "Method Not Allowed");
        assert_eq!(status_reason(999), "Unknown");
    }

    #[test]
    fn test_set_header_replaces() {
        let mut w = ResponseWriter::default();
        w.set_header("Content-Type", "text/plain");
        w.set_header("content-type", "application/json");
        assert_eq!(w.header("Content-Type"), Some("application/json"));
        assert_eq!(w.headers.len(), 1);
    }

    #[test]
    fn test_replace_with_error_discards_partial_body() {
        let mut w = ResponseWriter::default();
        w.set_header("Content-Type", "application/json");
        w.write(b"{\"partial\":");
        w.replace_with_error(500);
        assert_eq!(w.status(), 500);
        assert_eq!(w.body(), b"Internal Server Error\n");
        assert_eq!(w.header("Content-Type"), Some("text/plain; charset=utf-8"));
    }
}

//! Header-mutating middleware.

use super::Middleware;
use crate::context::Context;
use ulid::Ulid;

/// Injects a fixed header into every request, visible to all downstream
/// middleware and the handler.
pub struct AppendHeader {
    name: String,
    value: String,
}

impl AppendHeader {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            value: value.to_string(),
        }
    }
}

impl Middleware for AppendHeader {
    fn handle(&self, ctx: &mut Context) {
        ctx.request
            .headers
            .insert(self.name.clone(), self.value.clone());
    }
}

/// Propagates a `trace-id` header, minting a fresh ULID when the client did
/// not send one. The id is echoed on the response so callers can correlate
/// log lines.
pub struct TraceId;

impl Middleware for TraceId {
    fn handle(&self, ctx: &mut Context) {
        let trace_id = match ctx.request.header("trace-id") {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => Ulid::new().to_string(),
        };
        ctx.request
            .headers
            .insert("trace-id".to_string(), trace_id.clone());
        ctx.response.set_header("trace-id", &trace_id);
    }
}

//! Pre-dispatch middleware.
//!
//! Middleware run strictly in registration order before static lookup and
//! routing. They return nothing; side effects on the [`Context`] are the only
//! channel. A middleware that sets a terminal status finishes the request and
//! stops the chain immediately.

mod access;
mod headers;

pub use access::AccessIp;
pub use headers::{AppendHeader, TraceId};

use crate::context::Context;

/// A pre-dispatch callback. Any plain `Fn(&mut Context)` closure qualifies
/// through the blanket impl below.
pub trait Middleware: Send + Sync {
    fn handle(&self, ctx: &mut Context);
}

impl<F> Middleware for F
where
    F: Fn(&mut Context) + Send + Sync,
{
    fn handle(&self, ctx: &mut Context) {
        self(ctx)
    }
}

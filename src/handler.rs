//! Handler lifecycle contract.
//!
//! Every route target satisfies the full capability set: the `init` and
//! `prepare` hooks, one operation per HTTP verb, and the `finish` hook. The
//! dispatcher drives these as `init -> prepare -> <verb> -> finish`, checking
//! the finished predicate after every stage.
//!
//! Default verb behavior is "405 Method Not Allowed"; concrete handlers
//! override only the verbs they serve. [`FnHandler`] and [`RawFnHandler`]
//! adapt a single callback to the whole capability set.

use crate::context::Context;
use crate::server::request::HttpRequest;
use crate::server::response::ResponseWriter;

/// The capability set every route target must satisfy.
///
/// Lifecycle hooks default to no-ops; every verb defaults to responding
/// "method not allowed".
pub trait Handler: Send + Sync {
    fn init(&self, _ctx: &mut Context) {}
    fn prepare(&self, _ctx: &mut Context) {}

    fn connect(&self, ctx: &mut Context) {
        ctx.error(405);
    }
    fn options(&self, ctx: &mut Context) {
        ctx.error(405);
    }
    fn head(&self, ctx: &mut Context) {
        ctx.error(405);
    }
    fn get(&self, ctx: &mut Context) {
        ctx.error(405);
    }
    fn post(&self, ctx: &mut Context) {
        ctx.error(405);
    }
    fn put(&self, ctx: &mut Context) {
        ctx.error(405);
    }
    fn delete(&self, ctx: &mut Context) {
        ctx.error(405);
    }
    fn trace(&self, ctx: &mut Context) {
        ctx.error(405);
    }
    fn patch(&self, ctx: &mut Context) {
        ctx.error(405);
    }

    fn finish(&self, _ctx: &mut Context) {}
}

/// The default policy as a standalone delegate: no-op lifecycle hooks and
/// "method not allowed" for every verb. Handlers that only want to override a
/// subset of the contract can wrap or embed this rather than re-deriving the
/// defaults.
#[derive(Debug, Default, Clone, Copy)]
pub struct BaseHandler;

impl Handler for BaseHandler {}

/// Adapts a single `Fn(&mut Context)` callback so it satisfies every verb
/// identically, with no-op lifecycle hooks.
pub struct FnHandler<F>(pub F);

impl<F> Handler for FnHandler<F>
where
    F: Fn(&mut Context) + Send + Sync,
{
    fn connect(&self, ctx: &mut Context) {
        (self.0)(ctx);
    }
    fn options(&self, ctx: &mut Context) {
        (self.0)(ctx);
    }
    fn head(&self, ctx: &mut Context) {
        (self.0)(ctx);
    }
    fn get(&self, ctx: &mut Context) {
        (self.0)(ctx);
    }
    fn post(&self, ctx: &mut Context) {
        (self.0)(ctx);
    }
    fn put(&self, ctx: &mut Context) {
        (self.0)(ctx);
    }
    fn delete(&self, ctx: &mut Context) {
        (self.0)(ctx);
    }
    fn trace(&self, ctx: &mut Context) {
        (self.0)(ctx);
    }
    fn patch(&self, ctx: &mut Context) {
        (self.0)(ctx);
    }
}

/// Adapts an externally authored writer/request callback, delegating every
/// verb to it unchanged. This is the seam for plugging plain
/// response-writer-style handlers into the lifecycle contract.
pub struct RawFnHandler<F>(pub F);

impl<F> RawFnHandler<F>
where
    F: Fn(&mut ResponseWriter, &HttpRequest) + Send + Sync,
{
    fn delegate(&self, ctx: &mut Context) {
        let Context {
            request, response, ..
        } = ctx;
        (self.0)(response, request);
    }
}

impl<F> Handler for RawFnHandler<F>
where
    F: Fn(&mut ResponseWriter, &HttpRequest) + Send + Sync,
{
    fn connect(&self, ctx: &mut Context) {
        self.delegate(ctx);
    }
    fn options(&self, ctx: &mut Context) {
        self.delegate(ctx);
    }
    fn head(&self, ctx: &mut Context) {
        self.delegate(ctx);
    }
    fn get(&self, ctx: &mut Context) {
        self.delegate(ctx);
    }
    fn post(&self, ctx: &mut Context) {
        self.delegate(ctx);
    }
    fn put(&self, ctx: &mut Context) {
        self.delegate(ctx);
    }
    fn delete(&self, ctx: &mut Context) {
        self.delegate(ctx);
    }
    fn trace(&self, ctx: &mut Context) {
        self.delegate(ctx);
    }
    fn patch(&self, ctx: &mut Context) {
        self.delegate(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_handler_rejects_every_verb() {
        let handler = BaseHandler;
        let mut ctx = Context::default();
        handler.get(&mut ctx);
        assert_eq!(ctx.status(), 405);

        let mut ctx = Context::default();
        handler.trace(&mut ctx);
        assert_eq!(ctx.status(), 405);
    }

    #[test]
    fn test_base_handler_hooks_are_noops() {
        let handler = BaseHandler;
        let mut ctx = Context::default();
        handler.init(&mut ctx);
        handler.prepare(&mut ctx);
        handler.finish(&mut ctx);
        assert!(!ctx.is_finished());
    }

    #[test]
    fn test_fn_handler_serves_all_verbs() {
        let handler = FnHandler(|ctx: &mut Context| ctx.text(b"hit"));
        let mut ctx = Context::default();
        handler.get(&mut ctx);
        handler.post(&mut ctx);
        assert_eq!(ctx.response.body(), b"hithit");
        assert!(!ctx.is_finished());
    }

    #[test]
    fn test_raw_fn_handler_delegates_writer_and_request() {
        let handler = RawFnHandler(|res: &mut ResponseWriter, req: &HttpRequest| {
            res.write(req.path.as_bytes());
        });
        let mut ctx = Context::default();
        ctx.request.path = "/raw".to_string();
        handler.put(&mut ctx);
        assert_eq!(ctx.response.body(), b"/raw");
    }
}

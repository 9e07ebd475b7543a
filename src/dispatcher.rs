//! Per-request orchestration.
//!
//! The dispatcher drives each request through the fixed pipeline:
//!
//! ```text
//! parse form -> middleware chain -> static mounts -> route lookup
//!            -> init -> prepare -> verb -> finish
//! ```
//!
//! Every stage is gated on the context's finished predicate. The whole
//! pipeline runs inside a single panic-containment boundary: an uncaught
//! failure anywhere is intercepted exactly once, converted to a 500 and
//! logged with a backtrace, and never crashes the serving coroutine. An
//! access-log line is emitted unconditionally, after which the context is
//! reset and recycled.

use crate::context::Context;
use crate::middleware::Middleware;
use crate::pool::ContextPool;
use crate::router::Router;
use crate::server::request::HttpRequest;
use crate::server::response::ResponseWriter;
use crate::static_files::StaticMounts;
use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{error, info, info_span};

pub struct Dispatcher {
    router: Router,
    middleware: Vec<Arc<dyn Middleware>>,
    statics: StaticMounts,
    pool: ContextPool,
}

impl Dispatcher {
    /// Assemble a dispatcher from tables frozen at startup. The router,
    /// middleware list and static mounts are read-only from here on; only
    /// the context pool mutates during serving.
    pub fn new(router: Router, middleware: Vec<Arc<dyn Middleware>>, statics: StaticMounts) -> Self {
        Self {
            router,
            middleware,
            statics,
            pool: ContextPool::new(),
        }
    }

    /// Idle contexts currently held by the pool.
    pub fn pooled(&self) -> usize {
        self.pool.idle()
    }

    /// Run one request through the pipeline and return the finished response
    /// buffer.
    pub fn dispatch(&self, request: HttpRequest) -> ResponseWriter {
        let span = info_span!(
            "request",
            method = %request.method,
            path = %request.path
        );
        let mut ctx = self.pool.acquire();
        ctx.bind(request, span.clone());

        let outcome = span.in_scope(|| {
            let result = catch_unwind(AssertUnwindSafe(|| self.run_pipeline(&mut ctx)));
            if let Err(panic) = result {
                ctx.error(500);
                error!(
                    panic = %panic_detail(panic.as_ref()),
                    backtrace = %Backtrace::force_capture(),
                    "request pipeline panicked"
                );
            }
            if ctx.status() == 0 {
                ctx.finish(200);
            }
            info!(
                method = %ctx.request.method,
                status = ctx.status(),
                path = %ctx.request.path,
                remote = %ctx.remote(),
                elapsed_us = ctx.elapsed().as_micros() as u64,
                "access"
            );
            ctx.take_response()
        });

        self.pool.release(ctx);
        outcome
    }

    fn run_pipeline(&self, ctx: &mut Context) {
        if let Err(err) = ctx.request.parse_form() {
            error!(error = %err, "parse form fail");
            return;
        }

        for mw in &self.middleware {
            mw.handle(ctx);
            if ctx.is_finished() {
                return;
            }
        }

        if self.statics.serve(ctx) {
            return;
        }

        let Some(route) = self.router.lookup(&ctx.request.path) else {
            ctx.error(404);
            return;
        };
        ctx.request.path_params = route.path_params;
        let handler = route.handler;

        handler.init(ctx);
        if ctx.is_finished() {
            return;
        }
        handler.prepare(ctx);
        if ctx.is_finished() {
            return;
        }
        let method = ctx.request.method.clone();
        match method.as_str() {
            "CONNECT" => handler.connect(ctx),
            "OPTIONS" => handler.options(ctx),
            "HEAD" => handler.head(ctx),
            "GET" => handler.get(ctx),
            "POST" => handler.post(ctx),
            "PUT" => handler.put(ctx),
            "DELETE" => handler.delete(ctx),
            "TRACE" => handler.trace(ctx),
            "PATCH" => handler.patch(ctx),
            // Extension methods have no verb operation in the contract.
            _ => ctx.error(405),
        }
        if ctx.is_finished() {
            return;
        }
        handler.finish(ctx);
    }
}

fn panic_detail(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "opaque panic payload".to_string()
    }
}

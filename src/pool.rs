//! Context pool.
//!
//! An unbounded free list of [`Context`] instances shared by all in-flight
//! requests. `acquire` pops a recycled instance or allocates a fresh one;
//! `release` always resets before pushing back, so no request can observe
//! state left over from a previous one.

use crate::context::Context;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct ContextPool {
    free: Mutex<Vec<Box<Context>>>,
}

impl ContextPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a context from the pool, allocating when the free list is empty.
    pub fn acquire(&self) -> Box<Context> {
        self.free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .unwrap_or_default()
    }

    /// Reset `ctx` completely and return it to the free list.
    pub fn release(&self, mut ctx: Box<Context>) {
        ctx.reset();
        self.free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ctx);
    }

    /// Number of idle contexts currently pooled.
    pub fn idle(&self) -> usize {
        self.free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::request::HttpRequest;
    use tracing::info_span;

    #[test]
    fn test_release_then_reacquire_yields_clean_context() {
        let pool = ContextPool::new();
        let mut ctx = pool.acquire();
        ctx.bind(
            HttpRequest {
                path: "/x".to_string(),
                remote_addr: "10.0.0.1:555".to_string(),
                ..Default::default()
            },
            info_span!("request"),
        );
        ctx.error(404);
        ctx.text(b"gone");
        pool.release(ctx);
        assert_eq!(pool.idle(), 1);

        let ctx = pool.acquire();
        assert_eq!(pool.idle(), 0);
        assert_eq!(ctx.request, HttpRequest::default());
        assert_eq!(ctx.response, Default::default());
        assert_eq!(ctx.status(), 0);
        assert!(!ctx.is_finished());
        assert_eq!(ctx.elapsed(), std::time::Duration::ZERO);
        assert!(ctx.span().is_none());
    }

    #[test]
    fn test_acquire_allocates_when_empty() {
        let pool = ContextPool::new();
        assert_eq!(pool.idle(), 0);
        let a = pool.acquire();
        let b = pool.acquire();
        pool.release(a);
        pool.release(b);
        assert_eq!(pool.idle(), 2);
    }
}

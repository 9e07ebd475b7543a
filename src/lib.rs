//! # Switchboard
//!
//! **Switchboard** is a coroutine-powered HTTP request-dispatch engine built
//! on the `may` runtime and `may_minihttp` transport: regex-pattern routing,
//! an ordered middleware chain with early exit, a fixed handler lifecycle,
//! and pooled per-request contexts.
//!
//! ## Architecture
//!
//! - **[`router`]** — ordered route table, first-match regex lookup with
//!   named capture extraction
//! - **[`handler`]** — the Init/Prepare/verb/Finish capability contract and
//!   its adapters
//! - **[`middleware`]** — pre-dispatch callbacks able to finish a request
//!   early
//! - **[`context`]** — pooled per-request state carrier with response
//!   helpers (JSON envelope, redirect, error, download)
//! - **[`dispatcher`]** — per-request orchestration, panic containment,
//!   access logging, context recycling
//! - **[`static_files`]** — prefix-mounted file serving that bypasses the
//!   router
//! - **[`server`]** — the `may_minihttp` transport bridge and server handle
//! - **[`app`]** — the registration surface and server shell
//!
//! ## Request handling flow
//!
//! ```text
//! request -> parse -> middleware chain -> static mounts -> router lookup
//!         -> init -> prepare -> verb operation -> finish
//!         -> access log -> context reset & pooled
//! ```
//!
//! Each request runs synchronously on its own `may` coroutine. A non-zero
//! context status is terminal and skips every remaining stage; panics are
//! contained per request and surface as a 500.
//!
//! ## Example
//!
//! ```no_run
//! use switchboard::{App, ServerConfig};
//!
//! fn main() -> std::io::Result<()> {
//!     switchboard::logging::init();
//!     let config = ServerConfig::default().static_path("/static", "./public");
//!     let mut app = App::new(config);
//!     app.route_fn("^/hello$", |ctx| {
//!         ctx.json(&serde_json::json!({"hello": "world"}), 0, None);
//!     })
//!     .map_err(|e| std::io::Error::other(e.to_string()))?;
//!     app.run()
//! }
//! ```

pub mod app;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod logging;
pub mod middleware;
pub mod pool;
pub mod router;
pub mod server;
pub mod static_files;

pub use app::App;
pub use config::ServerConfig;
pub use context::Context;
pub use dispatcher::Dispatcher;
pub use error::BodyError;
pub use handler::{BaseHandler, FnHandler, Handler, RawFnHandler};
pub use middleware::Middleware;
pub use pool::ContextPool;
pub use router::{RouteMatch, Router};
pub use static_files::StaticMounts;

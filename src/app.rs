//! Server shell.
//!
//! [`App`] owns the configuration and the registration surface. Routes,
//! middleware and static mounts are registered before [`App::start`]; the
//! resulting tables are frozen into a [`Dispatcher`] and shared read-only by
//! every request coroutine. [`App::run`] additionally wires SIGINT/SIGTERM
//! into a graceful, drained shutdown.

use crate::config::ServerConfig;
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::handler::{FnHandler, Handler, RawFnHandler};
use crate::middleware::Middleware;
use crate::router::Router;
use crate::server::request::HttpRequest;
use crate::server::response::ResponseWriter;
use crate::server::{AppService, HttpServer, ServerHandle};
use crate::static_files::StaticMounts;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

pub struct App {
    config: ServerConfig,
    router: Router,
    middleware: Vec<Arc<dyn Middleware>>,
    statics: StaticMounts,
}

impl App {
    /// Build an app shell; static mounts from `config.static_paths` are
    /// registered up front.
    pub fn new(config: ServerConfig) -> Self {
        let mut statics = StaticMounts::new();
        for (prefix, root) in &config.static_paths {
            statics.mount(prefix, root.clone());
        }
        Self {
            config,
            router: Router::new(),
            middleware: Vec::new(),
            statics,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Register a handler under a regex pattern. Registration order is
    /// lookup precedence.
    ///
    /// # Errors
    ///
    /// Returns an error when the pattern fails to compile.
    pub fn route(
        &mut self,
        pattern: &str,
        handler: impl Handler + 'static,
    ) -> Result<&mut Self, regex::Error> {
        self.router.register(pattern, Arc::new(handler))?;
        Ok(self)
    }

    /// Register a single callback serving every verb under `pattern`.
    pub fn route_fn(
        &mut self,
        pattern: &str,
        f: impl Fn(&mut Context) + Send + Sync + 'static,
    ) -> Result<&mut Self, regex::Error> {
        self.route(pattern, FnHandler(f))
    }

    /// Register a foreign writer/request callback under `pattern`.
    pub fn handle_raw(
        &mut self,
        pattern: &str,
        f: impl Fn(&mut ResponseWriter, &HttpRequest) + Send + Sync + 'static,
    ) -> Result<&mut Self, regex::Error> {
        self.route(pattern, RawFnHandler(f))
    }

    /// Append middleware; the chain runs in registration order.
    pub fn use_middleware(&mut self, mw: impl Middleware + 'static) -> &mut Self {
        self.middleware.push(Arc::new(mw));
        self
    }

    /// Add a static mount outside of the configuration file.
    pub fn mount(&mut self, prefix: &str, root: impl Into<PathBuf>) -> &mut Self {
        self.statics.mount(prefix, root);
        self
    }

    /// Register the route-table diagnostic endpoint at `^/_routes$`.
    ///
    /// The dump is a snapshot of the table at call time, so register this
    /// after all ordinary routes.
    pub fn debug_routes(&mut self) -> Result<&mut Self, regex::Error> {
        let dump = self.router.dump();
        self.route_fn("^/_routes$", move |ctx| {
            ctx.response.set_header("Content-Type", "text/plain");
            ctx.text(dump.as_bytes());
        })
    }

    /// Freeze the tables into a dispatcher. Exposed for driving the pipeline
    /// directly in tests.
    pub fn into_dispatcher(self) -> Dispatcher {
        Dispatcher::new(self.router, self.middleware, self.statics)
    }

    /// Freeze registration and start serving on the configured address.
    ///
    /// # Errors
    ///
    /// Returns an error when the listen address cannot be bound.
    pub fn start(self) -> io::Result<ServerHandle> {
        let address = self.config.address.clone();
        debug!(address = %address, "http serve");
        let service = AppService::new(Arc::new(self.into_dispatcher()));
        let in_flight = service.in_flight();
        HttpServer(service).start(address, in_flight)
    }

    /// Start serving and block until SIGINT or SIGTERM, then stop accepting
    /// connections and drain in-flight requests (30 second deadline).
    ///
    /// # Errors
    ///
    /// Returns an error when the server cannot start or the signal handler
    /// cannot be installed.
    #[cfg(unix)]
    pub fn run(self) -> io::Result<()> {
        use signal_hook::consts::{SIGINT, SIGTERM};
        use signal_hook::iterator::Signals;
        use std::time::Duration;

        let handle = self.start()?;
        let mut signals = Signals::new([SIGINT, SIGTERM])?;
        if signals.forever().next().is_some() {
            debug!("shutdown signal received");
        }
        handle.graceful_stop(Some(Duration::from_secs(30)));
        Ok(())
    }
}

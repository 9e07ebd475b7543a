//! Wrapper around may_minihttp's HTTP server.
//!
//! Provides a typed interface for starting a server and a handle for
//! stopping it, either immediately or by draining in-flight requests first.
//! Uses 32 max headers (Standard) to handle modern API gateway/proxy
//! traffic.

use may::coroutine::JoinHandle;
use may_minihttp::{HttpServerWithHeaders, HttpService};
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::warn;

pub struct HttpServer<T>(pub T);

/// Handle to a running HTTP server.
pub struct ServerHandle {
    addr: SocketAddr,
    handle: JoinHandle<()>,
    in_flight: Arc<AtomicUsize>,
}

impl ServerHandle {
    /// Wait for the server to accept TCP connections.
    ///
    /// # Errors
    ///
    /// Returns `TimedOut` if the server is not ready within ~250ms.
    pub fn wait_ready(&self) -> io::Result<()> {
        for _ in 0..50 {
            if TcpStream::connect(self.addr).is_ok() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(5));
        }
        Err(io::Error::new(io::ErrorKind::TimedOut, "server not ready"))
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop the server immediately without draining.
    pub fn stop(self) {
        self.cancel_listener();
    }

    /// Stop accepting new connections, then wait for in-flight requests to
    /// drain. `deadline: None` waits without bound; with a deadline, draining
    /// is abandoned (with a warning) once it expires.
    pub fn graceful_stop(self, deadline: Option<Duration>) {
        let in_flight = Arc::clone(&self.in_flight);
        self.cancel_listener();
        let started = Instant::now();
        loop {
            let pending = in_flight.load(Ordering::Acquire);
            if pending == 0 {
                return;
            }
            if let Some(limit) = deadline {
                if started.elapsed() >= limit {
                    warn!(pending, "shutdown drain deadline expired");
                    return;
                }
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    /// Block until the server coroutine finishes on its own.
    ///
    /// # Errors
    ///
    /// Returns an error if the server coroutine panicked.
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }

    fn cancel_listener(self) {
        // SAFETY: cancelling the accept-loop coroutine is the intended
        // shutdown path; the handle is valid for the lifetime of self.
        unsafe {
            self.handle.coroutine().cancel();
        }
        let _ = self.handle.join();
    }
}

impl<T: HttpService + Clone + Send + Sync + 'static> HttpServer<T> {
    /// Start the HTTP server on `addr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or the port cannot be
    /// bound.
    pub fn start<A: ToSocketAddrs>(
        self,
        addr: A,
        in_flight: Arc<AtomicUsize>,
    ) -> io::Result<ServerHandle> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid address"))?;
        let handle = HttpServerWithHeaders::<_, 32>(self.0).start(addr)?;
        Ok(ServerHandle {
            addr,
            handle,
            in_flight,
        })
    }
}

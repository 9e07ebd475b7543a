//! Transport bridge.
//!
//! [`AppService`] implements `may_minihttp::HttpService`: each inbound
//! request is parsed into an owned [`HttpRequest`], handed to the shared
//! [`Dispatcher`], and the finished response buffer is flushed back to the
//! wire. The in-flight counter backs graceful shutdown draining.

use super::request::parse_request;
use crate::dispatcher::Dispatcher;
use may_minihttp::{HttpService, Request, Response};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppService {
    dispatcher: Arc<Dispatcher>,
    in_flight: Arc<AtomicUsize>,
}

impl AppService {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of requests currently inside the pipeline.
    pub fn in_flight(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.in_flight)
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        // dispatch contains its own panic boundary, so the counter always
        // comes back down.
        let parsed = parse_request(req);
        let response = self.dispatcher.dispatch(parsed);
        response.flush(res);
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
        Ok(())
    }
}

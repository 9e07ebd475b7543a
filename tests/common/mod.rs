#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use switchboard::server::HttpRequest;
use switchboard::{Context, Handler};

/// Build a bare request for driving the dispatcher directly.
pub fn request(method: &str, path: &str) -> HttpRequest {
    HttpRequest {
        method: method.parse().unwrap(),
        path: path.to_string(),
        remote_addr: "127.0.0.1:50000".to_string(),
        ..Default::default()
    }
}

/// Handler that records which lifecycle stages ran, optionally finishing the
/// request at a chosen stage.
#[derive(Clone, Default)]
pub struct RecordingHandler {
    pub log: Arc<Mutex<Vec<&'static str>>>,
    pub finish_at: Option<&'static str>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finishing_at(stage: &'static str) -> Self {
        Self {
            log: Arc::default(),
            finish_at: Some(stage),
        }
    }

    pub fn stages(&self) -> Vec<&'static str> {
        self.log.lock().unwrap().clone()
    }

    fn mark(&self, stage: &'static str, ctx: &mut Context) {
        self.log.lock().unwrap().push(stage);
        if self.finish_at == Some(stage) {
            ctx.finish(204);
        }
    }
}

impl Handler for RecordingHandler {
    fn init(&self, ctx: &mut Context) {
        self.mark("init", ctx);
    }
    fn prepare(&self, ctx: &mut Context) {
        self.mark("prepare", ctx);
    }
    fn get(&self, ctx: &mut Context) {
        self.mark("get", ctx);
    }
    fn post(&self, ctx: &mut Context) {
        self.mark("post", ctx);
    }
    fn finish(&self, ctx: &mut Context) {
        self.mark("finish", ctx);
    }
}

//! Static file mounts.
//!
//! A set of (URL prefix -> filesystem root) rules checked after the
//! middleware chain and before router lookup. When several prefixes could
//! match the same path the longest prefix wins, deterministically. Path
//! mapping refuses any component that would escape the mounted root.

use crate::context::Context;
use crate::error::status_for_io_error;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

struct Mount {
    prefix: String,
    root: PathBuf,
}

/// Ordered static mounts; longest-prefix-first.
#[derive(Default)]
pub struct StaticMounts {
    mounts: Vec<Mount>,
}

impl StaticMounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mount. Mounts are kept sorted by descending prefix length (ties
    /// broken lexicographically) so matching is deterministic regardless of
    /// insertion order.
    pub fn mount(&mut self, prefix: &str, root: impl Into<PathBuf>) {
        self.mounts.push(Mount {
            prefix: prefix.to_string(),
            root: root.into(),
        });
        self.mounts
            .sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()).then(a.prefix.cmp(&b.prefix)));
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    /// Serve `ctx` from the first (longest) matching mount. Returns `false`
    /// when no prefix matches and control should fall through to the router;
    /// `true` means the request was handled here, successfully or not
    /// (a missing file finishes the request with 404 without consulting the
    /// router).
    pub fn serve(&self, ctx: &mut Context) -> bool {
        let path = ctx.request.path.clone();
        let Some(mount) = self.mounts.iter().find(|m| path.starts_with(&m.prefix)) else {
            return false;
        };
        match load(&mount.root, &path[mount.prefix.len()..]) {
            Ok((bytes, content_type)) => {
                ctx.response.set_header("Content-Type", content_type);
                ctx.finish(200);
                ctx.text(&bytes);
            }
            Err(err) => ctx.error(status_for_io_error(&err)),
        }
        true
    }
}

/// Resolve `url_path` under `base`, rejecting parent-dir and other non-normal
/// components so requests cannot traverse out of the mounted root.
fn map_path(base: &Path, url_path: &str) -> Option<PathBuf> {
    let mut pb = base.to_path_buf();
    for comp in Path::new(url_path.trim_start_matches('/')).components() {
        match comp {
            Component::Normal(s) => pb.push(s),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(pb)
}

fn content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase()
        .as_str()
    {
        "html" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

fn load(base: &Path, url_path: &str) -> io::Result<(Vec<u8>, &'static str)> {
    let path = map_path(base, url_path)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "invalid path"))?;
    if !path.is_file() {
        return Err(io::Error::new(io::ErrorKind::NotFound, "file not found"));
    }
    let bytes = fs::read(&path)?;
    Ok((bytes, content_type(&path)))
}

//! Pattern-based route table.
//!
//! Routes are `(compiled regex, handler)` entries scanned in registration
//! order; the first pattern matching the full path wins, so overlapping
//! patterns resolve by precedence of registration. Lookup is a deliberate
//! linear scan with one regex match per entry — first-match-wins over an
//! ordered table is the contract, not an implementation detail.
//!
//! Named capture groups are extracted into a name -> substring map and handed
//! back with the match as an extension point for parameterized routes.

use crate::handler::Handler;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

struct RouteEntry {
    pattern: Regex,
    handler: Arc<dyn Handler>,
}

/// Result of a successful route lookup.
pub struct RouteMatch<'r> {
    /// The handler bound to the matched pattern.
    pub handler: &'r dyn Handler,
    /// The pattern source that matched.
    pub pattern: &'r str,
    /// Named capture groups extracted from the path.
    pub path_params: HashMap<String, String>,
}

/// Ordered route table with first-match lookup.
///
/// The table is populated during startup and read-only once the server is
/// serving; there is no deregistration.
#[derive(Default)]
pub struct Router {
    entries: Vec<RouteEntry>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `(pattern, handler)` entry. Registration order is precedence
    /// order.
    pub fn register(
        &mut self,
        pattern: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<(), regex::Error> {
        let pattern = Regex::new(pattern)?;
        self.entries.push(RouteEntry { pattern, handler });
        Ok(())
    }

    /// Scan entries in registration order and return the first whose pattern
    /// matches `path`, together with its named capture groups.
    pub fn lookup(&self, path: &str) -> Option<RouteMatch<'_>> {
        for entry in &self.entries {
            if let Some(caps) = entry.pattern.captures(path) {
                let mut path_params = HashMap::new();
                for name in entry.pattern.capture_names().flatten() {
                    if let Some(m) = caps.name(name) {
                        path_params.insert(name.to_string(), m.as_str().to_string());
                    }
                }
                return Some(RouteMatch {
                    handler: &*entry.handler,
                    pattern: entry.pattern.as_str(),
                    path_params,
                });
            }
        }
        None
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Textual dump of the route table, one pattern per line in registration
    /// order.
    pub fn dump(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.pattern.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

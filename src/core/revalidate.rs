//! Cached views and their invalidation
//!
//! Mutations do not know who renders the data they change. They are handed
//! a [`ViewInvalidator`] and tell it which view path went stale; the
//! [`ViewCache`] used by the listing handler is the default implementation.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Marks rendered views as stale
pub trait ViewInvalidator: Send + Sync {
    /// Drop whatever is cached for `path`; never fails
    fn revalidate_path(&self, path: &str);
}

/// Rendered views keyed by path
///
/// Every path carries a generation that [`ViewInvalidator::revalidate_path`]
/// bumps. A renderer reads the generation before loading its data and
/// stores the view with [`ViewCache::put_if_generation`], so a view built
/// from data that a mutation has since changed is never cached.
#[derive(Clone, Default)]
pub struct ViewCache {
    inner: Arc<RwLock<Views>>,
}

#[derive(Default)]
struct Views {
    entries: HashMap<String, Value>,
    generations: HashMap<String, u64>,
}

impl Views {
    fn generation(&self, path: &str) -> u64 {
        self.generations.get(path).copied().unwrap_or(0)
    }
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<Value> {
        match self.inner.read() {
            Ok(views) => views.entries.get(path).cloned(),
            Err(e) => {
                tracing::warn!(path, "view cache lock poisoned: {}", e);
                None
            }
        }
    }

    /// Current generation of `path`; take it before loading the view's data
    pub fn generation(&self, path: &str) -> u64 {
        match self.inner.read() {
            Ok(views) => views.generation(path),
            Err(e) => {
                tracing::warn!(path, "view cache lock poisoned: {}", e);
                u64::MAX
            }
        }
    }

    /// Store `view` unless `path` was revalidated since `generation`
    ///
    /// Returns whether the view was stored.
    pub fn put_if_generation(&self, path: &str, view: Value, generation: u64) -> bool {
        match self.inner.write() {
            Ok(mut views) => {
                if views.generation(path) != generation {
                    return false;
                }
                views.entries.insert(path.to_string(), view);
                true
            }
            Err(e) => {
                tracing::warn!(path, "view cache lock poisoned: {}", e);
                false
            }
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }
}

impl ViewInvalidator for ViewCache {
    fn revalidate_path(&self, path: &str) {
        match self.inner.write() {
            Ok(mut views) => {
                *views.generations.entry(path.to_string()).or_insert(0) += 1;
                if views.entries.remove(path).is_some() {
                    tracing::debug!(path, "cached view invalidated");
                }
            }
            Err(e) => tracing::warn!(path, "view cache lock poisoned: {}", e),
        }
    }
}

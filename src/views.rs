//! Keeps one [TableController] per open records page.
//!
//! Each page load creates a view whose id is rendered into the page and sent
//! back with every table interaction. The registry holds a bounded number of
//! views and evicts the least recently used one when full.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{controller::TableController, pagination::PageSize};

/// An opaque identifier of one open records page.
///
/// Ids are derived from a seed of the registry's start time and the process
/// id, so they are unique and unpredictable enough to keep pages apart, but
/// they are not secrets and must not be used for access control.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(String);

impl ViewId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

struct ViewEntry {
    controller: Arc<Mutex<TableController>>,
    last_used: u64,
}

/// The table controllers of the currently open records pages.
pub struct ViewRegistry {
    views: HashMap<ViewId, ViewEntry>,
    capacity: usize,
    default_page_size: PageSize,
    /// Logical clock for least recently used eviction.
    clock: u64,
    /// Mixed into every id so ids differ between server runs.
    seed: [u8; 32],
    issued: u64,
}

impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("views", &self.views.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl ViewRegistry {
    /// Create a registry holding at most `capacity` views (at least one).
    pub fn new(capacity: usize, default_page_size: PageSize) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_nanos())
            .unwrap_or_default();
        let digest = Sha256::new()
            .chain_update(now.to_le_bytes())
            .chain_update(std::process::id().to_le_bytes())
            .finalize();
        let mut seed = [0; 32];
        seed.copy_from_slice(&digest);

        Self {
            views: HashMap::new(),
            capacity: capacity.max(1),
            default_page_size,
            clock: 0,
            seed,
            issued: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Open a new view with an idle controller.
    pub fn create(&mut self) -> (ViewId, Arc<Mutex<TableController>>) {
        if self.views.len() >= self.capacity {
            self.evict_least_recently_used();
        }

        let id = self.next_id();
        let controller = Arc::new(Mutex::new(TableController::new(self.default_page_size)));
        self.clock += 1;
        self.views.insert(
            id.clone(),
            ViewEntry {
                controller: controller.clone(),
                last_used: self.clock,
            },
        );

        (id, controller)
    }

    /// The controller of view `id`, if it is still open.
    pub fn get(&mut self, id: &ViewId) -> Option<Arc<Mutex<TableController>>> {
        self.clock += 1;
        let clock = self.clock;

        self.views.get_mut(id).map(|entry| {
            entry.last_used = clock;
            entry.controller.clone()
        })
    }

    fn next_id(&mut self) -> ViewId {
        self.issued += 1;
        let digest = Sha256::new()
            .chain_update(self.seed)
            .chain_update(self.issued.to_le_bytes())
            .finalize();

        ViewId(format!("{digest:x}")[..32].to_owned())
    }

    fn evict_least_recently_used(&mut self) {
        let oldest = self
            .views
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(id, _)| id.clone());

        if let Some(id) = oldest {
            tracing::debug!("Evicting records view {id}");
            self.views.remove(&id);
        }
    }
}

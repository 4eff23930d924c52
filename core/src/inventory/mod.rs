//! Hosts the orchestrator runs against, plus the filtered views the CLI
//! builds from `--hosts`, `--groups` and `--kwargs`.

mod filter;
mod host;
mod load;

pub use filter::{filter_inventory, FilterParams, Predicate};
pub use host::Host;
pub use load::{load_inventory, parse_hosts};

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::InventoryError;

/// Ordered host collection. Host records are shared between an inventory
/// and the filtered views derived from it.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    hosts: Vec<Arc<Host>>,
    defaults: Arc<Host>,
}

impl Inventory {
    pub fn new(hosts: Vec<Host>) -> Result<Self, InventoryError> {
        Self::from_shared(hosts.into_iter().map(Arc::new).collect(), Arc::default())
    }

    fn from_shared(hosts: Vec<Arc<Host>>, defaults: Arc<Host>) -> Result<Self, InventoryError> {
        let mut seen = HashSet::new();
        for host in &hosts {
            if !seen.insert(host.name.as_str()) {
                return Err(InventoryError::DuplicateHost(host.name.clone()));
            }
        }
        Ok(Self { hosts, defaults })
    }

    /// Apply `defaults` to every host field left unset, and keep them for
    /// views derived from this inventory.
    pub fn with_defaults(self, defaults: Host) -> Self {
        let hosts = self
            .hosts
            .into_iter()
            .map(|h| Arc::new(h.as_ref().clone().merged_with(&defaults)))
            .collect();
        Self {
            hosts,
            defaults: Arc::new(defaults),
        }
    }

    /// View over a subset of hosts sharing this inventory's records and
    /// defaults. Order follows this inventory.
    pub fn subset(&self, names: &HashSet<String>) -> Self {
        Self {
            hosts: self
                .hosts
                .iter()
                .filter(|h| names.contains(&h.name))
                .cloned()
                .collect(),
            defaults: Arc::clone(&self.defaults),
        }
    }

    pub fn hosts(&self) -> impl Iterator<Item = &Arc<Host>> {
        self.hosts.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Host>> {
        self.hosts.iter().find(|h| h.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.hosts.iter().map(|h| h.name.as_str()).collect()
    }

    pub fn defaults(&self) -> &Arc<Host> {
        &self.defaults
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

//! Persistent resident list.
//!
//! The whole list lives as one JSON array in a single slot. Reads never
//! fail: a missing slot is an empty register and an unreadable one is
//! logged and treated as empty. Writes that fail are logged and reported
//! to the caller as `false`, never as an error.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use crate::error::Result;
use crate::resident::Resident;
use crate::storage::KeyValueStore;

/// Slot key used when none is configured.
pub const DEFAULT_SLOT_KEY: &str = "buildingResidents";

/// Loads and saves the resident list under a fixed slot key.
#[derive(Debug)]
pub struct ResidentStore<S> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> ResidentStore<S> {
    /// Wrap a backend, using `key` as the slot.
    pub fn new(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Wrap a backend with the default slot key.
    pub fn with_default_key(backend: S) -> Self {
        Self::new(backend, DEFAULT_SLOT_KEY)
    }

    /// The slot key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying backend.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Read the list; empty when the slot is absent or unreadable.
    #[must_use]
    pub fn load(&self) -> Vec<Resident> {
        match self.try_load() {
            Ok(residents) => {
                debug!("Loaded {} residents from slot {}", residents.len(), self.key);
                residents
            }
            Err(e) => {
                error!("Error reading slot {:?}, starting empty: {}", self.key, e);
                Vec::new()
            }
        }
    }

    /// Read the list, surfacing read and parse failures.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails or the slot does not hold
    /// a JSON array of residents.
    pub fn try_load(&self) -> Result<Vec<Resident>> {
        match self.backend.get(&self.key)? {
            None => Ok(Vec::new()),
            Some(raw) => Ok(serde_json::from_str(&raw)?),
        }
    }

    /// Write the whole list. Returns whether the write succeeded.
    pub fn save(&mut self, residents: &[Resident]) -> bool {
        match self.try_save(residents) {
            Ok(()) => {
                info!("Saved {} residents to slot {}", residents.len(), self.key);
                true
            }
            Err(e) => {
                error!("Error writing slot {:?}: {}", self.key, e);
                false
            }
        }
    }

    /// Write the whole list, surfacing failures.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    pub fn try_save(&mut self, residents: &[Resident]) -> Result<()> {
        let json = serde_json::to_string(residents)?;
        self.backend.set(&self.key, &json)
    }

    /// Remove the slot entirely. Returns `false` if the removal failed.
    pub fn clear(&mut self) -> bool {
        match self.backend.remove(&self.key) {
            Ok(existed) => {
                info!("Removed slot {:?} (existed: {})", self.key, existed);
                true
            }
            Err(e) => {
                error!("Error removing slot {:?}: {}", self.key, e);
                false
            }
        }
    }

    /// The slot's raw text, if any. `None` also covers read failures.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.backend.get(&self.key).unwrap_or_else(|e| {
            error!("Error reading slot {:?}: {}", self.key, e);
            None
        })
    }

    /// When the slot was last written, if known.
    #[must_use]
    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.backend.last_modified(&self.key).ok().flatten()
    }
}

//! The resident list owned by the running application.
//!
//! A [`Roster`] is loaded once from its [`ResidentStore`] and written back
//! in full after every successful mutation. Records are addressed by
//! zero-based position only; any add or delete invalidates positions held
//! elsewhere.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::resident::Resident;
use crate::storage::KeyValueStore;
use crate::store::ResidentStore;

/// In-memory resident list bound to its persistent slot.
#[derive(Debug)]
pub struct Roster<S> {
    store: ResidentStore<S>,
    residents: Vec<Resident>,
    last_write_ok: bool,
}

impl<S: KeyValueStore> Roster<S> {
    /// Load the list from `store`.
    pub fn open(store: ResidentStore<S>) -> Self {
        let residents = store.load();
        Self {
            store,
            residents,
            last_write_ok: true,
        }
    }

    /// All residents in list order.
    #[must_use]
    pub fn residents(&self) -> &[Resident] {
        &self.residents
    }

    /// Resident at `position`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Resident> {
        self.residents.get(position)
    }

    /// Number of residents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.residents.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.residents.is_empty()
    }

    /// The backing store.
    pub fn store(&self) -> &ResidentStore<S> {
        &self.store
    }

    /// Whether the most recent write reached storage.
    ///
    /// When `false`, memory is ahead of storage for the rest of the session.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.last_write_ok
    }

    /// Append a resident and persist. Returns its position.
    pub fn add(&mut self, resident: Resident) -> usize {
        self.residents.push(resident);
        self.persist();
        self.residents.len() - 1
    }

    /// Replace the resident at `position` and persist. Returns the old record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PositionOutOfRange`] if nothing is at `position`.
    pub fn replace(&mut self, position: usize, resident: Resident) -> Result<Resident> {
        let slot = self.slot_mut(position)?;
        let previous = std::mem::replace(slot, resident);
        self.persist();
        Ok(previous)
    }

    /// Remove the resident at `position`, shifting later ones down, and persist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PositionOutOfRange`] if nothing is at `position`.
    pub fn remove(&mut self, position: usize) -> Result<Resident> {
        self.check(position)?;
        let removed = self.residents.remove(position);
        self.persist();
        Ok(removed)
    }

    /// Empty the list and persist. Returns how many residents were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.residents.len();
        self.residents.clear();
        self.persist();
        removed
    }

    fn check(&self, position: usize) -> Result<()> {
        if position < self.residents.len() {
            Ok(())
        } else {
            Err(Error::position_out_of_range(position, self.residents.len()))
        }
    }

    fn slot_mut(&mut self, position: usize) -> Result<&mut Resident> {
        let len = self.residents.len();
        self.residents
            .get_mut(position)
            .ok_or_else(|| Error::position_out_of_range(position, len))
    }

    fn persist(&mut self) {
        self.last_write_ok = self.store.save(&self.residents);
        if self.last_write_ok {
            debug!("Roster persisted ({} residents)", self.residents.len());
        } else {
            warn!("Roster changes are held in memory only");
        }
    }
}

//! Register summary figures.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::resident::{floor_index, Resident, FLOORS};

/// Headline numbers for the register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterStats {
    /// Number of residents.
    pub total_residents: usize,
    /// Number of distinct apartment numbers in use.
    pub occupied_apartments: usize,
    /// Every floor in building order with its resident count.
    pub per_floor: Vec<FloorCount>,
    /// Residents whose floor is not a known label (only possible in
    /// data written by something other than this crate).
    pub unknown_floor: usize,
    /// When the register was last saved, if known.
    pub last_updated: Option<DateTime<Utc>>,
}

/// Residents on one floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FloorCount {
    /// Floor label.
    pub floor: &'static str,
    /// Residents on it.
    pub residents: usize,
}

impl RosterStats {
    /// Compute figures for `residents`.
    #[must_use]
    pub fn compute(residents: &[Resident], last_updated: Option<DateTime<Utc>>) -> Self {
        let mut counts = [0usize; FLOORS.len()];
        let mut unknown_floor = 0;
        for resident in residents {
            match floor_index(&resident.floor) {
                Some(i) => counts[i] += 1,
                None => unknown_floor += 1,
            }
        }

        let occupied_apartments = residents
            .iter()
            .map(|r| r.apartment)
            .collect::<BTreeSet<_>>()
            .len();

        Self {
            total_residents: residents.len(),
            occupied_apartments,
            per_floor: FLOORS
                .into_iter()
                .zip(counts)
                .map(|(floor, residents)| FloorCount { floor, residents })
                .collect(),
            unknown_floor,
            last_updated,
        }
    }
}

//! `residents` - Keep a building's resident register
//!
//! This library holds the resident records, validates what is typed into
//! the entry form, persists the list in a key-value slot and renders it as a
//! printable report.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod logging;
pub mod prompt;
pub mod resident;
pub mod roster;
pub mod stats;
pub mod storage;
pub mod store;
pub mod validation;

pub use config::Config;
pub use controller::{DebugInfo, FormController, Submission};
pub use error::{Error, Result};
pub use export::{Exporter, HtmlFileExporter, Report};
pub use logging::init_logging;
pub use prompt::{Prompt, TerminalPrompt};
pub use resident::{Resident, ResidentForm, FLOORS};
pub use roster::Roster;
pub use stats::RosterStats;
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use store::ResidentStore;
pub use validation::{validate, Field, ValidationErrors};

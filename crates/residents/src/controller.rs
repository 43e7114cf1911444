//! The resident entry form and the actions around it.
//!
//! [`FormController`] holds what the form shows (field values, the
//! position being edited, the last validation messages) and applies
//! submissions to a [`Roster`] passed in by the caller. Destructive actions
//! go through a [`Prompt`] first.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::export::{Exporter, Report};
use crate::prompt::Prompt;
use crate::resident::{Resident, ResidentForm};
use crate::roster::Roster;
use crate::storage::KeyValueStore;
use crate::validation::{self, ValidationErrors};

/// Asked before removing one resident.
pub const CONFIRM_DELETE: &str = "هل أنت متأكد من حذف هذا الساكن؟";

/// Asked before emptying the register.
pub const CONFIRM_CLEAR_ALL: &str =
    "هل أنت متأكد من حذف جميع البيانات؟ هذا الإجراء لا يمكن التراجع عنه.";

/// Shown after the register was emptied.
pub const NOTICE_CLEARED: &str = "تم حذف جميع البيانات بنجاح";

/// Shown after a successful export.
pub const NOTICE_EXPORTED: &str = "تم تصدير القائمة بنجاح!";

/// Shown when an export fails.
pub const NOTICE_EXPORT_FAILED: &str = "حدث خطأ أثناء إنشاء الملف. يرجى المحاولة مرة أخرى.";

/// What a successful submission did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// A new resident was appended at this position.
    Added {
        /// Position of the new resident.
        position: usize,
    },
    /// The resident at this position was replaced.
    Updated {
        /// Position of the replaced resident.
        position: usize,
    },
}

impl Submission {
    /// Position the submission wrote to.
    #[must_use]
    pub fn position(&self) -> usize {
        match self {
            Self::Added { position } | Self::Updated { position } => *position,
        }
    }
}

/// Snapshot for troubleshooting storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugInfo {
    /// Slot key the register uses.
    pub slot_key: String,
    /// Where the slot store lives.
    pub location: String,
    /// Whether the slot store could be read.
    pub storage_available: bool,
    /// The slot's raw text.
    pub stored_value: Option<String>,
    /// Residents held in memory.
    pub residents_in_memory: usize,
    /// Whether the last write reached storage.
    pub persisted: bool,
}

impl DebugInfo {
    fn message(&self) -> String {
        format!(
            "Debug Info:\nstored value: {}\nCurrent residents: {}\nStorage available: {}\nLocation: {}",
            self.stored_value.as_deref().unwrap_or("null"),
            self.residents_in_memory,
            self.storage_available,
            self.location,
        )
    }
}

/// Entry form state: field values, edit position and validation messages.
#[derive(Debug, Clone, Default)]
pub struct FormController {
    form: ResidentForm,
    edit_position: Option<usize>,
    errors: ValidationErrors,
}

impl FormController {
    /// A blank form in add mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current field values.
    #[must_use]
    pub fn form(&self) -> &ResidentForm {
        &self.form
    }

    /// Position being edited, or `None` when adding.
    #[must_use]
    pub fn edit_position(&self) -> Option<usize> {
        self.edit_position
    }

    /// Whether a resident is being edited.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.edit_position.is_some()
    }

    /// Messages from the last failed submission.
    #[must_use]
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Validate a candidate without touching any state.
    ///
    /// # Errors
    ///
    /// Returns every failing field with its message.
    pub fn validate(candidate: &ResidentForm) -> std::result::Result<Resident, ValidationErrors> {
        validation::validate(candidate)
    }

    /// Submit the form with `candidate` as its field values.
    ///
    /// While editing, the resident at the edit position is replaced and the
    /// form returns to add mode; otherwise the resident is appended. The
    /// roster is persisted and the form cleared on success. On failure the
    /// form keeps `candidate` and nothing else changes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] with every failing field, or
    /// [`Error::PositionOutOfRange`] if the edit position no longer exists.
    pub fn submit<S: KeyValueStore>(
        &mut self,
        roster: &mut Roster<S>,
        candidate: ResidentForm,
    ) -> Result<Submission> {
        self.form = candidate;

        let resident = match validation::validate(&self.form) {
            Ok(resident) => resident,
            Err(errors) => {
                debug!("Submission rejected: {}", errors);
                self.errors = errors.clone();
                return Err(Error::Validation(errors));
            }
        };

        let submission = match self.edit_position {
            Some(position) => {
                roster.replace(position, resident)?;
                self.edit_position = None;
                Submission::Updated { position }
            }
            None => Submission::Added {
                position: roster.add(resident),
            },
        };

        self.reset_fields();
        info!("Resident saved: {:?}", submission);
        Ok(submission)
    }

    /// Load the resident at `position` into the form and enter edit mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PositionOutOfRange`] if nothing is at `position`.
    pub fn begin_edit<S: KeyValueStore>(
        &mut self,
        roster: &Roster<S>,
        position: usize,
    ) -> Result<&ResidentForm> {
        let resident = roster
            .get(position)
            .ok_or_else(|| Error::position_out_of_range(position, roster.len()))?;

        self.form = ResidentForm::from(resident);
        self.errors.clear();
        self.edit_position = Some(position);
        debug!("Editing resident at position {}", position);
        Ok(&self.form)
    }

    /// Leave edit mode and blank the form. The roster is untouched.
    pub fn cancel_edit(&mut self) {
        self.edit_position = None;
        self.reset_fields();
    }

    /// Remove the resident at `position` once the user confirms.
    ///
    /// Returns the removed resident, or `None` if the user declined.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PositionOutOfRange`] if nothing is at `position`;
    /// the user is not asked in that case.
    pub fn delete<S: KeyValueStore, P: Prompt>(
        &mut self,
        roster: &mut Roster<S>,
        position: usize,
        prompt: &mut P,
    ) -> Result<Option<Resident>> {
        if position >= roster.len() {
            return Err(Error::position_out_of_range(position, roster.len()));
        }
        if !prompt.confirm(CONFIRM_DELETE) {
            debug!("Delete of position {} declined", position);
            return Ok(None);
        }

        let removed = roster.remove(position)?;
        info!("Removed resident at position {}", position);
        Ok(Some(removed))
    }

    /// Empty the register once the user confirms. Returns whether it did.
    pub fn clear_all<S: KeyValueStore, P: Prompt>(
        &mut self,
        roster: &mut Roster<S>,
        prompt: &mut P,
    ) -> bool {
        if !prompt.confirm(CONFIRM_CLEAR_ALL) {
            debug!("Clear all declined");
            return false;
        }

        let removed = roster.clear();
        info!("Cleared register ({} residents removed)", removed);
        prompt.notify(NOTICE_CLEARED);
        true
    }

    /// Export the register and tell the user how it went.
    ///
    /// # Errors
    ///
    /// Returns the exporter's error after notifying the user.
    pub fn export<S: KeyValueStore, E: Exporter, P: Prompt>(
        &self,
        roster: &Roster<S>,
        exporter: &mut E,
        prompt: &mut P,
        title: &str,
        generated_on: NaiveDate,
    ) -> Result<PathBuf> {
        let report = Report {
            title,
            generated_on,
            residents: roster.residents(),
        };

        match exporter.export(&report) {
            Ok(path) => {
                prompt.notify(NOTICE_EXPORTED);
                Ok(path)
            }
            Err(e) => {
                error!("Export failed: {}", e);
                prompt.notify(NOTICE_EXPORT_FAILED);
                Err(e)
            }
        }
    }

    /// Gather storage diagnostics, log them and show them to the user.
    pub fn debug_info<S: KeyValueStore, P: Prompt>(
        &self,
        roster: &Roster<S>,
        prompt: &mut P,
    ) -> DebugInfo {
        let store = roster.store();
        let read = store.backend().get(store.key());
        if let Err(e) = &read {
            error!("Slot store unavailable: {}", e);
        }

        let info = DebugInfo {
            slot_key: store.key().to_string(),
            location: store.backend().location(),
            storage_available: read.is_ok(),
            stored_value: read.ok().flatten(),
            residents_in_memory: roster.len(),
            persisted: roster.is_persisted(),
        };

        info!("Stored value: {:?}", info.stored_value);
        info!("Residents in memory: {}", info.residents_in_memory);
        prompt.notify(&info.message());
        info
    }

    fn reset_fields(&mut self) {
        self.form = ResidentForm::default();
        self.errors.clear();
    }
}

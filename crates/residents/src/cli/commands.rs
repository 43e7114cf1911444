//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::resident::{ResidentForm, FLOORS};

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Field values for a new resident.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Full name in Arabic script
    #[arg(short, long)]
    pub name: String,

    /// Floor label, or its number from 1 to 12
    #[arg(short, long)]
    pub floor: String,

    /// Apartment number (1-500)
    #[arg(short, long, allow_hyphen_values = true)]
    pub apartment: String,

    /// Mobile number, 11 digits starting with 010
    #[arg(short, long)]
    pub phone: String,

    /// Free-form notes
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl AddCommand {
    /// The form as the user filled it in.
    #[must_use]
    pub fn to_form(&self) -> ResidentForm {
        ResidentForm {
            name: self.name.clone(),
            floor: resolve_floor(&self.floor),
            apartment: self.apartment.clone(),
            phone: self.phone.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Edit command arguments. Omitted fields keep their current value.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Row number as shown by `list`
    pub number: NonZeroUsize,

    /// New name
    #[arg(short, long)]
    pub name: Option<String>,

    /// New floor label or number
    #[arg(short, long)]
    pub floor: Option<String>,

    /// New apartment number
    #[arg(short, long, allow_hyphen_values = true)]
    pub apartment: Option<String>,

    /// New phone number
    #[arg(short, long)]
    pub phone: Option<String>,

    /// New notes (pass "" to remove them)
    #[arg(long)]
    pub notes: Option<String>,
}

impl EditCommand {
    /// Zero-based list position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.number.get() - 1
    }

    /// Overlay the given fields on the loaded form.
    #[must_use]
    pub fn apply_to(&self, loaded: &ResidentForm) -> ResidentForm {
        let mut form = loaded.clone();
        if let Some(name) = &self.name {
            form.name.clone_from(name);
        }
        if let Some(floor) = &self.floor {
            form.floor = resolve_floor(floor);
        }
        if let Some(apartment) = &self.apartment {
            form.apartment.clone_from(apartment);
        }
        if let Some(phone) = &self.phone {
            form.phone.clone_from(phone);
        }
        if let Some(notes) = &self.notes {
            form.notes.clone_from(notes);
        }
        form
    }
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Row number as shown by `list`
    pub number: NonZeroUsize,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl DeleteCommand {
    /// Zero-based list position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.number.get() - 1
    }
}

/// Clear command arguments.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Write the report here instead of the configured location
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Commands that only print.
#[derive(Debug, Args)]
pub struct JsonFlag {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One resident per line
    Plain,
    /// Aligned table
    #[default]
    Table,
    /// JSON array, as stored
    Json,
}

/// Map a floor number (`1`-`12`) to its label; other input passes through.
#[must_use]
pub fn resolve_floor(input: &str) -> String {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| FLOORS.get(i))
        .map_or_else(|| input.to_string(), |label| (*label).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit(number: usize) -> EditCommand {
        EditCommand {
            number: NonZeroUsize::new(number).unwrap(),
            name: None,
            floor: None,
            apartment: None,
            phone: None,
            notes: None,
        }
    }

    #[test]
    fn test_resolve_floor_number() {
        assert_eq!(resolve_floor("1"), "الدور الأول");
        assert_eq!(resolve_floor(" 12 "), "الدور الثاني عشر");
    }

    #[test]
    fn test_resolve_floor_passthrough() {
        assert_eq!(resolve_floor("0"), "0");
        assert_eq!(resolve_floor("13"), "13");
        assert_eq!(resolve_floor("الدور الثالث"), "الدور الثالث");
        assert_eq!(resolve_floor(""), "");
    }

    #[test]
    fn test_add_to_form() {
        let cmd = AddCommand {
            name: "محمد علي".to_string(),
            floor: "2".to_string(),
            apartment: "5".to_string(),
            phone: "01012345678".to_string(),
            notes: String::new(),
        };
        let form = cmd.to_form();
        assert_eq!(form.floor, "الدور الثاني");
        assert_eq!(form.apartment, "5");
    }

    #[test]
    fn test_edit_position_is_zero_based() {
        assert_eq!(edit(1).position(), 0);
        assert_eq!(edit(3).position(), 2);
    }

    #[test]
    fn test_edit_apply_overrides_only_given_fields() {
        let loaded = ResidentForm {
            name: "أحمد".to_string(),
            floor: "الدور الأول".to_string(),
            apartment: "1".to_string(),
            phone: "01012345678".to_string(),
            notes: "قديم".to_string(),
        };
        let mut cmd = edit(1);
        cmd.apartment = Some("9".to_string());
        cmd.floor = Some("4".to_string());
        cmd.notes = Some(String::new());

        let form = cmd.apply_to(&loaded);
        assert_eq!(form.name, "أحمد");
        assert_eq!(form.floor, "الدور الرابع");
        assert_eq!(form.apartment, "9");
        assert_eq!(form.phone, "01012345678");
        assert_eq!(form.notes, "");
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }
}

//! Core resident types.
//!
//! A [`Resident`] is a validated register entry. A [`ResidentForm`] is the
//! raw, unvalidated text of the entry form; it only becomes a `Resident`
//! through [`crate::validation::validate`].

use serde::{Deserialize, Serialize};

/// Floor labels in building order.
pub const FLOORS: [&str; 12] = [
    "الدور الأول",
    "الدور الثاني",
    "الدور الثالث",
    "الدور الرابع",
    "الدور الخامس",
    "الدور السادس",
    "الدور السابع",
    "الدور الثامن",
    "الدور التاسع",
    "الدور العاشر",
    "الدور الحادي عشر",
    "الدور الثاني عشر",
];

/// Lowest valid apartment number.
pub const MIN_APARTMENT: u16 = 1;

/// Highest valid apartment number.
pub const MAX_APARTMENT: u16 = 500;

/// Required phone number length in characters.
pub const PHONE_LENGTH: usize = 11;

/// Required phone number prefix.
pub const PHONE_PREFIX: &str = "010";

/// Position of a floor label in [`FLOORS`], if it is one.
#[must_use]
pub fn floor_index(label: &str) -> Option<usize> {
    FLOORS.iter().position(|floor| *floor == label)
}

/// A building occupant as stored in the register.
///
/// Serializes to the persisted shape
/// `{"name", "floor", "apartment", "phone", "notes"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
    /// Full name, Arabic script.
    pub name: String,

    /// One of the [`FLOORS`] labels.
    pub floor: String,

    /// Apartment number, not unique across residents.
    pub apartment: u16,

    /// Mobile number, e.g. `01012345678`.
    pub phone: String,

    /// Free-form notes; empty when none were given.
    #[serde(default)]
    pub notes: String,
}

impl Resident {
    /// Notes for display, with `-` standing in for none.
    #[must_use]
    pub fn notes_or_dash(&self) -> &str {
        if self.notes.trim().is_empty() {
            "-"
        } else {
            &self.notes
        }
    }
}

/// The entry form's field values, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResidentForm {
    /// Name field.
    pub name: String,
    /// Selected floor label; empty when nothing is selected.
    pub floor: String,
    /// Apartment number as text.
    pub apartment: String,
    /// Phone field.
    pub phone: String,
    /// Notes field.
    pub notes: String,
}

impl ResidentForm {
    /// Whether every field is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        [
            &self.name,
            &self.floor,
            &self.apartment,
            &self.phone,
            &self.notes,
        ]
        .iter()
        .all(|value| value.is_empty())
    }
}

impl From<&Resident> for ResidentForm {
    fn from(resident: &Resident) -> Self {
        Self {
            name: resident.name.clone(),
            floor: resident.floor.clone(),
            apartment: resident.apartment.to_string(),
            phone: resident.phone.clone(),
            notes: resident.notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Resident {
        Resident {
            name: "محمد علي".to_string(),
            floor: FLOORS[0].to_string(),
            apartment: 5,
            phone: "01012345678".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_floor_index() {
        assert_eq!(floor_index("الدور الأول"), Some(0));
        assert_eq!(floor_index("الدور الثاني عشر"), Some(11));
        assert_eq!(floor_index("الدور الثالث عشر"), None);
        assert_eq!(floor_index(""), None);
    }

    #[test]
    fn test_notes_or_dash() {
        let mut resident = sample();
        assert_eq!(resident.notes_or_dash(), "-");

        resident.notes = "   ".to_string();
        assert_eq!(resident.notes_or_dash(), "-");

        resident.notes = "مالك الشقة".to_string();
        assert_eq!(resident.notes_or_dash(), "مالك الشقة");
    }

    #[test]
    fn test_persisted_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["name"], "محمد علي");
        assert_eq!(json["floor"], "الدور الأول");
        assert_eq!(json["apartment"], 5);
        assert_eq!(json["phone"], "01012345678");
        assert_eq!(json["notes"], "");
    }

    #[test]
    fn test_missing_notes_reads_as_empty() {
        let json = r#"{"name":"سارة","floor":"الدور الأول","apartment":3,"phone":"01099999999"}"#;
        let resident: Resident = serde_json::from_str(json).unwrap();
        assert_eq!(resident.notes, "");
        assert_eq!(resident.apartment, 3);
    }

    #[test]
    fn test_form_from_resident() {
        let form = ResidentForm::from(&sample());
        assert_eq!(form.name, "محمد علي");
        assert_eq!(form.apartment, "5");
        assert_eq!(form.phone, "01012345678");
        assert!(!form.is_blank());
    }

    #[test]
    fn test_default_form_is_blank() {
        assert!(ResidentForm::default().is_blank());
    }
}

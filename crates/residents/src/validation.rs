//! Field validation for the resident entry form.
//!
//! Every field is checked independently and all failing fields are
//! reported together. Within a single field the checks run in a fixed
//! order and only the first failure is kept, so each field carries at
//! most one message.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::resident::{
    floor_index, Resident, ResidentForm, MAX_APARTMENT, MIN_APARTMENT, PHONE_LENGTH, PHONE_PREFIX,
};

/// Minimum name length in characters.
pub const MIN_NAME_CHARS: usize = 2;

/// Arabic block plus whitespace.
const ARABIC_NAME_PATTERN: &str = r"^[\x{0600}-\x{06FF}\s]+$";

const MSG_NAME_TOO_SHORT: &str = "الاسم يجب أن يكون على الأقل حرفين";
const MSG_NAME_NOT_ARABIC: &str = "الاسم يجب أن يحتوي على أحرف عربية فقط";
const MSG_FLOOR_MISSING: &str = "يجب اختيار الدور";
const MSG_FLOOR_UNKNOWN: &str = "يجب اختيار دور من القائمة";
const MSG_APARTMENT_NOT_NUMBER: &str = "رقم الشقة يجب أن يكون رقمًا";
const MSG_APARTMENT_TOO_LOW: &str = "رقم الشقة يجب أن يكون على الأقل 1";
const MSG_APARTMENT_TOO_HIGH: &str = "رقم الشقة لا يمكن أن يكون أكثر من 500";
const MSG_PHONE_LENGTH: &str = "رقم الهاتف يجب أن يكون 11 رقمًا";
const MSG_PHONE_PREFIX: &str = "رقم الهاتف يجب أن يبدأ بـ 010";

fn arabic_name() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(ARABIC_NAME_PATTERN).expect("name pattern is valid"))
}

/// A form field that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Resident name.
    Name,
    /// Floor label.
    Floor,
    /// Apartment number.
    Apartment,
    /// Phone number.
    Phone,
    /// Notes.
    Notes,
}

impl Field {
    /// The field's key in forms and persisted records.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Floor => "floor",
            Self::Apartment => "apartment",
            Self::Phone => "phone",
            Self::Notes => "notes",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation messages, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<Field, String>,
}

impl ValidationErrors {
    /// Record a message for a field, keeping the first one if already set.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    /// Message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Whether the field failed validation.
    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    /// Failing fields in form order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields.keys().copied()
    }

    /// Failing fields with their messages, in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        self.fields.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Drop all messages.
    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a form against the resident schema.
///
/// # Errors
///
/// Returns every failing field with its message.
pub fn validate(form: &ResidentForm) -> Result<Resident, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if let Some(msg) = check_name(&form.name) {
        errors.insert(Field::Name, msg);
    }
    if let Some(msg) = check_floor(&form.floor) {
        errors.insert(Field::Floor, msg);
    }
    let apartment = match parse_apartment(&form.apartment) {
        Ok(number) => Some(number),
        Err(msg) => {
            errors.insert(Field::Apartment, msg);
            None
        }
    };
    if let Some(msg) = check_phone(&form.phone) {
        errors.insert(Field::Phone, msg);
    }

    match apartment {
        Some(apartment) if errors.is_empty() => Ok(Resident {
            name: form.name.clone(),
            floor: form.floor.clone(),
            apartment,
            phone: form.phone.clone(),
            notes: form.notes.clone(),
        }),
        _ => Err(errors),
    }
}

fn check_name(name: &str) -> Option<&'static str> {
    if name.chars().count() < MIN_NAME_CHARS {
        Some(MSG_NAME_TOO_SHORT)
    } else if !arabic_name().is_match(name) {
        Some(MSG_NAME_NOT_ARABIC)
    } else {
        None
    }
}

fn check_floor(floor: &str) -> Option<&'static str> {
    if floor.is_empty() {
        Some(MSG_FLOOR_MISSING)
    } else if floor_index(floor).is_none() {
        Some(MSG_FLOOR_UNKNOWN)
    } else {
        None
    }
}

fn parse_apartment(raw: &str) -> Result<u16, &'static str> {
    let raw = raw.trim();
    let number: i64 = match raw.parse() {
        Ok(number) => number,
        // Digit strings too long for i64 are still numbers, just huge ones.
        Err(_) if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) => {
            return Err(MSG_APARTMENT_TOO_HIGH)
        }
        Err(_) => return Err(MSG_APARTMENT_NOT_NUMBER),
    };

    if number < i64::from(MIN_APARTMENT) {
        Err(MSG_APARTMENT_TOO_LOW)
    } else if number > i64::from(MAX_APARTMENT) {
        Err(MSG_APARTMENT_TOO_HIGH)
    } else {
        u16::try_from(number).map_err(|_| MSG_APARTMENT_TOO_HIGH)
    }
}

fn check_phone(phone: &str) -> Option<&'static str> {
    if phone.chars().count() != PHONE_LENGTH {
        Some(MSG_PHONE_LENGTH)
    } else if !phone.starts_with(PHONE_PREFIX) {
        Some(MSG_PHONE_PREFIX)
    } else {
        None
    }
}

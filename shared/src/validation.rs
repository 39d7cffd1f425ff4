//! Employee input validation
//!
//! Turns an [`EmployeeDraft`] into a typed payload, collecting every field
//! failure instead of stopping at the first one. The rules differ between
//! create and update:
//!
//! - `email` is only part of the create shape
//! - `password` is required on create; on update an empty value means
//!   "unchanged" and the key is dropped from the payload
//! - `active` defaults to `true` on create; on update it is only sent when set
//!
//! Validation is pure. The caller passes the current instant so that
//! `dateOfBirth` is checked against the clock at submit time.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use validator::ValidateEmail;

use crate::models::{EmployeeCreate, EmployeeDraft, EmployeeUpdate, Gender, Patch};

// ========== Limits ==========

pub const MIN_FULL_NAME_LEN: usize = 4;
pub const MAX_FULL_NAME_LEN: usize = 160;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const PHONE_DIGITS: usize = 10;

// ========== Error types ==========

/// Which payload shape is being validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Create,
    Update,
}

/// Form fields that can carry an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FullName,
    Email,
    DateOfBirth,
    Gender,
    PhoneNumber,
    Password,
}

impl Field {
    /// Wire (camelCase) name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::DateOfBirth => "dateOfBirth",
            Self::Gender => "gender",
            Self::PhoneNumber => "phoneNumber",
            Self::Password => "password",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldErrorKind {
    Required,
    TooShort,
    TooLong,
    InvalidFormat,
    NotInPast,
    InvalidChoice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: Field, kind: FieldErrorKind) -> Self {
        Self {
            kind,
            message: message_for(field, kind),
        }
    }
}

fn message_for(field: Field, kind: FieldErrorKind) -> &'static str {
    use FieldErrorKind::*;
    match (field, kind) {
        (Field::FullName, Required) => "Full name is required",
        (Field::FullName, TooShort) => "Full name must be at least 4 characters",
        (Field::FullName, TooLong) => "Full name must not exceed 160 characters",
        (Field::Email, Required) => "Email is required",
        (Field::Email, _) => "Email should be valid",
        (Field::DateOfBirth, Required) => "Date of birth is required",
        (Field::DateOfBirth, NotInPast) => "Date of birth must be in the past",
        (Field::DateOfBirth, _) => "Date of birth must be a valid date (YYYY-MM-DD)",
        (Field::Gender, _) => "Please select a gender",
        (Field::PhoneNumber, Required) => "Phone number is required",
        (Field::PhoneNumber, _) => "Phone number must be exactly 10 digits",
        (Field::Password, Required) => "Password is required",
        (Field::Password, _) => "Password must be at least 6 characters",
        (Field::FullName, _) => "Full name is invalid",
    }
}

/// All field failures of one validation run, at most one per field
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation failed: {}", self.summary())]
pub struct ValidationErrors {
    errors: BTreeMap<Field, FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure. The first failure per field wins.
    pub fn add(&mut self, field: Field, kind: FieldErrorKind) {
        self.errors
            .entry(field)
            .or_insert_with(|| FieldError::new(field, kind));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    pub fn kind(&self, field: Field) -> Option<FieldErrorKind> {
        self.errors.get(&field).map(|e| e.kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldError)> {
        self.errors.iter().map(|(f, e)| (*f, e))
    }

    /// Field name → message, ready to render next to each input
    pub fn messages(&self) -> BTreeMap<&'static str, &'static str> {
        self.errors
            .iter()
            .map(|(f, e)| (f.as_str(), e.message))
            .collect()
    }

    /// `field: message` pairs joined with `; `
    fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|(field, err)| format!("{field}: {}", err.message))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}


// ========== Results ==========

/// Output of [`validate`], tagged by mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedEmployee {
    Create(EmployeeCreate),
    Update(EmployeeUpdate),
}

// ========== Field rules ==========

fn check_full_name(raw: &str, errors: &mut ValidationErrors) -> Option<String> {
    let value = raw.trim();
    let len = value.chars().count();
    if value.is_empty() {
        errors.add(Field::FullName, FieldErrorKind::Required);
    } else if len < MIN_FULL_NAME_LEN {
        errors.add(Field::FullName, FieldErrorKind::TooShort);
    } else if len > MAX_FULL_NAME_LEN {
        errors.add(Field::FullName, FieldErrorKind::TooLong);
    } else {
        return Some(value.to_string());
    }
    None
}

fn check_email(raw: &str, errors: &mut ValidationErrors) -> Option<String> {
    let value = raw.trim().to_string();
    if value.is_empty() {
        errors.add(Field::Email, FieldErrorKind::Required);
        return None;
    }
    if !value.validate_email() {
        errors.add(Field::Email, FieldErrorKind::InvalidFormat);
        return None;
    }
    Some(value)
}

fn check_date_of_birth(
    raw: &str,
    now: DateTime<Utc>,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        errors.add(Field::DateOfBirth, FieldErrorKind::Required);
        return None;
    }
    let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") else {
        errors.add(Field::DateOfBirth, FieldErrorKind::InvalidFormat);
        return None;
    };
    // The date stands for its UTC midnight instant
    let instant = date
        .and_hms_opt(0, 0, 0)
        .map(|midnight| Utc.from_utc_datetime(&midnight));
    match instant {
        Some(at) if at < now => Some(date),
        _ => {
            errors.add(Field::DateOfBirth, FieldErrorKind::NotInPast);
            None
        }
    }
}

fn check_gender(raw: &str, errors: &mut ValidationErrors) -> Option<Gender> {
    match raw.parse::<Gender>() {
        Ok(gender) => Some(gender),
        Err(()) => {
            errors.add(Field::Gender, FieldErrorKind::InvalidChoice);
            None
        }
    }
}

fn check_phone_number(raw: &str, errors: &mut ValidationErrors) -> Option<String> {
    if raw.is_empty() {
        errors.add(Field::PhoneNumber, FieldErrorKind::Required);
        return None;
    }
    if raw.len() != PHONE_DIGITS || !raw.bytes().all(|b| b.is_ascii_digit()) {
        errors.add(Field::PhoneNumber, FieldErrorKind::InvalidFormat);
        return None;
    }
    Some(raw.to_string())
}

fn check_password_length(raw: &str, errors: &mut ValidationErrors) -> bool {
    if raw.chars().count() < MIN_PASSWORD_LEN {
        errors.add(Field::Password, FieldErrorKind::TooShort);
        return false;
    }
    true
}

// ========== Entry points ==========

/// Validate a draft for `POST /employees`
pub fn validate_create(
    draft: &EmployeeDraft,
    now: DateTime<Utc>,
) -> Result<EmployeeCreate, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let full_name = check_full_name(&draft.full_name, &mut errors);
    let email = check_email(&draft.email, &mut errors);
    let date_of_birth = check_date_of_birth(&draft.date_of_birth, now, &mut errors);
    let gender = check_gender(&draft.gender, &mut errors);
    let phone_number = check_phone_number(&draft.phone_number, &mut errors);
    let password = if draft.password.is_empty() {
        errors.add(Field::Password, FieldErrorKind::Required);
        None
    } else {
        check_password_length(&draft.password, &mut errors).then(|| draft.password.clone())
    };

    match (full_name, email, date_of_birth, gender, phone_number, password) {
        (
            Some(full_name),
            Some(email),
            Some(date_of_birth),
            Some(gender),
            Some(phone_number),
            Some(password),
        ) if errors.is_empty() => Ok(EmployeeCreate {
            full_name,
            email,
            date_of_birth,
            gender,
            phone_number,
            active: draft.active.unwrap_or(true),
            password,
        }),
        _ => Err(errors),
    }
}

/// Validate a draft for `PUT /employees/{id}`. `draft.email` is ignored.
pub fn validate_update(
    draft: &EmployeeDraft,
    now: DateTime<Utc>,
) -> Result<EmployeeUpdate, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let full_name = check_full_name(&draft.full_name, &mut errors);
    let date_of_birth = check_date_of_birth(&draft.date_of_birth, now, &mut errors);
    let gender = check_gender(&draft.gender, &mut errors);
    let phone_number = check_phone_number(&draft.phone_number, &mut errors);
    let password = if draft.password.is_empty() {
        Patch::Absent
    } else if check_password_length(&draft.password, &mut errors) {
        Patch::Present(draft.password.clone())
    } else {
        Patch::Absent
    };

    match (full_name, date_of_birth, gender, phone_number) {
        (Some(full_name), Some(date_of_birth), Some(gender), Some(phone_number)) => {
            errors.into_result(|| EmployeeUpdate {
                full_name,
                date_of_birth,
                gender,
                phone_number,
                active: draft.active.into(),
                password,
            })
        }
        _ => Err(errors),
    }
}

/// Validate a draft in the given mode
pub fn validate(
    mode: ValidationMode,
    draft: &EmployeeDraft,
    now: DateTime<Utc>,
) -> Result<ValidatedEmployee, ValidationErrors> {
    match mode {
        ValidationMode::Create => validate_create(draft, now).map(ValidatedEmployee::Create),
        ValidationMode::Update => validate_update(draft, now).map(ValidatedEmployee::Update),
    }
}

/// [`validate_create`] against the system clock
pub fn validate_create_now(draft: &EmployeeDraft) -> Result<EmployeeCreate, ValidationErrors> {
    validate_create(draft, Utc::now())
}

/// [`validate_update`] against the system clock
pub fn validate_update_now(draft: &EmployeeDraft) -> Result<EmployeeUpdate, ValidationErrors> {
    validate_update(draft, Utc::now())
}

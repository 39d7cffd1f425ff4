//! Employee Model

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Backend-assigned employee identifier
pub type EmployeeId = i64;

/// Employee gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    /// Wire name (`MALE`, `FEMALE`, `OTHER`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
            Self::Other => "OTHER",
        }
    }

    /// Label shown in list views
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or(())
    }
}

/// Employee as returned by the backend (never carries the password)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub full_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub phone_number: String,
    pub active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Normalized create payload (`POST /employees`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCreate {
    pub full_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub phone_number: String,
    pub active: bool,
    pub password: String,
}

/// Normalized update payload (`PUT /employees/{id}`)
///
/// There is no `email` field: email is fixed at creation.
/// `Patch::Absent` fields are left out of the request body entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub active: Patch<bool>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub password: Patch<String>,
}

/// Present/absent wrapper for optional update fields.
///
/// Absence means "leave unchanged" and is distinct from any present value,
/// including an empty one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Patch<T> {
    #[default]
    Absent,
    Present(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Patch::Present(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Patch::Present(v) => Some(v),
            Patch::Absent => None,
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Present(v),
            None => Patch::Absent,
        }
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Present(v) => v.serialize(serializer),
            // Only reached when the field is not guarded by skip_serializing_if
            Patch::Absent => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

/// Raw form input, exactly as typed by the user.
///
/// Nothing here is trusted; run it through [`crate::validation`] to obtain
/// an [`EmployeeCreate`] or [`EmployeeUpdate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeDraft {
    pub full_name: String,
    pub email: String,
    pub date_of_birth: String,
    pub gender: String,
    pub phone_number: String,
    pub active: Option<bool>,
    pub password: String,
}

impl EmployeeDraft {
    /// Defaults for the create form
    pub fn blank() -> Self {
        Self {
            gender: Gender::Male.as_str().to_string(),
            active: Some(true),
            ..Self::default()
        }
    }

    /// Prefill for the edit form. Email is left empty (not editable) and
    /// the password starts empty, meaning "unchanged".
    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            full_name: employee.full_name.clone(),
            email: String::new(),
            date_of_birth: employee.date_of_birth.format("%Y-%m-%d").to_string(),
            gender: employee.gender.as_str().to_string(),
            phone_number: employee.phone_number.clone(),
            active: Some(employee.active),
            password: String::new(),
        }
    }
}

/// Format a date for list display (`dd/mm/yyyy`)
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Employee {
        Employee {
            id: 7,
            full_name: "Nguyen Van A".into(),
            email: "a@example.com".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            gender: Gender::Female,
            phone_number: "0912345678".into(),
            active: false,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            updated_at: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_employee_wire_format() {
        let json = r#"{
            "id": 7,
            "fullName": "Nguyen Van A",
            "email": "a@example.com",
            "dateOfBirth": "1990-05-17",
            "gender": "FEMALE",
            "phoneNumber": "0912345678",
            "active": false,
            "createdAt": "2024-01-01T08:00:00",
            "updatedAt": "2024-01-02T09:30:00"
        }"#;
        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee, sample());
    }

    #[test]
    fn test_update_omits_absent_fields() {
        let update = EmployeeUpdate {
            full_name: "Nguyen Van A".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            gender: Gender::Male,
            phone_number: "0912345678".into(),
            active: Patch::Absent,
            password: Patch::Absent,
        };
        let value = serde_json::to_value(&update).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("password"));
        assert!(!obj.contains_key("active"));
        assert!(!obj.contains_key("email"));
        assert_eq!(obj["gender"], "MALE");
    }

    #[test]
    fn test_update_sends_present_fields() {
        let update = EmployeeUpdate {
            full_name: "Nguyen Van A".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            gender: Gender::Other,
            phone_number: "0912345678".into(),
            active: Patch::Present(false),
            password: Patch::Present("secret1".into()),
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["active"], false);
        assert_eq!(value["password"], "secret1");
        assert_eq!(value["dateOfBirth"], "1990-05-17");
    }

    #[test]
    fn test_draft_from_employee() {
        let draft = EmployeeDraft::from_employee(&sample());
        assert_eq!(draft.date_of_birth, "1990-05-17");
        assert_eq!(draft.gender, "FEMALE");
        assert_eq!(draft.active, Some(false));
        assert!(draft.email.is_empty());
        assert!(draft.password.is_empty());
    }

    #[test]
    fn test_gender_parse_is_case_sensitive() {
        assert_eq!("OTHER".parse::<Gender>(), Ok(Gender::Other));
        assert!("male".parse::<Gender>().is_err());
        assert_eq!(Gender::Female.display_name(), "Female");
    }

    #[test]
    fn test_format_date() {
        let d = NaiveDate::from_ymd_opt(2001, 2, 3).unwrap();
        assert_eq!(format_date(d), "03/02/2001");
    }
}

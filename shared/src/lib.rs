//! Shared types for the Roster employee client
//!
//! Data model, response envelope and input validation used by
//! `roster-client` and anything else talking to the employee API.

pub mod models;
pub mod response;
pub mod validation;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{Employee, EmployeeCreate, EmployeeDraft, EmployeeId, EmployeeUpdate, Gender, Patch};
pub use response::ApiResponse;
pub use validation::{
    Field, FieldError, FieldErrorKind, ValidatedEmployee, ValidationErrors, ValidationMode,
};

//! Roster Client - employee records client
//!
//! Validated, cache-synchronized CRUD access to the employee REST API.
//!
//! ```no_run
//! use roster_client::ClientConfig;
//! use shared::EmployeeDraft;
//!
//! # async fn example() -> Result<(), roster_client::ClientError> {
//! let store = ClientConfig::from_env().build_store()?;
//! let employees = store.fetch_all().await?;
//!
//! let mut draft = EmployeeDraft::from_employee(&employees[0]);
//! draft.phone_number = "0901234567".into();
//! store.update_one(employees[0].id, &draft).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod store;
pub mod view;

pub use api::{EmployeeApi, HttpEmployeeApi};
pub use cache::{CacheSlot, CacheSnapshot};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, TransportError, TransportErrorKind};
pub use http::{HttpClient, NetworkHttpClient};
pub use store::EmployeeStore;
pub use view::{DeleteConfirmation, ViewMode};

// Re-export shared types for convenience
pub use shared::{
    ApiResponse, Employee, EmployeeCreate, EmployeeDraft, EmployeeId, EmployeeUpdate, Gender,
    Patch, ValidationErrors,
};

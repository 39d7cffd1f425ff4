//! Page-level view state
//!
//! The employee page shows either the list or the form. The form runs in
//! create mode (blank draft) or edit mode (prefilled from the selected
//! employee). A successful submit or a cancel returns to the list.

use shared::{Employee, EmployeeDraft, EmployeeId, ValidationMode};

use crate::api::EmployeeApi;
use crate::error::ClientResult;
use crate::store::EmployeeStore;

/// What the page is currently showing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    List,
    Create,
    Edit(Employee),
}

impl ViewMode {
    /// "Add employee" pressed
    pub fn add(&mut self) {
        *self = ViewMode::Create;
    }

    /// "Edit" pressed on a list row
    pub fn edit(&mut self, employee: Employee) {
        *self = ViewMode::Edit(employee);
    }

    pub fn form_succeeded(&mut self) {
        *self = ViewMode::List;
    }

    pub fn form_cancelled(&mut self) {
        *self = ViewMode::List;
    }

    pub fn selected(&self) -> Option<&Employee> {
        match self {
            ViewMode::Edit(employee) => Some(employee),
            _ => None,
        }
    }

    pub fn is_form(&self) -> bool {
        !matches!(self, ViewMode::List)
    }

    /// Validation rules the form must use, if a form is shown
    pub fn validation_mode(&self) -> Option<ValidationMode> {
        match self {
            ViewMode::List => None,
            ViewMode::Create => Some(ValidationMode::Create),
            ViewMode::Edit(_) => Some(ValidationMode::Update),
        }
    }

    /// Initial form values
    pub fn initial_draft(&self) -> Option<EmployeeDraft> {
        match self {
            ViewMode::List => None,
            ViewMode::Create => Some(EmployeeDraft::blank()),
            ViewMode::Edit(employee) => Some(EmployeeDraft::from_employee(employee)),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewMode::List => "Employees",
            ViewMode::Create => "Create New Employee",
            ViewMode::Edit(_) => "Edit Employee",
        }
    }

    /// Submit the form shown in this view.
    ///
    /// Returns `Ok(None)` when no form is shown. On success the view goes
    /// back to the list; on error it stays put so the user can fix the
    /// input or retry.
    pub async fn submit<A: EmployeeApi + 'static>(
        &mut self,
        store: &EmployeeStore<A>,
        draft: &EmployeeDraft,
    ) -> ClientResult<Option<Employee>> {
        let employee = match self {
            ViewMode::List => return Ok(None),
            ViewMode::Create => store.create_one(draft).await?,
            ViewMode::Edit(selected) => store.update_one(selected.id, draft).await?,
        };
        self.form_succeeded();
        Ok(Some(employee))
    }
}

/// Two-step delete: arm a row, then confirm it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteConfirmation {
    pending: Option<EmployeeId>,
}

impl DeleteConfirmation {
    pub fn arm(&mut self, id: EmployeeId) {
        self.pending = Some(id);
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<EmployeeId> {
        self.pending
    }

    pub fn is_armed(&self, id: EmployeeId) -> bool {
        self.pending == Some(id)
    }

    /// Delete `id` if it is the armed row. The confirmation is cleared
    /// after a successful delete and kept on failure for a retry.
    pub async fn confirm<A: EmployeeApi + 'static>(
        &mut self,
        store: &EmployeeStore<A>,
        id: EmployeeId,
    ) -> ClientResult<bool> {
        if !self.is_armed(id) {
            return Ok(false);
        }
        store.delete_one(id).await?;
        self.pending = None;
        Ok(true)
    }
}

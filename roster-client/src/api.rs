//! Employee resource API
//!
//! One call per CRUD verb against `/employees`. The trait is the seam the
//! store is generic over, so the store can run against the network client
//! or an in-memory backend.

use async_trait::async_trait;
use shared::{Employee, EmployeeCreate, EmployeeId, EmployeeUpdate};

use crate::error::{ClientError, ClientResult};
use crate::http::{HttpClient, NetworkHttpClient};

const RESOURCE: &str = "employees";

/// Employee CRUD operations
#[async_trait]
pub trait EmployeeApi: Send + Sync {
    async fn list_all(&self) -> ClientResult<Vec<Employee>>;
    async fn get_by_id(&self, id: EmployeeId) -> ClientResult<Employee>;
    async fn create(&self, record: &EmployeeCreate) -> ClientResult<Employee>;
    async fn update(&self, id: EmployeeId, record: &EmployeeUpdate) -> ClientResult<Employee>;
    async fn delete(&self, id: EmployeeId) -> ClientResult<()>;
}

/// [`EmployeeApi`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpEmployeeApi<H = NetworkHttpClient> {
    http: H,
}

impl<H: HttpClient> HttpEmployeeApi<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &H {
        &self.http
    }
}

/// Fill in `fallback` when the backend gave no message
fn with_fallback(err: ClientError, fallback: &str) -> ClientError {
    match err {
        ClientError::Transport(e) => ClientError::Transport(e.or_detail(fallback)),
        other => other,
    }
}

fn require<T>(data: Option<T>, what: &str) -> ClientResult<T> {
    data.ok_or_else(|| ClientError::InvalidResponse(format!("Missing {what} data")))
}

#[async_trait]
impl<H: HttpClient> EmployeeApi for HttpEmployeeApi<H> {
    async fn list_all(&self) -> ClientResult<Vec<Employee>> {
        let data = self
            .http
            .get::<Vec<Employee>>(RESOURCE)
            .await
            .map_err(|e| with_fallback(e, "Failed to load employees"))?;
        require(data, "employee list")
    }

    async fn get_by_id(&self, id: EmployeeId) -> ClientResult<Employee> {
        let data = self
            .http
            .get::<Employee>(&format!("{RESOURCE}/{id}"))
            .await
            .map_err(|e| match with_fallback(e, "Failed to load employee") {
                ClientError::Transport(t) if t.is_not_found() => ClientError::NotFound {
                    id,
                    detail: t.detail,
                },
                other => other,
            })?;
        require(data, "employee")
    }

    async fn create(&self, record: &EmployeeCreate) -> ClientResult<Employee> {
        let data = self
            .http
            .post::<Employee, _>(RESOURCE, record)
            .await
            .map_err(|e| with_fallback(e, "Failed to create employee"))?;
        require(data, "created employee")
    }

    async fn update(&self, id: EmployeeId, record: &EmployeeUpdate) -> ClientResult<Employee> {
        let data = self
            .http
            .put::<Employee, _>(&format!("{RESOURCE}/{id}"), record)
            .await
            .map_err(|e| with_fallback(e, "Failed to update employee"))?;
        require(data, "updated employee")
    }

    async fn delete(&self, id: EmployeeId) -> ClientResult<()> {
        self.http
            .delete::<serde_json::Value>(&format!("{RESOURCE}/{id}"))
            .await
            .map_err(|e| with_fallback(e, "Failed to delete employee"))?;
        Ok(())
    }
}

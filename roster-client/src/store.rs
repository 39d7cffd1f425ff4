//! Synchronized employee store
//!
//! Keeps a local view of the employee collection and of individual
//! employees consistent with the backend:
//!
//! - reads are served from cache while fresh, otherwise refetched
//! - a failed refetch keeps the last good data and reports the error
//! - mutations are validated locally first and touch the cache only after
//!   the backend confirmed them
//!
//! Mutations run on a spawned task. Dropping the returned future stops
//! waiting for the result but does not cancel the request or its cache
//! effects.
//!
//! Concurrent mutations of the same id are not serialized; whichever
//! response completes last owns the detail slot.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use shared::validation::{validate_create, validate_update};
use shared::{Employee, EmployeeDraft, EmployeeId};
use tokio::time::{Duration, Instant};

use crate::api::EmployeeApi;
use crate::cache::CacheSnapshot;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

struct Inner<A> {
    api: A,
    freshness: Duration,
    cache: Mutex<CacheSnapshot>,
}

impl<A> Inner<A> {
    fn cache(&self) -> MutexGuard<'_, CacheSnapshot> {
        // Critical sections never panic midway, so a poisoned lock still
        // guards a consistent snapshot.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Employee store over an [`EmployeeApi`]. Cloning shares the cache.
pub struct EmployeeStore<A> {
    inner: Arc<Inner<A>>,
}

impl<A> Clone for EmployeeStore<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: EmployeeApi + 'static> EmployeeStore<A> {
    pub fn new(api: A, config: &ClientConfig) -> Self {
        Self::with_freshness(api, config.freshness)
    }

    pub fn with_freshness(api: A, freshness: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                freshness,
                cache: Mutex::new(CacheSnapshot::default()),
            }),
        }
    }

    pub fn api(&self) -> &A {
        &self.inner.api
    }

    pub fn freshness(&self) -> Duration {
        self.inner.freshness
    }

    // ========== Reads ==========

    /// All employees, from cache while fresh
    pub async fn fetch_all(&self) -> ClientResult<Vec<Employee>> {
        let cached = self
            .inner
            .cache()
            .collection
            .fresh_value(Instant::now(), self.inner.freshness)
            .cloned();
        if let Some(employees) = cached {
            tracing::debug!(count = employees.len(), "Serving employees from cache");
            return Ok(employees);
        }
        self.refresh_all().await
    }

    /// All employees, always from the backend (manual retry / refetch)
    pub async fn refresh_all(&self) -> ClientResult<Vec<Employee>> {
        let epoch = self.inner.cache().collection_epoch;
        let result = self.inner.api.list_all().await;

        let mut cache = self.inner.cache();
        match result {
            Ok(employees) => {
                let now = Instant::now();
                if cache.collection_epoch == epoch {
                    cache.collection.store(employees.clone(), now);
                } else {
                    // A mutation landed while this list was in flight
                    cache.collection.store_stale(employees.clone(), now);
                }
                tracing::debug!(count = employees.len(), "Employee list refreshed");
                Ok(employees)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load employees");
                cache.collection.record_error(e.user_message());
                Err(e)
            }
        }
    }

    /// One employee, from cache while fresh.
    ///
    /// Returns `Ok(None)` without any request when `id` is not a valid
    /// backend id (`<= 0`).
    pub async fn fetch_one(&self, id: EmployeeId) -> ClientResult<Option<Employee>> {
        if id <= 0 {
            return Ok(None);
        }

        let cached = self
            .inner
            .cache()
            .details
            .get(&id)
            .and_then(|slot| slot.fresh_value(Instant::now(), self.inner.freshness))
            .cloned();
        if let Some(employee) = cached {
            tracing::debug!(id, "Serving employee from cache");
            return Ok(Some(employee));
        }

        let epoch = self.inner.cache().detail_epoch(id);
        let result = self.inner.api.get_by_id(id).await;

        let mut cache = self.inner.cache();
        if cache.detail_epoch(id) != epoch {
            // An update or delete of this id landed while the read was in
            // flight; its outcome owns the slot.
            tracing::debug!(id, "Discarding employee read superseded by a mutation");
            return result.map(Some);
        }
        match result {
            Ok(employee) => {
                cache
                    .details
                    .entry(id)
                    .or_default()
                    .store(employee.clone(), Instant::now());
                Ok(Some(employee))
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Failed to load employee");
                if matches!(e, ClientError::NotFound { .. }) {
                    cache.details.remove(&id);
                } else if let Some(slot) = cache.details.get_mut(&id) {
                    slot.record_error(e.user_message());
                }
                Err(e)
            }
        }
    }

    /// Last good employee list, without any request
    pub fn cached_all(&self) -> Option<Vec<Employee>> {
        self.inner.cache().collection.last_good().cloned()
    }

    /// Last good copy of one employee, without any request
    pub fn cached_one(&self, id: EmployeeId) -> Option<Employee> {
        self.inner
            .cache()
            .details
            .get(&id)
            .and_then(|slot| slot.last_good())
            .cloned()
    }

    /// Copy of the entire cache state
    pub fn snapshot(&self) -> CacheSnapshot {
        self.inner.cache().clone()
    }

    // ========== Mutations ==========

    /// Validate and create an employee.
    ///
    /// On success the collection is invalidated; the next
    /// [`fetch_all`](Self::fetch_all) goes to the backend.
    pub async fn create_one(&self, draft: &EmployeeDraft) -> ClientResult<Employee> {
        let record = validate_create(draft, Utc::now())?;

        self.run_detached(move |inner| async move {
            let employee = inner.api.create(&record).await.map_err(|e| {
                tracing::warn!(error = %e, "Failed to create employee");
                e
            })?;

            inner.cache().invalidate_collection();
            tracing::info!(id = employee.id, "Employee created successfully");
            Ok(employee)
        })
        .await
    }

    /// Validate and update an employee.
    ///
    /// An empty password is not sent. On success the collection is
    /// invalidated and the returned record replaces the detail slot.
    pub async fn update_one(&self, id: EmployeeId, draft: &EmployeeDraft) -> ClientResult<Employee> {
        let record = validate_update(draft, Utc::now())?;

        self.run_detached(move |inner| async move {
            let employee = inner.api.update(id, &record).await.map_err(|e| {
                tracing::warn!(id, error = %e, "Failed to update employee");
                e
            })?;

            {
                let mut cache = inner.cache();
                cache.invalidate_collection();
                cache.bump_detail(id);
                cache
                    .details
                    .entry(employee.id)
                    .or_default()
                    .store(employee.clone(), Instant::now());
            }
            tracing::info!(id = employee.id, "Employee updated successfully");
            Ok(employee)
        })
        .await
    }

    /// Delete an employee. The request is sent whether or not `id` is cached.
    pub async fn delete_one(&self, id: EmployeeId) -> ClientResult<()> {
        self.run_detached(move |inner| async move {
            inner.api.delete(id).await.map_err(|e| {
                tracing::warn!(id, error = %e, "Failed to delete employee");
                e
            })?;

            {
                let mut cache = inner.cache();
                cache.invalidate_collection();
                cache.bump_detail(id);
                cache.details.remove(&id);
            }
            tracing::info!(id, "Employee deleted successfully");
            Ok(())
        })
        .await
    }

    /// Run `op` on its own task so that it completes even if the caller
    /// stops polling.
    async fn run_detached<T, F, Fut>(&self, op: F) -> ClientResult<T>
    where
        F: FnOnce(Arc<Inner<A>>) -> Fut,
        Fut: Future<Output = ClientResult<T>> + Send + 'static,
        T: Send + 'static,
    {
        let handle = tokio::spawn(op(Arc::clone(&self.inner)));
        handle
            .await
            .map_err(|e| ClientError::Internal(format!("mutation task failed: {e}")))?
    }
}

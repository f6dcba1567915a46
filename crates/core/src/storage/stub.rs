//! In-memory [`ObjectStore`] for tests.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use super::error::StorageError;
use super::store::{ListObjectsPage, ListObjectsRequest, ObjectHead, ObjectStore, page_sorted_keys};

/// Failure a [`StubStore`] call should produce instead of answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubFailure {
    /// Backend reports the key does not exist.
    NotFound,
    /// Backend answers with a non-success status (e.g. 403).
    Rejected,
    /// Backend unreachable or failing unexpectedly.
    Unavailable,
}

impl StubFailure {
    fn into_error(self, key: &str) -> StorageError {
        match self {
            Self::NotFound => StorageError::not_found(key),
            Self::Rejected => StorageError::rejected("status 403"),
            Self::Unavailable => StorageError::operation("connection reset"),
        }
    }
}

/// Scriptable object store holding objects in a sorted map.
///
/// Records every list request so tests can check prefix and token forwarding.
#[derive(Debug, Default)]
pub struct StubStore {
    objects: BTreeMap<String, Vec<u8>>,
    head_failure: Option<StubFailure>,
    get_failure: Option<StubFailure>,
    list_failure: Option<StubFailure>,
    list_page: Option<ListObjectsPage>,
    list_requests: Mutex<Vec<ListObjectsRequest>>,
}

impl StubStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object.
    #[must_use]
    pub fn with_object(mut self, key: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.objects.insert(key.into(), contents.into());
        self
    }

    /// Make every head call fail.
    #[must_use]
    pub fn failing_head(mut self, failure: StubFailure) -> Self {
        self.head_failure = Some(failure);
        self
    }

    /// Make every get call fail.
    #[must_use]
    pub fn failing_get(mut self, failure: StubFailure) -> Self {
        self.get_failure = Some(failure);
        self
    }

    /// Make every list call fail.
    #[must_use]
    pub fn failing_list(mut self, failure: StubFailure) -> Self {
        self.list_failure = Some(failure);
        self
    }

    /// Answer every list call with this page instead of paging the objects.
    #[must_use]
    pub fn with_list_page(mut self, page: ListObjectsPage) -> Self {
        self.list_page = Some(page);
        self
    }

    /// List requests received so far.
    pub fn list_requests(&self) -> Vec<ListObjectsRequest> {
        self.list_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ObjectStore for StubStore {
    async fn head_object(&self, key: &str) -> Result<ObjectHead, StorageError> {
        if let Some(failure) = self.head_failure {
            return Err(failure.into_error(key));
        }

        let contents = self
            .objects
            .get(key)
            .ok_or_else(|| StorageError::not_found(key))?;

        Ok(ObjectHead {
            key: key.to_string(),
            content_length: contents.len() as u64,
            content_type: None,
        })
    }

    async fn get_object(&self, key: &str, dest: &Path) -> Result<u64, StorageError> {
        if let Some(failure) = self.get_failure {
            return Err(failure.into_error(key));
        }

        let contents = self
            .objects
            .get(key)
            .ok_or_else(|| StorageError::not_found(key))?;
        tokio::fs::write(dest, contents).await?;

        Ok(contents.len() as u64)
    }

    async fn list_objects(
        &self,
        request: ListObjectsRequest,
    ) -> Result<ListObjectsPage, StorageError> {
        self.list_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        if let Some(failure) = self.list_failure {
            return Err(failure.into_error(&request.prefix));
        }
        if let Some(page) = &self.list_page {
            return Ok(page.clone());
        }

        let keys: Vec<String> = self
            .objects
            .keys()
            .filter(|k| k.starts_with(&request.prefix))
            .cloned()
            .collect();

        Ok(page_sorted_keys(
            &keys,
            request.continuation_token.as_deref(),
            request.max_keys,
        ))
    }
}

//! Resource service: metadata, download and folder listing.

use std::sync::Arc;

use bucketfront_shared::{AppError, AppResult, ListingSettings};
use tracing::{error, info};

use super::download::{DownloadedFile, ScratchDir, sanitize_filename};
use super::mapper::{KEY_SEPARATOR, key_to_resource};
use super::types::{ListResult, Resource};
use crate::storage::{ListObjectsRequest, ObjectStore, StorageError};

/// Resource operations over one bucket.
pub struct ResourceService<S: ObjectStore> {
    store: Arc<S>,
    listing: ListingSettings,
}

impl<S: ObjectStore> ResourceService<S> {
    /// Create a new resource service.
    #[must_use]
    pub fn new(store: Arc<S>, listing: ListingSettings) -> Self {
        Self { store, listing }
    }

    /// The underlying object store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch a resource by key.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `NotFound` if the key does not exist
    /// - `Internal` if the backend refuses or fails the request
    pub async fn get_resource(&self, id: &str) -> AppResult<Resource> {
        info!(key = %id, "Fetching resource");

        match self.store.head_object(id).await {
            Ok(head) => {
                info!(key = %id, size = head.content_length, "Retrieved resource");
                Ok(key_to_resource(id))
            }
            Err(StorageError::NotFound { .. }) => {
                error!(key = %id, "Object key not found");
                Err(AppError::not_found("Resource not found in bucket."))
            }
            Err(StorageError::Rejected(reason)) => {
                error!(key = %id, reason = %reason, "Storage backend did not respond with success");
                Err(AppError::internal(
                    "Storage backend did not respond with a success status. See logs for more details.",
                ))
            }
            Err(e) => {
                error!(key = %id, error = %e, "Failed to fetch resource");
                Err(AppError::internal(
                    "An error occurred while fetching the resource.",
                ))
            }
        }
    }

    /// Download a resource into a fresh scratch directory.
    ///
    /// Every call gets its own directory, so concurrent downloads never see
    /// each other's files. The directory is removed when the returned
    /// [`DownloadedFile`] is dropped.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `NotFound` if the key does not exist
    /// - `IoFailure` if the local file cannot be created or written
    /// - `Internal` for any other backend failure
    pub async fn get_file(&self, resource: &Resource) -> AppResult<DownloadedFile> {
        info!(key = %resource.id(), "Fetching object for download");

        let scratch = ScratchDir::create(&self.listing.scratch_dir)
            .await
            .map_err(|e| {
                error!(key = %resource.id(), error = %e, "Failed to create scratch directory");
                AppError::io_failure("Error creating file. Please check the logs.")
            })?;
        let path = scratch.path().join(sanitize_filename(resource.name()));

        match self.store.get_object(resource.id(), &path).await {
            Ok(size) => {
                info!(key = %resource.id(), size, path = %path.display(), "Wrote object to file");
                Ok(DownloadedFile::new(scratch, path, size))
            }
            Err(StorageError::NotFound { .. }) => {
                error!(key = %resource.id(), "The specified key does not exist");
                Err(AppError::not_found("The specified key does not exist."))
            }
            Err(StorageError::Io(e)) => {
                error!(key = %resource.id(), error = %e, "Error writing file");
                Err(AppError::io_failure(
                    "Error creating file. Please check the logs.",
                ))
            }
            Err(e) => {
                error!(key = %resource.id(), error = %e, "Failed to download object");
                Err(AppError::internal(
                    "Something went wrong. Please check the logs.",
                ))
            }
        }
    }

    /// List one page of a folder.
    ///
    /// With a resource, lists under `resource.id + "/"`; without one, lists
    /// from the bucket root and relies on the cursor. An empty cursor starts
    /// from the first page.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `InvalidArgument` if neither resource nor cursor is given
    /// - `Internal` for any backend failure
    pub async fn list_folder(
        &self,
        resource: Option<&Resource>,
        cursor: Option<&str>,
    ) -> AppResult<ListResult<Resource>> {
        info!(
            key = resource.map(Resource::id),
            cursor = cursor,
            "Listing folder contents"
        );

        if resource.is_none() && cursor.is_none() {
            error!("Neither resource nor cursor present");
            return Err(AppError::invalid_argument(
                "At least the cursor must be present when no resource is present.",
            ));
        }

        let prefix = resource.map_or_else(String::new, |r| format!("{}{KEY_SEPARATOR}", r.id()));
        let request = ListObjectsRequest {
            prefix,
            max_keys: self.listing.page_size,
            continuation_token: cursor.filter(|c| !c.is_empty()).map(String::from),
        };

        let page = self.store.list_objects(request).await.map_err(|e| {
            error!(key = resource.map(Resource::id), error = %e, "Failed to list folder");
            AppError::internal("Something went wrong. Please check the logs.")
        })?;

        let resources: Vec<Resource> = page.keys.iter().map(|k| key_to_resource(k)).collect();
        info!(
            key = resource.map(Resource::id),
            count = resources.len(),
            has_more = page.next_continuation_token.is_some(),
            "Listed folder contents"
        );

        Ok(ListResult::new(resources, page.next_continuation_token))
    }
}

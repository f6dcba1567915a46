//! Object store implementation using Apache OpenDAL.

use std::path::Path;

use futures::{Stream, TryStreamExt, future};
use opendal::{Lister, Operator, services};
use tokio::io::AsyncWriteExt;

use super::config::StorageProvider;
use super::error::StorageError;
use super::store::{
    ListObjectsPage, ListObjectsRequest, ObjectHead, ObjectStore, is_addressable,
    page_ordered_keys, page_sorted_keys,
};

/// OpenDAL-backed [`ObjectStore`] bound to a single bucket.
pub struct OpendalStore {
    operator: Operator,
    provider_name: &'static str,
    bucket: String,
    ordered_listing: bool,
}

impl OpendalStore {
    /// Create a new store from provider configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_provider(provider: &StorageProvider) -> Result<Self, StorageError> {
        let operator = Self::create_operator(provider)?;
        Ok(Self {
            operator,
            provider_name: provider.name(),
            bucket: provider.bucket().to_string(),
            ordered_listing: provider.lists_in_key_order(),
        })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let mut builder = services::S3::default()
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);
                if let Some(endpoint) = endpoint {
                    builder = builder.endpoint(endpoint);
                }

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider_name
    }

    /// Get the bucket name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Backend resumes after the token and yields keys in order.
    async fn list_ordered(
        &self,
        request: &ListObjectsRequest,
    ) -> Result<ListObjectsPage, StorageError> {
        let mut future = self
            .operator
            .lister_with(&request.prefix)
            .recursive(true);
        if let Some(token) = request.continuation_token.as_deref() {
            future = future.start_after(token);
        }
        let lister = future
            .await
            .map_err(|e| StorageError::from_opendal(&e, &request.prefix))?;

        page_ordered_keys(
            listed_keys(lister, &request.prefix),
            request.continuation_token.as_deref(),
            request.max_keys,
        )
        .await
    }

    /// Backend order is arbitrary (local filesystem): read the whole prefix,
    /// sort, and page in memory.
    async fn list_unordered(
        &self,
        request: &ListObjectsRequest,
    ) -> Result<ListObjectsPage, StorageError> {
        let lister = self
            .operator
            .lister_with(&request.prefix)
            .recursive(true)
            .await
            .map_err(|e| StorageError::from_opendal(&e, &request.prefix))?;

        let mut keys: Vec<String> = listed_keys(lister, &request.prefix).try_collect().await?;
        keys.sort_unstable();

        Ok(page_sorted_keys(
            &keys,
            request.continuation_token.as_deref(),
            request.max_keys,
        ))
    }
}

/// Keys under `prefix`, skipping the listed prefix itself.
fn listed_keys(
    lister: Lister,
    prefix: &str,
) -> impl Stream<Item = Result<String, StorageError>> + '_ {
    lister
        .map_err(move |e| StorageError::from_opendal(&e, prefix))
        .try_filter_map(move |entry| {
            let path = entry.path();
            let key = (path != prefix && path != "/" && path.starts_with(prefix))
                .then(|| path.to_string());
            future::ready(Ok(key))
        })
}

impl ObjectStore for OpendalStore {
    async fn head_object(&self, key: &str) -> Result<ObjectHead, StorageError> {
        if !is_addressable(key) {
            return Err(StorageError::not_found(key));
        }
        let meta = self
            .operator
            .stat(key)
            .await
            .map_err(|e| StorageError::from_opendal(&e, key))?;

        Ok(ObjectHead {
            key: key.to_string(),
            content_length: meta.content_length(),
            content_type: meta.content_type().map(String::from),
        })
    }

    async fn get_object(&self, key: &str, dest: &Path) -> Result<u64, StorageError> {
        if !is_addressable(key) {
            return Err(StorageError::not_found(key));
        }
        let reader = self
            .operator
            .reader(key)
            .await
            .map_err(|e| StorageError::from_opendal(&e, key))?;
        let mut stream = reader
            .into_bytes_stream(..)
            .await
            .map_err(|e| StorageError::from_opendal(&e, key))?;

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;
        while let Some(chunk) = stream
            .try_next()
            .await
            .map_err(|e| StorageError::from_stream(&e, key))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }

    async fn list_objects(
        &self,
        request: ListObjectsRequest,
    ) -> Result<ListObjectsPage, StorageError> {
        // Nothing can be stored under a prefix the backend would rewrite.
        if !is_addressable(&request.prefix) {
            return Ok(ListObjectsPage::default());
        }
        if self.ordered_listing {
            self.list_ordered(&request).await
        } else {
            self.list_unordered(&request).await
        }
    }
}

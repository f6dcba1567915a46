//! Object store capability used by the resource service.

use std::future::Future;
use std::path::Path;
use std::pin::pin;

use futures::{Stream, TryStreamExt};

use super::error::StorageError;

/// Upper bound on keys reserved up front for a page.
const MAX_PREALLOCATED_KEYS: usize = 1000;

/// Metadata returned by a head-object call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectHead {
    /// Object key.
    pub key: String,
    /// Object size in bytes.
    pub content_length: u64,
    /// Content type, if the backend recorded one.
    pub content_type: Option<String>,
}

/// One page request against a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListObjectsRequest {
    /// Key prefix to list under; empty lists the whole bucket.
    pub prefix: String,
    /// Maximum number of keys in the page.
    pub max_keys: usize,
    /// Token from the previous page, if resuming.
    pub continuation_token: Option<String>,
}

/// One page of keys in backend order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListObjectsPage {
    /// Keys in the page.
    pub keys: Vec<String>,
    /// Token for the next page; `None` when the listing is exhausted.
    pub next_continuation_token: Option<String>,
}

/// Read-only access to one bucket.
///
/// Each method issues exactly one logical backend operation. No retries.
pub trait ObjectStore: Send + Sync {
    /// Fetch an object's metadata.
    fn head_object(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<ObjectHead, StorageError>> + Send;

    /// Stream an object's bytes into a new file at `dest`.
    ///
    /// Returns the number of bytes written.
    fn get_object(
        &self,
        key: &str,
        dest: &Path,
    ) -> impl Future<Output = Result<u64, StorageError>> + Send;

    /// Fetch one page of keys.
    fn list_objects(
        &self,
        request: ListObjectsRequest,
    ) -> impl Future<Output = Result<ListObjectsPage, StorageError>> + Send;
}

/// Whether the backend can address `key` without rewriting it.
///
/// Path-normalizing backends strip a leading `/` and collapse empty segments,
/// so such keys would silently resolve to a different object.
pub(crate) fn is_addressable(key: &str) -> bool {
    !key.starts_with('/') && !key.contains("//")
}

/// Take one page from a key stream that is already in lexicographic order.
///
/// Keys at or before `token` are skipped. One key past the page is read to
/// decide whether a next page exists; if so, its token is the last key here.
pub(crate) async fn page_ordered_keys<St>(
    keys: St,
    token: Option<&str>,
    max_keys: usize,
) -> Result<ListObjectsPage, StorageError>
where
    St: Stream<Item = Result<String, StorageError>>,
{
    let mut keys = pin!(keys);
    let mut page = Vec::with_capacity(max_keys.min(MAX_PREALLOCATED_KEYS));
    let mut has_more = false;
    while let Some(key) = keys.try_next().await? {
        if token.is_some_and(|t| key.as_str() <= t) {
            continue;
        }
        if page.len() == max_keys {
            has_more = true;
            break;
        }
        page.push(key);
    }

    let next_continuation_token = if has_more { page.last().cloned() } else { None };
    Ok(ListObjectsPage {
        keys: page,
        next_continuation_token,
    })
}

/// Page through keys already in lexicographic order, resuming strictly after
/// `token`. The token for the next page is the last key of this one.
pub(crate) fn page_sorted_keys(
    sorted: &[String],
    token: Option<&str>,
    max_keys: usize,
) -> ListObjectsPage {
    let start = token.map_or(0, |t| sorted.partition_point(|k| k.as_str() <= t));
    let rest = &sorted[start..];
    let keys: Vec<String> = rest.iter().take(max_keys).cloned().collect();
    let next_continuation_token = if rest.len() > keys.len() {
        keys.last().cloned()
    } else {
        None
    };

    ListObjectsPage {
        keys,
        next_continuation_token,
    }
}

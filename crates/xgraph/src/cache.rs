//! Username to user-id memoization.

use std::future::Future;

use dashmap::DashMap;
use tracing::debug;

use crate::error::XGraphResult;

/// Memo of username → user id, owned by whoever constructs the client.
///
/// Entries are created on the first successful lookup and never evicted.
/// Keys are used exactly as given; `Jack` and `jack` are separate entries.
/// Share between clients with an `Arc`.
#[derive(Debug, Default)]
pub struct IdentityCache {
    ids: DashMap<String, String>,
}

impl IdentityCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached id for `username`, if any.
    #[must_use]
    pub fn get(&self, username: &str) -> Option<String> {
        self.ids.get(username).map(|entry| entry.value().clone())
    }

    /// Record an id. Overwrites with the same value are harmless.
    pub fn insert(&self, username: impl Into<String>, user_id: impl Into<String>) {
        self.ids.insert(username.into(), user_id.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Return the cached id or run `lookup` and remember its answer.
    ///
    /// Failed lookups leave the cache untouched. Two concurrent misses for
    /// the same username may both run `lookup`; both then store the same id.
    pub async fn resolve<F, Fut>(&self, username: &str, lookup: F) -> XGraphResult<String>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = XGraphResult<String>>,
    {
        // The map guard must be released before awaiting.
        if let Some(user_id) = self.get(username) {
            debug!(%username, %user_id, "identity cache hit");
            return Ok(user_id);
        }

        debug!(%username, "identity cache miss");
        let user_id = lookup(username.to_string()).await?;
        self.insert(username, user_id.clone());
        Ok(user_id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::XGraphError;

    #[tokio::test]
    async fn second_resolve_is_a_hit() {
        let cache = IdentityCache::new();
        let calls = AtomicUsize::new(0);
        let lookup = |name: String| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<_, XGraphError>(format!("id-{name}")) }
        };

        assert_eq!(cache.resolve("jack", lookup).await.unwrap(), "id-jack");
        assert_eq!(cache.resolve("jack", lookup).await.unwrap(), "id-jack");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get("jack").as_deref(), Some("id-jack"));
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cache = IdentityCache::new();
        let err = cache
            .resolve("ghost", |name| async move {
                Err(XGraphError::NotFound { identifier: name })
            })
            .await
            .unwrap_err();
        assert!(matches!(err, XGraphError::NotFound { .. }));
        assert!(cache.is_empty());

        let id = cache
            .resolve("ghost", |_| async { Ok::<_, XGraphError>("7".to_string()) })
            .await
            .unwrap();
        assert_eq!(id, "7");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn keys_are_case_sensitive() {
        let cache = IdentityCache::new();
        cache.insert("Jack", "12");
        assert_eq!(cache.get("Jack").as_deref(), Some("12"));
        assert_eq!(cache.get("jack"), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_resolves_agree() {
        let cache = Arc::new(IdentityCache::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                let name = format!("user{}", i % 4);
                cache
                    .resolve(&name, |name| async move { Ok::<_, XGraphError>(format!("id-{name}")) })
                    .await
            }));
        }
        for handle in handles {
            let id = handle.await.unwrap().unwrap();
            assert!(id.starts_with("id-user"));
        }
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.get("user3").as_deref(), Some("id-user3"));
    }
}

//! Stitching relationship pages together.

use std::collections::HashSet;
use std::future::Future;

use tracing::debug;

use crate::error::XGraphResult;
use crate::listing::{Cursor, Listing, RelationshipPage};
use crate::profile::Profile;

/// Upper bound on the number of profiles a walk collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimit {
    /// Maximum number of profiles to return.
    pub max_items: usize,
}

impl PageLimit {
    /// Create a new limit.
    #[must_use]
    pub const fn new(max_items: usize) -> Self {
        Self { max_items }
    }
}

/// Fetch pages of listing `L` until the cursor runs out, repeats, or `limit`
/// profiles have been collected.
///
/// The first page is fetched without a cursor; a zero limit fetches nothing.
/// Errors from any page abort the walk and discard what was collected so far.
pub async fn walk_pages<L, F, Fut>(
    limit: Option<PageLimit>,
    mut fetch_page: F,
) -> XGraphResult<Vec<Profile>>
where
    L: Listing,
    F: FnMut(Option<Cursor<L>>) -> Fut,
    Fut: Future<Output = XGraphResult<RelationshipPage<L>>>,
{
    if limit.is_some_and(|limit| limit.max_items == 0) {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    let mut seen = HashSet::new();
    let mut cursor = None;

    loop {
        let page = fetch_page(cursor.take()).await?;
        match limit {
            Some(limit) => {
                let remaining = limit.max_items.saturating_sub(out.len());
                out.extend(page.profiles.into_iter().take(remaining));
                if out.len() >= limit.max_items {
                    debug!(collected = out.len(), "page limit reached");
                    break;
                }
            }
            None => out.extend(page.profiles),
        }

        let Some(next) = page.next_cursor else {
            break;
        };
        if !seen.insert(next.as_str().to_string()) {
            debug!(cursor = %next, "cursor repeated, stopping");
            break;
        }
        cursor = Some(next);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::XGraphError;
    use crate::listing::Followers;

    fn profile(id: usize) -> Profile {
        Profile {
            user_id: id.to_string(),
            username: format!("user{id}"),
            ..Profile::default()
        }
    }

    fn page(ids: std::ops::Range<usize>, next: &str) -> RelationshipPage<Followers> {
        RelationshipPage {
            profiles: ids.map(profile).collect(),
            next_cursor: Cursor::new(next),
        }
    }

    #[tokio::test]
    async fn follows_cursors_until_absent() {
        let requested = Mutex::new(Vec::new());
        let profiles = walk_pages::<Followers, _, _>(None, |cursor| {
            let token = cursor.map(Cursor::into_inner);
            requested.lock().unwrap().push(token.clone());
            async move {
                Ok(match token.as_deref() {
                    None => page(0..2, "A"),
                    Some("A") => page(2..4, "B"),
                    _ => page(4..5, ""),
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(profiles.len(), 5);
        assert_eq!(profiles[4].user_id, "4");
        assert_eq!(
            *requested.lock().unwrap(),
            vec![None, Some("A".to_string()), Some("B".to_string())]
        );
    }

    #[tokio::test]
    async fn stops_on_repeated_cursor() {
        let calls = Mutex::new(0);
        let profiles = walk_pages::<Followers, _, _>(None, |_| {
            *calls.lock().unwrap() += 1;
            async { Ok(page(0..1, "SAME")) }
        })
        .await
        .unwrap();

        assert_eq!(*calls.lock().unwrap(), 2);
        assert_eq!(profiles.len(), 2);
    }

    #[tokio::test]
    async fn truncates_at_limit() {
        let profiles = walk_pages::<Followers, _, _>(Some(PageLimit::new(3)), |cursor| {
            let start = if cursor.is_some() { 2 } else { 0 };
            async move { Ok(page(start..start + 2, "NEXT")) }
        })
        .await
        .unwrap();

        let ids: Vec<_> = profiles.iter().map(|p| p.user_id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1", "2"]);
    }

    #[tokio::test]
    async fn zero_limit_fetches_nothing() {
        let calls = Mutex::new(0);
        let profiles = walk_pages::<Followers, _, _>(Some(PageLimit::new(0)), |_| {
            *calls.lock().unwrap() += 1;
            async { Ok(page(0..2, "NEXT")) }
        })
        .await
        .unwrap();

        assert!(profiles.is_empty());
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn page_errors_abort_the_walk() {
        let err = walk_pages::<Followers, _, _>(None, |cursor| async move {
            match cursor {
                None => Ok(page(0..1, "A")),
                Some(_) => Err(XGraphError::Upstream {
                    message: "rate limit exceeded".into(),
                }),
            }
        })
        .await
        .unwrap_err();
        assert!(matches!(err, XGraphError::Upstream { .. }));
    }
}

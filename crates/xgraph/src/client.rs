//! The public client.

use std::sync::Arc;

use tracing::{debug, instrument};
use xgraph_http::{HttpTransport, Method, Transport};

use crate::cache::IdentityCache;
use crate::config::ClientConfig;
use crate::error::XGraphResult;
use crate::listing::{Cursor, Followers, Following, Listing, RelationshipPage};
use crate::normalize::{ProfileShape, normalize_profile};
use crate::pager::{PageLimit, walk_pages};
use crate::profile::Profile;
use crate::query::GraphqlQuery;
use crate::timeline::parse_timeline;

/// Read-only client for profile and relationship lookups.
///
/// Every operation performs one request through the transport, except
/// [`resolve_user_id`](Self::resolve_user_id) on a cache hit (none) and the
/// `collect_*` walkers (one per page).
#[derive(Debug, Clone)]
pub struct XGraphClient<T = HttpTransport> {
    transport: T,
    api_url: String,
    identity_cache: Arc<IdentityCache>,
}

impl XGraphClient<HttpTransport> {
    /// Build a client over a reqwest transport.
    pub fn from_config(config: &ClientConfig) -> XGraphResult<Self> {
        let transport = HttpTransport::new(&config.transport)?;
        Ok(Self::new(transport, config.api_url.as_str()))
    }
}

impl<T: Transport> XGraphClient<T> {
    /// Create a client with its own empty identity cache.
    pub fn new(transport: T, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            api_url,
            identity_cache: Arc::new(IdentityCache::new()),
        }
    }

    /// Use a cache shared with other clients.
    #[must_use]
    pub fn with_identity_cache(mut self, cache: Arc<IdentityCache>) -> Self {
        self.identity_cache = cache;
        self
    }

    pub const fn identity_cache(&self) -> &Arc<IdentityCache> {
        &self.identity_cache
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn execute(&self, query: &GraphqlQuery) -> XGraphResult<Vec<u8>> {
        let url = query.url(&self.api_url);
        debug!(operation = query.operation_name(), %url, "sending query");
        let body = self
            .transport
            .perform_request(Method::GET, &url, &query.query_pairs())
            .await?;
        Ok(body)
    }

    /// Look up a profile by screen name.
    #[instrument(skip(self))]
    pub async fn get_profile_by_username(&self, username: &str) -> XGraphResult<Profile> {
        let query = GraphqlQuery::profile_by_screen_name(username);
        let body = self.execute(&query).await?;
        normalize_profile(ProfileShape::Legacy, &body, username)
    }

    /// Look up a profile by numeric user id.
    #[instrument(skip(self))]
    pub async fn get_profile_by_user_id(&self, user_id: &str) -> XGraphResult<Profile> {
        let query = GraphqlQuery::profile_by_user_id(user_id);
        let body = self.execute(&query).await?;
        normalize_profile(ProfileShape::Result, &body, user_id)
    }

    /// One page of accounts following `user_id`.
    pub async fn get_followers(
        &self,
        user_id: &str,
        page_size: usize,
        cursor: Option<&Cursor<Followers>>,
    ) -> XGraphResult<RelationshipPage<Followers>> {
        self.relationship_page(user_id, page_size, cursor).await
    }

    /// One page of accounts `user_id` follows.
    pub async fn get_following(
        &self,
        user_id: &str,
        page_size: usize,
        cursor: Option<&Cursor<Following>>,
    ) -> XGraphResult<RelationshipPage<Following>> {
        self.relationship_page(user_id, page_size, cursor).await
    }

    #[instrument(skip(self, cursor), fields(listing = L::OPERATION_NAME, has_cursor = cursor.is_some()))]
    async fn relationship_page<L: Listing>(
        &self,
        user_id: &str,
        page_size: usize,
        cursor: Option<&Cursor<L>>,
    ) -> XGraphResult<RelationshipPage<L>> {
        let query = GraphqlQuery::relationship_page(user_id, page_size, cursor);
        let body = self.execute(&query).await?;
        let page = parse_timeline(&body, user_id)?;
        Ok(RelationshipPage {
            profiles: page.profiles,
            next_cursor: page.next_cursor.and_then(Cursor::new),
        })
    }

    /// Stable user id for `username`, from the identity cache when possible.
    ///
    /// A miss costs one profile lookup by screen name. Failures are
    /// returned as-is and not remembered.
    #[instrument(skip(self))]
    pub async fn resolve_user_id(&self, username: &str) -> XGraphResult<String> {
        self.identity_cache
            .resolve(username, |name| async move {
                self.get_profile_by_username(&name)
                    .await
                    .map(|profile| profile.user_id)
            })
            .await
    }

    /// Walk the followers listing from the start.
    pub async fn collect_followers(
        &self,
        user_id: &str,
        page_size: usize,
        limit: Option<PageLimit>,
    ) -> XGraphResult<Vec<Profile>> {
        walk_pages(limit, |cursor: Option<Cursor<Followers>>| async move {
            self.get_followers(user_id, page_size, cursor.as_ref()).await
        })
        .await
    }

    /// Walk the following listing from the start.
    pub async fn collect_following(
        &self,
        user_id: &str,
        page_size: usize,
        limit: Option<PageLimit>,
    ) -> XGraphResult<Vec<Profile>> {
        walk_pages(limit, |cursor: Option<Cursor<Following>>| async move {
            self.get_following(user_id, page_size, cursor.as_ref()).await
        })
        .await
    }
}

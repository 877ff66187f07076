//! The canonical profile record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::raw::RawLegacyUser;

/// Prefix of a profile's public URL.
pub const PROFILE_URL_BASE: &str = "https://twitter.com/";

const RUBY_DATE: &str = "%a %b %d %H:%M:%S %z %Y";

/// Canonical user profile.
///
/// `user_id` and `username` are never empty: responses lacking either are
/// rejected before a `Profile` is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Stable upstream identifier (`rest_id`)
    pub user_id: String,

    /// Handle without `@`
    pub username: String,

    /// Display name
    pub name: String,

    /// Protected account
    pub is_private: bool,

    /// Verified badge
    pub is_verified: bool,

    /// Account flagged as possibly sensitive
    pub sensitive: bool,

    /// Account creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined: Option<DateTime<Utc>>,

    pub followers_count: u64,
    pub following_count: u64,
    pub friends_count: u64,
    pub tweets_count: u64,
    pub likes_count: u64,
    pub listed_count: u64,

    /// Bio text
    pub biography: String,
    pub location: String,

    /// Public profile page
    pub url: String,

    /// First link attached to the profile
    pub website: String,

    /// Avatar image URL
    pub avatar: String,

    /// Banner image URL
    pub banner: String,

    /// `YYYY-MM-DD`, or `MM-DD` when the year is hidden
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,

    pub pinned_tweet_ids: Vec<String>,
}

impl Profile {
    /// Map an already-identified legacy user onto the canonical record.
    pub(crate) fn from_legacy(user: RawLegacyUser, birthday: Option<String>) -> Self {
        let joined = parse_joined(&user.created_at);
        let website = user
            .entities
            .url
            .urls
            .into_iter()
            .map(|url| url.expanded_url)
            .find(|url| !url.is_empty())
            .unwrap_or_default();

        Self {
            url: format!("{PROFILE_URL_BASE}{}", user.screen_name),
            user_id: user.id_str,
            username: user.screen_name,
            name: user.name,
            is_private: user.protected,
            is_verified: user.verified,
            sensitive: user.possibly_sensitive,
            joined,
            followers_count: user.followers_count,
            following_count: user.friends_count,
            friends_count: user.friends_count,
            tweets_count: user.statuses_count,
            likes_count: user.favourites_count,
            listed_count: user.listed_count,
            biography: user.description,
            location: user.location,
            website,
            avatar: user.profile_image_url_https,
            banner: user.profile_banner_url,
            birthday,
            pinned_tweet_ids: user.pinned_tweet_ids_str,
        }
    }
}

fn parse_joined(created_at: &str) -> Option<DateTime<Utc>> {
    if created_at.is_empty() {
        return None;
    }
    DateTime::parse_from_str(created_at, RUBY_DATE)
        .ok()
        .map(|joined| joined.with_timezone(&Utc))
}

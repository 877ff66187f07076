//! Building the `variables`/`features` parameters for each operation.
//!
//! Feature flags are fixed per persisted query. The API rejects requests
//! whose flag set does not match, so they are sent verbatim.

use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::listing::{Cursor, Listing};

/// Upstream page-size ceiling.
pub const MAX_PAGE_SIZE: usize = 200;

pub(crate) const USER_BY_SCREEN_NAME_PATH: &str = "/graphql/4S2ihIKfF3xhp-ENxvUAfQ/UserByScreenName";
pub(crate) const USER_BY_REST_ID_PATH: &str = "/graphql/tD8zKvQzwY3kdx5yz6YmOw/UserByRestId";

/// Flags for `UserByRestId`.
pub const USER_FEATURES: &[(&str, bool)] = &[
    ("hidden_profile_likes_enabled", true),
    ("hidden_profile_subscriptions_enabled", true),
    ("responsive_web_graphql_exclude_directive_enabled", true),
    ("verified_phone_label_enabled", false),
    ("subscriptions_verification_info_is_identity_verified_enabled", true),
    ("subscriptions_verification_info_verified_since_enabled", true),
    ("highlights_tweets_tab_ui_enabled", true),
    ("responsive_web_twitter_article_notes_tab_enabled", false),
    ("creator_subscriptions_tweet_preview_api_enabled", true),
    ("responsive_web_graphql_skip_user_profile_image_extensions_enabled", false),
    ("responsive_web_graphql_timeline_navigation_enabled", true),
];

/// Flags for the `Followers` and `Following` listings.
pub const RELATIONSHIP_FEATURES: &[(&str, bool)] = &[
    ("responsive_web_graphql_exclude_directive_enabled", true),
    ("verified_phone_label_enabled", false),
    ("creator_subscriptions_tweet_preview_api_enabled", true),
    ("responsive_web_graphql_timeline_navigation_enabled", true),
    ("responsive_web_graphql_skip_user_profile_image_extensions_enabled", false),
    ("c9s_tweet_anatomy_moderator_badge_enabled", true),
    ("tweetypie_unmention_optimization_enabled", true),
    ("responsive_web_edit_tweet_api_enabled", true),
    ("graphql_is_translatable_rweb_tweet_is_translatable_enabled", true),
    ("view_counts_everywhere_api_enabled", true),
    ("longform_notetweets_consumption_enabled", true),
    ("responsive_web_twitter_article_tweet_consumption_enabled", false),
    ("tweet_awards_web_tipping_enabled", false),
    ("freedom_of_speech_not_reach_fetch_enabled", true),
    ("standardized_nudges_misinfo", true),
    ("tweet_with_visibility_results_prefer_gql_limited_actions_policy_enabled", true),
    ("rweb_video_timestamps_enabled", true),
    ("longform_notetweets_rich_text_read_enabled", true),
    ("longform_notetweets_inline_media_enabled", true),
    ("responsive_web_media_download_video_enabled", false),
    ("responsive_web_enhance_cards_enabled", false),
];

/// Clamp a requested page size into `1..=MAX_PAGE_SIZE`.
#[must_use]
pub fn clamp_page_size(requested: usize) -> usize {
    requested.clamp(1, MAX_PAGE_SIZE)
}

fn feature_map(flags: &[(&str, bool)]) -> Map<String, Value> {
    flags
        .iter()
        .map(|(name, enabled)| ((*name).to_string(), Value::Bool(*enabled)))
        .collect()
}

/// A fully-specified GraphQL GET request.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphqlQuery {
    operation_name: &'static str,
    path: &'static str,
    variables: Map<String, Value>,
    features: Option<Map<String, Value>>,
}

impl GraphqlQuery {
    /// `UserByScreenName`: answers in the legacy layout, takes no features.
    #[must_use]
    pub fn profile_by_screen_name(screen_name: &str) -> Self {
        let mut variables = Map::new();
        variables.insert("screen_name".into(), Value::from(screen_name));
        variables.insert("withHighlightedLabel".into(), Value::Bool(true));
        Self {
            operation_name: "UserByScreenName",
            path: USER_BY_SCREEN_NAME_PATH,
            variables,
            features: None,
        }
    }

    /// `UserByRestId`: answers in the result layout.
    #[must_use]
    pub fn profile_by_user_id(user_id: &str) -> Self {
        let mut variables = Map::new();
        variables.insert("userId".into(), Value::from(user_id));
        variables.insert("withSafetyModeUserFields".into(), Value::Bool(true));
        Self {
            operation_name: "UserByRestId",
            path: USER_BY_REST_ID_PATH,
            variables,
            features: Some(feature_map(USER_FEATURES)),
        }
    }

    /// One page of listing `L`. The cursor variable is left out entirely
    /// when there is no cursor.
    #[must_use]
    pub fn relationship_page<L: Listing>(
        user_id: &str,
        page_size: usize,
        cursor: Option<&Cursor<L>>,
    ) -> Self {
        let mut variables = Map::new();
        variables.insert("userId".into(), Value::from(user_id));
        variables.insert("count".into(), Value::from(clamp_page_size(page_size)));
        variables.insert("includePromotedContent".into(), Value::Bool(false));
        L::extend_variables(&mut variables);
        if let Some(cursor) = cursor {
            variables.insert("cursor".into(), Value::from(cursor.as_str()));
        }
        Self {
            operation_name: L::OPERATION_NAME,
            path: L::PATH,
            variables,
            features: Some(feature_map(RELATIONSHIP_FEATURES)),
        }
    }

    /// GraphQL operation name.
    #[must_use]
    pub const fn operation_name(&self) -> &'static str {
        self.operation_name
    }

    /// Endpoint path below the API base URL.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    #[must_use]
    pub const fn variables(&self) -> &Map<String, Value> {
        &self.variables
    }

    #[must_use]
    pub const fn features(&self) -> Option<&Map<String, Value>> {
        self.features.as_ref()
    }

    /// Endpoint URL below `api_url`.
    #[must_use]
    pub fn url(&self, api_url: &str) -> String {
        format!("{}{}", api_url.trim_end_matches('/'), self.path)
    }

    /// `variables` and, when present, `features`, each as a JSON string.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![(
            "variables".to_string(),
            Value::Object(self.variables.clone()).to_string(),
        )];
        if let Some(features) = &self.features {
            pairs.push((
                "features".to_string(),
                Value::Object(features.clone()).to_string(),
            ));
        }
        pairs
    }

    /// The form-encoded query string.
    #[must_use]
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_pairs())
            .finish()
    }
}

//! Upstream wire shapes.
//!
//! Nothing here leaves the crate: every type is decoded, checked, and folded
//! into [`Profile`](crate::Profile) or a timeline page before returning.

use serde::{Deserialize, Deserializer};

/// Deserialize `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ─────────────────────────────────────────────────────────────────────────────
// Envelope
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level GraphQL response.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    #[serde(default)]
    pub data: Option<T>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<RawApiError>,
}

impl<T> ApiEnvelope<T> {
    /// First upstream error message, if the response carried any.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(|err| err.message.as_str())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawApiError {
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// User payloads
// ─────────────────────────────────────────────────────────────────────────────

/// Profile fields as the upstream API names them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawLegacyUser {
    /// Unreliable upstream; replaced with the `rest_id` before mapping.
    #[serde(deserialize_with = "null_as_default")]
    pub id_str: String,
    #[serde(deserialize_with = "null_as_default")]
    pub screen_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    /// Ruby date, e.g. `Tue Mar 21 20:50:14 +0000 2006`.
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub followers_count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub friends_count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub favourites_count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub statuses_count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub listed_count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub protected: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub verified: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub possibly_sensitive: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub profile_image_url_https: String,
    #[serde(deserialize_with = "null_as_default")]
    pub profile_banner_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pinned_tweet_ids_str: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub entities: RawUserEntities,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawUserEntities {
    #[serde(deserialize_with = "null_as_default")]
    pub url: RawEntityUrls,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawEntityUrls {
    #[serde(deserialize_with = "null_as_default")]
    pub urls: Vec<RawUrl>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawUrl {
    #[serde(deserialize_with = "null_as_default")]
    pub expanded_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawExtendedProfile {
    pub birthdate: Option<RawBirthdate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawBirthdate {
    pub day: Option<u32>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl RawBirthdate {
    /// `YYYY-MM-DD`, or `MM-DD` when the year is hidden.
    pub fn render(&self) -> Option<String> {
        let (day, month) = (self.day?, self.month?);
        Some(match self.year {
            Some(year) => format!("{year:04}-{month:02}-{day:02}"),
            None => format!("{month:02}-{day:02}"),
        })
    }
}

/// `user` object of the legacy-shape endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LegacyShapeData {
    pub user: Option<LegacyShapeUser>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LegacyShapeUser {
    #[serde(deserialize_with = "null_as_default")]
    pub rest_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub legacy: RawLegacyUser,
}

/// `user.result` wrapper of the result-shape endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ResultShapeData {
    pub user: Option<RawUserResults>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawUserResults {
    pub result: Option<RawUserResult>,
}

/// A user node as it appears under `result`, also inside timeline entries.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawUserResult {
    #[serde(rename = "__typename", deserialize_with = "null_as_default")]
    pub typename: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rest_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub legacy: RawLegacyUser,
    pub legacy_extended_profile: Option<RawExtendedProfile>,
}

impl RawUserResult {
    pub fn birthday(&self) -> Option<String> {
        self.legacy_extended_profile
            .as_ref()?
            .birthdate
            .as_ref()?
            .render()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Relationship timelines
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct TimelineData {
    pub user: Option<TimelineUser>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct TimelineUser {
    pub result: Option<TimelineUserResult>,
}

/// Listings answer under `timeline` or, for older query ids, `timeline_v2`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct TimelineUserResult {
    pub timeline: Option<TimelineWrapper>,
    pub timeline_v2: Option<TimelineWrapper>,
}

impl TimelineUserResult {
    pub fn into_timeline(self) -> Option<RawTimeline> {
        let Self {
            timeline,
            timeline_v2,
        } = self;
        timeline
            .and_then(|wrapper| wrapper.timeline)
            .or_else(|| timeline_v2.and_then(|wrapper| wrapper.timeline))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct TimelineWrapper {
    pub timeline: Option<RawTimeline>,
}

/// Instructions are kept as raw JSON and decoded one by one.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawTimeline {
    #[serde(deserialize_with = "null_as_default")]
    pub instructions: Vec<serde_json::Value>,
}

/// Entries are kept as raw JSON so one odd entry cannot sink the page.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawInstruction {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub entries: Vec<serde_json::Value>,
    /// Single-entry instructions (`TimelineReplaceEntry`, `TimelinePinEntry`).
    pub entry: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawEntry {
    #[serde(rename = "entryId", deserialize_with = "null_as_default")]
    pub entry_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: RawEntryContent,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawEntryContent {
    #[serde(rename = "entryType", deserialize_with = "null_as_default")]
    pub entry_type: String,
    #[serde(rename = "cursorType", deserialize_with = "null_as_default")]
    pub cursor_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(rename = "itemContent")]
    pub item_content: Option<RawItemContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawItemContent {
    #[serde(rename = "itemType", deserialize_with = "null_as_default")]
    pub item_type: String,
    pub user_results: Option<RawUserResults>,
}

//! Relationship timeline parsing.
//!
//! A listing response is a sequence of instructions holding heterogeneous
//! entries. Each entry is parsed once into a [`TimelineEntry`]; the page is
//! a fold over those. Entries that are not understood become
//! [`TimelineEntry::Other`] and never fail the page.

use tracing::{debug, warn};

use crate::error::{XGraphError, XGraphResult};
use crate::normalize::{decode_failure, identified_profile};
use crate::profile::Profile;
use crate::raw::{ApiEnvelope, RawEntry, RawInstruction, RawUserResult, TimelineData};

const ENTRY_TYPE_ITEM: &str = "TimelineTimelineItem";
const ENTRY_TYPE_CURSOR: &str = "TimelineTimelineCursor";
const ITEM_TYPE_USER: &str = "TimelineUser";

/// Position of a cursor entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CursorKind {
    /// Points at the following page.
    Bottom,
    /// Points back at newer entries.
    Top,
    /// Any other cursor type.
    Other(String),
}

impl From<&str> for CursorKind {
    fn from(kind: &str) -> Self {
        match kind {
            "Bottom" => Self::Bottom,
            "Top" => Self::Top,
            other => Self::Other(other.to_string()),
        }
    }
}

/// One parsed timeline entry.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TimelineEntry {
    /// A user with both id and screen name present.
    User(Profile),
    /// A pagination cursor.
    Cursor { kind: CursorKind, value: String },
    /// Anything else: modules, prompts, unavailable users, unknown kinds.
    Other { entry_id: String },
}

impl TimelineEntry {
    /// Classify a raw entry. Never fails.
    pub(crate) fn parse(value: serde_json::Value) -> Self {
        let entry: RawEntry = match serde_json::from_value(value) {
            Ok(entry) => entry,
            Err(err) => {
                debug!(error = %err, "skipping undecodable timeline entry");
                return Self::Other {
                    entry_id: String::new(),
                };
            }
        };

        let RawEntry { entry_id, content } = entry;
        match content.entry_type.as_str() {
            ENTRY_TYPE_CURSOR => Self::Cursor {
                kind: CursorKind::from(content.cursor_type.as_str()),
                value: content.value,
            },
            ENTRY_TYPE_ITEM => {
                let user = content
                    .item_content
                    .filter(|item| item.item_type == ITEM_TYPE_USER)
                    .and_then(|item| item.user_results)
                    .and_then(|results| results.result);
                match user {
                    Some(user) => Self::user(entry_id, user),
                    None => Self::Other { entry_id },
                }
            }
            _ => Self::Other { entry_id },
        }
    }

    fn user(entry_id: String, user: RawUserResult) -> Self {
        let birthday = user.birthday();
        let typename = user.typename;
        match identified_profile(user.rest_id, user.legacy, birthday, &entry_id) {
            Ok(profile) => Self::User(profile),
            Err(err) => {
                debug!(%entry_id, %typename, error = %err, "skipping user entry");
                Self::Other { entry_id }
            }
        }
    }
}

/// Profiles and next cursor of one timeline response.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct TimelinePage {
    /// Users in response order.
    pub profiles: Vec<Profile>,
    /// Token of the bottom cursor; `None` when the response had none.
    pub next_cursor: Option<String>,
}

impl FromIterator<TimelineEntry> for TimelinePage {
    fn from_iter<I: IntoIterator<Item = TimelineEntry>>(entries: I) -> Self {
        entries
            .into_iter()
            .fold(Self::default(), |mut page, entry| {
                match entry {
                    TimelineEntry::User(profile) => page.profiles.push(profile),
                    TimelineEntry::Cursor {
                        kind: CursorKind::Bottom,
                        value,
                    } if !value.is_empty() => page.next_cursor = Some(value),
                    TimelineEntry::Cursor {
                        kind: CursorKind::Other(kind),
                        ..
                    } => debug!(%kind, "ignoring unknown cursor type"),
                    TimelineEntry::Cursor { .. } => {}
                    TimelineEntry::Other { entry_id } => debug!(%entry_id, "skipped entry"),
                }
                page
            })
    }
}

/// Parse a listing response body.
///
/// `user_id` is the listed account and only appears in errors. An `errors`
/// array without a timeline fails the call; alongside a timeline it is
/// logged and the page is returned.
pub(crate) fn parse_timeline(body: &[u8], user_id: &str) -> XGraphResult<TimelinePage> {
    let envelope: ApiEnvelope<TimelineData> =
        serde_json::from_slice(body).map_err(|err| decode_failure(body, err))?;

    let first_error = envelope.first_error().map(str::to_string);
    let result = envelope
        .data
        .and_then(|data| data.user)
        .and_then(|user| user.result);

    let Some(result) = result else {
        return Err(match first_error {
            Some(message) => XGraphError::Upstream { message },
            None => XGraphError::NotFound {
                identifier: user_id.to_string(),
            },
        });
    };

    let Some(timeline) = result.into_timeline() else {
        return Err(match first_error {
            Some(message) => XGraphError::Upstream { message },
            None => XGraphError::MalformedResponse(format!(
                "no timeline in listing response for {user_id}"
            )),
        });
    };

    if let Some(message) = first_error {
        warn!(%user_id, %message, "partial timeline response");
    }

    let page: TimelinePage = timeline
        .instructions
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<RawInstruction>(value) {
            Ok(instruction) => Some(instruction),
            Err(err) => {
                debug!(error = %err, "skipping undecodable instruction");
                None
            }
        })
        .flat_map(|instruction| {
            debug!(kind = %instruction.kind, entries = instruction.entries.len(), "instruction");
            instruction.entries.into_iter().chain(instruction.entry)
        })
        .map(TimelineEntry::parse)
        .collect();

    debug!(
        %user_id,
        profiles = page.profiles.len(),
        has_next = page.next_cursor.is_some(),
        "parsed timeline page"
    );
    Ok(page)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn user_entry(rest_id: &str, screen_name: &str) -> Value {
        json!({
            "entryId": format!("user-{rest_id}"),
            "sortIndex": "1",
            "content": {
                "entryType": "TimelineTimelineItem",
                "__typename": "TimelineTimelineItem",
                "itemContent": {
                    "itemType": "TimelineUser",
                    "__typename": "TimelineUser",
                    "user_results": { "result": {
                        "__typename": "User",
                        "rest_id": rest_id,
                        "legacy": { "screen_name": screen_name, "name": screen_name }
                    } },
                    "userDisplayType": "User"
                }
            }
        })
    }

    fn cursor_entry(kind: &str, value: &str) -> Value {
        json!({
            "entryId": format!("cursor-{}-1", kind.to_lowercase()),
            "content": {
                "entryType": "TimelineTimelineCursor",
                "__typename": "TimelineTimelineCursor",
                "value": value,
                "cursorType": kind
            }
        })
    }

    fn module_entry() -> Value {
        json!({
            "entryId": "who-to-follow-1",
            "content": { "entryType": "TimelineTimelineModule", "items": [] }
        })
    }

    fn prompt_entry() -> Value {
        json!({
            "entryId": "messageprompt-1",
            "content": {
                "entryType": "TimelineTimelineItem",
                "itemContent": { "itemType": "TimelineMessagePrompt" }
            }
        })
    }

    fn response(instructions: Value) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "data": { "user": { "result": {
                "__typename": "User",
                "timeline": { "timeline": { "instructions": instructions } }
            } } }
        }))
        .unwrap()
    }

    fn usernames(page: &TimelinePage) -> Vec<&str> {
        page.profiles.iter().map(|p| p.username.as_str()).collect()
    }

    #[test]
    fn folds_users_and_bottom_cursor_skipping_unknown_kinds() {
        let body = response(json!([
            { "type": "TimelineClearCache" },
            { "type": "TimelineAddEntries", "entries": [
                user_entry("1", "alice"),
                module_entry(),
                user_entry("2", "bob"),
                cursor_entry("Bottom", "CURSOR123"),
                prompt_entry(),
                user_entry("3", "carol"),
            ] }
        ]));

        let page = parse_timeline(&body, "12").unwrap();
        assert_eq!(usernames(&page), vec!["alice", "bob", "carol"]);
        assert_eq!(page.profiles[0].user_id, "1");
        assert_eq!(page.next_cursor.as_deref(), Some("CURSOR123"));
    }

    #[test]
    fn top_cursor_is_not_a_next_page() {
        let body = response(json!([
            { "type": "TimelineAddEntries", "entries": [
                cursor_entry("Top", "TOP"),
                user_entry("1", "alice"),
            ] }
        ]));
        let page = parse_timeline(&body, "12").unwrap();
        assert_eq!(page.next_cursor, None);
        assert_eq!(page.profiles.len(), 1);
    }

    #[test]
    fn single_entry_instructions_are_read() {
        let body = response(json!([
            { "type": "TimelineAddEntries", "entries": [ user_entry("1", "alice") ] },
            { "type": "TimelineReplaceEntry", "entry": cursor_entry("Bottom", "REPLACED") }
        ]));
        let page = parse_timeline(&body, "12").unwrap();
        assert_eq!(page.next_cursor.as_deref(), Some("REPLACED"));
    }

    #[test]
    fn incomplete_or_odd_entries_are_skipped() {
        let body = response(json!([
            { "type": "TimelineAddEntries", "entries": [
                user_entry("", "no_id"),
                user_entry("5", ""),
                { "entryId": "user-9", "content": {
                    "entryType": "TimelineTimelineItem",
                    "itemContent": { "itemType": "TimelineUser",
                        "user_results": { "result": { "__typename": "UserUnavailable" } } }
                } },
                { "entryId": 17, "content": "garbage" },
                "not even an object",
                user_entry("6", "dave"),
            ] }
        ]));
        let page = parse_timeline(&body, "12").unwrap();
        assert_eq!(usernames(&page), vec!["dave"]);
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn odd_instructions_do_not_sink_the_page() {
        let body = response(json!([
            "not an instruction",
            { "type": "TimelineAddEntries", "entries": [
                user_entry("1", "alice"),
                cursor_entry("Bottom", "NEXT"),
            ] },
            { "type": 7, "entries": "nope" }
        ]));
        let page = parse_timeline(&body, "12").unwrap();
        assert_eq!(usernames(&page), vec!["alice"]);
        assert_eq!(page.next_cursor.as_deref(), Some("NEXT"));
    }

    #[test]
    fn empty_timeline_key_falls_back_to_v2() {
        let body = serde_json::to_vec(&json!({
            "data": { "user": { "result": {
                "timeline": {},
                "timeline_v2": { "timeline": { "instructions": [
                    { "type": "TimelineAddEntries", "entries": [ user_entry("1", "alice") ] }
                ] } }
            } } }
        }))
        .unwrap();
        assert_eq!(usernames(&parse_timeline(&body, "12").unwrap()), vec!["alice"]);
    }

    #[test]
    fn classifies_entries() {
        assert!(matches!(
            TimelineEntry::parse(user_entry("1", "alice")),
            TimelineEntry::User(ref p) if p.user_id == "1"
        ));
        assert_eq!(
            TimelineEntry::parse(cursor_entry("Bottom", "B")),
            TimelineEntry::Cursor {
                kind: CursorKind::Bottom,
                value: "B".into()
            }
        );
        assert_eq!(
            TimelineEntry::parse(module_entry()),
            TimelineEntry::Other {
                entry_id: "who-to-follow-1".into()
            }
        );
    }

    #[test]
    fn empty_listing_has_no_cursor() {
        let page = parse_timeline(&response(json!([])), "12").unwrap();
        assert!(page.profiles.is_empty());
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn errors_without_timeline_fail() {
        let body = serde_json::to_vec(&json!({
            "errors": [ { "message": "rate limit exceeded" } ]
        }))
        .unwrap();
        let err = parse_timeline(&body, "12").unwrap_err();
        assert!(matches!(err, XGraphError::Upstream { message } if message == "rate limit exceeded"));
    }

    #[test]
    fn errors_alongside_timeline_keep_the_page() {
        let mut value: Value = serde_json::from_slice(&response(json!([
            { "type": "TimelineAddEntries", "entries": [
                user_entry("1", "alice"),
                cursor_entry("Bottom", "NEXT"),
            ] }
        ])))
        .unwrap();
        value["errors"] = json!([ { "message": "Timeout: Unspecified" } ]);

        let page = parse_timeline(&serde_json::to_vec(&value).unwrap(), "12").unwrap();
        assert_eq!(usernames(&page), vec!["alice"]);
        assert_eq!(page.next_cursor.as_deref(), Some("NEXT"));
    }

    #[test]
    fn unknown_user_is_not_found() {
        let body = serde_json::to_vec(&json!({ "data": { "user": {} } })).unwrap();
        let err = parse_timeline(&body, "404").unwrap_err();
        assert!(matches!(err, XGraphError::NotFound { identifier } if identifier == "404"));
    }

    #[test]
    fn missing_timeline_is_malformed() {
        let body = serde_json::to_vec(&json!({ "data": { "user": { "result": {} } } })).unwrap();
        let err = parse_timeline(&body, "12").unwrap_err();
        assert!(matches!(err, XGraphError::MalformedResponse(_)));
    }

    #[test]
    fn timeline_v2_layout_is_accepted() {
        let body = serde_json::to_vec(&json!({
            "data": { "user": { "result": { "timeline_v2": { "timeline": { "instructions": [
                { "type": "TimelineAddEntries", "entries": [ user_entry("1", "alice") ] }
            ] } } } } }
        }))
        .unwrap();
        assert_eq!(usernames(&parse_timeline(&body, "12").unwrap()), vec!["alice"]);
    }
}

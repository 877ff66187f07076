//! Relationship listings, their cursors and pages.

use std::fmt;
use std::marker::PhantomData;

use serde_json::{Map, Value};

use crate::profile::Profile;

mod sealed {
    pub trait Sealed {}
}

/// A paginated relationship listing (followers or following).
///
/// Each listing has its own persisted query and variable set; the marker
/// types also keep cursors from one listing out of the other.
pub trait Listing: sealed::Sealed + Send + Sync + 'static {
    /// GraphQL operation name.
    const OPERATION_NAME: &'static str;

    /// Endpoint path below the API base URL.
    const PATH: &'static str;

    /// Add the listing-specific variables.
    fn extend_variables(variables: &mut Map<String, Value>);
}

/// Accounts following a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Followers {}

/// Accounts a user follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Following {}

impl sealed::Sealed for Followers {}
impl sealed::Sealed for Following {}

impl Listing for Followers {
    const OPERATION_NAME: &'static str = "Followers";
    const PATH: &'static str = "/graphql/3_7xfjmh897x8h_n6QBqTA/Followers";

    fn extend_variables(variables: &mut Map<String, Value>) {
        variables.insert(
            "withQuickPromoteEligibilityTweetFields".into(),
            Value::Bool(false),
        );
    }
}

impl Listing for Following {
    const OPERATION_NAME: &'static str = "Following";
    const PATH: &'static str = "/graphql/g5P4cbXR4ta4oCeE7y2vLQ/Following";

    fn extend_variables(variables: &mut Map<String, Value>) {
        variables.insert("withV2Timeline".into(), Value::Bool(true));
    }
}

/// Opaque position inside listing `L`.
///
/// Never empty: an empty token means "start from the beginning", which is
/// spelled `None` wherever a cursor is optional.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor<L> {
    value: String,
    listing: PhantomData<L>,
}

impl<L: Listing> Cursor<L> {
    /// Wrap a token returned by the API; `None` for the empty token.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self {
                value,
                listing: PhantomData,
            })
        }
    }

    /// The raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Consume into the raw token.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.value
    }
}

impl<L> fmt::Display for Cursor<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// One page of a relationship listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipPage<L> {
    /// Profiles in response order.
    pub profiles: Vec<Profile>,
    /// Cursor for the following page; `None` on the last page.
    pub next_cursor: Option<Cursor<L>>,
}

impl<L> RelationshipPage<L> {
    /// `true` when there is no page after this one.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }
}

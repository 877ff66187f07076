//! xgraph - read-only client for the web GraphQL API of twitter.com.
//!
//! This crate provides:
//! - Profile lookup by screen name or user id, folded into one [`Profile`].
//! - Paginated followers/following listings with typed [`Cursor`]s.
//! - A shared [`IdentityCache`] memoizing username → user id.
//! - A page walker stitching listings together.
//!
//! HTTP, authentication and retries belong to the [`Transport`] the client
//! is built over; see the `xgraph-http` crate.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod cache;
mod client;
mod config;
mod error;
mod listing;
mod normalize;
mod pager;
mod profile;
mod query;
mod raw;
mod timeline;

pub use cache::IdentityCache;
pub use client::XGraphClient;
pub use config::ClientConfig;
pub use error::{XGraphError, XGraphResult};
pub use listing::{Cursor, Followers, Following, Listing, RelationshipPage};
pub use pager::{PageLimit, walk_pages};
pub use profile::{PROFILE_URL_BASE, Profile};
pub use query::{
    GraphqlQuery, MAX_PAGE_SIZE, RELATIONSHIP_FEATURES, USER_FEATURES, clamp_page_size,
};
pub use xgraph_http::{Transport, TransportConfig, TransportError};

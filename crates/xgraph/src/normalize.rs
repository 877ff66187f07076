//! Folding the two profile response layouts into [`Profile`].

use serde::de::IgnoredAny;

use crate::error::{XGraphError, XGraphResult};
use crate::profile::Profile;
use crate::raw::{ApiEnvelope, LegacyShapeData, RawLegacyUser, ResultShapeData};

/// Which layout an endpoint answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProfileShape {
    /// `data.user.{rest_id, legacy}` (lookup by screen name).
    Legacy,
    /// `data.user.result.{rest_id, legacy}` (lookup by user id).
    Result,
}

/// A decoded profile response in one of the two known layouts.
#[derive(Debug)]
pub(crate) enum ProfileResponse {
    Legacy(ApiEnvelope<LegacyShapeData>),
    Result(ApiEnvelope<ResultShapeData>),
}

impl ProfileShape {
    /// Decode a response body in this layout.
    pub(crate) fn decode(self, body: &[u8]) -> XGraphResult<ProfileResponse> {
        let decoded = match self {
            Self::Legacy => serde_json::from_slice(body).map(ProfileResponse::Legacy),
            Self::Result => serde_json::from_slice(body).map(ProfileResponse::Result),
        };
        decoded.map_err(|err| decode_failure(body, err))
    }
}

/// An `errors` array still wins when the data part fails to decode.
pub(crate) fn decode_failure(body: &[u8], err: serde_json::Error) -> XGraphError {
    serde_json::from_slice::<ApiEnvelope<IgnoredAny>>(body)
        .ok()
        .and_then(|envelope| upstream_error(&envelope).err())
        .unwrap_or_else(|| err.into())
}

impl ProfileResponse {
    /// Validate and canonicalize. `requested` is the name or id the caller
    /// asked for and is only used in error reports.
    pub(crate) fn into_profile(self, requested: &str) -> XGraphResult<Profile> {
        let (rest_id, legacy, birthday) = match self {
            Self::Legacy(envelope) => {
                upstream_error(&envelope)?;
                let user = envelope.data.and_then(|data| data.user).unwrap_or_default();
                (user.rest_id, user.legacy, None)
            }
            Self::Result(envelope) => {
                upstream_error(&envelope)?;
                let result = envelope
                    .data
                    .and_then(|data| data.user)
                    .and_then(|user| user.result)
                    .unwrap_or_default();
                let birthday = result.birthday();
                (result.rest_id, result.legacy, birthday)
            }
        };
        identified_profile(rest_id, legacy, birthday, requested)
    }
}

/// Surface the first upstream error, if any, before looking at data.
pub(crate) fn upstream_error<T>(envelope: &ApiEnvelope<T>) -> XGraphResult<()> {
    match envelope.first_error() {
        Some(message) => Err(XGraphError::Upstream {
            message: message.to_string(),
        }),
        None => Ok(()),
    }
}

/// Shared by both layouts and by timeline user entries.
pub(crate) fn identified_profile(
    rest_id: String,
    mut legacy: RawLegacyUser,
    birthday: Option<String>,
    requested: &str,
) -> XGraphResult<Profile> {
    if rest_id.is_empty() {
        return Err(XGraphError::NotFound {
            identifier: requested.to_string(),
        });
    }
    legacy.id_str = rest_id;

    if legacy.screen_name.is_empty() {
        return Err(XGraphError::PrivateOrNonexistent {
            identifier: requested.to_string(),
        });
    }

    Ok(Profile::from_legacy(legacy, birthday))
}

/// Decode and canonicalize in one step.
pub(crate) fn normalize_profile(
    shape: ProfileShape,
    body: &[u8],
    requested: &str,
) -> XGraphResult<Profile> {
    shape.decode(body)?.into_profile(requested)
}

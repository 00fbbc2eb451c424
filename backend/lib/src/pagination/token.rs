//! Continuation token codec.
//!
//! A token is the sort-key tuple of the last record of a page, tagged with a
//! format version and the signature of the [`SortSpec`] it was issued under:
//!
//! ```text
//! base64url_nopad({"v":1,"s":"created_at:desc,id:asc","k":[1709296215123456,42]})
//! ```
//!
//! Decoding only ever produces [`KeyValue`]s; nothing in a token is interpreted
//! as anything but data. Errors carry static reasons and never echo token content.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    error::PaginationError,
    sort::SortSpec,
    value::{FieldAccess, KeyValue},
};

/// Current wire format version
pub const TOKEN_VERSION: u32 = 1;

/// Longest encoded token accepted by [`decode`]
pub const MAX_TOKEN_LEN: usize = 4096;

#[derive(Serialize, Deserialize)]
struct WireToken {
    v: u32,
    s: String,
    k: Vec<Value>,
}

/// Read first so that payloads of other versions are rejected on the version alone.
#[derive(Deserialize)]
struct VersionHeader {
    v: u32,
}

/// A decoded position: the sort-key values of one record, in sort order.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuationToken {
    values: Vec<(String, KeyValue)>,
}

impl ContinuationToken {
    /// Projects `record` onto the fields of `spec`.
    ///
    /// Fails with [`PaginationError::InvalidSortSpec`] if the record does not
    /// expose a sort field or exposes it with another type.
    pub fn from_record<R: FieldAccess + ?Sized>(
        spec: &SortSpec,
        record: &R,
    ) -> Result<Self, PaginationError> {
        let values = spec
            .iter()
            .map(|field| {
                let value = record.field(field.name()).ok_or_else(|| {
                    PaginationError::InvalidSortSpec(format!(
                        "record has no sort field `{}`",
                        field.name()
                    ))
                })?;

                if value.kind() != field.kind() {
                    return Err(PaginationError::InvalidSortSpec(format!(
                        "record field `{}` is a {}, sort field expects a {}",
                        field.name(),
                        value.kind(),
                        field.kind()
                    )));
                }

                Ok((field.name().to_owned(), value))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { values })
    }

    /// `(field, value)` pairs in sort order
    pub fn values(&self) -> &[(String, KeyValue)] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Encodes the position of `record` under `spec`.
///
/// The same record and spec always produce the same string.
pub fn encode<R: FieldAccess + ?Sized>(
    spec: &SortSpec,
    record: &R,
) -> Result<String, PaginationError> {
    let token = ContinuationToken::from_record(spec, record)?;

    let wire = WireToken {
        v: TOKEN_VERSION,
        s: spec.signature(),
        k: token.values.iter().map(|(_, value)| value.to_wire()).collect(),
    };

    let payload = serde_json::to_vec(&wire).map_err(|e| {
        PaginationError::InvalidSortSpec(format!("failed to serialize token: {e}"))
    })?;

    Ok(URL_SAFE_NO_PAD.encode(payload))
}

/// Decodes a token previously produced by [`encode`] under the same `spec`.
pub fn decode(spec: &SortSpec, token: &str) -> Result<ContinuationToken, PaginationError> {
    if token.len() > MAX_TOKEN_LEN {
        return Err(PaginationError::MalformedToken("token is too long"));
    }

    let payload = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| PaginationError::MalformedToken("not valid base64"))?;

    let header: VersionHeader = serde_json::from_slice(&payload)
        .map_err(|_| PaginationError::MalformedToken("not a valid token payload"))?;
    if header.v != TOKEN_VERSION {
        return Err(PaginationError::MalformedToken("unsupported token version"));
    }

    let wire: WireToken = serde_json::from_slice(&payload)
        .map_err(|_| PaginationError::MalformedToken("not a valid token payload"))?;

    if wire.s != spec.signature() {
        return Err(PaginationError::MalformedToken(
            "token was issued for a different sort order",
        ));
    }

    if wire.k.len() != spec.len() {
        return Err(PaginationError::MalformedToken(
            "token does not match the number of sort fields",
        ));
    }

    let values = spec
        .iter()
        .zip(&wire.k)
        .map(|(field, raw)| {
            KeyValue::from_wire(field.kind(), raw)
                .map(|value| (field.name().to_owned(), value))
                .ok_or_else(|| PaginationError::TypeMismatch {
                    field: field.name().to_owned(),
                    expected: field.kind(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ContinuationToken { values })
}

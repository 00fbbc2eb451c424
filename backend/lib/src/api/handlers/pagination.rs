use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

use crate::{error::Error, services::Services};

/// Resolved cursor pagination parameters for a listing endpoint
///
/// The query parameters used for the requests are the ones described in [`CursorPaginationQuery`]
///
/// Values:
/// * `cursor`: the continuation token of the previous page, absent for the first page
/// * `limit`: the maximum amount of items to respond with
#[derive(Debug)]
pub struct CursorPagination {
    pub cursor: Option<String>,
    pub limit: i64,
}

/// Cursor pagination query parameters
///
/// Parameters:
/// * `cursor`: opaque token returned as `nextToken` by the previous page
/// * `limit`: page size, defaults to the configured default page limit
///
/// `limit` is kept as a string so malformed values produce the same error
/// body as every other bad request.
#[derive(Debug, Default, Deserialize)]
pub struct CursorPaginationQuery {
    cursor: Option<String>,
    limit: Option<String>,
}

impl CursorPaginationQuery {
    fn resolve(self, default_limit: i64) -> Result<CursorPagination, Error> {
        let limit = match self.limit.as_deref() {
            None | Some("") => default_limit,
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| Error::BadRequest(format!("Invalid limit: {raw}")))?,
        };
        // an empty cursor is the same as none
        let cursor = self.cursor.filter(|cursor| !cursor.is_empty());

        Ok(CursorPagination { cursor, limit })
    }
}

impl FromRequestParts<Services> for CursorPagination {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Services,
    ) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<CursorPaginationQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| Error::BadRequest(e.body_text()))?;

        query.resolve(state.default_page_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(cursor: Option<&str>, limit: Option<&str>) -> CursorPaginationQuery {
        CursorPaginationQuery {
            cursor: cursor.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn defaults_apply_when_absent() {
        let resolved = query(None, None).resolve(10).unwrap();
        assert_eq!(resolved.limit, 10);
        assert!(resolved.cursor.is_none());

        let resolved = query(Some(""), Some("")).resolve(7).unwrap();
        assert_eq!(resolved.limit, 7);
        assert!(resolved.cursor.is_none());
    }

    #[test]
    fn limit_is_parsed_but_not_bounded_here() {
        assert_eq!(query(None, Some("25")).resolve(10).unwrap().limit, 25);
        // bounds are enforced by the page assembler
        assert_eq!(query(None, Some("0")).resolve(10).unwrap().limit, 0);
        assert!(query(None, Some("ten")).resolve(10).is_err());
    }
}

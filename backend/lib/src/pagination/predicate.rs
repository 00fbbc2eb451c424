//! Turns a decoded position into a "strictly after" filter.

use super::{
    error::PaginationError,
    filter::{CompareOp, Filter},
    sort::{SortDirection, SortSpec},
    token::ContinuationToken,
};

/// Builds the filter selecting exactly the records that sort strictly after `cursor`.
///
/// For fields `f1..fn` with cursor values `v1..vn` this is the disjunction over
/// `i` of `f1 = v1 AND .. AND f(i-1) = v(i-1) AND fi <op> vi`, where `<op>` is
/// `>` for ascending fields and `<` for descending ones. A single field gives a
/// single comparison.
pub fn cursor_predicate(
    spec: &SortSpec,
    cursor: &ContinuationToken,
) -> Result<Filter, PaginationError> {
    if spec.is_empty() {
        return Err(PaginationError::InvalidSortSpec(
            "cannot build a cursor predicate without sort fields".to_string(),
        ));
    }

    if cursor.len() != spec.len() {
        return Err(PaginationError::InvalidSortSpec(format!(
            "cursor has {} values for {} sort fields",
            cursor.len(),
            spec.len()
        )));
    }

    let mut branches = Vec::with_capacity(spec.len());
    let mut prefix: Vec<Filter> = Vec::with_capacity(spec.len());

    for (field, (_, value)) in spec.iter().zip(cursor.values()) {
        let op = match field.direction() {
            SortDirection::Ascending => CompareOp::Gt,
            SortDirection::Descending => CompareOp::Lt,
        };

        let strict = Filter::compare(field.name(), op, value.clone());
        let branch = if prefix.is_empty() {
            strict
        } else {
            let mut terms = prefix.clone();
            terms.push(strict);
            Filter::And(terms)
        };
        branches.push(branch);

        prefix.push(Filter::eq(field.name(), value.clone()));
    }

    if branches.len() == 1 {
        return Ok(branches.remove(0));
    }

    Ok(Filter::Or(branches))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::pagination::{
        sort::SortField,
        token,
        value::{FieldAccess, KeyValue, ValueKind},
    };

    #[derive(Debug, Clone)]
    struct Entry {
        id: i64,
        created_at: NaiveDateTime,
    }

    impl FieldAccess for Entry {
        fn field(&self, name: &str) -> Option<KeyValue> {
            match name {
                "id" => Some(self.id.into()),
                "created_at" => Some(self.created_at.into()),
                _ => None,
            }
        }
    }

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn recent() -> SortSpec {
        SortSpec::new([
            SortField::desc("created_at", ValueKind::Timestamp),
            SortField::asc("id", ValueKind::Int),
        ])
        .unwrap()
    }

    fn cursor_at(spec: &SortSpec, entry: &Entry) -> ContinuationToken {
        let encoded = token::encode(spec, entry).unwrap();
        token::decode(spec, &encoded).unwrap()
    }

    #[test]
    fn single_field_is_one_comparison() {
        let spec = SortSpec::new([SortField::asc("id", ValueKind::Int)]).unwrap();
        let cursor = cursor_at(&spec, &Entry { id: 5, created_at: at(1) });

        assert_eq!(
            cursor_predicate(&spec, &cursor).unwrap(),
            Filter::compare("id", CompareOp::Gt, 5)
        );
    }

    #[test]
    fn descending_then_ascending_shape() {
        let spec = recent();
        let cursor = cursor_at(&spec, &Entry { id: 11, created_at: at(5) });

        assert_eq!(
            cursor_predicate(&spec, &cursor).unwrap(),
            Filter::Or(vec![
                Filter::compare("created_at", CompareOp::Lt, at(5)),
                Filter::And(vec![
                    Filter::eq("created_at", at(5)),
                    Filter::compare("id", CompareOp::Gt, 11),
                ]),
            ])
        );
    }

    #[test]
    fn selects_exactly_the_records_after_the_cursor() {
        let spec = recent();
        // days [5, 5, 5, 3, 1] with ids 10..=14
        let mut entries: Vec<Entry> = [(10, 5), (11, 5), (12, 5), (13, 3), (14, 1)]
            .into_iter()
            .map(|(id, day)| Entry { id, created_at: at(day) })
            .collect();
        entries.sort_by(|a, b| spec.compare(a, b));

        for (position, entry) in entries.iter().enumerate() {
            let predicate = cursor_predicate(&spec, &cursor_at(&spec, entry)).unwrap();
            let after: Vec<i64> = entries
                .iter()
                .filter(|candidate| predicate.matches(*candidate))
                .map(|candidate| candidate.id)
                .collect();
            let expected: Vec<i64> = entries[position + 1..].iter().map(|e| e.id).collect();
            assert_eq!(after, expected, "after id {}", entry.id);
        }
    }

    #[test]
    fn rejects_cursor_of_wrong_length() {
        let single = SortSpec::new([SortField::asc("id", ValueKind::Int)]).unwrap();
        let cursor = cursor_at(&single, &Entry { id: 1, created_at: at(1) });

        let err = cursor_predicate(&recent(), &cursor).unwrap_err();
        assert!(matches!(err, PaginationError::InvalidSortSpec(_)));
    }
}

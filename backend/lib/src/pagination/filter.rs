//! Predicate trees handed to record sources.

use std::cmp::Ordering;

use super::value::{FieldAccess, KeyValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Gt,
    Lt,
}

impl CompareOp {
    fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Gt => ordering == Ordering::Greater,
            Self::Lt => ordering == Ordering::Less,
        }
    }
}

/// A filter over records, built from conjunctions, disjunctions and simple comparisons.
///
/// Every record source must be able to evaluate this shape: SQL sources
/// translate it into a `WHERE` clause, the in-memory source calls [`Filter::matches`].
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every record
    All,
    /// Matches when every child matches; an empty list matches everything
    And(Vec<Filter>),
    /// Matches when any child matches; an empty list matches nothing
    Or(Vec<Filter>),
    /// `field <op> value`
    Compare {
        field: String,
        op: CompareOp,
        value: KeyValue,
    },
    /// Text field containing `needle` as a substring (case sensitive)
    Contains { field: String, needle: String },
    /// List field with an element equal to `element`
    Includes { field: String, element: String },
}

impl Filter {
    pub fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<KeyValue>) -> Self {
        Self::Compare {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<KeyValue>) -> Self {
        Self::compare(field, CompareOp::Eq, value)
    }

    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::Contains {
            field: field.into(),
            needle: needle.into(),
        }
    }

    pub fn includes(field: impl Into<String>, element: impl Into<String>) -> Self {
        Self::Includes {
            field: field.into(),
            element: element.into(),
        }
    }

    /// Conjunction of `self` and `other`.
    ///
    /// Both sides keep their full meaning: neither can widen what the other selects.
    pub fn and(self, other: Filter) -> Filter {
        match (self, other) {
            (Filter::All, other) => other,
            (this, Filter::All) => this,
            (Filter::And(mut lhs), Filter::And(rhs)) => {
                lhs.extend(rhs);
                Filter::And(lhs)
            }
            (Filter::And(mut lhs), rhs) => {
                lhs.push(rhs);
                Filter::And(lhs)
            }
            (lhs, rhs) => Filter::And(vec![lhs, rhs]),
        }
    }

    /// Whether this filter matches nothing at all.
    pub fn is_never(&self) -> bool {
        matches!(self, Filter::Or(children) if children.is_empty())
    }

    /// Rewrites the tree without changing what it matches.
    ///
    /// Nested conjunctions and disjunctions are flattened, [`Filter::All`] only
    /// survives at the root, an empty [`Filter::Or`] only survives at the root
    /// and single-child groups are unwrapped.
    pub fn simplify(self) -> Filter {
        match self {
            Filter::And(children) => {
                let mut flat = Vec::with_capacity(children.len());
                for child in children {
                    match child.simplify() {
                        Filter::All => {}
                        never if never.is_never() => return never,
                        Filter::And(grandchildren) => flat.extend(grandchildren),
                        other => flat.push(other),
                    }
                }
                match flat.len() {
                    0 => Filter::All,
                    1 => flat.remove(0),
                    _ => Filter::And(flat),
                }
            }
            Filter::Or(children) => {
                let mut flat = Vec::with_capacity(children.len());
                for child in children {
                    match child.simplify() {
                        Filter::All => return Filter::All,
                        never if never.is_never() => {}
                        Filter::Or(grandchildren) => flat.extend(grandchildren),
                        other => flat.push(other),
                    }
                }
                match flat.len() {
                    1 => flat.remove(0),
                    _ => Filter::Or(flat),
                }
            }
            leaf => leaf,
        }
    }

    /// Evaluates the filter against a record.
    ///
    /// Comparisons against a missing field or a value of another kind do not match.
    pub fn matches<R: FieldAccess + ?Sized>(&self, record: &R) -> bool {
        match self {
            Filter::All => true,
            Filter::And(children) => children.iter().all(|child| child.matches(record)),
            Filter::Or(children) => children.iter().any(|child| child.matches(record)),
            Filter::Compare { field, op, value } => record
                .field(field)
                .and_then(|actual| actual.compare(value))
                .is_some_and(|ordering| op.holds(ordering)),
            Filter::Contains { field, needle } => match record.field(field) {
                Some(KeyValue::Text(text)) => text.contains(needle.as_str()),
                _ => false,
            },
            Filter::Includes { field, element } => record
                .list_field(field)
                .is_some_and(|items| items.iter().any(|item| item == element)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Listing {
        id: i64,
        name: &'static str,
        tags: Vec<String>,
    }

    impl FieldAccess for Listing {
        fn field(&self, name: &str) -> Option<KeyValue> {
            match name {
                "id" => Some(self.id.into()),
                "name" => Some(self.name.into()),
                _ => None,
            }
        }

        fn list_field(&self, name: &str) -> Option<&[String]> {
            (name == "tags").then_some(self.tags.as_slice())
        }
    }

    fn listing() -> Listing {
        Listing {
            id: 7,
            name: "wooden desk",
            tags: vec!["furniture".to_string(), "used".to_string()],
        }
    }

    #[test]
    fn comparisons() {
        let record = listing();

        assert!(Filter::eq("id", 7).matches(&record));
        assert!(Filter::compare("id", CompareOp::Gt, 6).matches(&record));
        assert!(!Filter::compare("id", CompareOp::Gt, 7).matches(&record));
        assert!(Filter::compare("id", CompareOp::Lt, 8).matches(&record));
        // kind mismatch and unknown fields never match
        assert!(!Filter::eq("id", "7").matches(&record));
        assert!(!Filter::eq("price", 7).matches(&record));
    }

    #[test]
    fn text_and_list_predicates() {
        let record = listing();

        assert!(Filter::contains("name", "desk").matches(&record));
        assert!(!Filter::contains("name", "Desk").matches(&record));
        assert!(Filter::includes("tags", "used").matches(&record));
        assert!(!Filter::includes("tags", "use").matches(&record));
        assert!(!Filter::includes("name", "wooden desk").matches(&record));
    }

    #[test]
    fn empty_groups() {
        let record = listing();

        assert!(Filter::And(vec![]).matches(&record));
        assert!(!Filter::Or(vec![]).matches(&record));
        assert!(Filter::All.matches(&record));
    }

    #[test]
    fn and_keeps_both_sides() {
        let caller = Filter::Or(vec![Filter::eq("id", 7), Filter::All]);
        let cursor = Filter::compare("id", CompareOp::Gt, 7);

        let combined = caller.and(cursor);
        // the caller's permissive branch cannot bypass the cursor condition
        assert!(!combined.matches(&listing()));
        assert_eq!(Filter::All.and(Filter::eq("id", 1)), Filter::eq("id", 1));
    }

    #[test]
    fn simplify_flattens_and_prunes() {
        let filter = Filter::And(vec![
            Filter::All,
            Filter::And(vec![Filter::eq("id", 1), Filter::eq("name", "a")]),
            Filter::Or(vec![Filter::Or(vec![]), Filter::eq("id", 2)]),
        ]);

        assert_eq!(
            filter.simplify(),
            Filter::And(vec![
                Filter::eq("id", 1),
                Filter::eq("name", "a"),
                Filter::eq("id", 2),
            ])
        );

        assert_eq!(Filter::And(vec![Filter::All]).simplify(), Filter::All);
        assert_eq!(
            Filter::Or(vec![Filter::eq("id", 1), Filter::All]).simplify(),
            Filter::All
        );
        assert!(Filter::And(vec![Filter::eq("id", 1), Filter::Or(vec![])])
            .simplify()
            .is_never());
    }
}

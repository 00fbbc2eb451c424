//! Sort specifications: the ordered list of fields defining a page order.

use std::{cmp::Ordering, collections::HashSet};

use super::{
    error::PaginationError,
    value::{FieldAccess, ValueKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    /// Turns the natural ordering of two values into their ordering under this direction.
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// One component of a [`SortSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortField {
    name: String,
    direction: SortDirection,
    kind: ValueKind,
}

impl SortField {
    pub fn new(name: impl Into<String>, direction: SortDirection, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            direction,
            kind,
        }
    }

    pub fn asc(name: impl Into<String>, kind: ValueKind) -> Self {
        Self::new(name, SortDirection::Ascending, kind)
    }

    pub fn desc(name: impl Into<String>, kind: ValueKind) -> Self {
        Self::new(name, SortDirection::Descending, kind)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// The type values of this field compare as
    pub fn kind(&self) -> ValueKind {
        self.kind
    }
}

/// An ordered, immutable list of sort fields defining a total order over records.
///
/// The last field is the tiebreaker and must name a column that is unique per
/// record (typically the primary key). Without it, records equal on every other
/// field have no defined relative order and pages can skip or repeat them.
///
/// ```ignore
/// let recent = SortSpec::new([
///     SortField::desc("created_at", ValueKind::Timestamp),
///     SortField::asc("id", ValueKind::Int),
/// ])?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortSpec {
    fields: Vec<SortField>,
}

impl SortSpec {
    /// Builds a sort specification.
    ///
    /// Fails with [`PaginationError::InvalidSortSpec`] when `fields` is empty
    /// or names a field more than once.
    pub fn new(fields: impl IntoIterator<Item = SortField>) -> Result<Self, PaginationError> {
        let fields: Vec<SortField> = fields.into_iter().collect();

        if fields.is_empty() {
            return Err(PaginationError::InvalidSortSpec(
                "at least one sort field is required".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(PaginationError::InvalidSortSpec(format!(
                    "field `{}` appears more than once",
                    field.name
                )));
            }
        }

        Ok(Self { fields })
    }

    /// Fields in significance order, most significant first
    pub fn fields(&self) -> &[SortField] {
        &self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = &SortField> {
        self.fields.iter()
    }

    /// Number of fields; never zero.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn direction_of(&self, name: &str) -> Option<SortDirection> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.direction)
    }

    /// The least significant field, which makes the order total.
    pub fn tiebreaker(&self) -> &SortField {
        // never empty, checked in `new`
        &self.fields[self.fields.len() - 1]
    }

    /// Stable textual description of the order, e.g. `created_at:desc,id:asc`.
    ///
    /// Embedded in continuation tokens so a token cannot be replayed against
    /// a different order.
    pub fn signature(&self) -> String {
        self.fields
            .iter()
            .map(|field| format!("{}:{}", field.name, field.direction.as_str()))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Compares two records under this order.
    ///
    /// Fields a record does not expose compare as equal; in-memory sources
    /// rely on this only for records of a single type.
    pub fn compare<R: FieldAccess + ?Sized>(&self, a: &R, b: &R) -> Ordering {
        for field in &self.fields {
            let ordering = match (a.field(&field.name), b.field(&field.name)) {
                (Some(lhs), Some(rhs)) => lhs.compare(&rhs).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            };

            let ordering = field.direction.apply(ordering);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }

        Ordering::Equal
    }
}

impl<'a> IntoIterator for &'a SortSpec {
    type Item = &'a SortField;
    type IntoIter = std::slice::Iter<'a, SortField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

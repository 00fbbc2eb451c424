//! Keyset ("cursor") pagination.
//!
//! Pages are read in a fixed multi-field order and resumed from an opaque
//! continuation token naming the sort key of the last record served, instead
//! of an offset. Inserts and deletes between requests therefore never shift
//! records across page boundaries.
//!
//! The pieces, leaves first:
//! - [`SortSpec`]: ordered `(field, direction)` list, last field unique per record
//! - [`token`]: versioned codec between a record's sort key and an opaque string
//! - [`cursor_predicate`]: builds the "strictly after this position" [`Filter`]
//! - [`PageAssembler`]: validates input, over-fetches by one and emits the next token
//!
//! Record sources implement [`RecordSource`] and records expose their sort
//! fields through [`FieldAccess`]; the engine never sees anything else.

pub mod error;
pub mod filter;
pub mod page;
pub mod predicate;
pub mod sort;
pub mod token;
pub mod value;

pub use error::{BoxError, PaginationError};
pub use filter::{CompareOp, Filter};
pub use page::{Page, PageAssembler, PageLimits, RecordSource};
pub use predicate::cursor_predicate;
pub use sort::{SortDirection, SortField, SortSpec};
pub use token::{ContinuationToken, MAX_TOKEN_LEN, TOKEN_VERSION};
pub use value::{FieldAccess, KeyValue, ValueKind};

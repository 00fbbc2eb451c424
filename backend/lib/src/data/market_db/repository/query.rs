//! Translation of pagination filters and sort specifications into diesel queries.
//!
//! Each table maps the field names used by the services onto its columns.
//! Filters reaching this module are simplified first, so the root is the only
//! place an always-true or always-false filter can appear.

use diesel::{pg::Pg, prelude::*, sql_types::Bool};
use diesel_async::RunQueryDsl;
use market_db::{
    schema::{article, comment, product},
    Article, Comment, DbConnection, Product,
};

use super::error::{RepositoryError, RepositoryResult};
use crate::pagination::{CompareOp, Filter, KeyValue, SortDirection, SortSpec};

type Condition<T> = Box<dyn BoxableExpression<T, Pg, SqlType = Bool>>;

macro_rules! compare {
    ($table:ty, $column:expr, $op:expr, $value:expr) => {{
        let condition: Condition<$table> = match $op {
            CompareOp::Eq => Box::new($column.eq($value)),
            CompareOp::Gt => Box::new($column.gt($value)),
            CompareOp::Lt => Box::new($column.lt($value)),
        };
        condition
    }};
}

/// Generates the recursive translation of a [`Filter`] tree for one table.
///
/// `None` stands for a filter matching every row.
macro_rules! translate {
    ($name:ident, $table:ty, $leaf:ident) => {
        fn $name(filter: &Filter) -> RepositoryResult<Option<Condition<$table>>> {
            match filter {
                Filter::All => Ok(None),
                Filter::And(children) => {
                    let mut combined: Option<Condition<$table>> = None;
                    for child in children {
                        if let Some(condition) = $name(child)? {
                            combined = Some(match combined {
                                Some(prev) => Box::new(prev.and(condition)),
                                None => condition,
                            });
                        }
                    }
                    Ok(combined)
                }
                Filter::Or(children) => {
                    let mut combined: Option<Condition<$table>> = None;
                    for child in children {
                        let Some(condition) = $name(child)? else {
                            return Ok(None);
                        };
                        combined = Some(match combined {
                            Some(prev) => Box::new(prev.or(condition)),
                            None => condition,
                        });
                    }
                    combined
                        .map(Some)
                        .ok_or_else(|| RepositoryError::invalid_input("empty disjunction"))
                }
                leaf => $leaf(leaf).map(Some),
            }
        }
    };
}

macro_rules! order_by {
    ($query:ident, $spec:expr, { $($name:literal => $column:expr),+ $(,)? }) => {
        for field in $spec.iter() {
            $query = match (field.name(), field.direction()) {
                $(
                    ($name, SortDirection::Ascending) => $query.then_order_by($column.asc()),
                    ($name, SortDirection::Descending) => $query.then_order_by($column.desc()),
                )+
                (other, _) => {
                    return Err(RepositoryError::invalid_input(format!(
                        "cannot order by `{other}`"
                    )))
                }
            };
        }
    };
}

/// Escapes `LIKE` wildcards so `needle` matches literally as a substring.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Values are deliberately left out: they may come from a continuation token.
fn unsupported(table: &str, filter: &Filter) -> RepositoryError {
    let field = match filter {
        Filter::Compare { field, .. }
        | Filter::Contains { field, .. }
        | Filter::Includes { field, .. } => field.as_str(),
        _ => "<group>",
    };
    RepositoryError::invalid_input(format!("unsupported filter on `{table}.{field}`"))
}

// ============ Articles ============

fn article_leaf(filter: &Filter) -> RepositoryResult<Condition<article::table>> {
    match filter {
        Filter::Compare { field, op, value } => match (field.as_str(), value) {
            ("id", KeyValue::Int(v)) => Ok(compare!(article::table, article::id, op, *v)),
            ("title", KeyValue::Text(v)) => {
                Ok(compare!(article::table, article::title, op, v.clone()))
            }
            ("created_at", KeyValue::Timestamp(v)) => {
                Ok(compare!(article::table, article::created_at, op, *v))
            }
            ("updated_at", KeyValue::Timestamp(v)) => {
                Ok(compare!(article::table, article::updated_at, op, *v))
            }
            _ => Err(unsupported("article", filter)),
        },
        Filter::Contains { field, needle } => match field.as_str() {
            "title" => Ok(Box::new(article::title.like(like_pattern(needle)))),
            "content" => Ok(Box::new(article::content.like(like_pattern(needle)))),
            _ => Err(unsupported("article", filter)),
        },
        _ => Err(unsupported("article", filter)),
    }
}

translate!(article_condition, article::table, article_leaf);

pub(super) async fn find_articles(
    conn: &mut DbConnection<'_>,
    filter: Filter,
    spec: &SortSpec,
    limit: i64,
) -> RepositoryResult<Vec<Article>> {
    let filter = filter.simplify();
    if filter.is_never() {
        return Ok(Vec::new());
    }

    let mut query = article::table.select(Article::as_select()).into_boxed();
    if let Some(condition) = article_condition(&filter)? {
        query = query.filter(condition);
    }
    order_by!(query, spec, {
        "id" => article::id,
        "title" => article::title,
        "created_at" => article::created_at,
        "updated_at" => article::updated_at,
    });

    Ok(query.limit(limit).load(conn).await?)
}

// ============ Products ============

fn product_leaf(filter: &Filter) -> RepositoryResult<Condition<product::table>> {
    match filter {
        Filter::Compare { field, op, value } => match (field.as_str(), value) {
            ("id", KeyValue::Int(v)) => Ok(compare!(product::table, product::id, op, *v)),
            ("price", KeyValue::Int(v)) => Ok(compare!(product::table, product::price, op, *v)),
            ("name", KeyValue::Text(v)) => {
                Ok(compare!(product::table, product::name, op, v.clone()))
            }
            ("created_at", KeyValue::Timestamp(v)) => {
                Ok(compare!(product::table, product::created_at, op, *v))
            }
            ("updated_at", KeyValue::Timestamp(v)) => {
                Ok(compare!(product::table, product::updated_at, op, *v))
            }
            _ => Err(unsupported("product", filter)),
        },
        Filter::Contains { field, needle } => match field.as_str() {
            "name" => Ok(Box::new(product::name.like(like_pattern(needle)))),
            "description" => Ok(Box::new(product::description.like(like_pattern(needle)))),
            _ => Err(unsupported("product", filter)),
        },
        Filter::Includes { field, element } if field == "tags" => {
            Ok(Box::new(product::tags.contains(vec![element.clone()])))
        }
        _ => Err(unsupported("product", filter)),
    }
}

translate!(product_condition, product::table, product_leaf);

pub(super) async fn find_products(
    conn: &mut DbConnection<'_>,
    filter: Filter,
    spec: &SortSpec,
    limit: i64,
) -> RepositoryResult<Vec<Product>> {
    let filter = filter.simplify();
    if filter.is_never() {
        return Ok(Vec::new());
    }

    let mut query = product::table.select(Product::as_select()).into_boxed();
    if let Some(condition) = product_condition(&filter)? {
        query = query.filter(condition);
    }
    order_by!(query, spec, {
        "id" => product::id,
        "name" => product::name,
        "price" => product::price,
        "created_at" => product::created_at,
        "updated_at" => product::updated_at,
    });

    Ok(query.limit(limit).load(conn).await?)
}

// ============ Comments ============

fn comment_leaf(filter: &Filter) -> RepositoryResult<Condition<comment::table>> {
    match filter {
        Filter::Compare { field, op, value } => match (field.as_str(), value) {
            ("id", KeyValue::Int(v)) => Ok(compare!(comment::table, comment::id, op, *v)),
            ("target_id", KeyValue::Int(v)) => {
                Ok(compare!(comment::table, comment::target_id, op, *v))
            }
            ("target_kind", KeyValue::Text(v)) => {
                Ok(compare!(comment::table, comment::target_kind, op, v.clone()))
            }
            ("created_at", KeyValue::Timestamp(v)) => {
                Ok(compare!(comment::table, comment::created_at, op, *v))
            }
            ("updated_at", KeyValue::Timestamp(v)) => {
                Ok(compare!(comment::table, comment::updated_at, op, *v))
            }
            _ => Err(unsupported("comment", filter)),
        },
        Filter::Contains { field, needle } if field == "content" => {
            Ok(Box::new(comment::content.like(like_pattern(needle))))
        }
        _ => Err(unsupported("comment", filter)),
    }
}

translate!(comment_condition, comment::table, comment_leaf);

pub(super) async fn find_comments(
    conn: &mut DbConnection<'_>,
    filter: Filter,
    spec: &SortSpec,
    limit: i64,
) -> RepositoryResult<Vec<Comment>> {
    let filter = filter.simplify();
    if filter.is_never() {
        return Ok(Vec::new());
    }

    let mut query = comment::table.select(Comment::as_select()).into_boxed();
    if let Some(condition) = comment_condition(&filter)? {
        query = query.filter(condition);
    }
    order_by!(query, spec, {
        "id" => comment::id,
        "target_id" => comment::target_id,
        "created_at" => comment::created_at,
        "updated_at" => comment::updated_at,
    });

    Ok(query.limit(limit).load(conn).await?)
}

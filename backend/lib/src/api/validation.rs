use crate::{constants::validation::MAX_KEYWORD_LEN, error::Error};

/// Parses a path id, which must be a positive integer.
pub fn parse_id(raw: &str) -> Result<i64, Error> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Error::BadRequest(format!("Invalid id: {raw}"))),
    }
}

/// Validates that `value` is non-empty (ignoring surrounding whitespace)
/// and at most `max` characters long.
pub fn validate_text(field: &str, value: &str, max: usize) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::BadRequest(format!("{field} must not be empty")));
    }
    validate_max_len(field, value, max)
}

/// Validates that `value` is at most `max` characters long.
pub fn validate_max_len(field: &str, value: &str, max: usize) -> Result<(), Error> {
    if value.chars().count() > max {
        return Err(Error::BadRequest(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Normalizes a search keyword, `None` when no search was requested.
pub fn normalize_keyword(keyword: Option<String>) -> Result<Option<String>, Error> {
    match keyword {
        Some(keyword) if !keyword.is_empty() => {
            validate_max_len("keyword", &keyword, MAX_KEYWORD_LEN)?;
            Ok(Some(keyword))
        }
        _ => Ok(None),
    }
}

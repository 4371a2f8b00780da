use std::str::FromStr;

use super::types::{Sort, SortDirection};
use crate::error::GatewayError;

/// Convert a camelCase field name to the backend's snake_case column name.
///
/// Every ASCII uppercase letter becomes `_` followed by its lowercase form.
pub fn camel_to_snake(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 4);
    for c in field.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

impl FromStr for SortDirection {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(GatewayError::InvalidRequest(format!("Invalid sort order: {}", s)))
        }
    }
}

impl FromStr for Sort {
    type Err = GatewayError;

    /// Parses `"createdAt desc"`; the direction defaults to ascending
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut it = s.split_whitespace();
        let field = it
            .next()
            .ok_or_else(|| GatewayError::InvalidRequest("Sort field cannot be empty".to_string()))?;
        let order = match it.next() {
            Some(dir) => dir.parse()?,
            None => SortDirection::Asc,
        };
        Ok(Sort::new(field, order))
    }
}

use super::query_filter::flatten_filter;
use super::query_sort::camel_to_snake;
use super::types::{ListParams, Pagination, QueryPairs, ReferenceParams};
use crate::error::GatewayError;
use crate::models::RecordId;

pub struct QueryBuilder;

impl QueryBuilder {
    /// `{filter…}&sort=&order=&skip=&limit=` for collection listing
    pub fn list_query(params: &ListParams) -> Result<QueryPairs, GatewayError> {
        let (skip, _) = Self::validate_pagination(&params.pagination)?;

        let mut pairs = flatten_filter(&params.filter);
        pairs.set("sort", camel_to_snake(&params.sort.field));
        pairs.set("order", params.sort.order.as_lower());
        pairs.set("skip", skip.to_string());
        pairs.set("limit", params.pagination.limit().to_string());
        Ok(pairs)
    }

    /// `{filter…}&{target}=id&_sort=&_order=&_start=&_end=` for reference listing.
    ///
    /// Field and direction go out as given, without case conversion.
    pub fn reference_query(params: &ReferenceParams) -> Result<QueryPairs, GatewayError> {
        let (start, end) = Self::validate_pagination(&params.pagination)?;
        if params.target.is_empty() {
            return Err(GatewayError::InvalidRequest("Reference target cannot be empty".to_string()));
        }

        let mut pairs = flatten_filter(&params.filter);
        pairs.set(&params.target, params.id.to_string());
        pairs.set("_sort", params.sort.field.clone());
        pairs.set("_order", params.sort.order.as_upper());
        pairs.set("_start", start.to_string());
        pairs.set("_end", end.to_string());
        Ok(pairs)
    }

    /// `id=1&id=2…`
    pub fn ids_query(ids: &[RecordId]) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        for id in ids {
            pairs.push("id", id.to_string());
        }
        pairs
    }

    /// Start and exclusive end offsets of a valid page
    fn validate_pagination(pagination: &Pagination) -> Result<(u64, u64), GatewayError> {
        if pagination.page == 0 {
            return Err(GatewayError::InvalidRequest("Page numbers start at 1".to_string()));
        }
        if pagination.per_page == 0 {
            return Err(GatewayError::InvalidRequest("perPage must be at least 1".to_string()));
        }
        match (pagination.skip(), pagination.end()) {
            (Some(start), Some(end)) => Ok((start, end)),
            _ => Err(GatewayError::InvalidRequest(format!(
                "Page {} of {} records is out of range",
                pagination.page, pagination.per_page
            ))),
        }
    }
}

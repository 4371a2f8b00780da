pub mod types;
pub mod query_builder;
pub mod query_filter;
pub mod query_sort;

pub use types::*;
pub use query_builder::QueryBuilder;
pub use query_filter::flatten_filter;
pub use query_sort::camel_to_snake;

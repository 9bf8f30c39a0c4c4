pub mod abilities;
pub mod query;
pub mod schema;
pub mod taxonomy;

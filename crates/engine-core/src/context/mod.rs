pub mod env;
pub mod query;

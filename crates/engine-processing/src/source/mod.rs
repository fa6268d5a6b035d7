pub mod locator;
pub mod paginator;
pub mod reader;

pub mod backend;
pub mod operators;
pub mod utils;

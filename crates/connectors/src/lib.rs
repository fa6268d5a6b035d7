pub mod error;
pub mod fetcher;
pub mod html;
pub mod http;

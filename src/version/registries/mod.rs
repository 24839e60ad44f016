//! Lookup source implementations

pub mod http;

pub use http::HttpVersionSource;

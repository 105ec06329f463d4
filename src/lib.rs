pub mod config;
pub mod enumerate;
pub mod errors;
pub mod resolution;
pub mod retry;
pub mod scrape;
pub mod search;
pub mod sink;
pub mod sparql;
pub mod types;

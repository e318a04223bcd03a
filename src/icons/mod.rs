mod cache;
mod fetch;

pub use cache::{IconCache, IconState};
pub use fetch::{IconFetcher, NullFetcher};

pub mod aggregate;
pub mod filter;

pub use aggregate::process_stats;
pub use filter::{filter_repositories, pattern_regex};

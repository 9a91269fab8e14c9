pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod model;
pub mod output;
pub mod stats;
pub mod util;

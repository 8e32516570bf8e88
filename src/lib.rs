//! Nation Radar - leaderboard aggregation over pre-scored community posts

pub mod aggregator_core;
pub mod config;
pub mod sqlite_pragma;

mod tests;

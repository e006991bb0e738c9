pub mod defender;
pub mod defender_stats;

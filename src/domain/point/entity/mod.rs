pub mod matchup;
pub mod point;
pub mod point_defender;

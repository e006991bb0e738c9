pub mod team;
pub mod team_member;

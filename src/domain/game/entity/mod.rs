pub mod activity;
pub mod available_defender;
pub mod game;
pub mod offensive_player;

pub mod access;
pub mod auth;
pub mod defender;
pub mod export;
pub mod game;
pub mod health;
pub mod line;
pub mod lineup;
pub mod live;
pub mod point;
pub mod team;
pub mod user;

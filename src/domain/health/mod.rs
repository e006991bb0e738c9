pub mod dto;
pub mod handler;
mod service;

pub use service::{init_start_time, uptime_secs};

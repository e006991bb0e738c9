pub mod dto;
pub mod handler;
pub mod report;
pub mod service;

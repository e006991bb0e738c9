mod service;

pub use service::AccessGate;

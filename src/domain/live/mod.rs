pub mod event;
pub mod handler;
pub mod relay;

pub use event::LiveEvent;
pub use relay::GameRelay;

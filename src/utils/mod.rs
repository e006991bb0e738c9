pub mod auth;
pub mod error;
pub mod jwt;
pub mod logging;
pub mod password;
pub mod random;
pub mod response;

pub use response::BaseResponse;
pub use response::ErrorResponse;

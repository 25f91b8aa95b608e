//! API layer - HTTP entry points.

pub mod http;
pub mod session;

pub use session::SessionToken;

//! Request handlers.

pub mod feedback;
pub mod health;

pub use feedback::*;
pub use health::*;

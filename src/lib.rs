//! libris application library
//!
//! Views for the library catalog client: login and signup forms, the book
//! dashboard and the profile page, all sharing one session through
//! [`AppContext`].

pub mod context;
pub mod error;
pub mod modules;
pub mod utils;

pub use context::AppContext;
pub use error::ViewError;

/// Re-export commonly used types
pub use modules::*;

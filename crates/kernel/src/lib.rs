//! Core types shared across libris crates: settings, session and view lifecycle.

pub mod session;
pub mod settings;
pub mod store;
pub mod view;

pub use session::{Session, User};
pub use settings::Settings;
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use view::View;

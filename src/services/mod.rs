//! Service layer between the HTTP handlers and the store.

mod summary;
mod updates;

pub use summary::*;
pub use updates::*;

use std::sync::Arc;

/// Clock shared between services and request handlers.
pub type SharedClock = Arc<dyn mockable::Clock + Send + Sync>;

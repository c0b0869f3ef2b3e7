// State persistence — JSON document on disk

pub mod document;
pub mod store;

pub use document::{StateDocument, MAX_RESTORED_CAPACITY, STATE_VERSION};
pub use store::{FreshReason, LoadedState, StateOrigin, StateStore};

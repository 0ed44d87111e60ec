//! Application state

pub mod app_state;
pub mod flow_locks;

pub use app_state::AppState;
pub use flow_locks::KeyedLocks;

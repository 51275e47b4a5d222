//! Signed-in user state and the flows that change it.

pub mod manager;
pub mod state;

pub use manager::SessionManager;
pub use state::{AuthSnapshot, SessionState};

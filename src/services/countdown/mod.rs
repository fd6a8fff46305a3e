pub mod matcher;
pub mod models;

pub use matcher::select_relevant;
pub use models::{CountdownState, UrgencyLevel};

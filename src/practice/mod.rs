//! The two screens of the app and the navigation between them.
//!
//! - `entry`: word input and validation
//! - `session`: one practice screen's recognition state machine
//! - `router`: replace-only navigation
//! - `render`: text output for both screens

mod entry;
mod render;
mod router;
mod session;

pub use entry::{Word, validate_word};
pub use render::{render_attempt, render_feedback_json};
pub use router::{Route, Router};
pub use session::PracticeSession;

//! Terminal interaction

mod progress;
pub mod prompt;

pub use progress::ProgressReporter;
pub use prompt::confirm_direction;

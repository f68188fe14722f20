// Chat session: controller, lifecycle states, and canned fallback content.

pub mod controller;
pub mod fallback;
pub mod prompts;
pub mod state;

pub use controller::{ChatController, SessionSummary};
pub use fallback::FallbackPicker;
pub use state::ChatState;

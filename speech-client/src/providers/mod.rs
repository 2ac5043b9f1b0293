//! Speech provider implementations

mod gradio;
pub mod mock;

pub use gradio::GradioTtsProvider;
pub use mock::MockProvider;

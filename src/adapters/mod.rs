// Adapters layer: concrete clients for the external services behind the domain ports.

pub mod facebook;
pub mod gemini;
pub mod http;
pub mod image_api;

pub use facebook::FacebookPublisher;
pub use gemini::GeminiPromptGenerator;
pub use image_api::ImageApiGenerator;

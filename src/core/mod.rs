pub mod job;
pub mod scheduler;

pub use crate::domain::model::{ImageReference, JobOutcome, JobReport, PostResult, Prompt};
pub use crate::domain::ports::{ImageSource, PromptSource, Publisher, ScheduledJob};
pub use crate::utils::error::Result;

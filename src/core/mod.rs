pub mod handler;
pub mod prompt;

pub use crate::domain::model::{GenerationRequest, HttpEvent, HttpResponse, RoadmapRequest};
pub use crate::domain::ports::TextGenerator;
pub use crate::utils::error::Result;

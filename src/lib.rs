pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::gemini::GeminiClient;
pub use config::GeneratorConfig;
pub use core::handler::RoadmapHandler;
pub use domain::model::{HttpEvent, HttpResponse};
pub use utils::error::{Result, RoadmapError};

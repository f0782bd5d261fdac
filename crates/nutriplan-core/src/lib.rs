//! Diet-plan generation: from a user profile to a normalized weekly plan.

pub mod credential;
pub mod error;
pub mod generation;
pub mod persistence;
pub mod pipeline;
pub mod plan;
pub mod profile;
pub mod store;

pub use error::PipelineError;
pub use pipeline::PlanPipeline;

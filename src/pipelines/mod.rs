//! Pipelines.
//!
//! Provides a light [pipeline::Pipeline] trait, implemented by the
//! corpus disambiguation pipeline [wsd::WsdPipeline].
#[allow(clippy::module_inception)]
pub mod pipeline;
pub mod wsd;

pub use pipeline::Pipeline;
pub use wsd::WsdPipeline;

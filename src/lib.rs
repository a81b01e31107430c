//! Content verification pipeline
//!
//! Classifies submitted content on two axes (was it likely machine-generated,
//! and is its factual content corroborated by public reference sources) and
//! combines both into a single risk verdict.

pub mod model;
pub mod oracle;
pub mod retriever;
pub mod service;

#[cfg(test)]
mod testing;

pub use model::{
    FactCheckResult, FinalVerdict, GenerationLikelihoodResult, PipelineConfig, PipelineReport,
};
pub use service::{CancellationToken, VerificationPipeline, VerificationRequest};

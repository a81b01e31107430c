pub mod cancellation;
pub mod claim_extraction;
pub mod fact_check;
pub mod governor;
pub mod likelihood;
pub mod pipeline;
pub mod verdict;

pub use cancellation::CancellationToken;
pub use claim_extraction::ClaimExtractor;
pub use fact_check::{CascadeProvider, FactChecker, ProviderFinding};
pub use governor::{FixedDelayGovernor, RateGovernor};
pub use likelihood::{Content, GenerationLikelihoodEstimator, ImageSource};
pub use pipeline::{PipelineError, VerificationPipeline, VerificationRequest};
pub use verdict::synthesize;

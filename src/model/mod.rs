pub mod claims;
pub mod config;
pub mod fact_check;
pub mod likelihood;
pub mod report;
pub mod verdict;

pub use claims::{ExtractedData, ExtractionResult};
pub use config::{OracleConfig, PipelineConfig, ProviderConfig};
pub use fact_check::{FactCheckResult, OverallVerdict, TruthState, VerificationRecord};
pub use likelihood::{ConfidenceLevel, GenerationLikelihoodResult};
pub use report::{ContentKind, PipelineReport};
pub use verdict::{FinalVerdict, RiskLevel, VerdictCategory};

//! Version management: bump classification, AI analysis and semver bumping.

pub mod bump;
pub mod classifier;
pub mod decision;
pub mod llm_analysis;

pub use bump::{apply_bump_to_version, base_version_from_tag, BumpType};
pub use classifier::classify;
pub use decision::BumpDecision;
pub use llm_analysis::{analyze_release, AnalysisSource};

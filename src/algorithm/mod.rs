/// Merge policy over classifier outputs and the fallback naming pass
pub mod aggregator;
/// End-to-end analysis pipeline with concurrent classifier stages
pub mod executor;
/// Semantic tile groups derived from named tiles
pub mod groups;
/// Persisted metadata records
pub mod metadata;
/// Manual override application
pub mod overrides;
/// Pure sprite selection renaming
pub mod renaming;
/// Consolidated validation report
pub mod validation;

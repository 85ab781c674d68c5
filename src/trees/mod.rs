/// Gain-ratio tree induction and classification
pub mod classifier;
/// Tree node representation
pub mod node;
/// Growth and pruning parameters
pub mod params;
/// Reduced-error pruning
pub mod prune;

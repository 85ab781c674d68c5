//! # Rusty-tree
//!
//! `rusty-tree` grows decision trees over categorical data. Splits are chosen by
//! information gain ratio, trees are simplified with reduced-error pruning against
//! a validation set, and predictions are scored with accuracy, precision and recall.
//!
//! ## Getting Started
//!
//! To use `rusty-tree`, add the following to your `Cargo.toml` file:
//!
//! ```toml
//! [dependencies]
//! rusty-tree = "*"
//! ```
//!
//! ## Example Usage
//!
//! Here's how you can fit, prune and score a tree on a small dataset:
//!
//! ```rust
//! use rusty_tree::data::dataset::Dataset;
//! use rusty_tree::trees::classifier::DecisionTreeClassifier;
//!
//! let column = |values: &[&str]| values.iter().map(|v| v.to_string()).collect::<Vec<_>>();
//!
//! let train = Dataset::new(vec![
//!     ("a".to_string(), column(&["x", "x", "y", "y"])),
//!     ("d".to_string(), column(&["1", "1", "0", "0"])),
//! ])
//! .unwrap();
//! let validation = Dataset::new(vec![
//!     ("a".to_string(), column(&["x", "y"])),
//!     ("d".to_string(), column(&["1", "0"])),
//! ])
//! .unwrap();
//!
//! let mut model = DecisionTreeClassifier::new();
//! model.fit(&train, "d").unwrap();
//! model.prune(&validation).unwrap();
//!
//! let result = model.score(&validation).unwrap();
//! assert_eq!(result.accuracy, 1.0);
//! print!("{}", model.root().unwrap());
//! ```

/// Dataset and data ingestion utilities
pub mod data;
/// Error type shared by the crate
pub mod error;
/// Entropy, information gain and gain ratio
pub mod information;
/// Functions for evaluating model performance
pub mod metrics;
/// Decision trees
pub mod trees;

pub use error::{Result, TreeError};

/// Binary confusion matrix and classification scores
pub mod confusion;

//! Core Module - Scoring Pipeline
//!
//! Input collection, logistic scoring and classification. Everything here
//! is pure and synchronous.

pub mod classifier;
pub mod collector;
pub mod predictor;
pub mod scorer;

pub use classifier::*;
pub use collector::*;
pub use predictor::*;
pub use scorer::*;

//! Adaptive mastery tracking for guided study.
//!
//! - [`mastery`]: difficulty classification and the mastery update formula
//! - [`ledger`]: per knowledge point state, history and persistence
//! - [`graph`]: prerequisite graph and study ordering
//! - [`services`]: grader score -> recorded mastery pipeline

pub mod config;
pub mod graph;
pub mod ledger;
pub mod logging;
pub mod mastery;
pub mod services;

pub use config::Config;
pub use graph::{topological_order, GraphError, KnowledgeGraph};
pub use ledger::{KnowledgePoint, Ledger, LedgerStore, ProgressSummary, SharedLedger};
pub use mastery::{DifficultyClassifier, DifficultyTier, MasteryConfig, MasteryEstimate, MasteryEstimator};
pub use services::{EvaluationService, GradedResponse};

pub mod evaluation;

pub use evaluation::{
    EvaluationError, EvaluationOutcome, EvaluationService, GradedResponse, ProgressDirection,
};

//! Progress Aggregator: rolls step progress up into path progress.

use crate::models::learning_path::{LearningPath, LearningPathStep, StepStatus};

/// Explicit progress wins; otherwise a completed step counts as 100, anything else 0.
pub fn effective_progress(step: &LearningPathStep) -> f64 {
    match step.progress_percentage {
        Some(p) => p,
        None if step.status == StepStatus::Completed.as_str() => 100.0,
        None => 0.0,
    }
}

/// Recomputes `path.progress_percentage` from its steps and returns it.
///
/// Mean of effective step progress, rounded to 2 decimals; 0.0 for a path
/// without steps. Run after every step mutation; reads never refresh it.
pub fn recompute_progress(path: &mut LearningPath) -> f64 {
    let progress = if path.steps.is_empty() {
        0.0
    } else {
        let total: f64 = path.steps.iter().map(effective_progress).sum();
        round2(total / path.steps.len() as f64)
    };
    path.progress_percentage = progress;
    progress
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

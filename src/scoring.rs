//! Star scoring for quiz results.
//!
//! A quiz run produces a raw (correct, total) pair; this module maps it to
//! the 0-3 star rating that drives completion and unlocking.

use thiserror::Error;

/// The rating that marks a story as mastered.
pub const MAX_STARS: u8 = 3;

/// Error type for quiz scoring.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoringError {
    #[error("cannot score a quiz with no questions")]
    NoQuestions,
    #[error("correct count {correct} exceeds question count {total}")]
    CorrectExceedsTotal { correct: u32, total: u32 },
}

/// Map a quiz result to a star rating.
///
/// Thresholds are inclusive lower bounds on the percentage of correct
/// answers, checked high to low: 90% earns 3 stars, 70% earns 2, 50% earns
/// 1, anything below earns 0. Comparisons use integer arithmetic so boundary
/// results never drift.
///
/// A quiz set must contain at least one question before it is scored;
/// `total == 0` is rejected rather than left undefined.
pub fn compute_stars(correct: u32, total: u32) -> Result<u8, ScoringError> {
    if total == 0 {
        return Err(ScoringError::NoQuestions);
    }
    if correct > total {
        return Err(ScoringError::CorrectExceedsTotal { correct, total });
    }

    // correct/total >= N/100  <=>  correct * 100 >= N * total
    let scaled = u64::from(correct) * 100;
    let total = u64::from(total);

    let stars = if scaled >= 90 * total {
        3
    } else if scaled >= 70 * total {
        2
    } else if scaled >= 50 * total {
        1
    } else {
        0
    };

    Ok(stars)
}

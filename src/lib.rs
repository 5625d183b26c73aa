//! Story-based memory training engine.
//!
//! This crate provides:
//! - A static story catalog with staged quiz banks
//! - Star scoring for quiz results (0-3 stars from answer accuracy)
//! - A progress/unlock state machine with durable JSON persistence
//! - Catalog projection into per-story views for the presentation layer
//!
//! # Quick Start
//!
//! ```ignore
//! use snairy_core::{FileBackend, StoryTrainer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let trainer = StoryTrainer::builtin(FileBackend::new("./data"));
//!
//!     // The user answered 9 of 10 questions correctly: 3 stars,
//!     // story completed, next story unlocked.
//!     let outcome = trainer.submit_quiz("pig-story", 9, 10).await.unwrap();
//!     println!("earned {} stars", outcome.stars);
//!
//!     for view in trainer.projected_catalog().await {
//!         println!("{}: unlocked={}", view.story.title, view.unlocked);
//!     }
//! }
//! ```

pub mod catalog;
pub mod progress;
pub mod scoring;
pub mod testing;
pub mod trainer;

// Primary public API
pub use catalog::{builtin_catalog, Catalog, CatalogError, QuizKind, QuizQuestion, QuizSets, StoryDefinition};
pub use progress::{
    FileBackend, KeyValueBackend, ProgressError, ProgressRecord, ProgressStore, PROGRESS_KEY,
};
pub use scoring::{compute_stars, ScoringError, MAX_STARS};
pub use testing::{FailingBackend, MemoryBackend};
pub use trainer::{QuizOutcome, StoryTrainer, StoryView};

/**
 * Multiple-choice flashcards with spaced repetition.
 *
 * Questions that have never been answered, or that are often answered wrong, are drawn
 * more often when a practice round is put together. See `repetition` for the details.
 *
 * Version: October 2026
 */
#[macro_use]
pub mod iohelper;
pub mod common;
pub mod database;
pub mod history;
pub mod logging;
pub mod persistence;
pub mod quiz;
pub mod repetition;
pub mod session;
pub mod ui;

pub use common::{QuizError, Result};
pub use history::HistoryLedger;
pub use persistence::{HistoryRepository, QuizRepository};
pub use quiz::{HistoryRecord, PrioritizedQuestion, Priority, Question, QuestionStats, QuizConfig};
pub use session::QuizSession;

/**
 * Data structures for questions, their answer statistics, and the derived
 * per-round priority.
 *
 * The serialized field names follow the layout of the data files (`question`,
 * `correct`, `lastAnswered`, ...) rather than the Rust field names.
 *
 * Version: October 2026
 */
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::common::{QuizError, Result};


/// Represents a multiple-choice question.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: u64,
    #[serde(rename = "question")]
    pub text: String,
    /// The candidate answers, in the order they are displayed.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    #[serde(rename = "correct")]
    pub correct_index: usize,
}


/// Aggregated results of answering a single question.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionStats {
    pub attempts: u32,
    #[serde(rename = "correct")]
    pub correct_count: u32,
    #[serde(rename = "lastAnswered", default)]
    pub last_answered: Option<NaiveDate>,
}


/// How urgently a question should be asked. The numeric value of each level is also its
/// weight when drawing questions for a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Answered well and recently.
    Mastered,
    Steady,
    /// Answered well, but not for a week or more.
    Aging,
    /// Answered correctly less than 70% of the time.
    Struggling,
    /// Never answered.
    Unseen,
}


/// A question annotated with its priority for the current round.
#[derive(Debug, Clone, PartialEq)]
pub struct PrioritizedQuestion {
    pub question: Question,
    pub priority: Priority,
    pub correct_rate: f64,
    /// Whole days since the question was last answered, or `NEVER_ANSWERED`.
    pub days_since_last_answer: u32,
}


#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuizConfig {
    pub questions_per_round: usize,
}


/// Represents the result of answering a question on a particular occasion.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub question_id: u64,
    pub question_text: String,
    pub selected_answer: usize,
    pub correct_answer: usize,
    pub is_correct: bool,
    pub timestamp: DateTime<Utc>,
}


/// Stand-in for `days_since_last_answer` when a question has never been answered.
pub const NEVER_ANSWERED: u32 = 999;
pub const DEFAULT_QUESTIONS_PER_ROUND: usize = 5;


/// The current date in UTC, which is the date stored with an answer.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}


impl Question {
    /// Check the invariants that the rest of the crate relies on: at least two options,
    /// and a correct index that points at one of them.
    pub fn validate(&self) -> Result<()> {
        if self.options.len() < 2 {
            return Err(QuizError::InvalidQuestion {
                id: self.id,
                message: format!("expected at least 2 options, got {}", self.options.len()),
            });
        }

        if self.correct_index >= self.options.len() {
            return Err(QuizError::InvalidQuestion {
                id: self.id,
                message: format!(
                    "correct answer {} is out of range for {} options",
                    self.correct_index,
                    self.options.len(),
                ),
            });
        }
        Ok(())
    }

    pub fn is_correct(&self, selected_answer: usize) -> bool {
        selected_answer == self.correct_index
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }
}


impl QuestionStats {
    /// Return the stats after one more attempt made on `today`.
    pub fn record_attempt(&self, is_correct: bool, today: NaiveDate) -> Self {
        QuestionStats {
            attempts: self.attempts.saturating_add(1),
            correct_count: if is_correct {
                self.correct_count.saturating_add(1)
            } else {
                self.correct_count
            },
            last_answered: Some(today),
        }
    }

    /// Return `false` if the stats claim more correct answers than attempts.
    pub fn is_consistent(&self) -> bool {
        self.correct_count <= self.attempts
    }
}


impl Priority {
    pub fn weight(self) -> usize {
        match self {
            Priority::Mastered => 1,
            Priority::Steady => 3,
            Priority::Aging => 6,
            Priority::Struggling => 8,
            Priority::Unseen => 10,
        }
    }
}


impl QuizConfig {
    pub fn new(questions_per_round: usize) -> Result<Self> {
        let config = QuizConfig { questions_per_round };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.questions_per_round < 1 {
            Err(QuizError::InvalidConfig(String::from(
                "questionsPerRound must be at least 1",
            )))
        } else {
            Ok(())
        }
    }
}


impl Default for QuizConfig {
    fn default() -> Self {
        QuizConfig { questions_per_round: DEFAULT_QUESTIONS_PER_ROUND }
    }
}


impl HistoryRecord {
    /// Construct a record for an answer submitted now.
    pub fn new(question: &Question, selected_answer: usize, is_correct: bool) -> Self {
        HistoryRecord {
            question_id: question.id,
            question_text: question.text.clone(),
            selected_answer,
            correct_answer: question.correct_index,
            is_correct,
            timestamp: Utc::now(),
        }
    }
}

/**
 * Practice rounds and answer submission on top of the storage traits.
 *
 * Version: October 2026
 */
use chrono::NaiveDate;
use log::{debug, info};
use rand::thread_rng;
use rand::Rng;

use super::common::{QuizError, Result};
use super::persistence::{HistoryRepository, QuizRepository};
use super::quiz::{today, HistoryRecord, PrioritizedQuestion, Question, QuestionStats, QuizConfig};
use super::repetition;


pub struct QuizSession<Q, H> {
    quiz_repo: Q,
    history_repo: H,
}


impl<Q: QuizRepository, H: HistoryRepository> QuizSession<Q, H> {
    pub fn new(quiz_repo: Q, history_repo: H) -> Self {
        QuizSession { quiz_repo, history_repo }
    }

    /// Choose the questions for a new round.
    pub fn generate_round(&self) -> Vec<PrioritizedQuestion> {
        self.generate_round_with(&mut thread_rng(), today())
    }

    /// Like `generate_round`, but with the source of randomness and the current date
    /// supplied by the caller.
    pub fn generate_round_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        today: NaiveDate,
    ) -> Vec<PrioritizedQuestion> {
        let config = self.quiz_repo.get_config();
        let mut prioritized = self.prioritize(today);
        repetition::sort_by_priority(&mut prioritized);

        let chosen = repetition::choose_questions(&prioritized, config.questions_per_round, rng);
        debug!(
            "Chose {} of {} question(s) for the round: {:?}",
            chosen.len(),
            prioritized.len(),
            chosen.iter().map(|q| (q.question.id, q.priority.weight())).collect::<Vec<_>>(),
        );
        chosen
    }

    /// Return every question with its priority as of `today`, in storage order.
    pub fn prioritize(&self, today: NaiveDate) -> Vec<PrioritizedQuestion> {
        // The order of the questions matters (it decides how ties are broken when
        // sorting), so the stats are fetched one at a time in storage order.
        let mut prioritized = Vec::new();
        for question in self.quiz_repo.list_questions().iter() {
            let stats = self.quiz_repo.get_stats(question.id);
            prioritized.push(repetition::calculate_priority(question, &stats, today));
        }
        prioritized
    }

    /// Check the answer, record the attempt in the stats and the history, and return
    /// whether the answer was correct.
    pub fn submit_answer(&mut self, question_id: u64, selected_answer: usize) -> Result<bool> {
        let question = self
            .quiz_repo
            .list_questions()
            .into_iter()
            .find(|q| q.id == question_id)
            .ok_or(QuizError::QuestionNotFound(question_id))?;

        let is_correct = question.is_correct(selected_answer);
        self.quiz_repo.save_stats(question_id, is_correct)?;
        self.history_repo
            .add_to_history(HistoryRecord::new(&question, selected_answer, is_correct))?;

        info!(
            "Answered question {} with {} ({})",
            question_id,
            selected_answer,
            if is_correct { "correct" } else { "incorrect" },
        );
        Ok(is_correct)
    }

    pub fn config(&self) -> QuizConfig {
        self.quiz_repo.get_config()
    }

    pub fn update_config(&mut self, config: QuizConfig) -> Result<()> {
        self.quiz_repo.save_config(&config)
    }

    pub fn history(&self) -> Vec<HistoryRecord> {
        self.history_repo.get_history()
    }

    pub fn stats_for_all_questions(&self) -> Vec<(Question, QuestionStats)> {
        let mut result = Vec::new();
        for question in self.quiz_repo.list_questions().into_iter() {
            let stats = self.quiz_repo.get_stats(question.id);
            result.push((question, stats));
        }
        result
    }

    pub fn quiz_repository(&self) -> &Q {
        &self.quiz_repo
    }
}

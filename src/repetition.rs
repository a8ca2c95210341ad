/**
 * Choose the most useful questions to ask based on past results.
 *
 * Every question is classified into one of five priorities:
 *
 *   10  never answered
 *    8  answered correctly less than 70% of the time
 *    6  answered well, but not within the last week
 *    3  everything else
 *    1  answered correctly at least 90% of the time within the last week
 *
 * A round is then drawn at random from a pool in which each question appears as many
 * times as its priority, so that an unseen question is ten times as likely to be drawn
 * as a mastered one.
 *
 * Version: October 2026
 */
use std::cmp;
use std::collections::HashSet;

use chrono::NaiveDate;
use rand::Rng;

use super::quiz::{PrioritizedQuestion, Priority, Question, QuestionStats, NEVER_ANSWERED};


// Correct rate below which a question is considered to be struggling.
const STRUGGLING_THRESHOLD: f64 = 0.7;
// Correct rate at or above which a recently answered question is considered mastered.
const MASTERED_THRESHOLD: f64 = 0.9;
// Number of days after which a question is due to be asked again.
const AGING_DAYS: u32 = 7;


/// Annotate `question` with its priority given its past `stats`, as of `today`.
pub fn calculate_priority(
    question: &Question,
    stats: &QuestionStats,
    today: NaiveDate,
) -> PrioritizedQuestion {
    let correct_rate = if stats.attempts > 0 {
        f64::from(stats.correct_count) / f64::from(stats.attempts)
    } else {
        0.0
    };
    let days_since_last_answer = days_since(stats.last_answered, today);

    let priority = if stats.attempts == 0 {
        Priority::Unseen
    } else if correct_rate < STRUGGLING_THRESHOLD {
        Priority::Struggling
    } else if correct_rate >= MASTERED_THRESHOLD && days_since_last_answer < AGING_DAYS {
        Priority::Mastered
    } else if days_since_last_answer >= AGING_DAYS {
        Priority::Aging
    } else {
        Priority::Steady
    };

    PrioritizedQuestion {
        question: question.clone(),
        priority,
        correct_rate,
        days_since_last_answer,
    }
}


fn days_since(last_answered: Option<NaiveDate>, today: NaiveDate) -> u32 {
    match last_answered {
        Some(date) => {
            // A date in the future (e.g., after a clock change) counts as today.
            let days = cmp::max(0, today.signed_duration_since(date).num_days());
            cmp::min(days, i64::from(u32::MAX)) as u32
        },
        None => NEVER_ANSWERED,
    }
}


/// Sort questions from highest to lowest priority. Questions with the same priority keep
/// their relative order.
pub fn sort_by_priority(questions: &mut Vec<PrioritizedQuestion>) {
    // `sort_by` is stable.
    questions.sort_by(|a, b| b.priority.cmp(&a.priority));
}


/// Draw up to `count` distinct questions, weighted by priority.
///
/// The pool of candidates holds each question once per unit of weight and is never
/// shrunk, so draws that land on a question that was already chosen are simply thrown
/// away. The result has `min(count, number of distinct ids)` questions.
pub fn choose_questions<R: Rng + ?Sized>(
    questions: &[PrioritizedQuestion],
    count: usize,
    rng: &mut R,
) -> Vec<PrioritizedQuestion> {
    let mut pool = Vec::new();
    for question in questions.iter() {
        for _ in 0..question.priority.weight() {
            pool.push(question);
        }
    }

    let total_distinct = questions
        .iter()
        .map(|q| q.question.id)
        .collect::<HashSet<_>>()
        .len();

    let mut chosen = Vec::new();
    let mut used_ids = HashSet::new();
    while chosen.len() < count && used_ids.len() < total_distinct {
        let candidate = pool[rng.gen_range(0..pool.len())];
        if used_ids.insert(candidate.question.id) {
            chosen.push(candidate.clone());
        }
    }
    chosen
}


/// Return `correct` as a rounded percentage of `total`, or 0 if `total` is 0.
pub fn percentage(correct: u32, total: u32) -> u32 {
    if total == 0 {
        0
    } else {
        (100.0 * f64::from(correct) / f64::from(total)).round() as u32
    }
}

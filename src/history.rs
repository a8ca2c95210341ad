/**
 * A bounded log of submitted answers, most recent first.
 *
 * Version: October 2026
 */
use std::collections::VecDeque;

use super::quiz::HistoryRecord;


/// Maximum number of records kept. Older records are dropped silently.
pub const HISTORY_CAPACITY: usize = 100;


#[derive(Debug, Clone, Default)]
pub struct HistoryLedger {
    records: VecDeque<HistoryRecord>,
}


impl HistoryLedger {
    pub fn new() -> Self {
        HistoryLedger { records: VecDeque::with_capacity(HISTORY_CAPACITY + 1) }
    }

    /// Build a ledger from previously saved records, given newest first. Anything past
    /// the capacity is discarded.
    pub fn from_records(records: Vec<HistoryRecord>) -> Self {
        let mut records: VecDeque<HistoryRecord> = records.into();
        records.truncate(HISTORY_CAPACITY);
        HistoryLedger { records }
    }

    pub fn append(&mut self, record: HistoryRecord) {
        self.records.push_front(record);
        self.records.truncate(HISTORY_CAPACITY);
    }

    /// Return a copy of the records, newest first.
    pub fn list(&self) -> Vec<HistoryRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;

    #[test]
    fn newest_records_come_first() {
        let mut ledger = HistoryLedger::new();
        ledger.append(mkrecord(1));
        ledger.append(mkrecord(2));
        ledger.append(mkrecord(3));

        let ids: Vec<u64> = ledger.list().iter().map(|r| r.question_id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn oldest_records_are_dropped_past_capacity() {
        let mut ledger = HistoryLedger::new();
        for id in 1..=101 {
            ledger.append(mkrecord(id));
        }

        let records = ledger.list();
        assert_eq!(records.len(), HISTORY_CAPACITY);
        assert_eq!(records[0].question_id, 101);
        assert_eq!(records[99].question_id, 2);
    }

    #[test]
    fn identical_records_accumulate() {
        let mut ledger = HistoryLedger::new();
        let record = mkrecord(1);
        ledger.append(record.clone());
        ledger.append(record);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn listing_returns_a_copy() {
        let mut ledger = HistoryLedger::new();
        ledger.append(mkrecord(1));

        let mut records = ledger.list();
        records.clear();
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn loading_saved_records_enforces_capacity() {
        let records: Vec<HistoryRecord> = (0..150).rev().map(mkrecord).collect();
        let ledger = HistoryLedger::from_records(records);
        assert_eq!(ledger.len(), HISTORY_CAPACITY);
        assert_eq!(ledger.list()[0].question_id, 149);
    }

    fn mkrecord(id: u64) -> HistoryRecord {
        HistoryRecord {
            question_id: id,
            question_text: format!("Question {}", id),
            selected_answer: 0,
            correct_answer: 1,
            is_correct: false,
            timestamp: Utc::now(),
        }
    }
}

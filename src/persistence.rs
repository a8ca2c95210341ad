/**
 * Storage for questions, configuration, answer statistics and history.
 *
 * Reads never fail: unreadable storage is logged and replaced by a sensible default
 * (no questions, the default configuration, zero stats, an empty history). Writes
 * report their errors so the caller can decide what to do.
 *
 * Version: October 2026
 */
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, error, warn};

use super::common::{QuizError, Result};
use super::history::HistoryLedger;
use super::quiz::{today, HistoryRecord, Question, QuestionStats, QuizConfig};


pub const QUESTIONS_FILE: &str = "questions.json";
pub const CONFIG_FILE: &str = "config.json";
pub const STATS_FILE: &str = "stats.json";
pub const HISTORY_FILE: &str = "history.json";


pub trait QuizRepository {
    /// Return every question, in storage order.
    fn list_questions(&self) -> Vec<Question>;
    fn get_config(&self) -> QuizConfig;
    fn save_config(&mut self, config: &QuizConfig) -> Result<()>;
    /// Return the stats for the question, or zero stats if it has never been answered.
    fn get_stats(&self, question_id: u64) -> QuestionStats;
    /// Record one attempt at the question, answered today.
    fn save_stats(&mut self, question_id: u64, is_correct: bool) -> Result<()>;
}


pub trait HistoryRepository {
    /// Return past answers, newest first.
    fn get_history(&self) -> Vec<HistoryRecord>;
    fn add_to_history(&mut self, record: HistoryRecord) -> Result<()>;
}


type StoredStats = BTreeMap<String, QuestionStats>;


/// Keeps each kind of data in its own JSON file in a directory.
#[derive(Debug)]
pub struct JsonRepository {
    directory: PathBuf,
}


impl JsonRepository {
    pub fn new(directory: &Path) -> Self {
        JsonRepository { directory: directory.to_path_buf() }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.directory.join(name)
    }

    fn load_stats(&self) -> Result<StoredStats> {
        match fs::read_to_string(self.path(STATS_FILE)) {
            Ok(data) => serde_json::from_str(&data).map_err(QuizError::Json),
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(QuizError::Io(e)),
        }
    }
}


impl QuizRepository for JsonRepository {
    fn list_questions(&self) -> Vec<Question> {
        match load_questions(&self.path(QUESTIONS_FILE)) {
            Ok(questions) => questions,
            Err(e) => {
                error!("Failed to load questions: {}", e);
                Vec::new()
            }
        }
    }

    fn get_config(&self) -> QuizConfig {
        let path = self.path(CONFIG_FILE);
        if !path.exists() {
            return QuizConfig::default();
        }

        let config = fs::read_to_string(&path)
            .map_err(QuizError::Io)
            .and_then(|data| serde_json::from_str::<QuizConfig>(&data).map_err(QuizError::Json))
            .and_then(|config| config.validate().map(|_| config));

        match config {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config from '{}', using defaults: {}", path.display(), e);
                QuizConfig::default()
            }
        }
    }

    fn save_config(&mut self, config: &QuizConfig) -> Result<()> {
        config.validate()?;
        write_json(&self.directory, &self.path(CONFIG_FILE), config)
    }

    fn get_stats(&self, question_id: u64) -> QuestionStats {
        match self.load_stats() {
            Ok(stats) => {
                let stats = stats.get(&question_id.to_string()).cloned().unwrap_or_default();
                sanitize_stats(question_id, stats)
            },
            Err(e) => {
                warn!("Failed to load stats for question {}: {}", question_id, e);
                QuestionStats::default()
            }
        }
    }

    fn save_stats(&mut self, question_id: u64, is_correct: bool) -> Result<()> {
        // Not atomic: two processes answering the same question at once can lose an
        // attempt. `SqliteRepository` does not have this problem.
        let mut stats = self.load_stats()?;
        let key = question_id.to_string();
        let current = sanitize_stats(question_id, stats.get(&key).cloned().unwrap_or_default());
        let updated = current.record_attempt(is_correct, today());
        debug!("Question {}: {:?} -> {:?}", question_id, current, updated);
        stats.insert(key, updated);
        write_json(&self.directory, &self.path(STATS_FILE), &stats)
    }
}


/// Keeps the history in a JSON file, loaded once and rewritten after every answer.
#[derive(Debug)]
pub struct JsonHistoryRepository {
    path: PathBuf,
    ledger: HistoryLedger,
}


impl JsonHistoryRepository {
    pub fn open(directory: &Path) -> Self {
        let path = directory.join(HISTORY_FILE);
        let ledger = match load_history(&path) {
            Ok(records) => HistoryLedger::from_records(records),
            Err(e) => {
                warn!("Failed to load history from '{}': {}", path.display(), e);
                HistoryLedger::new()
            }
        };
        JsonHistoryRepository { path, ledger }
    }
}


impl HistoryRepository for JsonHistoryRepository {
    fn get_history(&self) -> Vec<HistoryRecord> {
        self.ledger.list()
    }

    fn add_to_history(&mut self, record: HistoryRecord) -> Result<()> {
        // The ledger only changes once the file has been written.
        let mut ledger = self.ledger.clone();
        ledger.append(record);
        let directory = self.path.parent().map(Path::to_path_buf).unwrap_or_default();
        write_json(&directory, &self.path, &ledger.list())?;
        self.ledger = ledger;
        Ok(())
    }
}


/// A ledger on its own is a history that lasts as long as the process.
impl HistoryRepository for HistoryLedger {
    fn get_history(&self) -> Vec<HistoryRecord> {
        self.list()
    }

    fn add_to_history(&mut self, record: HistoryRecord) -> Result<()> {
        self.append(record);
        Ok(())
    }
}


/// Holds everything in memory. Useful for tests and for embedding the quiz in another
/// program that manages storage itself.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    questions: Vec<Question>,
    config: QuizConfig,
    stats: HashMap<u64, QuestionStats>,
}


impl MemoryRepository {
    pub fn new(questions: Vec<Question>) -> Self {
        MemoryRepository {
            questions,
            config: QuizConfig::default(),
            stats: HashMap::new(),
        }
    }

    pub fn with_config(mut self, config: QuizConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the stored stats for a question, e.g. to restore them from elsewhere.
    pub fn set_stats(&mut self, question_id: u64, stats: QuestionStats) {
        self.stats.insert(question_id, stats);
    }
}


impl QuizRepository for MemoryRepository {
    fn list_questions(&self) -> Vec<Question> {
        self.questions.clone()
    }

    fn get_config(&self) -> QuizConfig {
        self.config.clone()
    }

    fn save_config(&mut self, config: &QuizConfig) -> Result<()> {
        config.validate()?;
        self.config = config.clone();
        Ok(())
    }

    fn get_stats(&self, question_id: u64) -> QuestionStats {
        self.stats.get(&question_id).cloned().unwrap_or_default()
    }

    fn save_stats(&mut self, question_id: u64, is_correct: bool) -> Result<()> {
        let stats = self.get_stats(question_id).record_attempt(is_correct, today());
        self.stats.insert(question_id, stats);
        Ok(())
    }
}


/// Load and validate the questions in a JSON file. Questions that fail validation, or
/// that reuse an id seen earlier in the file, are skipped with a warning.
pub fn load_questions(path: &Path) -> Result<Vec<Question>> {
    let data = fs::read_to_string(path).map_err(QuizError::Io)?;
    let parsed: Vec<Question> = serde_json::from_str(&data).map_err(QuizError::Json)?;

    let mut seen = HashSet::new();
    let mut questions = Vec::new();
    for question in parsed.into_iter() {
        if let Err(e) = question.validate() {
            warn!("Skipping question in '{}': {}", path.display(), e);
            continue;
        }
        if !seen.insert(question.id) {
            warn!("Skipping question in '{}': duplicate id {}", path.display(), question.id);
            continue;
        }
        questions.push(question);
    }
    debug!("Loaded {} question(s) from '{}'", questions.len(), path.display());
    Ok(questions)
}


fn load_history(path: &Path) -> Result<Vec<HistoryRecord>> {
    match fs::read_to_string(path) {
        Ok(data) => serde_json::from_str(&data).map_err(QuizError::Json),
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(QuizError::Io(e)),
    }
}


/// Stats where more answers were correct than were given cannot be trusted, so the
/// correct count is capped at the number of attempts.
pub fn sanitize_stats(question_id: u64, stats: QuestionStats) -> QuestionStats {
    if stats.is_consistent() {
        stats
    } else {
        warn!(
            "Question {} has {} correct answer(s) out of {} attempt(s)",
            question_id, stats.correct_count, stats.attempts,
        );
        QuestionStats { correct_count: stats.attempts, ..stats }
    }
}


fn write_json<T: serde::Serialize>(directory: &Path, path: &Path, value: &T) -> Result<()> {
    if !directory.as_os_str().is_empty() && !directory.exists() {
        fs::create_dir_all(directory).map_err(QuizError::Io)?;
    }

    let serialized = serde_json::to_string_pretty(value).map_err(QuizError::Json)?;
    fs::write(path, serialized).or(Err(QuizError::CannotWriteToFile(path.to_path_buf())))?;
    Ok(())
}

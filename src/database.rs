/**
 * Storage backed by a SQLite database. Questions are still read from a JSON file, but
 * configuration, stats and history live in the database.
 *
 * Unlike the JSON files, recording an attempt is a single statement, so two processes
 * answering the same question at the same time cannot lose an update.
 *
 * Version: October 2026
 */
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, error, warn};
use rusqlite::{params, Connection, OptionalExtension};

use super::common::{QuizError, Result};
use super::history::HISTORY_CAPACITY;
use super::persistence::{load_questions, HistoryRepository, QuizRepository};
use super::quiz::{today, HistoryRecord, Question, QuestionStats, QuizConfig};


const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS config(
      id INTEGER NOT NULL PRIMARY KEY CHECK(id = 1),
      questions_per_round INTEGER NOT NULL CHECK(questions_per_round >= 1)
    );

    CREATE TABLE IF NOT EXISTS stats(
      question INTEGER NOT NULL PRIMARY KEY,
      attempts INTEGER NOT NULL CHECK(attempts >= 0),
      correct INTEGER NOT NULL CHECK(correct >= 0 AND correct <= attempts),
      last_answered TEXT
    );

    CREATE TABLE IF NOT EXISTS history(
      id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
      question INTEGER NOT NULL,
      question_text TEXT NOT NULL,
      selected_answer INTEGER NOT NULL,
      correct_answer INTEGER NOT NULL,
      is_correct BOOLEAN NOT NULL,
      timestamp TEXT NOT NULL
    );
";


pub struct SqliteRepository {
    connection: Connection,
    questions_path: PathBuf,
}


impl SqliteRepository {
    /// Open (creating if necessary) the database at `path`. Questions are read from
    /// `questions_path`.
    pub fn open(path: &Path, questions_path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(QuizError::Io)?;
            }
        }
        let connection = Connection::open(path).map_err(QuizError::Sql)?;
        Self::with_connection(connection, questions_path)
    }

    pub fn open_in_memory(questions_path: &Path) -> Result<Self> {
        let connection = Connection::open_in_memory().map_err(QuizError::Sql)?;
        Self::with_connection(connection, questions_path)
    }

    fn with_connection(connection: Connection, questions_path: &Path) -> Result<Self> {
        connection.execute_batch(SCHEMA).map_err(QuizError::Sql)?;
        Ok(SqliteRepository { connection, questions_path: questions_path.to_path_buf() })
    }

    fn query_config(&self) -> Result<Option<QuizConfig>> {
        self.connection
            .query_row("SELECT questions_per_round FROM config WHERE id = 1", [], |row| {
                row.get::<usize, i64>(0)
            })
            .optional()
            .map_err(QuizError::Sql)
            .map(|n| n.map(|n| QuizConfig { questions_per_round: n.max(0) as usize }))
    }

    fn query_stats(&self, question_id: u64) -> Result<Option<QuestionStats>> {
        self.connection
            .query_row(
                "SELECT attempts, correct, last_answered FROM stats WHERE question = ?1",
                params![question_id as i64],
                |row| {
                    Ok(QuestionStats {
                        attempts: row.get::<usize, u32>(0)?,
                        correct_count: row.get::<usize, u32>(1)?,
                        last_answered: row.get::<usize, Option<NaiveDate>>(2)?,
                    })
                },
            )
            .optional()
            .map_err(QuizError::Sql)
    }

    fn query_history(&self) -> Result<Vec<HistoryRecord>> {
        let mut stmt = self
            .connection
            .prepare(
                "
                SELECT
                  question, question_text, selected_answer, correct_answer, is_correct,
                  timestamp
                FROM
                  history
                ORDER BY
                  id DESC
                LIMIT ?1
                ",
            )
            .map_err(QuizError::Sql)?;

        let rows = stmt
            .query_map(params![HISTORY_CAPACITY as i64], |row| {
                Ok(HistoryRecord {
                    question_id: row.get::<usize, i64>(0)? as u64,
                    question_text: row.get(1)?,
                    selected_answer: row.get::<usize, i64>(2)? as usize,
                    correct_answer: row.get::<usize, i64>(3)? as usize,
                    is_correct: row.get(4)?,
                    timestamp: row.get::<usize, DateTime<Utc>>(5)?,
                })
            })
            .map_err(QuizError::Sql)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(QuizError::Sql)?);
        }
        Ok(records)
    }
}


impl QuizRepository for SqliteRepository {
    fn list_questions(&self) -> Vec<Question> {
        match load_questions(&self.questions_path) {
            Ok(questions) => questions,
            Err(e) => {
                error!("Failed to load questions: {}", e);
                Vec::new()
            }
        }
    }

    fn get_config(&self) -> QuizConfig {
        match self.query_config() {
            Ok(Some(config)) => config,
            Ok(None) => QuizConfig::default(),
            Err(e) => {
                warn!("Failed to load config, using defaults: {}", e);
                QuizConfig::default()
            }
        }
    }

    fn save_config(&mut self, config: &QuizConfig) -> Result<()> {
        config.validate()?;
        self.connection
            .execute(
                "
                INSERT INTO config(id, questions_per_round) VALUES (1, ?1)
                ON CONFLICT(id) DO UPDATE SET questions_per_round = excluded.questions_per_round
                ",
                params![config.questions_per_round as i64],
            )
            .map_err(QuizError::Sql)?;
        Ok(())
    }

    fn get_stats(&self, question_id: u64) -> QuestionStats {
        match self.query_stats(question_id) {
            Ok(stats) => stats.unwrap_or_default(),
            Err(e) => {
                warn!("Failed to load stats for question {}: {}", question_id, e);
                QuestionStats::default()
            }
        }
    }

    fn save_stats(&mut self, question_id: u64, is_correct: bool) -> Result<()> {
        debug!("Recording attempt at question {} (correct: {})", question_id, is_correct);
        self.connection
            .execute(
                "
                INSERT INTO stats(question, attempts, correct, last_answered)
                VALUES (?1, 1, ?2, ?3)
                ON CONFLICT(question) DO UPDATE SET
                  attempts = attempts + 1,
                  correct = correct + excluded.correct,
                  last_answered = excluded.last_answered
                ",
                params![question_id as i64, is_correct as i64, today()],
            )
            .map_err(QuizError::Sql)?;
        Ok(())
    }
}


impl HistoryRepository for SqliteRepository {
    fn get_history(&self) -> Vec<HistoryRecord> {
        match self.query_history() {
            Ok(records) => records,
            Err(e) => {
                warn!("Failed to load history: {}", e);
                Vec::new()
            }
        }
    }

    fn add_to_history(&mut self, record: HistoryRecord) -> Result<()> {
        let transaction = self.connection.transaction().map_err(QuizError::Sql)?;
        transaction
            .execute(
                "
                INSERT INTO
                  history(
                    question, question_text, selected_answer, correct_answer, is_correct,
                    timestamp
                  )
                VALUES
                  (?1, ?2, ?3, ?4, ?5, ?6)
                ",
                params![
                    record.question_id as i64,
                    record.question_text,
                    record.selected_answer as i64,
                    record.correct_answer as i64,
                    record.is_correct,
                    record.timestamp,
                ],
            )
            .map_err(QuizError::Sql)?;
        transaction
            .execute(
                "
                DELETE FROM history WHERE id NOT IN (
                  SELECT id FROM history ORDER BY id DESC LIMIT ?1
                )
                ",
                params![HISTORY_CAPACITY as i64],
            )
            .map_err(QuizError::Sql)?;
        transaction.commit().map_err(QuizError::Sql)
    }
}

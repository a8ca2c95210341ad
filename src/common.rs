/**
 * Definitions of data structures used by several modules, such as `QuizError` and the
 * various structs that hold command-line arguments.
 *
 * Version: October 2026
 */
use std::error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use structopt::StructOpt;


pub type Result<T> = ::std::result::Result<T, QuizError>;


#[derive(Debug)]
pub enum QuizError {
    /// For when an answer is submitted for a question that does not exist.
    QuestionNotFound(u64),
    /// A question record that failed validation when it was loaded.
    InvalidQuestion { id: u64, message: String },
    InvalidConfig(String),
    /// For JSON errors.
    Json(serde_json::Error),
    Sql(rusqlite::Error),
    CannotWriteToFile(PathBuf),
    Io(io::Error),
    Logger(log::SetLoggerError),
    ReadlineInterrupted,
    EmptyQuiz,
}


impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            QuizError::QuestionNotFound(id) => {
                write!(f, "question with id {} not found", id)
            },
            QuizError::InvalidQuestion { id, ref message } => {
                write!(f, "invalid question {}: {}", id, message)
            },
            QuizError::InvalidConfig(ref message) => {
                write!(f, "invalid configuration: {}", message)
            },
            QuizError::Json(ref err) => {
                write!(f, "could not parse JSON ({})", err)
            },
            QuizError::Sql(ref err) => {
                write!(f, "database error ({})", err)
            },
            QuizError::CannotWriteToFile(ref path) => {
                write!(f, "cannot write to file '{}'", path.to_string_lossy())
            },
            QuizError::Io(ref err) => {
                write!(f, "IO error ({})", err)
            },
            QuizError::Logger(ref err) => {
                write!(f, "could not set up logging ({})", err)
            },
            QuizError::EmptyQuiz => {
                write!(f, "no questions found")
            },
            QuizError::ReadlineInterrupted => {
                Ok(())
            },
        }
    }
}


impl error::Error for QuizError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            QuizError::Json(ref err) => Some(err),
            QuizError::Sql(ref err) => Some(err),
            QuizError::Io(ref err) => Some(err),
            QuizError::Logger(ref err) => Some(err),
            _ => None,
        }
    }
}


/// Return `true` if the error is an IO error caused by a closed pipe, e.g. when the
/// output of the program is piped into `head`.
pub fn is_broken_pipe(e: &QuizError) -> bool {
    if let QuizError::Io(e) = e {
        e.kind() == io::ErrorKind::BrokenPipe
    } else {
        false
    }
}


/// Holds the command-line configuration for the application.
#[derive(StructOpt)]
#[structopt(name = "quizdeck", about = "Practice multiple-choice flashcards.")]
pub struct Options {
    /// Look for questions, stats and history in a particular directory.
    #[structopt(short = "d", long = "directory", parse(from_os_str))]
    pub directory: Option<PathBuf>,
    /// Keep stats, configuration and history in a SQLite database instead of JSON files.
    #[structopt(long = "sqlite")]
    pub sqlite: bool,
    /// Do not emit colorized output.
    #[structopt(long = "no-color")]
    pub no_color: bool,
    /// Log more (-v for info, -vv for debug).
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    pub verbose: u8,
    #[structopt(subcommand)]
    pub cmd: Command,
}

#[derive(StructOpt)]
pub enum Command {
    /// Take a practice round.
    #[structopt(name = "take")]
    Take,
    /// Report per-question statistics.
    #[structopt(name = "stats")]
    Stats,
    /// Show previously submitted answers, most recent first.
    #[structopt(name = "history")]
    History(HistoryOptions),
    /// Show or change the quiz configuration.
    #[structopt(name = "config")]
    Config(ConfigOptions),
    /// Print the path of the data directory.
    #[structopt(name = "path")]
    Path,
}

#[derive(StructOpt)]
pub struct HistoryOptions {
    /// Only show the first `n` entries.
    #[structopt(short = "n")]
    pub num_to_show: Option<usize>,
}

#[derive(StructOpt)]
pub struct ConfigOptions {
    /// Set the number of questions asked in each round.
    #[structopt(long = "questions-per-round")]
    pub questions_per_round: Option<usize>,
}

/**
 * Practice multiple-choice flashcards from the command line.
 *
 * Version: October 2026
 */
use std::io::Write;
use std::path::{Path, PathBuf};

use colored::*;
use log::debug;
use structopt::StructOpt;

use quizdeck::common::{is_broken_pipe, Command, ConfigOptions, HistoryOptions, Options};
use quizdeck::database::SqliteRepository;
use quizdeck::iohelper::print_with_prefix;
use quizdeck::persistence::{JsonHistoryRepository, JsonRepository, QUESTIONS_FILE};
use quizdeck::quiz::today;
use quizdeck::repetition::{calculate_priority, percentage};
use quizdeck::ui::{CmdUI, RoundResult};
use quizdeck::{my_print, my_println};
use quizdeck::{HistoryRepository, QuizConfig, QuizError, QuizRepository, QuizSession, Result};


const DATABASE_FILE: &str = "quiz.db";


fn main() {
    let options = Options::from_args();

    if options.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = quizdeck::logging::init(options.verbose) {
        eprintln!("{}: {}", "Warning".yellow(), e);
    }

    let result = run(&options);
    if let Err(e) = result {
        if !is_broken_pipe(&e) {
            eprintln!("{}: {}", "Error".red(), e);
            ::std::process::exit(2);
        }
    }
}


fn run(options: &Options) -> Result<()> {
    let directory = get_data_dir_path(options);
    debug!("Using data directory '{}'", directory.display());

    if let Command::Path = options.cmd {
        return my_println!("{}", directory.to_string_lossy());
    }

    if options.sqlite {
        let db_path = directory.join(DATABASE_FILE);
        let questions_path = directory.join(QUESTIONS_FILE);
        // Stats and history each get their own connection to the same database.
        let quiz_repo = SqliteRepository::open(&db_path, &questions_path)?;
        let history_repo = SqliteRepository::open(&db_path, &questions_path)?;
        dispatch(QuizSession::new(quiz_repo, history_repo), &options.cmd)
    } else {
        let quiz_repo = JsonRepository::new(&directory);
        let history_repo = JsonHistoryRepository::open(&directory);
        dispatch(QuizSession::new(quiz_repo, history_repo), &options.cmd)
    }
}


fn dispatch<Q: QuizRepository, H: HistoryRepository>(
    session: QuizSession<Q, H>,
    cmd: &Command,
) -> Result<()> {
    match cmd {
        Command::Take => main_take(session),
        Command::Stats => main_stats(&session),
        Command::History(options) => main_history(&session, options),
        Command::Config(options) => main_config(session, options),
        // Handled before any storage is opened.
        Command::Path => Ok(()),
    }
}


/// The main function for the `take` subcommand.
fn main_take<Q: QuizRepository, H: HistoryRepository>(
    mut session: QuizSession<Q, H>,
) -> Result<()> {
    let round = session.generate_round();
    if round.is_empty() {
        return Err(QuizError::EmptyQuiz);
    }

    let mut ui = CmdUI::new();
    let mut results = RoundResult::default();
    for prioritized in round.iter() {
        let question = &prioritized.question;
        ui.text(&question.text)?;
        ui.choices(&question.options)?;

        let selected = match ui.prompt_choice(question.options.len()) {
            Ok(Some(selected)) => selected,
            // Ctrl+D skips the question without recording an answer.
            Ok(None) => continue,
            Err(QuizError::ReadlineInterrupted) => break,
            Err(e) => return Err(e),
        };

        let is_correct = session.submit_answer(question.id, selected)?;
        results.total += 1;
        if is_correct {
            results.total_correct += 1;
            ui.correct()?;
        } else {
            ui.incorrect(Some(question.correct_option()))?;
        }
    }

    ui.results(&results)
}


/// The main function for the `stats` subcommand.
fn main_stats<Q: QuizRepository, H: HistoryRepository>(
    session: &QuizSession<Q, H>,
) -> Result<()> {
    let all = session.stats_for_all_questions();
    if all.is_empty() {
        return Err(QuizError::EmptyQuiz);
    }

    let today = today();
    for (question, stats) in all.iter() {
        let prioritized = calculate_priority(question, stats, today);
        let last_answered = stats
            .last_answered
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| String::from("never"));
        let first_prefix = format!(
            "{:>3}%  of {:>3}   {:>10}   [{:>2}]   ",
            percentage(stats.correct_count, stats.attempts),
            stats.attempts,
            last_answered,
            prioritized.priority.weight(),
        );
        print_with_prefix(&question.text, &first_prefix, Some(Color::Cyan))?;
    }
    Ok(())
}


/// The main function for the `history` subcommand.
fn main_history<Q: QuizRepository, H: HistoryRepository>(
    session: &QuizSession<Q, H>,
    options: &HistoryOptions,
) -> Result<()> {
    let mut history = session.history();
    if history.is_empty() {
        return my_println!("No answers have been recorded.");
    }

    if let Some(n) = options.num_to_show {
        history.truncate(n);
    }

    for record in history.iter() {
        let timestamp = record.timestamp.with_timezone(&chrono::Local);
        let verdict = if record.is_correct {
            "correct  ".green()
        } else {
            "incorrect".red()
        };
        let first_prefix = format!("{}  {}  ", timestamp.format("%Y-%m-%d %H:%M"), verdict);
        print_with_prefix(&record.question_text, &first_prefix, None)?;
    }
    Ok(())
}


/// The main function for the `config` subcommand.
fn main_config<Q: QuizRepository, H: HistoryRepository>(
    mut session: QuizSession<Q, H>,
    options: &ConfigOptions,
) -> Result<()> {
    if let Some(questions_per_round) = options.questions_per_round {
        session.update_config(QuizConfig::new(questions_per_round)?)?;
    }

    let config = session.config();
    my_print!("Questions per round: ")?;
    my_println!("{}", format!("{}", config.questions_per_round).cyan())
}


fn get_data_dir_path(options: &Options) -> PathBuf {
    if let Some(directory) = &options.directory {
        directory.clone()
    } else if let Some(mut dirpath) = dirs::data_dir() {
        dirpath.push("quizdeck");
        dirpath
    } else {
        Path::new(".quizdeck").to_path_buf()
    }
}

/**
 * The command-line user interface for taking quizzes.
 *
 * Version: October 2026
 */
use std::io::Write;

use colored::*;

use super::common::Result;
use super::iohelper::{choice_letter, print_with_prefix, read_choice};


/// Summary of one practice round.
#[derive(Debug, Default)]
pub struct RoundResult {
    pub total: usize,
    pub total_correct: usize,
}


pub struct CmdUI {
    number: usize,
    /// Have we finished printing out the prologue?
    finished_prologue: bool,
}


impl CmdUI {
    pub fn new() -> Self {
        Self {
            number: 0,
            finished_prologue: false,
        }
    }

    pub fn text(&mut self, text: &str) -> Result<()> {
        if !self.finished_prologue {
            my_print!("\n")?;
            self.finished_prologue = true;
        }
        self.number += 1;

        let prefix = format!("  ({}) ", self.number);
        print_with_prefix(text, &prefix, Some(Color::Cyan))?;
        my_print!("\n")
    }

    pub fn choices(&mut self, choices: &[String]) -> Result<()> {
        for (i, choice) in choices.iter().enumerate() {
            if let Some(letter) = choice_letter(i) {
                print_with_prefix(choice, &format!("     ({}) ", letter), None)?;
            }
        }
        my_print!("\n")
    }

    /// Returns `Ok(None)` if the user pressed Ctrl+D.
    pub fn prompt_choice(&mut self, num_choices: usize) -> Result<Option<usize>> {
        read_choice(num_choices)
    }

    pub fn incorrect(&mut self, correction: Option<&str>) -> Result<()> {
        if let Some(correction) = correction {
            let message = format!(
                "{} The correct answer was {}.",
                "Incorrect.".red(),
                correction.green(),
            );
            print_with_prefix(&message, "", None)
        } else {
            print_with_prefix(&format!("{}", "Incorrect.".red()), "", None)
        }
    }

    pub fn correct(&mut self) -> Result<()> {
        print_with_prefix(&format!("{}", "Correct!".green()), "", None)
    }

    pub fn results(&mut self, results: &RoundResult) -> Result<()> {
        if results.total > 0 {
            let score = 100.0 * (results.total_correct as f64) / (results.total as f64);
            let score_as_str = format!("{:.1}%", score);

            my_print!("\n\n")?;
            my_print!("Score: ")?;
            my_print!("{}", score_as_str.cyan())?;
            my_print!(" out of ")?;
            my_print!("{}", format!("{}", results.total).cyan())?;
            if results.total == 1 {
                my_println!(" question")?;
            } else {
                my_println!(" questions")?;
            }
            my_print!("  {}", format!("{}", results.total_correct).green())?;
            my_print!(" correct\n")?;
            my_print!("  {}", format!("{}", results.total - results.total_correct).red())?;
            my_print!(" incorrect\n")?;
        }
        Ok(())
    }
}


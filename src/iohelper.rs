/**
 * Terminal input and output for the multiple-choice flow: reading a lettered choice
 * and printing text with a hanging prefix.
 *
 * Version: October 2026
 */
use colored::*;

use rustyline::error::ReadlineError;

use super::common::{QuizError, Result};

#[macro_export]
macro_rules! my_println {
    ($($arg:tt)*) => (
        writeln!(std::io::stdout(), $($arg)*).map_err($crate::common::QuizError::Io)
    );
}

#[macro_export]
macro_rules! my_print {
    ($($arg:tt)*) => (
        write!(std::io::stdout(), $($arg)*).map_err($crate::common::QuizError::Io)
    );
}


const CHOICE_PROMPT: &str = "> ";
const LETTERS: &str = "abcdefghijklmnopqrstuvwxyz";


/// The letter shown next to the option at `index`, if there is one.
pub fn choice_letter(index: usize) -> Option<char> {
    LETTERS.chars().nth(index)
}


/// Read lines until the user picks one of the first `num_choices` letters, and return
/// its index. Blank lines are ignored and anything else is answered with a reminder.
///
/// Ctrl+D gives `Ok(None)`, Ctrl+C gives `Err(QuizError::ReadlineInterrupted)`.
pub fn read_choice(num_choices: usize) -> Result<Option<usize>> {
    use std::io::Write;

    let mut editor = rustyline::Editor::<()>::new();
    loop {
        let line = match editor.readline(CHOICE_PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Eof) => return Ok(None),
            Err(ReadlineError::Interrupted) => return Err(QuizError::ReadlineInterrupted),
            Err(ReadlineError::Io(e)) => return Err(QuizError::Io(e)),
            Err(_) => continue,
        };

        let response = line.trim();
        if response.is_empty() {
            continue;
        }
        match parse_choice(response, num_choices) {
            Some(index) => return Ok(Some(index)),
            None => my_println!("Please enter a letter.")?,
        }
    }
}


/// Turn a response like "b" or "B" into an index into the choices.
pub fn parse_choice(response: &str, num_choices: usize) -> Option<usize> {
    let mut chars = response.chars();
    let letter = chars.next()?.to_ascii_lowercase();
    if chars.next().is_some() {
        return None;
    }

    LETTERS
        .chars()
        .take(num_choices)
        .position(|c| c == letter)
}


/// Print `text` wrapped to the terminal width. The first line starts with `prefix`
/// (in `prefix_color`, if given) and the rest are indented to line up under it.
pub fn print_with_prefix(text: &str, prefix: &str, prefix_color: Option<Color>) -> Result<()> {
    use std::io::Write;

    // Wrap with a blank indent so escape codes in the prefix don't count towards width.
    let indent = " ".repeat(prefix.chars().count());
    let wrapper = textwrap::Wrapper::with_termwidth()
        .initial_indent(&indent)
        .subsequent_indent(&indent);

    let mut lines = wrapper.wrap_iter(text);
    match lines.next() {
        Some(first) => {
            let colored_prefix = match prefix_color {
                Some(color) => prefix.color(color),
                None => prefix.normal(),
            };
            my_println!("{}{}", colored_prefix, &first[indent.len()..])?;
        }
        None => return my_println!("{}", prefix),
    }

    for line in lines {
        my_println!("{}", line)?;
    }
    Ok(())
}

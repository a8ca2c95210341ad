use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Output, Stdio};

use regex::Regex;
use tempfile::TempDir;


const CAPITAL_OF_FRANCE: &str = r#"[
  {
    "id": 1,
    "question": "What is the capital of France?",
    "options": ["Lyon", "Marseille", "Paris", "Nice"],
    "correct": 2
  }
]"#;

const YES_OR_NO: &str = r#"[
  {"id": 1, "question": "Is the Danube longer than the Rhine?", "options": ["Yes", "No"], "correct": 0},
  {"id": 2, "question": "Is the Volga longer than the Danube?", "options": ["Yes", "No"], "correct": 0},
  {"id": 3, "question": "Is the Nile longer than the Volga?", "options": ["Yes", "No"], "correct": 0}
]"#;


#[test]
fn can_answer_question_correctly() {
    let dir = setup(CAPITAL_OF_FRANCE);
    play_quiz(
        dir.path(),
        &[],
        &[
            "(1) What is the capital of France?",
            "(a) Lyon",
            "(b) Marseille",
            "(c) Paris",
            "(d) Nice",
            "> c",
            "Correct!",
            "Score: 100.0% out of 1 question",
            "1 correct",
            "0 incorrect",
        ],
    );
}


#[test]
fn can_answer_question_incorrectly() {
    let dir = setup(CAPITAL_OF_FRANCE);
    play_quiz(
        dir.path(),
        &[],
        &[
            "(1) What is the capital of France?",
            "(a) Lyon",
            "(b) Marseille",
            "(c) Paris",
            "(d) Nice",
            "> a",
            "Incorrect. The correct answer was Paris.",
            "Score: 0.0% out of 1 question",
            "0 correct",
            "1 incorrect",
        ],
    );
}


#[test]
fn invalid_choices_are_rejected() {
    let dir = setup(CAPITAL_OF_FRANCE);
    play_quiz(
        dir.path(),
        &[],
        &[
            "(1) What is the capital of France?",
            "(a) Lyon",
            "(b) Marseille",
            "(c) Paris",
            "(d) Nice",
            "> Paris",
            "Please enter a letter.",
            "> e",
            "Please enter a letter.",
            "> C",
            "Correct!",
            "Score: 100.0% out of 1 question",
            "1 correct",
            "0 incorrect",
        ],
    );
}


#[test]
fn answers_are_recorded_in_stats_and_history() {
    let dir = setup(CAPITAL_OF_FRANCE);
    play_quiz(
        dir.path(),
        &[],
        &[
            "(1) What is the capital of France?",
            "(a) Lyon",
            "(b) Marseille",
            "(c) Paris",
            "(d) Nice",
            "> b",
            "Incorrect. The correct answer was Paris.",
            "Score: 0.0% out of 1 question",
            "0 correct",
            "1 incorrect",
        ],
    );

    let stats = fs::read_to_string(dir.path().join("stats.json")).unwrap();
    assert!(stats.contains("\"attempts\": 1"), "stats.json was {}", stats);

    assert_output(
        dir.path(),
        &["stats"],
        &[r"RE: 0%\s+of\s+1\s+\d{4}-\d{2}-\d{2}\s+\[ 8\]\s+What is the capital of France\?"],
    );
    assert_output(
        dir.path(),
        &["history"],
        &[r"RE: \d{4}-\d{2}-\d{2} \d{2}:\d{2}\s+incorrect\s+What is the capital of France\?"],
    );
}


#[test]
fn unanswered_questions_have_top_priority() {
    let dir = setup(CAPITAL_OF_FRANCE);
    assert_output(
        dir.path(),
        &["stats"],
        &[r"RE: 0%\s+of\s+0\s+never\s+\[10\]\s+What is the capital of France\?"],
    );
    assert_output(dir.path(), &["history"], &["No answers have been recorded."]);
}


#[test]
fn round_size_follows_config() {
    let dir = setup(YES_OR_NO);
    assert_output(
        dir.path(),
        &["config", "--questions-per-round", "2"],
        &["Questions per round: 2"],
    );
    assert_output(dir.path(), &["config"], &["Questions per round: 2"]);

    play_quiz(
        dir.path(),
        &[],
        &[
            r"RE: \(1\) Is the (Danube|Volga|Nile) longer than the (Rhine|Danube|Volga)\?",
            "(a) Yes",
            "(b) No",
            "> a",
            "Correct!",
            r"RE: \(2\) Is the (Danube|Volga|Nile) longer than the (Rhine|Danube|Volga)\?",
            "(a) Yes",
            "(b) No",
            "> a",
            "Correct!",
            "Score: 100.0% out of 2 questions",
            "2 correct",
            "0 incorrect",
        ],
    );
}


#[test]
fn round_is_capped_at_number_of_questions() {
    let dir = setup(YES_OR_NO);
    fs::write(dir.path().join("config.json"), r#"{"questionsPerRound": 10}"#).unwrap();

    let mut in_out = Vec::new();
    for i in 1..=3 {
        in_out.push(format!(
            r"RE: \({}\) Is the (Danube|Volga|Nile) longer than the (Rhine|Danube|Volga)\?",
            i,
        ));
        in_out.push(String::from("(a) Yes"));
        in_out.push(String::from("(b) No"));
        in_out.push(String::from("> b"));
        in_out.push(String::from("Incorrect. The correct answer was Yes."));
    }
    in_out.push(String::from("Score: 0.0% out of 3 questions"));
    in_out.push(String::from("0 correct"));
    in_out.push(String::from("3 incorrect"));

    let in_out: Vec<&str> = in_out.iter().map(|s| s.as_str()).collect();
    play_quiz(dir.path(), &[], &in_out);
}


#[test]
fn sqlite_backend_keeps_its_own_stats() {
    let dir = setup(CAPITAL_OF_FRANCE);
    play_quiz(
        dir.path(),
        &["--sqlite"],
        &[
            "(1) What is the capital of France?",
            "(a) Lyon",
            "(b) Marseille",
            "(c) Paris",
            "(d) Nice",
            "> c",
            "Correct!",
            "Score: 100.0% out of 1 question",
            "1 correct",
            "0 incorrect",
        ],
    );

    assert!(dir.path().join("quiz.db").exists());
    assert!(!dir.path().join("stats.json").exists());

    assert_output(
        dir.path(),
        &["--sqlite", "stats"],
        &[r"RE: 100%\s+of\s+1\s+\d{4}-\d{2}-\d{2}\s+\[ 1\]\s+What is the capital of France\?"],
    );
    assert_output(
        dir.path(),
        &["--sqlite", "history"],
        &[r"RE: \d{4}-\d{2}-\d{2} \d{2}:\d{2}\s+correct\s+What is the capital of France\?"],
    );
}


#[test]
fn empty_quiz_is_an_error() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["take"], "");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: no questions found"), "stderr was {:?}", stderr);
}


#[test]
fn invalid_config_is_an_error() {
    let dir = setup(CAPITAL_OF_FRANCE);
    let output = run(dir.path(), &["config", "--questions-per-round", "0"], "");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: invalid configuration"), "stderr was {:?}", stderr);
    assert!(!dir.path().join("config.json").exists());
}


#[test]
fn can_print_data_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().to_string_lossy().to_string();
    assert_output(dir.path(), &["path"], &[&path]);
}


fn setup(questions: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("questions.json"), questions).unwrap();
    dir
}


fn play_quiz(directory: &Path, extra_args: &[&str], in_out: &[&str]) {
    let mut args = extra_args.to_vec();
    args.push("take");
    let mut child = spawn(directory, &args);
    {
        let stdin = child.stdin.as_mut().expect("Failed to open stdin");
        for line in in_out {
            if line.starts_with("> ") {
                stdin_write(stdin, &line[1..]);
            }
        }
    }

    let result = child.wait_with_output().expect("Failed to read stdout");
    let stdout = String::from_utf8_lossy(&result.stdout).to_string();
    let expected: Vec<&str> = in_out.iter().filter(|l| !l.starts_with("> ")).cloned().collect();
    assert_lines(&stdout, &expected);
}


fn assert_output(directory: &Path, args: &[&str], expected: &[&str]) {
    let output = run(directory, args, "");
    assert!(
        output.status.success(),
        "quizdeck {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr),
    );
    assert_lines(&String::from_utf8_lossy(&output.stdout), expected);
}


fn assert_lines(stdout: &str, expected: &[&str]) {
    let mut lines_iter = stdout.lines().map(normalize_line).filter(|l| !l.is_empty());
    for expected in expected {
        let got = lines_iter.next().expect("Premature end of output");

        if expected.starts_with("RE:") {
            let re = Regex::new(expected[3..].trim()).unwrap();
            assert!(
                re.is_match(&got),
                "Failed to match {:?} against pattern {:?}",
                got,
                &expected[3..],
            );
        } else {
            assert!(
                expected.trim() == got,
                "Expected {:?}, got {:?}",
                expected.trim(),
                got,
            );
        }
    }

    if let Some(line) = lines_iter.next() {
        panic!("Extra output: {:?}", line);
    }
}


/// Trim a line of output, and drop the prompt if the line editor echoed it.
fn normalize_line(line: &str) -> String {
    let line = line.trim();
    let line = if line.starts_with("> ") { &line[2..] } else { line };
    line.trim().to_string()
}


fn run(directory: &Path, args: &[&str], input: &str) -> Output {
    let mut child = spawn(directory, args);
    {
        let stdin = child.stdin.as_mut().expect("Failed to open stdin");
        stdin.write_all(input.as_bytes()).expect("Failed to write to stdin");
    }
    child.wait_with_output().expect("Failed to run quizdeck")
}


fn spawn(directory: &Path, args: &[&str]) -> Child {
    Command::new(env!("CARGO_BIN_EXE_quizdeck"))
        .arg("--no-color")
        .arg("-d")
        .arg(directory)
        .args(args)
        .env_remove("QUIZDECK_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute process")
}


fn stdin_write(stdin: &mut ChildStdin, line: &str) {
    stdin
        .write_all(line.trim_start().as_bytes())
        .expect("Failed to write to stdin");
    stdin.write_all(b"\n").expect("Failed to write to stdin");
}

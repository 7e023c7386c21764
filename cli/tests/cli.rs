use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn examdoc() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_examdoc"));
    cmd.arg("--no-color");
    cmd
}

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = examdoc()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn examdoc");
    // The process may exit before reading stdin (bad arguments).
    let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn fixtures_pass() {
    let output = examdoc().arg("test").arg(fixtures()).output().unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stderr(&output).contains("test result: ok. 10 passed, 0 failed"));
}

#[test]
fn fixture_category_filter() {
    let output = examdoc()
        .arg("test")
        .arg(fixtures())
        .args(["-c", "colors"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stderr(&output).contains("2 passed"));
}

#[test]
fn failing_fixture_reports_reason() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wrong.test.md");
    std::fs::write(&path, "---\nexpect_blocks = 3\n---\none line\n").unwrap();
    let output = examdoc().arg("test").arg(&path).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("expected 3 block(s), got 1"));
}

#[test]
fn convert_stdin_to_json() {
    let output = run_with_stdin(&["convert"], "**Q1** text");
    assert!(output.status.success(), "{}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let inlines = &value["sections"][0]["blocks"][0]["inlines"];
    assert_eq!(inlines[0]["text"], "Q1");
    assert_eq!(inlines[0]["characterFormat"]["bold"], true);
    assert_eq!(inlines[1]["text"], " text");
}

#[test]
fn convert_envelope_and_text() {
    let output = run_with_stdin(&["convert", "--envelope"], "# T");
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["examJson"]["sections"][0]["blocks"][0]["inlines"][0]["text"], "T\n");

    let output = run_with_stdin(&["convert", "--text", "-"], "# T\n_a_ b");
    assert_eq!(stdout(&output), "T\na b\n");
}

#[test]
fn convert_rejects_bad_theme() {
    let dir = tempfile::tempdir().unwrap();
    let theme = dir.path().join("theme.toml");
    std::fs::write(&theme, "palette = [\"#12\"]\n").unwrap();
    let output = run_with_stdin(&["convert", "--theme", theme.to_str().unwrap()], "x");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("invalid color"), "{}", stderr(&output));
}

#[test]
fn prompt_from_request_file() {
    let dir = tempfile::tempdir().unwrap();
    let request = dir.path().join("request.toml");
    std::fs::write(
        &request,
        r#"
subject = "histoire"
gradeLevel = "1ere-annee-college"
topicText = "La Révolution française"
examType = "devoir"
timeLimit = "45 min"
language = "fr"
totalQuestions = 5
questionTypes = ["ShortAnswer"]
difficulty = "easy"
"#,
    )
    .unwrap();

    let output = examdoc().arg("prompt").arg(&request).output().unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    let prompt = stdout(&output);
    assert!(prompt.contains("Write a devoir in histoire"));
    assert!(prompt.contains("La Révolution française"));

    let output = examdoc()
        .arg("prompt")
        .arg(&request)
        .arg("--envelope")
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["formData"]["version"], "1.0.0");
    assert!(value["formData"]["generationDate"].is_string());
}

#[test]
fn prompt_lists_invalid_fields() {
    let dir = tempfile::tempdir().unwrap();
    let request = dir.path().join("request.json");
    std::fs::write(&request, r#"{ "subject": "physique", "totalQuestions": 80 }"#).unwrap();
    let output = examdoc().arg("prompt").arg(&request).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("maximum 50 questions"), "{}", err);
    assert!(err.contains("grade level is required"));
    assert!(!err.contains("subject is required"));
}

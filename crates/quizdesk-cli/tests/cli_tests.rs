//! CLI integration tests using assert_cmd.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quizdesk() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizdesk").unwrap();
    cmd.env_remove("QUIZDESK_WEAK_THRESHOLD")
        .env_remove("QUIZDESK_OUTPUT_DIR");
    cmd
}

fn school() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../datasets/school.toml")
}

#[test]
fn validate_school_dataset() {
    quizdesk()
        .arg("validate")
        .arg("--dataset")
        .arg(school())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "(7 users, 2 classes, 3 quizzes, 3 attempts)",
        ))
        .stdout(predicate::str::contains("All datasets valid."));
}

#[test]
fn validate_directory() {
    quizdesk()
        .arg("validate")
        .arg("--dataset")
        .arg("../../datasets")
        .assert()
        .success()
        .stdout(predicate::str::contains("school.toml"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(
        &path,
        r#"
[[classes]]
id = "c1"
name = "Orphans"
teacher_id = "ghost"
"#,
    )
    .unwrap();

    quizdesk()
        .arg("validate")
        .arg("--dataset")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[c1] WARNING: teacher ghost does not exist"))
        .stdout(predicate::str::contains("1 warning(s) found."));
}

#[test]
fn validate_nonexistent_file() {
    quizdesk()
        .arg("validate")
        .arg("--dataset")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn leaderboard_orders_by_score() {
    let output = quizdesk()
        .arg("leaderboard")
        .arg("--dataset")
        .arg(school())
        .arg("--quiz")
        .arg("quiz1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Algebra Basics"))
        .stdout(predicate::str::contains("1 (gold)"))
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(output).unwrap();
    let row = |name: &str| text.lines().find(|l| l.contains(name)).unwrap().to_string();
    assert!(row("Ana Candea").contains("1 (gold)"));
    assert!(row("Orosz Barbara").contains("2 (silver)"));
    assert!(row("Todor Ioan").contains("3 (bronze)"));
    assert!(!text.contains("0 (gold)"));

    let ana = text.find("Ana Candea").unwrap();
    let barbara = text.find("Orosz Barbara").unwrap();
    let todor = text.find("Todor Ioan").unwrap();
    assert!(ana < barbara && barbara < todor);
}

#[test]
fn leaderboard_without_attempts() {
    quizdesk()
        .arg("leaderboard")
        .arg("--dataset")
        .arg(school())
        .arg("--quiz")
        .arg("quiz3")
        .assert()
        .success()
        .stdout(predicate::str::contains("No attempts yet."));
}

#[test]
fn leaderboard_unknown_quiz() {
    quizdesk()
        .arg("leaderboard")
        .arg("--dataset")
        .arg(school())
        .arg("--quiz")
        .arg("nope")
        .assert()
        .failure()
        .stderr(predicate::str::contains("quiz not found: nope"));
}

#[test]
fn class_stats() {
    quizdesk()
        .arg("stats")
        .arg("--dataset")
        .arg(school())
        .arg("--class")
        .arg("class1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mathematics 101"))
        .stdout(predicate::str::contains("Average score: 67%"))
        .stdout(predicate::str::contains("Geometry Fundamentals"));
}

#[test]
fn student_stats() {
    quizdesk()
        .arg("stats")
        .arg("--dataset")
        .arg(school())
        .arg("--student")
        .arg("student2")
        .assert()
        .success()
        .stdout(predicate::str::contains("Orosz Barbara"))
        .stdout(predicate::str::contains("67%"))
        .stdout(predicate::str::contains("Multiplication"));
}

#[test]
fn stats_requires_a_target() {
    quizdesk()
        .arg("stats")
        .arg("--dataset")
        .arg(school())
        .assert()
        .failure();
}

#[test]
fn practice_custom_count() {
    quizdesk()
        .arg("practice")
        .arg("--dataset")
        .arg(school())
        .arg("--student")
        .arg("student1")
        .arg("--mode")
        .arg("custom")
        .arg("--count")
        .arg("3")
        .arg("--seed")
        .arg("7")
        .assert()
        .success()
        .stdout(predicate::str::contains("Practice set (custom (3)): 3 question(s)"));
}

#[test]
fn practice_rejects_zero_count() {
    quizdesk()
        .arg("practice")
        .arg("--dataset")
        .arg(school())
        .arg("--student")
        .arg("student1")
        .arg("--mode")
        .arg("custom")
        .arg("--count")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}

#[test]
fn practice_smart_targets_weak_topics() {
    quizdesk()
        .arg("practice")
        .arg("--dataset")
        .arg(school())
        .arg("--student")
        .arg("student2")
        .arg("--mode")
        .arg("smart")
        .arg("--seed")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Weak topics: Multiplication"))
        .stdout(predicate::str::contains("What is 5 × 3?"));
}

#[test]
fn grade_perfect_submission() {
    quizdesk()
        .arg("grade")
        .arg("--dataset")
        .arg(school())
        .arg("--student")
        .arg("student1")
        .arg("--quiz")
        .arg("quiz1")
        .arg("--answers")
        .arg("1,3,1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 100% (3/3 correct)"))
        .stdout(predicate::str::contains("not saved"));
}

#[test]
fn grade_shows_explanations_for_mistakes() {
    quizdesk()
        .arg("grade")
        .arg("--dataset")
        .arg(school())
        .arg("--student")
        .arg("student2")
        .arg("--quiz")
        .arg("quiz1")
        .arg("--answers")
        .arg("1,2,1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 67% (2/3 correct)"))
        .stdout(predicate::str::contains("correct answer: 15"))
        .stdout(predicate::str::contains("adding 5 three times"));
}

#[test]
fn grade_rejects_unanswered() {
    quizdesk()
        .arg("grade")
        .arg("--dataset")
        .arg(school())
        .arg("--student")
        .arg("student1")
        .arg("--quiz")
        .arg("quiz1")
        .arg("--answers")
        .arg("1,-,1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 unanswered"));
}

#[test]
fn grade_rejects_other_class() {
    quizdesk()
        .arg("grade")
        .arg("--dataset")
        .arg(school())
        .arg("--student")
        .arg("student4")
        .arg("--quiz")
        .arg("quiz1")
        .arg("--answers")
        .arg("1,3,1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not permitted"));
}

#[test]
fn grade_retry_incorrect() {
    quizdesk()
        .arg("grade")
        .arg("--dataset")
        .arg(school())
        .arg("--student")
        .arg("student2")
        .arg("--quiz")
        .arg("quiz1")
        .arg("--answers")
        .arg("3")
        .arg("--retry")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 100% (1/1 correct)"))
        .stdout(predicate::str::contains("What is 5 × 3?"));
}

#[test]
fn grade_retry_after_perfect_attempt() {
    quizdesk()
        .arg("grade")
        .arg("--dataset")
        .arg(school())
        .arg("--student")
        .arg("student1")
        .arg("--quiz")
        .arg("quiz1")
        .arg("--answers")
        .arg("1")
        .arg("--retry")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to retry"));
}

#[test]
fn export_attempt_csv() {
    let dir = TempDir::new().unwrap();

    quizdesk()
        .arg("export")
        .arg("--dataset")
        .arg(school())
        .arg("--attempt")
        .arg("attempt2")
        .arg("--output")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Algebra Basics_results.csv"));

    let csv = std::fs::read_to_string(dir.path().join("Algebra Basics_results.csv")).unwrap();
    assert!(csv.starts_with("Question,Your Answer,Correct Answer,Result\n"));
    assert!(csv.contains("What is 5 × 3?,14,15,Incorrect"));
    assert!(csv.contains("Score,67%"));
    assert!(csv.contains("Date,2025-01-13 10:30:00 UTC"));
}

#[test]
fn export_class_html() {
    let dir = TempDir::new().unwrap();

    quizdesk()
        .arg("export")
        .arg("--dataset")
        .arg(school())
        .arg("--class")
        .arg("class1")
        .arg("--output")
        .arg(dir.path())
        .assert()
        .success();

    let html = std::fs::read_to_string(dir.path().join("class1_report.html")).unwrap();
    assert!(html.contains("Mathematics 101"));
    assert!(html.contains("Ana Candea"));
}

#[test]
fn export_unknown_attempt() {
    let dir = TempDir::new().unwrap();

    quizdesk()
        .arg("export")
        .arg("--dataset")
        .arg(school())
        .arg("--attempt")
        .arg("missing")
        .arg("--output")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("attempt not found"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizdesk()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizdesk.toml"))
        .stdout(predicate::str::contains("Created datasets/example.toml"));

    assert!(dir.path().join("quizdesk.toml").exists());
    assert!(dir.path().join("datasets/example.toml").exists());

    quizdesk()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--dataset")
        .arg("datasets/example.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("All datasets valid."));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    quizdesk().current_dir(dir.path()).arg("init").assert().success();

    quizdesk()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    quizdesk()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Classroom quiz grading"));
}

#[test]
fn version_output() {
    quizdesk()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizdesk"));
}

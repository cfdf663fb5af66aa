//! HTML class report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use quizdesk_core::dataset::Dataset;
use quizdesk_core::leaderboard::{rank_quiz, Medal};
use quizdesk_core::model::Class;
use quizdesk_core::statistics::{class_summary, meets_target, QuizSummary, TARGET_SCORE};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn medal_icon(medal: Option<Medal>) -> &'static str {
    match medal {
        Some(Medal::Gold) => "🥇",
        Some(Medal::Silver) => "🥈",
        Some(Medal::Bronze) => "🥉",
        None => "",
    }
}

/// Generate the HTML report for one class.
pub fn generate_class_html(class: &Class, dataset: &Dataset) -> String {
    let summary = class_summary(class, dataset);
    let teacher = dataset
        .user(&class.teacher_id)
        .map(|u| u.name.as_str())
        .unwrap_or("Unknown");

    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>quizdesk report: {}</title>\n",
        html_escape(&class.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&class.name)));
    html.push_str(&format!(
        "<p class=\"meta\">Teacher: <strong>{}</strong> | {} students | generated {}</p>\n",
        html_escape(teacher),
        summary.total_students,
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary
    let target_class = if meets_target(summary.average_score) {
        "pass"
    } else {
        "fail"
    };
    let target_text = if meets_target(summary.average_score) {
        "Above target"
    } else {
        "Below target"
    };
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Quizzes</th><th>Active</th><th>Questions</th><th>Attempts</th><th>Average</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">{}% ({}, target {}%)</td></tr></tbody>\n",
        summary.total_quizzes,
        summary.active_quizzes,
        summary.total_questions,
        summary.total_attempts,
        target_class,
        summary.average_score,
        target_text,
        TARGET_SCORE,
    ));
    html.push_str("</table>\n");

    if summary.per_quiz.iter().any(|q| q.attempt_count > 0) {
        html.push_str(&generate_bar_chart(&summary.per_quiz));
    }
    html.push_str("</section>\n");

    // Quizzes
    html.push_str("<section class=\"quizzes\">\n");
    html.push_str("<h2>Quizzes</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"quizzes\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Quiz</th><th onclick=\"sortTable(1)\">Questions</th><th onclick=\"sortTable(2)\">Visible</th><th onclick=\"sortTable(3)\">Attempts</th><th onclick=\"sortTable(4)\">Average</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for quiz in &summary.per_quiz {
        let average = if quiz.attempt_count == 0 {
            "-".to_string()
        } else {
            format!("{}%", quiz.average_score)
        };
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            html_escape(&quiz.quiz_name),
            quiz.question_count,
            if quiz.visible { "yes" } else { "hidden" },
            quiz.attempt_count,
            average
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Leaderboards
    html.push_str("<section class=\"leaderboards\">\n");
    html.push_str("<h2>Leaderboards</h2>\n");
    for quiz in &summary.per_quiz {
        html.push_str(&format!("<h3>{}</h3>\n", html_escape(&quiz.quiz_name)));
        let board = rank_quiz(&quiz.quiz_id, &dataset.attempts, &dataset.users);
        if board.is_empty() {
            html.push_str("<p class=\"meta\">No attempts yet.</p>\n");
            continue;
        }
        html.push_str("<table class=\"leaderboard\">\n");
        html.push_str("<thead><tr><th>#</th><th>Student</th><th>Score</th><th>Submitted</th></tr></thead>\n<tbody>\n");
        for entry in &board {
            html.push_str(&format!(
                "<tr><td>{} {}</td><td>{}</td><td>{}%</td><td>{}</td></tr>\n",
                entry.position + 1,
                medal_icon(entry.medal),
                html_escape(&entry.student_name),
                entry.score,
                entry.timestamp.format("%Y-%m-%d %H:%M")
            ));
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(&summary).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write a class report to a file.
pub fn write_class_html(class: &Class, dataset: &Dataset, path: &Path) -> Result<()> {
    let html = generate_class_html(class, dataset);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Horizontal bars of each quiz's average score.
fn generate_bar_chart(per_quiz: &[QuizSummary]) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 200;

    let total_height = per_quiz.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, quiz) in per_quiz.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = usize::from(quiz.average_score) * max_width / 100;

        let color = if meets_target(quiz.average_score) {
            "#22c55e"
        } else if quiz.average_score >= 50 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&quiz.quiz_name)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            quiz.average_score
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('quizzes');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb, undefined, { numeric: true }) : vb.localeCompare(va, undefined, { numeric: true });
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use quizdesk_core::model::{Question, Quiz, QuizAttempt, Role, User};

    fn make_dataset() -> Dataset {
        let user = |id: &str, name: &str, role| User {
            id: id.into(),
            name: name.into(),
            email: format!("{id}@school.com"),
            role,
        };
        Dataset::new(
            vec![
                user("teacher1", "Dorian Gorgan", Role::Teacher),
                user("student1", "Ana <Candea>", Role::Student),
                user("student2", "Orosz Barbara", Role::Student),
            ],
            vec![Class {
                id: "class1".into(),
                name: "Mathematics 101".into(),
                teacher_id: "teacher1".into(),
                student_ids: vec!["student1".into(), "student2".into()],
            }],
            vec![
                Quiz {
                    id: "quiz1".into(),
                    class_id: "class1".into(),
                    name: "Algebra Basics".into(),
                    questions: vec![Question {
                        id: "q1".into(),
                        text: "What is 2 + 2?".into(),
                        options: vec!["3".into(), "4".into()],
                        correct_answer: 1,
                        explanation: None,
                        topic: None,
                    }],
                    visible: true,
                    created_by: "teacher1".into(),
                },
                Quiz {
                    id: "quiz2".into(),
                    class_id: "class1".into(),
                    name: "Geometry Fundamentals".into(),
                    questions: vec![],
                    visible: false,
                    created_by: "teacher1".into(),
                },
            ],
            vec![
                QuizAttempt {
                    id: "attempt1".into(),
                    student_id: "student1".into(),
                    quiz_id: "quiz1".into(),
                    question_ids: vec![],
                    answers: vec![Some(1)],
                    score: 100,
                    timestamp: Utc.with_ymd_and_hms(2025, 1, 14, 10, 0, 0).unwrap(),
                },
                QuizAttempt {
                    id: "attempt2".into(),
                    student_id: "student2".into(),
                    quiz_id: "quiz1".into(),
                    question_ids: vec![],
                    answers: vec![Some(0)],
                    score: 0,
                    timestamp: Utc.with_ymd_and_hms(2025, 1, 13, 10, 0, 0).unwrap(),
                },
            ],
        )
    }

    #[test]
    fn html_report_contains_required_elements() {
        let data = make_dataset();
        let html = generate_class_html(&data.classes[0], &data);

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Mathematics 101"));
        assert!(html.contains("Dorian Gorgan"));
        assert!(html.contains("Algebra Basics"));
        assert!(html.contains("No attempts yet."));
        assert!(html.contains("Below target"));
        assert!(html.contains("🥇"));
    }

    #[test]
    fn html_report_escapes_names() {
        let data = make_dataset();
        let html = generate_class_html(&data.classes[0], &data);
        assert!(html.contains("Ana &lt;Candea&gt;"));
        assert!(!html.contains("Ana <Candea>"));
    }

    #[test]
    fn html_report_write_to_file() {
        let data = make_dataset();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("class1.html");

        write_class_html(&data.classes[0], &data, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}

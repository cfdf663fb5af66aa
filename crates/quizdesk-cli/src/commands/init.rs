//! The `quizdesk init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizdesk.toml").exists() {
        println!("quizdesk.toml already exists, skipping.");
    } else {
        std::fs::write("quizdesk.toml", SAMPLE_CONFIG)?;
        println!("Created quizdesk.toml");
    }

    std::fs::create_dir_all("datasets")?;
    let example_path = std::path::Path::new("datasets/example.toml");
    if example_path.exists() {
        println!("datasets/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_DATASET)?;
        println!("Created datasets/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit datasets/example.toml with your classes and quizzes");
    println!("  2. Run: quizdesk validate --dataset datasets/example.toml");
    println!("  3. Run: quizdesk leaderboard --dataset datasets/example.toml --quiz fractions");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizdesk configuration

output_dir = "./quizdesk-reports"

[practice]
quick_size = 10
smart_size = 10
# Topics below this accuracy (percent) count as weak
weak_threshold = 70.0
max_weak_topics = 3
"#;

const EXAMPLE_DATASET: &str = r#"[[users]]
id = "admin"
name = "School Admin"
email = "admin@example.com"
role = "admin"

[[users]]
id = "teacher"
name = "Example Teacher"
email = "teacher@example.com"
role = "teacher"

[[users]]
id = "student"
name = "Example Student"
email = "student@example.com"
role = "student"

[[classes]]
id = "maths"
name = "Maths 5A"
teacher_id = "teacher"
student_ids = ["student"]

[[quizzes]]
id = "fractions"
class_id = "maths"
name = "Fractions"
created_by = "teacher"

[[quizzes.questions]]
id = "f1"
text = "What is 1/2 + 1/4?"
options = ["2/6", "3/4", "1/8", "2/4"]
correct_answer = 1
explanation = "Rewrite 1/2 as 2/4, then 2/4 + 1/4 = 3/4."
topic = "Addition"

[[quizzes.questions]]
id = "f2"
text = "Which fraction is larger?"
options = ["1/3", "1/5"]
correct_answer = 0
topic = "Comparison"

[[attempts]]
id = "first-try"
student_id = "student"
quiz_id = "fractions"
answers = [1, 1]
score = 50
timestamp = "2025-02-03T09:00:00Z"
"#;

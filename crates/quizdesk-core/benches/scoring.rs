use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizdesk_core::config::PracticeConfig;
use quizdesk_core::leaderboard::rank_quiz;
use quizdesk_core::model::{Question, QuizAttempt, Role, User};
use quizdesk_core::practice::{select_practice, PracticeMode, SeededRandom};
use quizdesk_core::scoring::score_answers;
use quizdesk_core::statistics::TopicAccuracy;

fn make_questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| Question {
            id: format!("q{i}"),
            text: format!("Question {i}"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: i % 4,
            explanation: None,
            topic: Some(format!("topic-{}", i % 7)),
        })
        .collect()
}

fn make_attempts(students: usize, per_student: usize) -> (Vec<QuizAttempt>, Vec<User>) {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let users = (0..students)
        .map(|s| User {
            id: format!("student{s}"),
            name: format!("Student {s}"),
            email: format!("student{s}@school.com"),
            role: Role::Student,
        })
        .collect();
    let attempts = (0..students * per_student)
        .map(|i| QuizAttempt {
            id: format!("attempt{i}"),
            student_id: format!("student{}", i % students),
            quiz_id: "quiz1".into(),
            question_ids: vec![],
            answers: vec![],
            score: ((i * 37) % 101) as u8,
            timestamp: start + Duration::minutes(i as i64),
        })
        .collect();
    (attempts, users)
}

fn bench_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_answers");

    for n in [3usize, 50, 500] {
        let questions = make_questions(n);
        let answers: Vec<Option<usize>> = (0..n).map(|i| Some((i * 3) % 4)).collect();
        group.bench_function(format!("questions={n}"), |b| {
            b.iter(|| score_answers(black_box(&questions), black_box(&answers)))
        });
    }

    group.finish();
}

fn bench_leaderboard(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_quiz");

    for (students, per_student) in [(30usize, 3usize), (500, 10)] {
        let (attempts, users) = make_attempts(students, per_student);
        group.bench_function(format!("students={students},attempts={}", attempts.len()), |b| {
            b.iter(|| rank_quiz(black_box("quiz1"), black_box(&attempts), black_box(&users)))
        });
    }

    group.finish();
}

fn bench_practice(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_practice");
    let config = PracticeConfig::default();
    let pool = make_questions(1_000);
    let stats: Vec<TopicAccuracy> = (0..7)
        .map(|t| TopicAccuracy {
            topic: format!("topic-{t}"),
            correct: t,
            total: 7,
            accuracy: 100.0 * t as f64 / 7.0,
        })
        .collect();

    group.bench_function("quick", |b| {
        let mut rng = SeededRandom::new(1);
        b.iter(|| select_practice(black_box(&pool), PracticeMode::Quick, &[], &config, &mut rng))
    });

    group.bench_function("smart", |b| {
        let mut rng = SeededRandom::new(1);
        b.iter(|| select_practice(black_box(&pool), PracticeMode::Smart, &stats, &config, &mut rng))
    });

    group.finish();
}

criterion_group!(benches, bench_scoring, bench_leaderboard, bench_practice);
criterion_main!(benches);

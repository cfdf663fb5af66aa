//! Practice set selection.
//!
//! Practice questions are drawn from the quizzes a student can see. All
//! sampling goes through [`RandomSource`] so callers (and tests) decide how
//! random the result is.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::PracticeConfig;
use crate::model::{Question, Quiz, PRACTICE_CLASS_ID};
use crate::statistics::TopicAccuracy;

/// Name given to every generated practice quiz.
pub const PRACTICE_QUIZ_NAME: &str = "Random Practice Quiz";

/// Supplies random orderings for sampling.
pub trait RandomSource {
    /// A permutation of `0..len`.
    fn permutation(&mut self, len: usize) -> Vec<usize>;
}

/// Randomness from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn permutation(&mut self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(&mut rand::thread_rng());
        order
    }
}

/// Reproducible randomness from a fixed seed.
#[derive(Debug, Clone)]
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn permutation(&mut self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(&mut self.0);
        order
    }
}

/// How a practice set is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PracticeMode {
    /// A quick random set.
    Quick,
    /// A random set of the requested size.
    Custom(usize),
    /// A set focused on the student's weakest topics.
    Smart,
}

impl fmt::Display for PracticeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PracticeMode::Quick => write!(f, "quick"),
            PracticeMode::Custom(n) => write!(f, "custom ({n})"),
            PracticeMode::Smart => write!(f, "smart"),
        }
    }
}

/// The outcome of a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct PracticeSet {
    /// The policy that was actually applied. A smart request for a student
    /// without any history comes back as [`PracticeMode::Quick`].
    pub mode: PracticeMode,
    pub questions: Vec<Question>,
    /// Topics the set focused on, weakest first. Empty unless smart.
    pub weak_topics: Vec<String>,
}

impl PracticeSet {
    /// Wrap the selected questions in an ephemeral quiz owned by no class.
    pub fn into_quiz(self, student_id: &str, now: DateTime<Utc>) -> Quiz {
        Quiz {
            id: format!("practice-{}", now.timestamp_millis()),
            class_id: PRACTICE_CLASS_ID.to_string(),
            name: PRACTICE_QUIZ_NAME.to_string(),
            questions: self.questions,
            visible: true,
            created_by: student_id.to_string(),
        }
    }
}

/// All questions of `quizzes`, first occurrence of each id wins.
pub fn question_pool<'a, I>(quizzes: I) -> Vec<Question>
where
    I: IntoIterator<Item = &'a Quiz>,
{
    let mut seen = HashSet::new();
    quizzes
        .into_iter()
        .flat_map(|quiz| quiz.questions.iter())
        .filter(|q| seen.insert(q.id.clone()))
        .cloned()
        .collect()
}

/// Shuffle then take the first `n`.
fn sample<'a>(
    candidates: &[&'a Question],
    n: usize,
    rng: &mut dyn RandomSource,
) -> Vec<&'a Question> {
    rng.permutation(candidates.len())
        .into_iter()
        .filter_map(|i| candidates.get(i).copied())
        .take(n)
        .collect()
}

/// Topics below the weak threshold, weakest first, capped at `max_weak_topics`.
///
/// `topic_stats` must already be ordered weakest first, as
/// [`topic_accuracy`](crate::statistics::topic_accuracy) returns it.
pub fn weak_topics(topic_stats: &[TopicAccuracy], config: &PracticeConfig) -> Vec<String> {
    topic_stats
        .iter()
        .filter(|t| t.accuracy < config.weak_threshold)
        .take(config.max_weak_topics)
        .map(|t| t.topic.clone())
        .collect()
}

/// Choose a practice set from `pool`.
///
/// An empty pool, or a custom count of zero, yields an empty set.
pub fn select_practice(
    pool: &[Question],
    mode: PracticeMode,
    topic_stats: &[TopicAccuracy],
    config: &PracticeConfig,
    rng: &mut dyn RandomSource,
) -> PracticeSet {
    let all: Vec<&Question> = pool.iter().collect();

    let random = |size: usize, mode: PracticeMode, rng: &mut dyn RandomSource| PracticeSet {
        mode,
        questions: sample(&all, size, rng).into_iter().cloned().collect(),
        weak_topics: Vec::new(),
    };

    match mode {
        PracticeMode::Quick => random(config.quick_size, mode, rng),
        PracticeMode::Custom(count) => random(count, mode, rng),
        PracticeMode::Smart if topic_stats.is_empty() => {
            tracing::debug!("no topic history, smart practice falls back to quick");
            random(config.quick_size, PracticeMode::Quick, rng)
        }
        PracticeMode::Smart => {
            let weak = weak_topics(topic_stats, config);
            let targeted: Vec<&Question> = all
                .iter()
                .copied()
                .filter(|q| weak.iter().any(|t| t == q.topic_or_default()))
                .collect();
            let mut chosen = sample(&targeted, config.smart_size, rng);

            let remaining = config.smart_size.saturating_sub(chosen.len());
            if remaining > 0 {
                let taken: HashSet<&str> = chosen.iter().map(|q| q.id.as_str()).collect();
                let rest: Vec<&Question> = all
                    .iter()
                    .copied()
                    .filter(|q| !taken.contains(q.id.as_str()))
                    .collect();
                chosen.extend(sample(&rest, remaining, rng));
            }

            PracticeSet {
                mode,
                questions: chosen.into_iter().cloned().collect(),
                weak_topics: weak,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always returns the identity permutation, reversed when asked.
    struct FixedRandom {
        reverse: bool,
    }

    impl RandomSource for FixedRandom {
        fn permutation(&mut self, len: usize) -> Vec<usize> {
            let mut order: Vec<usize> = (0..len).collect();
            if self.reverse {
                order.reverse();
            }
            order
        }
    }

    fn question(id: &str, topic: &str) -> Question {
        Question {
            id: id.into(),
            text: format!("Question {id}"),
            options: vec!["a".into(), "b".into()],
            correct_answer: 0,
            explanation: None,
            topic: Some(topic.into()),
        }
    }

    fn pool(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| question(&format!("q{i}"), if i % 2 == 0 { "Even" } else { "Odd" }))
            .collect()
    }

    fn accuracy(topic: &str, accuracy: f64) -> TopicAccuracy {
        TopicAccuracy {
            topic: topic.into(),
            correct: 0,
            total: 1,
            accuracy,
        }
    }

    fn ids(set: &PracticeSet) -> Vec<&str> {
        set.questions.iter().map(|q| q.id.as_str()).collect()
    }

    #[test]
    fn quick_is_bounded_by_pool_and_default_size() {
        let config = PracticeConfig::default();
        let mut rng = ThreadRandom;
        let big = pool(25);
        let set = select_practice(&big, PracticeMode::Quick, &[], &config, &mut rng);
        assert_eq!(set.questions.len(), 10);

        let small = pool(4);
        let set = select_practice(&small, PracticeMode::Quick, &[], &config, &mut rng);
        assert_eq!(set.questions.len(), 4);
    }

    #[test]
    fn samples_are_unique_members_of_the_pool() {
        let config = PracticeConfig::default();
        let questions = pool(15);
        let mut rng = SeededRandom::new(7);
        for count in [1, 5, 15, 40] {
            let set = select_practice(&questions, PracticeMode::Custom(count), &[], &config, &mut rng);
            assert_eq!(set.questions.len(), count.min(questions.len()));
            let unique: HashSet<_> = set.questions.iter().map(|q| &q.id).collect();
            assert_eq!(unique.len(), set.questions.len());
            assert!(set.questions.iter().all(|q| questions.contains(q)));
        }
    }

    #[test]
    fn seeded_random_is_reproducible() {
        let config = PracticeConfig::default();
        let questions = pool(20);
        let a = select_practice(&questions, PracticeMode::Quick, &[], &config, &mut SeededRandom::new(42));
        let b = select_practice(&questions, PracticeMode::Quick, &[], &config, &mut SeededRandom::new(42));
        assert_eq!(a, b);
    }

    #[test]
    fn fixed_permutation_gives_exact_output() {
        let config = PracticeConfig::default();
        let questions = pool(5);
        let set = select_practice(
            &questions,
            PracticeMode::Custom(3),
            &[],
            &config,
            &mut FixedRandom { reverse: true },
        );
        assert_eq!(ids(&set), vec!["q4", "q3", "q2"]);
    }

    #[test]
    fn empty_pool_yields_empty_set() {
        let config = PracticeConfig::default();
        for mode in [PracticeMode::Quick, PracticeMode::Custom(3), PracticeMode::Smart] {
            let set = select_practice(&[], mode, &[accuracy("Odd", 0.0)], &config, &mut ThreadRandom);
            assert!(set.questions.is_empty());
        }
    }

    #[test]
    fn smart_without_history_falls_back_to_quick() {
        let config = PracticeConfig::default();
        let questions = pool(12);
        let set = select_practice(
            &questions,
            PracticeMode::Smart,
            &[],
            &config,
            &mut FixedRandom { reverse: false },
        );
        assert_eq!(set.mode, PracticeMode::Quick);
        assert!(set.weak_topics.is_empty());
        assert_eq!(set.questions.len(), 10);
    }

    #[test]
    fn smart_targets_weak_topics_then_tops_up() {
        let config = PracticeConfig::default();
        let questions = pool(12);
        let stats = [accuracy("Odd", 20.0), accuracy("Even", 90.0)];
        let set = select_practice(
            &questions,
            PracticeMode::Smart,
            &stats,
            &config,
            &mut FixedRandom { reverse: false },
        );
        assert_eq!(set.mode, PracticeMode::Smart);
        assert_eq!(set.weak_topics, vec!["Odd"]);
        assert_eq!(
            ids(&set),
            vec!["q1", "q3", "q5", "q7", "q9", "q11", "q0", "q2", "q4", "q6"]
        );
    }

    #[test]
    fn smart_with_nothing_weak_draws_from_whole_pool() {
        let config = PracticeConfig::default();
        let questions = pool(6);
        let stats = [accuracy("Odd", 100.0)];
        let set = select_practice(&questions, PracticeMode::Smart, &stats, &config, &mut ThreadRandom);
        assert!(set.weak_topics.is_empty());
        assert_eq!(set.questions.len(), 6);
    }

    #[test]
    fn weak_topics_respect_threshold_and_cap() {
        let config = PracticeConfig::default();
        let stats = [
            accuracy("A", 0.0),
            accuracy("B", 10.0),
            accuracy("C", 50.0),
            accuracy("D", 69.9),
            accuracy("E", 70.0),
        ];
        assert_eq!(weak_topics(&stats, &config), vec!["A", "B", "C"]);
    }

    #[test]
    fn pool_dedupes_by_question_id() {
        let quiz = |id: &str, questions: Vec<Question>| Quiz {
            id: id.into(),
            class_id: "class1".into(),
            name: id.into(),
            questions,
            visible: true,
            created_by: "teacher1".into(),
        };
        let a = quiz("quiz1", vec![question("q1", "X"), question("q2", "X")]);
        let b = quiz("quiz2", vec![question("q2", "Y"), question("q3", "Y")]);
        let merged = question_pool([&a, &b]);
        let topics: Vec<_> = merged.iter().map(|q| q.topic_or_default()).collect();
        assert_eq!(merged.len(), 3);
        assert_eq!(topics, vec!["X", "X", "Y"]);
    }

    #[test]
    fn practice_quiz_has_no_class() {
        let set = PracticeSet {
            mode: PracticeMode::Quick,
            questions: pool(2),
            weak_topics: vec![],
        };
        let quiz = set.into_quiz("student1", Utc::now());
        assert!(quiz.is_practice());
        assert_eq!(quiz.name, PRACTICE_QUIZ_NAME);
        assert_eq!(quiz.created_by, "student1");
        assert!(quiz.id.starts_with("practice-"));
    }
}

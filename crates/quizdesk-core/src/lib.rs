//! quizdesk-core: core quiz engine, data model and analytics.
//!
//! This crate defines the school data model, the in-memory dataset with its
//! next-state mutations, and the pure computations (scoring, statistics,
//! leaderboards, practice selection) that the rest of quizdesk builds on.

pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod leaderboard;
pub mod model;
pub mod parser;
pub mod practice;
pub mod scoring;
pub mod statistics;

pub use dataset::Dataset;
pub use engine::QuizEngine;
pub use error::ValidationError;

//! quizdesk-report: result exports and class reports.
//!
//! - [`csv`]: the per-attempt results sheet students download
//! - [`html`]: a self-contained HTML report for a class

pub mod csv;
pub mod html;

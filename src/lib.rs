//! Scripted case lookup and autograding engine for detective agent workshops.
//!
//! `case-core` decodes an obfuscated case dataset, canonicalizes free-text
//! tool arguments (person names, timeframes, plates, phone numbers) into
//! stable lookup keys, resolves them against per-case scripted responses with
//! an optional fuzzy fallback, and grades submitted predictions against the
//! hidden answer key. The dataset is loaded once and read-only afterwards;
//! ground truth is never surfaced through the lookup API.

pub mod canonical;
pub mod codec;
pub mod dataset;
pub mod grader;
pub mod matching;
pub mod tools;

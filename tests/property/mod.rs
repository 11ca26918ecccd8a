//! Property-based tests

mod draft_proptest;
mod submission_proptest;

//! Property-based tests for merge and reply validation

mod validation;

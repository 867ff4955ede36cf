//! Property-based tests for validation and repair invariants

mod invariants;

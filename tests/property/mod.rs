//! Property-based tests for manifest and path handling

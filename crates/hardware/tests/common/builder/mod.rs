//! Test input builders.

//! Tests against a real Girino board.
//!
//! These tests are ignored by default and require actual hardware to run.
//! They should be run manually with the `--ignored` flag and
//! `GIRINO_TEST_PORT` set.

pub mod board_tests;
pub mod utils;

//! Integration tests

mod config_test;
mod engine_test;

//! Sequential endpoint validation for the solvency proof API: probe each endpoint
//! in a fixed order, classify every response and derive a readiness verdict.

pub mod cli;
pub mod collections;
pub mod error;
pub mod history;
pub mod http;
pub mod runner;
pub mod storage;
pub mod testing;
pub mod ui;

//! Console front end: reads commands from stdin, drives the form state
//! machine and prints results.
mod app;
mod effects;
mod input;
mod render;

pub use app::{run_interactive, run_once};

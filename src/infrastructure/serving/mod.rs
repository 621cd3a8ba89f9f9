//! Serving worker launcher implementation

mod process_launcher;

pub use process_launcher::ProcessServingLauncher;

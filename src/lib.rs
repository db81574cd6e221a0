pub mod app;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod probe;
pub mod progress;
pub mod runner;
pub mod utils;

#[cfg(test)]
mod tests;

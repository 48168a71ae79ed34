// Engine module
// Spawns simulated users and runs them for the length of a load test

pub mod runner;

pub use runner::{run, RunPlan};

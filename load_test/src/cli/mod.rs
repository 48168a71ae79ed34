mod args;

pub use args::{Cli, Mode, RunArgs};

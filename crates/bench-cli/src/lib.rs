//! query-bench command-line library.
//!
//! # Modules
//!
//! - `cli`: argument parsing with clap
//! - `command`: dot-command parsing for the shell
//! - `session`: shell state and command dispatch
//! - `commands`: startup (settings, logging, engine, store) and subcommands

pub mod cli;
pub mod command;
pub mod commands;
pub mod session;

pub use cli::{BaselineCommands, Cli, Commands};
pub use command::{Command, CommandError};
pub use commands::{handle_baselines, init_logging, load_settings, load_suite, open_store, run};
pub use session::{Flow, Session, StdinPrompt};

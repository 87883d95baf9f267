//! Terminal formatting for user-facing status lines

use colored::Colorize;

pub fn info(message: &str) -> String {
    format!("{} {}", "info:".green().bold(), message)
}

pub fn error(message: &str) -> String {
    format!("{} {}", "error:".red().bold(), message)
}

pub fn debug(message: &str) -> String {
    format!("{} {}", "debug:".dimmed(), message)
}

pub fn command(command: &str) -> String {
    format!("{} {}", "[RUN]".cyan(), command)
}

/// Heading shown above `--help` output
pub fn banner(name: &str, version: &str) -> String {
    format!("{} {}", name.bold(), version)
}

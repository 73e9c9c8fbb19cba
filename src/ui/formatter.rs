//! Formatting functions for terminal output.
//!
//! `format_*` functions build the text and are pure; `display_*` functions
//! print it. Styling goes through `console`, which drops colors when the
//! output is not a terminal (CI logs stay readable).

use crate::boundary::BoundaryWarning;
use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Text describing the tag change, or the initial tag when there is no previous one.
pub fn format_proposed_tag(old_tag: Option<&str>, new_tag: &str) -> String {
    match old_tag {
        Some(old) => format!(
            "{}\n  From: {}\n  To:   {}",
            style("Proposed Tag Change:").bold(),
            style(old).red(),
            style(new_tag).green()
        ),
        None => format!(
            "{}\n  New tag: {}",
            style("Initial Tag:").bold(),
            style(new_tag).green()
        ),
    }
}

pub fn display_proposed_tag(old_tag: Option<&str>, new_tag: &str) {
    println!("\n{}", format_proposed_tag(old_tag, new_tag));
}

/// Indented tag message, one line per message line
pub fn format_tag_message(message: &str) -> String {
    message
        .lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn display_tag_message(message: &str) {
    println!("\n{}", style("Tag message:").bold());
    println!("{}", format_tag_message(message));
}

/// Display manual push instruction for a tag created but not pushed.
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    println!(
        "\n{} To push this tag later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push {} {}", remote, tag)).cyan()
    );
}

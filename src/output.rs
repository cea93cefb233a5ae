//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! 001 jwage
//! 002 ocramius
//! 003 (unnamed)
//!
//! 3 requests
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! 001 jwage → user/jwage.html
//! 002 ocramius → user/ocramius.html
//!
//! Generated 1 index page, 2 user pages
//! ```

use crate::generate::{GenerateReport, INDEX_TEMPLATE};
use crate::model::User;
use crate::types::RequestCollection;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Username for display; empty usernames are shown as `(unnamed)`.
fn display_username(username: &str) -> &str {
    if username.is_empty() {
        "(unnamed)"
    } else {
        username
    }
}

// ============================================================================
// List
// ============================================================================

pub fn format_requests(requests: &RequestCollection) -> Vec<String> {
    let mut lines: Vec<String> = requests
        .iter()
        .enumerate()
        .map(|(i, req)| {
            let name = req.get_str("username").unwrap_or_default();
            format!("{} {}", format_index(i + 1), display_username(name))
        })
        .collect();
    lines.push(String::new());
    lines.push(plural(requests.len(), "request"));
    lines
}

pub fn print_requests(requests: &RequestCollection) {
    for line in format_requests(requests) {
        println!("{}", line);
    }
}

// ============================================================================
// Show
// ============================================================================

pub fn format_user(user: &User) -> Vec<String> {
    vec![
        display_username(user.username()).to_string(),
        format!("    Username: {:?}", user.username()),
    ]
}

pub fn print_user(user: &User) {
    for line in format_user(user) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut user_pages = 0;
    let mut other_pages = 0;

    for page in &report.pages {
        if page.template == INDEX_TEMPLATE {
            other_pages += 1;
            lines.push(format!("Home → {}", page.path));
        } else {
            user_pages += 1;
            lines.push(format!(
                "{} {} → {}",
                format_index(user_pages),
                display_username(&page.label),
                page.path
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}",
        plural(other_pages, "index page"),
        plural(user_pages, "user page")
    ));
    lines
}

pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

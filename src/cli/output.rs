// Output formatting and display for CLI

use crate::logs::Level;
use chrono::{DateTime, Local};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

/// One file of a backup chain as shown by `status`
#[derive(Debug, Clone)]
pub struct ChainFile {
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

/// Print an error message to stderr
pub fn print_error(error: &str) {
    eprintln!("{} {}", "✗ Error:".red().bold(), error);
}

/// Print a success message to stderr
pub fn print_success_msg(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message);
}

/// Print log lines, highlighting the level tag of full-format lines
pub fn print_logs(lines: &[String]) {
    if lines.is_empty() {
        println!("{}", "No logs available".yellow());
        return;
    }

    for line in lines {
        println!("{}", colorize_line(line));
    }
}

/// Print a table of the files in a backup chain
pub fn print_chain_table(base: &Path, files: &[ChainFile], max_size: Option<u64>) {
    #[derive(Tabled)]
    struct ChainRow {
        #[tabled(rename = "File")]
        file: String,
        #[tabled(rename = "Size")]
        size: String,
        #[tabled(rename = "Modified")]
        modified: String,
    }

    if files.is_empty() {
        println!(
            "{}",
            format!("No log files found for {}", base.display()).yellow()
        );
        return;
    }

    let rows: Vec<ChainRow> = files
        .iter()
        .map(|f| ChainRow {
            file: f
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| f.path.display().to_string()),
            size: format_size(f.size),
            modified: f
                .modified
                .map(|t| {
                    let datetime: DateTime<Local> = t.into();
                    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
                })
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    println!("\n{}\n", table);

    let total: u64 = files.iter().map(|f| f.size).sum();
    let mut summary = format!(
        "Total: {} file(s), {}",
        files.len(),
        format_size(total)
    );
    if let Some(max_size) = max_size {
        summary.push_str(&format!(", rotates at {}", format_size(max_size)));
    }
    println!("{}", summary.dimmed().italic());
}

/// Color the `[LEVEL]` field of a full-format line
fn colorize_line(line: &str) -> String {
    // Full layout: [timestamp][LEVEL ][...
    let Some(rest) = line.strip_prefix('[') else {
        return line.to_string();
    };
    let Some(ts_end) = rest.find("][") else {
        return line.to_string();
    };
    let after_ts = &rest[ts_end + 2..];
    let Some(level_end) = after_ts.find(']') else {
        return line.to_string();
    };

    let level_field = &after_ts[..level_end];
    let Ok(level) = level_field.parse::<Level>() else {
        return line.to_string();
    };

    let colored_level = match level {
        Level::Error => level_field.red().bold(),
        Level::Warn => level_field.yellow(),
        Level::Info => level_field.green(),
        _ => level_field.bright_black(),
    };

    format!(
        "[{}][{}]{}",
        &rest[..ts_end],
        colored_level,
        &after_ts[level_end + 1..]
    )
}

/// Format a byte count in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes < KB {
        format!("{}B", bytes)
    } else if bytes < MB {
        format!("{:.1}KB", bytes as f64 / KB as f64)
    } else if bytes < GB {
        format!("{:.1}MB", bytes as f64 / MB as f64)
    } else {
        format!("{:.2}GB", bytes as f64 / GB as f64)
    }
}

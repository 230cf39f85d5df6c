// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;
use mj_core::JobRecord;
use mj_engine::report::format_duration;
use serde::Serialize;

use crate::color;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One-line progress update printed while following a job.
pub fn progress_line(record: &JobRecord) -> String {
    let mut line = format!(
        "{} {} {:>3}% {}",
        record.id,
        color::status(record.status),
        record.progress,
        color::context(&format!("pid {}", record.display_pid())),
    );
    if let Some(mirror) = record.mirror_pid {
        line.push_str(&color::context(&format!(" (mirror {mirror})")));
    }
    line
}

/// Multi-line summary of a retired job.
pub fn summary_text(record: &JobRecord) -> String {
    let mut out = format!("{}\n", color::header(&format!("Job {}", record.id)));
    let mut field = |label: &str, value: String| {
        out.push_str(&format!("  {:<12}{}\n", label, value));
    };
    field("Status", color::status(record.status));
    field("Component", format!("{} {}", record.component, record.version));
    field("Name", record.name.clone());
    if let Some(filter) = &record.filter {
        field("Filter", filter.clone());
    }
    field("Dry run", record.dry_run.to_string());
    field("Progress", format!("{}%", record.progress));
    if let Some(end) = record.end_time {
        field("Duration", format_duration(end - record.start_time));
    }
    if let Some(code) = record.return_code {
        field("Exit code", code.to_string());
    }
    field("Log", record.log_file.display().to_string());
    out
}

/// Print `value` as pretty JSON, or `text` otherwise.
pub fn print_or_json<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce() -> String,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

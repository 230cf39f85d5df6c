// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-format text rendering of a summary report.

use super::stats::ReportStats;
use chrono::{DateTime, Utc};
use mj_core::JobRecord;

const RULE: &str =
    "================================================================================";
const LABEL_WIDTH: usize = 24;
const NA: &str = "N/A";

/// `512 B`, `1.50 KB`, `3.25 MB`, ...
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

/// `H:MM:SS`, hours unbounded.
pub fn format_duration(duration: chrono::Duration) -> String {
    let secs = duration.num_seconds().max(0);
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Transfer rate in MB/s when both size and duration are positive.
pub fn transfer_rate(bytes: u64, duration: chrono::Duration) -> Option<String> {
    let secs = duration.num_milliseconds() as f64 / 1000.0;
    if bytes == 0 || secs <= 0.0 {
        return None;
    }
    Some(format!("{:.2} MB/s", bytes as f64 / (1024.0 * 1024.0) / secs))
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

struct Sections {
    out: String,
}

impl Sections {
    fn heading(&mut self, title: &str) {
        self.out.push('\n');
        self.out.push_str(title);
        self.out.push('\n');
        self.out.push_str(&"-".repeat(title.len()));
        self.out.push('\n');
    }

    fn field(&mut self, label: &str, value: impl std::fmt::Display) {
        let label = format!("{label}:");
        self.out.push_str(&format!("{label:<width$}{value}\n", width = LABEL_WIDTH));
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }
}

pub fn render(record: &JobRecord, stats: &ReportStats, generated_at: DateTime<Utc>) -> String {
    let mut s = Sections { out: String::new() };
    let elapsed = record.end_time.map(|end| end - record.start_time);
    let dir = stats.dir.as_ref();

    s.line(RULE);
    s.line("                    CP4I DOWNLOAD SUMMARY REPORT");
    s.line(RULE);

    s.heading("DOWNLOAD INFORMATION");
    s.field("Job ID", &record.id);
    s.field("Component", &record.component);
    s.field("Version", &record.version);
    s.field("Directory Name", &record.name);
    s.field("Status", record.status.to_string().to_uppercase());
    s.field("Process ID", record.display_pid());
    s.field("Exit Code", record.return_code.map_or_else(|| NA.to_string(), |c| c.to_string()));
    s.field("Dry Run", yes_no(record.dry_run));

    s.heading("TIMING DETAILS");
    s.field("Start Time", record.start_time.to_rfc3339());
    s.field("End Time", record.end_time.map_or_else(|| NA.to_string(), |t| t.to_rfc3339()));
    s.field("Duration", elapsed.map_or_else(|| NA.to_string(), format_duration));
    s.field(
        "Transfer Rate",
        elapsed
            .zip(dir)
            .and_then(|(elapsed, dir)| transfer_rate(dir.size_bytes, elapsed))
            .unwrap_or_else(|| NA.to_string()),
    );

    s.heading("CONFIGURATION");
    s.field("Home Directory", record.home_dir.display());
    s.field("Download Directory", stats.job_dir.display());
    s.field("Target Registry", &record.final_registry);
    s.field("Registry Auth File", record.registry_auth_file.display());
    s.field("Filter Pattern", record.filter.as_deref().unwrap_or("None"));

    s.heading("FILE SYSTEM DETAILS");
    s.field("Directory Exists", yes_no(dir.is_some()));
    s.field(
        "Directory Size",
        dir.map_or_else(|| NA.to_string(), |d| format_bytes(d.size_bytes)),
    );
    s.field("Total Files", dir.map_or(0, |d| d.files));
    s.field("Total Directories", dir.map_or(0, |d| d.dirs));
    s.field("Image Files (.tar)", dir.map_or(0, |d| d.image_archives));
    s.field("Mapping Files", dir.map_or(0, |d| d.mapping_files));
    s.field("Log Files", dir.map_or(0, |d| d.log_files));

    s.heading("KEY FILES");
    s.field("Download Log", stats.log.path.display());
    s.field("  - Exists", yes_no(stats.log.exists()));
    s.field("  - Size", stats.log.size.map_or_else(|| NA.to_string(), format_bytes));
    s.line("");
    s.field("Mapping File", stats.mapping.path.display());
    s.field("  - Exists", yes_no(stats.mapping.exists()));
    s.field("  - Images Listed", stats.images_listed);
    s.line("");
    s.field("Config File", stats.image_config.path.display());
    s.field("  - Exists", yes_no(stats.image_config.exists()));

    s.heading("SYSTEM INFORMATION");
    s.field("Hostname", stats.hostname.as_deref().unwrap_or(NA));
    s.line(&format!("Disk Space ({}):", record.home_dir.display()));
    match stats.disk {
        Some(disk) => s.line(&format!(
            "  Total: {}, Used: {}, Available: {}, Use%: {}%",
            format_bytes(disk.total),
            format_bytes(disk.used),
            format_bytes(disk.available),
            disk.use_percent()
        )),
        None => s.line(&format!("  {NA}")),
    }

    if !stats.error_lines.is_empty() {
        s.heading("ERROR DETAILS");
        s.line("Recent errors from log file:");
        for line in &stats.error_lines {
            s.line(line);
        }
    }

    s.line("");
    s.line(RULE);
    s.field("Report Generated", generated_at.to_rfc3339());
    s.line(RULE);
    s.out
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded reads of script logs.
//!
//! [`tail_lines`] never fails: an absent or unreadable log reads as empty.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

const CHUNK_SIZE: u64 = 8 * 1024;

/// Last `n` lines of the file at `path`.
///
/// Reads backwards in fixed-size chunks until enough newlines have been
/// seen, so large logs are never loaded whole.
pub fn tail_lines(path: &Path, n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    match read_tail(path, n) {
        Ok(lines) => lines,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "log tail unavailable");
            Vec::new()
        }
    }
}

fn read_tail(path: &Path, n: usize) -> std::io::Result<Vec<String>> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();

    let mut pos = len;
    let mut buf: Vec<u8> = Vec::new();
    while pos > 0 {
        let step = CHUNK_SIZE.min(pos);
        pos -= step;
        file.seek(SeekFrom::Start(pos))?;
        let mut chunk = vec![0u8; step as usize];
        file.read_exact(&mut chunk)?;
        chunk.extend_from_slice(&buf);
        buf = chunk;

        // One extra newline covers the trailing line terminator.
        if buf.iter().filter(|&&b| b == b'\n').count() > n {
            break;
        }
    }

    let text = String::from_utf8_lossy(&buf);
    let lines: Vec<&str> = text.lines().collect();
    // When the scan stopped early the first line may be partial.
    let complete = if pos > 0 && !lines.is_empty() { &lines[1..] } else { &lines[..] };
    let start = complete.len().saturating_sub(n);
    Ok(complete[start..].iter().map(|line| line.to_string()).collect())
}

/// Whole log content, lossily decoded.
pub fn read_all(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
#[path = "log_tail_tests.rs"]
mod tests;

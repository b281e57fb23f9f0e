//! Candidate CSV parsing
//!
//! One candidate per line: `name,class,position_key`. No header is required; a
//! first line naming exactly those columns is skipped. Blank lines are ignored
//! and lines missing any of the three fields are reported as skipped.

use csv::{Position, ReaderBuilder, StringRecord, Trim};
use serde::Serialize;

/// Column names of the optional header line
const HEADER: [&str; 3] = ["name", "class", "position_key"];

/// One candidate line, fields trimmed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CandidateRow {
    pub name: String,
    pub class: String,
    pub position_key: String,
}

/// A non-blank line that did not yield a candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-based line number in the uploaded text
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCsv {
    pub rows: Vec<CandidateRow>,
    pub skipped: Vec<SkippedLine>,
}

/// Parse candidate CSV text
pub fn parse_candidate_csv(text: &str) -> ParsedCsv {
    let mut parsed = ParsedCsv::default();
    let mut seen_content = false;

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                parsed.skipped.push(SkippedLine {
                    line: e.position().map_or(0, |p| record_line(text, p)),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        // Whitespace-only lines come through as a single empty field
        if record.iter().all(str::is_empty) {
            continue;
        }

        if !seen_content {
            seen_content = true;
            if is_header(&record) {
                continue;
            }
        }

        let field = |i: usize| record.get(i).unwrap_or_default().to_string();
        let (name, class, position_key) = (field(0), field(1), field(2));

        if name.is_empty() || class.is_empty() || position_key.is_empty() {
            parsed.skipped.push(SkippedLine {
                line: record.position().map_or(0, |p| record_line(text, p)),
                reason: "name, class and position_key are required".to_string(),
            });
            continue;
        }

        parsed.rows.push(CandidateRow {
            name,
            class,
            position_key,
        });
    }

    parsed
}

/// 1-based line a record starts on
///
/// The reader notes a record's position before passing over blank lines, so
/// line breaks at that offset still belong in front of the record.
fn record_line(text: &str, pos: &Position) -> usize {
    let bytes = text.as_bytes();
    let mut start = (pos.byte() as usize).min(bytes.len());
    while start < bytes.len() && matches!(bytes[start], b'\r' | b'\n') {
        start += 1;
    }
    1 + bytes[..start].iter().filter(|&&b| b == b'\n').count()
}

fn is_header(record: &StringRecord) -> bool {
    record.len() >= HEADER.len()
        && record
            .iter()
            .zip(HEADER.iter())
            .all(|(f, h)| f.eq_ignore_ascii_case(h))
}

//! Column selection and ring rendering.
//!
//! A field list such as `1:id,2,5-12:polygon` selects output columns by
//! 1-based position. A `start-end` range (inclusive) is rendered as a ring of
//! `[x,y]` pairs taken from consecutive fields.

use std::sync::OnceLock;

use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// 0-based column copied verbatim
    Single(usize),
    /// 0-based inclusive column range rendered as a ring
    Ring { start: usize, end: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub column: Column,
    /// Output header; a leading number refers to an input header column
    pub name: String,
}

fn field_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(\d+)\s*(?:-\s*(\d+)\s*)?(?::(.+))?$").expect("valid field regex")
    })
}

fn one_based(raw: &str) -> Result<usize> {
    let n: usize = raw.parse().with_context(|| format!("bad column number {:?}", raw))?;
    n.checked_sub(1)
        .ok_or_else(|| anyhow!("column numbers start at 1"))
}

/// Parse a comma separated field list.
pub fn parse_fields(list: &str) -> Result<Vec<FieldSpec>> {
    list.split(',')
        .enumerate()
        .map(|(i, field)| {
            let caps = field_pattern()
                .captures(field)
                .ok_or_else(|| anyhow!("field {} ({:?}) is invalid", i + 1, field))?;

            let start = one_based(&caps[1])?;
            let column = match caps.get(2) {
                None => Column::Single(start),
                Some(end) => {
                    let end = one_based(end.as_str())?;
                    if end < start {
                        bail!("field {} ({:?}) has a reversed range", i + 1, field);
                    }
                    Column::Ring { start, end }
                }
            };

            let name = match caps.get(3) {
                Some(name) => name.as_str().trim().to_string(),
                None => field.split(':').next().unwrap_or(field).trim().to_string(),
            };

            Ok(FieldSpec { column, name })
        })
        .collect()
}

/// Output header names. Names starting with a digit are replaced by the text
/// of that (1-based) column in the input header row.
pub fn header_names(fields: &[FieldSpec], header: &[&str]) -> Result<Vec<String>> {
    fields
        .iter()
        .map(|f| {
            if !f.name.starts_with(|c: char| c.is_ascii_digit()) {
                return Ok(f.name.clone());
            }
            let digits: String = f.name.chars().take_while(|c| c.is_ascii_digit()).collect();
            let idx = one_based(&digits)?;
            header
                .get(idx)
                .map(|s| s.to_string())
                .ok_or_else(|| anyhow!("header has no column {}", idx + 1))
        })
        .collect()
}

/// Render `[x,y]` pairs from consecutive values.
///
/// Stops at the first empty value, drops a dangling odd value, and closes the
/// ring when it has at least two pairs whose first and last differ.
pub fn render_ring(values: &[&str]) -> String {
    let values: Vec<&str> = values
        .iter()
        .map(|v| v.trim())
        .take_while(|v| !v.is_empty())
        .collect();

    let mut pairs: Vec<(&str, &str)> = values.chunks_exact(2).map(|p| (p[0], p[1])).collect();

    if pairs.len() >= 2 && pairs.first() != pairs.last() {
        pairs.push(pairs[0]);
    }

    let body: Vec<String> = pairs
        .iter()
        .map(|(x, y)| format!("[{},{}]", x, y))
        .collect();
    format!("[{}]", body.join(","))
}

/// Render one input row into output fields.
pub fn render_row(fields: &[FieldSpec], row: &[&str]) -> Result<Vec<String>> {
    fields
        .iter()
        .map(|f| match f.column {
            Column::Single(col) => row
                .get(col)
                .map(|s| s.to_string())
                .ok_or_else(|| anyhow!("column {} is beyond row size {}", col + 1, row.len())),
            Column::Ring { start, end } => {
                if start >= row.len() {
                    bail!("column {} is beyond row size {}", start + 1, row.len());
                }
                let end = end.min(row.len() - 1);
                Ok(render_ring(&row[start..=end]))
            }
        })
        .collect()
}

//! Permissive CSV ingestion.
//!
//! The dataset files are hand-exported spreadsheets, so the parser is line
//! oriented and never fails: quoted fields may contain commas, escaped quotes
//! are collapsed, short rows are padded with empty strings and surplus fields
//! are dropped. No type coercion happens here.

use crate::dataset::{Dataset, DatasetRow};

/// Parse CSV text into a [`Dataset`].
///
/// Line 0 is the header. Lines that are blank after trimming are skipped
/// wherever they appear, so a trailing newline never produces an empty row.
///
/// ```
/// use atlas_core::csv::parse_csv;
///
/// let dataset = parse_csv("ISO3,Name,2020\nUSA,\"United, States\",5.5\n");
/// assert_eq!(dataset.rows.len(), 1);
/// assert_eq!(dataset.rows[0].get("Name"), Some("United, States"));
/// ```
pub fn parse_csv(text: &str) -> Dataset {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Dataset::default();
    };

    let headers: Vec<String> = split_line(header_line).into_iter().map(unquote).collect();

    let rows = lines
        .map(|line| {
            let fields = split_line(line);
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let value = fields.get(i).map(|f| unquote(f)).unwrap_or_default();
                    (header.clone(), value)
                })
                .collect::<DatasetRow>()
        })
        .collect();

    Dataset { headers, rows }
}

/// Split a line on commas that are outside quoted spans.
///
/// A comma separates fields only when an even number of `"` characters
/// precede it on the line. Quotes are kept in the returned slices; see
/// [`unquote`].
pub fn split_line(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;

    for (i, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(&line[start..]);
    fields
}

/// Strip one pair of enclosing quotes (only when both ends carry one), then
/// collapse doubled quotes inside the remaining content.
pub fn unquote(field: &str) -> String {
    let inner = if field.len() >= 2 && field.starts_with('"') && field.ends_with('"') {
        &field[1..field.len() - 1]
    } else {
        field
    };
    inner.replace("\"\"", "\"")
}

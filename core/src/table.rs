//! Reads a Gherkin two-column data table into a `RequestDescriptor`.
//!
//! ```text
//! | request_base | https://localhost:8080/api/v1 |
//! | request_path | users/5                       |
//! | headers      | key:myKey                     |
//! ```
//!
//! Blank lines and `#` comments are skipped. Cells are trimmed, and `\|`,
//! `\\` and `\n` unescape the way Gherkin does. Each key may appear once.

use crate::descriptor::RequestDescriptor;
use crate::error::TableError;

pub fn parse_table(text: &str) -> Result<RequestDescriptor, TableError> {
    let mut descriptor = RequestDescriptor::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let cells = split_row(trimmed).ok_or(TableError::NotARow { line })?;
        let [key, value]: [String; 2] = cells
            .try_into()
            .map_err(|cells: Vec<String>| TableError::WrongColumnCount {
                line,
                found: cells.len(),
            })?;
        if descriptor.get(&key).is_some() {
            return Err(TableError::DuplicateKey { line, key });
        }
        descriptor.insert(key, value);
    }
    Ok(descriptor)
}

/// Split `| a | b |` into trimmed, unescaped cells. `None` when the line is
/// not delimited by pipes.
fn split_row(line: &str) -> Option<Vec<String>> {
    let rest = line.strip_prefix('|')?;
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = rest.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('|') => cell.push('|'),
                Some('\\') => cell.push('\\'),
                Some('n') => cell.push('\n'),
                Some(other) => {
                    cell.push('\\');
                    cell.push(other);
                }
                None => cell.push('\\'),
            },
            '|' => cells.push(std::mem::take(&mut cell).trim().to_string()),
            c => cell.push(c),
        }
    }
    // Text after the last unescaped pipe means the row was never closed.
    if !cell.trim().is_empty() {
        return None;
    }
    Some(cells)
}

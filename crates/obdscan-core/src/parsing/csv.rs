//! Quote-aware reader for comma-separated logs exported by OBD-II dongles and apps.

/// A parsed CSV document: trimmed header names plus rows padded to header width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Cells of column `index`, one per row.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or(""))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Parse CSV text. The error string describes the first structural problem found.
///
/// A document with no header at all parses to an empty table.
pub fn parse_csv(text: &str) -> Result<CsvTable, String> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = split_records(text)?.into_iter();

    let headers: Vec<String> = match records.next() {
        Some(record) => record.into_iter().map(|h| h.trim().to_string()).collect(),
        None => return Ok(CsvTable::default()),
    };

    let width = headers.len();
    let mut rows = Vec::new();
    for (i, mut record) in records.enumerate() {
        if record.len() > width {
            // header is line 1, first data row is line 2
            return Err(format!(
                "row {} has {} fields, expected {}",
                i + 2,
                record.len(),
                width
            ));
        }
        record.resize(width, String::new());
        rows.push(record);
    }

    Ok(CsvTable { headers, rows })
}

/// Split text into records of unquoted fields, skipping blank lines.
///
/// Quoted fields may contain commas, line breaks and `""` escapes.
fn split_records(text: &str) -> Result<Vec<Vec<String>>, String> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    // Whether the current line holds anything besides its terminator
    let mut touched = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => {
                in_quotes = true;
                touched = true;
            }
            ',' if !in_quotes => {
                record.push(std::mem::take(&mut field));
                touched = true;
            }
            '\r' | '\n' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                if touched {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                touched = false;
            }
            _ => {
                field.push(ch);
                touched = true;
            }
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".into());
    }
    if touched {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}

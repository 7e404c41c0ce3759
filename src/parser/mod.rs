//! Semicolon-delimited CSV loading with encoding auto-detection.
//!
//! Input files are exports with a fixed `;` delimiter, but the encoding
//! varies in practice, so raw bytes are sniffed before decoding. Rows are
//! parsed into an immutable [`Table`] snapshot that the transform stages
//! read by column name.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{CsvError, CsvResult};

/// Delimiter used by all three input files.
pub const DELIMITER: u8 = b';';

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).to_string()),
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.to_string()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        _ => {
            // Fallback: UTF-8 with lossy conversion
            String::from_utf8_lossy(bytes).to_string()
        }
    };
    Ok(decoded)
}

// =============================================================================
// Table
// =============================================================================

/// An immutable parsed table: headers, a header lookup map, and rows.
///
/// Transform stages never mutate a `Table`; they return new ones.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
    encoding: String,
}

impl Table {
    /// Build a table from headers and rows.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();
        Self {
            headers,
            index,
            rows,
            encoding: "utf-8".to_string(),
        }
    }

    /// Column headers, in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Detected (or assumed) encoding of the source file.
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Index of a column, or `MissingColumn`.
    pub fn column_index(&self, name: &str) -> CsvResult<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| CsvError::MissingColumn(name.to_string()))
    }

    /// Cell value by row and column name.
    ///
    /// Rows shorter than the header (the reader is flexible) read as empty.
    pub fn cell(&self, row: usize, column: &str) -> CsvResult<&str> {
        let idx = self.column_index(column)?;
        Ok(self.rows[row].get(idx).map(String::as_str).unwrap_or(""))
    }

    /// A full data row.
    pub fn row(&self, row: usize) -> &[String] {
        &self.rows[row]
    }

    /// Cell value by row and column name, `None` when the cell is empty.
    pub fn optional_cell(&self, row: usize, column: &str) -> CsvResult<Option<String>> {
        let value = self.cell(row, column)?.trim();
        Ok(if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        })
    }

    /// Headers whose name contains `needle`, in file order.
    ///
    /// Used to discover indexed column families such as the target-country
    /// columns without hardcoding how many indices the export carries.
    pub fn columns_containing(&self, needle: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|h| h.contains(needle))
            .map(String::as_str)
            .collect()
    }

    /// Rows as JSON objects keyed by column header.
    pub fn json_rows(&self) -> Vec<serde_json::Value> {
        self.rows
            .iter()
            .map(|row| {
                let mut obj = serde_json::Map::new();
                for (i, header) in self.headers.iter().enumerate() {
                    let value = row.get(i).map(String::as_str).unwrap_or("");
                    obj.insert(header.clone(), serde_json::json!(value));
                }
                serde_json::Value::Object(obj)
            })
            .collect()
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Parse decoded CSV content into a [`Table`].
pub fn parse_table(content: &str) -> CsvResult<Table> {
    // Remove UTF-8 BOM if present
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CsvError::ParseError(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| CsvError::ParseError(e.to_string()))?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }

    Ok(Table::new(headers, rows))
}

/// Load a table from a file, auto-detecting the encoding.
pub fn load_table<P: AsRef<Path>>(path: P) -> CsvResult<Table> {
    let bytes = std::fs::read(path.as_ref())?;
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let encoding = detect_encoding(&bytes);
    let content = decode_content(&bytes, &encoding)?;

    let mut table = parse_table(&content)?;
    table.encoding = encoding;
    Ok(table)
}

/// The three loaded input tables.
///
/// Investors and involvements are carried as raw tables; only the deals
/// table is transformed in this pass.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub deals: Table,
    pub investors: Table,
    pub involvements: Table,
}

/// Load the three input files.
pub fn load_inputs<P: AsRef<Path>>(deals: P, investors: P, involvements: P) -> CsvResult<Inputs> {
    Ok(Inputs {
        deals: load_table(deals)?,
        investors: load_table(investors)?,
        involvements: load_table(involvements)?,
    })
}

use crate::error::LoadError;
use crate::record::{BugRecord, Field};
use crate::store::SHEET_NAME;
use calamine::{Data, Reader, Xlsx, open_workbook};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

lazy_static! {
    // OOXML escape for characters XML cannot carry, e.g. `_x000D_` for '\r'.
    // A literal `_x` is itself written as `_x005F_x`.
    static ref OOXML_ESCAPE: Regex = Regex::new(r"_x([0-9A-Fa-f]{4})_").unwrap();
}

/// Read bug records back from an exported workbook on disk
///
/// # Examples
/// ```no_run
/// use bug_report::loader::from_excel;
///
/// match from_excel("Bug_Report.xlsx") {
///     Ok(records) => println!("{} bug records", records.len()),
///     Err(e) => eprintln!("Error loading report: {}", e),
/// }
/// ```
pub fn from_excel(filepath: impl AsRef<Path>) -> Result<Vec<BugRecord>, LoadError> {
    let workbook: Xlsx<_> = open_workbook(filepath)?;
    read_records(workbook)
}

/// Read bug records from an in-memory xlsx payload
pub fn from_xlsx_bytes(bytes: &[u8]) -> Result<Vec<BugRecord>, LoadError> {
    let workbook = Xlsx::new(Cursor::new(bytes))?;
    read_records(workbook)
}

fn read_records<RS: Read + Seek>(mut workbook: Xlsx<RS>) -> Result<Vec<BugRecord>, LoadError> {
    if !workbook.sheet_names().iter().any(|n| n == SHEET_NAME) {
        return Err(LoadError::MissingSheet(SHEET_NAME.to_string()));
    }
    let range = workbook.worksheet_range(SHEET_NAME)?;
    let mut rows = range.rows();

    // Columns are matched by header name, so reordered sheets still load.
    let header: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(cell_text).collect())
        .unwrap_or_default();
    let columns = Field::ALL
        .iter()
        .map(|field| {
            header
                .iter()
                .position(|h| h == field.name())
                .map(|col| (*field, col))
                .ok_or_else(|| LoadError::MissingColumn(field.name().to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut records = Vec::new();
    for (r, row) in rows.enumerate() {
        let mut record = BugRecord::default();
        for (field, col) in &columns {
            let value = row.get(*col).map(cell_text).unwrap_or_default();
            // Blank selection cells keep their defaults
            if value.is_empty() && matches!(field, Field::Priority | Field::Status) {
                continue;
            }
            record
                .set(*field, &value)
                .map_err(|source| LoadError::Field { row: r + 2, source })?;
        }
        records.push(record);
    }

    log::debug!("loaded {} records from sheet {SHEET_NAME:?}", records.len());
    Ok(records)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => unescape_ooxml(s),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn unescape_ooxml(text: &str) -> String {
    OOXML_ESCAPE
        .replace_all(text, |caps: &Captures| {
            u32::from_str_radix(&caps[1], 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

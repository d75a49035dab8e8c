use crate::error::ExportError;
use crate::record::{BugRecord, Field};
use crate::store::SHEET_NAME;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

/// Convert bug records to CSV format
///
/// The first line holds the camelCase field names; every record follows on
/// its own line in the same column order. Values containing commas, quotes,
/// or line breaks (`\n` or `\r`) are quoted with inner quotes doubled.
///
/// # Examples
/// ```
/// use bug_report::downloader::to_csv;
/// use bug_report::record::BugRecord;
///
/// let csv = to_csv(&[BugRecord::seed()]);
/// assert!(csv.starts_with("bugNo,bugType,module"));
/// ```
pub fn to_csv(records: &[BugRecord]) -> String {
    let mut csv_content = String::new();
    let headers: Vec<&str> = Field::ALL.iter().map(|f| f.name()).collect();
    push_csv_line(&mut csv_content, headers.iter().copied());

    for record in records {
        let values = record.values();
        push_csv_line(&mut csv_content, values.iter().map(String::as_str));
    }

    csv_content
}

fn push_csv_line<'a>(out: &mut String, values: impl Iterator<Item = &'a str>) {
    for (c, value) in values.enumerate() {
        if c > 0 {
            out.push(',');
        }
        if value.contains([',', '"', '\n', '\r']) {
            let escaped = value.replace('"', "\"\"");
            out.push_str(&format!("\"{}\"", escaped));
        } else {
            out.push_str(value);
        }
    }
    out.push('\n');
}

/// Convert bug records to XLSX format
///
/// Builds a workbook with a single sheet named `Bug Report`. Row 0 is the
/// header row of field names (bold); each record is written below it as
/// text cells, one column per field.
///
/// # Examples
/// ```
/// use bug_report::downloader::to_xlsx;
///
/// let xlsx = to_xlsx(&[]).unwrap();
/// assert!(!xlsx.is_empty());
/// ```
pub fn to_xlsx(records: &[BugRecord]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    worksheet.set_name(SHEET_NAME)?;

    let header_format = Format::new().set_bold();
    for field in Field::ALL {
        let col = field.index() as u16;
        worksheet.write_string_with_format(0, col, field.name(), &header_format)?;
        worksheet.set_column_width(col, column_width(field, records))?;
    }

    for (r, record) in records.iter().enumerate() {
        let row = (r + 1) as u32;
        for field in Field::ALL {
            let value = record.get(field);
            // Excel has no empty string cells; leaving them out reads back as blank.
            if !value.is_empty() {
                worksheet.write_string(row, field.index() as u16, &value)?;
            }
        }
    }

    workbook.push_worksheet(worksheet);

    let buffer = workbook.save_to_buffer()?;

    Ok(buffer)
}

// Widest value in the column, clamped so long descriptions stay readable.
fn column_width(field: Field, records: &[BugRecord]) -> f64 {
    let widest = records
        .iter()
        .map(|r| r.get(field).chars().count())
        .chain(std::iter::once(field.name().len()))
        .max()
        .unwrap_or(0);
    (widest.clamp(8, 60) + 2) as f64
}

use crate::downloader;
use crate::error::{ExportError, FieldError};
use crate::record::{BugRecord, Field};
use serde::Serialize;

pub const XLSX_FILE_NAME: &str = "Bug_Report.xlsx";
pub const CSV_FILE_NAME: &str = "Bug_Report.csv";
pub const SHEET_NAME: &str = "Bug Report";

/// User-facing confirmation shown after a successful action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    BugAdded,
    ExcelExported,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::BugAdded => "✅ Bug entry added successfully!",
            Notice::ExcelExported => "📁 Excel file exported successfully!",
        }
    }
}

/// An encoded report ready to be handed to the user as a download
#[derive(Clone, Debug)]
pub struct Export {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
    pub notice: Notice,
}

/// Append-only list of submitted bug records plus the draft being edited.
///
/// Stored records are never changed after `submit_draft` pushes them; the
/// draft is the only mutable record.
#[derive(Clone, Debug, Default)]
pub struct RecordStore {
    records: Vec<BugRecord>,
    draft: BugRecord,
}

impl RecordStore {
    /// Empty store, blank draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the seeded `BUG-00126` entry
    pub fn seeded() -> Self {
        RecordStore {
            records: vec![BugRecord::seed()],
            draft: BugRecord::default(),
        }
    }

    pub fn records(&self) -> &[BugRecord] {
        &self.records
    }

    pub fn draft(&self) -> &BugRecord {
        &self.draft
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Overwrite one field of the draft by its camelCase name.
    pub fn update_draft_field(&mut self, field_name: &str, value: &str) -> Result<(), FieldError> {
        let field: Field = field_name.parse().inspect_err(|e| log::warn!("{e}"))?;
        self.draft
            .set(field, value)
            .inspect_err(|e| log::warn!("{e}"))?;
        log::debug!("draft.{field} = {value:?}");
        Ok(())
    }

    /// Append a copy of the draft, then reset the draft to its defaults.
    pub fn submit_draft(&mut self) -> Notice {
        let record = std::mem::take(&mut self.draft);
        log::info!(
            "added bug {:?} ({} records)",
            record.bug_no,
            self.records.len() + 1
        );
        self.records.push(record);
        Notice::BugAdded
    }

    /// Encode every record as a single-sheet xlsx workbook.
    ///
    /// Headers come from the field table, so an empty store still yields a
    /// valid workbook with a header row and no data rows.
    pub fn export_to_spreadsheet(&self) -> Result<Export, ExportError> {
        let bytes = downloader::to_xlsx(&self.records)
            .inspect_err(|e| log::error!("xlsx export failed: {e}"))?;
        log::info!(
            "exported {} records to {XLSX_FILE_NAME} ({} bytes)",
            self.records.len(),
            bytes.len()
        );
        Ok(Export {
            file_name: XLSX_FILE_NAME,
            content_type: "application/octet-stream",
            bytes,
            notice: Notice::ExcelExported,
        })
    }

    pub fn export_csv(&self) -> Export {
        let text = downloader::to_csv(&self.records);
        log::info!("exported {} records to {CSV_FILE_NAME}", self.records.len());
        Export {
            file_name: CSV_FILE_NAME,
            content_type: "text/csv; charset=utf-8",
            bytes: text.into_bytes(),
            notice: Notice::ExcelExported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Priority, Status};

    #[test]
    fn seeded_store_has_one_record() {
        let store = RecordStore::seeded();
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0], BugRecord::seed());
        assert_eq!(store.draft(), &BugRecord::default());
    }

    #[test]
    fn submit_appends_snapshot_and_resets_draft() {
        let mut store = RecordStore::seeded();
        store.update_draft_field("bugNo", "BUG-00200").unwrap();
        store.update_draft_field("priority", "Critical").unwrap();

        let notice = store.submit_draft();
        assert_eq!(notice, Notice::BugAdded);
        assert_eq!(store.len(), 2);

        let added = &store.records()[1];
        assert_eq!(added.bug_no, "BUG-00200");
        assert_eq!(added.priority, Priority::Critical);
        assert_eq!(added.status, Status::Open);
        assert_eq!(added.module, "");
        assert!(added.roles.is_empty());
        assert_eq!(store.draft(), &BugRecord::default());
    }

    #[test]
    fn earlier_records_survive_later_edits() {
        let mut store = RecordStore::new();
        for n in 0..5 {
            store.update_draft_field("bugNo", &format!("BUG-{n}")).unwrap();
            store.update_draft_field("status", "Fixed").unwrap();
            let before = store.draft().clone();
            store.submit_draft();
            assert_eq!(store.len(), n + 1);
            assert_eq!(store.records()[n], before);
            assert_eq!(store.draft(), &BugRecord::default());
        }
        store.update_draft_field("bugNo", "changed").unwrap();
        assert_eq!(store.records()[0].bug_no, "BUG-0");
    }

    #[test]
    fn empty_draft_is_accepted() {
        let mut store = RecordStore::new();
        store.submit_draft();
        assert_eq!(store.records(), &[BugRecord::default()]);
    }

    #[test]
    fn rejected_updates_leave_draft_untouched() {
        let mut store = RecordStore::new();
        assert!(matches!(
            store.update_draft_field("severity", "x"),
            Err(FieldError::UnknownField(_))
        ));
        assert!(store.update_draft_field("roles", "Manager").is_err());
        assert_eq!(store.draft(), &BugRecord::default());
    }

    #[test]
    fn export_names_the_download() {
        let export = RecordStore::seeded().export_to_spreadsheet().unwrap();
        assert_eq!(export.file_name, "Bug_Report.xlsx");
        assert_eq!(export.content_type, "application/octet-stream");
        assert_eq!(export.notice.message(), "📁 Excel file exported successfully!");
        // xlsx is a zip container
        assert_eq!(&export.bytes[..2], b"PK");
    }

    #[test]
    fn empty_store_still_exports() {
        let export = RecordStore::new().export_to_spreadsheet().unwrap();
        assert!(!export.bytes.is_empty());
    }
}

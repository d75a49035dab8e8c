use bug_report::loader::{from_excel, from_xlsx_bytes};
use bug_report::saving::save_export;
use bug_report::{BugRecord, Field, RecordStore};
use calamine::{Data, Reader, Xlsx, open_workbook};

const HEADERS: [&str; 13] = [
    "bugNo",
    "bugType",
    "module",
    "subModule",
    "description",
    "priority",
    "status",
    "roles",
    "tester",
    "testData",
    "screenshot",
    "createdBy",
    "createdDate",
];

fn sheet_rows(path: &std::path::Path) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Bug Report".to_string()]);
    let range = workbook.worksheet_range("Bug Report").unwrap();
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::String(s) => s.clone(),
                    Data::Empty => String::new(),
                    other => panic!("unexpected cell {other:?}"),
                })
                .collect()
        })
        .collect()
}

#[test]
fn seeded_store_exports_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let export = RecordStore::seeded().export_to_spreadsheet().unwrap();
    let path = save_export(&export, dir.path()).unwrap();

    let rows = sheet_rows(&path);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], HEADERS);
    assert_eq!(rows[1][0], "BUG-00126");
    assert_eq!(rows[1][7], "QA, Dev");
    assert_eq!(rows[1][10], "✅");
    assert_eq!(rows[1], BugRecord::seed().values());
}

#[test]
fn submitted_draft_lands_in_next_row() {
    let mut store = RecordStore::seeded();
    store.update_draft_field("bugNo", "BUG-00200").unwrap();
    store.update_draft_field("priority", "Critical").unwrap();
    store.submit_draft();
    assert_eq!(store.len(), 2);

    let export = store.export_to_spreadsheet().unwrap();
    let records = from_xlsx_bytes(&export.bytes).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].bug_no, "BUG-00200");
    assert_eq!(records[1].get(Field::Priority), "Critical");
    for field in Field::ALL {
        if !matches!(field, Field::BugNo | Field::Priority | Field::Status) {
            assert_eq!(records[1].get(field), "", "{field} should be blank");
        }
    }
}

#[test]
fn empty_store_exports_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let export = RecordStore::new().export_to_spreadsheet().unwrap();
    let path = save_export(&export, dir.path()).unwrap();

    let rows = sheet_rows(&path);
    assert_eq!(rows, vec![HEADERS.map(String::from).to_vec()]);
    assert!(from_excel(&path).unwrap().is_empty());
}

#[test]
fn every_record_survives_round_trip() {
    let mut store = RecordStore::seeded();
    let inputs = [
        [("bugNo", "BUG-1"), ("status", "Fixed"), ("roles", "Operator")],
        [("bugNo", "BUG-2"), ("status", "Closed"), ("description", "a, \"b\"\nc")],
        [("module", "MRP"), ("priority", "Low"), ("createdDate", "yesterday")],
    ];
    for fields in inputs {
        for (name, value) in fields {
            store.update_draft_field(name, value).unwrap();
        }
        store.submit_draft();
    }
    store.submit_draft();

    let export = store.export_to_spreadsheet().unwrap();
    let records = from_xlsx_bytes(&export.bytes).unwrap();
    assert_eq!(records.len(), store.len());
    assert_eq!(records, store.records());
}

#[test]
fn escaped_characters_survive_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let values = ["a\r\nb", "a\u{1}b", "_x0041_", "_x005F_", " padded "];

    let mut store = RecordStore::new();
    for value in values {
        store.update_draft_field("bugNo", value).unwrap();
        store.update_draft_field("description", value).unwrap();
        store.submit_draft();
    }

    let export = store.export_to_spreadsheet().unwrap();
    let from_bytes = from_xlsx_bytes(&export.bytes).unwrap();
    let path = save_export(&export, dir.path()).unwrap();
    let from_file = from_excel(&path).unwrap();

    for records in [from_bytes, from_file] {
        let read: Vec<&str> = records.iter().map(|r| r.bug_no.as_str()).collect();
        assert_eq!(read, values);
        assert_eq!(records, store.records());
    }
}

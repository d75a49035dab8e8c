/*!
# Bug Report

A small form-and-table tool for recording software defect reports and
exporting them to an Excel workbook.

## Overview

A user fills in a structured bug record (bug number, module, priority,
status, roles, ...), adds it to an in-memory list shown as a table, and on
demand downloads the whole list as `Bug_Report.xlsx`. Nothing is persisted:
the list lives as long as the process.

## Architecture

### Record model
- Thirteen fields in a fixed order, declared once in [`record::Field`] and
  used for the form, the table header, and the spreadsheet columns
- `priority`, `status`, and `roles` are closed selections; anything outside
  the declared values is rejected

### Record store
- [`store::RecordStore`] owns the append-only record list and the draft
- The draft is reset to its defaults (priority `High`, status `Open`, all
  else empty) after every submit

### Export
- XLSX through `rust_xlsxwriter`, one sheet named `Bug Report`
- CSV alongside it
- Headers come from the field table, so an empty store exports a header row
  and nothing else

### Front ends
- Web page and JSON API (axum, handlebars), behind the `web` feature
- Line-oriented terminal REPL (`cli` binary)

## Modules

- **record**: `BugRecord`, field table, selection enums
- **store**: record store, draft handling, notices
- **downloader**: XLSX / CSV encoding
- **loader**: reading an exported workbook back into records
- **saving**: writing an export to disk
- **render**: HTML page view and plain-text table
- **app**: routing and handlers

## REST API Endpoints

- `GET /` - Form and table page
- `POST /bugs` - Submit the form as a new record
- `GET /api/fields` - Field descriptors
- `GET /api/draft`, `PUT /api/draft/{field}` - Read / edit the draft
- `POST /api/submit` - Append the draft
- `GET /api/records` - All records
- `GET /api/export`, `GET /api/export.csv` - Download the report
*/

pub mod downloader;
pub mod error;
pub mod loader;
pub mod record;
pub mod render;
pub mod saving;
pub mod store;

#[cfg(feature = "web")]
pub mod app;

pub use error::*;
pub use record::*;
pub use store::*;

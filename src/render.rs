use crate::record::{Field, FieldKind};
use crate::store::{Notice, RecordStore};
use serde::Serialize;

/// One form control
#[derive(Serialize, Debug)]
pub struct FieldView {
    pub name: &'static str,
    pub label: String,
    /// "text", "multiline" or "select"
    pub control: &'static str,
    pub value: String,
    pub options: Vec<OptionView>,
    /// Caption of the leading empty option, for selections that may be left unset
    pub blank: Option<&'static str>,
}

#[derive(Serialize, Debug)]
pub struct OptionView {
    pub value: &'static str,
    pub selected: bool,
}

/// Everything the page template needs
#[derive(Serialize, Debug)]
pub struct PageView {
    pub fields: Vec<FieldView>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub notice: Option<&'static str>,
    pub export_notice: &'static str,
}

impl PageView {
    pub fn new(store: &RecordStore, notice: Option<Notice>) -> Self {
        let draft = store.draft();
        let fields = Field::ALL
            .iter()
            .map(|&field| {
                let value = draft.get(field);
                let (control, options) = match field.kind() {
                    FieldKind::Text => ("text", Vec::new()),
                    FieldKind::Multiline => ("multiline", Vec::new()),
                    FieldKind::Choice(opts) => (
                        "select",
                        opts.iter()
                            .map(|&o| OptionView {
                                value: o,
                                selected: o == value,
                            })
                            .collect(),
                    ),
                };
                FieldView {
                    name: field.name(),
                    label: field.label(),
                    control,
                    value,
                    options,
                    blank: (field == Field::Roles).then_some("Select Role"),
                }
            })
            .collect();

        PageView {
            fields,
            headers: Field::ALL.iter().map(|f| f.label()).collect(),
            rows: store.records().iter().map(|r| r.values()).collect(),
            notice: notice.map(Notice::message),
            export_notice: Notice::ExcelExported.message(),
        }
    }
}

#[cfg(feature = "web")]
pub use page::PageRenderer;

#[cfg(feature = "web")]
mod page {
    use super::PageView;
    use crate::store::{Notice, RecordStore};
    use handlebars::{Handlebars, RenderError, TemplateError};

    const PAGE: &str = "bug_report";

    /// Handlebars registry holding the bug report page template
    pub struct PageRenderer {
        registry: Handlebars<'static>,
    }

    impl PageRenderer {
        pub fn new() -> Result<Self, TemplateError> {
            let mut registry = Handlebars::new();
            registry.register_template_string(PAGE, include_str!("./static/bug_report.hbs"))?;
            Ok(PageRenderer { registry })
        }

        pub fn render(&self, store: &RecordStore, notice: Option<Notice>) -> Result<String, RenderError> {
            self.registry.render(PAGE, &PageView::new(store, notice))
        }
    }
}

/// Column-aligned plain-text table of a set of rows under the field labels.
///
/// Cells are cut to `max_width` characters and newlines are flattened to
/// spaces so each record stays on one line.
pub fn text_table(rows: &[Vec<String>], max_width: usize) -> String {
    let headers: Vec<String> = Field::ALL.iter().map(|f| f.label()).collect();
    let clip = |s: &str| -> String {
        let flat = s.replace(['\r', '\n'], " ");
        if flat.chars().count() > max_width {
            let cut: String = flat.chars().take(max_width.saturating_sub(1)).collect();
            format!("{cut}…")
        } else {
            flat
        }
    };

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|v| clip(v.as_str())).collect())
        .collect();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(c, h)| {
            body.iter()
                .filter_map(|row| row.get(c))
                .map(|v| v.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{v}{}", " ".repeat(w - v.chars().count())))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = line(&headers);
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    for row in &body {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

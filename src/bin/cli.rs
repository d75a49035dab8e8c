#![cfg(not(tarpaulin_include))]

use bug_report::loader::from_excel;
use bug_report::render::text_table;
use bug_report::saving::{save_export, save_export_as};
use bug_report::{Export, Field, FieldKind, RecordStore};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

const CELL_WIDTH: usize = 24;

/// Record bug reports from the terminal and export them to Excel
#[derive(Parser, Debug)]
#[command(name = "cli", version)]
struct Args {
    /// Start with an empty bug list instead of the sample entry
    #[arg(long)]
    no_seed: bool,

    /// Directory exports are written to when no path is given
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

enum Outcome {
    Continue(String),
    Quit,
}

struct Session {
    store: RecordStore,
    out_dir: PathBuf,
}

impl Session {
    fn execute(&mut self, command: &str, out: &mut impl Write) -> io::Result<Outcome> {
        let (verb, rest) = command
            .split_once(char::is_whitespace)
            .map(|(v, r)| (v, r.trim()))
            .unwrap_or((command, ""));

        let status = match verb {
            "q" | "quit" => return Ok(Outcome::Quit),
            "help" => {
                writeln!(out, "Commands:")?;
                writeln!(out, "  fields: List fields and allowed values")?;
                writeln!(out, "  set <field> <value>: Edit the draft (\\n for a line break)")?;
                writeln!(out, "  draft: Show the draft")?;
                writeln!(out, "  add: Append the draft to the list")?;
                writeln!(out, "  list: Show all bugs")?;
                writeln!(out, "  export [path]: Write the list as xlsx")?;
                writeln!(out, "  csv [path]: Write the list as csv")?;
                writeln!(out, "  inspect <path>: Show the bugs in an exported xlsx")?;
                writeln!(out, "  q: Quit")?;
                "ok".to_string()
            }
            "fields" => {
                for field in Field::ALL {
                    match field.kind() {
                        FieldKind::Choice(options) => {
                            writeln!(out, "  {:<12} one of: {}", field.name(), options.join(", "))?
                        }
                        _ => writeln!(out, "  {}", field.name())?,
                    }
                }
                "ok".to_string()
            }
            "set" => {
                let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let value = value.trim().replace("\\n", "\n");
                match self.store.update_draft_field(name, &value) {
                    Ok(()) => "ok".to_string(),
                    Err(e) => e.to_string(),
                }
            }
            "draft" => {
                for field in Field::ALL {
                    writeln!(out, "  {:<12} {}", field.name(), self.store.draft().get(field))?;
                }
                "ok".to_string()
            }
            "add" => {
                let notice = self.store.submit_draft();
                writeln!(out, "{}", notice.message())?;
                "ok".to_string()
            }
            "list" => {
                let rows: Vec<Vec<String>> =
                    self.store.records().iter().map(|r| r.values()).collect();
                write!(out, "{}", text_table(&rows, CELL_WIDTH))?;
                format!("{} bugs", rows.len())
            }
            "export" => self.write_export(self.store.export_to_spreadsheet(), rest, out)?,
            "csv" => self.write_export(Ok(self.store.export_csv()), rest, out)?,
            "inspect" if !rest.is_empty() => match from_excel(rest) {
                Ok(records) => {
                    let rows: Vec<Vec<String>> = records.iter().map(|r| r.values()).collect();
                    write!(out, "{}", text_table(&rows, CELL_WIDTH))?;
                    format!("{} bugs in {rest}", rows.len())
                }
                Err(e) => e.to_string(),
            },
            _ => "invalid command".to_string(),
        };
        Ok(Outcome::Continue(status))
    }

    fn write_export(
        &self,
        export: Result<Export, bug_report::ExportError>,
        path: &str,
        out: &mut impl Write,
    ) -> io::Result<String> {
        let export = match export {
            Ok(export) => export,
            Err(e) => return Ok(e.to_string()),
        };
        let saved = if path.is_empty() {
            save_export(&export, &self.out_dir)
        } else {
            save_export_as(&export, path)
        };
        Ok(match saved {
            Ok(path) => {
                writeln!(out, "{} ({})", export.notice.message(), path.display())?;
                "ok".to_string()
            }
            Err(e) => format!("save failed: {e}"),
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let mut session = Session {
        store: if args.no_seed {
            RecordStore::new()
        } else {
            RecordStore::seeded()
        },
        out_dir: args.out_dir,
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut status = String::from("ok");
    let mut start_time = Instant::now();
    let mut lines = stdin.lock().lines();

    loop {
        print!(
            "[{:.1}] ({}) {} bugs > ",
            start_time.elapsed().as_secs_f64(),
            status,
            session.store.len()
        );
        stdout.flush()?;

        let Some(line) = lines.next() else { break };
        let command = line?;
        let command = command.trim();
        start_time = Instant::now();

        if command.is_empty() {
            continue;
        }

        match session.execute(command, &mut stdout)? {
            Outcome::Continue(s) => status = s,
            Outcome::Quit => break,
        }
    }

    Ok(())
}

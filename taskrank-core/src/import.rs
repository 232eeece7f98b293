//! CSV task import.
//!
//! Expected header (any order, case-insensitive; only `title` is required):
//! id,title,due_date,estimated_hours,importance,dependencies
//!
//! `dependencies` holds `;`-separated ids. Blank cells are absent values.
//! A numeric cell that does not parse is also imported as absent, so the
//! engine applies its default and reports a `missing_*` warning for it; the
//! importer logs the offending row and column at `warn` level so the bad
//! cell can be told apart from an empty one.

use crate::importance::parse_importance;
use crate::task::TaskInput;
use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::warn;

pub fn parse_tasks_csv(path: impl AsRef<Path>) -> Result<Vec<TaskInput>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_tasks_csv(file).with_context(|| format!("parsing {}", path.display()))
}

pub fn read_tasks_csv<R: Read>(reader: R) -> Result<Vec<TaskInput>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: HashMap<String, usize> = rdr
        .headers()
        .context("reading CSV header")?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect();

    if !columns.contains_key("title") {
        bail!("CSV header must include a 'title' column");
    }

    let mut tasks = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        if record.iter().all(|c| c.is_empty()) {
            continue;
        }

        let cell = |name: &str| -> Option<String> {
            columns
                .get(name)
                .and_then(|&i| record.get(i))
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
        };

        let estimated_hours = cell("estimated_hours").and_then(|s| {
            let hours = s.parse::<f64>().ok();
            if hours.is_none() {
                log_unparsable(row, "estimated_hours", &s);
            }
            hours
        });
        let importance = cell("importance").and_then(|s| {
            let value = parse_importance(&s);
            if value.is_none() {
                log_unparsable(row, "importance", &s);
            }
            value
        });

        tasks.push(TaskInput {
            id: cell("id"),
            title: cell("title"),
            due_date: cell("due_date"),
            estimated_hours,
            importance,
            dependencies: cell("dependencies")
                .map(|s| {
                    s.split(';')
                        .map(str::trim)
                        .filter(|d| !d.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        });
    }

    Ok(tasks)
}

/// `row` is the 0-based data row; logged 1-based, header excluded.
fn log_unparsable(row: usize, column: &str, raw: &str) {
    warn!(row = row + 1, column, value = raw, "unparsable CSV cell imported as blank");
}

//! Reading task batches from files or stdin.

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use taskrank_core::{AnalyzeRequest, TaskInput, parse_tasks_csv, read_tasks_csv};

/// Load a request from `file` (stdin when `None`).
///
/// CSV is used when `csv` is set or the file ends in `.csv`; otherwise the
/// input is JSON, either a full `{tasks, strategy}` body or a bare task array.
pub fn read_request(file: Option<&Path>, csv: bool) -> Result<AnalyzeRequest> {
    let is_csv = csv
        || file
            .and_then(|p| p.extension())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        let tasks = match file {
            Some(p) => parse_tasks_csv(p)?,
            None => read_tasks_csv(std::io::stdin().lock()).context("parsing CSV from stdin")?,
        };
        return Ok(AnalyzeRequest {
            tasks,
            strategy: None,
        });
    }

    let raw = match file {
        Some(p) => std::fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?,
        None => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context("reading stdin")?;
            s
        }
    };
    parse_json_request(&raw)
}

pub fn parse_json_request(raw: &str) -> Result<AnalyzeRequest> {
    let value: Value = serde_json::from_str(raw).context("Invalid JSON format")?;
    if value.is_array() {
        let tasks: Vec<TaskInput> =
            serde_json::from_value(value).context("task array has an invalid entry")?;
        return Ok(AnalyzeRequest {
            tasks,
            strategy: None,
        });
    }
    serde_json::from_value(value)
        .context("request body must be {\"tasks\": [...], \"strategy\": ...}")
}

use crate::cli::{CommonArgs, OutputFormat};
use crate::export::{output_json, output_ndjson, write_json_file};
use crate::fetch::RunContext;
use crate::filter::filter_records;
use crate::model::{CommitRecord, CommitsOutput, SCHEMA_VERSION};
use crate::parse::{log_warnings, parse_log};
use anyhow::Context;
use chrono::{Local, Utc};
use console::style;
use std::io::{self, Write};

const TABLE_LIMIT: usize = 50;

pub fn exec(common: CommonArgs, format: OutputFormat) -> anyhow::Result<()> {
    let ctx = RunContext::prepare(&common)?;
    let raw = ctx.fetch_log(format == OutputFormat::Text)?;

    let parsed = parse_log(&raw);
    log_warnings(&parsed.warnings);
    let entries = filter_records(&parsed.records, &ctx.window, ctx.author.as_ref());

    let output = CommitsOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository_path: ctx.repository_path(),
        now: ctx.window.now,
        days: ctx.window.days,
        author: ctx.author.as_ref().map(|a| a.name.clone()),
        parse_warnings: parsed.warning_count(),
        entries,
    };

    if let Some(path) = &common.export {
        write_json_file(path, &output)
            .with_context(|| format!("Failed to export commits to {}", path.display()))?;
    }

    match format {
        OutputFormat::Json => output_json(&output),
        OutputFormat::Ndjson => output_ndjson(&output.entries),
        OutputFormat::Text => {
            let stdout = io::stdout();
            render_table(&output.entries, &mut stdout.lock())?;
            Ok(())
        }
    }
}

pub fn render_table<W: Write>(entries: &[CommitRecord], out: &mut W) -> io::Result<()> {
    if entries.is_empty() {
        return writeln!(out, "No commits found in the specified time range.");
    }

    writeln!(
        out,
        "{:<8} {:<16} {:<20} {:>7} {:>7} {:>5}  {}",
        style("Commit").bold(),
        style("Date").bold(),
        style("Author").bold(),
        style("Added").bold(),
        style("Deleted").bold(),
        style("Files").bold(),
        style("Subject").bold()
    )?;
    writeln!(out, "{}", "─".repeat(100))?;

    for e in entries.iter().take(TABLE_LIMIT) {
        writeln!(
            out,
            "{:<8} {:<16} {:<20} {:>7} {:>7} {:>5}  {}",
            e.hash.chars().take(8).collect::<String>(),
            e.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            truncate(&e.author_name, 20),
            e.insertions,
            e.deletions,
            e.files.len(),
            e.subject
        )?;
    }
    if entries.len() > TABLE_LIMIT {
        writeln!(out, "\n... and {} more commits", entries.len() - TABLE_LIMIT)?;
    }
    Ok(())
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

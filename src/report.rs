use crate::cli::{CommonArgs, OutputFormat};
use crate::export::{output_json, write_json_file};
use crate::fetch::RunContext;
use crate::filter::AuthorMatch;
use crate::model::{AnalysisReport, ReportOutput, SCHEMA_VERSION};
use anyhow::Context;
use chrono::{Local, Utc};
use console::style;
use std::io::{self, Write};

const TOP_AUTHORS: usize = 5;
const TOP_LISTED: usize = 5;
const RULE_WIDTH: usize = 62;

pub fn exec(common: CommonArgs, format: OutputFormat) -> anyhow::Result<()> {
    let ctx = RunContext::prepare(&common)?;
    let raw = ctx.fetch_log(format == OutputFormat::Text)?;

    let report = crate::analyze_log(
        &raw,
        &ctx.window,
        ctx.author.as_ref(),
        ctx.settings.top,
        &Local,
    );

    let output = ReportOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository_path: ctx.repository_path(),
        now: ctx.window.now,
        days: ctx.window.days,
        author: ctx.author.as_ref().map(|a| a.name.clone()),
        author_match: ctx.settings.author_match,
        report,
    };

    if let Some(path) = &common.export {
        write_json_file(path, &output)
            .with_context(|| format!("Failed to export analysis to {}", path.display()))?;
    }

    match format {
        OutputFormat::Json | OutputFormat::Ndjson => output_json(&output),
        OutputFormat::Text => {
            let stdout = io::stdout();
            render_text(&output, &mut stdout.lock())?;
            Ok(())
        }
    }
}

pub fn render_text<W: Write>(output: &ReportOutput, out: &mut W) -> io::Result<()> {
    let report = &output.report;

    writeln!(out, "{}", style("Commit Analysis Report").bold())?;
    writeln!(out, "{}", "═".repeat(RULE_WIDTH))?;
    writeln!(out, "  Repository:         {}", output.repository_path)?;
    writeln!(out, "  Analysis period:    {}", describe_period(output.days))?;
    if let Some(author) = &output.author {
        let mode = match output.author_match {
            AuthorMatch::Exact => "exact",
            AuthorMatch::Fuzzy => "fuzzy",
        };
        writeln!(out, "  Author filter:      {author} ({mode})")?;
    }
    if report.parse_warnings > 0 {
        writeln!(
            out,
            "  Parse warnings:     {} (some log entries were skipped)",
            style(report.parse_warnings).yellow()
        )?;
    }

    if report.is_empty() {
        writeln!(out)?;
        writeln!(out, "No commits found in the specified time range.")?;
        return Ok(());
    }

    writeln!(out, "  Total commits:      {}", style(report.total_commits).cyan())?;
    writeln!(
        out,
        "  Productivity score: {}/100 (frequency {:.1}, quality {:.1}, volume {:.1})",
        style(format!("{:.2}", report.score.total)).bold(),
        report.score.frequency,
        report.score.quality,
        report.score.volume
    )?;

    render_authors(report, out)?;
    render_patterns(report, out)?;
    render_messages(report, out)?;
    render_files(report, out)?;

    writeln!(out, "{}", "═".repeat(RULE_WIDTH))?;
    Ok(())
}

fn describe_period(days: u32) -> String {
    match days {
        0 => "last 24 hours".to_string(),
        1 => "last day".to_string(),
        n => format!("last {n} days"),
    }
}

fn section<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style(title).bold())?;
    writeln!(out, "{}", "─".repeat(RULE_WIDTH))
}

fn render_authors<W: Write>(report: &AnalysisReport, out: &mut W) -> io::Result<()> {
    section(out, "Authors")?;
    writeln!(out, "  Total authors: {}", report.author_count)?;
    for author in report.authors.iter().take(TOP_AUTHORS) {
        writeln!(
            out,
            "  • {}: {} commits ({} {})",
            author.name,
            author.commit_count,
            style(format!("+{}", author.total_insertions)).green(),
            style(format!("-{}", author.total_deletions)).red()
        )?;
    }
    if report.authors.len() > TOP_AUTHORS {
        writeln!(out, "  ... and {} more", report.authors.len() - TOP_AUTHORS)?;
    }
    Ok(())
}

fn render_patterns<W: Write>(report: &AnalysisReport, out: &mut W) -> io::Result<()> {
    section(out, "Commit Patterns")?;
    if let Some(hour) = &report.most_productive_hour {
        writeln!(
            out,
            "  Most productive hour: {} ({} commits)",
            hour.label, hour.count
        )?;
    }
    if let Some(day) = &report.most_productive_day {
        writeln!(
            out,
            "  Most productive day:  {} ({} commits)",
            day.label, day.count
        )?;
    }
    writeln!(
        out,
        "  By hour (00-23):      {}",
        style(sparkline(&report.temporal.by_hour)).green()
    )?;
    writeln!(
        out,
        "  By weekday (Mon-Sun): {}",
        style(sparkline(&report.temporal.by_weekday)).green()
    )?;
    writeln!(out, "  Active days:          {}", report.temporal.by_date.len())
}

/// One block character per bucket, scaled to the largest bucket.
fn sparkline(buckets: &[u32]) -> String {
    let max = buckets.iter().copied().max().unwrap_or(0);
    buckets
        .iter()
        .map(|&count| {
            if max == 0 || count == 0 {
                return '·';
            }
            match ((count as f64 / max as f64) * 5.0) as u32 {
                0 | 1 => '▁',
                2 => '▃',
                3 => '▅',
                4 => '▇',
                _ => '█',
            }
        })
        .collect()
}

fn render_messages<W: Write>(report: &AnalysisReport, out: &mut W) -> io::Result<()> {
    let messages = &report.messages;
    section(out, "Commit Message Quality")?;
    writeln!(
        out,
        "  Average message length: {:.1} characters",
        messages.average_length
    )?;
    writeln!(
        out,
        "  Conventional commits:   {}/{} ({:.1}%)",
        messages.conventional_count, messages.total, messages.conventional_percentage
    )?;
    if !messages.types.is_empty() {
        writeln!(out, "  Commit type breakdown:")?;
        let mut types: Vec<_> = messages.types.iter().collect();
        types.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (kind, count) in types {
            writeln!(out, "    {kind}: {count}")?;
        }
    }
    Ok(())
}

fn render_files<W: Write>(report: &AnalysisReport, out: &mut W) -> io::Result<()> {
    let files = &report.files;
    section(out, "File Changes")?;
    writeln!(
        out,
        "  Lines added:   {}",
        style(files.total_insertions).green()
    )?;
    writeln!(out, "  Lines deleted: {}", style(files.total_deletions).red())?;
    writeln!(out, "  Net change:    {:+}", files.net_lines)?;
    writeln!(
        out,
        "  Avg per commit: +{:.1} -{:.1}",
        files.avg_insertions_per_commit, files.avg_deletions_per_commit
    )?;
    writeln!(out, "  Files touched: {}", files.distinct_files)?;

    if !files.extensions.is_empty() {
        writeln!(out)?;
        writeln!(out, "  Top file types:")?;
        for ext in files.extensions.iter().take(TOP_LISTED) {
            writeln!(out, "    {}: {} changes", ext.extension, ext.count)?;
        }
    }
    if !files.top_files.is_empty() {
        writeln!(out)?;
        writeln!(out, "  Most changed files:")?;
        for file in files.top_files.iter().take(TOP_LISTED) {
            writeln!(out, "    {}: {} changes", file.path, file.count)?;
        }
    }
    Ok(())
}

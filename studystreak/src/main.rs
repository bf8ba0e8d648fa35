//! studystreak - revision streaks and study heat-map
//!
//! Reads the activity log from a file or the revision-log API and prints
//! streaks, summary counters and a calendar heat-map.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Config: $XDG_CONFIG_HOME/studystreak/config.toml
//! - Logs and login marker: $XDG_STATE_HOME/studystreak/

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use studystreak_core::analytics::{build_heatmap, Heatmap, RevisionReport, MAX_WINDOW_DAYS};
use studystreak_core::api::{
    split_topics, BlockingRevisionClient, NewSession, SessionSink, SessionUpdate,
};
use studystreak_core::format::{format_days, format_minutes, intensity_glyph};
use studystreak_core::ingest::{self, ParsedLog};
use studystreak_core::marker::record_login_if_needed;
use studystreak_core::{parse_calendar_date, Config, LoginMarker};

#[derive(Parser, Debug)]
#[command(name = "studystreak")]
#[command(about = "Revision streaks and study heat-map from your session log")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

/// Where the log comes from and which day to report on
#[derive(clap::Args, Debug)]
struct Source {
    /// Read the log from a JSON file instead of the API
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Day to report as of, YYYY-MM-DD (default: today)
    #[arg(long, value_parser = parse_calendar_date)]
    as_of: Option<NaiveDate>,

    /// Trailing days shown in the heat-map (default: from config)
    #[arg(long, value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_WINDOW_DAYS)))]
    window_days: Option<u32>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print streaks, counters and the heat-map
    Report {
        #[command(flatten)]
        source: Source,

        /// Export format (md = markdown, json = JSON)
        #[arg(long)]
        export: Option<String>,
    },

    /// Print the heat-map only
    Heatmap {
        #[command(flatten)]
        source: Source,
    },

    /// Log a study session
    Log {
        /// Minutes studied
        #[arg(short, long)]
        minutes: u32,

        /// Comma-separated topics
        #[arg(short, long, default_value = "")]
        topics: String,

        /// Effectiveness rating, 1-5
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: Option<u8>,

        /// Free-text notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Change fields of a logged session
    Edit {
        /// Session id
        id: String,

        /// Minutes studied
        #[arg(short, long)]
        minutes: Option<u32>,

        /// Comma-separated topics, replacing the current list
        #[arg(short, long)]
        topics: Option<String>,

        /// Effectiveness rating, 1-5
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: Option<u8>,

        /// Free-text notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Delete a logged session
    Delete {
        /// Session id
        id: String,
    },

    /// Record today's login marker if it has not been recorded yet
    Checkin {
        /// Record even if today's marker was already sent
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load().context("failed to load configuration")?;
    let _log_guard = studystreak_core::logging::init(&config.logging).ok();

    match args.command {
        Command::Report { source, export } => {
            if let Some(window) = source.window_days {
                config.analytics.heatmap_window_days = window;
            }
            let as_of = resolve_as_of(&source);
            let parsed = load_log(&config, &source)?;
            let report = RevisionReport::generate(&parsed.records, as_of, &config.analytics);

            match export.as_deref() {
                Some("json") => print_json(&report)?,
                Some("md") => print_markdown(&report),
                Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
                None => print_terminal(&report, parsed.rejected),
            }
        }
        Command::Heatmap { source } => {
            let window = source
                .window_days
                .unwrap_or(config.analytics.heatmap_window_days);
            let as_of = resolve_as_of(&source);
            let parsed = load_log(&config, &source)?;
            let heatmap = build_heatmap(&parsed.records, as_of, window);
            print_heatmap(&heatmap);
        }
        Command::Log {
            minutes,
            topics,
            rating,
            notes,
        } => {
            let client = api_client(&config)?;
            let mut session = NewSession::manual(i64::from(minutes), split_topics(&topics));
            session.effectiveness_rating = rating;
            session.notes = notes.unwrap_or_default();
            let id = client
                .log_session(&session)
                .context("failed to log session")?;
            println!("Logged {} session ({})", format_minutes(session.duration_minutes), id);
        }
        Command::Edit {
            id,
            minutes,
            topics,
            rating,
            notes,
        } => {
            let update = SessionUpdate {
                duration_minutes: minutes.map(i64::from),
                topics_reviewed: topics.as_deref().map(split_topics),
                effectiveness_rating: rating,
                notes,
            };
            if update.is_empty() {
                anyhow::bail!("Nothing to change; pass --minutes, --topics, --rating or --notes");
            }
            let client = api_client(&config)?;
            if client
                .update_log(&id, &update)
                .context("failed to update session")?
            {
                println!("Updated session {}", id);
            } else {
                anyhow::bail!("No session found with id '{}'", id);
            }
        }
        Command::Delete { id } => {
            let client = api_client(&config)?;
            if client.delete_log(&id).context("failed to delete session")? {
                println!("Deleted session {}", id);
            } else {
                anyhow::bail!("No session found with id '{}'", id);
            }
        }
        Command::Checkin { force } => {
            let client = api_client(&config)?;
            let marker = LoginMarker::default_location();
            let today = Local::now().date_naive();
            if force {
                client
                    .log_session(&NewSession::login_marker())
                    .context("failed to record login")?;
                marker.mark(today).context("failed to update login marker")?;
                println!("Login recorded for {}", today);
            } else if record_login_if_needed(&client, &marker, today)
                .context("failed to record login")?
            {
                println!("Login recorded for {}", today);
            } else {
                println!("Login already recorded for {}", today);
            }
        }
    }

    Ok(())
}

fn resolve_as_of(source: &Source) -> NaiveDate {
    source.as_of.unwrap_or_else(|| Local::now().date_naive())
}

fn api_client(config: &Config) -> Result<BlockingRevisionClient> {
    BlockingRevisionClient::new(config.api.clone())
        .context("the [api] section of config.toml is incomplete")
}

fn load_log(config: &Config, source: &Source) -> Result<ParsedLog> {
    let parsed = match &source.input {
        Some(path) => ingest::load_file(path)
            .with_context(|| format!("failed to read log file {}", path.display()))?,
        None => api_client(config)?
            .fetch_logs()
            .context("failed to fetch revision logs")?,
    };
    tracing::info!(
        records = parsed.records.len(),
        rejected = parsed.rejected,
        from_file = source.input.is_some(),
        "Loaded activity log"
    );
    Ok(parsed)
}

fn print_terminal(report: &RevisionReport, rejected: usize) {
    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", format!("Revision Tracker - {}", report.as_of));
    println!("╰{}╯", "─".repeat(60));
    println!();

    if report.is_empty() {
        println!("  No sessions logged yet. Start logging to build your streak!");
        println!();
    }

    println!("STREAKS");
    println!("   Current:  {}", format_days(report.streaks.current));
    let longest_range = match (report.streaks.longest_start, report.streaks.longest_end) {
        (Some(start), Some(end)) if report.streaks.longest > 1 => {
            format!(" ({} - {})", start.format("%b %d"), end.format("%b %d"))
        }
        _ => String::new(),
    };
    println!(
        "   Longest:  {}{}",
        format_days(report.streaks.longest),
        longest_range
    );
    println!("   Active:   {}", format_days(report.streaks.active_days));
    println!();

    let totals = &report.aggregates;
    println!("SUMMARY");
    println!(
        "   Sessions: {:<12} Total Time: {}",
        totals.total_sessions,
        format_minutes(totals.total_minutes)
    );
    println!(
        "   This week: {:<11} This month: {}",
        totals.this_week, totals.this_month
    );
    println!("   Logins:   {}", totals.login_count);
    println!();

    print_heatmap(&report.heatmap);

    let skipped = report.skipped_records() + rejected;
    if skipped > 0 {
        println!(
            "  {} record{} could not be read and {} left out.",
            skipped,
            if skipped == 1 { "" } else { "s" },
            if skipped == 1 { "was" } else { "were" }
        );
        println!();
    }
}

fn print_heatmap(heatmap: &Heatmap) {
    println!(
        "{} sessions in the last {}",
        heatmap.total_sessions(),
        format_days(i64::from(heatmap.window_days) + 1)
    );
    println!();

    let weeks: Vec<_> = heatmap.weeks().collect();

    // Month header, two characters per column
    let mut header = vec![' '; weeks.len() * 2 + 3];
    for label in heatmap.month_labels() {
        for (i, ch) in label.month.chars().enumerate() {
            if let Some(slot) = header.get_mut(label.column * 2 + i) {
                *slot = ch;
            }
        }
    }
    println!("   {}", header.into_iter().collect::<String>().trim_end());

    for row in 0..studystreak_core::analytics::heatmap::DAYS_PER_COLUMN {
        let line: String = weeks
            .iter()
            .map(|week| match week.get(row) {
                Some(day) => format!("{} ", intensity_glyph(day.intensity_level)),
                None => "  ".to_string(),
            })
            .collect();
        println!("   {}", line.trim_end());
    }

    println!();
    let legend: String = (0..=4).map(|level| format!("{} ", intensity_glyph(level))).collect();
    println!("   Less {}More", legend);
    println!();
}

fn print_markdown(report: &RevisionReport) {
    println!("# Revision Tracker - {}", report.as_of);
    println!();

    println!("## Streaks");
    println!();
    println!("- **Current streak:** {}", format_days(report.streaks.current));
    println!("- **Longest streak:** {}", format_days(report.streaks.longest));
    println!("- **Active days:** {}", report.streaks.active_days);
    println!();

    let totals = &report.aggregates;
    println!("## Summary");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Sessions | {} |", totals.total_sessions);
    println!("| Total Time | {} |", format_minutes(totals.total_minutes));
    println!("| This Week | {} |", totals.this_week);
    println!("| This Month | {} |", totals.this_month);
    println!("| Logins | {} |", totals.login_count);
    println!();

    println!("## Busiest Days");
    println!();
    let mut busiest: Vec<_> = report.heatmap.days.iter().filter(|d| d.is_active()).collect();
    busiest.sort_by(|a, b| b.total_minutes.cmp(&a.total_minutes).then(b.date.cmp(&a.date)));
    if busiest.is_empty() {
        println!(
            "*No sessions in the last {}.*",
            format_days(i64::from(report.heatmap.window_days) + 1)
        );
    }
    for day in busiest.iter().take(5) {
        println!(
            "- {} - {} in {} session{}",
            day.date,
            format_minutes(day.total_minutes),
            day.session_count,
            if day.session_count == 1 { "" } else { "s" }
        );
    }
    println!();

    println!("---");
    println!("*Generated by studystreak*");
}

fn print_json(report: &RevisionReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

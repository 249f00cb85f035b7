//! habitect-report - Weekly Habit Report CLI
//!
//! Renders the weekly report the engine computes from an export bundle:
//! statistics, mood analysis, achievements, insights, and the optional
//! comparison against the previous week.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use clap::Parser;
use uuid::Uuid;

use habitect_core::calendar::{civil_today, resolve_timezone};
use habitect_core::streak::{streak_history, HistoryOrder};
use habitect_core::types::StreakDay;
use habitect_core::weekly::{
    build_weekly_report, ChangeDirection, WeekWindow, WeeklyConfig, WeeklyReport,
};
use habitect_core::{Config, ExportBundle};

#[derive(Parser, Debug)]
#[command(name = "habitect-report")]
#[command(about = "Habitect - Your Week in Habits")]
#[command(version)]
struct Args {
    /// Export bundle to read (default: $XDG_DATA_HOME/habitect/export.json)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Any date inside the week to report on (format: YYYY-MM-DD, default: today)
    #[arg(long)]
    week: Option<NaiveDate>,

    /// IANA timezone for day boundaries (default: from config)
    #[arg(long)]
    timezone: Option<String>,

    /// User to report on (default: the bundle's only user)
    #[arg(long)]
    user: Option<Uuid>,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,

    /// Skip the comparison against the previous week
    #[arg(long)]
    no_compare: bool,

    /// Skip the next-week extrapolation
    #[arg(long)]
    no_predict: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();
    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = habitect_core::logging::init(&config.logging).ok();

    let zone = resolve_timezone(
        args.timezone
            .as_deref()
            .unwrap_or(&config.engine.default_timezone),
    );
    if zone.degraded {
        eprintln!("warning: unknown timezone, day boundaries computed in UTC");
    }

    let input = args.input.unwrap_or_else(Config::default_bundle_path);
    let bundle = ExportBundle::load(&input)
        .with_context(|| format!("failed to load export bundle from {}", input.display()))?;

    let user_id = match args.user {
        Some(id) => bundle.require_user(id)?,
        None => bundle.single_user().ok_or_else(|| {
            anyhow::anyhow!(
                "bundle has {} users; pass --user to pick one",
                bundle.user_ids().len()
            )
        })?,
    };

    let week = WeekWindow::containing(args.week.unwrap_or_else(|| civil_today(zone.tz)));

    let weekly_config = WeeklyConfig {
        include_comparison: config.weekly.include_comparison && !args.no_compare,
        include_prediction: config.weekly.include_prediction && !args.no_predict,
    };

    let report = build_weekly_report(
        user_id,
        week,
        &bundle.habits,
        &bundle.events,
        &bundle.entries,
        zone.tz,
        &weekly_config,
    );

    // terminal view only: a calendar strip per active habit, ending at the
    // reported week's final day
    let history: Vec<(String, Vec<StreakDay>)> = bundle
        .habits
        .iter()
        .filter(|h| h.user_id == user_id && h.is_active)
        .map(|habit| {
            (
                habit.title.clone(),
                streak_history(
                    habit,
                    &bundle.events,
                    zone.tz,
                    week.last_day(),
                    config.engine.history_days,
                    HistoryOrder::OldestFirst,
                ),
            )
        })
        .collect();

    match args.export.as_deref() {
        Some("json") => print_json(&report)?,
        Some("md") => print_markdown(&report),
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
        None => print_terminal(&report, &history),
    }

    Ok(())
}

fn print_terminal(report: &WeeklyReport, history: &[(String, Vec<StreakDay>)]) {
    let stats = &report.statistics;
    let title = format!(
        "WEEK IN HABITS: {} to {}",
        stats.week_start.format("%b %d"),
        (stats.week_end - Duration::days(1)).format("%b %d")
    );

    // Header
    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", title);
    println!("╰{}╯", "─".repeat(60));
    println!();

    // Check if there's any data
    if stats.habits.is_empty() && stats.entry_count == 0 {
        println!("  No activity found for this week.");
        println!();
        return;
    }

    println!("SUMMARY");
    println!(
        "   Habits:  {:<4} active    Completions: {} ({:.0}% of targets)",
        stats.active_habits, stats.completed_events, stats.completion_rate
    );
    match report.mood.average {
        Some(average) => println!(
            "   Journal: {:<4} entries   Mood: {:.1} average ({})",
            stats.entry_count,
            average,
            report.mood.trend.as_str()
        ),
        None => println!(
            "   Journal: {:<4} entries   Mood: unrated",
            stats.entry_count
        ),
    }
    println!(
        "   Best streak: {} day{}",
        stats.longest_streak,
        plural(stats.longest_streak as i64)
    );
    println!();

    if !stats.habits.is_empty() {
        println!("HABITS");
        for habit in &stats.habits {
            println!(
                "   {:<24} {:>2} done   streak {} day{} ({})",
                habit.analytics.title,
                habit.analytics.completed,
                habit.streak.current_streak,
                plural(habit.streak.current_streak as i64),
                habit.streak.streak_type.as_str()
            );
        }
        println!();
    }

    if let Some(window) = history.first().map(|(_, days)| days.len()) {
        println!("RECENT ACTIVITY (last {} days, # done / x broken / . quiet)", window);
        for (title, days) in history {
            let strip: String = days
                .iter()
                .map(|day| match (day.has_event, day.contributes) {
                    (true, true) => '#',
                    (true, false) => 'x',
                    (false, _) => '.',
                })
                .collect();
            println!("   {:<24} {}", title, strip);
        }
        println!();
    }

    if !report.achievements.is_empty() {
        println!("ACHIEVEMENTS");
        for achievement in &report.achievements {
            println!("   * {}", achievement);
        }
        println!();
    }

    if !report.insights.is_empty() {
        println!("INSIGHTS");
        for insight in &report.insights {
            println!("   * {}", insight);
        }
        println!();
    }

    if let Some(comparison) = &report.comparison {
        println!("VS PREVIOUS WEEK");
        println!(
            "   Completion: {:+.1} pts{}",
            comparison.completion_rate_delta,
            direction_label(comparison.completion_change)
        );
        if let Some(delta) = comparison.mood_delta {
            println!(
                "   Mood:       {:+.1}{}",
                delta,
                direction_label(comparison.mood_change)
            );
        }
        println!(
            "   Entries: {:+}   Best streak: {:+} day{}",
            comparison.entry_count_delta,
            comparison.longest_streak_delta,
            plural(comparison.longest_streak_delta)
        );
        println!();
    }

    if let Some(prediction) = &report.prediction {
        println!("NEXT WEEK OUTLOOK");
        match prediction.average_mood {
            Some(mood) => println!(
                "   Completion rate: {:.0}%   Mood: {:.1}",
                prediction.completion_rate, mood
            ),
            None => println!("   Completion rate: {:.0}%", prediction.completion_rate),
        }
        println!();
    }
}

fn print_markdown(report: &WeeklyReport) {
    let stats = &report.statistics;

    println!("# Week in Habits: {}", stats.week_start.format("%Y-%m-%d"));
    println!();

    if stats.habits.is_empty() && stats.entry_count == 0 {
        println!("*No activity found for this week.*");
        return;
    }

    // Summary table
    println!("## Summary");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Active habits | {} |", stats.active_habits);
    println!("| Completions | {} |", stats.completed_events);
    println!("| Completion rate | {:.1}% |", stats.completion_rate);
    println!("| Journal entries | {} |", stats.entry_count);
    if let Some(average) = report.mood.average {
        println!(
            "| Average mood | {:.1} ({}) |",
            average,
            report.mood.trend.as_str()
        );
    }
    println!("| Best streak | {} days |", stats.longest_streak);
    println!();

    if !stats.habits.is_empty() {
        println!("## Habits");
        println!();
        println!("| Habit | Completed | Streak | State |");
        println!("|-------|-----------|--------|-------|");
        for habit in &stats.habits {
            println!(
                "| {} | {} | {} | {} |",
                habit.analytics.title,
                habit.analytics.completed,
                habit.streak.current_streak,
                habit.streak.streak_type.as_str()
            );
        }
        println!();
    }

    if !report.achievements.is_empty() {
        println!("## Achievements");
        println!();
        for achievement in &report.achievements {
            println!("- {}", achievement);
        }
        println!();
    }

    if !report.insights.is_empty() {
        println!("## Insights");
        println!();
        for insight in &report.insights {
            println!("- {}", insight);
        }
        println!();
    }

    if let Some(comparison) = &report.comparison {
        println!("## Vs Previous Week");
        println!();
        println!("| Metric | Change |");
        println!("|--------|--------|");
        println!(
            "| Completion rate | {:+.1} pts |",
            comparison.completion_rate_delta
        );
        if let Some(delta) = comparison.mood_delta {
            println!("| Mood | {:+.1} |", delta);
        }
        println!("| Entries | {:+} |", comparison.entry_count_delta);
        println!(
            "| Best streak | {:+} days |",
            comparison.longest_streak_delta
        );
        println!();
    }

    if let Some(prediction) = &report.prediction {
        println!("## Next Week Outlook");
        println!();
        println!("- **Completion rate:** {:.0}%", prediction.completion_rate);
        if let Some(mood) = prediction.average_mood {
            println!("- **Average mood:** {:.1}", mood);
        }
        println!();
    }

    println!("---");
    println!("*Generated by habitect-report*");
}

fn print_json(report: &WeeklyReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn plural(n: i64) -> &'static str {
    if n.abs() == 1 {
        ""
    } else {
        "s"
    }
}

fn direction_label(change: Option<ChangeDirection>) -> String {
    match change {
        Some(direction) => format!(" ({})", direction.as_str()),
        None => String::new(),
    }
}

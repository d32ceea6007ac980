//! Display utilities for the countdown CLI.

use std::io::{self, Write};

use countdown_core::domain::{CountType, Countdown, TimeRemaining};
use serde_json::json;

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    pub fn show_created(countdown: &Countdown) {
        println!("* created {}", countdown.id);
        println!("  {}", countdown.title);
    }

    pub fn show_updated(countdown: &Countdown) {
        println!("* updated {}", countdown.id);
    }

    pub fn show_deleted(id: &impl std::fmt::Display) {
        println!("[] deleted {id}");
    }

    /// Shows one countdown with its remaining time.
    pub fn show_countdown(countdown: &Countdown, remaining: &TimeRemaining) {
        println!("{}", countdown.title);
        println!("─────────────────────────────");
        println!("id:        {}", countdown.id);
        println!("target:    {}", countdown.target_date.to_rfc3339());
        println!("timezone:  {}", countdown.timezone);
        if let Some(location) = &countdown.location {
            println!("location:  {location}");
        }
        match (&countdown.count_type, &countdown.working_hours) {
            (CountType::Working, Some(hours)) => {
                let weekends = if hours.exclude_weekends {
                    ", weekdays only"
                } else {
                    ""
                };
                println!(
                    "mode:      working ({}-{}{weekends})",
                    hours.start.format("%H:%M"),
                    hours.end.format("%H:%M")
                );
            }
            _ => println!("mode:      natural"),
        }
        if !countdown.background_images.is_empty() {
            println!(
                "images:    {} (every {}s)",
                countdown.background_images.len(),
                countdown.image_interval().as_secs()
            );
        }
        println!("remaining: {remaining}");
    }

    pub fn show_countdown_json(
        countdown: &Countdown,
        remaining: &TimeRemaining,
    ) -> serde_json::Result<()> {
        let value = json!({ "countdown": countdown, "remaining": remaining });
        println!("{}", serde_json::to_string_pretty(&value)?);
        Ok(())
    }

    /// Shows all countdowns, one line each.
    pub fn show_list(rows: &[(Countdown, TimeRemaining)]) {
        if rows.is_empty() {
            println!("no countdowns");
            return;
        }
        for (countdown, remaining) in rows {
            println!("{}  {:<16}  {}", countdown.id, remaining.to_string(), countdown.title);
        }
    }

    pub fn show_list_json(countdowns: &[Countdown]) -> serde_json::Result<()> {
        println!("{}", serde_json::to_string_pretty(countdowns)?);
        Ok(())
    }

    /// Rewrites the current terminal line with the latest value.
    pub fn show_tick(remaining: &TimeRemaining, image: Option<&str>) -> io::Result<()> {
        Self::write_tick(&mut io::stdout().lock(), remaining, image)
    }

    fn write_tick(
        out: &mut impl Write,
        remaining: &TimeRemaining,
        image: Option<&str>,
    ) -> io::Result<()> {
        match image {
            Some(name) => write!(out, "\r\x1b[2K{remaining}  [{name}]")?,
            None => write!(out, "\r\x1b[2K{remaining}")?,
        }
        out.flush()
    }

    pub fn finish_watch() {
        println!();
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {message}");
    }
}

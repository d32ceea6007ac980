//! Command definitions for the countdown CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use chrono::{DateTime, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use countdown_core::domain::{CountType, CountdownId, Customization, WorkingHours};

// ============================================================================
// CLI Structure
// ============================================================================

/// Shareable countdown timers with natural and working-hours modes
#[derive(Parser, Debug)]
#[command(name = "countdown", version, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML config file (tick period, store backend)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Use a JSON file store at this path, overriding the config
    #[arg(long, global = true, value_name = "PATH")]
    pub store_path: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a countdown and print its id
    Create(CreateArgs),

    /// Show one countdown and its remaining time
    Show(ShowArgs),

    /// Change fields of an existing countdown
    Update(UpdateArgs),

    /// Delete a countdown (no error if it is already gone)
    Delete {
        id: CountdownId,
    },

    /// List all countdowns, newest first
    List {
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Refresh the remaining time until it expires or Ctrl-C
    Watch {
        id: CountdownId,
    },
}

// ============================================================================
// Arguments
// ============================================================================

/// Counting mode on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Natural,
    Working,
}

impl From<Mode> for CountType {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Natural => CountType::Natural,
            Mode::Working => CountType::Working,
        }
    }
}

/// Working window flags for create
#[derive(Args, Debug, Clone, Default)]
pub struct WorkingArgs {
    /// Start of the daily working window (HH:MM)
    #[arg(long, value_parser = parse_clock_time, requires = "work_end")]
    pub work_start: Option<NaiveTime>,

    /// End of the daily working window (HH:MM, exclusive)
    #[arg(long, value_parser = parse_clock_time, requires = "work_start")]
    pub work_end: Option<NaiveTime>,

    /// Skip Saturdays and Sundays
    #[arg(long)]
    pub exclude_weekends: bool,
}

impl WorkingArgs {
    pub fn working_hours(&self) -> Option<WorkingHours> {
        match (self.work_start, self.work_end) {
            (Some(start), Some(end)) => Some(WorkingHours::new(start, end, self.exclude_weekends)),
            _ => None,
        }
    }
}

/// Working window changes for update; unset parts keep their stored value
#[derive(Args, Debug, Clone, Default)]
pub struct WorkingChangeArgs {
    /// New start of the daily working window (HH:MM)
    #[arg(long, value_parser = parse_clock_time)]
    pub work_start: Option<NaiveTime>,

    /// New end of the daily working window (HH:MM, exclusive)
    #[arg(long, value_parser = parse_clock_time)]
    pub work_end: Option<NaiveTime>,

    /// Skip Saturdays and Sundays (true or false)
    #[arg(long, value_name = "BOOL")]
    pub exclude_weekends: Option<bool>,
}

impl WorkingChangeArgs {
    pub fn is_empty(&self) -> bool {
        self.work_start.is_none() && self.work_end.is_none() && self.exclude_weekends.is_none()
    }

    /// Merge the given parts over `current`.
    ///
    /// `Ok(None)` when nothing was given. Without a stored window both
    /// bounds are required.
    pub fn merge(&self, current: Option<&WorkingHours>) -> Result<Option<WorkingHours>, String> {
        if self.is_empty() {
            return Ok(None);
        }
        let start = self.work_start.or(current.map(|h| h.start));
        let end = self.work_end.or(current.map(|h| h.end));
        let (Some(start), Some(end)) = (start, end) else {
            return Err("no working window stored: pass both --work-start and --work-end".into());
        };
        let exclude_weekends = self
            .exclude_weekends
            .or(current.map(|h| h.exclude_weekends))
            .unwrap_or(false);
        Ok(Some(WorkingHours::new(start, end, exclude_weekends)))
    }
}

/// Styling flags shared by create and update
#[derive(Args, Debug, Clone, Default)]
pub struct StyleArgs {
    #[arg(long)]
    pub background_color: Option<String>,

    #[arg(long)]
    pub text_color: Option<String>,

    #[arg(long)]
    pub title_color: Option<String>,

    #[arg(long)]
    pub font_family: Option<String>,

    #[arg(long)]
    pub font_size: Option<String>,

    /// Seconds between background image changes
    #[arg(long)]
    pub image_interval: Option<u32>,
}

impl StyleArgs {
    pub fn touches_customization(&self) -> bool {
        self.background_color.is_some()
            || self.text_color.is_some()
            || self.title_color.is_some()
            || self.font_family.is_some()
            || self.font_size.is_some()
    }

    /// Overwrite the given fields, keeping the rest.
    pub fn apply_to(self, customization: &mut Customization) {
        if let Some(v) = self.background_color {
            customization.background_color = v;
        }
        if let Some(v) = self.text_color {
            customization.text_color = v;
        }
        if let Some(v) = self.title_color {
            customization.title_color = v;
        }
        if let Some(v) = self.font_family {
            customization.font_family = v;
        }
        if let Some(v) = self.font_size {
            customization.font_size = v;
        }
    }
}

/// Arguments for the create command
#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    pub title: String,

    /// Target instant, RFC 3339 (e.g. 2025-01-01T00:00:00+09:00)
    #[arg(long, value_parser = parse_target)]
    pub target: DateTime<Utc>,

    /// IANA timezone used for working hours
    #[arg(long, default_value = "UTC")]
    pub timezone: String,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long, value_enum, default_value_t = Mode::Natural)]
    pub mode: Mode,

    #[command(flatten)]
    pub working: WorkingArgs,

    #[command(flatten)]
    pub style: StyleArgs,
}

/// Arguments for the show command
#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    pub id: CountdownId,

    /// Print the record and remaining time as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the update command
#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    pub id: CountdownId,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, value_parser = parse_target)]
    pub target: Option<DateTime<Utc>>,

    #[arg(long)]
    pub timezone: Option<String>,

    #[arg(long, conflicts_with = "clear_location")]
    pub location: Option<String>,

    /// Remove the location
    #[arg(long)]
    pub clear_location: bool,

    /// Switch counting mode; natural clears the working window
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,

    #[command(flatten)]
    pub working: WorkingChangeArgs,

    #[command(flatten)]
    pub style: StyleArgs,
}

// ============================================================================
// Value parsers
// ============================================================================

fn parse_target(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("expected RFC 3339 timestamp: {e}"))
}

fn parse_clock_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| format!("expected HH:MM, got {s:?}"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ID: &str = "cd-01ARZ3NDEKTSV4RRFFQ69G5FAV";

    #[test]
    fn test_parse_create_natural() {
        let cli = Cli::parse_from([
            "countdown",
            "create",
            "New year",
            "--target",
            "2025-01-01T00:00:00+09:00",
            "--timezone",
            "Asia/Tokyo",
        ]);
        let Commands::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.title, "New year");
        assert_eq!(
            args.target,
            Utc.with_ymd_and_hms(2024, 12, 31, 15, 0, 0).unwrap()
        );
        assert_eq!(args.timezone, "Asia/Tokyo");
        assert_eq!(args.mode, Mode::Natural);
        assert!(args.working.work_start.is_none());
    }

    #[test]
    fn test_parse_create_working() {
        let cli = Cli::parse_from([
            "countdown",
            "create",
            "Release",
            "--target",
            "2025-03-01T12:00:00Z",
            "--mode",
            "working",
            "--work-start",
            "09:00",
            "--work-end",
            "17:30",
            "--exclude-weekends",
        ]);
        let Commands::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.mode, Mode::Working);
        assert_eq!(args.working.work_start, NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(args.working.work_end, NaiveTime::from_hms_opt(17, 30, 0));
        assert!(args.working.exclude_weekends);
    }

    #[test]
    fn test_work_start_requires_end() {
        let result = Cli::try_parse_from([
            "countdown",
            "create",
            "x",
            "--target",
            "2025-03-01T12:00:00Z",
            "--work-start",
            "09:00",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_bad_target() {
        let result = Cli::try_parse_from(["countdown", "create", "x", "--target", "tomorrow"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_show_accepts_prefixed_id() {
        let cli = Cli::parse_from(["countdown", "show", ID, "--json"]);
        let Commands::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.id.to_string(), ID);
        assert!(args.json);
    }

    #[test]
    fn test_rejects_malformed_id() {
        assert!(Cli::try_parse_from(["countdown", "delete", "not-an-id"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "countdown",
            "list",
            "-v",
            "--store-path",
            "/tmp/countdowns.json",
        ]);
        assert!(cli.verbose);
        assert_eq!(
            cli.store_path.as_deref(),
            Some(std::path::Path::new("/tmp/countdowns.json"))
        );
        assert!(matches!(cli.command, Commands::List { json: false }));
    }

    #[test]
    fn test_location_conflicts_with_clear() {
        let result = Cli::try_parse_from([
            "countdown",
            "update",
            ID,
            "--location",
            "Tokyo",
            "--clear-location",
        ]);
        assert!(result.is_err());
    }

    fn update_args(extra: &[&str]) -> UpdateArgs {
        let mut argv = vec!["countdown", "update", ID];
        argv.extend_from_slice(extra);
        let Commands::Update(args) = Cli::parse_from(argv).command else {
            panic!("expected update");
        };
        args
    }

    fn nine_to_five_weekdays() -> WorkingHours {
        WorkingHours::new(
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            true,
        )
    }

    #[test]
    fn test_update_window_keeps_weekend_exclusion() {
        let args = update_args(&["--work-start", "10:00", "--work-end", "18:00"]);
        let merged = args
            .working
            .merge(Some(&nine_to_five_weekdays()))
            .unwrap()
            .unwrap();

        assert_eq!(merged.start, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(merged.end, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert!(merged.exclude_weekends);
    }

    #[test]
    fn test_update_can_turn_weekend_exclusion_off_alone() {
        let args = update_args(&["--exclude-weekends", "false"]);
        let merged = args
            .working
            .merge(Some(&nine_to_five_weekdays()))
            .unwrap()
            .unwrap();

        assert!(!merged.exclude_weekends);
        assert_eq!(merged.start, nine_to_five_weekdays().start);
        assert_eq!(merged.end, nine_to_five_weekdays().end);
    }

    #[test]
    fn test_update_single_bound_keeps_the_other() {
        let args = update_args(&["--work-end", "16:00"]);
        let merged = args
            .working
            .merge(Some(&nine_to_five_weekdays()))
            .unwrap()
            .unwrap();

        assert_eq!(merged.start, nine_to_five_weekdays().start);
        assert_eq!(merged.end, NaiveTime::from_hms_opt(16, 0, 0).unwrap());
    }

    #[test]
    fn test_update_without_working_flags_leaves_window_alone() {
        let args = update_args(&["--title", "renamed"]);
        assert_eq!(args.working.merge(Some(&nine_to_five_weekdays())), Ok(None));
    }

    #[test]
    fn test_update_new_window_needs_both_bounds() {
        let args = update_args(&["--work-start", "09:00"]);
        assert!(args.working.merge(None).is_err());

        let args = update_args(&["--work-start", "09:00", "--work-end", "17:00"]);
        let merged = args.working.merge(None).unwrap().unwrap();
        assert!(!merged.exclude_weekends);
    }

    #[test]
    fn test_style_args_detection() {
        let style = StyleArgs {
            image_interval: Some(3),
            ..Default::default()
        };
        assert!(!style.touches_customization());

        let style = StyleArgs {
            font_size: Some("32px".to_string()),
            ..Default::default()
        };
        assert!(style.touches_customization());

        let mut customization = Customization::default();
        style.apply_to(&mut customization);
        assert_eq!(customization.font_size, "32px");
        assert_eq!(customization.font_family, Customization::default().font_family);
    }
}

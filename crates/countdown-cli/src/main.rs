//! countdown - shareable countdown timers from the terminal
//!
//! 例:
//! ```text
//! countdown create "Release" --target 2025-03-01T12:00:00Z \
//!     --mode working --work-start 09:00 --work-end 17:00 --exclude-weekends
//! countdown list
//! countdown watch cd-01J...
//! ```

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use countdown_core::app::{App, AppBuilder};
use countdown_core::config::{CountdownConfig, StoreConfig};
use countdown_core::domain::{CountdownId, CountdownPatch, Customization, NewCountdown};
use countdown_core::ports::Clock;

mod cli;

use cli::{Cli, Commands, CreateArgs, Display, Mode, ShowArgs, UpdateArgs};

/// Store used when neither `--config` nor `--store-path` is given.
const DEFAULT_STORE_FILE: &str = "countdowns.json";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<CountdownConfig> {
    let mut config = match &cli.config {
        Some(path) => CountdownConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CountdownConfig {
            store: StoreConfig::file(DEFAULT_STORE_FILE),
            ..CountdownConfig::default()
        },
    };
    if let Some(path) = &cli.store_path {
        config.store = StoreConfig {
            max_bytes: config.store.max_bytes,
            ..StoreConfig::file(path.clone())
        };
    }
    Ok(config)
}

async fn execute(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    tracing::debug!(?config, "starting");
    let app = AppBuilder::new()
        .with_config(config)
        .build()
        .context("building app")?;

    match cli.command {
        Commands::Create(args) => create(&app, args).await,
        Commands::Show(args) => show(&app, args).await,
        Commands::Update(args) => update(&app, args).await,
        Commands::Delete { id } => {
            app.service()
                .delete(&id)
                .await
                .with_context(|| format!("deleting {id}"))?;
            Display::show_deleted(&id);
            Ok(())
        }
        Commands::List { json } => list(&app, json).await,
        Commands::Watch { id } => watch(&app, id).await,
    }
}

async fn create(app: &App, args: CreateArgs) -> Result<()> {
    let image_interval = args.style.image_interval;
    let mut customization = Customization::default();
    args.style.apply_to(&mut customization);

    let input = NewCountdown {
        location: args.location,
        count_type: args.mode.into(),
        working_hours: args.working.working_hours(),
        customization,
        image_interval,
        ..NewCountdown::natural(args.title, args.target, args.timezone)
    };

    let id = app
        .service()
        .create(input)
        .await
        .context("creating countdown")?;
    let countdown = app.service().get(&id).await?;
    Display::show_created(&countdown);
    Ok(())
}

async fn show(app: &App, args: ShowArgs) -> Result<()> {
    let (countdown, remaining) = app
        .service()
        .remaining(&args.id)
        .await
        .with_context(|| format!("loading {}", args.id))?;
    if args.json {
        Display::show_countdown_json(&countdown, &remaining)?;
    } else {
        Display::show_countdown(&countdown, &remaining);
    }
    Ok(())
}

async fn update(app: &App, args: UpdateArgs) -> Result<()> {
    let service = app.service();
    let current = service
        .get(&args.id)
        .await
        .with_context(|| format!("loading {}", args.id))?;

    let mut patch = CountdownPatch {
        title: args.title,
        target_date: args.target,
        timezone: args.timezone,
        ..CountdownPatch::default()
    };

    if args.clear_location {
        patch.location = Some(None);
    } else if let Some(location) = args.location {
        patch.location = Some(Some(location));
    }

    if let Some(mode) = args.mode {
        patch.count_type = Some(mode.into());
        if mode == Mode::Natural {
            patch.working_hours = Some(None);
        }
    }
    if let Some(hours) = args
        .working
        .merge(current.working_hours.as_ref())
        .map_err(anyhow::Error::msg)?
    {
        patch.working_hours = Some(Some(hours));
    }

    if let Some(interval) = args.style.image_interval {
        patch.image_interval = Some(Some(interval));
    }
    if args.style.touches_customization() {
        let mut customization = current.customization;
        args.style.apply_to(&mut customization);
        patch.customization = Some(customization);
    }

    if patch.is_empty() {
        anyhow::bail!("nothing to update");
    }

    service
        .update(&args.id, patch)
        .await
        .with_context(|| format!("updating {}", args.id))?;
    Display::show_updated(&service.get(&args.id).await?);
    Ok(())
}

async fn list(app: &App, json: bool) -> Result<()> {
    let countdowns = app.service().list().await.context("listing countdowns")?;
    if json {
        Display::show_list_json(&countdowns)?;
        return Ok(());
    }

    let now = app.service().clock().now();
    let rows: Vec<_> = countdowns
        .into_iter()
        .map(|c| {
            let remaining = countdown_core::compute_remaining(now, &c);
            (c, remaining)
        })
        .collect();
    Display::show_list(&rows);
    Ok(())
}

async fn watch(app: &App, id: CountdownId) -> Result<()> {
    let countdown = app
        .service()
        .get(&id)
        .await
        .with_context(|| format!("loading {id}"))?;
    println!("{}", countdown.title);

    let started = Instant::now();
    let (mut rx, handle) = app.ticker().spawn(countdown.clone());

    loop {
        let remaining = *rx.borrow_and_update();
        let image = countdown
            .background_image_at(started.elapsed())
            .map(|img| img.name.as_str());
        if let Err(e) = Display::show_tick(&remaining, image) {
            handle.abort();
            return Err(e).context("writing countdown to stdout");
        }
        if remaining.is_expired {
            break;
        }

        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("interrupted");
                break;
            }
        }
    }

    Display::finish_watch();
    handle.abort();
    Ok(())
}

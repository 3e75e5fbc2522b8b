use anyhow::Context as _;
use chrono::Local;
use clap::{Parser, Subcommand};
use enquete::backend::Backend;
use enquete::config::Config;
use enquete::connectivity::{ConnectionState, ConnectivityMonitor, StatusIndicator};
use enquete::model::{CRIMES, PERSONS};
use enquete::text;
use enquete::toast::ToastQueue;
use enquete::view::{self, Context, Failure, StatCounter, View};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "enquete")]
#[command(author, version, about = "Investigation dashboard for a Prolog reasoning backend")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Backend base URL (overrides ENQUETE_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Log filter, e.g. "debug" or "enquete=trace" (overrides ENQUETE_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the web dashboard (default)
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Don't open the browser
        #[arg(long)]
        no_open: bool,
    },

    /// Check whether the backend is reachable
    Status,

    /// Full investigation of one person for one crime
    Investigate { person: String, crime: String },

    /// Quick verdict of one person for one crime
    Quick { person: String, crime: String },

    /// Every person with their status per crime
    Persons,

    /// Evidence for a person or a crime
    Evidence {
        #[arg(long, conflicts_with = "crime", required_unless_present = "crime")]
        person: Option<String>,

        #[arg(long)]
        crime: Option<String>,
    },

    /// Reveal the final solution with statistics
    Solution {
        /// Print the counters at once
        #[arg(long)]
        no_animate: bool,
    },

    /// List the known people and crimes
    Roster,
}

fn main() {
    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(base) = args.api_base {
        config.api_base = base;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    init_tracing(&config.log_level);

    let command = args.command.unwrap_or(Command::Serve { port: None, no_open: false });
    match run(command, config) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .compact()
        .init();
}

/// Returns whether the action succeeded.
fn run(command: Command, mut config: Config) -> anyhow::Result<bool> {
    match command {
        Command::Serve { port, no_open } => {
            if let Some(port) = port {
                config.port = port;
            }
            enquete::serve::start(&config, !no_open).context("dashboard server failed")?;
            Ok(true)
        }
        Command::Status => status(&config),
        Command::Investigate { person, crime } => {
            one_shot(&config, |ctx| view::investigation::investigate(ctx, &person, &crime))
                .map(|v| v.is_some())
        }
        Command::Quick { person, crime } => {
            one_shot(&config, |ctx| view::investigation::quick_test(ctx, &person, &crime))
                .map(|v| v.is_some())
        }
        Command::Persons => one_shot(&config, view::persons::load_persons).map(|v| v.is_some()),
        Command::Evidence { person: Some(person), .. } => {
            one_shot(&config, |ctx| view::evidence::load_person_evidence(ctx, &person))
                .map(|v| v.is_some())
        }
        Command::Evidence { person: None, crime } => {
            let crime = crime.unwrap_or_default();
            one_shot(&config, |ctx| view::evidence::load_crime_evidence(ctx, &crime))
                .map(|v| v.is_some())
        }
        Command::Solution { no_animate } => {
            let solution = one_shot_quiet(&config, view::solution::reveal_final_solution)?;
            match solution {
                Some(view) => {
                    print!("{}", view);
                    let counters = view.counters();
                    if no_animate {
                        print_counters(&counters, None);
                    } else {
                        animate_counters(&counters);
                    }
                    eprintln!("{}", view.toast());
                    Ok(true)
                }
                None => Ok(false),
            }
        }
        Command::Roster => {
            println!("\x1b[1mPersonnes\x1b[0m");
            for person in PERSONS {
                println!("  {}", text::capitalize_first(person));
            }
            println!("\x1b[1mCrimes\x1b[0m");
            for crime in CRIMES {
                println!("  {}", text::capitalize_first(crime));
            }
            Ok(true)
        }
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.magenta} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Probe the backend once so renderers see a real connection state.
fn connect(config: &Config) -> anyhow::Result<(Arc<dyn Backend>, ConnectionState)> {
    let backend: Arc<dyn Backend> =
        Arc::new(config.backend().context("invalid backend configuration")?);
    let connection = ConnectionState::new();
    ConnectivityMonitor::new(Arc::clone(&backend), connection.clone(), ToastQueue::new()).check();
    Ok((backend, connection))
}

fn status(config: &Config) -> anyhow::Result<bool> {
    let pb = spinner("Vérification du serveur Prolog...");
    let (_, connection) = connect(config)?;
    pb.finish_and_clear();

    let indicator = StatusIndicator::for_state(connection.is_connected());
    let (color, label) = if indicator.connected {
        ("\x1b[32m", "Connecté au serveur Prolog")
    } else {
        ("\x1b[31m", "Déconnecté du serveur Prolog")
    };
    println!(
        "[{}] {}●\x1b[0m {} ({})",
        Local::now().format("%H:%M:%S"),
        color,
        label,
        config.api_base
    );
    Ok(indicator.connected)
}

/// Run one renderer behind a spinner; failures go to stderr with their toast.
fn one_shot_quiet<V, F>(config: &Config, render: F) -> anyhow::Result<Option<V>>
where
    V: View,
    F: FnOnce(&Context<'_>) -> Result<V, Failure>,
{
    let pb = spinner("Analyse Prolog en cours...");
    let (backend, connection) = connect(config)?;
    let ctx = Context::new(backend.as_ref(), &connection);
    let outcome = render(&ctx);
    pb.finish_and_clear();

    match outcome {
        Ok(view) => Ok(Some(view)),
        Err(failure) => {
            eprintln!("{}", failure);
            eprintln!("{}", failure.toast);
            Ok(None)
        }
    }
}

fn one_shot<V, F>(config: &Config, render: F) -> anyhow::Result<Option<V>>
where
    V: View,
    F: FnOnce(&Context<'_>) -> Result<V, Failure>,
{
    let view = one_shot_quiet(config, render)?;
    if let Some(view) = &view {
        print!("{}", view);
        eprintln!("{}", view.toast());
    }
    Ok(view)
}

fn print_counters(counters: &[StatCounter], frame: Option<u32>) {
    let line: Vec<String> = counters
        .iter()
        .map(|c| {
            let value = match frame {
                Some(k) => c.animation.value_at(k),
                None => c.animation.target,
            };
            format!("{}: \x1b[1m{:>3}\x1b[0m", c.label, value)
        })
        .collect();
    print!("\r{}", line.join("   "));
    if frame.is_none() {
        println!();
    }
    let _ = io::stdout().flush();
}

fn animate_counters(counters: &[StatCounter]) {
    let Some(first) = counters.first() else {
        return;
    };
    let animation = &first.animation;
    print_counters(counters, Some(0));
    std::thread::sleep(animation.start_delay);
    for k in 1..=animation.steps {
        std::thread::sleep(animation.tick);
        print_counters(counters, Some(k));
    }
    print_counters(counters, None);
}

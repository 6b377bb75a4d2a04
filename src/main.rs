use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use kaggle_board::leaderboard::{score_roster, ScoreSettings};
use kaggle_board::output::RankedEntry;

const EXIT_SUCCESS: i32 = 0;
const EXIT_RUN: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the leaderboard (default if no subcommand)
    List {
        /// Emit tab-separated values instead of the table
        #[arg(long)]
        tsv: bool,

        /// Also write the standings to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Open a student's Kaggle profile by leaderboard index
    Open {
        /// Index of the student to open (1-based, as shown in list)
        index: usize,
    },
    /// Write a starter config file
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "kaggle-board")]
#[command(about = "Kaggle class leaderboard CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/kaggle-board/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::List {
        tsv: false,
        out: None,
    });
    let start_time = Instant::now();
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = command {
        match kaggle_board::config::write_starter_config(config_path) {
            Ok(Some(path)) => {
                println!("Wrote starter config to {}", path.display());
                println!("Fill in the roster and competitions, then run `kaggle-board`.");
                std::process::exit(EXIT_SUCCESS);
            }
            Ok(None) => {
                println!("Left existing config untouched.");
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => {
                eprintln!("Init error: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
    }

    // Load config
    let config = match kaggle_board::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if cli.verbose {
        eprintln!(
            "Loaded {} students and {} eligible competitions from config",
            config.roster.len(),
            config.competitions.len()
        );
    }

    // Validate scoring config at startup
    let effective_scoring = config.scoring.clone().unwrap_or_default();
    if let Err(errors) = kaggle_board::scoring::validate_scoring(&effective_scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let fetch = config.fetch.clone().unwrap_or_default();
    let view_timeout = match fetch.timeout() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if config.roster.is_empty() {
        eprintln!("No students in the roster.");
        eprintln!("Add them to ~/.config/kaggle-board/config.yaml:");
        eprintln!("  roster:");
        eprintln!("    - name: Alice Liddell");
        eprintln!("      username: alice");
        std::process::exit(EXIT_CONFIG);
    }

    if config.competitions.is_empty() {
        eprintln!("Note: no eligible competitions configured; only kernel votes will score.");
    }

    // Establish the extraction session; an unreachable site is fatal
    // before any scoring, never a board of silent zeroes.
    let client = match kaggle_board::kaggle::create_client() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create HTTP client: {}", e);
            std::process::exit(EXIT_NETWORK);
        }
    };

    let base_url = fetch.base_url().to_string();
    if let Err(e) = kaggle_board::kaggle::preflight(&client, &base_url).await {
        eprintln!("Could not establish a session with {}: {}", base_url, e);
        eprintln!("No report was produced.");
        std::process::exit(EXIT_NETWORK);
    }

    if cli.verbose {
        eprintln!("Session established with {}", base_url);
    }

    let source =
        kaggle_board::kaggle::KaggleSource::new(client, base_url.clone(), view_timeout, fetch.attempts());

    let settings = ScoreSettings {
        eligible: config.competitions.iter().cloned().collect(),
        since: config.since,
        scoring: effective_scoring,
        view_timeout,
        workers: fetch.workers(),
    };

    // Ctrl-C stops the loop after the in-flight student; scores already
    // computed remain reportable.
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!();
                eprintln!("Stopping after the current student...");
                cancel.store(true, Ordering::Relaxed);
            }
        });
    }

    let usernames: Vec<String> = config
        .roster
        .iter()
        .map(|entry| entry.username.clone())
        .collect();

    kaggle_board::warnings::hold();
    let scores = score_roster(&source, &usernames, &settings, &cancel, cli.verbose).await;
    let warnings = kaggle_board::warnings::release();

    let cancelled = cancel.load(Ordering::Relaxed) && scores.len() < config.roster.len();

    // Join scores back to the roster and rank. The sort is stable, so
    // ties keep roster order.
    let mut ranked: Vec<(&kaggle_board::config::RosterEntry, &kaggle_board::leaderboard::UserScore)> =
        config.roster.iter().zip(scores.iter()).collect();
    ranked.sort_by(|a, b| {
        b.1.points
            .partial_cmp(&a.1.points)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let entries: Vec<RankedEntry> = ranked
        .iter()
        .map(|(roster, score)| RankedEntry {
            name: &roster.name,
            username: &roster.username,
            points: score.points,
            incomplete: score.incomplete,
        })
        .collect();

    match command {
        Commands::List { tsv, out } => {
            let use_colors = kaggle_board::output::should_use_colors();

            if tsv {
                let output = kaggle_board::output::format_tsv(&entries);
                if !output.is_empty() {
                    println!("{}", output);
                }
            } else if cli.verbose && !entries.is_empty() {
                for entry in &entries {
                    println!(
                        "{}",
                        kaggle_board::output::format_student_detail(entry, use_colors)
                    );
                    println!();
                }
            } else {
                let output = kaggle_board::output::format_leaderboard(&entries, use_colors);
                println!("{}", output);
            }

            if let Some(path) = out {
                if let Err(e) = kaggle_board::output::write_standings(&path, &entries) {
                    eprintln!("Failed to write standings: {}", e);
                    std::process::exit(EXIT_RUN);
                }
                if cli.verbose {
                    eprintln!("Standings written to {}", path.display());
                }
            }
        }
        Commands::Open { index } => {
            // Validate index bounds (1-based)
            if index < 1 || index > entries.len() {
                eprintln!(
                    "Invalid index {}. Must be between 1 and {}.",
                    index,
                    entries.len()
                );
                std::process::exit(EXIT_CONFIG);
            }

            let entry = &entries[index - 1];
            match kaggle_board::browser::open_profile(&base_url, entry.username) {
                Ok(url) => println!("Opening {}'s profile in browser: {}", entry.name, url),
                Err(e) => {
                    eprintln!("Failed to open browser: {}", e);
                    std::process::exit(EXIT_RUN);
                }
            }
        }
        Commands::Init => unreachable!("handled before config load"),
    }

    for warning in &warnings {
        eprintln!("{}", warning);
    }

    if cancelled {
        eprintln!(
            "Cancelled: scored {} of {} students; the report above is partial.",
            scores.len(),
            config.roster.len()
        );
    }

    if cli.verbose {
        eprintln!(
            "Total: {} students in {:?}",
            scores.len(),
            start_time.elapsed()
        );
    }

    std::process::exit(EXIT_SUCCESS);
}

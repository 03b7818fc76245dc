//! Flagdeck CLI - session-scoped feature flag overrides.

use clap::Parser;
use flagdeck::cli::{Cli, Commands, FormatArg};
use flagdeck::commands::{self, Output, Workspace};
use flagdeck::config::ConfigOverrides;
use flagdeck::models::parse_override_value;
use flagdeck::persist::OverrideFormat;
use flagdeck::storage::SessionFile;
use std::env;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `debug`, `flagdeck=trace`).
const LOG_ENV: &str = "FLAGDECK_LOG";

fn main() {
    init_logging();

    let cli = Cli::parse();
    let human = cli.human_readable;

    let project_path = resolve_project_path(cli.project_path, human);

    let mut overrides = ConfigOverrides::new();
    if let Some(path) = cli.config_path {
        overrides = overrides.with_config_path(path);
    }
    if let Some(reveal) = cli.reveal_on_load {
        overrides = overrides.with_reveal_on_load(reveal);
    }

    if let Err(e) = run_command(cli.command, &project_path, &overrides, human) {
        tracing::debug!(error = %e, "command failed");
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

/// Install the stderr log subscriber. Defaults to warnings only.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Resolve the project path: --project flag > FLAGDECK_PROJECT env > current directory.
fn resolve_project_path(explicit_path: Option<PathBuf>, human: bool) -> PathBuf {
    match explicit_path {
        Some(path) => {
            if !path.exists() {
                let message = format!("Specified project path does not exist: {}", path.display());
                if human {
                    eprintln!("Error: {}", message);
                } else {
                    eprintln!("{}", serde_json::json!({ "error": message }));
                }
                process::exit(1);
            }
            path
        }
        None => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn run_command(
    command: Option<Commands>,
    project_path: &Path,
    overrides: &ConfigOverrides,
    human: bool,
) -> Result<(), flagdeck::Error> {
    let open = || Workspace::open(project_path, overrides);

    match command {
        // Doesn't read the catalog, so a broken catalog can't block ending a session
        Some(Commands::End) => {
            let file = SessionFile::for_project(project_path)?;
            output(&commands::end(&file)?, human);
        }
        None | Some(Commands::List) => output(&commands::list(&open()?), human),
        Some(Commands::Get { flag }) => output(&commands::get(&open()?, &flag), human),
        Some(Commands::Set { flag, value }) => {
            let value = parse_override_value(&value)?;
            output(&commands::set(&mut open()?, &flag, value)?, human);
        }
        Some(Commands::Reset { hide }) => output(&commands::reset(&mut open()?, hide)?, human),
        Some(Commands::Show) => output(&commands::set_visibility(&mut open()?, true)?, human),
        Some(Commands::Hide) => output(&commands::set_visibility(&mut open()?, false)?, human),
        Some(Commands::Status) => output(&commands::status(&open()?), human),
        Some(Commands::Export { format }) => {
            output(&commands::export(&open()?, to_format(format))?, human)
        }
        Some(Commands::Import { data, format }) => {
            output(&commands::import(&mut open()?, &data, to_format(format))?, human)
        }
    }

    Ok(())
}

fn to_format(format: FormatArg) -> OverrideFormat {
    match format {
        FormatArg::Json => OverrideFormat::Json,
        FormatArg::Query => OverrideFormat::Query,
    }
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}

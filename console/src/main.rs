//! Station console - Entry Point
//!
//! Runs the operator console service, or a single operator command when one is
//! given on the command line.

use std::collections::HashMap;
use std::env;

use anyhow::{anyhow, bail, Context};
use station_api::models::TaskRequest;
use stationctl::app::options::AppOptions;
use stationctl::app::run::run;
use stationctl::app::state::AppState;
use stationctl::cache::station::Mode;
use stationctl::filesys::file::File;
use stationctl::logs::{init_logging, LogOptions};
use stationctl::models::scenario::Scenario;
use stationctl::storage::layout::StorageLayout;
use stationctl::storage::session::Permission;
use stationctl::storage::settings::Settings;
use stationctl::utils::version_info;

use tracing::{error, info};

const COMMANDS: [&str; 8] = ["login", "logout", "list", "show", "save", "delete", "play", "task"];

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => println!("{}", version),
            Err(e) => eprintln!("Failed to print version: {e}"),
        }
        return;
    }

    let layout = match cli_args.get("config-dir") {
        Some(dir) => StorageLayout::new(dir),
        None => StorageLayout::default(),
    };

    // Retrieve the settings file
    let settings = match layout.settings_file().read_json_or_default::<Settings>().await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Unable to read settings file: {e}");
            return;
        }
    };

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        json_format: settings.log_json,
        log_dir: settings.log_to_file.then(|| layout.logs_dir()),
        ..Default::default()
    };
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            println!("Failed to initialize logging: {e}");
            None
        }
    };

    let options = match AppOptions::from_settings(&settings, layout) {
        Ok(options) => options,
        Err(e) => {
            error!("Invalid settings: {e}");
            return;
        }
    };

    // Run a single command
    if COMMANDS.iter().any(|command| cli_args.contains_key(*command)) {
        if let Err(e) = run_command(&cli_args, options).await {
            eprintln!("{e:#}");
            std::process::exit(1);
        }
        return;
    }

    // Run the console service starting here
    info!("Running station console with options: {:?}", options);
    if let Err(e) = run(options, await_shutdown_signal()).await {
        error!("Failed to run the console: {e}");
    }
}

async fn run_command(cli_args: &HashMap<String, String>, mut options: AppOptions) -> anyhow::Result<()> {
    // one-shot commands never open the subscription channels
    options.dashboard.realtime = None;

    let state = AppState::init(&options).await.context("failed to initialize console")?;
    let dashboard = state.dashboard.clone();
    // the command line always acts on the live station
    dashboard.set_mode(Mode::Live);

    let result = dispatch(cli_args, &state).await;

    for toast in state.toasts.recent() {
        eprintln!("{}", toast.to_terminal_line());
    }
    result
}

async fn dispatch(cli_args: &HashMap<String, String>, state: &AppState) -> anyhow::Result<()> {
    let dashboard = &state.dashboard;

    if cli_args.contains_key("login") {
        let cookie = cli_args.get("cookie").ok_or_else(|| anyhow!("--login requires --cookie=<cookie>"))?;
        let permission = match cli_args.get("permission") {
            Some(permission) => permission.parse::<Permission>().map_err(|e| anyhow!(e))?,
            None => Permission::default(),
        };
        dashboard.login(cookie, permission).await.context("login failed")?;
        println!("Logged in with {} permission", permission.as_str());
        return Ok(());
    }

    if cli_args.contains_key("logout") {
        dashboard.logout().await.context("logout failed")?;
        println!("Logged out");
        return Ok(());
    }

    if !state.session.is_logged_in().await {
        bail!("not logged in; run with --login --cookie=<cookie>");
    }

    if cli_args.contains_key("list") {
        let rows = dashboard.load_scenarios().await.context("failed to list scenarios")?;
        for row in rows {
            println!("{:>3}  {:<24} {}", row.id, row.name, row.description);
        }
        return Ok(());
    }

    if let Some(name) = cli_args.get("show") {
        let scenario = dashboard
            .fetch_scenario(name)
            .await
            .with_context(|| format!("failed to fetch scenario '{}'", name))?;
        println!("{}", serde_json::to_string_pretty(&scenario)?);
        return Ok(());
    }

    if let Some(name) = cli_args.get("save") {
        let path = cli_args.get("file").ok_or_else(|| anyhow!("--save requires --file=<path>"))?;
        let mut scenario: Scenario = File::new(path)
            .read_json()
            .await
            .with_context(|| format!("failed to read scenario file {}", path))?;
        scenario.name = name.clone();
        dashboard
            .save_scenario(&scenario)
            .await
            .with_context(|| format!("failed to save scenario '{}'", name))?;
        return Ok(());
    }

    if let Some(name) = cli_args.get("delete") {
        dashboard
            .delete_scenario(name)
            .await
            .with_context(|| format!("failed to delete scenario '{}'", name))?;
        return Ok(());
    }

    if let Some(name) = cli_args.get("play") {
        dashboard
            .play_scenario(name)
            .await
            .with_context(|| format!("failed to play scenario '{}'", name))?;
        println!("Scenario '{}' started", name);
        return Ok(());
    }

    if cli_args.contains_key("task") {
        let task = TaskRequest {
            action: cli_args.get("action").cloned().unwrap_or_else(|| "is_on".to_string()),
            target: cli_args
                .get("target")
                .cloned()
                .ok_or_else(|| anyhow!("--task requires --target=<actuator>"))?,
            value: cli_args
                .get("value")
                .ok_or_else(|| anyhow!("--task requires --value=<number>"))?
                .parse()
                .context("--value must be a number")?,
        };
        let status = dashboard.submit_task(&task).await.context("failed to send task")?;
        println!("{}", status);
        return Ok(());
    }

    Ok(())
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let (mut sigterm, mut sigint) = match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
            _ => {
                error!("Failed to install signal handlers, falling back to Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
        }
        info!("Ctrl+C received, shutting down...");
    }
}

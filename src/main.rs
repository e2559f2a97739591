//! Screen brightness control over a narrow bridge API: window overrides,
//! system-wide brightness and mode, and the permission to change them.

mod armaf;
mod bridge;
mod config;
mod control;
mod external;

use anyhow::Result;
use bridge::{call::METHODS, BridgeCall, BrightnessBridge};
use clap::{Parser, Subcommand};
use config::Config;
use control::{
    bridge_server::{call_bridge, BridgePort, BridgeServer},
    dbus_controller::{parse_options, DBusController},
};
use external::{
    dependency_provider::DependencyProvider, system_settings::SystemSettings,
    ui_context::ui_thread::UiThread, window::WindowBrightnessStore,
};
use flexi_logger::Logger;
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[clap(author, version, about)]
struct Args {
    /// TOML configuration file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Use in-memory stores instead of the backlight
    #[clap(long)]
    simulate: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the bridge on the session bus until interrupted
    Serve,
    /// Invoke a single bridge method and print its JSON result
    Call {
        method: String,
        /// Options object, for example '{"brightness": 0.5}'
        options: Option<String>,
    },
    /// List the bridge methods
    Methods,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    let _logger = Logger::try_with_env_or_str(&config.log_spec)?.start()?;
    log_panics::init();

    if let Command::Methods = args.command {
        for (method, description) in METHODS {
            println!("{:<26}{}", method, description);
        }
        return Ok(());
    }

    let succeeded = if args.simulate {
        info!("Simulating brightness stores in memory");
        run(DependencyProvider::make_mock(), args.command, &config).await?
    } else {
        let provider = DependencyProvider::make_system(&config.backlight).await?;
        run(provider, args.command, &config).await?
    };
    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}

/// Returns whether the command succeeded
async fn run<W: WindowBrightnessStore, S: SystemSettings>(
    provider: DependencyProvider<W, S>,
    command: Command,
    config: &Config,
) -> Result<bool> {
    let ui = UiThread::spawn().await?;
    let bridge = BrightnessBridge::new(provider.get_window(), provider.get_system_settings(), ui);
    let port = BridgeServer::new(bridge).spawn().await?;
    let succeeded = match command {
        Command::Serve => {
            serve(port.clone(), config).await?;
            true
        }
        Command::Call { method, options } => {
            call_once(&port, &method, options.as_deref().unwrap_or("")).await
        }
        Command::Methods => true,
    };
    port.await_shutdown().await;
    Ok(succeeded)
}

async fn serve(port: BridgePort, config: &Config) -> Result<()> {
    let handle = DBusController::new(config.dbus.path.as_deref(), port)
        .spawn()
        .await?;
    info!("Serving brightness bridge, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;
    info!("Interrupted, shutting down");
    handle.await_shutdown().await;
    Ok(())
}

async fn call_once(port: &BridgePort, method: &str, options: &str) -> bool {
    let parsed = parse_options(options).and_then(|options| BridgeCall::parse(method, &options));
    let result = match parsed {
        Ok(call) => call_bridge(port, call).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(response) => {
            println!("{}", response.to_json());
            true
        }
        Err(e) => {
            println!("{}", e.to_json());
            false
        }
    }
}

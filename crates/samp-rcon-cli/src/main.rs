use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use env_logger::Env;
use rpassword::read_password;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use samp_rcon::RconClientConfig;

mod commands;
mod configs;
mod dispatch;
mod session;

use crate::commands::{keep_in_history, whitelisted_command};
use crate::configs::{ServerConfig, load_config_from_env, load_config_from_vars};
use crate::dispatch::{Dispatcher, PLACEHOLDER, RconExecutor, ReplySink};

const HISTORY_FILE: &str = "history.txt";

#[derive(Parser)]
#[command(version, about = "Send RCON commands to a SA-MP server")]
struct Args {
    /// Server address (eg: 127.0.0.1:7777)
    #[arg(short, long)]
    address: Option<String>,

    /// RCON password
    #[arg(short, long)]
    password: Option<String>,

    /// Run a single command and exit, eg: "players" or "/kick 3"
    #[arg(short, long)]
    command: Option<String>,

    /// Password for /login in the interactive console. Without one, no login is required
    #[arg(long)]
    bot_password: Option<String>,

    /// How long a /login lasts, in seconds (at most one year)
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..=31_536_000))]
    session_ttl: u64,

    /// Seconds to wait for each reply datagram
    #[arg(long, default_value_t = 5)]
    timeout: u64,

    /// Also log every response
    #[arg(long, action = clap::ArgAction::SetTrue)]
    show_responses: bool,

    /// Config name to load from SAMP_RCON_CONFIG_PATH
    #[arg(long)]
    config_name: Option<String>,
}

/// Prints replies to the terminal; an edit overwrites the placeholder line.
struct ConsoleSink {
    show_responses: bool,
}

impl ReplySink for ConsoleSink {
    type Handle = ();

    fn reply(&mut self, text: &str) {
        if text == PLACEHOLDER {
            print!("{text}");
            let _ = std::io::stdout().flush();
        } else {
            println!("{text}");
        }
    }

    fn edit(&mut self, _handle: (), text: &str) {
        // \x1b[2K clears the placeholder
        println!("\r\x1b[2K{text}");
        if self.show_responses {
            log::info!("Response: {:?}", text);
        }
    }
}

async fn run_cli(dispatcher: Dispatcher<RconExecutor>, identity: String, show_responses: bool) -> rustyline::Result<()> {
    log::info!("Console ready, type /cmdlist for the available commands");

    let mut rl = DefaultEditor::new()?;
    let mut sink = ConsoleSink { show_responses };

    if rl.load_history(HISTORY_FILE).is_err() {
        log::info!("No previous history.");
    }

    loop {
        let readline = rl.readline("> ");
        match readline {
            Ok(line) => {
                if keep_in_history(&line) {
                    let _ = rl.add_history_entry(line.as_str());
                }
                dispatcher.handle(&identity, &line, &mut sink).await;
            },
            Err(ReadlineError::Interrupted) => {
                log::info!("CTRL-C");
                break;
            },
            Err(ReadlineError::Eof) => {
                log::info!("CTRL-D");
                break;
            },
            Err(err) => {
                log::error!("Error: {:?}", err);
                break;
            }
        }
    }

    rl.save_history(HISTORY_FILE).unwrap_or_else(|e| log::error!("Failed to save history: {}", e));
    Ok(())
}

fn get_address(provided_addr: &Option<String>) -> anyhow::Result<String> {
    if let Some(addr) = provided_addr {
        return Ok(addr.clone());
    }
    print!("Enter address: ");
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn get_password(provided_pw: &Option<String>) -> anyhow::Result<String> {
    if let Some(pw) = provided_pw {
        return Ok(pw.clone());
    }
    print!("Enter password: ");
    std::io::stdout().flush()?;
    read_password().context("failed to read password")
}

fn local_identity() -> String {
    std::env::var("USER").unwrap_or_else(|_| "operator".to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(
        Env::default().filter_or("RUST_LOG", "info")
    ).init();

    let searched_cfg = if args.config_name.is_some() {
        log::debug!("Config name provided: {:?}", args.config_name);
        load_config_from_env(args.config_name.clone())
    } else if args.address.is_none() {
        load_config_from_vars(|key| std::env::var(key).ok())
    } else {
        None
    };

    let server_config = match searched_cfg {
        Some(cfg) => cfg,
        None => ServerConfig {
            host: get_address(&args.address)?,
            password: get_password(&args.password)?,
            bot_password: None,
        },
    };

    let client_config = RconClientConfig::new(server_config.host, server_config.password)
        .io_timeout(Duration::from_secs(args.timeout));

    if let Some(cmd) = args.command {
        let Some(cmd) = whitelisted_command(&cmd) else {
            anyhow::bail!("unknown command {cmd:?}, see /cmdlist");
        };
        let response = samp_rcon::send_with_config(client_config, cmd).await?;
        println!("{}", response);
        return Ok(())
    }

    let bot_password = args.bot_password.or(server_config.bot_password);
    if bot_password.is_none() {
        log::warn!("No bot password configured, /login is not required");
    }

    let dispatcher = Dispatcher::new(RconExecutor::new(client_config), bot_password)
        .session_ttl(Duration::from_secs(args.session_ttl));

    run_cli(dispatcher, local_identity(), args.show_responses)
        .await
        .map_err(|e| anyhow::anyhow!("console failed: {e}"))
}

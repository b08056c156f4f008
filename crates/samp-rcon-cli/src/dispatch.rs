use std::future::Future;
use std::time::Duration;

use samp_rcon::packet::command_name;
use samp_rcon::{RconClientConfig, errors::RconError};

use crate::commands::{ConsoleCommand, command_list, parse_line};
use crate::session::SessionStore;

pub const LOGIN_HINT: &str = "use: /login [bot password]";
pub const PLACEHOLDER: &str = "wait...";
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60);

/// Runs a whitelisted command on the server.
pub trait CommandExecutor {
    fn execute(&self, command: &str) -> impl Future<Output = Result<String, RconError>> + Send;
}

/// Sends every command over a fresh UDP association.
#[derive(Debug, Clone)]
pub struct RconExecutor {
    config: RconClientConfig,
}

impl RconExecutor {
    pub fn new(config: RconClientConfig) -> Self {
        Self { config }
    }
}

impl CommandExecutor for RconExecutor {
    async fn execute(&self, command: &str) -> Result<String, RconError> {
        samp_rcon::send_with_config(self.config.clone(), command).await
    }
}

/// Where replies to a caller go. A reply can later be replaced, which is how
/// the "wait..." placeholder becomes the command result.
pub trait ReplySink {
    type Handle;

    fn reply(&mut self, text: &str) -> Self::Handle;
    fn edit(&mut self, handle: Self::Handle, text: &str);
}

/// Everything a handler needs: the executor, the login sessions and the
/// bot password. Created once at start-up and shared by reference.
#[derive(Debug)]
pub struct Dispatcher<E> {
    executor: E,
    sessions: SessionStore<String>,
    bot_password: Option<String>,
    session_ttl: Duration,
}

impl<E: CommandExecutor> Dispatcher<E> {
    /// With `bot_password` unset, every caller is authorized.
    pub fn new(executor: E, bot_password: Option<String>) -> Self {
        Self {
            executor,
            sessions: SessionStore::new(),
            bot_password,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    pub fn session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn is_authorized(&self, identity: &str) -> bool {
        self.bot_password.is_none() || self.sessions.is_authorized(&identity.to_string())
    }

    pub async fn handle<S: ReplySink>(&self, identity: &str, line: &str, sink: &mut S) {
        let Some(command) = parse_line(line) else {
            return;
        };

        match command {
            ConsoleCommand::Login(secret) => {
                let text = self.login(identity, secret);
                sink.reply(text);
            }
            ConsoleCommand::CmdList => {
                if !self.is_authorized(identity) {
                    sink.reply(LOGIN_HINT);
                    return;
                }
                sink.reply(&command_list());
            }
            ConsoleCommand::Rcon(command) => {
                if !self.is_authorized(identity) {
                    log::info!("Refused {:?} from {}: no session", command_name(command), identity);
                    sink.reply(LOGIN_HINT);
                    return;
                }
                self.run_rcon(identity, command, sink).await;
            }
            ConsoleCommand::Unknown(name) => {
                sink.reply(&format!("unknown command '{name}', see /cmdlist"));
            }
        }
    }

    fn login(&self, identity: &str, secret: &str) -> &'static str {
        let Some(expected) = &self.bot_password else {
            return "success!";
        };

        if self.is_authorized(identity) {
            return "success!";
        }

        let purged = self.sessions.purge_expired();
        if purged > 0 {
            log::debug!("Purged {} expired sessions", purged);
        }

        if !self.sessions.authorize(identity.to_string(), secret, expected, self.session_ttl) {
            log::warn!("Failed login attempt from {}", identity);
            return "invalid password!";
        }

        log::info!("{} logged in for {:?} ({} active sessions)", identity, self.session_ttl, self.sessions.len());
        "success!"
    }

    async fn run_rcon<S: ReplySink>(&self, identity: &str, command: &str, sink: &mut S) {
        // arguments may carry a new server password
        log::info!("{} runs {:?}", identity, command_name(command));
        let placeholder = sink.reply(PLACEHOLDER);

        let text = match self.executor.execute(command).await {
            Ok(response) if response.is_empty() => "done!".to_string(),
            Ok(response) => response,
            Err(e) => {
                log::warn!("Command {:?} failed: {}", command_name(command), e);
                e.to_string()
            }
        };

        sink.edit(placeholder, &text);
    }
}

/// RCON commands the console forwards to the server.
/// See <https://sampwiki.blast.hk/wiki/Controlling_Your_Server#RCON_Commands>.
pub const RCON_COMMANDS: &[&str] = &[
    "exit",
    "echo",
    "hostname",
    "gamemodetext",
    "mapname",
    "exec",
    "kick",
    "ban",
    "changemode",
    "gmx",
    "reloadbans",
    "reloadlog",
    "say",
    "players",
    "banip",
    "unbanip",
    "gravity",
    "weather",
    "loadfs",
    "weburl",
    "unloadfs",
    "reloadfs",
    "rcon_password",
    "password",
    "messageslimit",
    "ackslimit",
    "messageholelimit",
    "playertimeout",
    "language",
];

#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleCommand<'a> {
    /// `/login <secret>`; the secret is empty when omitted.
    Login(&'a str),
    CmdList,
    /// A whitelisted command, `/` stripped, arguments kept.
    Rcon(&'a str),
    Unknown(&'a str),
}

/// Parses one line of input. Returns `None` for blank lines.
pub fn parse_line(line: &str) -> Option<ConsoleCommand<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let Some(body) = line.strip_prefix('/') else {
        return Some(ConsoleCommand::Unknown(line));
    };

    let (name, args) = match body.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim_start()),
        None => (body, ""),
    };

    let command = match name {
        "login" => ConsoleCommand::Login(args),
        "cmdlist" => ConsoleCommand::CmdList,
        _ if RCON_COMMANDS.contains(&name) => ConsoleCommand::Rcon(body),
        _ => ConsoleCommand::Unknown(name),
    };

    Some(command)
}

/// The whitelisted command in `input`, with any leading `/` removed.
/// Used for one-shot commands, where the slash is optional.
pub fn whitelisted_command(input: &str) -> Option<&str> {
    let input = input.trim();
    let body = input.strip_prefix('/').unwrap_or(input);
    let name = body.split_whitespace().next()?;
    RCON_COMMANDS.contains(&name).then_some(body)
}

/// Whether a console line may be written to the history file.
/// `/login` lines carry the bot password and are never kept.
pub fn keep_in_history(line: &str) -> bool {
    !matches!(parse_line(line), Some(ConsoleCommand::Login(_)))
}

/// Every console command, one `/name` per line.
pub fn command_list() -> String {
    RCON_COMMANDS
        .iter()
        .map(|name| format!("/{name}\n"))
        .collect()
}

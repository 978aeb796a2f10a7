//! vknet - command-line client for the VK API
//!
//! Main entry point for the `vknet` binary.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use vknet_domain::{Group, Message, User};
use vknet_infra::{config, ApiError, ApiRequest, RawDocument};
use vknet_lib::utils::logging::{init_tracing, log_command_execution};
use vknet_lib::{AppContext, UserFields};

#[derive(Debug, Parser)]
#[command(name = "vknet", version, about = "Command-line client for the VK API")]
struct Cli {
    /// Configuration file (TOML or JSON). Without it, the environment is
    /// tried first, then the standard locations.
    #[arg(long, global = true, env = "VKNET_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the signed-in user
    Whoami,
    /// List friends, alphabetically
    Friends {
        #[arg(long)]
        uid: Option<u32>,
    },
    /// List ids of friends currently online
    Online {
        #[arg(long)]
        uid: Option<u32>,
    },
    /// List communities the user belongs to
    Groups,
    /// Show unread incoming messages
    Unread,
    /// Search audio tracks
    AudioSearch {
        query: String,
        #[arg(long, default_value_t = 10)]
        count: u32,
    },
    /// Call any method and print the raw response
    Call {
        method: String,
        /// Parameters as `key=value`
        #[arg(value_parser = parse_key_value)]
        params: Vec<(String, String)>,
    },
}

impl Command {
    const fn name(&self) -> &'static str {
        match self {
            Self::Whoami => "whoami",
            Self::Friends { .. } => "friends",
            Self::Online { .. } => "online",
            Self::Groups => "groups",
            Self::Unread => "unread",
            Self::AudioSearch { .. } => "audio-search",
            Self::Call { .. } => "call",
        }
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) =
        raw.split_once('=').ok_or_else(|| format!("expected key=value, got {raw:?}"))?;
    if key.is_empty() {
        return Err(format!("empty parameter name in {raw:?}"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging FIRST so we can see .env loading
    if let Err(e) = init_tracing(cli.log_json) {
        eprintln!("failed to initialize logging: {e}");
    }

    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(e) => tracing::debug!(error = %e, "No .env file loaded"),
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match cli.config {
        Some(path) => config::load_from_file(Some(path)),
        None => config::load(),
    }
    .context("failed to load configuration")?;

    let ctx = AppContext::new(config).context("failed to initialize client")?;

    let name = cli.command.name();
    let started = Instant::now();
    let result = execute(&ctx, cli.command);
    log_command_execution(name, started.elapsed(), result.as_ref().err());

    result.with_context(|| format!("{name} failed"))
}

fn execute(ctx: &AppContext, command: Command) -> Result<(), ApiError> {
    let vk = &ctx.vk;

    match command {
        Command::Whoami => {
            let fields = UserFields::NICKNAME | UserFields::SEX | UserFields::BIRTH_DATE;
            let user = vk.user.current(fields)?;
            println!("{} (id {})", user.full_name(), user.id);
            if !user.nickname.is_empty() {
                println!("  nickname: {}", user.nickname);
            }
            println!("  sex: {:?}", user.sex());
            if let Some(date) = user.birth_date() {
                println!("  born: {date}");
            }
        }
        Command::Friends { uid } => {
            let mut friends = vk.user.friends(uid, UserFields::ONLINE_STATUS)?;
            friends.sort_by(User::cmp_by_name);
            for friend in &friends {
                let online = if friend.is_online() { "  (online)" } else { "" };
                println!("{:>12}  {}{online}", friend.id, friend.full_name());
            }
        }
        Command::Online { uid } => {
            for id in vk.user.online_friend_ids(uid)? {
                println!("{id}");
            }
        }
        Command::Groups => {
            let mut groups = vk.user.groups()?;
            groups.sort_by(Group::cmp_by_name);
            for group in &groups {
                let closed = if group.is_closed() { "  (closed)" } else { "" };
                println!("{:>12}  {}{closed}", group.id, group.name);
            }
        }
        Command::Unread => {
            let mut messages = vk.message.unread()?;
            messages.sort_by(Message::cmp_by_id);
            for message in &messages {
                let date = message
                    .date()
                    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                println!("[{date}] from {}: {}", message.user_id, message.body);
            }
        }
        Command::AudioSearch { query, count } => {
            for track in vk.audio.search(&query, count)? {
                println!("{}\n    {}", track.caption_full(), track.url);
            }
        }
        Command::Call { method, params } => {
            let request = params.into_iter().fold(ApiRequest::new(method), |request, (k, v)| {
                request.with_param(k, v)
            });
            let document = ctx.client().call::<RawDocument>(&request)?;
            println!("{}", document.root().to_xml());
        }
    }

    Ok(())
}

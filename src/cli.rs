use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use time::Duration;

use poundforpound::config::{AppConfig, AuthConfig};

const DEFAULT_AUTH_COOKIE_NAME: &str = "p4p_session";

#[allow(clippy::large_enum_variant)]
pub(crate) enum RunOutcome {
    Serve(AppConfig),
    Exit(i32),
}

pub(crate) fn run() -> RunOutcome {
    let cli = Cli::parse();
    if let Some(Command::AuthKey) = cli.command {
        let code = run_auth_key();
        return RunOutcome::Exit(code);
    }

    let auth = match resolve_auth_config(&cli) {
        Ok(Some(auth)) => auth,
        Ok(None) => match ephemeral_auth_config(&cli) {
            Ok(auth) => auth,
            Err(err) => {
                eprintln!("error: {err}");
                return RunOutcome::Exit(1);
            }
        },
        Err(err) => {
            eprintln!("error: {err}");
            return RunOutcome::Exit(2);
        }
    };

    if let Err(err) = std::fs::create_dir_all(&cli.data_dir) {
        eprintln!(
            "error: failed to create data directory {}: {err}",
            cli.data_dir.display()
        );
        return RunOutcome::Exit(2);
    }

    RunOutcome::Serve(AppConfig {
        data_dir: cli.data_dir,
        app_name: cli.app_name,
        addr: cli.addr,
        seed_demo_data: !cli.no_seed,
        auth,
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "poundforpound",
    version,
    about = "Membership, subscription and schedule management for combat-sports gyms"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    #[arg(long, env = "P4P_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,
    #[arg(long, env = "P4P_APP_NAME", default_value = "Pound for Pound")]
    app_name: String,
    #[arg(long, env = "P4P_ADDR", default_value = "127.0.0.1:3000")]
    addr: SocketAddr,
    #[arg(long, env = "P4P_AUTH_KEY")]
    auth_key: Option<String>,
    #[arg(long, env = "P4P_AUTH_TOKEN_TTL")]
    auth_token_ttl: Option<String>,
    #[arg(long, env = "P4P_AUTH_COOKIE_NAME")]
    auth_cookie_name: Option<String>,
    #[arg(long, env = "P4P_AUTH_COOKIE_SECURE")]
    auth_cookie_secure: bool,
    /// Skip writing the demo gym into empty collections.
    #[arg(long, env = "P4P_NO_SEED")]
    no_seed: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a fresh signing key for `--auth-key`.
    AuthKey,
}

fn run_auth_key() -> i32 {
    let secret = match poundforpound::auth::generate_auth_key() {
        Ok(secret) => secret,
        Err(err) => {
            eprintln!("failed to generate auth key: {err}");
            return 1;
        }
    };
    println!("{secret}");
    0
}

/// Sessions signed with this key do not survive a restart.
fn ephemeral_auth_config(cli: &Cli) -> Result<AuthConfig, String> {
    let key = poundforpound::auth::generate_auth_key()
        .map_err(|err| format!("failed to generate auth key: {err}"))?;
    tracing::warn!("no --auth-key configured; using an ephemeral key, sessions end on restart");
    Ok(AuthConfig {
        key,
        token_ttl: default_auth_token_ttl(),
        cookie_name: DEFAULT_AUTH_COOKIE_NAME.to_string(),
        cookie_secure: cli.auth_cookie_secure,
    })
}

fn resolve_auth_config(cli: &Cli) -> Result<Option<AuthConfig>, String> {
    let has_any = cli.auth_key.is_some()
        || cli.auth_token_ttl.is_some()
        || cli.auth_cookie_name.is_some();

    if !has_any {
        return Ok(None);
    }

    let auth_key = cli
        .auth_key
        .as_ref()
        .ok_or("auth is configured but --auth-key is missing")?
        .trim();
    if auth_key.is_empty() {
        return Err("auth key cannot be empty".to_string());
    }

    if let Some(name) = cli.auth_cookie_name.as_deref()
        && name.trim().is_empty()
    {
        return Err("auth cookie name cannot be empty".to_string());
    }

    let token_ttl = match cli.auth_token_ttl.as_deref() {
        Some(raw) => parse_auth_token_ttl(raw)?,
        None => default_auth_token_ttl(),
    };
    let cookie_name = cli
        .auth_cookie_name
        .as_deref()
        .map(|name| name.trim().to_string())
        .unwrap_or_else(|| DEFAULT_AUTH_COOKIE_NAME.to_string());

    Ok(Some(AuthConfig {
        key: auth_key.to_string(),
        token_ttl,
        cookie_name,
        cookie_secure: cli.auth_cookie_secure,
    }))
}

fn default_auth_token_ttl() -> Duration {
    Duration::days(7)
}

fn parse_auth_token_ttl(raw: &str) -> Result<Duration, String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err("auth token ttl cannot be empty".to_string());
    }

    let (amount, unit) = match value.chars().last() {
        Some(ch) if ch.is_ascii_alphabetic() => {
            (&value[..value.len() - 1], ch.to_ascii_lowercase())
        }
        _ => (value, 's'),
    };

    let amount: i64 = amount
        .parse()
        .map_err(|_| format!("invalid auth token ttl '{value}'; expected <number>[s|m|h|d]"))?;

    if amount <= 0 {
        return Err("auth token ttl must be greater than 0".to_string());
    }

    match unit {
        's' => Ok(Duration::seconds(amount)),
        'm' => Ok(Duration::minutes(amount)),
        'h' => Ok(Duration::hours(amount)),
        'd' => Ok(Duration::days(amount)),
        _ => Err(format!(
            "invalid auth token ttl '{value}'; expected <number>[s|m|h|d]"
        )),
    }
}

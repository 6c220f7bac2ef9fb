use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotcfg_core::Config;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod profile;

const DEFAULT_CONFIG_FILE: &str = ".dotcfg.json";

#[derive(Parser, Debug)]
#[command(
    name = "dotcfg",
    about = "Get, set and list client config properties by dotted path",
    version
)]
struct Cli {
    /// Config file to use (defaults to ~/.dotcfg.json)
    #[arg(long, short, global = true, env = "DOTCFG_FILE")]
    file: Option<PathBuf>,
    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the value at a dotted path, e.g. Registries.1.Email
    Get { key: String },
    /// Set the value at a dotted path and save; an empty value deletes a map
    /// entry or sequence element
    Set {
        key: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Print every non-empty property as `path value`
    List,
    /// Print every property path
    Keys,
    /// Print the whole config as JSON
    Dump,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(2);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Explicit `--file`/`DOTCFG_FILE` > `~/.dotcfg.json` > `./.dotcfg.json`.
fn resolve_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(p) = explicit {
        return p;
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_CONFIG_FILE)
}

fn run(cli: Cli) -> Result<()> {
    let path = resolve_path(cli.file);
    debug!(path = %path.display(), "using config file");
    let mut cfg = Config::new(profile::client_profile());
    cfg.set_file(&path)
        .with_context(|| format!("loading {}", path.display()))?;

    match cli.cmd {
        Cmd::Get { key } => cmd_get(&cfg, &key),
        Cmd::Set { key, value } => cmd_set(&mut cfg, &key, &value),
        Cmd::List => {
            for (k, v) in cfg.list() {
                println!("{} {}", k, v);
            }
            Ok(())
        }
        Cmd::Keys => {
            for k in cfg.keys() {
                println!("{}", k);
            }
            Ok(())
        }
        Cmd::Dump => {
            println!("{}", cfg.dump()?);
            Ok(())
        }
    }
}

fn cmd_get(cfg: &Config, key: &str) -> Result<()> {
    let value = cfg.get(key)?;
    println!("{}", value);
    Ok(())
}

fn cmd_set(cfg: &mut Config, key: &str, value: &str) -> Result<()> {
    cfg.set(key, value)?;
    cfg.save().context("saving config")?;
    Ok(())
}

//! tsl-cli/src/lib.rs — CLI lib pour le runtime tsl
//!
//! Sous-commandes :
//!   - demo       : construit un `Str` puis l’écrit (`7-items`)
//!   - echo       : relit les tokens de stdin dans une région brute et les réécrit
//!   - signatures : affiche la table des primitives (texte ou JSON)
//!
//! Config : `tsl.toml` (ou `--config`), puis ENV `TSL_*`, puis flags CLI.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info, warn};

use tsl_runtime::config::CliOverrides;
use tsl_runtime::signatures::{self, PreludeType};
use tsl_runtime::{new_buffer, Console, RuntimeConfig, Str};

/// Fichier de config lu par défaut dans le dossier courant.
pub const DEFAULT_CONFIG: &str = "tsl.toml";

/// Point d’entrée du binaire (à appeler depuis src/main.rs)
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!("{}", tsl_runtime::version());

    let cfg = load_config(cli.config.as_deref(), &cli.overrides())?;
    match cli.cmd {
        Cmd::Demo => cmd_demo(&cfg),
        Cmd::Echo => cmd_echo(&cfg),
        Cmd::Signatures { json } => cmd_signatures(json),
    }
}

#[derive(Parser, Debug)]
#[command(name = "tslrt", version, about = "Outils du prélude runtime tsl")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
    /// Fichier de configuration TOML (défaut: ./tsl.toml s’il existe)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Capacité des régions de lecture (terminateur compris)
    #[arg(long, global = true)]
    token_capacity: Option<usize>,
    /// Désactive le flush après chaque écriture
    #[arg(long, global = true)]
    buffered: bool,
    /// Verbosité des logs (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            flush_each_write: self.buffered.then_some(false),
            token_capacity: self.token_capacity,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Scénario bout-en-bout : appendInt(7), appendStr("-items"), log
    Demo,
    /// Lit les tokens de stdin et les réécrit, un par ligne
    Echo,
    /// Affiche les signatures des primitives du prélude
    Signatures {
        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

/// Defaults → fichier TOML → ENV → overrides CLI, puis validation.
pub fn load_config(path: Option<&Path>, overrides: &CliOverrides) -> Result<RuntimeConfig> {
    let mut cfg = match path {
        Some(p) => read_config(p)?,
        None if Path::new(DEFAULT_CONFIG).exists() => read_config(Path::new(DEFAULT_CONFIG))?,
        None => RuntimeConfig::default(),
    };
    cfg.apply_env();
    cfg.apply_cli_overrides(overrides);
    cfg.validate().context("configuration invalide")?;
    Ok(cfg)
}

fn read_config(path: &Path) -> Result<RuntimeConfig> {
    let s = fs::read_to_string(path).with_context(|| format!("lecture {}", path.display()))?;
    let cfg: RuntimeConfig = toml::from_str(&s).with_context(|| format!("TOML invalide: {}", path.display()))?;
    info!("config chargée depuis {}", path.display());
    Ok(cfg)
}

fn cmd_demo(cfg: &RuntimeConfig) -> Result<()> {
    let mut s = Str::new();
    s.append_int(7);
    s.append_str("-items");
    debug!("demo: {s:?}");

    let mut console = Console::stdout(&cfg.console);
    console.write_text(s.as_bytes_with_nul()).context("écriture stdout")?;
    s.free();
    Ok(())
}

fn cmd_echo(cfg: &RuntimeConfig) -> Result<()> {
    let mut console = Console::stdio(&cfg.console);
    let mut buf = new_buffer(cfg.console.token_capacity)?;
    let mut count = 0usize;

    while let Some(tok) = console.read_token(&mut buf).context("lecture stdin")? {
        if tok.truncated {
            warn!("token tronqué à {} octets", tok.len);
        }
        console.write_text(buf.text())?;
        console.write_char(b'\n')?;
        count += 1;
    }
    info!("echo: {count} token(s)");
    Ok(())
}

fn cmd_signatures(json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(signatures::SIGNATURES)?;
        println!("{out}");
        return Ok(());
    }
    for s in signatures::SIGNATURES {
        println!("{:<36} {}", s.to_string(), s.rust_path);
    }
    println!();
    for t in [PreludeType::Int, PreludeType::Float, PreludeType::Char, PreludeType::Bool, PreludeType::String] {
        if let (Some(name), Some(v)) = (t.zero_name(), t.zero_value()) {
            println!("{name:<10} = {v}");
        }
    }
    Ok(())
}

/* --------------------------------- Tests --------------------------------- */
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_subcommands() {
        let cli = Cli::try_parse_from(["tslrt", "signatures", "--json"]).unwrap();
        assert!(matches!(cli.cmd, Cmd::Signatures { json: true }));

        let cli = Cli::try_parse_from(["tslrt", "-vv", "echo", "--token-capacity", "16", "--buffered"]).unwrap();
        assert!(matches!(cli.cmd, Cmd::Echo));
        assert_eq!(cli.verbose, 2);
        let o = cli.overrides();
        assert_eq!(o.token_capacity, Some(16));
        assert_eq!(o.flush_each_write, Some(false));
    }

    #[test]
    fn config_file_then_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tsl.toml");
        fs::write(&path, "[console]\ntoken_capacity = 32\nflush_each_write = false\n").unwrap();

        let cfg = load_config(Some(&path), &CliOverrides::default()).unwrap();
        assert_eq!(cfg.console.token_capacity, 32);
        assert!(!cfg.console.flush_each_write);

        let o = CliOverrides { token_capacity: Some(8), ..Default::default() };
        let cfg = load_config(Some(&path), &o).unwrap();
        assert_eq!(cfg.console.token_capacity, 8);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        fs::write(&path, "[console]\nflush_each_write = false\n").unwrap();

        let cfg = load_config(Some(&path), &CliOverrides::default()).unwrap();
        assert_eq!(cfg.console.token_capacity, 256);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[console]\ntoken_capacity = 0\n").unwrap();
        assert!(load_config(Some(&path), &CliOverrides::default()).is_err());

        fs::write(&path, "console = 3").unwrap();
        assert!(load_config(Some(&path), &CliOverrides::default()).is_err());
    }

    #[test]
    fn missing_config_file_errors_with_path() {
        let err = load_config(Some(Path::new("/nonexistent/tsl.toml")), &CliOverrides::default()).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/tsl.toml"));
    }
}

//! config.rs — Configuration du runtime tsl.
//!
//! - Defaults sûrs (`RuntimeConfig::default()`)
//! - Lecture **ENV** (préfixe `TSL_...`) via `RuntimeConfig::from_env()`
//! - **Overrides CLI** via `CliOverrides` (appliqués avec `apply_cli_overrides`)
//! - `validate()` avant usage
//!
//! ENV supportés (tous facultatifs) :
//!   TSL_FLUSH=0|1
//!   TSL_TOKEN_CAPACITY=<usize>
//!
//! NB: pas de parsing TOML ici. Les outils (de)sérialisent via la feature `serde`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Result, RuntimeError};

/* ─────────────────────────── Types publics ─────────────────────────── */

/// Réglages console.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConsoleConfig {
    /// `flush` après chaque écriture (console non bufferisée).
    pub flush_each_write: bool,
    /// Capacité (terminateur compris) des régions allouées pour `input` par les outils.
    pub token_capacity: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { flush_each_write: true, token_capacity: 256 }
    }
}

/// Configuration runtime complète.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RuntimeConfig {
    /// Écritures et lectures console.
    pub console: ConsoleConfig,
}

/* ─────────────────────── Overrides (CLI / couches) ─────────────────────── */

/// Overrides fournis par une CLI en amont ; toutes les valeurs sont optionnelles.
#[derive(Default, Clone, Debug)]
pub struct CliOverrides {
    pub flush_each_write: Option<bool>,
    pub token_capacity: Option<usize>,
}

impl RuntimeConfig {
    /// Construit depuis les valeurs par défaut + ENV.
    pub fn from_env() -> Self {
        let mut c = Self::default();
        c.apply_env();
        c
    }

    /// Applique les variables d’environnement `TSL_*`.
    pub fn apply_env(&mut self) {
        if let Some(v) = read_env("TSL_FLUSH")          { if let Some(b) = parse_bool(&v)  { self.console.flush_each_write = b; } }
        if let Some(v) = read_env("TSL_TOKEN_CAPACITY") { if let Some(n) = parse_usize(&v) { self.console.token_capacity = n; } }
    }

    /// Applique des overrides “dernier mot” issus de la CLI.
    pub fn apply_cli_overrides(&mut self, o: &CliOverrides) {
        if let Some(x) = o.flush_each_write { self.console.flush_each_write = x; }
        if let Some(x) = o.token_capacity   { self.console.token_capacity = x; }
    }

    pub fn validate(&self) -> Result<()> {
        if self.console.token_capacity == 0 {
            return Err(RuntimeError::Config("token_capacity doit être > 0"));
        }
        Ok(())
    }
}

/* ────────────────────────── Parsing d’ENV ────────────────────────── */

fn read_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no"  | "n" | "off"=> Some(false),
        _ => None,
    }
}

fn parse_usize(s: &str) -> Option<usize> {
    s.trim().parse::<usize>().ok()
}

/* ───────────────────────────── Tests ───────────────────────────── */

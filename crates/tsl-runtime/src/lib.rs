//! tsl-runtime — Prélude runtime des programmes générés par `tsl`
//!
//! Tout programme produit par le transpileur appelle ces primitives pour
//! construire des chaînes, écrire sur la console et lire l’entrée standard.
//!
//! ## Modules
//! - `buffer`     : `Str`, chaîne extensible terminée par un octet nul (croissance ×2).
//! - `raw`        : `new_buffer`, région d’octets de taille fixe possédée par l’appelant.
//! - `console`    : `log`, `log_int`, `log_char`, `input` (écritures non bufferisées).
//! - `format`     : formatage décimal des entiers dans un scratch borné.
//! - `builtins`   : conversions et helpers (`as_char`, `max`, `PI`…) qui remplacent les alias.
//! - `signatures` : table typée des primitives exposées au code généré.
//! - `config`     : configuration runtime (defaults → ENV → overrides CLI).
//!
//! ## Features
//! - **serde** : (dé)sérialisation de la config et de la table de signatures.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms, unused_must_use)]

use thiserror::Error;

// ---------- Modules publics ----------
pub mod buffer;
pub mod builtins;
pub mod config;
pub mod console;
pub mod format;
pub mod raw;
pub mod signatures;

// ---------- Reexports de confort ----------
pub use buffer::Str;
pub use config::RuntimeConfig;
pub use console::{input, log, log_char, log_int, Console, TokenRead};
pub use raw::{new_buffer, RawBuffer};

// ---------- Version ----------
/// Version du crate (lisible, via Cargo).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Renvoie une bannière de version (utile pour logs/outils).
pub fn version() -> String {
    format!("tsl-runtime {VERSION}")
}

// ---------- Erreurs & Résultat ----------
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// I/O console (stdout/stdin)
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// `new_buffer(0)` : une région brute doit faire au moins un octet
    #[error("région brute de taille nulle")]
    ZeroSizedRegion,

    /// Buffer de lecture sans place pour le terminateur
    #[error("buffer de lecture de capacité nulle")]
    ZeroCapacity,

    /// Configuration incohérente
    #[error("config: {0}")]
    Config(&'static str),
}

pub type Result<T, E = RuntimeError> = core::result::Result<T, E>;

// ---------- Prelude ----------
/// Tout ce dont un programme généré a besoin, en un `use`.
pub mod prelude {
    pub use crate::builtins::*;
    pub use crate::{
        input, log, log_char, log_int, new_buffer, Console, RawBuffer, Result, RuntimeError,
        Str, TokenRead,
    };
}

// ---------- Tests ----------
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_banner() {
        assert!(version().starts_with("tsl-runtime "));
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn errors_display() {
        assert_eq!(RuntimeError::ZeroSizedRegion.to_string(), "région brute de taille nulle");
        let e = RuntimeError::Config("token_capacity doit être > 0");
        assert!(e.to_string().starts_with("config: "));
    }
}

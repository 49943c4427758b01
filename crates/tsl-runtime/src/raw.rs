//! raw.rs — Régions d’octets de taille fixe (`new_buffer`).
//!
//! Échappatoire pour le code généré qui gère lui-même sa capacité (typiquement
//! le buffer passé à `input`). L’allocateur ne tient aucun registre : la
//! région appartient à l’appelant et se libère quand il la lâche.

use core::fmt;
use core::ops::{Deref, DerefMut};
use std::ffi::CStr;

use log::debug;

use crate::{Result, RuntimeError};

/// Région brute possédée par l’appelant ; sa taille ne change jamais.
pub struct RawBuffer {
    bytes: Box<[u8]>,
}

impl RawBuffer {
    /// Taille de la région, en octets.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Vue C : octets jusqu’au premier nul (ou toute la région s’il n’y en a pas).
    pub fn text(&self) -> &[u8] {
        let end = self.bytes.iter().position(|&b| b == 0).unwrap_or(self.bytes.len());
        &self.bytes[..end]
    }

    /// `Some` seulement si la région contient un terminateur.
    pub fn as_c_str(&self) -> Option<&CStr> {
        CStr::from_bytes_until_nul(&self.bytes).ok()
    }
}

impl Deref for RawBuffer {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl DerefMut for RawBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl AsRef<[u8]> for RawBuffer {
    fn as_ref(&self) -> &[u8] {
        self.text()
    }
}

impl fmt::Debug for RawBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBuffer")
            .field("size", &self.size())
            .field("text", &String::from_utf8_lossy(self.text()))
            .finish()
    }
}

/// `new_buffer(size)` : région de exactement `size` octets.
///
/// Le contenu n’est pas spécifié pour l’appelant (ici : mis à zéro).
/// `size == 0` → `RuntimeError::ZeroSizedRegion`. Un échec d’allocation est fatal.
pub fn new_buffer(size: usize) -> Result<RawBuffer> {
    if size == 0 {
        return Err(RuntimeError::ZeroSizedRegion);
    }
    debug!(target: "tsl_runtime::raw", "new_buffer({size})");
    Ok(RawBuffer { bytes: vec![0u8; size].into_boxed_slice() })
}

/* ───────────────────────────── Tests ───────────────────────────── */

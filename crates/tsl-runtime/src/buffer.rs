//! buffer.rs — `Str`, la chaîne extensible des programmes générés.
//!
//! Représentation : une région `data` possédée en exclusivité, dont la taille
//! est la capacité, et une longueur logique `len`.
//!
//! Invariants (vrais après chaque opération) :
//!   1. `capacity() >= len() + 1` (place réservée pour le terminateur) ;
//!   2. `data[len] == 0` : `data[..=len]` est toujours une chaîne C valide ;
//!   3. la capacité démarre à 1, double quand elle est épuisée, ne rétrécit jamais.
//!
//! La croissance alloue une région neuve de capacité ×2, recopie, puis
//! remplace l’ancienne (libérée par ownership). Un échec d’allocation est
//! fatal (`handle_alloc_error` → abort), jamais un `Result`.
//!
//! `free` consomme la valeur : toute utilisation après libération est refusée
//! à la compilation.

use core::fmt;
use std::borrow::Cow;
use std::ffi::CStr;

use log::{debug, trace};

use crate::format::{format_int, Int};

/// Octet sentinelle de fin de texte.
pub const TERMINATOR: u8 = 0;

/// Capacité d’un buffer neuf (le seul terminateur).
pub const INITIAL_CAPACITY: usize = 1;

/// Chaîne extensible terminée par un nul.
pub struct Str {
    data: Box<[u8]>,
    len: usize,
    reallocations: usize,
}

impl Str {
    /// Buffer vide : `len = 0`, `capacity = 1`, `data = [0]`.
    pub fn new() -> Self {
        Self {
            data: vec![TERMINATOR; INITIAL_CAPACITY].into_boxed_slice(),
            len: 0,
            reallocations: 0,
        }
    }

    /// Ajoute un octet. Double la capacité *avant* l’écriture si l’octet et
    /// le terminateur ne tiennent plus.
    pub fn append(&mut self, c: u8) {
        if self.len + 1 == self.capacity() {
            self.grow();
        }
        self.data[self.len] = c;
        self.len += 1;
        self.data[self.len] = TERMINATOR;
    }

    /// Ajoute le texte octet par octet, jusqu’au premier nul ou la fin de la slice.
    ///
    /// Équivaut à autant d’appels à [`Str::append`] que d’octets lus.
    pub fn append_str(&mut self, text: impl AsRef<[u8]>) {
        for &b in text.as_ref().iter().take_while(|&&b| b != TERMINATOR) {
            self.append(b);
        }
    }

    /// Ajoute la représentation décimale de `n` (voir `format`).
    pub fn append_int(&mut self, n: Int) {
        let digits = format_int(n);
        self.append_str(digits.as_bytes_with_nul());
    }

    /// Libère le buffer et sa région. Consomme `self`.
    pub fn free(self) {
        debug!(target: "tsl_runtime::buffer", "free len={} cap={}", self.len, self.capacity());
        drop(self);
    }

    // ---------- Vues en lecture ----------

    /// Nombre d’octets logiques.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Vrai tant qu’aucun octet n’a été ajouté.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Taille de la région allouée, terminateur compris.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Nombre de réallocations effectuées depuis la création.
    pub fn reallocations(&self) -> usize {
        self.reallocations
    }

    /// Contenu, sans le terminateur.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Contenu suivi du terminateur.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.data[..=self.len]
    }

    /// Vue C : s’arrête au premier nul (un `append(0)` explicite coupe la vue).
    pub fn as_c_str(&self) -> &CStr {
        CStr::from_bytes_until_nul(self.as_bytes_with_nul()).unwrap_or_default()
    }

    /// Contenu en UTF-8 (remplacement des séquences invalides).
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    // ---------- Croissance ----------

    fn grow(&mut self) {
        let old = self.capacity();
        let new_cap = old.checked_mul(2).unwrap_or_else(|| capacity_overflow());

        let mut grown = vec![TERMINATOR; new_cap].into_boxed_slice();
        grown[..=self.len].copy_from_slice(&self.data[..=self.len]);
        self.data = grown;
        self.reallocations += 1;

        trace!(target: "tsl_runtime::buffer", "croissance {old} -> {new_cap} (len={})", self.len);
    }
}

#[cold]
fn capacity_overflow() -> ! {
    panic!("Str: dépassement de capacité");
}

impl Default for Str {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Str {
    fn from(text: &str) -> Self {
        let mut s = Self::new();
        s.append_str(text);
        s
    }
}

impl fmt::Debug for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Str")
            .field("text", &self.to_string_lossy())
            .field("len", &self.len)
            .field("cap", &self.capacity())
            .finish()
    }
}

impl fmt::Display for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

/// Permet `write!(s, ...)` ; même règle que `append_str` (arrêt au premier nul).
impl fmt::Write for Str {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append_str(s);
        Ok(())
    }
}

// ---------- Surface appelée par le code généré ----------

/// `newStr()`
pub fn new_str() -> Str {
    Str::new()
}

/// `append(s, c)`
pub fn append(s: &mut Str, c: u8) {
    s.append(c);
}

/// `appendStr(s, text)`
pub fn append_str(s: &mut Str, text: impl AsRef<[u8]>) {
    s.append_str(text);
}

/// `appendInt(s, n)`
pub fn append_int(s: &mut Str, n: Int) {
    s.append_int(n);
}

/// `freeStr(s)`
pub fn free_str(s: Str) {
    s.free();
}

/* ───────────────────────────── Tests ───────────────────────────── */

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write as _;

    fn assert_invariants(s: &Str) {
        assert!(s.capacity() >= s.len() + 1, "cap={} len={}", s.capacity(), s.len());
        assert_eq!(s.as_bytes_with_nul()[s.len()], TERMINATOR);
    }

    #[test]
    fn new_is_empty_and_terminated() {
        let s = Str::new();
        assert_eq!(s.len(), 0);
        assert_eq!(s.capacity(), INITIAL_CAPACITY);
        assert_eq!(s.as_bytes_with_nul(), b"\0");
        assert_eq!(s.reallocations(), 0);
        assert_invariants(&s);
    }

    #[test]
    fn chars_one_at_a_time() {
        let mut s = Str::new();
        for &c in b"abc" {
            s.append(c);
            assert_invariants(&s);
        }
        assert_eq!(s.as_bytes(), b"abc");
        assert_eq!(s.len(), 3);
        assert_eq!(s.as_c_str().to_bytes(), b"abc");
    }

    #[test]
    fn text_appends_compose() {
        let mut s = Str::new();
        s.append_str("foo");
        s.append_str("bar");
        assert_eq!(s.to_string(), "foobar");
        assert_eq!(s.len(), 6);
        assert_invariants(&s);
    }

    #[test]
    fn text_stops_at_terminator() {
        let mut s = Str::new();
        s.append_str(b"ab\0cd");
        assert_eq!(s.as_bytes(), b"ab");
    }

    #[test]
    fn integers() {
        let mut s = Str::new();
        s.append_int(0);
        assert_eq!(s.as_bytes(), b"0");

        let mut s = Str::new();
        s.append_int(-42);
        assert_eq!(s.as_bytes(), b"-42");

        let mut s = Str::new();
        s.append_int(2_147_483_647);
        assert_eq!(s.as_bytes(), b"2147483647");
    }

    #[test]
    fn capacity_doubles_and_never_shrinks() {
        let mut s = Str::new();
        let mut last = s.capacity();
        for i in 0..100u8 {
            s.append(b'a' + i % 26);
            let cap = s.capacity();
            assert!(cap == last || cap == last * 2);
            assert!(cap.is_power_of_two());
            last = cap;
        }
        assert_eq!(s.capacity(), 128);
        assert_eq!(s.reallocations(), 7);
    }

    #[test]
    fn explicit_nul_cuts_c_view_only() {
        let mut s = Str::from("ab");
        s.append(0);
        s.append(b'c');
        assert_eq!(s.len(), 4);
        assert_eq!(s.as_c_str().to_bytes(), b"ab");
        assert_invariants(&s);
    }

    #[test]
    fn fmt_write_goes_through_append() {
        let mut s = Str::new();
        write!(s, "{}-{}", 7, "items").unwrap();
        assert_eq!(s.to_string(), "7-items");
    }

    #[test]
    fn generated_code_surface() {
        let mut s = new_str();
        append(&mut s, b'x');
        append_str(&mut s, "=");
        append_int(&mut s, -3);
        assert_eq!(format!("{s}"), "x=-3");
        free_str(s);
    }
}

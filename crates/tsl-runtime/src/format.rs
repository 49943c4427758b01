//! format.rs — Formatage décimal des entiers du langage.
//!
//! Le `int` des programmes générés est un entier signé 32 bits. Le scratch est
//! dimensionné depuis les constantes du type (`Int::MAX`) : changer `Int`
//! pour un type plus large élargit le scratch automatiquement.
//!
//! Règle : base 10, `-` en tête pour les négatifs, pas de zéros de tête sauf
//! pour la valeur `0` elle-même.

use core::fmt;

/// Entier signé du langage cible.
pub type Int = i32;

/// Nombre maximal de chiffres décimaux d’un `Int` (|MIN| a autant de chiffres que MAX).
pub const INT_MAX_DIGITS: usize = (Int::MAX.ilog10() + 1) as usize;

/// Taille du scratch : signe + chiffres + terminateur.
pub const INT_SCRATCH_LEN: usize = 1 + INT_MAX_DIGITS + 1;

const _: () = assert!(INT_SCRATCH_LEN == 12);

/// Résultat de `format_int` : les chiffres vivent en fin de scratch, suivis d’un nul.
#[derive(Clone, Copy)]
pub struct IntScratch {
    buf: [u8; INT_SCRATCH_LEN],
    start: usize,
}

impl IntScratch {
    /// Chiffres (et signe), sans le terminateur.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[self.start..INT_SCRATCH_LEN - 1]
    }

    /// Chiffres suivis du terminateur nul.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf[self.start..]
    }

    pub fn as_str(&self) -> &str {
        // que de l’ASCII
        core::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        INT_SCRATCH_LEN - 1 - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for IntScratch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for IntScratch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IntScratch({:?})", self.as_str())
    }
}

/// Formate `n` en décimal dans un scratch de `INT_SCRATCH_LEN` octets.
///
/// Écrit de droite à gauche : terminateur, chiffres, puis signe.
pub fn format_int(n: Int) -> IntScratch {
    let mut buf = [0u8; INT_SCRATCH_LEN];
    let mut pos = INT_SCRATCH_LEN - 1;
    buf[pos] = 0;

    // unsigned_abs: MIN n’a pas d’opposé signé
    let mut v = n.unsigned_abs();
    loop {
        pos -= 1;
        buf[pos] = b'0' + (v % 10) as u8;
        v /= 10;
        if v == 0 {
            break;
        }
    }
    if n < 0 {
        pos -= 1;
        buf[pos] = b'-';
    }

    IntScratch { buf, start: pos }
}

/* ───────────────────────────── Tests ───────────────────────────── */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_has_single_digit() {
        let s = format_int(0);
        assert_eq!(s.as_str(), "0");
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn negative_gets_sign() {
        assert_eq!(format_int(-42).as_str(), "-42");
        assert_eq!(format_int(-1).as_str(), "-1");
    }

    #[test]
    fn extremes_fit_in_scratch() {
        assert_eq!(format_int(Int::MAX).as_str(), "2147483647");
        let min = format_int(Int::MIN);
        assert_eq!(min.as_str(), "-2147483648");
        assert_eq!(min.as_bytes_with_nul().len(), INT_SCRATCH_LEN);
    }

    #[test]
    fn terminator_follows_digits() {
        let s = format_int(1200);
        assert_eq!(s.as_bytes_with_nul(), b"1200\0");
        assert_eq!(s.to_string(), "1200");
    }

    #[test]
    fn matches_std_formatting() {
        for n in [7, 10, 99, 100, -100, 65_536, -2_000_000_000] {
            assert_eq!(format_int(n).as_str(), n.to_string());
        }
    }
}

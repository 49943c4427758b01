//! builtins.rs — Petites fonctions et constantes du prélude.
//!
//! Remplacent les alias textuels de l’ancien prélude (`MAX`, `len`, `True`…)
//! par des fonctions et constantes ordinaires. Les caractères du langage sont
//! des octets (`u8`).

use core::ops::Neg;

use crate::format::Int;

pub const PI: f64 = core::f64::consts::PI;
pub const E: f64 = core::f64::consts::E;

/// `asChar(n)` : conversion tronquante, comme un cast C `int → char`.
pub fn as_char(n: Int) -> u8 {
    n as u8
}

/// `asInt(c)`
pub fn as_int(c: u8) -> Int {
    Int::from(c)
}

/// `boolToInt(b)`
pub fn bool_to_int(b: bool) -> Int {
    Int::from(b)
}

/// `len(s)` : longueur jusqu’au premier nul.
pub fn len(text: impl AsRef<[u8]>) -> usize {
    let bytes = text.as_ref();
    bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len())
}

/// `MAX(a, b)` : `a > b ? a : b` (à égalité, renvoie `b`).
pub fn max<T: PartialOrd>(a: T, b: T) -> T {
    if a > b { a } else { b }
}

/// `MIN(a, b)` : `a < b ? a : b`.
pub fn min<T: PartialOrd>(a: T, b: T) -> T {
    if a < b { a } else { b }
}

/// `ABS(a)` : `a < 0 ? -a : a`. Comme la macro, `abs(Int::MIN)` déborde.
pub fn abs<T: PartialOrd + Default + Neg<Output = T>>(a: T) -> T {
    if a < T::default() { -a } else { a }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(as_char(65), b'A');
        assert_eq!(as_char(256 + 66), b'B');
        assert_eq!(as_int(b'0'), 48);
        assert_eq!(bool_to_int(true), 1);
        assert_eq!(bool_to_int(false), 0);
    }

    #[test]
    fn ordering_helpers() {
        assert_eq!(max(3, 9), 9);
        assert_eq!(min(3, 9), 3);
        assert_eq!(max(2.5, -1.0), 2.5);
        assert_eq!(abs(-4), 4);
        assert_eq!(abs(0.5), 0.5);
    }

    #[test]
    fn len_stops_at_nul() {
        assert_eq!(len("hello"), 5);
        assert_eq!(len(b"hi\0there"), 2);
        assert_eq!(len(""), 0);
    }

    #[test]
    fn constants() {
        assert!((PI - 3.141_592_653_589_793).abs() < 1e-15);
        assert!((E - 2.718_281_828_459_045).abs() < 1e-15);
    }
}

//! signatures.rs — Table typée des primitives exposées au code généré.
//!
//! Le vérificateur de types du transpileur charge cette table avant de typer
//! un programme : nom vu par le langage, types des paramètres, type de
//! retour, et fonction Rust qui l’implémente.
//!
//! Chaque type a aussi une valeur zéro nommée (`int_t`, `string_t`…) que le
//! code généré utilise pour initialiser ses variables.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::format::Int;

/// Types du langage visibles dans les signatures du prélude.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PreludeType {
    Int,
    Float,
    Char,
    Bool,
    String,
    Void,
    /// `Str` possédé (créé par `newStr`, consommé par `freeStr`)
    Buffer,
    /// `Str*` emprunté en écriture
    BufferRef,
}

impl PreludeType {
    pub fn name(self) -> &'static str {
        match self {
            PreludeType::Int => "int",
            PreludeType::Float => "float",
            PreludeType::Char => "char",
            PreludeType::Bool => "bool",
            PreludeType::String => "string",
            PreludeType::Void => "void",
            PreludeType::Buffer => "Str",
            PreludeType::BufferRef => "Str*",
        }
    }

    /// Nom de la constante zéro (`int_t`…), si le type en a une.
    pub fn zero_name(self) -> Option<&'static str> {
        match self {
            PreludeType::Int => Some("int_t"),
            PreludeType::Float => Some("float_t"),
            PreludeType::Char => Some("char_t"),
            PreludeType::Bool => Some("bool_t"),
            PreludeType::String => Some("string_t"),
            PreludeType::Void | PreludeType::Buffer | PreludeType::BufferRef => None,
        }
    }

    pub fn zero_value(self) -> Option<Value> {
        Some(match self {
            PreludeType::Int => Value::Int(0),
            PreludeType::Float => Value::Float(0.0),
            PreludeType::Char => Value::Char(0),
            PreludeType::Bool => Value::Bool(false),
            PreludeType::String => Value::String(String::new()),
            PreludeType::Void | PreludeType::Buffer | PreludeType::BufferRef => return None,
        })
    }
}

impl fmt::Display for PreludeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Valeur scalaire du langage ; `Display` rend le littéral source.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// `int_t`
    Int(Int),
    /// `float_t`
    Float(f64),
    /// `char_t`, un octet
    Char(u8),
    /// `bool_t`
    Bool(bool),
    /// `string_t`
    String(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Char(0) => f.write_str("'\\0'"),
            Value::Char(c) => write!(f, "'{}'", c.escape_ascii()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::String(s) => write!(f, "{s:?}"),
        }
    }
}

/// Valeur zéro d’après son nom (`int_t` → `0`).
pub fn zero_value(name: &str) -> Option<Value> {
    ALL_TYPES
        .iter()
        .find(|t| t.zero_name() == Some(name))
        .and_then(|t| t.zero_value())
}

const ALL_TYPES: [PreludeType; 8] = [
    PreludeType::Int,
    PreludeType::Float,
    PreludeType::Char,
    PreludeType::Bool,
    PreludeType::String,
    PreludeType::Void,
    PreludeType::Buffer,
    PreludeType::BufferRef,
];

/// Signature d’une primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Signature {
    /// Nom appelé par le code généré.
    pub name: &'static str,
    /// Types des paramètres, côté langage.
    pub params: &'static [PreludeType],
    /// Type de retour, côté langage.
    pub ret: PreludeType,
    /// Chemin de l’implémentation dans ce crate.
    pub rust_path: &'static str,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{p}")?;
        }
        write!(f, ") -> {}", self.ret)
    }
}

use PreludeType as T;

/// Toutes les primitives du prélude, dans l’ordre de déclaration.
///
/// Les types décrivent la vue du langage, pas la signature Rust exacte :
/// - `input` ignore le statut de lecture (`Option<TokenRead>`) renvoyé en Rust ;
/// - `new_buffer(int) -> string` : l’appel Rust prend un `usize` (l’`Int` du
///   langage est converti par le code généré, une taille négative est refusée
///   à la conversion) et renvoie `Result<RawBuffer>`, `Err(ZeroSizedRegion)`
///   pour une taille nulle.
pub static SIGNATURES: &[Signature] = &[
    Signature { name: "newStr",     params: &[],                    ret: T::Buffer, rust_path: "tsl_runtime::buffer::new_str" },
    Signature { name: "append",     params: &[T::BufferRef, T::Char],   ret: T::Void,   rust_path: "tsl_runtime::buffer::append" },
    Signature { name: "appendStr",  params: &[T::BufferRef, T::String], ret: T::Void,   rust_path: "tsl_runtime::buffer::append_str" },
    Signature { name: "appendInt",  params: &[T::BufferRef, T::Int],    ret: T::Void,   rust_path: "tsl_runtime::buffer::append_int" },
    Signature { name: "freeStr",    params: &[T::Buffer],           ret: T::Void,   rust_path: "tsl_runtime::buffer::free_str" },
    Signature { name: "new_buffer", params: &[T::Int],              ret: T::String, rust_path: "tsl_runtime::raw::new_buffer" },
    Signature { name: "log",        params: &[T::String],           ret: T::Void,   rust_path: "tsl_runtime::console::log" },
    Signature { name: "log_int",    params: &[T::Int],              ret: T::Void,   rust_path: "tsl_runtime::console::log_int" },
    Signature { name: "log_char",   params: &[T::Char],             ret: T::Void,   rust_path: "tsl_runtime::console::log_char" },
    Signature { name: "input",      params: &[T::String],           ret: T::Void,   rust_path: "tsl_runtime::console::input" },
    Signature { name: "asChar",     params: &[T::Int],              ret: T::Char,   rust_path: "tsl_runtime::builtins::as_char" },
    Signature { name: "asInt",      params: &[T::Char],             ret: T::Int,    rust_path: "tsl_runtime::builtins::as_int" },
    Signature { name: "boolToInt",  params: &[T::Bool],             ret: T::Int,    rust_path: "tsl_runtime::builtins::bool_to_int" },
    Signature { name: "len",        params: &[T::String],           ret: T::Int,    rust_path: "tsl_runtime::builtins::len" },
];

/// Cherche une primitive par son nom côté langage.
pub fn lookup(name: &str) -> Option<&'static Signature> {
    SIGNATURES.iter().find(|s| s.name == name)
}

/* ───────────────────────────── Tests ───────────────────────────── */

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let mut seen = HashSet::new();
        for s in SIGNATURES {
            assert!(seen.insert(s.name), "doublon: {}", s.name);
        }
    }

    #[test]
    fn lookup_known_and_unknown() {
        let s = lookup("appendStr").unwrap();
        assert_eq!(s.params, &[T::BufferRef, T::String]);
        assert_eq!(s.ret, T::Void);
        assert!(lookup("printf").is_none());
    }

    #[test]
    fn display_reads_like_a_prototype() {
        assert_eq!(lookup("append").unwrap().to_string(), "append(Str*, char) -> void");
        assert_eq!(lookup("newStr").unwrap().to_string(), "newStr() -> Str");
    }

    #[test]
    fn zero_values() {
        assert_eq!(zero_value("int_t"), Some(Value::Int(0)));
        assert_eq!(zero_value("bool_t"), Some(Value::Bool(false)));
        assert_eq!(zero_value("float_t").unwrap().to_string(), "0.0");
        assert_eq!(zero_value("char_t").unwrap().to_string(), "'\\0'");
        assert_eq!(zero_value("string_t").unwrap().to_string(), "\"\"");
        assert!(zero_value("void_t").is_none());
        assert!(PreludeType::Buffer.zero_value().is_none());
    }

    #[test]
    fn new_buffer_takes_converted_size() {
        let s = lookup("new_buffer").unwrap();
        assert_eq!(s.params, &[T::Int]);
        assert_eq!(s.rust_path, "tsl_runtime::raw::new_buffer");

        let size: Int = 16;
        let region = crate::raw::new_buffer(usize::try_from(size).unwrap()).unwrap();
        assert_eq!(region.size(), 16);
        let negative: Int = -1;
        assert!(usize::try_from(negative).is_err());
        assert!(matches!(crate::raw::new_buffer(0), Err(crate::RuntimeError::ZeroSizedRegion)));
    }

    #[test]
    fn rust_paths_live_in_this_crate() {
        for s in SIGNATURES {
            assert!(s.rust_path.starts_with("tsl_runtime::"), "{}", s.rust_path);
        }
    }
}

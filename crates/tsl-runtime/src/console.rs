//! console.rs — Écritures console et lecture d’un token.
//!
//! `Console<W, R>` porte les opérations sur n’importe quel couple
//! `Write`/`BufRead` (stdout/stdin en prod, `Vec<u8>`/slice en test) et
//! remonte les erreurs I/O. Les fonctions libres `log`, `log_int`,
//! `log_char`, `input` sont la surface appelée par le code généré : elles
//! écrivent sur stdout/stdin et n’échouent jamais (erreur → `warn!`).
//! Les écritures ne prennent jamais le verrou de stdin : seul `input` le
//! tient, le temps d’une lecture.
//!
//! Aucune écriture n’ajoute de saut de ligne. Par défaut chaque écriture est
//! suivie d’un `flush` (comportement non bufferisé).
//!
//! `read_token` lit un token délimité par des blancs dans un buffer dont la
//! longueur fait office de capacité : au plus `len - 1` octets sont stockés,
//! suivis d’un nul ; le reste du token est consommé puis signalé via
//! `TokenRead::truncated`. Le blanc qui termine le token reste non lu.

use std::io::{self, BufRead, Write};

use log::warn;

use crate::config::ConsoleConfig;
use crate::format::{format_int, Int};
use crate::{Result, RuntimeError};

/// Résultat d’un `read_token` réussi.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRead {
    /// Octets stockés (hors terminateur).
    pub len: usize,
    /// Le token dépassait la capacité du buffer.
    pub truncated: bool,
}

/// Sortie + entrée de la console ; `W` reçoit les écritures, `R` fournit les tokens.
pub struct Console<W, R> {
    out: W,
    input: R,
    flush_each_write: bool,
}

impl Console<io::Stdout, io::StdinLock<'static>> {
    /// Console branchée sur stdout/stdin du process.
    ///
    /// Garde le verrou de stdin jusqu’à son drop : un `input` lancé ailleurs
    /// attend. Pour n’écrire que sur stdout, préférer [`Console::stdout`].
    pub fn stdio(cfg: &ConsoleConfig) -> Self {
        Self::with_config(io::stdout(), io::stdin().lock(), cfg)
    }
}

impl Console<io::Stdout, io::Empty> {
    /// Console d’écriture seule : stdout, entrée toujours vide.
    pub fn stdout(cfg: &ConsoleConfig) -> Self {
        Self::with_config(io::stdout(), io::empty(), cfg)
    }
}

impl<W: Write, R: BufRead> Console<W, R> {
    pub fn new(out: W, input: R) -> Self {
        Self { out, input, flush_each_write: true }
    }

    pub fn with_config(out: W, input: R, cfg: &ConsoleConfig) -> Self {
        Self { out, input, flush_each_write: cfg.flush_each_write }
    }

    /// `log(text)` : texte jusqu’à son terminateur, tel quel.
    pub fn write_text(&mut self, text: impl AsRef<[u8]>) -> Result<()> {
        let bytes = text.as_ref();
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        self.emit(&bytes[..end])
    }

    /// `log_int(n)` : même règle de formatage que `Str::append_int`.
    pub fn write_int(&mut self, n: Int) -> Result<()> {
        self.emit(format_int(n).as_bytes())
    }

    /// `log_char(c)`
    pub fn write_char(&mut self, c: u8) -> Result<()> {
        self.emit(&[c])
    }

    /// `input(buf)` : `Ok(None)` si l’entrée se termine avant tout token.
    pub fn read_token(&mut self, buf: &mut [u8]) -> Result<Option<TokenRead>> {
        if buf.is_empty() {
            return Err(RuntimeError::ZeroCapacity);
        }
        let room = buf.len() - 1;
        buf[0] = 0;

        // 1) blancs de tête
        loop {
            let chunk = fill(&mut self.input)?;
            if chunk.is_empty() {
                return Ok(None);
            }
            let skip = chunk.iter().take_while(|&&b| is_space(b)).count();
            let found = skip < chunk.len();
            self.input.consume(skip);
            if found {
                break;
            }
        }

        // 2) le token lui-même ; `buf` reste terminé même si la lecture échoue
        let mut len = 0;
        let mut seen = 0;
        loop {
            let chunk = match fill(&mut self.input) {
                Ok(chunk) => chunk,
                Err(e) => {
                    buf[len] = 0;
                    return Err(e.into());
                }
            };
            if chunk.is_empty() {
                break;
            }
            let n = chunk.iter().take_while(|&&b| !is_space(b)).count();
            let take = n.min(room - len);
            buf[len..len + take].copy_from_slice(&chunk[..take]);
            len += take;
            seen += n;
            let ended = n < chunk.len();
            self.input.consume(n);
            if ended {
                break;
            }
        }
        buf[len] = 0;

        let truncated = seen > len;
        if truncated {
            warn!(target: "tsl_runtime::console", "token tronqué: {seen} octets lus, {len} gardés");
        }
        Ok(Some(TokenRead { len, truncated }))
    }

    pub fn into_parts(self) -> (W, R) {
        (self.out, self.input)
    }

    fn emit(&mut self, bytes: &[u8]) -> Result<()> {
        self.out.write_all(bytes)?;
        if self.flush_each_write {
            self.out.flush()?;
        }
        Ok(())
    }
}

/// Blancs au sens de `isspace` (C locale), tabulation verticale comprise.
fn is_space(b: u8) -> bool {
    b.is_ascii_whitespace() || b == 0x0B
}

fn fill<R: BufRead>(r: &mut R) -> io::Result<&[u8]> {
    loop {
        match r.fill_buf() {
            Ok(_) => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    r.fill_buf()
}

// ---------- Surface appelée par le code généré ----------

fn stdout() -> Console<io::Stdout, io::Empty> {
    Console::stdout(&ConsoleConfig::default())
}

fn report(what: &str, res: Result<()>) {
    if let Err(e) = res {
        warn!(target: "tsl_runtime::console", "{what}: {e}");
    }
}

/// `log(s)`
pub fn log(text: impl AsRef<[u8]>) {
    report("log", stdout().write_text(text));
}

/// `log_int(n)`
pub fn log_int(n: Int) {
    report("log_int", stdout().write_int(n));
}

/// `log_char(c)`
pub fn log_char(c: u8) {
    report("log_char", stdout().write_char(c));
}

/// `input(buf)` : `None` en fin d’entrée ou sur erreur (loggée).
pub fn input(buf: &mut [u8]) -> Option<TokenRead> {
    let mut reader = Console::new(io::sink(), io::stdin().lock());
    match reader.read_token(buf) {
        Ok(tok) => tok,
        Err(e) => {
            warn!(target: "tsl_runtime::console", "input: {e}");
            None
        }
    }
}

/* ───────────────────────────── Tests ───────────────────────────── */

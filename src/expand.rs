//! Pseudo-instruction expansion: bind caller registers, pick scratch
//! registers that collide with nothing in use, then fill the templates.

use std::collections::HashMap;

use tracing::debug;

use crate::arch::Architecture;
use crate::encoder::{Encoder, Word};
use crate::error::AsmError;
use crate::scratch::{free_count, select_free_many};
use crate::template::fill;

#[derive(Debug, Clone, Default)]
pub struct Expansion {
    templates: Vec<String>,
    bindings: HashMap<String, String>,
    scratch: Vec<String>,
}

impl Expansion {
    pub fn new<I, T>(templates: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            templates: templates.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Binds a placeholder to a fixed token, usually a caller register.
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.bindings.insert(name.into(), value.into());
        self
    }

    /// Declares a placeholder that receives a free scratch register.
    pub fn scratch(mut self, name: impl Into<String>) -> Self {
        self.scratch.push(name.into());
        self
    }

    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    /// Fills the templates. Scratch placeholders get distinct registers, in
    /// declaration order, that appear neither in `used` nor among the bound
    /// values.
    pub fn expand<U: AsRef<str>>(&self, arch: &Architecture, used: &[U]) -> Result<Vec<String>, AsmError> {
        let mut taken: Vec<&str> = used.iter().map(|u| u.as_ref()).collect();
        taken.extend(self.bindings.values().map(|v| {
            arch.register_code(v)
                .and_then(|code| arch.register_name(code))
                .unwrap_or(v)
        }));

        let mut bindings = self.bindings.clone();
        if !self.scratch.is_empty() {
            let needed = self.scratch.len();
            let picks = select_free_many(arch, &taken, needed).ok_or_else(|| AsmError::ScratchExhausted {
                needed,
                available: free_count(arch, &taken),
            })?;
            for (name, reg) in self.scratch.iter().zip(picks) {
                debug!(placeholder = %name, register = reg, "scratch assigned");
                bindings.insert(name.clone(), reg.to_string());
            }
        }
        fill(&self.templates, &bindings)
    }

    /// Expands and encodes every resulting line.
    pub fn assemble<U: AsRef<str>>(&self, encoder: &Encoder<'_>, used: &[U]) -> Result<Vec<Word>, AsmError> {
        self.expand(encoder.arch(), used)?
            .iter()
            .map(|line| encode_line(encoder, line))
            .collect()
    }
}

/// Splits `MNEMONIC a, b, c` into the mnemonic and trimmed operand tokens.
/// Returns `None` for a blank line.
pub fn split_line(line: &str) -> Option<(&str, Vec<&str>)> {
    let line = line.trim();
    let (mnemonic, rest) = match line.split_once(char::is_whitespace) {
        Some((m, r)) => (m, r.trim()),
        None => (line, ""),
    };
    if mnemonic.is_empty() {
        return None;
    }
    let operands = if rest.is_empty() {
        Vec::new()
    } else {
        rest.split(',').map(str::trim).collect()
    };
    Some((mnemonic, operands))
}

/// Encodes one textual instruction line. Blank lines fail with
/// `UnknownMnemonic`.
pub fn encode_line(encoder: &Encoder<'_>, line: &str) -> Result<Word, AsmError> {
    let (mnemonic, operands) = split_line(line).ok_or_else(|| AsmError::UnknownMnemonic {
        token: String::new(),
    })?;
    encoder.encode_str(mnemonic, &operands)
}

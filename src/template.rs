//! Instruction templates with `{name}` placeholders.
//!
//! A pseudo-instruction expands to several template lines sharing one set of
//! bindings. `{{` and `}}` stand for literal braces.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::error::AsmError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Text(String),
    Hole(String),
}

/// A parsed template line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    pub fn parse(src: &str) -> Result<Self, AsmError> {
        let malformed = |offset| AsmError::MalformedTemplate {
            template: src.to_string(),
            offset,
        };

        let mut pieces = Vec::new();
        let mut text = String::new();
        let mut chars = src.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    text.push('{');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((j, '{')) => return Err(malformed(j)),
                            Some((_, ch)) => name.push(ch),
                            None => return Err(malformed(i)),
                        }
                    }
                    if name.is_empty() {
                        return Err(malformed(i));
                    }
                    if !text.is_empty() {
                        pieces.push(Piece::Text(std::mem::take(&mut text)));
                    }
                    pieces.push(Piece::Hole(name));
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    text.push('}');
                }
                '}' => return Err(malformed(i)),
                _ => text.push(c),
            }
        }
        if !text.is_empty() {
            pieces.push(Piece::Text(text));
        }
        Ok(Self { pieces })
    }

    /// Placeholder names in order of appearance, repeats included.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> + '_ {
        self.pieces.iter().filter_map(|p| match p {
            Piece::Hole(name) => Some(name.as_str()),
            Piece::Text(_) => None,
        })
    }

    pub fn render<K, V>(&self, bindings: &HashMap<K, V>) -> Result<String, AsmError>
    where
        K: Borrow<str> + Hash + Eq,
        V: AsRef<str>,
    {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Text(t) => out.push_str(t),
                Piece::Hole(name) => {
                    let value = bindings
                        .get(name.as_str())
                        .ok_or_else(|| AsmError::UnboundPlaceholder { name: name.clone() })?;
                    out.push_str(value.as_ref());
                }
            }
        }
        Ok(out)
    }
}

/// Substitutes every placeholder of every template. Output order matches
/// input order; bindings nobody references are ignored.
pub fn fill<T, K, V>(templates: &[T], bindings: &HashMap<K, V>) -> Result<Vec<String>, AsmError>
where
    T: AsRef<str>,
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
{
    templates
        .iter()
        .map(|t| Template::parse(t.as_ref())?.render(bindings))
        .collect()
}

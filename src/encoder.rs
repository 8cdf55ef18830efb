//! Packs a mnemonic and its operand tokens into one instruction word.
//!
//! Every mnemonic owns a fixed operand layout. Fields are placed at their bit
//! offset inside the operand area, and the operand area sits directly above
//! the opcode:
//!
//! ```text
//! word = opcode | (operands << opcode_width)
//! ```

use std::num::IntErrorKind;

use bitvec::prelude::*;
use tracing::trace;

use crate::arch::{Architecture, LimitKey, Mnemonic, REGISTER_BITS};
use crate::error::{ArchError, AsmError};
use crate::register::RegisterOperand;

pub type Word = u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    Bits(u32),
    /// Whatever the operand area leaves after the leading register slot.
    Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Fixed(u16),
    Limit(LimitKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Register,
    Literal(Bound),
}

/// One operand field: its name in diagnostics, bit offset and width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub shift: u32,
    pub width: FieldWidth,
    pub kind: FieldKind,
}

impl Field {
    const fn register(name: &'static str, shift: u32) -> Self {
        Self {
            name,
            shift,
            width: FieldWidth::Bits(REGISTER_BITS),
            kind: FieldKind::Register,
        }
    }

    const fn small(name: &'static str, shift: u32, width: u32) -> Self {
        Self {
            name,
            shift,
            width: FieldWidth::Bits(width),
            kind: FieldKind::Literal(Bound::Fixed((1 << width) - 1)),
        }
    }

    const fn literal(name: &'static str, key: LimitKey) -> Self {
        Self {
            name,
            shift: REGISTER_BITS,
            width: FieldWidth::Literal,
            kind: FieldKind::Literal(Bound::Limit(key)),
        }
    }

    pub fn bits(&self, arch: &Architecture) -> u32 {
        match self.width {
            FieldWidth::Bits(n) => n,
            FieldWidth::Literal => arch.literal_width(),
        }
    }
}

const D: Field = Field::register("D", 0);
const S: Field = Field::register("S", REGISTER_BITS);

const TWO_REG: &[Field] = &[D, S];
const DEST: &[Field] = &[D];
// PSH and JMR keep the source in the S slot; the D slot stays zero.
const SOURCE: &[Field] = &[S];
const NONE: &[Field] = &[];
const LDV: &[Field] = &[D, Field::literal("V", LimitKey::Ldv)];
const LDA: &[Field] = &[D, Field::literal("M", LimitKey::Lda)];
const LDM: &[Field] = &[D, Field::literal("M", LimitKey::Ldm)];
const JMP: &[Field] = &[Field::literal("M", LimitKey::Jmp)];
const ATH: &[Field] = &[
    D,
    S,
    Field::small("OP", 4, 4),
    Field::small("M", 8, 1),
    Field::small("B", 9, 3),
];

impl Mnemonic {
    pub fn layout(self) -> &'static [Field] {
        match self {
            Mnemonic::Mov | Mnemonic::Ldr | Mnemonic::Ldp | Mnemonic::Jlt => TWO_REG,
            Mnemonic::Ldv => LDV,
            Mnemonic::Lda => LDA,
            Mnemonic::Ldm => LDM,
            Mnemonic::Ath => ATH,
            Mnemonic::Cal | Mnemonic::Pop => DEST,
            Mnemonic::Psh | Mnemonic::Jmr => SOURCE,
            Mnemonic::Ret | Mnemonic::Sys | Mnemonic::Hlt => NONE,
            Mnemonic::Jmp => JMP,
        }
    }

    pub fn arity(self) -> usize {
        self.layout().len()
    }
}

/// Encodes instructions against one architecture table.
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'a> {
    arch: &'a Architecture,
}

impl Encoder<'static> {
    pub fn rcpu() -> Self {
        Self {
            arch: Architecture::rcpu(),
        }
    }
}

impl Default for Encoder<'static> {
    fn default() -> Self {
        Self::rcpu()
    }
}

impl<'a> Encoder<'a> {
    /// Checks the table once so every layout fits the word.
    pub fn new(arch: &'a Architecture) -> Result<Self, ArchError> {
        arch.validate()?;
        Ok(Self { arch })
    }

    pub fn arch(&self) -> &'a Architecture {
        self.arch
    }

    pub fn encode<T: AsRef<str>>(&self, mnemonic: Mnemonic, operands: &[T]) -> Result<Word, AsmError> {
        let layout = mnemonic.layout();
        if operands.len() != mnemonic.arity() {
            return Err(AsmError::OperandCount {
                mnemonic,
                expected: mnemonic.arity(),
                found: operands.len(),
            });
        }
        let opcode = self
            .arch
            .opcode(mnemonic)
            .ok_or_else(|| AsmError::UnknownMnemonic {
                token: mnemonic.to_string(),
            })?;

        let mut packed: Word = 0;
        let bits = packed.view_bits_mut::<Lsb0>();
        for (field, token) in layout.iter().zip(operands) {
            let value = self.field_value(mnemonic, field, token.as_ref())?;
            let lo = field.shift as usize;
            let hi = lo + field.bits(self.arch) as usize;
            bits[lo..hi].store_le(value);
        }

        let word = opcode | (packed << self.arch.opcode_width);
        trace!(%mnemonic, word, "encoded");
        Ok(word)
    }

    /// Parses the mnemonic case-insensitively, then encodes.
    pub fn encode_str<T: AsRef<str>>(&self, mnemonic: &str, operands: &[T]) -> Result<Word, AsmError> {
        self.encode(mnemonic.parse()?, operands)
    }

    fn field_value(&self, mnemonic: Mnemonic, field: &Field, token: &str) -> Result<Word, AsmError> {
        let max = match field.kind {
            FieldKind::Register => {
                let reg = RegisterOperand::parse(self.arch, token)?;
                return Ok(Word::from(reg.code()));
            }
            FieldKind::Literal(Bound::Fixed(max)) => max,
            FieldKind::Literal(Bound::Limit(key)) => self.arch.limits.get(key),
        };
        let t = token.trim();
        // Decimal text too large for i64 is still a range failure; the
        // diagnostic carries the saturated value.
        let value: i64 = match t.parse() {
            Ok(v) => v,
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => i64::MAX,
                IntErrorKind::NegOverflow => i64::MIN,
                _ => {
                    return Err(AsmError::InvalidLiteral {
                        mnemonic,
                        field: field.name,
                        token: t.to_string(),
                    })
                }
            },
        };
        if value < 0 || value > i64::from(max) {
            return Err(AsmError::EncodingRange {
                mnemonic,
                field: field.name,
                value,
                max,
            });
        }
        Ok(value as Word)
    }
}

/// Encodes against the RCPU table.
pub fn encode<T: AsRef<str>>(mnemonic: &str, operands: &[T]) -> Result<Word, AsmError> {
    Encoder::rcpu().encode_str(mnemonic, operands)
}

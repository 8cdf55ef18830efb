//! The RCPU architecture table: opcodes, register names and literal limits.
//!
//! The table is read-only once built. [`Architecture::rcpu`] hands out the
//! process-wide default; alternative tables can be loaded from JSON and are
//! validated before use.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ArchError, AsmError};

/// Width of every register operand field.
pub const REGISTER_BITS: u32 = 2;

/// Operand bits the widest layout (ATH) needs.
const MIN_OPERAND_BITS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mnemonic {
    Mov,
    Ldv,
    Lda,
    Ldm,
    Ldr,
    Ldp,
    Ath,
    Cal,
    Ret,
    Jlt,
    Psh,
    Pop,
    Sys,
    Hlt,
    Jmp,
    Jmr,
}

impl Mnemonic {
    pub const ALL: [Mnemonic; 16] = [
        Mnemonic::Mov,
        Mnemonic::Ldv,
        Mnemonic::Lda,
        Mnemonic::Ldm,
        Mnemonic::Ldr,
        Mnemonic::Ldp,
        Mnemonic::Ath,
        Mnemonic::Cal,
        Mnemonic::Ret,
        Mnemonic::Jlt,
        Mnemonic::Psh,
        Mnemonic::Pop,
        Mnemonic::Sys,
        Mnemonic::Hlt,
        Mnemonic::Jmp,
        Mnemonic::Jmr,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Mnemonic::Mov => "MOV",
            Mnemonic::Ldv => "LDV",
            Mnemonic::Lda => "LDA",
            Mnemonic::Ldm => "LDM",
            Mnemonic::Ldr => "LDR",
            Mnemonic::Ldp => "LDP",
            Mnemonic::Ath => "ATH",
            Mnemonic::Cal => "CAL",
            Mnemonic::Ret => "RET",
            Mnemonic::Jlt => "JLT",
            Mnemonic::Psh => "PSH",
            Mnemonic::Pop => "POP",
            Mnemonic::Sys => "SYS",
            Mnemonic::Hlt => "HLT",
            Mnemonic::Jmp => "JMP",
            Mnemonic::Jmr => "JMR",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mnemonic {
    type Err = AsmError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        Mnemonic::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(t))
            .ok_or_else(|| AsmError::UnknownMnemonic { token: t.to_string() })
    }
}

/// Largest literal accepted by each literal-bearing instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "UPPERCASE")]
pub struct Limits {
    pub ldv: u16,
    pub lda: u16,
    pub ldm: u16,
    pub jmp: u16,
}

/// Names one entry of [`Limits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKey {
    Ldv,
    Lda,
    Ldm,
    Jmp,
}

impl LimitKey {
    pub fn of(m: Mnemonic) -> Option<Self> {
        match m {
            Mnemonic::Ldv => Some(LimitKey::Ldv),
            Mnemonic::Lda => Some(LimitKey::Lda),
            Mnemonic::Ldm => Some(LimitKey::Ldm),
            Mnemonic::Jmp => Some(LimitKey::Jmp),
            _ => None,
        }
    }
}

impl Limits {
    pub fn get(&self, key: LimitKey) -> u16 {
        match key {
            LimitKey::Ldv => self.ldv,
            LimitKey::Lda => self.lda,
            LimitKey::Ldm => self.ldm,
            LimitKey::Jmp => self.jmp,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        let max10 = (1u16 << 10) - 1;
        Self {
            ldv: max10,
            lda: max10,
            ldm: max10,
            jmp: max10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Architecture {
    pub word_width: u32,
    pub opcode_width: u32,
    #[serde(deserialize_with = "unique_opcodes")]
    pub opcodes: BTreeMap<Mnemonic, u16>,
    /// Register names in canonical order. A register's code is its index,
    /// and scratch selection walks this list front to back.
    pub registers: Vec<String>,
    pub limits: Limits,
}

/// Reads the opcode map, refusing a mnemonic listed twice instead of keeping
/// the last entry.
fn unique_opcodes<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<Mnemonic, u16>, D::Error> {
    struct OpcodeMap;

    impl<'de> Visitor<'de> for OpcodeMap {
        type Value = BTreeMap<Mnemonic, u16>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map from mnemonic to opcode")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut out = BTreeMap::new();
            while let Some((m, opcode)) = map.next_entry::<Mnemonic, u16>()? {
                if out.insert(m, opcode).is_some() {
                    return Err(de::Error::custom(ArchError::DuplicateMnemonic(m)));
                }
            }
            Ok(out)
        }
    }

    d.deserialize_map(OpcodeMap)
}

impl Default for Architecture {
    fn default() -> Self {
        Self {
            word_width: 16,
            opcode_width: 4,
            opcodes: Mnemonic::ALL.into_iter().zip(0u16..).collect(),
            registers: ["A", "B", "C", "D"].map(String::from).to_vec(),
            limits: Limits::default(),
        }
    }
}

impl Architecture {
    /// The shared RCPU table.
    pub fn rcpu() -> &'static Architecture {
        static RCPU: OnceLock<Architecture> = OnceLock::new();
        RCPU.get_or_init(Architecture::default)
    }

    /// Parses a table from JSON. Missing keys fall back to the RCPU values.
    pub fn from_json(text: &str) -> Result<Self, ArchError> {
        let arch: Architecture =
            serde_json::from_str(text).map_err(|source| ArchError::Json { source })?;
        arch.validate()?;
        Ok(arch)
    }

    pub fn validate(&self) -> Result<(), ArchError> {
        if self.opcode_width == 0
            || self.word_width > u16::BITS
            || self.word_width < self.opcode_width + MIN_OPERAND_BITS
        {
            return Err(ArchError::BadWidths {
                opcode_width: self.opcode_width,
                word_width: self.word_width,
            });
        }

        let mut seen_opcodes = HashSet::new();
        for m in Mnemonic::ALL {
            let opcode = *self.opcodes.get(&m).ok_or(ArchError::MissingMnemonic(m))?;
            if u32::from(opcode) >> self.opcode_width != 0 {
                return Err(ArchError::OpcodeTooWide {
                    mnemonic: m,
                    opcode,
                    width: self.opcode_width,
                });
            }
            if !seen_opcodes.insert(opcode) {
                return Err(ArchError::DuplicateOpcode(opcode));
            }
        }

        let max_registers = 1usize << REGISTER_BITS;
        if self.registers.len() > max_registers {
            return Err(ArchError::TooManyRegisters {
                count: self.registers.len(),
                width: REGISTER_BITS,
            });
        }
        let mut seen_registers = HashSet::new();
        for name in &self.registers {
            let ident = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
            if !ident {
                return Err(ArchError::BadRegisterName(name.clone()));
            }
            if !seen_registers.insert(name.to_ascii_uppercase()) {
                return Err(ArchError::DuplicateRegister(name.clone()));
            }
        }

        let literal_bits = self.literal_width();
        for m in Mnemonic::ALL {
            if let Some(max) = self.limit(m) {
                if u32::from(max) >> literal_bits != 0 {
                    return Err(ArchError::LimitTooWide {
                        mnemonic: m,
                        max,
                        width: literal_bits,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn opcode(&self, m: Mnemonic) -> Option<u16> {
        self.opcodes.get(&m).copied()
    }

    /// Case-insensitive register lookup.
    pub fn register_code(&self, name: &str) -> Option<u8> {
        self.registers
            .iter()
            .position(|r| r.eq_ignore_ascii_case(name))
            .and_then(|i| u8::try_from(i).ok())
    }

    pub fn register_name(&self, code: u8) -> Option<&str> {
        self.registers.get(usize::from(code)).map(String::as_str)
    }

    /// Register names in canonical order.
    pub fn register_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.registers.iter().map(String::as_str)
    }

    /// Maximum literal for instructions that carry one.
    pub fn limit(&self, m: Mnemonic) -> Option<u16> {
        LimitKey::of(m).map(|key| self.limits.get(key))
    }

    /// Bits available above the opcode.
    pub fn operand_width(&self) -> u32 {
        self.word_width.saturating_sub(self.opcode_width)
    }

    /// Width of the variable literal field that follows a register slot.
    pub fn literal_width(&self) -> u32 {
        self.operand_width().saturating_sub(REGISTER_BITS)
    }
}

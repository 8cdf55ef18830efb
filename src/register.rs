use crate::arch::Architecture;
use crate::error::AsmError;

/// Token expanders write into register slots they leave unused.
pub const UNUSED_TOKEN: &str = "0";

/// A resolved register operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterOperand {
    /// A real register, by table code.
    Register(u8),
    /// "No register / don't care". Encodes as code 0 without naming a register.
    Unused,
}

impl RegisterOperand {
    pub fn parse(arch: &Architecture, token: &str) -> Result<Self, AsmError> {
        let t = token.trim();
        if let Some(code) = arch.register_code(t) {
            return Ok(RegisterOperand::Register(code));
        }
        if t == UNUSED_TOKEN {
            return Ok(RegisterOperand::Unused);
        }
        Err(AsmError::UnknownRegister {
            token: t.to_string(),
        })
    }

    pub fn code(self) -> u8 {
        match self {
            RegisterOperand::Register(code) => code,
            RegisterOperand::Unused => 0,
        }
    }
}

/// Resolves a register token to its binary code.
pub fn resolve(arch: &Architecture, token: &str) -> Result<u8, AsmError> {
    RegisterOperand::parse(arch, token).map(RegisterOperand::code)
}

use crate::arch::Mnemonic;

/// Failures reported while encoding instructions or expanding templates.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("Unknown register: {token}")]
    UnknownRegister { token: String },
    #[error("Unknown mnemonic: {token}")]
    UnknownMnemonic { token: String },
    #[error("{mnemonic}: {field} = {value} is outside 0..={max}")]
    EncodingRange {
        mnemonic: Mnemonic,
        field: &'static str,
        value: i64,
        max: u16,
    },
    #[error("{mnemonic}: {field} expects a base-10 literal, got {token:?}")]
    InvalidLiteral {
        mnemonic: Mnemonic,
        field: &'static str,
        token: String,
    },
    #[error("{mnemonic} takes {expected} operand(s), got {found}")]
    OperandCount {
        mnemonic: Mnemonic,
        expected: usize,
        found: usize,
    },
    #[error("Unbound placeholder {{{name}}}")]
    UnboundPlaceholder { name: String },
    #[error("Malformed template {template:?} at byte {offset}")]
    MalformedTemplate { template: String, offset: usize },
    #[error("Need {needed} scratch register(s), only {available} free")]
    ScratchExhausted { needed: usize, available: usize },
}

/// Problems with an architecture table, either loaded or built by hand.
#[derive(thiserror::Error, Debug)]
pub enum ArchError {
    #[error("Opcode {opcode:#x} for {mnemonic} does not fit in {width} bits")]
    OpcodeTooWide {
        mnemonic: Mnemonic,
        opcode: u16,
        width: u32,
    },
    #[error("Mnemonic {0} is missing from the opcode table")]
    MissingMnemonic(Mnemonic),
    #[error("Mnemonic {0} appears more than once")]
    DuplicateMnemonic(Mnemonic),
    #[error("Opcode {0:#x} is assigned to more than one mnemonic")]
    DuplicateOpcode(u16),
    #[error("Register {0} appears more than once")]
    DuplicateRegister(String),
    #[error("{count} registers do not fit in a {width}-bit register field")]
    TooManyRegisters { count: usize, width: u32 },
    #[error("Register name {0:?} is not a valid identifier")]
    BadRegisterName(String),
    #[error("Limit for {mnemonic} ({max}) does not fit in {width} bits")]
    LimitTooWide {
        mnemonic: Mnemonic,
        max: u16,
        width: u32,
    },
    #[error("Opcode width {opcode_width} leaves no room for operands in a {word_width}-bit word")]
    BadWidths { opcode_width: u32, word_width: u32 },
    #[error("Invalid architecture JSON: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },
}

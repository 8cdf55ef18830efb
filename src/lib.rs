pub mod arch;
pub mod encoder;
pub mod error;
pub mod expand;
pub mod register;
pub mod scratch;
pub mod template;

pub use arch::{Architecture, Mnemonic};
pub use encoder::{encode, Encoder, Word};
pub use error::{ArchError, AsmError};
pub use expand::Expansion;
pub use register::{resolve, RegisterOperand};
pub use scratch::{select_free, select_free_many};
pub use template::{fill, Template};

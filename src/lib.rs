pub mod assembler;
pub mod ast;
pub mod decoder;
pub mod disasm;
pub mod error;
pub mod exec;
pub mod instructions;
pub mod lexer;
pub mod machine;
pub mod memory;
pub mod opcode;
pub mod parser;
pub mod resolve;

pub use assembler::{assemble, assemble_words};
pub use decoder::{A64Decoder, Decoder};
pub use error::AsmError;
pub use machine::{Machine, MachineConfig, Trap};
pub use memory::{Bus, LinearMemory};
pub use opcode::Opcode;

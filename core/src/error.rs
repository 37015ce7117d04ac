use thiserror::Error;

/// Errors raised while building or running a CHIP-8 machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Chip8Error {
    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("font sprite must be 80 bytes, got {size}")]
    InvalidFont { size: usize },

    #[error("stack overflow: call at 0x{pc:04x} with 16 return addresses already pushed")]
    StackOverflow { pc: u16 },

    #[error("stack underflow: return at 0x{pc:04x} with an empty call stack")]
    StackUnderflow { pc: u16 },

    #[error("jump target 0x{target:04x} out of bounds at 0x{pc:04x}")]
    PcOutOfBounds { target: u16, pc: u16 },

    #[error("memory access out of bounds at address 0x{address:04x}")]
    MemoryOutOfBounds { address: usize },

    #[error("no font sprite for digit 0x{digit:02x}")]
    InvalidFontDigit { digit: u8 },

    #[error("unknown opcode 0x{opcode:04x} at 0x{pc:04x}")]
    UnknownOpcode { opcode: u16, pc: u16 },
}

//! CHIP-8 interpreter core: machine state, instruction decoding and execution.
//!
//! The host owns the timing loop, calls [`Chip8::cycle`] once per emulated
//! cycle, feeds key state through [`Chip8::set_key`] and presents
//! [`Chip8::display`] whenever it is dirty.

pub use chip8::{
    Chip8, Chip8Builder, UnknownOpcodePolicy, DEFAULT_FONT, FONT_START, MAX_ROM_SIZE, MEMORY_SIZE,
    PROGRAM_START,
};
pub use color::{
    colorize, Chip8Color, Chip8ColorParseError, DEFAULT_BACKGROUND_COLOR, DEFAULT_FOREGROUND_COLOR,
};
pub use display::{Display, PIXEL_OFF, PIXEL_ON, SCREEN_HEIGHT, SCREEN_PITCH, SCREEN_WIDTH};
pub use error::Chip8Error;
pub use instruction::{Instruction, Opcode};
pub use keypad::Keypad;

mod chip8;
mod color;
mod display;
mod error;
mod instruction;
mod keypad;
mod ops;

#[cfg(test)]
mod testing;

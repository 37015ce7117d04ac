// CHIP-8 interpreter core
//
// Useful links:
// * [Cowgod's Chip-8 Technical Reference](http://devernay.free.fr/hacks/chip8/C8TECH10.HTM)
// * [Building a CHIP-8 Emulator](https://austinmorlan.com/posts/chip8_emulator/)
// * [Guide to making a CHIP-8 emulator](https://tobiasvl.github.io/blog/write-a-chip-8-emulator/)
//

use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, trace};
use rand::{rngs::StdRng, RngCore, SeedableRng};

use crate::display::Display;
use crate::error::Chip8Error;
use crate::instruction::Instruction;
use crate::keypad::Keypad;

pub const MEMORY_SIZE: usize = 0x1000;
/// Highest address a whole instruction can be fetched from.
pub const MAX_PC: u16 = MEMORY_SIZE as u16 - 2;
pub const PROGRAM_START: u16 = 0x200;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;
pub const FONT_START: u16 = 0x050;
pub const FONT_SIZE: usize = 80;
pub const FONT_SPRITE_HEIGHT: u16 = 5;
pub const STACK_SIZE: usize = 16;

pub static DEFAULT_FONT: [u8; FONT_SIZE] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// What to do with an instruction word that has no assigned operation.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum UnknownOpcodePolicy {
    /// Execute as a no-op.
    Ignore,
    /// Execute as a no-op and emit a warning.
    #[default]
    Log,
    /// Stop with [`Chip8Error::UnknownOpcode`].
    Fail,
}

enum RngSource {
    Seed(u64),
    Custom(Box<dyn RngCore + Send>),
}

pub struct Chip8Builder {
    /// ROM
    rom: Option<Vec<u8>>,
    /// Font sprite
    font: Option<Vec<u8>>,
    /// PRNG
    rng: Option<RngSource>,
    /// Unknown opcode handling
    unknown_opcodes: UnknownOpcodePolicy,
}

pub struct Chip8 {
    /// General purpose registers, VF doubles as the flag register
    pub(crate) regs: [u8; 16],
    /// Index register
    pub(crate) index: u16,
    /// Program counter
    pub(crate) pc: u16,
    /// Call stack
    pub(crate) stack: [u16; STACK_SIZE],
    /// Stack pointer, next free slot
    pub(crate) sp: u8,
    /// Delay Timer
    pub(crate) delay_timer: u8,
    /// Sound Timer
    pub(crate) sound_timer: u8,
    /// Memory
    pub(crate) memory: [u8; MEMORY_SIZE],
    /// Display: 64x32 pixels, one 32-bit word per pixel
    pub(crate) display: Display,
    /// Keypad
    pub(crate) keypad: Keypad,
    /// Last fetched instruction word
    pub(crate) opcode: u16,
    pub(crate) unknown_opcodes: UnknownOpcodePolicy,
    /// PRNG Generator
    pub(crate) rng: Box<dyn RngCore + Send>,
}

impl Chip8Builder {
    pub fn new() -> Chip8Builder {
        Chip8Builder {
            rom: None,
            font: None,
            rng: None,
            unknown_opcodes: UnknownOpcodePolicy::default(),
        }
    }

    pub fn with_rom(mut self, rom: Vec<u8>) -> Self {
        self.rom = Some(rom);
        self
    }

    /// Replace the built-in font, must be 16 glyphs of 5 bytes.
    pub fn with_font(mut self, font: Vec<u8>) -> Self {
        self.font = Some(font);
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Some(RngSource::Seed(seed));
        self
    }

    /// Use the given generator for `Cxkk` instead of a seeded [`StdRng`].
    pub fn with_rng<R: RngCore + Send + 'static>(mut self, rng: R) -> Self {
        self.rng = Some(RngSource::Custom(Box::new(rng)));
        self
    }

    pub fn with_unknown_opcode_policy(mut self, policy: UnknownOpcodePolicy) -> Self {
        self.unknown_opcodes = policy;
        self
    }

    pub fn build(self) -> Result<Chip8, Chip8Error> {
        let mut memory = [0u8; MEMORY_SIZE];

        // Copy font to memory
        let font = match &self.font {
            Some(font) if font.len() != FONT_SIZE => {
                return Err(Chip8Error::InvalidFont { size: font.len() })
            }
            Some(font) => &font[..],
            None => &DEFAULT_FONT[..],
        };
        let font_start = FONT_START as usize;
        memory[font_start..font_start + FONT_SIZE].copy_from_slice(font);

        // Pseudo random number generator
        let rng: Box<dyn RngCore + Send> = match self.rng {
            Some(RngSource::Custom(rng)) => rng,
            Some(RngSource::Seed(seed)) => Box::new(StdRng::seed_from_u64(seed)),
            None => {
                let seed = clock_seed();
                debug!("seeding random generator with {}", seed);
                Box::new(StdRng::seed_from_u64(seed))
            }
        };

        let mut chip = Chip8 {
            regs: [0u8; 16],
            index: 0,
            pc: PROGRAM_START,
            stack: [0u16; STACK_SIZE],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            memory,
            display: Display::new(),
            keypad: Keypad::new(),
            opcode: 0,
            unknown_opcodes: self.unknown_opcodes,
            rng,
        };

        if let Some(rom) = &self.rom {
            chip.load_rom(rom)?;
        }

        Ok(chip)
    }
}

impl Default for Chip8Builder {
    fn default() -> Self {
        Self::new()
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

impl Chip8 {
    /// Copy a program into memory at 0x200. Programs that don't fit are rejected.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }

        let start = PROGRAM_START as usize;
        self.memory[start..start + rom.len()].copy_from_slice(rom);
        debug!("loaded {} byte ROM at 0x{:03x}", rom.len(), start);
        Ok(())
    }

    /// Run one cycle: execute the next instruction, then tick both timers.
    pub fn cycle(&mut self) -> Result<(), Chip8Error> {
        self.step()?;
        self.step_timers();
        Ok(())
    }

    /// Fetch, decode and execute a single instruction.
    ///
    /// The program counter already points past the instruction when it executes.
    /// Jumps, calls, returns and skips fail with [`Chip8Error::PcOutOfBounds`]
    /// rather than leave `pc` past 0xFFE. Odd targets are allowed: programs may
    /// place code at any byte address, so alignment is not enforced.
    pub fn step(&mut self) -> Result<(), Chip8Error> {
        let pc = self.pc;
        self.opcode = self.read_u16_be(pc)?;
        self.pc += 2;

        let instruction = Instruction::decode(self.opcode);
        trace!("0x{:03x}: {:04x}  {}", pc, self.opcode, instruction);

        self.execute(instruction)
    }

    pub fn step_timers(&mut self) {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }

        if self.sound_timer > 0 {
            self.sound_timer -= 1;
        }
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.regs
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Pushed return addresses, oldest first.
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.sp as usize]
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn opcode(&self) -> u16 {
        self.opcode
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory[..]
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    /// Acknowledge that the current frame has been presented.
    pub fn mark_display_clean(&mut self) {
        self.display.mark_clean();
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) {
        self.keypad.set(key, pressed);
    }

    pub(crate) fn read_u8(&self, addr: usize) -> Result<u8, Chip8Error> {
        self.memory
            .get(addr)
            .copied()
            .ok_or(Chip8Error::MemoryOutOfBounds { address: addr })
    }

    pub(crate) fn write_u8(&mut self, addr: usize, data: u8) -> Result<(), Chip8Error> {
        let byte = self
            .memory
            .get_mut(addr)
            .ok_or(Chip8Error::MemoryOutOfBounds { address: addr })?;
        *byte = data;
        Ok(())
    }

    fn read_u16_be(&self, addr: u16) -> Result<u16, Chip8Error> {
        let addr = addr as usize;
        let hi = self.read_u8(addr)?;
        let lo = self.read_u8(addr + 1)?;
        Ok(u16::from_be_bytes([hi, lo]))
    }
}

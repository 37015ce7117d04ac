use log::warn;
use rand::Rng;

use crate::chip8::{
    Chip8, UnknownOpcodePolicy, FONT_SPRITE_HEIGHT, FONT_START, MAX_PC, MEMORY_SIZE, STACK_SIZE,
};
use crate::display::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::error::Chip8Error;
use crate::instruction::Instruction;

const FLAG: usize = 0xF;

impl Chip8 {
    /// Execute a decoded instruction against the machine state.
    ///
    /// `pc` already points at the following instruction, so a skip is `pc += 2`.
    pub(crate) fn execute(&mut self, instruction: Instruction) -> Result<(), Chip8Error> {
        use Instruction::*;

        match instruction {
            Clear => self.display.clear(),
            Return => self.ret()?,
            Jump(nnn) => self.jump_to(nnn)?,
            Call(nnn) => self.call(nnn)?,
            SkipEqImm { x, kk } => self.skip_if(self.regs[x] == kk)?,
            SkipNeImm { x, kk } => self.skip_if(self.regs[x] != kk)?,
            SkipEqReg { x, y } => self.skip_if(self.regs[x] == self.regs[y])?,
            LoadImm { x, kk } => self.regs[x] = kk,
            AddImm { x, kk } => self.regs[x] = self.regs[x].wrapping_add(kk),
            Move { x, y } => self.regs[x] = self.regs[y],
            Or { x, y } => self.regs[x] |= self.regs[y],
            And { x, y } => self.regs[x] &= self.regs[y],
            Xor { x, y } => self.regs[x] ^= self.regs[y],
            AddReg { x, y } => self.add_reg(x, y),
            Sub { x, y } => self.sub(x, y),
            ShiftRight { x } => self.shift_right(x),
            SubN { x, y } => self.subn(x, y),
            ShiftLeft { x } => self.shift_left(x),
            SkipNeReg { x, y } => self.skip_if(self.regs[x] != self.regs[y])?,
            LoadIndex(nnn) => self.index = nnn,
            JumpOffset(nnn) => self.jump_to(nnn + self.regs[0] as u16)?,
            Random { x, kk } => self.regs[x] = self.rng.gen::<u8>() & kk,
            Draw { x, y, n } => self.draw(x, y, n)?,
            SkipKeyPressed { x } => self.skip_if(self.keypad.is_pressed(self.regs[x]))?,
            SkipKeyNotPressed { x } => self.skip_if(!self.keypad.is_pressed(self.regs[x]))?,
            ReadDelay { x } => self.regs[x] = self.delay_timer,
            WaitKey { x } => self.wait_key(x),
            SetDelay { x } => self.delay_timer = self.regs[x],
            SetSound { x } => self.sound_timer = self.regs[x],
            AddIndex { x } => self.index = self.index.wrapping_add(self.regs[x] as u16),
            LoadDigit { x } => self.load_digit(x)?,
            StoreBcd { x } => self.store_bcd(x)?,
            StoreRegs { x } => self.store_regs(x)?,
            LoadRegs { x } => self.load_regs(x)?,
            Unknown(word) => self.unknown(word)?,
        }

        Ok(())
    }

    /// Set `pc`, rejecting targets that can't hold a whole instruction.
    fn jump_to(&mut self, target: u16) -> Result<(), Chip8Error> {
        if target > MAX_PC {
            return Err(Chip8Error::PcOutOfBounds {
                target,
                pc: self.pc - 2,
            });
        }
        self.pc = target;
        Ok(())
    }

    fn skip_if(&mut self, cond: bool) -> Result<(), Chip8Error> {
        if cond {
            self.jump_to(self.pc + 2)?;
        }
        Ok(())
    }

    /// Fail unless `len` bytes starting at I are addressable.
    fn check_index_range(&self, len: usize) -> Result<(), Chip8Error> {
        let last = self.index as usize + len - 1;
        if last >= MEMORY_SIZE {
            return Err(Chip8Error::MemoryOutOfBounds { address: last });
        }
        Ok(())
    }

    /// 00EE: pop the return address
    fn ret(&mut self) -> Result<(), Chip8Error> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow { pc: self.pc - 2 });
        }
        self.jump_to(self.stack[self.sp as usize - 1])?;
        self.sp -= 1;
        Ok(())
    }

    /// 2NNN: push the return address and jump
    fn call(&mut self, nnn: u16) -> Result<(), Chip8Error> {
        if self.sp as usize >= STACK_SIZE {
            return Err(Chip8Error::StackOverflow { pc: self.pc - 2 });
        }
        let ret = self.pc;
        self.jump_to(nnn)?;
        self.stack[self.sp as usize] = ret;
        self.sp += 1;
        Ok(())
    }

    // The flag register is always written last, so VF holds the flag even
    // when it is also the destination.

    /// 8XY4: VX += VY, VF = carry
    fn add_reg(&mut self, x: usize, y: usize) {
        let vx = self.regs[x];
        let sum = vx.wrapping_add(self.regs[y]);
        self.regs[x] = sum;
        self.regs[FLAG] = (sum < vx) as u8;
    }

    /// 8XY5: VX -= VY, VF = VX > VY
    fn sub(&mut self, x: usize, y: usize) {
        let (vx, vy) = (self.regs[x], self.regs[y]);
        self.regs[x] = vx.wrapping_sub(vy);
        self.regs[FLAG] = (vx > vy) as u8;
    }

    /// 8XY7: VX = VY - VX, VF = VY > VX
    fn subn(&mut self, x: usize, y: usize) {
        let (vx, vy) = (self.regs[x], self.regs[y]);
        self.regs[x] = vy.wrapping_sub(vx);
        self.regs[FLAG] = (vy > vx) as u8;
    }

    /// 8XY6: VX >>= 1, VF = dropped bit
    fn shift_right(&mut self, x: usize) {
        let vx = self.regs[x];
        self.regs[x] = vx >> 1;
        self.regs[FLAG] = vx & 0x01;
    }

    /// 8XYE: VX <<= 1, VF = dropped bit
    fn shift_left(&mut self, x: usize) {
        let vx = self.regs[x];
        self.regs[x] = vx << 1;
        self.regs[FLAG] = (vx & 0x80) >> 7;
    }

    /// DXYN: XOR an N row sprite from memory at I onto the screen at (VX, VY).
    /// Each pixel wraps around the screen edges on its own. VF is set if any
    /// lit pixel was erased.
    fn draw(&mut self, x: usize, y: usize, n: u8) -> Result<(), Chip8Error> {
        // Origin where we start to draw
        let ox = self.regs[x] as usize % SCREEN_WIDTH;
        let oy = self.regs[y] as usize % SCREEN_HEIGHT;

        // Fetch every row first so a bad index leaves the screen untouched
        let mut sprite = [0u8; 15];
        for (row, data) in sprite.iter_mut().enumerate().take(n as usize) {
            *data = self.read_u8(self.index as usize + row)?;
        }

        let mut collision = false;
        for (row, data) in sprite.iter().enumerate().take(n as usize) {
            for column in 0..8 {
                if data & (0x80 >> column) != 0 {
                    collision |= self.display.flip_pixel(ox + column, oy + row);
                }
            }
        }

        self.regs[FLAG] = collision as u8;
        Ok(())
    }

    /// FX0A: store the lowest pressed key in VX, or run this instruction again
    fn wait_key(&mut self, x: usize) {
        match self.keypad.first_pressed() {
            Some(key) => self.regs[x] = key,
            None => self.pc -= 2,
        }
    }

    /// FX29: point I at the font sprite for the digit in VX
    fn load_digit(&mut self, x: usize) -> Result<(), Chip8Error> {
        let digit = self.regs[x];
        if digit > 0xF {
            return Err(Chip8Error::InvalidFontDigit { digit });
        }
        self.index = FONT_START + FONT_SPRITE_HEIGHT * digit as u16;
        Ok(())
    }

    /// FX33: store the decimal digits of VX at I, I+1, I+2
    fn store_bcd(&mut self, x: usize) -> Result<(), Chip8Error> {
        let vx = self.regs[x];
        let addr = self.index as usize;
        self.check_index_range(3)?;
        self.write_u8(addr, vx / 100)?;
        self.write_u8(addr + 1, vx / 10 % 10)?;
        self.write_u8(addr + 2, vx % 10)
    }

    /// FX55: store V0..=VX at I..=I+X
    fn store_regs(&mut self, x: usize) -> Result<(), Chip8Error> {
        self.check_index_range(x + 1)?;
        for i in 0..=x {
            self.write_u8(self.index as usize + i, self.regs[i])?;
        }
        Ok(())
    }

    /// FX65: load V0..=VX from I..=I+X
    fn load_regs(&mut self, x: usize) -> Result<(), Chip8Error> {
        self.check_index_range(x + 1)?;
        for i in 0..=x {
            self.regs[i] = self.read_u8(self.index as usize + i)?;
        }
        Ok(())
    }

    fn unknown(&mut self, opcode: u16) -> Result<(), Chip8Error> {
        let pc = self.pc - 2;
        match self.unknown_opcodes {
            UnknownOpcodePolicy::Ignore => Ok(()),
            UnknownOpcodePolicy::Log => {
                warn!("ignoring unknown opcode 0x{:04x} at 0x{:03x}", opcode, pc);
                Ok(())
            }
            UnknownOpcodePolicy::Fail => Err(Chip8Error::UnknownOpcode { opcode, pc }),
        }
    }
}

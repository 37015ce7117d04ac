use std::fmt;

/// A raw 16-bit instruction word and its operand fields.
///
/// ```text
/// [o x y n]  o: family, x/y: register indices, n: nibble
/// [o _ k k]  kk: 8-bit immediate
/// [o n n n]  nnn: 12-bit address
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    pub fn family(self) -> u8 {
        ((self.0 & 0xF000) >> 12) as u8
    }

    pub fn x(self) -> usize {
        ((self.0 & 0x0F00) >> 8) as usize
    }

    pub fn y(self) -> usize {
        ((self.0 & 0x00F0) >> 4) as usize
    }

    pub fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    pub fn kk(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    pub fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }
}

/// A decoded CHIP-8 instruction. `x`/`y` are register indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Clear,
    /// 00EE
    Return,
    /// 1nnn
    Jump(u16),
    /// 2nnn
    Call(u16),
    /// 3xkk
    SkipEqImm { x: usize, kk: u8 },
    /// 4xkk
    SkipNeImm { x: usize, kk: u8 },
    /// 5xy0
    SkipEqReg { x: usize, y: usize },
    /// 6xkk
    LoadImm { x: usize, kk: u8 },
    /// 7xkk
    AddImm { x: usize, kk: u8 },
    /// 8xy0
    Move { x: usize, y: usize },
    /// 8xy1
    Or { x: usize, y: usize },
    /// 8xy2
    And { x: usize, y: usize },
    /// 8xy3
    Xor { x: usize, y: usize },
    /// 8xy4
    AddReg { x: usize, y: usize },
    /// 8xy5
    Sub { x: usize, y: usize },
    /// 8xy6
    ShiftRight { x: usize },
    /// 8xy7
    SubN { x: usize, y: usize },
    /// 8xyE
    ShiftLeft { x: usize },
    /// 9xy0
    SkipNeReg { x: usize, y: usize },
    /// Annn
    LoadIndex(u16),
    /// Bnnn
    JumpOffset(u16),
    /// Cxkk
    Random { x: usize, kk: u8 },
    /// Dxyn
    Draw { x: usize, y: usize, n: u8 },
    /// Ex9E
    SkipKeyPressed { x: usize },
    /// ExA1
    SkipKeyNotPressed { x: usize },
    /// Fx07
    ReadDelay { x: usize },
    /// Fx0A
    WaitKey { x: usize },
    /// Fx15
    SetDelay { x: usize },
    /// Fx18
    SetSound { x: usize },
    /// Fx1E
    AddIndex { x: usize },
    /// Fx29
    LoadDigit { x: usize },
    /// Fx33
    StoreBcd { x: usize },
    /// Fx55
    StoreRegs { x: usize },
    /// Fx65
    LoadRegs { x: usize },
    /// Any word without an assigned operation.
    Unknown(u16),
}

impl Instruction {
    /// Decode an instruction word.
    ///
    /// The family nibble selects an operation directly, except for the
    /// families `0`, `8` and `E`, which are further keyed on the low nibble,
    /// and `F`, which is keyed on the low byte.
    pub fn decode(word: u16) -> Instruction {
        let op = Opcode(word);
        let (x, y) = (op.x(), op.y());

        match op.family() {
            0x0 => Self::decode_0(op),
            0x1 => Instruction::Jump(op.nnn()),
            0x2 => Instruction::Call(op.nnn()),
            0x3 => Instruction::SkipEqImm { x, kk: op.kk() },
            0x4 => Instruction::SkipNeImm { x, kk: op.kk() },
            0x5 => Instruction::SkipEqReg { x, y },
            0x6 => Instruction::LoadImm { x, kk: op.kk() },
            0x7 => Instruction::AddImm { x, kk: op.kk() },
            0x8 => Self::decode_8(op),
            0x9 => Instruction::SkipNeReg { x, y },
            0xA => Instruction::LoadIndex(op.nnn()),
            0xB => Instruction::JumpOffset(op.nnn()),
            0xC => Instruction::Random { x, kk: op.kk() },
            0xD => Instruction::Draw { x, y, n: op.n() },
            0xE => Self::decode_e(op),
            _ => Self::decode_f(op),
        }
    }

    /// Keyed on the low nibble only, so `0x0000` and any `0nn0` word decode
    /// as CLS. A program that runs into zeroed memory keeps clearing the
    /// screen rather than tripping [`UnknownOpcodePolicy::Fail`].
    ///
    /// [`UnknownOpcodePolicy::Fail`]: crate::UnknownOpcodePolicy::Fail
    fn decode_0(op: Opcode) -> Instruction {
        match op.n() {
            0x0 => Instruction::Clear,
            0xE => Instruction::Return,
            _ => Instruction::Unknown(op.0),
        }
    }

    fn decode_8(op: Opcode) -> Instruction {
        let (x, y) = (op.x(), op.y());
        match op.n() {
            0x0 => Instruction::Move { x, y },
            0x1 => Instruction::Or { x, y },
            0x2 => Instruction::And { x, y },
            0x3 => Instruction::Xor { x, y },
            0x4 => Instruction::AddReg { x, y },
            0x5 => Instruction::Sub { x, y },
            0x6 => Instruction::ShiftRight { x },
            0x7 => Instruction::SubN { x, y },
            0xE => Instruction::ShiftLeft { x },
            _ => Instruction::Unknown(op.0),
        }
    }

    fn decode_e(op: Opcode) -> Instruction {
        let x = op.x();
        match op.n() {
            0xE => Instruction::SkipKeyPressed { x },
            0x1 => Instruction::SkipKeyNotPressed { x },
            _ => Instruction::Unknown(op.0),
        }
    }

    fn decode_f(op: Opcode) -> Instruction {
        let x = op.x();
        match op.kk() {
            0x07 => Instruction::ReadDelay { x },
            0x0A => Instruction::WaitKey { x },
            0x15 => Instruction::SetDelay { x },
            0x18 => Instruction::SetSound { x },
            0x1E => Instruction::AddIndex { x },
            0x29 => Instruction::LoadDigit { x },
            0x33 => Instruction::StoreBcd { x },
            0x55 => Instruction::StoreRegs { x },
            0x65 => Instruction::LoadRegs { x },
            _ => Instruction::Unknown(op.0),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Clear => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump(nnn) => write!(f, "JP 0x{:03x}", nnn),
            Call(nnn) => write!(f, "CALL 0x{:03x}", nnn),
            SkipEqImm { x, kk } => write!(f, "SE V{:X}, 0x{:02x}", x, kk),
            SkipNeImm { x, kk } => write!(f, "SNE V{:X}, 0x{:02x}", x, kk),
            SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadImm { x, kk } => write!(f, "LD V{:X}, 0x{:02x}", x, kk),
            AddImm { x, kk } => write!(f, "ADD V{:X}, 0x{:02x}", x, kk),
            Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight { x } => write!(f, "SHR V{:X}", x),
            SubN { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft { x } => write!(f, "SHL V{:X}", x),
            SkipNeReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadIndex(nnn) => write!(f, "LD I, 0x{:03x}", nnn),
            JumpOffset(nnn) => write!(f, "JP V0, 0x{:03x}", nnn),
            Random { x, kk } => write!(f, "RND V{:X}, 0x{:02x}", x, kk),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipKeyPressed { x } => write!(f, "SKP V{:X}", x),
            SkipKeyNotPressed { x } => write!(f, "SKNP V{:X}", x),
            ReadDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            SetSound { x } => write!(f, "LD ST, V{:X}", x),
            AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            LoadDigit { x } => write!(f, "LD F, V{:X}", x),
            StoreBcd { x } => write!(f, "LD B, V{:X}", x),
            StoreRegs { x } => write!(f, "LD [I], V{:X}", x),
            LoadRegs { x } => write!(f, "LD V{:X}, [I]", x),
            Unknown(word) => write!(f, "??? 0x{:04x}", word),
        }
    }
}

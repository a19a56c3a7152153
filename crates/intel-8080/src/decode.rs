//! Opcode decoding.
//!
//! Every byte value decodes to exactly one [`Instruction`] through a
//! table built at compile time. Several bytes share an entry: the
//! undocumented NOPs `0x08 0x10 0x18 0x20 0x28 0x30 0x38` and the RET alias
//! `0xD9`. The four bytes left over (`0xCB 0xDD 0xED 0xFD`) decode to
//! [`Instruction::Unimplemented`].

use std::fmt;

/// Register operand in the 3-bit `sss`/`ddd` encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    B,
    C,
    D,
    E,
    H,
    L,
    /// Memory at the address in HL.
    M,
    A,
}

impl Operand {
    const fn from_code(code: u8) -> Self {
        match code & 7 {
            0 => Self::B,
            1 => Self::C,
            2 => Self::D,
            3 => Self::E,
            4 => Self::H,
            5 => Self::L,
            6 => Self::M,
            _ => Self::A,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::H => "H",
            Self::L => "L",
            Self::M => "M",
            Self::A => "A",
        }
    }
}

/// Register pair in the 2-bit `rp` encoding used by LXI, INX, DCX, DAD,
/// LDAX and STAX.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegPair {
    BC,
    DE,
    HL,
    SP,
}

impl RegPair {
    const fn from_code(code: u8) -> Self {
        match code & 3 {
            0 => Self::BC,
            1 => Self::DE,
            2 => Self::HL,
            _ => Self::SP,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::BC => "B",
            Self::DE => "D",
            Self::HL => "H",
            Self::SP => "SP",
        }
    }
}

/// Register pair as used by PUSH and POP, where PSW takes the place of SP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackPair {
    BC,
    DE,
    HL,
    Psw,
}

impl StackPair {
    const fn from_code(code: u8) -> Self {
        match code & 3 {
            0 => Self::BC,
            1 => Self::DE,
            2 => Self::HL,
            _ => Self::Psw,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::BC => "B",
            Self::DE => "D",
            Self::HL => "H",
            Self::Psw => "PSW",
        }
    }
}

/// Branch condition in the 3-bit `ccc` encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    NotZero,
    Zero,
    NoCarry,
    Carry,
    ParityOdd,
    ParityEven,
    Plus,
    Minus,
}

impl Condition {
    const fn from_code(code: u8) -> Self {
        match code & 7 {
            0 => Self::NotZero,
            1 => Self::Zero,
            2 => Self::NoCarry,
            3 => Self::Carry,
            4 => Self::ParityOdd,
            5 => Self::ParityEven,
            6 => Self::Plus,
            _ => Self::Minus,
        }
    }

    const fn suffix(self) -> &'static str {
        match self {
            Self::NotZero => "NZ",
            Self::Zero => "Z",
            Self::NoCarry => "NC",
            Self::Carry => "C",
            Self::ParityOdd => "PO",
            Self::ParityEven => "PE",
            Self::Plus => "P",
            Self::Minus => "M",
        }
    }
}

/// Accumulator operation in the 3-bit `aaa` encoding of the 0x80-0xBF block
/// and the immediate forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbb,
    Ana,
    Xra,
    Ora,
    Cmp,
}

impl AluOp {
    const fn from_code(code: u8) -> Self {
        match code & 7 {
            0 => Self::Add,
            1 => Self::Adc,
            2 => Self::Sub,
            3 => Self::Sbb,
            4 => Self::Ana,
            5 => Self::Xra,
            6 => Self::Ora,
            _ => Self::Cmp,
        }
    }

    const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Adc => "ADC",
            Self::Sub => "SUB",
            Self::Sbb => "SBB",
            Self::Ana => "ANA",
            Self::Xra => "XRA",
            Self::Ora => "ORA",
            Self::Cmp => "CMP",
        }
    }

    const fn immediate_mnemonic(self) -> &'static str {
        match self {
            Self::Add => "ADI",
            Self::Adc => "ACI",
            Self::Sub => "SUI",
            Self::Sbb => "SBI",
            Self::Ana => "ANI",
            Self::Xra => "XRI",
            Self::Ora => "ORI",
            Self::Cmp => "CPI",
        }
    }
}

/// Restart number 0-7. `RST n` calls address `n * 8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Restart(u8);

impl Restart {
    /// Returns `None` for numbers above 7.
    #[must_use]
    pub const fn new(number: u8) -> Option<Self> {
        if number < 8 { Some(Self(number)) } else { None }
    }

    /// Decode an `RST n` opcode (`11nnn111`).
    #[must_use]
    pub const fn from_opcode(opcode: u8) -> Option<Self> {
        if opcode & 0xC7 == 0xC7 {
            Some(Self((opcode >> 3) & 7))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// The opcode byte an interrupting device places on the data bus.
    #[must_use]
    pub const fn opcode(self) -> u8 {
        0xC7 | (self.0 << 3)
    }

    /// Call target.
    #[must_use]
    pub const fn vector(self) -> u16 {
        self.0 as u16 * 8
    }
}

/// A decoded 8080 instruction. Immediate operands are fetched during
/// execution and are not part of the decoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Nop,
    Lxi(RegPair),
    /// Only BC and DE are encodable.
    Stax(RegPair),
    /// Only BC and DE are encodable.
    Ldax(RegPair),
    Inx(RegPair),
    Dcx(RegPair),
    Dad(RegPair),
    Inr(Operand),
    Dcr(Operand),
    Mvi(Operand),
    Rlc,
    Rrc,
    Ral,
    Rar,
    Shld,
    Lhld,
    Sta,
    Lda,
    Daa,
    Cma,
    Stc,
    Cmc,
    /// Destination, source.
    Mov(Operand, Operand),
    Hlt,
    Alu(AluOp, Operand),
    AluImmediate(AluOp),
    Ret,
    Rcc(Condition),
    Jmp,
    Jcc(Condition),
    Call,
    Ccc(Condition),
    Pop(StackPair),
    Push(StackPair),
    Rst(Restart),
    Out,
    In,
    Xthl,
    Xchg,
    Pchl,
    Sphl,
    Di,
    Ei,
    /// Byte values with no documented 8080 meaning.
    Unimplemented,
}

impl Instruction {
    /// Encoded length in bytes, opcode included.
    #[must_use]
    pub const fn length(self) -> u16 {
        match self {
            Self::Lxi(_)
            | Self::Shld
            | Self::Lhld
            | Self::Sta
            | Self::Lda
            | Self::Jmp
            | Self::Jcc(_)
            | Self::Call
            | Self::Ccc(_) => 3,
            Self::Mvi(_) | Self::AluImmediate(_) | Self::Out | Self::In => 2,
            _ => 1,
        }
    }

    /// Cycle cost. `taken` selects between the two costs of conditional
    /// calls and returns; every other instruction ignores it.
    #[must_use]
    pub const fn cycles(self, taken: bool) -> u32 {
        match self {
            Self::Nop
            | Self::Rlc
            | Self::Rrc
            | Self::Ral
            | Self::Rar
            | Self::Daa
            | Self::Cma
            | Self::Stc
            | Self::Cmc
            | Self::Xchg
            | Self::Di
            | Self::Ei
            | Self::Unimplemented => 4,
            Self::Alu(_, Operand::M) | Self::AluImmediate(_) => 7,
            Self::Alu(_, _) => 4,
            Self::Mov(Operand::M, _) | Self::Mov(_, Operand::M) => 7,
            Self::Mov(_, _) | Self::Inx(_) | Self::Dcx(_) | Self::Sphl | Self::Pchl => 5,
            Self::Inr(Operand::M) | Self::Dcr(Operand::M) | Self::Mvi(Operand::M) => 10,
            Self::Inr(_) | Self::Dcr(_) => 5,
            Self::Mvi(_) | Self::Stax(_) | Self::Ldax(_) | Self::Hlt => 7,
            Self::Lxi(_)
            | Self::Dad(_)
            | Self::Jmp
            | Self::Jcc(_)
            | Self::Ret
            | Self::Pop(_)
            | Self::Out
            | Self::In => 10,
            Self::Push(_) | Self::Rst(_) => 11,
            Self::Sta | Self::Lda => 13,
            Self::Shld | Self::Lhld => 16,
            Self::Call => 17,
            Self::Xthl => 18,
            Self::Rcc(_) => {
                if taken {
                    11
                } else {
                    5
                }
            }
            Self::Ccc(_) => {
                if taken {
                    17
                } else {
                    11
                }
            }
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Nop => write!(f, "NOP"),
            Self::Lxi(rp) => write!(f, "LXI {}", rp.name()),
            Self::Stax(rp) => write!(f, "STAX {}", rp.name()),
            Self::Ldax(rp) => write!(f, "LDAX {}", rp.name()),
            Self::Inx(rp) => write!(f, "INX {}", rp.name()),
            Self::Dcx(rp) => write!(f, "DCX {}", rp.name()),
            Self::Dad(rp) => write!(f, "DAD {}", rp.name()),
            Self::Inr(r) => write!(f, "INR {}", r.name()),
            Self::Dcr(r) => write!(f, "DCR {}", r.name()),
            Self::Mvi(r) => write!(f, "MVI {}", r.name()),
            Self::Rlc => write!(f, "RLC"),
            Self::Rrc => write!(f, "RRC"),
            Self::Ral => write!(f, "RAL"),
            Self::Rar => write!(f, "RAR"),
            Self::Shld => write!(f, "SHLD"),
            Self::Lhld => write!(f, "LHLD"),
            Self::Sta => write!(f, "STA"),
            Self::Lda => write!(f, "LDA"),
            Self::Daa => write!(f, "DAA"),
            Self::Cma => write!(f, "CMA"),
            Self::Stc => write!(f, "STC"),
            Self::Cmc => write!(f, "CMC"),
            Self::Mov(dst, src) => write!(f, "MOV {},{}", dst.name(), src.name()),
            Self::Hlt => write!(f, "HLT"),
            Self::Alu(op, r) => write!(f, "{} {}", op.mnemonic(), r.name()),
            Self::AluImmediate(op) => write!(f, "{}", op.immediate_mnemonic()),
            Self::Ret => write!(f, "RET"),
            Self::Rcc(cc) => write!(f, "R{}", cc.suffix()),
            Self::Jmp => write!(f, "JMP"),
            Self::Jcc(cc) => write!(f, "J{}", cc.suffix()),
            Self::Call => write!(f, "CALL"),
            Self::Ccc(cc) => write!(f, "C{}", cc.suffix()),
            Self::Pop(pair) => write!(f, "POP {}", pair.name()),
            Self::Push(pair) => write!(f, "PUSH {}", pair.name()),
            Self::Rst(rst) => write!(f, "RST {}", rst.number()),
            Self::Out => write!(f, "OUT"),
            Self::In => write!(f, "IN"),
            Self::Xthl => write!(f, "XTHL"),
            Self::Xchg => write!(f, "XCHG"),
            Self::Pchl => write!(f, "PCHL"),
            Self::Sphl => write!(f, "SPHL"),
            Self::Di => write!(f, "DI"),
            Self::Ei => write!(f, "EI"),
            Self::Unimplemented => write!(f, "???"),
        }
    }
}

const fn decode_opcode(opcode: u8) -> Instruction {
    let ddd = Operand::from_code(opcode >> 3);
    let sss = Operand::from_code(opcode);
    let rp = RegPair::from_code(opcode >> 4);
    let cc = Condition::from_code(opcode >> 3);

    match opcode {
        0x00 | 0x08 | 0x10 | 0x18 | 0x20 | 0x28 | 0x30 | 0x38 => Instruction::Nop,
        0x01 | 0x11 | 0x21 | 0x31 => Instruction::Lxi(rp),
        0x02 | 0x12 => Instruction::Stax(rp),
        0x0A | 0x1A => Instruction::Ldax(rp),
        0x03 | 0x13 | 0x23 | 0x33 => Instruction::Inx(rp),
        0x0B | 0x1B | 0x2B | 0x3B => Instruction::Dcx(rp),
        0x09 | 0x19 | 0x29 | 0x39 => Instruction::Dad(rp),
        0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => Instruction::Inr(ddd),
        0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => Instruction::Dcr(ddd),
        0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => Instruction::Mvi(ddd),
        0x07 => Instruction::Rlc,
        0x0F => Instruction::Rrc,
        0x17 => Instruction::Ral,
        0x1F => Instruction::Rar,
        0x22 => Instruction::Shld,
        0x2A => Instruction::Lhld,
        0x32 => Instruction::Sta,
        0x3A => Instruction::Lda,
        0x27 => Instruction::Daa,
        0x2F => Instruction::Cma,
        0x37 => Instruction::Stc,
        0x3F => Instruction::Cmc,

        // MOV M,M is HLT.
        0x76 => Instruction::Hlt,
        0x40..=0x7F => Instruction::Mov(ddd, sss),
        0x80..=0xBF => Instruction::Alu(AluOp::from_code(opcode >> 3), sss),

        0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
            Instruction::AluImmediate(AluOp::from_code(opcode >> 3))
        }
        0xC0 | 0xC8 | 0xD0 | 0xD8 | 0xE0 | 0xE8 | 0xF0 | 0xF8 => Instruction::Rcc(cc),
        0xC2 | 0xCA | 0xD2 | 0xDA | 0xE2 | 0xEA | 0xF2 | 0xFA => Instruction::Jcc(cc),
        0xC4 | 0xCC | 0xD4 | 0xDC | 0xE4 | 0xEC | 0xF4 | 0xFC => Instruction::Ccc(cc),
        0xC1 | 0xD1 | 0xE1 | 0xF1 => Instruction::Pop(StackPair::from_code(opcode >> 4)),
        0xC5 | 0xD5 | 0xE5 | 0xF5 => Instruction::Push(StackPair::from_code(opcode >> 4)),
        0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
            Instruction::Rst(Restart((opcode >> 3) & 7))
        }
        0xC3 => Instruction::Jmp,
        0xC9 | 0xD9 => Instruction::Ret,
        0xCD => Instruction::Call,
        0xD3 => Instruction::Out,
        0xDB => Instruction::In,
        0xE3 => Instruction::Xthl,
        0xE9 => Instruction::Pchl,
        0xEB => Instruction::Xchg,
        0xF3 => Instruction::Di,
        0xF9 => Instruction::Sphl,
        0xFB => Instruction::Ei,

        // 0xCB, 0xDD, 0xED, 0xFD
        _ => Instruction::Unimplemented,
    }
}

const fn build_table() -> [Instruction; 256] {
    let mut table = [Instruction::Unimplemented; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = decode_opcode(i as u8);
        i += 1;
    }
    table
}

static DECODE_TABLE: [Instruction; 256] = build_table();

/// Decode an opcode byte.
#[must_use]
pub fn decode(opcode: u8) -> Instruction {
    DECODE_TABLE[usize::from(opcode)]
}

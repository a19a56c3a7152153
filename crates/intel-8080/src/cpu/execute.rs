//! Instruction execution.
//!
//! `execute` runs with PC already past the opcode byte. Immediate operands
//! are fetched as they are needed, so PC ends up past the whole instruction
//! unless the instruction redirects control flow.

use emu_core::{Bus, IoBus};

use super::I8080;
use crate::alu;
use crate::decode::{AluOp, Condition, Instruction, Operand, RegPair, StackPair};

impl I8080 {
    /// Execute a decoded instruction. Returns the cycles consumed.
    pub(super) fn execute<B: IoBus>(
        &mut self,
        bus: &mut B,
        opcode: u8,
        instruction: Instruction,
    ) -> u32 {
        let mut taken = false;

        match instruction {
            Instruction::Nop => {}

            // Data transfer
            Instruction::Mov(dst, src) => {
                let value = self.load(bus, src);
                self.store(bus, dst, value);
            }
            Instruction::Mvi(dst) => {
                let value = self.fetch(bus);
                self.store(bus, dst, value);
            }
            Instruction::Lxi(rp) => {
                let value = self.fetch_word(bus);
                self.set_pair(rp, value);
            }
            Instruction::Lda => {
                let addr = self.fetch_word(bus);
                self.regs.a = bus.read(addr);
            }
            Instruction::Sta => {
                let addr = self.fetch_word(bus);
                bus.write(addr, self.regs.a);
            }
            Instruction::Lhld => {
                let addr = self.fetch_word(bus);
                let value = bus.read_word(addr);
                self.regs.set_hl(value);
            }
            Instruction::Shld => {
                let addr = self.fetch_word(bus);
                bus.write_word(addr, self.regs.hl());
            }
            Instruction::Ldax(rp) => {
                self.regs.a = bus.read(self.pair(rp));
            }
            Instruction::Stax(rp) => {
                bus.write(self.pair(rp), self.regs.a);
            }
            Instruction::Xchg => {
                let de = self.regs.de();
                self.regs.set_de(self.regs.hl());
                self.regs.set_hl(de);
            }

            // Arithmetic and logic
            Instruction::Alu(op, src) => {
                let value = self.load(bus, src);
                self.alu(op, value, src == Operand::M);
            }
            Instruction::AluImmediate(op) => {
                let value = self.fetch(bus);
                self.alu(op, value, false);
            }
            Instruction::Inr(r) => {
                let value = self.load(bus, r).wrapping_add(1);
                self.store(bus, r, value);
                self.regs.flags.set_zsp(u16::from(value));
            }
            Instruction::Dcr(r) => {
                let value = self.load(bus, r).wrapping_sub(1);
                self.store(bus, r, value);
                self.regs.flags.set_zsp(u16::from(value));
            }
            Instruction::Inx(rp) => {
                let value = self.pair(rp).wrapping_add(1);
                self.set_pair(rp, value);
            }
            Instruction::Dcx(rp) => {
                let value = self.pair(rp).wrapping_sub(1);
                self.set_pair(rp, value);
            }
            Instruction::Dad(rp) => {
                let (value, carry) = alu::dad(self.regs.hl(), self.pair(rp));
                self.regs.set_hl(value);
                self.regs.flags.carry = carry;
            }
            Instruction::Daa => {
                let result = alu::daa(self.regs.a, self.regs.flags.carry);
                self.regs.a = result.value;
                self.regs.flags.carry = result.carry;
                self.regs.flags.set_zsp(u16::from(result.value));
            }
            Instruction::Cma => self.regs.a = !self.regs.a,
            Instruction::Stc => self.regs.flags.carry = true,
            Instruction::Cmc => self.regs.flags.carry = !self.regs.flags.carry,

            // Rotates touch carry only
            Instruction::Rlc => self.rotate(alu::rlc(self.regs.a)),
            Instruction::Rrc => self.rotate(alu::rrc(self.regs.a)),
            Instruction::Ral => self.rotate(alu::ral(self.regs.a, self.regs.flags.carry)),
            Instruction::Rar => self.rotate(alu::rar(self.regs.a, self.regs.flags.carry)),

            // Branches
            Instruction::Jmp => {
                self.regs.pc = self.fetch_word(bus);
            }
            Instruction::Jcc(cc) => {
                let addr = self.fetch_word(bus);
                if self.condition(cc) {
                    self.regs.pc = addr;
                }
            }
            Instruction::Call => {
                let addr = self.fetch_word(bus);
                self.push(bus, self.regs.pc);
                self.regs.pc = addr;
            }
            Instruction::Ccc(cc) => {
                let addr = self.fetch_word(bus);
                taken = self.condition(cc);
                if taken {
                    self.push(bus, self.regs.pc);
                    self.regs.pc = addr;
                }
            }
            Instruction::Ret => {
                self.regs.pc = self.pop(bus);
            }
            Instruction::Rcc(cc) => {
                taken = self.condition(cc);
                if taken {
                    self.regs.pc = self.pop(bus);
                }
            }
            Instruction::Rst(restart) => {
                self.push(bus, self.regs.pc);
                self.regs.pc = restart.vector();
            }
            Instruction::Pchl => self.regs.pc = self.regs.hl(),

            // Stack
            Instruction::Push(pair) => {
                let value = self.stack_pair(pair);
                self.push(bus, value);
            }
            Instruction::Pop(pair) => {
                let value = self.pop(bus);
                self.set_stack_pair(pair, value);
            }
            Instruction::Xthl => {
                let sp = self.regs.sp;
                let top = bus.read_word(sp);
                bus.write_word(sp, self.regs.hl());
                self.regs.set_hl(top);
            }
            Instruction::Sphl => self.regs.sp = self.regs.hl(),

            // I/O and machine control
            Instruction::In => {
                let port = self.fetch(bus);
                if let Some(value) = bus.read_io(port) {
                    self.regs.a = value;
                }
            }
            Instruction::Out => {
                let port = self.fetch(bus);
                bus.write_io(port, self.regs.a);
            }
            Instruction::Ei => self.regs.inte = true,
            Instruction::Di => self.regs.inte = false,
            Instruction::Hlt => self.regs.halted = true,

            Instruction::Unimplemented => self.record_unimplemented(opcode),
        }

        instruction.cycles(taken)
    }

    /// Accumulator operation. Every form updates Z, S, P and CY; CMP
    /// discards the result.
    fn alu(&mut self, op: AluOp, value: u8, from_memory: bool) {
        let a = self.regs.a;
        let carry = self.regs.flags.carry;
        let result = match op {
            AluOp::Add => alu::add(a, value, false),
            AluOp::Adc => alu::add(a, value, carry),
            AluOp::Sub | AluOp::Cmp => alu::sub(a, value, false),
            AluOp::Sbb => alu::sub(a, value, carry),
            AluOp::Ana => alu::and(a, value),
            AluOp::Xra => alu::xor(a, value),
            AluOp::Ora => alu::or(a, value),
        };

        self.regs.flags.set_zsp(u16::from(result.value));
        self.regs.flags.carry = result.carry;
        if op == AluOp::Sbb && from_memory && self.quirks.sbb_memory_forces_carry {
            self.regs.flags.carry = true;
        }
        if op != AluOp::Cmp {
            self.regs.a = result.value;
        }
    }

    fn rotate(&mut self, result: alu::AluResult) {
        self.regs.a = result.value;
        self.regs.flags.carry = result.carry;
    }

    const fn condition(&self, cc: Condition) -> bool {
        let f = self.regs.flags;
        match cc {
            Condition::NotZero => !f.zero,
            Condition::Zero => f.zero,
            Condition::NoCarry => !f.carry,
            Condition::Carry => f.carry,
            Condition::ParityOdd => !f.parity,
            Condition::ParityEven => f.parity,
            Condition::Plus => !f.sign,
            Condition::Minus => f.sign,
        }
    }

    fn load<B: Bus>(&self, bus: &mut B, operand: Operand) -> u8 {
        match operand {
            Operand::B => self.regs.b,
            Operand::C => self.regs.c,
            Operand::D => self.regs.d,
            Operand::E => self.regs.e,
            Operand::H => self.regs.h,
            Operand::L => self.regs.l,
            Operand::M => bus.read(self.regs.hl()),
            Operand::A => self.regs.a,
        }
    }

    fn store<B: Bus>(&mut self, bus: &mut B, operand: Operand, value: u8) {
        match operand {
            Operand::B => self.regs.b = value,
            Operand::C => self.regs.c = value,
            Operand::D => self.regs.d = value,
            Operand::E => self.regs.e = value,
            Operand::H => self.regs.h = value,
            Operand::L => self.regs.l = value,
            Operand::M => bus.write(self.regs.hl(), value),
            Operand::A => self.regs.a = value,
        }
    }

    const fn pair(&self, rp: RegPair) -> u16 {
        match rp {
            RegPair::BC => self.regs.bc(),
            RegPair::DE => self.regs.de(),
            RegPair::HL => self.regs.hl(),
            RegPair::SP => self.regs.sp,
        }
    }

    fn set_pair(&mut self, rp: RegPair, value: u16) {
        match rp {
            RegPair::BC => self.regs.set_bc(value),
            RegPair::DE => self.regs.set_de(value),
            RegPair::HL => self.regs.set_hl(value),
            RegPair::SP => self.regs.sp = value,
        }
    }

    const fn stack_pair(&self, pair: StackPair) -> u16 {
        match pair {
            StackPair::BC => self.regs.bc(),
            StackPair::DE => self.regs.de(),
            StackPair::HL => self.regs.hl(),
            StackPair::Psw => self.regs.psw(),
        }
    }

    fn set_stack_pair(&mut self, pair: StackPair, value: u16) {
        match pair {
            StackPair::BC => self.regs.set_bc(value),
            StackPair::DE => self.regs.set_de(value),
            StackPair::HL => self.regs.set_hl(value),
            StackPair::Psw => self.regs.set_psw(value),
        }
    }
}

//! Unit tests for individual 8080 instructions.
//!
//! Each test loads a short program at 0x0000, steps it and checks the
//! resulting register, memory and cycle state.

use std::collections::HashMap;

use emu_core::{Bus, Cpu, IoBus, MEMORY_SIZE, Memory, Ticks};
use intel_8080::{I8080, Instruction, Quirks, Registers, decode};

/// Flat memory plus a map of readable ports and a log of port writes.
struct TestBus {
    mem: Memory,
    inputs: HashMap<u8, u8>,
    outputs: Vec<(u8, u8)>,
}

impl TestBus {
    fn new(program: &[u8]) -> Self {
        let mut mem = Memory::new();
        mem.load(0x0000, program);
        Self {
            mem,
            inputs: HashMap::new(),
            outputs: Vec::new(),
        }
    }
}

impl Bus for TestBus {
    fn read(&mut self, address: u16) -> u8 {
        self.mem.read(address)
    }

    fn write(&mut self, address: u16, value: u8) {
        self.mem.write(address, value);
    }
}

impl IoBus for TestBus {
    fn read_io(&mut self, port: u8) -> Option<u8> {
        self.inputs.get(&port).copied()
    }

    fn write_io(&mut self, port: u8, value: u8) {
        self.outputs.push((port, value));
    }
}

/// Run CPU until it halts, return the cycles consumed.
fn run_until_halt(cpu: &mut I8080, bus: &mut TestBus) -> u64 {
    let mut cycles = 0;
    let mut count = 0;
    while !Cpu::<TestBus>::is_halted(cpu) && count < 10_000 {
        cycles += u64::from(cpu.step(bus));
        count += 1;
    }
    cycles
}

fn setup(program: &[u8]) -> (I8080, TestBus) {
    let mut cpu = I8080::new();
    cpu.regs.sp = 0x2400;
    (cpu, TestBus::new(program))
}

#[test]
fn test_lxi_sta_jmp_end_to_end() {
    let (mut cpu, mut bus) = setup(&[
        0x21, 0x34, 0x12, // LXI H,1234h
        0x3E, 0x99, //       MVI A,99h
        0x32, 0x00, 0x20, // STA 2000h
        0xC3, 0x00, 0x00, // JMP 0000h
    ]);

    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(cpu.regs.hl(), 0x1234);
    assert_eq!(cpu.regs.pc, 3);

    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(cpu.regs.a, 0x99);
    assert_eq!(cpu.regs.pc, 5);

    assert_eq!(cpu.step(&mut bus), 13);
    assert_eq!(bus.mem.peek(0x2000), 0x99);
    assert_eq!(cpu.regs.pc, 8);

    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(cpu.regs.pc, 0);
    assert_eq!(Cpu::<TestBus>::total_ticks(&cpu), Ticks::new(40));
}

#[test]
fn test_nop_aliases_only_touch_pc() {
    for op in [0x00, 0x08, 0x10, 0x18, 0x20, 0x28, 0x30, 0x38] {
        let (mut cpu, mut bus) = setup(&[op]);
        cpu.regs.set_bc(0x1122);
        cpu.regs.set_de(0x3344);
        cpu.regs.set_hl(0x5566);
        cpu.regs.a = 0x77;
        cpu.regs.flags.carry = true;
        let before = cpu.regs;
        let memory_before = bus.mem.slice(0, MEMORY_SIZE).to_vec();

        assert_eq!(cpu.step(&mut bus), 4, "{op:#04X}");

        let mut expected = before;
        expected.pc = 1;
        assert_eq!(cpu.regs, expected, "{op:#04X}");
        assert!(memory_before[..] == *bus.mem.slice(0, MEMORY_SIZE), "{op:#04X}");
    }
}

#[test]
fn test_cpi_equal() {
    let (mut cpu, mut bus) = setup(&[0xFE, 0x05]); // CPI 05h
    cpu.regs.a = 0x05;
    assert_eq!(cpu.step(&mut bus), 7);
    assert!(cpu.regs.flags.zero);
    assert!(!cpu.regs.flags.carry);
    assert_eq!(cpu.regs.a, 0x05);
    assert_eq!(cpu.regs.pc, 2);
}

#[test]
fn test_cmp_borrow() {
    let (mut cpu, mut bus) = setup(&[0xB8]); // CMP B
    cpu.regs.a = 0x02;
    cpu.regs.b = 0x05;
    cpu.step(&mut bus);
    assert!(cpu.regs.flags.carry);
    assert!(!cpu.regs.flags.zero);
    assert!(cpu.regs.flags.sign);
    assert_eq!(cpu.regs.a, 0x02);
}

#[test]
fn test_dad_h_overflow() {
    let (mut cpu, mut bus) = setup(&[0x29]); // DAD H
    cpu.regs.set_hl(0x8000);
    cpu.regs.flags.zero = true;
    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(cpu.regs.hl(), 0x0000);
    assert!(cpu.regs.flags.carry);
    // DAD leaves Z alone.
    assert!(cpu.regs.flags.zero);
}

#[test]
fn test_push_pop_round_trip() {
    // PUSH/POP pairs for BC, DE, HL.
    type Get = fn(&Registers) -> u16;
    type Set = fn(&mut Registers, u16);
    let pairs: [(&str, [u8; 2], Get, Set); 3] = [
        ("BC", [0xC5, 0xC1], Registers::bc, Registers::set_bc),
        ("DE", [0xD5, 0xD1], Registers::de, Registers::set_de),
        ("HL", [0xE5, 0xE1], Registers::hl, Registers::set_hl),
    ];

    for (name, program, get, set) in pairs {
        let (mut cpu, mut bus) = setup(&program);
        for value in 0..=0xFFFFu16 {
            cpu.regs.pc = 0;
            cpu.regs.sp = 0x2400;
            set(&mut cpu.regs, value);

            assert_eq!(cpu.step(&mut bus), 11);
            assert_eq!(cpu.regs.sp, 0x23FE);
            assert_eq!(bus.mem.peek(0x23FF), (value >> 8) as u8);
            assert_eq!(bus.mem.peek(0x23FE), value as u8);

            set(&mut cpu.regs, !value);
            assert_eq!(cpu.step(&mut bus), 10);
            assert_eq!(get(&cpu.regs), value, "{name} {value:#06X}");
            assert_eq!(cpu.regs.sp, 0x2400, "{name} {value:#06X}");
        }
    }
}

#[test]
fn test_push_pop_psw_every_flag_combination() {
    // PUSH PSW; POP PSW
    let (mut cpu, mut bus) = setup(&[0xF5, 0xF1]);
    for bits in 0..16u8 {
        let sign = bits & 1 != 0;
        let zero = bits & 2 != 0;
        let parity = bits & 4 != 0;
        let carry = bits & 8 != 0;
        let a = 0x40 | bits;

        cpu.regs.pc = 0;
        cpu.regs.sp = 0x2400;
        cpu.regs.a = a;
        cpu.regs.flags.sign = sign;
        cpu.regs.flags.zero = zero;
        cpu.regs.flags.parity = parity;
        cpu.regs.flags.carry = carry;

        assert_eq!(cpu.step(&mut bus), 11);
        // S Z 0 AC 0 P 1 CY
        let packed = u8::from(sign) << 7
            | u8::from(zero) << 6
            | u8::from(parity) << 2
            | 0x02
            | u8::from(carry);
        assert_eq!(bus.mem.peek(0x23FE), packed, "{bits:04b}");
        assert_eq!(bus.mem.peek(0x23FF), a);

        cpu.regs.a = !a;
        cpu.regs.flags.sign = !sign;
        cpu.regs.flags.zero = !zero;
        cpu.regs.flags.parity = !parity;
        cpu.regs.flags.carry = !carry;

        assert_eq!(cpu.step(&mut bus), 10);
        assert_eq!(cpu.regs.a, a, "{bits:04b}");
        assert_eq!(cpu.regs.flags.sign, sign, "{bits:04b}");
        assert_eq!(cpu.regs.flags.zero, zero, "{bits:04b}");
        assert_eq!(cpu.regs.flags.parity, parity, "{bits:04b}");
        assert_eq!(cpu.regs.flags.carry, carry, "{bits:04b}");
        assert!(!cpu.regs.flags.aux_carry());
        assert_eq!(cpu.regs.sp, 0x2400);
    }
}

#[test]
fn test_pop_psw_ignores_reserved_bits() {
    let (mut cpu, mut bus) = setup(&[0xF1]);
    bus.mem.write(0x2400, 0xFF);
    bus.mem.write(0x2401, 0x00);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.psw(), 0x00C7);
    assert!(!cpu.regs.flags.aux_carry());
}

#[test]
fn test_call_ret() {
    let mut program = vec![0xCD, 0x10, 0x00, 0x76]; // CALL 0010h; HLT
    program.resize(0x10, 0x00);
    program.push(0xC9); // RET
    let (mut cpu, mut bus) = setup(&program);

    assert_eq!(cpu.step(&mut bus), 17);
    assert_eq!(cpu.regs.pc, 0x0010);
    assert_eq!(cpu.regs.sp, 0x23FE);
    assert_eq!(bus.mem.peek(0x23FE), 0x03);
    assert_eq!(bus.mem.peek(0x23FF), 0x00);

    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(cpu.regs.pc, 0x0003);
    assert_eq!(cpu.regs.sp, 0x2400);
}

#[test]
fn test_ret_alias() {
    let (mut cpu, mut bus) = setup(&[0xD9]);
    bus.mem.write(0x2400, 0x34);
    bus.mem.write(0x2401, 0x12);
    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(cpu.regs.pc, 0x1234);
}

#[test]
fn test_conditional_call_costs() {
    // CZ 1234h with Z clear, then with Z set
    let (mut cpu, mut bus) = setup(&[0xCC, 0x34, 0x12, 0xCC, 0x34, 0x12]);
    assert_eq!(cpu.step(&mut bus), 11);
    assert_eq!(cpu.regs.pc, 3);
    assert_eq!(cpu.regs.sp, 0x2400);

    cpu.regs.flags.zero = true;
    assert_eq!(cpu.step(&mut bus), 17);
    assert_eq!(cpu.regs.pc, 0x1234);
    assert_eq!(bus.mem.read_word(0x23FE), 0x0006);
}

#[test]
fn test_conditional_return_costs() {
    // RNC twice: carry set (not taken), then carry clear (taken)
    let (mut cpu, mut bus) = setup(&[0xD0, 0xD0]);
    bus.mem.write(0x2400, 0x00);
    bus.mem.write(0x2401, 0x30);
    cpu.regs.flags.carry = true;
    assert_eq!(cpu.step(&mut bus), 5);
    assert_eq!(cpu.regs.pc, 1);

    cpu.regs.flags.carry = false;
    assert_eq!(cpu.step(&mut bus), 11);
    assert_eq!(cpu.regs.pc, 0x3000);
}

#[test]
fn test_conditional_jump_same_cost() {
    // JPE 0100h with parity odd, then even
    let (mut cpu, mut bus) = setup(&[0xEA, 0x00, 0x01, 0xEA, 0x00, 0x01]);
    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(cpu.regs.pc, 3);
    cpu.regs.flags.parity = true;
    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(cpu.regs.pc, 0x0100);
}

#[test]
fn test_mov_through_memory() {
    // LXI H,2000h; MVI M,5Ah; MOV B,M; MOV M,A
    let (mut cpu, mut bus) = setup(&[0x21, 0x00, 0x20, 0x36, 0x5A, 0x46, 0x77]);
    cpu.regs.a = 0xA5;
    cpu.step(&mut bus);
    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(bus.mem.peek(0x2000), 0x5A);
    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(cpu.regs.b, 0x5A);
    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(bus.mem.peek(0x2000), 0xA5);
}

#[test]
fn test_inr_dcr_keep_carry() {
    // INR A; DCR B
    let (mut cpu, mut bus) = setup(&[0x3C, 0x05]);
    cpu.regs.a = 0xFF;
    cpu.regs.b = 0x01;
    cpu.regs.flags.carry = true;

    assert_eq!(cpu.step(&mut bus), 5);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.regs.flags.zero);
    assert!(cpu.regs.flags.carry);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.b, 0x00);
    assert!(cpu.regs.flags.zero && cpu.regs.flags.parity);
    assert!(cpu.regs.flags.carry);
}

#[test]
fn test_inr_m() {
    let (mut cpu, mut bus) = setup(&[0x34]); // INR M
    cpu.regs.set_hl(0x2100);
    bus.mem.write(0x2100, 0x7F);
    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(bus.mem.peek(0x2100), 0x80);
    assert!(cpu.regs.flags.sign);
}

#[test]
fn test_inx_dcx_wrap_without_flags() {
    // INX H; DCX B
    let (mut cpu, mut bus) = setup(&[0x23, 0x0B]);
    cpu.regs.set_hl(0xFFFF);
    cpu.regs.set_bc(0x0000);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.hl(), 0x0000);
    assert_eq!(cpu.regs.bc(), 0xFFFF);
    assert!(!cpu.regs.flags.zero);
}

#[test]
fn test_logic_clears_carry() {
    // ANA B; STC; ORI 01h; STC; XRA A
    let (mut cpu, mut bus) = setup(&[0xA0, 0x37, 0xF6, 0x01, 0x37, 0xAF]);
    cpu.regs.a = 0xF0;
    cpu.regs.b = 0x0F;
    cpu.regs.flags.carry = true;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.regs.flags.zero && !cpu.regs.flags.carry);

    cpu.step(&mut bus);
    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(cpu.regs.a, 0x01);
    assert!(!cpu.regs.flags.carry);

    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.regs.flags.zero && cpu.regs.flags.parity && !cpu.regs.flags.carry);
}

#[test]
fn test_adc_sbb_use_carry() {
    // ADC B; SBB C
    let (mut cpu, mut bus) = setup(&[0x88, 0x99]);
    cpu.regs.a = 0xFE;
    cpu.regs.b = 0x01;
    cpu.regs.c = 0x01;
    cpu.regs.flags.carry = true;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.regs.flags.carry && cpu.regs.flags.zero);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0xFE);
    assert!(cpu.regs.flags.carry);
}

#[test]
fn test_sbb_m_quirk() {
    // SBB M with no borrow expected
    let program = [0x9E];
    let (mut cpu, mut bus) = setup(&program);
    cpu.regs.a = 0x10;
    cpu.regs.set_hl(0x2000);
    bus.mem.write(0x2000, 0x01);
    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(cpu.regs.a, 0x0F);
    assert!(!cpu.regs.flags.carry);

    let mut cpu = I8080::with_quirks(Quirks {
        sbb_memory_forces_carry: true,
    });
    cpu.regs.a = 0x10;
    cpu.regs.set_hl(0x2000);
    let mut bus = TestBus::new(&program);
    bus.mem.write(0x2000, 0x01);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x0F);
    assert!(cpu.regs.flags.carry);
}

#[test]
fn test_rotates() {
    // RLC; RAR; RRC; RAL
    let (mut cpu, mut bus) = setup(&[0x07, 0x1F, 0x0F, 0x17]);
    cpu.regs.a = 0x81;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x03);
    assert!(cpu.regs.flags.carry);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x81);
    assert!(cpu.regs.flags.carry);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0xC0);
    assert!(cpu.regs.flags.carry);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x81);
    assert!(cpu.regs.flags.carry);
}

#[test]
fn test_daa_after_bcd_add() {
    // MVI A,38h; ADI 45h; DAA
    let (mut cpu, mut bus) = setup(&[0x3E, 0x38, 0xC6, 0x45, 0x27]);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x7D);
    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.a, 0x83);
    assert!(!cpu.regs.flags.carry);
    assert!(cpu.regs.flags.sign);
}

#[test]
fn test_cma_stc_cmc() {
    // CMA; STC; CMC
    let (mut cpu, mut bus) = setup(&[0x2F, 0x37, 0x3F]);
    cpu.regs.a = 0x51;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0xAE);
    assert!(!cpu.regs.flags.zero);
    cpu.step(&mut bus);
    assert!(cpu.regs.flags.carry);
    cpu.step(&mut bus);
    assert!(!cpu.regs.flags.carry);
}

#[test]
fn test_xchg_xthl() {
    // XCHG; XTHL
    let (mut cpu, mut bus) = setup(&[0xEB, 0xE3]);
    cpu.regs.set_de(0x1111);
    cpu.regs.set_hl(0x2222);
    bus.mem.write(0x2400, 0x33);
    bus.mem.write(0x2401, 0x44);

    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.de(), 0x2222);
    assert_eq!(cpu.regs.hl(), 0x1111);

    assert_eq!(cpu.step(&mut bus), 18);
    assert_eq!(cpu.regs.hl(), 0x4433);
    assert_eq!(bus.mem.read_word(0x2400), 0x1111);
    assert_eq!(cpu.regs.sp, 0x2400);
}

#[test]
fn test_lhld_shld() {
    // LHLD 2000h; SHLD 2010h
    let (mut cpu, mut bus) = setup(&[0x2A, 0x00, 0x20, 0x22, 0x10, 0x20]);
    bus.mem.write(0x2000, 0xCD);
    bus.mem.write(0x2001, 0xAB);
    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(cpu.regs.l, 0xCD);
    assert_eq!(cpu.regs.h, 0xAB);
    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(bus.mem.peek(0x2010), 0xCD);
    assert_eq!(bus.mem.peek(0x2011), 0xAB);
}

#[test]
fn test_ldax_stax() {
    // LDAX B; STAX D
    let (mut cpu, mut bus) = setup(&[0x0A, 0x12]);
    cpu.regs.set_bc(0x2050);
    cpu.regs.set_de(0x2060);
    bus.mem.write(0x2050, 0x77);
    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(cpu.regs.a, 0x77);
    cpu.step(&mut bus);
    assert_eq!(bus.mem.peek(0x2060), 0x77);
}

#[test]
fn test_pchl_sphl() {
    // SPHL; PCHL
    let (mut cpu, mut bus) = setup(&[0xF9, 0xE9]);
    cpu.regs.set_hl(0x3000);
    assert_eq!(cpu.step(&mut bus), 5);
    assert_eq!(cpu.regs.sp, 0x3000);
    assert_eq!(cpu.step(&mut bus), 5);
    assert_eq!(cpu.regs.pc, 0x3000);
}

#[test]
fn test_rst_instruction() {
    let (mut cpu, mut bus) = setup(&[0x00, 0xEF]); // NOP; RST 5
    cpu.step(&mut bus);
    assert_eq!(cpu.step(&mut bus), 11);
    assert_eq!(cpu.regs.pc, 0x0028);
    assert_eq!(bus.mem.read_word(0x23FE), 0x0002);
}

#[test]
fn test_in_out() {
    // IN 01h; IN 07h; OUT 04h
    let (mut cpu, mut bus) = setup(&[0xDB, 0x01, 0xDB, 0x07, 0xD3, 0x04]);
    bus.inputs.insert(0x01, 0x5C);
    cpu.regs.flags.zero = true;

    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(cpu.regs.a, 0x5C);
    // No flags affected.
    assert!(cpu.regs.flags.zero);

    // Undriven port leaves A alone.
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x5C);

    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(bus.outputs, vec![(0x04, 0x5C)]);
    assert_eq!(cpu.regs.pc, 6);
}

#[test]
fn test_ei_di() {
    let (mut cpu, mut bus) = setup(&[0xFB, 0xF3]);
    cpu.step(&mut bus);
    assert!(cpu.regs.inte);
    cpu.step(&mut bus);
    assert!(!cpu.regs.inte);
}

#[test]
fn test_run_until_halt() {
    // MVI B,05h; loop: DCR B; JNZ loop; HLT
    let (mut cpu, mut bus) = setup(&[0x06, 0x05, 0x05, 0xC2, 0x02, 0x00, 0x76]);
    let cycles = run_until_halt(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.b, 0);
    assert_eq!(cpu.regs.pc, 7);
    // MVI 7 + 5 * (DCR 5 + JNZ 10) + HLT 7
    assert_eq!(cycles, 7 + 5 * 15 + 7);
}

#[test]
fn test_pc_advances_by_length() {
    // Every instruction that does not redirect control flow advances PC by
    // its encoded length. Operands are zero so nothing jumps.
    for op in 0..=255u8 {
        let instruction = decode(op);
        let redirects = matches!(
            instruction,
            Instruction::Jmp
                | Instruction::Jcc(_)
                | Instruction::Call
                | Instruction::Ccc(_)
                | Instruction::Ret
                | Instruction::Rcc(_)
                | Instruction::Rst(_)
                | Instruction::Pchl
        );
        if redirects {
            continue;
        }
        let mut program = vec![op, 0x00, 0x00];
        program.resize(0x10, 0x00);
        let (mut cpu, mut bus) = setup(&program);
        cpu.regs.set_hl(0x2000);
        cpu.step(&mut bus);
        assert_eq!(cpu.regs.pc, instruction.length(), "{op:#04X} {instruction}");
    }
}

#[test]
fn test_address_wraps() {
    // STA FFFFh then LHLD FFFFh reads FFFF and 0000.
    let (mut cpu, mut bus) = setup(&[0x3E, 0x12, 0x32, 0xFF, 0xFF, 0x2A, 0xFF, 0xFF]);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(bus.mem.peek(0xFFFF), 0x12);
    assert_eq!(cpu.regs.l, 0x12);
    assert_eq!(cpu.regs.h, 0x3E);
}

//! Integration tests for the frame driver.
//!
//! Small hand-assembled programs stand in for the game ROM so the interrupt
//! cadence, input draining and framebuffer snapshots can be checked
//! without the real ROM set.

use emu_core::{Bus, Cpu, Observable, Value};
use emu_invaders::{
    Button, ConfigError, FRAMEBUFFER_BASE, Invaders, InvadersConfig, InvadersError, RomImage,
    RomSet, VblankPhase,
};

fn board_with(config: &InvadersConfig, segments: &[(u16, &[u8])]) -> Invaders {
    let mut roms = RomSet::new();
    for (i, &(offset, data)) in segments.iter().enumerate() {
        roms.push(RomImage {
            name: format!("segment{i}"),
            offset,
            data: data.to_vec(),
        })
        .unwrap();
    }
    Invaders::new(config, &roms).unwrap()
}

fn board(segments: &[(u16, &[u8])]) -> Invaders {
    board_with(&InvadersConfig::default(), segments)
}

/// EI; spin at 0x0001. RST 1 writes 01h to 2400h, RST 2 writes 02h to
/// 2401h; both re-enable interrupts and return.
fn interrupt_program() -> Invaders {
    board(&[
        (0x0000, &[0xFB, 0xC3, 0x01, 0x00]),
        (0x0008, &[0x3E, 0x01, 0x32, 0x00, 0x24, 0xFB, 0xC9]),
        (0x0010, &[0x3E, 0x02, 0x32, 0x01, 0x24, 0xFB, 0xC9]),
    ])
}

#[test]
fn test_first_boundary_fires_rst1() {
    let mut inv = interrupt_program();

    let cycles = inv.run_half_frame();
    // EI (4) + JMP (10) until the counter reaches 16,666, then RST (11).
    assert_eq!(cycles, 4 + 1667 * 10 + 11);
    assert_eq!(inv.cycle_counter(), 0);
    assert_eq!(inv.half_frame_count(), 1);

    let cpu = inv.cpu();
    assert_eq!(cpu.regs.pc, 0x0008);
    assert_eq!(cpu.regs.sp, 0xEFFE);
    assert!(!cpu.regs.inte);
    assert_eq!(inv.bus().memory.peek(0xEFFE), 0x01);
    assert_eq!(inv.bus().memory.peek(0xEFFF), 0x00);
    assert_eq!(inv.vblank().phase(), VblankPhase::NextIsVblankEnd);
}

#[test]
fn test_vectors_alternate_across_frames() {
    let mut inv = interrupt_program();

    inv.run_half_frame();
    assert_eq!(inv.cpu().regs.pc, 0x0008);

    inv.run_half_frame();
    assert_eq!(inv.cpu().regs.pc, 0x0010);
    assert_eq!(inv.bus().memory.peek(0x2400), 0x01);

    inv.run_half_frame();
    assert_eq!(inv.cpu().regs.pc, 0x0008);
    assert_eq!(inv.bus().memory.peek(0x2401), 0x02);

    // Every handler returned, so the stack holds a single frame.
    assert_eq!(inv.cpu().regs.sp, 0xEFFE);
}

#[test]
fn test_disabled_interrupts_hold_phase() {
    // DI; spin
    let mut inv = board(&[(0x0000, &[0xF3, 0xC3, 0x01, 0x00])]);
    for _ in 0..3 {
        inv.run_half_frame();
    }
    assert_eq!(inv.half_frame_count(), 3);
    assert_eq!(inv.vblank().phase(), VblankPhase::NextIsVblankStart);
    assert_eq!(inv.cpu().regs.sp, 0xF000);
    assert!((1..=3).contains(&inv.cpu().regs.pc));

    // Enabling later fires the start vector first.
    inv.cpu_mut().regs.inte = true;
    inv.run_half_frame();
    assert_eq!(inv.cpu().regs.pc, 0x0008);
}

#[test]
fn test_halt_resumes_on_interrupt() {
    // EI; HLT; JMP 0001h. RST 1: INR B; EI; RET. RST 2: INR C; EI; RET.
    let mut inv = board(&[
        (0x0000, &[0xFB, 0x76, 0xC3, 0x01, 0x00]),
        (0x0008, &[0x04, 0xFB, 0xC9]),
        (0x0010, &[0x0C, 0xFB, 0xC9]),
    ]);

    inv.run_half_frame();
    assert!(!Cpu::<emu_invaders::InvadersBus>::is_halted(inv.cpu()));
    assert_eq!(inv.cpu().regs.pc, 0x0008);

    for _ in 0..3 {
        inv.run_half_frame();
    }
    assert_eq!(inv.cpu().regs.b, 2);
    assert_eq!(inv.cpu().regs.c, 1);
}

#[test]
fn test_framebuffer_snapshot_taken_at_boundary() {
    let mut inv = interrupt_program();

    inv.run_half_frame();
    assert!(inv.frame().iter().all(|&b| b == 0));

    inv.run_half_frame();
    assert_eq!(inv.frame()[0], 0x01);
    assert_eq!(inv.frame()[1], 0x00);

    // Live writes show up in the framebuffer but not the snapshot.
    inv.bus_mut().memory.write(FRAMEBUFFER_BASE + 2, 0xFF);
    assert_eq!(inv.framebuffer()[2], 0xFF);
    assert_eq!(inv.frame()[2], 0x00);
}

#[test]
fn test_scripted_input_drains_at_boundaries() {
    // loop: IN 1; STA 2000h; JMP loop
    let mut inv = board(&[(0x0000, &[0xDB, 0x01, 0x32, 0x00, 0x20, 0xC3, 0x00, 0x00])]);
    inv.input_queue().enqueue_button(Button::Coin, 1, 2);

    inv.run_frame();
    assert!(!inv.bus().inputs.is_pressed(Button::Coin));

    // Third boundary is the first one in frame 1.
    inv.run_half_frame();
    assert!(inv.bus().inputs.is_pressed(Button::Coin));
    inv.run_half_frame();
    assert_eq!(inv.bus().memory.peek(0x2000), 0x01);

    // Released at frame 3.
    for _ in 0..3 {
        inv.run_half_frame();
    }
    assert!(!inv.bus().inputs.is_pressed(Button::Coin));
    inv.run_half_frame();
    assert_eq!(inv.bus().memory.peek(0x2000), 0x00);
    assert!(inv.input_queue().is_empty());
}

#[test]
fn test_shifter_program() {
    // MVI A,3; OUT 2; MVI A,FFh; OUT 4; XRA A; OUT 4; IN 3; STA 2000h; HLT
    let mut inv = board(&[(
        0x0000,
        &[
            0x3E, 0x03, 0xD3, 0x02, 0x3E, 0xFF, 0xD3, 0x04, 0xAF, 0xD3, 0x04, 0xDB, 0x03, 0x32,
            0x00, 0x20, 0x76,
        ],
    )]);
    while !Cpu::<emu_invaders::InvadersBus>::is_halted(inv.cpu()) {
        inv.step();
    }
    assert_eq!(inv.bus().memory.peek(0x2000), 0x1F);
    assert_eq!(inv.query("shifter.result"), Some(Value::U8(0x1F)));
}

#[test]
fn test_half_frame_override() {
    let config = InvadersConfig {
        half_frame_cycles: Some(100),
        ..InvadersConfig::default()
    };
    // Spin on a JMP
    let mut inv = board_with(&config, &[(0x0000, &[0xC3, 0x00, 0x00])]);
    let cycles = inv.run_half_frame();
    // Ten JMPs reach 100 exactly; interrupts are disabled.
    assert_eq!(cycles, 100);
    assert_eq!(inv.query("half_frame_count"), Some(Value::U64(1)));
}

#[test]
fn test_unimplemented_opcode_does_not_stop_frame() {
    let mut inv = board(&[(0x0000, &[0xED, 0xC3, 0x00, 0x00])]);
    inv.run_frame();
    assert!(inv.cpu().unimplemented_count() > 0);
    assert_eq!(inv.cpu().last_unimplemented(), Some(0xED));
    assert_eq!(inv.query("cpu.last_unimplemented"), Some(Value::U8(0xED)));
}

#[test]
fn test_invalid_config_rejected_before_running() {
    let config = InvadersConfig {
        vblank_start_rst: 8,
        ..InvadersConfig::default()
    };
    let result = Invaders::new(&config, &RomSet::new());
    assert!(matches!(
        result,
        Err(InvadersError::Config(ConfigError::InvalidRestart { value: 8, .. }))
    ));
}

#[test]
fn test_unbounded_half_frame_rejected_before_running() {
    let config = InvadersConfig {
        cpu_frequency_hz: u64::MAX,
        ..InvadersConfig::default()
    };
    let result = Invaders::new(&config, &RomSet::new());
    assert!(matches!(
        result,
        Err(InvadersError::Config(ConfigError::HalfFrameTooLong { .. }))
    ));
}

//! End-to-end programs run through `System`.

use nest::bus::BusError;
use nest::cpu::{Status, IRQ_VECTOR, NMI_VECTOR};
use nest::disasm;
use nest::system::System;

fn boot(origin: u16, program: &[u8]) -> System {
    let mut system = System::new();
    system.load_program(origin, program).unwrap();
    system.reset();
    system
}

#[test]
fn lda_then_adc_adds_immediates() {
    let mut system = boot(0x8000, &[0xA9, 0x05, 0x69, 0x03]);

    system.step();
    system.step();

    let regs = system.registers();
    assert_eq!(regs.a, 0x08);
    assert!(!regs.status.contains(Status::ZERO));
    assert!(!regs.status.contains(Status::NEGATIVE));
    assert!(!regs.status.contains(Status::CARRY));
    assert_eq!(regs.pc, 0x8004);
}

#[test]
fn ticks_match_declared_cycle_counts() {
    let mut system = boot(0x8000, &[0xA9, 0x05, 0x69, 0x03]);

    // 8 reset cycles, then 2 + 2 for the two immediates.
    for _ in 0..12 {
        system.tick();
    }
    assert_eq!(system.registers().a, 0x08);
    assert!(system.cpu().is_complete());
    assert_eq!(system.cpu().clock_count(), 12);
}

#[test]
fn countdown_loop_stores_each_value() {
    // LDX #$03
    // loop: TXA; STA $0010,X; DEX; BNE loop
    // BRK
    let program = [0xA2, 0x03, 0x8A, 0x9D, 0x10, 0x00, 0xCA, 0xD0, 0xF9, 0x00];
    let mut system = boot(0x0600, &program);

    let mut steps = 0;
    while system.registers().pc != 0x0609 {
        system.step();
        steps += 1;
        assert!(steps < 100, "loop never finished");
    }

    let bus = system.bus();
    assert_eq!(bus.read(0x0011), 0x01);
    assert_eq!(bus.read(0x0012), 0x02);
    assert_eq!(bus.read(0x0013), 0x03);
    assert_eq!(bus.written(), &[0x0013, 0x0012, 0x0011]);
    assert_eq!(system.registers().x, 0);
    assert!(system.registers().status.contains(Status::ZERO));
}

#[test]
fn subroutine_call_returns_to_caller() {
    // JSR $0610; LDY #$01; ... $0610: LDX #$07; RTS
    let mut program = vec![0x20, 0x10, 0x06, 0xA0, 0x01];
    program.resize(0x10, 0xEA);
    program.extend_from_slice(&[0xA2, 0x07, 0x60]);
    let mut system = boot(0x0600, &program);

    for _ in 0..4 {
        system.step();
    }

    let regs = system.registers();
    assert_eq!((regs.x, regs.y), (0x07, 0x01));
    assert_eq!(regs.pc, 0x0605);
    assert_eq!(regs.sp, 0xFD);
}

#[test]
fn stack_push_from_empty_pointer_wraps() {
    // LDX #$00; TXS; LDA #$5A; PHA
    let mut system = boot(0x8000, &[0xA2, 0x00, 0x9A, 0xA9, 0x5A, 0x48]);

    for _ in 0..4 {
        system.step();
    }
    assert_eq!(system.registers().sp, 0xFF);
    assert_eq!(system.bus().read(0x0100), 0x5A);
}

#[test]
fn irq_is_masked_by_sei_and_nmi_is_not() {
    // SEI; NOP; NOP
    let mut system = boot(0x8000, &[0x78, 0xEA, 0xEA]);
    system.bus_mut().load(IRQ_VECTOR, &[0x00, 0x90]).unwrap();
    system.bus_mut().load(NMI_VECTOR, &[0x00, 0xA0]).unwrap();

    system.step();
    system.irq();
    system.step();
    assert_eq!(system.registers().pc, 0x8002);

    system.nmi();
    assert_eq!(system.registers().pc, 0xA000);
    assert_eq!(system.cpu().cycles(), 8);
}

#[test]
fn irq_handler_returns_with_rti() {
    // main: CLI; NOP; NOP   handler at $9000: INX; RTI
    let mut system = boot(0x8000, &[0x58, 0xEA, 0xEA]);
    system.bus_mut().load(IRQ_VECTOR, &[0x00, 0x90]).unwrap();
    system.bus_mut().load(0x9000, &[0xE8, 0x40]).unwrap();

    system.step();
    system.irq();
    assert_eq!(system.registers().pc, 0x9000);
    assert_eq!(system.cpu().cycles(), 7);
    assert!(system.registers().status.contains(Status::INTERRUPT));

    assert_eq!(system.step(), 2);
    assert_eq!(system.step(), 6);
    let regs = system.registers();
    assert_eq!(regs.pc, 0x8001);
    assert_eq!(regs.x, 0x01);
    assert_eq!(regs.sp, 0xFD);
    assert!(!regs.status.contains(Status::INTERRUPT));
}

#[test]
fn load_program_keeps_vector_supplied_by_image() {
    let mut image = vec![0xEA; 0x4000];
    image[0x3FFC] = 0x00;
    image[0x3FFD] = 0xD0;

    let mut system = System::new();
    system.load_program(0xC000, &image).unwrap();
    system.reset();
    assert_eq!(system.registers().pc, 0xD000);
}

#[test]
fn load_program_leaves_vector_alone_when_image_reaches_one_byte() {
    let mut image = vec![0xEA; 13];
    image[12] = 0x42;

    let mut system = System::new();
    system.load_program(0xFFF0, &image).unwrap();
    assert_eq!(system.bus().read(0xFFFC), 0x42);
    assert_eq!(system.bus().read(0xFFFD), 0x00);

    let mut system = System::new();
    system.load_program(0xFFFD, &[0x77]).unwrap();
    assert_eq!(system.bus().read(0xFFFC), 0x00);
    assert_eq!(system.bus().read(0xFFFD), 0x77);
}

#[test]
fn load_program_rejects_overrun() {
    let mut system = System::new();
    let err = system.load_program(0xFFF0, &[0; 0x20]).unwrap_err();
    assert_eq!(err, BusError::ImageOverrun { origin: 0xFFF0, len: 0x20 });
}

#[test]
fn observers_read_without_side_effects() {
    let mut system = boot(0x8000, &[0xA9, 0x05, 0x85, 0x10]);
    let before = system.registers();

    let listing = disasm::disassemble(system.bus(), 0x8000, 0x8003);
    let dump = system.bus().dump(0x8000, 1);

    assert_eq!(listing.len(), 2);
    assert!(dump[0].starts_with("$8000: A9 05 85 10"));
    assert_eq!(system.registers(), before);
    assert!(system.bus().written().is_empty());

    system.step();
    system.step();
    assert_eq!(system.bus_mut().take_written(), vec![0x0010]);
    assert!(system.bus().written().is_empty());
}

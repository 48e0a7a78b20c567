//! End-to-end execution tests: whole programs as encoded instruction
//! words, run through the fetch loop with a captured console.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::unreadable_literal)] // Instruction encodings are standard hex

use minirv::{
    AccessType, HostConsole, RunOutcome, TrapCause, Vm, VmConfig,
};

/// Lay instruction words out little-endian as a raw image.
fn image(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

/// Load a program at address 0 and run it with a captured console.
fn run(words: &[u32], mem_size: u32) -> (Vm<HostConsole<Vec<u8>>>, RunOutcome) {
    let mut vm = Vm::new(mem_size, HostConsole::new(Vec::new()));
    vm.load_image(0, &image(words)).unwrap();
    let outcome = vm.run(10_000);
    (vm, outcome)
}

fn console_output(vm: Vm<HostConsole<Vec<u8>>>) -> String {
    String::from_utf8(vm.into_handler().into_inner()).unwrap()
}

// addi x10, x0, 10; ecall
const EXIT_SEQ: [u32; 2] = [0x00A00513, 0x00000073];

#[test]
fn store_then_load_round_trip() {
    // add x5, x0, x0
    // sw x5, 100(x0)
    // lw x6, 100(x0)
    let mut words = vec![0x000002B3, 0x06502223, 0x06402303];
    words.extend_from_slice(&EXIT_SEQ);

    let (vm, outcome) = run(&words, 1024);

    assert_eq!(outcome, RunOutcome::Exited);
    assert_eq!(vm.cpu.read_reg(5), 0);
    assert_eq!(vm.cpu.read_reg(6), 0);
    assert_eq!(vm.memory.load_u32(100).unwrap(), 0);
    assert_eq!(vm.total_executed(), 5);
}

#[test]
fn signed_and_unsigned_compares_diverge() {
    // addi x1, x0, -1
    // addi x2, x0, 1
    // slt  x3, x1, x2   (-1 < 1 signed)
    // sltu x4, x1, x2   (0xFFFFFFFF < 1 unsigned is false)
    let mut words = vec![0xFFF00093, 0x00100113, 0x0020A1B3, 0x0020B233];
    words.extend_from_slice(&EXIT_SEQ);

    let (vm, outcome) = run(&words, 1024);

    assert_eq!(outcome, RunOutcome::Exited);
    assert_eq!(vm.cpu.read_reg(3), 1);
    assert_eq!(vm.cpu.read_reg(4), 0);
}

#[test]
fn subword_loads_sign_and_zero_extend() {
    // addi x1, x0, 128
    // sb  x1, 64(x0)
    // lb  x2, 64(x0)   (sign-extends 0x80)
    // lbu x3, 64(x0)   (zero-extends 0x80)
    let mut words = vec![0x08000093, 0x04100023, 0x04000103, 0x04004183];
    words.extend_from_slice(&EXIT_SEQ);

    let (vm, outcome) = run(&words, 1024);

    assert_eq!(outcome, RunOutcome::Exited);
    assert_eq!(vm.cpu.read_reg(2), 0xFFFFFF80);
    assert_eq!(vm.cpu.read_reg(3), 0x80);
}

#[test]
fn branches_skip_only_when_taken() {
    // addi x1, x0, 1
    // beq x1, x0, 8    (not taken)
    // bne x1, x0, 8    (taken, skips the next word)
    // addi x2, x0, 7   (skipped)
    // addi x3, x0, 9
    let mut words = vec![0x00100093, 0x00008463, 0x00009463, 0x00700113, 0x00900193];
    words.extend_from_slice(&EXIT_SEQ);

    let (vm, outcome) = run(&words, 1024);

    assert_eq!(outcome, RunOutcome::Exited);
    assert_eq!(vm.cpu.read_reg(2), 0);
    assert_eq!(vm.cpu.read_reg(3), 9);
}

#[test]
fn writes_to_x0_are_discarded() {
    // addi x0, x0, 5
    let mut words = vec![0x00500013];
    words.extend_from_slice(&EXIT_SEQ);

    let (vm, outcome) = run(&words, 1024);

    assert_eq!(outcome, RunOutcome::Exited);
    assert_eq!(vm.cpu.read_reg(0), 0);
}

#[test]
fn jalr_to_odd_address_traps() {
    // addi x1, x0, 257
    // jalr x0, x1, 0
    let words = [0x10100093, 0x00008067];

    let (_, outcome) = run(&words, 1024);

    assert_eq!(
        outcome,
        RunOutcome::Trap(TrapCause::InstructionMisaligned(0x101))
    );
}

#[test]
fn load_past_memory_end_traps() {
    // lw x1, 64(x0) in a 64-byte machine
    let words = [0x04002083];

    let (_, outcome) = run(&words, 64);

    assert_eq!(
        outcome,
        RunOutcome::Trap(TrapCause::MemoryFault {
            addr: 64,
            access: AccessType::Read,
        })
    );
}

#[test]
fn falling_off_the_program_traps_on_zero_word() {
    // addi x1, x0, 1 with no terminator; the next fetch reads zeroes
    let words = [0x00100093];

    let (vm, outcome) = run(&words, 1024);

    assert_eq!(outcome, RunOutcome::Trap(TrapCause::InvalidInstruction(0)));
    assert_eq!(vm.cpu.pc, 4);
}

#[test]
fn step_limit_stops_an_infinite_loop() {
    // jal x0, 0
    let words = [0x0000006F];

    let mut vm = Vm::new(1024, HostConsole::new(Vec::new()));
    vm.load_image(0, &image(&words)).unwrap();

    assert_eq!(vm.run(10), RunOutcome::StepLimit);
    assert_eq!(vm.total_executed(), 10);
}

#[test]
fn print_int_then_exit() {
    // addi x11, x0, 42
    // addi x10, x0, 1
    // ecall
    let mut words = vec![0x02A00593, 0x00100513, 0x00000073];
    words.extend_from_slice(&EXIT_SEQ);

    let (vm, outcome) = run(&words, 1024);

    assert_eq!(outcome, RunOutcome::Exited);
    assert_eq!(console_output(vm), "42exiting the simulator\n");
}

#[test]
fn print_char_emits_low_byte() {
    // addi x11, x0, 10   (newline)
    // addi x10, x0, 11
    // ecall
    let mut words = vec![0x00A00593, 0x00B00513, 0x00000073];
    words.extend_from_slice(&EXIT_SEQ);

    let (vm, outcome) = run(&words, 1024);

    assert_eq!(outcome, RunOutcome::Exited);
    assert_eq!(console_output(vm), "\nexiting the simulator\n");
}

#[test]
fn print_string_walks_to_nul() {
    // addi x11, x0, 64
    // addi x10, x0, 4
    // ecall
    let mut words = vec![0x04000593, 0x00400513, 0x00000073];
    words.extend_from_slice(&EXIT_SEQ);

    let mut vm = Vm::new(1024, HostConsole::new(Vec::new()));
    vm.load_image(0, &image(&words)).unwrap();
    vm.memory.store_bytes(64, b"hello\0").unwrap();

    assert_eq!(vm.run(10_000), RunOutcome::Exited);
    assert_eq!(console_output(vm), "helloexiting the simulator\n");
}

#[test]
fn unknown_syscall_number_traps() {
    // addi x10, x0, 99
    // ecall
    let words = [0x06300513, 0x00000073];

    let (_, outcome) = run(&words, 1024);

    assert_eq!(outcome, RunOutcome::Trap(TrapCause::UnknownSyscall(99)));
}

#[test]
fn strict_alignment_rejects_misaligned_word_load() {
    // lw x1, 2(x0)
    let words = [0x00202083];

    let config = VmConfig {
        enforce_alignment: true,
    };
    let mut vm = Vm::with_config(1024, HostConsole::new(Vec::new()), config);
    vm.load_image(0, &image(&words)).unwrap();

    assert_eq!(
        vm.run(10),
        RunOutcome::Trap(TrapCause::MemoryFault {
            addr: 2,
            access: AccessType::Read,
        })
    );
}

#[test]
fn upper_immediate_and_arithmetic_shift() {
    // lui  x1, 0x12345
    // srai x2, x1, 4
    let mut words = vec![0x123450B7, 0x4040D113];
    words.extend_from_slice(&EXIT_SEQ);

    let (vm, outcome) = run(&words, 1024);

    assert_eq!(outcome, RunOutcome::Exited);
    assert_eq!(vm.cpu.read_reg(1), 0x12345000);
    assert_eq!(vm.cpu.read_reg(2), 0x01234500);
}

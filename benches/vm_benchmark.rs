//! Benchmarks for the RV32IM execution core.

#![allow(missing_docs)] // Benchmark macros generate undocumented functions
#![allow(clippy::unreadable_literal)] // Instruction encodings are standard hex

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use minirv::{NoSyscalls, Vm};

fn bench_step(c: &mut Criterion) {
    let mut vm = Vm::new(65536, NoSyscalls);

    // Fill memory with a straight line of addi x1, x1, 1
    let addi_x1 = 0x00108093u32;
    for i in 0..(65536 / 4) {
        let _ = vm.memory.store_u32(i * 4, addi_x1);
    }

    c.bench_function("step_addi", |b| {
        b.iter(|| {
            vm.cpu.pc = 0;
            for _ in 0..1000 {
                let _ = black_box(vm.step());
            }
        });
    });
}

fn bench_run_counted_loop(c: &mut Criterion) {
    // addi x1, x0, 2000
    // addi x1, x1, -1
    // bne  x1, x0, -4
    // jal  x0, 0           (spin once the loop is done)
    let program: [u32; 4] = [0x7D000093, 0xFFF08093, 0xFE009EE3, 0x0000006F];
    let image: Vec<u8> = program.iter().flat_map(|w| w.to_le_bytes()).collect();

    let mut vm = Vm::new(65536, NoSyscalls);
    vm.load_image(0, &image).expect("program fits");

    // The trailing spin pins the run to exactly the step budget.
    c.bench_function("run_counted_loop_10k", |b| {
        b.iter(|| {
            vm.cpu.pc = 0;
            vm.cpu.write_reg(1, 0);
            let _ = black_box(vm.run(10_000));
        });
    });
}

fn bench_decode(c: &mut Criterion) {
    use minirv::isa::decode;

    let instructions = [
        0x00108093u32, // addi x1, x1, 1
        0x002081B3u32, // add x3, x1, x2
        0x00208463u32, // beq x1, x2, 8
        0x0000006Fu32, // jal x0, 0
        0x02A00093u32, // addi x1, x0, 42
    ];

    c.bench_function("decode_1000", |b| {
        b.iter(|| {
            for _ in 0..200 {
                for inst in &instructions {
                    let _ = black_box(decode(*inst));
                }
            }
        });
    });
}

criterion_group!(benches, bench_step, bench_run_counted_loop, bench_decode);
criterion_main!(benches);

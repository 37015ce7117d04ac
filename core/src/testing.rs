use crate::chip8::{Chip8, Chip8Builder};

pub(crate) fn assert_stack(chip: &Chip8, expected: &[u16]) {
    assert_eq!(chip.sp as usize, expected.len(), "Unexpected stack size");
    assert_eq!(
        &chip.stack[0..expected.len()],
        expected,
        "Unexpected stack content"
    );
}

pub(crate) fn assert_regs(chip: &Chip8, non_zero_regs: &[(u8, u8)]) {
    for reg in 0..16u8 {
        let expected = non_zero_regs
            .iter()
            .find(|v| v.0 == reg)
            .map(|v| v.1)
            .unwrap_or(0);
        assert_eq!(
            chip.regs[reg as usize], expected,
            "Expected register 0x{:x} to contain 0x{:02x}",
            reg, expected
        );
    }
}

pub(crate) fn setup(rom: &[u8]) -> Chip8 {
    Chip8Builder::new()
        .with_rom(rom.to_vec())
        .with_rng_seed(310349960114u64)
        .build()
        .unwrap()
}

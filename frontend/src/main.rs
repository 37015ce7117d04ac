use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use chip8_vm_core::{
    colorize, Chip8Builder, Chip8Color, UnknownOpcodePolicy, DEFAULT_BACKGROUND_COLOR,
    DEFAULT_FOREGROUND_COLOR, SCREEN_HEIGHT, SCREEN_PITCH, SCREEN_WIDTH,
};
use clap::{Parser, ValueEnum};
use log::{error, info};
use sdl2::pixels::{Color, PixelFormatEnum};

mod keymap;

/// CHIP-8 Emulator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Display scaling factor [1-100]
    #[arg(index = 1, value_parser = clap::value_parser!(u32).range(1..=100))]
    scale: u32,

    /// Delay between cycles in milliseconds
    #[arg(index = 2)]
    delay: u64,

    /// Filepath to Chip-8 ROM file that will be executed
    #[arg(index = 3)]
    rom: PathBuf,

    /// Filepath to font file
    #[arg(long)]
    font: Option<PathBuf>,

    /// Background Color as HEX 0xAABBFF [default: 0x000000]
    #[arg(long)]
    background: Option<Chip8Color>,

    /// Foreground Color as HEX 0xAABBFF [default: 0xFFFFFF]
    #[arg(long)]
    foreground: Option<Chip8Color>,

    /// PRNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// What to do with opcodes that have no assigned instruction
    #[arg(long, value_enum, default_value_t = UnknownOpcodes::Log)]
    unknown_opcodes: UnknownOpcodes,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum UnknownOpcodes {
    Ignore,
    Log,
    Fail,
}

impl From<UnknownOpcodes> for UnknownOpcodePolicy {
    fn from(value: UnknownOpcodes) -> Self {
        match value {
            UnknownOpcodes::Ignore => UnknownOpcodePolicy::Ignore,
            UnknownOpcodes::Log => UnknownOpcodePolicy::Log,
            UnknownOpcodes::Fail => UnknownOpcodePolicy::Fail,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    info!(
        "starting {} at scale {} with {}ms between cycles",
        args.rom.display(),
        args.scale,
        args.delay
    );

    let rom_data = std::fs::read(&args.rom)
        .with_context(|| format!("failed to read ROM file {}", args.rom.display()))?;

    let mut builder = Chip8Builder::new()
        .with_rom(rom_data)
        .with_unknown_opcode_policy(args.unknown_opcodes.into());

    if let Some(font) = &args.font {
        let font_data = std::fs::read(font)
            .with_context(|| format!("failed to read font file {}", font.display()))?;
        builder = builder.with_font(font_data);
    }

    if let Some(seed) = args.seed {
        builder = builder.with_rng_seed(seed);
    }

    let mut chip = builder.build().context("failed to set up the interpreter")?;

    let foreground = args.foreground.unwrap_or(DEFAULT_FOREGROUND_COLOR);
    let background = args.background.unwrap_or(DEFAULT_BACKGROUND_COLOR);

    let sdl_context = sdl2::init().map_err(anyhow::Error::msg)?;
    let video_subsystem = sdl_context.video().map_err(anyhow::Error::msg)?;

    let window = video_subsystem
        .window(
            "chip8-vm",
            SCREEN_WIDTH as u32 * args.scale,
            SCREEN_HEIGHT as u32 * args.scale,
        )
        .position_centered()
        .build()?;

    let mut canvas = window.into_canvas().build()?;

    canvas.set_draw_color(Color::RGB(background.r, background.g, background.b));
    canvas.clear();
    canvas.present();

    // Nearest-neighbor scaling, no blending between pixels
    sdl2::hint::set("SDL_RENDER_SCALE_QUALITY", "0");

    let texture_creator = canvas.texture_creator();
    let mut texture = texture_creator.create_texture_streaming(
        PixelFormatEnum::RGBX8888,
        SCREEN_WIDTH as u32,
        SCREEN_HEIGHT as u32,
    )?;

    let mut event_pump = sdl_context.event_pump().map_err(anyhow::Error::msg)?;

    let delta_update = Duration::from_millis(args.delay);
    let mut next_update = Instant::now();

    'running: loop {
        // Process events
        for event in event_pump.poll_iter() {
            if keymap::handle_event(&event, chip.keypad_mut()) {
                break 'running;
            }
        }

        // Wait until next cycle
        let now = Instant::now();
        if let Some(delay) = next_update.checked_duration_since(now) {
            std::thread::sleep(delay);
            continue;
        }
        next_update = now + delta_update;

        // Execute one CHIP-8 cycle
        if let Err(e) = chip.cycle() {
            error!("halting: {}", e);
            return Err(e.into());
        }

        // If display buffer was changed then draw changes on canvas
        if chip.display().dirty() {
            let frame = colorize(chip.display().pixels(), foreground, background);

            // Copy CHIP-8 display buffer into GPU texture
            texture.update(None, bytemuck::cast_slice(&frame[..]), SCREEN_PITCH)?;

            // Copy texture to Canvas
            canvas.clear();
            canvas.copy(&texture, None, None).map_err(anyhow::Error::msg)?;

            // present canvas on screen
            canvas.present();
            chip.mark_display_clean();
        }
    }

    info!("quit requested, shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_args() {
        let args = Args::try_parse_from(["chip8-vm", "10", "3", "pong.ch8"]).unwrap();

        assert_eq!(args.scale, 10);
        assert_eq!(args.delay, 3);
        assert_eq!(args.rom, PathBuf::from("pong.ch8"));
        assert_eq!(args.unknown_opcodes, UnknownOpcodes::Log);
    }

    #[test]
    fn test_optional_args() {
        let args = Args::try_parse_from([
            "chip8-vm",
            "5",
            "1",
            "pong.ch8",
            "--seed",
            "42",
            "--foreground",
            "0x00FF00",
            "--unknown-opcodes",
            "fail",
        ])
        .unwrap();

        assert_eq!(args.seed, Some(42));
        assert_eq!(args.foreground, Some(Chip8Color::new(0, 255, 0)));
        assert_eq!(
            UnknownOpcodePolicy::from(args.unknown_opcodes),
            UnknownOpcodePolicy::Fail
        );
    }

    #[test]
    fn test_malformed_numbers_rejected() {
        assert!(Args::try_parse_from(["chip8-vm", "ten", "3", "pong.ch8"]).is_err());
        assert!(Args::try_parse_from(["chip8-vm", "10", "-3", "pong.ch8"]).is_err());
        assert!(Args::try_parse_from(["chip8-vm", "0", "3", "pong.ch8"]).is_err());
        assert!(Args::try_parse_from(["chip8-vm", "10", "3"]).is_err());
    }
}

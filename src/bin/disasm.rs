use std::env;
use std::fs;

use anyhow::{Context, Result};

use nest::config::ImageConfig;
use nest::disasm;
use nest::system::System;

fn main() -> Result<()> {
    env_logger::init();

    let config = ImageConfig::from_args(env::args())?;
    let image = fs::read(&config.program)
        .with_context(|| format!("failed to read {}", config.program.display()))?;
    if image.is_empty() {
        println!("{} is empty", config.program.display());
        return Ok(());
    }

    let mut system = System::new();
    system.load_program(config.origin, &image)?;

    let end = (config.origin as usize + image.len() - 1).min(0xFFFF) as u16;
    println!("=== {} at ${:04X}-${:04X} ===", config.program.display(), config.origin, end);

    for line in disasm::disassemble(system.bus(), config.origin, end).values() {
        println!("{}", line);
    }

    Ok(())
}

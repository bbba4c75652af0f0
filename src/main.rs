use std::env;
use std::fs;

use anyhow::{Context, Result};

use nest::config::RunConfig;
use nest::disasm;
use nest::system::System;

const ZERO_PAGE_ROWS: usize = 16;

fn main() -> Result<()> {
    env_logger::init();

    let config = RunConfig::from_args(env::args())?;
    log::info!("Loading program: {}", config.program.display());

    let image = fs::read(&config.program)
        .with_context(|| format!("failed to read {}", config.program.display()))?;

    let mut system = System::new();
    system.load_program(config.origin, &image)?;
    system.reset();

    log::info!("Starting emulation...");

    for _ in 0..config.instructions {
        let pc = system.registers().pc;
        let line = disasm::decode(system.bus(), pc);
        let cycles = system.step();
        log::debug!("{:<32} {} ({} cycles)", line.to_string(), system.registers(), cycles);
    }

    log::info!(
        "Emulation stopped after {} instructions, {} cycles.",
        config.instructions,
        system.cpu().clock_count()
    );

    println!("{}", system.registers());
    for row in system.bus().dump(0x0000, ZERO_PAGE_ROWS) {
        println!("{}", row);
    }
    println!("{} writes logged", system.bus_mut().take_written().len());

    Ok(())
}

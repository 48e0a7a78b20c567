//! minirv CLI - run RV32IM program images in the simulator.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

/// minirv - a deterministic RV32IM instruction-set simulator
#[derive(Parser, Debug)]
#[command(name = "minirv")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute a raw little-endian program image
    Run {
        /// Program image file (raw RV32IM machine code)
        #[arg(required = true)]
        image: std::path::PathBuf,

        /// Address the image is loaded at (decimal or 0x hex)
        #[arg(long, default_value = "0", value_parser = cli::parse_address)]
        load_addr: u32,

        /// Initial program counter (decimal or 0x hex)
        #[arg(short, long, default_value = "0", value_parser = cli::parse_address)]
        entry: u32,

        /// Memory size in bytes
        #[arg(short, long, default_value_t = minirv::DEFAULT_MEMORY_SIZE)]
        memory: u32,

        /// Maximum instructions to execute before giving up
        #[arg(long, default_value = "100000000")]
        max_steps: u64,

        /// Enforce natural alignment on data loads and stores
        #[arg(long)]
        strict_align: bool,

        /// Output format for the final report: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Suppress the final state report (program output still prints)
        #[arg(short, long)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let result = match args.command {
        Commands::Run {
            image,
            load_addr,
            entry,
            memory,
            max_steps,
            strict_align,
            format,
            quiet,
        } => cli::run::execute(
            &image,
            load_addr,
            entry,
            memory,
            max_steps,
            strict_align,
            format,
            quiet,
        ),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

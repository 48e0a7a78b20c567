//! Run command implementation.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use minirv::{HostConsole, RunOutcome, Vm, VmConfig};

use super::output::RunReport;
use super::{CliError, OutputFormat};

/// Execute the run command: load a raw image, run it, report final state.
///
/// # Errors
///
/// Returns an error if the image cannot be read or does not fit in the
/// configured memory.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    image_path: &Path,
    load_addr: u32,
    entry: u32,
    memory: u32,
    max_steps: u64,
    strict_align: bool,
    format: OutputFormat,
    quiet: bool,
) -> Result<ExitCode, CliError> {
    let image = fs::read(image_path)
        .map_err(|e| CliError::new(format!("failed to read {}: {e}", image_path.display())))?;

    let config = VmConfig {
        enforce_alignment: strict_align,
    };
    let mut vm = Vm::with_config(memory, HostConsole::stdout(), config);

    vm.load_image(load_addr, &image)
        .map_err(|e| CliError::new(format!("image does not fit in memory: {e}")))?;
    vm.cpu.pc = entry;

    let outcome = vm.run(max_steps);
    let report = RunReport::new(&vm, outcome);

    if !quiet {
        match format {
            OutputFormat::Text => print!("{}", report.to_text()),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&report)
                    .map_err(|e| CliError::new(format!("failed to serialize report: {e}")))?;
                println!("{json}");
            }
        }
    }

    // Traps are the only failing termination; an explicit exit syscall and
    // an exhausted step budget both leave a success status.
    match outcome {
        RunOutcome::Trap(_) => Ok(ExitCode::FAILURE),
        RunOutcome::Exited | RunOutcome::StepLimit => Ok(ExitCode::SUCCESS),
    }
}

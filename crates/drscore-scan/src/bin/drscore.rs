use std::io;
use std::process::ExitCode;

use drscore_scan::{LogSettings, ScanConfig, init_tracing, run, write_outcome};
use tracing::error;

const EXIT_ERROR: u8 = 1;
const EXIT_GATE_FAILED: u8 = 2;

fn main() -> ExitCode {
    let logging = LogSettings::from_env();
    init_tracing(&logging.filter, logging.format);

    let config = match ScanConfig::from_env(std::env::args().nth(1)) {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "invalid configuration");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let outcome = match run(&config) {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(%err, "scan failed");
            return ExitCode::from(EXIT_ERROR);
        }
    };
    if let Err(err) = write_outcome(io::stdout().lock(), &outcome) {
        error!(%err, "failed to write report");
        return ExitCode::from(EXIT_ERROR);
    }

    if outcome.gate.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_GATE_FAILED)
    }
}

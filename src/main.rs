use std::process::ExitCode;

use anyhow::{Context, Result};
use pam_verify::{Outcome, PamAuthenticator};

fn try_main() -> Result<Outcome> {
    let mut stdout = std::io::stdout().lock();
    pam_verify::run_cli(std::env::args_os(), &PamAuthenticator, &mut stdout)
        .context("Could not write to stdout")
}

pub fn main() -> ExitCode {
    env_logger::init();

    match try_main() {
        Ok(outcome) => outcome.into(),
        Err(error) => {
            log::error!("{:#}", error);
            Outcome::Failed.into()
        }
    }
}

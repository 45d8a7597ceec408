//! Verify a username and password against the host's pluggable
//! authentication modules and report the verdict as an exit status.

use std::ffi::OsString;
use std::io::Write;

pub mod auth;
pub mod cli;
pub mod errors;

pub use auth::{Authenticator, PamAuthenticator};
pub use cli::{Invocation, Request};
pub use errors::{Error, Result};

/// PAM service used when none is given on the command line.
pub const DEFAULT_SERVICE: &str = "login";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Authenticated,
    /// Denied by the stack, or the stack failed while checking.
    Failed,
    Usage,
    /// Help or version text was printed.
    Informational,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Authenticated | Outcome::Informational => 0,
            Outcome::Failed | Outcome::Usage => 1,
        }
    }
}

impl From<Outcome> for std::process::ExitCode {
    fn from(outcome: Outcome) -> Self {
        std::process::ExitCode::from(outcome.exit_code())
    }
}

/// Runs one authentication query.
pub fn run(request: &Request, authenticator: &dyn Authenticator) -> Outcome {
    log::debug!(
        "authenticating user `{}' for service `{}'",
        request.user,
        request.service
    );
    match authenticator.authenticate(&request.user, &request.password, &request.service) {
        Ok(()) => {
            log::info!("user `{}' authenticated", request.user);
            Outcome::Authenticated
        }
        Err(error @ Error::Start { .. }) => {
            log::error!("{}", error);
            Outcome::Failed
        }
        Err(error @ Error::Denied { .. }) => {
            log::warn!("{}", error);
            Outcome::Failed
        }
    }
}

/// Parses `args` (program name first), runs the query and writes any usage,
/// help or version text to `out`.
pub fn run_cli<I, T, W>(args: I, authenticator: &dyn Authenticator, out: &mut W) -> std::io::Result<Outcome>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    W: Write,
{
    match cli::parse(args) {
        Invocation::Verify(request) => Ok(run(&request, authenticator)),
        Invocation::Usage => {
            writeln!(out, "{}", cli::USAGE)?;
            Ok(Outcome::Usage)
        }
        Invocation::Print(text) => {
            write!(out, "{}", text)?;
            Ok(Outcome::Informational)
        }
    }
}

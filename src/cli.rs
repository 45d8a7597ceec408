use std::ffi::OsString;
use std::fmt;

use clap::CommandFactory;
use clap::Parser;

use crate::DEFAULT_SERVICE;

pub const USAGE: &str = "Usage: pam-verify <user> <password> [service]";

const HELP_FLAGS: [&str; 2] = ["-h", "--help"];
const VERSION_FLAGS: [&str; 2] = ["-V", "--version"];

// Only renders `--help` and `--version`. Arguments are never parsed through
// clap, since a password such as `--` or `-h` must reach PAM verbatim.
#[allow(dead_code)]
#[derive(Parser, Debug)]
#[command(
    name = "pam-verify",
    version,
    about = "Check a username and password against the system PAM stack",
    override_usage = "pam-verify <user> <password> [service]",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Args {
    /// Account to authenticate
    user: String,

    /// Password for the account
    password: String,

    /// PAM service whose policy applies [default: login]
    service: Option<String>,
}

/// One authentication query, as read from the command line.
#[derive(Clone, PartialEq, Eq)]
pub struct Request {
    pub user: String,
    pub password: String,
    pub service: String,
}

impl Request {
    pub fn new<U, P>(user: U, password: P, service: Option<String>) -> Self
    where
        U: Into<String>,
        P: Into<String>,
    {
        Self {
            user: user.into(),
            password: password.into(),
            service: service.unwrap_or_else(|| String::from(DEFAULT_SERVICE)),
        }
    }
}

// Keeps the password out of log records and panic messages.
impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("service", &self.service)
            .finish()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Invocation {
    Verify(Request),
    /// Missing or non UTF-8 arguments.
    Usage,
    /// `--help` or `--version` was the only argument; holds the rendered text.
    Print(String),
}

/// Reads `<user> <password> [service]` by position. Every value is taken
/// literally, whatever it looks like. Help and version flags are recognised
/// only when they are the sole argument.
pub fn parse<I, T>(args: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    if let [_, flag] = args.as_slice() {
        if let Some(flag) = flag.to_str() {
            if HELP_FLAGS.contains(&flag) {
                return Invocation::Print(Args::command().render_help().to_string());
            }
            if VERSION_FLAGS.contains(&flag) {
                return Invocation::Print(Args::command().render_version());
            }
        }
    }

    let mut values = Vec::with_capacity(3);
    for (position, arg) in args.into_iter().enumerate().skip(1).take(3) {
        match arg.into_string() {
            Ok(value) => values.push(value),
            Err(_) => {
                log::debug!("argument {} is not valid UTF-8", position);
                return Invocation::Usage;
            }
        }
    }

    let mut values = values.into_iter();
    match (values.next(), values.next()) {
        (Some(user), Some(password)) => {
            Invocation::Verify(Request::new(user, password, values.next()))
        }
        _ => {
            log::debug!("expected at least a user and a password");
            Invocation::Usage
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verify(args: &[&str]) -> Request {
        match parse(args.iter().copied()) {
            Invocation::Verify(request) => request,
            other => panic!("expected a request, got {:?}", other),
        }
    }

    #[test]
    fn service_defaults_to_login() {
        let request = verify(&["pam-verify", "alice", "correctpw"]);
        assert_eq!(Request::new("alice", "correctpw", None), request);
        assert_eq!("login", request.service);
    }

    #[test]
    fn explicit_service_is_passed_through() {
        let request = verify(&["pam-verify", "alice", "correctpw", "sudo"]);
        assert_eq!("sudo", request.service);
    }

    #[test]
    fn missing_arguments_are_a_usage_error() {
        assert_eq!(Invocation::Usage, parse(["pam-verify"]));
        assert_eq!(Invocation::Usage, parse(["pam-verify", "alice"]));
    }

    #[test]
    fn password_may_start_with_a_hyphen() {
        let request = verify(&["pam-verify", "alice", "-secret"]);
        assert_eq!("-secret", request.password);
    }

    #[test]
    fn trailing_arguments_are_ignored() {
        let request = verify(&["pam-verify", "alice", "pw", "sshd", "extra", "more"]);
        assert_eq!(Request::new("alice", "pw", Some(String::from("sshd"))), request);
    }

    #[test]
    fn help_is_printed_not_verified() {
        match parse(["pam-verify", "--help"]) {
            Invocation::Print(text) => assert!(text.contains("<user> <password> [service]")),
            other => panic!("expected help text, got {:?}", other),
        }
    }

    #[test]
    fn flag_lookalikes_after_the_user_are_values() {
        assert_eq!(Request::new("alice", "--help", None), verify(&["pam-verify", "alice", "--help"]));
        assert_eq!(Request::new("alice", "-h", None), verify(&["pam-verify", "alice", "-h"]));
        assert_eq!(Request::new("alice", "-V", None), verify(&["pam-verify", "alice", "-V"]));
        assert_eq!(
            Request::new("alice", "pw", Some(String::from("sudo"))),
            verify(&["pam-verify", "alice", "pw", "sudo", "--help"])
        );
    }

    #[test]
    fn double_dash_is_a_value() {
        assert_eq!(
            Request::new("alice", "--", Some(String::from("sudo"))),
            verify(&["pam-verify", "alice", "--", "sudo"])
        );
        assert_eq!(Request::new("alice", "--", None), verify(&["pam-verify", "alice", "--"]));
        assert_eq!(
            Request::new("alice", "pw", Some(String::from("--"))),
            verify(&["pam-verify", "alice", "pw", "--"])
        );
    }

    #[test]
    fn user_may_start_with_a_hyphen() {
        assert_eq!(Request::new("-bob", "pw", None), verify(&["pam-verify", "-bob", "pw"]));
    }

    #[test]
    fn version_is_printed_only_as_the_sole_argument() {
        assert_eq!(
            Invocation::Print(format!("pam-verify {}\n", env!("CARGO_PKG_VERSION"))),
            parse(["pam-verify", "-V"])
        );
        assert!(matches!(parse(["pam-verify", "--version", "pw"]), Invocation::Verify(_)));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_arguments_are_a_usage_error() {
        use std::os::unix::ffi::OsStringExt;

        let password = OsString::from_vec(vec![0x66, 0xff, 0x6f]);
        let args = vec![OsString::from("pam-verify"), OsString::from("alice"), password];
        assert_eq!(Invocation::Usage, parse(args));
    }

    #[test]
    fn debug_output_redacts_the_password() {
        let request = Request::new("alice", "hunter2", None);
        let rendered = format!("{:?}", request);
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }
}

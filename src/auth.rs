use crate::errors::{Error, Result};

/// A credential check: `Ok(())` means the stack accepted `user` and `password`
/// under the policy named by `service`.
pub trait Authenticator {
    fn authenticate(&self, user: &str, password: &str, service: &str) -> Result<()>;
}

/// Checks credentials against the host PAM stack, using the policy in
/// `/etc/pam.d/<service>`.
///
/// Runs `pam_authenticate` followed by account management. No session is
/// opened and no credentials are established.
#[derive(Clone, Copy, Debug, Default)]
pub struct PamAuthenticator;

impl Authenticator for PamAuthenticator {
    fn authenticate(&self, user: &str, password: &str, service: &str) -> Result<()> {
        let mut client = pam::Client::with_password(service).map_err(|error| Error::Start {
            service: String::from(service),
            error: error.to_string(),
        })?;
        client.conversation_mut().set_credentials(user, password);
        client.authenticate().map_err(|error| Error::Denied {
            user: String::from(user),
            service: String::from(service),
            error: error.to_string(),
        })
    }
}

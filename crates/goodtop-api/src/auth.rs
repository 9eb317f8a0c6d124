// Session authentication
//
// The firmware's login scheme predates any real session handling: the
// "token" is md5(username + password) rendered as lowercase hex, presented
// both as the `admin` cookie on plain GETs and as the `Response` form field
// on the login POST. It must be reproduced bit-for-bit for the device to
// accept the session; this is not a scheme to harden or redesign.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::client::GoodtopClient;
use crate::error::Error;

/// Cookie name the firmware expects the session token under.
pub const SESSION_COOKIE: &str = "admin";

/// Derive the session token from username and password.
///
/// Concatenation with no separator, MD5 over the UTF-8 bytes, lowercase
/// hex. Pure and deterministic: the same credentials always produce the
/// same token.
pub fn session_token(username: &str, password: &SecretString) -> String {
    let combo = format!("{username}{}", password.expose_secret());
    format!("{:x}", md5::compute(combo.as_bytes()))
}

impl GoodtopClient {
    /// Establish a server-side session via `POST /login.cgi`.
    ///
    /// Success is HTTP 200; the response body is not validated. Mutation
    /// paths call this first but proceed regardless of the outcome -- the
    /// device tolerates a missing login for most operations.
    pub(crate) async fn login(&self, http: &reqwest::Client) -> Result<(), Error> {
        let url = self.page_url("login.cgi")?;
        debug!(%url, "logging in");

        let form = [
            ("username", self.username()),
            ("password", self.password().expose_secret()),
            ("language", "EN"),
            ("Response", self.token()),
        ];
        let resp = http
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
            });
        }
        debug!("login accepted");
        Ok(())
    }

    /// Login for a mutation path: failure is logged and swallowed.
    pub(crate) async fn login_best_effort(&self, http: &reqwest::Client) {
        if let Err(err) = self.login(http).await {
            warn!(%err, "login failed, attempting action anyway");
        }
    }
}

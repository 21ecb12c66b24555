//! Admin session: the bearer token and logging out

use crate::error::{ClientError, ClientResult};
use offer_admin_core::config::AuthConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the cookie that carries the bearer token
pub const TOKEN_COOKIE: &str = "token";

/// Notice shown after logging out
pub const LOGGED_OUT_NOTICE: &str = "You're logged out.";

/// Holds the admin bearer token for the lifetime of a run
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
    cookie_file: Option<PathBuf>,
}

impl Session {
    /// Session with an explicit token
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            cookie_file: None,
        }
    }

    /// Session from a `Cookie` header value such as `theme=dark; token=abc`
    pub fn from_cookie_header(header: &str) -> Self {
        Self {
            token: parse_cookie(header, TOKEN_COOKIE),
            cookie_file: None,
        }
    }

    /// Resolve the session from configuration
    ///
    /// An explicit `auth.token` wins over the cookie file. A configured cookie
    /// file that does not exist yields a session without a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the cookie file exists but cannot be read.
    pub fn from_config(auth: &AuthConfig) -> ClientResult<Self> {
        if let Some(token) = auth.token.as_deref().filter(|t| !t.is_empty()) {
            return Ok(Self {
                token: Some(token.to_string()),
                cookie_file: auth.cookie_file.clone(),
            });
        }

        let Some(path) = auth.cookie_file.as_deref() else {
            return Ok(Self::default());
        };

        let token = read_cookie_file(path)?;
        Ok(Self {
            token,
            cookie_file: Some(path.to_path_buf()),
        })
    }

    /// Replace the token, keeping the cookie file so `log_out` still clears it
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Current bearer token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Whether a token is present
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Drop the token and remove the cookie file if one backs this session
    ///
    /// # Errors
    ///
    /// Returns an error if the cookie file exists but cannot be removed.
    pub fn log_out(&mut self) -> ClientResult<&'static str> {
        self.token = None;

        if let Some(path) = self.cookie_file.as_deref() {
            match std::fs::remove_file(path) {
                Ok(()) => debug!(path = %path.display(), "Removed cookie file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(ClientError::Core(e.into())),
            }
        }

        info!("Admin session logged out");
        Ok(LOGGED_OUT_NOTICE)
    }
}

fn read_cookie_file(path: &Path) -> ClientResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(contents
            .lines()
            .find_map(|line| parse_cookie(line, TOKEN_COOKIE))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Cookie file not found");
            Ok(None)
        }
        Err(e) => Err(ClientError::Core(e.into())),
    }
}

/// Extract a cookie value by name from a `Cookie` header value
pub fn parse_cookie(header: &str, name: &str) -> Option<String> {
    let header = header.trim();
    let header = header
        .strip_prefix("Cookie:")
        .map_or(header, str::trim_start);

    header.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name)
            .then(|| value.trim().trim_matches('"').to_string())
            .filter(|v| !v.is_empty())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_parse_cookie() {
        assert_eq!(
            parse_cookie("theme=dark; token=abc123; lang=fr", "token").as_deref(),
            Some("abc123")
        );
        assert_eq!(
            parse_cookie("Cookie: token=\"quoted\"", "token").as_deref(),
            Some("quoted")
        );
        assert!(parse_cookie("theme=dark", "token").is_none());
        assert!(parse_cookie("token=", "token").is_none());
        assert!(parse_cookie("xtoken=1", "token").is_none());
    }

    #[test]
    fn test_from_cookie_header() {
        let session = Session::from_cookie_header("a=b; token=xyz");
        assert_eq!(session.token(), Some("xyz"));
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_explicit_token_wins() {
        let auth = AuthConfig {
            token: Some("explicit".to_string()),
            cookie_file: Some(PathBuf::from("/nonexistent/cookies")),
        };
        let session = Session::from_config(&auth).unwrap();
        assert_eq!(session.token(), Some("explicit"));
    }

    #[test]
    fn test_cookie_file_and_log_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "session=1; token=from-file").unwrap();

        let auth = AuthConfig {
            token: None,
            cookie_file: Some(path.clone()),
        };
        let mut session = Session::from_config(&auth).unwrap();
        assert_eq!(session.token(), Some("from-file"));

        let notice = session.log_out().unwrap();
        assert_eq!(notice, LOGGED_OUT_NOTICE);
        assert!(!session.is_authenticated());
        assert!(!path.exists());
    }

    #[test]
    fn test_token_override_still_logs_out_cookie_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies");
        std::fs::write(&path, "token=from-file\n").unwrap();

        let auth = AuthConfig {
            token: None,
            cookie_file: Some(path.clone()),
        };
        let mut session = Session::from_config(&auth).unwrap().with_token("from-flag");
        assert_eq!(session.token(), Some("from-flag"));

        session.log_out().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_cookie_file_is_anonymous() {
        let auth = AuthConfig {
            token: None,
            cookie_file: Some(PathBuf::from("/nonexistent/dir/cookies")),
        };
        let mut session = Session::from_config(&auth).unwrap();
        assert!(!session.is_authenticated());
        assert!(session.log_out().is_ok());
    }
}

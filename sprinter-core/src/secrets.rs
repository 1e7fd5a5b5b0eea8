//! Credentials for the issue tracker
//!
//! Secrets are stored separately from configuration to avoid accidental sharing.
//! The secrets file is located at `~/.config/sprinter/secrets.toml` and must have
//! restrictive permissions (0600 on Unix).
//!
//! Loading priority:
//! 1. Environment variables (GITHUB_TOKEN, then GH_USERNAME + GH_PASSWORD)
//! 2. Secrets file (~/.config/sprinter/secrets.toml)

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Secrets structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Secrets {
    /// GitHub configuration
    pub github: GitHubSecrets,
}

/// GitHub-related secrets
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubSecrets {
    /// Personal access token
    pub token: Option<String>,

    /// Basic auth user, used when no token is set
    pub username: Option<String>,

    pub password: Option<String>,
}

impl fmt::Debug for GitHubSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubSecrets")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// How to authenticate against GitHub
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Token(String),
    Basic { username: String, password: String },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Token(_) => f.write_str("Token(<redacted>)"),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Secrets {
    /// Load secrets from the default location
    ///
    /// Returns default (empty) secrets if file doesn't exist
    pub fn load() -> Result<Self> {
        let secrets_path = Self::default_secrets_path();

        if let Some(path) = secrets_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load secrets from a specific file with permission checking
    pub fn load_from_file(path: &Path) -> Result<Self> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let metadata = std::fs::metadata(path).map_err(Error::Io)?;
            let mode = metadata.permissions().mode();

            // Readable by group or others
            if mode & 0o077 != 0 {
                return Err(Error::Config(format!(
                    "Secrets file {} has insecure permissions {:o}. \
                     Please run: chmod 600 {}",
                    path.display(),
                    mode & 0o777,
                    path.display()
                )));
            }

            debug!(path = %path.display(), mode = format!("{:o}", mode & 0o777), "Secrets file permissions OK");
        }

        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        let mut secrets: Secrets = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse secrets: {}", e)))?;

        let github = &mut secrets.github;
        github.token = non_empty(github.token.take());
        github.username = non_empty(github.username.take());
        github.password = non_empty(github.password.take());

        Ok(secrets)
    }

    /// Get the default secrets file path
    ///
    /// Returns `~/.config/sprinter/secrets.toml` on Unix
    pub fn default_secrets_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sprinter").join("secrets.toml"))
    }

    /// Resolve credentials with environment variable override
    ///
    /// Priority: GITHUB_TOKEN > GH_USERNAME/GH_PASSWORD > secrets file token >
    /// secrets file username/password
    pub fn credentials(&self) -> Option<Credentials> {
        self.credentials_from(|key| std::env::var(key).ok())
    }

    fn credentials_from(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<Credentials> {
        if let Some(token) = non_empty(lookup("GITHUB_TOKEN")) {
            debug!("Using GitHub token from GITHUB_TOKEN environment variable");
            return Some(Credentials::Token(token));
        }

        if let (Some(username), Some(password)) = (
            non_empty(lookup("GH_USERNAME")),
            non_empty(lookup("GH_PASSWORD")),
        ) {
            debug!(username = %username, "Using basic auth from GH_USERNAME/GH_PASSWORD");
            return Some(Credentials::Basic { username, password });
        }

        let github = &self.github;
        if let Some(token) = non_empty(github.token.clone()) {
            debug!("Using GitHub token from secrets file");
            return Some(Credentials::Token(token));
        }

        if let (Some(username), Some(password)) = (
            non_empty(github.username.clone()),
            non_empty(github.password.clone()),
        ) {
            debug!(username = %username, "Using basic auth from secrets file");
            return Some(Credentials::Basic { username, password });
        }

        None
    }

    /// Like [`Secrets::credentials`], but missing credentials are a
    /// configuration error
    pub fn require_credentials(&self) -> Result<Credentials> {
        self.require_credentials_from(|key| std::env::var(key).ok())
    }

    fn require_credentials_from(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Credentials> {
        self.credentials_from(lookup).ok_or_else(|| {
            Error::config(
                "No GitHub credentials found. Set GITHUB_TOKEN (or GH_USERNAME and \
                 GH_PASSWORD), or add them to the secrets file",
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_secrets() {
        let secrets = Secrets::default();
        assert!(secrets.github.token.is_none());
        assert!(secrets.credentials_from(no_env).is_none());
    }

    #[test]
    fn test_missing_credentials_is_config_error() {
        let result = Secrets::default().require_credentials_from(no_env);
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("GITHUB_TOKEN")));
    }

    #[test]
    fn test_parse_secrets() {
        let toml = r#"
[github]
token = "ghp_xxxxxxxxxxxx"
"#;
        let secrets: Secrets = toml::from_str(toml).unwrap();
        assert_eq!(
            secrets.credentials_from(no_env),
            Some(Credentials::Token("ghp_xxxxxxxxxxxx".to_string()))
        );
    }

    #[test]
    fn test_basic_auth_from_file() {
        let toml = r#"
[github]
username = "rhyolight"
password = "hunter2"
"#;
        let secrets: Secrets = toml::from_str(toml).unwrap();
        assert_eq!(
            secrets.credentials_from(no_env),
            Some(Credentials::Basic {
                username: "rhyolight".to_string(),
                password: "hunter2".to_string()
            })
        );
    }

    #[test]
    fn test_env_token_wins() {
        let secrets = Secrets {
            github: GitHubSecrets {
                token: Some("from_file".to_string()),
                ..Default::default()
            },
        };
        let env: HashMap<&str, &str> = [
            ("GITHUB_TOKEN", " from_env "),
            ("GH_USERNAME", "user"),
            ("GH_PASSWORD", "pass"),
        ]
        .into_iter()
        .collect();

        let credentials = secrets.credentials_from(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(credentials, Some(Credentials::Token("from_env".to_string())));
    }

    #[test]
    fn test_env_basic_auth_needs_both_halves() {
        let secrets = Secrets::default();
        let credentials = secrets
            .credentials_from(|key| (key == "GH_USERNAME").then(|| "user".to_string()));
        assert!(credentials.is_none());
    }

    #[test]
    fn test_debug_redacts() {
        let credentials = Credentials::Basic {
            username: "user".to_string(),
            password: "secret".to_string(),
        };
        let printed = format!("{:?}", credentials);
        assert!(printed.contains("user"));
        assert!(!printed.contains("secret"));
        assert!(!format!("{:?}", Credentials::Token("ghp_abc".to_string())).contains("ghp_abc"));
    }

    #[cfg(unix)]
    #[test]
    fn test_insecure_permissions_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[github]\ntoken = \"test\"").unwrap();

        let perms = std::fs::Permissions::from_mode(0o644);
        std::fs::set_permissions(file.path(), perms).unwrap();

        let result = Secrets::load_from_file(file.path());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("insecure permissions"));
    }

    #[cfg(unix)]
    #[test]
    fn test_secure_permissions_accepted() {
        use std::os::unix::fs::PermissionsExt;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[github]\ntoken = \"  ghp_test  \"").unwrap();

        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(file.path(), perms).unwrap();

        let secrets = Secrets::load_from_file(file.path()).unwrap();
        assert_eq!(secrets.github.token, Some("ghp_test".to_string()));
    }
}

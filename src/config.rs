//! Configuration manager for salthash.
//!
//! Secrets are read from a YAML document (or an `appsettings.json` style
//! JSON document) and may be replaced by environment variables. Nothing is
//! defaulted: a missing key or salt stops the [`Hasher`] from being built.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use zeroize::Zeroizing;

use crate::crypto::Hasher;
use crate::error::{MissingSecret, Result};

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
/// Environment variable overriding the signing key.
pub const KEY_ENV: &str = "SALTHASH_KEY";
/// Environment variable overriding the authentication salt.
pub const AUTH_SALT_ENV: &str = "SALTHASH_AUTH_SALT";

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct Configuration {
    /// Related to hashing secrets.
    #[serde(alias = "CryptoConfigurations")]
    pub crypto: Option<CryptoOptions>,
    #[serde(skip)]
    path: PathBuf,
}

/// Hashing secrets as written in the configuration.
#[derive(Default, Clone, PartialEq, Deserialize)]
pub struct CryptoOptions {
    /// Signing key.
    #[serde(alias = "Key")]
    pub key: Option<String>,
    /// Authentication salt. Its byte length is the length of every
    /// generated salt.
    #[serde(alias = "AuthSalt")]
    pub auth_salt: Option<String>,
}

impl std::fmt::Debug for CryptoOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoOptions")
            .field("key", &self.key.as_ref().map(|_| "[redacted]"))
            .field("auth_salt", &self.auth_salt.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// Validated secret material, ready to build a [`Hasher`].
pub struct Secrets {
    key: Zeroizing<Vec<u8>>,
    auth_salt: Zeroizing<Vec<u8>>,
}

impl Secrets {
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn auth_salt(&self) -> &[u8] {
        &self.auth_salt
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("key_len", &self.key.len())
            .field("auth_salt_len", &self.auth_salt.len())
            .finish()
    }
}

impl Configuration {
    pub fn path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    /// Parse a YAML document.
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse a JSON document.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Reads the configuration file from the specified path or the default
    /// location.
    ///
    /// A missing `config.yaml` at the default location yields an empty
    /// configuration, so secrets may come from the environment only. A
    /// missing file at an explicit path is an error.
    pub fn read(self) -> Result<Self> {
        let explicit = !self.path.as_os_str().is_empty();
        let file_path = if explicit {
            self.path
        } else {
            PathBuf::from(DEFAULT_CONFIG_PATH)
        };

        tracing::debug!(path = %file_path.display(), "reading configuration");

        let content = match fs::read_to_string(&file_path) {
            Ok(content) => content,
            Err(err) if !explicit && err.kind() == ErrorKind::NotFound => {
                tracing::debug!("no configuration file, relying on environment");
                return Ok(Self {
                    path: file_path,
                    ..Default::default()
                });
            },
            Err(err) => return Err(err.into()),
        };

        let mut config = if is_json(&file_path) {
            Self::from_json(&content)?
        } else {
            Self::from_yaml(&content)?
        };
        config.path = file_path;

        Ok(config)
    }

    /// Apply `SALTHASH_KEY` and `SALTHASH_AUTH_SALT` from the process
    /// environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Replace secrets with values returned by `lookup` for
    /// [`KEY_ENV`] and [`AUTH_SALT_ENV`].
    ///
    /// A variable that is set always wins over the file, even when empty.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let key = lookup(KEY_ENV);
        let auth_salt = lookup(AUTH_SALT_ENV);

        if key.is_none() && auth_salt.is_none() {
            return self;
        }

        let crypto = self.crypto.get_or_insert_with(CryptoOptions::default);
        if let Some(key) = key {
            if crypto.key.is_some() {
                tracing::warn!(variable = KEY_ENV, "environment overrides configured key");
            }
            crypto.key = Some(key);
        }
        if let Some(auth_salt) = auth_salt {
            if crypto.auth_salt.is_some() {
                tracing::warn!(
                    variable = AUTH_SALT_ENV,
                    "environment overrides configured authentication salt"
                );
            }
            crypto.auth_salt = Some(auth_salt);
        }

        self
    }

    /// Check that both secrets are present and not empty.
    ///
    /// The key is checked first.
    pub fn secrets(&self) -> Result<Secrets> {
        let crypto = self.crypto.as_ref();

        let key = crypto
            .and_then(|c| c.key.as_deref())
            .filter(|key| !key.is_empty())
            .ok_or(MissingSecret::Key)?;
        let auth_salt = crypto
            .and_then(|c| c.auth_salt.as_deref())
            .filter(|salt| !salt.is_empty())
            .ok_or(MissingSecret::AuthSalt)?;

        Ok(Secrets {
            key: Zeroizing::new(key.as_bytes().to_vec()),
            auth_salt: Zeroizing::new(auth_salt.as_bytes().to_vec()),
        })
    }

    /// Build a [`Hasher`] from validated secrets.
    pub fn hasher(&self) -> Result<Hasher> {
        Hasher::try_from(self.secrets()?)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::Error;

    const YAML: &str = r#"
crypto:
  key: "Ajmnolj1(&1jxçdsu9IQJAÇp)_62LA"
  auth_salt: "}46aSb$]R|jjTtKGY`"
"#;

    const APPSETTINGS: &str = r#"{
  "Logging": { "LogLevel": { "Default": "Information" } },
  "CryptoConfigurations": {
    "Key": "Ajmnolj1(&1jxçdsu9IQJAÇp)_62LA",
    "AuthSalt": "}46aSb$]R|jjTtKGY`"
  }
}"#;

    fn overrides(
        pairs: &[(&str, &str)],
    ) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir()
            .join(format!("salthash-{}-{name}", std::process::id()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_yaml() {
        let config = Configuration::from_yaml(YAML).unwrap();
        let secrets = config.secrets().unwrap();

        assert_eq!(secrets.key().len(), 32);
        assert_eq!(secrets.auth_salt(), "}46aSb$]R|jjTtKGY`".as_bytes());
        assert_eq!(secrets.auth_salt().len(), 18);
    }

    #[test]
    fn test_yaml_aliases() {
        let config = Configuration::from_yaml(
            "CryptoConfigurations:\n  Key: k\n  AuthSalt: s\n",
        )
        .unwrap();
        let secrets = config.secrets().unwrap();

        assert_eq!(secrets.key(), b"k");
        assert_eq!(secrets.auth_salt(), b"s");
    }

    #[test]
    fn test_appsettings_json() {
        let config = Configuration::from_json(APPSETTINGS).unwrap();
        let hasher = config.hasher().unwrap();

        assert_eq!(hasher.salt_len(), 18);
    }

    #[test]
    fn test_multibyte_salt_length() {
        let config =
            Configuration::from_yaml("crypto:\n  key: k\n  auth_salt: çÇ\n").unwrap();

        assert_eq!(config.secrets().unwrap().auth_salt().len(), 4);
    }

    #[test]
    fn test_missing_section() {
        let config = Configuration::from_yaml("other: 1\n").unwrap();
        let err = config.secrets().unwrap_err();

        assert_eq!(err.missing_secret(), Some(MissingSecret::Key));
    }

    #[test]
    fn test_missing_key() {
        let config =
            Configuration::from_yaml("crypto:\n  auth_salt: salt\n").unwrap();

        assert_eq!(
            config.secrets().unwrap_err().missing_secret(),
            Some(MissingSecret::Key)
        );
    }

    #[test]
    fn test_empty_key() {
        let config =
            Configuration::from_yaml("crypto:\n  key: \"\"\n  auth_salt: salt\n")
                .unwrap();

        assert_eq!(
            config.secrets().unwrap_err().missing_secret(),
            Some(MissingSecret::Key)
        );
    }

    #[test]
    fn test_missing_auth_salt() {
        let config = Configuration::from_yaml("crypto:\n  key: key\n").unwrap();

        assert_eq!(
            config.hasher().unwrap_err().missing_secret(),
            Some(MissingSecret::AuthSalt)
        );
    }

    #[test]
    fn test_null_auth_salt() {
        let config =
            Configuration::from_yaml("crypto:\n  key: key\n  auth_salt: ~\n").unwrap();

        assert_eq!(
            config.secrets().unwrap_err().missing_secret(),
            Some(MissingSecret::AuthSalt)
        );
    }

    #[test]
    fn test_overrides_win() {
        let config = Configuration::from_yaml(YAML)
            .unwrap()
            .with_overrides(overrides(&[(KEY_ENV, "env-key")]));
        let secrets = config.secrets().unwrap();

        assert_eq!(secrets.key(), b"env-key");
        assert_eq!(secrets.auth_salt().len(), 18);
    }

    #[test]
    fn test_overrides_without_file() {
        let config = Configuration::default().with_overrides(overrides(&[
            (KEY_ENV, "env-key"),
            (AUTH_SALT_ENV, "env-salt"),
        ]));

        assert_eq!(config.hasher().unwrap().salt_len(), 8);
    }

    #[test]
    fn test_empty_override_fails() {
        let config = Configuration::from_yaml(YAML)
            .unwrap()
            .with_overrides(overrides(&[(AUTH_SALT_ENV, "")]));

        assert_eq!(
            config.secrets().unwrap_err().missing_secret(),
            Some(MissingSecret::AuthSalt)
        );
    }

    #[test]
    fn test_no_overrides() {
        let config = Configuration::from_yaml(YAML).unwrap();
        let same = config.clone().with_overrides(overrides(&[]));

        assert_eq!(config, same);
    }

    #[test]
    fn test_read_yaml_file() {
        let path = temp_file("config.yaml", YAML);
        let config = Configuration::default().path(path.clone()).read().unwrap();
        fs::remove_file(path).unwrap();

        assert_eq!(config.secrets().unwrap().auth_salt().len(), 18);
    }

    #[test]
    fn test_read_json_file() {
        let path = temp_file("appsettings.json", APPSETTINGS);
        let config = Configuration::default().path(path.clone()).read().unwrap();
        fs::remove_file(path).unwrap();

        assert!(config.hasher().is_ok());
    }

    #[test]
    fn test_read_explicit_missing_file() {
        let path = std::env::temp_dir().join("salthash-does-not-exist.yaml");
        let err = Configuration::default().path(path).read().unwrap_err();

        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Configuration::from_yaml("crypto: [unclosed").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Configuration::from_yaml(YAML).unwrap();
        let debug = format!("{:?} {:?}", config, config.secrets().unwrap());

        assert!(!debug.contains("Ajmnolj1"));
        assert!(!debug.contains("}46aSb"));
        assert!(debug.contains("auth_salt_len: 18"));
    }
}

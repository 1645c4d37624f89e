use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::{env, fs};

use grounded_agents_model::{CredentialProvider, Error};

const DEFAULT_ENV_VAR: &str = "GEMINI_API_KEY";

/// A credential provider backed by a key file.
///
/// The key is looked up in this order:
///
/// 1. the key file, with surrounding whitespace trimmed;
/// 2. the environment variable (`GEMINI_API_KEY` unless changed);
/// 3. if interactive, a prompt on the terminal. The entered key is
///    written to the key file so the next run finds it.
///
/// Empty keys are skipped at every step. If nothing yields a key, the
/// provider returns a credential error.
#[derive(Clone, Debug)]
pub struct FileCredentialProvider {
    path: PathBuf,
    env_var: Option<String>,
    interactive: bool,
}

impl FileCredentialProvider {
    /// Creates a provider reading the key from `path`.
    #[inline]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            env_var: Some(DEFAULT_ENV_VAR.to_owned()),
            interactive: false,
        }
    }

    /// Sets the environment variable consulted when the key file is
    /// missing. `None` disables the lookup.
    #[inline]
    pub fn with_env_var(mut self, env_var: Option<&str>) -> Self {
        self.env_var = env_var.map(ToOwned::to_owned);
        self
    }

    /// Enables asking for the key on the terminal as a last resort.
    #[inline]
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Returns the key file path.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_key_file(&self) -> Result<Option<String>, Error> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(non_empty(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::credential().with_reason(format!(
                "failed to read {}: {err}",
                self.path.display()
            ))),
        }
    }

    fn read_env_var(&self) -> Option<String> {
        let name = self.env_var.as_deref()?;
        env::var(name).ok().and_then(non_empty)
    }

    fn ask_user(&self) -> Result<Option<String>, Error> {
        let to_credential_error = |err: io::Error| {
            Error::credential().with_reason(format!("failed to read key: {err}"))
        };

        let mut stderr = io::stderr().lock();
        writeln!(stderr, "Nenhuma chave API encontrada. Digite a chave API:")
            .map_err(to_credential_error)?;
        stderr.flush().map_err(to_credential_error)?;

        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(to_credential_error)?;
        let Some(api_key) = non_empty(line) else {
            return Ok(None);
        };

        if let Err(err) = fs::write(&self.path, &api_key) {
            warn!("failed to save key to {}: {err}", self.path.display());
        }
        Ok(Some(api_key))
    }
}

impl CredentialProvider for FileCredentialProvider {
    fn api_key(&self) -> Result<String, Error> {
        if let Some(api_key) = self.read_key_file()? {
            debug!("using key from {}", self.path.display());
            return Ok(api_key);
        }
        if let Some(api_key) = self.read_env_var() {
            debug!("using key from environment");
            return Ok(api_key);
        }
        if self.interactive {
            if let Some(api_key) = self.ask_user()? {
                return Ok(api_key);
            }
        }
        Err(Error::credential().with_reason(format!(
            "no API key in {} or the environment",
            self.path.display()
        )))
    }
}

#[inline]
fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use grounded_agents_model::ErrorKind;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_read_key_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("api_key.txt");
        fs::write(&path, "  secret-key\n").unwrap();

        let provider = FileCredentialProvider::new(&path).with_env_var(None);
        assert_eq!(provider.api_key().unwrap(), "secret-key");
    }

    #[test]
    fn test_missing_key() {
        let dir = tempdir().unwrap();
        let provider = FileCredentialProvider::new(dir.path().join("api_key.txt"))
            .with_env_var(Some("GROUNDED_AGENTS_TEST_SURELY_UNSET"));
        let err = provider.api_key().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Credential);
    }

    #[test]
    fn test_empty_key_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("api_key.txt");
        fs::write(&path, " \n").unwrap();

        let provider = FileCredentialProvider::new(&path).with_env_var(None);
        assert_eq!(
            provider.api_key().unwrap_err().kind(),
            ErrorKind::Credential
        );
    }
}

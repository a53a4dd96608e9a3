use crate::errors::{AppError, AppResult};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Login credentials for the service.
///
/// The file format is a JSON object with `Email` and `Password` keys;
/// lowercase keys are accepted as well.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    #[serde(rename = "Email", alias = "email")]
    pub email: String,
    #[serde(rename = "Password", alias = "password")]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Reads credentials from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `Credentials` if the file cannot be read, is not valid JSON,
    /// or lacks one of the two fields.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::Credentials(format!(
                "Failed to read credentials file {}: {e}",
                path.display()
            ))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            AppError::Credentials(format!(
                "Failed to parse credentials file {}: {e}",
                path.display()
            ))
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn capitalized_keys_are_parsed() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, r#"{{"Email": "jane@example.com", "Password": "hunter2"}}"#).unwrap();

        let creds = Credentials::from_file(tmp.path()).unwrap();
        assert_eq!(creds.email, "jane@example.com");
        assert_eq!(creds.password, "hunter2");
    }

    #[test]
    fn lowercase_keys_are_parsed() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, r#"{{"email": "jane@example.com", "password": "hunter2"}}"#).unwrap();

        let creds = Credentials::from_file(tmp.path()).unwrap();
        assert_eq!(creds.email, "jane@example.com");
    }

    #[test]
    fn missing_password_errors() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, r#"{{"Email": "jane@example.com"}}"#).unwrap();

        let err = Credentials::from_file(tmp.path()).unwrap_err();
        assert!(matches!(err, AppError::Credentials(_)));
    }

    #[test]
    fn missing_file_errors() {
        let err = Credentials::from_file(Path::new("does/not/exist/.auth")).unwrap_err();
        assert!(matches!(err, AppError::Credentials(_)));
    }

    #[test]
    fn debug_output_hides_password() {
        let creds = Credentials::new("jane@example.com", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("jane@example.com"));
        assert!(!debug.contains("hunter2"));
    }
}

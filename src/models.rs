use crate::constants::*;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// Session token issued by the service after a successful login.
///
/// The token is opaque and gets appended verbatim to every request path
/// once authentication has completed.
#[derive(Clone, PartialEq, Eq)]
pub struct Session(String);

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Session(<{} chars>)", self.0.len())
    }
}

/// One salary statement as described by the document listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub year: i32,
    pub month: u32,
    pub name: String,
    pub download_path: String,
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub doc_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub read: bool,
    /// Creation time as reported by the service (milliseconds since the epoch)
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: i64,
}

impl Document {
    /// Path of the document below the API base, without the session suffix.
    pub fn remote_path(&self) -> String {
        format!("{}/{}", self.download_path, self.name)
    }

    /// Canonical output file name: `<year>-<MonthName>.pdf`.
    pub fn file_name(&self) -> AppResult<String> {
        Ok(format!(
            "{}-{}.{DOCUMENT_EXTENSION}",
            self.year,
            month_name(self.month)?
        ))
    }

    /// Output file name disambiguated by the document name:
    /// `<year>-<MonthName>-<name stem>.pdf`.
    pub fn suffixed_file_name(&self) -> AppResult<String> {
        let stem = self
            .name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .filter(|stem| !stem.is_empty())
            .unwrap_or(&self.name);
        let stem: String = stem
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();

        Ok(format!(
            "{}-{}-{stem}.{DOCUMENT_EXTENSION}",
            self.year,
            month_name(self.month)?
        ))
    }
}

/// One employment relationship in the document listing response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub employee: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub employer: String,
    /// Opaque value, shape not defined by the service
    #[serde(default)]
    pub activation_key: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub documents: Vec<Document>,
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response body of `GET /me/e`.
pub type AccountEnvelope = Vec<Account>;

/// Response body of `POST /auth`.
#[derive(Debug, Deserialize)]
pub(crate) struct UrpResponse {
    pub urp: String,
}

/// Returns the English month name for `month` (1 = January).
pub fn month_name(month: u32) -> AppResult<&'static str> {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
        .ok_or(AppError::InvalidMonth(month))
}

/// What to do when two documents map to the same output file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum CollisionPolicy {
    /// Later documents replace earlier ones (logged as a warning)
    #[default]
    Overwrite,
    /// Abort the run before the second download
    Fail,
    /// Save later documents under a name that includes the document name
    Suffix,
}

impl CollisionPolicy {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Overwrite => "overwrite",
            Self::Fail => "fail",
            Self::Suffix => "suffix",
        }
    }
}

impl FromStr for CollisionPolicy {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lower = value.trim().to_lowercase();

        if OVERWRITE_ALIASES.contains(&lower.as_str()) {
            Ok(Self::Overwrite)
        } else if FAIL_ALIASES.contains(&lower.as_str()) {
            Ok(Self::Fail)
        } else if SUFFIX_ALIASES.contains(&lower.as_str()) {
            Ok(Self::Suffix)
        } else {
            Err(AppError::Config(format!(
                "Unknown collision policy '{value}', expected one of: overwrite, fail, suffix"
            )))
        }
    }
}

impl TryFrom<String> for CollisionPolicy {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

//! Tenant binding types: API revision and credential pair.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{REVISION_V1_ROOT, REVISION_V2_ROOT};
use crate::errors::HelpdeskError;

/// Authentication/versioning scheme of the upstream helpdesk API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Revision {
    V1,
    #[default]
    V2,
}

impl Revision {
    /// Path root under which this revision's endpoints live.
    pub const fn root(self) -> &'static str {
        match self {
            Self::V1 => REVISION_V1_ROOT,
            Self::V2 => REVISION_V2_ROOT,
        }
    }

    /// Select the revision whose root prefixes `path`.
    ///
    /// Returns `None` for paths outside both API roots; such requests are
    /// sent without authentication.
    pub fn from_path(path: &str) -> Option<Self> {
        [Self::V2, Self::V1].into_iter().find(|revision| {
            path.strip_prefix(revision.root()).is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => f.write_str("v1"),
            Self::V2 => f.write_str("v2"),
        }
    }
}

impl FromStr for Revision {
    type Err = HelpdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" => Ok(Self::V1),
            "v2" => Ok(Self::V2),
            other => Err(HelpdeskError::Config(format!("unknown API revision '{other}'"))),
        }
    }
}

/// Key pair used to sign requests for one tenant.
///
/// The private key never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(alias = "publicKey")]
    pub public_key: String,
    #[serde(alias = "privateKey")]
    pub private_key: String,
}

impl Credentials {
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self { public_key: public_key.into(), private_key: private_key.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revision_is_selected_by_path_prefix() {
        assert_eq!(Revision::from_path("/api/v2/departments"), Some(Revision::V2));
        assert_eq!(Revision::from_path("/api/v1/tags"), Some(Revision::V1));
        assert_eq!(Revision::from_path("/api/v3/tags"), None);
        assert_eq!(Revision::from_path("/api/v2"), None);
        assert_eq!(Revision::from_path("/api/v20/tags"), None);
        assert_eq!(Revision::from_path("/helpdesk/api/v2/tags"), None);
    }

    #[test]
    fn revision_parses_case_insensitively() {
        assert_eq!("V1".parse::<Revision>().unwrap(), Revision::V1);
        assert_eq!(" v2 ".parse::<Revision>().unwrap(), Revision::V2);
        assert!(matches!("v9".parse::<Revision>(), Err(HelpdeskError::Config(_))));
    }

    #[test]
    fn credentials_debug_redacts_private_key() {
        let creds = Credentials::new("pub-123", "very-secret");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("pub-123"));
        assert!(!rendered.contains("very-secret"));
    }
}

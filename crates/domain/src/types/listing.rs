//! Listable endpoints and request search parameters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upstream collections that can be fetched as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListEndpoint {
    Departments,
    Topics,
    Tags,
    Agents,
    Teams,
}

impl ListEndpoint {
    pub const ALL: [Self; 5] =
        [Self::Departments, Self::Topics, Self::Tags, Self::Agents, Self::Teams];

    /// Inbound action name that selects this endpoint.
    pub const fn action(self) -> &'static str {
        match self {
            Self::Departments => "getDepartments",
            Self::Topics => "getTopics",
            Self::Tags => "getTags",
            Self::Agents => "getAgents",
            Self::Teams => "getTeams",
        }
    }

    /// Path segment relative to the tenant's revision root.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Departments => "departments",
            Self::Topics => "topics",
            Self::Tags => "tags",
            Self::Agents => "staff",
            Self::Teams => "teams",
        }
    }

    pub fn from_action(action: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|endpoint| endpoint.action() == action)
    }

    /// Code used in `ERR_API_HELPDESK_LIST_<CODE>` messages.
    pub fn error_code(self) -> String {
        self.path().to_ascii_uppercase().replace('-', "_")
    }
}

impl fmt::Display for ListEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Ordered query parameters for a list request.
///
/// Setting an existing key replaces its value in place, so pagination can
/// advance `offset`/`limit` without disturbing caller-supplied filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.pairs.iter().position(|(k, _)| k == key)?;
        Some(self.pairs.remove(index).1)
    }

    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

impl<K, V> FromIterator<(K, V)> for SearchParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}

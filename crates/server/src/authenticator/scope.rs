//! Scopes the StackExchange authorization endpoint understands.

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scope {
    ReadInbox,
    NoExpiry,
    WriteAccess,
    PrivateInfo,
}

impl Scope {
    /// Every recognized scope, in the order they are sent to the provider.
    pub const ALL: [Scope; 4] = [
        Scope::ReadInbox,
        Scope::NoExpiry,
        Scope::WriteAccess,
        Scope::PrivateInfo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Scope::ReadInbox => "read_inbox",
            Scope::NoExpiry => "no_expiry",
            Scope::WriteAccess => "write_access",
            Scope::PrivateInfo => "private_info",
        }
    }
}

impl FromStr for Scope {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of scopes enabled in configuration.
///
/// Accepts either a YAML list or a single space-separated string (the form an
/// environment override produces). Unrecognized names are dropped with a
/// warning rather than failing configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScopeSet {
    enabled: [bool; 4],
}

impl ScopeSet {
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut set = ScopeSet::default();
        for name in names {
            match name.parse::<Scope>() {
                Ok(scope) => set.insert(scope),
                Err(()) => tracing::warn!(scope = name, "Ignoring unrecognized StackExchange scope"),
            }
        }
        set
    }

    pub fn insert(&mut self, scope: Scope) {
        self.enabled[scope as usize] = true;
    }

    pub fn contains(&self, scope: Scope) -> bool {
        self.enabled[scope as usize]
    }

    pub fn is_empty(&self) -> bool {
        !self.enabled.iter().any(|on| *on)
    }

    pub fn iter(&self) -> impl Iterator<Item = Scope> + '_ {
        Scope::ALL.into_iter().filter(|scope| self.contains(*scope))
    }

    /// The value of the `scope` query parameter.
    pub fn to_query_value(&self) -> String {
        self.iter().map(Scope::as_str).collect::<Vec<_>>().join(" ")
    }
}

impl<'de> Deserialize<'de> for ScopeSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Joined(String),
            List(Vec<String>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Joined(joined) => ScopeSet::from_names(joined.split_whitespace()),
            Raw::List(list) => ScopeSet::from_names(list.iter().map(String::as_str)),
        })
    }
}

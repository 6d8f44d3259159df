//! Voice identifiers and refresh scopes.

use crate::{Error, ErrorContext};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Scope narrowing which voices a refresh returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceFilter {
    #[default]
    All,
    /// Stock voices offered by the provider.
    System,
    /// Voices produced by quick cloning.
    VoiceCloning,
    /// Voices designed from a text prompt.
    VoiceGeneration,
}

impl VoiceFilter {
    pub const ALL: [VoiceFilter; 4] = [
        VoiceFilter::All,
        VoiceFilter::System,
        VoiceFilter::VoiceCloning,
        VoiceFilter::VoiceGeneration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::System => "system",
            Self::VoiceCloning => "voice_cloning",
            Self::VoiceGeneration => "voice_generation",
        }
    }
}

impl fmt::Display for VoiceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoiceFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == normalized)
            .ok_or_else(|| {
                Error::validation_with_context(
                    format!("Unknown voice filter '{}'", s),
                    ErrorContext::new()
                        .with_field_path("voice_type")
                        .with_details("expected one of: all, system, voice_cloning, voice_generation"),
                )
            })
    }
}

/// Ordered voice identifiers from the latest successful refresh.
///
/// Always empty or made of unique, non-blank strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VoiceList(Vec<String>);

impl VoiceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from server data: blank entries are dropped and repeated
    /// identifiers keep their first position.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let voices = names
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| !name.trim().is_empty())
            .filter(|name| seen.insert(name.clone()))
            .collect();
        Self(voices)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, voice: &str) -> bool {
        self.0.iter().any(|v| v == voice)
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Selection that survives a switch to this list: the previous voice when
    /// still present, else the first entry, else nothing.
    pub fn reconcile(&self, previous: Option<&str>) -> Option<String> {
        match previous {
            Some(voice) if self.contains(voice) => Some(voice.to_string()),
            _ => self.first().map(str::to_string),
        }
    }
}

impl<'a> IntoIterator for &'a VoiceList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

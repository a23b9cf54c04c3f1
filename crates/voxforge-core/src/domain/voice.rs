//! Voice profiles and library filtering.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::parameters::VoiceId;

/// Where a voice comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceKind {
    /// Bundled stock voice.
    Preset,
    /// Curated studio voice.
    Professional,
    /// Voice produced by a cloning run in this session.
    Custom,
}

impl VoiceKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preset => "preset",
            Self::Professional => "professional",
            Self::Custom => "custom",
        }
    }

    /// Whether voices of this kind may be removed from the catalog.
    #[must_use]
    pub const fn is_removable(self) -> bool {
        matches!(self, Self::Custom)
    }
}

impl fmt::Display for VoiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preset" => Ok(Self::Preset),
            "professional" => Ok(Self::Professional),
            "custom" => Ok(Self::Custom),
            other => Err(format!(
                "Unknown voice kind '{other}' (expected preset, professional or custom)"
            )),
        }
    }
}

/// Voice gender as shown in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceGender {
    Female,
    Male,
    Unknown,
}

impl fmt::Display for VoiceGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Female => "female",
            Self::Male => "male",
            Self::Unknown => "unknown",
        })
    }
}

/// A voice that requests can target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceProfile {
    pub id: VoiceId,
    pub name: String,
    pub kind: VoiceKind,
    pub language: String,
    pub accent: String,
    pub gender: VoiceGender,
    pub description: String,
    pub tags: Vec<String>,
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
}

impl VoiceProfile {
    /// Case-insensitive match of `needle` against name, description and tags.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&needle))
    }
}

/// Library filter: kind (`None` = all) plus free-text search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceFilter {
    pub kind: Option<VoiceKind>,
    pub search: Option<String>,
}

impl VoiceFilter {
    /// Filter that accepts every voice.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            kind: None,
            search: None,
        }
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: VoiceKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn accepts(&self, voice: &VoiceProfile) -> bool {
        if let Some(kind) = self.kind {
            if voice.kind != kind {
                return false;
            }
        }
        self.search
            .as_deref()
            .is_none_or(|needle| voice.matches_search(needle))
    }
}

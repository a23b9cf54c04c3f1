//! Voice catalog: built-in library voices plus custom (cloned) voices.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use voxforge_core::domain::{VoiceFilter, VoiceGender, VoiceId, VoiceKind, VoiceProfile};
use voxforge_core::errors::CatalogError;

/// Language label given to newly cloned voices.
pub const CUSTOM_VOICE_LANGUAGE: &str = "English (US)";

/// Release timestamp of the built-in voices (2024-01-01T00:00:00Z).
const BUILTIN_CREATED_AT_SECS: i64 = 1_704_067_200;

struct BuiltinVoice {
    id: &'static str,
    name: &'static str,
    kind: VoiceKind,
    language: &'static str,
    accent: &'static str,
    gender: VoiceGender,
    description: &'static str,
    tags: &'static [&'static str],
    is_premium: bool,
}

const BUILTIN_VOICES: &[BuiltinVoice] = &[
    BuiltinVoice {
        id: "rachel-premium",
        name: "Rachel",
        kind: VoiceKind::Professional,
        language: "English",
        accent: "American",
        gender: VoiceGender::Female,
        description: "Calm, articulate, and versatile. Perfect for narration and professional content.",
        tags: &["professional", "clear", "versatile"],
        is_premium: true,
    },
    BuiltinVoice {
        id: "adam-deep",
        name: "Adam",
        kind: VoiceKind::Preset,
        language: "English",
        accent: "American",
        gender: VoiceGender::Male,
        description: "Deep, warm, and engaging. Perfect for storytelling and documentaries.",
        tags: &["deep", "warm", "engaging"],
        is_premium: false,
    },
    BuiltinVoice {
        id: "bella-expressive",
        name: "Bella",
        kind: VoiceKind::Professional,
        language: "English",
        accent: "British",
        gender: VoiceGender::Female,
        description: "Expressive and captivating. Perfect for character voices and creative content.",
        tags: &["expressive", "character", "creative"],
        is_premium: true,
    },
    BuiltinVoice {
        id: "preset_1",
        name: "Sarah Professional",
        kind: VoiceKind::Preset,
        language: "English (US)",
        accent: "American",
        gender: VoiceGender::Female,
        description: "High quality preset voice for professional content.",
        tags: &["preset", "professional"],
        is_premium: false,
    },
    BuiltinVoice {
        id: "preset_2",
        name: "David Narrator",
        kind: VoiceKind::Preset,
        language: "English (US)",
        accent: "American",
        gender: VoiceGender::Male,
        description: "High quality preset voice for long-form narration.",
        tags: &["preset", "narration"],
        is_premium: false,
    },
    BuiltinVoice {
        id: "preset_3",
        name: "Emma British",
        kind: VoiceKind::Preset,
        language: "English (UK)",
        accent: "British",
        gender: VoiceGender::Female,
        description: "High quality preset voice with a British accent.",
        tags: &["preset", "british"],
        is_premium: false,
    },
];

impl BuiltinVoice {
    fn to_profile(&self, created_at: DateTime<Utc>) -> VoiceProfile {
        VoiceProfile {
            id: VoiceId::new(self.id),
            name: self.name.to_string(),
            kind: self.kind,
            language: self.language.to_string(),
            accent: self.accent.to_string(),
            gender: self.gender,
            description: self.description.to_string(),
            tags: self.tags.iter().map(|t| (*t).to_string()).collect(),
            is_premium: self.is_premium,
            created_at,
        }
    }
}

/// Profiles of every built-in voice, in library order.
#[must_use]
pub fn builtin_voices() -> Vec<VoiceProfile> {
    let created_at = DateTime::from_timestamp(BUILTIN_CREATED_AT_SECS, 0).unwrap_or_default();
    BUILTIN_VOICES
        .iter()
        .map(|v| v.to_profile(created_at))
        .collect()
}

/// Profile for a freshly cloned voice.
#[must_use]
pub fn custom_voice(
    name: &str,
    language: &str,
    description: String,
    created_at: DateTime<Utc>,
) -> VoiceProfile {
    VoiceProfile {
        id: VoiceId::new(Uuid::new_v4().to_string()),
        name: name.trim().to_string(),
        kind: VoiceKind::Custom,
        language: language.to_string(),
        accent: String::new(),
        gender: VoiceGender::Unknown,
        description,
        tags: vec!["custom".to_string(), "cloned".to_string()],
        is_premium: false,
        created_at,
    }
}

/// In-memory voice catalog.
#[derive(Debug, Clone)]
pub struct VoiceCatalog {
    voices: Vec<VoiceProfile>,
}

impl VoiceCatalog {
    /// Catalog seeded with the built-in voices.
    #[must_use]
    pub fn new() -> Self {
        Self {
            voices: builtin_voices(),
        }
    }

    /// Catalog with no voices at all.
    #[must_use]
    pub const fn empty() -> Self {
        Self { voices: Vec::new() }
    }

    /// Voices accepted by `filter`, in catalog order.
    #[must_use]
    pub fn search(&self, filter: &VoiceFilter) -> Vec<VoiceProfile> {
        self.voices
            .iter()
            .filter(|v| filter.accepts(v))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn get(&self, id: &VoiceId) -> Option<&VoiceProfile> {
        self.voices.iter().find(|v| &v.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &VoiceId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Create and register a custom voice named `name`.
    pub fn register_custom(
        &mut self,
        name: &str,
        language: &str,
        created_at: DateTime<Utc>,
    ) -> Result<VoiceProfile, CatalogError> {
        let profile = custom_voice(
            name,
            language,
            format!("Custom voice '{}'", name.trim()),
            created_at,
        );
        self.insert(profile.clone())?;
        Ok(profile)
    }

    /// Register a prepared profile. An existing voice with the same id is
    /// replaced.
    pub fn insert(&mut self, profile: VoiceProfile) -> Result<(), CatalogError> {
        if profile.name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }

        tracing::info!(
            voice = %profile.id,
            name = %profile.name,
            kind = profile.kind.as_str(),
            "Registering voice"
        );
        if let Some(existing) = self.voices.iter_mut().find(|v| v.id == profile.id) {
            *existing = profile;
        } else {
            self.voices.push(profile);
        }
        Ok(())
    }

    /// Remove a custom voice. Built-in voices are read-only.
    pub fn remove(&mut self, id: &VoiceId) -> Result<VoiceProfile, CatalogError> {
        let index = self
            .voices
            .iter()
            .position(|v| &v.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;

        if !self.voices[index].kind.is_removable() {
            return Err(CatalogError::ReadOnly(id.clone()));
        }

        tracing::info!(voice = %id, "Removing voice");
        Ok(self.voices.remove(index))
    }
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_seeds_builtin_voices() {
        let catalog = VoiceCatalog::new();
        assert_eq!(catalog.len(), 6);
        assert!(catalog.contains(&VoiceId::new("rachel-premium")));
        assert!(catalog.contains(&VoiceId::new("preset_3")));
        assert!(VoiceCatalog::empty().is_empty());
    }

    #[test]
    fn kind_filter_and_search_combine() {
        let catalog = VoiceCatalog::new();

        let professional = catalog.search(&VoiceFilter::all().with_kind(VoiceKind::Professional));
        let names: Vec<_> = professional.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Rachel", "Bella"]);

        let warm = catalog.search(&VoiceFilter::all().with_search("WARM"));
        assert_eq!(warm.len(), 1);
        assert_eq!(warm[0].id, VoiceId::new("adam-deep"));

        let none = catalog.search(
            &VoiceFilter::all()
                .with_kind(VoiceKind::Custom)
                .with_search("warm"),
        );
        assert!(none.is_empty());
    }

    #[test]
    fn custom_voices_can_be_registered_and_removed() {
        let mut catalog = VoiceCatalog::new();
        let voice = catalog
            .register_custom("  My Voice ", CUSTOM_VOICE_LANGUAGE, Utc::now())
            .unwrap();
        assert_eq!(voice.name, "My Voice");
        assert_eq!(voice.kind, VoiceKind::Custom);
        assert_eq!(catalog.len(), 7);

        let removed = catalog.remove(&voice.id).unwrap();
        assert_eq!(removed.id, voice.id);
        assert_eq!(catalog.len(), 6);
    }

    #[test]
    fn builtin_voices_are_read_only() {
        let mut catalog = VoiceCatalog::new();
        let id = VoiceId::new("preset_1");
        assert_eq!(catalog.remove(&id), Err(CatalogError::ReadOnly(id.clone())));
        assert!(catalog.contains(&id));
    }

    #[test]
    fn removing_unknown_voice_fails() {
        let mut catalog = VoiceCatalog::new();
        let id = VoiceId::new("ghost");
        assert_eq!(catalog.remove(&id), Err(CatalogError::NotFound(id)));
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut catalog = VoiceCatalog::new();
        assert_eq!(
            catalog.register_custom("   ", CUSTOM_VOICE_LANGUAGE, Utc::now()),
            Err(CatalogError::EmptyName)
        );
    }
}

//! Multimodal input support definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Content modalities a message part can carry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Image,
    Audio,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Text => "text",
            Modality::Image => "image",
            Modality::Audio => "audio",
        }
    }
}

/// Input modalities a provider accepts in request messages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModalitySupport {
    pub input: BTreeSet<Modality>,
}

impl Default for ModalitySupport {
    fn default() -> Self {
        Self::text_only()
    }
}

impl ModalitySupport {
    /// Create text-only modality support
    pub fn text_only() -> Self {
        Self {
            input: BTreeSet::from([Modality::Text]),
        }
    }

    /// Create multimodal support with text and images
    pub fn text_and_image() -> Self {
        let mut support = Self::text_only();
        support.input.insert(Modality::Image);
        support
    }

    /// Text, image and audio input
    pub fn text_image_audio() -> Self {
        let mut support = Self::text_and_image();
        support.input.insert(Modality::Audio);
        support
    }

    /// Check if a specific input modality is supported
    pub fn supports_input(&self, modality: Modality) -> bool {
        self.input.contains(&modality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert!(!ModalitySupport::text_only().supports_input(Modality::Image));
        assert!(ModalitySupport::text_and_image().supports_input(Modality::Image));
        assert!(!ModalitySupport::text_and_image().supports_input(Modality::Audio));
        assert!(ModalitySupport::text_image_audio().supports_input(Modality::Audio));
    }
}

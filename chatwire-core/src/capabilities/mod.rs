//! Provider capability table
//!
//! Every per-provider policy difference lives here as data: how reasoning
//! transcripts are carried, which media a provider accepts, whether partial
//! assistant turns can be sent, and whether tool arguments travel as parsed
//! objects. The shared [`check`] step consults this table before any encoder
//! runs, so provider modules never re-implement these decisions.

use serde::{Deserialize, Serialize};

pub mod check;
pub mod modality;

pub use check::check_conversation;
pub use modality::{Modality, ModalitySupport};

/// How a provider represents `think` parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "field", rename_all = "snake_case")]
pub enum ReasoningSupport {
    /// Native reasoning blocks that must carry a signature; unsigned parts
    /// are omitted and reported as lossy
    SignedBlocks,
    /// Native reasoning items, signature optional
    Native,
    /// Plain text in a vendor-specific message field; signatures cannot travel
    VendorField(String),
    /// No reasoning representation at all
    Unsupported,
}

/// Capabilities of one provider encoder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderCapabilities {
    /// Reasoning transcript policy
    pub reasoning: ReasoningSupport,

    /// Accepted input modalities
    pub modalities: ModalitySupport,

    /// Can a trailing assistant message be sent as a partial (prefill) turn?
    pub partial_messages: bool,

    /// Can tool calls with not-yet-streamed (null) arguments be sent?
    pub partial_tool_calls: bool,

    /// Are tool arguments sent as parsed JSON objects rather than strings?
    pub structured_tool_arguments: bool,

    /// Is the per-message speaker `name` forwarded?
    pub speaker_names: bool,

    /// Is the media `id` forwarded?
    pub media_ids: bool,
}

impl Default for EncoderCapabilities {
    fn default() -> Self {
        Self {
            reasoning: ReasoningSupport::Unsupported,
            modalities: ModalitySupport::text_only(),
            partial_messages: false,
            partial_tool_calls: false,
            structured_tool_arguments: false,
            speaker_names: false,
            media_ids: false,
        }
    }
}

impl EncoderCapabilities {
    /// Builder pattern for capability configuration
    pub fn builder() -> CapabilityBuilder {
        CapabilityBuilder::new()
    }
}

/// Builder for constructing capabilities
pub struct CapabilityBuilder {
    capabilities: EncoderCapabilities,
}

impl Default for CapabilityBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityBuilder {
    pub fn new() -> Self {
        Self {
            capabilities: EncoderCapabilities::default(),
        }
    }

    pub fn reasoning(mut self, reasoning: ReasoningSupport) -> Self {
        self.capabilities.reasoning = reasoning;
        self
    }

    pub fn with_modalities(mut self, modalities: ModalitySupport) -> Self {
        self.capabilities.modalities = modalities;
        self
    }

    pub fn partial_messages(mut self) -> Self {
        self.capabilities.partial_messages = true;
        self
    }

    pub fn structured_tool_arguments(mut self) -> Self {
        self.capabilities.structured_tool_arguments = true;
        self
    }

    pub fn speaker_names(mut self) -> Self {
        self.capabilities.speaker_names = true;
        self
    }

    pub fn media_ids(mut self) -> Self {
        self.capabilities.media_ids = true;
        self
    }

    pub fn build(self) -> EncoderCapabilities {
        self.capabilities
    }
}

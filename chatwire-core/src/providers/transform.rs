//! Encoding results with lossiness tracking
//!
//! A successful encode can still drop information the target provider has no
//! slot for. Those omissions are documented policy, not errors, and travel
//! with the request as `"<field path>: <reason>"` notes.

use crate::http::ProviderRequest;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of a successful encode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedRequest {
    /// The request descriptor
    pub request: ProviderRequest,

    /// Documented omissions (empty when lossless)
    pub lossy_reasons: Vec<String>,
}

impl EncodedRequest {
    /// Whether the encode dropped anything
    pub fn is_lossy(&self) -> bool {
        !self.lossy_reasons.is_empty()
    }
}

/// Reasons for lossy encodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossinessReason {
    UnsignedReasoningOmitted,
    MediaIdDropped,
    SpeakerNameDropped,
}

impl LossinessReason {
    /// Convert to the reason code used in notes
    pub fn as_str(&self) -> &str {
        match self {
            Self::UnsignedReasoningOmitted => "reasoning.unsigned_omitted",
            Self::MediaIdDropped => "media.id_dropped",
            Self::SpeakerNameDropped => "name.dropped",
        }
    }
}

/// Collector for lossy notes during one encode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LossyNotes(Vec<String>);

impl LossyNotes {
    /// Record an omission at `field_path`
    pub fn record(&mut self, field_path: impl AsRef<str>, reason: LossinessReason) {
        let note = format!("{}: {}", field_path.as_ref(), reason.as_str());
        debug!("Lossy encode: {}", note);
        self.0.push(note);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

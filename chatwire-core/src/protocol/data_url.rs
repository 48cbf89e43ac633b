//! `data:` URL parsing for inline media

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

/// Standard alphabet, padding optional
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A parsed `data:<mime>;base64,<payload>` URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUrl<'a> {
    /// MIME type, e.g. `image/png`
    pub mime_type: &'a str,
    /// Base64 payload, verbatim
    pub data: &'a str,
}

impl<'a> DataUrl<'a> {
    /// Whether `url` uses the `data:` scheme
    pub fn is_data_url(url: &str) -> bool {
        url.starts_with("data:")
    }

    /// Parse a base64 `data:` URL and check that its payload decodes
    ///
    /// Missing padding and line breaks in the payload are tolerated; the
    /// payload itself is kept verbatim.
    pub fn parse(url: &'a str) -> Result<Self, String> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| "expected a data: URL".to_string())?;
        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| "missing ',' separator".to_string())?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| "only base64 data URLs are supported".to_string())?;
        if !mime_type.contains('/') {
            return Err(format!("invalid MIME type '{}'", mime_type));
        }
        let compact: Vec<u8> = data
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        LENIENT
            .decode(compact)
            .map_err(|e| format!("invalid base64 payload: {}", e))?;

        Ok(Self { mime_type, data })
    }

    /// Subtype of the MIME type (`png` for `image/png`)
    pub fn subtype(&self) -> &'a str {
        self.mime_type
            .split_once('/')
            .map(|(_, subtype)| subtype)
            .unwrap_or(self.mime_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_png() {
        let url = "data:image/png;base64,aGVsbG8=";
        let parsed = DataUrl::parse(url).unwrap();
        assert_eq!(parsed.mime_type, "image/png");
        assert_eq!(parsed.data, "aGVsbG8=");
        assert_eq!(parsed.subtype(), "png");
    }

    #[test]
    fn test_accepts_unpadded_and_wrapped_payloads() {
        let unpadded = DataUrl::parse("data:image/png;base64,aGVsbG8").unwrap();
        assert_eq!(unpadded.data, "aGVsbG8");
        let wrapped = DataUrl::parse("data:image/png;base64,aGVs\nbG8=").unwrap();
        assert_eq!(wrapped.data, "aGVs\nbG8=");
    }

    #[test]
    fn test_rejects_non_base64() {
        assert!(DataUrl::parse("data:text/plain,hello").is_err());
        assert!(DataUrl::parse("data:image/png;base64,@@@").is_err());
        assert!(DataUrl::parse("https://example.com/a.png").is_err());
    }
}

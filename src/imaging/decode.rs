//! Request payload decoding

use base64::{
    Engine as _,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};

use crate::errors::MatchResultOf;

/// Prefix a browser canvas export puts in front of PNG data
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

const BASE64_INPUT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode a PNG data URL or bare base64 string into image bytes
///
/// Spaces are read back as `+`, since form decoding of a query string turns
/// an unescaped `+` into a space. Line breaks are ignored. The decoded bytes
/// are not inspected; invalid image content fails later, at rasterization.
pub fn decode_png_input(raw: &str) -> MatchResultOf<Vec<u8>> {
    let trimmed = raw.trim();
    let payload = trimmed
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .unwrap_or(trimmed);

    let normalized: String = payload
        .chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .map(|c| if c == ' ' { '+' } else { c })
        .collect();

    Ok(BASE64_INPUT.decode(normalized)?)
}

/// SVG markup is rasterized as-is
pub fn decode_svg_input(raw: &str) -> Vec<u8> {
    raw.as_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MatchError;
    use base64::engine::general_purpose::STANDARD;

    const PAYLOAD: &[u8] = b"\x89PNG\r\n\x1a\n-not-really-a-png->";

    #[test]
    fn test_decodes_data_url() {
        let raw = format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(PAYLOAD));
        assert_eq!(decode_png_input(&raw).unwrap(), PAYLOAD);
    }

    #[test]
    fn test_decodes_bare_base64() {
        let raw = STANDARD.encode(PAYLOAD);
        assert_eq!(decode_png_input(&raw).unwrap(), PAYLOAD);
    }

    #[test]
    fn test_accepts_missing_padding() {
        let raw = STANDARD.encode(b"ab");
        assert_eq!(raw, "YWI=");
        assert_eq!(decode_png_input("YWI").unwrap(), b"ab");
    }

    #[test]
    fn test_restores_plus_signs_lost_in_query_decoding() {
        let raw = STANDARD.encode([0xfb, 0xef, 0xbe]);
        assert_eq!(raw, "++++");
        assert_eq!(decode_png_input("++ +").unwrap(), vec![0xfb, 0xef, 0xbe]);
    }

    #[test]
    fn test_empty_input_decodes_to_nothing() {
        assert!(decode_png_input("").unwrap().is_empty());
        assert!(decode_png_input(PNG_DATA_URL_PREFIX).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_base64_is_a_decode_error() {
        let err = decode_png_input("data:image/png;base64,@@not base64@@").unwrap_err();
        assert!(matches!(err, MatchError::Decode(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_prefix_only_stripped_at_start() {
        let raw = format!("AAAA{}", PNG_DATA_URL_PREFIX);
        assert!(decode_png_input(&raw).is_err());
    }

    #[test]
    fn test_svg_input_is_passed_through() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#;
        assert_eq!(decode_svg_input(svg), svg.as_bytes());
    }
}

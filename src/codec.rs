//! Binary/textual image payload conversion.
//!
//! Image bytes cross two transports: base64 inside JSON bodies (both
//! directions), and raw binary parts inside multipart forms. Reference
//! images additionally get normalized to PNG before multipart attachment,
//! since the edits endpoint expects `image/png` parts.

use std::io::Cursor;

use base64::Engine;

use crate::error::GenError;
use crate::request::ReferenceImage;

/// Encode raw bytes as a standard base64 string.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}

/// Decode a standard base64 string to raw bytes.
///
/// # Errors
///
/// Returns [`GenError::MalformedResponse`] if the input is not valid base64.
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, GenError> {
    base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| GenError::MalformedResponse(format!("Failed to decode base64 image: {e}")))
}

/// Render a reference image as a `data:` URI for the brokered JSON body.
#[must_use]
pub fn to_data_uri(image: &ReferenceImage) -> String {
    format!("data:{};base64,{}", image.mime_type, encode_base64(&image.data))
}

/// Produce PNG bytes for a reference image.
///
/// PNG payloads pass through untouched; anything else is decoded and
/// re-encoded with the `image` crate.
///
/// # Errors
///
/// Returns [`GenError::ImageConversion`] if the bytes cannot be decoded or
/// re-encoded.
pub fn normalize_to_png(image: &ReferenceImage) -> Result<Vec<u8>, GenError> {
    if image.mime_type == "image/png" {
        return Ok(image.data.clone());
    }

    let decoded = image::load_from_memory(&image.data)
        .map_err(|e| GenError::ImageConversion(format!("Failed to decode reference image: {e}")))?;

    let mut out = Cursor::new(Vec::new());
    decoded
        .write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| GenError::ImageConversion(format!("Failed to re-encode as PNG: {e}")))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

    fn tiny_jpeg() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([120, 40, 200]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img).write_to(&mut out, image::ImageFormat::Jpeg).unwrap();
        out.into_inner()
    }

    #[test]
    fn base64_round_trip() {
        let data = vec![0u8, 1, 2, 253, 254, 255];
        assert_eq!(decode_base64(&encode_base64(&data)).unwrap(), data);
    }

    #[test]
    fn decode_tolerates_surrounding_whitespace() {
        let encoded = format!("  {}\n", encode_base64(b"abc"));
        assert_eq!(decode_base64(&encoded).unwrap(), b"abc");
    }

    #[test]
    fn decode_invalid_is_malformed_response() {
        assert!(matches!(decode_base64("not//valid!!"), Err(GenError::MalformedResponse(_))));
    }

    #[test]
    fn data_uri_shape() {
        let image = ReferenceImage { data: b"abc".to_vec(), mime_type: "image/jpeg".into() };
        let uri = to_data_uri(&image);
        assert!(uri.starts_with("data:image/jpeg;base64,"));
        assert!(uri.ends_with(&encode_base64(b"abc")));
    }

    #[test]
    fn png_passes_through_unchanged() {
        let image = ReferenceImage { data: PNG_MAGIC.to_vec(), mime_type: "image/png".into() };
        assert_eq!(normalize_to_png(&image).unwrap(), PNG_MAGIC.to_vec());
    }

    #[test]
    fn jpeg_is_reencoded_as_png() {
        let image = ReferenceImage { data: tiny_jpeg(), mime_type: "image/jpeg".into() };
        let png = normalize_to_png(&image).unwrap();
        assert_eq!(&png[..8], &PNG_MAGIC);
    }

    #[test]
    fn garbage_bytes_fail_conversion() {
        let image = ReferenceImage { data: vec![1, 2, 3], mime_type: "image/jpeg".into() };
        assert!(matches!(normalize_to_png(&image), Err(GenError::ImageConversion(_))));
    }
}

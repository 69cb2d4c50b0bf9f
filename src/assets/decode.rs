use std::io::Cursor;

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::foundation::core::{RasterImage, SizeBudget};
use crate::foundation::error::DecodeError;

/// First quality tried by the re-encode loop.
pub const START_QUALITY: u8 = 100;
/// Quality decrement per re-encode step.
pub const QUALITY_STEP: u8 = 10;

// Wrapped encoders and platform decoders are lenient about padding and trailing bits.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Outcome of the last re-encode of an over-budget image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Compression {
    /// JPEG quality of the encode whose bytes were kept, 0 when none were.
    pub quality: u8,
    /// Size of the kept JPEG bytes, or the decoded footprint when no encode was kept.
    pub encoded_len: u64,
    /// Number of successful encodes (at most 10). 0 when the encoder rejected the image
    /// and the decoded raster was kept as is.
    pub iterations: u32,
    /// Whether `encoded_len` fits the budget.
    pub met_budget: bool,
}

/// A decoded thumbnail plus a description of any re-compression applied to it.
#[derive(Clone, Debug)]
pub struct FittedImage {
    /// The image handed to the compositor.
    pub image: RasterImage,
    /// `None` when the decoded footprint already fit the budget.
    pub compression: Option<Compression>,
}

/// Remove a leading `data:<...>,` header, returning the payload.
///
/// Inputs that do not start with `data:` are returned unchanged (trimmed).
pub fn strip_data_uri(encoded: &str) -> &str {
    let s = encoded.trim();
    if s.starts_with("data:")
        && let Some(comma) = s.find(',')
    {
        return &s[comma + 1..];
    }
    s
}

/// Decode a base64 payload (raw or data-URI) to bytes.
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    let payload: String = strip_data_uri(encoded)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if payload.is_empty() {
        return Err(DecodeError::InvalidEncoding("empty payload".to_string()));
    }
    PAYLOAD_ENGINE
        .decode(payload.as_bytes())
        .map_err(|e| DecodeError::InvalidEncoding(e.to_string()))
}

/// Decode image bytes of any supported format to RGBA8.
pub fn decode_raster(bytes: &[u8]) -> Result<RasterImage, DecodeError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| DecodeError::UnsupportedFormat(e.to_string()))?;
    Ok(RasterImage::from_dynamic(img))
}

/// Decode `encoded` and, when its footprint exceeds `budget`, re-encode it as JPEG at
/// decreasing quality until the encoded bytes fit or the quality floor is reached.
pub fn decode_and_fit(encoded: &str, budget: SizeBudget) -> Result<RasterImage, DecodeError> {
    decode_and_fit_report(encoded, budget).map(|fitted| fitted.image)
}

/// Like [`decode_and_fit`], also reporting the compression that was applied.
#[tracing::instrument(skip(encoded), fields(encoded_len = encoded.len()))]
pub fn decode_and_fit_report(
    encoded: &str,
    budget: SizeBudget,
) -> Result<FittedImage, DecodeError> {
    let bytes = decode_base64(encoded)?;
    let image = decode_raster(&bytes)?;

    let footprint = image.byte_footprint();
    if footprint <= budget.bytes() {
        tracing::debug!(
            width = image.width,
            height = image.height,
            footprint,
            "thumbnail within budget"
        );
        return Ok(FittedImage {
            image,
            compression: None,
        });
    }

    let (jpeg, compression) = match compress_to_budget(&image, budget) {
        Ok(encoded) => encoded,
        Err(err) => {
            tracing::warn!(
                width = image.width,
                height = image.height,
                budget = budget.bytes(),
                error = %err,
                "thumbnail could not be re-encoded, keeping decoded raster"
            );
            return Ok(FittedImage {
                image,
                compression: Some(Compression {
                    quality: 0,
                    encoded_len: footprint,
                    iterations: 0,
                    met_budget: false,
                }),
            });
        }
    };
    let image = decode_raster(&jpeg)?;
    if !compression.met_budget {
        tracing::warn!(
            footprint,
            budget = budget.bytes(),
            encoded_len = compression.encoded_len,
            "thumbnail still over budget at quality floor"
        );
    }
    Ok(FittedImage {
        image,
        compression: Some(compression),
    })
}

/// Encode `image` as JPEG at `quality` (1..=100). Alpha is dropped.
pub fn encode_jpeg(image: &RasterImage, quality: u8) -> Result<Vec<u8>, DecodeError> {
    encode_rgb_jpeg(&to_rgb(image)?, quality)
}

fn to_rgb(image: &RasterImage) -> Result<image::RgbImage, DecodeError> {
    let rgba = image::RgbaImage::from_raw(image.width, image.height, image.data.clone())
        .ok_or_else(|| DecodeError::UnsupportedFormat("raster byte len mismatch".to_string()))?;
    Ok(image::DynamicImage::ImageRgba8(rgba).to_rgb8())
}

fn encode_rgb_jpeg(rgb: &image::RgbImage, quality: u8) -> Result<Vec<u8>, DecodeError> {
    let mut buf = Cursor::new(Vec::new());
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| DecodeError::UnsupportedFormat(format!("jpeg encode: {e}")))?;
    Ok(buf.into_inner())
}

fn compress_to_budget(
    image: &RasterImage,
    budget: SizeBudget,
) -> Result<(Vec<u8>, Compression), DecodeError> {
    let rgb = to_rgb(image)?;
    let mut quality = START_QUALITY;
    let mut iterations = 0u32;
    loop {
        let jpeg = encode_rgb_jpeg(&rgb, quality)?;
        iterations += 1;
        let encoded_len = jpeg.len() as u64;
        tracing::debug!(quality, encoded_len, "re-encoded thumbnail");

        let next = quality.saturating_sub(QUALITY_STEP);
        if encoded_len <= budget.bytes() || next == 0 {
            let compression = Compression {
                quality,
                encoded_len,
                iterations,
                met_budget: encoded_len <= budget.bytes(),
            };
            return Ok((jpeg, compression));
        }
        quality = next;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;

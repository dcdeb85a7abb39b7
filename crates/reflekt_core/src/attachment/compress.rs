//! Image decode, downscale and re-encode.
//!
//! # Invariants
//! - Output width never exceeds `max_width`; images are never upscaled.
//! - Aspect ratio is preserved (height rounded, at least 1px).
//! - Lossy WebP at `quality` is preferred; JPEG is used when WebP encoding fails.

use super::to_data_url;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageError};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_MAX_WIDTH: u32 = 800;
pub const DEFAULT_QUALITY: f32 = 0.7;

/// Target encoding of a compressed attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    WebP,
    Jpeg,
}

impl OutputFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::WebP => "image/webp",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// Compression parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressOptions {
    /// Maximum output width in pixels.
    pub max_width: u32,
    /// Lossy quality factor in `[0, 1]`.
    pub quality: f32,
    /// First encoding to try.
    pub preferred: OutputFormat,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            quality: DEFAULT_QUALITY,
            preferred: OutputFormat::WebP,
        }
    }
}

/// Preprocessing failure.
#[derive(Debug)]
pub enum AttachmentError {
    /// Source bytes are not a decodable raster image.
    Decode(ImageError),
    /// Neither WebP nor JPEG encoding succeeded.
    Encode(ImageError),
    /// `max_width` is zero or `quality` is outside `[0, 1]`.
    InvalidOptions(String),
}

impl Display for AttachmentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(err) => write!(f, "failed to decode image: {err}"),
            Self::Encode(err) => write!(f, "failed to encode image: {err}"),
            Self::InvalidOptions(message) => write!(f, "invalid compression options: {message}"),
        }
    }
}

impl Error for AttachmentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Decode(err) | Self::Encode(err) => Some(err),
            Self::InvalidOptions(_) => None,
        }
    }
}

/// Compresses raw image bytes into an inline `data:` URL.
///
/// # Errors
/// - `Decode` when the bytes are not an image in a supported format.
/// - `Encode` when no output encoding succeeds.
/// - `InvalidOptions` for a zero width or out-of-range quality.
pub fn compress_image(bytes: &[u8], options: &CompressOptions) -> Result<String, AttachmentError> {
    validate_options(options)?;

    let source = image::load_from_memory(bytes).map_err(AttachmentError::Decode)?;
    let (width, height) = scaled_dimensions(source.width(), source.height(), options.max_width);
    let resized = if width == source.width() {
        source
    } else {
        source.resize_exact(width, height, FilterType::Triangle)
    };

    let (format, encoded) = encode_with_fallback(&resized, options)?;
    debug!(
        "event=image_compress module=attachment status=ok format={} width={} height={} bytes={}",
        format.mime_type(),
        width,
        height,
        encoded.len()
    );

    Ok(to_data_url(format.mime_type(), &STANDARD.encode(&encoded)))
}

/// Computes output dimensions for a maximum width, never upscaling.
pub fn scaled_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width || width == 0 {
        return (width, height);
    }
    let scaled = (f64::from(height) * f64::from(max_width) / f64::from(width)).round() as u32;
    (max_width, scaled.max(1))
}

fn validate_options(options: &CompressOptions) -> Result<(), AttachmentError> {
    if options.max_width == 0 {
        return Err(AttachmentError::InvalidOptions(
            "max_width must be positive".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&options.quality) {
        return Err(AttachmentError::InvalidOptions(format!(
            "quality must be within [0, 1], got {}",
            options.quality
        )));
    }
    Ok(())
}

fn encode_with_fallback(
    image: &DynamicImage,
    options: &CompressOptions,
) -> Result<(OutputFormat, Vec<u8>), AttachmentError> {
    if options.preferred == OutputFormat::WebP {
        match encode_webp(image, options.quality) {
            Ok(bytes) => return Ok((OutputFormat::WebP, bytes)),
            Err(err) => warn!(
                "event=image_compress module=attachment status=fallback from=webp to=jpeg error={}",
                err
            ),
        }
    }

    encode_jpeg(image, options.quality)
        .map(|bytes| (OutputFormat::Jpeg, bytes))
        .map_err(AttachmentError::Encode)
}

/// Lossy WebP through libwebp; only 8-bit RGB/RGBA buffers are accepted.
fn encode_webp(image: &DynamicImage, quality: f32) -> Result<Vec<u8>, String> {
    let source = if image.color().has_alpha() {
        DynamicImage::ImageRgba8(image.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    };
    let encoder = webp::Encoder::from_image(&source).map_err(str::to_string)?;
    let encoded = encoder.encode(webp_quality(quality));
    if encoded.is_empty() {
        return Err("webp encoder produced no output".to_string());
    }
    Ok(encoded.to_vec())
}

fn encode_jpeg(image: &DynamicImage, quality: f32) -> Result<Vec<u8>, ImageError> {
    let mut buffer = Vec::new();
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality)))?;
    Ok(buffer)
}

fn webp_quality(quality: f32) -> f32 {
    (quality * 100.0).clamp(1.0, 100.0)
}

fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::{jpeg_quality, scaled_dimensions, webp_quality};

    #[test]
    fn scales_down_preserving_aspect_ratio() {
        assert_eq!(scaled_dimensions(2000, 1000, 800), (800, 400));
        assert_eq!(scaled_dimensions(1000, 333, 800), (800, 266));
    }

    #[test]
    fn never_upscales() {
        assert_eq!(scaled_dimensions(640, 480, 800), (640, 480));
        assert_eq!(scaled_dimensions(800, 600, 800), (800, 600));
    }

    #[test]
    fn thin_images_keep_one_pixel_height() {
        assert_eq!(scaled_dimensions(4000, 1, 800), (800, 1));
    }

    #[test]
    fn jpeg_quality_maps_unit_interval() {
        assert_eq!(jpeg_quality(0.7), 70);
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(1.0), 100);
    }

    #[test]
    fn webp_quality_maps_unit_interval() {
        assert_eq!(webp_quality(0.5), 50.0);
        assert_eq!(webp_quality(0.0), 1.0);
        assert_eq!(webp_quality(1.0), 100.0);
    }
}

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::gif::GifEncoder;
use image::{DynamicImage, ExtendedColorType, GenericImageView, ImageFormat, Rgb, RgbImage};
use reflekt_core::attachment::{
    base64_payload_size, compress_image, format_bytes, parse_data_url, AttachmentError,
    CompressOptions, OutputFormat,
};
use reflekt_core::{EntryDraft, EntryRepository, MemoryEntryRepository};
use std::io::Cursor;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Deterministic high-entropy pixels, so lossy quality visibly changes size.
fn noisy_png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut state: u32 = 0x2545_f491;
    let img = RgbImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, _] = state.to_le_bytes();
        Rgb([r, g, b])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn gif_bytes(width: u32, height: u32) -> Vec<u8> {
    let rgba = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, _| {
        if x % 2 == 0 {
            Rgb([200, 40, 40])
        } else {
            Rgb([40, 40, 200])
        }
    }))
    .to_rgba8();
    let mut bytes = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut bytes);
        encoder
            .encode(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)
            .unwrap();
    }
    bytes
}

fn decode_data_url(data_url: &str) -> DynamicImage {
    let parsed = parse_data_url(data_url).expect("inline image data url");
    let bytes = STANDARD.decode(parsed.payload).unwrap();
    image::load_from_memory(&bytes).unwrap()
}

#[test]
fn wide_image_is_downscaled_preserving_aspect_ratio() {
    let data_url = compress_image(&png_bytes(2000, 1000), &CompressOptions::default()).unwrap();

    let parsed = parse_data_url(&data_url).unwrap();
    assert_eq!(parsed.mime_type, OutputFormat::WebP.mime_type());
    assert_eq!(decode_data_url(&data_url).dimensions(), (800, 400));
}

#[test]
fn lower_quality_yields_smaller_webp_payload() {
    let source = noisy_png_bytes(800, 600);
    let compress_at = |quality: f32| {
        let options = CompressOptions {
            quality,
            ..CompressOptions::default()
        };
        compress_image(&source, &options).unwrap()
    };

    let low = compress_at(0.1);
    let high = compress_at(0.9);
    assert!(low.starts_with("data:image/webp;base64,"));
    assert!(high.starts_with("data:image/webp;base64,"));
    assert!(base64_payload_size(&low) < base64_payload_size(&high));
}

#[test]
fn gif_and_bmp_uploads_are_accepted() {
    let from_gif = compress_image(&gif_bytes(1200, 300), &CompressOptions::default()).unwrap();
    assert_eq!(decode_data_url(&from_gif).dimensions(), (800, 200));

    let mut bmp = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 32, Rgb([10, 120, 30])))
        .write_to(&mut Cursor::new(&mut bmp), ImageFormat::Bmp)
        .unwrap();
    let from_bmp = compress_image(&bmp, &CompressOptions::default()).unwrap();
    assert_eq!(decode_data_url(&from_bmp).dimensions(), (64, 32));
}

#[test]
fn small_image_is_not_upscaled() {
    let data_url = compress_image(&png_bytes(120, 90), &CompressOptions::default()).unwrap();
    assert_eq!(decode_data_url(&data_url).dimensions(), (120, 90));
}

#[test]
fn jpeg_preference_produces_jpeg() {
    let options = CompressOptions {
        preferred: OutputFormat::Jpeg,
        ..CompressOptions::default()
    };
    let data_url = compress_image(&png_bytes(1600, 900), &options).unwrap();
    assert!(data_url.starts_with("data:image/jpeg;base64,"));
    assert_eq!(decode_data_url(&data_url).dimensions(), (800, 450));
}

#[test]
fn undecodable_bytes_are_an_error() {
    let err = compress_image(b"definitely not an image", &CompressOptions::default()).unwrap_err();
    assert!(matches!(err, AttachmentError::Decode(_)));
}

#[test]
fn invalid_options_are_rejected() {
    let options = CompressOptions {
        max_width: 0,
        ..CompressOptions::default()
    };
    let err = compress_image(&png_bytes(10, 10), &options).unwrap_err();
    assert!(matches!(err, AttachmentError::InvalidOptions(_)));
}

#[test]
fn compressed_image_attaches_to_entry_and_is_sized() {
    let data_url = compress_image(&png_bytes(400, 300), &CompressOptions::default()).unwrap();
    let payload = parse_data_url(&data_url).unwrap().payload;
    let decoded_len = STANDARD.decode(payload).unwrap().len() as u64;

    assert_eq!(base64_payload_size(&data_url), decoded_len);
    assert!(!format_bytes(decoded_len).is_empty());

    let mut draft = EntryDraft::new("Snapshot", "");
    draft.attach_image(data_url.clone()).unwrap();
    let repo = MemoryEntryRepository::new();
    let entry = repo.create_entry("owner-1", &draft).unwrap();
    assert_eq!(entry.images, vec![data_url]);
}

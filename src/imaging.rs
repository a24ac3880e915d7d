/// Image decoding and thumbnail generation
///
/// Downloaded bytes are decoded with the `image` crate. Thumbnails are
/// downsampled into a fixed bounding box; the enlarged view keeps the
/// image at native size and lets the widget fit it to the viewport.

use image::imageops::FilterType;

/// Bounding box (in pixels) for gallery thumbnails.
pub const THUMBNAIL_SIZE: u32 = 128;

/// A decoded RGBA bitmap, ready to hand to the renderer.
#[derive(Debug, Clone)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Bitmap {
    fn from_dynamic(img: image::DynamicImage) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        Self {
            width,
            height,
            pixels: rgba.into_raw(),
        }
    }
}

/// Decode image bytes and downsample them to fit the thumbnail bounding
/// box, preserving aspect ratio. Images already inside the box keep
/// their native size.
pub fn make_thumbnail(bytes: &[u8]) -> Result<Bitmap, image::ImageError> {
    let img = image::load_from_memory(bytes)?;

    let thumb = if img.width() > THUMBNAIL_SIZE || img.height() > THUMBNAIL_SIZE {
        img.resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3)
    } else {
        img
    };

    Ok(Bitmap::from_dynamic(thumb))
}

/// Decode image bytes at full resolution.
pub fn decode_full(bytes: &[u8]) -> Result<Bitmap, image::ImageError> {
    Ok(Bitmap::from_dynamic(image::load_from_memory(bytes)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A solid-color PNG of the given dimensions, as raw file bytes.
    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([40, 90, 160, 255]));
        let mut cursor = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, image::ImageFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_thumbnail_fits_bounding_box() {
        let thumb = make_thumbnail(&png_bytes(640, 320)).unwrap();

        // Long edge pinned to the box, aspect ratio preserved.
        assert_eq!((thumb.width, thumb.height), (128, 64));
        assert_eq!(thumb.pixels.len(), (128 * 64 * 4) as usize);
    }

    #[test]
    fn test_tall_thumbnail_fits_bounding_box() {
        let thumb = make_thumbnail(&png_bytes(100, 400)).unwrap();

        assert_eq!((thumb.width, thumb.height), (32, 128));
    }

    #[test]
    fn test_small_images_are_not_upscaled() {
        let thumb = make_thumbnail(&png_bytes(50, 40)).unwrap();

        assert_eq!((thumb.width, thumb.height), (50, 40));
    }

    #[test]
    fn test_full_decode_keeps_native_size() {
        let bitmap = decode_full(&png_bytes(300, 200)).unwrap();

        assert_eq!((bitmap.width, bitmap.height), (300, 200));
        assert_eq!(bitmap.pixels.len(), (300 * 200 * 4) as usize);
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        assert!(make_thumbnail(b"definitely not an image").is_err());
        assert!(decode_full(&[]).is_err());
    }
}

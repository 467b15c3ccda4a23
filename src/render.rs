//! Crop previews for the current stop.

use std::path::Path;

use image::{DynamicImage, ImageFormat};
use thiserror::Error;

use crate::data::{LoadError, read_source};
use crate::model::{BoundingBox, ItemSource};

/// Errors that can occur while producing a preview.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The image bytes could not be read
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The image could not be decoded or encoded
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// The box does not cover any pixel of the image
    #[error("Box lies outside the {width}x{height} image")]
    EmptyCrop {
        /// Image width in pixels
        width: u32,
        /// Image height in pixels
        height: u32,
    },
}

/// Decode an image and crop it to a box, or return it whole.
pub fn crop_preview(bytes: &[u8], bbox: Option<&BoundingBox>) -> Result<DynamicImage, RenderError> {
    let img = image::load_from_memory(bytes)?;
    let Some(bbox) = bbox else {
        return Ok(img);
    };

    let (width, height) = (img.width(), img.height());
    let rect = bbox
        .to_pixel_rect(width, height)
        .ok_or(RenderError::EmptyCrop { width, height })?;

    log::trace!("Cropping {}x{} image to {:?}", width, height, rect);
    Ok(img.crop_imm(rect.x, rect.y, rect.width, rect.height))
}

/// Read an item's image, crop it and write the result as PNG.
pub fn write_preview(
    source: &ItemSource,
    bbox: Option<&BoundingBox>,
    path: &Path,
) -> Result<(), RenderError> {
    let bytes = read_source(source)?;
    let preview = crop_preview(&bytes, bbox)?;
    preview.save_with_format(path, ImageFormat::Png)?;
    log::debug!("Wrote preview to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 0]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_whole_image_preview() {
        let img = crop_preview(&png_bytes(100, 40), None).unwrap();
        assert_eq!((img.width(), img.height()), (100, 40));
    }

    #[test]
    fn test_box_crop() {
        let bbox = BoundingBox::new(0.5, 0.5, 0.25, 0.5);
        let img = crop_preview(&png_bytes(100, 40), Some(&bbox)).unwrap();
        assert_eq!((img.width(), img.height()), (25, 20));

        // Top-left pixel of the crop comes from (37, 10) in the source
        let pixel = img.to_rgb8().get_pixel(0, 0).0;
        assert_eq!(pixel, [37, 10, 0]);
    }

    #[test]
    fn test_box_outside_image() {
        let bbox = BoundingBox::new(2.0, 2.0, 0.1, 0.1);
        let result = crop_preview(&png_bytes(10, 10), Some(&bbox));
        assert!(matches!(result, Err(RenderError::EmptyCrop { .. })));
    }

    #[test]
    fn test_undecodable_bytes() {
        assert!(matches!(
            crop_preview(b"not an image", None),
            Err(RenderError::Image(_))
        ));
    }

    #[test]
    fn test_write_preview() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("bee.png");
        std::fs::write(&src, png_bytes(64, 64)).unwrap();

        let out = dir.path().join("preview.png");
        let bbox = BoundingBox::new(0.0625, 0.9375, 0.25, 0.25);
        write_preview(&ItemSource::Path { path: src }, Some(&bbox), &out).unwrap();

        let written = image::open(&out).unwrap();
        assert_eq!((written.width(), written.height()), (12, 12));
    }
}

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, ImageReader};

use crate::error::{Result, TriageError};
use crate::models::BoundingBox;

/// Absolute pixel rectangle, `right` and `bottom` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl PixelRect {
    /// Scale a relative box to an image of `width` x `height`.
    ///
    /// Each of left, top, width and height is truncated on its own, so
    /// `right = left + floor(w * width)` rather than `floor((l + w) * width)`.
    pub fn from_relative(bbox: &BoundingBox, width: u32, height: u32) -> Self {
        let (w, h) = (f64::from(width), f64::from(height));
        let left = (bbox.left * w).floor() as i64;
        let top = (bbox.top * h).floor() as i64;
        Self {
            left,
            top,
            right: left + (bbox.width * w).floor() as i64,
            bottom: top + (bbox.height * h).floor() as i64,
        }
    }

    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }

    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Intersect with the image area
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let (w, h) = (i64::from(width), i64::from(height));
        Self {
            left: self.left.clamp(0, w),
            top: self.top.clamp(0, h),
            right: self.right.clamp(0, w),
            bottom: self.bottom.clamp(0, h),
        }
    }
}

/// Cut the region described by `bbox` out of `image`
pub fn crop_region(image: &DynamicImage, key: &str, bbox: &BoundingBox) -> Result<DynamicImage> {
    let rect = PixelRect::from_relative(bbox, image.width(), image.height());
    let clamped = rect.clamp_to(image.width(), image.height());

    for r in [rect, clamped] {
        if r.is_degenerate() {
            return Err(TriageError::PixelRectangleInvalid {
                key: key.to_string(),
                width: r.width(),
                height: r.height(),
            });
        }
    }

    Ok(image.crop_imm(
        clamped.left as u32,
        clamped.top as u32,
        clamped.width() as u32,
        clamped.height() as u32,
    ))
}

/// Writes one cropped file per bounding box
pub struct ImageCropper {
    image: DynamicImage,
    format: ImageFormat,
    extension: OsString,
}

impl ImageCropper {
    pub fn open(source: &Path) -> Result<Self> {
        let decode_error = |e: image::ImageError| TriageError::ImageDecode {
            path: source.to_path_buf(),
            source: e,
        };

        let reader = ImageReader::open(source)
            .and_then(|r| r.with_guessed_format())
            .map_err(|e| decode_error(image::ImageError::IoError(e)))?;
        let guessed = reader.format();
        let image = reader.decode().map_err(decode_error)?;
        let format = guessed
            .or_else(|| ImageFormat::from_path(source).ok())
            .unwrap_or(ImageFormat::Png);

        let extension = source
            .extension()
            .map(|ext| {
                let mut dotted = OsString::from(".");
                dotted.push(ext);
                dotted
            })
            .unwrap_or_default();

        Ok(Self { image, format, extension })
    }

    /// Crop every box and save it as `<output_dir>/<key><source extension>`.
    ///
    /// Every rectangle is checked before the first file is written, so a
    /// degenerate box leaves `output_dir` untouched.
    pub fn crop_all(
        &self,
        boxes: &BTreeMap<String, BoundingBox>,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        let crops = boxes
            .iter()
            .map(|(key, bbox)| Ok((key, crop_region(&self.image, key, bbox)?)))
            .collect::<Result<Vec<_>>>()?;

        let mut written = Vec::with_capacity(crops.len());

        for (key, cropped) in crops {
            let mut file_name = OsString::from(key);
            file_name.push(&self.extension);
            let path = output_dir.join(file_name);

            cropped
                .save_with_format(&path, self.format)
                .map_err(|e| match e {
                    image::ImageError::IoError(io) => TriageError::io(&path, io),
                    other => TriageError::ImageEncode { path: path.clone(), source: other },
                })?;

            tracing::debug!(key = %key, path = %path.display(), "wrote crop");
            written.push(path);
        }

        Ok(written)
    }
}

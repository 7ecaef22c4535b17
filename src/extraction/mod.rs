//! Cutting detected instances out of a source image.

pub mod boxes;
pub mod cropper;

pub use boxes::{extract_bounding_boxes, instance_key};
pub use cropper::{ImageCropper, PixelRect, crop_region};

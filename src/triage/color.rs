use crate::error::{Result, TriageError};
use crate::models::DominantColor;

/// Pick the color covering the largest share of the image.
///
/// Ties go to the observation listed first.
pub fn dominant_color(colors: &[DominantColor]) -> Result<&str> {
    let mut best: Option<&DominantColor> = None;
    for color in colors {
        match best {
            Some(current) if color.pixel_percent <= current.pixel_percent => {}
            _ => best = Some(color),
        }
    }

    best.map(|c| c.color_name.as_str())
        .ok_or_else(|| TriageError::InvalidInput("no dominant color observations".to_string()))
}

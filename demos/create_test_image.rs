//! Writes a sample image and a recorded detection response next to it, so the
//! CLI can be tried without a vision service:
//!
//! ```text
//! cargo run --example create_test_image -- demo
//! cargo run -- classify demo --detections demo -o demo/sorted
//! cargo run -- crop demo/test_image.jpg --detections demo -o demo/crops
//! ```

use std::path::PathBuf;

use image::{Rgb, RgbImage};

const RESPONSE: &str = r#"{
    "Labels": [
        {"Name": "Sky", "Confidence": 98.2, "Instances": []},
        {"Name": "Grass", "Confidence": 71.0, "Instances": []},
        {"Name": "Dog", "Confidence": 90.4, "Instances": [
            {"Confidence": 90.4, "BoundingBox": {"Left": 0.1, "Top": 0.2, "Width": 0.3, "Height": 0.4}},
            {"Confidence": 60.0, "BoundingBox": {"Left": 0.6, "Top": 0.5, "Width": 0.2, "Height": 0.2}}
        ]}
    ],
    "ImageProperties": {
        "Quality": {"Sharpness": 87.0},
        "DominantColors": [
            {"SimplifiedColor": "purple", "PixelPercent": 48.0},
            {"SimplifiedColor": "blue", "PixelPercent": 31.5}
        ]
    }
}"#;

fn main() -> anyhow::Result<()> {
    let dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| ".".to_string()));
    std::fs::create_dir_all(&dir)?;

    // Blue sky over purple ground, with the two recorded Dog boxes painted in
    let dogs = [(80..320, 120..360), (480..640, 300..420)];
    let img = RgbImage::from_fn(800, 600, |x, y| {
        if dogs.iter().any(|(xs, ys)| xs.contains(&x) && ys.contains(&y)) {
            Rgb([139, 90, 43])
        } else if y < 189 {
            Rgb([40, 90, 220])
        } else {
            Rgb([120, 40, 160])
        }
    });

    let image_path = dir.join("test_image.jpg");
    img.save(&image_path)?;
    std::fs::write(dir.join("test_image.jpg.json"), RESPONSE)?;

    println!("Created {} (800x600, sky, ground and two dogs) with its detection response", image_path.display());
    Ok(())
}

use std::collections::BTreeMap;

use crate::models::{BoundingBox, Label};
use crate::paths::path_segment;

/// Collect the bounding boxes of all instances at or above `min_confidence`.
///
/// Keys are `<label name>-<index>`, where the index is the instance's position
/// in its label's instance list (counting skipped instances too). Keys become
/// file names, so the label part is made safe with [`path_segment`].
pub fn extract_bounding_boxes(labels: &[Label], min_confidence: f64) -> BTreeMap<String, BoundingBox> {
    let mut boxes = BTreeMap::new();

    for label in labels {
        for (i, instance) in label.instances.iter().enumerate() {
            if instance.confidence >= min_confidence {
                boxes.insert(instance_key(&label.name, i), instance.bounding_box);
            }
        }
    }

    boxes
}

pub fn instance_key(label: &str, index: usize) -> String {
    format!("{}-{}", path_segment(label), index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Instance;

    fn bbox(left: f64) -> BoundingBox {
        BoundingBox { left, top: 0.0, width: 0.1, height: 0.1 }
    }

    fn label(name: &str, confidences: &[f64]) -> Label {
        Label {
            name: name.to_string(),
            confidence: 99.0,
            instances: confidences
                .iter()
                .enumerate()
                .map(|(i, &confidence)| Instance { confidence, bounding_box: bbox(i as f64 / 10.0) })
                .collect(),
        }
    }

    #[test]
    fn test_confidence_threshold_is_inclusive() {
        let boxes = extract_bounding_boxes(&[label("Dog", &[74.999, 75.0])], 75.0);
        assert_eq!(boxes.len(), 1);
        assert!(!boxes.contains_key("Dog-0"));
        assert_eq!(boxes["Dog-1"], bbox(0.1));
    }

    #[test]
    fn test_keys_embed_label_and_index() {
        let labels = vec![label("Dog", &[90.0, 20.0, 80.0]), label("Cat", &[99.0]), label("Sky", &[])];
        let boxes = extract_bounding_boxes(&labels, 75.0);

        let keys: Vec<&str> = boxes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Cat-0", "Dog-0", "Dog-2"]);
        assert_eq!(boxes["Dog-2"], bbox(0.2));
    }

    #[test]
    fn test_keys_are_single_file_names() {
        assert_eq!(instance_key("AC/DC", 0), "AC_DC-0");
        assert_eq!(instance_key("../escaped", 1), ".._escaped-1");
        assert_eq!(instance_key("", 2), "_-2");
        assert_eq!(instance_key("..", 3), "_..-3");
    }

    #[test]
    fn test_no_labels_no_boxes() {
        assert!(extract_bounding_boxes(&[], 0.0).is_empty());
    }
}

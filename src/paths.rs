//! Turning names reported by the vision service into file system names.

/// Keep a service-reported name to a single, ordinary path component.
///
/// Separators become `_`. Names that would still resolve to the current or
/// parent directory (empty, `.`, `..`, or any run of dots) get a leading `_`.
pub fn path_segment(name: &str) -> String {
    let segment = name.replace(['/', '\\', '\0'], "_");
    if segment.chars().all(|c| c == '.') {
        format!("_{}", segment)
    } else {
        segment
    }
}

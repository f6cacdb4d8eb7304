use std::path::Path;

/// Extension used when the input file has none.
const FALLBACK_EXTENSION: &str = "png";

/// Output file name for face `index` (0-based) out of `count` faces found in `input`.
///
/// A lone face gets `<stem>_cropped.<ext>`; several faces are numbered from 1
/// in detection order, `<stem>_cropped_<n>.<ext>`. The input extension is kept.
pub fn output_file_name(input: &Path, index: usize, count: usize) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_else(|| "image".into());
    let ext = input
        .extension()
        .map(|e| e.to_string_lossy())
        .unwrap_or_else(|| FALLBACK_EXTENSION.into());

    if count > 1 {
        format!("{}_cropped_{}.{}", stem, index + 1, ext)
    } else {
        format!("{}_cropped.{}", stem, ext)
    }
}

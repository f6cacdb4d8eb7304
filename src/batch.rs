use crate::detector::FaceDetector;
use crate::error::{CropError, Result};
use crate::pipeline::{detect_and_crop, display_name};
use log::{error, info, warn};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Suffixes picked up when the input is a directory (compared case-insensitively).
pub const IMAGE_EXTENSIONS: [&str; 3] = [".png", ".jpg", ".jpeg"];

/// Totals for one invocation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub files_processed: usize,
    pub files_skipped: usize,
    pub files_without_faces: usize,
    pub faces_cropped: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Processing complete. Total faces cropped: {}.", self.faces_cropped)
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.file_name()
        .map(|name| {
            let name = name.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
        })
        .unwrap_or(false)
}

/// Fail with [`CropError::InvalidInput`] unless `path` is an existing file or directory.
pub fn validate_input(path: &Path) -> Result<()> {
    if path.is_file() || path.is_dir() {
        Ok(())
    } else {
        Err(CropError::InvalidInput(path.to_path_buf()))
    }
}

/// Build the work list for `path`.
///
/// A file is taken as-is whatever its extension. A directory contributes the
/// image files directly inside it, sorted by name. Anything else is
/// [`CropError::InvalidInput`].
///
/// Entries that cannot be inspected (a dangling symlink, say) are logged and
/// skipped; only an unreadable top-level directory is an error.
pub fn collect_inputs(path: &Path) -> Result<Vec<PathBuf>> {
    validate_input(path)?;
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut inputs = Vec::new();
    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(CropError::Io {
                    path: path.to_path_buf(),
                    source: err.into(),
                });
            }
            Err(err) => {
                warn!("Skipping unreadable entry in {}: {}", path.display(), err);
                continue;
            }
        };
        if entry.file_type().is_file() && has_image_extension(entry.path()) {
            inputs.push(entry.into_path());
        }
    }
    Ok(inputs)
}

/// Run the crop pipeline over `path` (file or directory), writing into `output_dir`.
///
/// Per-file decode failures are reported and skipped. Failing to write a crop
/// aborts the run.
pub fn process_path<D: FaceDetector + ?Sized>(
    path: &Path,
    output_dir: &Path,
    detector: &mut D,
) -> Result<RunSummary> {
    let inputs = collect_inputs(path)?;
    if path.is_dir() {
        println!("Processing directory: {}", path.display());
    }

    fs::create_dir_all(output_dir).map_err(|source| CropError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut summary = RunSummary::default();
    if inputs.is_empty() {
        println!("No image files found to process.");
        return Ok(summary);
    }

    info!("Found {} image(s) to process", inputs.len());
    let mut written: HashSet<PathBuf> = HashSet::new();

    for input in &inputs {
        let name = display_name(input);
        let outcome = match detect_and_crop(input, output_dir, &mut *detector) {
            Ok(outcome) => outcome,
            Err(err @ CropError::Decode { .. }) => {
                error!("{}", err);
                summary.files_skipped += 1;
                continue;
            }
            Err(err) => return Err(err),
        };
        summary.files_processed += 1;

        if outcome.saved.is_empty() {
            summary.files_without_faces += 1;
            println!("Info: No faces detected in {}.", name);
            continue;
        }

        summary.faces_cropped += outcome.saved.len();
        println!("Success: Cropped {} face(s) from {}.", outcome.saved.len(), name);
        for saved in outcome.saved {
            println!("  -> Saved {}", saved.display());
            if !written.insert(saved.clone()) {
                warn!("{} was overwritten by a crop from {}", saved.display(), name);
            }
        }
    }

    info!(
        "Processed {} file(s), skipped {}, {} without faces",
        summary.files_processed, summary.files_skipped, summary.files_without_faces
    );
    println!("\n{}", summary);

    Ok(summary)
}

use crate::detector::FaceDetector;
use crate::error::{CropError, Result};
use crate::geometry::crop_region;
use crate::naming::output_file_name;
use image::{DynamicImage, ImageError, ImageFormat};
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// What happened to one input image.
#[derive(Debug, Default)]
pub struct CropOutcome {
    /// Faces reported by the detector.
    pub detected: usize,
    /// Files written, in detection order.
    pub saved: Vec<PathBuf>,
}

impl CropOutcome {
    /// Faces whose expanded region fell entirely outside the image.
    pub fn dropped(&self) -> usize {
        self.detected - self.saved.len()
    }
}

/// Decode an image, sniffing the content when the extension lies.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let decode_err = |source| CropError::Decode {
        path: path.to_path_buf(),
        source,
    };
    image::io::Reader::open(path)
        .map_err(|e| decode_err(ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_err(ImageError::IoError(e)))?
        .decode()
        .map_err(decode_err)
}

/// Detect every face in `path`, crop a padded square around each one and
/// write the crops into `output_dir`.
///
/// Zero detections is a normal outcome with an empty `saved` list.
pub fn detect_and_crop<D: FaceDetector + ?Sized>(
    path: &Path,
    output_dir: &Path,
    detector: &mut D,
) -> Result<CropOutcome> {
    let img = load_image(path)?;
    let faces = detector.detect_faces(&img)?;
    debug!("Detected {} face(s) in {:?}", faces.len(), path);

    let mut outcome = CropOutcome {
        detected: faces.len(),
        saved: Vec::with_capacity(faces.len()),
    };

    for (i, face) in faces.iter().enumerate() {
        let Some(region) = crop_region(face, img.width(), img.height()) else {
            warn!(
                "Could not crop face #{} from {}, it might be too close to an edge.",
                i + 1,
                display_name(path)
            );
            continue;
        };

        let cropped = img.crop_imm(region.x, region.y, region.width, region.height);
        let output_path = output_dir.join(output_file_name(path, i, faces.len()));
        save_crop(cropped, &output_path)?;

        debug!("Saved face #{} from {:?} to {:?} ({:?})", i + 1, path, output_path, region);
        outcome.saved.push(output_path);
    }

    Ok(outcome)
}

fn save_crop(cropped: DynamicImage, output_path: &Path) -> Result<()> {
    // JPEG has no alpha channel.
    let cropped = match ImageFormat::from_path(output_path) {
        Ok(ImageFormat::Jpeg) if cropped.color().has_alpha() => DynamicImage::ImageRgb8(cropped.to_rgb8()),
        _ => cropped,
    };
    cropped.save(output_path).map_err(|source| CropError::Save {
        path: output_path.to_path_buf(),
        source,
    })
}

/// File name of `path` for user-facing messages.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

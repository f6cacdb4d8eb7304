use crate::error::{CropError, Result};
use image::DynamicImage;
use log::{debug, info, warn};
use rustface::{Detector, ImageData};
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the SeetaFace frontal model, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "model/seeta_fd_frontal_v1.0.bin";

const MODEL_URLS: [&str; 2] = [
    "https://github.com/atomashpolskiy/rustface/raw/master/model/seeta_fd_frontal_v1.0.bin",
    "https://raw.githubusercontent.com/atomashpolskiy/rustface/master/model/seeta_fd_frontal_v1.0.bin",
];

// Detection sensitivity. Fixed, not user-tunable.
const PYRAMID_SCALE_FACTOR: f32 = 1.0 / 1.3;
const MIN_FACE_SIZE: u32 = 20;
const SCORE_THRESHOLD: f64 = 2.0;
const WINDOW_STEP: u32 = 4;

/// Axis-aligned face region in source-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }
}

/// Anything that can locate faces in a decoded image.
///
/// An empty result means "no face found" and is not an error. Boxes are
/// returned in the order the backend yields them.
pub trait FaceDetector {
    fn detect_faces(&mut self, image: &DynamicImage) -> Result<Vec<BoundingBox>>;
}

impl<D: FaceDetector + ?Sized> FaceDetector for Box<D> {
    fn detect_faces(&mut self, image: &DynamicImage) -> Result<Vec<BoundingBox>> {
        (**self).detect_faces(image)
    }
}

/// RustFace (SeetaFace) frontal face detector.
pub struct RustFaceDetector {
    detector: Box<dyn Detector>,
}

impl RustFaceDetector {
    /// Load the model at `model_path`, downloading it first if the file is absent.
    pub fn new(model_path: &Path) -> Result<Self> {
        ensure_model(model_path)?;

        let path_str = model_path
            .to_str()
            .ok_or_else(|| CropError::ModelUnavailable(format!("non UTF-8 model path {:?}", model_path)))?;
        let mut detector = rustface::create_detector(path_str).map_err(|source| CropError::ModelLoad {
            path: model_path.to_path_buf(),
            source,
        })?;

        detector.set_min_face_size(MIN_FACE_SIZE);
        detector.set_score_thresh(SCORE_THRESHOLD);
        detector.set_pyramid_scale_factor(PYRAMID_SCALE_FACTOR);
        detector.set_slide_window_step(WINDOW_STEP, WINDOW_STEP);

        info!("Loaded face detection model from {:?}", model_path);
        Ok(Self { detector })
    }
}

impl FaceDetector for RustFaceDetector {
    fn detect_faces(&mut self, image: &DynamicImage) -> Result<Vec<BoundingBox>> {
        let gray = image.to_luma8();
        let (width, height) = gray.dimensions();
        let mut image_data = ImageData::new(gray.as_raw(), width, height);

        let faces = self.detector.detect(&mut image_data);
        debug!("Detector returned {} candidate(s)", faces.len());

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                BoundingBox::new(bbox.x(), bbox.y(), bbox.width() as i32, bbox.height() as i32)
            })
            .collect())
    }
}

/// Make sure the model file exists, fetching it from the known mirrors if needed.
fn ensure_model(model_path: &Path) -> Result<()> {
    ensure_model_from(model_path, &MODEL_URLS)
}

fn ensure_model_from(model_path: &Path, urls: &[&str]) -> Result<()> {
    if model_path.exists() {
        debug!("Model already exists at: {:?}", model_path);
        return Ok(());
    }

    if let Some(parent) = model_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| CropError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    println!("Downloading face detection model...");
    let mut last_error = None;
    for url in urls {
        info!("Trying to download from: {}", url);
        match download(url, model_path) {
            Ok(()) => {
                info!("Model downloaded successfully from {}", url);
                return Ok(());
            }
            Err(err) => {
                warn!("Failed to download from {}: {}", url, err);
                // Never leave a truncated model behind.
                let _ = fs::remove_file(model_path);
                last_error = Some(err);
            }
        }
    }

    match last_error {
        Some(err) => Err(CropError::ModelDownload {
            path: model_path.to_path_buf(),
            source: Box::new(err),
        }),
        None => Err(CropError::ModelUnavailable("no download sources configured".to_string())),
    }
}

fn download(url: &str, dest: &Path) -> Result<()> {
    let response = ureq::get(url).call().map_err(|source| CropError::Download {
        url: url.to_string(),
        source: Box::new(source),
    })?;
    let io_err = |source| CropError::Io {
        path: dest.to_path_buf(),
        source,
    };
    let mut reader = response.into_reader();
    let mut file = fs::File::create(dest).map_err(io_err)?;
    std::io::copy(&mut reader, &mut file).map_err(io_err)?;
    Ok(())
}

/// Resolve the model location, falling back to [`DEFAULT_MODEL_PATH`].
pub fn model_path_or_default(model: Option<PathBuf>) -> PathBuf {
    model.unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH))
}

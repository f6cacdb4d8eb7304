pub mod batch;
pub mod detector;
pub mod error;
pub mod geometry;
pub mod naming;
pub mod pipeline;

// Re-export commonly used items
pub use batch::{collect_inputs, process_path, validate_input, RunSummary};
pub use detector::{BoundingBox, FaceDetector, RustFaceDetector};
pub use error::CropError;
pub use geometry::{crop_region, CropRegion};
pub use naming::output_file_name;
pub use pipeline::{detect_and_crop, CropOutcome};

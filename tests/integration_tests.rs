use face_crop::error::Result;
use face_crop::{process_path, BoundingBox, CropError, FaceDetector, RunSummary};
use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Picks faces by image width so fixtures need no real faces.
struct WidthKeyed;

impl FaceDetector for WidthKeyed {
    fn detect_faces(&mut self, image: &DynamicImage) -> Result<Vec<BoundingBox>> {
        Ok(match image.width() {
            100 => vec![BoundingBox::new(30, 30, 20, 20)],
            120 => vec![BoundingBox::new(0, 0, 20, 20), BoundingBox::new(70, 40, 30, 25)],
            _ => vec![],
        })
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = Path::new(env!("CARGO_TARGET_TMPDIR")).join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_image(path: &Path, width: u32, height: u32, format: ImageFormat) {
    RgbImage::from_fn(width, height, |x, y| Rgb([(x * 2) as u8, (y * 2) as u8, 128]))
        .save_with_format(path, format)
        .unwrap();
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn directory_run_crops_every_face_and_ignores_other_files() {
    let root = scratch_dir("directory_run");
    let input = root.join("in");
    fs::create_dir_all(&input).unwrap();
    write_image(&input.join("a.jpg"), 100, 100, ImageFormat::Jpeg);
    write_image(&input.join("b.png"), 120, 90, ImageFormat::Png);
    fs::write(input.join("c.txt"), "not an image").unwrap();

    let output = root.join("out");
    let summary = process_path(&input, &output, &mut WidthKeyed).unwrap();

    assert_eq!(summary.faces_cropped, 3);
    assert_eq!(summary.files_processed, 2);
    assert_eq!(summary.to_string(), "Processing complete. Total faces cropped: 3.");
    assert_eq!(
        listing(&output),
        ["a_cropped.jpg", "b_cropped_1.png", "b_cropped_2.png"]
    );

    // a.jpg: 20x20 box well inside a 100x100 image -> 36x36 square
    assert_eq!(image::open(output.join("a_cropped.jpg")).unwrap().dimensions(), (36, 36));
    // b.png face #1 at the top-left corner gets clamped
    assert_eq!(image::open(output.join("b_cropped_1.png")).unwrap().dimensions(), (28, 28));
}

#[cfg(unix)]
#[test]
fn dangling_symlink_does_not_abort_the_batch() {
    let root = scratch_dir("dangling_symlink");
    let input = root.join("in");
    fs::create_dir_all(&input).unwrap();
    write_image(&input.join("good.png"), 100, 100, ImageFormat::Png);
    std::os::unix::fs::symlink(root.join("missing"), input.join("notes.txt")).unwrap();

    let output = root.join("out");
    let summary = process_path(&input, &output, &mut WidthKeyed).unwrap();
    assert_eq!(summary.faces_cropped, 1);
    assert_eq!(listing(&output), ["good_cropped.png"]);
}

#[test]
fn single_image_without_faces_writes_nothing() {
    let root = scratch_dir("no_faces");
    let input = root.join("landscape.png");
    write_image(&input, 64, 48, ImageFormat::Png);

    let output = root.join("out");
    let summary = process_path(&input, &output, &mut WidthKeyed).unwrap();

    assert_eq!(
        summary,
        RunSummary {
            files_processed: 1,
            files_without_faces: 1,
            ..RunSummary::default()
        }
    );
    assert!(output.is_dir());
    assert!(listing(&output).is_empty());
}

#[test]
fn repeated_runs_produce_identical_files() {
    let root = scratch_dir("idempotent");
    let input = root.join("group.png");
    write_image(&input, 120, 90, ImageFormat::Png);
    let output = root.join("out");

    process_path(&input, &output, &mut WidthKeyed).unwrap();
    let first: Vec<_> = listing(&output)
        .iter()
        .map(|n| fs::read(output.join(n)).unwrap())
        .collect();

    process_path(&input, &output, &mut WidthKeyed).unwrap();
    let second: Vec<_> = listing(&output)
        .iter()
        .map(|n| fs::read(output.join(n)).unwrap())
        .collect();

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[test]
fn unreadable_file_is_skipped_and_batch_continues() {
    let root = scratch_dir("unreadable");
    let input = root.join("in");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("broken.jpg"), b"\xff\xd8 truncated").unwrap();
    write_image(&input.join("good.png"), 100, 100, ImageFormat::Png);

    let output = root.join("out");
    let summary = process_path(&input, &output, &mut WidthKeyed).unwrap();

    assert_eq!(summary.files_skipped, 1);
    assert_eq!(summary.faces_cropped, 1);
    assert_eq!(listing(&output), ["good_cropped.png"]);
}

#[test]
fn empty_directory_is_a_successful_run() {
    let root = scratch_dir("empty_dir");
    let input = root.join("in");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("readme.md"), "# nothing").unwrap();

    let summary = process_path(&input, &root.join("out"), &mut WidthKeyed).unwrap();
    assert_eq!(summary, RunSummary::default());
}

#[test]
fn missing_input_leaves_output_untouched() {
    let root = scratch_dir("missing_input");
    let output = root.join("out");

    let err = process_path(&root.join("nope"), &output, &mut WidthKeyed).unwrap_err();
    assert!(matches!(err, CropError::InvalidInput(_)));
    assert!(!output.exists());
}

#[test]
fn cli_exits_non_zero_for_missing_input() {
    let root = scratch_dir("cli_missing_input");
    let output = root.join("out");

    let status = Command::new(env!("CARGO_BIN_EXE_face_crop"))
        .arg(root.join("nope"))
        .arg("--output")
        .arg(&output)
        .output()
        .unwrap();

    assert_eq!(status.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&status.stderr);
    assert!(stderr.contains("not a valid file or directory"), "{stderr}");
    assert!(!output.exists());
}

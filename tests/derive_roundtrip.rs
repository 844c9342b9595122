//! End-to-end derivations against real files.
//!
//! Every output is decoded again with the `image` crate to check the
//! format sniffed from its bytes and its exact dimensions.

use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, Rgb, RgbImage, RgbaImage};
use image_resizer::imaging::OutputFormat;
use image_resizer::sizes::ORIGINAL;
use image_resizer::{ResizerConfig, SizeSet, SizeSpec, Source, derive};
use std::io::BufWriter;
use std::path::Path;
use tempfile::TempDir;

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

fn create_jpeg(path: &Path, width: u32, height: u32) {
    let file = BufWriter::new(std::fs::File::create(path).unwrap());
    JpegEncoder::new(file)
        .write_image(gradient(width, height).as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
}

fn create_png(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, _| image::Rgba([200, 10, 10, (x % 256) as u8]));
    let file = BufWriter::new(std::fs::File::create(path).unwrap());
    PngEncoder::new(file)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
        .unwrap();
}

fn create_gif(path: &Path, width: u32, height: u32) {
    let mut file = BufWriter::new(std::fs::File::create(path).unwrap());
    GifEncoder::new(&mut file)
        .encode(gradient(width, height).as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
}

fn sniff(path: &Path) -> Option<ImageFormat> {
    image::ImageReader::open(path)
        .ok()?
        .with_guessed_format()
        .ok()?
        .format()
}

fn dimensions(path: &Path) -> (u32, u32) {
    image::image_dimensions(path).unwrap()
}

fn files_in(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

#[test]
fn jpeg_800x600_thumb_and_synthesized_original() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("Holiday Photo.jpg");
    create_jpeg(&source, 800, 600);
    let out = tmp.path().join("temp-images");

    let sizes = SizeSet::new().with("thumb", SizeSpec::width(200));
    let result = derive(Source::file(&source), &out, &sizes, &ResizerConfig::default()).unwrap();

    assert_eq!(result.labels(), ["thumb", ORIGINAL]);
    assert_eq!(dimensions(result.path("thumb").unwrap()), (200, 150));
    assert_eq!(dimensions(result.path(ORIGINAL).unwrap()), (800, 600));
    for variant in result.iter() {
        assert_eq!(variant.format, OutputFormat::WebP);
        assert_eq!(sniff(&variant.path), Some(ImageFormat::WebP));
        assert!(variant.path.starts_with(&out));
    }
}

#[test]
fn webp_outputs_have_exact_requested_dimensions() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("wide.png");
    create_png(&source, 333, 127);
    let out = tmp.path().join("out");

    let sizes = SizeSet::new()
        .with("w", SizeSpec::width(100))
        .with("h", SizeSpec::height(50))
        .with("box", SizeSpec::exact(64, 64))
        .with("up", SizeSpec::width(500));
    let result = derive(Source::file(&source), &out, &sizes, &ResizerConfig::default()).unwrap();

    // floor(127 * 100 / 333) = 38, floor(333 * 50 / 127) = 131, floor(127 * 500 / 333) = 190
    assert_eq!(dimensions(result.path("w").unwrap()), (100, 38));
    assert_eq!(dimensions(result.path("h").unwrap()), (131, 50));
    assert_eq!(dimensions(result.path("box").unwrap()), (64, 64));
    assert_eq!(dimensions(result.path("up").unwrap()), (500, 190));
    for variant in result.iter() {
        assert_eq!(dimensions(&variant.path), (variant.width, variant.height));
    }
}

#[test]
fn png_transparency_survives_into_webp() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("logo.png");
    create_png(&source, 64, 64);

    let result = derive(
        Source::file(&source),
        &tmp.path().join("out"),
        &SizeSet::new().with("small", SizeSpec::width(32)),
        &ResizerConfig::default(),
    )
    .unwrap();

    let decoded = image::open(result.path("small").unwrap()).unwrap();
    assert!(decoded.color().has_alpha());
}

#[test]
fn gif_source_produces_only_gif() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("spinner.GIF");
    create_gif(&source, 48, 48);

    let sizes = SizeSet::new()
        .with("small", SizeSpec::width(24))
        .with("tiny", SizeSpec::exact(8, 8));
    let result = derive(
        Source::file(&source),
        &tmp.path().join("out"),
        &sizes,
        &ResizerConfig::default(),
    )
    .unwrap();

    assert_eq!(result.len(), 3);
    for variant in result.iter() {
        assert_eq!(variant.format, OutputFormat::Gif);
        assert_eq!(sniff(&variant.path), Some(ImageFormat::Gif));
        assert_eq!(variant.path.extension().unwrap(), "gif");
    }
    assert_eq!(dimensions(result.path("tiny").unwrap()), (8, 8));
}

#[test]
fn upload_with_unknown_extension_is_probed() {
    let tmp = TempDir::new().unwrap();
    let stored = tmp.path().join("upl-91ac");
    create_png(&stored, 40, 20);

    let result = derive(
        Source::upload(&stored, "scan.tiff-ish"),
        &tmp.path().join("out"),
        &SizeSet::new(),
        &ResizerConfig::default(),
    )
    .unwrap();

    let original = result.path(ORIGINAL).unwrap();
    let name = original.file_name().unwrap().to_string_lossy();
    assert!(name.starts_with("scan-"), "{name}");
    assert_eq!(dimensions(original), (40, 20));
}

#[test]
fn corrupt_source_is_decode_error_and_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("broken.jpg");
    std::fs::write(&source, b"\xFF\xD8\xFF not really a jpeg").unwrap();
    let out = tmp.path().join("out");

    let err = derive(
        Source::file(&source),
        &out,
        &SizeSet::new().with("thumb", SizeSpec::width(10)),
        &ResizerConfig::default(),
    )
    .unwrap_err();

    assert!(err.is_decode_failure(), "{err}");
    assert_eq!(files_in(&out), 0);
}

#[test]
fn empty_source_is_decode_error() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("empty.png");
    std::fs::write(&source, b"").unwrap();

    let err = derive(
        Source::file(&source),
        &tmp.path().join("out"),
        &SizeSet::new(),
        &ResizerConfig::default(),
    )
    .unwrap_err();
    assert!(err.is_decode_failure());
}

#[test]
fn bitmap_source_goes_straight_to_webp() {
    let tmp = TempDir::new().unwrap();
    let bitmap = DynamicImage::ImageRgb8(gradient(120, 90));

    let result = derive(
        Source::bitmap(bitmap, "Screenshot 2024"),
        &tmp.path().join("out"),
        &SizeSet::new().with("half", SizeSpec::width(60)),
        &ResizerConfig::default(),
    )
    .unwrap();

    assert_eq!(dimensions(result.path("half").unwrap()), (60, 45));
    assert_eq!(dimensions(result.path(ORIGINAL).unwrap()), (120, 90));
    let name = result.path("half").unwrap().file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("screenshot-2024-"), "{name}");
}

#[test]
fn repeated_calls_do_not_collide() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("same.jpg");
    create_jpeg(&source, 32, 32);
    let out = tmp.path().join("out");
    let sizes = SizeSet::new();

    let mut paths = Vec::new();
    for _ in 0..20 {
        let result = derive(Source::file(&source), &out, &sizes, &ResizerConfig::default()).unwrap();
        paths.push(result.path(ORIGINAL).unwrap().to_path_buf());
    }

    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), 20);
    assert_eq!(files_in(&out), 20);
}

#[test]
fn output_paths_are_absolute() {
    let cwd = std::env::current_dir().unwrap();
    let tmp = tempfile::Builder::new()
        .prefix("roundtrip-relative-")
        .tempdir_in(&cwd)
        .unwrap();
    let relative = tmp.path().strip_prefix(&cwd).unwrap().join("temp-images");

    let result = derive(
        Source::bitmap(DynamicImage::ImageRgb8(gradient(20, 10)), "rel"),
        &relative,
        &SizeSet::new().with("small", SizeSpec::width(10)),
        &ResizerConfig::default(),
    )
    .unwrap();

    for variant in result.iter() {
        assert!(variant.path.is_absolute(), "{}", variant.path.display());
        assert_eq!(dimensions(&variant.path), (variant.width, variant.height));
    }
}

#[test]
fn parallel_config_produces_same_outputs() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("p.jpg");
    create_jpeg(&source, 160, 120);

    let config = ResizerConfig {
        parallel: true,
        quality: 60,
        ..ResizerConfig::default()
    };
    let sizes = SizeSet::new()
        .with("a", SizeSpec::width(80))
        .with("b", SizeSpec::width(40))
        .with("c", SizeSpec::height(30));
    let result = derive(Source::file(&source), &tmp.path().join("out"), &sizes, &config).unwrap();

    assert_eq!(result.labels(), ["a", "b", "c", ORIGINAL]);
    assert_eq!(dimensions(result.path("c").unwrap()), (40, 30));
}

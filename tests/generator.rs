//! End-to-end extraction from encoded images and directories.

use std::path::PathBuf;

use image::{Rgb, RgbImage};
use palette::Srgb;
use palettely::{GeneratorConfig, PaletteGenerator, SampleFilter, SortBy, extract_palette_bytes};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("palettely-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Four vertical stripes of flat color.
fn stripes(colors: [[u8; 3]; 4]) -> RgbImage {
    RgbImage::from_fn(64, 64, |x, _| Rgb(colors[(x / 16) as usize]))
}

fn nearest(colors: usize) -> GeneratorConfig {
    GeneratorConfig {
        colors,
        filter: SampleFilter::Nearest,
        ..GeneratorConfig::default()
    }
}

#[test]
fn stripes_are_recovered_exactly() {
    let palette = [[220, 30, 30], [30, 200, 40], [20, 40, 210], [240, 240, 240]];
    let path = scratch_dir("stripes").join("stripes.png");
    stripes(palette).save(&path).unwrap();

    let generator = PaletteGenerator::new(nearest(4)).unwrap();
    let mut colors = generator.generate(&path).unwrap();
    colors.sort_by_key(|c| c.into_components());

    let mut expected: Vec<Srgb<u8>> = palette.iter().map(|c| Srgb::from(*c)).collect();
    expected.sort_by_key(|c| c.into_components());
    assert_eq!(colors, expected);
}

#[test]
fn eye_catching_order_puts_vivid_colors_first() {
    let path = scratch_dir("vivid").join("vivid.png");
    stripes([[128, 128, 128], [250, 0, 0], [120, 120, 125], [10, 10, 10]])
        .save(&path)
        .unwrap();

    let generator = PaletteGenerator::new(GeneratorConfig {
        sort_by: SortBy::StandardDeviation,
        top: Some(1),
        ..nearest(4)
    })
    .unwrap();
    assert_eq!(generator.generate(&path).unwrap(), vec![Srgb::new(250, 0, 0)]);
}

#[test]
fn directory_batch_is_sorted_and_filtered() {
    let dir = scratch_dir("batch");
    stripes([[200, 0, 0]; 4]).save(dir.join("b.png")).unwrap();
    stripes([[0, 0, 200]; 4]).save(dir.join("a.PNG")).unwrap();
    std::fs::write(dir.join("notes.txt"), "not an image").unwrap();

    let generator = PaletteGenerator::new(nearest(3)).unwrap();
    let results = generator.generate_from_dir(&dir).unwrap();

    let names: Vec<_> = results
        .iter()
        .map(|(p, _)| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.PNG", "b.png"]);
    assert_eq!(results[0].1, vec![Srgb::new(0, 0, 200)]);
    assert_eq!(results[1].1, vec![Srgb::new(200, 0, 0)]);
}

#[test]
fn missing_directory_fails() {
    let generator = PaletteGenerator::default();
    assert!(generator.generate_from_dir(&scratch_dir("x").join("absent")).is_err());
}

#[test]
fn bytes_entry_point_matches_generator() {
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(stripes([[5, 5, 5], [250, 250, 250], [5, 5, 5], [250, 250, 250]]))
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();

    let config = GeneratorConfig {
        sort_by: SortBy::Value,
        ..nearest(2)
    };
    assert_eq!(
        extract_palette_bytes(&bytes, &config).unwrap(),
        vec!["#fafafa", "#050505"]
    );
}

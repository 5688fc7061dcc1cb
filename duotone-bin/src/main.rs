//! Print the dominant and complementary theme colors of images.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::unreadable_literal
)]

mod cli;

#[allow(clippy::wildcard_imports)]
use cli::*;

use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use clap::Parser;
use colored::Colorize;
use duotone::{ClusteringResult, Color, Config, PixelFormat, PixelSource};
use image::{DynamicImage, GenericImageView};
use palette::Srgb;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Record the running time of a function and log the elapsed time
macro_rules! time {
    ($name: literal, $func_call: expr) => {{
        let start = Instant::now();
        let result = $func_call;
        debug!("{} took {}ms", $name, start.elapsed().as_millis());
        result
    }};
}

/// Error cases for generating the palette of a single image
#[derive(Debug, Error)]
enum PaletteError {
    /// Failed to read or decode the image file
    #[error("Failed to load {}: {source}", path.display())]
    ImageLoad {
        /// The image path
        path: PathBuf,
        /// The decoding error
        source: image::ImageError,
    },
    /// The clustering engine rejected the image
    #[error("Failed to generate a palette for {}: {source}", path.display())]
    Palette {
        /// The image path
        path: PathBuf,
        /// The engine error
        source: duotone::Error,
    },
}

fn main() -> ExitCode {
    let options = Options::parse();
    init_logging(options.verbose);

    let results = run_generate_palettes(&options);

    // Returning Result<_> from main uses Debug printing instead of Display
    let mut failed = false;
    for (path, result) in options.images.iter().zip(&results) {
        match result {
            Ok(result) => print_result(path, result, &options),
            Err(e) => {
                eprintln!("{e}");
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Install a log subscriber on stderr. `RUST_LOG` takes precedence over `--verbose`.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds a thread pool and then generates each image's palette in parallel
#[cfg(feature = "threads")]
fn run_generate_palettes(options: &Options) -> Vec<Result<ClusteringResult, PaletteError>> {
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(usize::from(options.threads))
        .build()
        .expect("initialized thread pool");

    let config = options.config();
    pool.install(|| {
        options
            .images
            .par_iter()
            .map(|path| generate_palette(path, &config, options.seed))
            .collect()
    })
}

/// Generates each image's palette one after another
#[cfg(not(feature = "threads"))]
fn run_generate_palettes(options: &Options) -> Vec<Result<ClusteringResult, PaletteError>> {
    let config = options.config();
    options
        .images
        .iter()
        .map(|path| generate_palette(path, &config, options.seed))
        .collect()
}

/// Load an image and generate its palette
fn generate_palette(path: &Path, config: &Config, seed: u64) -> Result<ClusteringResult, PaletteError> {
    let image = time!("Image loading", load_image(path))?;
    let image = to_rgb8(image);
    let image = time!("Thumbnail", generate_thumbnail(&image, config.maxedge));

    let result = time!(
        "Palette generation",
        duotone::run(&*image, config, &mut Xoshiro256PlusPlus::seed_from_u64(seed))
    )
    .map_err(|source| PaletteError::Palette {
        path: path.to_owned(),
        source,
    })?;

    info!(
        path = %path.display(),
        iterations = result.iterations(),
        movement = result.movement(),
        clusters = result.clusters().len(),
        "generated palette"
    );

    if result.is_empty() {
        warn!("No colors survived filtering for {}", path.display());
    }

    Ok(result)
}

/// Load the image at the given path
fn load_image(path: &Path) -> Result<DynamicImage, PaletteError> {
    image::open(path).map_err(|source| PaletteError::ImageLoad {
        path: path.to_owned(),
        source,
    })
}

/// Convert grayscale, 16-bit, and float images to 8-bit RGB, which is all the engine accepts
fn to_rgb8(image: DynamicImage) -> DynamicImage {
    if image.format() == PixelFormat::RGB8 {
        image
    } else {
        debug!("Converting {:?} image to 8-bit RGB", image.color());
        DynamicImage::ImageRgb8(image.into_rgb8())
    }
}

/// Downscale the image to `maxedge` x `maxedge` if both of its sides are larger than `maxedge`
fn generate_thumbnail(image: &DynamicImage, maxedge: u32) -> Cow<'_, DynamicImage> {
    let thumbnail = duotone::thumbnail(image, maxedge);
    match thumbnail {
        Cow::Borrowed(_) => debug!("Skipping image thumbnail since a side was within max edge"),
        Cow::Owned(ref thumb) => {
            let (width, height) = thumb.dimensions();
            debug!("Created a thumbnail with dimensions {width}x{height}");
        }
    }
    thumbnail
}

/// Print the result for one image based off the provided options
fn print_result(path: &Path, result: &ClusteringResult, options: &Options) {
    if options.images.len() > 1 {
        println!("{}", path.display());
    }

    for round in result.history() {
        print_palette(round, options);
    }

    if options.all {
        let colors = result
            .clusters()
            .iter()
            .map(|cluster| (cluster.color(), Some(cluster.count())))
            .collect::<Vec<_>>();
        print_counted_palette(&colors, options);
    } else if let Some(theme) = result.theme() {
        print_palette(&[theme.dominant, theme.complementary], options);
    } else {
        // keep one line per image
        println!();
    }
}

/// Print a line of colors
fn print_palette(colors: &[Color], options: &Options) {
    let colors = colors.iter().map(|&color| (color, None)).collect::<Vec<_>>();
    print_counted_palette(&colors, options);
}

/// Print a line of colors, each followed by its pixel count if provided
fn print_counted_palette(colors: &[(Color, Option<u32>)], options: &Options) {
    match options.output {
        FormatOutput::Hex => color_format_print(colors, options, " ", |color| format!("#{color:x}")),

        FormatOutput::Rgb => color_format_print(colors, options, " ", |color| {
            format!("({},{},{})", color.red, color.green, color.blue)
        }),

        FormatOutput::Swatch => print_colors(colors, "", |color| {
            "   "
                .on_truecolor(color.red, color.green, color.blue)
                .to_string()
        }),
    }
}

/// Print a line of colors using the given format
fn print_colors(
    colors: &[(Color, Option<u32>)],
    delimiter: &str,
    format: impl Fn(Srgb<u8>) -> String,
) {
    println!(
        "{}",
        colors
            .iter()
            .map(|&(color, count)| {
                let text = format(color.to_srgb8());
                match count {
                    Some(count) => format!("{text}:{count}"),
                    None => text,
                }
            })
            .collect::<Vec<_>>()
            .join(delimiter)
    );
}

/// Format, colorize, and then print the text for all colors
fn color_format_print(
    colors: &[(Color, Option<u32>)],
    options: &Options,
    delimiter: &str,
    format: impl Fn(Srgb<u8>) -> String,
) {
    match options.colorize {
        Some(ColorizeOutput::Fg) => print_colors(colors, delimiter, |color| {
            format(color)
                .truecolor(color.red, color.green, color.blue)
                .to_string()
        }),

        Some(ColorizeOutput::Bg) => print_colors(colors, delimiter, |color| {
            format(color)
                .on_truecolor(color.red, color.green, color.blue)
                .to_string()
        }),

        None => print_colors(colors, delimiter, format),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn thumbnail_is_maxedge_square() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(640, 480));

        for maxedge in [1, 100, 180, 479] {
            let thumb = generate_thumbnail(&img, maxedge);
            assert_eq!(thumb.dimensions(), (maxedge, maxedge));
        }

        for maxedge in [480, 640, 1000] {
            assert!(matches!(generate_thumbnail(&img, maxedge), Cow::Borrowed(_)));
        }
    }

    #[test]
    fn grayscale_is_converted() {
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([100])));
        let rgb = to_rgb8(gray);
        assert_eq!(rgb.format(), PixelFormat::RGB8);
        assert_eq!(rgb.pixel_at(0, 0), Srgb::new(100, 100, 100));
    }

    #[test]
    fn rgb_is_kept() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([1, 2, 3])));
        assert_eq!(to_rgb8(image.clone()), image);
    }

    #[test]
    fn palette_matches_library_on_thumbnail() {
        let dir = std::env::temp_dir().join(format!("duotone-bin-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("halves.png");

        let image = RgbImage::from_fn(300, 200, |x, _| {
            if x < 150 {
                Rgb([200, 40, 30])
            } else {
                Rgb([20, 60, 190])
            }
        });
        image.save(&path).unwrap();

        let config = Config::default().with_k(2);
        let result = generate_palette(&path, &config, 3).unwrap();
        let expected = duotone::from_image(&DynamicImage::ImageRgb8(image), &config, 3).unwrap();
        assert_eq!(result, expected);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_an_error() {
        let config = Config::default();
        let result = generate_palette(Path::new("does/not/exist.png"), &config, 0);
        assert!(matches!(result, Err(PaletteError::ImageLoad { .. })));
    }
}

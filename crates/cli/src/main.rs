use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use faceblur_core::blurring::domain::blur_settings::{BlurProfile, BlurSettings};
use faceblur_core::blurring::infrastructure::blurrer_factory::create_blurrer;
use faceblur_core::imaging::domain::image_writer::default_output_path;
use faceblur_core::imaging::infrastructure::image_file_reader::ImageFileReader;
use faceblur_core::imaging::infrastructure::image_file_writer::ImageFileWriter;
use faceblur_core::pipeline::blur_image_use_case::BlurImageUseCase;
use faceblur_core::selection::domain::selection_session::EmptyRegionPolicy;
use faceblur_core::shared::constants::IMAGE_EXTENSIONS;
use faceblur_core::shared::frame::ChannelOrder;
use faceblur_core::shared::region::Region;

/// Gaussian-blur rectangular regions of an image.
#[derive(Parser, Debug)]
#[command(name = "faceblur")]
struct Cli {
    /// Input image file.
    input: PathBuf,

    /// Output file (defaults to <input>_blurred.png next to the input).
    output: Option<PathBuf>,

    /// Region to blur as x1,y1,x2,y2 in pixels. Repeat for several regions.
    #[arg(long = "region", short = 'r', allow_hyphen_values = true)]
    regions: Vec<Region>,

    /// Blur preset: strong (99px, sigma 30) or soft (23px, sigma 30).
    #[arg(long, default_value = "strong")]
    profile: BlurProfile,

    /// Gaussian kernel size (must be odd). Overrides the profile.
    #[arg(long)]
    kernel_size: Option<usize>,

    /// Gaussian sigma; 0 derives it from the kernel size. Overrides the profile.
    #[arg(long)]
    sigma: Option<f64>,

    /// Blur zero-area regions instead of dropping them.
    #[arg(long)]
    keep_empty: bool,

    /// Process pixels in BGR channel order.
    #[arg(long)]
    bgr: bool,
}

impl Cli {
    fn blur_settings(&self) -> BlurSettings {
        let preset = self.profile.settings();
        BlurSettings {
            kernel_size: self.kernel_size.unwrap_or(preset.kernel_size),
            sigma: self.sigma.unwrap_or(preset.sigma),
        }
    }

    fn policy(&self) -> EmptyRegionPolicy {
        if self.keep_empty {
            EmptyRegionPolicy::Keep
        } else {
            EmptyRegionPolicy::Discard
        }
    }

    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input))
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let settings = cli.blur_settings();
    let output = cli.output_path();
    let order = if cli.bgr {
        ChannelOrder::Bgr
    } else {
        ChannelOrder::Rgb
    };

    let mut use_case = BlurImageUseCase::new(
        Box::new(ImageFileReader::with_order(order)),
        Box::new(ImageFileWriter::new()),
        create_blurrer(settings)?,
        cli.policy(),
    );
    let blurred = use_case.execute(&cli.input, &output, &cli.regions)?;
    log::info!("Blurred {blurred} region(s), output written to {}", output.display());
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.is_file() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if !is_image(&cli.input) {
        return Err(format!("Unsupported input format: {}", cli.input.display()).into());
    }
    let output = cli.output_path();
    if !is_image(&output) {
        return Err(format!("Unsupported output format: {}", output.display()).into());
    }
    cli.blur_settings().validate()?;
    if cli.regions.is_empty() {
        log::warn!("No regions given, the image will be copied unchanged");
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

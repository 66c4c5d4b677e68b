use clap::{Parser, Subcommand};
use photomark::assets::{FsAssetSource, WatermarkVariant};
use photomark::imaging::RustBackend;
use photomark::upload::{RawUpload, StampRequest, UserMetadata};
use photomark::{config, naming, output, pipeline};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// The three text fields of the form.
#[derive(clap::Args, Clone)]
struct MetadataArgs {
    /// First name
    #[arg(long)]
    first_name: String,

    /// Last name
    #[arg(long)]
    last_name: String,

    /// Email address
    #[arg(long)]
    email: String,
}

impl MetadataArgs {
    fn into_metadata(self) -> UserMetadata {
        UserMetadata::new(self.first_name, self.last_name, self.email)
    }
}

#[derive(clap::Args, Clone)]
struct StampArgs {
    #[command(flatten)]
    metadata: MetadataArgs,

    /// Photo to stamp (JPEG, PNG, TIFF or WebP)
    #[arg(long)]
    photo: PathBuf,

    /// Watermark color: blue, black or white (anything else means blue)
    #[arg(long, default_value = "blue")]
    variant: String,

    /// Output directory (defaults to `output.dir` from config.toml)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print the result as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
#[command(name = "photomark")]
#[command(about = "Stamp a brand watermark onto a photo")]
#[command(long_about = "\
Stamp a brand watermark onto a photo

The watermark is scaled to 20% of the photo's width, placed in the
bottom-right corner with a 5% margin, and blended at 80% opacity. The
result is saved as JPEG and named after its owner:

  first_last_email.jpg   (lowercased, spaces → _, other symbols dropped)

Watermark assets are read from the asset root configured in config.toml:

  assets/
  ├── watermark-blue.png     # default
  ├── watermark-black.png
  └── watermark-white.png

Run 'photomark gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Watermark a photo and save it under the derived filename
    Stamp(StampArgs),
    /// Print the filename a stamped photo would get
    Name(MetadataArgs),
    /// Print a stock config.toml with all options documented
    GenConfig,
}

/// Initialize tracing to stderr; stdout is reserved for command output.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("photomark=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Exit status for metadata that fails validation.
const EXIT_INVALID_METADATA: u8 = 2;
/// Exit status for a failed stamp run.
const EXIT_PIPELINE_FAILED: u8 = 1;

async fn stamp(args: StampArgs, config_dir: &Path) -> Result<u8, Box<dyn std::error::Error>> {
    let config = config::load_config(config_dir)?;
    let metadata = args.metadata.into_metadata();
    if let Err(e) = metadata.validate() {
        eprintln!("{}", e);
        return Ok(EXIT_INVALID_METADATA);
    }

    let request = StampRequest {
        metadata,
        photo: RawUpload::from_path(&args.photo),
        variant: WatermarkVariant::from_selector(&args.variant),
    };
    let assets = FsAssetSource::new(config.asset_root(config_dir));
    let output_dir = args
        .output_dir
        .unwrap_or_else(|| PathBuf::from(&config.output.dir));

    match pipeline::run(request, &RustBackend::new(), &assets).await {
        Ok(artifact) => {
            let report = output::StampReport::new(&artifact, &output_dir.join(&artifact.filename));
            artifact.write_to(&output_dir).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_stamp_output(&report);
            }
            Ok(0)
        }
        Err(e) => {
            output::print_failure(&e);
            Ok(EXIT_PIPELINE_FAILED)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Command::Stamp(args) => {
            let status = stamp(args, &cli.config_dir).await?;
            return Ok(ExitCode::from(status));
        }
        Command::Name(args) => {
            println!("{}", naming::output_filename(&args.into_metadata()));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn stamp_args(tmp: &TempDir, email: &str) -> StampArgs {
        let cli = Cli::try_parse_from([
            "photomark",
            "stamp",
            "--first-name",
            "Ana",
            "--last-name",
            "López",
            "--email",
            email,
            "--photo",
            tmp.path().join("missing.jpg").to_str().unwrap(),
            "--output-dir",
            tmp.path().join("out").to_str().unwrap(),
        ])
        .unwrap();
        match cli.command {
            Command::Stamp(args) => args,
            _ => panic!("expected stamp"),
        }
    }

    #[tokio::test]
    async fn invalid_metadata_returns_status_two() {
        let tmp = TempDir::new().unwrap();
        let status = stamp(stamp_args(&tmp, "not-an-email"), tmp.path())
            .await
            .unwrap();
        assert_eq!(status, EXIT_INVALID_METADATA);
        assert!(!tmp.path().join("out").exists());
    }

    #[tokio::test]
    async fn pipeline_failure_returns_status_one() {
        let tmp = TempDir::new().unwrap();
        let status = stamp(stamp_args(&tmp, "ana@x.com"), tmp.path())
            .await
            .unwrap();
        assert_eq!(status, EXIT_PIPELINE_FAILED);
        assert!(!tmp.path().join("out").exists());
    }
}

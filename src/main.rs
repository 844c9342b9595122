use clap::{Parser, Subcommand};
use image_resizer::{NamedSize, SizeSet, Source, config, derive, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "image-resizer")]
#[command(about = "Derive named, resized variants of an image")]
#[command(long_about = "\
Derive named, resized variants of an image

Every variant is written as <slug>-<timestamp>-<label>.<ext> where ext is
gif for GIF sources and webp for everything else. An 'original' variant at
the source's natural size is always produced unless you name one yourself.

Sizes:

  --size thumb=200x150     exact size (stretched to fill)
  --size thumb=200         width 200, height keeps aspect ratio
  --size thumb=x150        height 150, width keeps aspect ratio

Configuration is read from <config-dir>/imageresizer.toml, layered over the
built-in defaults. Run 'image-resizer gen-config' to see every option.")]
#[command(version)]
struct Cli {
    /// Directory containing imageresizer.toml
    #[arg(long, default_value = "config", global = true)]
    config_dir: PathBuf,

    /// Log codec probing and every written variant
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resize one image into every requested size
    Derive {
        /// Source image file
        source: PathBuf,

        /// Name used for the output slug and codec choice instead of the
        /// source's own file name (e.g. the uploader's original filename)
        #[arg(long)]
        name: Option<String>,

        /// LABEL=WIDTHxHEIGHT; repeat for more sizes
        #[arg(long = "size", value_name = "LABEL=WxH")]
        sizes: Vec<NamedSize>,

        /// Output directory (overrides output_dir from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// WebP quality 0-100 (overrides quality from config)
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
        quality: Option<u32>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock imageresizer.toml with all options documented
    GenConfig,
    /// Write the stock imageresizer.toml into --config-dir
    PublishConfig {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Derive {
            source,
            name,
            sizes,
            output: output_dir,
            quality,
            json,
        } => {
            let mut config = config::load_config(&cli.config_dir)?;
            if let Some(q) = quality {
                config.quality = q;
            }
            let output_dir = output_dir.unwrap_or_else(|| config.output_dir.clone());

            let sizes: SizeSet = sizes.into_iter().map(|s| (s.label, s.spec)).collect();
            let source_name = name.clone().unwrap_or_else(|| {
                source
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });
            let input = match name {
                Some(client_name) => Source::upload(&source, client_name),
                None => Source::file(&source),
            };

            let result = derive(input, &output_dir, &sizes, &config)?;

            if json {
                let report = output::derivation_json(&result);
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_derivation(&source_name, &output_dir, &result);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::PublishConfig { force } => {
            let path = config::publish_config(&cli.config_dir, force)?;
            println!("Published {}", path.display());
        }
    }

    Ok(())
}

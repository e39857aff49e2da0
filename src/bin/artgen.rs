//! CLI for artgen - prompt-to-image generation.

use artgen::{
    AppConfig, GenerationRequest, Generator, ImageSize, MockProvider, StabilityProvider,
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "artgen")]
#[command(about = "Generate an image from a text prompt (mock or Stability AI)")]
#[command(version)]
struct Cli {
    /// The text prompt describing the image
    prompt: String,

    /// Image size as WxH
    #[arg(short, long, default_value = "768x768")]
    size: String,

    /// Negative prompt (what the image should avoid)
    #[arg(short, long)]
    negative_prompt: Option<String>,

    /// Seed for deterministic generation
    #[arg(long)]
    seed: Option<i64>,

    /// Output file path
    #[arg(short, long, default_value = "artgen.png")]
    output: PathBuf,

    /// Provider override; without it the PROVIDER env var decides, default mock
    #[arg(short, long, value_enum)]
    provider: Option<ProviderArg>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProviderArg {
    Mock,
    Stability,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("artgen=debug")
    } else {
        EnvFilter::new("artgen=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let size: ImageSize = cli.size.parse()?;
    let mut request = GenerationRequest::new(&cli.prompt).with_size(size);
    if let Some(negative) = cli.negative_prompt {
        request = request.with_negative_prompt(negative);
    }
    if let Some(seed) = cli.seed {
        request = request.with_seed(seed);
    }

    // An explicit --provider is strict: a missing credential fails here
    // instead of downgrading to mock.
    let generator = match cli.provider {
        Some(ProviderArg::Mock) => Generator::new(Box::new(MockProvider::new())),
        Some(ProviderArg::Stability) => {
            Generator::new(Box::new(StabilityProvider::builder().build()?))
        }
        None => Generator::from_config(&AppConfig::from_env()),
    };

    let outcome = generator.generate_image(&request).await;
    println!("{}", outcome.status);

    match outcome.image {
        Some(image) => {
            image.save(&cli.output)?;
            println!(
                "Saved image: {} ({}x{}) via {}",
                cli.output.display(),
                image.width(),
                image.height(),
                generator.provider_kind()
            );
            Ok(())
        }
        None => anyhow::bail!("no image generated"),
    }
}

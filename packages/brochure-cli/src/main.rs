//! Command-line front end for the brochure generator.
//!
//! Streams the brochure to stdout as chunks arrive, then optionally
//! writes the markdown and a PDF export.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use futures::StreamExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use brochure::{
    export_pdf, BrochureConfig, BrochureRequest, OpenAIBrochureSynthesizer, Tone, LANGUAGES,
};

#[derive(Parser)]
#[command(
    name = "brochure",
    about = "Generate an AI marketing brochure from a company website"
)]
struct Args {
    /// Company name to feature in the brochure
    company: String,

    /// Seed URL of the company website (including https://)
    url: String,

    /// Output language (English, Spanish, French, German, Italian,
    /// Portuguese, Chinese, Japanese)
    #[arg(long, default_value = "English")]
    language: String,

    /// Writing tone (Professional, Friendly, Technical, Creative,
    /// Minimalist, Enthusiastic, Humorous)
    #[arg(long, default_value = "Professional")]
    tone: Tone,

    /// Model to use instead of the default
    #[arg(long)]
    model: Option<String>,

    /// Write the markdown brochure to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Also export a PDF to this file
    #[arg(long)]
    pdf: Option<PathBuf>,
}

/// A usable seed URL has a web scheme and a host.
fn validate_seed_url(raw: &str) -> Result<()> {
    let parsed = url::Url::parse(raw).with_context(|| format!("invalid URL: {}", raw))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("seed URL must use http or https: {}", raw);
    }
    if parsed.host_str().is_none() {
        bail!("seed URL has no host: {}", raw);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    validate_seed_url(&args.url)?;
    if !LANGUAGES.contains(&args.language.as_str()) {
        bail!(
            "unsupported language '{}' (expected one of: {})",
            args.language,
            LANGUAGES.join(", ")
        );
    }

    // Credential problems are fatal before any request is issued
    let mut config = BrochureConfig::from_env()?;
    if let Some(model) = args.model {
        config = config.with_model(model);
    }

    let synthesizer = OpenAIBrochureSynthesizer::from_config(&config);
    let request = BrochureRequest::new(&args.company, &args.url)
        .with_language(&args.language)
        .with_tone(args.tone);

    info!(company = %request.company_name, url = %request.seed_url, "generating brochure");

    let mut document = String::new();
    let mut stdout = std::io::stdout();
    let stream = synthesizer.stream_brochure(&request);
    futures::pin_mut!(stream);

    while let Some(chunk) = stream.next().await {
        if chunk.starts_with("Error") {
            if !document.is_empty() {
                println!();
            }
            bail!("{}", chunk);
        }
        print!("{}", chunk);
        stdout.flush().ok();
        document.push_str(&chunk);
    }
    println!();

    if let Some(path) = &args.output {
        std::fs::write(path, &document)
            .with_context(|| format!("could not write {}", path.display()))?;
        info!(path = %path.display(), "markdown written");
    }

    if let Some(path) = &args.pdf {
        let bytes = export_pdf(&document).context("PDF export failed")?;
        std::fs::write(path, bytes)
            .with_context(|| format!("could not write {}", path.display()))?;
        info!(path = %path.display(), "PDF written");
    }

    Ok(())
}

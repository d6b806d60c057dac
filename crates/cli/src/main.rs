//! CLI tool for generating themed slide decks from a topic.

use anyhow::{Context, Result};
use clap::Parser;
use deckgen_core::{DeckRequest, DEFAULT_AUDIENCE, DEFAULT_SLIDE_COUNT, DEFAULT_TONE, DEFAULT_VISUAL_STYLE};
use deckgen_engine::{Config, DeckGenerator};
use deckgen_pptx::DeckReader;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Generate a themed .pptx deck from a topic.
#[derive(Parser, Debug)]
#[command(name = "deckgen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Subject of the deck
    #[arg(short, long)]
    topic: String,

    /// Who the deck is for
    #[arg(short, long, default_value = DEFAULT_AUDIENCE)]
    audience: String,

    /// Writing tone
    #[arg(long, default_value = DEFAULT_TONE)]
    tone: String,

    /// Visual style hint for the outline
    #[arg(long, default_value = DEFAULT_VISUAL_STYLE)]
    style: String,

    /// Desired number of outline slides
    #[arg(short = 'n', long, default_value_t = DEFAULT_SLIDE_COUNT, value_parser = clap::value_parser!(u32).range(1..=50))]
    slides: u32,

    /// Deck title (default: the outline's title, then the topic)
    #[arg(long)]
    title: Option<String>,

    /// Deck subtitle
    #[arg(long)]
    subtitle: Option<String>,

    /// Author line on the title slide
    #[arg(long)]
    author: Option<String>,

    /// Logo image placed on the title slide
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Output file (default: presentation_<unix-seconds>.pptx)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Skip stock-photo downloads
    #[arg(long)]
    no_images: bool,

    /// Model name (overrides GEMINI_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Print the normalized outline as JSON and exit
    #[arg(long)]
    print_outline: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    dotenvy::dotenv().ok();

    let config = build_config(&args);
    let request = build_request(&args)?;
    let generator = DeckGenerator::from_config(&config).context("Invalid configuration")?;

    if args.print_outline {
        let outline = generator.outline(&request);
        println!(
            "{}",
            serde_json::to_string_pretty(&outline).context("Failed to serialize outline")?
        );
        return Ok(());
    }

    let output = output_path(args.out.as_deref())?;
    let saved = generator
        .generate(&request, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Saved: {}", saved.display());

    if args.verbose {
        print_summary(&saved)?;
    }

    Ok(())
}

fn build_config(args: &Args) -> Config {
    let mut config = Config::from_env();
    if let Some(model) = &args.model {
        config = config.with_model(model.as_str());
    }
    if args.no_images {
        config = config.without_images();
    }
    config
}

fn build_request(args: &Args) -> Result<DeckRequest> {
    let mut request = DeckRequest::new(args.topic.as_str())
        .context("Invalid request")?
        .with_audience(args.audience.as_str())
        .with_tone(args.tone.as_str())
        .with_visual_style(args.style.as_str())
        .with_slide_count(args.slides);

    if let Some(title) = &args.title {
        request = request.with_title(title.as_str());
    }
    if let Some(subtitle) = &args.subtitle {
        request = request.with_subtitle(subtitle.as_str());
    }
    if let Some(author) = &args.author {
        request = request.with_author(author.as_str());
    }
    if let Some(logo) = &args.logo {
        if !logo.exists() {
            log::warn!("Logo {} not found, skipping", logo.display());
        }
        request = request.with_logo(logo.clone());
    }

    Ok(request)
}

/// Resolve the output path, creating parent directories as needed.
fn output_path(requested: Option<&Path>) -> Result<PathBuf> {
    let path = match requested {
        Some(path) => path.to_path_buf(),
        None => {
            let secs = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            PathBuf::from(format!("presentation_{}.pptx", secs))
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    Ok(path)
}

/// Print one line per slide read back from the written file.
fn print_summary(path: &Path) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let slides = DeckReader::new()
        .read(file)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    eprintln!("  {} slides", slides.len());
    for slide in &slides {
        let mut marks = String::new();
        if slide.has_picture {
            marks.push_str(" [picture]");
        }
        if slide.has_chart {
            marks.push_str(" [chart]");
        }
        let headline = slide.texts.first().map(String::as_str).unwrap_or("");
        eprintln!("  {:>2}. {}{}", slide.number, headline, marks);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["deckgen", "--topic", "Solar"]).unwrap();
        assert_eq!(args.slides, DEFAULT_SLIDE_COUNT);
        assert_eq!(args.audience, DEFAULT_AUDIENCE);
        assert!(!args.no_images);

        let request = build_request(&args).unwrap();
        assert_eq!(request.topic, "Solar");
        assert_eq!(request.tone, DEFAULT_TONE);
        assert!(request.title.is_none());
    }

    #[test]
    fn test_args_slide_range() {
        assert!(Args::try_parse_from(["deckgen", "--topic", "x", "--slides", "0"]).is_err());
        assert!(Args::try_parse_from(["deckgen", "--topic", "x", "--slides", "51"]).is_err());
        assert!(Args::try_parse_from(["deckgen", "--topic", "x", "--slides", "50"]).is_ok());
        assert!(Args::try_parse_from(["deckgen"]).is_err());
    }

    #[test]
    fn test_blank_topic_rejected() {
        let args = Args::try_parse_from(["deckgen", "--topic", "   "]).unwrap();
        assert!(build_request(&args).is_err());
    }

    #[test]
    fn test_request_overrides() {
        let args = Args::try_parse_from([
            "deckgen", "--topic", "Solar", "--title", "Sun", "--subtitle", "Power", "--author", "Ada",
            "--logo", "logo.png",
        ])
        .unwrap();
        let request = build_request(&args).unwrap();
        assert_eq!(request.title.as_deref(), Some("Sun"));
        assert_eq!(request.subtitle.as_deref(), Some("Power"));
        assert_eq!(request.author.as_deref(), Some("Ada"));
        assert_eq!(request.logo_path, Some(PathBuf::from("logo.png")));
    }

    #[test]
    fn test_output_path_default_name() {
        let path = output_path(None).unwrap();
        let name = path.to_str().unwrap();
        assert!(name.starts_with("presentation_"));
        assert!(name.ends_with(".pptx"));
    }

    #[test]
    fn test_output_path_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("deck.pptx");
        let path = output_path(Some(&target)).unwrap();
        assert!(dir.path().join("nested").is_dir());
        assert_eq!(path, target);
    }
}

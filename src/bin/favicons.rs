use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use favicon_renderer::{Configuration, FaviconGenerator, IconsSetting, Platform, Source};

#[derive(Parser, Debug)]
#[command(name = "favicons", version)]
struct Cli {
    /// Source images (SVG or raster). Several rasters act as one size set.
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Output directory.
    #[arg(long, default_value = "favicons")]
    out: PathBuf,

    /// Configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base path icon URLs are resolved against (overrides the config).
    #[arg(long)]
    path: Option<String>,

    /// Only generate these platforms, e.g. `--platform favicons --platform android`.
    #[arg(long = "platform")]
    platforms: Vec<String>,

    /// Also write every HTML tag into this file.
    #[arg(long)]
    html_file: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = build_config(&cli).await?;

    let source = match cli.sources.as_slice() {
        [single] => Source::Path(single.clone()),
        many => Source::List(many.iter().cloned().map(Source::Path).collect()),
    };

    let response = FaviconGenerator::new(config)
        .generate(source)
        .await
        .context("generate favicons")?;

    tokio::fs::create_dir_all(&cli.out)
        .await
        .with_context(|| format!("create output directory '{}'", cli.out.display()))?;

    for image in &response.images {
        write(&cli.out, &image.name, &image.contents).await?;
    }
    for file in &response.files {
        write(&cli.out, &file.name, file.contents.as_bytes()).await?;
    }

    println!("{}", response.html.join("\n"));
    eprintln!(
        "wrote {} images and {} files to {}",
        response.images.len(),
        response.files.len(),
        cli.out.display()
    );
    Ok(())
}

async fn build_config(cli: &Cli) -> anyhow::Result<Configuration> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("read configuration '{}'", path.display()))?;
            Configuration::from_json(&json).with_context(|| "parse configuration JSON")?
        }
        None => Configuration::new(),
    };

    if let Some(path) = &cli.path {
        config.path = path.clone();
    }
    if let Some(name) = &cli.html_file {
        config.html_file = Some(name.clone());
    }
    if !cli.platforms.is_empty() {
        let platforms = cli
            .platforms
            .iter()
            .map(|id| {
                Platform::from_id(id).with_context(|| {
                    let known: Vec<_> = Platform::ALL.iter().map(|p| p.id()).collect();
                    format!("unknown platform '{id}' (expected one of {})", known.join(", "))
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        // Keep per-platform options from the config file for selected platforms.
        for platform in Platform::ALL {
            let selected = platforms.contains(&platform);
            match config.icons.get(&platform) {
                Some(IconsSetting::Options(_)) if selected => {}
                _ => {
                    config.icons.insert(platform, IconsSetting::Enabled(selected));
                }
            }
        }
    }
    Ok(config)
}

async fn write(dir: &Path, name: &str, contents: &[u8]) -> anyhow::Result<()> {
    let path = dir.join(name);
    tokio::fs::write(&path, contents)
        .await
        .with_context(|| format!("write '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote output");
    Ok(())
}

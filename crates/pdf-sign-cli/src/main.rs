use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use pdf_sign::constants::{OPACITY_MAX, OPACITY_MIN};
use pdf_sign::{
    DocumentRef, DragPayload, ExportGateway, FontLibrary, FontdueRasterizer, NormRect, Rgb, ScriptFont,
    Session, SignatureAnnotation, SignatureRenderer, SignerConfig, TypedStyle,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pdfsign", about = "PDF e-signature CLI", version)]
struct Cli {
    /// Configuration file (JSON); defaults apply when it does not exist
    #[arg(long, global = true, default_value = "pdf-sign.json")]
    config: PathBuf,

    /// Signing backend URL, overriding the configuration
    #[arg(long, global = true)]
    backend: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a typed signature to a PNG
    Compose {
        /// Signature text
        #[arg(short, long)]
        text: String,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Script font
        #[arg(long, default_value = "dancing-script", value_enum)]
        font: FontArg,

        /// Font size in pixels (8-72)
        #[arg(long, default_value = "20")]
        size: f32,

        /// Ink color as #rrggbb
        #[arg(long, default_value = "#000000")]
        color: Rgb,

        /// Directory holding the font files, overriding the configuration
        #[arg(long)]
        font_dir: Option<PathBuf>,
    },

    /// Upload a PDF and print its backend URL
    Upload {
        /// PDF to upload
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        login: LoginArgs,
    },

    /// Request a signed PDF for a set of placements
    Sign {
        /// Backend URL of an uploaded document, or a local PDF to upload first
        #[arg(short, long)]
        document: String,

        /// JSON array of placements: page, image, x, y, width, height, opacity
        #[arg(short, long)]
        placements: PathBuf,

        /// Directory for signed.pdf, overriding the configuration
        #[arg(long)]
        out_dir: Option<PathBuf>,

        #[command(flatten)]
        login: LoginArgs,
    },
}

#[derive(clap::Args)]
struct LoginArgs {
    /// Account email
    #[arg(long)]
    email: String,

    /// Account password
    #[arg(long)]
    password: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum FontArg {
    DancingScript,
    Pacifico,
    Satisfy,
    GreatVibes,
    AlexBrush,
    MarckScript,
}

impl From<FontArg> for ScriptFont {
    fn from(arg: FontArg) -> Self {
        match arg {
            FontArg::DancingScript => Self::DancingScript,
            FontArg::Pacifico => Self::Pacifico,
            FontArg::Satisfy => Self::Satisfy,
            FontArg::GreatVibes => Self::GreatVibes,
            FontArg::AlexBrush => Self::AlexBrush,
            FontArg::MarckScript => Self::MarckScript,
        }
    }
}

/// One entry of the placements file. Coordinates are fractions of the page.
#[derive(Debug, Deserialize)]
struct PlacementSpec {
    page: usize,
    /// PNG file, relative to the placements file
    image: PathBuf,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    #[serde(default = "full_opacity")]
    opacity: f32,
}

fn full_opacity() -> f32 {
    1.0
}

fn load_placements(path: &Path) -> Result<Vec<SignatureAnnotation>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read placements from {}", path.display()))?;
    let specs: Vec<PlacementSpec> = serde_json::from_str(&json)
        .with_context(|| format!("Invalid placements file {}", path.display()))?;
    if specs.is_empty() {
        bail!("{} contains no placements", path.display());
    }

    let base = path.parent().unwrap_or(Path::new("."));
    specs
        .into_iter()
        .map(|spec| {
            let rect = NormRect {
                x: spec.x,
                y: spec.y,
                width: spec.width,
                height: spec.height,
            };
            if !rect.is_within_unit() {
                bail!("Placement on page {} lies outside the page: {:?}", spec.page, rect);
            }
            if !spec.opacity.is_finite() {
                bail!("Placement on page {} has invalid opacity {}", spec.page, spec.opacity);
            }
            let image_path = base.join(&spec.image);
            let png = std::fs::read(&image_path)
                .with_context(|| format!("Failed to read {}", image_path.display()))?;
            let image = image::load_from_memory_with_format(&png, image::ImageFormat::Png)
                .with_context(|| format!("{} is not a PNG", image_path.display()))?
                .into_rgba8();
            Ok(SignatureAnnotation::new(
                spec.page,
                Arc::new(image),
                Arc::new(png),
                rect,
                spec.opacity.clamp(OPACITY_MIN, OPACITY_MAX),
            ))
        })
        .collect()
}

async fn logged_in_session(config: &SignerConfig, login: LoginArgs) -> Result<Session> {
    let mut session = Session::new(config.backend_url.clone());
    let session = tokio::task::spawn_blocking(move || {
        session.login(&login.email, &login.password)?;
        Ok::<_, pdf_sign::SignError>(session)
    })
    .await??;
    Ok(session)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = SignerConfig::load_or_default(&cli.config).await?;
    if let Some(backend) = cli.backend {
        config.backend_url = backend;
    }
    config.validate()?;

    match cli.command {
        Commands::Compose {
            text,
            output,
            font,
            size,
            color,
            font_dir,
        } => {
            let fonts = FontLibrary::new(font_dir.unwrap_or(config.font_dir.clone()));
            let renderer = SignatureRenderer::new(
                FontdueRasterizer::new(fonts),
                config.raster_scale,
                config.raster_timeout(),
            );
            let style = TypedStyle {
                text,
                font: font.into(),
                font_size: size.clamp(
                    pdf_sign::constants::FONT_SIZE_MIN,
                    pdf_sign::constants::FONT_SIZE_MAX,
                ),
                color,
                ..Default::default()
            };
            let raster = renderer.render(&DragPayload::Typed(style)).await?;
            tokio::fs::write(&output, raster.png.as_slice()).await?;
            println!(
                "Composed {}x{} signature → {}",
                raster.image.width(),
                raster.image.height(),
                output.display()
            );
        }

        Commands::Upload { input, login } => {
            let session = logged_in_session(&config, login).await?;
            let doc = tokio::task::spawn_blocking(move || session.upload(&input)).await??;
            println!("{}", doc);
        }

        Commands::Sign {
            document,
            placements,
            out_dir,
            login,
        } => {
            let annotations = load_placements(&placements)?;
            let count = annotations.len();
            let session = logged_in_session(&config, login).await?;
            let download_dir = out_dir.unwrap_or(config.download_dir.clone());

            let path = tokio::task::spawn_blocking(move || {
                let doc = if document.starts_with("http://") || document.starts_with("https://") {
                    DocumentRef::Remote(document)
                } else {
                    let doc = session.upload(Path::new(&document))?;
                    println!("Uploaded → {}", doc);
                    doc
                };
                ExportGateway::new(&session, download_dir).export(&doc, &annotations)
            })
            .await??;
            println!("Signed {} placements → {}", count, path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str) {
        RgbaImage::new(30, 10).save(dir.join(name)).unwrap();
    }

    #[test]
    fn placements_resolve_images_next_to_the_file() {
        let dir = TempDir::new().unwrap();
        write_png(dir.path(), "jane.png");
        let file = dir.path().join("placements.json");
        std::fs::write(
            &file,
            r#"[{ "page": 1, "image": "jane.png", "x": 0.1, "y": 0.2, "width": 0.3, "height": 0.05 }]"#,
        )
        .unwrap();

        let annotations = load_placements(&file).unwrap();
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].page, 1);
        assert_eq!(annotations[0].opacity, 1.0);
        assert_eq!(annotations[0].image.dimensions(), (30, 10));
    }

    #[test]
    fn placements_outside_the_page_are_rejected() {
        let dir = TempDir::new().unwrap();
        write_png(dir.path(), "jane.png");
        let file = dir.path().join("placements.json");
        std::fs::write(
            &file,
            r#"[{ "page": 0, "image": "jane.png", "x": 0.9, "y": 0.2, "width": 0.3, "height": 0.05 }]"#,
        )
        .unwrap();
        assert!(load_placements(&file).is_err());

        std::fs::write(&file, "[]").unwrap();
        assert!(load_placements(&file).is_err());
    }

    #[test]
    fn placement_opacity_stays_in_visible_range() {
        let dir = TempDir::new().unwrap();
        write_png(dir.path(), "jane.png");
        let file = dir.path().join("placements.json");
        std::fs::write(
            &file,
            r#"[
                { "page": 0, "image": "jane.png", "x": 0.1, "y": 0.1, "width": 0.3, "height": 0.05, "opacity": 0.0 },
                { "page": 0, "image": "jane.png", "x": 0.1, "y": 0.5, "width": 0.3, "height": 0.05, "opacity": 4.0 }
            ]"#,
        )
        .unwrap();

        let annotations = load_placements(&file).unwrap();
        assert_eq!(annotations[0].opacity, OPACITY_MIN);
        assert_eq!(annotations[1].opacity, OPACITY_MAX);
    }

    #[test]
    fn cli_parses_sign_command() {
        let cli = Cli::try_parse_from([
            "pdfsign",
            "--backend",
            "http://localhost:4000",
            "sign",
            "--document",
            "contract.pdf",
            "--placements",
            "p.json",
            "--email",
            "jane@example.org",
            "--password",
            "pw",
        ])
        .unwrap();
        assert_eq!(cli.backend.as_deref(), Some("http://localhost:4000"));
        assert!(matches!(cli.command, Commands::Sign { .. }));
    }
}

//! CLI argument parsing with clap.

use clap::Parser;

use crate::request::{
    AspectRatio, GenerationRequest, Quality, ReferenceImage, SubjectKind, MAX_SUBJECT_TEXT_CHARS,
};

/// AI portrait generation for tabletop subjects - pooled, brokered, or BYOK.
#[derive(Parser, Debug)]
#[command(name = "easel", version, about)]
pub struct Cli {
    /// Subject description text.
    #[arg(conflicts_with = "text_file")]
    pub text: Option<String>,

    /// Path to a file containing the subject description (character sheet
    /// or journal extract).
    #[arg(short = 'p', long, conflicts_with = "text")]
    pub text_file: Option<String>,

    /// Subject kind: character, creature, scene, item.
    #[arg(short, long, default_value = "character")]
    pub kind: SubjectKind,

    /// Context prompt that overrides the subject text on conflict.
    #[arg(short = 'c', long)]
    pub context: Option<String>,

    /// Reference image path (repeatable, up to 4).
    #[arg(short = 'r', long = "reference")]
    pub references: Vec<String>,

    /// Quality: low, medium, high.
    #[arg(short, long)]
    pub quality: Option<Quality>,

    /// Aspect ratio: square, landscape, portrait.
    #[arg(short, long)]
    pub aspect_ratio: Option<AspectRatio>,

    /// Synthesis model identifier.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Output file path (auto-generated if not specified).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Fetch the curated cocktail instead of generating an image.
    #[arg(long)]
    pub cocktail: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the subject text from either the positional argument or the
    /// file flag, truncated to the pipeline's character cap.
    ///
    /// # Errors
    ///
    /// Returns an error if neither text nor text-file is provided, or if
    /// the file cannot be read.
    pub fn resolve_text(&self) -> Result<String, std::io::Error> {
        let raw = if let Some(ref text) = self.text {
            text.clone()
        } else if let Some(ref path) = self.text_file {
            std::fs::read_to_string(path)?
        } else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Provide subject text or use -p/--text-file",
            ));
        };
        Ok(raw.chars().take(MAX_SUBJECT_TEXT_CHARS).collect())
    }

    /// Build the generation request from the parsed arguments and resolved
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the subject text or a reference image cannot be
    /// read.
    pub fn build_request(
        &self,
        default_model: &str,
        default_aspect: AspectRatio,
        default_quality: Quality,
    ) -> Result<GenerationRequest, std::io::Error> {
        let raw_text = self.resolve_text()?;
        let mut reference_images = Vec::with_capacity(self.references.len());
        for path in &self.references {
            reference_images.push(load_reference(path)?);
        }

        Ok(GenerationRequest {
            subject_kind: self.kind,
            raw_text,
            context_prompt: self.context.clone(),
            reference_images,
            quality: self.quality.unwrap_or(default_quality),
            aspect_ratio: self.aspect_ratio.unwrap_or(default_aspect),
            model: self.model.clone().unwrap_or_else(|| default_model.to_string()),
        })
    }
}

/// Load a reference image from disk, deriving the MIME type from the
/// extension.
fn load_reference(path: &str) -> Result<ReferenceImage, std::io::Error> {
    let data = std::fs::read(path)?;
    let mime_type = match std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "image/png",
    };
    Ok(ReferenceImage { data, mime_type: mime_type.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_text() {
        let cli = Cli::parse_from(["easel", "a dwarf"]);
        assert_eq!(cli.text.as_deref(), Some("a dwarf"));
        assert!(cli.text_file.is_none());
        assert_eq!(cli.resolve_text().unwrap(), "a dwarf");
    }

    #[test]
    fn text_file_flag() {
        let dir = std::env::temp_dir().join("easel_cli_tf_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("subject.txt");
        std::fs::write(&path, "text from file").unwrap();

        let cli = Cli::parse_from(["easel", "-p", path.to_str().unwrap()]);
        assert!(cli.text.is_none());
        assert_eq!(cli.resolve_text().unwrap(), "text from file");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_text_is_truncated_at_cap() {
        let dir = std::env::temp_dir().join("easel_cli_trunc_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("long.txt");
        std::fs::write(&path, "x".repeat(MAX_SUBJECT_TEXT_CHARS + 100)).unwrap();

        let cli = Cli::parse_from(["easel", "-p", path.to_str().unwrap()]);
        assert_eq!(cli.resolve_text().unwrap().chars().count(), MAX_SUBJECT_TEXT_CHARS);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn default_values() {
        let cli = Cli::parse_from(["easel", "a dwarf"]);
        assert_eq!(cli.kind, SubjectKind::Character);
        assert!(cli.context.is_none());
        assert!(cli.references.is_empty());
        assert!(cli.quality.is_none());
        assert!(cli.aspect_ratio.is_none());
        assert!(cli.model.is_none());
        assert!(!cli.cocktail);
        assert!(!cli.verbose);
    }

    #[test]
    fn all_options() {
        let cli = Cli::parse_from([
            "easel",
            "-k",
            "scene",
            "-c",
            "at dusk",
            "-r",
            "ref1.png",
            "-r",
            "ref2.jpg",
            "-q",
            "high",
            "-a",
            "landscape",
            "-m",
            "gpt-image-1-mini",
            "-o",
            "out.png",
            "-v",
            "a ruined tower",
        ]);
        assert_eq!(cli.kind, SubjectKind::Scene);
        assert_eq!(cli.context.as_deref(), Some("at dusk"));
        assert_eq!(cli.references.len(), 2);
        assert_eq!(cli.quality, Some(Quality::High));
        assert_eq!(cli.aspect_ratio, Some(AspectRatio::Landscape));
        assert_eq!(cli.model.as_deref(), Some("gpt-image-1-mini"));
        assert_eq!(cli.output.as_deref(), Some("out.png"));
        assert!(cli.verbose);
        assert_eq!(cli.text.as_deref(), Some("a ruined tower"));
    }

    #[test]
    fn no_text_errors() {
        let cli = Cli::parse_from(["easel"]);
        assert!(cli.resolve_text().is_err());
    }

    #[test]
    fn reference_mime_from_extension() {
        let dir = std::env::temp_dir().join("easel_cli_ref_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ref.JPG");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();

        let reference = load_reference(path.to_str().unwrap()).unwrap();
        assert_eq!(reference.mime_type, "image/jpeg");
        assert_eq!(reference.data, vec![0xFF, 0xD8, 0xFF, 0xE0]);

        let _ = std::fs::remove_dir_all(&dir);
    }
}

use crate::prelude::*;
use clap::Parser;

mod config;
mod editor;
mod error;
mod prelude;
mod report;
mod toc;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Detect headings in a PDF from its font statistics and write them back as bookmarks"
)]
pub struct App {
    /// Path to the input PDF
    pub input: std::path::PathBuf,

    /// Where to write the bookmarked PDF (default: <stem>_toc.pdf next to the input)
    #[arg(short, long, conflicts_with = "replace")]
    pub output: Option<std::path::PathBuf>,

    /// Overwrite the input file
    #[arg(long)]
    pub replace: bool,

    /// Print the TOC instead of writing a PDF
    #[arg(long, conflicts_with_all = ["edit", "toc"])]
    pub preview: bool,

    /// Preview format
    #[arg(long, value_enum, default_value_t = PreviewFormat::Text, requires = "preview")]
    pub format: PreviewFormat,

    /// Deepest heading level to keep (overrides the config file)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..))]
    pub max_level: Option<u8>,

    /// Print font statistics and detection decisions to stderr
    #[arg(long)]
    pub debug: bool,

    /// Review the detected TOC in $EDITOR before writing
    #[arg(long, conflicts_with = "toc")]
    pub edit: bool,

    /// Skip detection and import headings from a TOC text file
    #[arg(long, value_name = "FILE")]
    pub toc: Option<std::path::PathBuf>,

    /// TOML file with detection thresholds
    #[arg(long, env = "PDFTOC_CONFIG", value_name = "FILE")]
    pub config: Option<std::path::PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PreviewFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    crate::toc::run(app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        App::command().debug_assert();
    }

    #[test]
    fn test_edit_and_toc_conflict() {
        let result = App::try_parse_from(["pdftoc", "in.pdf", "--edit", "--toc", "toc.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_preview_excludes_edit() {
        let result = App::try_parse_from(["pdftoc", "in.pdf", "--preview", "--edit"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_replace_conflicts_with_output() {
        let result = App::try_parse_from(["pdftoc", "in.pdf", "--replace", "-o", "out.pdf"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_format_requires_preview() {
        assert!(App::try_parse_from(["pdftoc", "in.pdf", "--format", "json"]).is_err());

        let app =
            App::try_parse_from(["pdftoc", "in.pdf", "--preview", "--format", "json"]).unwrap();
        assert_eq!(app.format, PreviewFormat::Json);
    }

    #[test]
    fn test_max_level_must_be_positive() {
        assert!(App::try_parse_from(["pdftoc", "in.pdf", "--max-level", "0"]).is_err());

        let app = App::try_parse_from(["pdftoc", "in.pdf", "--max-level", "2"]).unwrap();
        assert_eq!(app.max_level, Some(2));
    }
}

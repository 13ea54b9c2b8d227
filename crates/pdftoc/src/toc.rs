use std::path::{Path, PathBuf};

use log::{debug, info};
use pdf::PdfDocument;
use pdftoc_core::{analyze, format_toc, parse_toc, validate_outline, Heading};

use crate::prelude::{eprintln, println, *};
use crate::{App, PreviewFormat};

/// Where the bookmarked PDF goes: the input itself, an explicit path, or
/// `<stem>_toc.pdf` beside the input.
pub fn output_path(input: &Path, output: Option<&Path>, replace: bool) -> PathBuf {
    if replace {
        return input.to_path_buf();
    }
    if let Some(output) = output {
        return output.to_path_buf();
    }
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(f!("{}_toc.pdf", stem))
}

pub fn render_preview(headings: &[Heading], format: PreviewFormat) -> Result<String> {
    Ok(match format {
        PreviewFormat::Text => format_toc(headings),
        PreviewFormat::Json => f!("{}\n", serde_json::to_string_pretty(headings)?),
    })
}

/// Headings from an imported TOC file. An import with no headings is an
/// error, unlike a detection that finds none.
fn import_headings(path: &Path) -> Result<Vec<Heading>> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| f!("cannot read TOC file {}", path.display()))?;
    let headings =
        parse_toc(&text).wrap_err_with(|| f!("invalid TOC file {}", path.display()))?;
    if headings.is_empty() {
        return Err(eyre!(Error::EmptyToc));
    }
    info!("imported {} headings from {}", headings.len(), path.display());
    Ok(headings)
}

pub fn run(app: App) -> Result<()> {
    if !app.input.is_file() {
        return Err(eyre!(Error::FileNotFound(app.input.display().to_string())));
    }

    let config = crate::config::load(app.config.as_deref(), app.max_level)?;
    let doc = PdfDocument::open(&app.input)
        .wrap_err_with(|| f!("cannot open {}", app.input.display()))?;
    let total_pages = doc.page_count();
    debug!("{}: {} pages", app.input.display(), total_pages);

    let mut headings = match &app.toc {
        Some(path) => import_headings(path)?,
        None => {
            let detection = analyze(&doc.spans(), total_pages, &doc.page_heights(), &config);
            if app.debug {
                crate::report::print(&detection);
            }
            if detection.headings.is_empty() {
                eprintln!("No headings detected.");
                return Ok(());
            }
            info!("detected {} headings", detection.headings.len());
            detection.headings
        }
    };

    if app.preview {
        anstream::print!("{}", render_preview(&headings, app.format)?);
        return Ok(());
    }

    if app.edit {
        let edited = crate::editor::edit_text(&format_toc(&headings))?;
        headings = parse_toc(&edited).wrap_err("invalid edited TOC")?;
        if headings.is_empty() {
            eprintln!("No headings after editing. Aborted.");
            return Ok(());
        }
    }

    let entries = validate_outline(&headings, total_pages)?;
    let output = output_path(&app.input, app.output.as_deref(), app.replace);
    doc.write_outline(&entries, &output)
        .wrap_err_with(|| f!("cannot write {}", output.display()))?;

    println!("Wrote {} bookmarks → {}", entries.len(), output.display());
    Ok(())
}

//! Bookmark (outline) writing.

use log::debug;
use lopdf::{Bookmark, Document, Object, ObjectId};
use pdftoc_core::OutlineEntry;

use crate::PdfError;

/// Plain black, no italic/bold flags.
const BOOKMARK_COLOR: [f32; 3] = [0.0, 0.0, 0.0];
const BOOKMARK_FORMAT: u32 = 0;

fn catalog_id(doc: &Document) -> Result<ObjectId, PdfError> {
    doc.trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|e| PdfError::Parse(format!("document catalog not found: {}", e)))
}

fn catalog_mut(doc: &mut Document) -> Result<&mut lopdf::Dictionary, PdfError> {
    let id = catalog_id(doc)?;
    doc.get_object_mut(id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| PdfError::Parse(format!("document catalog is not a dictionary: {}", e)))
}

/// Replace the document's outline with `entries`.
///
/// Entries are in reading order with 1-based pages; each one nests under
/// the closest preceding entry one level up. Any existing outline is
/// dropped, and an empty `entries` leaves the document without one. A page
/// the document does not have fails the whole write before anything
/// changes.
pub fn replace_outline(doc: &mut Document, entries: &[OutlineEntry]) -> Result<(), PdfError> {
    let pages = doc.get_pages();
    let targets = entries
        .iter()
        .map(|entry| {
            pages
                .get(&entry.page)
                .copied()
                .ok_or(PdfError::PageNotFound(entry.page))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Bookmark ids of the open ancestors, index = level - 1.
    let mut parents: Vec<u32> = Vec::new();
    for (entry, page_id) in entries.iter().zip(targets) {
        parents.truncate(entry.level.saturating_sub(1));
        let bookmark = Bookmark::new(entry.title.clone(), BOOKMARK_COLOR, BOOKMARK_FORMAT, page_id);
        let id = doc.add_bookmark(bookmark, parents.last().copied());
        parents.push(id);
    }

    catalog_mut(doc)?.remove(b"Outlines");
    if let Some(outline_id) = doc.build_outline() {
        catalog_mut(doc)?.set("Outlines", Object::Reference(outline_id));
    }

    // Old outline items are unreachable now.
    let pruned = doc.prune_objects();
    debug!(
        "outline: {} entries written, {} stale objects pruned",
        entries.len(),
        pruned.len()
    );

    Ok(())
}

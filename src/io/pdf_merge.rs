use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use tracing::{debug, instrument};

use crate::error::{Result, ToolError};

/// Attributes a page inherits from its ancestors in the page tree. They are
/// copied onto each page before the original tree is discarded.
const INHERITABLE: &[&[u8]] = &[b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

const MAX_TREE_DEPTH: usize = 64;

/// Concatenates `fragments` in order into one PDF at `output` and returns the
/// output path. The fragments are left untouched; deleting them is up to the
/// caller.
#[instrument(
    level = "debug",
    skip_all,
    fields(fragments = fragments.len(), output = %output.display())
)]
pub fn merge_in_order(fragments: &[PathBuf], output: &Path) -> Result<PathBuf> {
    if fragments.is_empty() {
        return Err(ToolError::EmptyMerge);
    }

    let mut merged = Document::with_version("1.5");
    let pages_id = merged.new_object_id();
    let mut next_id = merged.max_id + 1;
    let mut kids: Vec<Object> = Vec::new();

    for path in fragments {
        let mut fragment = Document::load(path)?;
        fragment.renumber_objects_with(next_id);
        next_id = fragment.max_id + 1;

        let page_ids: Vec<ObjectId> = fragment.get_pages().into_values().collect();
        for page_id in &page_ids {
            inherit_page_attributes(&mut fragment, *page_id)?;
        }
        debug!(fragment = %path.display(), pages = page_ids.len(), "appending fragment");

        for (object_id, object) in fragment.objects {
            if matches!(
                node_type(&object),
                Some(b"Catalog" | b"Pages" | b"Outlines" | b"Outline")
            ) {
                continue;
            }
            merged.objects.insert(object_id, object);
        }

        for page_id in page_ids {
            let page = merged
                .get_object_mut(page_id)
                .and_then(Object::as_dict_mut)?;
            page.set("Parent", pages_id);
            kids.push(Object::Reference(page_id));
        }
    }

    merged.max_id = next_id - 1;
    let page_count = kids.len() as i64;
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );
    let catalog_id = merged.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    merged.trailer.set("Root", catalog_id);

    merged.save(output)?;
    Ok(output.to_path_buf())
}

fn node_type(object: &Object) -> Option<&[u8]> {
    object
        .as_dict()
        .ok()
        .and_then(|dict| dict.get(b"Type").ok())
        .and_then(|kind| kind.as_name().ok())
}

fn inherit_page_attributes(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let mut inherited: Vec<(&[u8], Object)> = Vec::new();
    let mut parent = parent_of(doc.get_dictionary(page_id)?);
    let mut depth = 0;

    while let Some(node_id) = parent {
        depth += 1;
        if depth > MAX_TREE_DEPTH {
            break;
        }
        let Ok(node) = doc.get_dictionary(node_id) else {
            break;
        };
        for &key in INHERITABLE {
            if let Ok(value) = node.get(key) {
                inherited.push((key, value.clone()));
            }
        }
        parent = parent_of(node);
    }

    let page = doc.get_object_mut(page_id).and_then(Object::as_dict_mut)?;
    for (key, value) in inherited {
        if !page.has(key) {
            page.set(key.to_vec(), value);
        }
    }
    Ok(())
}

fn parent_of(node: &Dictionary) -> Option<ObjectId> {
    node.get(b"Parent").and_then(Object::as_reference).ok()
}

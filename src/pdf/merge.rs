use crate::error::Error;
use anyhow::{Context, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;
use std::path::Path;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guards against cyclic `Parent` chains in damaged files.
const MAX_TREE_DEPTH: usize = 64;

/// Load every input, in order, and merge them into one document.
///
/// Needs at least two inputs. The first failing input aborts the merge.
pub fn merge_files<P: AsRef<Path>>(inputs: &[P]) -> Result<Document> {
    if inputs.len() < 2 {
        return Err(Error::TooFewInputs(inputs.len()).into());
    }

    let mut documents = Vec::with_capacity(inputs.len());
    for input in inputs {
        let input = input.as_ref();
        let doc = Document::load(input)
            .with_context(|| format!("Failed to add {}", input.display()))?;
        if doc.get_pages().is_empty() {
            return Err(Error::EmptyDocument(input.to_path_buf()).into());
        }
        tracing::debug!(path = %input.display(), pages = doc.get_pages().len(), "added input");
        documents.push(doc);
    }

    merge_documents(documents)
}

/// Concatenate the pages of `documents` into a fresh page tree.
pub fn merge_documents(documents: Vec<Document>) -> Result<Document> {
    let version = documents
        .iter()
        .map(|doc| doc.version.clone())
        .max()
        .unwrap_or_else(|| "1.5".to_string());

    let mut max_id = 1;
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for mut doc in documents {
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        for (_, page_id) in doc.get_pages() {
            inherit_page_attributes(&mut doc, page_id)?;
            page_ids.push(page_id);
        }

        // The old catalogs and page tree nodes are replaced below.
        objects.extend(
            doc.objects
                .into_iter()
                .filter(|(_, object)| !matches!(type_name(object), Some(b"Catalog" | b"Pages"))),
        );
    }

    let mut merged = Document::with_version(version);
    merged.objects.extend(objects);
    merged.max_id = max_id - 1;

    let pages_id = merged.new_object_id();
    let catalog_id = merged.new_object_id();

    for &page_id in &page_ids {
        if let Ok(page) = merged.get_dictionary_mut(page_id) {
            page.set("Parent", Object::Reference(pages_id));
        }
    }

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Count", Object::Integer(page_ids.len() as i64));
    pages.set(
        "Kids",
        Object::Array(page_ids.iter().copied().map(Object::Reference).collect()),
    );
    merged.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    merged.objects.insert(catalog_id, Object::Dictionary(catalog));
    merged.trailer.set("Root", Object::Reference(catalog_id));

    // Outlines and other catalog-only objects of the inputs are now orphans.
    let pruned = merged.prune_objects();
    merged.renumber_objects();
    tracing::debug!(pages = page_ids.len(), pruned = pruned.len(), "merged page trees");

    Ok(merged)
}

/// Copy inheritable attributes down from the page's ancestors.
///
/// Once the page is re-parented its old ancestors are gone, so anything it
/// inherited has to live on the page itself.
fn inherit_page_attributes(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let page = doc
        .get_dictionary(page_id)
        .with_context(|| format!("Page object {:?} is not a dictionary", page_id))?;

    let mut missing: Vec<&[u8]> = INHERITABLE
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();
    let mut parent = parent_of(page);
    let mut inherited: Vec<(Vec<u8>, Object)> = Vec::new();

    for _ in 0..MAX_TREE_DEPTH {
        let (Some(parent_id), false) = (parent, missing.is_empty()) else {
            break;
        };
        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };
        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                inherited.push((key.to_vec(), value.clone()));
                false
            }
            Err(_) => true,
        });
        parent = parent_of(node);
    }

    if !inherited.is_empty() {
        let page = doc.get_dictionary_mut(page_id)?;
        for (key, value) in inherited {
            page.set(key, value);
        }
    }

    Ok(())
}

fn parent_of(dict: &Dictionary) -> Option<ObjectId> {
    match dict.get(b"Parent") {
        Ok(Object::Reference(id)) => Some(*id),
        _ => None,
    }
}

fn type_name(object: &Object) -> Option<&[u8]> {
    match object {
        Object::Dictionary(dict) => match dict.get(b"Type") {
            Ok(Object::Name(name)) => Some(name.as_slice()),
            _ => None,
        },
        _ => None,
    }
}

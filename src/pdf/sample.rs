//! In-memory documents for tests.
//!
//! Every page draws its label ("<prefix> <n>") with a single `Tj`, so tests can
//! tell which source page ended up where. Resources and MediaBox live on the
//! page tree node and are inherited by the pages.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::Path;

pub fn document_with_pages(prefix: &str, count: u32) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for n in 1..=count {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(format!("{prefix} {n}"))]),
            Operation::new("ET", vec![]),
        ];
        // Repetitive filler so there is something for deflate to squeeze.
        for row in 0..100 {
            operations.push(Operation::new(
                "re",
                vec![72.into(), (row * 6).into(), 468.into(), 2.into()],
            ));
            operations.push(Operation::new("f", vec![]));
        }
        let content = Content { operations };
        let encoded = content.encode().expect("encode sample content");
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc
}

pub fn write_document(path: &Path, prefix: &str, count: u32) {
    let mut doc = document_with_pages(prefix, count);
    doc.save(path).expect("save sample document");
}

/// The label each page draws, in page order.
pub fn page_labels(doc: &Document) -> Vec<String> {
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let data = doc.get_page_content(page_id).expect("page content");
            let content = Content::decode(&data).expect("decode page content");
            content
                .operations
                .iter()
                .find(|op| op.operator == "Tj")
                .and_then(|op| match op.operands.first() {
                    Some(Object::String(bytes, _)) => Some(String::from_utf8_lossy(bytes).into_owned()),
                    _ => None,
                })
                .unwrap_or_default()
        })
        .collect()
}

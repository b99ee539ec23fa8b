#![allow(dead_code)]

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

/// One piece of text placed at a baseline position.
#[derive(Debug, Clone, Copy)]
pub struct Placed<'a> {
    pub x: i64,
    pub y: i64,
    pub text: &'a str,
}

pub const fn placed(x: i64, y: i64, text: &str) -> Placed<'_> {
    Placed { x, y, text }
}

fn save_pages(
    mut doc: Document,
    pages_id: ObjectId,
    contents: Vec<Content>,
    media_box: [i64; 2],
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut page_ids = Vec::new();
    for content in contents {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| (*id).into()).collect::<Vec<_>>(),
            "Count" => i64::try_from(page_ids.len())?,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), media_box[0].into(), media_box[1].into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    doc.save(path)?;
    Ok(())
}

/// Flowing text, one `Tj` per line.
pub fn create_test_pdf(path: &Path, pages: &[Vec<&str>]) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let contents = pages
        .iter()
        .map(|lines| {
            let mut operations = vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 6.into()]),
                Operation::new("TL", vec![10.into()]),
                Operation::new("Td", vec![20.into(), 800.into()]),
            ];
            for (index, line) in lines.iter().enumerate() {
                operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
                if index + 1 < lines.len() {
                    operations.push(Operation::new("T*", vec![]));
                }
            }
            operations.push(Operation::new("ET", vec![]));
            Content { operations }
        })
        .collect();

    save_pages(doc, pages_id, contents, [842, 842], path)
}

/// Text pieces at absolute positions, for layout driven extraction.
pub fn create_positioned_pdf(
    path: &Path,
    pages: &[Vec<Placed<'_>>],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let contents = pages
        .iter()
        .map(|pieces| {
            let mut operations = Vec::new();
            for piece in pieces {
                operations.extend([
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 9.into()]),
                    Operation::new("Td", vec![Object::Integer(piece.x), Object::Integer(piece.y)]),
                    Operation::new("Tj", vec![Object::string_literal(piece.text)]),
                    Operation::new("ET", vec![]),
                ]);
            }
            Content { operations }
        })
        .collect();

    save_pages(doc, pages_id, contents, [960, 600], path)
}

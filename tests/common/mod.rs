//! Shared fixtures: small PDFs written with lopdf.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// A line of text placed on a page: font resource, size, x, baseline y (PDF space), text.
pub type Line<'a> = (&'a str, f32, f32, f32, &'a str);

/// Build a Letter-sized PDF with one content stream per page.
///
/// Font resources: `F1` Helvetica-Bold, `F2` Times-Roman, `F3` a subset-tagged Georgia.
pub fn build_pdf(pages: &[Vec<Line<'_>>]) -> Vec<u8> {
    let programs = pages
        .iter()
        .map(|lines| {
            let mut operations = Vec::new();
            for &(font, size, x, y, text) in lines {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec![font.into(), size.into()]));
                operations.push(Operation::new("Td", vec![x.into(), y.into()]));
                operations.push(Operation::new("Tj", vec![Object::string_literal(text)]));
                operations.push(Operation::new("ET", vec![]));
            }
            operations
        })
        .collect();
    build_pdf_from_operations(programs)
}

/// Build a Letter-sized PDF from raw content-stream operations, one program per page.
pub fn build_pdf_from_operations(pages: Vec<Vec<Operation>>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font = |doc: &mut Document, base: &str| {
        doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base,
            "Encoding" => "WinAnsiEncoding",
        })
    };
    let bold = font(&mut doc, "Helvetica-Bold");
    let roman = font(&mut doc, "Times-Roman");
    let subset = font(&mut doc, "ABCDEF+Georgia");
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => bold,
            "F2" => roman,
            "F3" => subset,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("content encodes"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("document saves");
    bytes
}

/// A three-page report with a title page, two section headings and body text.
pub fn report_pdf() -> Vec<u8> {
    let body = "The quick brown fox jumps over the lazy dog again";
    let mut page2 = vec![("F1", 18.0, 72.0, 720.0, "1. Introduction")];
    let mut page3 = vec![("F1", 14.0, 72.0, 720.0, "1.1 Background")];
    for i in 0..8 {
        let y = 690.0 - i as f32 * 14.0;
        page2.push(("F2", 11.0, 72.0, y, body));
        page3.push(("F2", 11.0, 72.0, y, body));
    }

    build_pdf(&[
        vec![
            ("F1", 24.0, 72.0, 720.0, "Quarterly Operations Review"),
            ("F2", 11.0, 72.0, 680.0, "Prepared by the finance team"),
        ],
        page2,
        page3,
    ])
}

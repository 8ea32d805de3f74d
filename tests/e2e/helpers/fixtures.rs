use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// A two-chapter PDF with Title and Author metadata.
///
/// Pages carry enough prose to clear the content filter's minimum
/// page and section word counts.
pub fn sample_book_pdf() -> Vec<u8> {
    let chapter_one = chapter_page(1, "The Voyage");
    let chapter_two = chapter_page(2, "The Storm");
    pdf_with_pages(
        &[chapter_one.as_str(), chapter_two.as_str()],
        Some(("The Test Voyage", "A. Writer")),
    )
}

fn chapter_page(number: u32, title: &str) -> String {
    let mut text = format!("Chapter {}. {}.", number, title);
    for _ in 0..12 {
        text.push_str(
            " The crew sailed on through calm water and the days went by slowly while the captain kept a steady course toward the distant harbor that waited beyond the horizon.",
        );
    }
    text
}

/// Build a PDF in memory with one page per text entry
pub fn pdf_with_pages(page_texts: &[&str], info: Option<(&str, &str)>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in page_texts {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
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
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let Some((title, author)) = info {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
            "Author" => Object::string_literal(author),
        });
        doc.trailer.set("Info", info_id);
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("failed to serialize fixture PDF");
    bytes
}

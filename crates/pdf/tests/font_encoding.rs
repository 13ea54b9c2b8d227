//! Text decoding through the fonts a page declares.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use pdf::PdfDocument;

/// Maps the 2-byte glyph codes 1..=5 to "Intro".
const TO_UNICODE: &str = "/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
5 beginbfchar
<0001> <0049>
<0002> <006E>
<0003> <0074>
<0004> <0072>
<0005> <006F>
endbfchar
endcmap
CMapName currentdict /CMap defineresource pop
end
end
";

fn show(font: &str, size: i64, y: i64, text: Object) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), size.into()]),
        Operation::new("Td", vec![72.into(), y.into()]),
        Operation::new("Tj", vec![text]),
        Operation::new("ET", vec![]),
    ]
}

/// One page: a subset Type0 heading font with a ToUnicode map, and a
/// WinAnsi body font.
fn exported_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let to_unicode = doc.add_object(Stream::new(dictionary! {}, TO_UNICODE.as_bytes().to_vec()));
    let descriptor = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => "ABCDEF+Arial-BoldMT",
        "Flags" => 32,
        "FontWeight" => 700,
    });
    let descendant = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => "ABCDEF+Arial-BoldMT",
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => descriptor,
    });
    let heading = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "ABCDEF+Arial-BoldMT",
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![descendant.into()],
        "ToUnicode" => to_unicode,
    });
    let body = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "TrueType",
        "BaseFont" => "ArialMT",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut ops = show(
        "F1",
        24,
        760,
        Object::String(vec![0, 1, 0, 2, 0, 3, 0, 4, 0, 5], StringFormat::Hexadecimal),
    );
    // 0x93 / 0x94 are curly quotes in WinAnsi and C1 controls in Latin-1.
    ops.extend(show(
        "F2",
        10,
        700,
        Object::string_literal(b"\x93Quoted\x94 body text".to_vec()),
    ));

    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        Content { operations: ops }.encode().unwrap(),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => heading, "F2" => body },
        },
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

#[test]
fn test_identity_h_heading_decoded_through_to_unicode() {
    let spans = PdfDocument::from_bytes(&exported_pdf()).unwrap().spans();

    let heading = spans
        .iter()
        .find(|s| s.size == 24.0)
        .expect("heading span present");
    assert_eq!(heading.text, "Intro");
    assert!(heading.bold);
    assert_eq!(heading.page, 0);
}

#[test]
fn test_named_simple_encoding_used_for_body_text() {
    let spans = PdfDocument::from_bytes(&exported_pdf()).unwrap().spans();

    let body = spans.iter().find(|s| s.size == 10.0).expect("body span present");
    assert_eq!(body.text, "\u{201C}Quoted\u{201D} body text");
    assert!(!body.bold);
}

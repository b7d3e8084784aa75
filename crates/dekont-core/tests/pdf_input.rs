//! Receipts read from real PDF bytes.

use dekont_core::{check, Document, PdfExtractor, PdfProcessor};
use lopdf::{dictionary, Dictionary, Object, Stream};
use pretty_assertions::assert_eq;

/// One-page PDF with a Helvetica text line per entry of `lines`.
fn text_pdf(lines: &[&str]) -> Vec<u8> {
    let mut content = String::from("BT /F1 11 Tf 50 750 Td 14 TL\n");
    for line in lines {
        content.push_str(&format!("({line}) Tj T*\n"));
    }
    content.push_str("ET");
    build_pdf(content.into_bytes(), Dictionary::new())
}

fn build_pdf(content: Vec<u8>, xobjects: Dictionary) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
        "XObject" => xobjects,
    });
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
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

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn upt_receipt() -> Vec<u8> {
    text_pdf(&[
        "www.upt.com.tr",
        "Receipt No UPT-20260412-77",
        "Transaction Amount: 1.250,00 TL",
    ])
}

#[test]
fn test_text_layer_from_pdf_bytes() {
    let document = Document::from_bytes(upt_receipt());
    assert!(document.has_text_layer());
    assert!(document.normalized_text().contains("upt.com.tr"));

    let report = check(&document);
    assert_eq!(report.detected.key, "UPT");
    assert_eq!(report.data.amount.as_deref(), Some("1.250,00 TL"));
    assert_eq!(report.data.error, None);
}

#[test]
fn test_truncated_pdf_is_unknown_not_a_panic() {
    let bytes = upt_receipt();
    for cut in [64, 9, 0] {
        let document = Document::from_bytes(bytes[..cut].to_vec());
        assert!(!document.has_text_layer(), "cut at {cut}");

        let report = check(&document);
        assert!(report.detected.is_unknown(), "cut at {cut}");
        assert_eq!(
            report.data.error.as_deref(),
            Some("No extractor registered for key: UNKNOWN")
        );
    }

    // Every prefix either parses or degrades to an empty layer.
    for cut in (0..bytes.len()).step_by(7) {
        let document = Document::from_bytes(bytes[..cut].to_vec());
        let report = check(&document);
        if !document.has_text_layer() {
            assert!(report.detected.is_unknown(), "cut at {cut}");
        }
    }
}

#[test]
fn test_extractor_reads_pages_and_scan_image() {
    let mut image = Dictionary::new();
    image.set("Type", "XObject");
    image.set("Subtype", "Image");
    image.set("Width", 4);
    image.set("Height", 4);
    image.set("ColorSpace", "DeviceCMYK");
    image.set("BitsPerComponent", 8);
    let scan = Stream::new(image, vec![0; 4 * 4 * 4]);

    let mut doc = lopdf::Document::load_mem(&text_pdf(&["scan"])).unwrap();
    let scan_id = doc.add_object(scan);
    let page_id = *doc.get_pages().get(&1).unwrap();
    let resources = doc
        .get_dictionary(page_id)
        .and_then(|page| page.get(b"Resources"))
        .and_then(Object::as_reference)
        .unwrap();
    doc.get_dictionary_mut(resources)
        .unwrap()
        .set("XObject", dictionary! { "Im1" => scan_id });
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();

    let extractor = PdfExtractor::from_bytes(&bytes).unwrap();
    assert_eq!(extractor.page_count(), 1);
    assert_eq!(extractor.extract_images(1).unwrap().len(), 1);

    // 612pt at 72 dpi is 612px; the 4px scan is scaled up to page width.
    let page = extractor.render_page(1, 72).unwrap();
    assert_eq!((page.width(), page.height()), (612, 612));
    assert!(extractor.render_page(2, 72).is_err());
}

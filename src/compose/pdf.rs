//! Single-page PDF assembly with `lopdf`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use super::font::{encode_win_ansi, measure_text, GREETING_FONT};
use super::layout::{PageSize, Rect};
use crate::error::CardError;

const IMAGE_NAME: &str = "Im1";
const FONT_NAME: &str = "F1";

/// Baseline JPEG bytes plus the pixel size the XObject declares.
pub(crate) struct JpegImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Accumulates content-stream operations for one page.
#[derive(Default)]
pub(crate) struct PagePainter {
    operations: Vec<Operation>,
    uses_font: bool,
}

impl PagePainter {
    /// Paint the page image into `rect`, stretching it to fit exactly.
    pub fn image(&mut self, rect: Rect) {
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    rect.width.into(),
                    0.into(),
                    0.into(),
                    rect.height.into(),
                    rect.x.into(),
                    rect.y.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ]);
    }

    /// Stroke a 1pt black line.
    pub fn line(&mut self, from: (f32, f32), to: (f32, f32)) {
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("G", vec![0.into()]),
            Operation::new("w", vec![1.into()]),
            Operation::new("m", vec![from.0.into(), from.1.into()]),
            Operation::new("l", vec![to.0.into(), to.1.into()]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    /// Draw `text` horizontally centered on `center_x` with its baseline at `baseline`.
    pub fn centered_text(&mut self, text: &str, font_size: f32, center_x: f32, baseline: f32) {
        let x = center_x - measure_text(text, font_size) / 2.0;
        self.uses_font = true;
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(FONT_NAME.as_bytes().to_vec()), font_size.into()],
            ),
            Operation::new("Td", vec![x.into(), baseline.into()]),
            Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(text))]),
            Operation::new("ET", vec![]),
        ]);
    }
}

/// Build a one-page document and write it to `output` through `wrap(file)`.
///
/// The output file is removed again if serialization fails after it was created.
pub(crate) fn write_single_page<W, F>(
    page: PageSize,
    image: JpegImage,
    painter: PagePainter,
    title: &str,
    output: &Path,
    wrap: F,
) -> Result<(), CardError>
where
    W: Write,
    F: FnOnce(File) -> W,
{
    let mut doc = build_document(page, image, painter, title)?;

    let file = File::create(output)
        .map_err(|e| CardError::Write(format!("Failed to create {}: {e}", output.display())))?;
    let mut writer = wrap(file);

    if let Err(e) = save_document(&mut doc, &mut writer) {
        drop(writer);
        let _ = std::fs::remove_file(output);
        return Err(CardError::Write(format!("Failed to write {}: {e}", output.display())));
    }
    Ok(())
}

/// Serialize `doc` into `writer` and flush it.
fn save_document<W: Write>(doc: &mut Document, writer: &mut W) -> std::io::Result<()> {
    doc.save_to(writer).map_err(|e| std::io::Error::other(e.to_string()))?;
    writer.flush()
}

fn build_document(
    page: PageSize,
    image: JpegImage,
    painter: PagePainter,
    title: &str,
) -> Result<Document, CardError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => i64::from(image.width),
        "Height" => i64::from(image.height),
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "DCTDecode",
    };
    let image_id = doc.add_object(Stream::new(image_dict, image.data).with_compression(false));

    let mut resources = dictionary! {
        "XObject" => dictionary! { IMAGE_NAME => image_id },
    };
    if painter.uses_font {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => GREETING_FONT,
            "Encoding" => "WinAnsiEncoding",
        });
        resources.set("Font", dictionary! { FONT_NAME => font_id });
    }
    let resources_id = doc.add_object(resources);

    let content = Content { operations: painter.operations };
    let encoded = content
        .encode()
        .map_err(|e| CardError::Write(format!("Failed to encode page content: {e}")))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), page.width.into(), page.height.into()],
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
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(encode_win_ansi(title)),
        "Producer" => Object::string_literal(concat!("cardgen ", env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    Ok(doc)
}

use std::io::Cursor;

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, warn};

pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
pub const MARGIN: f32 = 36.0;
pub const JPEG_QUALITY: u8 = 95;

const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const CONTENT_HEIGHT: f32 = PAGE_HEIGHT - 2.0 * MARGIN;
const SECTION_GAP: f32 = 24.0;
const PLACEHOLDER_HEIGHT: f32 = 120.0;
const MISSING_IMAGE_TEXT: &str = "Imagem indisponível";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub fn from_hex(value: u32) -> Self {
        let channel = |shift: u32| ((value >> shift) & 0xff) as f32 / 255.0;
        Rgb(channel(16), channel(8), channel(0))
    }
}

/// Explicit colors for every element drawn on the report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportPalette {
    pub heading: Rgb,
    pub text: Rgb,
    pub muted: Rgb,
    pub rule: Rgb,
    pub placeholder: Rgb,
}

impl Default for ReportPalette {
    fn default() -> Self {
        Self {
            heading: Rgb::from_hex(0x111827),
            text: Rgb::from_hex(0x1f2937),
            muted: Rgb::from_hex(0x4b5563),
            rule: Rgb::from_hex(0xe5e7eb),
            placeholder: Rgb::from_hex(0x9ca3af),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection {
    pub title: String,
    pub description: String,
    /// Raw image bytes in any format `image` can decode; `None` when the
    /// download failed.
    pub image: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub title: String,
    pub generated_at: String,
    pub subtitle: String,
    pub message: String,
    pub sections: Vec<ReportSection>,
}

struct JpegImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

fn encode_jpeg(bytes: &[u8]) -> Result<JpegImage> {
    let decoded = image::load_from_memory(bytes).context("failed to decode chart image")?;
    let rgb = decoded.to_rgb8();
    let mut data = Vec::new();
    JpegEncoder::new_with_quality(Cursor::new(&mut data), JPEG_QUALITY)
        .encode_image(&rgb)
        .context("failed to encode chart image as jpeg")?;
    Ok(JpegImage {
        data,
        width: rgb.width(),
        height: rgb.height(),
    })
}

#[derive(Clone, Copy)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

#[derive(Default)]
struct PageCanvas {
    operations: Vec<Operation>,
    images: Vec<(String, ObjectId)>,
}

struct Composer<'a> {
    doc: &'a mut Document,
    palette: ReportPalette,
    pages: Vec<PageCanvas>,
    cursor: f32,
    image_count: usize,
}

impl<'a> Composer<'a> {
    fn new(doc: &'a mut Document, palette: ReportPalette) -> Self {
        Self {
            doc,
            palette,
            pages: vec![PageCanvas::default()],
            cursor: PAGE_HEIGHT - MARGIN,
            image_count: 0,
        }
    }

    fn remaining(&self) -> f32 {
        self.cursor - MARGIN
    }

    fn at_page_top(&self) -> bool {
        self.cursor >= PAGE_HEIGHT - MARGIN
    }

    fn new_page(&mut self) {
        self.pages.push(PageCanvas::default());
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    fn canvas(&mut self) -> &mut PageCanvas {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn text_line(&mut self, text: &str, font: Font, size: f32, color: Rgb) {
        if self.remaining() < line_height(size) && !self.at_page_top() {
            self.new_page();
        }
        let baseline = self.cursor - size;
        let Rgb(r, g, b) = color;
        let operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.resource().into(), size.into()]),
            Operation::new("rg", vec![r.into(), g.into(), b.into()]),
            Operation::new("Td", vec![MARGIN.into(), baseline.into()]),
            Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]),
            Operation::new("ET", vec![]),
        ];
        self.canvas().operations.extend(operations);
        self.cursor -= line_height(size);
    }

    fn paragraph(&mut self, text: &str, font: Font, size: f32, color: Rgb) {
        for line in wrap_text(text, size, CONTENT_WIDTH) {
            self.text_line(&line, font, size, color);
        }
    }

    fn rule(&mut self) {
        if self.remaining() < 18.0 && !self.at_page_top() {
            self.new_page();
        }
        let Rgb(r, g, b) = self.palette.rule;
        let y = self.cursor - 6.0;
        let operations = vec![
            Operation::new("RG", vec![r.into(), g.into(), b.into()]),
            Operation::new("w", vec![1.0_f32.into()]),
            Operation::new("m", vec![MARGIN.into(), y.into()]),
            Operation::new("l", vec![(PAGE_WIDTH - MARGIN).into(), y.into()]),
            Operation::new("S", vec![]),
        ];
        self.canvas().operations.extend(operations);
        self.cursor -= 18.0;
    }

    fn image(&mut self, image: JpegImage, height: f32) {
        self.image_count += 1;
        let name = format!("Im{}", self.image_count);
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width as i64,
                "Height" => image.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
                "Filter" => "DCTDecode",
            },
            image.data,
        )
        .with_compression(false);
        let image_id = self.doc.add_object(stream);

        let width = height * image.width as f32 / image.height as f32;
        let x = MARGIN + (CONTENT_WIDTH - width) / 2.0;
        let y = self.cursor - height;
        let operations = vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    width.into(),
                    0_i64.into(),
                    0_i64.into(),
                    height.into(),
                    x.into(),
                    y.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.clone().into_bytes())]),
            Operation::new("Q", vec![]),
        ];
        let canvas = self.canvas();
        canvas.operations.extend(operations);
        canvas.images.push((name, image_id));
        self.cursor -= height;
    }

    fn placeholder(&mut self) {
        let Rgb(r, g, b) = self.palette.placeholder;
        let y = self.cursor - PLACEHOLDER_HEIGHT;
        let operations = vec![
            Operation::new("RG", vec![r.into(), g.into(), b.into()]),
            Operation::new("w", vec![1.0_f32.into()]),
            Operation::new(
                "re",
                vec![
                    MARGIN.into(),
                    y.into(),
                    CONTENT_WIDTH.into(),
                    PLACEHOLDER_HEIGHT.into(),
                ],
            ),
            Operation::new("S", vec![]),
        ];
        self.canvas().operations.extend(operations);

        let top = self.cursor;
        self.cursor -= PLACEHOLDER_HEIGHT / 2.0 - 5.0;
        self.text_line(MISSING_IMAGE_TEXT, Font::Regular, 10.0, self.palette.placeholder);
        self.cursor = top - PLACEHOLDER_HEIGHT;
    }

    fn section(&mut self, section: &ReportSection) {
        let title_lines = wrap_text(&section.title, 14.0, CONTENT_WIDTH);
        let description_lines = wrap_text(&section.description, 10.0, CONTENT_WIDTH);
        let text_height = title_lines.len() as f32 * line_height(14.0)
            + description_lines.len() as f32 * line_height(10.0)
            + 8.0;

        let image = section.image.as_deref().and_then(|bytes| match encode_jpeg(bytes) {
            Ok(image) => Some(image),
            Err(err) => {
                warn!(title = %section.title, error = %err, "chart image skipped");
                None
            }
        });
        let visual_height = match &image {
            Some(image) => fitted_image_height(image.width, image.height, CONTENT_HEIGHT - text_height - SECTION_GAP),
            None => PLACEHOLDER_HEIGHT,
        };

        let section_height = text_height + visual_height + SECTION_GAP;
        if section_height > self.remaining() && !self.at_page_top() {
            self.new_page();
        }

        let palette = self.palette;
        for line in &title_lines {
            self.text_line(line, Font::Bold, 14.0, palette.heading);
        }
        for line in &description_lines {
            self.text_line(line, Font::Regular, 10.0, palette.muted);
        }
        self.cursor -= 8.0;
        match image {
            Some(image) => self.image(image, visual_height),
            None => self.placeholder(),
        }
        self.cursor -= SECTION_GAP;
    }
}

/// Height of an image scaled to the content width, shrunk further when it
/// would not fit in `max_height`.
fn fitted_image_height(width: u32, height: u32, max_height: f32) -> f32 {
    if width == 0 || height == 0 {
        return 0.0;
    }
    let scaled = CONTENT_WIDTH * height as f32 / width as f32;
    scaled.min(max_height.max(0.0))
}

fn line_height(size: f32) -> f32 {
    size * 1.4
}

// Helvetica averages about half an em per glyph.
fn wrap_text(text: &str, size: f32, width: f32) -> Vec<String> {
    let max_chars = ((width / (size * 0.5)) as usize).max(1);
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let needed = line.chars().count() + word.chars().count() + usize::from(!line.is_empty());
            if needed > max_chars && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}

// Standard fonts use WinAnsiEncoding, which matches Latin-1 for the
// accented letters used in the report.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?'))
        .collect()
}

pub fn render_pdf(report: &ReportDocument, palette: &ReportPalette) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    let pages = {
        let mut composer = Composer::new(&mut doc, *palette);
        composer.paragraph(&report.title, Font::Bold, 20.0, palette.heading);
        composer.text_line(
            &format!("Gerado em: {}", report.generated_at),
            Font::Regular,
            10.0,
            palette.muted,
        );
        composer.paragraph(&report.subtitle, Font::Regular, 12.0, palette.text);
        composer.cursor -= 4.0;
        composer.paragraph(&report.message, Font::Regular, 11.0, palette.text);
        composer.rule();
        for section in &report.sections {
            composer.section(section);
        }
        composer.pages
    };

    let mut kids = Vec::with_capacity(pages.len());
    for canvas in pages {
        let content = Content {
            operations: canvas.operations,
        };
        let encoded = content.encode().context("failed to encode page content")?;
        let content_id = doc.add_object(Stream::new(lopdf::Dictionary::new(), encoded));

        let mut xobjects = lopdf::Dictionary::new();
        for (name, image_id) in canvas.images {
            xobjects.set(name, image_id);
        }
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => regular_id,
                    "F2" => bold_id,
                },
                "XObject" => xobjects,
            },
        });
        kids.push(Object::from(page_id));
    }

    let page_count = kids.len();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "MediaBox" => vec![
                Object::from(0_i64),
                Object::from(0_i64),
                Object::from(PAGE_WIDTH),
                Object::from(PAGE_HEIGHT),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).context("failed to write pdf")?;
    debug!(pages = page_count, bytes = bytes.len(), "report rendered");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, ImageFormat, RgbImage};

    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30])))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("png should encode");
        bytes
    }

    fn report(sections: Vec<ReportSection>) -> ReportDocument {
        ReportDocument {
            title: "Relatório de Análise de Evasão".to_string(),
            generated_at: "16/10/2026 10:00".to_string(),
            subtitle: "Sistema de Análise Preditiva de Evasão Acadêmica".to_string(),
            message: "Análise concluída.".to_string(),
            sections,
        }
    }

    fn section(image: Option<Vec<u8>>) -> ReportSection {
        ReportSection {
            title: "Previsão de evasão".to_string(),
            description: "Valores previstos.".to_string(),
            image,
        }
    }

    fn page_count(bytes: &[u8]) -> usize {
        Document::load_mem(bytes)
            .expect("rendered pdf should load")
            .get_pages()
            .len()
    }

    #[test]
    fn missing_images_render_placeholders_on_one_page() {
        let bytes = render_pdf(&report(vec![section(None), section(None)]), &ReportPalette::default())
            .expect("pdf should render");

        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert_eq!(page_count(&bytes), 1);
    }

    #[test]
    fn tall_sections_move_to_new_pages() {
        let sections = vec![
            section(Some(png(40, 30))),
            section(Some(png(40, 30))),
            section(Some(png(40, 30))),
        ];

        let bytes = render_pdf(&report(sections), &ReportPalette::default()).expect("pdf should render");

        assert_eq!(page_count(&bytes), 3);
    }

    #[test]
    fn undecodable_image_counts_as_missing() {
        let bytes = render_pdf(
            &report(vec![section(Some(b"not an image".to_vec()))]),
            &ReportPalette::default(),
        )
        .expect("pdf should render");

        assert_eq!(page_count(&bytes), 1);
    }

    #[test]
    fn long_message_flows_onto_new_pages_inside_the_margin() {
        let message = "palavra ".repeat(2000);
        let mut doc = Document::with_version("1.5");
        let mut composer = Composer::new(&mut doc, ReportPalette::default());

        composer.paragraph(&message, Font::Regular, 11.0, ReportPalette::default().text);

        assert!(composer.pages.len() > 1);
        for page in &composer.pages {
            for op in page.operations.iter().filter(|op| op.operator == "Td") {
                let y = match op.operands[1] {
                    Object::Real(y) => y as f32,
                    ref other => panic!("unexpected baseline operand: {other:?}"),
                };
                assert!(y >= MARGIN, "baseline {y} drawn below the margin");
            }
        }

        let mut long = report(vec![section(None)]);
        long.message = message;
        let bytes = render_pdf(&long, &ReportPalette::default()).expect("pdf should render");
        assert!(page_count(&bytes) > 1);
    }

    #[test]
    fn wide_image_keeps_aspect_ratio_at_content_width() {
        let height = fitted_image_height(1046, 523, CONTENT_HEIGHT);

        assert!((height - CONTENT_WIDTH / 2.0).abs() < 0.01, "unexpected height {height}");
    }

    #[test]
    fn wrap_text_breaks_on_word_boundaries() {
        let lines = wrap_text("uma frase curta com varias palavras", 10.0, 60.0);

        assert!(lines.len() > 1);
        assert!(lines.iter().all(|line| line.chars().count() <= 12));
        assert_eq!(lines.join(" "), "uma frase curta com varias palavras");
    }

    #[test]
    fn accented_text_maps_to_latin1() {
        assert_eq!(win_ansi("ção"), vec![0xe7, 0xe3, b'o']);
        assert_eq!(win_ansi("→"), vec![b'?']);
    }
}

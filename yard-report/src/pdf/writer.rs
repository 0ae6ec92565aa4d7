//! Minimal PDF 1.4 object writer.
//!
//! Produces one catalog, one page tree, the three Helvetica faces, at
//! most one JPEG image shared by every page, and one content stream per
//! page. Coordinates are PDF points with the origin at the bottom left.

use super::fonts::Font;
use super::jpeg::{self, JpegInfo};
use crate::error::Result;
use flate2::{write::ZlibEncoder, Compression};
use std::io::Write;

pub const IMAGE_NAME: &str = "Im1";

const FIRST_FONT_OBJ: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Stroke,
    Fill,
    FillStroke,
}

impl Paint {
    fn operator(&self) -> &'static str {
        match self {
            Paint::Stroke => "S",
            Paint::Fill => "f",
            Paint::FillStroke => "B",
        }
    }
}

pub type Rgb = (u8, u8, u8);

/// Content stream of one page.
#[derive(Debug, Default, Clone)]
pub struct Canvas {
    ops: Vec<u8>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    fn op(&mut self, line: &str) {
        self.ops.extend_from_slice(line.as_bytes());
        self.ops.push(b'\n');
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.op(&format!("{} w", num(width)));
    }

    pub fn set_fill_rgb(&mut self, color: Rgb) {
        self.op(&format!("{} rg", rgb(color)));
    }

    pub fn set_stroke_rgb(&mut self, color: Rgb) {
        self.op(&format!("{} RG", rgb(color)));
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: Paint) {
        self.op(&format!(
            "{} {} {} {} re {}",
            num(x),
            num(y),
            num(w),
            num(h),
            paint.operator()
        ));
    }

    /// Show WinAnsi-encoded `text` with its baseline starting at `(x, y)`.
    pub fn text(&mut self, font: Font, size: f64, x: f64, y: f64, text: &[u8]) {
        self.op(&format!(
            "BT /{} {} Tf {} {} Td",
            font.resource(),
            num(size),
            num(x),
            num(y)
        ));
        self.ops.push(b'(');
        for &byte in text {
            if matches!(byte, b'(' | b')' | b'\\') {
                self.ops.push(b'\\');
            }
            self.ops.push(byte);
        }
        self.ops.extend_from_slice(b") Tj ET\n");
    }

    /// Paint the document image into the `w` x `h` box at `(x, y)`.
    pub fn image(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.op(&format!(
            "q {} 0 0 {} {} {} cm /{} Do Q",
            num(w),
            num(h),
            num(x),
            num(y),
            IMAGE_NAME
        ));
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.ops
    }
}

#[derive(Debug, Clone)]
struct EmbeddedImage {
    info: JpegInfo,
    data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Document {
    width: f64,
    height: f64,
    compress: bool,
    image: Option<EmbeddedImage>,
    pages: Vec<Canvas>,
}

impl Document {
    /// Empty document with pages of `width` x `height` points.
    pub fn new(width: f64, height: f64) -> Self {
        Document {
            width,
            height,
            compress: true,
            image: None,
            pages: Vec::new(),
        }
    }

    /// Whether content streams are deflated. On by default.
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Embed a JPEG to be drawn with [`Canvas::image`].
    pub fn set_image(&mut self, jpeg_bytes: &[u8]) -> Result<JpegInfo> {
        let info = jpeg::parse(jpeg_bytes)?;
        self.image = Some(EmbeddedImage {
            info,
            data: jpeg_bytes.to_vec(),
        });
        Ok(info)
    }

    pub fn add_page(&mut self, canvas: Canvas) {
        self.pages.push(canvas);
    }

    /// Serialize the document.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = ObjectWriter::new();
        let image_obj = FIRST_FONT_OBJ + Font::ALL.len();
        let first_page_obj = image_obj + usize::from(self.image.is_some());
        let page_objs: Vec<usize> = (0..self.pages.len())
            .map(|i| first_page_obj + 2 * i)
            .collect();

        out.object(1, b"<< /Type /Catalog /Pages 2 0 R >>");
        let kids: Vec<String> = page_objs.iter().map(|n| format!("{n} 0 R")).collect();
        out.object(
            2,
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                page_objs.len()
            )
            .as_bytes(),
        );

        let mut font_refs = Vec::new();
        for (i, font) in Font::ALL.iter().enumerate() {
            let num = FIRST_FONT_OBJ + i;
            out.object(
                num,
                format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                    font.base_font()
                )
                .as_bytes(),
            );
            font_refs.push(format!("/{} {} 0 R", font.resource(), num));
        }

        let mut resources = format!("/Font << {} >>", font_refs.join(" "));
        if let Some(image) = &self.image {
            let info = &image.info;
            let decode = if info.components == 4 {
                " /Decode [1 0 1 0 1 0 1 0]"
            } else {
                ""
            };
            let dict = format!(
                "/Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /{} /BitsPerComponent {}{} /Filter /DCTDecode",
                info.width,
                info.height,
                info.color_space(),
                info.bits_per_component,
                decode
            );
            out.stream(image_obj, &dict, &image.data);
            resources.push_str(&format!(" /XObject << /{IMAGE_NAME} {image_obj} 0 R >>"));
        }

        for (canvas, &page_obj) in self.pages.iter().zip(&page_objs) {
            let content_obj = page_obj + 1;
            out.object(
                page_obj,
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Resources << {} >> /Contents {} 0 R >>",
                    num(self.width),
                    num(self.height),
                    resources,
                    content_obj
                )
                .as_bytes(),
            );
            if self.compress {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(canvas.as_bytes())?;
                let deflated = encoder.finish()?;
                out.stream(content_obj, "/Filter /FlateDecode", &deflated);
            } else {
                out.stream(content_obj, "", canvas.as_bytes());
            }
        }

        Ok(out.finish())
    }
}

/// Tracks object offsets while appending to the output buffer.
struct ObjectWriter {
    buf: Vec<u8>,
    offsets: Vec<(usize, usize)>,
}

impl ObjectWriter {
    fn new() -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        ObjectWriter {
            buf,
            offsets: Vec::new(),
        }
    }

    fn begin(&mut self, num: usize) {
        self.offsets.push((num, self.buf.len()));
        self.buf.extend_from_slice(format!("{num} 0 obj\n").as_bytes());
    }

    fn object(&mut self, num: usize, body: &[u8]) {
        self.begin(num);
        self.buf.extend_from_slice(body);
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    fn stream(&mut self, num: usize, dict_entries: &str, data: &[u8]) {
        self.begin(num);
        let sep = if dict_entries.is_empty() { "" } else { " " };
        self.buf.extend_from_slice(
            format!("<< {dict_entries}{sep}/Length {} >>\nstream\n", data.len()).as_bytes(),
        );
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\nendstream\nendobj\n");
    }

    fn finish(mut self) -> Vec<u8> {
        self.offsets.sort_unstable();
        let size = self.offsets.len() + 1;
        let xref_offset = self.buf.len();
        self.buf
            .extend_from_slice(format!("xref\n0 {size}\n0000000000 65535 f \n").as_bytes());
        for (_, offset) in &self.offsets {
            self.buf
                .extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        self.buf.extend_from_slice(
            format!("trailer\n<< /Size {size} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n")
                .as_bytes(),
        );
        self.buf
    }
}

/// Shortest decimal text for a coordinate, at most two decimals.
pub fn num(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn rgb((r, g, b): Rgb) -> String {
    let c = |v: u8| num(f64::from(v) / 255.0);
    format!("{} {} {}", c(r), c(g), c(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    #[test]
    fn test_num() {
        assert_eq!(num(841.8897637), "841.89");
        assert_eq!(num(10.0), "10");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(-3.25), "-3.25");
    }

    #[test]
    fn test_text_escaping() {
        let mut canvas = Canvas::new();
        canvas.text(Font::Bold, 9.0, 1.0, 2.0, b"Est.(t) a\\b");
        assert_eq!(
            canvas.as_bytes(),
            b"BT /F2 9 Tf 1 2 Td\n(Est.\\(t\\) a\\\\b) Tj ET\n"
        );
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let mut doc = Document::new(100.0, 50.0).compress(false);
        doc.add_page(Canvas::new());
        doc.add_page(Canvas::new());
        let bytes = doc.to_bytes().unwrap();

        assert!(bytes.starts_with(b"%PDF-1.4\n"));
        assert!(bytes.ends_with(b"%%EOF\n"));

        let start = find(&bytes, b"startxref\n").unwrap() + b"startxref\n".len();
        let tail = std::str::from_utf8(&bytes[start..]).unwrap();
        let xref_at: usize = tail.lines().next().unwrap().parse().unwrap();
        assert!(bytes[xref_at..].starts_with(b"xref\n0 10\n"));

        let table = std::str::from_utf8(&bytes[xref_at..]).unwrap();
        for (num, line) in table.lines().skip(3).take(9).enumerate() {
            let offset: usize = line[..10].parse().unwrap();
            let expected = format!("{} 0 obj", num + 1);
            assert!(
                bytes[offset..].starts_with(expected.as_bytes()),
                "object {}",
                num + 1
            );
        }
        assert!(find(&bytes, b"/Count 2").is_some());
        assert!(find(&bytes, b"/Kids [6 0 R 8 0 R]").is_some());
    }

    #[test]
    fn test_compressed_stream_inflates_to_content() {
        let mut canvas = Canvas::new();
        canvas.set_fill_rgb((0, 0, 139));
        canvas.rect(10.0, 20.0, 30.0, 40.0, Paint::FillStroke);
        let expected = canvas.as_bytes().to_vec();

        let mut doc = Document::new(100.0, 100.0);
        doc.add_page(canvas);
        let bytes = doc.to_bytes().unwrap();

        let marker = b"/Filter /FlateDecode /Length ";
        let at = find(&bytes, marker).unwrap() + marker.len();
        let len_end = at + find(&bytes[at..], b" ").unwrap();
        let len: usize = std::str::from_utf8(&bytes[at..len_end]).unwrap().parse().unwrap();
        let data_start = at + find(&bytes[at..], b"stream\n").unwrap() + b"stream\n".len();

        let mut inflated = Vec::new();
        flate2::read::ZlibDecoder::new(&bytes[data_start..data_start + len])
            .read_to_end(&mut inflated)
            .unwrap();
        assert_eq!(inflated, expected);
        assert_eq!(expected, b"0 0 0.55 rg\n10 20 30 40 re B\n");
    }

    #[test]
    fn test_image_is_shared_by_pages() {
        let mut doc = Document::new(100.0, 100.0).compress(false);
        let info = doc.set_image(&jpeg::minimal_jpeg(30, 10)).unwrap();
        assert_eq!((info.width, info.height), (30, 10));
        doc.add_page(Canvas::new());
        doc.add_page(Canvas::new());
        let bytes = doc.to_bytes().unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert_eq!(text.matches("/Subtype /Image").count(), 1);
        assert_eq!(text.matches("/XObject << /Im1 6 0 R >>").count(), 2);
        assert!(text.contains("/Width 30 /Height 10 /ColorSpace /DeviceGray"));
    }
}

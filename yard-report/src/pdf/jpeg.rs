//! Logo inspection for embedding a JPEG with `DCTDecode`.
//!
//! The file is passed through to the PDF untouched; only its header is
//! decoded, for the geometry and colour layout the image dictionary needs.

use crate::error::{ReportError, Result};
use image::codecs::jpeg::JpegDecoder;
use image::{ExtendedColorType, ImageDecoder};
use std::io::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegInfo {
    pub width: u32,
    pub height: u32,
    pub components: u8,
    pub bits_per_component: u8,
}

impl JpegInfo {
    pub fn color_space(&self) -> &'static str {
        match self.components {
            1 => "DeviceGray",
            4 => "DeviceCMYK",
            _ => "DeviceRGB",
        }
    }
}

/// Read image geometry from the JPEG header.
pub fn parse(bytes: &[u8]) -> Result<JpegInfo> {
    let decoder =
        JpegDecoder::new(Cursor::new(bytes)).map_err(|err| ReportError::Logo(err.to_string()))?;
    let (width, height) = decoder.dimensions();
    if width == 0 || height == 0 {
        return Err(ReportError::Logo("zero image dimension".into()));
    }
    let components = match decoder.original_color_type() {
        ExtendedColorType::L8 => 1,
        ExtendedColorType::Cmyk8 => 4,
        _ => 3,
    };
    Ok(JpegInfo {
        width,
        height,
        components,
        bits_per_component: 8,
    })
}

/// A small grey JPEG, for tests.
#[cfg(test)]
pub(crate) fn minimal_jpeg(width: u16, height: u16) -> Vec<u8> {
    use image::codecs::jpeg::JpegEncoder;

    let (width, height) = (u32::from(width), u32::from(height));
    let pixels = vec![128u8; (width * height) as usize];
    let mut bytes = Vec::new();
    JpegEncoder::new(&mut bytes)
        .encode(&pixels, width, height, ExtendedColorType::L8)
        .unwrap();
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grey_header() {
        let info = parse(&minimal_jpeg(120, 45)).unwrap();
        assert_eq!(info.width, 120);
        assert_eq!(info.height, 45);
        assert_eq!(info.components, 1);
        assert_eq!(info.bits_per_component, 8);
        assert_eq!(info.color_space(), "DeviceGray");
    }

    #[test]
    fn test_parse_rgb_header() {
        let pixels = vec![200u8; 16 * 8 * 3];
        let mut bytes = Vec::new();
        image::codecs::jpeg::JpegEncoder::new(&mut bytes)
            .encode(&pixels, 16, 8, ExtendedColorType::Rgb8)
            .unwrap();
        let info = parse(&bytes).unwrap();
        assert_eq!((info.width, info.height), (16, 8));
        assert_eq!(info.color_space(), "DeviceRGB");
    }

    #[test]
    fn test_rejects_non_jpeg() {
        assert!(matches!(parse(b"\x89PNG\r\n\x1a\n"), Err(ReportError::Logo(_))));
        assert!(matches!(parse(&[]), Err(ReportError::Logo(_))));
    }

    #[test]
    fn test_rejects_truncated_header() {
        let mut bytes = minimal_jpeg(10, 10);
        bytes.truncate(12);
        assert!(matches!(parse(&bytes), Err(ReportError::Logo(_))));
    }
}

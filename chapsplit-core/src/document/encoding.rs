//! Byte-to-text decoding for PDF strings

use super::cmap::CMap;

/// Decode a PDF text string (outline titles, document info).
///
/// Strings starting with a UTF-16BE or UTF-8 byte order mark are decoded
/// accordingly; everything else is PDFDocEncoding.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(utf8).into_owned();
    }
    bytes.iter().copied().map(pdfdoc_decode).collect()
}

/// Decode one byte of PDFDocEncoding (ISO 32000-1, Annex D)
pub fn pdfdoc_decode(code: u8) -> char {
    match code {
        0..=127 => code as char,
        128 => '\u{2022}',
        129 => '\u{2020}',
        130 => '\u{2021}',
        131 => '\u{2026}',
        132 => '\u{2014}',
        133 => '\u{2013}',
        134 => '\u{0192}',
        135 => '\u{2044}',
        136 => '\u{2039}',
        137 => '\u{203A}',
        138 => '\u{2212}',
        139 => '\u{2030}',
        140 => '\u{201E}',
        141 => '\u{201C}',
        142 => '\u{201D}',
        143 => '\u{2018}',
        144 => '\u{2019}',
        145 => '\u{201A}',
        146 => '\u{2122}',
        147 => '\u{FB01}',
        148 => '\u{FB02}',
        149 => '\u{0141}',
        150 => '\u{0152}',
        151 => '\u{0160}',
        152 => '\u{0178}',
        153 => '\u{017D}',
        154 => '\u{0131}',
        155 => '\u{0142}',
        156 => '\u{0153}',
        157 => '\u{0161}',
        158 => '\u{017E}',
        159 => '\u{FFFD}',
        160 => '\u{20AC}',
        161..=255 => code as char,
    }
}

/// How shown strings of a font map to text
#[derive(Debug, Clone, Default)]
pub enum FontDecoder {
    /// One byte per character
    #[default]
    Simple,
    /// One byte per character with a ToUnicode map
    SimpleMapped(CMap),
    /// Two bytes per character (Type0 fonts)
    Composite(Option<CMap>),
}

impl FontDecoder {
    /// Decode the operand of a text-showing operator
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            FontDecoder::Simple => bytes.iter().copied().map(pdfdoc_decode).collect(),
            FontDecoder::SimpleMapped(cmap) => bytes
                .iter()
                .map(|&b| match cmap.get(&u32::from(b)) {
                    Some(mapped) => mapped.clone(),
                    None => pdfdoc_decode(b).to_string(),
                })
                .collect(),
            FontDecoder::Composite(cmap) => bytes
                .chunks(2)
                .map(|pair| {
                    let code = pair
                        .iter()
                        .fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
                    cmap.as_ref()
                        .and_then(|map| map.get(&code).cloned())
                        .unwrap_or_else(|| '\u{FFFD}'.to_string())
                })
                .collect(),
        }
    }
}

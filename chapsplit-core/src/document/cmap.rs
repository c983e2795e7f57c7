//! ToUnicode CMap parsing
//!
//! Only the `bfchar` and `bfrange` sections are read; they are all that is
//! needed to turn character codes into text.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Character code to text
pub type CMap = HashMap<u32, String>;

/// Ranges larger than this are treated as corrupt
const MAX_RANGE: u32 = 0xFFFF;

fn hex_pair_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<([0-9A-Fa-f]+)>\s*<([0-9A-Fa-f]+)>").expect("valid regex"))
}

fn range_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<([0-9A-Fa-f]+)>\s*<([0-9A-Fa-f]+)>\s*(?:<([0-9A-Fa-f]+)>|\[([^\]]*)\])")
            .expect("valid regex")
    })
}

fn hex_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<([0-9A-Fa-f]+)>").expect("valid regex"))
}

/// Parse a decoded ToUnicode stream
pub fn parse_to_unicode(data: &[u8]) -> CMap {
    let content = String::from_utf8_lossy(data);
    let mut cmap = CMap::new();

    for section in sections(&content, "beginbfchar", "endbfchar") {
        for caps in hex_pair_pattern().captures_iter(section) {
            if let (Ok(src), Some(dst)) = (u32::from_str_radix(&caps[1], 16), utf16_hex(&caps[2])) {
                cmap.insert(src, dst);
            }
        }
    }

    for section in sections(&content, "beginbfrange", "endbfrange") {
        for caps in range_pattern().captures_iter(section) {
            let (Ok(lo), Ok(hi)) = (
                u32::from_str_radix(&caps[1], 16),
                u32::from_str_radix(&caps[2], 16),
            ) else {
                continue;
            };
            if hi < lo || hi - lo > MAX_RANGE {
                log::debug!("Ignoring bfrange <{:X}> <{:X}>", lo, hi);
                continue;
            }

            if let Some(base) = caps.get(3) {
                let Ok(start) = u32::from_str_radix(base.as_str(), 16) else {
                    continue;
                };
                for (offset, code) in (lo..=hi).enumerate() {
                    if let Some(ch) = start.checked_add(offset as u32).and_then(char::from_u32) {
                        cmap.insert(code, ch.to_string());
                    }
                }
            } else if let Some(array) = caps.get(4) {
                for (code, item) in (lo..=hi).zip(hex_pattern().captures_iter(array.as_str())) {
                    if let Some(dst) = utf16_hex(&item[1]) {
                        cmap.insert(code, dst);
                    }
                }
            }
        }
    }

    cmap
}

fn sections<'a>(content: &'a str, begin: &str, end: &str) -> Vec<&'a str> {
    let mut found = Vec::new();
    let mut rest = content;

    while let Some(start) = rest.find(begin) {
        let after = &rest[start + begin.len()..];
        match after.find(end) {
            Some(stop) => {
                found.push(&after[..stop]);
                rest = &after[stop + end.len()..];
            }
            None => break,
        }
    }

    found
}

/// Destination strings are UTF-16BE code units written in hex
fn utf16_hex(hex: &str) -> Option<String> {
    if hex.len() <= 2 {
        return u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from);
    }
    let units = hex
        .as_bytes()
        .chunks(4)
        .map(|chunk| std::str::from_utf8(chunk).ok().and_then(|s| u16::from_str_radix(s, 16).ok()))
        .collect::<Option<Vec<u16>>>()?;
    let text = String::from_utf16_lossy(&units);
    (!text.is_empty()).then_some(text)
}

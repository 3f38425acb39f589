//! SVG size calculator.
//!
//! Dimensions come from the root `<svg>` element: explicit `width` and
//! `height` attributes (with optional CSS units), otherwise derived from the
//! `viewBox` aspect ratio.

use std::borrow::Cow;
use std::path::Path;

use crate::error::ParseError;
use crate::size::ImageInfo;

use super::Calculator;

/// The root element must start within this many bytes.
const DETECTION_WINDOW: usize = 1000;

/// CSS unit to pixels, at 96 DPI
const UNITS: [(&str, f64); 9] = [
    ("in", 96.0),
    ("cm", 96.0 / 2.54),
    ("mm", 96.0 / 25.4),
    ("m", 9600.0 / 2.54),
    ("pt", 96.0 / 72.0),
    ("pc", 16.0),
    ("em", 16.0),
    ("ex", 8.0),
    ("px", 1.0),
];

/// Byte offset of the first `<svg` followed by whitespace or `>`.
fn find_root(text: &str) -> Option<usize> {
    text.match_indices("<svg").map(|(i, _)| i).find(|&i| {
        text[i + 4..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_whitespace() || c == '>' || c == '/')
    })
}

pub fn matches(header: &[u8]) -> bool {
    let window = &header[..header.len().min(DETECTION_WINDOW)];
    find_root(&String::from_utf8_lossy(window)).is_some()
}

/// Attribute text of the root element, up to its closing `>`.
fn root_attributes(text: &str) -> Option<&str> {
    let start = find_root(text)? + 4;
    let mut quote = None;
    for (i, c) in text[start..].char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, '>') => return Some(&text[start..start + i]),
            _ => {}
        }
    }
    None
}

/// Parse `name="value"` pairs; names are lowercased.
fn parse_attributes(tag: &str) -> Vec<(String, String)> {
    let mut attributes = Vec::new();
    let mut rest = tag;

    while let Some(eq) = rest.find('=') {
        let name = rest[..eq]
            .split_whitespace()
            .last()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let after = rest[eq + 1..].trim_start();

        let Some(q) = after.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            // unquoted value
            let end = after.find(char::is_whitespace).unwrap_or(after.len());
            attributes.push((name, after[..end].to_string()));
            rest = &after[end..];
            continue;
        };

        let body = &after[1..];
        let Some(end) = body.find(q) else {
            break;
        };
        attributes.push((name, body[..end].to_string()));
        rest = &body[end + 1..];
    }

    attributes
}

/// Convert a length such as `12.5cm` to pixels. Percentages yield `None`.
fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    let split = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+' || c == 'e' || c == 'E'))
        .unwrap_or(value.len());
    // "em"/"ex" start with 'e', so back off a trailing exponent marker
    let split = if value[..split].ends_with(['e', 'E']) { split - 1 } else { split };

    let number: f64 = value[..split].parse().ok()?;
    let unit = value[split..].trim();
    let scale = if unit.is_empty() {
        1.0
    } else {
        UNITS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(unit))
            .map(|(_, scale)| *scale)?
    };

    Some(number * scale)
}

fn to_pixels(value: f64, what: &str) -> Result<u32, ParseError> {
    if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX) {
        return Err(ParseError::malformed("SVG", format!("{} {} out of range", what, value)));
    }
    Ok(value as u32)
}

fn parse_view_box(value: &str) -> Result<(f64, f64), ParseError> {
    let numbers = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::parse::<f64>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ParseError::malformed("SVG", format!("invalid viewBox '{}'", value)))?;

    match numbers.as_slice() {
        [_, _, width, height] => Ok((*width, *height)),
        _ => Err(ParseError::malformed("SVG", format!("invalid viewBox '{}'", value))),
    }
}

pub struct SvgCalculator;

impl Calculator for SvgCalculator {
    fn calculate(&self, data: &[u8], _path: Option<&Path>) -> Result<ImageInfo, ParseError> {
        let text: Cow<'_, str> = String::from_utf8_lossy(data);
        let tag = root_attributes(&text)
            .ok_or(ParseError::MissingDimensions("SVG root element is not closed"))?;
        let attributes = parse_attributes(tag);
        let get = |name: &str| {
            attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        };

        let width = get("width").and_then(parse_length);
        let height = get("height").and_then(parse_length);
        if let (Some(w), Some(h)) = (width, height) {
            return Ok(ImageInfo::new(to_pixels(w.round(), "width")?, to_pixels(h.round(), "height")?));
        }

        let Some(view_box) = get("viewbox") else {
            return Err(ParseError::MissingDimensions("SVG has neither width/height nor viewBox"));
        };
        let (vb_width, vb_height) = parse_view_box(view_box)?;
        if vb_height == 0.0 {
            return Err(ParseError::malformed("SVG", "viewBox height is zero"));
        }
        let ratio = vb_width / vb_height;

        let (w, h) = match (width, height) {
            (Some(w), None) => (w, (w / ratio).floor()),
            (None, Some(h)) => ((h * ratio).floor(), h),
            _ => (vb_width, vb_height),
        };
        Ok(ImageInfo::new(to_pixels(w.round(), "width")?, to_pixels(h.round(), "height")?))
    }
}

//! Netpbm (PBM, PGM, PPM, PAM, PFM) size calculator.
//!
//! The header is plain text: a two-byte magic (`P1`-`P7`, `PF`, `Pf`), then
//! whitespace separated tokens, with `#` starting a comment that runs to the
//! end of the line. PAM (`P7`) uses `KEY value` lines terminated by `ENDHDR`.

use std::path::Path;

use crate::error::ParseError;
use crate::size::ImageInfo;

use super::Calculator;

pub fn matches(header: &[u8]) -> bool {
    match header {
        [b'P', kind, next, ..] => {
            matches!(kind, b'1'..=b'7' | b'F' | b'f') && next.is_ascii_whitespace()
        }
        _ => false,
    }
}

/// Whitespace and comment aware tokenizer over the header bytes.
struct Tokens<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let byte = *self.data.get(self.pos)?;
            if byte == b'#' {
                while self.data.get(self.pos).is_some_and(|&b| b != b'\n' && b != b'\r') {
                    self.pos += 1;
                }
            } else if byte.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }

        let start = self.pos;
        while self
            .data
            .get(self.pos)
            .is_some_and(|&b| !b.is_ascii_whitespace() && b != b'#')
        {
            self.pos += 1;
        }
        Some(&self.data[start..self.pos])
    }
}

fn parse_dimension(token: Option<&[u8]>, name: &'static str) -> Result<u32, ParseError> {
    let token = token.ok_or(ParseError::MissingDimensions(name))?;
    std::str::from_utf8(token)
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(|| {
            ParseError::malformed(
                "PNM",
                format!("{} is not a number: {:?}", name, String::from_utf8_lossy(token)),
            )
        })
}

fn pam_size(tokens: &mut Tokens<'_>) -> Result<ImageInfo, ParseError> {
    let mut width = None;
    let mut height = None;

    while let Some(token) = tokens.next() {
        match token {
            b"WIDTH" => width = Some(parse_dimension(tokens.next(), "PAM WIDTH")?),
            b"HEIGHT" => height = Some(parse_dimension(tokens.next(), "PAM HEIGHT")?),
            b"ENDHDR" => break,
            _ => {}
        }
        if let (Some(w), Some(h)) = (width, height) {
            return Ok(ImageInfo::new(w, h));
        }
    }

    Err(ParseError::MissingDimensions("PAM header lacks WIDTH or HEIGHT"))
}

pub struct PnmCalculator;

impl Calculator for PnmCalculator {
    fn calculate(&self, data: &[u8], _path: Option<&Path>) -> Result<ImageInfo, ParseError> {
        if !matches(data) {
            return Err(ParseError::InvalidSignature("PNM magic"));
        }

        let mut tokens = Tokens::new(data, 2);
        if data[1] == b'7' {
            return pam_size(&mut tokens);
        }

        let width = parse_dimension(tokens.next(), "PNM width")?;
        let height = parse_dimension(tokens.next(), "PNM height")?;
        Ok(ImageInfo::new(width, height))
    }
}

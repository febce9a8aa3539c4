use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{CoreError, Result};

#[derive(Debug, Serialize)]
pub struct EncodingCandidate {
    pub name: String,
    pub confidence: f32,
}

#[derive(Debug, Serialize)]
pub struct EncodingDetectionResult {
    pub best: String,
    pub confidence: f32,
    pub declared: Option<String>,
    pub candidates: Vec<EncodingCandidate>,
}

#[derive(Debug)]
pub struct Decoded {
    pub text: String,
    pub encoding: &'static Encoding,
    pub had_errors: bool,
}

fn declaration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*<\?xml[^>]*?encoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#).expect("xml declaration pattern")
    })
}

/// Label from `<?xml ... encoding="..."?>`, if the document starts with one.
pub fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(256)];
    declaration_re()
        .captures(head)
        .and_then(|c| c.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).to_lowercase())
}

/// Decodes a TS file: BOM first, then the XML declaration, then detection.
pub fn decode(bytes: &[u8]) -> Result<Decoded> {
    let encoding = if let Some((enc, _)) = Encoding::for_bom(bytes) {
        enc
    } else if let Some(label) = declared_encoding(bytes) {
        Encoding::for_label(label.as_bytes())
            .ok_or_else(|| CoreError::Encoding(format!("unknown declared encoding '{label}'")))?
    } else {
        guess(bytes)
    };

    // decode() strips a matching BOM itself
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(encoding = used.name(), "malformed byte sequences replaced while decoding");
    }
    debug!(encoding = used.name(), bytes = bytes.len(), "decoded catalog");

    Ok(Decoded {
        text: text.into_owned(),
        encoding: used,
        had_errors,
    })
}

pub fn read_file(path: &Path) -> Result<Decoded> {
    let bytes = fs::read(path)?;
    decode(&bytes)
}

fn guess(bytes: &[u8]) -> &'static Encoding {
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

pub fn detect_from_file(path: &Path) -> Result<EncodingDetectionResult> {
    let bytes = fs::read(path)?;
    Ok(detect(&bytes))
}

pub fn detect(bytes: &[u8]) -> EncodingDetectionResult {
    let declared = declared_encoding(bytes);

    // BOM UTF-8 (EF BB BF)
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return EncodingDetectionResult {
            best: "utf-8-sig".into(),
            confidence: 0.99,
            declared,
            candidates: vec![
                EncodingCandidate {
                    name: "utf-8-sig".into(),
                    confidence: 0.99,
                },
                EncodingCandidate {
                    name: "utf-8".into(),
                    confidence: 0.90,
                },
            ],
        };
    }

    let encoding = guess(bytes);
    let best = encoding.name().to_lowercase();
    let mut confidence = estimate_confidence(bytes, encoding);

    // a declaration that agrees with the bytes is strong evidence
    let declared_enc = declared.as_deref().and_then(|l| Encoding::for_label(l.as_bytes()));
    if declared_enc == Some(encoding) {
        confidence = (confidence + 0.08).min(0.99);
    }

    let mut candidates = vec![EncodingCandidate {
        name: best.clone(),
        confidence,
    }];

    if let Some(other) = declared_enc.filter(|d| *d != encoding) {
        let (_, _, had_errors) = other.decode(bytes);
        candidates.push(EncodingCandidate {
            name: other.name().to_lowercase(),
            confidence: if had_errors { 0.20 } else { (confidence - 0.05).max(0.0) },
        });
    }

    if best == "utf-8" {
        candidates.push(EncodingCandidate {
            name: "utf-8-sig".into(),
            confidence: (confidence - 0.20).max(0.0),
        });
    }

    EncodingDetectionResult {
        best,
        confidence,
        declared,
        candidates,
    }
}

fn estimate_confidence(bytes: &[u8], encoding: &'static Encoding) -> f32 {
    let (text, _, had_errors) = encoding.decode(bytes);

    if had_errors {
        return 0.35;
    }

    let len = text.len();
    if len < 64 {
        0.55
    } else if len < 512 {
        0.70
    } else if len < 4096 {
        0.82
    } else {
        0.90
    }
}

//! Best-effort character encoding detection for text datasets

use encoding_rs::{Encoding, UTF_8};

use crate::error::{Result, TabragError};

/// Text decoded from raw bytes, with the encoding that was used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static str,
    /// True when detection was inconclusive and lossy UTF-8 was used instead
    pub fell_back: bool,
}

/// Detect the encoding of `bytes` and decode them.
///
/// Order: byte order mark, strict UTF-8, statistical guess. A guess that
/// still produces malformed sequences degrades to lossy UTF-8. Input with
/// NUL bytes is not text and is rejected.
pub fn detect_and_decode(bytes: &[u8]) -> Result<DecodedText> {
    if bytes.contains(&0) && Encoding::for_bom(bytes).is_none() {
        return Err(TabragError::EncodingDetection {
            reason: "input contains NUL bytes and does not look like text".to_string(),
        });
    }

    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        if !had_errors {
            return Ok(DecodedText {
                text: text.into_owned(),
                encoding: encoding.name(),
                fell_back: false,
            });
        }
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(DecodedText {
            text: text.to_string(),
            encoding: UTF_8.name(),
            fell_back: false,
        });
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    let guessed = detector.guess(None, true);

    let (text, had_errors) = guessed.decode_without_bom_handling(bytes);
    if !had_errors {
        return Ok(DecodedText {
            text: text.into_owned(),
            encoding: guessed.name(),
            fell_back: false,
        });
    }

    tracing::warn!(
        guessed = guessed.name(),
        "Encoding detection inconclusive, decoding as lossy UTF-8"
    );

    Ok(DecodedText {
        text: String::from_utf8_lossy(bytes).into_owned(),
        encoding: UTF_8.name(),
        fell_back: true,
    })
}

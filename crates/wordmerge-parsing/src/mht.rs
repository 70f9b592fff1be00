//! Quoted-printable decoding of the MHT payload embedded in web-archive packages.

use quoted_printable::ParseMode;

/// Decode a MIME quoted-printable blob into text.
///
/// Decoded bytes are read as UTF-8 with invalid sequences replaced. Hard line
/// breaks come out as `\n`, and any `=\n` soft-break marker left over after
/// decoding is removed. If the decoder rejects the input, the input is
/// returned unchanged.
pub fn decode_quoted_printable(input: &str) -> String {
    match ::quoted_printable::decode(input.as_bytes(), ParseMode::Robust) {
        Ok(bytes) => String::from_utf8_lossy(&bytes)
            .replace("\r\n", "\n")
            .replace("=\n", ""),
        Err(e) => {
            tracing::debug!(error = %e, "quoted-printable decode failed, using raw text");
            input.to_string()
        }
    }
}

//! Request-line construction and percent-encoding.
//!
//! Every request is a single newline-terminated line: a verb followed by
//! space-separated arguments. Path-like arguments are percent-encoded so
//! that embedded spaces and newlines cannot break the framing.

use std::fmt::Display;

fn is_safe(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'/' | b'.' | b'-' | b'_')
}

/// Percent-encodes a path-like argument.
///
/// Alphanumerics and `/ . - _` pass through; every other byte becomes `%XX`
/// with uppercase hex digits.
pub fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if is_safe(b) {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(char::from_digit((b >> 4) as u32, 16).unwrap().to_ascii_uppercase());
            out.push(char::from_digit((b & 0xf) as u32, 16).unwrap().to_ascii_uppercase());
        }
    }
    out
}

/// Decodes `%XX` escapes. Bytes that do not form a valid escape pass through
/// unchanged, matching the server's lenient decoder.
pub fn percent_decode(s: &str) -> Vec<u8> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hi = (bytes[i + 1] as char).to_digit(16);
            let lo = (bytes[i + 2] as char).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

/// Builder for one request line.
///
/// Arguments are appended in order; [`Request::path`] percent-encodes,
/// [`Request::arg`] passes the display form through verbatim (used for
/// integers and protocol tokens that are space-free by construction).
#[derive(Debug, Clone)]
pub struct Request {
    line: String,
}

impl Request {
    pub fn new(verb: &str) -> Self {
        Self {
            line: verb.to_string(),
        }
    }

    /// Appends a verbatim argument.
    pub fn arg(mut self, value: impl Display) -> Self {
        self.line.push(' ');
        self.line.push_str(&value.to_string());
        self
    }

    /// Appends a percent-encoded path argument.
    pub fn path(mut self, path: &str) -> Self {
        self.line.push(' ');
        self.line.push_str(&percent_encode(path));
        self
    }

    /// Appends a raw trailing argument that may contain spaces (a command
    /// line). Must be last; the newline still terminates the request.
    pub fn trailing(mut self, value: &str) -> Self {
        self.line.push(' ');
        self.line.push_str(value);
        self
    }

    /// Returns the request line without its terminating newline, for logging.
    pub fn as_str(&self) -> &str {
        &self.line
    }

    /// Finishes the line with the protocol newline.
    pub fn into_line(mut self) -> String {
        self.line.push('\n');
        self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_passthrough() {
        assert_eq!(percent_encode("/data/file.txt"), "/data/file.txt");
    }

    #[test]
    fn test_encode_space_and_newline() {
        assert_eq!(percent_encode("a b"), "a%20b");
        assert_eq!(percent_encode("a\nb"), "a%0Ab");
        assert_eq!(percent_encode("100%"), "100%25");
    }

    #[test]
    fn test_decode_roundtrip() {
        let original = "dir with spaces/über.txt";
        let encoded = percent_encode(original);
        assert_eq!(percent_decode(&encoded), original.as_bytes());
    }

    #[test]
    fn test_request_builder() {
        let req = Request::new("open").path("/a dir/f").arg("rw").arg(0o644);
        assert_eq!(req.into_line(), "open /a%20dir/f rw 420\n");
    }

    #[test]
    fn test_request_trailing_keeps_spaces() {
        let req = Request::new("job_begin").arg("/tmp").trailing("echo hello world");
        assert_eq!(req.as_str(), "job_begin /tmp echo hello world");
    }

    proptest! {
        #[test]
        fn prop_encoded_is_line_safe(s in "\\PC*") {
            let enc = percent_encode(&s);
            prop_assert!(!enc.contains(' '));
            prop_assert!(!enc.contains('\n'));
            prop_assert!(enc.bytes().all(|b| b == b'%' || super::is_safe(b) || b.is_ascii_hexdigit()));
        }

        #[test]
        fn prop_decode_inverts_encode(s in "\\PC*") {
            prop_assert_eq!(percent_decode(&percent_encode(&s)), s.as_bytes().to_vec());
        }
    }
}

//! `pathurl` decoding

use percent_encoding::percent_decode_str;

const LOCALHOST_PREFIX: &str = "file://localhost";
const FILE_PREFIX: &str = "file://";

/// Turn an FCP `pathurl` into a filesystem path
///
/// Strips `file://localhost` or `file://` and percent-decodes the rest.
/// Returns `None` when nothing remains.
///
/// ```rust
/// use fcpa_common::fcp5::paths::decode_pathurl;
///
/// assert_eq!(
///     decode_pathurl("file://localhost/Media/Take%201.wav").as_deref(),
///     Some("/Media/Take 1.wav")
/// );
/// ```
pub fn decode_pathurl(pathurl: &str) -> Option<String> {
    let trimmed = pathurl.trim();
    let rest = trimmed
        .strip_prefix(LOCALHOST_PREFIX)
        .or_else(|| trimmed.strip_prefix(FILE_PREFIX))
        .unwrap_or(trimmed);

    if rest.is_empty() {
        return None;
    }
    Some(percent_decode_str(rest).decode_utf8_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_both_prefixes() {
        assert_eq!(decode_pathurl("file://localhost/a/b.wav").as_deref(), Some("/a/b.wav"));
        assert_eq!(decode_pathurl("file:///a/b.wav").as_deref(), Some("/a/b.wav"));
    }

    #[test]
    fn test_plain_path_kept() {
        assert_eq!(decode_pathurl("/a/b.wav").as_deref(), Some("/a/b.wav"));
        assert_eq!(decode_pathurl("C:/media/x.wav").as_deref(), Some("C:/media/x.wav"));
    }

    #[test]
    fn test_percent_decoding() {
        assert_eq!(
            decode_pathurl("file://localhost/Vol/M%C3%BCller%20Mix.aif").as_deref(),
            Some("/Vol/Müller Mix.aif")
        );
    }

    #[test]
    fn test_empty_is_none() {
        assert_eq!(decode_pathurl(""), None);
        assert_eq!(decode_pathurl("file://localhost"), None);
        assert_eq!(decode_pathurl("  "), None);
    }
}

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// How far into the document a `<meta charset>` declaration is looked for.
const META_SNIFF_BYTES: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHtml {
    pub html: String,
    pub encoding_label: String,
    /// Malformed sequences were replaced with U+FFFD.
    pub lossy: bool,
}

/// Decode a listing page to UTF-8: BOM, then Content-Type charset, then
/// `<meta charset>`, then chardetng. Never fails; stray bytes become U+FFFD.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> DecodedHtml {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    let declared = content_type
        .and_then(charset_param)
        .or_else(|| meta_charset(bytes))
        .and_then(|label| Encoding::for_label(label.as_bytes()));
    if let Some(encoding) = declared {
        return decode_with(bytes, encoding);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']).to_string())
    })
}

fn meta_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(META_SNIFF_BYTES)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    let start = head.find("charset=")? + "charset=".len();
    let label: String = head[start..]
        .trim_start_matches(['"', '\''])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect();
    (!label.is_empty()).then_some(label)
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> DecodedHtml {
    let (text, _, had_errors) = encoding.decode(bytes);
    DecodedHtml {
        html: text.into_owned(),
        encoding_label: encoding.name().to_string(),
        lossy: had_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_charset_wins_over_detection() {
        let decoded = decode_html(b"caf\xe9", Some("text/html; Charset=\"ISO-8859-1\""));
        assert_eq!(decoded.html, "café");
        assert_eq!(decoded.encoding_label, "windows-1252");
    }

    #[test]
    fn bom_is_stripped() {
        let decoded = decode_html(b"\xEF\xBB\xBF<p>hi</p>", Some("text/html"));
        assert_eq!(decoded.html, "<p>hi</p>");
        assert_eq!(decoded.encoding_label, "UTF-8");
    }

    #[test]
    fn meta_charset_is_used_without_header() {
        let bytes = b"<html><head><meta charset=\"windows-1252\"></head><body>na\xefve</body></html>";
        let decoded = decode_html(bytes, None);
        assert!(decoded.html.contains("naïve"));
    }

    #[test]
    fn malformed_bytes_are_replaced_not_rejected() {
        let decoded = decode_html(b"ok \xff\xfd bad", Some("text/html; charset=utf-8"));
        assert!(decoded.lossy);
        assert_eq!(decoded.html, "ok \u{FFFD}\u{FFFD} bad");
        assert!(!decode_html(b"ok", Some("text/html; charset=utf-8")).lossy);
    }
}

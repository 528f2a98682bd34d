//! Header recognition.
//!
//! Only `Content-Length` matters to the response reader; every other header
//! line is inspected and dropped.

const CONTENT_LENGTH: &[u8] = b"content-length:";

/// Extracts the declared body length from a raw header line.
///
/// The name is matched case-insensitively as a prefix of the line. The value
/// is the leading run of ASCII digits after surrounding whitespace is removed,
/// so `Content-Length: 12 ; x` yields 12. Returns `None` when the line is not
/// a `Content-Length` header, the value has no digits, is negative, or does
/// not fit in `usize`.
pub fn content_length(line: &[u8]) -> Option<usize> {
    let value = strip_prefix_ignore_ascii_case(line, CONTENT_LENGTH)?;
    parse_leading_digits(value.trim_ascii())
}

fn strip_prefix_ignore_ascii_case<'a>(line: &'a [u8], prefix: &[u8]) -> Option<&'a [u8]> {
    if line.len() < prefix.len() {
        return None;
    }
    let (head, rest) = line.split_at(prefix.len());
    head.eq_ignore_ascii_case(prefix).then_some(rest)
}

fn parse_leading_digits(value: &[u8]) -> Option<usize> {
    let value = value.strip_prefix(b"+").unwrap_or(value);
    let digits = value.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }

    value[..digits].iter().try_fold(0usize, |acc, &b| {
        acc.checked_mul(10)?.checked_add(usize::from(b - b'0'))
    })
}

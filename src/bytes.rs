use atoi::FromRadix10SignedChecked;
use memchr::memchr_iter;

/// Number of tab-separated fields kept per line by default.
pub const MAX_FIELDS: usize = 10;

// Split a line at tabs, keeping at most `limit` fields
#[inline]
pub fn split_fields(line: &str, limit: usize) -> Vec<&str> {
    let mut fields = Vec::with_capacity(limit);
    let mut start = 0;
    for pos in memchr_iter(b'\t', line.as_bytes()) {
        if fields.len() + 1 == limit {
            break;
        }
        fields.push(&line[start..pos]);
        start = pos + 1;
    }
    if fields.len() < limit {
        let rest = &line[start..];
        match memchr::memchr(b'\t', rest.as_bytes()) {
            Some(pos) => fields.push(&rest[..pos]),
            None => fields.push(rest),
        }
    }
    fields
}

// Whole-field signed integer; None on any trailing garbage
#[inline]
pub fn parse_int(field: &str) -> Option<i64> {
    let bytes = field.trim().as_bytes();
    if !bytes.iter().any(u8::is_ascii_digit) {
        return None;
    }
    match i64::from_radix_10_signed_checked(bytes) {
        (Some(n), used) if used == bytes.len() => Some(n),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_fields() {
        assert_eq!(split_fields("a\tb\tc", 10), vec!["a", "b", "c"]);
        assert_eq!(split_fields("a\tb\tc", 2), vec!["a", "b"]);
        assert_eq!(split_fields("a", 10), vec!["a"]);
        assert_eq!(split_fields("", 10), vec![""]);

        // Empty fields survive
        assert_eq!(split_fields("a\t\tc\t", 10), vec!["a", "", "c", ""]);
    }

    #[test]
    fn test_split_fields_limit_one() {
        assert_eq!(split_fields("a\tb", 1), vec!["a"]);
    }

    #[test]
    fn test_split_full_row() {
        let line = "1\tcanis\tcanis\tNOUN\t_\t_\t2\tnsubj\t_\t_";
        let fields = split_fields(line, MAX_FIELDS);
        assert_eq!(fields.len(), 10);
        assert_eq!(fields[1], "canis");
        assert_eq!(fields[9], "_");
    }

    #[test]
    fn test_parse_int_valid() {
        assert_eq!(parse_int("0"), Some(0));
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("007"), Some(7));
        assert_eq!(parse_int("-3"), Some(-3));
        assert_eq!(parse_int(" 5 "), Some(5));
    }

    #[test]
    fn test_parse_int_invalid() {
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("_"), None);
        assert_eq!(parse_int("12a"), None);
        assert_eq!(parse_int("1.2"), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int("99999999999999999999"), None);
    }
}

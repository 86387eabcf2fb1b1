//! # String Utilities

/// Convert owned bytes to a [`String`], replacing invalid UTF-8 sequences.
///
/// Re-uses the allocation when the bytes are already valid UTF-8.
pub fn string_from_utf8_lossy(v: Vec<u8>) -> String {
    String::from_utf8(v).unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_from_lossy_utf8() {
        let v = vec![0x61, 0x62, 0xff, 0x28];
        let s = string_from_utf8_lossy(v);
        assert_eq!(s, "ab\u{fffd}(".to_string());

        let v = vec![0x61, 0x62];
        let s = string_from_utf8_lossy(v);
        assert_eq!(s, "ab".to_string());
    }
}

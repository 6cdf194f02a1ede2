//! Request path segmentation
//!
//! Splits a request URI into raw path segments. A `/` inside the quoted part
//! of a parenthesized key must not split the segment, so the splitter tracks
//! single-quote parity: while the running count of quotes in the current
//! segment is odd, `/` is ordinary content. A `/` that falls between a
//! closed quote and the closing parenthesis still splits; that matches the
//! long-standing observable behavior of this URL convention, so it is kept
//! even though it reads like an accident.

use odata_uri_diagnostics::{ODU0201, ODU0300, Result, UriParseError};

/// Splits request paths into segments, bounded by a segment-count limit
#[derive(Debug, Clone, Copy)]
pub struct UriPathParser {
    max_segments: usize,
}

impl UriPathParser {
    pub const fn new(max_segments: usize) -> Self {
        Self { max_segments }
    }

    /// Split the request path (relative to the service base) into segments
    ///
    /// The request URI must begin with the service base URI. The query
    /// string is ignored. Consecutive separators collapse; no empty
    /// segments are produced. Characters are preserved verbatim (any
    /// percent-decoding happened upstream).
    pub fn parse_path_into_segments(
        &self,
        request_uri: &str,
        service_base_uri: &str,
    ) -> Result<Vec<String>> {
        let Some(relative) = request_uri.strip_prefix(service_base_uri) else {
            return Err(UriParseError::uri(
                ODU0300,
                "The request URI is not valid because it does not start with the service base URI",
                request_uri,
                service_base_uri,
            ));
        };
        let path = match relative.find('?') {
            Some(at) => &relative[..at],
            None => relative,
        };

        let mut segments: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut quote_count: usize = 0;

        for ch in path.chars() {
            match ch {
                '/' if quote_count % 2 == 0 => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
                '\'' => {
                    quote_count += 1;
                    current.push(ch);
                }
                _ => current.push(ch),
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }

        if segments.len() > self.max_segments {
            return Err(UriParseError::limit(
                ODU0201,
                format!(
                    "The number of segments in the request path exceeds the limit of {}",
                    self.max_segments
                ),
            ));
        }
        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(path: &str) -> Vec<String> {
        UriPathParser::new(100)
            .parse_path_into_segments(path, "")
            .unwrap()
    }

    #[test]
    fn test_collapses_repeated_separators() {
        assert_eq!(parse("One////Three"), vec!["One", "Three"]);
    }

    #[test]
    fn test_parenthesized_key_stays_one_segment() {
        assert_eq!(parse("EntitySet('KeyValue')"), vec!["EntitySet('KeyValue')"]);
        assert_eq!(
            parse("EntitySet(first=1,second=2)"),
            vec!["EntitySet(first=1,second=2)"]
        );
    }

    #[test]
    fn test_slash_inside_quoted_key_does_not_split() {
        assert_eq!(
            parse("EntitySet('string/key')/Nav"),
            vec!["EntitySet('string/key')", "Nav"]
        );
    }

    #[test]
    fn test_slash_after_closed_quote_still_splits() {
        // Legacy behavior: parens alone do not suppress splitting
        assert_eq!(
            parse("EntitySet('string'/key')"),
            vec!["EntitySet('string'", "key')"]
        );
    }

    #[test]
    fn test_raw_spaces_preserved() {
        assert_eq!(parse("Entity Set/Two"), vec!["Entity Set", "Two"]);
    }

    #[test]
    fn test_query_string_is_ignored() {
        assert_eq!(parse("Set?$filter=true"), vec!["Set"]);
    }

    #[test]
    fn test_base_uri_mismatch() {
        let err = UriPathParser::new(100)
            .parse_path_into_segments("http://other/Set", "http://host/service/")
            .unwrap_err();
        assert_eq!(err.code(), ODU0300);
    }

    #[test]
    fn test_base_uri_is_stripped() {
        let segments = UriPathParser::new(100)
            .parse_path_into_segments("http://host/service/Set/1", "http://host/service/")
            .unwrap();
        assert_eq!(segments, vec!["Set", "1"]);
    }

    #[test]
    fn test_too_many_segments() {
        let err = UriPathParser::new(2)
            .parse_path_into_segments("One/Two/Three", "")
            .unwrap_err();
        assert_eq!(err.code(), ODU0201);
    }
}

//! Expression lexer
//!
//! Tokenizes a raw query-option string into typed tokens, tracking the
//! 0-based position of every token for error reporting. The lexer is a pure
//! function of the input text; word operators (`eq`, `and`, `not`, ...) are
//! produced as identifiers and classified by the expression parser.

use odata_uri_diagnostics::{ODU0001, ODU0002, Result, UriParseError};

/// Classification of one lexed token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionTokenKind {
    Identifier,
    StringLiteral,
    IntegerLiteral,
    DecimalLiteral,
    DoubleLiteral,
    SingleLiteral,
    BooleanLiteral,
    NullLiteral,
    GuidLiteral,
    DateLiteral,
    TimeOfDayLiteral,
    DateTimeOffsetLiteral,
    DurationLiteral,
    BinaryLiteral,
    GeographyLiteral,
    GeometryLiteral,
    OpenParen,
    CloseParen,
    Comma,
    Colon,
    Semicolon,
    Equals,
    Slash,
    Dot,
    Star,
    Minus,
    /// End of input
    End,
}

impl ExpressionTokenKind {
    /// Check whether this token carries a literal value
    pub const fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::StringLiteral
                | Self::IntegerLiteral
                | Self::DecimalLiteral
                | Self::DoubleLiteral
                | Self::SingleLiteral
                | Self::BooleanLiteral
                | Self::NullLiteral
                | Self::GuidLiteral
                | Self::DateLiteral
                | Self::TimeOfDayLiteral
                | Self::DateTimeOffsetLiteral
                | Self::DurationLiteral
                | Self::BinaryLiteral
                | Self::GeographyLiteral
                | Self::GeometryLiteral
        )
    }
}

/// One lexed token: kind, verbatim text, and 0-based start position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpressionToken<'a> {
    pub kind: ExpressionTokenKind,
    pub text: &'a str,
    pub position: usize,
}

/// Hand-written cursor lexer over the expression text
pub struct ExpressionLexer<'a> {
    text: &'a str,
    pos: usize,
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_identifier_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

impl<'a> ExpressionLexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn current_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn token(&self, kind: ExpressionTokenKind, start: usize) -> ExpressionToken<'a> {
        ExpressionToken {
            kind,
            text: &self.text[start..self.pos],
            position: start,
        }
    }

    /// Produce the next token, or an `End` token at end of input
    pub fn next_token(&mut self) -> Result<ExpressionToken<'a>> {
        self.skip_whitespace();
        let start = self.pos;
        let Some(ch) = self.current_char() else {
            return Ok(self.token(ExpressionTokenKind::End, start));
        };

        let kind = match ch {
            '(' => Some(ExpressionTokenKind::OpenParen),
            ')' => Some(ExpressionTokenKind::CloseParen),
            ',' => Some(ExpressionTokenKind::Comma),
            ':' => Some(ExpressionTokenKind::Colon),
            ';' => Some(ExpressionTokenKind::Semicolon),
            '=' => Some(ExpressionTokenKind::Equals),
            '/' => Some(ExpressionTokenKind::Slash),
            '.' => Some(ExpressionTokenKind::Dot),
            '*' => Some(ExpressionTokenKind::Star),
            '-' => Some(ExpressionTokenKind::Minus),
            _ => None,
        };
        if let Some(kind) = kind {
            self.advance();
            return Ok(self.token(kind, start));
        }

        if ch == '\'' {
            self.read_quoted(start)?;
            return Ok(self.token(ExpressionTokenKind::StringLiteral, start));
        }

        if ch.is_ascii_hexdigit() {
            if let Some(end) = self.match_guid(start) {
                self.pos = end;
                return Ok(self.token(ExpressionTokenKind::GuidLiteral, start));
            }
        }

        if ch.is_ascii_digit() {
            return self.read_digit_prefixed(start);
        }

        if is_identifier_start(ch) {
            return self.read_word(start);
        }

        Err(UriParseError::lexical_at(
            ODU0001,
            format!("Unrecognized character '{ch}' in '{}'", self.text),
            start,
        ))
    }

    /// Consume a single-quoted literal; doubled quotes escape
    fn read_quoted(&mut self, start: usize) -> Result<()> {
        self.advance(); // opening quote
        loop {
            match self.current_char() {
                Some('\'') => {
                    self.advance();
                    // A doubled quote stays inside the literal
                    if self.current_char() == Some('\'') {
                        self.advance();
                    } else {
                        return Ok(());
                    }
                }
                Some(_) => self.advance(),
                None => {
                    return Err(UriParseError::lexical_at(
                        ODU0002,
                        format!("Unterminated string literal in '{}'", self.text),
                        start,
                    ));
                }
            }
        }
    }

    /// Match a canonical hyphenated GUID (8-4-4-4-12 hex digits) at `start`
    fn match_guid(&self, start: usize) -> Option<usize> {
        let bytes = self.text.as_bytes();
        if start + 36 > bytes.len() {
            return None;
        }
        for (i, &b) in bytes[start..start + 36].iter().enumerate() {
            match i {
                8 | 13 | 18 | 23 => {
                    if b != b'-' {
                        return None;
                    }
                }
                _ => {
                    if !b.is_ascii_hexdigit() {
                        return None;
                    }
                }
            }
        }
        // Reject when the GUID shape is a prefix of something longer
        if bytes.get(start + 36).is_some_and(|b| b.is_ascii_alphanumeric()) {
            return None;
        }
        Some(start + 36)
    }

    fn digits(&self, mut at: usize, count: usize) -> Option<usize> {
        let bytes = self.text.as_bytes();
        for _ in 0..count {
            if !bytes.get(at).is_some_and(u8::is_ascii_digit) {
                return None;
            }
            at += 1;
        }
        Some(at)
    }

    fn digit_run(&self, at: usize) -> usize {
        let bytes = self.text.as_bytes();
        let mut end = at;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        end
    }

    fn byte_at(&self, at: usize) -> Option<u8> {
        self.text.as_bytes().get(at).copied()
    }

    /// Match `HH:MM:SS[.fraction]` at `start`; returns the end offset
    fn match_time(&self, start: usize) -> Option<usize> {
        let mut at = self.digits(start, 2)?;
        if self.byte_at(at) != Some(b':') {
            return None;
        }
        at = self.digits(at + 1, 2)?;
        if self.byte_at(at) != Some(b':') {
            return None;
        }
        at = self.digits(at + 1, 2)?;
        if self.byte_at(at) == Some(b'.') {
            let end = self.digit_run(at + 1);
            if end == at + 1 {
                return None;
            }
            at = end;
        }
        Some(at)
    }

    /// Match `YYYY-MM-DD` at `start`; returns the end offset
    fn match_date(&self, start: usize) -> Option<usize> {
        let mut at = self.digits(start, 4)?;
        if self.byte_at(at) != Some(b'-') {
            return None;
        }
        at = self.digits(at + 1, 2)?;
        if self.byte_at(at) != Some(b'-') {
            return None;
        }
        self.digits(at + 1, 2)
    }

    /// Match a zone offset (`Z` or `+HH:MM`/`-HH:MM`) at `start`
    fn match_zone_offset(&self, start: usize) -> Option<usize> {
        match self.byte_at(start) {
            Some(b'Z') => Some(start + 1),
            Some(b'+') | Some(b'-') => {
                let at = self.digits(start + 1, 2)?;
                if self.byte_at(at) != Some(b':') {
                    return None;
                }
                self.digits(at + 1, 2)
            }
            _ => None,
        }
    }

    /// Lex a token starting with a digit: date, date-time-offset,
    /// time-of-day, or a numeric literal
    fn read_digit_prefixed(&mut self, start: usize) -> Result<ExpressionToken<'a>> {
        if let Some(date_end) = self.match_date(start) {
            if self.byte_at(date_end) == Some(b'T') {
                if let Some(time_end) = self.match_time(date_end + 1) {
                    if let Some(zone_end) = self.match_zone_offset(time_end) {
                        self.pos = zone_end;
                        return Ok(self.token(ExpressionTokenKind::DateTimeOffsetLiteral, start));
                    }
                }
            }
            self.pos = date_end;
            return Ok(self.token(ExpressionTokenKind::DateLiteral, start));
        }

        if let Some(time_end) = self.match_time(start) {
            self.pos = time_end;
            return Ok(self.token(ExpressionTokenKind::TimeOfDayLiteral, start));
        }

        self.read_number(start)
    }

    fn read_number(&mut self, start: usize) -> Result<ExpressionToken<'a>> {
        let mut at = self.digit_run(start);
        let mut has_fraction = false;
        let mut has_exponent = false;

        if self.byte_at(at) == Some(b'.') && self.byte_at(at + 1).is_some_and(|b| b.is_ascii_digit())
        {
            has_fraction = true;
            at = self.digit_run(at + 1);
        }

        if matches!(self.byte_at(at), Some(b'e') | Some(b'E')) {
            let mut exp = at + 1;
            if matches!(self.byte_at(exp), Some(b'+') | Some(b'-')) {
                exp += 1;
            }
            let exp_end = self.digit_run(exp);
            if exp_end > exp {
                has_exponent = true;
                at = exp_end;
            }
        }

        let suffix = match self.byte_at(at) {
            Some(b @ (b'l' | b'L')) if !has_fraction && !has_exponent => {
                at += 1;
                Some(b)
            }
            Some(b @ (b'm' | b'M')) if !has_exponent => {
                at += 1;
                Some(b)
            }
            Some(b @ (b'd' | b'D' | b'f' | b'F')) => {
                at += 1;
                Some(b)
            }
            _ => None,
        };

        // Trailing identifier characters make the literal unrecognizable
        if let Some(next) = self.text[at..].chars().next() {
            if is_identifier_part(next) {
                return Err(UriParseError::lexical_at(
                    ODU0001,
                    format!("Unrecognized character '{next}' in '{}'", self.text),
                    at,
                ));
            }
        }

        self.pos = at;
        let kind = match suffix {
            Some(b'm' | b'M') => ExpressionTokenKind::DecimalLiteral,
            Some(b'd' | b'D') => ExpressionTokenKind::DoubleLiteral,
            Some(b'f' | b'F') => ExpressionTokenKind::SingleLiteral,
            Some(b'l' | b'L') => ExpressionTokenKind::IntegerLiteral,
            None if has_exponent => ExpressionTokenKind::DoubleLiteral,
            None if has_fraction => ExpressionTokenKind::DecimalLiteral,
            None => ExpressionTokenKind::IntegerLiteral,
            Some(_) => unreachable!(),
        };
        Ok(self.token(kind, start))
    }

    /// Lex an identifier, keyword literal, or prefixed quoted literal
    fn read_word(&mut self, start: usize) -> Result<ExpressionToken<'a>> {
        self.advance();
        while let Some(ch) = self.current_char() {
            if is_identifier_part(ch) {
                self.advance();
            } else {
                break;
            }
        }
        let word = &self.text[start..self.pos];

        // Type-prefixed quoted literals: duration'...', binary'...', ...
        if self.current_char() == Some('\'') {
            let kind = if word.eq_ignore_ascii_case("duration") {
                Some(ExpressionTokenKind::DurationLiteral)
            } else if word.eq_ignore_ascii_case("binary") {
                Some(ExpressionTokenKind::BinaryLiteral)
            } else if word.eq_ignore_ascii_case("geography") {
                Some(ExpressionTokenKind::GeographyLiteral)
            } else if word.eq_ignore_ascii_case("geometry") {
                Some(ExpressionTokenKind::GeometryLiteral)
            } else {
                None
            };
            if let Some(kind) = kind {
                self.read_quoted(self.pos)?;
                return Ok(self.token(kind, start));
            }
        }

        let kind = match word {
            "true" | "false" => ExpressionTokenKind::BooleanLiteral,
            "null" => ExpressionTokenKind::NullLiteral,
            "INF" | "NaN" => ExpressionTokenKind::DoubleLiteral,
            _ => ExpressionTokenKind::Identifier,
        };
        Ok(self.token(kind, start))
    }
}

/// Tokenize the whole text up front
///
/// The returned vector always ends with an `End` token whose position is
/// the text length.
pub fn tokenize(text: &str) -> Result<Vec<ExpressionToken<'_>>> {
    let mut lexer = ExpressionLexer::new(text);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == ExpressionTokenKind::End;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

/// A cursor over pre-lexed tokens with bounded lookahead
pub struct TokenStream<'a> {
    tokens: Vec<ExpressionToken<'a>>,
    index: usize,
}

impl<'a> TokenStream<'a> {
    pub fn new(tokens: Vec<ExpressionToken<'a>>) -> Self {
        debug_assert!(matches!(
            tokens.last(),
            Some(ExpressionToken {
                kind: ExpressionTokenKind::End,
                ..
            })
        ));
        Self { tokens, index: 0 }
    }

    /// The token under the cursor (the trailing `End` token once exhausted)
    pub fn current(&self) -> ExpressionToken<'a> {
        self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    /// Look ahead `n` tokens without moving the cursor
    pub fn peek(&self, n: usize) -> ExpressionToken<'a> {
        self.tokens[(self.index + n).min(self.tokens.len() - 1)]
    }

    /// Move past the current token
    pub fn advance(&mut self) {
        if self.index < self.tokens.len() - 1 {
            self.index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<ExpressionTokenKind> {
        tokenize(text).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_word_operators_lex_as_identifiers() {
        use ExpressionTokenKind::*;
        assert_eq!(
            kinds("Name eq 'Bob'"),
            vec![Identifier, Identifier, StringLiteral, End]
        );
    }

    #[test]
    fn test_punctuation_and_positions() {
        let tokens = tokenize("a(b,c)").unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(tokens[1].kind, ExpressionTokenKind::OpenParen);
        assert_eq!(tokens[3].kind, ExpressionTokenKind::Comma);
    }

    #[test]
    fn test_numeric_classification() {
        use ExpressionTokenKind::*;
        assert_eq!(kinds("42"), vec![IntegerLiteral, End]);
        assert_eq!(kinds("42L"), vec![IntegerLiteral, End]);
        assert_eq!(kinds("4.5"), vec![DecimalLiteral, End]);
        assert_eq!(kinds("4.5m"), vec![DecimalLiteral, End]);
        assert_eq!(kinds("4.5d"), vec![DoubleLiteral, End]);
        assert_eq!(kinds("4.5f"), vec![SingleLiteral, End]);
        assert_eq!(kinds("1e10"), vec![DoubleLiteral, End]);
        assert_eq!(kinds("INF"), vec![DoubleLiteral, End]);
    }

    #[test]
    fn test_temporal_and_guid_shapes() {
        use ExpressionTokenKind::*;
        assert_eq!(kinds("2012-07-28"), vec![DateLiteral, End]);
        assert_eq!(kinds("19:30:05.123"), vec![TimeOfDayLiteral, End]);
        assert_eq!(
            kinds("2012-07-28T19:30:05+05:30"),
            vec![DateTimeOffsetLiteral, End]
        );
        assert_eq!(
            kinds("38cf68c2-4010-4ccc-8922-868217f03ddc"),
            vec![GuidLiteral, End]
        );
    }

    #[test]
    fn test_prefixed_literals_keep_full_text() {
        let tokens = tokenize("duration'P1D'").unwrap();
        assert_eq!(tokens[0].kind, ExpressionTokenKind::DurationLiteral);
        assert_eq!(tokens[0].text, "duration'P1D'");

        let tokens = tokenize("geography'POINT(10 30)'").unwrap();
        assert_eq!(tokens[0].kind, ExpressionTokenKind::GeographyLiteral);
    }

    #[test]
    fn test_quoted_string_with_escape() {
        let tokens = tokenize("'O''Brien'").unwrap();
        assert_eq!(tokens[0].kind, ExpressionTokenKind::StringLiteral);
        assert_eq!(tokens[0].text, "'O''Brien'");
    }

    #[test]
    fn test_unterminated_string_is_lexical_error() {
        let err = tokenize("Name eq 'abc").unwrap_err();
        assert_eq!(err.code(), ODU0002);
        assert_eq!(err.location().map(|l| l.position), Some(8));
    }

    #[test]
    fn test_unrecognized_character_reports_position() {
        let err = tokenize("a # b").unwrap_err();
        assert_eq!(err.code(), ODU0001);
        assert_eq!(err.location().map(|l| l.position), Some(2));
    }

    #[test]
    fn test_dotted_identifier_lexes_as_parts() {
        use ExpressionTokenKind::*;
        assert_eq!(kinds("NS.Type"), vec![Identifier, Dot, Identifier, End]);
    }
}

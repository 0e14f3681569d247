//! Lenient CSV line parsing.
//!
//! Published sheet exports are simple enough that a single-line scanner is
//! all we need: fields are comma separated, may be wrapped in double quotes,
//! and a doubled quote inside a quoted field stands for one literal quote.
//! The scanner never fails. An unterminated quote just runs to the end of
//! the line.

/// Split one line into its fields.
///
/// An empty line yields a single empty field.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    fields.push(current);
    fields
}

/// Split a header line, stripping carriage returns and surrounding whitespace
/// from every column name.
pub fn parse_header(line: &str) -> Vec<String> {
    parse_line(line)
        .into_iter()
        .map(|field| field.replace('\r', "").trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquoted_line_is_plain_comma_split() {
        let line = "Alice,1990-06-15,alice@example.com";
        assert_eq!(parse_line(line), line.split(',').collect::<Vec<_>>());
    }

    #[test]
    fn test_quoted_field_keeps_comma() {
        assert_eq!(parse_line(r#""a,b",c"#), vec!["a,b", "c"]);
    }

    #[test]
    fn test_doubled_quote_is_escaped() {
        assert_eq!(parse_line(r#""a""b",c"#), vec!["a\"b", "c"]);
    }

    #[test]
    fn test_empty_line_is_single_empty_field() {
        assert_eq!(parse_line(""), vec![""]);
    }

    #[test]
    fn test_trailing_comma_yields_empty_last_field() {
        assert_eq!(parse_line("a,b,"), vec!["a", "b", ""]);
    }

    #[test]
    fn test_unterminated_quote_flushes_rest_of_line() {
        assert_eq!(parse_line(r#"x,"open, never closed"#), vec!["x", "open, never closed"]);
    }

    #[test]
    fn test_quotes_mid_field_toggle_without_emitting() {
        assert_eq!(parse_line(r#"ab"c,d"e,f"#), vec!["abc,de", "f"]);
    }

    #[test]
    fn test_header_strips_carriage_returns_and_whitespace() {
        assert_eq!(
            parse_header(" Name , Birthday\r"),
            vec!["Name".to_string(), "Birthday".to_string()]
        );
    }

    #[test]
    fn test_header_keeps_quoted_names() {
        assert_eq!(parse_header(r#""Name","Birthday""#), vec!["Name", "Birthday"]);
    }
}

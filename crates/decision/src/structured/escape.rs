//! Backslash escape decoding for generated text.
//!
//! Models often write `\n` or `\t` literally inside an answer. These are
//! resolved to the characters they stand for. Escapes that are malformed or
//! unknown are kept as written.

/// Resolve backslash escapes in `raw`.
///
/// Supported: `\\ \' \" \a \b \f \n \r \t \v`, a backslash before a line
/// break (both removed), octal `\o`..`\ooo`, `\xHH`, `\uXXXX` and
/// `\UXXXXXXXX`.
pub fn decode_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(&next) = chars.peek() else {
            out.push('\\');
            break;
        };

        let simple = match next {
            '\\' => Some('\\'),
            '\'' => Some('\''),
            '"' => Some('"'),
            'a' => Some('\u{07}'),
            'b' => Some('\u{08}'),
            'f' => Some('\u{0C}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'v' => Some('\u{0B}'),
            _ => None,
        };
        if let Some(decoded) = simple {
            chars.next();
            out.push(decoded);
            continue;
        }

        match next {
            '\n' => {
                chars.next();
            }
            '0'..='7' => {
                let mut value = 0u32;
                let mut digits = 0;
                while digits < 3 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            digits += 1;
                            chars.next();
                        }
                        None => break,
                    }
                }
                // At most 0o777, always a valid scalar value.
                out.extend(char::from_u32(value));
            }
            'x' | 'u' | 'U' => {
                let width = match next {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = chars.clone().skip(1).take(width).collect();
                let decoded = (digits.len() == width && digits.chars().all(|d| d.is_ascii_hexdigit()))
                    .then(|| u32::from_str_radix(&digits, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                match decoded {
                    Some(ch) => {
                        for _ in 0..=width {
                            chars.next();
                        }
                        out.push(ch);
                    }
                    None => out.push('\\'),
                }
            }
            _ => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_escapes() {
        assert_eq!(decode_escapes(r"line one\nline two"), "line one\nline two");
        assert_eq!(decode_escapes(r"a\tb\\c"), "a\tb\\c");
        assert_eq!(decode_escapes(r#"say \"hi\" it\'s"#), "say \"hi\" it's");
    }

    #[test]
    fn numeric_escapes() {
        assert_eq!(decode_escapes(r"\x41\101\u00e9\U0001F600"), "AAé😀");
        assert_eq!(decode_escapes(r"\0"), "\0");
    }

    #[test]
    fn unknown_and_malformed_kept() {
        assert_eq!(decode_escapes(r"C:\path\q"), r"C:\path\q");
        assert_eq!(decode_escapes(r"\xZZ"), r"\xZZ");
        assert_eq!(decode_escapes(r"\u12"), r"\u12");
        assert_eq!(decode_escapes("trailing\\"), "trailing\\");
    }

    #[test]
    fn line_continuation_removed() {
        assert_eq!(decode_escapes("one \\\ntwo"), "one two");
    }

    #[test]
    fn plain_text_untouched() {
        assert_eq!(decode_escapes("Zürich, 12°C"), "Zürich, 12°C");
    }
}

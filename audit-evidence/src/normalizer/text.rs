//! Small string helpers shared by both parsing stages and by the report.

/// Human-readable file name: every literal `%20` becomes a space.
///
/// Only `%20` is special-cased; other percent sequences (`%2F`, `%28`, ...)
/// are left untouched.
pub fn decode_file_name(name: &str) -> String {
    name.replace("%20", " ")
}

/// Undoes JSON-style escapes in a regex-extracted string value.
///
/// Handles `\n`, `\t`, `\r`, `\"`, `\\` and `\/`; any other escape is kept
/// verbatim (backslash included).
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_space_sequences_are_decoded() {
        assert_eq!(decode_file_name("backup%20policy%20v2.pdf"), "backup policy v2.pdf");
        assert_eq!(decode_file_name("a%2Fb%20c.pdf"), "a%2Fb c.pdf");
        assert_eq!(decode_file_name("plain.pdf"), "plain.pdf");
    }

    #[test]
    fn unescape_known_and_unknown_sequences() {
        assert_eq!(unescape(r#"line1\nline2\tx \"q\" \\ a\/b"#), "line1\nline2\tx \"q\" \\ a/b");
        assert_eq!(unescape(r"\u00e9"), r"\u00e9");
        assert_eq!(unescape("trailing\\"), "trailing\\");
    }
}

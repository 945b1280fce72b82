//! Embedded action scanning
//!
//!     Actions are target-language code inside `{ ... }`. The lexer does not
//!     understand that code, but it has to find the matching `}` and it has to
//!     keep string literals, character literals and comments in one piece so a
//!     brace or a quote inside them is not mistaken for structure.
//!
//!     Inside an action, everything else is split into one piece per character.
//!     This keeps the formatter able to break lines after `;` and `@` while
//!     copying the rest of the code verbatim.
use std::ops::Range;

/// Scans the body of a braced block. `rest` starts right after the opening `{`.
///
/// Returns the length of the body including the closing `}`, and whether the
/// closing brace was found. Unterminated blocks extend to the end of `rest`.
pub fn braced_len(rest: &str) -> (usize, bool) {
    let bytes = rest.as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\'' | b'"' => i = quoted_end(bytes, i),
            b'/' if opens_comment(bytes, i) => i = comment_end(bytes, i),
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth -= 1;
                i += 1;
                if depth == 0 {
                    return (i, true);
                }
            }
            _ => i += 1,
        }
    }
    (bytes.len(), false)
}

/// Splits an action body (the text between the braces) into pieces.
pub fn action_pieces(body: &str) -> Vec<Range<usize>> {
    let bytes = body.as_bytes();
    let mut pieces = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let end = match bytes[i] {
            b'\\' => char_end(body, i + 1),
            b'\'' | b'"' => quoted_end(bytes, i),
            b'/' if opens_comment(bytes, i) => comment_end(bytes, i),
            _ => char_end(body, i),
        };
        let end = end.min(bytes.len()).max(i + 1);
        pieces.push(i..end);
        i = end;
    }
    pieces
}

/// End of the character starting at `at`, or `at` itself past the end.
fn char_end(text: &str, at: usize) -> usize {
    text.get(at..)
        .and_then(|rest| rest.chars().next())
        .map_or(at, |c| at + c.len_utf8())
}

fn opens_comment(bytes: &[u8], at: usize) -> bool {
    matches!(bytes.get(at + 1), Some(b'/') | Some(b'*'))
}

/// End of a quoted literal starting at `start`. A quote that is not closed on
/// the same line stands for itself.
fn quoted_end(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'\n' | b'\r' => return start + 1,
            c if c == quote => return j + 1,
            _ => j += 1,
        }
    }
    start + 1
}

/// End of a comment starting at `start`. Line comments stop before the newline.
fn comment_end(bytes: &[u8], start: usize) -> usize {
    if bytes[start + 1] == b'/' {
        bytes[start..]
            .iter()
            .position(|&b| b == b'\n' || b == b'\r')
            .map_or(bytes.len(), |offset| start + offset)
    } else {
        bytes[start + 2..]
            .windows(2)
            .position(|w| w == b"*/")
            .map_or(bytes.len(), |offset| start + 2 + offset + 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(body: &str) -> Vec<&str> {
        action_pieces(body)
            .into_iter()
            .map(|range| &body[range])
            .collect()
    }

    #[test]
    fn test_braced_len_balances_nested_braces() {
        assert_eq!(braced_len(" a { b } }tail"), (10, true));
        assert_eq!(braced_len("}"), (1, true));
    }

    #[test]
    fn test_braced_len_ignores_braces_in_literals_and_comments() {
        let rest = r#" s = "}"; c = '{'; // }
 /* } */ }"#;
        assert_eq!(braced_len(rest), (rest.len(), true));
    }

    #[test]
    fn test_braced_len_unterminated() {
        assert_eq!(braced_len(" a { b }"), (8, false));
    }

    #[test]
    fn test_pieces_split_per_character() {
        assert_eq!(split("a;b"), vec!["a", ";", "b"]);
        assert_eq!(split(" é"), vec![" ", "é"]);
    }

    #[test]
    fn test_pieces_keep_literals_whole() {
        assert_eq!(
            split(r#"x="a;b";'c'"#),
            vec!["x", "=", "\"a;b\"", ";", "'c'"]
        );
    }

    #[test]
    fn test_pieces_keep_comments_whole() {
        assert_eq!(
            split("a;// c;d\n/* e; */"),
            vec!["a", ";", "// c;d", "\n", "/* e; */"]
        );
    }

    #[test]
    fn test_pieces_keep_escapes_whole() {
        assert_eq!(split(r"\{x"), vec![r"\{", "x"]);
    }

    #[test]
    fn test_dangling_quote_stands_alone() {
        assert_eq!(split("don't\n"), vec!["d", "o", "n", "'", "t", "\n"]);
    }
}

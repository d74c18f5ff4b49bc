//! `{name}` placeholder scanning for fixed template text.
//!
//! Grammar: `{ident}` is a placeholder, `{{` and `}}` are literal braces,
//! anything else is copied verbatim. `ident` is one or more ASCII
//! alphanumerics or underscores.

use super::error::TemplateError;

/// A lexical piece of template text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Piece<'a> {
    Literal(&'a str),
    Brace(char),
    Placeholder(&'a str),
}

/// Split `text` into literal runs and placeholders.
pub(crate) fn scan(text: &str) -> Result<Vec<Piece<'_>>, TemplateError> {
    let mut pieces = Vec::new();
    let bytes = text.as_bytes();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => {
                push_literal(&mut pieces, &text[literal_start..i]);
                pieces.push(Piece::Brace('{'));
                i += 2;
                literal_start = i;
            }
            b'}' if bytes.get(i + 1) == Some(&b'}') => {
                push_literal(&mut pieces, &text[literal_start..i]);
                pieces.push(Piece::Brace('}'));
                i += 2;
                literal_start = i;
            }
            b'{' => {
                push_literal(&mut pieces, &text[literal_start..i]);
                let close = text[i + 1..]
                    .find('}')
                    .map(|offset| i + 1 + offset)
                    .ok_or(TemplateError::Syntax {
                        position: i,
                        reason: "unterminated placeholder",
                    })?;
                let name = &text[i + 1..close];
                if name.is_empty() {
                    return Err(TemplateError::Syntax {
                        position: i,
                        reason: "empty placeholder name",
                    });
                }
                if !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
                    return Err(TemplateError::Syntax {
                        position: i,
                        reason: "placeholder names may only contain letters, digits and '_'",
                    });
                }
                pieces.push(Piece::Placeholder(name));
                i = close + 1;
                literal_start = i;
            }
            b'}' => {
                return Err(TemplateError::Syntax {
                    position: i,
                    reason: "unmatched '}'",
                });
            }
            _ => i += 1,
        }
    }
    push_literal(&mut pieces, &text[literal_start..]);

    Ok(pieces)
}

fn push_literal<'a>(pieces: &mut Vec<Piece<'a>>, s: &'a str) {
    if !s.is_empty() {
        pieces.push(Piece::Literal(s));
    }
}

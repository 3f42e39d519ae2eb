//! Template-list finder: the pre-pass that decides whether a `<` starts a
//! template argument list (a generic type or constructor) or is a plain
//! relational operator.
//!
//! WGSL reuses `<`/`>` for both roles, exactly like C++ templates, and
//! shares the same `>>` ambiguity: `array<vec2<f32>>` must close two
//! template lists with one shift-right token. This scans the already-lexed
//! token slice looking for a matching close, treating a `ShiftRight` token
//! as closing two nesting levels at once, and bails out (reporting no
//! match, so the caller falls back to relational-operator parsing) at any
//! token that could not plausibly appear inside a template argument list.

use wgsl_lexer::TokenKind;

/// `tokens[open_idx]` must be a `<`. Returns the index of the matching
/// close (a `>`, or a `>>` that closes this level along with one more) if
/// one is found before a statement boundary.
#[must_use]
pub fn find_matching_angle(tokens: &[wgsl_lexer::Token], open_idx: usize) -> Option<usize> {
    let mut depth: i32 = 1;
    let mut i = open_idx + 1;
    while i < tokens.len() {
        match tokens[i].kind {
            TokenKind::Lt => depth += 1,
            TokenKind::Gt => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            TokenKind::ShiftRight => {
                if depth < 2 {
                    return None;
                }
                depth -= 2;
                if depth == 0 {
                    return Some(i);
                }
            }
            TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace | TokenKind::Eof => return None,
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgsl_lexer::Lexer;

    fn lex(src: &str) -> Vec<wgsl_lexer::Token> {
        Lexer::new(src).tokenize().tokens
    }

    #[test]
    fn finds_simple_template_close() {
        let tokens = lex("vec2<f32>(1.0)");
        // index 1 is `<`
        assert_eq!(tokens[1].kind, TokenKind::Lt);
        let close = find_matching_angle(&tokens, 1).unwrap();
        assert_eq!(tokens[close].kind, TokenKind::Gt);
    }

    #[test]
    fn closes_nested_templates_on_shift_right() {
        let tokens = lex("array<vec2<f32>>");
        let close = find_matching_angle(&tokens, 1).unwrap();
        assert_eq!(tokens[close].kind, TokenKind::ShiftRight);
    }

    #[test]
    fn comparison_has_no_matching_close() {
        let tokens = lex("a < b ;");
        assert!(find_matching_angle(&tokens, 1).is_none());
    }
}

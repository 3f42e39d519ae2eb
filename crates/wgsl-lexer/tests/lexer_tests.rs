use wgsl_lexer::{Lexer, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::new(source).tokenize().tokens.into_iter().map(|t| t.kind).collect()
}

#[test]
fn keywords_are_distinguished_from_identifiers() {
    let output = Lexer::new("fn foo").tokenize();
    assert!(output.errors.is_empty());
    assert_eq!(output.tokens[0].kind, TokenKind::Keyword);
    assert_eq!(output.tokens[1].kind, TokenKind::Ident);
}

#[test]
fn multi_char_operators_are_not_split() {
    let ks = kinds("a -> b << c >>= d");
    assert!(ks.contains(&TokenKind::Arrow));
    assert!(ks.contains(&TokenKind::ShiftLeft));
    assert!(ks.contains(&TokenKind::ShiftRightEq));
}

#[test]
fn line_comments_and_block_comments_are_skipped() {
    let output = Lexer::new("// a comment\nfn /* inline */ main() {}").tokenize();
    assert!(output.errors.is_empty());
    assert_eq!(output.tokens[0].kind, TokenKind::Keyword);
}

#[test]
fn unterminated_block_comment_is_reported_but_lexing_continues() {
    let output = Lexer::new("fn main() {} /* never closed").tokenize();
    assert!(!output.errors.is_empty());
    assert_eq!(output.tokens.last().unwrap().kind, TokenKind::Eof);
}

#[test]
fn token_text_slices_match_source() {
    let source = "let value = 42;";
    let output = Lexer::new(source).tokenize();
    let ident = output.tokens.iter().find(|t| t.kind == TokenKind::Ident).unwrap();
    assert_eq!(ident.text(source), "value");
}

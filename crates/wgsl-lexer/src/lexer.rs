//! Byte stream -> token stream.
//!
//! The lexer never panics on malformed input; it records a [`Diagnostic`]
//! for unterminated literals and unknown characters and keeps scanning so a
//! caller gets every lex error in one pass, not just the first.

use wgsl_common::position::{LineMap, Position};
use wgsl_common::reserved;
use wgsl_common::{Diagnostic, Span};

use crate::token::{LiteralKind, Token, TokenKind};

pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub errors: Vec<Diagnostic>,
}

pub struct Lexer<'a> {
    source: &'a [u8],
    text: &'a str,
    pos: usize,
    line_map: LineMap,
    errors: Vec<Diagnostic>,
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Lexer {
            source: text.as_bytes(),
            text,
            pos: 0,
            line_map: LineMap::build(text),
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn tokenize(mut self) -> LexOutput {
        let span = tracing::debug_span!("lex");
        let _enter = span.enter();
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let start = self.pos;
            if self.pos >= self.source.len() {
                tokens.push(Token::new(TokenKind::Eof, Span::at(start as u32)));
                break;
            }
            match self.next_token(start) {
                Some(tok) => tokens.push(tok),
                None => continue,
            }
        }
        tracing::debug!(token_count = tokens.len(), error_count = self.errors.len(), "lex complete");
        LexOutput { tokens, errors: self.errors }
    }

    fn position_at(&self, offset: usize) -> Position {
        self.line_map.offset_to_position(offset as u32, self.text)
    }

    fn byte(&self, at: usize) -> Option<u8> {
        self.source.get(at).copied()
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.byte(self.pos) {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'/') if self.byte(self.pos + 1) == Some(b'/') => {
                    match memchr::memchr(b'\n', &self.source[self.pos..]) {
                        Some(rel) => self.pos += rel,
                        None => self.pos = self.source.len(),
                    }
                }
                Some(b'/') if self.byte(self.pos + 1) == Some(b'*') => {
                    self.skip_block_comment();
                }
                _ => break,
            }
        }
    }

    fn skip_block_comment(&mut self) {
        let start = self.pos;
        self.pos += 2;
        let mut depth = 1u32;
        while depth > 0 {
            match (self.byte(self.pos), self.byte(self.pos + 1)) {
                (Some(b'/'), Some(b'*')) => {
                    depth += 1;
                    self.pos += 2;
                }
                (Some(b'*'), Some(b'/')) => {
                    depth -= 1;
                    self.pos += 2;
                }
                (Some(_), _) => self.pos += 1,
                (None, _) => {
                    self.errors.push(
                        Diagnostic::error("unterminated block comment", self.position_at(start))
                            .with_span(Span::new(start as u32, self.pos as u32)),
                    );
                    return;
                }
            }
        }
    }

    fn next_token(&mut self, start: usize) -> Option<Token> {
        let b = self.byte(start)?;

        if is_ident_start(b) {
            return Some(self.lex_ident_or_keyword(start));
        }
        if b.is_ascii_digit() || (b == b'.' && self.byte(start + 1).is_some_and(|n| n.is_ascii_digit())) {
            return Some(self.lex_number(start));
        }

        self.pos = start + 1;
        let kind = match b {
            b'@' => TokenKind::At,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'~' => TokenKind::Tilde,
            b':' => {
                if self.byte(self.pos) == Some(b':') {
                    self.pos += 1;
                    TokenKind::ColonColon
                } else {
                    TokenKind::Colon
                }
            }
            b'.' => TokenKind::Dot,
            b'+' => match self.byte(self.pos) {
                Some(b'+') => {
                    self.pos += 1;
                    TokenKind::PlusPlus
                }
                Some(b'=') => {
                    self.pos += 1;
                    TokenKind::PlusEq
                }
                _ => TokenKind::Plus,
            },
            b'-' => match self.byte(self.pos) {
                Some(b'-') => {
                    self.pos += 1;
                    TokenKind::MinusMinus
                }
                Some(b'=') => {
                    self.pos += 1;
                    TokenKind::MinusEq
                }
                Some(b'>') => {
                    self.pos += 1;
                    TokenKind::Arrow
                }
                _ => TokenKind::Minus,
            },
            b'*' => match self.byte(self.pos) {
                Some(b'=') => {
                    self.pos += 1;
                    TokenKind::StarEq
                }
                _ => TokenKind::Star,
            },
            b'/' => match self.byte(self.pos) {
                Some(b'=') => {
                    self.pos += 1;
                    TokenKind::SlashEq
                }
                _ => TokenKind::Slash,
            },
            b'%' => match self.byte(self.pos) {
                Some(b'=') => {
                    self.pos += 1;
                    TokenKind::PercentEq
                }
                _ => TokenKind::Percent,
            },
            b'&' => match self.byte(self.pos) {
                Some(b'&') => {
                    self.pos += 1;
                    TokenKind::AmpAmp
                }
                Some(b'=') => {
                    self.pos += 1;
                    TokenKind::AmpEq
                }
                _ => TokenKind::Amp,
            },
            b'|' => match self.byte(self.pos) {
                Some(b'|') => {
                    self.pos += 1;
                    TokenKind::PipePipe
                }
                Some(b'=') => {
                    self.pos += 1;
                    TokenKind::PipeEq
                }
                _ => TokenKind::Pipe,
            },
            b'^' => match self.byte(self.pos) {
                Some(b'=') => {
                    self.pos += 1;
                    TokenKind::CaretEq
                }
                _ => TokenKind::Caret,
            },
            b'!' => match self.byte(self.pos) {
                Some(b'=') => {
                    self.pos += 1;
                    TokenKind::BangEq
                }
                _ => TokenKind::Bang,
            },
            b'=' => match self.byte(self.pos) {
                Some(b'=') => {
                    self.pos += 1;
                    TokenKind::EqEq
                }
                _ => TokenKind::Eq,
            },
            // `<` and `>` are emitted as plain comparison/shift tokens here;
            // the parser's template-list pre-pass decides when a `<`/`>`
            // pair is instead a template delimiter.
            b'<' => match self.byte(self.pos) {
                Some(b'<') => {
                    self.pos += 1;
                    if self.byte(self.pos) == Some(b'=') {
                        self.pos += 1;
                        TokenKind::ShiftLeftEq
                    } else {
                        TokenKind::ShiftLeft
                    }
                }
                Some(b'=') => {
                    self.pos += 1;
                    TokenKind::LtEq
                }
                _ => TokenKind::Lt,
            },
            b'>' => match self.byte(self.pos) {
                Some(b'>') => {
                    self.pos += 1;
                    if self.byte(self.pos) == Some(b'=') {
                        self.pos += 1;
                        TokenKind::ShiftRightEq
                    } else {
                        TokenKind::ShiftRight
                    }
                }
                Some(b'=') => {
                    self.pos += 1;
                    TokenKind::GtEq
                }
                _ => TokenKind::Gt,
            },
            _ => {
                self.errors.push(
                    Diagnostic::error(
                        format!("unknown character {:?}", b as char),
                        self.position_at(start),
                    )
                    .with_span(Span::new(start as u32, self.pos as u32)),
                );
                return None;
            }
        };
        Some(Token::new(kind, Span::new(start as u32, self.pos as u32)))
    }

    fn lex_ident_or_keyword(&mut self, start: usize) -> Token {
        self.pos = start + 1;
        while let Some(b) = self.byte(self.pos) {
            if is_ident_continue(b) {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = &self.text[start..self.pos];
        let span = Span::new(start as u32, self.pos as u32);
        if text == "_" {
            return Token::new(TokenKind::Underscore, span);
        }
        if text == "true" || text == "false" {
            return Token::new(TokenKind::Literal(LiteralKind::Bool), span);
        }
        if reserved::is_keyword(text) {
            return Token::new(TokenKind::Keyword, span);
        }
        Token::new(TokenKind::Ident, span)
    }

    fn lex_number(&mut self, start: usize) -> Token {
        self.pos = start;
        let is_hex = self.byte(self.pos) == Some(b'0')
            && matches!(self.byte(self.pos + 1), Some(b'x') | Some(b'X'));

        let mut is_float = false;
        if is_hex {
            self.pos += 2;
            while self.byte(self.pos).is_some_and(|b| b.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            if self.byte(self.pos) == Some(b'.') {
                is_float = true;
                self.pos += 1;
                while self.byte(self.pos).is_some_and(|b| b.is_ascii_hexdigit()) {
                    self.pos += 1;
                }
            }
            if matches!(self.byte(self.pos), Some(b'p') | Some(b'P')) {
                is_float = true;
                self.pos += 1;
                if matches!(self.byte(self.pos), Some(b'+') | Some(b'-')) {
                    self.pos += 1;
                }
                while self.byte(self.pos).is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
        } else {
            while self.byte(self.pos).is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
            }
            if self.byte(self.pos) == Some(b'.') {
                is_float = true;
                self.pos += 1;
                while self.byte(self.pos).is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
            if matches!(self.byte(self.pos), Some(b'e') | Some(b'E')) {
                is_float = true;
                self.pos += 1;
                if matches!(self.byte(self.pos), Some(b'+') | Some(b'-')) {
                    self.pos += 1;
                }
                while self.byte(self.pos).is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
        }

        match self.byte(self.pos) {
            Some(b'f') | Some(b'h') => {
                is_float = true;
                self.pos += 1;
            }
            Some(b'i') | Some(b'u') if !is_float => {
                self.pos += 1;
            }
            _ => {}
        }

        let kind = if is_float { LiteralKind::Float } else { LiteralKind::Int };
        Token::new(TokenKind::Literal(kind), Span::new(start as u32, self.pos as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).tokenize().tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_identifiers_and_keywords() {
        let ks = kinds("fn getValue");
        assert_eq!(ks, vec![TokenKind::Keyword, TokenKind::Ident, TokenKind::Eof]);
    }

    #[test]
    fn lexes_integer_with_suffix() {
        let out = Lexer::new("42i").tokenize();
        assert_eq!(out.tokens[0].kind, TokenKind::Literal(LiteralKind::Int));
        assert_eq!(out.tokens[0].text("42i"), "42i");
    }

    #[test]
    fn lexes_float_and_hex_float() {
        let out = Lexer::new("1.0f 0x1p3").tokenize();
        assert_eq!(out.tokens[0].kind, TokenKind::Literal(LiteralKind::Float));
        assert_eq!(out.tokens[1].kind, TokenKind::Literal(LiteralKind::Float));
    }

    #[test]
    fn skips_line_and_nested_block_comments() {
        let ks = kinds("// a comment\n/* outer /* inner */ still */ x");
        assert_eq!(ks, vec![TokenKind::Ident, TokenKind::Eof]);
    }

    #[test]
    fn disambiguates_shift_vs_angle_brackets() {
        assert_eq!(kinds("a<b"), vec![TokenKind::Ident, TokenKind::Lt, TokenKind::Ident, TokenKind::Eof]);
        assert_eq!(kinds("a<<b"), vec![TokenKind::Ident, TokenKind::ShiftLeft, TokenKind::Ident, TokenKind::Eof]);
        assert_eq!(kinds("array<f32>"), vec![
            TokenKind::Ident,
            TokenKind::Lt,
            TokenKind::Ident,
            TokenKind::Gt,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        let out = Lexer::new("/* never closed").tokenize();
        assert_eq!(out.errors.len(), 1);
    }

    #[test]
    fn unknown_character_is_an_error_and_does_not_stop_the_scan() {
        let out = Lexer::new("let x = 1 ` let y = 2").tokenize();
        assert_eq!(out.errors.len(), 1);
        assert!(out.tokens.len() > 5);
    }

    #[test]
    fn underscore_is_its_own_token_kind() {
        assert_eq!(kinds("_"), vec![TokenKind::Underscore, TokenKind::Eof]);
    }
}

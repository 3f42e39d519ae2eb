//! Type parsing, including the templated spellings (`vec2<f32>`,
//! `array<T, N>`, `ptr<storage, T, read>`, `texture_2d<f32>`, ...).

use wgsl_common::Span;
use wgsl_lexer::TokenKind;

use crate::ast::{AccessMode, AddressSpace, ScalarKind, TextureKind, Type};
use crate::parser::Parser;
use crate::reference::Ref;

pub(crate) fn vector_size_from_shorthand(name: &str) -> Option<u8> {
    match name {
        "vec2" | "vec2i" | "vec2u" | "vec2f" | "vec2h" => Some(2),
        "vec3" | "vec3i" | "vec3u" | "vec3f" | "vec3h" => Some(3),
        "vec4" | "vec4i" | "vec4u" | "vec4f" | "vec4h" => Some(4),
        _ => None,
    }
}

pub(crate) fn scalar_suffix_kind(name: &str) -> Option<ScalarKind> {
    match name.chars().last()? {
        'i' => Some(ScalarKind::I32),
        'u' => Some(ScalarKind::U32),
        'f' => Some(ScalarKind::F32),
        'h' => Some(ScalarKind::F16),
        _ => None,
    }
}

pub(crate) fn matrix_dims_from_shorthand(name: &str) -> Option<(u8, u8)> {
    let stripped = name.strip_prefix("mat")?;
    let core = stripped.trim_end_matches(['f', 'h']);
    let (c, r) = core.split_once('x')?;
    Some((c.parse().ok()?, r.parse().ok()?))
}

impl<'a> Parser<'a> {
    pub(crate) fn parse_access_mode(&mut self) -> Option<AccessMode> {
        match self.current_text() {
            "read" => {
                self.bump();
                Some(AccessMode::Read)
            }
            "write" => {
                self.bump();
                Some(AccessMode::Write)
            }
            "read_write" => {
                self.bump();
                Some(AccessMode::ReadWrite)
            }
            _ => None,
        }
    }

    pub(crate) fn parse_address_space(&mut self) -> Option<AddressSpace> {
        let space = match self.current_text() {
            "function" => AddressSpace::Function,
            "private" => AddressSpace::Private,
            "workgroup" => AddressSpace::Workgroup,
            "uniform" => AddressSpace::Uniform,
            "storage" => AddressSpace::Storage,
            "handle" => AddressSpace::Handle,
            _ => return None,
        };
        self.bump();
        Some(space)
    }

    pub(crate) fn parse_type(&mut self) -> Type {
        let start = self.current_span().start;
        if !matches!(self.current_kind(), TokenKind::Ident | TokenKind::Keyword) {
            self.error_here("expected a type");
            return Type::Ident { name: String::new(), ref_: Ref::INVALID, span: self.current_span() };
        }
        let name = self.current_text().to_string();

        if let Some(kind) = match name.as_str() {
            "bool" => Some(ScalarKind::Bool),
            "i32" => Some(ScalarKind::I32),
            "u32" => Some(ScalarKind::U32),
            "f32" => Some(ScalarKind::F32),
            "f16" => Some(ScalarKind::F16),
            _ => None,
        } {
            self.bump();
            return Type::Scalar { kind, span: Span::new(start, self.prev_end()) };
        }

        if name == "atomic" {
            self.bump();
            self.expect(TokenKind::Lt, "'<'");
            let element = Box::new(self.parse_type());
            self.expect(TokenKind::Gt, "'>'");
            return Type::Atomic { element, span: Span::new(start, self.prev_end()) };
        }

        if name == "ptr" {
            self.bump();
            self.expect(TokenKind::Lt, "'<'");
            let address_space = self.parse_address_space().unwrap_or(AddressSpace::Function);
            self.expect(TokenKind::Comma, "','");
            let element = Box::new(self.parse_type());
            let access_mode = if self.eat(TokenKind::Comma) { self.parse_access_mode() } else { None };
            self.close_angle();
            return Type::Pointer { address_space, element, access_mode, span: Span::new(start, self.prev_end()) };
        }

        if name == "array" {
            self.bump();
            if self.eat(TokenKind::Lt) {
                let element = Box::new(self.parse_type());
                let size = if self.eat(TokenKind::Comma) { Some(Box::new(self.parse_expr())) } else { None };
                self.close_angle();
                return Type::Array { element, size, span: Span::new(start, self.prev_end()) };
            }
            return Type::Ident { name, ref_: Ref::INVALID, span: Span::new(start, self.prev_end()) };
        }

        if name == "sampler" {
            self.bump();
            return Type::Sampler { comparison: false, span: Span::new(start, self.prev_end()) };
        }
        if name == "sampler_comparison" {
            self.bump();
            return Type::Sampler { comparison: true, span: Span::new(start, self.prev_end()) };
        }

        if let Some((kind, dim)) = texture_kind(&name) {
            self.bump();
            let mut sampled_type = None;
            let mut texel_format = None;
            let mut access_mode = None;
            if self.eat(TokenKind::Lt) {
                match kind {
                    TextureKind::Storage => {
                        texel_format = self.expect_ident("a texel format").map(|(n, _)| n);
                        if self.eat(TokenKind::Comma) {
                            access_mode = self.parse_access_mode();
                        }
                    }
                    _ => {
                        sampled_type = Some(Box::new(self.parse_type()));
                    }
                }
                self.close_angle();
            }
            return Type::Texture {
                kind,
                dimension: dim.to_string(),
                sampled_type,
                texel_format,
                access_mode,
                span: Span::new(start, self.prev_end()),
            };
        }

        if let Some(size) = vector_size_from_shorthand(&name) {
            self.bump();
            if let Some(scalar) = scalar_suffix_kind(&name) {
                return Type::Vector {
                    size,
                    element: Box::new(Type::Scalar { kind: scalar, span: Span::new(start, self.prev_end()) }),
                    shorthand: Some(name),
                    span: Span::new(start, self.prev_end()),
                };
            }
            self.expect(TokenKind::Lt, "'<'");
            let element = Box::new(self.parse_type());
            self.close_angle();
            return Type::Vector { size, element, shorthand: None, span: Span::new(start, self.prev_end()) };
        }

        if let Some((cols, rows)) = matrix_dims_from_shorthand(&name) {
            self.bump();
            if let Some(scalar) = scalar_suffix_kind(&name) {
                return Type::Matrix {
                    cols,
                    rows,
                    element: Box::new(Type::Scalar { kind: scalar, span: Span::new(start, self.prev_end()) }),
                    shorthand: Some(name),
                    span: Span::new(start, self.prev_end()),
                };
            }
            self.expect(TokenKind::Lt, "'<'");
            let element = Box::new(self.parse_type());
            self.close_angle();
            return Type::Matrix { cols, rows, element, shorthand: None, span: Span::new(start, self.prev_end()) };
        }

        // Anything else is a reference to a user struct or alias, resolved
        // by wgsl-resolve's use pass.
        self.bump();
        Type::Ident { name, ref_: Ref::INVALID, span: Span::new(start, self.prev_end()) }
    }

    /// Closes one level of a template argument list. A `>>` token closes
    /// two nested levels at once (`array<vec2<f32>>`); the first call
    /// consumes the token and leaves a pending virtual close for the
    /// enclosing level to consume without advancing the cursor again.
    fn close_angle(&mut self) {
        if self.pending_close > 0 {
            self.pending_close -= 1;
            return;
        }
        if self.eat(TokenKind::Gt) {
            return;
        }
        if self.eat(TokenKind::ShiftRight) {
            self.pending_close = 1;
            return;
        }
        self.error_here("expected '>'");
    }

    pub(crate) fn prev_end(&self) -> u32 {
        self.tokens[self.idx.saturating_sub(1)].span.end
    }
}

fn texture_kind(name: &str) -> Option<(TextureKind, &'static str)> {
    Some(match name {
        "texture_1d" => (TextureKind::Sampled, "1d"),
        "texture_2d" => (TextureKind::Sampled, "2d"),
        "texture_2d_array" => (TextureKind::Sampled, "2d_array"),
        "texture_3d" => (TextureKind::Sampled, "3d"),
        "texture_cube" => (TextureKind::Sampled, "cube"),
        "texture_cube_array" => (TextureKind::Sampled, "cube_array"),
        "texture_multisampled_2d" => (TextureKind::Multisampled, "2d"),
        "texture_depth_multisampled_2d" => (TextureKind::DepthMultisampled, "2d"),
        "texture_depth_2d" => (TextureKind::Depth, "2d"),
        "texture_depth_2d_array" => (TextureKind::Depth, "2d_array"),
        "texture_depth_cube" => (TextureKind::Depth, "cube"),
        "texture_depth_cube_array" => (TextureKind::Depth, "cube_array"),
        "texture_storage_1d" => (TextureKind::Storage, "1d"),
        "texture_storage_2d" => (TextureKind::Storage, "2d"),
        "texture_storage_2d_array" => (TextureKind::Storage, "2d_array"),
        "texture_storage_3d" => (TextureKind::Storage, "3d"),
        "texture_external" => (TextureKind::External, "external"),
        _ => return None,
    })
}

//! Top-of-module directives: `enable`, `requires`, `diagnostic`.
//!
//! Directives must precede all declarations; the parser enforces that
//! ordering and always emits every directive the printer encounters,
//! independent of tree-shaking.

use wgsl_common::Span;

#[derive(Debug, Clone)]
pub enum Directive {
    Enable { names: Vec<String>, span: Span },
    Requires { names: Vec<String>, span: Span },
    Diagnostic { severity: String, rule: String, span: Span },
}

impl Directive {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Directive::Enable { span, .. } | Directive::Requires { span, .. } | Directive::Diagnostic { span, .. } => *span,
        }
    }
}

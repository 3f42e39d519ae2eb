//! Orchestrator and public API for the WGSL minifier: sequences
//! parse → resolve → purity analysis → tree-shake → rename → print, and
//! exposes the three operations the core presents to its environment:
//! [`minify`], [`reflect`], and [`minify_and_reflect`].

mod reflect;
mod stats;

use serde::{Deserialize, Serialize};
use wgsl_common::{Diagnostic, MinifyOptions};
use wgsl_emit::{build_minifying_renamer, print, MinifyingRenamer, NoopRenamer, Renamer, SourceMapping};
use wgsl_parser::ast::Module;
use wgsl_parser::{Ref, SymbolTable};

pub use reflect::{
    AccessModeKind, AddressSpaceKind, ArrayDescriptor, BindingInfo, EntryPointInfo, EntryPointStage, FieldLayout, ReflectOutput,
    StructInfo, StructLayout,
};
pub use stats::Stats;

/// Either renamer the orchestrator may hand to the printer and to
/// reflection, unified behind one type so both call sites share the same
/// resolved-and-analyzed module.
enum EitherRenamer {
    Noop(NoopRenamer),
    Minifying(MinifyingRenamer),
}

impl Renamer for EitherRenamer {
    fn name_for(&self, symbols: &SymbolTable, r: Ref) -> String {
        match self {
            EitherRenamer::Noop(inner) => inner.name_for(symbols, r),
            EitherRenamer::Minifying(inner) => inner.name_for(symbols, r),
        }
    }
}

/// Output of [`minify`]: the emitted code, every diagnostic collected
/// along the way, run statistics, and an optional source map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinifyOutput {
    pub code: String,
    pub errors: Vec<Diagnostic>,
    pub stats: Stats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_map: Option<Vec<SourceMapping>>,
}

/// Parses, resolves, and analyzes `source`. Returns `Err` with the
/// accumulated diagnostics when parsing produced a fatal error, per the
/// orchestrator's contract in §4.8/§7: callers return the original source
/// rather than attempting to print a module that never fully parsed.
fn analyze(source: &str, options: &MinifyOptions) -> Result<(Module, Vec<Diagnostic>, EitherRenamer), (Vec<Diagnostic>, u32)> {
    let parsed = wgsl_parser::parse(source);
    let mut module = parsed.module;
    let mut errors = parsed.errors;

    if errors.iter().any(Diagnostic::is_error) {
        tracing::warn!(error_count = errors.len(), "fatal parse error");
        return Err((errors, module.symbols.len() as u32));
    }

    errors.extend(wgsl_resolve::resolve(&mut module, source, options));
    wgsl_analyze::analyze_purity(&mut module);
    wgsl_analyze::mark_live(&mut module, options);

    let renamer = if options.minify_identifiers {
        EitherRenamer::Minifying(build_minifying_renamer(&mut module, options))
    } else {
        EitherRenamer::Noop(NoopRenamer)
    };

    Ok((module, errors, renamer))
}

fn fatal_output(source: &str, total_symbols: u32, errors: Vec<Diagnostic>) -> MinifyOutput {
    MinifyOutput {
        code: source.to_string(),
        errors,
        stats: Stats {
            original_bytes: source.len() as u32,
            emitted_bytes: source.len() as u32,
            total_symbols,
            live_symbols: 0,
            dead_symbols: total_symbols,
            renamed_symbols: 0,
        },
        source_map: None,
    }
}

fn stats_for(module: &Module, source: &str, emitted: &str, renamer: &dyn Renamer) -> Stats {
    let mut live = 0u32;
    let mut renamed = 0u32;
    for (r, symbol) in module.symbols.iter() {
        if symbol.is_live() {
            live += 1;
        }
        if renamer.name_for(&module.symbols, r) != symbol.name {
            renamed += 1;
        }
    }
    let total = module.symbols.len() as u32;
    Stats {
        original_bytes: source.len() as u32,
        emitted_bytes: emitted.len() as u32,
        total_symbols: total,
        live_symbols: live,
        dead_symbols: total - live,
        renamed_symbols: renamed,
    }
}

/// Minifies (or, with every option disabled, pretty-prints) a single WGSL
/// module. Returns the original source untouched when parsing fails fatally.
#[must_use]
pub fn minify(source: &str, options: &MinifyOptions) -> MinifyOutput {
    let span = tracing::debug_span!("minify");
    let _enter = span.enter();

    let (module, errors, renamer) = match analyze(source, options) {
        Ok(parts) => parts,
        Err((errors, total_symbols)) => return fatal_output(source, total_symbols, errors),
    };

    let output = print(&module, &renamer, source, options);
    let stats = stats_for(&module, source, &output.code, &renamer);
    tracing::debug!(
        emitted_bytes = stats.emitted_bytes,
        renamed_symbols = stats.renamed_symbols,
        "minify complete"
    );

    MinifyOutput {
        code: output.code,
        errors,
        stats,
        source_map: if options.source_map { Some(output.mappings) } else { None },
    }
}

/// Walks `source` read-only and reports binding, struct-layout, and
/// entry-point metadata. Never transforms the module; mapped names equal
/// original names since no renamer runs.
#[must_use]
pub fn reflect(source: &str) -> ReflectOutput {
    let span = tracing::debug_span!("reflect");
    let _enter = span.enter();

    let options = MinifyOptions::identity();
    match analyze(source, &options) {
        Ok((module, errors, renamer)) => reflect::build(&module, &renamer, errors),
        Err((errors, _total_symbols)) => reflect::empty(errors),
    }
}

/// Minifies `source` and reflects the same resolved-and-renamed module in
/// one pass, so the reflection's mapped names match what the printer
/// actually emitted.
#[must_use]
pub fn minify_and_reflect(source: &str, options: &MinifyOptions) -> (MinifyOutput, ReflectOutput) {
    let span = tracing::debug_span!("minify_and_reflect");
    let _enter = span.enter();

    let (module, errors, renamer) = match analyze(source, options) {
        Ok(parts) => parts,
        Err((errors, total_symbols)) => return (fatal_output(source, total_symbols, errors.clone()), reflect::empty(errors)),
    };

    let output = print(&module, &renamer, source, options);
    let stats = stats_for(&module, source, &output.code, &renamer);
    let reflected = reflect::build(&module, &renamer, errors.clone());

    let minified = MinifyOutput {
        code: output.code,
        errors,
        stats,
        source_map: if options.source_map { Some(output.mappings) } else { None },
    };

    (minified, reflected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minify_default_options_shortens_output() {
        let source = "const x = 1;\nconst y = 2;\nconst z = x + y;\n";
        let result = minify(source, &MinifyOptions::default());
        assert!(result.errors.iter().all(|e| !e.is_error()));
        assert!(result.stats.emitted_bytes < result.stats.original_bytes);
        assert_eq!(result.stats.total_symbols, 3);
    }

    #[test]
    fn minify_identity_options_round_trips_parseable_output() {
        let source = "fn main() {\n  let x = 1;\n  return;\n}\n";
        let result = minify(source, &MinifyOptions::identity());
        let reparsed = wgsl_parser::parse(&result.code);
        assert!(reparsed.errors.iter().all(|e| !e.is_error()));
    }

    #[test]
    fn minify_fatal_parse_error_returns_original_source() {
        let source = "fn ( { this is not valid wgsl )";
        let result = minify(source, &MinifyOptions::default());
        assert_eq!(result.code, source);
        assert!(result.errors.iter().any(Diagnostic::is_error));
    }

    #[test]
    fn reflect_reports_binding_and_entry_point() {
        let source = "@group(0) @binding(0) var<uniform> u: f32;\n\
                       @compute @workgroup_size(8, 1, 1) fn main() { let _ignore = u; }\n";
        let out = reflect(source);
        assert_eq!(out.bindings.len(), 1);
        let binding = &out.bindings[0];
        assert_eq!((binding.group, binding.binding), (0, 0));
        assert_eq!(binding.address_space, AddressSpaceKind::Uniform);
        assert_eq!(binding.original_name, "u");
        assert_eq!(binding.mapped_name, "u");

        assert_eq!(out.entry_points.len(), 1);
        assert_eq!(out.entry_points[0].stage, EntryPointStage::Compute);
        assert_eq!(out.entry_points[0].workgroup_size, Some([8, 1, 1]));
    }

    #[test]
    fn reflect_reports_struct_layout_with_field_offsets() {
        let source = "struct Uniforms { time: f32, pos: vec3<f32> }\n\
                       @group(0) @binding(0) var<uniform> u: Uniforms;\n";
        let out = reflect(source);
        let layout = out.bindings[0].struct_layout.as_ref().expect("struct layout");
        assert_eq!(layout.fields.len(), 2);
        assert_eq!(layout.fields[0].offset, 0);
        // vec3<f32> has 16-byte alignment, so `pos` starts at offset 16, not 4.
        assert_eq!(layout.fields[1].offset, 16);
        assert_eq!(layout.alignment, 16);
    }

    #[test]
    fn minify_and_reflect_mapped_names_match_printed_output() {
        let source = "struct Uniforms { time: f32 }\n\
                       @group(0) @binding(0) var<uniform> u: Uniforms;\n\
                       @fragment fn fragMain() -> @location(0) vec4<f32> { return vec4<f32>(u.time); }\n";
        let mut options = MinifyOptions::default();
        options.preserve_uniform_struct_types = true;
        let (minified, reflected) = minify_and_reflect(source, &options);
        assert!(minified.code.contains("Uniforms"));
        let entry = &reflected.entry_points[0];
        assert!(minified.code.contains(&entry.mapped_name));
    }
}

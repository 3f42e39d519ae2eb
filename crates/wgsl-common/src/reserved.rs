//! Closed WGSL keyword, reserved-word, and built-in tables.
//!
//! These sets are consulted by the lexer (keyword recognition), the parser
//! (distinguishing type constructors from plain calls), the purity analyzer
//! (the pure-builtin-function set), and the renamer (the reserved-name set
//! it must never emit into). They are built once, lazily, and shared as
//! `FxHashSet<&'static str>` borrows rather than re-allocated per call.

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

macro_rules! static_set {
    ($name:ident, $($word:expr),+ $(,)?) => {
        pub static $name: Lazy<FxHashSet<&'static str>> =
            Lazy::new(|| [$($word),+].into_iter().collect());
    };
}

static_set!(
    KEYWORDS,
    "alias", "break", "case", "const", "const_assert", "continue", "continuing", "default",
    "diagnostic", "discard", "else", "enable", "false", "fn", "for", "if", "let", "loop",
    "override", "requires", "return", "struct", "switch", "true", "var", "while",
);

// Reserved for future WGSL versions or implementation use; never valid as an
// identifier even though they aren't active keywords today.
static_set!(
    RESERVED_WORDS,
    "NULL", "Self", "abstract", "active", "alignas", "alignof", "as", "asm", "asm_fragment",
    "async", "attribute", "auto", "await", "become", "binding_array", "cast", "catch", "class",
    "co_await", "co_return", "co_yield", "coherent", "column_major", "common", "compile",
    "compile_fragment", "concept", "const_cast", "consteval", "constexpr", "constinit",
    "crate", "debugger", "decltype", "delete", "demote", "demote_to_helper", "do",
    "dynamic_cast", "enum", "explicit", "export", "extends", "extern", "external", "fallthrough",
    "filter", "final", "finally", "friend", "from", "fxgroup", "get", "goto", "groupshared",
    "highp", "impl", "implements", "import", "inline", "instanceof", "interface", "layout",
    "lowp", "macro", "macro_rules", "match", "mediump", "meta", "mod", "module", "move",
    "mut", "mutable", "namespace", "new", "nil", "noexcept", "noinline", "nointerpolation",
    "noperspective", "null", "nullptr", "of", "operator", "package", "packoffset", "partition",
    "pass", "patch", "pixelfragment", "precise", "precision", "premerge", "priv", "protected",
    "pub", "public", "readonly", "ref", "regardless", "register", "reinterpret_cast",
    "require", "resource", "restrict", "self", "set", "shared", "sizeof", "smooth", "snorm",
    "static", "static_assert", "static_cast", "std", "subroutine", "super", "target_type",
    "template", "this", "thread_local", "throw", "trait", "try", "type", "typedef", "typeid",
    "typename", "typeof", "union", "unless", "unorm", "unsafe", "unsized", "use", "using",
    "varying", "virtual", "volatile", "wgsl", "where", "with", "writeonly", "yield",
);

static_set!(
    SCALAR_TYPES,
    "bool", "i32", "u32", "f32", "f16",
);

static_set!(
    VECTOR_TYPES,
    "vec2", "vec3", "vec4", "vec2i", "vec3i", "vec4i", "vec2u", "vec3u", "vec4u", "vec2f",
    "vec3f", "vec4f", "vec2h", "vec3h", "vec4h",
);

static_set!(
    MATRIX_TYPES,
    "mat2x2", "mat2x3", "mat2x4", "mat3x2", "mat3x3", "mat3x4", "mat4x2", "mat4x3", "mat4x4",
    "mat2x2f", "mat2x3f", "mat2x4f", "mat3x2f", "mat3x3f", "mat3x4f", "mat4x2f", "mat4x3f",
    "mat4x4f", "mat2x2h", "mat2x3h", "mat2x4h", "mat3x2h", "mat3x3h", "mat3x4h", "mat4x2h",
    "mat4x3h", "mat4x4h",
);

static_set!(
    OTHER_BUILTIN_TYPES,
    "array", "ptr", "atomic", "sampler", "sampler_comparison", "texture_1d", "texture_2d",
    "texture_2d_array", "texture_3d", "texture_cube", "texture_cube_array",
    "texture_multisampled_2d", "texture_depth_multisampled_2d", "texture_depth_2d",
    "texture_depth_2d_array", "texture_depth_cube", "texture_depth_cube_array",
    "texture_storage_1d", "texture_storage_2d", "texture_storage_2d_array",
    "texture_storage_3d", "texture_external",
);

static_set!(
    ADDRESS_SPACES,
    "function", "private", "workgroup", "uniform", "storage", "handle",
);

static_set!(
    ACCESS_MODES,
    "read", "write", "read_write",
);

static_set!(
    TEXEL_FORMATS,
    "rgba8unorm", "rgba8snorm", "rgba8uint", "rgba8sint", "rgba16uint", "rgba16sint",
    "rgba16float", "r32uint", "r32sint", "r32float", "rg32uint", "rg32sint", "rg32float",
    "rgba32uint", "rgba32sint", "rgba32float", "bgra8unorm",
);

/// WGSL math/constructor/pack/derivative builtins with no observable side
/// effect, when every argument is itself pure (see the purity rules).
static_set!(
    PURE_BUILTIN_FUNCTIONS,
    "abs", "acos", "acosh", "all", "any", "asin", "asinh", "atan", "atan2", "atanh", "ceil",
    "clamp", "cos", "cosh", "countLeadingZeros", "countOneBits", "countTrailingZeros", "cross",
    "degrees", "determinant", "distance", "dot", "dot4U8Packed", "dot4I8Packed", "exp", "exp2",
    "extractBits", "faceForward", "firstLeadingBit", "firstTrailingBit", "floor", "fma",
    "fract", "frexp", "insertBits", "inverseSqrt", "ldexp", "length", "log", "log2", "max",
    "min", "mix", "modf", "normalize", "pow", "quantizeToF16", "radians", "reflect", "refract",
    "reverseBits", "round", "saturate", "sign", "sin", "sinh", "smoothstep", "sqrt", "step",
    "tan", "tanh", "transpose", "trunc", "pack4x8snorm", "pack4x8unorm", "pack2x16snorm",
    "pack2x16unorm", "pack2x16float", "pack4xI8", "pack4xU8", "pack4xI8Clamp", "pack4xU8Clamp",
    "unpack4x8snorm", "unpack4x8unorm", "unpack2x16snorm", "unpack2x16unorm",
    "unpack2x16float", "unpack4xI8", "unpack4xU8", "dpdx", "dpdxCoarse", "dpdxFine", "dpdy",
    "dpdyCoarse", "dpdyFine", "fwidth", "fwidthCoarse", "fwidthFine",
    // type constructors usable in expression position
    "bool", "i32", "u32", "f32", "f16", "vec2", "vec3", "vec4", "mat2x2", "mat2x3", "mat2x4",
    "mat3x2", "mat3x3", "mat3x4", "mat4x2", "mat4x3", "mat4x4", "array",
);

#[must_use]
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(name)
}

#[must_use]
pub fn is_builtin_type_name(name: &str) -> bool {
    SCALAR_TYPES.contains(name)
        || VECTOR_TYPES.contains(name)
        || MATRIX_TYPES.contains(name)
        || OTHER_BUILTIN_TYPES.contains(name)
}

#[must_use]
pub fn is_type_constructor_name(name: &str) -> bool {
    SCALAR_TYPES.contains(name) || VECTOR_TYPES.contains(name) || MATRIX_TYPES.contains(name) || name == "array"
}

#[must_use]
pub fn is_pure_builtin_function(name: &str) -> bool {
    PURE_BUILTIN_FUNCTIONS.contains(name)
}

/// The full reserved-name set the renamer must never emit into: keywords,
/// reserved words, built-in type spellings, address-space and access-mode
/// keywords, texel-format names, and the single underscore.
#[must_use]
pub fn base_reserved_names() -> FxHashSet<&'static str> {
    let mut set: FxHashSet<&'static str> = FxHashSet::default();
    set.extend(KEYWORDS.iter().copied());
    set.extend(RESERVED_WORDS.iter().copied());
    set.extend(SCALAR_TYPES.iter().copied());
    set.extend(VECTOR_TYPES.iter().copied());
    set.extend(MATRIX_TYPES.iter().copied());
    set.extend(OTHER_BUILTIN_TYPES.iter().copied());
    set.extend(ADDRESS_SPACES.iter().copied());
    set.extend(ACCESS_MODES.iter().copied());
    set.extend(TEXEL_FORMATS.iter().copied());
    set.insert("_");
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_recognized() {
        assert!(is_keyword("fn"));
        assert!(is_keyword("let"));
        assert!(!is_keyword("getValue"));
    }

    #[test]
    fn builtin_types_cover_scalars_vectors_matrices() {
        assert!(is_builtin_type_name("f32"));
        assert!(is_builtin_type_name("vec3f"));
        assert!(is_builtin_type_name("mat4x4"));
        assert!(is_builtin_type_name("texture_2d"));
        assert!(!is_builtin_type_name("MyStruct"));
    }

    #[test]
    fn pure_builtins_include_math_and_constructors() {
        assert!(is_pure_builtin_function("dot"));
        assert!(is_pure_builtin_function("vec3"));
        assert!(is_pure_builtin_function("dpdx"));
        assert!(!is_pure_builtin_function("textureSample"));
    }

    #[test]
    fn base_reserved_names_includes_underscore_and_keywords() {
        let set = base_reserved_names();
        assert!(set.contains("_"));
        assert!(set.contains("fn"));
        assert!(set.contains("uniform"));
        assert!(set.contains("read_write"));
    }
}

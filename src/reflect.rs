//! Read-only reflection: walks a resolved module and reports binding,
//! struct-layout, and entry-point metadata without transforming anything.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use wgsl_common::Diagnostic;
use wgsl_emit::Renamer;
use wgsl_parser::ast::{AccessMode, AddressSpace, Attribute, Decl, Expr, ExprLiteralKind, Module, ScalarKind, TextureKind, Type};
use wgsl_parser::{Ref, SymbolTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressSpaceKind {
    Uniform,
    Storage,
    Handle,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessModeKind {
    Read,
    Write,
    ReadWrite,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPointStage {
    Vertex,
    Fragment,
    Compute,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrayDescriptor {
    /// `None` for a runtime-sized array.
    pub element_count: Option<u32>,
    pub element_stride: u32,
    /// `None` when `element_count` is `None`.
    pub total_size: Option<u32>,
    pub element_type_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested_array: Option<Box<ArrayDescriptor>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldLayout {
    pub name: String,
    pub mapped_name: String,
    pub offset: u32,
    pub size: u32,
    pub alignment: u32,
    pub type_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested_struct: Option<Box<StructLayout>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array: Option<Box<ArrayDescriptor>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructLayout {
    pub size: u32,
    pub alignment: u32,
    pub fields: Vec<FieldLayout>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructInfo {
    pub name: String,
    pub mapped_name: String,
    pub layout: StructLayout,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingInfo {
    pub group: u32,
    pub binding: u32,
    pub original_name: String,
    pub mapped_name: String,
    pub address_space: AddressSpaceKind,
    pub access_mode: AccessModeKind,
    pub original_type_text: String,
    pub mapped_type_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub struct_layout: Option<StructLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array: Option<ArrayDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryPointInfo {
    pub name: String,
    pub mapped_name: String,
    pub stage: EntryPointStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workgroup_size: Option<[u32; 3]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectOutput {
    pub bindings: Vec<BindingInfo>,
    pub structs: Vec<StructInfo>,
    pub entry_points: Vec<EntryPointInfo>,
    pub errors: Vec<Diagnostic>,
}

impl ReflectOutput {
    fn empty(errors: Vec<Diagnostic>) -> Self {
        ReflectOutput { bindings: Vec::new(), structs: Vec::new(), entry_points: Vec::new(), errors }
    }
}

/// Named declarations a type's `Ident` ref may point at: struct bodies and
/// alias targets, the two declaration kinds that carry host-shareable
/// layout information.
enum TypeDecl<'m> {
    Struct(&'m Decl),
    Alias(&'m Decl),
}

fn build_decl_map(module: &Module) -> HashMap<u32, TypeDecl<'_>> {
    let mut map = HashMap::new();
    for decl in &module.decls {
        match decl {
            Decl::Struct { symbol, .. } => {
                map.insert(symbol.index(), TypeDecl::Struct(decl));
            }
            Decl::Alias { symbol, .. } => {
                map.insert(symbol.index(), TypeDecl::Alias(decl));
            }
            _ => {}
        }
    }
    map
}

fn round_up(align: u32, value: u32) -> u32 {
    if align == 0 {
        return value;
    }
    value.div_ceil(align) * align
}

fn scalar_layout(kind: ScalarKind) -> (u32, u32) {
    match kind {
        ScalarKind::F16 => (2, 2),
        ScalarKind::Bool | ScalarKind::I32 | ScalarKind::U32 | ScalarKind::F32 => (4, 4),
    }
}

fn vector_layout(size: u8, elem_size: u32) -> (u32, u32) {
    match size {
        2 => (2 * elem_size, 2 * elem_size),
        4 => (4 * elem_size, 4 * elem_size),
        _ => (4 * elem_size, 3 * elem_size),
    }
}

fn texture_type_name(kind: TextureKind, dimension: &str) -> String {
    match kind {
        TextureKind::Sampled => format!("texture_{dimension}"),
        TextureKind::Multisampled => format!("texture_multisampled_{dimension}"),
        TextureKind::Depth => format!("texture_depth_{dimension}"),
        TextureKind::DepthMultisampled => format!("texture_depth_multisampled_{dimension}"),
        TextureKind::Storage => format!("texture_storage_{dimension}"),
        TextureKind::External => "texture_external".to_string(),
    }
}

fn access_mode_text(mode: AccessMode) -> &'static str {
    match mode {
        AccessMode::Read => "read",
        AccessMode::Write => "write",
        AccessMode::ReadWrite => "read_write",
    }
}

fn scalar_name(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Bool => "bool",
        ScalarKind::I32 => "i32",
        ScalarKind::U32 => "u32",
        ScalarKind::F32 => "f32",
        ScalarKind::F16 => "f16",
    }
}

fn eval_literal_u32(expr: &Expr) -> Option<u32> {
    match expr {
        Expr::Literal { kind: ExprLiteralKind::Int, raw, .. } => {
            let body = raw.trim_end_matches(['i', 'u']);
            if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
                u32::from_str_radix(hex, 16).ok()
            } else {
                body.parse::<u32>().ok()
            }
        }
        Expr::Paren { inner, .. } => eval_literal_u32(inner),
        _ => None,
    }
}

fn attr_arg_u32(attrs: &[Attribute], name: &str, index: usize) -> Option<u32> {
    attrs.iter().find(|a| a.is(name))?.args.get(index).and_then(eval_literal_u32)
}

/// Resolves a `Type` to human-readable text and, when it names a struct or
/// alias, to host layout information. Shared by both the original-spelling
/// and mapped-spelling reflection passes; `renamer` is only consulted when
/// `mapped` is `true`.
struct TypeReader<'m> {
    symbols: &'m SymbolTable,
    decls: &'m HashMap<u32, TypeDecl<'m>>,
    renamer: &'m dyn Renamer,
    mapped: bool,
}

impl<'m> TypeReader<'m> {
    fn ident_text(&self, name: &str, ref_: Ref) -> String {
        if self.mapped && ref_.is_valid() {
            self.renamer.name_for(self.symbols, ref_)
        } else {
            name.to_string()
        }
    }

    fn text(&self, ty: &Type) -> String {
        match ty {
            Type::Scalar { kind, .. } => scalar_name(*kind).to_string(),
            Type::Vector { size, element, shorthand, .. } => {
                shorthand.clone().unwrap_or_else(|| format!("vec{size}<{}>", self.text(element)))
            }
            Type::Matrix { cols, rows, element, shorthand, .. } => {
                shorthand.clone().unwrap_or_else(|| format!("mat{cols}x{rows}<{}>", self.text(element)))
            }
            Type::Array { element, size, .. } => match size.as_ref().and_then(|e| eval_literal_u32(e)) {
                Some(n) => format!("array<{}, {n}>", self.text(element)),
                None if size.is_some() => format!("array<{}, ?>", self.text(element)),
                None => format!("array<{}>", self.text(element)),
            },
            Type::Pointer { address_space, element, access_mode, .. } => {
                let space = format!("{address_space:?}").to_lowercase();
                match access_mode {
                    Some(mode) => format!("ptr<{space}, {}, {}>", self.text(element), access_mode_text(*mode)),
                    None => format!("ptr<{space}, {}>", self.text(element)),
                }
            }
            Type::Atomic { element, .. } => format!("atomic<{}>", self.text(element)),
            Type::Sampler { comparison, .. } => {
                if *comparison {
                    "sampler_comparison".to_string()
                } else {
                    "sampler".to_string()
                }
            }
            Type::Texture { kind, dimension, sampled_type, texel_format, access_mode, .. } => {
                let name = texture_type_name(*kind, dimension);
                if let Some(sampled) = sampled_type {
                    format!("{name}<{}>", self.text(sampled))
                } else if let Some(format) = texel_format {
                    match access_mode {
                        Some(mode) => format!("{name}<{format}, {}>", access_mode_text(*mode)),
                        None => format!("{name}<{format}>"),
                    }
                } else {
                    name
                }
            }
            Type::Ident { name, ref_, .. } => self.ident_text(name, *ref_),
        }
    }

    /// Returns `None` for types with no host-shareable layout (samplers,
    /// textures, pointers): the caller degrades by omitting layout fields
    /// rather than fabricating one.
    fn layout(&self, ty: &Type) -> Option<(u32, u32)> {
        match ty {
            Type::Scalar { kind, .. } => Some(scalar_layout(*kind)),
            Type::Vector { size, element, .. } => {
                let (_, esize) = self.layout(element)?;
                Some(vector_layout(*size, esize))
            }
            Type::Matrix { cols, rows, element, .. } => {
                let (_, esize) = self.layout(element)?;
                let (valign, vsize) = vector_layout(*rows, esize);
                Some((valign, round_up(valign, vsize) * u32::from(*cols)))
            }
            Type::Array { element, size, .. } => {
                let (ealign, esize) = self.layout(element)?;
                let stride = round_up(ealign, esize);
                let total = size.as_ref().and_then(|e| eval_literal_u32(e)).map(|n| n * stride);
                Some((ealign, total.unwrap_or(0)))
            }
            Type::Atomic { element, .. } => self.layout(element),
            Type::Ident { ref_, .. } => match self.decls.get(&ref_.index())? {
                TypeDecl::Struct(decl) => {
                    let layout = self.struct_layout(decl)?;
                    Some((layout.alignment, layout.size))
                }
                TypeDecl::Alias(Decl::Alias { type_, .. }) => self.layout(type_),
                TypeDecl::Alias(_) => None,
            },
            Type::Pointer { .. } | Type::Sampler { .. } | Type::Texture { .. } => None,
        }
    }

    fn array_descriptor(&self, ty: &Type) -> Option<ArrayDescriptor> {
        let Type::Array { element, size, .. } = ty else { return None };
        let (ealign, esize) = self.layout(element)?;
        let stride = round_up(ealign, esize);
        let count = size.as_ref().and_then(|e| eval_literal_u32(e));
        Some(ArrayDescriptor {
            element_count: count,
            element_stride: stride,
            total_size: count.map(|n| n * stride),
            element_type_text: self.text(element),
            nested_array: self.array_descriptor(element).map(Box::new),
        })
    }

    fn struct_layout(&self, decl: &Decl) -> Option<StructLayout> {
        let Decl::Struct { members, .. } = decl else { return None };
        let mut offset = 0u32;
        let mut struct_align = 1u32;
        let mut fields = Vec::with_capacity(members.len());
        for member in members {
            let (align, size) = self.layout(&member.type_).unwrap_or((4, 4));
            struct_align = struct_align.max(align);
            offset = round_up(align, offset);
            let nested_struct = self.nested_struct_layout(&member.type_).map(Box::new);
            let array = self.array_descriptor(&member.type_).map(Box::new);
            fields.push(FieldLayout {
                name: member.name.clone(),
                mapped_name: member.name.clone(),
                offset,
                size,
                alignment: align,
                type_text: self.text(&member.type_),
                nested_struct,
                array,
            });
            offset += size;
        }
        let total = round_up(struct_align, offset);
        Some(StructLayout { size: total, alignment: struct_align, fields })
    }

    fn nested_struct_layout(&self, ty: &Type) -> Option<StructLayout> {
        match ty {
            Type::Ident { ref_, .. } => match self.decls.get(&ref_.index())? {
                TypeDecl::Struct(decl) => self.struct_layout(decl),
                TypeDecl::Alias(Decl::Alias { type_, .. }) => self.nested_struct_layout(type_),
                TypeDecl::Alias(_) => None,
            },
            _ => None,
        }
    }
}

fn stage_attribute(attrs: &[Attribute]) -> Option<EntryPointStage> {
    if attrs.iter().any(|a| a.is("vertex")) {
        Some(EntryPointStage::Vertex)
    } else if attrs.iter().any(|a| a.is("fragment")) {
        Some(EntryPointStage::Fragment)
    } else if attrs.iter().any(|a| a.is("compute")) {
        Some(EntryPointStage::Compute)
    } else {
        None
    }
}

fn workgroup_size(attrs: &[Attribute]) -> Option<[u32; 3]> {
    let attr = attrs.iter().find(|a| a.is("workgroup_size"))?;
    let x = eval_literal_u32(attr.args.first()?)?;
    let y = attr.args.get(1).map(eval_literal_u32).unwrap_or(Some(1))?;
    let z = attr.args.get(2).map(eval_literal_u32).unwrap_or(Some(1))?;
    Some([x, y, z])
}

/// Builds the reflection output for a resolved module. `renamer` supplies
/// the mapped spellings; pass [`wgsl_emit::NoopRenamer`] when reflecting
/// without minification.
pub(crate) fn build(module: &Module, renamer: &dyn Renamer, errors: Vec<Diagnostic>) -> ReflectOutput {
    let decl_map = build_decl_map(module);
    let reader_original = TypeReader { symbols: &module.symbols, decls: &decl_map, renamer, mapped: false };
    let reader_mapped = TypeReader { symbols: &module.symbols, decls: &decl_map, renamer, mapped: true };

    let mut bindings = Vec::new();
    let mut structs = Vec::new();
    let mut entry_points = Vec::new();

    for decl in &module.decls {
        match decl {
            Decl::Var { name, symbol, attributes, address_space, access_mode, type_, .. } => {
                let Some(group) = attr_arg_u32(attributes, "group", 0) else { continue };
                let Some(binding) = attr_arg_u32(attributes, "binding", 0) else { continue };
                let Some(type_) = type_ else { continue };
                let mapped_name = renamer.name_for(&module.symbols, *symbol);
                let struct_layout = reader_original.nested_struct_layout(type_);
                let array = reader_original.array_descriptor(type_);
                bindings.push(BindingInfo {
                    group,
                    binding,
                    original_name: name.clone(),
                    mapped_name,
                    address_space: match address_space {
                        Some(AddressSpace::Uniform) => AddressSpaceKind::Uniform,
                        Some(AddressSpace::Storage) => AddressSpaceKind::Storage,
                        Some(AddressSpace::Handle) | None => AddressSpaceKind::Handle,
                        Some(_) => AddressSpaceKind::None,
                    },
                    access_mode: match access_mode {
                        Some(AccessMode::Read) => AccessModeKind::Read,
                        Some(AccessMode::Write) => AccessModeKind::Write,
                        Some(AccessMode::ReadWrite) => AccessModeKind::ReadWrite,
                        None => AccessModeKind::None,
                    },
                    original_type_text: reader_original.text(type_),
                    mapped_type_text: reader_mapped.text(type_),
                    struct_layout,
                    array,
                });
            }
            Decl::Struct { name, symbol, .. } => {
                if let Some(layout) = reader_original.struct_layout(decl) {
                    structs.push(StructInfo {
                        name: name.clone(),
                        mapped_name: renamer.name_for(&module.symbols, *symbol),
                        layout,
                    });
                }
            }
            Decl::Function { name, symbol, attributes, .. } => {
                if let Some(stage) = stage_attribute(attributes) {
                    entry_points.push(EntryPointInfo {
                        name: name.clone(),
                        mapped_name: renamer.name_for(&module.symbols, *symbol),
                        stage,
                        workgroup_size: if stage == EntryPointStage::Compute { workgroup_size(attributes) } else { None },
                    });
                }
            }
            _ => {}
        }
    }

    ReflectOutput { bindings, structs, entry_points, errors }
}

pub(crate) fn empty(errors: Vec<Diagnostic>) -> ReflectOutput {
    ReflectOutput::empty(errors)
}

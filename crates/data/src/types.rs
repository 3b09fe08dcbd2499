//! Source level and canonical type representations.

use crate::CanonicalTypeId;
use std::{fmt, hash, sync::Arc};

/// Elementary ABI value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    /// `uintN`, width in bits.
    Uint(u16),
    /// `intN`, width in bits.
    Int(u16),
    Address,
    Bool,
    /// `bytesN`, width in bytes.
    FixedBytes(u8),
    Bytes,
    String,
    /// External function pointer, encoded as `bytes24`.
    Function,
}

impl Primitive {
    pub fn is_dynamic(self) -> bool {
        matches!(self, Primitive::Bytes | Primitive::String)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Primitive as P;
        match self {
            P::Uint(bits) => write!(f, "uint{bits}"),
            P::Int(bits) => write!(f, "int{bits}"),
            P::Address => f.write_str("address"),
            P::Bool => f.write_str("bool"),
            P::FixedBytes(size) => write!(f, "bytes{size}"),
            P::Bytes => f.write_str("bytes"),
            P::String => f.write_str("string"),
            P::Function => f.write_str("function"),
        }
    }
}

/// A named, ordered parameter or struct component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param<T> {
    /// May be empty, ABI outputs are frequently unnamed.
    pub name: String,
    pub ty: T,
    /// Raw `internalType` as emitted by the compiler. Informational only.
    pub internal_type: Option<String>,
    /// Only meaningful for event inputs.
    pub indexed: bool,
}

impl<T> Param<T> {
    pub fn new(name: impl Into<String>, ty: T) -> Self {
        Self { name: name.into(), ty, internal_type: None, indexed: false }
    }

    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    pub fn with_internal_type(mut self, internal_type: impl Into<String>) -> Self {
        self.internal_type = Some(internal_type.into());
        self
    }

    pub fn try_map_type<U, E>(&self, f: impl FnOnce(&T) -> Result<U, E>) -> Result<Param<U>, E> {
        Ok(Param {
            name: self.name.clone(),
            ty: f(&self.ty)?,
            internal_type: self.internal_type.clone(),
            indexed: self.indexed,
        })
    }
}

/// A tuple/struct as written in the source artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Composite {
    /// Struct name recovered from `internalType`, `None` for inline tuples.
    pub label: Option<String>,
    pub components: Vec<Param<TypeRef>>,
}

/// A parameter type as written in the source artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(Primitive),
    Composite(Composite),
    Array(Box<TypeRef>, Option<usize>),
}

impl TypeRef {
    pub fn array(inner: TypeRef, len: Option<usize>) -> Self {
        TypeRef::Array(Box::new(inner), len)
    }

    pub fn tuple(label: Option<&str>, components: Vec<Param<TypeRef>>) -> Self {
        TypeRef::Composite(Composite { label: label.map(str::to_owned), components })
    }
}

/// The interned form of a composite. Identity is the structural key: equality and hashing only
/// look at the id the interner assigned, which is unique per key within one run.
#[derive(Debug)]
pub struct CanonicalType {
    pub id: CanonicalTypeId,
    /// Ordered `(type name, ...)` rendering including component names, e.g.
    /// `(uint256 x,uint256 y)`.
    pub key: Arc<str>,
    pub fields: Vec<Param<ResolvedType>>,
}

impl CanonicalType {
    /// ABI signature of the tuple without component names, e.g. `(uint256,uint256)`.
    pub fn abi_signature(&self) -> String {
        let mut out = String::new();
        write_tuple_signature(&mut out, &self.fields);
        out
    }

    /// Canonical types directly embedded in this one, in field order.
    pub fn direct_dependencies(&self) -> impl Iterator<Item = &Arc<CanonicalType>> + '_ {
        self.fields.iter().filter_map(|field| field.ty.innermost_composite())
    }
}

impl PartialEq for CanonicalType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CanonicalType {}

impl hash::Hash for CanonicalType {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A parameter type with every composite replaced by its canonical instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedType {
    Primitive(Primitive),
    Composite(Arc<CanonicalType>),
    Array(Box<ResolvedType>, Option<usize>),
}

impl ResolvedType {
    /// The composite at the bottom of any array nesting.
    pub fn innermost_composite(&self) -> Option<&Arc<CanonicalType>> {
        match self {
            ResolvedType::Primitive(_) => None,
            ResolvedType::Composite(canonical) => Some(canonical),
            ResolvedType::Array(inner, _) => inner.innermost_composite(),
        }
    }

    /// Writes the structural key fragment for this type, component names included.
    pub fn write_structural_key(&self, out: &mut String) {
        match self {
            ResolvedType::Primitive(primitive) => {
                use fmt::Write;
                write!(out, "{primitive}").expect("write to string failed");
            }
            ResolvedType::Composite(canonical) => out.push_str(&canonical.key),
            ResolvedType::Array(inner, len) => {
                inner.write_structural_key(out);
                write_array_suffix(out, *len);
            }
        }
    }
}

/// Rendering of a type into its canonical ABI signature (`uint256`, `(address,bytes)[]`).
pub trait AbiType {
    fn write_signature(&self, out: &mut String);

    fn signature(&self) -> String {
        let mut out = String::new();
        self.write_signature(&mut out);
        out
    }
}

impl AbiType for TypeRef {
    fn write_signature(&self, out: &mut String) {
        match self {
            TypeRef::Primitive(primitive) => {
                use fmt::Write;
                write!(out, "{primitive}").expect("write to string failed");
            }
            TypeRef::Composite(composite) => write_tuple_signature(out, &composite.components),
            TypeRef::Array(inner, len) => {
                inner.write_signature(out);
                write_array_suffix(out, *len);
            }
        }
    }
}

impl AbiType for ResolvedType {
    fn write_signature(&self, out: &mut String) {
        match self {
            ResolvedType::Primitive(primitive) => {
                use fmt::Write;
                write!(out, "{primitive}").expect("write to string failed");
            }
            ResolvedType::Composite(canonical) => write_tuple_signature(out, &canonical.fields),
            ResolvedType::Array(inner, len) => {
                inner.write_signature(out);
                write_array_suffix(out, *len);
            }
        }
    }
}

pub(crate) fn write_tuple_signature<T: AbiType>(out: &mut String, params: &[Param<T>]) {
    out.push('(');
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        param.ty.write_signature(out);
    }
    out.push(')');
}

fn write_array_suffix(out: &mut String, len: Option<usize>) {
    use fmt::Write;
    match len {
        Some(len) => write!(out, "[{len}]").expect("write to string failed"),
        None => out.push_str("[]"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> TypeRef {
        TypeRef::tuple(
            Some("WebAuthNPubKey"),
            vec![
                Param::new("x", TypeRef::Primitive(Primitive::Uint(256))),
                Param::new("y", TypeRef::Primitive(Primitive::Uint(256))),
            ],
        )
    }

    #[test]
    fn test_primitive_display() {
        assert_eq!(Primitive::Uint(8).to_string(), "uint8");
        assert_eq!(Primitive::Int(256).to_string(), "int256");
        assert_eq!(Primitive::FixedBytes(32).to_string(), "bytes32");
        assert_eq!(Primitive::Function.to_string(), "function");
    }

    #[test]
    fn test_nested_array_signature() {
        let ty = TypeRef::array(TypeRef::array(point(), Some(2)), None);
        assert_eq!(ty.signature(), "(uint256,uint256)[2][]");
    }

    #[test]
    fn test_empty_tuple_signature() {
        assert_eq!(TypeRef::tuple(None, vec![]).signature(), "()");
    }

    #[test]
    fn test_canonical_identity_is_by_id() {
        let a = CanonicalType { id: CanonicalTypeId::new(0), key: "(bool a)".into(), fields: vec![] };
        let b = CanonicalType { id: CanonicalTypeId::new(0), key: "(bool b)".into(), fields: vec![] };
        let c = CanonicalType { id: CanonicalTypeId::new(1), key: "(bool a)".into(), fields: vec![] };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}

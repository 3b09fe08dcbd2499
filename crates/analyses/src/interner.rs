//! Run scoped registry of canonical composite types.
//!
//! Composites are keyed on their structural key: the ordered `(type, name)` pairs of their
//! components, nested composites rendered through their own canonical key. Source labels and
//! component `internalType`s never take part in identity and are not stored on the canonical
//! type, so nothing on it depends on which occurrence was interned first. Lookups and inserts go through a sharded map so concurrent bundle
//! workers only contend when they touch the same shard, and inserting is a compare-and-insert:
//! when two workers race on one key exactly one canonical instance is created.

use abi_bind_data::{
    CanonicalType, CanonicalTypeId, Composite, IndexVec, Param, ResolvedType, TypeRef,
};
use dashmap::DashMap;
use parking_lot::RwLock;
use smallvec::SmallVec;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternError {
    #[error("struct `{label}` contains itself by value: {path}")]
    CyclicTypeDefinition { label: String, path: String },
}

/// Labels of the composites currently being interned, outermost first.
type AncestorStack<'a> = SmallVec<[Option<&'a str>; 8]>;

pub struct TypeInterner {
    by_key: DashMap<Arc<str>, CanonicalTypeId>,
    arena: RwLock<IndexVec<CanonicalTypeId, Arc<CanonicalType>>>,
}

impl TypeInterner {
    pub fn new() -> Self {
        Self { by_key: DashMap::new(), arena: RwLock::new(IndexVec::new()) }
    }

    /// Returns the canonical instance for `composite`, creating it on first sight.
    pub fn intern(&self, composite: &Composite) -> Result<Arc<CanonicalType>, InternError> {
        self.intern_observed(composite, &mut |_, _| {})
    }

    /// Like [`Self::intern`], calling `observe` once per composite occurrence (nested ones
    /// first) with the source composite it was written as.
    pub fn intern_observed(
        &self,
        composite: &Composite,
        observe: &mut dyn FnMut(&Arc<CanonicalType>, &Composite),
    ) -> Result<Arc<CanonicalType>, InternError> {
        self.intern_inner(composite, &mut AncestorStack::new(), observe)
    }

    /// Replaces every composite inside `ty` with its canonical instance.
    pub fn resolve(&self, ty: &TypeRef) -> Result<ResolvedType, InternError> {
        self.resolve_observed(ty, &mut |_, _| {})
    }

    pub fn resolve_observed(
        &self,
        ty: &TypeRef,
        observe: &mut dyn FnMut(&Arc<CanonicalType>, &Composite),
    ) -> Result<ResolvedType, InternError> {
        self.resolve_inner(ty, &mut AncestorStack::new(), observe)
    }

    pub fn get(&self, id: CanonicalTypeId) -> Option<Arc<CanonicalType>> {
        self.arena.read().get(id).cloned()
    }

    /// Number of distinct canonical types registered so far.
    pub fn len(&self) -> usize {
        self.arena.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn resolve_inner<'a>(
        &self,
        ty: &'a TypeRef,
        stack: &mut AncestorStack<'a>,
        observe: &mut dyn FnMut(&Arc<CanonicalType>, &Composite),
    ) -> Result<ResolvedType, InternError> {
        Ok(match ty {
            TypeRef::Primitive(primitive) => ResolvedType::Primitive(*primitive),
            TypeRef::Composite(composite) => {
                ResolvedType::Composite(self.intern_inner(composite, stack, observe)?)
            }
            TypeRef::Array(inner, len) => {
                ResolvedType::Array(Box::new(self.resolve_inner(inner, stack, observe)?), *len)
            }
        })
    }

    fn intern_inner<'a>(
        &self,
        composite: &'a Composite,
        stack: &mut AncestorStack<'a>,
        observe: &mut dyn FnMut(&Arc<CanonicalType>, &Composite),
    ) -> Result<Arc<CanonicalType>, InternError> {
        let label = composite.label.as_deref();
        if let Some(label) = label {
            if stack.contains(&Some(label)) {
                let path = stack.iter().flatten().copied().chain([label]).collect::<Vec<_>>();
                return Err(InternError::CyclicTypeDefinition {
                    label: label.to_owned(),
                    path: path.join(" -> "),
                });
            }
        }

        stack.push(label);
        let mut fields = Vec::with_capacity(composite.components.len());
        for component in &composite.components {
            let ty = match self.resolve_inner(&component.ty, stack, observe) {
                Ok(ty) => ty,
                Err(err) => {
                    stack.pop();
                    return Err(err);
                }
            };
            fields.push(Param::new(component.name.clone(), ty));
        }
        stack.pop();

        let canonical = self.insert(structural_key(&fields), fields);
        observe(&canonical, composite);
        Ok(canonical)
    }

    fn insert(&self, key: String, fields: Vec<Param<ResolvedType>>) -> Arc<CanonicalType> {
        if let Some(id) = self.by_key.get(key.as_str()).map(|entry| *entry) {
            return Arc::clone(&self.arena.read()[id]);
        }

        let key: Arc<str> = key.into();
        let id = *self.by_key.entry(Arc::clone(&key)).or_insert_with(|| {
            let mut arena = self.arena.write();
            let id = arena.next_idx();
            arena.push(Arc::new(CanonicalType { id, key, fields }))
        });
        Arc::clone(&self.arena.read()[id])
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// `(uint256 x,uint256 y)`; unnamed components contribute their type only.
fn structural_key(fields: &[Param<ResolvedType>]) -> String {
    let mut key = String::from("(");
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            key.push(',');
        }
        field.ty.write_structural_key(&mut key);
        if !field.name.is_empty() {
            key.push(' ');
            key.push_str(&field.name);
        }
    }
    key.push(')');
    key
}

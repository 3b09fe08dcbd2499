//! Per bundle type declarations: which canonical types a bundle needs, in what order, and under
//! which names.

use crate::diagnostics::{NamingConflict, Subject};
use abi_bind_data::{CanonicalType, CanonicalTypeId, Composite, ResolvedEntry, TypeDecl};
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

/// What one bundle's occurrences of each canonical type looked like in the source: the labels
/// they were written under and the component `internalType`s of the first occurrence.
#[derive(Debug, Default)]
pub struct TypeUsage {
    labels: HashMap<CanonicalTypeId, Vec<String>>,
    field_internal_types: HashMap<CanonicalTypeId, Vec<Option<String>>>,
    occurrences: usize,
}

impl TypeUsage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, canonical: &Arc<CanonicalType>, source: &Composite) {
        self.occurrences += 1;
        let labels = self.labels.entry(canonical.id).or_default();
        if let Some(label) = &source.label {
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }
        self.field_internal_types.entry(canonical.id).or_insert_with(|| {
            source.components.iter().map(|component| component.internal_type.clone()).collect()
        });
    }

    /// Number of composite occurrences recorded, nested ones included.
    pub fn occurrences(&self) -> usize {
        self.occurrences
    }

    /// Source labels, namespace qualified (`Vault.Config`), in order of first appearance.
    pub fn labels(&self, id: CanonicalTypeId) -> &[String] {
        self.labels.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn field_internal_types(&self, id: CanonicalTypeId) -> &[Option<String>] {
        self.field_internal_types.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Every canonical type reachable from `entries`, dependencies before dependents. Roots are taken
/// in entry order, inputs before outputs, so the result only depends on the entries themselves.
pub fn topological_order(entries: &[ResolvedEntry]) -> Vec<Arc<CanonicalType>> {
    fn visit(
        canonical: &Arc<CanonicalType>,
        visited: &mut HashSet<CanonicalTypeId>,
        out: &mut Vec<Arc<CanonicalType>>,
    ) {
        if !visited.insert(canonical.id) {
            return;
        }
        for dependency in canonical.direct_dependencies() {
            visit(dependency, visited, out);
        }
        out.push(Arc::clone(canonical));
    }

    let mut visited = HashSet::new();
    let mut out = Vec::new();
    let roots = entries
        .iter()
        .flat_map(|entry| entry.entry.inputs().iter().chain(entry.entry.outputs()))
        .filter_map(|param| param.ty.innermost_composite());
    for root in roots {
        visit(root, &mut visited, &mut out);
    }
    out
}

/// Names every type of `ordered`: its first label without namespace, or `Tuple<k>` when it never
/// had one. A name already claimed by an earlier type gets a numeric suffix.
pub fn declare_types(
    bundle: &str,
    ordered: Vec<Arc<CanonicalType>>,
    usage: &TypeUsage,
) -> (Vec<TypeDecl>, Vec<NamingConflict>) {
    let mut claimed = HashSet::new();
    let mut unlabelled = 0;
    let mut renames = Vec::new();
    let mut decls = Vec::with_capacity(ordered.len());

    for canonical in ordered {
        let labels = usage.labels(canonical.id).to_vec();
        let wanted = match labels.first() {
            Some(label) => short_name(label).to_owned(),
            None => {
                unlabelled += 1;
                format!("Tuple{}", unlabelled - 1)
            }
        };

        let mut name = wanted.clone();
        let mut k = 2;
        while claimed.contains(&name) {
            name = format!("{wanted}_{k}");
            k += 1;
        }
        if name != wanted {
            tracing::warn!(bundle, label = %wanted, renamed_to = %name, "struct label reused");
            renames.push(NamingConflict {
                bundle: bundle.to_owned(),
                subject: Subject::Struct,
                name: wanted,
                renamed_to: name.clone(),
                contract: String::new(),
                signature: canonical.key.to_string(),
            });
        }
        claimed.insert(name.clone());
        let field_internal_types = usage.field_internal_types(canonical.id).to_vec();
        decls.push(TypeDecl { name, labels, field_internal_types, canonical });
    }

    (decls, renames)
}

/// `IEntryPoint.PackedUserOperation` -> `PackedUserOperation`.
fn short_name(label: &str) -> &str {
    label.rsplit('.').next().unwrap_or(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeInterner;
    use abi_bind_data::{
        AbiEntry, Function, Param, Primitive, ResolvedType, StateMutability, TypeRef,
    };

    fn uint(name: &str) -> Param<TypeRef> {
        Param::new(name, TypeRef::Primitive(Primitive::Uint(256)))
    }

    fn entry(inputs: Vec<Param<ResolvedType>>) -> ResolvedEntry {
        ResolvedEntry {
            entry: AbiEntry::Function(Function {
                name: "f".into(),
                inputs,
                outputs: vec![],
                state_mutability: StateMutability::NonPayable,
            }),
            emitted_name: "f".into(),
            origin: "C".into(),
            declared_by: vec!["C".into()],
            resolution: None,
        }
    }

    #[test]
    fn test_dependencies_come_first_and_names_follow_labels() {
        let interner = TypeInterner::new();
        let mut usage = TypeUsage::new();
        let outer = TypeRef::tuple(
            Some("Owner"),
            vec![Param::new("key", TypeRef::tuple(None, vec![uint("x"), uint("y")]))],
        );
        let point = TypeRef::tuple(Some("WebAuthNPubKey"), vec![uint("x"), uint("y")]);
        let outer = interner.resolve_observed(&outer, &mut |ct, l| usage.record(ct, l)).unwrap();
        let point = interner.resolve_observed(&point, &mut |ct, l| usage.record(ct, l)).unwrap();

        let entries = [entry(vec![Param::new("owner", outer), Param::new("key", point)])];
        let ordered = topological_order(&entries);
        let (decls, renames) = declare_types("b", ordered, &usage);

        let names: Vec<_> = decls.iter().map(|decl| decl.name.as_str()).collect();
        assert_eq!(names, ["WebAuthNPubKey", "Owner"]);
        assert_eq!(decls[0].labels, ["WebAuthNPubKey"]);
        assert!(renames.is_empty());
        assert_eq!(usage.occurrences(), 3);
    }

    #[test]
    fn test_unlabelled_and_clashing_names() {
        let interner = TypeInterner::new();
        let mut usage = TypeUsage::new();
        let types = [
            TypeRef::tuple(None, vec![uint("a")]),
            TypeRef::tuple(Some("Config"), vec![uint("b")]),
            TypeRef::tuple(Some("Config"), vec![uint("c")]),
            TypeRef::tuple(None, vec![uint("d")]),
        ];
        let params = types
            .iter()
            .map(|ty| {
                let ty = interner.resolve_observed(ty, &mut |ct, l| usage.record(ct, l)).unwrap();
                Param::new("p", ty)
            })
            .collect();
        let (decls, renames) = declare_types("b", topological_order(&[entry(params)]), &usage);

        let names: Vec<_> = decls.iter().map(|decl| decl.name.as_str()).collect();
        assert_eq!(names, ["Tuple0", "Config", "Config_2", "Tuple1"]);
        assert_eq!(renames.len(), 1);
        assert_eq!(renames[0].subject, Subject::Struct);
        assert_eq!(renames[0].signature, "(uint256 c)");
    }

    #[test]
    fn test_qualified_labels_are_named_by_their_last_segment() {
        let interner = TypeInterner::new();
        let mut usage = TypeUsage::new();
        let oracle = TypeRef::tuple(Some("Oracle.Config"), vec![uint("feed")]);
        let vault = TypeRef::tuple(Some("Vault.Config"), vec![Param::new("oracle", oracle)]);
        let vault = interner.resolve_observed(&vault, &mut |ct, l| usage.record(ct, l)).unwrap();

        let ordered = topological_order(&[entry(vec![Param::new("config", vault)])]);
        let (decls, renames) = declare_types("b", ordered, &usage);
        let names: Vec<_> = decls.iter().map(|decl| decl.name.as_str()).collect();
        assert_eq!(names, ["Config", "Config_2"]);
        assert_eq!(decls[1].labels, ["Vault.Config"]);
        assert_eq!(renames.len(), 1);
    }

    #[test]
    fn test_first_occurrence_sets_field_internal_types() {
        let interner = TypeInterner::new();
        let mut usage = TypeUsage::new();
        let pool = |internal_type: &str| {
            let token = Param::new("token", TypeRef::Primitive(Primitive::Address))
                .with_internal_type(internal_type);
            TypeRef::tuple(Some("Pool"), vec![token])
        };
        let first = interner.resolve_observed(&pool("contract IERC20"), &mut |ct, l| {
            usage.record(ct, l)
        });
        let second = interner.resolve_observed(&pool("address"), &mut |ct, l| usage.record(ct, l));
        let (first, second) = (first.unwrap(), second.unwrap());
        assert_eq!(composite_of(&first), composite_of(&second));

        let ordered = topological_order(&[entry(vec![Param::new("p", first)])]);
        let (decls, _) = declare_types("b", ordered, &usage);
        assert_eq!(decls[0].field_internal_types, [Some("contract IERC20".to_owned())]);
        let token = decls[0].fields().next().unwrap();
        assert_eq!(token.internal_type.as_deref(), Some("contract IERC20"));
    }

    fn composite_of(ty: &ResolvedType) -> CanonicalTypeId {
        ty.innermost_composite().unwrap().id
    }
}

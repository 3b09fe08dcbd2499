//! Human readable dump of a resolved bundle.
//!
//! Lists the declared types in dependency order followed by every reconciled entry with its
//! selector, originating contract and how it was reconciled. Output only depends on the bundle
//! model, making it suitable for expected-output tests.

use abi_bind_data::{
    AbiEntry, BindingEmitter, ConflictResolution, EmitError, EmitterCapabilities, Param,
    ResolvedBundle, ResolvedEntry, ResolvedType,
};
use std::fmt;

#[derive(Debug, Clone, Copy, Default)]
pub struct DebugEmitter {
    pub capabilities: EmitterCapabilities,
}

impl DebugEmitter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BindingEmitter for DebugEmitter {
    fn capabilities(&self) -> EmitterCapabilities {
        self.capabilities
    }

    fn emit(&self, bundle: &ResolvedBundle) -> Result<String, EmitError> {
        check_declared(bundle)?;
        Ok(display_bundle(bundle))
    }
}

pub fn display_bundle(bundle: &ResolvedBundle) -> String {
    DisplayHelper(bundle).to_string()
}

struct DisplayHelper<'a>(&'a ResolvedBundle);

impl fmt::Display for DisplayHelper<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_bundle(f, self.0)
    }
}

pub fn fmt_bundle(f: &mut fmt::Formatter<'_>, bundle: &ResolvedBundle) -> fmt::Result {
    writeln!(f, "bundle {}", bundle.name)?;
    writeln!(f, "// contracts: {}", bundle.contracts.join(", "))?;

    if !bundle.types.is_empty() {
        writeln!(f)?;
    }
    for decl in &bundle.types {
        write!(f, "struct {} {{", decl.name)?;
        for (i, field) in decl.canonical.fields.iter().enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            fmt_param(f, bundle, field)?;
        }
        f.write_str(" }")?;
        let aliases: Vec<_> = decl.labels.iter().filter(|label| **label != decl.name).collect();
        if !aliases.is_empty() {
            let aliases: Vec<&str> = aliases.iter().map(|label| label.as_str()).collect();
            write!(f, " // also {}", aliases.join(", "))?;
        }
        writeln!(f)?;
    }

    if !bundle.entries.is_empty() {
        writeln!(f)?;
    }
    for entry in &bundle.entries {
        fmt_entry(f, bundle, entry)?;
        writeln!(f)?;
    }

    Ok(())
}

fn fmt_entry(
    f: &mut fmt::Formatter<'_>,
    bundle: &ResolvedBundle,
    entry: &ResolvedEntry,
) -> fmt::Result {
    let abi = &entry.entry;
    write!(f, "{}", abi.kind())?;
    if !entry.emitted_name.is_empty() {
        write!(f, " {}", entry.emitted_name)?;
    }
    if !matches!(abi, AbiEntry::Receive | AbiEntry::Fallback { .. }) {
        fmt_params(f, bundle, abi.inputs())?;
    }
    if let AbiEntry::Function(function) = abi {
        if !function.outputs.is_empty() {
            f.write_str(" returns ")?;
            fmt_params(f, bundle, &function.outputs)?;
        }
    }
    match abi {
        AbiEntry::Function(_) | AbiEntry::Constructor(_) | AbiEntry::Fallback { .. } => {
            if let Some(mutability) = abi.state_mutability() {
                write!(f, " {mutability}")?;
            }
        }
        AbiEntry::Event(event) if event.anonymous => f.write_str(" anonymous")?,
        _ => {}
    }

    f.write_str(" //")?;
    if let Some(selector) = entry.selector() {
        write!(f, " {selector}")?;
    }
    write!(f, " from {}", entry.origin)?;
    match entry.resolution {
        Some(ConflictResolution::RenameWithSuffix) => write!(f, ", renamed from {}", abi.name())?,
        Some(resolution) => write!(f, ", {resolution}")?,
        None => {}
    }
    if entry.declared_by.len() > 1 {
        write!(f, ", shared with {}", entry.declared_by[1..].join(", "))?;
    }
    Ok(())
}

fn fmt_params(
    f: &mut fmt::Formatter<'_>,
    bundle: &ResolvedBundle,
    params: &[Param<ResolvedType>],
) -> fmt::Result {
    f.write_str("(")?;
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        fmt_param(f, bundle, param)?;
    }
    f.write_str(")")
}

fn fmt_param(
    f: &mut fmt::Formatter<'_>,
    bundle: &ResolvedBundle,
    param: &Param<ResolvedType>,
) -> fmt::Result {
    f.write_str(&bundle.display_type(&param.ty))?;
    if param.indexed {
        f.write_str(" indexed")?;
    }
    if !param.name.is_empty() {
        write!(f, " {}", param.name)?;
    }
    Ok(())
}

/// Every composite used by an entry or a declared type must itself be declared.
fn check_declared(bundle: &ResolvedBundle) -> Result<(), EmitError> {
    let entry_params =
        bundle.entries.iter().flat_map(|e| e.entry.inputs().iter().chain(e.entry.outputs()));
    let field_params = bundle.types.iter().flat_map(|decl| decl.canonical.fields.iter());
    for param in entry_params.chain(field_params) {
        if let Some(canonical) = param.ty.innermost_composite() {
            if bundle.type_decl(canonical.id).is_none() {
                return Err(EmitError::UndeclaredType {
                    bundle: bundle.name.clone(),
                    id: canonical.id,
                });
            }
        }
    }
    Ok(())
}

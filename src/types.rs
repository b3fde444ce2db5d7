//! Core types shared across the state model, backends, and harness.

/// Serial: backend-owned version marker of a state snapshot
pub type Serial = u64;

/// ModulePath: nesting path of a module, e.g. `["root", "child"]`
pub type ModulePath = Vec<String>;

/// Build a module path from string slices
pub fn module_path(segments: &[&str]) -> ModulePath {
    segments.iter().map(|s| s.to_string()).collect()
}

//! Structural diff between two snapshots.
//!
//! Both sides are compared with the serial excluded; an empty diff means the
//! snapshots are content-equal.

use super::{ModuleState, StateSnapshot};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A single structural difference, expressed from the expected side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difference {
    MissingModule {
        path: String,
    },
    UnexpectedModule {
        path: String,
    },
    ModuleOrder {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    MissingOutput {
        path: String,
        key: String,
        expected: String,
    },
    UnexpectedOutput {
        path: String,
        key: String,
        actual: String,
    },
    OutputValue {
        path: String,
        key: String,
        expected: String,
        actual: String,
    },
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difference::MissingModule { path } => write!(f, "missing module {}", path),
            Difference::UnexpectedModule { path } => write!(f, "unexpected module {}", path),
            Difference::ModuleOrder { expected, actual } => write!(
                f,
                "module order differs: expected [{}], got [{}]",
                expected.join(", "),
                actual.join(", ")
            ),
            Difference::MissingOutput {
                path,
                key,
                expected,
            } => write!(
                f,
                "module {}: missing output {:?} (expected {:?})",
                path, key, expected
            ),
            Difference::UnexpectedOutput { path, key, actual } => write!(
                f,
                "module {}: unexpected output {:?} = {:?}",
                path, key, actual
            ),
            Difference::OutputValue {
                path,
                key,
                expected,
                actual,
            } => write!(
                f,
                "module {}: output {:?} expected {:?}, got {:?}",
                path, key, expected, actual
            ),
        }
    }
}

/// Ordered list of differences between an expected and an actual snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    pub differences: Vec<Difference>,
}

impl SnapshotDiff {
    /// Modules are paired by path and occurrence, so a path that appears
    /// twice on both sides pairs first-with-first and second-with-second.
    pub fn between(expected: &StateSnapshot, actual: &StateSnapshot) -> Self {
        let mut differences = Vec::new();

        let expected_keys = occurrence_keys(expected);
        let actual_keys = occurrence_keys(actual);
        let actual_by_key: HashMap<ModuleKey<'_>, &ModuleState> = actual_keys
            .iter()
            .copied()
            .zip(actual.modules.iter())
            .collect();
        let expected_set: HashSet<ModuleKey<'_>> = expected_keys.iter().copied().collect();

        for (key, module) in expected_keys.iter().zip(&expected.modules) {
            match actual_by_key.get(key) {
                Some(found) => diff_outputs(module, found, &mut differences),
                None => differences.push(Difference::MissingModule {
                    path: module.display_path(),
                }),
            }
        }

        for (key, module) in actual_keys.iter().zip(&actual.modules) {
            if !expected_set.contains(key) {
                differences.push(Difference::UnexpectedModule {
                    path: module.display_path(),
                });
            }
        }

        let expected_order =
            shared_order(expected, &expected_keys, |k| actual_by_key.contains_key(k));
        let actual_order = shared_order(actual, &actual_keys, |k| expected_set.contains(k));
        if expected_order != actual_order {
            differences.push(Difference::ModuleOrder {
                expected: expected_order.into_iter().map(|(_, path)| path).collect(),
                actual: actual_order.into_iter().map(|(_, path)| path).collect(),
            });
        }

        Self { differences }
    }

    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    pub fn len(&self) -> usize {
        self.differences.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Difference> {
        self.differences.iter()
    }
}

impl fmt::Display for SnapshotDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.differences.is_empty() {
            return write!(f, "  (no differences)");
        }
        for (i, difference) in self.differences.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {}", difference)?;
        }
        Ok(())
    }
}

/// Module path plus how many times it appeared earlier in the snapshot.
type ModuleKey<'a> = (&'a [String], usize);

fn occurrence_keys(state: &StateSnapshot) -> Vec<ModuleKey<'_>> {
    let mut counts: HashMap<&[String], usize> = HashMap::new();
    state
        .modules
        .iter()
        .map(|m| {
            let seen = counts.entry(m.path.as_slice()).or_insert(0);
            let key = (m.path.as_slice(), *seen);
            *seen += 1;
            key
        })
        .collect()
}

/// Keys of `from` that the other side also has, in `from`'s order.
fn shared_order<'a>(
    from: &'a StateSnapshot,
    keys: &[ModuleKey<'a>],
    shared: impl Fn(&ModuleKey<'a>) -> bool,
) -> Vec<(ModuleKey<'a>, String)> {
    keys.iter()
        .zip(&from.modules)
        .filter(|(key, _)| shared(*key))
        .map(|(key, module)| (*key, module.display_path()))
        .collect()
}

fn diff_outputs(expected: &ModuleState, actual: &ModuleState, out: &mut Vec<Difference>) {
    let path = expected.display_path();
    for (key, value) in &expected.outputs {
        match actual.outputs.get(key) {
            None => out.push(Difference::MissingOutput {
                path: path.clone(),
                key: key.clone(),
                expected: value.clone(),
            }),
            Some(found) if found != value => out.push(Difference::OutputValue {
                path: path.clone(),
                key: key.clone(),
                expected: value.clone(),
                actual: found.clone(),
            }),
            Some(_) => {}
        }
    }
    for (key, value) in &actual.outputs {
        if !expected.outputs.contains_key(key) {
            out.push(Difference::UnexpectedOutput {
                path: path.clone(),
                key: key.clone(),
                actual: value.clone(),
            });
        }
    }
}

//! Convention-based exclusion of config objects from a changelist.
//!
//! A config object whose name starts with the directive prefix (`ignore.` by
//! default) is a *directive*; the rest of its name is the *target*. Both are
//! pulled out of the changelist of their collection, and an [`ExclusionPair`]
//! is recorded so the staged artifacts can be hidden from the importer's own
//! full-tree validation.

use crate::changelist::{ChangeList, ChangeListComparer, ChangeOperation};
use crate::store::Collection;
use serde::Serialize;

/// A directive and its target, removed together from one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExclusionPair {
    /// The directive name, e.g. `ignore.system.site`.
    pub directive: String,

    /// The target name, e.g. `system.site`.
    pub target: String,

    /// Collection both names were removed from.
    pub collection: Collection,

    /// Bucket the directive was found in.
    pub operation: ChangeOperation,
}

impl ExclusionPair {
    /// The two names this pair hides, directive first.
    pub fn names(&self) -> [&str; 2] {
        [&self.directive, &self.target]
    }
}

/// Target of a directive name, or `None` if `name` is not a valid directive.
///
/// A name equal to the bare prefix has an empty target and is not a directive.
/// An empty prefix matches nothing.
pub fn directive_target<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    name.strip_prefix(prefix).filter(|target| !target.is_empty())
}

/// Resolves directives in a changelist through a [`ChangeListComparer`].
pub struct ExclusionResolver<'a, C: ChangeListComparer + ?Sized> {
    comparer: &'a C,
    prefix: String,
}

impl<'a, C: ChangeListComparer + ?Sized> ExclusionResolver<'a, C> {
    pub fn new(comparer: &'a C, prefix: impl Into<String>) -> Self {
        Self {
            comparer,
            prefix: prefix.into(),
        }
    }

    /// Prune every directive and its target from `changes`.
    ///
    /// Directives are taken from a snapshot of the input, so each one yields
    /// exactly one pair even if an earlier directive already removed it as its
    /// target. Directives with an empty target are left in place.
    pub fn resolve(&self, changes: ChangeList) -> (ChangeList, Vec<ExclusionPair>) {
        if self.prefix.is_empty() {
            log::debug!("no directive prefix configured; skipping exclusion");
            return (changes, Vec::new());
        }

        let directives: Vec<(Collection, ChangeOperation, String)> = changes
            .rows()
            .filter(|(_, _, name)| name.starts_with(&self.prefix))
            .map(|(collection, op, name)| (collection.clone(), op, name.to_string()))
            .collect();

        let mut pruned = changes;
        let mut pairs = Vec::new();

        for (collection, operation, directive) in directives {
            let Some(target) = directive_target(&directive, &self.prefix) else {
                log::warn!(
                    "'{}' in collection {} has no target name; leaving it in the changelist",
                    directive,
                    collection
                );
                continue;
            };
            let target = target.to_string();

            for name in [&directive, &target] {
                for op in ChangeOperation::ALL {
                    pruned = self.comparer.remove(pruned, &collection, op, name);
                }
            }

            log::info!(
                "excluding '{}' and '{}' from collection {}",
                directive,
                target,
                collection
            );

            pairs.push(ExclusionPair {
                directive,
                target,
                collection,
                operation,
            });
        }

        (pruned, pairs)
    }
}

//! The resolution pass assigning output strings.
//!
//! One level at a time, top-down:
//!
//! 1. rooted identifiers keep their mangled text unless another rooted
//!    identifier of the same scope mangles to the same text ignoring case,
//!    in which case all of them use their qualified form;
//! 2. child scopes get a candidate name the same way, then a `-1`, `-2`, …
//!    suffix while the candidate equals the first path segment of any name
//!    already placed at this level, and are resolved recursively under
//!    `<prefix><child>/`;
//! 3. at the root only, reserved identifiers take `TAG`, `TAG_1`, …;
//! 4. derived identifiers take `<base>/<QUAL>`, `<base>/<QUAL>1`, … in
//!    creation order.
//!
//! Steps 3 and 4 search for the first candidate not yet used anywhere in the
//! design. Nothing depends on previous results, so resolving twice yields the
//! same strings.

use crate::names::{NameId, NameKind, Names, ScopeId};
use log::{debug, trace};
use std::collections::{HashMap, HashSet};

/// Case-insensitive set of every output string placed so far.
type UsedNames = HashSet<String>;

impl Names {
    /// Assigns every identifier and child scope its output string.
    ///
    /// May be called again without new identifiers and produces identical
    /// output; creating identifiers afterwards panics.
    pub fn resolve(&mut self) {
        let mut used = UsedNames::new();
        let root = self.root();
        self.resolve_scope(root, "", &mut used);
        self.resolved = true;
        debug!(
            "resolved {} identifiers in {} scopes",
            self.names.len(),
            self.scopes.len()
        );
    }

    fn resolve_scope(&mut self, scope: ScopeId, prefix: &str, used: &mut UsedNames) {
        let rooted = self.scopes[scope].rooted_order.clone();
        let mut prefixes = HashSet::new();
        for (id, local) in rooted.iter().zip(self.local_names(&rooted)) {
            prefixes.insert(first_segment(&local).to_ascii_lowercase());
            self.commit(*id, format!("{prefix}{local}"), used);
        }

        let children = self.scopes[scope].child_order.clone();
        let scope_names: Vec<NameId> = children
            .iter()
            .filter_map(|&child| self.scopes[child].name)
            .collect();
        let candidates = self.local_names(&scope_names);
        for ((&child, &name), candidate) in children.iter().zip(&scope_names).zip(candidates) {
            let mut local = candidate.clone();
            let mut n = 1;
            while prefixes.contains(&local.to_ascii_lowercase())
                || used.contains(&format!("{prefix}{local}").to_ascii_lowercase())
            {
                local = format!("{candidate}-{n}");
                n += 1;
            }
            if local != candidate {
                debug!("scope {candidate} renamed to {local}: prefix already taken");
            }
            prefixes.insert(local.to_ascii_lowercase());
            let path = format!("{prefix}{local}");
            self.commit(name, path.clone(), used);
            self.resolve_scope(child, &format!("{path}/"), used);
        }

        if self.scopes[scope].parent.is_none() {
            for id in self.reserved_order.clone() {
                let tag = match &self.names[id].kind {
                    NameKind::Reserved { tag } => tag.clone(),
                    _ => continue,
                };
                let output = first_free(used, |n| match n {
                    0 => tag.clone(),
                    n => format!("{tag}_{n}"),
                });
                self.commit(id, output, used);
            }
        }

        for id in self.scopes[scope].derived.clone() {
            let stem = match &self.names[id].kind {
                NameKind::Derived {
                    base: Some(base),
                    qualifier,
                    ..
                } => format!("{}/{}", self.name(*base), qualifier),
                NameKind::Derived {
                    base: None,
                    qualifier,
                    ..
                } => qualifier.clone(),
                _ => continue,
            };
            let output = first_free(used, |n| match n {
                0 => stem.clone(),
                n => format!("{stem}{n}"),
            });
            self.commit(id, output, used);
        }
    }

    /// Local (unprefixed) names for a group of sibling rooted or scope
    /// identifiers.
    fn local_names(&self, ids: &[NameId]) -> Vec<String> {
        let mut spellings = Vec::with_capacity(ids.len());
        let mut counts: HashMap<String, usize> = HashMap::new();
        for &id in ids {
            let mangled = match &self.names[id].kind {
                NameKind::Rooted { mangled, .. } | NameKind::Scope { mangled, .. } => mangled,
                _ => continue,
            };
            *counts
                .entry(mangled.mangled.to_ascii_lowercase())
                .or_default() += 1;
            spellings.push(mangled);
        }
        spellings
            .into_iter()
            .map(|m| {
                let collides = counts
                    .get(&m.mangled.to_ascii_lowercase())
                    .is_some_and(|&count| count > 1);
                if self.qualify_all || collides {
                    m.qualified.clone()
                } else {
                    m.mangled.clone()
                }
            })
            .collect()
    }

    fn commit(&mut self, id: NameId, output: String, used: &mut UsedNames) {
        trace!("{} -> {}", self.describe(id), output);
        used.insert(output.to_ascii_lowercase());
        self.names[id].output = Some(output);
    }
}

fn first_free(used: &UsedNames, candidate: impl Fn(usize) -> String) -> String {
    let mut n = 0;
    loop {
        let name = candidate(n);
        if !used.contains(&name.to_ascii_lowercase()) {
            return name;
        }
        n += 1;
    }
}

fn first_segment(name: &str) -> &str {
    name.split('/').next().unwrap_or(name)
}

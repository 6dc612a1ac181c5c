//! The identifier and scope arena.

use crate::error::NamingError;
use crate::mangle::{mangle, Mangled};
use std::collections::HashMap;
use xnet_common::{define_id, Arena, InternalError, XnetResult};

define_id!(
    /// Opaque handle to an identifier in a [`Names`] arena.
    NameId
);
define_id!(
    /// Opaque handle to a scope in a [`Names`] arena.
    ScopeId
);

/// Reserved tag of the logic-high net.
pub const VCC: &str = "VCC";
/// Reserved tag of the logic-low net.
pub const GND: &str = "GND";
/// Reserved tag of the implicit clock of latches without an explicit clock.
pub const GCLK: &str = "GCLK";

/// What an identifier was created from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NameKind {
    /// A source-language identifier, local to `scope`.
    Rooted {
        /// The scope owning the identifier.
        scope: ScopeId,
        /// The source text as given.
        source: String,
        /// Mangled spellings of `source`.
        mangled: Mangled,
    },
    /// The name of a child scope, itself rooted in the parent scope.
    Scope {
        /// The named scope.
        scope: ScopeId,
        /// The source text as given.
        source: String,
        /// Mangled spellings of `source`.
        mangled: Mangled,
    },
    /// A scratch net anchored to another identifier, or to a scope.
    Derived {
        /// The identifier the output name is built from, or `None` for the
        /// root scope, whose path is empty.
        base: Option<NameId>,
        /// The scope that resolves this identifier.
        owner: ScopeId,
        /// Qualifier tag matching `[A-Z0-9_]+`.
        qualifier: String,
    },
    /// A design-wide well-known net.
    Reserved {
        /// Tag matching `[A-Z0-9]+`.
        tag: String,
    },
}

#[derive(Debug)]
pub(crate) struct NameEntry {
    pub(crate) kind: NameKind,
    pub(crate) output: Option<String>,
}

#[derive(Debug)]
pub(crate) struct Scope {
    pub(crate) parent: Option<ScopeId>,
    pub(crate) name: Option<NameId>,
    pub(crate) rooted: HashMap<String, NameId>,
    pub(crate) rooted_order: Vec<NameId>,
    pub(crate) derived: Vec<NameId>,
    pub(crate) children: HashMap<String, ScopeId>,
    pub(crate) child_order: Vec<ScopeId>,
    pub(crate) ports: HashMap<String, String>,
}

impl Scope {
    fn new(parent: Option<ScopeId>, ports: HashMap<String, String>) -> Self {
        Self {
            parent,
            name: None,
            rooted: HashMap::new(),
            rooted_order: Vec::new(),
            derived: Vec::new(),
            children: HashMap::new(),
            child_order: Vec::new(),
            ports,
        }
    }
}

/// Arena of every identifier and scope of one translation run.
///
/// Identifiers are created during lowering and receive their output strings
/// from a single [`resolve`](Names::resolve) call afterwards. Creating a new
/// identifier once the tree has been resolved is a programming error and
/// panics; looking up one that already exists is fine.
#[derive(Debug)]
pub struct Names {
    pub(crate) names: Arena<NameId, NameEntry>,
    pub(crate) scopes: Arena<ScopeId, Scope>,
    pub(crate) reserved: HashMap<String, NameId>,
    pub(crate) reserved_order: Vec<NameId>,
    pub(crate) qualify_all: bool,
    pub(crate) resolved: bool,
    root: ScopeId,
}

impl Names {
    /// Creates an arena holding only the root scope.
    ///
    /// With `qualify_all`, every rooted identifier gets its qualifier appended,
    /// which makes output names independent of which other names exist.
    pub fn new(qualify_all: bool) -> Self {
        let mut scopes = Arena::new();
        let root = scopes.alloc(Scope::new(None, HashMap::new()));
        Self {
            names: Arena::new(),
            scopes,
            reserved: HashMap::new(),
            reserved_order: Vec::new(),
            qualify_all,
            resolved: false,
            root,
        }
    }

    /// Returns the root scope.
    pub fn root(&self) -> ScopeId {
        self.root
    }

    /// Returns whether every rooted identifier is qualified.
    pub fn qualify_all(&self) -> bool {
        self.qualify_all
    }

    /// Returns the parent of `scope`, or `None` for the root.
    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope].parent
    }

    /// Returns the identifier naming `scope` in its parent, or `None` for the root.
    pub fn scope_name(&self, scope: ScopeId) -> Option<NameId> {
        self.scopes[scope].name
    }

    /// Returns how `id` was created.
    pub fn kind(&self, id: NameId) -> &NameKind {
        &self.names[id].kind
    }

    /// Returns the identifier for source text `source` in `scope`.
    ///
    /// Port names of `scope` resolve to the aliased identifier of the parent
    /// scope instead. Repeated calls with the same text return the same
    /// identifier.
    pub fn rooted(&mut self, scope: ScopeId, source: &str) -> Result<NameId, NamingError> {
        if let Some(target) = self.scopes[scope].ports.get(source) {
            let target = target.clone();
            if let Some(parent) = self.scopes[scope].parent {
                return self.rooted(parent, &target);
            }
        }
        if let Some(&id) = self.scopes[scope].rooted.get(source) {
            return Ok(id);
        }

        let mangled = mangle(source)?;
        self.assert_unresolved();
        let id = self.names.alloc(NameEntry {
            kind: NameKind::Rooted {
                scope,
                source: source.to_string(),
                mangled,
            },
            output: None,
        });
        let entry = &mut self.scopes[scope];
        entry.rooted.insert(source.to_string(), id);
        entry.rooted_order.push(id);
        Ok(id)
    }

    /// Returns the child scope `name` of `parent`, creating it if needed.
    ///
    /// `ports` maps local source names to source names in `parent`; it is only
    /// consulted when the scope is created.
    pub fn scope<I, K, V>(
        &mut self,
        parent: ScopeId,
        name: &str,
        ports: I,
    ) -> Result<ScopeId, NamingError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        if let Some(&child) = self.scopes[parent].children.get(name) {
            return Ok(child);
        }

        let mangled = mangle(name)?;
        self.assert_unresolved();
        let ports = ports
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let child = self.scopes.alloc(Scope::new(Some(parent), ports));
        let id = self.names.alloc(NameEntry {
            kind: NameKind::Scope {
                scope: child,
                source: name.to_string(),
                mangled,
            },
            output: None,
        });
        self.scopes[child].name = Some(id);
        let entry = &mut self.scopes[parent];
        entry.children.insert(name.to_string(), child);
        entry.child_order.push(child);
        Ok(child)
    }

    /// Creates a fresh derived identifier `<base>/<qualifier>`.
    ///
    /// Every call creates a distinct identifier; duplicates are numbered
    /// during resolution. A scope identifier as `base` places the new name
    /// inside that scope.
    ///
    /// # Panics
    ///
    /// Panics if `qualifier` does not match `[A-Z0-9_]+` or if the tree has
    /// already been resolved.
    pub fn derived(&mut self, base: NameId, qualifier: &str) -> NameId {
        let owner = match &self.names[base].kind {
            NameKind::Rooted { scope, .. } => *scope,
            NameKind::Scope { scope, .. } => *scope,
            NameKind::Derived { owner, .. } => *owner,
            NameKind::Reserved { .. } => self.root,
        };
        self.push_derived(Some(base), owner, qualifier)
    }

    /// Creates a fresh derived identifier inside `scope`, based on the
    /// scope's own name. In the root scope the output is the bare qualifier.
    ///
    /// # Panics
    ///
    /// Same conditions as [`derived`](Names::derived).
    pub fn scope_derived(&mut self, scope: ScopeId, qualifier: &str) -> NameId {
        let base = self.scopes[scope].name;
        self.push_derived(base, scope, qualifier)
    }

    fn push_derived(&mut self, base: Option<NameId>, owner: ScopeId, qualifier: &str) -> NameId {
        assert!(
            is_tag(qualifier, true),
            "illegal derived qualifier {qualifier:?}"
        );
        self.assert_unresolved();
        let id = self.names.alloc(NameEntry {
            kind: NameKind::Derived {
                base,
                owner,
                qualifier: qualifier.to_string(),
            },
            output: None,
        });
        self.scopes[owner].derived.push(id);
        id
    }

    /// Returns the design-wide reserved identifier for `tag`.
    ///
    /// # Panics
    ///
    /// Panics if `tag` does not match `[A-Z0-9]+`, or if it is requested for
    /// the first time after resolution.
    pub fn reserved(&mut self, tag: &str) -> NameId {
        if let Some(&id) = self.reserved.get(tag) {
            return id;
        }
        assert!(is_tag(tag, false), "illegal reserved tag {tag:?}");
        self.assert_unresolved();
        let id = self.names.alloc(NameEntry {
            kind: NameKind::Reserved {
                tag: tag.to_string(),
            },
            output: None,
        });
        self.reserved.insert(tag.to_string(), id);
        self.reserved_order.push(id);
        id
    }

    /// Returns whether the reserved identifier `tag` was ever requested.
    pub fn has_reserved(&self, tag: &str) -> bool {
        self.reserved.contains_key(tag)
    }

    /// Returns whether [`resolve`](Names::resolve) has run.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Returns the resolved output string of `id`.
    ///
    /// # Panics
    ///
    /// Panics if the tree has not been resolved yet.
    pub fn name(&self, id: NameId) -> &str {
        match self.names[id].output.as_deref() {
            Some(output) => output,
            None => panic!("identifier {} used before resolution", self.describe(id)),
        }
    }

    /// Returns the resolved output string of `id`, or an internal error if the
    /// tree has not been resolved yet.
    pub fn try_name(&self, id: NameId) -> XnetResult<&str> {
        self.names[id].output.as_deref().ok_or_else(|| {
            InternalError::new(format!(
                "identifier {} used before resolution",
                self.describe(id)
            ))
        })
    }

    /// Renders `id` for messages, whether or not it has been resolved.
    ///
    /// Uses source text and scope paths, not output strings.
    pub fn describe(&self, id: NameId) -> String {
        match &self.names[id].kind {
            NameKind::Rooted { scope, source, .. } => self.describe_in(*scope, source),
            NameKind::Scope { scope, source, .. } => match self.scopes[*scope].parent {
                Some(parent) => self.describe_in(parent, source),
                None => source.clone(),
            },
            NameKind::Derived {
                base, qualifier, ..
            } => match base {
                Some(base) => format!("{}/{}", self.describe(*base), qualifier),
                None => qualifier.clone(),
            },
            NameKind::Reserved { tag } => tag.clone(),
        }
    }

    fn describe_in(&self, scope: ScopeId, source: &str) -> String {
        match self.scopes[scope].name {
            Some(name) => format!("{}/{}", self.describe(name), source),
            None => source.to_string(),
        }
    }

    /// Returns the number of identifiers created so far.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no identifier has been created.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn assert_unresolved(&self) {
        assert!(!self.resolved, "identifier created after resolution");
    }
}

/// Checks tag syntax: `[A-Z0-9]+`, plus `_` if `underscore` is set.
fn is_tag(tag: &str, underscore: bool) -> bool {
    !tag.is_empty()
        && tag
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || (underscore && b == b'_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rooted_is_interned_per_scope() {
        let mut names = Names::new(false);
        let root = names.root();
        let a = names.rooted(root, "clk").unwrap();
        let b = names.rooted(root, "clk").unwrap();
        let c = names.rooted(root, "CLK").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let child = names.scope(root, "sub", Vec::<(String, String)>::new()).unwrap();
        let d = names.rooted(child, "clk").unwrap();
        assert_ne!(a, d);
    }

    #[test]
    fn ports_alias_parent_names() {
        let mut names = Names::new(false);
        let root = names.root();
        let child = names.scope(root, "counter", [("q", "count"), ("clk", "clk")]).unwrap();
        let q = names.rooted(child, "q").unwrap();
        let count = names.rooted(root, "count").unwrap();
        assert_eq!(q, count);
        let clk = names.rooted(child, "clk").unwrap();
        assert_eq!(clk, names.rooted(root, "clk").unwrap());
    }

    #[test]
    fn scope_is_interned() {
        let mut names = Names::new(false);
        let root = names.root();
        let a = names.scope(root, "m", [("a", "a")]).unwrap();
        let b = names.scope(root, "m", Vec::<(String, String)>::new()).unwrap();
        assert_eq!(a, b);
        assert_eq!(names.parent(a), Some(root));
        assert!(names.scope_name(a).is_some());
        assert!(names.scope_name(root).is_none());
    }

    #[test]
    fn reserved_is_shared() {
        let mut names = Names::new(false);
        assert!(!names.has_reserved(VCC));
        let a = names.reserved(VCC);
        let b = names.reserved(VCC);
        assert_eq!(a, b);
        assert!(names.has_reserved(VCC));
        assert!(!names.has_reserved(GND));
    }

    #[test]
    fn derived_is_always_fresh() {
        let mut names = Names::new(false);
        let base = names.rooted(names.root(), "x").unwrap();
        let a = names.derived(base, "AND");
        let b = names.derived(base, "AND");
        assert_ne!(a, b);
    }

    #[test]
    fn derived_lives_in_base_scope() {
        let mut names = Names::new(false);
        let root = names.root();
        let child = names.scope(root, "m", Vec::<(String, String)>::new()).unwrap();
        let x = names.rooted(child, "x").unwrap();
        let d = names.derived(x, "INV");
        let dd = names.derived(d, "BUF");
        for id in [d, dd] {
            match names.kind(id) {
                NameKind::Derived { owner, .. } => assert_eq!(*owner, child),
                other => panic!("unexpected kind {other:?}"),
            }
        }
        let vcc = names.reserved(VCC);
        let inv = names.derived(vcc, "INV");
        match names.kind(inv) {
            NameKind::Derived { owner, .. } => assert_eq!(*owner, root),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn describe_uses_source_paths() {
        let mut names = Names::new(false);
        let root = names.root();
        let child = names.scope(root, "top", Vec::<(String, String)>::new()).unwrap();
        let x = names.rooted(child, "data[3]").unwrap();
        let d = names.derived(x, "PROD");
        assert_eq!(names.describe(x), "top/data[3]");
        assert_eq!(names.describe(d), "top/data[3]/PROD");
        let osc = names.scope_derived(root, "OSC1");
        let gclk = names.reserved(GCLK);
        assert_eq!(names.describe(osc), "OSC1");
        assert_eq!(names.describe(gclk), "GCLK");
    }

    #[test]
    fn invalid_identifier_is_an_error() {
        let mut names = Names::new(false);
        let root = names.root();
        assert!(names.rooted(root, "a b").is_err());
        assert!(names.scope(root, "", Vec::<(String, String)>::new()).is_err());
        assert!(names.is_empty());
    }

    #[test]
    fn try_name_before_resolution_is_internal_error() {
        let mut names = Names::new(false);
        let x = names.rooted(names.root(), "x").unwrap();
        let err = names.try_name(x).unwrap_err();
        assert!(err.message.contains("before resolution"));
    }

    #[test]
    #[should_panic(expected = "before resolution")]
    fn name_before_resolution_panics() {
        let mut names = Names::new(false);
        let x = names.rooted(names.root(), "x").unwrap();
        let _ = names.name(x);
    }

    #[test]
    #[should_panic(expected = "illegal derived qualifier")]
    fn lowercase_qualifier_panics() {
        let mut names = Names::new(false);
        let x = names.rooted(names.root(), "x").unwrap();
        names.derived(x, "and");
    }

    #[test]
    #[should_panic(expected = "illegal reserved tag")]
    fn underscore_in_reserved_tag_panics() {
        let mut names = Names::new(false);
        names.reserved("VCC_1");
    }

    #[test]
    #[should_panic(expected = "created after resolution")]
    fn creating_after_resolution_panics() {
        let mut names = Names::new(false);
        let root = names.root();
        names.rooted(root, "a").unwrap();
        names.resolve();
        let _ = names.rooted(root, "b");
    }

    #[test]
    fn lookup_after_resolution_is_fine() {
        let mut names = Names::new(false);
        let root = names.root();
        let a = names.rooted(root, "a").unwrap();
        let gnd = names.reserved(GND);
        names.resolve();
        assert_eq!(names.rooted(root, "a").unwrap(), a);
        assert_eq!(names.reserved(GND), gnd);
    }
}

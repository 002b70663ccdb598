//! Module, package and file containers.
//!
//! A [`Module`] owns everything: flat arenas of packages, files and nodes,
//! addressed by `la_arena` indices. Packages and files are ordered by name so
//! every traversal is deterministic. After [`ModuleBuilder::build`] the module
//! is immutable and can be shared across threads.
//!
//! [`ModuleBuilder::build`]: crate::builder::ModuleBuilder::build

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use goaster_syntax::ParsedFile;
use la_arena::{Arena, Idx};

use crate::error::AsterError;
use crate::kind::Kind;
use crate::node::{Node, NodeId, NodeRef};

pub type PackageId = Idx<Package>;
pub type FileId = Idx<File>;

/// One entry of an import declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Local identifier: the alias, `_`, `.`, or the last path segment.
    pub name: String,
    /// Import path without quotes.
    pub path: String,
    pub doc: String,
}

#[derive(Debug)]
pub struct Package {
    pub name: String,
    /// Directory the package was loaded from; `None` for in-memory sources.
    pub dir: Option<PathBuf>,
    /// Filename to file.
    pub files: BTreeMap<String, FileId>,
    /// Imports of all files, keyed by local name. The first file (in load
    /// order) to import a name wins.
    pub imports: BTreeMap<String, Import>,
    /// Top-level type and function names across all files. Methods are not
    /// in scope; they hang off their receiver's type node.
    pub scope: HashMap<String, NodeId>,
}

#[derive(Debug)]
pub struct File {
    pub package: PackageId,
    pub filename: String,
    /// Path the file was read from; `None` for in-memory sources.
    pub path: Option<PathBuf>,
    pub parsed: ParsedFile,
    pub imports: Vec<Import>,
    /// Declaration start offset to node, in source order.
    pub nodes: BTreeMap<u32, NodeId>,
}

/// The semantic model of a set of Go packages.
#[derive(Debug, Default)]
pub struct Module {
    pub(crate) dir: Option<PathBuf>,
    pub(crate) packages: BTreeMap<String, PackageId>,
    pub(crate) package_arena: Arena<Package>,
    pub(crate) files: Arena<File>,
    pub(crate) nodes: Arena<Node>,
    pub(crate) diagnostics: Vec<AsterError>,
}

impl Module {
    /// Directory passed to [`Module::load`], if any.
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Packages in name order.
    pub fn packages(&self) -> impl Iterator<Item = PackageRef<'_>> {
        self.packages
            .values()
            .map(move |&id| PackageRef { module: self, id })
    }

    pub fn package(&self, name: &str) -> Option<PackageRef<'_>> {
        let id = *self.packages.get(name)?;
        Some(PackageRef { module: self, id })
    }

    /// Finds a top-level type or function by package and name.
    pub fn lookup(&self, pkg: &str, name: &str) -> Option<NodeRef<'_>> {
        self.package(pkg)?.lookup(name)
    }

    /// # Panics
    /// Panics if `id` belongs to another module.
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef::new(self, id)
    }

    /// Every node in creation order, interface methods included.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.nodes.iter().map(move |(id, _)| NodeRef::new(self, id))
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes left in `Suspense`: cyclic, imported or undeclared referents.
    pub fn unresolved(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.nodes().filter(|n| n.kind() == Kind::Suspense)
    }

    /// Non-fatal problems found while resolving methods.
    pub fn diagnostics(&self) -> &[AsterError] {
        &self.diagnostics
    }

    pub fn file(&self, id: FileId) -> FileRef<'_> {
        FileRef { module: self, id }
    }
}

/// Borrowed handle to a package.
#[derive(Debug, Clone, Copy)]
pub struct PackageRef<'m> {
    module: &'m Module,
    id: PackageId,
}

impl<'m> PackageRef<'m> {
    #[inline]
    pub fn id(&self) -> PackageId {
        self.id
    }

    #[inline]
    pub fn data(&self) -> &'m Package {
        &self.module.package_arena[self.id]
    }

    pub fn name(&self) -> &'m str {
        &self.data().name
    }

    pub fn dir(&self) -> Option<&'m Path> {
        self.data().dir.as_deref()
    }

    /// Files in filename order.
    pub fn files(&self) -> impl Iterator<Item = FileRef<'m>> + 'm {
        let module = self.module;
        self.data()
            .files
            .values()
            .map(move |&id| FileRef { module, id })
    }

    pub fn file(&self, filename: &str) -> Option<FileRef<'m>> {
        let id = *self.data().files.get(filename)?;
        Some(FileRef {
            module: self.module,
            id,
        })
    }

    pub fn imports(&self) -> &'m BTreeMap<String, Import> {
        &self.data().imports
    }

    pub fn lookup(&self, name: &str) -> Option<NodeRef<'m>> {
        let id = *self.data().scope.get(name)?;
        Some(NodeRef::new(self.module, id))
    }

    /// Top-level declarations, methods included, in file then source order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'m>> + 'm {
        self.files().flat_map(|f| f.nodes())
    }
}

/// Borrowed handle to a file.
#[derive(Debug, Clone, Copy)]
pub struct FileRef<'m> {
    module: &'m Module,
    id: FileId,
}

impl<'m> FileRef<'m> {
    #[inline]
    pub fn id(&self) -> FileId {
        self.id
    }

    #[inline]
    pub fn data(&self) -> &'m File {
        &self.module.files[self.id]
    }

    pub fn filename(&self) -> &'m str {
        &self.data().filename
    }

    pub fn path(&self) -> Option<&'m Path> {
        self.data().path.as_deref()
    }

    pub fn package_name(&self) -> &'m str {
        &self.module.package_arena[self.data().package].name
    }

    pub fn source(&self) -> &'m str {
        &self.data().parsed.source
    }

    pub fn parsed(&self) -> &'m ParsedFile {
        &self.data().parsed
    }

    pub fn imports(&self) -> &'m [Import] {
        &self.data().imports
    }

    /// Top-level declarations in source order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'m>> + 'm {
        let module = self.module;
        self.data()
            .nodes
            .values()
            .map(move |&id| NodeRef::new(module, id))
    }

    /// The declaration registered at byte offset `pos`.
    pub fn node_at(&self, pos: u32) -> Option<NodeRef<'m>> {
        let id = *self.data().nodes.get(&pos)?;
        Some(NodeRef::new(self.module, id))
    }
}

//! Rendering the model back to Go source and writing it out.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use goaster_syntax::printer::{print_file, print_func_decl, print_signature, print_type_decl};
use tracing::{debug, instrument};

use crate::error::{AsterError, Result};
use crate::model::{FileRef, Module, PackageRef};
use crate::node::{NodeId, NodeRef, Origin};

/// Writes each `(path, text)` pair in order, creating parent directories.
///
/// Stops at the first failure: files written before it stay on disk, files
/// after it are not touched.
#[instrument(level = "debug", skip_all)]
pub fn write_batch<I>(entries: I) -> Result<()>
where
    I: IntoIterator<Item = (PathBuf, String)>,
{
    for (path, text) in entries {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AsterError::io(parent, e))?;
        }
        fs::write(&path, text).map_err(|e| AsterError::io(&path, e))?;
        debug!(path = %path.display(), "stored");
    }
    Ok(())
}

impl NodeRef<'_> {
    /// Source text of the declaration, doc comment included.
    pub fn format(&self) -> String {
        let module = self.module();
        let file = &module.files[self.node().header.file];
        let pf = &file.parsed;
        match self.node().origin {
            Origin::Type { spec, decl_doc } => print_type_decl(pf, &spec, decl_doc),
            Origin::Func(id) => print_func_decl(pf, id),
            Origin::InterfaceMethod(sig) => {
                let mut out = String::new();
                for line in self.doc().lines() {
                    if line.is_empty() {
                        out.push_str("//\n");
                    } else {
                        out.push_str("// ");
                        out.push_str(line);
                        out.push('\n');
                    }
                }
                out.push_str(self.name());
                out.push_str(&print_signature(pf, sig));
                out.push('\n');
                out
            }
        }
    }
}

impl FileRef<'_> {
    pub fn format(&self) -> String {
        print_file(self.parsed())
    }

    /// Writes the file to `dir/<filename>`.
    pub fn store(&self, dir: &Path) -> Result<()> {
        write_batch([(dir.join(self.filename()), self.format())])
    }
}

impl PackageRef<'_> {
    /// Filename to rendered text.
    pub fn format(&self) -> BTreeMap<String, String> {
        self.files()
            .map(|f| (f.filename().to_owned(), f.format()))
            .collect()
    }

    /// Writes every file to `dir/<filename>`, in filename order.
    pub fn store(&self, dir: &Path) -> Result<()> {
        write_batch(
            self.format()
                .into_iter()
                .map(|(name, text)| (dir.join(name), text)),
        )
    }
}

impl Module {
    /// Package name to filename to rendered text.
    pub fn format(&self) -> BTreeMap<String, BTreeMap<String, String>> {
        self.packages()
            .map(|p| (p.name().to_owned(), p.format()))
            .collect()
    }

    pub fn format_node(&self, id: NodeId) -> String {
        self.node(id).format()
    }

    /// Writes every file to `root/<package>/<filename>`, in package then
    /// filename order.
    #[instrument(level = "debug", skip_all, fields(root = %root.display()))]
    pub fn store(&self, root: &Path) -> Result<()> {
        write_batch(self.format().into_iter().flat_map(|(pkg, files)| {
            let dir = root.join(pkg);
            files
                .into_iter()
                .map(move |(name, text)| (dir.join(name), text))
        }))
    }
}

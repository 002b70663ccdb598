//! Loading a directory of Go files.

use std::fmt;
use std::io;
use std::path::Path;

use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::builder::ModuleBuilder;
use crate::error::{AsterError, Result};
use crate::model::Module;

/// Which files [`Module::load`] picks up.
///
/// By default every `*.go` file directly inside the directory except
/// `_test.go` files.
#[derive(Clone, Copy, Default)]
pub struct LoadConfig {
    pub include_tests: bool,
    /// Extra predicate applied after the built-in rules.
    pub filter: Option<fn(&Path) -> bool>,
}

impl LoadConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_tests(mut self, yes: bool) -> Self {
        self.include_tests = yes;
        self
    }

    pub fn filter(mut self, f: fn(&Path) -> bool) -> Self {
        self.filter = Some(f);
        self
    }

    pub fn accepts(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if !name.ends_with(".go") || name.starts_with('.') {
            return false;
        }
        if name.ends_with("_test.go") && !self.include_tests {
            return false;
        }
        self.filter.map_or(true, |f| f(path))
    }
}

impl fmt::Debug for LoadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadConfig")
            .field("include_tests", &self.include_tests)
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

impl Module {
    /// Parses every accepted file of `dir` (not recursing) and builds the
    /// module. Files are read in name order. I/O and syntax errors abort the
    /// load.
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub fn load(dir: &Path, config: &LoadConfig) -> Result<Module> {
        let mut builder = ModuleBuilder::new();
        builder.set_dir(dir);

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                AsterError::io(path, io::Error::from(e))
            })?;
            if !entry.file_type().is_file() || !config.accepts(entry.path()) {
                continue;
            }
            debug!(file = %entry.path().display(), "loading");
            builder.add_file(entry.path())?;
        }

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_skips_tests_and_non_go_files() {
        let cfg = LoadConfig::new();
        assert!(cfg.accepts(Path::new("dir/a.go")));
        assert!(!cfg.accepts(Path::new("dir/a_test.go")));
        assert!(!cfg.accepts(Path::new("dir/README.md")));
        assert!(!cfg.accepts(Path::new("dir/.hidden.go")));
        assert!(cfg.include_tests(true).accepts(Path::new("a_test.go")));
    }

    #[test]
    fn filter_runs_after_builtin_rules() {
        fn no_gen(p: &Path) -> bool {
            !p.to_string_lossy().contains("generated")
        }
        let cfg = LoadConfig::new().filter(no_gen);
        assert!(cfg.accepts(Path::new("a.go")));
        assert!(!cfg.accepts(Path::new("zz_generated.go")));
        assert_eq!(format!("{cfg:?}"), "LoadConfig { include_tests: false, filter: true }");
    }
}

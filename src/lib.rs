//! Static semantic model over Go declarations.
//!
//! - Every type spec, function and method of a set of Go files becomes a
//!   node with a [`Kind`]. Names of other declarations in the same package
//!   are resolved by a fixpoint over a worklist; what cannot be resolved
//!   stays [`Kind::Suspense`].
//! - Methods are attached to their receiver types, and interfaces absorb
//!   the methods of the interfaces they embed.
//! - Nodes answer reflection-style queries (fields, methods, parameters,
//!   interface satisfaction) through [`NodeRef`].
//! - The model renders back to Go source and can be written to disk.
//!
//! ```no_run
//! use goaster::{LoadConfig, Module};
//! # fn main() -> Result<(), goaster::AsterError> {
//! let module = Module::load("./shapes".as_ref(), &LoadConfig::default())?;
//! let shape = module.lookup("shapes", "Shape").expect("Shape");
//! let circle = module.lookup("shapes", "Circle").expect("Circle");
//! assert!(circle.implements(shape)?);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod format;
mod implements;
pub mod kind;
pub mod loader;
mod methods;
pub mod model;
pub mod node;
pub mod reflect;

pub use goaster_syntax as syntax;

// Re-exports for convenience
pub use builder::ModuleBuilder;
pub use error::{AsterError, Result};
pub use kind::Kind;
pub use loader::LoadConfig;
pub use model::{File, FileId, FileRef, Import, Module, Package, PackageId, PackageRef};
pub use node::{FuncRef, Node, NodeBody, NodeHeader, NodeId, NodeRef, TypeData, TypeRef};
pub use reflect::{FuncData, FuncField, StructField};

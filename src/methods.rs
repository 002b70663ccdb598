//! Method set resolution.
//!
//! Methods are declared as free-standing functions with a receiver. Once
//! every type is classified, each such function is attached to the type
//! node its receiver names. Attachment runs over packages, files and
//! declarations in name and source order, so when a method is declared
//! twice the first declaration deterministically wins.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, warn};

use crate::error::{AsterError, Result};
use crate::kind::Kind;
use crate::model::Module;
use crate::node::NodeId;

/// Interface node to the same-package interfaces it embeds, in
/// declaration order.
pub(crate) type EmbedEdges = HashMap<NodeId, Vec<NodeId>>;

impl Module {
    /// Adds `method` to the method set of `target`.
    ///
    /// Fails with [`AsterError::DuplicateMethod`] when the name is taken (the
    /// existing method stays) and with [`AsterError::ReceiverMismatch`] when
    /// `method` has no receiver, its receiver names a different type, or
    /// `target` cannot carry methods: function, interface and pointer kinds.
    ///
    /// # Panics
    /// Panics if `method` is not a func node.
    pub fn attach_method(&mut self, target: NodeId, method: NodeId) -> Result<()> {
        let m = &self.nodes[method];
        let Some(func) = m.as_func() else {
            panic!("aster: Kind must be Func, got {} ({})", m.kind(), m.name());
        };
        let method_name = m.header.name.clone();
        let method_pkg = self.files[m.header.file].package;
        let mismatch = |receiver: String, reason: &'static str| AsterError::ReceiverMismatch {
            method: method_name.clone(),
            receiver,
            reason,
        };
        let Some(recv) = func.recv.as_ref() else {
            return Err(mismatch(String::new(), "function has no receiver"));
        };
        let receiver = if recv.pointer {
            format!("*{}", recv.type_name)
        } else {
            recv.type_name.clone()
        };

        let t = &self.nodes[target];
        if base_type_name(&recv.type_name) != t.header.name {
            return Err(mismatch(receiver, "receiver names a different type"));
        }
        if self.files[t.header.file].package != method_pkg {
            return Err(mismatch(receiver, "receiver type is declared in another package"));
        }

        let t = &mut self.nodes[target];
        let reason = match t.header.kind {
            Kind::Func => Some("receiver base type is a function type"),
            Kind::Interface => Some("receiver base type is an interface"),
            Kind::Ptr => Some("receiver base type is a pointer type"),
            _ => None,
        };
        let type_name = t.header.name.clone();
        let data = match (reason, t.type_data_mut()) {
            (None, Some(data)) => data,
            (reason, _) => {
                return Err(AsterError::ReceiverMismatch {
                    method: method_name,
                    receiver,
                    reason: reason.unwrap_or("receiver base type is a function type"),
                });
            }
        };

        if data.methods.contains_key(&method_name) {
            return Err(AsterError::DuplicateMethod {
                type_name,
                method: method_name,
            });
        }
        debug!(%type_name, method = %method_name, %receiver, "method attached");
        data.methods.insert(method_name, method);
        Ok(())
    }
}

/// Receiver type name without type arguments: `List[T]` is `List`. The
/// leading `*` is already split off into [`FuncField::pointer`].
///
/// [`FuncField::pointer`]: crate::reflect::FuncField::pointer
fn base_type_name(type_name: &str) -> &str {
    type_name.split('[').next().unwrap_or_default().trim()
}

/// Attaches every method declaration to its receiver's type. Failures are
/// logged and recorded as module diagnostics; they never stop resolution.
pub(crate) fn resolve_receivers(module: &mut Module) {
    let mut work = Vec::new();
    for &pkg in module.packages.values() {
        for &file in module.package_arena[pkg].files.values() {
            for &id in module.files[file].nodes.values() {
                let Some(recv) = module.nodes[id].as_func().and_then(|f| f.recv.as_ref()) else {
                    continue;
                };
                work.push((pkg, id, base_type_name(&recv.type_name).to_owned()));
            }
        }
    }

    for (pkg, method, base) in work {
        let result = match module.package_arena[pkg].scope.get(&base) {
            Some(&target) => module.attach_method(target, method),
            None => Err(AsterError::ReceiverMismatch {
                method: module.nodes[method].header.name.clone(),
                receiver: base,
                reason: "receiver base type is not declared in this package",
            }),
        };
        if let Err(err) = result {
            warn!(%err, "method not attached");
            module.diagnostics.push(err);
        }
    }
}

/// Gives each interface the methods of the interfaces it embeds,
/// transitively. Declared methods win over embedded ones; among embedded
/// interfaces the first in declaration order wins.
pub(crate) fn flatten_interfaces(module: &mut Module, edges: &EmbedEdges) {
    let mut flattened = Vec::with_capacity(edges.len());

    // Everything is computed from the declared method sets before any of
    // them is replaced.
    for (&iface, embeds) in edges {
        let Some(own) = module.nodes[iface].as_type() else {
            continue;
        };
        let mut methods: BTreeMap<String, NodeId> = own.methods.clone();
        let mut seen = HashSet::from([iface]);
        let mut stack: Vec<NodeId> = embeds.iter().rev().copied().collect();

        while let Some(next) = stack.pop() {
            if !seen.insert(next) {
                continue;
            }
            let node = &module.nodes[next];
            if node.kind() != Kind::Interface {
                debug!(iface = %module.nodes[iface].name(), embedded = %node.name(), kind = %node.kind(), "embedded type is not an interface");
                continue;
            }
            if let Some(t) = node.as_type() {
                for (name, &m) in &t.methods {
                    methods.entry(name.clone()).or_insert(m);
                }
            }
            if let Some(more) = edges.get(&next) {
                stack.extend(more.iter().rev().copied());
            }
        }
        flattened.push((iface, methods));
    }

    for (iface, methods) in flattened {
        if let Some(t) = module.nodes[iface].type_data_mut() {
            t.methods = methods;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::ModuleBuilder;
    use crate::error::AsterError;
    use crate::model::Module;

    fn build(src: &str) -> Module {
        let mut b = ModuleBuilder::new();
        b.add_source("a.go", src).expect("add source");
        b.build()
    }

    #[test]
    fn pointer_and_value_receivers_share_a_set() {
        let m = build("package p\ntype T struct{}\nfunc (t T) A() {}\nfunc (t *T) B() {}\nfunc (l *List[E]) Push(v E) {}\nfunc (List[E]) Len() int { return 0 }\ntype List[E any] struct{}\n");
        let t = m.lookup("p", "T").expect("T");
        assert_eq!(t.num_method(), 2);
        let names: Vec<_> = (0..t.num_method())
            .filter_map(|i| t.method(i))
            .map(|n| n.name())
            .collect();
        assert_eq!(names, ["A", "B"]);
        let list = m.lookup("p", "List").expect("List");
        assert!(list.method_by_name("Push").is_some());
        let len = list.method_by_name("Len").expect("unnamed generic receiver");
        assert!(len.recv().is_some_and(|r| r.name.is_empty() && r.type_name == "List[E]"));
        assert!(m.diagnostics().is_empty());
    }

    #[test]
    fn attach_checks_the_receiver() {
        let mut m = build("package p
type T struct{}
type O struct{}
func (o O) Foo() {}
func Free() {}
");
        let id = |m: &Module, name: &str| m.nodes().find(|n| n.name() == name).map(|n| n.id()).expect(name);
        let (t, foo, free) = (id(&m, "T"), id(&m, "Foo"), id(&m, "Free"));

        let reason = |r: crate::Result<()>| match r {
            Err(AsterError::ReceiverMismatch { reason, .. }) => reason,
            other => panic!("expected receiver mismatch, got {other:?}"),
        };
        assert_eq!(reason(m.attach_method(t, foo)), "receiver names a different type");
        assert_eq!(reason(m.attach_method(t, free)), "function has no receiver");
        assert_eq!(m.node(t).num_method(), 0);
    }

    #[test]
    fn bad_receivers_are_reported_and_skipped() {
        let m = build("package p\ntype F func()\ntype I interface{}\nfunc (f F) A() {}\nfunc (i I) B() {}\nfunc (x *Missing) C() {}\n");
        let reasons: Vec<_> = m
            .diagnostics()
            .iter()
            .map(|e| match e {
                AsterError::ReceiverMismatch { method, .. } => method.as_str(),
                other => panic!("unexpected {other}"),
            })
            .collect();
        assert_eq!(reasons, ["A", "B", "C"]);
        assert_eq!(m.lookup("p", "I").expect("I").num_method(), 0);
    }

    #[test]
    fn embedded_interfaces_flatten_transitively() {
        let m = build(
            "package p\ntype RWC interface {\n\tRW\n\tClose() error\n}\ntype RW interface {\n\tR\n\tWrite(b []byte) int\n}\ntype R interface {\n\tRead(b []byte) int\n\tRWC\n}\n",
        );
        let rwc = m.lookup("p", "RWC").expect("RWC");
        let names: Vec<_> = (0..rwc.num_method())
            .filter_map(|i| rwc.method(i))
            .map(|n| n.name())
            .collect();
        assert_eq!(names, ["Close", "Read", "Write"]);
        assert_eq!(m.lookup("p", "R").expect("R").num_method(), 3);
    }
}

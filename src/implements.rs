//! Structural interface satisfaction.

use tracing::trace;

use crate::error::{AsterError, Result};
use crate::kind::Kind;
use crate::node::NodeRef;
use crate::reflect::FuncData;

impl<'m> NodeRef<'m> {
    /// Reports whether a value of this type satisfies interface `u`.
    ///
    /// Only methods with value receivers count. Parameters and results must
    /// agree in type name and pointer flag, position by position, and the
    /// variadic flags must match. Parameter names are ignored.
    ///
    /// # Errors
    /// [`AsterError::KindMismatch`] if `u` is not an interface.
    ///
    /// # Panics
    /// Panics if this node's kind is `Func`.
    pub fn implements(&self, u: NodeRef<'_>) -> Result<bool> {
        self.satisfies(u, FuncData::in_value_set)
    }

    /// Like [`NodeRef::implements`], for a pointer to this type: methods with
    /// pointer receivers count as well.
    pub fn implements_ptr(&self, u: NodeRef<'_>) -> Result<bool> {
        self.satisfies(u, |_| true)
    }

    fn satisfies(&self, u: NodeRef<'_>, visible: impl Fn(&FuncData) -> bool) -> Result<bool> {
        let Some(candidate) = self.as_type() else {
            panic!("aster: Kind can not be Func ({})", self.name());
        };
        if u.kind() != Kind::Interface {
            return Err(AsterError::KindMismatch { kind: u.kind() });
        }
        let Some(iface) = u.as_type() else {
            return Err(AsterError::KindMismatch { kind: u.kind() });
        };

        for want in iface.methods() {
            let Some(have) = candidate.method_by_name(want.name()) else {
                trace!(ty = %self.name(), iface = %u.name(), method = %want.name(), "method missing");
                return Ok(false);
            };
            let (Some(have), Some(want_sig)) = (have.node().as_func(), want.node().as_func()) else {
                return Ok(false);
            };
            if !visible(have) || !have.same_signature(want_sig) {
                trace!(ty = %self.name(), iface = %u.name(), method = %want.name(), "method does not match");
                return Ok(false);
            }
        }
        Ok(true)
    }
}

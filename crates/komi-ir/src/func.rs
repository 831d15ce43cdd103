//! Function definitions.

use crate::stmt::StatementBlockId;
use crate::store::Id;

/// Id of an interned function name.
///
/// Names are the foreign AST's mangled names (e.g. `"foo(vf3;"`), compared
/// case-sensitively.
pub type FunctionId = Id<String>;

/// A slurped function.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct FunctionDefinition {
    pub name: FunctionId,
    /// `None` for a prototype.
    pub body: Option<StatementBlockId>,
}

impl FunctionDefinition {
    /// Returns `true` if the function has no body.
    pub fn is_prototype(&self) -> bool {
        self.body.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prototype_has_no_body() {
        let proto = FunctionDefinition {
            name: FunctionId::from_raw(1),
            body: None,
        };
        assert!(proto.is_prototype());

        let def = FunctionDefinition {
            name: FunctionId::from_raw(1),
            body: Some(StatementBlockId::from_raw(1)),
        };
        assert!(!def.is_prototype());
    }
}

//! Statements and statement blocks.

use crate::store::Id;
use crate::value::TypedValue;

/// An ordered sequence of statements, interned as a unit.
pub type Block = Vec<Statement>;

/// Id of an interned [`Block`].
pub type StatementBlockId = Id<Block>;

/// A normalized flow-control operator.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum BranchOperator {
    Discard,
    TerminateInvocation,
    Demote,
    TerminateRay,
    IgnoreIntersection,
    Return,
    Break,
    Continue,
    Case,
    Default,
}

impl BranchOperator {
    /// Source keyword for this branch.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Discard => "discard",
            Self::TerminateInvocation => "terminateInvocation",
            Self::Demote => "demote",
            Self::TerminateRay => "terminateRayEXT",
            Self::IgnoreIntersection => "terminateIntersectionEXT",
            Self::Return => "return",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Case => "case",
            Self::Default => "default",
        }
    }

    /// `case` and `default` are labels rather than jumps.
    pub fn is_label(self) -> bool {
        matches!(self, Self::Case | Self::Default)
    }
}

/// A statement in a block.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum Statement {
    /// An r-value evaluated for its side effects.
    Expression(TypedValue),
    /// Conditional branch.
    If {
        condition: TypedValue,
        accept: StatementBlockId,
        reject: Option<StatementBlockId>,
    },
    /// Multi-way branch; `case`/`default` labels are [`Statement::Branch`]es in the body.
    Switch {
        condition: TypedValue,
        body: StatementBlockId,
    },
    /// Flow control, with an optional operand (return value, case label).
    Branch {
        op: BranchOperator,
        operand: Option<TypedValue>,
    },
    /// Pre-test (`for`/`while`) or post-test (`do`) loop.
    Loop {
        condition: Option<TypedValue>,
        /// Always an r-value when present.
        terminal: Option<TypedValue>,
        test_first: bool,
        body: StatementBlockId,
    },
}

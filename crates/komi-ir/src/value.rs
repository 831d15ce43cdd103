//! L-values, r-values and type-tagged value references.

use crate::func::FunctionId;
use crate::store::Id;
use crate::types::TypeId;

/// Id of an interned [`LValue`], unique only within its type.
pub type LValueId = Id<LValue>;

/// Id of an interned [`RValue`], unique only within its type.
pub type RValueId = Id<RValue>;

/// A named, addressable storage location.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct LValue {
    pub name: String,
}

impl LValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A normalized operator applied by an [`RValue::Operator`].
///
/// Renders as its variant name.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum RValueOperator {
    // Unary
    Negate,
    LogicalNot,
    VectorLogicalNot,
    BitwiseNot,
    PostIncrement,
    PostDecrement,
    PreIncrement,
    PreDecrement,
    CopyObject,
    Convert,

    // Arithmetic, bitwise and logical
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    RightShift,
    LeftShift,
    And,
    InclusiveOr,
    ExclusiveOr,
    LogicalOr,
    LogicalXor,
    LogicalAnd,
    VectorTimesScalar,
    VectorTimesMatrix,
    MatrixTimesVector,
    MatrixTimesScalar,
    MatrixTimesMatrix,
    Comma,

    // Comparison
    Equal,
    NotEqual,
    VectorEqual,
    VectorNotEqual,
    LessThan,
    GreaterThan,
    LessThanEqual,
    GreaterThanEqual,

    // Access
    IndexDirect,
    IndexIndirect,
    IndexDirectStruct,
    VectorSwizzle,

    // Assignment
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    VectorTimesMatrixAssign,
    VectorTimesScalarAssign,
    MatrixTimesScalarAssign,
    MatrixTimesMatrixAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    InclusiveOrAssign,
    ExclusiveOrAssign,
    LeftShiftAssign,
    RightShiftAssign,

    // Built-in functions
    Radians,
    Degrees,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Pow,
    Exp,
    Log,
    Exp2,
    Log2,
    Sqrt,
    InverseSqrt,
    Abs,
    Sign,
    Floor,
    Trunc,
    Round,
    Ceil,
    Fract,
    Min,
    Max,
    Clamp,
    Mix,
    Step,
    SmoothStep,
    Length,
    Distance,
    Dot,
    Cross,
    Normalize,
    FaceForward,
    Reflect,
    Refract,
    Dfdx,
    Dfdy,
    Fwidth,
    Any,
    All,
    Transpose,
    Determinant,
    MatrixInverse,
    OuterProduct,
    Texture,
    TextureLod,
    EmitVertex,
    EndPrimitive,
    Barrier,
    MemoryBarrier,

    // Constructors
    ConstructFloat,
    ConstructInt,
    ConstructUint,
    ConstructBool,
    ConstructVec2,
    ConstructVec3,
    ConstructVec4,
    ConstructIVec2,
    ConstructIVec3,
    ConstructIVec4,
    ConstructUVec2,
    ConstructUVec3,
    ConstructUVec4,
    ConstructBVec2,
    ConstructBVec3,
    ConstructBVec4,
    ConstructMat2x2,
    ConstructMat3x3,
    ConstructMat4x4,
    ConstructStruct,

    /// `cond ? a : b`.
    Ternary,
    /// A foreign operator with no normalized counterpart.
    Unknown,
}

/// A computed value.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum RValue {
    /// A constant. The literal payload is not retained.
    Literal,
    /// Application of an operator to ordered operands.
    Operator {
        op: RValueOperator,
        args: Vec<TypedValue>,
    },
    /// A call to a named function.
    FunctionCall {
        function: FunctionId,
        args: Vec<TypedValue>,
    },
}

/// Reference to either an l-value or an r-value of some type.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum ValueId {
    LValue(LValueId),
    RValue(RValueId),
}

/// A [`ValueId`] paired with the type whose stores own it.
///
/// Value ids are only unique within their type, so dereferencing always
/// goes through `ty`.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct TypedValue {
    pub ty: TypeId,
    pub value: ValueId,
}

impl TypedValue {
    /// The sentinel produced when a value could not be lowered.
    pub const INVALID: Self = Self {
        ty: Id::INVALID,
        value: ValueId::RValue(Id::INVALID),
    };

    pub fn lvalue(ty: TypeId, id: LValueId) -> Self {
        Self {
            ty,
            value: ValueId::LValue(id),
        }
    }

    pub fn rvalue(ty: TypeId, id: RValueId) -> Self {
        Self {
            ty,
            value: ValueId::RValue(id),
        }
    }

    /// Returns `true` for r-value references, including the invalid sentinel.
    pub fn is_rvalue(self) -> bool {
        matches!(self.value, ValueId::RValue(_))
    }

    /// Returns `false` if the referenced id is the invalid id.
    pub fn is_valid(self) -> bool {
        match self.value {
            ValueId::LValue(id) => id.is_valid(),
            ValueId::RValue(id) => id.is_valid(),
        }
    }
}

//! Mapping from glslang operators and basic types onto the normalized IR.

use komi_ir::{BaseKind, BranchOperator, RValueOperator};

use crate::tree::{BasicType, Op};

pub fn base_kind(basic: BasicType) -> BaseKind {
    match basic {
        BasicType::Void => BaseKind::Void,
        BasicType::Float => BaseKind::Float,
        BasicType::Double => BaseKind::Double,
        BasicType::Float16 => BaseKind::Float16,
        BasicType::Int => BaseKind::Int,
        BasicType::Uint => BaseKind::Uint,
        BasicType::Int64 => BaseKind::Int64,
        BasicType::Uint64 => BaseKind::Uint64,
        BasicType::Bool => BaseKind::Bool,
        BasicType::Sampler => BaseKind::Sampler,
        BasicType::Struct => BaseKind::Struct,
        BasicType::Block => BaseKind::Block,
        BasicType::Unknown => BaseKind::Unknown,
    }
}

/// Maps an expression operator. `None` for aggregate tags and flow control.
pub fn rvalue_operator(op: Op) -> Option<RValueOperator> {
    let mapped = match op {
        Op::Negative => RValueOperator::Negate,
        Op::LogicalNot => RValueOperator::LogicalNot,
        Op::VectorLogicalNot => RValueOperator::VectorLogicalNot,
        Op::BitwiseNot => RValueOperator::BitwiseNot,
        Op::PostIncrement => RValueOperator::PostIncrement,
        Op::PostDecrement => RValueOperator::PostDecrement,
        Op::PreIncrement => RValueOperator::PreIncrement,
        Op::PreDecrement => RValueOperator::PreDecrement,
        Op::CopyObject => RValueOperator::CopyObject,

        Op::ConvIntToFloat
        | Op::ConvUintToFloat
        | Op::ConvFloatToInt
        | Op::ConvFloatToUint
        | Op::ConvIntToUint
        | Op::ConvUintToInt
        | Op::ConvBoolToFloat
        | Op::ConvFloatToBool
        | Op::ConvIntToBool
        | Op::ConvBoolToInt
        | Op::ConvUintToBool
        | Op::ConvBoolToUint
        | Op::ConvFloatToDouble
        | Op::ConvDoubleToFloat => RValueOperator::Convert,

        Op::Add => RValueOperator::Add,
        Op::Sub => RValueOperator::Sub,
        Op::Mul => RValueOperator::Mul,
        Op::Div => RValueOperator::Div,
        Op::Mod => RValueOperator::Mod,
        Op::RightShift => RValueOperator::RightShift,
        Op::LeftShift => RValueOperator::LeftShift,
        Op::And => RValueOperator::And,
        Op::InclusiveOr => RValueOperator::InclusiveOr,
        Op::ExclusiveOr => RValueOperator::ExclusiveOr,
        Op::Equal => RValueOperator::Equal,
        Op::NotEqual => RValueOperator::NotEqual,
        Op::VectorEqual => RValueOperator::VectorEqual,
        Op::VectorNotEqual => RValueOperator::VectorNotEqual,
        Op::LessThan => RValueOperator::LessThan,
        Op::GreaterThan => RValueOperator::GreaterThan,
        Op::LessThanEqual => RValueOperator::LessThanEqual,
        Op::GreaterThanEqual => RValueOperator::GreaterThanEqual,
        Op::Comma => RValueOperator::Comma,
        Op::VectorTimesScalar => RValueOperator::VectorTimesScalar,
        Op::VectorTimesMatrix => RValueOperator::VectorTimesMatrix,
        Op::MatrixTimesVector => RValueOperator::MatrixTimesVector,
        Op::MatrixTimesScalar => RValueOperator::MatrixTimesScalar,
        Op::MatrixTimesMatrix => RValueOperator::MatrixTimesMatrix,
        Op::LogicalOr => RValueOperator::LogicalOr,
        Op::LogicalXor => RValueOperator::LogicalXor,
        Op::LogicalAnd => RValueOperator::LogicalAnd,
        Op::IndexDirect => RValueOperator::IndexDirect,
        Op::IndexIndirect => RValueOperator::IndexIndirect,
        Op::IndexDirectStruct => RValueOperator::IndexDirectStruct,
        Op::VectorSwizzle => RValueOperator::VectorSwizzle,

        Op::Assign => RValueOperator::Assign,
        Op::AddAssign => RValueOperator::AddAssign,
        Op::SubAssign => RValueOperator::SubAssign,
        Op::MulAssign => RValueOperator::MulAssign,
        Op::VectorTimesMatrixAssign => RValueOperator::VectorTimesMatrixAssign,
        Op::VectorTimesScalarAssign => RValueOperator::VectorTimesScalarAssign,
        Op::MatrixTimesScalarAssign => RValueOperator::MatrixTimesScalarAssign,
        Op::MatrixTimesMatrixAssign => RValueOperator::MatrixTimesMatrixAssign,
        Op::DivAssign => RValueOperator::DivAssign,
        Op::ModAssign => RValueOperator::ModAssign,
        Op::AndAssign => RValueOperator::AndAssign,
        Op::InclusiveOrAssign => RValueOperator::InclusiveOrAssign,
        Op::ExclusiveOrAssign => RValueOperator::ExclusiveOrAssign,
        Op::LeftShiftAssign => RValueOperator::LeftShiftAssign,
        Op::RightShiftAssign => RValueOperator::RightShiftAssign,

        Op::Radians => RValueOperator::Radians,
        Op::Degrees => RValueOperator::Degrees,
        Op::Sin => RValueOperator::Sin,
        Op::Cos => RValueOperator::Cos,
        Op::Tan => RValueOperator::Tan,
        Op::Asin => RValueOperator::Asin,
        Op::Acos => RValueOperator::Acos,
        Op::Atan => RValueOperator::Atan,
        Op::Pow => RValueOperator::Pow,
        Op::Exp => RValueOperator::Exp,
        Op::Log => RValueOperator::Log,
        Op::Exp2 => RValueOperator::Exp2,
        Op::Log2 => RValueOperator::Log2,
        Op::Sqrt => RValueOperator::Sqrt,
        Op::InverseSqrt => RValueOperator::InverseSqrt,
        Op::Abs => RValueOperator::Abs,
        Op::Sign => RValueOperator::Sign,
        Op::Floor => RValueOperator::Floor,
        Op::Trunc => RValueOperator::Trunc,
        Op::Round => RValueOperator::Round,
        Op::Ceil => RValueOperator::Ceil,
        Op::Fract => RValueOperator::Fract,
        Op::Min => RValueOperator::Min,
        Op::Max => RValueOperator::Max,
        Op::Clamp => RValueOperator::Clamp,
        Op::Mix => RValueOperator::Mix,
        Op::Step => RValueOperator::Step,
        Op::SmoothStep => RValueOperator::SmoothStep,
        Op::Length => RValueOperator::Length,
        Op::Distance => RValueOperator::Distance,
        Op::Dot => RValueOperator::Dot,
        Op::Cross => RValueOperator::Cross,
        Op::Normalize => RValueOperator::Normalize,
        Op::FaceForward => RValueOperator::FaceForward,
        Op::Reflect => RValueOperator::Reflect,
        Op::Refract => RValueOperator::Refract,
        Op::DPdx => RValueOperator::Dfdx,
        Op::DPdy => RValueOperator::Dfdy,
        Op::Fwidth => RValueOperator::Fwidth,
        Op::Any => RValueOperator::Any,
        Op::All => RValueOperator::All,
        Op::Transpose => RValueOperator::Transpose,
        Op::Determinant => RValueOperator::Determinant,
        Op::MatrixInverse => RValueOperator::MatrixInverse,
        Op::OuterProduct => RValueOperator::OuterProduct,
        Op::Texture => RValueOperator::Texture,
        Op::TextureLod => RValueOperator::TextureLod,
        Op::EmitVertex => RValueOperator::EmitVertex,
        Op::EndPrimitive => RValueOperator::EndPrimitive,
        Op::Barrier => RValueOperator::Barrier,
        Op::MemoryBarrier => RValueOperator::MemoryBarrier,

        Op::ConstructFloat => RValueOperator::ConstructFloat,
        Op::ConstructInt => RValueOperator::ConstructInt,
        Op::ConstructUint => RValueOperator::ConstructUint,
        Op::ConstructBool => RValueOperator::ConstructBool,
        Op::ConstructVec2 => RValueOperator::ConstructVec2,
        Op::ConstructVec3 => RValueOperator::ConstructVec3,
        Op::ConstructVec4 => RValueOperator::ConstructVec4,
        Op::ConstructIVec2 => RValueOperator::ConstructIVec2,
        Op::ConstructIVec3 => RValueOperator::ConstructIVec3,
        Op::ConstructIVec4 => RValueOperator::ConstructIVec4,
        Op::ConstructUVec2 => RValueOperator::ConstructUVec2,
        Op::ConstructUVec3 => RValueOperator::ConstructUVec3,
        Op::ConstructUVec4 => RValueOperator::ConstructUVec4,
        Op::ConstructBVec2 => RValueOperator::ConstructBVec2,
        Op::ConstructBVec3 => RValueOperator::ConstructBVec3,
        Op::ConstructBVec4 => RValueOperator::ConstructBVec4,
        Op::ConstructMat2x2 => RValueOperator::ConstructMat2x2,
        Op::ConstructMat3x3 => RValueOperator::ConstructMat3x3,
        Op::ConstructMat4x4 => RValueOperator::ConstructMat4x4,
        Op::ConstructStruct => RValueOperator::ConstructStruct,

        Op::Null
        | Op::Sequence
        | Op::LinkerObjects
        | Op::FunctionCall
        | Op::Function
        | Op::Parameters
        | Op::Kill
        | Op::TerminateInvocation
        | Op::Demote
        | Op::TerminateRayKHR
        | Op::IgnoreIntersectionKHR
        | Op::Return
        | Op::Break
        | Op::Continue
        | Op::Case
        | Op::Default => return None,
    };
    Some(mapped)
}

/// Maps a flow-control operator. `None` for everything else.
pub fn branch_operator(op: Op) -> Option<BranchOperator> {
    match op {
        Op::Kill => Some(BranchOperator::Discard),
        Op::TerminateInvocation => Some(BranchOperator::TerminateInvocation),
        Op::Demote => Some(BranchOperator::Demote),
        Op::TerminateRayKHR => Some(BranchOperator::TerminateRay),
        Op::IgnoreIntersectionKHR => Some(BranchOperator::IgnoreIntersection),
        Op::Return => Some(BranchOperator::Return),
        Op::Break => Some(BranchOperator::Break),
        Op::Continue => Some(BranchOperator::Continue),
        Op::Case => Some(BranchOperator::Case),
        Op::Default => Some(BranchOperator::Default),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_collapse() {
        assert_eq!(
            rvalue_operator(Op::ConvIntToFloat),
            Some(RValueOperator::Convert)
        );
        assert_eq!(
            rvalue_operator(Op::ConvDoubleToFloat),
            Some(RValueOperator::Convert)
        );
    }

    #[test]
    fn aggregate_tags_are_not_operators() {
        for op in [
            Op::Null,
            Op::Sequence,
            Op::LinkerObjects,
            Op::Function,
            Op::FunctionCall,
            Op::Parameters,
            Op::Return,
        ] {
            assert_eq!(rvalue_operator(op), None, "{op:?}");
        }
    }

    #[test]
    fn branch_table() {
        assert_eq!(branch_operator(Op::Kill), Some(BranchOperator::Discard));
        assert_eq!(
            branch_operator(Op::IgnoreIntersectionKHR),
            Some(BranchOperator::IgnoreIntersection)
        );
        assert_eq!(branch_operator(Op::Case), Some(BranchOperator::Case));
        assert_eq!(branch_operator(Op::Add), None);
        assert_eq!(branch_operator(Op::Null), None);
    }

    #[test]
    fn base_kinds_follow_basic_types() {
        assert_eq!(base_kind(BasicType::Float16), BaseKind::Float16);
        assert_eq!(base_kind(BasicType::Void), BaseKind::Void);
        assert_eq!(base_kind(BasicType::Sampler), BaseKind::Sampler);
    }
}

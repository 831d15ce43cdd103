//! The glslang intermediate tree, as a closed sum type.
//!
//! Nodes own their children. Every node carries the source location it was
//! produced from so that diagnostics can point back at the shader.

use std::fmt;

/// `string:line:column` position of a node.
#[derive(Clone, Debug, Default, Hash, Eq, PartialEq)]
pub struct SourceLoc {
    /// Source string name or index.
    pub name: String,
    /// 0 when glslang has no line for the node (printed as `?`).
    pub line: u32,
    pub column: u32,
}

impl SourceLoc {
    pub fn new(name: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            name: name.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.name, self.line, self.column)
    }
}

/// glslang basic types.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
pub enum BasicType {
    #[default]
    Void,
    Float,
    Double,
    Float16,
    Int,
    Uint,
    Int64,
    Uint64,
    Bool,
    /// Samplers, textures, images and subpass inputs.
    Sampler,
    Struct,
    Block,
    Unknown,
}

/// Shape of a typed node.
///
/// Zero and one are equivalent for the size fields.
#[derive(Clone, Debug, Default, Hash, Eq, PartialEq)]
pub struct NodeType {
    pub basic: BasicType,
    pub vector_size: u32,
    pub matrix_cols: u32,
    pub matrix_rows: u32,
    /// Outermost dimension first, 0 for unsized.
    pub array_sizes: Vec<u32>,
}

impl NodeType {
    pub fn scalar(basic: BasicType) -> Self {
        Self {
            basic,
            vector_size: 1,
            ..Self::default()
        }
    }

    pub fn vector(basic: BasicType, size: u32) -> Self {
        Self {
            basic,
            vector_size: size,
            ..Self::default()
        }
    }

    pub fn matrix(basic: BasicType, cols: u32, rows: u32) -> Self {
        Self {
            basic,
            matrix_cols: cols,
            matrix_rows: rows,
            ..Self::default()
        }
    }

    pub fn with_array_sizes(mut self, sizes: impl IntoIterator<Item = u32>) -> Self {
        self.array_sizes = sizes.into_iter().collect();
        self
    }
}

/// glslang operators.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Op {
    Null,

    // Aggregate tags
    Sequence,
    LinkerObjects,
    FunctionCall,
    Function,
    Parameters,

    // Unary
    Negative,
    LogicalNot,
    VectorLogicalNot,
    BitwiseNot,
    PostIncrement,
    PostDecrement,
    PreIncrement,
    PreDecrement,
    CopyObject,

    // Conversions
    ConvIntToFloat,
    ConvUintToFloat,
    ConvFloatToInt,
    ConvFloatToUint,
    ConvIntToUint,
    ConvUintToInt,
    ConvBoolToFloat,
    ConvFloatToBool,
    ConvIntToBool,
    ConvBoolToInt,
    ConvUintToBool,
    ConvBoolToUint,
    ConvFloatToDouble,
    ConvDoubleToFloat,

    // Binary
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
    Equal,
    NotEqual,
    VectorEqual,
    VectorNotEqual,
    LessThan,
    GreaterThan,
    LessThanEqual,
    GreaterThanEqual,
    Comma,
    VectorTimesScalar,
    VectorTimesMatrix,
    MatrixTimesVector,
    MatrixTimesScalar,
    MatrixTimesMatrix,
    LogicalOr,
    LogicalXor,
    LogicalAnd,
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
    DPdx,
    DPdy,
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

    // Flow control
    Kill,
    TerminateInvocation,
    Demote,
    TerminateRayKHR,
    IgnoreIntersectionKHR,
    Return,
    Break,
    Continue,
    Case,
    Default,
}

/// One component of a constant.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstValue {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
}

/// A node of the intermediate tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub loc: SourceLoc,
    pub kind: NodeKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// A variable reference.
    Symbol { name: String, ty: NodeType },
    /// A constant union, one entry per component.
    Constant {
        ty: NodeType,
        values: Vec<ConstValue>,
    },
    Unary {
        op: Op,
        ty: NodeType,
        operand: Box<Node>,
    },
    Binary {
        op: Op,
        ty: NodeType,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// N-ary operator. `name` is set for function definitions and calls.
    Aggregate {
        op: Op,
        name: String,
        ty: NodeType,
        children: Vec<Node>,
    },
    /// `if`/`else` as a statement, `?:` as an expression.
    Selection {
        ty: NodeType,
        condition: Box<Node>,
        accept: Option<Box<Node>>,
        reject: Option<Box<Node>>,
    },
    Switch {
        condition: Box<Node>,
        body: Box<Node>,
    },
    Loop {
        test_first: bool,
        test: Option<Box<Node>>,
        terminal: Option<Box<Node>>,
        body: Option<Box<Node>>,
    },
    Branch {
        op: Op,
        expression: Option<Box<Node>>,
    },
    /// `object.name()`, e.g. `array.length()`.
    Method {
        name: String,
        ty: NodeType,
        object: Box<Node>,
    },
    /// A typed node of no more specific shape.
    Typed { description: String, ty: NodeType },
    /// Anything else.
    Other { description: String },
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            loc: SourceLoc::default(),
            kind,
        }
    }

    pub fn at(mut self, loc: SourceLoc) -> Self {
        self.loc = loc;
        self
    }

    pub fn symbol(name: impl Into<String>, ty: NodeType) -> Self {
        Self::new(NodeKind::Symbol {
            name: name.into(),
            ty,
        })
    }

    pub fn constant(ty: NodeType, values: Vec<ConstValue>) -> Self {
        Self::new(NodeKind::Constant { ty, values })
    }

    pub fn unary(op: Op, ty: NodeType, operand: Node) -> Self {
        Self::new(NodeKind::Unary {
            op,
            ty,
            operand: Box::new(operand),
        })
    }

    pub fn binary(op: Op, ty: NodeType, left: Node, right: Node) -> Self {
        Self::new(NodeKind::Binary {
            op,
            ty,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn aggregate(op: Op, ty: NodeType, children: Vec<Node>) -> Self {
        Self::new(NodeKind::Aggregate {
            op,
            name: String::new(),
            ty,
            children,
        })
    }

    /// An untyped `Sequence` aggregate.
    pub fn sequence(children: Vec<Node>) -> Self {
        Self::aggregate(Op::Sequence, NodeType::default(), children)
    }

    /// A `Function` aggregate: parameters, then the body if defined.
    pub fn function(name: impl Into<String>, children: Vec<Node>) -> Self {
        Self::new(NodeKind::Aggregate {
            op: Op::Function,
            name: name.into(),
            ty: NodeType::default(),
            children,
        })
    }

    pub fn call(name: impl Into<String>, ty: NodeType, args: Vec<Node>) -> Self {
        Self::new(NodeKind::Aggregate {
            op: Op::FunctionCall,
            name: name.into(),
            ty,
            children: args,
        })
    }

    pub fn selection(
        ty: NodeType,
        condition: Node,
        accept: Option<Node>,
        reject: Option<Node>,
    ) -> Self {
        Self::new(NodeKind::Selection {
            ty,
            condition: Box::new(condition),
            accept: accept.map(Box::new),
            reject: reject.map(Box::new),
        })
    }

    pub fn switch(condition: Node, body: Node) -> Self {
        Self::new(NodeKind::Switch {
            condition: Box::new(condition),
            body: Box::new(body),
        })
    }

    pub fn looping(
        test_first: bool,
        test: Option<Node>,
        terminal: Option<Node>,
        body: Option<Node>,
    ) -> Self {
        Self::new(NodeKind::Loop {
            test_first,
            test: test.map(Box::new),
            terminal: terminal.map(Box::new),
            body: body.map(Box::new),
        })
    }

    pub fn branch(op: Op, expression: Option<Node>) -> Self {
        Self::new(NodeKind::Branch {
            op,
            expression: expression.map(Box::new),
        })
    }

    pub fn method(name: impl Into<String>, ty: NodeType, object: Node) -> Self {
        Self::new(NodeKind::Method {
            name: name.into(),
            ty,
            object: Box::new(object),
        })
    }

    pub fn other(description: impl Into<String>) -> Self {
        Self::new(NodeKind::Other {
            description: description.into(),
        })
    }

    /// The type of an expression node, `None` for statement-only nodes.
    pub fn ty(&self) -> Option<&NodeType> {
        match &self.kind {
            NodeKind::Symbol { ty, .. }
            | NodeKind::Constant { ty, .. }
            | NodeKind::Unary { ty, .. }
            | NodeKind::Binary { ty, .. }
            | NodeKind::Aggregate { ty, .. }
            | NodeKind::Selection { ty, .. }
            | NodeKind::Method { ty, .. }
            | NodeKind::Typed { ty, .. } => Some(ty),
            NodeKind::Switch { .. }
            | NodeKind::Loop { .. }
            | NodeKind::Branch { .. }
            | NodeKind::Other { .. } => None,
        }
    }

    pub fn is_typed(&self) -> bool {
        self.ty().is_some()
    }

    /// Short human-readable description used in diagnostics.
    pub fn describe(&self) -> String {
        match &self.kind {
            NodeKind::Symbol { name, .. } => format!("symbol '{name}'"),
            NodeKind::Constant { values, .. } => {
                format!("constant (size = {})", values.len())
            }
            NodeKind::Unary { op, .. } => format!("unary {op:?}"),
            NodeKind::Binary { op, .. } => format!("binary {op:?}"),
            NodeKind::Aggregate { op, name, .. } if name.is_empty() => {
                format!("aggregate {op:?}")
            }
            NodeKind::Aggregate { op, name, .. } => format!("aggregate {op:?} {name}"),
            NodeKind::Selection { .. } => "selection".to_string(),
            NodeKind::Switch { .. } => "switch".to_string(),
            NodeKind::Loop { .. } => "loop".to_string(),
            NodeKind::Branch { op, .. } => format!("branch {op:?}"),
            NodeKind::Method { name, .. } => format!("method {name}"),
            NodeKind::Typed { description, .. } => format!("typed '{description}'"),
            NodeKind::Other { description } => format!("node '{description}'"),
        }
    }
}

//! Reader for the intermediate tree printed by `glslangValidator -i`.
//!
//! Each tree line starts with `string:line` (or `string:?` when glslang has
//! no line) followed by two spaces per nesting level:
//!
//! ```text
//! 0:? Sequence
//! 0:5  Function Definition: main( ( global void)
//! 0:5    Function Parameters:
//! 0:6    Sequence
//! 0:6      Branch: Return
//! ```
//!
//! Header lines (`Shader version: 450`, extension requests, layout
//! qualifiers) are skipped, and only the first tree of the input is read.
//! Constants are read as vectors with one component per value line.

use crate::SlurpError;
use crate::tree::{BasicType, ConstValue, Node, NodeKind, NodeType, Op, SourceLoc};

/// Trees nested deeper than this are rejected rather than recursed into.
const MAX_DEPTH: usize = 256;

/// Parses the first intermediate tree of a `glslangValidator -i` dump.
pub fn read_tree(text: &str) -> Result<Node, SlurpError> {
    let lines: Vec<Line<'_>> = text
        .lines()
        .enumerate()
        .filter_map(|(index, raw)| Line::lex(index + 1, raw))
        .collect();
    let start = lines
        .iter()
        .position(|line| line.depth == 0)
        .ok_or(SlurpError::EmptyTree)?;
    log::debug!("reading tree from line {}", lines[start].number);

    let mut reader = Reader { lines, pos: start };
    reader.node(0)
}

// ---------------------------------------------------------------------------
// Lines
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug)]
struct Line<'a> {
    /// 1-based line number in the dump.
    number: usize,
    source: &'a str,
    /// Shader line, 0 for `?`.
    line: u32,
    depth: usize,
    text: &'a str,
}

impl<'a> Line<'a> {
    /// Splits a tree line into its prefix, depth and text. `None` for
    /// anything that is not a tree line.
    fn lex(number: usize, raw: &'a str) -> Option<Self> {
        let (source, rest) = raw.split_once(':')?;
        if source.is_empty() || source.contains(char::is_whitespace) {
            return None;
        }
        let (line, after) = match rest.strip_prefix('?') {
            Some(after) => (0, after.strip_prefix(' ').unwrap_or(after)),
            None => {
                let digits = rest
                    .trim_start_matches(|c: char| c.is_ascii_digit())
                    .len();
                let digits = rest.len() - digits;
                if digits == 0 {
                    return None;
                }
                (rest[..digits].parse().ok()?, &rest[digits..])
            }
        };
        let body = after.trim_start_matches(' ');
        let text = body.trim_end();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            number,
            source,
            line,
            depth: (after.len() - body.len()) / 2,
            text,
        })
    }

    fn loc(&self) -> SourceLoc {
        SourceLoc::new(self.source, self.line, 0)
    }
}

// ---------------------------------------------------------------------------
// Operator tables
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    Unary,
    Binary,
    Aggregate,
}

/// Operator names as printed by glslang.
const OPERATORS: &[(&str, Op, Shape)] = &[
    ("Negate value", Op::Negative, Shape::Unary),
    ("Negate conditional", Op::LogicalNot, Shape::Unary),
    ("Bitwise not", Op::BitwiseNot, Shape::Unary),
    ("Post-Increment", Op::PostIncrement, Shape::Unary),
    ("Post-Decrement", Op::PostDecrement, Shape::Unary),
    ("Pre-Increment", Op::PreIncrement, Shape::Unary),
    ("Pre-Decrement", Op::PreDecrement, Shape::Unary),
    ("copy object", Op::CopyObject, Shape::Unary),
    ("Convert int to float", Op::ConvIntToFloat, Shape::Unary),
    ("Convert uint to float", Op::ConvUintToFloat, Shape::Unary),
    ("Convert float to int", Op::ConvFloatToInt, Shape::Unary),
    ("Convert float to uint", Op::ConvFloatToUint, Shape::Unary),
    ("Convert int to uint", Op::ConvIntToUint, Shape::Unary),
    ("Convert uint to int", Op::ConvUintToInt, Shape::Unary),
    ("Convert bool to float", Op::ConvBoolToFloat, Shape::Unary),
    ("Convert float to bool", Op::ConvFloatToBool, Shape::Unary),
    ("Convert int to bool", Op::ConvIntToBool, Shape::Unary),
    ("Convert bool to int", Op::ConvBoolToInt, Shape::Unary),
    ("Convert uint to bool", Op::ConvUintToBool, Shape::Unary),
    ("Convert bool to uint", Op::ConvBoolToUint, Shape::Unary),
    ("Convert float to double", Op::ConvFloatToDouble, Shape::Unary),
    ("Convert double to float", Op::ConvDoubleToFloat, Shape::Unary),
    ("radians", Op::Radians, Shape::Unary),
    ("degrees", Op::Degrees, Shape::Unary),
    ("sine", Op::Sin, Shape::Unary),
    ("cosine", Op::Cos, Shape::Unary),
    ("tangent", Op::Tan, Shape::Unary),
    ("arc sine", Op::Asin, Shape::Unary),
    ("arc cosine", Op::Acos, Shape::Unary),
    ("arc tangent", Op::Atan, Shape::Unary),
    ("exp", Op::Exp, Shape::Unary),
    ("log", Op::Log, Shape::Unary),
    ("exp2", Op::Exp2, Shape::Unary),
    ("log2", Op::Log2, Shape::Unary),
    ("sqrt", Op::Sqrt, Shape::Unary),
    ("inverse sqrt", Op::InverseSqrt, Shape::Unary),
    ("Absolute value", Op::Abs, Shape::Unary),
    ("Sign", Op::Sign, Shape::Unary),
    ("Floor", Op::Floor, Shape::Unary),
    ("trunc", Op::Trunc, Shape::Unary),
    ("round", Op::Round, Shape::Unary),
    ("Ceiling", Op::Ceil, Shape::Unary),
    ("Fraction", Op::Fract, Shape::Unary),
    ("length", Op::Length, Shape::Unary),
    ("normalize", Op::Normalize, Shape::Unary),
    ("dPdx", Op::DPdx, Shape::Unary),
    ("dPdy", Op::DPdy, Shape::Unary),
    ("fwidth", Op::Fwidth, Shape::Unary),
    ("any", Op::Any, Shape::Unary),
    ("all", Op::All, Shape::Unary),
    ("transpose", Op::Transpose, Shape::Unary),
    ("determinant", Op::Determinant, Shape::Unary),
    ("inverse", Op::MatrixInverse, Shape::Unary),
    ("move second child to first child", Op::Assign, Shape::Binary),
    ("add second child into first child", Op::AddAssign, Shape::Binary),
    ("subtract second child into first child", Op::SubAssign, Shape::Binary),
    ("multiply second child into first child", Op::MulAssign, Shape::Binary),
    (
        "vector times matrix second child into first child",
        Op::VectorTimesMatrixAssign,
        Shape::Binary,
    ),
    ("vector scale second child into first child", Op::VectorTimesScalarAssign, Shape::Binary),
    ("matrix scale second child into first child", Op::MatrixTimesScalarAssign, Shape::Binary),
    ("matrix mult second child into first child", Op::MatrixTimesMatrixAssign, Shape::Binary),
    ("divide second child into first child", Op::DivAssign, Shape::Binary),
    ("mod second child into first child", Op::ModAssign, Shape::Binary),
    ("and second child into first child", Op::AndAssign, Shape::Binary),
    ("or second child into first child", Op::InclusiveOrAssign, Shape::Binary),
    ("exclusive or second child into first child", Op::ExclusiveOrAssign, Shape::Binary),
    ("left shift second child into first child", Op::LeftShiftAssign, Shape::Binary),
    ("right shift second child into first child", Op::RightShiftAssign, Shape::Binary),
    ("direct index", Op::IndexDirect, Shape::Binary),
    ("indirect index", Op::IndexIndirect, Shape::Binary),
    ("direct index for structure", Op::IndexDirectStruct, Shape::Binary),
    ("vector swizzle", Op::VectorSwizzle, Shape::Binary),
    ("add", Op::Add, Shape::Binary),
    ("subtract", Op::Sub, Shape::Binary),
    ("component-wise multiply", Op::Mul, Shape::Binary),
    ("divide", Op::Div, Shape::Binary),
    ("mod", Op::Mod, Shape::Binary),
    ("right-shift", Op::RightShift, Shape::Binary),
    ("left-shift", Op::LeftShift, Shape::Binary),
    ("bitwise and", Op::And, Shape::Binary),
    ("inclusive-or", Op::InclusiveOr, Shape::Binary),
    ("exclusive-or", Op::ExclusiveOr, Shape::Binary),
    ("Compare Equal", Op::Equal, Shape::Binary),
    ("Compare Not Equal", Op::NotEqual, Shape::Binary),
    ("Equal", Op::VectorEqual, Shape::Binary),
    ("NotEqual", Op::VectorNotEqual, Shape::Binary),
    ("Compare Less Than", Op::LessThan, Shape::Binary),
    ("Compare Greater Than", Op::GreaterThan, Shape::Binary),
    ("Compare Less Than or Equal", Op::LessThanEqual, Shape::Binary),
    ("Compare Greater Than or Equal", Op::GreaterThanEqual, Shape::Binary),
    ("vector-scale", Op::VectorTimesScalar, Shape::Binary),
    ("vector-times-matrix", Op::VectorTimesMatrix, Shape::Binary),
    ("matrix-times-vector", Op::MatrixTimesVector, Shape::Binary),
    ("matrix-scale", Op::MatrixTimesScalar, Shape::Binary),
    ("matrix-multiply", Op::MatrixTimesMatrix, Shape::Binary),
    ("logical-or", Op::LogicalOr, Shape::Binary),
    ("logical-xor", Op::LogicalXor, Shape::Binary),
    ("logical-and", Op::LogicalAnd, Shape::Binary),
    ("Comma", Op::Comma, Shape::Binary),
    ("pow", Op::Pow, Shape::Aggregate),
    ("min", Op::Min, Shape::Aggregate),
    ("max", Op::Max, Shape::Aggregate),
    ("clamp", Op::Clamp, Shape::Aggregate),
    ("mix", Op::Mix, Shape::Aggregate),
    ("step", Op::Step, Shape::Aggregate),
    ("smoothstep", Op::SmoothStep, Shape::Aggregate),
    ("distance", Op::Distance, Shape::Aggregate),
    ("dot-product", Op::Dot, Shape::Aggregate),
    ("cross-product", Op::Cross, Shape::Aggregate),
    ("face-forward", Op::FaceForward, Shape::Aggregate),
    ("reflect", Op::Reflect, Shape::Aggregate),
    ("refract", Op::Refract, Shape::Aggregate),
    ("outer product", Op::OuterProduct, Shape::Aggregate),
    ("texture", Op::Texture, Shape::Aggregate),
    ("textureLod", Op::TextureLod, Shape::Aggregate),
    ("EmitVertex", Op::EmitVertex, Shape::Aggregate),
    ("EndPrimitive", Op::EndPrimitive, Shape::Aggregate),
    ("Barrier", Op::Barrier, Shape::Aggregate),
    ("MemoryBarrier", Op::MemoryBarrier, Shape::Aggregate),
    ("Construct float", Op::ConstructFloat, Shape::Aggregate),
    ("Construct int", Op::ConstructInt, Shape::Aggregate),
    ("Construct uint", Op::ConstructUint, Shape::Aggregate),
    ("Construct bool", Op::ConstructBool, Shape::Aggregate),
    ("Construct vec2", Op::ConstructVec2, Shape::Aggregate),
    ("Construct vec3", Op::ConstructVec3, Shape::Aggregate),
    ("Construct vec4", Op::ConstructVec4, Shape::Aggregate),
    ("Construct ivec2", Op::ConstructIVec2, Shape::Aggregate),
    ("Construct ivec3", Op::ConstructIVec3, Shape::Aggregate),
    ("Construct ivec4", Op::ConstructIVec4, Shape::Aggregate),
    ("Construct uvec2", Op::ConstructUVec2, Shape::Aggregate),
    ("Construct uvec3", Op::ConstructUVec3, Shape::Aggregate),
    ("Construct uvec4", Op::ConstructUVec4, Shape::Aggregate),
    ("Construct bvec2", Op::ConstructBVec2, Shape::Aggregate),
    ("Construct bvec3", Op::ConstructBVec3, Shape::Aggregate),
    ("Construct bvec4", Op::ConstructBVec4, Shape::Aggregate),
    ("Construct mat2", Op::ConstructMat2x2, Shape::Aggregate),
    ("Construct mat3", Op::ConstructMat3x3, Shape::Aggregate),
    ("Construct mat4", Op::ConstructMat4x4, Shape::Aggregate),
    ("Construct structure", Op::ConstructStruct, Shape::Aggregate),
];

/// Branch lines, before any ` with expression` suffix.
const BRANCHES: &[(&str, Op)] = &[
    ("Branch: Kill", Op::Kill),
    ("Branch: TerminateInvocation", Op::TerminateInvocation),
    ("Branch: TerminateRayKHR", Op::TerminateRayKHR),
    ("Branch: IgnoreIntersectionKHR", Op::IgnoreIntersectionKHR),
    ("Branch: Return", Op::Return),
    ("Branch: Break", Op::Break),
    ("Branch: Continue", Op::Continue),
    ("Branch: Unknown Branch", Op::Null),
    ("case:", Op::Case),
    ("default:", Op::Default),
    ("Demote", Op::Demote),
];

fn lookup_operator(name: &str) -> Option<(Op, Shape)> {
    OPERATORS
        .iter()
        .find(|(printed, ..)| *printed == name)
        .map(|&(_, op, shape)| (op, shape))
}

fn lookup_branch(text: &str) -> Option<(Op, bool)> {
    let (head, with_expression) = match text.strip_suffix("with expression") {
        Some(head) => (head.trim_end(), true),
        None => (text, false),
    };
    BRANCHES
        .iter()
        .find(|(printed, _)| *printed == head)
        .map(|&(_, op)| (op, with_expression))
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Splits `head ( qualifiers type)` into the head and the parsed type.
///
/// Trailing annotations after the type (`: no shortcircuit`) are ignored.
fn split_type(text: &str) -> (&str, Option<NodeType>) {
    let Some(close) = text.rfind(')') else {
        return (text, None);
    };
    let mut depth = 0usize;
    for (index, c) in text[..=close].char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                depth -= 1;
                if depth == 0 {
                    let head = text[..index].trim_end();
                    return (head, Some(parse_type(&text[index + 1..close])));
                }
            }
            _ => {}
        }
    }
    (text, None)
}

/// Parses the inside of a printed type, e.g.
/// `temp 2-element array of 3-component vector of float`.
fn parse_type(inner: &str) -> NodeType {
    let mut ty = NodeType::default();
    let mut basic = None;
    let mut tokens = inner.split_whitespace().peekable();
    while let Some(token) = tokens.next() {
        if let Some(size) = token.strip_suffix("-element") {
            ty.array_sizes.push(size.parse().unwrap_or(0));
        } else if let Some(size) = token.strip_suffix("-component") {
            ty.vector_size = size.parse().unwrap_or(1);
        } else if token == "runtime-sized" {
            ty.array_sizes.push(0);
        } else if token == "unsized" {
            // `unsized 1-element array of`: the size printed is a placeholder.
            if tokens.peek().is_some_and(|next| next.ends_with("-element")) {
                tokens.next();
            }
            ty.array_sizes.push(0);
        } else if tokens.peek() == Some(&"matrix") {
            if let Some((cols, rows)) = token.split_once('X') {
                ty.matrix_cols = cols.parse().unwrap_or(1);
                ty.matrix_rows = rows.parse().unwrap_or(1);
            }
        } else if let Some(found) = basic_type(token) {
            basic = Some(found);
            break;
        }
    }
    ty.basic = basic.unwrap_or(BasicType::Unknown);
    ty
}

fn basic_type(token: &str) -> Option<BasicType> {
    let basic = match token {
        "void" => BasicType::Void,
        "float" => BasicType::Float,
        "double" => BasicType::Double,
        "float16_t" => BasicType::Float16,
        "int" => BasicType::Int,
        "uint" => BasicType::Uint,
        "int64_t" => BasicType::Int64,
        "uint64_t" => BasicType::Uint64,
        "bool" => BasicType::Bool,
        _ if token.starts_with("structure") => BasicType::Struct,
        _ if token.starts_with("block") => BasicType::Block,
        _ if ["sampler", "texture", "image", "subpass"]
            .iter()
            .any(|prefix| token.starts_with(prefix)) =>
        {
            BasicType::Sampler
        }
        _ => return None,
    };
    Some(basic)
}

/// Parses a constant value line such as `1.000000`, `3 (const int)` or
/// `true (const bool)`.
fn parse_const(text: &str) -> (ConstValue, BasicType) {
    let (value, kind) = match text.split_once(" (const ") {
        Some((value, kind)) => (value.trim(), kind.trim_end_matches(')')),
        None => (text, "float"),
    };
    match kind {
        "bool" => (ConstValue::Bool(value == "true"), BasicType::Bool),
        "int" | "int8_t" | "int16_t" => (ConstValue::Int(int(value)), BasicType::Int),
        "int64_t" => (ConstValue::Int(int(value)), BasicType::Int64),
        "uint" | "uint8_t" | "uint16_t" => (ConstValue::Uint(uint(value)), BasicType::Uint),
        "uint64_t" => (ConstValue::Uint(uint(value)), BasicType::Uint64),
        _ => (
            ConstValue::Float(value.parse().unwrap_or(f64::NAN)),
            BasicType::Float,
        ),
    }
}

fn int(value: &str) -> i64 {
    value.parse().unwrap_or(0)
}

fn uint(value: &str) -> u64 {
    value.parse().unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

struct Reader<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn read_error(&self, number: usize, message: impl Into<String>) -> SlurpError {
        SlurpError::Read {
            line: number,
            message: message.into(),
        }
    }

    /// Text of the next line if it sits at exactly `depth`.
    fn peek_at(&self, depth: usize) -> Option<&'a str> {
        self.lines
            .get(self.pos)
            .filter(|line| line.depth == depth)
            .map(|line| line.text)
    }

    fn expect_label(&mut self, depth: usize, label: &str) -> Result<(), SlurpError> {
        match self.lines.get(self.pos) {
            Some(line) if line.depth == depth && line.text == label => {
                self.pos += 1;
                Ok(())
            }
            Some(line) => Err(self.read_error(line.number, format!("expected '{label}'"))),
            None => Err(self.read_error(self.end(), format!("expected '{label}'"))),
        }
    }

    fn end(&self) -> usize {
        self.lines.last().map_or(0, |line| line.number + 1)
    }

    /// Skips every line nested deeper than `depth`.
    fn skip_children(&mut self, depth: usize) {
        while self.lines.get(self.pos).is_some_and(|line| line.depth > depth) {
            self.pos += 1;
        }
    }

    /// Reads every node nested directly under `depth`.
    fn children(&mut self, depth: usize) -> Result<Vec<Node>, SlurpError> {
        let mut children = Vec::new();
        while let Some(line) = self.lines.get(self.pos) {
            if line.depth == depth + 1 {
                children.push(self.node(depth + 1)?);
            } else if line.depth > depth + 1 {
                log::trace!("line {}: skipping stray line", line.number);
                self.pos += 1;
            } else {
                break;
            }
        }
        Ok(children)
    }

    /// Reads the node starting at the current line, which must sit at `depth`.
    fn node(&mut self, depth: usize) -> Result<Node, SlurpError> {
        let line = match self.lines.get(self.pos) {
            Some(line) if line.depth == depth => *line,
            Some(line) => {
                return Err(self.read_error(
                    line.number,
                    format!("expected a node at depth {depth}, found depth {}", line.depth),
                ));
            }
            None => return Err(self.read_error(self.end(), "unexpected end of tree")),
        };
        if depth > MAX_DEPTH {
            return Err(self.read_error(line.number, "tree is nested too deeply"));
        }
        self.pos += 1;

        let text = line.text;
        let kind = if let Some(rest) = text.strip_prefix('\'') {
            self.symbol(&line, rest)?
        } else if text == "Constant:" {
            self.constant(depth)
        } else if text.starts_with("Test condition and select") {
            self.selection(&line)?
        } else if text.starts_with("Loop with condition") {
            self.looping(&line)?
        } else if text.starts_with("switch") {
            self.switch(depth)?
        } else if let Some((op, with_expression)) = lookup_branch(text) {
            let expression = if with_expression {
                Some(Box::new(self.node(depth + 1)?))
            } else {
                None
            };
            NodeKind::Branch { op, expression }
        } else {
            self.operator(text, depth)?
        };
        Ok(Node {
            loc: line.loc(),
            kind,
        })
    }

    fn symbol(&mut self, line: &Line<'a>, rest: &str) -> Result<NodeKind, SlurpError> {
        let (name, tail) = rest
            .split_once('\'')
            .ok_or_else(|| self.read_error(line.number, "unterminated symbol name"))?;
        // Constant symbols may print their value underneath.
        self.skip_children(line.depth);
        Ok(NodeKind::Symbol {
            name: name.to_string(),
            ty: split_type(tail).1.unwrap_or_default(),
        })
    }

    fn constant(&mut self, depth: usize) -> NodeKind {
        let mut values = Vec::new();
        let mut basic = BasicType::Float;
        while let Some(line) = self.lines.get(self.pos).filter(|line| line.depth > depth) {
            if line.depth == depth + 1 {
                let (value, kind) = parse_const(line.text);
                values.push(value);
                basic = kind;
            }
            self.pos += 1;
        }
        let size = u32::try_from(values.len()).unwrap_or(u32::MAX);
        NodeKind::Constant {
            ty: NodeType::vector(basic, size),
            values,
        }
    }

    fn selection(&mut self, line: &Line<'a>) -> Result<NodeKind, SlurpError> {
        let depth = line.depth;
        let ty = split_type(line.text).1.unwrap_or_default();
        let mut condition = None;
        let mut accept = None;
        let mut reject = None;
        while let Some(label) = self.peek_at(depth + 1) {
            let slot = match label {
                "Condition" => &mut condition,
                "true case" => &mut accept,
                "false case" => &mut reject,
                "true case is null" => {
                    self.pos += 1;
                    continue;
                }
                _ => break,
            };
            self.pos += 1;
            *slot = Some(Box::new(self.node(depth + 1)?));
        }
        let condition = condition
            .ok_or_else(|| self.read_error(line.number, "selection without a condition"))?;
        Ok(NodeKind::Selection {
            ty,
            condition,
            accept,
            reject,
        })
    }

    fn looping(&mut self, line: &Line<'a>) -> Result<NodeKind, SlurpError> {
        let depth = line.depth;
        let test_first = !line.text.contains("not tested first");
        let mut test = None;
        let mut terminal = None;
        let mut body = None;
        while let Some(label) = self.peek_at(depth + 1) {
            let slot = match label {
                "Loop Condition" => &mut test,
                "Loop Body" => &mut body,
                "Loop Terminal Expression" => &mut terminal,
                "No loop condition" | "No loop body" => {
                    self.pos += 1;
                    continue;
                }
                _ => break,
            };
            self.pos += 1;
            *slot = Some(Box::new(self.node(depth + 1)?));
        }
        Ok(NodeKind::Loop {
            test_first,
            test,
            terminal,
            body,
        })
    }

    /// `condition` and `body` labels sit at the depth of the switch itself.
    fn switch(&mut self, depth: usize) -> Result<NodeKind, SlurpError> {
        self.expect_label(depth, "condition")?;
        let condition = Box::new(self.node(depth + 1)?);
        self.expect_label(depth, "body")?;
        let body = Box::new(self.node(depth + 1)?);
        Ok(NodeKind::Switch { condition, body })
    }

    fn operator(&mut self, text: &str, depth: usize) -> Result<NodeKind, SlurpError> {
        let (head, ty) = split_type(text);

        let named = [
            ("Function Definition:", Op::Function),
            ("Function Call:", Op::FunctionCall),
            ("Function Parameters:", Op::Parameters),
        ];
        for (prefix, op) in named {
            if let Some(name) = head.strip_prefix(prefix) {
                return Ok(NodeKind::Aggregate {
                    op,
                    name: name.trim().to_string(),
                    ty: ty.unwrap_or_default(),
                    children: self.children(depth)?,
                });
            }
        }

        // `arr.length()` on a runtime-sized array.
        if head == "array length" {
            let mut children = self.children(depth)?;
            if children.len() == 1 {
                return Ok(NodeKind::Method {
                    name: "length".to_string(),
                    ty: ty.unwrap_or_default(),
                    object: Box::new(children.remove(0)),
                });
            }
            let description = head.to_string();
            return Ok(match ty {
                Some(ty) => NodeKind::Typed { description, ty },
                None => NodeKind::Other { description },
            });
        }

        // Struct member access is printed as `field: direct index for structure`.
        let head = match head.split_once(": ") {
            Some((_, op)) if op == "direct index for structure" => op,
            _ => head,
        };

        let (op, shape) = match head {
            "Sequence" => (Op::Sequence, Shape::Aggregate),
            "Linker Objects" => (Op::LinkerObjects, Shape::Aggregate),
            _ => match lookup_operator(head) {
                Some(found) => found,
                None => {
                    log::trace!("unrecognised tree line '{text}'");
                    self.skip_children(depth);
                    let description = head.to_string();
                    return Ok(match ty {
                        Some(ty) => NodeKind::Typed { description, ty },
                        None => NodeKind::Other { description },
                    });
                }
            },
        };

        let ty = ty.unwrap_or_default();
        let mut children = self.children(depth)?;
        Ok(match shape {
            Shape::Unary if children.len() == 1 => NodeKind::Unary {
                op,
                ty,
                operand: Box::new(children.remove(0)),
            },
            Shape::Binary if children.len() == 2 => {
                let right = children.remove(1);
                let left = children.remove(0);
                NodeKind::Binary {
                    op,
                    ty,
                    left: Box::new(left),
                    right: Box::new(right),
                }
            }
            _ => NodeKind::Aggregate {
                op,
                name: String::new(),
                ty,
                children,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_prefixes() {
        let line = Line::lex(1, "0:? Sequence").unwrap();
        assert_eq!((line.line, line.depth, line.text), (0, 0, "Sequence"));

        let line = Line::lex(2, "0:12    Function Parameters: ").unwrap();
        assert_eq!(line.line, 12);
        assert_eq!(line.depth, 2);
        assert_eq!(line.text, "Function Parameters:");

        let line = Line::lex(3, "0:?     'k' ( uniform float)").unwrap();
        assert_eq!(line.depth, 2);
    }

    #[test]
    fn lex_skips_headers() {
        assert!(Line::lex(1, "Shader version: 450").is_none());
        assert!(Line::lex(1, "gl_FragCoord origin is upper left").is_none());
        assert!(Line::lex(1, "ERROR: 0:3: 'x' : undeclared identifier").is_none());
        assert!(Line::lex(1, "Linked fragment stage:").is_none());
        assert!(Line::lex(1, "").is_none());
    }

    #[test]
    fn types() {
        assert_eq!(
            parse_type("temp 4-component vector of float"),
            NodeType::vector(BasicType::Float, 4)
        );
        assert_eq!(
            parse_type("uniform 3X4 matrix of float"),
            NodeType::matrix(BasicType::Float, 3, 4)
        );
        assert_eq!(
            parse_type("temp 2-element array of 3-component vector of int"),
            NodeType::vector(BasicType::Int, 3).with_array_sizes([2])
        );
        assert_eq!(
            parse_type("layout( location=0) out bool"),
            NodeType {
                basic: BasicType::Bool,
                ..NodeType::default()
            }
        );
        assert_eq!(parse_type("uniform sampler2D").basic, BasicType::Sampler);
        assert_eq!(
            parse_type("buffer runtime-sized array of float").array_sizes,
            vec![0]
        );
        assert_eq!(parse_type("gibberish").basic, BasicType::Unknown);
    }

    #[test]
    fn split_nested_parens() {
        let (head, ty) = split_type("Function Definition: main( ( global void)");
        assert_eq!(head, "Function Definition: main(");
        assert_eq!(ty.map(|t| t.basic), Some(BasicType::Void));

        let (head, ty) = split_type("Test condition and select ( temp void): no shortcircuit");
        assert_eq!(head, "Test condition and select");
        assert!(ty.is_some());

        assert_eq!(split_type("Sequence"), ("Sequence", None));
        assert_eq!(split_type("unbalanced )").1, None);
    }

    #[test]
    fn constants() {
        assert_eq!(
            parse_const("1.500000"),
            (ConstValue::Float(1.5), BasicType::Float)
        );
        assert_eq!(
            parse_const("-3 (const int)"),
            (ConstValue::Int(-3), BasicType::Int)
        );
        assert_eq!(
            parse_const("7 (const uint)"),
            (ConstValue::Uint(7), BasicType::Uint)
        );
        assert_eq!(
            parse_const("true (const bool)"),
            (ConstValue::Bool(true), BasicType::Bool)
        );
    }

    #[test]
    fn branch_lines() {
        assert_eq!(lookup_branch("Branch: Return"), Some((Op::Return, false)));
        assert_eq!(
            lookup_branch("Branch: Return with expression"),
            Some((Op::Return, true))
        );
        assert_eq!(lookup_branch("case:  with expression"), Some((Op::Case, true)));
        assert_eq!(lookup_branch("default:"), Some((Op::Default, false)));
        assert_eq!(lookup_branch("Sequence"), None);
    }

    #[test]
    fn empty_input() {
        assert!(matches!(read_tree(""), Err(SlurpError::EmptyTree)));
        assert!(matches!(
            read_tree("Shader version: 450\n"),
            Err(SlurpError::EmptyTree)
        ));
    }

    #[test]
    fn unknown_operator_keeps_its_type() {
        let text = "0:? Sequence\n0:1  mystery op ( temp float)\n0:1    'x' ( temp float)\n";
        let tree = read_tree(text).unwrap();
        let NodeKind::Aggregate { children, .. } = tree.kind else {
            panic!("root is not an aggregate");
        };
        assert_eq!(children.len(), 1);
        assert!(matches!(
            &children[0].kind,
            NodeKind::Typed { description, .. } if description == "mystery op"
        ));
    }

    #[test]
    fn array_length_is_a_method() {
        let text = "\
0:? Sequence
0:4  array length ( temp int)
0:4    'data' ( buffer unsized 1-element array of float)
";
        let tree = read_tree(text).unwrap();
        let NodeKind::Aggregate { children, .. } = tree.kind else {
            panic!("root is not an aggregate");
        };
        let NodeKind::Method { name, ty, object } = &children[0].kind else {
            panic!("expected a method, got {:?}", children[0].kind);
        };
        assert_eq!(name, "length");
        assert_eq!(ty.basic, BasicType::Int);
        assert!(matches!(&object.kind, NodeKind::Symbol { name, .. } if name == "data"));
        assert_eq!(children[0].loc.line, 4);
    }

    #[test]
    fn switch_labels() {
        let text = "\
0:? Sequence
0:3  switch
0:3  condition
0:3    'i' ( temp int)
0:3  body
0:3    Sequence
0:4      case:  with expression
0:4        Constant:
0:4          0 (const int)
0:5      Branch: Break
";
        let tree = read_tree(text).unwrap();
        let NodeKind::Aggregate { children, .. } = tree.kind else {
            panic!("root is not an aggregate");
        };
        let NodeKind::Switch { condition, body } = &children[0].kind else {
            panic!("expected a switch, got {:?}", children[0].kind);
        };
        assert!(matches!(condition.kind, NodeKind::Symbol { .. }));
        let NodeKind::Aggregate { children: cases, .. } = &body.kind else {
            panic!("switch body is not a sequence");
        };
        assert_eq!(cases.len(), 2);
    }

    #[test]
    fn truncated_switch_is_an_error() {
        let text = "0:? Sequence\n0:3  switch\n0:3  condition\n0:3    'i' ( temp int)\n";
        assert!(matches!(read_tree(text), Err(SlurpError::Read { .. })));
    }
}

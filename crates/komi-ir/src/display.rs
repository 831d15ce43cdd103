//! Display implementations and the pseudo-source rendering of a [`Komi`].

use std::fmt;

use crate::Komi;
use crate::func::FunctionDefinition;
use crate::stmt::{Statement, StatementBlockId};
use crate::types::{BaseKind, TypeDescriptor};
use crate::value::{RValue, RValueOperator, TypedValue, ValueId};

/// Rendered in place of an l-value id that cannot be resolved.
pub const INVALID_LVALUE: &str = "INVALID_LVALUE";
/// Rendered in place of an r-value id that cannot be resolved.
pub const INVALID_RVALUE: &str = "INVALID_RVALUE";
/// Rendered for every literal; the payload is not retained.
pub const LITERAL: &str = "LITERAL";

const INDENT: usize = 4;

impl fmt::Display for BaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Void => "void",
            Self::Float => "float",
            Self::Double => "double",
            Self::Float16 => "float16_t",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Int64 => "int64_t",
            Self::Uint64 => "uint64_t",
            Self::Bool => "bool",
            Self::Sampler => "sampler",
            Self::Struct => "struct",
            Self::Block => "block",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_type(self))
    }
}

impl fmt::Display for RValueOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Formats a type descriptor as `float`, `vec3<int>`, `mat4x3<float>` and
/// so on, followed by its array dimensions.
pub fn format_type(ty: &TypeDescriptor) -> String {
    let mut out = match (ty.columns, ty.rows) {
        (1, 1) => format!("{}", ty.base),
        (1, rows) => format!("vec{rows}<{}>", ty.base),
        (columns, rows) => format!("mat{columns}x{rows}<{}>", ty.base),
    };
    for size in &ty.array_sizes {
        match size {
            0 => out.push_str("[]"),
            n => out.push_str(&format!("[{n}]")),
        }
    }
    out
}

/// Renders a value reference as an s-expression.
///
/// L-values render as their name, operators as `(Op arg ...)`, calls as
/// `(name arg ...)` and literals as [`LITERAL`]. Unresolvable ids render as
/// [`INVALID_LVALUE`] or [`INVALID_RVALUE`].
pub fn render_value(komi: &Komi, value: TypedValue) -> String {
    match value.value {
        ValueId::LValue(id) => match komi.lvalue(value.ty, id) {
            Ok(lvalue) => lvalue.name.clone(),
            Err(_) => INVALID_LVALUE.to_string(),
        },
        ValueId::RValue(id) => match komi.rvalue(value.ty, id) {
            Ok(RValue::Literal) => LITERAL.to_string(),
            Ok(RValue::Operator { op, args }) => format_application(komi, &op.to_string(), args),
            Ok(RValue::FunctionCall { function, args }) => {
                let name = komi.function_name(*function).unwrap_or(INVALID_RVALUE);
                format_application(komi, name, args)
            }
            Err(_) => INVALID_RVALUE.to_string(),
        },
    }
}

fn format_application(komi: &Komi, head: &str, args: &[TypedValue]) -> String {
    let mut out = format!("({head}");
    for arg in args {
        out.push(' ');
        out.push_str(&render_value(komi, *arg));
    }
    out.push(')');
    out
}

/// Renders one statement at the given nesting depth.
pub fn render_statement(komi: &Komi, stmt: &Statement, depth: usize) -> String {
    let mut out = String::new();
    write_stmt(&mut out, komi, stmt, depth);
    out
}

/// Renders the statements of a block at the given nesting depth.
///
/// An unknown block id renders as nothing.
pub fn render_block(komi: &Komi, block: StatementBlockId, depth: usize) -> String {
    let mut out = String::new();
    write_block(&mut out, komi, block, depth);
    out
}

fn write_block(out: &mut String, komi: &Komi, block: StatementBlockId, depth: usize) {
    if let Ok(stmts) = komi.block(block) {
        for stmt in stmts {
            write_stmt(out, komi, stmt, depth);
        }
    }
}

fn write_stmt(out: &mut String, komi: &Komi, stmt: &Statement, depth: usize) {
    let pad = " ".repeat(depth * INDENT);
    match stmt {
        Statement::Expression(value) => {
            out.push_str(&format!("{pad}{};\n", render_value(komi, *value)));
        }
        Statement::If {
            condition,
            accept,
            reject,
        } => {
            out.push_str(&format!("{pad}if ({}) {{\n", render_value(komi, *condition)));
            write_block(out, komi, *accept, depth + 1);
            if let Some(reject) = reject {
                out.push_str(&format!("{pad}}} else {{\n"));
                write_block(out, komi, *reject, depth + 1);
            }
            out.push_str(&format!("{pad}}}\n"));
        }
        Statement::Switch { condition, body } => {
            out.push_str(&format!(
                "{pad}switch ({}) {{\n",
                render_value(komi, *condition)
            ));
            write_block(out, komi, *body, depth + 1);
            out.push_str(&format!("{pad}}}\n"));
        }
        Statement::Branch { op, operand } => {
            // Labels sit one level out from the statements they select.
            let (pad, terminator) = if op.is_label() {
                (" ".repeat(depth.saturating_sub(1) * INDENT), ':')
            } else {
                (pad, ';')
            };
            let keyword = op.keyword();
            match operand {
                Some(value) => out.push_str(&format!(
                    "{pad}{keyword} {}{terminator}\n",
                    render_value(komi, *value)
                )),
                None => out.push_str(&format!("{pad}{keyword}{terminator}\n")),
            }
        }
        Statement::Loop {
            condition,
            terminal,
            test_first,
            body,
        } => {
            let cond = condition
                .map(|c| render_value(komi, c))
                .unwrap_or_default();
            if !test_first {
                out.push_str(&format!("{pad}do {{\n"));
                write_block(out, komi, *body, depth + 1);
                out.push_str(&format!("{pad}}} while ({cond});\n"));
                return;
            }
            match (condition, terminal) {
                (Some(_), None) => out.push_str(&format!("{pad}while ({cond}) {{\n")),
                _ => {
                    let term = terminal.map(|t| render_value(komi, t)).unwrap_or_default();
                    out.push_str(&format!("{pad}for (;{cond};{term}) {{\n"));
                }
            }
            write_block(out, komi, *body, depth + 1);
            out.push_str(&format!("{pad}}}\n"));
        }
    }
}

fn write_function(out: &mut String, komi: &Komi, func: &FunctionDefinition) {
    let name = komi.function_name(func.name).unwrap_or("INVALID_FUNCTION");
    // Return types and parameters are not part of the graph.
    match func.body {
        None => out.push_str(&format!("RTYPE {name}PARAMS);\n")),
        Some(body) => {
            out.push_str(&format!("RTYPE {name}PARAMS) {{\n"));
            write_block(out, komi, body, 1);
            out.push_str("}\n");
        }
    }
}

/// Renders every function definition of `komi`, in order, as readable
/// pseudo-source.
pub fn render(komi: &Komi) -> String {
    let mut out = String::new();
    for func in &komi.functions {
        write_function(&mut out, komi, func);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stmt::BranchOperator;
    use crate::store::Id;
    use crate::types::TypeId;
    use crate::value::{LValue, RValueId};

    fn float_komi() -> (Komi, TypeId) {
        let mut komi = Komi::new();
        let ty = komi.intern_type(TypeDescriptor::scalar(BaseKind::Float));
        (komi, ty)
    }

    #[test]
    fn display_types() {
        assert_eq!(format_type(&TypeDescriptor::scalar(BaseKind::Float)), "float");
        assert_eq!(
            format_type(&TypeDescriptor::vector(BaseKind::Int, 3)),
            "vec3<int>"
        );
        assert_eq!(
            format_type(&TypeDescriptor::matrix(BaseKind::Float, 4, 3)),
            "mat4x3<float>"
        );
        assert_eq!(
            format!(
                "{}",
                TypeDescriptor::scalar(BaseKind::Bool).with_array_sizes([0, 2])
            ),
            "bool[][2]"
        );
    }

    #[test]
    fn display_operator() {
        assert_eq!(RValueOperator::Add.to_string(), "Add");
        assert_eq!(RValueOperator::VectorSwizzle.to_string(), "VectorSwizzle");
    }

    #[test]
    fn render_operator_application() {
        let (mut komi, ty) = float_komi();
        let a = komi.intern_lvalue(ty, LValue::new("a"));
        let b = komi.intern_lvalue(ty, LValue::new("b"));
        let add = komi.intern_rvalue(
            ty,
            RValue::Operator {
                op: RValueOperator::Add,
                args: vec![TypedValue::lvalue(ty, a), TypedValue::lvalue(ty, b)],
            },
        );
        assert_eq!(render_value(&komi, TypedValue::rvalue(ty, add)), "(Add a b)");
    }

    #[test]
    fn render_call_and_literal() {
        let (mut komi, ty) = float_komi();
        let lit = komi.intern_rvalue(ty, RValue::Literal);
        let foo = komi.intern_function_name("foo(f1;");
        let call = komi.intern_rvalue(
            ty,
            RValue::FunctionCall {
                function: foo,
                args: vec![TypedValue::rvalue(ty, lit)],
            },
        );
        assert_eq!(
            render_value(&komi, TypedValue::rvalue(ty, call)),
            "(foo(f1; LITERAL)"
        );
    }

    #[test]
    fn render_invalid_values() {
        let (komi, ty) = float_komi();
        assert_eq!(render_value(&komi, TypedValue::INVALID), INVALID_RVALUE);
        assert_eq!(
            render_value(&komi, TypedValue::lvalue(ty, Id::INVALID)),
            INVALID_LVALUE
        );
        assert_eq!(
            render_value(&komi, TypedValue::rvalue(ty, RValueId::from_raw(9))),
            INVALID_RVALUE
        );
    }

    #[test]
    fn render_if_else() {
        let (mut komi, ty) = float_komi();
        let c = komi.intern_lvalue(ty, LValue::new("c"));
        let ret = komi.intern_block(vec![Statement::Branch {
            op: BranchOperator::Return,
            operand: None,
        }]);
        let brk = komi.intern_block(vec![Statement::Branch {
            op: BranchOperator::Break,
            operand: None,
        }]);
        let stmt = Statement::If {
            condition: TypedValue::lvalue(ty, c),
            accept: ret,
            reject: Some(brk),
        };
        assert_eq!(
            render_statement(&komi, &stmt, 0),
            "if (c) {\n    return;\n} else {\n    break;\n}\n"
        );
    }

    #[test]
    fn render_loops() {
        let (mut komi, ty) = float_komi();
        let c = TypedValue::lvalue(ty, komi.intern_lvalue(ty, LValue::new("c")));
        let i = TypedValue::lvalue(ty, komi.intern_lvalue(ty, LValue::new("i")));
        let inc = TypedValue::rvalue(
            ty,
            komi.intern_rvalue(
                ty,
                RValue::Operator {
                    op: RValueOperator::PostIncrement,
                    args: vec![i],
                },
            ),
        );
        let body = komi.intern_block(Vec::new());

        let pre = Statement::Loop {
            condition: Some(c),
            terminal: None,
            test_first: true,
            body,
        };
        assert_eq!(render_statement(&komi, &pre, 0), "while (c) {\n}\n");

        let counted = Statement::Loop {
            condition: Some(c),
            terminal: Some(inc),
            test_first: true,
            body,
        };
        assert_eq!(
            render_statement(&komi, &counted, 0),
            "for (;c;(PostIncrement i)) {\n}\n"
        );

        let post = Statement::Loop {
            condition: Some(c),
            terminal: None,
            test_first: false,
            body,
        };
        assert_eq!(render_statement(&komi, &post, 1), "    do {\n    } while (c);\n");

        let forever = Statement::Loop {
            condition: None,
            terminal: None,
            test_first: true,
            body,
        };
        assert_eq!(render_statement(&komi, &forever, 0), "for (;;) {\n}\n");
    }

    #[test]
    fn render_switch_labels_outdented() {
        let (mut komi, ty) = float_komi();
        let x = TypedValue::lvalue(ty, komi.intern_lvalue(ty, LValue::new("x")));
        let one = TypedValue::rvalue(ty, komi.intern_rvalue(ty, RValue::Literal));
        let body = komi.intern_block(vec![
            Statement::Branch {
                op: BranchOperator::Case,
                operand: Some(one),
            },
            Statement::Branch {
                op: BranchOperator::Break,
                operand: None,
            },
            Statement::Branch {
                op: BranchOperator::Default,
                operand: None,
            },
            Statement::Branch {
                op: BranchOperator::Discard,
                operand: None,
            },
        ]);
        let stmt = Statement::Switch {
            condition: x,
            body,
        };
        assert_eq!(
            render_statement(&komi, &stmt, 1),
            "    switch (x) {\n    case LITERAL:\n        break;\n    default:\n        discard;\n    }\n"
        );
    }

    #[test]
    fn render_prototype_and_definition() {
        let mut komi = Komi::new();
        let proto = komi.intern_function_name("bar(");
        let main = komi.intern_function_name("main(");
        let body = komi.intern_block(vec![Statement::Branch {
            op: BranchOperator::Return,
            operand: None,
        }]);
        komi.functions.push(FunctionDefinition {
            name: proto,
            body: None,
        });
        komi.functions.push(FunctionDefinition {
            name: main,
            body: Some(body),
        });
        assert_eq!(
            render(&komi),
            "RTYPE bar(PARAMS);\nRTYPE main(PARAMS) {\n    return;\n}\n"
        );
    }

    #[test]
    fn render_empty_komi() {
        assert_eq!(render(&Komi::default()), "");
    }
}

//! Slurp pass: glslang intermediate tree → `komi_ir::Komi`.

use komi_ir::{
    Block, BranchOperator, FunctionDefinition, Komi, LValue, RValue, RValueOperator, Statement,
    StatementBlockId, TypeDescriptor, TypeId, TypedValue,
};

use crate::SlurpError;
use crate::classify;
use crate::diag::{Diagnostic, DiagnosticLevel, DiagnosticSink};
use crate::tree::{Node, NodeKind, NodeType, Op};

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Translation-unit context: the graph under construction and the sink that
/// receives everything that had to be skipped.
struct SlurpCtx<'d> {
    komi: Komi,
    diag: &'d mut dyn DiagnosticSink,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Slurps one translation unit rooted at a `Sequence` aggregate.
///
/// Only structural violations of the tree are errors. Nodes that cannot be
/// interpreted are reported to `diag` and skipped.
pub fn slurp(root: &Node, diag: &mut dyn DiagnosticSink) -> Result<Komi, SlurpError> {
    let mut ctx = SlurpCtx {
        komi: Komi::new(),
        diag,
    };
    ctx.slurp_root(root)?;
    log::debug!(
        "slurped {} function(s), {} type(s)",
        ctx.komi.functions.len(),
        ctx.komi.types.len()
    );
    Ok(ctx.komi)
}

impl SlurpCtx<'_> {
    fn report(
        &mut self,
        level: DiagnosticLevel,
        message: &str,
        node: &Node,
        parent: Option<&Node>,
    ) {
        self.diag.emit(Diagnostic {
            level,
            message: message.to_string(),
            node: node.describe(),
            parent: parent.map(Node::describe),
            location: node.loc.clone(),
        });
    }

    fn error(&mut self, message: &str, node: &Node, parent: &Node) {
        self.report(DiagnosticLevel::Error, message, node, Some(parent));
    }

    // -----------------------------------------------------------------------
    // Root and functions
    // -----------------------------------------------------------------------

    fn slurp_root(&mut self, root: &Node) -> Result<(), SlurpError> {
        let NodeKind::Aggregate {
            op: Op::Sequence,
            children,
            ..
        } = &root.kind
        else {
            return Err(SlurpError::RootNotSequence {
                node: root.describe(),
                location: root.loc.clone(),
            });
        };

        for child in children {
            match &child.kind {
                NodeKind::Aggregate {
                    op: Op::Function,
                    name,
                    children: parts,
                    ..
                } => {
                    let def = self.slurp_function(child, name, parts)?;
                    self.komi.functions.push(def);
                }
                // Global initializers and linker objects are not captured.
                NodeKind::Aggregate {
                    op: Op::LinkerObjects | Op::Sequence,
                    ..
                } => {
                    log::debug!("{}: skipping {}", child.loc, child.describe());
                    self.report(
                        DiagnosticLevel::Info,
                        "global objects are not captured",
                        child,
                        Some(root),
                    );
                }
                _ => self.error("unhandled child of root", child, root),
            }
        }
        Ok(())
    }

    fn slurp_function(
        &mut self,
        node: &Node,
        name: &str,
        parts: &[Node],
    ) -> Result<FunctionDefinition, SlurpError> {
        if !(1..=2).contains(&parts.len()) {
            return Err(SlurpError::MalformedFunction {
                name: name.to_string(),
                children: parts.len(),
                location: node.loc.clone(),
            });
        }

        let name = self.komi.intern_function_name(name);
        // parts[0] is the parameter list, which is not part of the graph.
        let body = parts.get(1).map(|body| self.slurp_block(body, node));
        Ok(FunctionDefinition { name, body })
    }

    // -----------------------------------------------------------------------
    // Statements
    // -----------------------------------------------------------------------

    /// Lowers a `Sequence` (or a single statement) into an interned block.
    fn slurp_block(&mut self, node: &Node, parent: &Node) -> StatementBlockId {
        let mut out = Block::new();
        match &node.kind {
            NodeKind::Aggregate {
                op: Op::Sequence,
                children,
                ..
            } => {
                for child in children {
                    self.slurp_statement(child, node, &mut out);
                }
            }
            _ => self.slurp_statement(node, parent, &mut out),
        }
        self.komi.intern_block(out)
    }

    fn slurp_optional_block(&mut self, node: Option<&Node>, parent: &Node) -> StatementBlockId {
        match node {
            Some(node) => self.slurp_block(node, parent),
            None => self.komi.intern_block(Block::new()),
        }
    }

    fn slurp_statement(&mut self, node: &Node, parent: &Node, out: &mut Block) {
        match &node.kind {
            NodeKind::Loop {
                test_first,
                test,
                terminal,
                body,
            } => {
                let condition = test.as_deref().map(|test| self.slurp_value(test, node));
                // A bare l-value terminal has no effect.
                let terminal = terminal
                    .as_deref()
                    .map(|terminal| self.slurp_value(terminal, node))
                    .filter(|terminal| terminal.is_rvalue());
                let body = self.slurp_optional_block(body.as_deref(), node);
                out.push(Statement::Loop {
                    condition,
                    terminal,
                    test_first: *test_first,
                    body,
                });
            }
            NodeKind::Branch { op, expression } => {
                let op = match classify::branch_operator(*op) {
                    Some(op) => op,
                    None => {
                        self.error("unmapped branch operator", node, parent);
                        BranchOperator::Discard
                    }
                };
                let operand = expression
                    .as_deref()
                    .map(|expression| self.slurp_value(expression, node));
                out.push(Statement::Branch { op, operand });
            }
            NodeKind::Switch { condition, body } => {
                if !condition.is_typed() {
                    self.error("switch condition is not an expression", condition, node);
                    return;
                }
                let condition = self.slurp_value(condition, node);
                let body = self.slurp_block(body, node);
                out.push(Statement::Switch { condition, body });
            }
            NodeKind::Selection {
                condition,
                accept,
                reject,
                ..
            } => {
                let condition = self.slurp_value(condition, node);
                let accept = self.slurp_optional_block(accept.as_deref(), node);
                let reject = reject.as_deref().map(|reject| self.slurp_block(reject, node));
                out.push(Statement::If {
                    condition,
                    accept,
                    reject,
                });
            }
            NodeKind::Aggregate {
                op: Op::Sequence,
                children,
                ..
            } => {
                for child in children {
                    self.slurp_statement(child, node, out);
                }
            }
            _ if node.is_typed() => {
                let value = self.slurp_value(node, parent);
                // Bare l-values have no effect. A failed value was already reported.
                if value.is_rvalue() && value.is_valid() {
                    out.push(Statement::Expression(value));
                }
            }
            _ => self.error("cannot convert to statement", node, parent),
        }
    }

    // -----------------------------------------------------------------------
    // Values
    // -----------------------------------------------------------------------

    fn slurp_value(&mut self, node: &Node, parent: &Node) -> TypedValue {
        match &node.kind {
            NodeKind::Symbol { name, ty } => {
                let ty = self.slurp_type(ty);
                let id = self.komi.intern_lvalue(ty, LValue::new(name.as_str()));
                TypedValue::lvalue(ty, id)
            }
            NodeKind::Constant { ty, values } => {
                let ty = self.slurp_type(ty);
                log::trace!("{}: literal (size = {})", node.loc, values.len());
                self.intern_rvalue(ty, RValue::Literal)
            }
            NodeKind::Unary { op, ty, operand } => {
                let ty = self.slurp_type(ty);
                let op = self.rvalue_operator(*op, node, parent);
                let operand = self.slurp_value(operand, node);
                self.intern_rvalue(
                    ty,
                    RValue::Operator {
                        op,
                        args: vec![operand],
                    },
                )
            }
            // The selected components are not captured.
            NodeKind::Binary {
                op: Op::VectorSwizzle,
                ty,
                ..
            } => {
                let ty = self.slurp_type(ty);
                self.intern_rvalue(
                    ty,
                    RValue::Operator {
                        op: RValueOperator::VectorSwizzle,
                        args: Vec::new(),
                    },
                )
            }
            NodeKind::Binary {
                op,
                ty,
                left,
                right,
            } => {
                let ty = self.slurp_type(ty);
                let op = self.rvalue_operator(*op, node, parent);
                let left = self.slurp_value(left, node);
                let right = self.slurp_value(right, node);
                self.intern_rvalue(
                    ty,
                    RValue::Operator {
                        op,
                        args: vec![left, right],
                    },
                )
            }
            NodeKind::Selection {
                ty,
                condition,
                accept,
                reject,
            } => {
                let ty = self.slurp_type(ty);
                let (Some(accept), Some(reject)) = (
                    accept.as_deref().filter(|n| n.is_typed()),
                    reject.as_deref().filter(|n| n.is_typed()),
                ) else {
                    self.error("ternary branches must be expressions", node, parent);
                    return TypedValue::INVALID;
                };
                let condition = self.slurp_value(condition, node);
                let accept = self.slurp_value(accept, node);
                let reject = self.slurp_value(reject, node);
                self.intern_rvalue(
                    ty,
                    RValue::Operator {
                        op: RValueOperator::Ternary,
                        args: vec![condition, accept, reject],
                    },
                )
            }
            NodeKind::Aggregate {
                op: Op::Function | Op::LinkerObjects | Op::Parameters | Op::Sequence,
                ..
            } => self.unconvertible(node, parent),
            NodeKind::Aggregate {
                op: Op::FunctionCall,
                name,
                ty,
                children,
            } => {
                let ty = self.slurp_type(ty);
                let function = self.komi.intern_function_name(name);
                let args = self.slurp_args(children, node);
                self.intern_rvalue(ty, RValue::FunctionCall { function, args })
            }
            NodeKind::Aggregate {
                op, ty, children, ..
            } => {
                let ty = self.slurp_type(ty);
                let op = self.rvalue_operator(*op, node, parent);
                let args = self.slurp_args(children, node);
                self.intern_rvalue(ty, RValue::Operator { op, args })
            }
            _ => self.unconvertible(node, parent),
        }
    }

    /// Lowers operands, skipping any that are not expressions.
    fn slurp_args(&mut self, children: &[Node], parent: &Node) -> Vec<TypedValue> {
        let mut args = Vec::with_capacity(children.len());
        for child in children {
            if child.is_typed() {
                args.push(self.slurp_value(child, parent));
            } else {
                self.error("argument is not an expression", child, parent);
            }
        }
        args
    }

    fn intern_rvalue(&mut self, ty: TypeId, rvalue: RValue) -> TypedValue {
        TypedValue::rvalue(ty, self.komi.intern_rvalue(ty, rvalue))
    }

    fn unconvertible(&mut self, node: &Node, parent: &Node) -> TypedValue {
        self.error("cannot convert to value", node, parent);
        TypedValue::INVALID
    }

    fn rvalue_operator(&mut self, op: Op, node: &Node, parent: &Node) -> RValueOperator {
        match classify::rvalue_operator(op) {
            Some(op) => op,
            None => {
                self.error("unmapped r-value operator", node, parent);
                RValueOperator::Unknown
            }
        }
    }

    // -----------------------------------------------------------------------
    // Types
    // -----------------------------------------------------------------------

    fn slurp_type(&mut self, ty: &NodeType) -> TypeId {
        self.komi.intern_type(TypeDescriptor {
            base: classify::base_kind(ty.basic),
            columns: ty.matrix_cols.max(1),
            rows: ty.matrix_rows.max(ty.vector_size).max(1),
            array_sizes: ty.array_sizes.clone(),
        })
    }
}

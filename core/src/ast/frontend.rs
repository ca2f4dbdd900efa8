//! Python front end backed by rustpython-parser.
//!
//! Parsing is delegated entirely to the library; this module only adapts its
//! tree into the closed `AstNodeKind` union and attaches 1-based source
//! locations. Constructs with no counterpart in the union are rejected here
//! with a located error. Constructs that exist in the union but are not
//! lowerable (loop `else`, `finally`, keyword arguments, ...) are carried
//! through so the lowering can reject them.

use rustpython_parser::Parse;
use rustpython_parser::ast::{self as py_ast, Ranged};
use rustpython_parser::text_size::TextRange;

use crate::ast::kind::{
    AstNodeKind, BinaryOperator, BoolOperator, CompareOperator, Constant, Keyword, Param,
    SequenceKind, TypeExpr, UnaryOperator,
};
use crate::ast::node::AstNode;
use crate::error::{TranslateError, TranslateResult};
use crate::location::LineIndex;
use crate::script::Script;

type PyStmt = py_ast::Stmt<TextRange>;
type PyExpr = py_ast::Expr<TextRange>;
type PyConstant = py_ast::Constant;

const ISSUER: &str = "serpent.ast.frontend";

/// Parse `script` and adapt the result into an `AstNodeKind::Module` tree.
pub fn parse_script(script: &Script) -> TranslateResult<AstNode> {
    let path = script.display_path();
    let index = LineIndex::new(&path, &script.content);

    let suite = py_ast::Suite::parse(&script.content, &path).map_err(|err| {
        let location = index.location(u32::from(err.offset) as usize);
        TranslateError::syntax(
            format!("{} failed to compile due to: {}", location.file_link(), err.error),
            Some(location),
        )
    })?;

    let adapter = Adapter { index: &index };
    let body = adapter.block(&suite)?;
    log::debug!("parsed {} top-level statements from {}", body.len(), path);

    Ok(AstNode::new(
        AstNodeKind::Module { body },
        Some(index.location(0)),
        None,
    ))
}

struct Adapter<'a> {
    index: &'a LineIndex,
}

impl Adapter<'_> {
    fn node(&self, range: TextRange, kind: AstNodeKind) -> AstNode {
        let start = u32::from(range.start()) as usize;
        let end = u32::from(range.end()) as usize;
        AstNode::new(
            kind,
            Some(self.index.location(start)),
            Some(self.index.span(start, end)),
        )
    }

    fn unsupported(&self, range: TextRange, message: String) -> TranslateError {
        self.located(range, TranslateError::translation(message, ISSUER))
    }

    fn unknown_type(&self, range: TextRange, message: String) -> TranslateError {
        self.located(range, TranslateError::unknown_type(message))
    }

    fn located(&self, range: TextRange, err: TranslateError) -> TranslateError {
        let start = u32::from(range.start()) as usize;
        let end = u32::from(range.end()) as usize;
        let location = self.index.location(start);
        let tag = location.file_link();
        TranslateError::tagged(err, &tag, location, Some(self.index.span(start, end)))
    }

    fn block(&self, stmts: &[PyStmt]) -> TranslateResult<Vec<AstNode>> {
        stmts.iter().map(|stmt| self.stmt(stmt)).collect()
    }

    fn stmt(&self, stmt: &PyStmt) -> TranslateResult<AstNode> {
        match stmt {
            PyStmt::FunctionDef(def) => {
                if !def.decorator_list.is_empty() {
                    return Err(self.unsupported(def.range, "decorators are not supported".into()));
                }
                let params = self.params(&def.args, def.range)?;
                let returns = match &def.returns {
                    Some(annotation) => Some(self.type_expr(annotation)?),
                    None => None,
                };
                let body = self.block(&def.body)?;
                Ok(self.node(
                    def.range,
                    AstNodeKind::FunctionDef {
                        name: def.name.as_str().to_string(),
                        params,
                        returns,
                        body,
                    },
                ))
            }
            PyStmt::ClassDef(def) => {
                if !def.decorator_list.is_empty() {
                    return Err(self.unsupported(def.range, "decorators are not supported".into()));
                }
                if !def.keywords.is_empty() {
                    return Err(self.unsupported(
                        def.range,
                        "class keyword arguments are not supported".into(),
                    ));
                }
                let mut bases = Vec::with_capacity(def.bases.len());
                for base in &def.bases {
                    match base {
                        PyExpr::Name(name) => bases.push(name.id.as_str().to_string()),
                        _ => {
                            return Err(self.unsupported(
                                def.range,
                                "base classes must be plain names".into(),
                            ));
                        }
                    }
                }
                let body = self.block(&def.body)?;
                Ok(self.node(
                    def.range,
                    AstNodeKind::ClassDef {
                        name: def.name.as_str().to_string(),
                        bases,
                        body,
                    },
                ))
            }
            PyStmt::Assign(assign) => {
                let targets = assign
                    .targets
                    .iter()
                    .map(|target| self.expr(target))
                    .collect::<TranslateResult<Vec<_>>>()?;
                let value = self.expr(&assign.value)?;
                Ok(self.node(
                    assign.range,
                    AstNodeKind::Assign {
                        targets,
                        value: Box::new(value),
                    },
                ))
            }
            PyStmt::AnnAssign(assign) => {
                let target = self.expr(&assign.target)?;
                let annotation = self.type_expr(&assign.annotation)?;
                let value = match &assign.value {
                    Some(value) => Some(Box::new(self.expr(value)?)),
                    None => None,
                };
                Ok(self.node(
                    assign.range,
                    AstNodeKind::AnnAssign {
                        target: Box::new(target),
                        annotation,
                        value,
                    },
                ))
            }
            PyStmt::AugAssign(assign) => Ok(self.node(
                assign.range,
                AstNodeKind::AugAssign {
                    target: Box::new(self.expr(&assign.target)?),
                    op: binary_operator(&assign.op),
                    value: Box::new(self.expr(&assign.value)?),
                },
            )),
            PyStmt::If(stmt_if) => Ok(self.node(
                stmt_if.range,
                AstNodeKind::If {
                    test: Box::new(self.expr(&stmt_if.test)?),
                    body: self.block(&stmt_if.body)?,
                    orelse: self.block(&stmt_if.orelse)?,
                },
            )),
            PyStmt::While(stmt_while) => Ok(self.node(
                stmt_while.range,
                AstNodeKind::While {
                    test: Box::new(self.expr(&stmt_while.test)?),
                    body: self.block(&stmt_while.body)?,
                    orelse: self.block(&stmt_while.orelse)?,
                },
            )),
            PyStmt::For(stmt_for) => Ok(self.node(
                stmt_for.range,
                AstNodeKind::For {
                    target: Box::new(self.expr(&stmt_for.target)?),
                    iter: Box::new(self.expr(&stmt_for.iter)?),
                    body: self.block(&stmt_for.body)?,
                    orelse: self.block(&stmt_for.orelse)?,
                },
            )),
            PyStmt::Try(stmt_try) => {
                let mut handlers = Vec::with_capacity(stmt_try.handlers.len());
                for handler in &stmt_try.handlers {
                    let py_ast::ExceptHandler::ExceptHandler(handler) = handler;
                    let exception_type = match handler.type_.as_deref() {
                        None => None,
                        Some(PyExpr::Name(name)) => Some(name.id.as_str().to_string()),
                        Some(_) => {
                            return Err(self.unsupported(
                                handler.range,
                                "exception handlers must name a single exception class".into(),
                            ));
                        }
                    };
                    handlers.push(self.node(
                        handler.range,
                        AstNodeKind::ExceptHandler {
                            exception_type,
                            name: handler.name.as_ref().map(|n| n.as_str().to_string()),
                            body: self.block(&handler.body)?,
                        },
                    ));
                }
                Ok(self.node(
                    stmt_try.range,
                    AstNodeKind::Try {
                        body: self.block(&stmt_try.body)?,
                        handlers,
                        orelse: self.block(&stmt_try.orelse)?,
                        finalbody: self.block(&stmt_try.finalbody)?,
                    },
                ))
            }
            PyStmt::Raise(raise) => {
                if raise.cause.is_some() {
                    return Err(self.unsupported(
                        raise.range,
                        "exception chaining with `from` is not supported".into(),
                    ));
                }
                let exception = match &raise.exc {
                    Some(exc) => Some(Box::new(self.expr(exc)?)),
                    None => None,
                };
                Ok(self.node(raise.range, AstNodeKind::Raise { exception }))
            }
            PyStmt::Return(ret) => {
                let value = match &ret.value {
                    Some(value) => Some(Box::new(self.expr(value)?)),
                    None => None,
                };
                Ok(self.node(ret.range, AstNodeKind::Return { value }))
            }
            PyStmt::Break(stmt) => Ok(self.node(stmt.range, AstNodeKind::Break)),
            PyStmt::Continue(stmt) => Ok(self.node(stmt.range, AstNodeKind::Continue)),
            PyStmt::Pass(stmt) => Ok(self.node(stmt.range, AstNodeKind::Pass)),
            PyStmt::Import(import) => {
                let module = import
                    .names
                    .iter()
                    .map(|alias| alias.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                Ok(self.node(import.range, AstNodeKind::Import { module }))
            }
            PyStmt::ImportFrom(import) => {
                let module = import
                    .module
                    .as_ref()
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                Ok(self.node(import.range, AstNodeKind::Import { module }))
            }
            PyStmt::Expr(expr_stmt) => Ok(self.node(
                expr_stmt.range,
                AstNodeKind::Expr {
                    value: Box::new(self.expr(&expr_stmt.value)?),
                },
            )),
            PyStmt::With(stmt) => Err(self.unsupported(stmt.range, "`with` blocks are not supported".into())),
            PyStmt::Delete(stmt) => Err(self.unsupported(stmt.range, "`del` is not supported".into())),
            PyStmt::Global(stmt) => Err(self.unsupported(stmt.range, "`global` is not supported".into())),
            PyStmt::Nonlocal(stmt) => Err(self.unsupported(stmt.range, "`nonlocal` is not supported".into())),
            PyStmt::Assert(stmt) => Err(self.unsupported(stmt.range, "`assert` is not supported".into())),
            PyStmt::AsyncFunctionDef(stmt) => {
                Err(self.unsupported(stmt.range, "async functions are not supported".into()))
            }
            other => Err(self.unsupported(
                other.range(),
                format!("{} is not supported", statement_name(other)),
            )),
        }
    }

    fn params(
        &self,
        args: &py_ast::Arguments<TextRange>,
        range: TextRange,
    ) -> TranslateResult<Vec<Param>> {
        if args.vararg.is_some() || args.kwarg.is_some() || !args.kwonlyargs.is_empty() {
            return Err(self.unsupported(
                range,
                "variadic and keyword-only parameters are not supported".into(),
            ));
        }
        let mut params = Vec::with_capacity(args.posonlyargs.len() + args.args.len());
        for arg in args.posonlyargs.iter().chain(args.args.iter()) {
            if arg.default.is_some() {
                return Err(self.unsupported(
                    arg.def.range,
                    format!("default value for {} is not supported", arg.def.arg.as_str()),
                ));
            }
            let annotation = match &arg.def.annotation {
                Some(annotation) => Some(self.type_expr(annotation)?),
                None => None,
            };
            params.push(Param {
                name: arg.def.arg.as_str().to_string(),
                annotation,
            });
        }
        Ok(params)
    }

    fn type_expr(&self, expr: &PyExpr) -> TranslateResult<TypeExpr> {
        match expr {
            PyExpr::Name(name) => Ok(TypeExpr::named(name.id.as_str())),
            PyExpr::Attribute(attr) => Ok(TypeExpr::named(attr.attr.as_str())),
            PyExpr::Constant(constant) => match &constant.value {
                PyConstant::None => Ok(TypeExpr::named("None")),
                PyConstant::Str(text) => TypeExpr::parse(text).ok_or_else(|| {
                    self.unknown_type(constant.range, format!("No conversion for {:?} is known", text))
                }),
                _ => Err(self.unknown_type(constant.range, "Unsupported annotation".into())),
            },
            PyExpr::Subscript(subscript) => {
                let base = self.type_expr(&subscript.value)?;
                let args = match subscript.slice.as_ref() {
                    PyExpr::Tuple(tuple) => tuple
                        .elts
                        .iter()
                        .map(|elt| self.type_expr(elt))
                        .collect::<TranslateResult<Vec<_>>>()?,
                    single => vec![self.type_expr(single)?],
                };
                Ok(TypeExpr::generic(base.name, args))
            }
            other => Err(self.unknown_type(
                other.range(),
                format!("Unsupported annotation: {}", expression_name(other)),
            )),
        }
    }

    fn exprs(&self, exprs: &[PyExpr]) -> TranslateResult<Vec<AstNode>> {
        exprs.iter().map(|expr| self.expr(expr)).collect()
    }

    fn expr(&self, expr: &PyExpr) -> TranslateResult<AstNode> {
        match expr {
            PyExpr::Constant(constant) => {
                let value = self.constant(&constant.value, constant.range)?;
                Ok(self.node(constant.range, AstNodeKind::Constant { value }))
            }
            PyExpr::Name(name) => Ok(self.node(
                name.range,
                AstNodeKind::Name {
                    id: name.id.as_str().to_string(),
                },
            )),
            PyExpr::Attribute(attr) => Ok(self.node(
                attr.range,
                AstNodeKind::Attribute {
                    value: Box::new(self.expr(&attr.value)?),
                    attr: attr.attr.as_str().to_string(),
                },
            )),
            PyExpr::Subscript(subscript) => {
                if let PyExpr::Slice(slice) = subscript.slice.as_ref() {
                    return Err(self.unsupported(slice.range, "slicing is not supported".into()));
                }
                Ok(self.node(
                    subscript.range,
                    AstNodeKind::Subscript {
                        value: Box::new(self.expr(&subscript.value)?),
                        index: Box::new(self.expr(&subscript.slice)?),
                    },
                ))
            }
            PyExpr::Call(call) => {
                let mut args = Vec::with_capacity(call.args.len());
                for arg in &call.args {
                    if let PyExpr::Starred(starred) = arg {
                        return Err(self.unsupported(
                            starred.range,
                            "starred arguments are not supported".into(),
                        ));
                    }
                    args.push(self.expr(arg)?);
                }
                let mut keywords = Vec::with_capacity(call.keywords.len());
                for keyword in &call.keywords {
                    keywords.push(Keyword {
                        name: keyword.arg.as_ref().map(|a| a.as_str().to_string()),
                        value: self.expr(&keyword.value)?,
                    });
                }
                Ok(self.node(
                    call.range,
                    AstNodeKind::Call {
                        func: Box::new(self.expr(&call.func)?),
                        args,
                        keywords,
                    },
                ))
            }
            PyExpr::BinOp(bin) => Ok(self.node(
                bin.range,
                AstNodeKind::BinOp {
                    op: binary_operator(&bin.op),
                    left: Box::new(self.expr(&bin.left)?),
                    right: Box::new(self.expr(&bin.right)?),
                },
            )),
            PyExpr::UnaryOp(unary) => Ok(self.node(
                unary.range,
                AstNodeKind::UnaryOp {
                    op: unary_operator(&unary.op),
                    operand: Box::new(self.expr(&unary.operand)?),
                },
            )),
            PyExpr::BoolOp(bool_op) => Ok(self.node(
                bool_op.range,
                AstNodeKind::BoolOp {
                    op: match bool_op.op {
                        py_ast::BoolOp::And => BoolOperator::And,
                        py_ast::BoolOp::Or => BoolOperator::Or,
                    },
                    values: self.exprs(&bool_op.values)?,
                },
            )),
            PyExpr::Compare(compare) => Ok(self.node(
                compare.range,
                AstNodeKind::Compare {
                    left: Box::new(self.expr(&compare.left)?),
                    ops: compare.ops.iter().map(compare_operator).collect(),
                    comparators: self.exprs(&compare.comparators)?,
                },
            )),
            PyExpr::List(list) => Ok(self.node(
                list.range,
                AstNodeKind::Sequence {
                    kind: SequenceKind::List,
                    elements: self.exprs(&list.elts)?,
                },
            )),
            PyExpr::Tuple(tuple) => Ok(self.node(
                tuple.range,
                AstNodeKind::Sequence {
                    kind: SequenceKind::Tuple,
                    elements: self.exprs(&tuple.elts)?,
                },
            )),
            PyExpr::Lambda(lambda) => Err(self.unsupported(lambda.range, "lambdas are not supported".into())),
            PyExpr::ListComp(comp) => {
                Err(self.unsupported(comp.range, "comprehensions are not supported".into()))
            }
            PyExpr::Dict(dict) => Err(self.unsupported(dict.range, "dict literals are not supported".into())),
            PyExpr::IfExp(ifexp) => {
                Err(self.unsupported(ifexp.range, "conditional expressions are not supported".into()))
            }
            PyExpr::JoinedStr(joined) => {
                Err(self.unsupported(joined.range, "f-strings are not supported".into()))
            }
            other => Err(self.unsupported(
                other.range(),
                format!("{} is not supported", expression_name(other)),
            )),
        }
    }

    fn constant(&self, constant: &PyConstant, range: TextRange) -> TranslateResult<Constant> {
        match constant {
            PyConstant::None => Ok(Constant::None),
            PyConstant::Bool(value) => Ok(Constant::Bool(*value)),
            PyConstant::Str(value) => Ok(Constant::Str(value.clone())),
            PyConstant::Int(value) => {
                let text = value.to_string();
                text.parse::<i64>().map(Constant::Int).map_err(|_| {
                    self.unsupported(range, format!("integer literal {} does not fit in 64 bits", text))
                })
            }
            PyConstant::Float(value) => Ok(Constant::Float(*value)),
            _ => Err(self.unsupported(range, "constant type is not supported".into())),
        }
    }
}

/// Short description of a statement for diagnostics.
fn statement_name(stmt: &PyStmt) -> &'static str {
    match stmt {
        PyStmt::Match(_) => "`match` statement",
        PyStmt::AsyncFor(_) => "`async for` loop",
        PyStmt::AsyncWith(_) => "`async with` block",
        PyStmt::TryStar(_) => "`except*` handler",
        _ => "statement",
    }
}

fn expression_name(expr: &PyExpr) -> &'static str {
    match expr {
        PyExpr::Set(_) => "set literal",
        PyExpr::SetComp(_) | PyExpr::DictComp(_) | PyExpr::GeneratorExp(_) => "comprehension",
        PyExpr::NamedExpr(_) => "assignment expression (`:=`)",
        PyExpr::Await(_) => "`await`",
        PyExpr::Yield(_) | PyExpr::YieldFrom(_) => "`yield`",
        PyExpr::Starred(_) => "starred expression",
        PyExpr::Slice(_) => "slice",
        PyExpr::BinOp(_) => "operator expression",
        PyExpr::Call(_) => "call",
        PyExpr::List(_) | PyExpr::Tuple(_) => "sequence literal",
        _ => "expression",
    }
}

fn binary_operator(op: &py_ast::Operator) -> BinaryOperator {
    match op {
        py_ast::Operator::Add => BinaryOperator::Add,
        py_ast::Operator::Sub => BinaryOperator::Sub,
        py_ast::Operator::Mult => BinaryOperator::Mult,
        py_ast::Operator::MatMult => BinaryOperator::MatMult,
        py_ast::Operator::Div => BinaryOperator::Div,
        py_ast::Operator::Mod => BinaryOperator::Mod,
        py_ast::Operator::Pow => BinaryOperator::Pow,
        py_ast::Operator::LShift => BinaryOperator::LShift,
        py_ast::Operator::RShift => BinaryOperator::RShift,
        py_ast::Operator::BitOr => BinaryOperator::BitOr,
        py_ast::Operator::BitXor => BinaryOperator::BitXor,
        py_ast::Operator::BitAnd => BinaryOperator::BitAnd,
        py_ast::Operator::FloorDiv => BinaryOperator::FloorDiv,
    }
}

fn unary_operator(op: &py_ast::UnaryOp) -> UnaryOperator {
    match op {
        py_ast::UnaryOp::Invert => UnaryOperator::Invert,
        py_ast::UnaryOp::Not => UnaryOperator::Not,
        py_ast::UnaryOp::UAdd => UnaryOperator::UAdd,
        py_ast::UnaryOp::USub => UnaryOperator::USub,
    }
}

fn compare_operator(op: &py_ast::CmpOp) -> CompareOperator {
    match op {
        py_ast::CmpOp::Eq => CompareOperator::Eq,
        py_ast::CmpOp::NotEq => CompareOperator::NotEq,
        py_ast::CmpOp::Lt => CompareOperator::Lt,
        py_ast::CmpOp::LtE => CompareOperator::LtE,
        py_ast::CmpOp::Gt => CompareOperator::Gt,
        py_ast::CmpOp::GtE => CompareOperator::GtE,
        py_ast::CmpOp::Is => CompareOperator::Is,
        py_ast::CmpOp::IsNot => CompareOperator::IsNot,
        py_ast::CmpOp::In => CompareOperator::In,
        py_ast::CmpOp::NotIn => CompareOperator::NotIn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> TranslateResult<AstNode> {
        parse_script(&Script::from_source("test.py", source))
    }

    #[test]
    fn adapts_function_with_annotations() {
        let module = parse("def add(a: int, b: int) -> int:\n    return a + b\n").expect("parse");
        let AstNodeKind::Module { body } = &module.kind else {
            panic!("expected module");
        };
        let AstNodeKind::FunctionDef { name, params, returns, body } = &body[0].kind else {
            panic!("expected function");
        };
        assert_eq!(name, "add");
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].annotation, Some(TypeExpr::named("int")));
        assert_eq!(returns.as_ref(), Some(&TypeExpr::named("int")));
        assert!(matches!(body[0].kind, AstNodeKind::Return { .. }));
        assert_eq!(body[0].line(), Some(2));
    }

    #[test]
    fn adapts_generic_annotation() {
        let module = parse("xs: List[int] = [1, 2]\n").expect("parse");
        let AstNodeKind::Module { body } = &module.kind else {
            panic!("expected module");
        };
        let AstNodeKind::AnnAssign { annotation, .. } = &body[0].kind else {
            panic!("expected annotated assignment");
        };
        assert_eq!(annotation.to_string(), "List[int]");
    }

    #[test]
    fn syntax_errors_carry_location() {
        let err = parse("def broken(:\n").expect_err("syntax error");
        assert_eq!(err.kind(), crate::error::ErrorKind::Syntax);
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn rejects_lambdas_with_location() {
        let err = parse("x = 1\nf = lambda y: y\n").expect_err("lambda");
        assert!(err.to_string().starts_with("<File \"test.py\", line 2>"));
    }
}

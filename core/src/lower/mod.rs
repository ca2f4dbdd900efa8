//! file: core/src/lower/mod.rs
//! description: AST -> C++ lowering driver.
//!
//! `Lowerer` owns one `TranslationState` and walks a syntax tree depth-first,
//! dispatching each node kind to the helpers in `lower_stmt`, `lower_expr`
//! and `lower_objects`. Every visit routes failures through
//! `diagnostics::attach_location` so the caller receives a single located
//! error.

pub mod buffer;
pub mod diagnostics;
pub mod lowering_context;
pub mod scope;
pub mod tables;

mod lower_expr;
mod lower_objects;
mod lower_stmt;

use crate::ast::{AstNode, AstNodeKind, TypeExpr};
use crate::config::Config;
use crate::error::{TranslateError, TranslateResult};
use crate::script::Script;

use lowering_context::TranslationState;

pub use buffer::EmitBuffer;
pub use scope::DeclarationTracker;

pub(crate) const ISSUER: &str = "serpent.lower";

pub struct Lowerer<'a> {
    state: TranslationState,
    source: Option<&'a Script>,
    receiver: String,
}

impl<'a> Lowerer<'a> {
    /// A lowerer for a tree parsed from `script`.
    pub fn new(script: &'a Script, config: &Config) -> Self {
        Lowerer {
            state: TranslationState::new(script.display_path(), config.indent_width),
            source: Some(script),
            receiver: config.receiver.clone(),
        }
    }

    /// A lowerer for a tree with no backing source text, e.g. one built by
    /// hand. `file` is only used in diagnostics.
    pub fn detached(file: &str, config: &Config) -> Self {
        Lowerer {
            state: TranslationState::new(file, config.indent_width),
            source: None,
            receiver: config.receiver.clone(),
        }
    }

    /// Lower `root` and serialize the result. Consumes the lowerer: state is
    /// never reused across files.
    pub fn lower(mut self, root: &AstNode) -> TranslateResult<String> {
        self.visit(root)?;
        log::debug!(
            "{}: {} fragments, {} includes, {} declared names",
            self.state.file,
            self.state.buffer.fragments().len(),
            self.state.includes.len(),
            self.state.declarations.len()
        );
        Ok(self.state.finish())
    }

    pub fn state(&self) -> &TranslationState {
        &self.state
    }

    /// Visit one node, tagging any failure with its location.
    pub fn visit(&mut self, node: &AstNode) -> TranslateResult<()> {
        let (line, column) = match node.get_location() {
            Some(loc) => {
                self.state.current_line = loc.line;
                (loc.line, loc.column)
            }
            None => (self.state.current_line, 1),
        };
        self.dispatch(node).map_err(|err| {
            diagnostics::attach_location(err, &self.state.file, line, column, node.get_span().cloned())
        })
    }

    fn dispatch(&mut self, node: &AstNode) -> TranslateResult<()> {
        match node.get_kind() {
            AstNodeKind::Module { body } => {
                log::debug!("lowering module {}", self.state.file);
                for child in body {
                    self.visit(child)?;
                }
                Ok(())
            }
            AstNodeKind::FunctionDef { name, params, returns, body } => {
                lower_objects::lower_function(self, node, name, params, returns.as_ref(), body)
            }
            AstNodeKind::ClassDef { name, bases, body } => {
                lower_objects::lower_class(self, name, bases, body)
            }
            AstNodeKind::Assign { targets, value } => lower_stmt::lower_assign(self, targets, value),
            AstNodeKind::AnnAssign { target, annotation, value } => {
                lower_stmt::lower_ann_assign(self, target, annotation, value.as_deref())
            }
            AstNodeKind::AugAssign { target, op, value } => {
                lower_stmt::lower_aug_assign(self, target, *op, value)
            }
            AstNodeKind::If { test, body, orelse } => lower_stmt::lower_if(self, test, body, orelse),
            AstNodeKind::While { test, body, orelse } => {
                lower_stmt::lower_while(self, test, body, orelse)
            }
            AstNodeKind::For { target, iter, body, orelse } => {
                lower_stmt::lower_for(self, target, iter, body, orelse)
            }
            AstNodeKind::Try { body, handlers, orelse, finalbody } => {
                lower_stmt::lower_try(self, body, handlers, orelse, finalbody)
            }
            AstNodeKind::ExceptHandler { exception_type, name, body } => {
                lower_stmt::lower_handler(self, exception_type.as_deref(), name.as_deref(), body)
            }
            AstNodeKind::Raise { exception } => lower_stmt::lower_raise(self, exception.as_deref()),
            AstNodeKind::Return { value } => lower_stmt::lower_return(self, value.as_deref()),
            AstNodeKind::Break => {
                self.end_statement("break;");
                Ok(())
            }
            AstNodeKind::Continue => {
                self.end_statement("continue;");
                Ok(())
            }
            AstNodeKind::Expr { value } => {
                self.visit(value)?;
                self.end_statement(";");
                Ok(())
            }
            AstNodeKind::Constant { value } => lower_expr::lower_constant(self, value),
            AstNodeKind::Name { id } => {
                self.emit(id);
                Ok(())
            }
            AstNodeKind::Attribute { value, attr } => lower_expr::lower_attribute(self, value, attr),
            AstNodeKind::Subscript { value, index } => lower_expr::lower_subscript(self, value, index),
            AstNodeKind::Call { func, args, keywords } => {
                lower_expr::lower_call(self, func, args, keywords)
            }
            AstNodeKind::BinOp { op, left, right } => lower_expr::lower_binop(self, *op, left, right),
            AstNodeKind::UnaryOp { op, operand } => lower_expr::lower_unaryop(self, *op, operand),
            AstNodeKind::BoolOp { op, values } => lower_expr::lower_boolop(self, *op, values),
            AstNodeKind::Compare { left, ops, comparators } => {
                lower_expr::lower_compare(self, left, ops, comparators)
            }
            AstNodeKind::Sequence { elements, .. } => lower_expr::lower_sequence(self, elements),
            AstNodeKind::Pass => Ok(()),
            AstNodeKind::Import { module } => {
                log::debug!("skipping import of {}", module);
                Ok(())
            }
        }
    }

    pub(crate) fn emit(&mut self, fragment: &str) {
        self.state.buffer.append(fragment);
    }

    pub(crate) fn end_statement(&mut self, terminator: &str) {
        self.state.buffer.end_statement(terminator);
    }

    /// Run `f` one indentation level deeper. The level is released on every
    /// exit path, including failure.
    pub(crate) fn with_indent<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> TranslateResult<T>,
    ) -> TranslateResult<T> {
        self.state.buffer.push_indent();
        let result = f(self);
        self.state.buffer.pop_indent();
        result
    }

    /// Run `f` with `name` as the enclosing class, restoring the previous one
    /// afterwards.
    pub(crate) fn with_class<T>(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut Self) -> TranslateResult<T>,
    ) -> TranslateResult<T> {
        let previous = self.state.current_class.replace(name.to_string());
        let result = f(self);
        self.state.current_class = previous;
        result
    }

    /// Lower a statement list one level deeper.
    pub(crate) fn lower_block(&mut self, body: &[AstNode]) -> TranslateResult<()> {
        self.with_indent(|l| {
            for stmt in body {
                l.visit(stmt)?;
            }
            Ok(())
        })
    }

    pub(crate) fn receiver(&self) -> &str {
        &self.receiver
    }

    /// Resolve a plain type name and record its header.
    pub(crate) fn resolve_type_name(&mut self, name: &str) -> TranslateResult<&'static str> {
        let mapping = tables::resolve_type(name)?;
        if let Some(header) = mapping.header {
            self.state.require_header(header);
        }
        Ok(mapping.target)
    }

    /// Render an annotation as a C++ type, recording required headers. Only
    /// the sequence types take type arguments: `List` exactly one, `Tuple`
    /// any number that agree on a single element type.
    pub(crate) fn cpp_type(&mut self, ty: &TypeExpr) -> TranslateResult<String> {
        let base = self.resolve_type_name(&ty.name)?;
        if ty.args.is_empty() {
            return Ok(base.to_string());
        }
        if base != "std::vector" {
            return Err(TranslateError::unknown_type(format!(
                "No conversion for {} is known: {} takes no type arguments",
                ty, ty.name
            )));
        }
        if matches!(ty.name.as_str(), "List" | "list") && ty.args.len() != 1 {
            return Err(TranslateError::unknown_type(format!(
                "No conversion for {} is known: {} takes exactly one type argument",
                ty, ty.name
            )));
        }
        let mut args = Vec::with_capacity(ty.args.len());
        for arg in &ty.args {
            args.push(self.cpp_type(arg)?);
        }
        // Tuples share the vector representation, so their elements must agree.
        args.dedup();
        if args.len() != 1 {
            return Err(TranslateError::unknown_type(format!(
                "No conversion for {} is known: elements must share one type",
                ty
            )));
        }
        Ok(format!("{}<{}>", base, args[0]))
    }

    /// The text of the source line a node starts on, when source is attached.
    pub(crate) fn source_line(&self, node: &AstNode) -> Option<&'a str> {
        let script = self.source?;
        script.line(node.line()?)
    }
}

/// Lower a parsed tree into C++ text.
pub fn lower_ast_to_cpp(ast: &AstNode, script: &Script, config: &Config) -> TranslateResult<String> {
    Lowerer::new(script, config).lower(ast)
}

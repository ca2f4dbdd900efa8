//! Lowering helpers for statement nodes.
//!
//! Each helper emits complete lines into the buffer of the `Lowerer` it is
//! handed. Unsupported shapes fail before anything is emitted for the
//! statement.

use crate::ast::{AstNode, AstNodeKind, BinaryOperator, Constant, TypeExpr};
use crate::error::{TranslateError, TranslateResult};

use super::{tables, Lowerer, ISSUER};

pub(super) fn lower_assign(
    l: &mut Lowerer<'_>,
    targets: &[AstNode],
    value: &AstNode,
) -> TranslateResult<()> {
    let [target] = targets else {
        return Err(TranslateError::translation(
            format!("Assignment to {} targets at once is not supported", targets.len()),
            ISSUER,
        ));
    };
    match target.get_kind() {
        AstNodeKind::Name { id } => {
            if l.state.declarations.is_first_declaration(id) {
                log::trace!("first assignment to {}", id);
                l.emit("auto ");
            }
            l.visit(target)?;
        }
        AstNodeKind::Attribute { .. } | AstNodeKind::Subscript { .. } => l.visit(target)?,
        other => {
            return Err(TranslateError::translation(
                format!("Cannot assign to {} in C++", other),
                ISSUER,
            ));
        }
    }
    l.emit(" = ");
    l.visit(value)?;
    l.end_statement(";");
    Ok(())
}

pub(super) fn lower_ann_assign(
    l: &mut Lowerer<'_>,
    target: &AstNode,
    annotation: &TypeExpr,
    value: Option<&AstNode>,
) -> TranslateResult<()> {
    let cpp = l.cpp_type(annotation)?;
    l.emit(&format!("{} ", cpp));
    l.visit(target)?;
    if let Some(value) = value {
        l.emit(" = ");
        l.visit(value)?;
    }
    l.end_statement(";");
    Ok(())
}

pub(super) fn lower_aug_assign(
    l: &mut Lowerer<'_>,
    target: &AstNode,
    op: BinaryOperator,
    value: &AstNode,
) -> TranslateResult<()> {
    let op = tables::resolve_operator(op)?;
    l.visit(target)?;
    l.emit(&format!(" {}= ", op));
    l.visit(value)?;
    l.end_statement(";");
    Ok(())
}

fn lower_test(l: &mut Lowerer<'_>, test: &AstNode) -> TranslateResult<()> {
    l.emit("(");
    l.visit(test)?;
    l.end_statement(")");
    Ok(())
}

pub(super) fn lower_if(
    l: &mut Lowerer<'_>,
    test: &AstNode,
    body: &[AstNode],
    orelse: &[AstNode],
) -> TranslateResult<()> {
    if orelse.len() > 1 {
        return Err(TranslateError::translation(
            "More than one elif node, unknown action",
            ISSUER,
        ));
    }
    l.emit("if ");
    lower_test(l, test)?;
    l.end_statement("{");
    l.lower_block(body)?;

    match orelse.first() {
        Some(branch) if matches!(branch.get_kind(), AstNodeKind::If { .. }) => {
            l.emit("} else ");
            l.visit(branch)?;
        }
        Some(branch) => {
            l.end_statement("} else {");
            l.with_indent(|l| l.visit(branch))?;
            l.end_statement("}");
        }
        None => l.end_statement("}"),
    }
    Ok(())
}

pub(super) fn lower_while(
    l: &mut Lowerer<'_>,
    test: &AstNode,
    body: &[AstNode],
    orelse: &[AstNode],
) -> TranslateResult<()> {
    if !orelse.is_empty() {
        return Err(TranslateError::translation(
            "C++ does not support else statements on while loops",
            ISSUER,
        ));
    }
    l.emit("while ");
    lower_test(l, test)?;
    l.end_statement("{");
    l.lower_block(body)?;
    l.end_statement("}");
    Ok(())
}

pub(super) fn lower_for(
    l: &mut Lowerer<'_>,
    target: &AstNode,
    iter: &AstNode,
    body: &[AstNode],
    orelse: &[AstNode],
) -> TranslateResult<()> {
    if !matches!(target.get_kind(), AstNodeKind::Name { .. }) {
        return Err(TranslateError::translation(
            "C++ does not support multiple targets in a loop",
            ISSUER,
        ));
    }
    if !orelse.is_empty() {
        return Err(TranslateError::translation(
            "C++ does not support else statements on for loops",
            ISSUER,
        ));
    }
    l.emit("for (auto& ");
    l.visit(target)?;
    l.emit(" : ");
    l.visit(iter)?;
    l.end_statement(") {");
    l.lower_block(body)?;
    l.end_statement("}");
    Ok(())
}

pub(super) fn lower_try(
    l: &mut Lowerer<'_>,
    body: &[AstNode],
    handlers: &[AstNode],
    orelse: &[AstNode],
    finalbody: &[AstNode],
) -> TranslateResult<()> {
    if !orelse.is_empty() {
        return Err(TranslateError::translation(
            "C++ does not support else statements on try blocks",
            ISSUER,
        ));
    }
    if !finalbody.is_empty() {
        return Err(TranslateError::translation(
            "C++ does not support finally statements on try blocks",
            ISSUER,
        ));
    }
    l.end_statement("try {");
    l.lower_block(body)?;
    l.end_statement("}");
    for handler in handlers {
        l.visit(handler)?;
    }
    Ok(())
}

pub(super) fn lower_handler(
    l: &mut Lowerer<'_>,
    exception_type: Option<&str>,
    name: Option<&str>,
    body: &[AstNode],
) -> TranslateResult<()> {
    let header = match exception_type {
        None => "catch (...){".to_string(),
        Some(exception) => {
            let cpp = match tables::resolve_exception_type(exception) {
                Ok(mapping) => {
                    if let Some(header) = mapping.header {
                        l.state.require_header(header);
                    }
                    mapping.target
                }
                Err(_) => l.resolve_type_name(exception)?,
            };
            match name {
                Some(name) => format!("catch ({}& {}){{", cpp, name),
                None => format!("catch ({}&){{", cpp),
            }
        }
    };
    l.end_statement(&header);
    l.lower_block(body)?;
    l.end_statement("}");
    Ok(())
}

pub(super) fn lower_raise(l: &mut Lowerer<'_>, exception: Option<&AstNode>) -> TranslateResult<()> {
    l.emit("throw");
    if let Some(exception) = exception {
        l.emit(" ");
        l.visit(exception)?;
    }
    l.end_statement(";");
    Ok(())
}

pub(super) fn lower_return(l: &mut Lowerer<'_>, value: Option<&AstNode>) -> TranslateResult<()> {
    l.emit("return");
    match value {
        None => {}
        Some(node) if matches!(node.get_kind(), AstNodeKind::Constant { value: Constant::None }) => {}
        Some(node) => {
            l.emit(" ");
            l.visit(node)?;
        }
    }
    l.end_statement(";");
    Ok(())
}

//! file: core/src/lower/lower_expr.rs
//! description: expression lowering helpers.
//!
//! Expressions are emitted inline into the current line. The syntax tree
//! carries no explicit parentheses, so operator operands that are themselves
//! operator expressions are wrapped to keep the tree's grouping.

use crate::ast::{
    AstNode, AstNodeKind, BinaryOperator, BoolOperator, CompareOperator, Constant, Keyword,
    UnaryOperator,
};
use crate::error::{TranslateError, TranslateResult};

use super::{tables, Lowerer, ISSUER};

const PRINT: &str = "print";

pub(super) fn lower_constant(l: &mut Lowerer<'_>, value: &Constant) -> TranslateResult<()> {
    let text = match value {
        Constant::Str(s) => format!("\"{}\"", escape_string(s)),
        Constant::Int(i) => i.to_string(),
        Constant::Float(f) => {
            if !f.is_finite() {
                return Err(TranslateError::translation(
                    format!("Float literal {} has no C++ spelling", f),
                    ISSUER,
                ));
            }
            // Debug formatting always keeps a decimal point or exponent.
            format!("{:?}", f)
        }
        Constant::Bool(b) => b.to_string(),
        Constant::None => "nullptr".to_string(),
    };
    l.emit(&text);
    Ok(())
}

/// Escape `s` for use inside a C++ string literal.
pub(super) fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\{:03o}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

pub(super) fn lower_attribute(l: &mut Lowerer<'_>, value: &AstNode, attr: &str) -> TranslateResult<()> {
    match value.get_kind() {
        AstNodeKind::Name { id } if id == l.receiver() => {
            l.emit(&format!("this->{}", attr));
        }
        _ => {
            l.visit(value)?;
            l.emit(&format!(".{}", attr));
        }
    }
    Ok(())
}

pub(super) fn lower_subscript(l: &mut Lowerer<'_>, value: &AstNode, index: &AstNode) -> TranslateResult<()> {
    l.visit(value)?;
    l.emit("[");
    l.visit(index)?;
    l.emit("]");
    Ok(())
}

pub(super) fn lower_call(
    l: &mut Lowerer<'_>,
    func: &AstNode,
    args: &[AstNode],
    keywords: &[Keyword],
) -> TranslateResult<()> {
    if !keywords.is_empty() {
        return Err(TranslateError::translation(
            "C++ does not support named arguments",
            ISSUER,
        ));
    }

    match func.get_kind() {
        AstNodeKind::Name { id } if id == PRINT => return lower_print(l, args),
        AstNodeKind::Name { id } if tables::is_known_type(id) => {
            let target = l.resolve_type_name(id)?;
            if target == tables::VALUELESS_EXCEPTION {
                if !args.is_empty() {
                    log::warn!(
                        "{} carries no message; dropping {} argument(s) to {}",
                        target,
                        args.len(),
                        id
                    );
                }
                l.emit(&format!("{}()", target));
                return Ok(());
            }
            l.emit(target);
        }
        _ => l.visit(func)?,
    }

    l.emit("(");
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            l.emit(", ");
        }
        l.visit(arg)?;
    }
    l.emit(")");
    Ok(())
}

/// `print(a, b + c)` becomes `std::cout << a << (b + c) << "\n"`. Boolean
/// literals switch the stream to `std::boolalpha` so they print as words.
fn lower_print(l: &mut Lowerer<'_>, args: &[AstNode]) -> TranslateResult<()> {
    l.state.require_header("<iostream>");
    l.emit("std::cout");
    let prints_bool = args
        .iter()
        .any(|arg| matches!(arg.get_kind(), AstNodeKind::Constant { value: Constant::Bool(_) }));
    if prints_bool {
        l.emit(" << std::boolalpha");
    }
    for arg in args {
        l.emit(" << ");
        match arg.get_kind() {
            AstNodeKind::Name { .. } | AstNodeKind::Constant { .. } => l.visit(arg)?,
            _ => {
                l.emit("(");
                l.visit(arg)?;
                l.emit(")");
            }
        }
    }
    l.emit(" << \"\\n\"");
    Ok(())
}

fn lower_operand(l: &mut Lowerer<'_>, operand: &AstNode) -> TranslateResult<()> {
    if operand.get_kind().is_compound() {
        l.emit("(");
        l.visit(operand)?;
        l.emit(")");
        Ok(())
    } else {
        l.visit(operand)
    }
}

pub(super) fn lower_binop(
    l: &mut Lowerer<'_>,
    op: BinaryOperator,
    left: &AstNode,
    right: &AstNode,
) -> TranslateResult<()> {
    let op = tables::resolve_operator(op)?;
    lower_operand(l, left)?;
    l.emit(&format!(" {} ", op));
    lower_operand(l, right)
}

pub(super) fn lower_unaryop(l: &mut Lowerer<'_>, op: UnaryOperator, operand: &AstNode) -> TranslateResult<()> {
    let op = tables::resolve_operator(op)?;
    l.emit(op);
    lower_operand(l, operand)
}

pub(super) fn lower_boolop(l: &mut Lowerer<'_>, op: BoolOperator, values: &[AstNode]) -> TranslateResult<()> {
    let op = tables::resolve_operator(op)?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            l.emit(&format!(" {} ", op));
        }
        lower_operand(l, value)?;
    }
    Ok(())
}

/// A single comparison is emitted bare; a chain `a < b < c` becomes
/// `(a < b) && (b < c)`, evaluating the middle operand twice.
pub(super) fn lower_compare(
    l: &mut Lowerer<'_>,
    left: &AstNode,
    ops: &[CompareOperator],
    comparators: &[AstNode],
) -> TranslateResult<()> {
    if ops.len() != comparators.len() || ops.is_empty() {
        return Err(TranslateError::translation(
            format!(
                "Malformed comparison: {} operators for {} operands",
                ops.len(),
                comparators.len()
            ),
            ISSUER,
        ));
    }
    let spelled = ops
        .iter()
        .map(|op| tables::resolve_operator(*op))
        .collect::<TranslateResult<Vec<_>>>()?;

    let chained = spelled.len() > 1;
    let mut previous = left;
    for (i, (op, operand)) in spelled.iter().zip(comparators).enumerate() {
        if i > 0 {
            l.emit(" && ");
        }
        if chained {
            l.emit("(");
        }
        lower_operand(l, previous)?;
        l.emit(&format!(" {} ", op));
        lower_operand(l, operand)?;
        if chained {
            l.emit(")");
        }
        previous = operand;
    }
    Ok(())
}

/// Tuples and lists both become a braced initializer, one element per line.
pub(super) fn lower_sequence(l: &mut Lowerer<'_>, elements: &[AstNode]) -> TranslateResult<()> {
    l.end_statement("{");
    l.with_indent(|l| {
        for (i, element) in elements.iter().enumerate() {
            l.visit(element)?;
            l.end_statement(if i + 1 < elements.len() { "," } else { "" });
        }
        Ok(())
    })?;
    l.emit("}");
    Ok(())
}

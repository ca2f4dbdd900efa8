//! file: core/src/lower/lower_objects.rs
//! description: function and class lowering.
//!
//! Functions become free functions or member functions depending on whether
//! a class body is being lowered; classes become `struct`s whose bases are
//! emitted as a comma-separated inheritance list.

use crate::ast::{AstNode, Param, TypeExpr};
use crate::error::{TranslateError, TranslateResult};

use super::{tables, Lowerer, ISSUER};

const INIT: &str = "__init__";

pub(super) fn lower_function(
    l: &mut Lowerer<'_>,
    node: &AstNode,
    name: &str,
    params: &[Param],
    returns: Option<&TypeExpr>,
    body: &[AstNode],
) -> TranslateResult<()> {
    let enclosing = l.state.enclosing_class().map(str::to_string);
    let is_init = name == INIT && enclosing.is_some();
    let emitted_name = match (&enclosing, is_init) {
        (Some(class), true) => class.clone(),
        _ => name.to_string(),
    };
    let is_constructor = enclosing.as_deref() == Some(emitted_name.as_str());
    log::debug!("lowering function {} (constructor: {})", emitted_name, is_constructor);

    let return_type = if is_init {
        String::new()
    } else {
        let annotation = match returns {
            Some(ty) => Some(ty.clone()),
            None => l.source_line(node).and_then(header_return_annotation),
        };
        match annotation {
            Some(ty) => l.cpp_type(&ty)?,
            None if is_constructor => String::new(),
            None => {
                return Err(TranslateError::function_type(format!(
                    "Functions must have a return type specified! ({} has none)",
                    name
                )));
            }
        }
    };

    let mut rendered = Vec::with_capacity(params.len());
    for param in params {
        if enclosing.is_some() && param.name == l.receiver() {
            continue;
        }
        let annotation = param.annotation.as_ref().ok_or_else(|| {
            TranslateError::translation(format!("Unknown type for {}", param.name), ISSUER)
        })?;
        let cpp = l.cpp_type(annotation)?;
        rendered.push(format!("{} {}", cpp, param.name));
    }

    if return_type.is_empty() {
        l.emit(&format!("{} (", emitted_name));
    } else {
        l.emit(&format!("{} {} (", return_type, emitted_name));
    }
    l.emit(&rendered.join(", "));
    l.end_statement(") {");
    l.lower_block(body)?;
    l.end_statement("}");
    Ok(())
}

pub(super) fn lower_class(
    l: &mut Lowerer<'_>,
    name: &str,
    bases: &[String],
    body: &[AstNode],
) -> TranslateResult<()> {
    log::debug!("lowering class {} with {} bases", name, bases.len());
    let mut rendered = Vec::with_capacity(bases.len());
    for base in bases {
        // Builtin exception bases take their C++ spelling; user classes keep theirs.
        if tables::is_known_type(base) {
            rendered.push(l.resolve_type_name(base)?.to_string());
        } else {
            rendered.push(base.clone());
        }
    }

    if rendered.is_empty() {
        l.end_statement(&format!("struct {} {{", name));
    } else {
        l.end_statement(&format!("struct {} : {} {{", name, rendered.join(", ")));
    }
    l.with_class(name, |l| l.lower_block(body))?;
    l.end_statement("};");
    Ok(())
}

/// Recover `T` from a header line of the form `def f(...) -> T:`.
pub(super) fn header_return_annotation(header: &str) -> Option<TypeExpr> {
    let (_, tail) = header.rsplit_once(") -> ")?;
    let tail = tail.trim_end();
    let tail = tail.strip_suffix(':').unwrap_or(tail);
    TypeExpr::parse(tail)
}

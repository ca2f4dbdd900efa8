//! file: core/src/ast/mod.rs
//! description: syntax tree types and the source -> tree entry point.

pub mod frontend;
pub mod kind;
pub mod node;

pub use kind::{
    AstNodeKind, BinaryOperator, BoolOperator, CompareOperator, Constant, Keyword, Operator,
    Param, SequenceKind, TypeExpr, UnaryOperator,
};
pub use node::AstNode;

use crate::error::TranslateResult;
use crate::script::Script;

/// Parse a script into a `Module` tree.
pub fn generate_ast_from_source(script: &Script) -> TranslateResult<AstNode> {
    if script.is_empty() {
        log::info!("{} is empty", script.display_path());
    }
    frontend::parse_script(script)
}

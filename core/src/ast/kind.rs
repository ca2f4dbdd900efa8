//! file: core/src/ast/kind.rs
//! description: syntax tree node kinds and operator enums.
//!
//! Defines `AstNodeKind` along with the operator enums and the small value
//! types (`Constant`, `TypeExpr`, `Param`, `Keyword`) the nodes carry. The
//! front end produces these; the lowering walks them.
//!
use std::fmt;

use super::node::AstNode;

/// Binary (arithmetic and bitwise) operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,      // +
    Sub,      // -
    Mult,     // *
    MatMult,  // @
    Div,      // /
    FloorDiv, // //
    Mod,      // %
    Pow,      // **
    LShift,   // <<
    RShift,   // >>
    BitOr,    // |
    BitAnd,   // &
    BitXor,   // ^
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    UAdd,   // +
    USub,   // -
    Not,    // not
    Invert, // ~
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOperator {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOperator {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

/// Any operator tag the operator table can be asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Binary(BinaryOperator),
    Unary(UnaryOperator),
    Bool(BoolOperator),
    Compare(CompareOperator),
}

impl fmt::Display for Operator {
    /// Source spelling of the operator.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Operator::Binary(op) => match op {
                BinaryOperator::Add => "+",
                BinaryOperator::Sub => "-",
                BinaryOperator::Mult => "*",
                BinaryOperator::MatMult => "@",
                BinaryOperator::Div => "/",
                BinaryOperator::FloorDiv => "//",
                BinaryOperator::Mod => "%",
                BinaryOperator::Pow => "**",
                BinaryOperator::LShift => "<<",
                BinaryOperator::RShift => ">>",
                BinaryOperator::BitOr => "|",
                BinaryOperator::BitAnd => "&",
                BinaryOperator::BitXor => "^",
            },
            Operator::Unary(op) => match op {
                UnaryOperator::UAdd => "+",
                UnaryOperator::USub => "-",
                UnaryOperator::Not => "not",
                UnaryOperator::Invert => "~",
            },
            Operator::Bool(op) => match op {
                BoolOperator::And => "and",
                BoolOperator::Or => "or",
            },
            Operator::Compare(op) => match op {
                CompareOperator::Eq => "==",
                CompareOperator::NotEq => "!=",
                CompareOperator::Lt => "<",
                CompareOperator::LtE => "<=",
                CompareOperator::Gt => ">",
                CompareOperator::GtE => ">=",
                CompareOperator::Is => "is",
                CompareOperator::IsNot => "is not",
                CompareOperator::In => "in",
                CompareOperator::NotIn => "not in",
            },
        };
        write!(f, "{}", text)
    }
}

impl From<BinaryOperator> for Operator {
    fn from(op: BinaryOperator) -> Self {
        Operator::Binary(op)
    }
}

impl From<UnaryOperator> for Operator {
    fn from(op: UnaryOperator) -> Self {
        Operator::Unary(op)
    }
}

impl From<BoolOperator> for Operator {
    fn from(op: BoolOperator) -> Self {
        Operator::Bool(op)
    }
}

impl From<CompareOperator> for Operator {
    fn from(op: CompareOperator) -> Self {
        Operator::Compare(op)
    }
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    None,
}

/// A type annotation such as `int` or `List[str]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeExpr {
    pub name: String,
    pub args: Vec<TypeExpr>,
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeExpr>) -> Self {
        TypeExpr {
            name: name.into(),
            args,
        }
    }

    /// Parse annotation text as written in a function header, e.g. `List[int]`.
    pub fn parse(text: &str) -> Option<TypeExpr> {
        let text = text.trim();
        match text.find('[') {
            None => {
                if text.is_empty() {
                    None
                } else {
                    Some(TypeExpr::named(text))
                }
            }
            Some(open) => {
                let inner = text[open + 1..].strip_suffix(']')?;
                let mut args = Vec::new();
                let mut depth = 0usize;
                let mut start = 0usize;
                for (i, ch) in inner.char_indices() {
                    match ch {
                        '[' => depth += 1,
                        ']' => depth = depth.checked_sub(1)?,
                        ',' if depth == 0 => {
                            args.push(TypeExpr::parse(&inner[start..i])?);
                            start = i + 1;
                        }
                        _ => {}
                    }
                }
                args.push(TypeExpr::parse(&inner[start..])?);
                Some(TypeExpr::generic(text[..open].trim(), args))
            }
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            let args: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
            write!(f, "[{}]", args.join(", "))?;
        }
        Ok(())
    }
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub annotation: Option<TypeExpr>,
}

/// A `name=value` argument at a call site.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub name: Option<String>,
    pub value: AstNode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    List,
    Tuple,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AstNodeKind {
    Module { body: Vec<AstNode> },

    // statements
    FunctionDef { name: String, params: Vec<Param>, returns: Option<TypeExpr>, body: Vec<AstNode> },
    ClassDef { name: String, bases: Vec<String>, body: Vec<AstNode> },
    Assign { targets: Vec<AstNode>, value: Box<AstNode> },
    AnnAssign { target: Box<AstNode>, annotation: TypeExpr, value: Option<Box<AstNode>> },
    AugAssign { target: Box<AstNode>, op: BinaryOperator, value: Box<AstNode> },
    If { test: Box<AstNode>, body: Vec<AstNode>, orelse: Vec<AstNode> },
    While { test: Box<AstNode>, body: Vec<AstNode>, orelse: Vec<AstNode> },
    For { target: Box<AstNode>, iter: Box<AstNode>, body: Vec<AstNode>, orelse: Vec<AstNode> },
    Try { body: Vec<AstNode>, handlers: Vec<AstNode>, orelse: Vec<AstNode>, finalbody: Vec<AstNode> },
    ExceptHandler { exception_type: Option<String>, name: Option<String>, body: Vec<AstNode> },
    Raise { exception: Option<Box<AstNode>> },
    Return { value: Option<Box<AstNode>> },
    Break,
    Continue,
    Pass,
    Import { module: String },
    Expr { value: Box<AstNode> },

    // expressions
    Constant { value: Constant },
    Name { id: String },
    Attribute { value: Box<AstNode>, attr: String },
    Subscript { value: Box<AstNode>, index: Box<AstNode> },
    Call { func: Box<AstNode>, args: Vec<AstNode>, keywords: Vec<Keyword> },
    BinOp { op: BinaryOperator, left: Box<AstNode>, right: Box<AstNode> },
    UnaryOp { op: UnaryOperator, operand: Box<AstNode> },
    BoolOp { op: BoolOperator, values: Vec<AstNode> },
    Compare { left: Box<AstNode>, ops: Vec<CompareOperator>, comparators: Vec<AstNode> },
    Sequence { kind: SequenceKind, elements: Vec<AstNode> },
}

impl AstNodeKind {
    /// Operator expressions whose text needs grouping when nested inside
    /// another operator expression.
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            AstNodeKind::BinOp { .. }
                | AstNodeKind::UnaryOp { .. }
                | AstNodeKind::BoolOp { .. }
                | AstNodeKind::Compare { .. }
        )
    }
}

impl fmt::Display for AstNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AstNodeKind::Module { .. } => "Module",
            AstNodeKind::FunctionDef { .. } => "FunctionDef",
            AstNodeKind::ClassDef { .. } => "ClassDef",
            AstNodeKind::Assign { .. } => "Assign",
            AstNodeKind::AnnAssign { .. } => "AnnAssign",
            AstNodeKind::AugAssign { .. } => "AugAssign",
            AstNodeKind::If { .. } => "If",
            AstNodeKind::While { .. } => "While",
            AstNodeKind::For { .. } => "For",
            AstNodeKind::Try { .. } => "Try",
            AstNodeKind::ExceptHandler { .. } => "ExceptHandler",
            AstNodeKind::Raise { .. } => "Raise",
            AstNodeKind::Return { .. } => "Return",
            AstNodeKind::Break => "Break",
            AstNodeKind::Continue => "Continue",
            AstNodeKind::Pass => "Pass",
            AstNodeKind::Import { .. } => "Import",
            AstNodeKind::Expr { .. } => "Expr",
            AstNodeKind::Constant { .. } => "Constant",
            AstNodeKind::Name { .. } => "Name",
            AstNodeKind::Attribute { .. } => "Attribute",
            AstNodeKind::Subscript { .. } => "Subscript",
            AstNodeKind::Call { .. } => "Call",
            AstNodeKind::BinOp { .. } => "BinOp",
            AstNodeKind::UnaryOp { .. } => "UnaryOp",
            AstNodeKind::BoolOp { .. } => "BoolOp",
            AstNodeKind::Compare { .. } => "Compare",
            AstNodeKind::Sequence { .. } => "Sequence",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_annotations() {
        let ty = TypeExpr::parse("List[List[int]]").expect("annotation");
        assert_eq!(ty.name, "List");
        assert_eq!(ty.args[0].name, "List");
        assert_eq!(ty.args[0].args[0], TypeExpr::named("int"));
        assert_eq!(ty.to_string(), "List[List[int]]");
    }

    #[test]
    fn rejects_unbalanced_annotation() {
        assert!(TypeExpr::parse("List[int").is_none());
        assert!(TypeExpr::parse("").is_none());
    }
}

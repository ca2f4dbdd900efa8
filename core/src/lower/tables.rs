//! file: core/src/lower/tables.rs
//! description: static type, operator and exception vocabularies.
//!
//! Immutable lookup tables from source names and operator tags to their C++
//! spelling and the header the spelling requires. Built once on first use
//! and only ever read afterwards.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::ast::{BinaryOperator, BoolOperator, CompareOperator, Operator, UnaryOperator};
use crate::error::{TranslateError, TranslateResult};

/// A C++ spelling plus the header it needs, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mapping {
    pub target: &'static str,
    pub header: Option<&'static str>,
}

impl Mapping {
    const fn new(target: &'static str, header: Option<&'static str>) -> Self {
        Mapping { target, header }
    }
}

/// The catch-all exception base. It carries no message, so constructor
/// arguments are dropped when it is built.
pub const VALUELESS_EXCEPTION: &str = "std::exception";

lazy_static! {
    static ref OPERATORS: HashMap<Operator, &'static str> = {
        let mut m = HashMap::new();
        m.insert(Operator::Binary(BinaryOperator::Add), "+");
        m.insert(Operator::Binary(BinaryOperator::Sub), "-");
        m.insert(Operator::Binary(BinaryOperator::Mult), "*");
        // `/` and `//` share the C++ operator; integer operands truncate.
        m.insert(Operator::Binary(BinaryOperator::Div), "/");
        m.insert(Operator::Binary(BinaryOperator::FloorDiv), "/");
        m.insert(Operator::Binary(BinaryOperator::Mod), "%");
        m.insert(Operator::Binary(BinaryOperator::LShift), "<<");
        m.insert(Operator::Binary(BinaryOperator::RShift), ">>");
        m.insert(Operator::Binary(BinaryOperator::BitOr), "|");
        m.insert(Operator::Binary(BinaryOperator::BitAnd), "&");
        m.insert(Operator::Binary(BinaryOperator::BitXor), "^");
        m.insert(Operator::Unary(UnaryOperator::UAdd), "+");
        m.insert(Operator::Unary(UnaryOperator::USub), "-");
        m.insert(Operator::Unary(UnaryOperator::Not), "!");
        m.insert(Operator::Unary(UnaryOperator::Invert), "~");
        m.insert(Operator::Bool(BoolOperator::And), "&&");
        m.insert(Operator::Bool(BoolOperator::Or), "||");
        m.insert(Operator::Compare(CompareOperator::Eq), "==");
        m.insert(Operator::Compare(CompareOperator::NotEq), "!=");
        m.insert(Operator::Compare(CompareOperator::Lt), "<");
        m.insert(Operator::Compare(CompareOperator::LtE), "<=");
        m.insert(Operator::Compare(CompareOperator::Gt), ">");
        m.insert(Operator::Compare(CompareOperator::GtE), ">=");
        m
    };

    static ref EXCEPTIONS: HashMap<&'static str, Mapping> = {
        let mut m = HashMap::new();
        m.insert("Exception", Mapping::new(VALUELESS_EXCEPTION, Some("<exception>")));
        m.insert("IndexError", Mapping::new("std::out_of_range", Some("<stdexcept>")));
        m.insert("KeyError", Mapping::new("std::out_of_range", Some("<stdexcept>")));
        m.insert("ValueError", Mapping::new("std::invalid_argument", Some("<stdexcept>")));
        m.insert("TypeError", Mapping::new("std::invalid_argument", Some("<stdexcept>")));
        m.insert("RuntimeError", Mapping::new("std::runtime_error", Some("<stdexcept>")));
        m
    };

    static ref TYPES: HashMap<&'static str, Mapping> = {
        let mut m = HashMap::new();
        m.insert("str", Mapping::new("std::string", Some("<string>")));
        m.insert("int", Mapping::new("int", None));
        m.insert("float", Mapping::new("double", None));
        m.insert("bool", Mapping::new("bool", None));
        m.insert("None", Mapping::new("void", None));
        m.insert("List", Mapping::new("std::vector", Some("<vector>")));
        m.insert("list", Mapping::new("std::vector", Some("<vector>")));
        m.insert("Tuple", Mapping::new("std::vector", Some("<vector>")));
        m.insert("tuple", Mapping::new("std::vector", Some("<vector>")));
        m.extend(EXCEPTIONS.iter().map(|(name, mapping)| (*name, *mapping)));
        m
    };
}

/// Look up the C++ type for a source type name.
pub fn resolve_type(name: &str) -> TranslateResult<Mapping> {
    TYPES
        .get(name)
        .copied()
        .ok_or_else(|| TranslateError::unknown_type(format!("No conversion for {} is known", name)))
}

/// Look up the C++ spelling of an operator.
pub fn resolve_operator(op: impl Into<Operator>) -> TranslateResult<&'static str> {
    let op = op.into();
    OPERATORS.get(&op).copied().ok_or_else(|| {
        TranslateError::unknown_operator(format!("{} is an unsupported operator", op))
    })
}

/// Look up the C++ type for an exception class name.
pub fn resolve_exception_type(name: &str) -> TranslateResult<Mapping> {
    EXCEPTIONS.get(name).copied().ok_or_else(|| {
        TranslateError::unknown_type(format!("{} not recognized as a c++ exception", name))
    })
}

/// True when `name` can be rewritten to a C++ type, e.g. as a callee.
pub fn is_known_type(name: &str) -> bool {
    TYPES.contains_key(name)
}

use crate::location;

use super::kind::AstNodeKind;

#[derive(Clone, PartialEq)]
pub struct AstNode {
    pub kind: AstNodeKind,
    pub location: Option<location::Location>,
    pub span: Option<location::Span>,
}

impl AstNode {
    pub fn new(
        node_type: AstNodeKind,
        location: Option<location::Location>,
        span: Option<location::Span>,
    ) -> Self {
        AstNode {
            kind: node_type,
            location,
            span,
        }
    }

    /// A node with no source position, as built by tests and synthesized code.
    pub fn bare(node_type: AstNodeKind) -> Self {
        AstNode::new(node_type, None, None)
    }

    pub fn with_location(mut self, location: crate::location::Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn get_kind(&self) -> &AstNodeKind {
        &self.kind
    }
    pub fn get_location(&self) -> Option<&crate::location::Location> {
        self.location.as_ref()
    }
    pub fn get_span(&self) -> Option<&crate::location::Span> {
        self.span.as_ref()
    }

    /// 1-based source line, when the node came from parsed source.
    pub fn line(&self) -> Option<usize> {
        self.location.as_ref().map(|loc| loc.line)
    }
}

use std::fmt;

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{} @ {}:{}", self.kind, loc.line, loc.column),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl fmt::Debug for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Locations are noise when dumping whole trees; keep the kind structure.
        if f.alternate() {
            write!(f, "{:#?}", self.kind)
        } else {
            write!(f, "{:?}", self.kind)
        }
    }
}

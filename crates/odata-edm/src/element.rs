use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::container::EdmEntityContainer;
use crate::error::EdmError;
use crate::name::qualify;
use crate::operation::{EdmOperation, OperationKind};
use crate::term::EdmTerm;
use crate::types::{BadElement, EdmEnumType, EdmStructuredType, EdmTypeDefinition};

/// Index of a top-level element inside its model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ElementId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SchemaElementKind {
    Action,
    Function,
    EntityType,
    ComplexType,
    EnumType,
    TypeDefinition,
    Term,
    EntityContainer,
}

impl SchemaElementKind {
    pub fn is_operation(self) -> bool {
        matches!(self, Self::Action | Self::Function)
    }

    pub fn is_type(self) -> bool {
        matches!(
            self,
            Self::EntityType | Self::ComplexType | Self::EnumType | Self::TypeDefinition
        )
    }

    /// Whether two elements of these kinds may share a qualified name.
    /// Only overloads of the same operation kind may.
    pub(crate) fn may_share_name(self, other: Self) -> bool {
        self == other && self.is_operation()
    }
}

impl fmt::Display for SchemaElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Top-level schema element.
#[derive(Debug, Clone)]
pub enum SchemaElement {
    Action(Arc<EdmOperation>),
    Function(Arc<EdmOperation>),
    EntityType(Arc<EdmStructuredType>),
    ComplexType(Arc<EdmStructuredType>),
    EnumType(Arc<EdmEnumType>),
    TypeDefinition(Arc<EdmTypeDefinition>),
    Term(Arc<EdmTerm>),
    EntityContainer(Arc<EdmEntityContainer>),
    Bad(Arc<BadElement>),
}

impl SchemaElement {
    pub(crate) fn operation(operation: EdmOperation) -> Self {
        match operation.kind() {
            OperationKind::Action => Self::Action(Arc::new(operation)),
            OperationKind::Function => Self::Function(Arc::new(operation)),
        }
    }

    pub fn kind(&self) -> SchemaElementKind {
        match self {
            Self::Action(_) => SchemaElementKind::Action,
            Self::Function(_) => SchemaElementKind::Function,
            Self::EntityType(_) => SchemaElementKind::EntityType,
            Self::ComplexType(_) => SchemaElementKind::ComplexType,
            Self::EnumType(_) => SchemaElementKind::EnumType,
            Self::TypeDefinition(_) => SchemaElementKind::TypeDefinition,
            Self::Term(_) => SchemaElementKind::Term,
            Self::EntityContainer(_) => SchemaElementKind::EntityContainer,
            Self::Bad(bad) => bad.kind(),
        }
    }

    pub fn namespace(&self) -> &str {
        match self {
            Self::Action(op) | Self::Function(op) => op.namespace(),
            Self::EntityType(t) | Self::ComplexType(t) => t.namespace(),
            Self::EnumType(t) => t.namespace(),
            Self::TypeDefinition(t) => t.namespace(),
            Self::Term(t) => t.namespace(),
            Self::EntityContainer(c) => c.namespace(),
            Self::Bad(bad) => bad.namespace(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Action(op) | Self::Function(op) => op.name(),
            Self::EntityType(t) | Self::ComplexType(t) => t.name(),
            Self::EnumType(t) => t.name(),
            Self::TypeDefinition(t) => t.name(),
            Self::Term(t) => t.name(),
            Self::EntityContainer(c) => c.name(),
            Self::Bad(bad) => bad.name(),
        }
    }

    pub fn full_name(&self) -> String {
        qualify(self.namespace(), self.name())
    }

    pub fn is_bad(&self) -> bool {
        matches!(self, Self::Bad(_))
    }

    pub fn as_operation(&self) -> Option<&Arc<EdmOperation>> {
        match self {
            Self::Action(op) | Self::Function(op) => Some(op),
            _ => None,
        }
    }

    /// Validation errors of this element, computed on first request.
    pub fn errors(&self) -> &[EdmError] {
        match self {
            Self::Action(op) | Self::Function(op) => op.errors(),
            Self::EntityType(t) | Self::ComplexType(t) => t.errors(),
            Self::EnumType(t) => t.errors(),
            Self::TypeDefinition(t) => t.errors(),
            Self::Term(t) => t.errors(),
            Self::EntityContainer(c) => c.errors(),
            Self::Bad(bad) => bad.errors(),
        }
    }
}

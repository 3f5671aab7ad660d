//! Resolved path segments.

use std::sync::Arc;

use odata_edm::{
    EdmEntitySet, EdmNavigationProperty, EdmOperation, EdmOperationImport, EdmSingleton,
    EdmStructuralProperty, EdmType, NavigationSource,
};
use odata_syntax::LiteralValue;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Cardinality {
    Single,
    Collection,
}

/// One key property value from a key predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValue {
    /// Declared key property name, filled in for positional values too.
    pub name: String,
    pub value: LiteralValue,
    /// Literal text as written in the path.
    pub text: String,
}

/// A parameter passed to a function in the path, e.g. `count=5`.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationParameter {
    pub name: Option<String>,
    pub text: String,
    /// `None` for parameter aliases (`@p`) and text that is not a literal.
    pub literal: Option<LiteralValue>,
}

#[derive(Debug, Clone)]
pub enum SegmentKind {
    EntitySet(Arc<EdmEntitySet>),
    Singleton(Arc<EdmSingleton>),
    NavigationProperty(Arc<EdmNavigationProperty>),
    Property(Arc<EdmStructuralProperty>),
    TypeCast(EdmType),
    Operation {
        operation: Arc<EdmOperation>,
        parameters: Vec<OperationParameter>,
    },
    OperationImport {
        import: Arc<EdmOperationImport>,
        operation: Arc<EdmOperation>,
        parameters: Vec<OperationParameter>,
    },
    OpenProperty(String),
    Key(Vec<KeyValue>),
}

impl SegmentKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::EntitySet(_) => "entity set",
            Self::Singleton(_) => "singleton",
            Self::NavigationProperty(_) => "navigation property",
            Self::Property(_) => "property",
            Self::TypeCast(_) => "type cast",
            Self::Operation { .. } => "operation",
            Self::OperationImport { .. } => "operation import",
            Self::OpenProperty(_) => "open property",
            Self::Key(_) => "key",
        }
    }
}

/// One resolved step of a path.
#[derive(Debug, Clone)]
pub struct PathSegment {
    pub(crate) kind: SegmentKind,
    pub(crate) identifier: String,
    pub(crate) edm_type: Option<EdmType>,
    pub(crate) cardinality: Cardinality,
    pub(crate) navigation_source: Option<NavigationSource>,
}

impl PathSegment {
    pub fn kind(&self) -> &SegmentKind {
        &self.kind
    }

    /// Identifier the segment was bound from, as written.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Element type of the addressed resource. `None` after an action that
    /// returns nothing.
    pub fn edm_type(&self) -> Option<&EdmType> {
        self.edm_type.as_ref()
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// `Collection(T)` for collection segments, `T` otherwise.
    pub fn full_type(&self) -> Option<EdmType> {
        let element = self.edm_type.clone()?;
        Some(match self.cardinality {
            Cardinality::Single => element,
            Cardinality::Collection => EdmType::Collection(Box::new(element)),
        })
    }

    pub fn navigation_source(&self) -> Option<&NavigationSource> {
        self.navigation_source.as_ref()
    }

    pub fn is_key(&self) -> bool {
        matches!(self.kind, SegmentKind::Key(_))
    }
}

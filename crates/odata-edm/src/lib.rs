//! EDM semantic model
//!
//! Turns the syntactic CSDL AST (`odata_syntax::csdl`) into a queryable type
//! graph. Construction only indexes names. Everything else is derived lazily
//! and cached per node in compute-once cells, so a large schema costs little
//! until it is used, and concurrent readers never observe two different
//! answers for the same question.
//!
//! Validity problems (unresolved names, duplicates, invalid literals) never
//! fail construction. They are attached to the node concerned and surface
//! only when that node's `errors()` is read, or through
//! [`EdmModel::validate`]. Names that cannot be resolved become `Bad`
//! placeholders so the rest of the graph stays usable.

pub mod cache;
pub mod container;
pub mod element;
pub mod error;
pub mod expression;
pub mod model;
pub mod name;
pub mod operation;
pub mod primitive;
pub mod term;
pub mod types;
pub mod value;

pub use cache::{Cached, Computed};
pub use container::{
    EdmEntityContainer, EdmEntitySet, EdmSingleton, EdmUnknownEntitySet, NavigationSource,
};
pub use element::{SchemaElement, SchemaElementKind};
pub use error::{EdmError, EdmErrorCode, ModelLoadError};
pub use expression::{
    EdmConstantExpression, EdmExpression, EdmOperationReferenceExpression, EdmPathExpression,
};
pub use model::EdmModel;
pub use operation::{EdmOperation, EdmOperationImport, EdmOperationParameter, OperationKind};
pub use primitive::EdmPrimitiveKind;
pub use term::{EdmTerm, EdmVocabularyAnnotation};
pub use types::{
    BadElement, EdmEnumMember, EdmEnumType, EdmNavigationProperty, EdmProperty,
    EdmStructuralProperty, EdmStructuredType, EdmType, EdmTypeDefinition, StructuredKind,
};
pub use value::EdmValue;

use std::fmt;

use odata_syntax::csdl::CsdlLocation;
use serde::Serialize;
use thiserror::Error;

/// Model-validity error codes.
///
/// These never abort model construction. They are attached to the node they
/// concern and only surface when somebody asks that node for its errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EdmErrorCode {
    InvalidLiteral,
    BadUnresolvedType,
    BadUnresolvedOperation,
    BadUnresolvedTerm,
    BadUnresolvedEntitySet,
    BadUnresolvedNavigationTarget,
    AmbiguousTypeName,
    DuplicateSchemaElementName,
    DuplicatePropertyName,
    DuplicateParameterName,
    DuplicateEntityContainerMemberName,
    DuplicateEnumMemberName,
    CyclicBaseType,
    KeyMissingOnEntityType,
    KeyPropertyNotFound,
    InvalidNavigationPropertyType,
    InvalidEnumUnderlyingType,
    InvalidTypeDefinitionUnderlyingType,
    BoundOperationMustHaveParameters,
    FunctionMustHaveReturnType,
    OperationImportCannotImportBoundOperation,
    ModelUnavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdmError {
    pub location: CsdlLocation,
    pub code: EdmErrorCode,
    pub message: String,
}

impl EdmError {
    pub fn new(location: &CsdlLocation, code: EdmErrorCode, message: impl Into<String>) -> Self {
        Self {
            location: location.clone(),
            code,
            message: message.into(),
        }
    }

    pub(crate) fn model_unavailable(location: &CsdlLocation) -> Self {
        Self::new(
            location,
            EdmErrorCode::ModelUnavailable,
            "the owning model has been dropped",
        )
    }
}

impl fmt::Display for EdmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}: {}", self.location, self.code, self.message)
    }
}

impl std::error::Error for EdmError {}

/// Failure to read a CSDL model description.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("invalid CSDL JSON: {0}")]
    Json(#[from] serde_json::Error),
}

//! Annotation expressions.

use std::sync::{Arc, Weak};

use odata_syntax::csdl::{CsdlConstantExpression, CsdlConstantKind, CsdlExpression, CsdlLocation};

use crate::cache::{Cached, Computed};
use crate::element::{ElementId, SchemaElement, SchemaElementKind};
use crate::error::{EdmError, EdmErrorCode};
use crate::model::ModelContext;
use crate::types::BadElement;
use crate::value::EdmValue;

#[cfg(test)]
thread_local! {
    static PARSE_COUNT: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Literal constant of a given kind.
///
/// The text is parsed once. `value()` and `errors()` read the same result:
/// on failure `value()` is the kind's zero value and `errors()` holds one
/// `InvalidLiteral` error.
#[derive(Debug)]
pub struct EdmConstantExpression {
    ast: CsdlConstantExpression,
    parsed: Cached<Computed<EdmValue>>,
}

impl EdmConstantExpression {
    pub fn new(ast: CsdlConstantExpression) -> Self {
        Self {
            ast,
            parsed: Cached::new(),
        }
    }

    pub fn kind(&self) -> CsdlConstantKind {
        self.ast.kind
    }

    pub fn text(&self) -> &str {
        &self.ast.value
    }

    pub fn location(&self) -> &CsdlLocation {
        &self.ast.location
    }

    fn parsed(&self) -> &Computed<EdmValue> {
        self.parsed.get_or_compute(|| {
            #[cfg(test)]
            PARSE_COUNT.with(|count| count.set(count.get() + 1));

            match EdmValue::parse(self.ast.kind, &self.ast.value) {
                Some(value) => Computed::ok(value),
                None => Computed::with_errors(
                    EdmValue::zero(self.ast.kind),
                    vec![EdmError::new(
                        &self.ast.location,
                        EdmErrorCode::InvalidLiteral,
                        format!(
                            "`{}` is not a valid {:?} literal",
                            self.ast.value, self.ast.kind
                        ),
                    )],
                ),
            }
        })
    }

    pub fn value(&self) -> &EdmValue {
        &self.parsed().value
    }

    pub fn errors(&self) -> &[EdmError] {
        &self.parsed().errors
    }
}

/// Path expression such as `Customer/Name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdmPathExpression {
    path: String,
    location: CsdlLocation,
}

impl EdmPathExpression {
    pub fn new(path: impl Into<String>, location: CsdlLocation) -> Self {
        Self {
            path: path.into(),
            location,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }

    pub fn location(&self) -> &CsdlLocation {
        &self.location
    }
}

/// Reference to an operation by qualified name, resolved on first access.
#[derive(Debug)]
pub struct EdmOperationReferenceExpression {
    operation_name: String,
    location: CsdlLocation,
    context: Weak<ModelContext>,
    resolved: Cached<Computed<Result<ElementId, Arc<BadElement>>>>,
}

impl EdmOperationReferenceExpression {
    pub(crate) fn new(
        operation_name: &str,
        location: &CsdlLocation,
        context: Weak<ModelContext>,
    ) -> Self {
        Self {
            operation_name: operation_name.to_string(),
            location: location.clone(),
            context,
            resolved: Cached::new(),
        }
    }

    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }

    fn resolved(&self) -> &Computed<Result<ElementId, Arc<BadElement>>> {
        self.resolved.get_or_compute(|| {
            let found = self.context.upgrade().map(|ctx| {
                let id = ctx
                    .lookup(&self.operation_name, false)
                    .into_iter()
                    .find_map(|e| e.as_operation().map(|op| op.id()));
                id
            });
            let error = match found {
                Some(Some(id)) => return Computed::ok(Ok(id)),
                Some(None) => EdmError::new(
                    &self.location,
                    EdmErrorCode::BadUnresolvedOperation,
                    format!("operation `{}` could not be resolved", self.operation_name),
                ),
                None => EdmError::model_unavailable(&self.location),
            };
            let bad = BadElement::new(
                &self.operation_name,
                SchemaElementKind::Function,
                vec![error.clone()],
            );
            Computed::with_errors(Err(Arc::new(bad)), vec![error])
        })
    }

    /// The first overload with this name, or a `Bad` placeholder.
    pub fn operation(&self) -> SchemaElement {
        match &self.resolved().value {
            Ok(id) => self
                .context
                .upgrade()
                .and_then(|ctx| ctx.element(*id).cloned())
                .unwrap_or_else(|| {
                    SchemaElement::Bad(Arc::new(BadElement::new(
                        &self.operation_name,
                        SchemaElementKind::Function,
                        vec![EdmError::model_unavailable(&self.location)],
                    )))
                }),
            Err(bad) => SchemaElement::Bad(Arc::clone(bad)),
        }
    }

    pub fn errors(&self) -> &[EdmError] {
        &self.resolved().errors
    }
}

#[derive(Debug)]
pub enum EdmExpression {
    Constant(EdmConstantExpression),
    Path(EdmPathExpression),
    OperationReference(EdmOperationReferenceExpression),
    Collection {
        items: Vec<EdmExpression>,
        location: CsdlLocation,
    },
    Null(CsdlLocation),
}

impl EdmExpression {
    pub(crate) fn from_csdl(ast: &CsdlExpression, context: &Weak<ModelContext>) -> Self {
        match ast {
            CsdlExpression::Constant(constant) => {
                Self::Constant(EdmConstantExpression::new(constant.clone()))
            }
            CsdlExpression::Path { path, location } => {
                Self::Path(EdmPathExpression::new(path.clone(), location.clone()))
            }
            CsdlExpression::OperationReference {
                operation,
                location,
            } => Self::OperationReference(EdmOperationReferenceExpression::new(
                operation,
                location,
                context.clone(),
            )),
            CsdlExpression::Collection { items, location } => Self::Collection {
                items: items
                    .iter()
                    .map(|item| Self::from_csdl(item, context))
                    .collect(),
                location: location.clone(),
            },
            CsdlExpression::Null { location } => Self::Null(location.clone()),
        }
    }

    pub fn location(&self) -> &CsdlLocation {
        match self {
            Self::Constant(c) => c.location(),
            Self::Path(p) => p.location(),
            Self::OperationReference(r) => &r.location,
            Self::Collection { location, .. } | Self::Null(location) => location,
        }
    }

    /// Errors of this expression and every nested one.
    pub fn errors(&self) -> Vec<EdmError> {
        match self {
            Self::Constant(c) => c.errors().to_vec(),
            Self::OperationReference(r) => r.errors().to_vec(),
            Self::Collection { items, .. } => items.iter().flat_map(|i| i.errors()).collect(),
            Self::Path(_) | Self::Null(_) => Vec::new(),
        }
    }
}

//! Actions, functions and their container-level imports.

use std::collections::HashSet;
use std::sync::{Arc, Weak};

use odata_syntax::csdl::{CsdlLocation, CsdlOperation, CsdlParameter};
use serde::Serialize;

use crate::cache::{Cached, Computed};
use crate::container::{EdmEntityContainer, EdmEntitySet};
use crate::element::{ElementId, SchemaElement};
use crate::error::{EdmError, EdmErrorCode};
use crate::model::ModelContext;
use crate::name::qualify;
use crate::types::{resolve_in, EdmType, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperationKind {
    Action,
    Function,
}

#[derive(Debug)]
pub struct EdmOperationParameter {
    ast: CsdlParameter,
    location: CsdlLocation,
    context: Weak<ModelContext>,
    parameter_type: Cached<Computed<TypeRef>>,
}

impl EdmOperationParameter {
    fn new(ast: CsdlParameter, location: CsdlLocation, context: Weak<ModelContext>) -> Self {
        Self {
            ast,
            location,
            context,
            parameter_type: Cached::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.ast.name
    }

    pub fn is_nullable(&self) -> bool {
        self.ast.nullable
    }

    fn type_cell(&self) -> &Computed<TypeRef> {
        self.parameter_type.get_or_compute(|| {
            resolve_in(&self.context, &self.ast.type_name, &self.location, |ctx| {
                ctx.resolve_type(&self.ast.type_name, &self.location)
            })
        })
    }

    pub fn edm_type(&self) -> EdmType {
        self.type_cell().value.materialize(&self.context)
    }

    pub fn errors(&self) -> &[EdmError] {
        &self.type_cell().errors
    }
}

/// Action or function. Overloads share a qualified name.
#[derive(Debug)]
pub struct EdmOperation {
    id: ElementId,
    namespace: String,
    kind: OperationKind,
    ast: CsdlOperation,
    context: Weak<ModelContext>,
    parameters: Vec<Arc<EdmOperationParameter>>,
    return_type: Cached<Computed<Option<TypeRef>>>,
    errors: Cached<Vec<EdmError>>,
}

impl EdmOperation {
    pub(crate) fn new(
        id: ElementId,
        namespace: &str,
        kind: OperationKind,
        ast: CsdlOperation,
        context: Weak<ModelContext>,
    ) -> Self {
        let parameters = ast
            .parameters
            .iter()
            .map(|p| {
                Arc::new(EdmOperationParameter::new(
                    p.clone(),
                    ast.location.clone(),
                    context.clone(),
                ))
            })
            .collect();
        Self {
            id,
            namespace: namespace.to_string(),
            kind,
            ast,
            context,
            parameters,
            return_type: Cached::new(),
            errors: Cached::new(),
        }
    }

    pub(crate) fn id(&self) -> ElementId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.ast.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn full_name(&self) -> String {
        qualify(&self.namespace, &self.ast.name)
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn location(&self) -> &CsdlLocation {
        &self.ast.location
    }

    pub fn is_bound(&self) -> bool {
        self.ast.is_bound
    }

    pub fn is_composable(&self) -> bool {
        self.ast.is_composable
    }

    pub fn entity_set_path(&self) -> Option<&str> {
        self.ast.entity_set_path.as_deref()
    }

    pub fn parameters(&self) -> &[Arc<EdmOperationParameter>] {
        &self.parameters
    }

    pub fn find_parameter(&self, name: &str) -> Option<&Arc<EdmOperationParameter>> {
        self.parameters.iter().find(|p| p.name() == name)
    }

    /// First parameter of a bound operation.
    pub fn binding_parameter(&self) -> Option<&Arc<EdmOperationParameter>> {
        if self.ast.is_bound {
            self.parameters.first()
        } else {
            None
        }
    }

    /// Parameters a caller supplies explicitly (the binding one excluded).
    pub fn non_binding_parameters(&self) -> &[Arc<EdmOperationParameter>] {
        if self.ast.is_bound && !self.parameters.is_empty() {
            &self.parameters[1..]
        } else {
            &self.parameters
        }
    }

    fn return_cell(&self) -> &Computed<Option<TypeRef>> {
        self.return_type.get_or_compute(|| {
            let Some(ret) = &self.ast.return_type else {
                return Computed::ok(None);
            };
            let resolved = resolve_in(&self.context, &ret.type_name, &self.ast.location, |ctx| {
                ctx.resolve_type(&ret.type_name, &self.ast.location)
            });
            Computed::with_errors(Some(resolved.value), resolved.errors)
        })
    }

    /// `None` for an action without a return type.
    pub fn return_type(&self) -> Option<EdmType> {
        self.return_cell()
            .value
            .as_ref()
            .map(|r| r.materialize(&self.context))
    }

    pub fn errors(&self) -> &[EdmError] {
        self.errors.get_or_compute(|| {
            let location = &self.ast.location;
            let mut errors = Vec::new();
            if let Some(ctx) = self.context.upgrade() {
                errors.extend(ctx.duplicate_name_errors(self.id, location));
            }
            if self.ast.is_bound && self.parameters.is_empty() {
                errors.push(EdmError::new(
                    location,
                    EdmErrorCode::BoundOperationMustHaveParameters,
                    format!("bound operation `{}` has no binding parameter", self.full_name()),
                ));
            }
            if self.kind == OperationKind::Function && self.ast.return_type.is_none() {
                errors.push(EdmError::new(
                    location,
                    EdmErrorCode::FunctionMustHaveReturnType,
                    format!("function `{}` has no return type", self.full_name()),
                ));
            }
            let mut names = HashSet::new();
            for parameter in &self.parameters {
                if !names.insert(parameter.name()) {
                    errors.push(EdmError::new(
                        location,
                        EdmErrorCode::DuplicateParameterName,
                        format!(
                            "parameter `{}` is declared more than once on `{}`",
                            parameter.name(),
                            self.full_name()
                        ),
                    ));
                }
                errors.extend(parameter.errors().iter().cloned());
            }
            errors.extend(self.return_cell().errors.iter().cloned());
            errors
        })
    }
}

/// Action import or function import exposed by an entity container.
#[derive(Debug)]
pub struct EdmOperationImport {
    kind: OperationKind,
    name: String,
    operation_name: String,
    entity_set: Option<String>,
    include_in_service_document: bool,
    location: CsdlLocation,
    container: ElementId,
    context: Weak<ModelContext>,
    operations: Cached<Computed<Vec<ElementId>>>,
    errors: Cached<Vec<EdmError>>,
}

pub(crate) struct OperationImportParts {
    pub kind: OperationKind,
    pub name: String,
    pub operation_name: String,
    pub entity_set: Option<String>,
    pub include_in_service_document: bool,
    pub location: CsdlLocation,
}

impl EdmOperationImport {
    pub(crate) fn new(
        parts: OperationImportParts,
        container: ElementId,
        context: Weak<ModelContext>,
    ) -> Self {
        Self {
            kind: parts.kind,
            name: parts.name,
            operation_name: parts.operation_name,
            entity_set: parts.entity_set,
            include_in_service_document: parts.include_in_service_document,
            location: parts.location,
            container,
            context,
            operations: Cached::new(),
            errors: Cached::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Qualified name of the imported overload group.
    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }

    pub fn include_in_service_document(&self) -> bool {
        self.include_in_service_document
    }

    fn operations_cell(&self) -> &Computed<Vec<ElementId>> {
        self.operations.get_or_compute(|| {
            let Some(ctx) = self.context.upgrade() else {
                return Computed::with_errors(
                    Vec::new(),
                    vec![EdmError::model_unavailable(&self.location)],
                );
            };
            let mut errors = Vec::new();
            let mut ids = Vec::new();
            for element in ctx.lookup(&self.operation_name, false) {
                let Some(operation) = element.as_operation() else {
                    continue;
                };
                if operation.kind() != self.kind {
                    continue;
                }
                if operation.is_bound() {
                    errors.push(EdmError::new(
                        &self.location,
                        EdmErrorCode::OperationImportCannotImportBoundOperation,
                        format!(
                            "import `{}` refers to bound operation `{}`",
                            self.name, self.operation_name
                        ),
                    ));
                    continue;
                }
                ids.push(operation.id());
            }
            if ids.is_empty() && errors.is_empty() {
                errors.push(EdmError::new(
                    &self.location,
                    EdmErrorCode::BadUnresolvedOperation,
                    format!(
                        "import `{}` refers to unknown operation `{}`",
                        self.name, self.operation_name
                    ),
                ));
            }
            Computed::with_errors(ids, errors)
        })
    }

    /// Unbound overloads this import exposes.
    pub fn operations(&self) -> Vec<Arc<EdmOperation>> {
        let Some(ctx) = self.context.upgrade() else {
            return Vec::new();
        };
        self.operations_cell()
            .value
            .iter()
            .filter_map(|id| ctx.element(*id).and_then(SchemaElement::as_operation).cloned())
            .collect()
    }

    fn container(&self) -> Option<Arc<EdmEntityContainer>> {
        match self.context.upgrade()?.element(self.container)? {
            SchemaElement::EntityContainer(c) => Some(Arc::clone(c)),
            _ => None,
        }
    }

    /// Entity set the results belong to, when declared and resolvable.
    pub fn entity_set(&self) -> Option<Arc<EdmEntitySet>> {
        let name = self.entity_set.as_deref()?;
        let name = name.rsplit('/').next().unwrap_or(name);
        self.container()?.find_entity_set(name, false)
    }

    pub fn errors(&self) -> &[EdmError] {
        self.errors.get_or_compute(|| {
            let mut errors = self.operations_cell().errors.clone();
            if let Some(name) = &self.entity_set {
                if self.entity_set().is_none() {
                    errors.push(EdmError::new(
                        &self.location,
                        EdmErrorCode::BadUnresolvedEntitySet,
                        format!("import `{}` refers to unknown entity set `{name}`", self.name),
                    ));
                }
            }
            errors
        })
    }
}

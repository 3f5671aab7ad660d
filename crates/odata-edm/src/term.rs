//! Vocabulary terms and the annotations that apply them.

use std::sync::{Arc, Weak};

use odata_syntax::csdl::{
    CsdlAnnotation, CsdlConstantExpression, CsdlConstantKind, CsdlLocation, CsdlTerm,
};

use crate::cache::{Cached, Computed};
use crate::element::{ElementId, SchemaElement, SchemaElementKind};
use crate::error::{EdmError, EdmErrorCode};
use crate::expression::{EdmConstantExpression, EdmExpression};
use crate::model::ModelContext;
use crate::name::qualify;
use crate::types::{resolve_in, BadElement, EdmType, TypeRef};

#[derive(Debug)]
pub struct EdmTerm {
    id: ElementId,
    namespace: String,
    ast: CsdlTerm,
    context: Weak<ModelContext>,
    term_type: Cached<Computed<TypeRef>>,
    default_value: Cached<Option<EdmConstantExpression>>,
    errors: Cached<Vec<EdmError>>,
}

impl EdmTerm {
    pub(crate) fn new(
        id: ElementId,
        namespace: &str,
        ast: CsdlTerm,
        context: Weak<ModelContext>,
    ) -> Self {
        Self {
            id,
            namespace: namespace.to_string(),
            ast,
            context,
            term_type: Cached::new(),
            default_value: Cached::new(),
            errors: Cached::new(),
        }
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

    pub fn applies_to(&self) -> &[String] {
        &self.ast.applies_to
    }

    fn type_cell(&self) -> &Computed<TypeRef> {
        self.term_type.get_or_compute(|| {
            resolve_in(&self.context, &self.ast.type_name, &self.ast.location, |ctx| {
                ctx.resolve_type(&self.ast.type_name, &self.ast.location)
            })
        })
    }

    pub fn edm_type(&self) -> EdmType {
        self.type_cell().value.materialize(&self.context)
    }

    /// Default value, parsed as a constant of the term's type. Non-primitive
    /// terms keep their default as a string constant.
    pub fn default_value(&self) -> Option<&EdmConstantExpression> {
        self.default_value
            .get_or_compute(|| {
                let text = self.ast.default_value.as_ref()?;
                let kind = match self.edm_type() {
                    EdmType::Primitive(kind) => kind.constant_kind(),
                    EdmType::Definition(def) => {
                        def.underlying_type().and_then(|k| k.constant_kind())
                    }
                    _ => None,
                }
                .unwrap_or(CsdlConstantKind::String);
                Some(EdmConstantExpression::new(CsdlConstantExpression {
                    kind,
                    value: text.clone(),
                    location: self.ast.location.clone(),
                }))
            })
            .as_ref()
    }

    pub fn errors(&self) -> &[EdmError] {
        self.errors.get_or_compute(|| {
            let mut errors = Vec::new();
            if let Some(ctx) = self.context.upgrade() {
                errors.extend(ctx.duplicate_name_errors(self.id, &self.ast.location));
            }
            errors.extend(self.type_cell().errors.iter().cloned());
            if let Some(default) = self.default_value() {
                errors.extend(default.errors().iter().cloned());
            }
            errors
        })
    }
}

/// A term applied to a target with a value expression.
#[derive(Debug)]
pub struct EdmVocabularyAnnotation {
    target: String,
    term_name: String,
    qualifier: Option<String>,
    expression: EdmExpression,
    location: CsdlLocation,
    context: Weak<ModelContext>,
    term: Cached<Computed<Result<ElementId, Arc<BadElement>>>>,
    errors: Cached<Vec<EdmError>>,
}

impl EdmVocabularyAnnotation {
    pub(crate) fn new(target: &str, ast: &CsdlAnnotation, context: Weak<ModelContext>) -> Self {
        Self {
            target: target.to_string(),
            term_name: ast.term.clone(),
            qualifier: ast.qualifier.clone(),
            expression: EdmExpression::from_csdl(&ast.expression, &context),
            location: ast.location.clone(),
            context,
            term: Cached::new(),
            errors: Cached::new(),
        }
    }

    /// Target path as written (`Sales.Order`, `Sales.Order/Name`).
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn term_name(&self) -> &str {
        &self.term_name
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    pub fn expression(&self) -> &EdmExpression {
        &self.expression
    }

    fn term_cell(&self) -> &Computed<Result<ElementId, Arc<BadElement>>> {
        self.term.get_or_compute(|| {
            let found = self.context.upgrade().map(|ctx| {
                let id = ctx
                    .lookup(&self.term_name, false)
                    .into_iter()
                    .find_map(|e| match e {
                        SchemaElement::Term(t) => Some(t.id),
                        _ => None,
                    });
                id
            });
            let error = match found {
                Some(Some(id)) => return Computed::ok(Ok(id)),
                Some(None) => EdmError::new(
                    &self.location,
                    EdmErrorCode::BadUnresolvedTerm,
                    format!("term `{}` could not be resolved", self.term_name),
                ),
                None => EdmError::model_unavailable(&self.location),
            };
            let bad = BadElement::new(&self.term_name, SchemaElementKind::Term, vec![error.clone()]);
            Computed::with_errors(Err(Arc::new(bad)), vec![error])
        })
    }

    /// The applied term, or a `Bad` placeholder when it does not resolve.
    pub fn term(&self) -> SchemaElement {
        match &self.term_cell().value {
            Ok(id) => self
                .context
                .upgrade()
                .and_then(|ctx| ctx.element(*id).cloned())
                .unwrap_or_else(|| {
                    SchemaElement::Bad(Arc::new(BadElement::new(
                        &self.term_name,
                        SchemaElementKind::Term,
                        vec![EdmError::model_unavailable(&self.location)],
                    )))
                }),
            Err(bad) => SchemaElement::Bad(Arc::clone(bad)),
        }
    }

    pub fn errors(&self) -> &[EdmError] {
        self.errors.get_or_compute(|| {
            let mut errors = self.term_cell().errors.clone();
            errors.extend(self.expression.errors());
            errors
        })
    }
}

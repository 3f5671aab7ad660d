//! The semantic model and its shared lookup context.

use std::path::Path;
use std::sync::{Arc, Weak};

use ahash::AHashMap;
use anyhow::Context as _;
use odata_syntax::csdl::{CsdlLocation, CsdlModel};
use rayon::prelude::*;

use crate::cache::Computed;
use crate::container::EdmEntityContainer;
use crate::element::{ElementId, SchemaElement, SchemaElementKind};
use crate::error::{EdmError, EdmErrorCode, ModelLoadError};
use crate::name::{collection_element, qualify, split_qualified_name};
use crate::operation::{EdmOperation, OperationKind};
use crate::primitive::EdmPrimitiveKind;
use crate::term::{EdmTerm, EdmVocabularyAnnotation};
use crate::types::{
    BadElement, EdmEnumType, EdmStructuredType, EdmType, EdmTypeDefinition, StructuredKind,
    TypeRef,
};

/// Everything the nodes of one model resolve names against.
///
/// Nodes reach it through a `Weak` handle; the only strong owner is
/// `EdmModel`.
#[derive(Debug)]
pub(crate) struct ModelContext {
    elements: Vec<SchemaElement>,
    by_name: AHashMap<String, Vec<ElementId>>,
    aliases: AHashMap<String, String>,
    annotations: Vec<Arc<EdmVocabularyAnnotation>>,
}

impl ModelContext {
    fn build(csdl: CsdlModel, context: &Weak<ModelContext>) -> Self {
        let mut elements = Vec::new();
        let mut annotations = Vec::new();
        let mut aliases = AHashMap::new();

        for schema in csdl.schemas {
            if let Some(alias) = &schema.alias {
                aliases.insert(alias.clone(), schema.namespace.clone());
            }
            let ns = schema.namespace.as_str();
            let next = |elements: &Vec<SchemaElement>| ElementId(elements.len());

            for ast in schema.entity_types {
                let id = next(&elements);
                let t = EdmStructuredType::new(id, ns, StructuredKind::Entity, ast, context.clone());
                elements.push(SchemaElement::EntityType(Arc::new(t)));
            }
            for ast in schema.complex_types {
                let id = next(&elements);
                let t = EdmStructuredType::new(id, ns, StructuredKind::Complex, ast, context.clone());
                elements.push(SchemaElement::ComplexType(Arc::new(t)));
            }
            for ast in schema.enum_types {
                let t = EdmEnumType::new(next(&elements), ns, ast, context.clone());
                elements.push(SchemaElement::EnumType(Arc::new(t)));
            }
            for ast in schema.type_definitions {
                let t = EdmTypeDefinition::new(next(&elements), ns, ast, context.clone());
                elements.push(SchemaElement::TypeDefinition(Arc::new(t)));
            }
            for ast in schema.actions {
                let id = next(&elements);
                let op = EdmOperation::new(id, ns, OperationKind::Action, ast, context.clone());
                elements.push(SchemaElement::operation(op));
            }
            for ast in schema.functions {
                let id = next(&elements);
                let op = EdmOperation::new(id, ns, OperationKind::Function, ast, context.clone());
                elements.push(SchemaElement::operation(op));
            }
            for ast in schema.terms {
                let t = EdmTerm::new(next(&elements), ns, ast, context.clone());
                elements.push(SchemaElement::Term(Arc::new(t)));
            }
            for ast in &schema.entity_containers {
                let c = EdmEntityContainer::new(next(&elements), ns, ast, context.clone());
                elements.push(SchemaElement::EntityContainer(Arc::new(c)));
            }
            for group in &schema.annotations {
                for ast in &group.annotations {
                    annotations.push(Arc::new(EdmVocabularyAnnotation::new(
                        &group.target,
                        ast,
                        context.clone(),
                    )));
                }
            }
        }

        let mut by_name: AHashMap<String, Vec<ElementId>> = AHashMap::new();
        for (index, element) in elements.iter().enumerate() {
            by_name
                .entry(element.full_name())
                .or_default()
                .push(ElementId(index));
        }

        Self {
            elements,
            by_name,
            aliases,
            annotations,
        }
    }

    pub(crate) fn element(&self, id: ElementId) -> Option<&SchemaElement> {
        self.elements.get(id.0)
    }

    /// Replace a leading namespace alias with the namespace it stands for.
    fn normalize(&self, qualified: &str) -> String {
        let (namespace, name) = split_qualified_name(qualified);
        match self.aliases.get(namespace) {
            Some(actual) => qualify(actual, name),
            None => qualified.to_string(),
        }
    }

    fn lookup_ids(&self, qualified: &str, case_insensitive: bool) -> Vec<ElementId> {
        let full = self.normalize(qualified.trim());
        if let Some(ids) = self.by_name.get(&full) {
            return ids.clone();
        }
        if !case_insensitive {
            return Vec::new();
        }
        let mut ids: Vec<ElementId> = self
            .by_name
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(&full))
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect();
        ids.sort();
        ids
    }

    /// Elements with this qualified name (alias-aware), in declaration order.
    pub(crate) fn lookup(&self, qualified: &str, case_insensitive: bool) -> Vec<&SchemaElement> {
        self.lookup_ids(qualified, case_insensitive)
            .into_iter()
            .filter_map(|id| self.element(id))
            .collect()
    }

    pub(crate) fn resolve_type(
        &self,
        type_name: &str,
        location: &CsdlLocation,
    ) -> Computed<TypeRef> {
        if let Some(element) = collection_element(type_name) {
            let resolved = self.resolve_type(element, location);
            return Computed::with_errors(
                TypeRef::Collection(Box::new(resolved.value)),
                resolved.errors,
            );
        }
        let type_name = type_name.trim();
        if type_name == "Edm.Untyped" {
            return Computed::ok(TypeRef::Untyped);
        }
        if let Some(kind) = EdmPrimitiveKind::from_name(type_name) {
            return Computed::ok(TypeRef::Primitive(kind));
        }

        let candidates: Vec<ElementId> = self
            .lookup_ids(type_name, false)
            .into_iter()
            .filter(|id| self.elements[id.0].kind().is_type())
            .collect();
        match candidates.as_slice() {
            [id] => Computed::ok(TypeRef::Element(*id)),
            [] => TypeRef::bad(
                type_name,
                SchemaElementKind::TypeDefinition,
                location,
                EdmErrorCode::BadUnresolvedType,
                format!("cannot resolve type `{type_name}`"),
            ),
            many => TypeRef::bad(
                type_name,
                SchemaElementKind::TypeDefinition,
                location,
                EdmErrorCode::AmbiguousTypeName,
                format!(
                    "type name `{type_name}` is ambiguous between {} declarations",
                    many.len()
                ),
            ),
        }
    }

    /// Resolve a name that must denote a structured type of `kind`.
    pub(crate) fn resolve_structured(
        &self,
        type_name: &str,
        kind: StructuredKind,
        location: &CsdlLocation,
        mismatch: EdmErrorCode,
    ) -> Computed<TypeRef> {
        let resolved = self.resolve_type(type_name, location);
        match &resolved.value {
            TypeRef::Element(id) => {
                let matches = match &self.elements[id.0] {
                    SchemaElement::EntityType(_) => kind == StructuredKind::Entity,
                    SchemaElement::ComplexType(_) => kind == StructuredKind::Complex,
                    _ => false,
                };
                if matches {
                    resolved
                } else {
                    TypeRef::bad(
                        type_name,
                        kind.schema_kind(),
                        location,
                        mismatch,
                        format!("`{type_name}` is not of {kind} type kind"),
                    )
                }
            }
            TypeRef::Bad(bad) => {
                let errors = bad.errors().to_vec();
                let placeholder = BadElement::new(type_name, kind.schema_kind(), errors.clone());
                Computed::with_errors(TypeRef::Bad(Arc::new(placeholder)), errors)
            }
            _ => TypeRef::bad(
                type_name,
                kind.schema_kind(),
                location,
                mismatch,
                format!("`{type_name}` is not a structured type"),
            ),
        }
    }

    /// `DuplicateSchemaElementName` for `id` when another element claims its
    /// qualified name.
    pub(crate) fn duplicate_name_errors(
        &self,
        id: ElementId,
        location: &CsdlLocation,
    ) -> Vec<EdmError> {
        let Some(element) = self.element(id) else {
            return Vec::new();
        };
        let full_name = element.full_name();
        let clash = self
            .by_name
            .get(&full_name)
            .map(|ids| {
                ids.iter().any(|other| {
                    *other != id
                        && !element.kind().may_share_name(self.elements[other.0].kind())
                })
            })
            .unwrap_or(false);
        if clash {
            vec![EdmError::new(
                location,
                EdmErrorCode::DuplicateSchemaElementName,
                format!("`{full_name}` is declared more than once"),
            )]
        } else {
            Vec::new()
        }
    }

    /// Resolve a navigation binding target (`Set`, `Container/Set` or
    /// `NS.Container/Set`) to its container and member name.
    pub(crate) fn resolve_binding_target(
        &self,
        own_container: ElementId,
        target: &str,
    ) -> Option<(ElementId, String)> {
        let (container_id, member) = match target.split_once('/') {
            None => (own_container, target),
            Some((container_name, member)) => {
                let id = self.elements.iter().enumerate().find_map(|(index, e)| match e {
                    SchemaElement::EntityContainer(c)
                        if c.name() == container_name
                            || c.full_name() == self.normalize(container_name) =>
                    {
                        Some(ElementId(index))
                    }
                    _ => None,
                })?;
                (id, member)
            }
        };
        match self.element(container_id)? {
            SchemaElement::EntityContainer(c) => {
                c.find_navigation_source(member, false)?;
                Some((container_id, member.to_string()))
            }
            _ => None,
        }
    }
}

/// Semantic model over a CSDL description.
///
/// Construction only indexes names; every derived fact (resolved types,
/// validation errors) is computed on first request and cached. The model can
/// be shared across threads.
#[derive(Debug, Clone)]
pub struct EdmModel {
    context: Arc<ModelContext>,
}

impl EdmModel {
    pub fn new(csdl: CsdlModel) -> Self {
        let schemas = csdl.schemas.len();
        let context = Arc::new_cyclic(|weak| ModelContext::build(csdl, weak));
        tracing::debug!(
            schemas,
            elements = context.elements.len(),
            annotations = context.annotations.len(),
            "built EDM model"
        );
        Self { context }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ModelLoadError> {
        let csdl: CsdlModel = serde_json::from_str(json)?;
        Ok(Self::new(csdl))
    }

    /// Load a JSON-encoded CSDL model from disk.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read CSDL model {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("failed to parse CSDL model {}", path.display()))
    }

    pub fn schema_elements(&self) -> &[SchemaElement] {
        &self.context.elements
    }

    /// Every element declared under `namespace.name`.
    pub fn find_elements(&self, qualified: &str, case_insensitive: bool) -> Vec<SchemaElement> {
        self.context
            .lookup(qualified, case_insensitive)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn find_element(&self, namespace: &str, name: &str) -> Option<SchemaElement> {
        self.find_elements(&qualify(namespace, name), false)
            .into_iter()
            .next()
    }

    /// Resolve any type reference, including `Edm.*` and `Collection(..)`.
    /// Unresolvable or ambiguous names yield a `Bad` placeholder.
    pub fn resolve_type(&self, type_name: &str) -> EdmType {
        let weak = Arc::downgrade(&self.context);
        self.context
            .resolve_type(type_name, &CsdlLocation::default())
            .value
            .materialize(&weak)
    }

    /// Named schema type; `None` when no single declaration matches.
    pub fn find_type(&self, qualified: &str) -> Option<EdmType> {
        Some(self.resolve_type(qualified)).filter(|t| !t.is_bad())
    }

    pub fn find_structured_type(&self, qualified: &str) -> Option<Arc<EdmStructuredType>> {
        self.find_type(qualified)?.as_structured().cloned()
    }

    /// Overloads (bound and unbound) sharing a qualified name.
    pub fn find_operations(&self, qualified: &str) -> Vec<Arc<EdmOperation>> {
        self.context
            .lookup(qualified, false)
            .into_iter()
            .filter_map(|e| e.as_operation().cloned())
            .collect()
    }

    /// Bound operations callable on a value of `binding_type`, including
    /// those bound to one of its base types.
    pub fn find_bound_operations(&self, binding_type: &EdmType) -> Vec<Arc<EdmOperation>> {
        self.context
            .elements
            .iter()
            .filter_map(SchemaElement::as_operation)
            .filter(|op| {
                op.binding_parameter()
                    .map(|p| p.edm_type().is_assignable_from(binding_type))
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }

    pub fn find_term(&self, qualified: &str) -> Option<Arc<EdmTerm>> {
        self.context
            .lookup(qualified, false)
            .into_iter()
            .find_map(|e| match e {
                SchemaElement::Term(t) => Some(Arc::clone(t)),
                _ => None,
            })
    }

    pub fn find_entity_container(&self, qualified: &str) -> Option<Arc<EdmEntityContainer>> {
        self.context
            .lookup(qualified, false)
            .into_iter()
            .find_map(|e| match e {
                SchemaElement::EntityContainer(c) => Some(Arc::clone(c)),
                _ => None,
            })
    }

    /// The first declared entity container.
    pub fn entity_container(&self) -> Option<Arc<EdmEntityContainer>> {
        self.context.elements.iter().find_map(|e| match e {
            SchemaElement::EntityContainer(c) => Some(Arc::clone(c)),
            _ => None,
        })
    }

    pub fn vocabulary_annotations(&self, target: &str) -> Vec<Arc<EdmVocabularyAnnotation>> {
        let target = self.context.normalize(target);
        self.context
            .annotations
            .iter()
            .filter(|a| self.context.normalize(a.target()) == target)
            .cloned()
            .collect()
    }

    /// Pull the error set of every element and annotation.
    ///
    /// Elements are checked in parallel; the result keeps declaration order.
    pub fn validate(&self) -> Vec<EdmError> {
        let element_errors: Vec<Vec<EdmError>> = self
            .context
            .elements
            .par_iter()
            .map(|e| e.errors().to_vec())
            .collect();
        let annotation_errors: Vec<Vec<EdmError>> = self
            .context
            .annotations
            .par_iter()
            .map(|a| a.errors().to_vec())
            .collect();

        let errors: Vec<EdmError> = element_errors
            .into_iter()
            .chain(annotation_errors)
            .flatten()
            .collect();
        if !errors.is_empty() {
            tracing::debug!(count = errors.len(), "EDM model has validation errors");
        }
        errors
    }
}

//! Type graph nodes: structured, enum and definition types, their
//! properties, and the `EdmType` reference that ties them together.
//!
//! Type references inside memo cells are stored as element ids and turned
//! into `Arc`s on access. Nodes only hold a `Weak` handle on the model, so a
//! schema whose types refer to each other does not form a reference cycle.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Weak};

use odata_syntax::csdl::{
    CsdlEnumType, CsdlLocation, CsdlNavigationProperty, CsdlProperty, CsdlStructuredType,
    CsdlTypeDefinition,
};

use crate::cache::{Cached, Computed};
use crate::element::{ElementId, SchemaElement, SchemaElementKind};
use crate::error::{EdmError, EdmErrorCode};
use crate::model::ModelContext;
use crate::name::{collection_element, qualify, split_qualified_name};
use crate::primitive::EdmPrimitiveKind;

/// Placeholder for a name that could not be resolved.
///
/// Keeps the attempted `(namespace, name)` split so diagnostics can still
/// print a well-formed identity. Always carries at least one error.
#[derive(Debug, Clone, PartialEq)]
pub struct BadElement {
    namespace: String,
    name: String,
    kind: SchemaElementKind,
    errors: Vec<EdmError>,
}

impl BadElement {
    pub fn new(qualified_name: &str, kind: SchemaElementKind, mut errors: Vec<EdmError>) -> Self {
        if errors.is_empty() {
            errors.push(EdmError::new(
                &CsdlLocation::default(),
                EdmErrorCode::BadUnresolvedType,
                format!("`{qualified_name}` could not be resolved"),
            ));
        }
        let (namespace, name) = split_qualified_name(qualified_name);
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            kind,
            errors,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> String {
        qualify(&self.namespace, &self.name)
    }

    /// Kind of element this placeholder stands in for.
    pub fn kind(&self) -> SchemaElementKind {
        self.kind
    }

    pub fn errors(&self) -> &[EdmError] {
        &self.errors
    }
}

/// Resolved reference to a type.
#[derive(Debug, Clone)]
pub enum EdmType {
    Primitive(EdmPrimitiveKind),
    Entity(Arc<EdmStructuredType>),
    Complex(Arc<EdmStructuredType>),
    Enum(Arc<EdmEnumType>),
    Definition(Arc<EdmTypeDefinition>),
    Collection(Box<EdmType>),
    Untyped,
    Bad(Arc<BadElement>),
}

impl EdmType {
    pub fn full_name(&self) -> String {
        match self {
            Self::Primitive(kind) => kind.name().to_string(),
            Self::Entity(t) | Self::Complex(t) => t.full_name(),
            Self::Enum(t) => t.full_name(),
            Self::Definition(t) => t.full_name(),
            Self::Collection(element) => format!("Collection({})", element.full_name()),
            Self::Untyped => "Edm.Untyped".to_string(),
            Self::Bad(bad) => bad.full_name(),
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }

    pub fn is_bad(&self) -> bool {
        match self {
            Self::Bad(_) => true,
            Self::Collection(element) => element.is_bad(),
            _ => false,
        }
    }

    /// Element type of a collection, or the type itself.
    pub fn element_type(&self) -> &EdmType {
        match self {
            Self::Collection(element) => element,
            other => other,
        }
    }

    pub fn as_structured(&self) -> Option<&Arc<EdmStructuredType>> {
        match self {
            Self::Entity(t) | Self::Complex(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&Arc<EdmStructuredType>> {
        match self {
            Self::Entity(t) => Some(t),
            _ => None,
        }
    }

    /// Whether instances may carry undeclared (dynamic) properties.
    pub fn is_open(&self) -> bool {
        match self {
            Self::Entity(t) | Self::Complex(t) => t.is_open(),
            Self::Untyped => true,
            _ => false,
        }
    }

    /// Errors carried by a `Bad` placeholder, if any.
    pub fn errors(&self) -> &[EdmError] {
        match self {
            Self::Bad(bad) => bad.errors(),
            Self::Collection(element) => element.errors(),
            _ => &[],
        }
    }

    /// True when a value of type `other` can be used where `self` is expected.
    pub fn is_assignable_from(&self, other: &EdmType) -> bool {
        match (self, other) {
            (Self::Bad(_), _) | (_, Self::Bad(_)) => false,
            (Self::Untyped, _) => true,
            (Self::Primitive(a), Self::Primitive(b)) => a == b,
            (Self::Entity(a), Self::Entity(b)) | (Self::Complex(a), Self::Complex(b)) => {
                b.is_or_inherits_from(a)
            }
            (Self::Enum(a), Self::Enum(b)) => Arc::ptr_eq(a, b),
            (Self::Definition(a), Self::Definition(b)) => Arc::ptr_eq(a, b),
            (Self::Collection(a), Self::Collection(b)) => a.is_assignable_from(b),
            _ => false,
        }
    }
}

impl PartialEq for EdmType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primitive(a), Self::Primitive(b)) => a == b,
            (Self::Entity(a), Self::Entity(b)) | (Self::Complex(a), Self::Complex(b)) => {
                Arc::ptr_eq(a, b)
            }
            (Self::Enum(a), Self::Enum(b)) => Arc::ptr_eq(a, b),
            (Self::Definition(a), Self::Definition(b)) => Arc::ptr_eq(a, b),
            (Self::Collection(a), Self::Collection(b)) => a == b,
            (Self::Untyped, Self::Untyped) => true,
            (Self::Bad(a), Self::Bad(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for EdmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

/// Memoized form of a type reference.
#[derive(Debug, Clone)]
pub(crate) enum TypeRef {
    Primitive(EdmPrimitiveKind),
    Element(ElementId),
    Collection(Box<TypeRef>),
    Untyped,
    Bad(Arc<BadElement>),
}

impl TypeRef {
    pub(crate) fn bad(
        qualified_name: &str,
        kind: SchemaElementKind,
        location: &CsdlLocation,
        code: EdmErrorCode,
        message: String,
    ) -> Computed<TypeRef> {
        let error = EdmError::new(location, code, message);
        let bad = BadElement::new(qualified_name, kind, vec![error.clone()]);
        Computed::with_errors(TypeRef::Bad(Arc::new(bad)), vec![error])
    }

    pub(crate) fn materialize(&self, context: &Weak<ModelContext>) -> EdmType {
        match self {
            TypeRef::Primitive(kind) => EdmType::Primitive(*kind),
            TypeRef::Untyped => EdmType::Untyped,
            TypeRef::Bad(bad) => EdmType::Bad(Arc::clone(bad)),
            TypeRef::Collection(element) => {
                EdmType::Collection(Box::new(element.materialize(context)))
            }
            TypeRef::Element(id) => {
                let element = context.upgrade().and_then(|ctx| ctx.element(*id).cloned());
                match element {
                    Some(SchemaElement::EntityType(t)) => EdmType::Entity(t),
                    Some(SchemaElement::ComplexType(t)) => EdmType::Complex(t),
                    Some(SchemaElement::EnumType(t)) => EdmType::Enum(t),
                    Some(SchemaElement::TypeDefinition(t)) => EdmType::Definition(t),
                    Some(other) => EdmType::Bad(Arc::new(BadElement::new(
                        &other.full_name(),
                        other.kind(),
                        vec![EdmError::new(
                            &CsdlLocation::default(),
                            EdmErrorCode::BadUnresolvedType,
                            format!("`{}` is not a type", other.full_name()),
                        )],
                    ))),
                    None => EdmType::Bad(Arc::new(BadElement::new(
                        "",
                        SchemaElementKind::TypeDefinition,
                        vec![EdmError::model_unavailable(&CsdlLocation::default())],
                    ))),
                }
            }
        }
    }
}

/// Resolve `type_name` through the model, or fail with `ModelUnavailable`.
pub(crate) fn resolve_in(
    context: &Weak<ModelContext>,
    type_name: &str,
    location: &CsdlLocation,
    resolve: impl FnOnce(&ModelContext) -> Computed<TypeRef>,
) -> Computed<TypeRef> {
    match context.upgrade() {
        Some(ctx) => resolve(ctx.as_ref()),
        None => {
            let error = EdmError::model_unavailable(location);
            let bad = BadElement::new(type_name, SchemaElementKind::TypeDefinition, vec![error.clone()]);
            Computed::with_errors(TypeRef::Bad(Arc::new(bad)), vec![error])
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructuredKind {
    Entity,
    Complex,
}

impl StructuredKind {
    pub fn schema_kind(self) -> SchemaElementKind {
        match self {
            Self::Entity => SchemaElementKind::EntityType,
            Self::Complex => SchemaElementKind::ComplexType,
        }
    }
}

impl fmt::Display for StructuredKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Entity => "entity",
            Self::Complex => "complex",
        })
    }
}

/// Entity or complex type.
#[derive(Debug)]
pub struct EdmStructuredType {
    id: ElementId,
    namespace: String,
    kind: StructuredKind,
    ast: CsdlStructuredType,
    context: Weak<ModelContext>,
    declared_properties: Vec<EdmProperty>,
    base_type: Cached<Computed<Option<TypeRef>>>,
    all_properties: Cached<Vec<EdmProperty>>,
    errors: Cached<Vec<EdmError>>,
}

impl EdmStructuredType {
    pub(crate) fn new(
        id: ElementId,
        namespace: &str,
        kind: StructuredKind,
        ast: CsdlStructuredType,
        context: Weak<ModelContext>,
    ) -> Self {
        let mut declared_properties: Vec<EdmProperty> = ast
            .properties
            .iter()
            .map(|p| {
                EdmProperty::Structural(Arc::new(EdmStructuralProperty::new(
                    p.clone(),
                    id,
                    context.clone(),
                )))
            })
            .collect();
        declared_properties.extend(ast.navigation_properties.iter().map(|p| {
            EdmProperty::Navigation(Arc::new(EdmNavigationProperty::new(
                p.clone(),
                id,
                context.clone(),
            )))
        }));

        Self {
            id,
            namespace: namespace.to_string(),
            kind,
            ast,
            context,
            declared_properties,
            base_type: Cached::new(),
            all_properties: Cached::new(),
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

    pub fn kind(&self) -> StructuredKind {
        self.kind
    }

    pub fn location(&self) -> &CsdlLocation {
        &self.ast.location
    }

    pub fn is_abstract(&self) -> bool {
        self.ast.is_abstract
    }

    /// Open when declared open itself or by any ancestor.
    pub fn is_open(&self) -> bool {
        self.ast.is_open || self.ancestors().iter().any(|t| t.ast.is_open)
    }

    fn base_type_cell(&self) -> &Computed<Option<TypeRef>> {
        self.base_type.get_or_compute(|| {
            let Some(base_name) = self.ast.base_type.as_deref() else {
                return Computed::ok(None);
            };
            let resolved = resolve_in(&self.context, base_name, &self.ast.location, |ctx| {
                ctx.resolve_structured(
                    base_name,
                    self.kind,
                    &self.ast.location,
                    EdmErrorCode::BadUnresolvedType,
                )
            });
            Computed::with_errors(Some(resolved.value), resolved.errors)
        })
    }

    /// Declared base type; a `Bad` placeholder when it cannot be resolved.
    pub fn base_type(&self) -> Option<EdmType> {
        self.base_type_cell()
            .value
            .as_ref()
            .map(|r| r.materialize(&self.context))
    }

    pub fn base_structured_type(&self) -> Option<Arc<EdmStructuredType>> {
        self.base_type().and_then(|t| t.as_structured().cloned())
    }

    /// Base-type chain, nearest first. Stops early on a cycle or an
    /// unresolved base.
    pub fn ancestors(&self) -> Vec<Arc<EdmStructuredType>> {
        self.walk_ancestors().0
    }

    fn walk_ancestors(&self) -> (Vec<Arc<EdmStructuredType>>, bool) {
        let mut seen = HashSet::from([self.id]);
        let mut chain = Vec::new();
        let mut next = self.base_structured_type();
        while let Some(current) = next {
            if !seen.insert(current.id) {
                return (chain, true);
            }
            next = current.base_structured_type();
            chain.push(current);
        }
        (chain, false)
    }

    pub fn is_or_inherits_from(&self, other: &EdmStructuredType) -> bool {
        std::ptr::eq(self, other)
            || self
                .ancestors()
                .iter()
                .any(|a| std::ptr::eq(Arc::as_ptr(a), other))
    }

    pub fn declared_properties(&self) -> &[EdmProperty] {
        &self.declared_properties
    }

    /// Inherited properties first (root ancestor down), then declared ones.
    pub fn properties(&self) -> &[EdmProperty] {
        self.all_properties.get_or_compute(|| {
            let mut all = Vec::new();
            for ancestor in self.ancestors().iter().rev() {
                all.extend(ancestor.declared_properties.iter().cloned());
            }
            all.extend(self.declared_properties.iter().cloned());
            all
        })
    }

    /// Find a declared or inherited property. An exact match always wins over
    /// a case-insensitive one.
    pub fn find_property(&self, name: &str, case_insensitive: bool) -> Option<EdmProperty> {
        let properties = self.properties();
        properties
            .iter()
            .rev()
            .find(|p| p.name() == name)
            .or_else(|| {
                case_insensitive
                    .then(|| {
                        properties
                            .iter()
                            .rev()
                            .find(|p| p.name().eq_ignore_ascii_case(name))
                    })
                    .flatten()
            })
            .cloned()
    }

    /// Key properties, taken from the nearest type in the chain that
    /// declares a key. Names that do not resolve are skipped.
    pub fn key(&self) -> Vec<Arc<EdmStructuralProperty>> {
        let Some(names) = self.key_names() else {
            return Vec::new();
        };
        names
            .iter()
            .filter_map(|name| match self.find_property(name, false) {
                Some(EdmProperty::Structural(p)) => Some(p),
                _ => None,
            })
            .collect()
    }

    fn key_names(&self) -> Option<Vec<String>> {
        if let Some(key) = &self.ast.key {
            return Some(key.clone());
        }
        self.ancestors().into_iter().find_map(|a| a.ast.key.clone())
    }

    pub fn errors(&self) -> &[EdmError] {
        self.errors.get_or_compute(|| {
            let mut errors = self.base_type_cell().errors.clone();
            let location = &self.ast.location;

            if let Some(ctx) = self.context.upgrade() {
                errors.extend(ctx.duplicate_name_errors(self.id, location));
            }

            let (_, cyclic) = self.walk_ancestors();
            if cyclic {
                errors.push(EdmError::new(
                    location,
                    EdmErrorCode::CyclicBaseType,
                    format!("the base type chain of `{}` is cyclic", self.full_name()),
                ));
            }

            let mut names = HashSet::new();
            for property in self.properties() {
                if !names.insert(property.name()) {
                    errors.push(EdmError::new(
                        property.location(),
                        EdmErrorCode::DuplicatePropertyName,
                        format!(
                            "property `{}` is defined more than once on `{}`",
                            property.name(),
                            self.full_name()
                        ),
                    ));
                }
            }
            for property in &self.declared_properties {
                errors.extend(property.errors().iter().cloned());
            }

            if self.kind == StructuredKind::Entity && !cyclic {
                match self.key_names() {
                    None if !self.ast.is_abstract => errors.push(EdmError::new(
                        location,
                        EdmErrorCode::KeyMissingOnEntityType,
                        format!("entity type `{}` has no key", self.full_name()),
                    )),
                    None => {}
                    Some(key) => {
                        for name in key {
                            if !matches!(
                                self.find_property(&name, false),
                                Some(EdmProperty::Structural(_))
                            ) {
                                errors.push(EdmError::new(
                                    location,
                                    EdmErrorCode::KeyPropertyNotFound,
                                    format!(
                                        "key property `{name}` is not a structural property of `{}`",
                                        self.full_name()
                                    ),
                                ));
                            }
                        }
                    }
                }
            }
            errors
        })
    }
}

/// Structural or navigation property.
#[derive(Debug, Clone)]
pub enum EdmProperty {
    Structural(Arc<EdmStructuralProperty>),
    Navigation(Arc<EdmNavigationProperty>),
}

impl EdmProperty {
    pub fn name(&self) -> &str {
        match self {
            Self::Structural(p) => p.name(),
            Self::Navigation(p) => p.name(),
        }
    }

    pub fn location(&self) -> &CsdlLocation {
        match self {
            Self::Structural(p) => &p.ast.location,
            Self::Navigation(p) => &p.ast.location,
        }
    }

    pub fn edm_type(&self) -> EdmType {
        match self {
            Self::Structural(p) => p.edm_type(),
            Self::Navigation(p) => p.edm_type(),
        }
    }

    pub fn errors(&self) -> &[EdmError] {
        match self {
            Self::Structural(p) => p.errors(),
            Self::Navigation(p) => p.errors(),
        }
    }
}

#[derive(Debug)]
pub struct EdmStructuralProperty {
    ast: CsdlProperty,
    declaring_type: ElementId,
    context: Weak<ModelContext>,
    property_type: Cached<Computed<TypeRef>>,
}

impl EdmStructuralProperty {
    fn new(ast: CsdlProperty, declaring_type: ElementId, context: Weak<ModelContext>) -> Self {
        Self {
            ast,
            declaring_type,
            context,
            property_type: Cached::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.ast.name
    }

    pub fn is_nullable(&self) -> bool {
        self.ast.nullable
    }

    pub fn default_value(&self) -> Option<&str> {
        self.ast.default_value.as_deref()
    }

    fn type_cell(&self) -> &Computed<TypeRef> {
        self.property_type.get_or_compute(|| {
            resolve_in(&self.context, &self.ast.type_name, &self.ast.location, |ctx| {
                ctx.resolve_type(&self.ast.type_name, &self.ast.location)
            })
        })
    }

    pub fn edm_type(&self) -> EdmType {
        self.type_cell().value.materialize(&self.context)
    }

    pub fn declaring_type(&self) -> Option<Arc<EdmStructuredType>> {
        declaring(&self.context, self.declaring_type)
    }

    pub fn errors(&self) -> &[EdmError] {
        &self.type_cell().errors
    }
}

#[derive(Debug)]
pub struct EdmNavigationProperty {
    ast: CsdlNavigationProperty,
    declaring_type: ElementId,
    context: Weak<ModelContext>,
    target_type: Cached<Computed<TypeRef>>,
}

impl EdmNavigationProperty {
    fn new(
        ast: CsdlNavigationProperty,
        declaring_type: ElementId,
        context: Weak<ModelContext>,
    ) -> Self {
        Self {
            ast,
            declaring_type,
            context,
            target_type: Cached::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.ast.name
    }

    pub fn is_nullable(&self) -> bool {
        self.ast.nullable
    }

    pub fn partner_name(&self) -> Option<&str> {
        self.ast.partner.as_deref()
    }

    pub fn contains_target(&self) -> bool {
        self.ast.contains_target
    }

    /// Whether the property addresses a collection of entities.
    pub fn is_collection(&self) -> bool {
        collection_element(&self.ast.type_name).is_some()
    }

    fn type_cell(&self) -> &Computed<TypeRef> {
        self.target_type.get_or_compute(|| {
            let type_name = &self.ast.type_name;
            let location = &self.ast.location;
            resolve_in(&self.context, type_name, location, |ctx| {
                match collection_element(type_name) {
                    Some(element) => {
                        let target = ctx.resolve_structured(
                            element,
                            StructuredKind::Entity,
                            location,
                            EdmErrorCode::InvalidNavigationPropertyType,
                        );
                        Computed::with_errors(
                            TypeRef::Collection(Box::new(target.value)),
                            target.errors,
                        )
                    }
                    None => ctx.resolve_structured(
                        type_name,
                        StructuredKind::Entity,
                        location,
                        EdmErrorCode::InvalidNavigationPropertyType,
                    ),
                }
            })
        })
    }

    /// `Entity` or `Collection(Entity)`; a `Bad` placeholder inside when the
    /// target does not resolve to an entity type.
    pub fn edm_type(&self) -> EdmType {
        self.type_cell().value.materialize(&self.context)
    }

    pub fn target_entity_type(&self) -> Option<Arc<EdmStructuredType>> {
        self.edm_type().element_type().as_entity().cloned()
    }

    pub fn declaring_type(&self) -> Option<Arc<EdmStructuredType>> {
        declaring(&self.context, self.declaring_type)
    }

    pub fn partner(&self) -> Option<Arc<EdmNavigationProperty>> {
        let partner = self.partner_name()?;
        match self.target_entity_type()?.find_property(partner, false)? {
            EdmProperty::Navigation(p) => Some(p),
            EdmProperty::Structural(_) => None,
        }
    }

    pub fn errors(&self) -> &[EdmError] {
        &self.type_cell().errors
    }
}

fn declaring(context: &Weak<ModelContext>, id: ElementId) -> Option<Arc<EdmStructuredType>> {
    match context.upgrade()?.element(id)? {
        SchemaElement::EntityType(t) | SchemaElement::ComplexType(t) => Some(Arc::clone(t)),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdmEnumMember {
    pub name: String,
    pub value: i64,
}

#[derive(Debug)]
pub struct EdmEnumType {
    id: ElementId,
    namespace: String,
    ast: CsdlEnumType,
    context: Weak<ModelContext>,
    members: Vec<EdmEnumMember>,
    errors: Cached<Vec<EdmError>>,
}

impl EdmEnumType {
    pub(crate) fn new(
        id: ElementId,
        namespace: &str,
        ast: CsdlEnumType,
        context: Weak<ModelContext>,
    ) -> Self {
        // Members without an explicit value continue from the previous one.
        let mut next = if ast.is_flags { 1 } else { 0 };
        let members = ast
            .members
            .iter()
            .map(|m| {
                let value = m.value.unwrap_or(next);
                next = if ast.is_flags {
                    value.saturating_mul(2).max(1)
                } else {
                    value.saturating_add(1)
                };
                EdmEnumMember {
                    name: m.name.clone(),
                    value,
                }
            })
            .collect();

        Self {
            id,
            namespace: namespace.to_string(),
            ast,
            context,
            members,
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

    pub fn is_flags(&self) -> bool {
        self.ast.is_flags
    }

    pub fn underlying_type(&self) -> EdmPrimitiveKind {
        self.ast
            .underlying_type
            .as_deref()
            .and_then(EdmPrimitiveKind::from_name)
            .filter(|k| k.is_integral())
            .unwrap_or(EdmPrimitiveKind::Int32)
    }

    pub fn members(&self) -> &[EdmEnumMember] {
        &self.members
    }

    pub fn find_member(&self, name: &str) -> Option<&EdmEnumMember> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn errors(&self) -> &[EdmError] {
        self.errors.get_or_compute(|| {
            let location = &self.ast.location;
            let mut errors = Vec::new();
            if let Some(ctx) = self.context.upgrade() {
                errors.extend(ctx.duplicate_name_errors(self.id, location));
            }
            if let Some(underlying) = self.ast.underlying_type.as_deref() {
                let integral = EdmPrimitiveKind::from_name(underlying)
                    .map(EdmPrimitiveKind::is_integral)
                    .unwrap_or(false);
                if !integral {
                    errors.push(EdmError::new(
                        location,
                        EdmErrorCode::InvalidEnumUnderlyingType,
                        format!("`{underlying}` is not an integral primitive type"),
                    ));
                }
            }
            let mut names = HashSet::new();
            for member in &self.members {
                if !names.insert(member.name.as_str()) {
                    errors.push(EdmError::new(
                        location,
                        EdmErrorCode::DuplicateEnumMemberName,
                        format!("member `{}` is defined more than once", member.name),
                    ));
                }
            }
            errors
        })
    }
}

#[derive(Debug)]
pub struct EdmTypeDefinition {
    id: ElementId,
    namespace: String,
    ast: CsdlTypeDefinition,
    context: Weak<ModelContext>,
    errors: Cached<Vec<EdmError>>,
}

impl EdmTypeDefinition {
    pub(crate) fn new(
        id: ElementId,
        namespace: &str,
        ast: CsdlTypeDefinition,
        context: Weak<ModelContext>,
    ) -> Self {
        Self {
            id,
            namespace: namespace.to_string(),
            ast,
            context,
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

    pub fn underlying_type(&self) -> Option<EdmPrimitiveKind> {
        EdmPrimitiveKind::from_name(&self.ast.underlying_type)
    }

    pub fn errors(&self) -> &[EdmError] {
        self.errors.get_or_compute(|| {
            let location = &self.ast.location;
            let mut errors = Vec::new();
            if let Some(ctx) = self.context.upgrade() {
                errors.extend(ctx.duplicate_name_errors(self.id, location));
            }
            if self.underlying_type().is_none() {
                errors.push(EdmError::new(
                    location,
                    EdmErrorCode::InvalidTypeDefinitionUnderlyingType,
                    format!(
                        "`{}` is not a primitive type",
                        self.ast.underlying_type
                    ),
                ));
            }
            errors
        })
    }
}

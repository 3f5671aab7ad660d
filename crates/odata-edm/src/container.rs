//! Entity containers and the navigation sources they expose.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use odata_syntax::csdl::{
    CsdlEntityContainer, CsdlEntitySet, CsdlLocation, CsdlNavigationPropertyBinding,
    CsdlSingleton,
};

use crate::cache::{Cached, Computed};
use crate::element::{ElementId, SchemaElement};
use crate::error::{EdmError, EdmErrorCode};
use crate::model::ModelContext;
use crate::name::qualify;
use crate::operation::{EdmOperationImport, OperationImportParts, OperationKind};
use crate::types::{
    resolve_in, EdmNavigationProperty, EdmStructuredType, EdmType, StructuredKind, TypeRef,
};

/// Exact match first, then (optionally) an ASCII case-insensitive one.
pub(crate) fn find_named<'a, T>(
    items: &'a [Arc<T>],
    name: &str,
    case_insensitive: bool,
    name_of: impl Fn(&T) -> &str,
) -> Option<&'a Arc<T>> {
    items.iter().find(|i| name_of(Arc::as_ref(i)) == name).or_else(|| {
        if case_insensitive {
            items.iter().find(|i| name_of(Arc::as_ref(i)).eq_ignore_ascii_case(name))
        } else {
            None
        }
    })
}

#[derive(Debug, Clone)]
struct ResolvedBinding {
    path: String,
    container: ElementId,
    target: String,
}

/// State shared by entity sets and singletons.
#[derive(Debug)]
struct SourceCore {
    name: String,
    type_name: String,
    bindings: Vec<CsdlNavigationPropertyBinding>,
    location: CsdlLocation,
    container: ElementId,
    context: Weak<ModelContext>,
    path: Vec<String>,
    entity_type: Cached<Computed<TypeRef>>,
    targets: Cached<Computed<Vec<ResolvedBinding>>>,
}

impl SourceCore {
    fn new(
        name: &str,
        type_name: &str,
        bindings: &[CsdlNavigationPropertyBinding],
        location: &CsdlLocation,
        container: ElementId,
        context: Weak<ModelContext>,
    ) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            bindings: bindings.to_vec(),
            location: location.clone(),
            container,
            context,
            path: vec![name.to_string()],
            entity_type: Cached::new(),
            targets: Cached::new(),
        }
    }

    fn type_cell(&self) -> &Computed<TypeRef> {
        self.entity_type.get_or_compute(|| {
            resolve_in(&self.context, &self.type_name, &self.location, |ctx| {
                ctx.resolve_structured(
                    &self.type_name,
                    StructuredKind::Entity,
                    &self.location,
                    EdmErrorCode::BadUnresolvedType,
                )
            })
        })
    }

    fn entity_type(&self) -> Option<Arc<EdmStructuredType>> {
        self.type_cell()
            .value
            .materialize(&self.context)
            .as_entity()
            .cloned()
    }

    fn entity_edm_type(&self) -> EdmType {
        self.type_cell().value.materialize(&self.context)
    }

    fn targets_cell(&self) -> &Computed<Vec<ResolvedBinding>> {
        self.targets.get_or_compute(|| {
            let Some(ctx) = self.context.upgrade() else {
                return Computed::with_errors(
                    Vec::new(),
                    vec![EdmError::model_unavailable(&self.location)],
                );
            };
            let mut resolved = Vec::new();
            let mut errors = Vec::new();
            for binding in &self.bindings {
                match ctx.resolve_binding_target(self.container, &binding.target) {
                    Some((container, target)) => resolved.push(ResolvedBinding {
                        path: binding.path.clone(),
                        container,
                        target,
                    }),
                    None => errors.push(EdmError::new(
                        &self.location,
                        EdmErrorCode::BadUnresolvedNavigationTarget,
                        format!(
                            "binding `{}` of `{}` targets unknown source `{}`",
                            binding.path, self.name, binding.target
                        ),
                    )),
                }
            }
            Computed::with_errors(resolved, errors)
        })
    }

    fn find_navigation_target(&self, property: &EdmNavigationProperty) -> Option<NavigationSource> {
        let binding = self
            .targets_cell()
            .value
            .iter()
            .find(|b| binding_matches(&b.path, property))?;
        let ctx = self.context.upgrade()?;
        match ctx.element(binding.container)? {
            SchemaElement::EntityContainer(c) => c.find_navigation_source(&binding.target, false),
            _ => None,
        }
    }

    fn errors(&self) -> Vec<EdmError> {
        let mut errors = self.type_cell().errors.clone();
        errors.extend(self.targets_cell().errors.iter().cloned());
        errors
    }
}

/// `Customer` or `NS.Derived/Customer` (binding through a type cast).
fn binding_matches(path: &str, property: &EdmNavigationProperty) -> bool {
    match path.rsplit_once('/') {
        None => path == property.name(),
        Some((prefix, last)) => {
            last == property.name()
                && property
                    .declaring_type()
                    .map(|t| !prefix.contains('.') || t.full_name() == prefix)
                    .unwrap_or(false)
        }
    }
}

#[derive(Debug)]
pub struct EdmEntitySet {
    core: SourceCore,
    include_in_service_document: bool,
    errors: Cached<Vec<EdmError>>,
}

impl EdmEntitySet {
    fn new(ast: &CsdlEntitySet, container: ElementId, context: Weak<ModelContext>) -> Self {
        Self {
            core: SourceCore::new(
                &ast.name,
                &ast.entity_type,
                &ast.navigation_property_bindings,
                &ast.location,
                container,
                context,
            ),
            include_in_service_document: ast.include_in_service_document,
            errors: Cached::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn path(&self) -> &[String] {
        &self.core.path
    }

    pub fn include_in_service_document(&self) -> bool {
        self.include_in_service_document
    }

    pub fn entity_type(&self) -> Option<Arc<EdmStructuredType>> {
        self.core.entity_type()
    }

    /// `Collection(EntityType)`.
    pub fn edm_type(&self) -> EdmType {
        EdmType::Collection(Box::new(self.core.entity_edm_type()))
    }

    pub fn find_navigation_target(
        &self,
        property: &EdmNavigationProperty,
    ) -> Option<NavigationSource> {
        self.core.find_navigation_target(property)
    }

    pub fn errors(&self) -> &[EdmError] {
        self.errors.get_or_compute(|| self.core.errors())
    }
}

#[derive(Debug)]
pub struct EdmSingleton {
    core: SourceCore,
    errors: Cached<Vec<EdmError>>,
}

impl EdmSingleton {
    fn new(ast: &CsdlSingleton, container: ElementId, context: Weak<ModelContext>) -> Self {
        Self {
            core: SourceCore::new(
                &ast.name,
                &ast.type_name,
                &ast.navigation_property_bindings,
                &ast.location,
                container,
                context,
            ),
            errors: Cached::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn path(&self) -> &[String] {
        &self.core.path
    }

    pub fn entity_type(&self) -> Option<Arc<EdmStructuredType>> {
        self.core.entity_type()
    }

    pub fn edm_type(&self) -> EdmType {
        self.core.entity_edm_type()
    }

    pub fn find_navigation_target(
        &self,
        property: &EdmNavigationProperty,
    ) -> Option<NavigationSource> {
        self.core.find_navigation_target(property)
    }

    pub fn errors(&self) -> &[EdmError] {
        self.errors.get_or_compute(|| self.core.errors())
    }
}

/// Entity set reached through a navigation property whose target set is not
/// statically known.
///
/// It never guesses a target for further navigation.
#[derive(Debug)]
pub struct EdmUnknownEntitySet {
    parent: NavigationSource,
    navigation_property: Arc<EdmNavigationProperty>,
    path: Cached<Vec<String>>,
}

impl EdmUnknownEntitySet {
    pub fn new(parent: NavigationSource, navigation_property: Arc<EdmNavigationProperty>) -> Self {
        Self {
            parent,
            navigation_property,
            path: Cached::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.navigation_property.name()
    }

    pub fn parent(&self) -> &NavigationSource {
        &self.parent
    }

    pub fn navigation_property(&self) -> &Arc<EdmNavigationProperty> {
        &self.navigation_property
    }

    /// Parent path followed by the navigation property name.
    pub fn path(&self) -> &[String] {
        self.path.get_or_compute(|| {
            let mut path = self.parent.path().to_vec();
            path.push(self.navigation_property.name().to_string());
            path
        })
    }

    pub fn entity_type(&self) -> Option<Arc<EdmStructuredType>> {
        self.navigation_property.target_entity_type()
    }

    pub fn edm_type(&self) -> EdmType {
        self.navigation_property.edm_type()
    }

    pub fn find_navigation_target(
        &self,
        _property: &EdmNavigationProperty,
    ) -> Option<NavigationSource> {
        None
    }
}

/// Anything a path segment can address entities through.
#[derive(Debug, Clone)]
pub enum NavigationSource {
    EntitySet(Arc<EdmEntitySet>),
    Singleton(Arc<EdmSingleton>),
    Unknown(Arc<EdmUnknownEntitySet>),
}

impl NavigationSource {
    pub fn name(&self) -> &str {
        match self {
            Self::EntitySet(s) => s.name(),
            Self::Singleton(s) => s.name(),
            Self::Unknown(s) => s.name(),
        }
    }

    pub fn path(&self) -> &[String] {
        match self {
            Self::EntitySet(s) => s.path(),
            Self::Singleton(s) => s.path(),
            Self::Unknown(s) => s.path(),
        }
    }

    pub fn entity_type(&self) -> Option<Arc<EdmStructuredType>> {
        match self {
            Self::EntitySet(s) => s.entity_type(),
            Self::Singleton(s) => s.entity_type(),
            Self::Unknown(s) => s.entity_type(),
        }
    }

    pub fn edm_type(&self) -> EdmType {
        match self {
            Self::EntitySet(s) => s.edm_type(),
            Self::Singleton(s) => s.edm_type(),
            Self::Unknown(s) => s.edm_type(),
        }
    }

    pub fn find_navigation_target(
        &self,
        property: &EdmNavigationProperty,
    ) -> Option<NavigationSource> {
        match self {
            Self::EntitySet(s) => s.find_navigation_target(property),
            Self::Singleton(s) => s.find_navigation_target(property),
            Self::Unknown(s) => s.find_navigation_target(property),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl PartialEq for NavigationSource {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::EntitySet(a), Self::EntitySet(b)) => Arc::ptr_eq(a, b),
            (Self::Singleton(a), Self::Singleton(b)) => Arc::ptr_eq(a, b),
            (Self::Unknown(a), Self::Unknown(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[derive(Debug)]
pub struct EdmEntityContainer {
    id: ElementId,
    namespace: String,
    name: String,
    location: CsdlLocation,
    context: Weak<ModelContext>,
    entity_sets: Vec<Arc<EdmEntitySet>>,
    singletons: Vec<Arc<EdmSingleton>>,
    operation_imports: Vec<Arc<EdmOperationImport>>,
    errors: Cached<Vec<EdmError>>,
}

impl EdmEntityContainer {
    pub(crate) fn new(
        id: ElementId,
        namespace: &str,
        ast: &CsdlEntityContainer,
        context: Weak<ModelContext>,
    ) -> Self {
        let entity_sets = ast
            .entity_sets
            .iter()
            .map(|s| Arc::new(EdmEntitySet::new(s, id, context.clone())))
            .collect();
        let singletons = ast
            .singletons
            .iter()
            .map(|s| Arc::new(EdmSingleton::new(s, id, context.clone())))
            .collect();

        let actions = ast.action_imports.iter().map(|i| OperationImportParts {
            kind: OperationKind::Action,
            name: i.name.clone(),
            operation_name: i.action.clone(),
            entity_set: i.entity_set.clone(),
            include_in_service_document: false,
            location: i.location.clone(),
        });
        let functions = ast.function_imports.iter().map(|i| OperationImportParts {
            kind: OperationKind::Function,
            name: i.name.clone(),
            operation_name: i.function.clone(),
            entity_set: i.entity_set.clone(),
            include_in_service_document: i.include_in_service_document,
            location: i.location.clone(),
        });
        let operation_imports = actions
            .chain(functions)
            .map(|parts| Arc::new(EdmOperationImport::new(parts, id, context.clone())))
            .collect();

        Self {
            id,
            namespace: namespace.to_string(),
            name: ast.name.clone(),
            location: ast.location.clone(),
            context,
            entity_sets,
            singletons,
            operation_imports,
            errors: Cached::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn full_name(&self) -> String {
        qualify(&self.namespace, &self.name)
    }

    pub fn entity_sets(&self) -> &[Arc<EdmEntitySet>] {
        &self.entity_sets
    }

    pub fn singletons(&self) -> &[Arc<EdmSingleton>] {
        &self.singletons
    }

    pub fn operation_imports(&self) -> &[Arc<EdmOperationImport>] {
        &self.operation_imports
    }

    pub fn find_entity_set(&self, name: &str, case_insensitive: bool) -> Option<Arc<EdmEntitySet>> {
        find_named(&self.entity_sets, name, case_insensitive, EdmEntitySet::name).cloned()
    }

    pub fn find_singleton(&self, name: &str, case_insensitive: bool) -> Option<Arc<EdmSingleton>> {
        find_named(&self.singletons, name, case_insensitive, EdmSingleton::name).cloned()
    }

    /// Entity set first, then singleton.
    pub fn find_navigation_source(
        &self,
        name: &str,
        case_insensitive: bool,
    ) -> Option<NavigationSource> {
        self.find_entity_set(name, case_insensitive)
            .map(NavigationSource::EntitySet)
            .or_else(|| {
                self.find_singleton(name, case_insensitive)
                    .map(NavigationSource::Singleton)
            })
    }

    /// All imports with this name; an exact match hides case-insensitive ones.
    pub fn find_operation_imports(
        &self,
        name: &str,
        case_insensitive: bool,
    ) -> Vec<Arc<EdmOperationImport>> {
        let exact: Vec<_> = self
            .operation_imports
            .iter()
            .filter(|i| i.name() == name)
            .cloned()
            .collect();
        if !exact.is_empty() || !case_insensitive {
            return exact;
        }
        self.operation_imports
            .iter()
            .filter(|i| i.name().eq_ignore_ascii_case(name))
            .cloned()
            .collect()
    }

    pub fn errors(&self) -> &[EdmError] {
        self.errors.get_or_compute(|| {
            let mut errors = Vec::new();
            if let Some(ctx) = self.context.upgrade() {
                errors.extend(ctx.duplicate_name_errors(self.id, &self.location));
            }

            // Function imports may repeat a name when they import the same group.
            let mut seen: HashMap<&str, Option<&str>> = HashMap::new();
            let members = self
                .entity_sets
                .iter()
                .map(|s| (s.name(), None))
                .chain(self.singletons.iter().map(|s| (s.name(), None)))
                .chain(
                    self.operation_imports
                        .iter()
                        .map(|i| (i.name(), Some(i.operation_name()))),
                );
            for (name, group) in members {
                match seen.get(name) {
                    Some(previous) if group.is_some() && *previous == group => {}
                    Some(_) => errors.push(EdmError::new(
                        &self.location,
                        EdmErrorCode::DuplicateEntityContainerMemberName,
                        format!("`{name}` is declared more than once in `{}`", self.full_name()),
                    )),
                    None => {
                        seen.insert(name, group);
                    }
                }
            }

            for set in &self.entity_sets {
                errors.extend(set.errors().iter().cloned());
            }
            for singleton in &self.singletons {
                errors.extend(singleton.errors().iter().cloned());
            }
            for import in &self.operation_imports {
                errors.extend(import.errors().iter().cloned());
            }
            errors
        })
    }
}

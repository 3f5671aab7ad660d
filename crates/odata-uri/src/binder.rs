//! Binding token chains against an EDM model.
//!
//! Binding walks the chain left to right, carrying the element type,
//! cardinality and navigation source addressed so far. Each identifier is
//! tried, in order, as a navigation property, a structural property, a type
//! cast, a bound operation and finally an open property. Predicates become a
//! key segment, except on operations where they are parameters.
//!
//! The binder only reads its inputs. It returns either a complete
//! [`ODataPath`] or the first fault it meets.

use std::collections::BTreeSet;
use std::sync::Arc;

use odata_edm::{
    EdmEntityContainer, EdmEntitySet, EdmModel, EdmNavigationProperty, EdmOperation,
    EdmOperationImport, EdmPrimitiveKind, EdmProperty, EdmType, EdmUnknownEntitySet,
    NavigationSource, OperationKind, SchemaElement,
};
use odata_syntax::{
    parse_duration, parse_literal, LiteralValue, NamedValue, PathSegmentToken, TokenChain,
    SYSTEM_TOKEN_MARKER,
};

use crate::error::BindingError;
use crate::path::ODataPath;
use crate::segment::{Cardinality, KeyValue, OperationParameter, PathSegment, SegmentKind};
use crate::settings::ODataUriParserSettings;

// ============================================================================
// Binder state
// ============================================================================

/// What the path addresses after the segments bound so far.
#[derive(Debug, Clone)]
struct Cursor {
    edm_type: Option<EdmType>,
    cardinality: Cardinality,
    source: Option<NavigationSource>,
}

impl Cursor {
    fn after(segment: &PathSegment) -> Self {
        Self {
            edm_type: segment.edm_type.clone(),
            cardinality: segment.cardinality,
            source: segment.navigation_source.clone(),
        }
    }

    fn full_type(&self) -> Option<EdmType> {
        let element = self.edm_type.clone()?;
        Some(match self.cardinality {
            Cardinality::Single => element,
            Cardinality::Collection => EdmType::Collection(Box::new(element)),
        })
    }
}

/// Element type and cardinality of a possibly collection-valued type.
fn split_collection(edm_type: EdmType) -> (EdmType, Cardinality) {
    match edm_type {
        EdmType::Collection(element) => (*element, Cardinality::Collection),
        single => (single, Cardinality::Single),
    }
}

/// Source reached by following `nav` from `source`. Without a declared
/// binding the target is an unknown entity set below `source`.
fn navigate(source: &NavigationSource, nav: &Arc<EdmNavigationProperty>) -> NavigationSource {
    source.find_navigation_target(nav).unwrap_or_else(|| {
        NavigationSource::Unknown(Arc::new(EdmUnknownEntitySet::new(
            source.clone(),
            Arc::clone(nav),
        )))
    })
}

fn schema_type(element: &SchemaElement) -> Option<EdmType> {
    match element {
        SchemaElement::EntityType(t) => Some(EdmType::Entity(Arc::clone(t))),
        SchemaElement::ComplexType(t) => Some(EdmType::Complex(Arc::clone(t))),
        SchemaElement::EnumType(t) => Some(EdmType::Enum(Arc::clone(t))),
        SchemaElement::TypeDefinition(t) => Some(EdmType::Definition(Arc::clone(t))),
        _ => None,
    }
}

fn operation_parameters(values: &[NamedValue]) -> Vec<OperationParameter> {
    values
        .iter()
        .map(|v| OperationParameter {
            name: v.name.clone(),
            text: v.value.clone(),
            literal: parse_literal(&v.value).ok(),
        })
        .collect()
}

fn signature(operation: &EdmOperation) -> String {
    let parameters: Vec<String> = operation
        .parameters()
        .iter()
        .map(|p| p.edm_type().full_name())
        .collect();
    format!("{}({})", operation.full_name(), parameters.join(", "))
}

fn primitive_accepts(kind: EdmPrimitiveKind, literal: &LiteralValue) -> bool {
    use EdmPrimitiveKind as K;
    use LiteralValue as L;

    match (kind, literal) {
        (K::Boolean, L::Boolean(_)) => true,
        (K::Byte, L::Integer(n)) => u8::try_from(*n).is_ok(),
        (K::SByte, L::Integer(n)) => i8::try_from(*n).is_ok(),
        (K::Int16, L::Integer(n)) => i16::try_from(*n).is_ok(),
        (K::Int32, L::Integer(n)) => i32::try_from(*n).is_ok(),
        (K::Int64, L::Integer(_)) => true,
        (K::Decimal | K::Double | K::Single, L::Integer(_) | L::Double(_)) => true,
        (K::String, L::String(_)) => true,
        (K::Guid, L::Guid(_)) => true,
        (K::Date, L::Date(_)) => true,
        (K::DateTimeOffset, L::DateTimeOffset(_)) => true,
        (K::TimeOfDay, L::TimeOfDay(_)) => true,
        (K::Duration, L::Duration(text)) => parse_duration(text).is_some(),
        _ => false,
    }
}

// ============================================================================
// PathBinder
// ============================================================================

/// Resolves token chains against one model and entity container.
#[derive(Debug, Clone)]
pub struct PathBinder<'m> {
    model: &'m EdmModel,
    container: Option<Arc<EdmEntityContainer>>,
    settings: ODataUriParserSettings,
}

impl<'m> PathBinder<'m> {
    /// Binder over the model's first entity container.
    pub fn new(model: &'m EdmModel, settings: ODataUriParserSettings) -> Self {
        Self {
            model,
            container: model.entity_container(),
            settings,
        }
    }

    pub fn with_container(mut self, container: Arc<EdmEntityContainer>) -> Self {
        self.container = Some(container);
        self
    }

    pub fn settings(&self) -> &ODataUriParserSettings {
        &self.settings
    }

    pub fn container(&self) -> Option<&Arc<EdmEntityContainer>> {
        self.container.as_ref()
    }

    /// Bind a chain whose first token names a container member.
    pub fn bind(&self, chain: &TokenChain) -> Result<ODataPath, BindingError> {
        self.bind_chain(None, chain)
    }

    /// Bind a chain relative to an already resolved navigation source. The
    /// source itself is not part of the returned path.
    pub fn bind_from(
        &self,
        source: &NavigationSource,
        chain: &TokenChain,
    ) -> Result<ODataPath, BindingError> {
        let (edm_type, cardinality) = split_collection(source.edm_type());
        let start = Cursor {
            edm_type: Some(edm_type),
            cardinality,
            source: Some(source.clone()),
        };
        self.bind_chain(Some(start), chain)
    }

    /// Split raw segments (`["Orders(1)", "Customer"]`) and bind them.
    pub fn bind_path<S: AsRef<str>>(&self, segments: &[S]) -> Result<ODataPath, BindingError> {
        let raw: Vec<&str> = segments.iter().map(|s| s.as_ref()).collect();
        if let Some(index) = raw.iter().position(|s| s.starts_with(SYSTEM_TOKEN_MARKER)) {
            return Err(BindingError::IllegalToken {
                identifier: raw[index].to_string(),
                index,
            });
        }
        let chain = TokenChain::from_segments(&raw)?;
        self.bind(&chain)
    }

    fn bind_chain(
        &self,
        start: Option<Cursor>,
        chain: &TokenChain,
    ) -> Result<ODataPath, BindingError> {
        let result = self.bind_tokens(start, chain);
        if let Err(err) = &result {
            tracing::debug!(path = %chain, error = %err, "path binding failed");
        }
        result
    }

    fn bind_tokens(
        &self,
        start: Option<Cursor>,
        chain: &TokenChain,
    ) -> Result<ODataPath, BindingError> {
        let tokens: Vec<&PathSegmentToken> = chain.iter().collect();
        if tokens.is_empty() {
            return Err(BindingError::EmptyPath);
        }
        if tokens.len() > self.settings.max_segments {
            return Err(BindingError::TooManySegments {
                count: tokens.len(),
                max: self.settings.max_segments,
            });
        }
        if let Some((index, token)) = tokens.iter().enumerate().find(|(_, t)| t.is_system()) {
            return Err(BindingError::IllegalToken {
                identifier: token.identifier().to_string(),
                index,
            });
        }

        let mut segments = Vec::with_capacity(tokens.len());
        let mut cursor = start;
        for (index, token) in tokens.into_iter().enumerate() {
            let segment = match &cursor {
                None => self.bind_root(index, token)?,
                Some(current) => self.bind_next(current, index, token)?,
            };
            tracing::trace!(
                index,
                identifier = token.identifier(),
                kind = segment.kind.name(),
                "bound path segment"
            );

            let takes_key = !token.named_values().is_empty()
                && !matches!(
                    segment.kind,
                    SegmentKind::Operation { .. } | SegmentKind::OperationImport { .. }
                );
            let key = if takes_key {
                Some(self.bind_key(&segment, index, token)?)
            } else {
                None
            };

            segments.push(segment);
            if let Some(key) = key {
                segments.push(key);
            }
            cursor = segments.last().map(Cursor::after);
        }
        Ok(ODataPath::new(segments))
    }

    // ------------------------------------------------------------------------
    // Root
    // ------------------------------------------------------------------------

    fn bind_root(&self, index: usize, token: &PathSegmentToken) -> Result<PathSegment, BindingError> {
        let container = self.container.as_ref().ok_or(BindingError::NoEntityContainer)?;
        let identifier = token.identifier();
        let ci = self.settings.enable_case_insensitive;

        if let Some(set) = container.find_entity_set(identifier, ci) {
            return Ok(self.entity_set_segment(identifier, set));
        }
        if let Some(singleton) = container.find_singleton(identifier, ci) {
            let (edm_type, cardinality) = split_collection(singleton.edm_type());
            return Ok(PathSegment {
                identifier: identifier.to_string(),
                edm_type: Some(edm_type),
                cardinality,
                navigation_source: Some(NavigationSource::Singleton(Arc::clone(&singleton))),
                kind: SegmentKind::Singleton(singleton),
            });
        }

        let parameters = operation_parameters(token.named_values());
        let imports = container.find_operation_imports(identifier, ci);
        if !imports.is_empty() {
            let candidates: Vec<(Arc<EdmOperationImport>, Arc<EdmOperation>)> = imports
                .iter()
                .flat_map(|import| {
                    import
                        .operations()
                        .into_iter()
                        .map(move |op| (Arc::clone(import), op))
                })
                .collect();
            let (import, operation) =
                self.select_overload(candidates, |c| &c.1, &parameters, None, index, identifier)?;
            let source = import.entity_set().map(NavigationSource::EntitySet);
            let kind = SegmentKind::OperationImport {
                import,
                operation: Arc::clone(&operation),
                parameters,
            };
            return Ok(operation_segment(kind, identifier, &operation, source));
        }

        if identifier.contains('.') {
            let unbound: Vec<Arc<EdmOperation>> = self
                .model
                .find_elements(identifier, ci)
                .iter()
                .filter_map(SchemaElement::as_operation)
                .filter(|op| !op.is_bound())
                .cloned()
                .collect();
            if !unbound.is_empty() {
                let operation =
                    self.select_overload(unbound, |op| op, &parameters, None, index, identifier)?;
                let kind = SegmentKind::Operation {
                    operation: Arc::clone(&operation),
                    parameters,
                };
                return Ok(operation_segment(kind, identifier, &operation, None));
            }
        }

        Err(BindingError::SegmentNotFound {
            identifier: identifier.to_string(),
            index,
            context: format!("entity container `{}`", container.full_name()),
        })
    }

    fn entity_set_segment(&self, identifier: &str, set: Arc<EdmEntitySet>) -> PathSegment {
        let (edm_type, cardinality) = split_collection(set.edm_type());
        PathSegment {
            identifier: identifier.to_string(),
            edm_type: Some(edm_type),
            cardinality,
            navigation_source: Some(NavigationSource::EntitySet(Arc::clone(&set))),
            kind: SegmentKind::EntitySet(set),
        }
    }

    // ------------------------------------------------------------------------
    // Subsequent segments
    // ------------------------------------------------------------------------

    fn bind_next(
        &self,
        cursor: &Cursor,
        index: usize,
        token: &PathSegmentToken,
    ) -> Result<PathSegment, BindingError> {
        let identifier = token.identifier();
        let ci = self.settings.enable_case_insensitive;
        let Some(current) = cursor.edm_type.as_ref() else {
            return Err(BindingError::SegmentNotFound {
                identifier: identifier.to_string(),
                index,
                context: "an operation without a result".to_string(),
            });
        };

        if let Some(structured) = current.as_structured() {
            match structured.find_property(identifier, ci) {
                Some(EdmProperty::Navigation(nav)) => {
                    let (edm_type, cardinality) = split_collection(nav.edm_type());
                    return Ok(PathSegment {
                        identifier: identifier.to_string(),
                        edm_type: Some(edm_type),
                        cardinality,
                        navigation_source: cursor.source.as_ref().map(|s| navigate(s, &nav)),
                        kind: SegmentKind::NavigationProperty(nav),
                    });
                }
                Some(EdmProperty::Structural(property)) => {
                    let (edm_type, cardinality) = match split_collection(property.edm_type()) {
                        (element, Cardinality::Collection) => (element, Cardinality::Collection),
                        (element, Cardinality::Single) => (element, cursor.cardinality),
                    };
                    // Navigation stays possible through complex values.
                    let navigation_source = edm_type
                        .as_structured()
                        .and_then(|_| cursor.source.clone());
                    return Ok(PathSegment {
                        identifier: identifier.to_string(),
                        edm_type: Some(edm_type),
                        cardinality,
                        navigation_source,
                        kind: SegmentKind::Property(property),
                    });
                }
                None => {}
            }
        }

        if identifier.contains('.') {
            let mut targets = self.schema_types(identifier);
            if targets.len() > 1 {
                return Err(BindingError::AmbiguousSegment {
                    identifier: identifier.to_string(),
                    index,
                    candidates: targets.iter().map(EdmType::full_name).collect(),
                });
            }
            if let Some(target) = targets.pop() {
                if !current.is_assignable_from(&target) {
                    return Err(BindingError::TypeCastNotAssignable {
                        identifier: identifier.to_string(),
                        index,
                        current_type: current.full_name(),
                    });
                }
                return Ok(PathSegment {
                    identifier: identifier.to_string(),
                    edm_type: Some(target.clone()),
                    cardinality: cursor.cardinality,
                    navigation_source: cursor.source.clone(),
                    kind: SegmentKind::TypeCast(target),
                });
            }
        }

        if let Some(binding_type) = cursor.full_type() {
            let candidates = self.bound_operations(identifier, &binding_type);
            if !candidates.is_empty() {
                let parameters = operation_parameters(token.named_values());
                let operation = self.select_overload(
                    candidates,
                    |op| op,
                    &parameters,
                    Some(&binding_type),
                    index,
                    identifier,
                )?;
                let source = cursor
                    .source
                    .as_ref()
                    .and_then(|s| self.returned_source(&operation, s));
                let kind = SegmentKind::Operation {
                    operation: Arc::clone(&operation),
                    parameters,
                };
                return Ok(operation_segment(kind, identifier, &operation, source));
            }
        }

        if current.is_open() {
            return Ok(PathSegment {
                identifier: identifier.to_string(),
                edm_type: Some(EdmType::Untyped),
                cardinality: Cardinality::Single,
                navigation_source: None,
                kind: SegmentKind::OpenProperty(identifier.to_string()),
            });
        }

        Err(BindingError::SegmentNotFound {
            identifier: identifier.to_string(),
            index,
            context: format!("type `{}`", current.full_name()),
        })
    }

    /// Every schema or primitive type named `qualified`.
    fn schema_types(&self, qualified: &str) -> Vec<EdmType> {
        if let Some(kind) = EdmPrimitiveKind::from_name(qualified) {
            return vec![EdmType::Primitive(kind)];
        }
        self.model
            .find_elements(qualified, self.settings.enable_case_insensitive)
            .iter()
            .filter_map(schema_type)
            .collect()
    }

    /// The schema type named `qualified`, if exactly one has that name.
    fn find_schema_type(&self, qualified: &str) -> Option<EdmType> {
        let mut types = self.schema_types(qualified);
        if types.len() == 1 {
            types.pop()
        } else {
            None
        }
    }

    /// Overloads named `identifier` that can be bound to `binding_type`.
    fn bound_operations(&self, identifier: &str, binding_type: &EdmType) -> Vec<Arc<EdmOperation>> {
        let ci = self.settings.enable_case_insensitive;
        if identifier.contains('.') {
            return self
                .model
                .find_elements(identifier, ci)
                .iter()
                .filter_map(SchemaElement::as_operation)
                .filter(|op| {
                    op.binding_parameter()
                        .map(|p| p.edm_type().is_assignable_from(binding_type))
                        .unwrap_or(false)
                })
                .cloned()
                .collect();
        }
        if !self.settings.enable_unqualified_operation_call {
            return Vec::new();
        }
        self.model
            .find_bound_operations(binding_type)
            .into_iter()
            .filter(|op| {
                op.name() == identifier || (ci && op.name().eq_ignore_ascii_case(identifier))
            })
            .collect()
    }

    /// Narrow an overload group to the one being called.
    ///
    /// Functions are matched on their non-binding parameters: by name when
    /// every parameter is named, by count otherwise. Among several matches an
    /// overload bound to exactly `binding_type` wins.
    fn select_overload<T>(
        &self,
        candidates: Vec<T>,
        operation_of: impl Fn(&T) -> &Arc<EdmOperation>,
        parameters: &[OperationParameter],
        binding_type: Option<&EdmType>,
        index: usize,
        identifier: &str,
    ) -> Result<T, BindingError> {
        let mut seen = BTreeSet::new();
        if let Some(repeated) = parameters
            .iter()
            .filter_map(|p| p.name.as_deref())
            .find(|name| !seen.insert(*name))
        {
            return Err(BindingError::SegmentNotFound {
                identifier: identifier.to_string(),
                index,
                context: format!("parameter `{repeated}` given more than once"),
            });
        }
        let named: Option<BTreeSet<&str>> =
            parameters.iter().map(|p| p.name.as_deref()).collect();
        let mut matching: Vec<T> = candidates
            .into_iter()
            .filter(|c| {
                let operation = operation_of(c);
                if operation.kind() == OperationKind::Action {
                    return true;
                }
                let declared = operation.non_binding_parameters();
                match &named {
                    Some(names) if !names.is_empty() => {
                        declared.len() == names.len()
                            && declared.iter().all(|p| names.contains(p.name()))
                    }
                    _ => declared.len() == parameters.len(),
                }
            })
            .collect();

        if matching.len() > 1 {
            if let Some(binding_type) = binding_type {
                let exact = |c: &T| {
                    operation_of(c)
                        .binding_parameter()
                        .map(|p| &p.edm_type() == binding_type)
                        .unwrap_or(false)
                };
                if matching.iter().any(exact) {
                    matching.retain(exact);
                }
            }
        }

        match matching.len() {
            0 => Err(BindingError::SegmentNotFound {
                identifier: identifier.to_string(),
                index,
                context: format!("overloads accepting {} parameter(s)", parameters.len()),
            }),
            1 => Ok(matching.remove(0)),
            _ => Err(BindingError::AmbiguousSegment {
                identifier: identifier.to_string(),
                index,
                candidates: matching.iter().map(|c| signature(operation_of(c))).collect(),
            }),
        }
    }

    /// Source of the entities a bound operation returns, following its
    /// entity set path (`binding/Nav/...`) from the binding source.
    fn returned_source(
        &self,
        operation: &EdmOperation,
        binding_source: &NavigationSource,
    ) -> Option<NavigationSource> {
        operation.return_type()?.element_type().as_entity()?;
        let path = operation.entity_set_path()?;
        let mut source = binding_source.clone();
        for name in path.split('/').skip(1) {
            let entity = source.entity_type()?;
            let nav = match entity.find_property(name, false)? {
                EdmProperty::Navigation(nav) => nav,
                EdmProperty::Structural(_) => return None,
            };
            source = navigate(&source, &nav);
        }
        Some(source)
    }

    // ------------------------------------------------------------------------
    // Key predicates
    // ------------------------------------------------------------------------

    fn bind_key(
        &self,
        segment: &PathSegment,
        index: usize,
        token: &PathSegmentToken,
    ) -> Result<PathSegment, BindingError> {
        let identifier = token.identifier();
        let mismatch = |reason: String| BindingError::KeyPredicateMismatch {
            identifier: identifier.to_string(),
            index,
            reason,
        };

        let entity = match (&segment.edm_type, segment.cardinality) {
            (Some(EdmType::Entity(entity)), Cardinality::Collection) => Arc::clone(entity),
            (Some(other), Cardinality::Collection) => {
                return Err(mismatch(format!("`{other}` is not an entity type")))
            }
            _ => return Err(mismatch("the segment does not address a collection".to_string())),
        };

        let key = entity.key();
        let values = token.named_values();
        if values.len() != key.len() {
            return Err(mismatch(format!(
                "`{}` has {} key propert{}, found {} value(s)",
                entity.full_name(),
                key.len(),
                if key.len() == 1 { "y" } else { "ies" },
                values.len()
            )));
        }
        if key.len() > 1 && values.iter().any(|v| v.name.is_none()) {
            return Err(mismatch(
                "positional key values are only allowed for single-property keys".to_string(),
            ));
        }

        let ci = self.settings.enable_case_insensitive;
        let mut bound: Vec<KeyValue> = Vec::with_capacity(values.len());
        for value in values {
            let property = match &value.name {
                None => &key[0],
                Some(name) => key
                    .iter()
                    .find(|k| k.name() == name)
                    .or_else(|| {
                        ci.then(|| key.iter().find(|k| k.name().eq_ignore_ascii_case(name)))
                            .flatten()
                    })
                    .ok_or_else(|| {
                        mismatch(format!(
                            "`{name}` is not a key property of `{}`",
                            entity.full_name()
                        ))
                    })?,
            };
            if bound.iter().any(|b| b.name == property.name()) {
                return Err(mismatch(format!(
                    "key property `{}` is given more than once",
                    property.name()
                )));
            }

            let literal = parse_literal(&value.value)
                .map_err(|_| mismatch(format!("`{}` is not a valid literal", value.value)))?;
            let property_type = property.edm_type();
            if !self.literal_fits(&property_type, &literal) {
                return Err(mismatch(format!(
                    "`{}` is not a valid `{property_type}` value for key `{}`",
                    value.value,
                    property.name()
                )));
            }
            bound.push(KeyValue {
                name: property.name().to_string(),
                value: literal,
                text: value.value.clone(),
            });
        }

        Ok(PathSegment {
            kind: SegmentKind::Key(bound),
            identifier: identifier.to_string(),
            edm_type: segment.edm_type.clone(),
            cardinality: Cardinality::Single,
            navigation_source: segment.navigation_source.clone(),
        })
    }

    fn literal_fits(&self, edm_type: &EdmType, literal: &LiteralValue) -> bool {
        match edm_type {
            EdmType::Primitive(kind) => primitive_accepts(*kind, literal),
            EdmType::Definition(definition) => definition
                .underlying_type()
                .map(|kind| primitive_accepts(kind, literal))
                .unwrap_or(false),
            EdmType::Enum(enum_type) => match literal {
                LiteralValue::Enum { type_name, member } => {
                    self.find_schema_type(type_name).as_ref() == Some(edm_type)
                        && enum_type.find_member(member).is_some()
                }
                LiteralValue::String(member) => enum_type.find_member(member).is_some(),
                _ => false,
            },
            _ => false,
        }
    }
}

fn operation_segment(
    kind: SegmentKind,
    identifier: &str,
    operation: &EdmOperation,
    navigation_source: Option<NavigationSource>,
) -> PathSegment {
    let (edm_type, cardinality) = match operation.return_type() {
        Some(returned) => {
            let (element, cardinality) = split_collection(returned);
            (Some(element), cardinality)
        }
        None => (None, Cardinality::Single),
    };
    PathSegment {
        kind,
        identifier: identifier.to_string(),
        edm_type,
        cardinality,
        navigation_source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_ranges_are_enforced() {
        assert!(primitive_accepts(EdmPrimitiveKind::Byte, &LiteralValue::Integer(255)));
        assert!(!primitive_accepts(EdmPrimitiveKind::Byte, &LiteralValue::Integer(256)));
        assert!(!primitive_accepts(EdmPrimitiveKind::SByte, &LiteralValue::Integer(-129)));
        assert!(primitive_accepts(EdmPrimitiveKind::Int16, &LiteralValue::Integer(-32768)));
        assert!(!primitive_accepts(
            EdmPrimitiveKind::Int32,
            &LiteralValue::Integer(i64::from(i32::MAX) + 1)
        ));
        assert!(primitive_accepts(EdmPrimitiveKind::Int64, &LiteralValue::Integer(i64::MIN)));
    }

    #[test]
    fn numeric_kinds_accept_integers_and_decimals() {
        for kind in [
            EdmPrimitiveKind::Decimal,
            EdmPrimitiveKind::Double,
            EdmPrimitiveKind::Single,
        ] {
            assert!(primitive_accepts(kind, &LiteralValue::Integer(3)));
            assert!(primitive_accepts(kind, &LiteralValue::Double(2.5)));
        }
        assert!(!primitive_accepts(EdmPrimitiveKind::Int32, &LiteralValue::Double(2.5)));
    }

    #[test]
    fn durations_must_be_iso_8601() {
        let ok = LiteralValue::Duration("P1DT2H".to_string());
        let bad = LiteralValue::Duration("1 day".to_string());
        assert!(primitive_accepts(EdmPrimitiveKind::Duration, &ok));
        assert!(!primitive_accepts(EdmPrimitiveKind::Duration, &bad));

        let huge = LiteralValue::Duration("P999999999999D".to_string());
        assert!(!primitive_accepts(EdmPrimitiveKind::Duration, &huge));
    }

    #[test]
    fn strings_do_not_fit_numbers() {
        let text = LiteralValue::String("1".to_string());
        assert!(!primitive_accepts(EdmPrimitiveKind::Int32, &text));
        assert!(primitive_accepts(EdmPrimitiveKind::String, &text));
        assert!(!primitive_accepts(EdmPrimitiveKind::String, &LiteralValue::Null));
    }
}

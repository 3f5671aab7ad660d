//! CSDL syntactic AST.
//!
//! This is the shape an external schema-document reader hands to the
//! semantic model. Nothing here is resolved or validated: type references are
//! plain strings (`Edm.Int32`, `Sales.Customer`, `Collection(Sales.Order)`)
//! and names may be duplicated or dangling. `odata-edm` turns this into a
//! checked type graph.
//!
//! The types derive `serde` so a model can be supplied as JSON.

use serde::{Deserialize, Serialize};

pub type Name = String;

/// Source position of an element in its schema document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CsdlLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
}

impl std::fmt::Display for CsdlLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{source}:{}:{}", self.line, self.column),
            None => write!(f, "({}, {})", self.line, self.column),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CsdlModel {
    #[serde(default)]
    pub schemas: Vec<CsdlSchema>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CsdlSchema {
    pub namespace: Name,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<Name>,
    pub entity_types: Vec<CsdlStructuredType>,
    pub complex_types: Vec<CsdlStructuredType>,
    pub enum_types: Vec<CsdlEnumType>,
    pub type_definitions: Vec<CsdlTypeDefinition>,
    pub actions: Vec<CsdlOperation>,
    pub functions: Vec<CsdlOperation>,
    pub terms: Vec<CsdlTerm>,
    pub entity_containers: Vec<CsdlEntityContainer>,
    pub annotations: Vec<CsdlAnnotations>,
    pub location: CsdlLocation,
}

/// Entity or complex type declaration. `key` is only meaningful for entity
/// types.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CsdlStructuredType {
    pub name: Name,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_type: Option<Name>,
    pub is_abstract: bool,
    pub is_open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<Vec<Name>>,
    pub properties: Vec<CsdlProperty>,
    pub navigation_properties: Vec<CsdlNavigationProperty>,
    pub location: CsdlLocation,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CsdlProperty {
    pub name: Name,
    #[serde(rename = "type")]
    pub type_name: Name,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default)]
    pub location: CsdlLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CsdlNavigationProperty {
    pub name: Name,
    /// `NS.Entity` (single) or `Collection(NS.Entity)`.
    #[serde(rename = "type")]
    pub type_name: Name,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner: Option<Name>,
    #[serde(default)]
    pub contains_target: bool,
    #[serde(default)]
    pub location: CsdlLocation,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CsdlEnumType {
    pub name: Name,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underlying_type: Option<Name>,
    pub is_flags: bool,
    pub members: Vec<CsdlEnumMember>,
    pub location: CsdlLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CsdlEnumMember {
    pub name: Name,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CsdlTypeDefinition {
    pub name: Name,
    pub underlying_type: Name,
    pub location: CsdlLocation,
}

/// Action or function declaration; which one is decided by the list it sits
/// in on `CsdlSchema`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CsdlOperation {
    pub name: Name,
    pub is_bound: bool,
    pub is_composable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_set_path: Option<String>,
    pub parameters: Vec<CsdlParameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<CsdlReturnType>,
    pub location: CsdlLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CsdlParameter {
    pub name: Name,
    #[serde(rename = "type")]
    pub type_name: Name,
    #[serde(default = "default_true")]
    pub nullable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CsdlReturnType {
    #[serde(rename = "type")]
    pub type_name: Name,
    #[serde(default = "default_true")]
    pub nullable: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CsdlTerm {
    pub name: Name,
    #[serde(rename = "type")]
    pub type_name: Name,
    pub applies_to: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub location: CsdlLocation,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CsdlEntityContainer {
    pub name: Name,
    pub entity_sets: Vec<CsdlEntitySet>,
    pub singletons: Vec<CsdlSingleton>,
    pub action_imports: Vec<CsdlActionImport>,
    pub function_imports: Vec<CsdlFunctionImport>,
    pub location: CsdlLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CsdlNavigationPropertyBinding {
    /// Navigation property path, optionally through a type cast
    /// (`Customer`, `Sales.VipOrder/Approver`).
    pub path: String,
    /// Target set: `Customers`, `Container/Customers` or
    /// `Sales.Container/Customers`.
    pub target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CsdlEntitySet {
    pub name: Name,
    pub entity_type: Name,
    #[serde(default)]
    pub navigation_property_bindings: Vec<CsdlNavigationPropertyBinding>,
    #[serde(default = "default_true")]
    pub include_in_service_document: bool,
    #[serde(default)]
    pub location: CsdlLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CsdlSingleton {
    pub name: Name,
    #[serde(rename = "type")]
    pub type_name: Name,
    #[serde(default)]
    pub navigation_property_bindings: Vec<CsdlNavigationPropertyBinding>,
    #[serde(default)]
    pub location: CsdlLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CsdlActionImport {
    pub name: Name,
    pub action: Name,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_set: Option<String>,
    #[serde(default)]
    pub location: CsdlLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CsdlFunctionImport {
    pub name: Name,
    pub function: Name,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_set: Option<String>,
    #[serde(default)]
    pub include_in_service_document: bool,
    #[serde(default)]
    pub location: CsdlLocation,
}

/// Out-of-line annotations applied to `target`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CsdlAnnotations {
    pub target: String,
    pub annotations: Vec<CsdlAnnotation>,
    pub location: CsdlLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CsdlAnnotation {
    pub term: Name,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
    pub expression: CsdlExpression,
    #[serde(default)]
    pub location: CsdlLocation,
}

/// Kind tag of a constant expression; decides how its text is parsed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CsdlConstantKind {
    Binary,
    Boolean,
    Date,
    DateTimeOffset,
    Decimal,
    Duration,
    Floating,
    Guid,
    Integer,
    String,
    TimeOfDay,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CsdlConstantExpression {
    pub kind: CsdlConstantKind,
    pub value: String,
    #[serde(default)]
    pub location: CsdlLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum CsdlExpression {
    Constant(CsdlConstantExpression),
    Path {
        path: String,
        #[serde(default)]
        location: CsdlLocation,
    },
    /// Reference to an operation by qualified name.
    OperationReference {
        operation: Name,
        #[serde(default)]
        location: CsdlLocation,
    },
    Collection {
        items: Vec<CsdlExpression>,
        #[serde(default)]
        location: CsdlLocation,
    },
    Null {
        #[serde(default)]
        location: CsdlLocation,
    },
}

impl CsdlExpression {
    pub fn location(&self) -> &CsdlLocation {
        match self {
            CsdlExpression::Constant(c) => &c.location,
            CsdlExpression::Path { location, .. }
            | CsdlExpression::OperationReference { location, .. }
            | CsdlExpression::Collection { location, .. }
            | CsdlExpression::Null { location } => location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_minimal_schema_with_defaults() {
        let json = r#"{
            "schemas": [{
                "namespace": "Sales",
                "entity_types": [{
                    "name": "Order",
                    "key": ["Id"],
                    "properties": [{ "name": "Id", "type": "Edm.Int32", "nullable": false }],
                    "navigation_properties": [{ "name": "Customer", "type": "Sales.Customer" }]
                }],
                "annotations": [{
                    "target": "Sales.Order",
                    "annotations": [{
                        "term": "Core.Description",
                        "expression": { "tag": "constant", "kind": "string", "value": "An order" }
                    }]
                }]
            }]
        }"#;

        let model: CsdlModel = serde_json::from_str(json).unwrap();
        let schema = &model.schemas[0];
        assert_eq!(schema.namespace, "Sales");
        let order = &schema.entity_types[0];
        assert_eq!(order.key.as_deref(), Some(&["Id".to_string()][..]));
        assert!(!order.properties[0].nullable);
        assert!(order.navigation_properties[0].nullable);
        assert!(matches!(
            schema.annotations[0].annotations[0].expression,
            CsdlExpression::Constant(CsdlConstantExpression {
                kind: CsdlConstantKind::String,
                ..
            })
        ));
    }
}

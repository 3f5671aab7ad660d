//! EDM model E2E tests

use std::sync::Arc;

use odata_edm::*;

const SALES: &str = include_str!("fixtures/sales.json");

fn sales() -> EdmModel {
    EdmModel::from_json_str(SALES).unwrap()
}

/// Model holding one schema given as JSON.
fn model_with(schema: &str) -> EdmModel {
    EdmModel::from_json_str(&format!(r#"{{"schemas":[{schema}]}}"#)).unwrap()
}

fn codes(errors: &[EdmError]) -> Vec<EdmErrorCode> {
    errors.iter().map(|e| e.code).collect()
}

fn entity(model: &EdmModel, name: &str) -> Arc<EdmStructuredType> {
    model.find_structured_type(name).unwrap()
}

fn navigation(ty: &EdmStructuredType, name: &str) -> Arc<EdmNavigationProperty> {
    match ty.find_property(name, false) {
        Some(EdmProperty::Navigation(nav)) => nav,
        other => panic!("`{name}` is not a navigation property: {other:?}"),
    }
}

// ============================================================================
// Lookup
// ============================================================================

#[test]
fn test_fixture_validates_cleanly() {
    let model = sales();
    assert_eq!(model.validate(), Vec::<EdmError>::new());
}

#[test]
fn test_find_element_by_namespace_and_name() {
    let model = sales();

    let order = model.find_element("Sales", "Order").unwrap();
    assert_eq!(order.kind(), SchemaElementKind::EntityType);
    assert_eq!(order.namespace(), "Sales");
    assert_eq!(order.name(), "Order");
    assert_eq!(order.full_name(), "Sales.Order");

    assert_eq!(
        model.find_element("Sales", "Color").unwrap().kind(),
        SchemaElementKind::EnumType
    );
    assert!(model.find_element("Sales", "Invoice").is_none());
}

#[test]
fn test_alias_and_case_insensitive_lookup() {
    let model = sales();

    assert_eq!(model.find_elements("S.Order", false).len(), 1);
    assert!(model.find_elements("sales.order", false).is_empty());
    assert_eq!(model.find_elements("sales.order", true).len(), 1);
    assert_eq!(model.find_elements("Sales.Discount", false).len(), 2);
}

#[test]
fn test_resolve_type_references() {
    let model = sales();

    assert_eq!(
        model.resolve_type("Edm.Int32"),
        EdmType::Primitive(EdmPrimitiveKind::Int32)
    );
    assert_eq!(model.resolve_type("Edm.Untyped"), EdmType::Untyped);

    let lines = model.resolve_type("Collection(S.OrderLine)");
    assert!(lines.is_collection());
    assert_eq!(lines.full_name(), "Collection(Sales.OrderLine)");

    let missing = model.resolve_type("Sales.Invoice");
    match &missing {
        EdmType::Bad(bad) => {
            assert_eq!(bad.namespace(), "Sales");
            assert_eq!(bad.name(), "Invoice");
            assert_eq!(codes(bad.errors()), vec![EdmErrorCode::BadUnresolvedType]);
        }
        other => panic!("expected a bad type, got {other:?}"),
    }
    assert!(model.find_type("Sales.Invoice").is_none());
}

// ============================================================================
// Structured Types
// ============================================================================

#[test]
fn test_inheritance_chain_and_properties() {
    let model = sales();
    let vip = entity(&model, "Sales.VipCustomer");

    let ancestors: Vec<String> = vip.ancestors().iter().map(|t| t.full_name()).collect();
    assert_eq!(ancestors, vec!["Sales.Customer", "Sales.Party"]);

    let names: Vec<&str> = vip.properties().iter().map(EdmProperty::name).collect();
    assert_eq!(
        names,
        vec!["Id", "Name", "Email", "Address", "Nicknames", "Orders", "Tier"]
    );
    assert_eq!(vip.declared_properties().len(), 1);

    let key_props = vip.key();
    let key: Vec<&str> = key_props.iter().map(|p| p.name()).collect();
    assert_eq!(key, vec!["Id"]);

    let party = entity(&model, "Sales.Party");
    assert!(party.is_abstract());
    assert!(vip.is_or_inherits_from(&party));
    assert!(!party.is_or_inherits_from(&vip));
}

#[test]
fn test_base_type_and_openness() {
    let model = sales();

    let customer = entity(&model, "Sales.Customer");
    assert_eq!(
        customer.base_type().map(|t| t.full_name()),
        Some("Sales.Party".to_string())
    );
    assert!(entity(&model, "Sales.Party").base_type().is_none());

    assert!(entity(&model, "Sales.Product").is_open());
    assert!(!customer.is_open());
}

#[test]
fn test_find_property_case_handling() {
    let model = sales();
    let order = entity(&model, "Sales.Order");

    assert!(order.find_property("total", false).is_none());
    assert_eq!(order.find_property("total", true).unwrap().name(), "Total");
}

#[test]
fn test_navigation_properties() {
    let model = sales();
    let order = entity(&model, "Sales.Order");

    let customer = navigation(&order, "Customer");
    assert!(!customer.is_collection());
    assert!(!customer.is_nullable());
    assert_eq!(customer.edm_type().full_name(), "Sales.Customer");
    assert_eq!(customer.partner().unwrap().name(), "Orders");
    assert_eq!(
        customer.declaring_type().unwrap().full_name(),
        "Sales.Order"
    );

    let lines = navigation(&order, "Lines");
    assert!(lines.is_collection());
    assert!(lines.contains_target());
    assert_eq!(
        lines.target_entity_type().unwrap().full_name(),
        "Sales.OrderLine"
    );
}

#[test]
fn test_enum_members_are_numbered() {
    let model = sales();

    let EdmType::Enum(color) = model.resolve_type("Sales.Color") else {
        panic!("Color should be an enum");
    };
    assert_eq!(color.underlying_type(), EdmPrimitiveKind::Byte);
    let values: Vec<i64> = color.members().iter().map(|m| m.value).collect();
    assert_eq!(values, vec![1, 2, 3]);

    let EdmType::Enum(status) = model.resolve_type("Sales.OrderStatus") else {
        panic!("OrderStatus should be an enum");
    };
    assert_eq!(status.underlying_type(), EdmPrimitiveKind::Int32);
    assert_eq!(status.find_member("Shipped").unwrap().value, 1);
}

#[test]
fn test_flags_enum_uses_powers_of_two() {
    let model = model_with(
        r#"{"namespace":"N","enum_types":[{"name":"Access","is_flags":true,
            "members":[{"name":"Read"},{"name":"Write"},{"name":"Admin"}]}]}"#,
    );
    let EdmType::Enum(access) = model.resolve_type("N.Access") else {
        panic!("Access should be an enum");
    };
    let values: Vec<i64> = access.members().iter().map(|m| m.value).collect();
    assert_eq!(values, vec![1, 2, 4]);
}

// ============================================================================
// Operations, Terms And Annotations
// ============================================================================

#[test]
fn test_operations_and_overloads() {
    let model = sales();

    let discount = model.find_operations("Sales.Discount");
    assert_eq!(discount.len(), 2);
    assert!(discount.iter().all(|op| op.is_bound()));
    assert_eq!(discount[0].non_binding_parameters().len(), 1);
    assert_eq!(
        discount[1].find_parameter("rate").unwrap().edm_type().full_name(),
        "Edm.Double"
    );

    let ships = model.find_operations("Sales.Ship");
    let ship = &ships[0];
    assert_eq!(ship.kind(), OperationKind::Action);
    assert!(ship.return_type().is_none());

    let tops = model.find_operations("Sales.TopOrders");
    let top = &tops[0];
    assert!(top.is_composable());
    assert!(top.binding_parameter().is_none());
    assert_eq!(
        top.return_type().unwrap().full_name(),
        "Collection(Sales.Order)"
    );
}

#[test]
fn test_bound_operations_include_base_bindings() {
    let model = sales();

    let for_order = model.find_bound_operations(&model.resolve_type("Sales.Order"));
    let mut names: Vec<String> = for_order.iter().map(|op| op.name().to_string()).collect();
    names.sort();
    names.dedup();
    assert_eq!(names, vec!["Discount", "GetTotal", "Ship"]);

    let for_vip = model.find_bound_operations(&model.resolve_type("Sales.VipCustomer"));
    assert_eq!(for_vip.len(), 2);

    let for_orders = model.find_bound_operations(&model.resolve_type("Collection(Sales.Order)"));
    assert_eq!(for_orders.len(), 1);
    assert_eq!(for_orders[0].name(), "MostRecent");
}

#[test]
fn test_container_members() {
    let model = sales();
    let container = model.entity_container().unwrap();
    assert_eq!(container.full_name(), "Sales.Default");
    assert!(model.find_entity_container("S.Default").is_some());

    let orders = container.find_entity_set("Orders", false).unwrap();
    assert_eq!(orders.path(), ["Orders".to_string()]);
    assert_eq!(orders.edm_type().full_name(), "Collection(Sales.Order)");
    assert!(container.find_entity_set("orders", false).is_none());
    assert!(container.find_entity_set("orders", true).is_some());

    let me = container.find_singleton("Me", false).unwrap();
    assert_eq!(me.edm_type().full_name(), "Sales.Customer");

    let imports = container.find_operation_imports("TopOrders", false);
    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].kind(), OperationKind::Function);
    assert_eq!(imports[0].operations().len(), 1);
    assert_eq!(imports[0].entity_set().unwrap().name(), "Orders");
}

#[test]
fn test_navigation_bindings() {
    let model = sales();
    let container = model.entity_container().unwrap();
    let order = entity(&model, "Sales.Order");
    let customer = entity(&model, "Sales.Customer");

    let orders = container.find_navigation_source("Orders", false).unwrap();
    let target = orders
        .find_navigation_target(&navigation(&order, "Customer"))
        .unwrap();
    assert_eq!(target.name(), "Customers");

    // Qualified container path in the binding target.
    let customers = container.find_navigation_source("Customers", false).unwrap();
    let back = customers
        .find_navigation_target(&navigation(&customer, "Orders"))
        .unwrap();
    assert_eq!(back, orders);

    assert!(orders
        .find_navigation_target(&navigation(&order, "Lines"))
        .is_none());
}

#[test]
fn test_unknown_entity_set() {
    let model = sales();
    let container = model.entity_container().unwrap();
    let order = entity(&model, "Sales.Order");
    let orders = container.find_navigation_source("Orders", false).unwrap();

    let lines = Arc::new(EdmUnknownEntitySet::new(
        orders.clone(),
        navigation(&order, "Lines"),
    ));
    assert_eq!(lines.name(), "Lines");
    assert_eq!(lines.path(), ["Orders".to_string(), "Lines".to_string()]);
    assert!(std::ptr::eq(lines.path(), lines.path()));
    assert_eq!(lines.parent(), &orders);
    assert_eq!(
        lines.entity_type().unwrap().full_name(),
        "Sales.OrderLine"
    );

    // Even a navigation property the parent has a binding for.
    assert!(lines
        .find_navigation_target(&navigation(&order, "Customer"))
        .is_none());

    let nested = EdmUnknownEntitySet::new(NavigationSource::Unknown(lines), navigation(&order, "Lines"));
    assert_eq!(nested.path().len(), 3);
}

#[test]
fn test_term_default_value() {
    let model = sales();
    let term = model.find_term("Sales.Priority").unwrap();

    assert_eq!(term.edm_type(), EdmType::Primitive(EdmPrimitiveKind::Int32));
    let default = term.default_value().unwrap();
    assert_eq!(default.value(), &EdmValue::Integer(3));
    assert!(term.errors().is_empty());
}

#[test]
fn test_vocabulary_annotations() {
    let model = sales();
    let annotations = model.vocabulary_annotations("Sales.Order");
    assert_eq!(annotations.len(), 2);

    let plain = &annotations[0];
    assert!(plain.qualifier().is_none());
    assert!(matches!(plain.term(), SchemaElement::Term(_)));
    match plain.expression() {
        EdmExpression::Constant(c) => assert_eq!(c.value(), &EdmValue::Integer(5)),
        other => panic!("unexpected expression {other:?}"),
    }

    let rush = &annotations[1];
    assert_eq!(rush.qualifier(), Some("Rush"));
    match rush.expression() {
        EdmExpression::OperationReference(r) => {
            let op = r.operation();
            assert_eq!(op.kind(), SchemaElementKind::Function);
            assert_eq!(op.full_name(), "Sales.GetTotal");
            assert!(r.errors().is_empty());
        }
        other => panic!("unexpected expression {other:?}"),
    }

    assert_eq!(model.vocabulary_annotations("S.Order").len(), 2);
    assert!(model.vocabulary_annotations("Sales.Customer").is_empty());
}

// ============================================================================
// Validity Errors And Bad Placeholders
// ============================================================================

#[test]
fn test_unresolved_property_type_becomes_bad() {
    let model = model_with(
        r#"{"namespace":"N","entity_types":[{"name":"E","key":["Id"],
            "properties":[{"name":"Id","type":"Edm.Int32"},
                          {"name":"Owner","type":"Other.Person",
                           "location":{"source":"n.csdl","line":12,"column":4}}]}]}"#,
    );
    let e = entity(&model, "N.E");
    let owner = e.find_property("Owner", false).unwrap();

    match owner.edm_type() {
        EdmType::Bad(bad) => {
            assert_eq!(bad.namespace(), "Other");
            assert_eq!(bad.name(), "Person");
            assert!(!bad.errors().is_empty());
        }
        other => panic!("expected a bad type, got {other:?}"),
    }
    let errors = e.errors();
    assert_eq!(codes(errors), vec![EdmErrorCode::BadUnresolvedType]);
    assert_eq!(errors[0].location.line, 12);

    // The rest of the type stays usable.
    assert_eq!(e.key().len(), 1);
}

#[test]
fn test_unresolved_and_cyclic_base_types() {
    let model = model_with(
        r#"{"namespace":"N","entity_types":[
            {"name":"Orphan","base_type":"N.Missing"},
            {"name":"A","base_type":"N.B","key":["Id"],"properties":[{"name":"Id","type":"Edm.Int32"}]},
            {"name":"B","base_type":"N.A"}]}"#,
    );

    let orphan = entity(&model, "N.Orphan");
    assert!(matches!(orphan.base_type(), Some(EdmType::Bad(_))));
    assert!(orphan.ancestors().is_empty());
    assert!(codes(orphan.errors()).contains(&EdmErrorCode::BadUnresolvedType));

    let a = entity(&model, "N.A");
    assert_eq!(a.ancestors().len(), 1);
    assert!(codes(a.errors()).contains(&EdmErrorCode::CyclicBaseType));
    assert!(codes(entity(&model, "N.B").errors()).contains(&EdmErrorCode::CyclicBaseType));
}

#[test]
fn test_key_errors() {
    let model = model_with(
        r#"{"namespace":"N","entity_types":[
            {"name":"NoKey","properties":[{"name":"Id","type":"Edm.Int32"}]},
            {"name":"BadKey","key":["Code"],"properties":[{"name":"Id","type":"Edm.Int32"}]},
            {"name":"Base","is_abstract":true},
            {"name":"Derived","base_type":"N.Base","key":["Id"],"properties":[{"name":"Id","type":"Edm.Int32"}]}]}"#,
    );

    assert_eq!(
        codes(entity(&model, "N.NoKey").errors()),
        vec![EdmErrorCode::KeyMissingOnEntityType]
    );
    assert_eq!(
        codes(entity(&model, "N.BadKey").errors()),
        vec![EdmErrorCode::KeyPropertyNotFound]
    );
    assert!(entity(&model, "N.Base").errors().is_empty());
    assert!(entity(&model, "N.Derived").errors().is_empty());
}

#[test]
fn test_duplicate_names() {
    let model = model_with(
        r#"{"namespace":"N",
            "entity_types":[{"name":"T","key":["Id"],"properties":[
                {"name":"Id","type":"Edm.Int32"},{"name":"Id","type":"Edm.String"}]}],
            "complex_types":[{"name":"T"}],
            "functions":[
                {"name":"F","parameters":[{"name":"a","type":"Edm.Int32"}],"return_type":{"type":"Edm.Int32"}},
                {"name":"F","parameters":[{"name":"a","type":"Edm.String"},{"name":"a","type":"Edm.String"}],
                 "return_type":{"type":"Edm.Int32"}}]}"#,
    );

    let elements = model.find_elements("N.T", false);
    assert_eq!(elements.len(), 2);
    for element in &elements {
        assert!(codes(element.errors()).contains(&EdmErrorCode::DuplicateSchemaElementName));
    }
    assert!(codes(elements[0].errors()).contains(&EdmErrorCode::DuplicatePropertyName));

    // Two types claim the name, so references to it are ambiguous.
    match model.resolve_type("N.T") {
        EdmType::Bad(bad) => {
            assert_eq!(codes(bad.errors()), vec![EdmErrorCode::AmbiguousTypeName])
        }
        other => panic!("expected a bad type, got {other:?}"),
    }

    // Function overloads may share a name.
    let overloads = model.find_operations("N.F");
    assert!(overloads[0].errors().is_empty());
    assert_eq!(
        codes(overloads[1].errors()),
        vec![EdmErrorCode::DuplicateParameterName]
    );
}

#[test]
fn test_operation_errors() {
    let model = model_with(
        r#"{"namespace":"N",
            "entity_types":[{"name":"E","key":["Id"],"properties":[{"name":"Id","type":"Edm.Int32"}]}],
            "complex_types":[{"name":"C"}],
            "actions":[{"name":"Bound","is_bound":true},{"name":"Touch","is_bound":true,
                        "parameters":[{"name":"e","type":"N.E"}]}],
            "functions":[{"name":"NoResult"}],
            "entity_containers":[{"name":"Box",
                "entity_sets":[{"name":"Es","entity_type":"N.E",
                    "navigation_property_bindings":[{"path":"Nav","target":"Nowhere"}]},
                    {"name":"Cs","entity_type":"N.C"}],
                "singletons":[{"name":"Es","type":"N.E"}],
                "action_imports":[{"name":"DoTouch","action":"N.Touch"},
                                  {"name":"Ghost","action":"N.Ghost"}],
                "function_imports":[{"name":"Calc","function":"N.NoResult","entity_set":"Missing"}]}]}"#,
    );

    let bound = model.find_operations("N.Bound");
    assert_eq!(
        codes(bound[0].errors()),
        vec![EdmErrorCode::BoundOperationMustHaveParameters]
    );
    let no_result = model.find_operations("N.NoResult");
    assert_eq!(
        codes(no_result[0].errors()),
        vec![EdmErrorCode::FunctionMustHaveReturnType]
    );

    let container = model.find_entity_container("N.Box").unwrap();
    let errors = codes(container.errors());
    for expected in [
        EdmErrorCode::DuplicateEntityContainerMemberName,
        EdmErrorCode::BadUnresolvedNavigationTarget,
        EdmErrorCode::BadUnresolvedType,
        EdmErrorCode::OperationImportCannotImportBoundOperation,
        EdmErrorCode::BadUnresolvedOperation,
        EdmErrorCode::BadUnresolvedEntitySet,
    ] {
        assert!(errors.contains(&expected), "missing {expected:?} in {errors:?}");
    }
}

#[test]
fn test_invalid_navigation_and_enum_types() {
    let model = model_with(
        r#"{"namespace":"N",
            "entity_types":[{"name":"E","key":["Id"],"properties":[{"name":"Id","type":"Edm.Int32"}],
                "navigation_properties":[{"name":"Shape","type":"N.C"}]}],
            "complex_types":[{"name":"C"}],
            "enum_types":[{"name":"Bad","underlying_type":"Edm.String","members":[{"name":"X"},{"name":"X"}]}],
            "type_definitions":[{"name":"Weird","underlying_type":"N.C"}]}"#,
    );

    let e = entity(&model, "N.E");
    let shape = navigation(&e, "Shape");
    assert!(shape.target_entity_type().is_none());
    assert_eq!(
        codes(shape.errors()),
        vec![EdmErrorCode::InvalidNavigationPropertyType]
    );

    let element = model.find_element("N", "Bad").unwrap();
    assert_eq!(
        codes(element.errors()),
        vec![
            EdmErrorCode::InvalidEnumUnderlyingType,
            EdmErrorCode::DuplicateEnumMemberName
        ]
    );
    let weird = model.find_element("N", "Weird").unwrap();
    assert_eq!(
        codes(weird.errors()),
        vec![EdmErrorCode::InvalidTypeDefinitionUnderlyingType]
    );
}

#[test]
fn test_bad_annotations() {
    let model = model_with(
        r#"{"namespace":"N",
            "terms":[{"name":"When","type":"Edm.Date","default_value":"yesterday"}],
            "annotations":[{"target":"N.When","annotations":[
                {"term":"N.Unknown","expression":{"tag":"null"}},
                {"term":"N.When","expression":{"tag":"operation_reference","operation":"N.Nothing"}}]}]}"#,
    );

    let term = model.find_term("N.When").unwrap();
    assert_eq!(codes(term.errors()), vec![EdmErrorCode::InvalidLiteral]);

    let annotations = model.vocabulary_annotations("N.When");
    match annotations[0].term() {
        SchemaElement::Bad(bad) => {
            assert_eq!(bad.kind(), SchemaElementKind::Term);
            assert_eq!(bad.full_name(), "N.Unknown");
        }
        other => panic!("expected a bad term, got {other:?}"),
    }
    assert_eq!(
        codes(annotations[0].errors()),
        vec![EdmErrorCode::BadUnresolvedTerm]
    );

    match annotations[1].expression() {
        EdmExpression::OperationReference(r) => assert!(r.operation().is_bad()),
        other => panic!("unexpected expression {other:?}"),
    }

    let all = codes(&model.validate());
    assert_eq!(
        all,
        vec![
            EdmErrorCode::InvalidLiteral,
            EdmErrorCode::BadUnresolvedTerm,
            EdmErrorCode::BadUnresolvedOperation
        ]
    );
}

#[test]
fn test_nodes_outliving_their_model() {
    let model = sales();
    let order = entity(&model, "Sales.Order");
    drop(model);

    // Cached answers survive; anything that needs a lookup becomes Bad.
    let total = order.find_property("Total", false).unwrap();
    match total.edm_type() {
        EdmType::Bad(bad) => {
            assert_eq!(codes(bad.errors()), vec![EdmErrorCode::ModelUnavailable])
        }
        other => panic!("expected a bad type, got {other:?}"),
    }
}

// ============================================================================
// Loading And Concurrency
// ============================================================================

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales.json");
    std::fs::write(&path, SALES).unwrap();

    let model = EdmModel::load(&path).unwrap();
    assert!(model.find_element("Sales", "Order").is_some());
}

#[test]
fn test_load_reports_invalid_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{\"schemas\": [").unwrap();

    let err = EdmModel::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("broken.json"));
    assert!(matches!(
        EdmModel::from_json_str("not json"),
        Err(ModelLoadError::Json(_))
    ));
}

#[test]
fn test_concurrent_readers_see_one_answer() {
    let model = model_with(
        r#"{"namespace":"N","entity_types":[
            {"name":"A","base_type":"N.Gone","properties":[{"name":"P","type":"N.Nope"}]},
            {"name":"B","key":["Id"],"properties":[{"name":"Id","type":"Edm.Int32"}]}]}"#,
    );

    let results: Vec<Vec<EdmError>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8).map(|_| scope.spawn(|| model.validate())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for result in &results[1..] {
        assert_eq!(result, &results[0]);
    }

    let a = entity(&model, "N.A");
    assert!(std::ptr::eq(a.errors(), a.errors()));
    assert_eq!(
        codes(a.errors()),
        vec![
            EdmErrorCode::BadUnresolvedType,
            EdmErrorCode::BadUnresolvedType,
            EdmErrorCode::KeyMissingOnEntityType
        ]
    );
}

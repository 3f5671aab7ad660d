//! Integration tests for the complete path pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - raw segments → token chain (`odata-syntax`)
//! - CSDL JSON on disk → EDM model (`odata-edm`)
//! - token chain + model + settings → bound path (`odata-uri`)
//!
//! Run with: cargo test --test integration_tests

use std::path::Path;

use odata_edm::{EdmErrorCode, EdmModel, EdmType};
use odata_syntax::{LiteralValue, PathSegmentToken, SyntaxError, TokenChain};
use odata_uri::{
    segment_to_string, BindingError, Cardinality, ODataUriParserSettings, PathBinder, SegmentKind,
};
use tempfile::tempdir;

const SALES: &str = include_str!("../crates/odata-edm/tests/fixtures/sales.json");

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

// ============================================================================
// Files → model → binder
// ============================================================================

#[test]
fn test_model_and_settings_from_disk() {
    let dir = tempdir().unwrap();
    let model_path = write(dir.path(), "sales.json", SALES);
    let settings_path = write(
        dir.path(),
        "parser.json",
        r#"{ "enable_case_insensitive": true, "enable_unqualified_operation_call": true }"#,
    );

    let model = EdmModel::load(&model_path).unwrap();
    assert!(model.validate().is_empty());

    let settings = ODataUriParserSettings::load(&settings_path).unwrap();
    assert_eq!(settings.max_segments, ODataUriParserSettings::default().max_segments);

    let binder = PathBinder::new(&model, settings);
    let path = binder
        .bind_path(&["orders(7)", "customer", "rank"])
        .unwrap();

    assert_eq!(path.len(), 4);
    assert_eq!(path.to_string(), "Orders(7)/Customer/Sales.Rank");
    assert_eq!(
        path.edm_type(),
        Some(&EdmType::Primitive(odata_edm::EdmPrimitiveKind::Int32))
    );
    assert_eq!(path.cardinality(), Some(Cardinality::Single));
}

#[test]
fn test_settings_round_trip_through_json() {
    let settings = ODataUriParserSettings {
        enable_case_insensitive: true,
        max_segments: 8,
        ..ODataUriParserSettings::default()
    };
    let json = serde_json::to_string(&settings).unwrap();
    assert_eq!(ODataUriParserSettings::from_json_str(&json).unwrap(), settings);
}

// ============================================================================
// Token chains
// ============================================================================

#[test]
fn test_hand_built_chain_binds_like_parsed_segments() {
    let dir = tempdir().unwrap();
    let model = EdmModel::load(write(dir.path(), "sales.json", SALES)).unwrap();
    let binder = PathBinder::new(&model, ODataUriParserSettings::default());

    let mut chain = TokenChain::new();
    chain
        .append(PathSegmentToken::with_values(
            "Orders",
            vec![odata_syntax::NamedValue::positional("42")],
        ))
        .unwrap();
    chain.append(PathSegmentToken::non_system("Lines")).unwrap();

    let parsed = TokenChain::from_segments(&["Orders(42)", "Lines"]).unwrap();
    assert_eq!(chain, parsed);

    let path = binder.bind(&chain).unwrap();
    let rendered: Vec<String> = path.iter().map(segment_to_string).collect();
    assert_eq!(rendered, vec!["Orders", "(42)", "Lines"]);

    match path.segments()[1].kind() {
        SegmentKind::Key(values) => assert_eq!(values[0].value, LiteralValue::Integer(42)),
        other => panic!("unexpected segment {other:?}"),
    }

    // Contained navigation has no binding, so the set is synthesized.
    let source = path.navigation_source().unwrap();
    assert!(source.is_unknown());
    assert_eq!(source.path(), ["Orders".to_string(), "Lines".to_string()]);
}

#[test]
fn test_chain_cannot_grow_past_a_system_token() {
    let mut chain = TokenChain::from_segments(&["Orders"]).unwrap();
    chain.append(PathSegmentToken::system("$count")).unwrap();

    let err = chain
        .append(PathSegmentToken::non_system("Customer"))
        .unwrap_err();
    assert!(matches!(err, SyntaxError::IllegalSystemToken { .. }));
}

#[test]
fn test_wildcard_select_path_binds_its_prefix() {
    let model = EdmModel::from_json_str(SALES).unwrap();
    let binder = PathBinder::new(&model, ODataUriParserSettings::default());

    let mut chain = TokenChain::from_segments(&["Me", "Orders", "*"]).unwrap();
    chain.strip_wildcard().unwrap();
    assert_eq!(chain.len(), 2);

    let path = binder.bind(&chain).unwrap();
    assert_eq!(path.to_string(), "Me/Orders");
    assert_eq!(path.cardinality(), Some(Cardinality::Collection));
    assert_eq!(path.navigation_source().unwrap().name(), "Orders");
}

// ============================================================================
// Broken models still bind what they can
// ============================================================================

#[test]
fn test_bad_property_type_reports_but_binds() {
    let model = EdmModel::from_json_str(
        r#"{"schemas":[{"namespace":"Inv",
            "entity_types":[{"name":"Item","key":["Id"],"properties":[
                {"name":"Id","type":"Edm.Int32"},
                {"name":"Supplier","type":"Inv.Supplier"}]}],
            "entity_containers":[{"name":"Store",
                "entity_sets":[{"name":"Items","entity_type":"Inv.Item"}]}]}]}"#,
    )
    .unwrap();

    let errors = model.validate();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, EdmErrorCode::BadUnresolvedType);

    let binder = PathBinder::new(&model, ODataUriParserSettings::default());
    let path = binder.bind_path(&["Items(3)", "Supplier"]).unwrap();
    assert!(path.edm_type().unwrap().is_bad());

    let err = binder
        .bind_path(&["Items(3)", "Supplier", "Name"])
        .unwrap_err();
    assert_eq!(err.segment_index(), Some(2));
}

#[test]
fn test_model_without_container_refuses_to_bind() {
    let model = EdmModel::from_json_str(r#"{"schemas":[{"namespace":"Empty"}]}"#).unwrap();
    let binder = PathBinder::new(&model, ODataUriParserSettings::default());

    assert_eq!(
        binder.bind_path(&["Anything"]).unwrap_err(),
        BindingError::NoEntityContainer
    );
}

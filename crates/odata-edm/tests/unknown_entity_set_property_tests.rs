use std::sync::Arc;

use odata_edm::{EdmModel, EdmNavigationProperty, EdmProperty, EdmUnknownEntitySet, NavigationSource};
use proptest::prelude::*;

const SALES: &str = include_str!("fixtures/sales.json");

fn navigations(model: &EdmModel) -> Vec<Arc<EdmNavigationProperty>> {
    ["Sales.Order", "Sales.Customer"]
        .iter()
        .filter_map(|name| model.find_structured_type(name))
        .flat_map(|t| t.properties().to_vec())
        .filter_map(|p| match p {
            EdmProperty::Navigation(nav) => Some(nav),
            EdmProperty::Structural(_) => None,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, ..ProptestConfig::default() })]

    /// However deep the chain of unbound navigations, the result never
    /// claims a binding and its path extends the parent's by one name.
    #[test]
    fn unknown_sets_never_resolve_targets(
        root in prop::sample::select(vec!["Orders", "Customers", "Me", "Products"]),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 1..6),
    ) {
        let model = EdmModel::from_json_str(SALES).unwrap();
        let container = model.entity_container().unwrap();
        let navs = navigations(&model);
        prop_assert!(!navs.is_empty());

        let mut source = container.find_navigation_source(root, false).unwrap();
        for pick in &picks {
            let nav = pick.get(&navs).clone();
            let parent_path = source.path().to_vec();

            let unknown = NavigationSource::Unknown(Arc::new(
                EdmUnknownEntitySet::new(source.clone(), nav.clone()),
            ));
            prop_assert_eq!(unknown.path().len(), parent_path.len() + 1);
            prop_assert_eq!(&unknown.path()[..parent_path.len()], parent_path.as_slice());
            prop_assert_eq!(unknown.name(), nav.name());
            for candidate in &navs {
                prop_assert!(unknown.find_navigation_target(candidate).is_none());
            }
            source = unknown;
        }
        prop_assert_eq!(source.path().len(), picks.len() + 1);
        prop_assert_eq!(source.path()[0].as_str(), root);
    }
}

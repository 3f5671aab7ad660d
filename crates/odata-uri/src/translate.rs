//! Rendering segments back to path text.

use crate::segment::{OperationParameter, PathSegment, SegmentKind};

/// Text of one segment as it would appear in a canonical path.
///
/// Key segments render as their predicate, `(1)` or `(OrderId=1,LineNo=2)`,
/// so the caller can attach them to the previous segment. Operations and
/// operation imports both render as the qualified name of the operation
/// group they invoke, without parameters.
pub fn segment_to_string(segment: &PathSegment) -> String {
    match segment.kind() {
        SegmentKind::EntitySet(set) => set.name().to_string(),
        SegmentKind::Singleton(singleton) => singleton.name().to_string(),
        SegmentKind::NavigationProperty(nav) => nav.name().to_string(),
        SegmentKind::Property(property) => property.name().to_string(),
        SegmentKind::TypeCast(edm_type) => edm_type.full_name(),
        SegmentKind::Operation { operation, .. }
        | SegmentKind::OperationImport { operation, .. } => operation.full_name(),
        SegmentKind::OpenProperty(name) => name.clone(),
        SegmentKind::Key(values) => match values.as_slice() {
            [single] => format!("({})", single.text),
            many => {
                let pairs: Vec<String> = many
                    .iter()
                    .map(|v| format!("{}={}", v.name, v.text))
                    .collect();
                format!("({})", pairs.join(","))
            }
        },
    }
}

/// Operation parameters as they appear in a path, `(count=5)` or `(5)`.
/// Empty when there are none.
pub(crate) fn parameters_to_string(parameters: &[OperationParameter]) -> String {
    if parameters.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = parameters
        .iter()
        .map(|p| match &p.name {
            Some(name) => format!("{name}={}", p.text),
            None => p.text.clone(),
        })
        .collect();
    format!("({})", rendered.join(","))
}

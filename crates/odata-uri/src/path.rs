use std::fmt;

use odata_edm::{EdmType, NavigationSource};

use crate::segment::{Cardinality, PathSegment, SegmentKind};
use crate::translate::{parameters_to_string, segment_to_string};

/// A bound resource path: resolved segments in path order.
///
/// Only the binder builds one, and it is never modified afterwards.
#[derive(Debug, Clone)]
pub struct ODataPath {
    segments: Vec<PathSegment>,
}

impl ODataPath {
    pub(crate) fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathSegment> {
        self.segments.iter()
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Element type addressed by the whole path.
    pub fn edm_type(&self) -> Option<&EdmType> {
        self.last()?.edm_type()
    }

    pub fn cardinality(&self) -> Option<Cardinality> {
        self.last().map(PathSegment::cardinality)
    }

    pub fn navigation_source(&self) -> Option<&NavigationSource> {
        self.last()?.navigation_source()
    }
}

impl<'a> IntoIterator for &'a ODataPath {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for ODataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && !segment.is_key() {
                f.write_str("/")?;
            }
            match segment.kind() {
                SegmentKind::OperationImport {
                    import, parameters, ..
                } => {
                    f.write_str(import.name())?;
                    f.write_str(&parameters_to_string(parameters))?;
                }
                SegmentKind::Operation { parameters, .. } => {
                    f.write_str(&segment_to_string(segment))?;
                    f.write_str(&parameters_to_string(parameters))?;
                }
                _ => f.write_str(&segment_to_string(segment))?,
            }
        }
        Ok(())
    }
}

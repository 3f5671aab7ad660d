//! OData resource path binding
//!
//! Takes a token chain (`odata-syntax`) and resolves it against an
//! `odata_edm::EdmModel` into an [`ODataPath`]: an immutable list of typed
//! segments (entity set, navigation, property, type cast, operation, key, ...)
//! with the cardinality and navigation source each one addresses.
//!
//! ```ignore
//! let binder = PathBinder::new(&model, ODataUriParserSettings::default());
//! let path = binder.bind_path(&["Orders(1)", "Customer"])?;
//! assert_eq!(path.to_string(), "Orders(1)/Customer");
//! ```

pub mod binder;
pub mod error;
pub mod path;
pub mod segment;
pub mod settings;
pub mod translate;

pub use binder::PathBinder;
pub use error::BindingError;
pub use path::ODataPath;
pub use segment::{Cardinality, KeyValue, OperationParameter, PathSegment, SegmentKind};
pub use settings::ODataUriParserSettings;
pub use translate::segment_to_string;

use std::fmt;

use odata_syntax::csdl::CsdlConstantKind;
use serde::{Deserialize, Serialize};

/// Built-in `Edm.*` primitive types (spatial types are not modelled).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdmPrimitiveKind {
    Binary,
    Boolean,
    Byte,
    Date,
    DateTimeOffset,
    Decimal,
    Double,
    Duration,
    Guid,
    Int16,
    Int32,
    Int64,
    SByte,
    Single,
    Stream,
    String,
    TimeOfDay,
}

const ALL: [EdmPrimitiveKind; 17] = [
    EdmPrimitiveKind::Binary,
    EdmPrimitiveKind::Boolean,
    EdmPrimitiveKind::Byte,
    EdmPrimitiveKind::Date,
    EdmPrimitiveKind::DateTimeOffset,
    EdmPrimitiveKind::Decimal,
    EdmPrimitiveKind::Double,
    EdmPrimitiveKind::Duration,
    EdmPrimitiveKind::Guid,
    EdmPrimitiveKind::Int16,
    EdmPrimitiveKind::Int32,
    EdmPrimitiveKind::Int64,
    EdmPrimitiveKind::SByte,
    EdmPrimitiveKind::Single,
    EdmPrimitiveKind::Stream,
    EdmPrimitiveKind::String,
    EdmPrimitiveKind::TimeOfDay,
];

impl EdmPrimitiveKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Binary => "Edm.Binary",
            Self::Boolean => "Edm.Boolean",
            Self::Byte => "Edm.Byte",
            Self::Date => "Edm.Date",
            Self::DateTimeOffset => "Edm.DateTimeOffset",
            Self::Decimal => "Edm.Decimal",
            Self::Double => "Edm.Double",
            Self::Duration => "Edm.Duration",
            Self::Guid => "Edm.Guid",
            Self::Int16 => "Edm.Int16",
            Self::Int32 => "Edm.Int32",
            Self::Int64 => "Edm.Int64",
            Self::SByte => "Edm.SByte",
            Self::Single => "Edm.Single",
            Self::Stream => "Edm.Stream",
            Self::String => "Edm.String",
            Self::TimeOfDay => "Edm.TimeOfDay",
        }
    }

    /// Look up a primitive by its qualified name (`Edm.Int32`).
    pub fn from_name(name: &str) -> Option<Self> {
        ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            Self::Byte | Self::SByte | Self::Int16 | Self::Int32 | Self::Int64
        )
    }

    /// Constant-expression kind used to parse default values of this type.
    pub fn constant_kind(self) -> Option<CsdlConstantKind> {
        Some(match self {
            Self::Binary => CsdlConstantKind::Binary,
            Self::Boolean => CsdlConstantKind::Boolean,
            Self::Date => CsdlConstantKind::Date,
            Self::DateTimeOffset => CsdlConstantKind::DateTimeOffset,
            Self::Decimal => CsdlConstantKind::Decimal,
            Self::Double | Self::Single => CsdlConstantKind::Floating,
            Self::Duration => CsdlConstantKind::Duration,
            Self::Guid => CsdlConstantKind::Guid,
            Self::Byte | Self::SByte | Self::Int16 | Self::Int32 | Self::Int64 => {
                CsdlConstantKind::Integer
            }
            Self::String => CsdlConstantKind::String,
            Self::TimeOfDay => CsdlConstantKind::TimeOfDay,
            Self::Stream => return None,
        })
    }
}

impl fmt::Display for EdmPrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

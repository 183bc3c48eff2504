#![forbid(unsafe_code)]

//! Error types for panel construction and inspection.

use std::fmt;

use spyglass_core::types::TypeKey;
use spyglass_core::value::PropertyError;

/// A panel constructor could not build its panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructError {
    /// Reading or writing the target failed.
    Property(PropertyError),
    /// The target lacks something the panel needs.
    MissingProperty { ty: TypeKey, property: &'static str },
    /// Any other constructor-specific failure.
    Failed(String),
}

impl fmt::Display for ConstructError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(err) => write!(f, "{err}"),
            Self::MissingProperty { ty, property } => {
                write!(f, "{} has no `{property}`", ty.simple_name())
            }
            Self::Failed(reason) => f.write_str(reason),
        }
    }
}

impl std::error::Error for ConstructError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Property(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PropertyError> for ConstructError {
    fn from(err: PropertyError) -> Self {
        Self::Property(err)
    }
}

/// Building a panel stack failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A constructor returned an error. Panels built earlier in the same call
    /// have already been disposed.
    Construction {
        panel: String,
        source: ConstructError,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Construction { panel, .. } => write!(f, "failed to construct panel `{panel}`"),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Construction { source, .. } => Some(source),
        }
    }
}

/// An inspection request could not be completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectError {
    /// Selection, decoration and the tree were updated but the panel stack
    /// could not be built. The pane is empty.
    Panels(BuildError),
    /// The inspector has been shut down.
    ShutDown,
}

impl fmt::Display for InspectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Panels(_) => f.write_str("panel stack could not be built"),
            Self::ShutDown => f.write_str("inspector has been shut down"),
        }
    }
}

impl std::error::Error for InspectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Panels(err) => Some(err),
            Self::ShutDown => None,
        }
    }
}

impl From<BuildError> for InspectError {
    fn from(err: BuildError) -> Self {
        Self::Panels(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spyglass_core::value::PropertyKey;
    use std::error::Error;

    #[test]
    fn source_chain_reaches_the_property_error() {
        let prop = PropertyError::Unsupported {
            key: PropertyKey::Font,
        };
        let err = InspectError::from(BuildError::Construction {
            panel: "ComponentPanel".into(),
            source: prop.clone().into(),
        });
        let build = err.source().expect("build error");
        assert_eq!(build.to_string(), "failed to construct panel `ComponentPanel`");
        let construct = build.source().expect("construct error");
        let leaf = construct.source().expect("property error");
        assert_eq!(leaf.to_string(), prop.to_string());
    }
}

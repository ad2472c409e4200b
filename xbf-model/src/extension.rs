//! Markup-extension placeholder values.

use xbf_metadata::XamlProperty;

use std::sync::Arc;

/// A deferred-lookup placeholder decoded from a markup-extension record.
///
/// The reader only constructs these; resolving a key against an actual
/// resource dictionary (or a template's parent) is the caller's job.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupExtension {
    /// `{StaticResource key}` — resource lookup by key.
    StaticResource {
        /// The resource key to look up.
        key: Arc<str>,
    },

    /// `{ThemeResource key}` — theme-scoped resource lookup by key.
    ThemeResource {
        /// The resource key to look up.
        key: Arc<str>,
    },

    /// `{TemplateBinding property}` — binds through the templated parent's
    /// property. Holds the property being bound through, not a value.
    TemplateBinding {
        /// The source property on the templated parent.
        property: XamlProperty,
    },

    /// `{x:Null}` — an explicit null, no payload.
    Null,
}

impl MarkupExtension {
    /// The lookup key, for the two resource-by-key variants.
    pub fn resource_key(&self) -> Option<&str> {
        match self {
            Self::StaticResource { key } | Self::ThemeResource { key } => Some(key),
            _ => None,
        }
    }
}

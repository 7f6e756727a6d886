//! Personalization attributes supplied by the user.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Fields that drive prompt construction and the greeting text.
///
/// Only `age` is required. Optional fields that are `None` (or blank) simply
/// drop their clause from the prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    /// Age of the recipient, kept as text so "30" and "thirty" both work.
    pub age: String,
    /// Gender or noun describing the recipient ("woman", "boy", ...).
    #[serde(default)]
    pub gender: Option<String>,
    /// Ordered interests; rendered as "a, b and c".
    #[serde(default)]
    pub interests: Vec<String>,
    /// Art style ("watercolor", "pixel art", ...).
    #[serde(default)]
    pub style: Option<String>,
    /// Color scheme ("pastel", "neon", ...).
    #[serde(default)]
    pub color_scheme: Option<String>,
    /// Recipient name, used only in the greeting.
    #[serde(default)]
    pub name: Option<String>,
}

impl Attributes {
    /// Start a set of attributes from an age of any displayable type.
    #[must_use]
    pub fn with_age(age: impl Display) -> Self {
        Self { age: age.to_string(), ..Self::default() }
    }

    /// Set the gender clause.
    #[must_use]
    pub fn gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    /// Set the interests, in order.
    #[must_use]
    pub fn interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests = interests.into_iter().map(Into::into).collect();
        self
    }

    /// Set the style clause.
    #[must_use]
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Set the color-scheme clause.
    #[must_use]
    pub fn color_scheme(mut self, color_scheme: impl Into<String>) -> Self {
        self.color_scheme = Some(color_scheme.into());
        self
    }

    /// Set the recipient name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The recipient name if it is present and non-blank.
    #[must_use]
    pub fn greeting_name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }
}

/// Treat `Some("")` and whitespace-only values as absent.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Split a raw comma-separated interests field into trimmed, non-empty items.
#[must_use]
pub fn split_interests(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}

//! Static metadata for one stat id.

use crate::category::CategorySet;
use crate::error::DefinitionError;

/// A conditional suffix declared on a definition.
///
/// Registering the owning definition files one conditional stat per extension,
/// so `damage` with `{ required: FIRE, suffix: "Fire" }` also answers to the
/// extended id `damage_Fire`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatExtension {
    pub required: CategorySet,
    pub suffix: String,
}

impl StatExtension {
    pub fn new(required: CategorySet, suffix: impl Into<String>) -> Self {
        Self {
            required,
            suffix: suffix.into(),
        }
    }
}

/// Definition of a stat: display data, default, bounds and categories.
///
/// Definitions are created once while the registry is configured and updated in
/// place when the same id is registered again.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatDefinition {
    pub id: String,
    pub display_name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub default_value: f64,
    #[cfg_attr(feature = "serde", serde(default = "unbounded_min"))]
    pub min_value: f64,
    #[cfg_attr(feature = "serde", serde(default = "unbounded_max"))]
    pub max_value: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub categories: CategorySet,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_integer: bool,
    /// Display template such as `"{value}%"` or `"{value:.1}s"`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub format: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub aliases: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub extensions: Vec<StatExtension>,
}

#[cfg(feature = "serde")]
fn unbounded_min() -> f64 {
    f64::NEG_INFINITY
}

#[cfg(feature = "serde")]
fn unbounded_max() -> f64 {
    f64::INFINITY
}

impl StatDefinition {
    /// Create an unbounded, uncategorized definition with a default of zero.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: String::new(),
            default_value: 0.0,
            min_value: f64::NEG_INFINITY,
            max_value: f64::INFINITY,
            categories: CategorySet::NONE,
            is_integer: false,
            format: None,
            aliases: Vec::new(),
            extensions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_default(mut self, default_value: f64) -> Self {
        self.default_value = default_value;
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, min_value: f64, max_value: f64) -> Self {
        self.min_value = min_value;
        self.max_value = max_value;
        self
    }

    #[must_use]
    pub fn with_categories(mut self, categories: CategorySet) -> Self {
        self.categories = categories;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        if !self.aliases.contains(&alias) {
            self.aliases.push(alias);
        }
        self
    }

    #[must_use]
    pub fn with_extension(mut self, required: CategorySet, suffix: impl Into<String>) -> Self {
        let extension = StatExtension::new(required, suffix);
        if !self.extensions.contains(&extension) {
            self.extensions.push(extension);
        }
        self
    }

    /// Marks the stat as integral: computed values are rounded.
    #[must_use]
    pub fn integer(mut self) -> Self {
        self.is_integer = true;
        self
    }

    /// True if the definition shares at least one category with `category`.
    pub fn belongs_to_category(&self, category: CategorySet) -> bool {
        self.categories.contains_any(category)
    }

    /// Rejects definitions a correct data source can never produce.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        let numbers = [self.default_value, self.min_value, self.max_value];
        if numbers.iter().any(|value| value.is_nan()) {
            return Err(DefinitionError::NonNumericBound {
                id: self.id.clone(),
            });
        }

        if self.min_value > self.max_value {
            return Err(DefinitionError::InvertedBounds {
                id: self.id.clone(),
                min: self.min_value,
                max: self.max_value,
            });
        }

        let stray = std::iter::once(self.categories)
            .chain(self.extensions.iter().map(|extension| extension.required))
            .find(CategorySet::has_unknown_bits);
        if let Some(categories) = stray {
            return Err(DefinitionError::UnknownCategories {
                id: self.id.clone(),
                categories,
            });
        }

        Ok(())
    }

    /// Clamp to bounds, then round if the stat is integral.
    ///
    /// Bounds that are inverted or NaN leave the value unclamped.
    pub fn clamp_value(&self, value: f64) -> f64 {
        let clamped = if self.min_value <= self.max_value {
            value.clamp(self.min_value, self.max_value)
        } else {
            value
        };
        if self.is_integer {
            clamped.round()
        } else {
            clamped
        }
    }

    /// Renders `value` for display.
    ///
    /// `{value}` and `{value:.N}` placeholders in [`Self::format`] are replaced;
    /// without a usable template the value is printed with `precision` decimals
    /// (none for integral stats).
    pub fn format_value(&self, value: f64, precision: usize) -> String {
        let value = if self.is_integer { value.round() } else { value };
        let fallback_precision = if self.is_integer { 0 } else { precision };

        self.format
            .as_deref()
            .and_then(|template| render_template(template, value, fallback_precision))
            .unwrap_or_else(|| format!("{value:.fallback_precision$}"))
    }
}

/// Expands the first `{value}` / `{value:.N}` placeholder of `template`.
fn render_template(template: &str, value: f64, default_precision: usize) -> Option<String> {
    const OPEN: &str = "{value";

    let start = template.find(OPEN)?;
    let rest = &template[start + OPEN.len()..];
    let close = rest.find('}')?;
    let spec = &rest[..close];

    let precision = match spec {
        "" => default_precision,
        spec => spec.strip_prefix(":.")?.parse::<usize>().ok()?,
    };

    Some(format!(
        "{}{value:.precision$}{}",
        &template[..start],
        &rest[close + 1..]
    ))
}

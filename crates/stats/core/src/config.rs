/// How the registry compares stat ids, aliases and extended ids.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum IdCasePolicy {
    /// Ids are compared byte for byte.
    #[default]
    Sensitive,
    /// Ids are folded to lowercase on storage and lookup.
    Insensitive,
}

impl IdCasePolicy {
    /// Applies the policy to an id.
    pub fn fold<'a>(&self, id: &'a str) -> std::borrow::Cow<'a, str> {
        match self {
            Self::Sensitive => std::borrow::Cow::Borrowed(id),
            Self::Insensitive if id.chars().any(char::is_uppercase) => {
                std::borrow::Cow::Owned(id.to_lowercase())
            }
            Self::Insensitive => std::borrow::Cow::Borrowed(id),
        }
    }
}

/// Engine configuration and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatConfig {
    /// Case handling for every id the registry stores.
    pub id_case: IdCasePolicy,
    /// Decimal places used when a display template falls back to plain numbers.
    pub display_precision: usize,
    /// Warn when a real definition is registered without categories.
    pub warn_uncategorized: bool,
}

impl StatConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DISPLAY_PRECISION: usize = 2;

    pub fn new() -> Self {
        Self {
            id_case: IdCasePolicy::default(),
            display_precision: Self::DEFAULT_DISPLAY_PRECISION,
            warn_uncategorized: true,
        }
    }

    pub fn with_id_case(mut self, id_case: IdCasePolicy) -> Self {
        self.id_case = id_case;
        self
    }

    pub fn with_display_precision(mut self, display_precision: usize) -> Self {
        self.display_precision = display_precision;
        self
    }
}

impl Default for StatConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insensitive_policy_folds_only_when_needed() {
        let policy = IdCasePolicy::Insensitive;
        assert!(matches!(
            policy.fold("health"),
            std::borrow::Cow::Borrowed("health")
        ));
        assert_eq!(policy.fold("MaxHealth"), "maxhealth");
        assert_eq!(IdCasePolicy::Sensitive.fold("MaxHealth"), "MaxHealth");
    }

    #[test]
    fn policy_parses_from_snake_case() {
        assert_eq!(
            "insensitive".parse::<IdCasePolicy>().unwrap(),
            IdCasePolicy::Insensitive
        );
        assert_eq!(IdCasePolicy::Sensitive.to_string(), "sensitive");
    }
}

use std::collections::BTreeMap;

use super::domain::MissingField;

/// Working buffer of values typed for one application's missing fields.
///
/// Seeded from the automation run's `filled_fields` so the user only types
/// what is actually absent. The buffer is cleared only after a confirmed
/// submission; a failed request keeps it so a retry does not re-enter
/// values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDraft {
    values: BTreeMap<String, String>,
}

impl FieldDraft {
    pub fn seeded(filled: &BTreeMap<String, String>) -> Self {
        Self {
            values: filled.clone(),
        }
    }

    pub fn stage(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Keys from `missing` that still lack a usable value. Whitespace-only
    /// entries do not count as filled.
    pub fn incomplete_keys(&self, missing: &[MissingField]) -> Vec<String> {
        missing
            .iter()
            .filter(|field| !self.has_value(&field.key))
            .map(|field| field.key.clone())
            .collect()
    }

    pub fn is_complete(&self, missing: &[MissingField]) -> bool {
        missing.iter().all(|field| self.has_value(&field.key))
    }

    /// The value set actually sent to the backend: one entry per missing
    /// field.
    pub fn submission(&self, missing: &[MissingField]) -> BTreeMap<String, String> {
        missing
            .iter()
            .filter_map(|field| {
                self.values
                    .get(&field.key)
                    .map(|value| (field.key.clone(), value.clone()))
            })
            .collect()
    }

    fn has_value(&self, key: &str) -> bool {
        self.values
            .get(key)
            .map(|value| !value.trim().is_empty())
            .unwrap_or(false)
    }
}

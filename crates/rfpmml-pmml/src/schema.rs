//! Mining schemas: which fields a model consumes and predicts.

use std::cmp::Ordering;

/// Role a field plays within a model.
///
/// Variant order is the sort order: targets precede active fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldUsage {
    /// The predicted field.
    Target,
    /// An input field.
    Active,
}

/// A field reference inside a [`MiningSchema`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct MiningField {
    name: String,
    usage: FieldUsage,
}

impl MiningField {
    /// Create an active (input) field reference.
    #[must_use]
    pub fn active(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            usage: FieldUsage::Active,
        }
    }

    /// Create a target field reference.
    #[must_use]
    pub fn target(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            usage: FieldUsage::Target,
        }
    }

    /// Return the referenced field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the usage role.
    #[must_use]
    pub fn usage(&self) -> FieldUsage {
        self.usage
    }
}

impl Ord for MiningField {
    /// Targets first, then by name in code point order.
    fn cmp(&self, other: &Self) -> Ordering {
        self.usage
            .cmp(&other.usage)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for MiningField {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sorted list of field references.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct MiningSchema {
    fields: Vec<MiningField>,
}

impl MiningSchema {
    /// Build a schema, sorting `fields` targets-first then by name.
    #[must_use]
    pub fn new(mut fields: Vec<MiningField>) -> Self {
        fields.sort();
        Self { fields }
    }

    /// Build a schema of active fields only.
    #[must_use]
    pub fn active<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(MiningField::active).collect())
    }

    /// Return the fields in schema order.
    #[must_use]
    pub fn fields(&self) -> &[MiningField] {
        &self.fields
    }

    /// Return the field names in schema order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(MiningField::name)
    }

    /// Return the target field, if any.
    #[must_use]
    pub fn target(&self) -> Option<&MiningField> {
        self.fields.iter().find(|f| f.usage == FieldUsage::Target)
    }

    /// Return the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Return `true` if the schema lists no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

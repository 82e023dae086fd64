//! Parsed source model objects.

use crate::IoError;

/// A named attribute attached to a [`Rexp`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Attribute {
    /// Attribute name, e.g. `names`, `class`, `levels`.
    pub name: String,
    /// Attribute value.
    pub value: Rexp,
}

/// A node of a parsed source model tree.
///
/// Each node holds typed value vectors (normally only one of them is
/// populated) and an ordered list of attributes. A generic list keeps its
/// elements in `list`; the element names live in the `names` attribute, so
/// `field("forest")` resolves the position of `"forest"` in `names` and
/// returns the list element at that position.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rexp {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    strings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    integers: Vec<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    reals: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    booleans: Vec<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    list: Vec<Rexp>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<Attribute>,
}

impl Rexp {
    // --- Constructors ---

    /// Create a character vector.
    #[must_use]
    pub fn strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            strings: values.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Create an integer vector.
    #[must_use]
    pub fn integers(values: Vec<i32>) -> Self {
        Self {
            integers: values,
            ..Self::default()
        }
    }

    /// Create a real vector.
    #[must_use]
    pub fn reals(values: Vec<f64>) -> Self {
        Self {
            reals: values,
            ..Self::default()
        }
    }

    /// Create a logical vector.
    #[must_use]
    pub fn booleans(values: Vec<bool>) -> Self {
        Self {
            booleans: values,
            ..Self::default()
        }
    }

    /// Create an unnamed generic list.
    #[must_use]
    pub fn list(elements: Vec<Rexp>) -> Self {
        Self {
            list: elements,
            ..Self::default()
        }
    }

    /// Create a generic list whose element names go into `names`.
    #[must_use]
    pub fn named_list<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Rexp)>,
        S: Into<String>,
    {
        let (names, elements): (Vec<String>, Vec<Rexp>) = entries
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .unzip();
        Self::list(elements).with_attribute("names", Rexp::strings(names))
    }

    /// Append an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: Rexp) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            value,
        });
        self
    }

    // --- Vectors ---

    /// Return the character values.
    #[must_use]
    pub fn string_values(&self) -> &[String] {
        &self.strings
    }

    /// Return the integer values.
    #[must_use]
    pub fn int_values(&self) -> &[i32] {
        &self.integers
    }

    /// Return the real values.
    #[must_use]
    pub fn real_values(&self) -> &[f64] {
        &self.reals
    }

    /// Return the logical values.
    #[must_use]
    pub fn bool_values(&self) -> &[bool] {
        &self.booleans
    }

    /// Return the generic list elements.
    #[must_use]
    pub fn list_values(&self) -> &[Rexp] {
        &self.list
    }

    /// Return the character value at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::MissingElement`] if the vector is too short.
    pub fn string_value(&self, index: usize) -> Result<&str, IoError> {
        element(&self.strings, index, "string").map(String::as_str)
    }

    /// Return the integer value at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::MissingElement`] if the vector is too short.
    pub fn int_value(&self, index: usize) -> Result<i32, IoError> {
        element(&self.integers, index, "integer").copied()
    }

    /// Return the real value at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::MissingElement`] if the vector is too short.
    pub fn real_value(&self, index: usize) -> Result<f64, IoError> {
        element(&self.reals, index, "real").copied()
    }

    /// Return the list element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::MissingElement`] if the list is too short.
    pub fn list_value(&self, index: usize) -> Result<&Rexp, IoError> {
        element(&self.list, index, "list")
    }

    // --- Lookups ---

    /// Return the names of all attributes, in order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    /// Look up an attribute by name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::AttributeNotFound`] listing the attributes present.
    pub fn attribute(&self, name: &str) -> Result<&Rexp, IoError> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
            .ok_or_else(|| IoError::AttributeNotFound {
                name: name.to_string(),
                available: self.attribute_names().map(String::from).collect(),
            })
    }

    /// Look up a list element by name.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::AttributeNotFound`] | the object has no `names` attribute |
    /// | [`IoError::FieldNotFound`] | `name` is not among the element names |
    /// | [`IoError::MissingElement`] | `names` is longer than the list |
    pub fn field(&self, name: &str) -> Result<&Rexp, IoError> {
        let names = self.attribute("names")?.string_values();
        match names.iter().position(|n| n == name) {
            Some(index) => self.list_value(index),
            None => Err(IoError::FieldNotFound {
                name: name.to_string(),
                available: names.to_vec(),
            }),
        }
    }

    /// Look up a list element by name, treating absence as `None`.
    ///
    /// # Errors
    ///
    /// Same as [`Rexp::field`], except that a missing name is not an error.
    pub fn optional_field(&self, name: &str) -> Result<Option<&Rexp>, IoError> {
        match self.field(name) {
            Ok(value) => Ok(Some(value)),
            Err(IoError::FieldNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Return the entries of the `class` attribute (empty if absent).
    #[must_use]
    pub fn classes(&self) -> &[String] {
        self.attribute("class")
            .map(Rexp::string_values)
            .unwrap_or_default()
    }

    /// Return `true` if the `class` attribute lists `class`.
    #[must_use]
    pub fn inherits(&self, class: &str) -> bool {
        self.classes().iter().any(|c| c == class)
    }
}

fn element<'a, T>(values: &'a [T], index: usize, kind: &'static str) -> Result<&'a T, IoError> {
    values.get(index).ok_or(IoError::MissingElement {
        kind,
        index,
        len: values.len(),
    })
}

//! Field-name to column-position index.

use crate::config::DuplicateFieldPolicy;
use crate::{Error, Result};
use std::collections::HashMap;

/// Characters stripped by trailing-whitespace normalization.
const TRAILING_SPACE: [char; 2] = [' ', '\t'];

/// Strips trailing spaces and tabs.
///
/// # Examples
///
/// ```rust
/// use csvrecord::models::trim_trailing_space;
///
/// assert_eq!(trim_trailing_space("b \t "), "b");
/// assert_eq!(trim_trailing_space(" a"), " a");
/// ```
#[must_use]
pub fn trim_trailing_space(value: &str) -> &str {
    value.trim_end_matches(TRAILING_SPACE)
}

/// Ordered field list plus a name to position lookup.
///
/// Positions are zero-based and follow the field list order. When a name
/// repeats, the later position wins the lookup; see
/// [`HeaderIndex::duplicates`] and [`DuplicateFieldPolicy`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderIndex {
    fields: Vec<String>,
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    /// Builds an index from field names, verbatim.
    #[must_use]
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(fields, false)
    }

    /// Builds an index, optionally stripping trailing whitespace from each
    /// name first. The stripped names become both the field list and the
    /// lookup keys.
    #[must_use]
    pub fn build<I, S>(fields: I, trim_trailing: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields
            .into_iter()
            .map(|field| {
                let field: String = field.into();
                if trim_trailing {
                    trim_trailing_space(&field).to_string()
                } else {
                    field
                }
            })
            .collect();

        let positions = fields
            .iter()
            .enumerate()
            .map(|(i, field)| (field.clone(), i))
            .collect();

        Self { fields, positions }
    }

    /// Returns the ordered field list.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Consumes the index, returning the field list.
    #[must_use]
    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }

    /// Returns the column position addressed by `field`.
    #[must_use]
    pub fn position(&self, field: &str) -> Option<usize> {
        self.positions.get(field).copied()
    }

    /// Returns `true` if `field` is part of the field list.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.positions.contains_key(field)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` for an empty header.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Lists repeated names as `(name, first position, repeated position)`,
    /// in field-list order.
    #[must_use]
    pub fn duplicates(&self) -> Vec<(&str, usize, usize)> {
        let mut seen: HashMap<&str, usize> = HashMap::with_capacity(self.fields.len());
        let mut duplicates = Vec::new();
        for (i, field) in self.fields.iter().enumerate() {
            if let Some(&first) = seen.get(field.as_str()) {
                duplicates.push((field.as_str(), first, i));
            } else {
                seen.insert(field.as_str(), i);
            }
        }
        duplicates
    }

    /// Applies a duplicate-name policy to this header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateField`] for the first repeated name when the
    /// policy is [`DuplicateFieldPolicy::Reject`].
    pub fn check_duplicates(&self, policy: DuplicateFieldPolicy) -> Result<()> {
        let duplicates = self.duplicates();
        let Some(&(field, first, second)) = duplicates.first() else {
            return Ok(());
        };

        match policy {
            DuplicateFieldPolicy::Reject => Err(Error::DuplicateField {
                field: field.to_string(),
                first,
                second,
            }),
            DuplicateFieldPolicy::LastWins => {
                for (field, first, second) in duplicates {
                    tracing::warn!(
                        field,
                        first,
                        second,
                        "duplicate field name, column {first} is unreachable by name"
                    );
                }
                Ok(())
            },
        }
    }
}

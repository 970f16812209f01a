//! Declarative, partial representations of resources for server-side apply.
//!
//! Every field is optional and only set fields are serialized, so an apply
//! configuration describes exactly the fields its field manager wants to own.
//! Setters consume and return the configuration:
//!
//! * scalar setters overwrite, the last call wins;
//! * list setters append in call order;
//! * map setters merge, later entries overwrite existing keys.
//!
//! Entries of associative lists (lists merged by key on the server) must carry
//! their key. Setters for such lists validate every entry and return
//! [`ApplyConfigurationError`] instead of appending a partial batch.

pub mod extract;
pub mod meta;
pub mod operator;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyConfigurationError {
    #[error("{list}[{index}] is missing its list key {key:?}")]
    MissingListKey {
        list: &'static str,
        index: usize,
        key: &'static str,
    },
}

/// An entry of a list that the API server merges by key.
pub(crate) trait KeyedEntry {
    /// The first key field that is not set, if any.
    fn missing_key(&self) -> Option<&'static str>;
}

pub(crate) fn append_keyed<T: KeyedEntry>(
    list: &mut Vec<T>,
    list_name: &'static str,
    values: impl IntoIterator<Item = T>,
) -> Result<(), ApplyConfigurationError> {
    let values = values.into_iter().collect::<Vec<_>>();

    if let Some((index, key)) = values
        .iter()
        .enumerate()
        .find_map(|(index, value)| value.missing_key().map(|key| (index, key)))
    {
        return Err(ApplyConfigurationError::MissingListKey {
            list: list_name,
            index,
            key,
        });
    }

    list.extend(values);
    Ok(())
}

pub(crate) fn is_unset(value: Option<&String>) -> bool {
    value.is_none_or(String::is_empty)
}

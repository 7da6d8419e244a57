//! Selection sets and tag lists held by create/edit drafts.

use crate::error::ValidationError;
use crate::models::{Category, Spot};

/// Maximum number of hashtags on a category or spot.
pub const MAX_TAGS: usize = 10;

/// Anything that can be picked into a [`SelectionSet`].
pub trait Keyed {
    fn key(&self) -> i64;
}

impl Keyed for Category {
    fn key(&self) -> i64 {
        self.category_id
    }
}

impl Keyed for Spot {
    fn key(&self) -> i64 {
        self.spot_id
    }
}

/// Picked sub-resources keyed by id. No duplicate keys; insertion order is
/// display order.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSet<T> {
    items: Vec<T>,
}

impl<T> Default for SelectionSet<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Keyed> SelectionSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from pre-existing picks, silently dropping repeats.
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        let mut set = Self::new();
        for item in items {
            let _ = set.insert(item);
        }
        set
    }

    pub fn insert(&mut self, item: T) -> Result<(), ValidationError> {
        let id = item.key();
        if self.contains(id) {
            return Err(ValidationError::AlreadySelected { id });
        }
        self.items.push(item);
        Ok(())
    }

    pub fn remove(&mut self, key: i64) -> Option<T> {
        let index = self.items.iter().position(|item| item.key() == key)?;
        Some(self.items.remove(index))
    }

    pub fn contains(&self, key: i64) -> bool {
        self.items.iter().any(|item| item.key() == key)
    }

    pub fn keys(&self) -> Vec<i64> {
        self.items.iter().map(Keyed::key).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Hashtags typed into a form, capped at [`MAX_TAGS`] and unique by text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagList {
    tags: Vec<String>,
}

impl TagList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first [`MAX_TAGS`] distinct, non-blank tags.
    pub fn from_prefill<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for tag in tags {
            if list.len() == MAX_TAGS {
                break;
            }
            let _ = list.add(tag.as_ref());
        }
        list
    }

    /// Trims the input; the limit is checked before duplicates.
    pub fn add(&mut self, raw: &str) -> Result<(), ValidationError> {
        let tag = raw.trim();
        if tag.is_empty() {
            return Err(ValidationError::EmptyTag);
        }
        if self.tags.len() >= MAX_TAGS {
            return Err(ValidationError::TagLimitReached { limit: MAX_TAGS });
        }
        if self.tags.iter().any(|t| t == tag) {
            return Err(ValidationError::DuplicateTag(tag.to_string()));
        }
        self.tags.push(tag.to_string());
        Ok(())
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.tags.clone()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Pick(i64, &'static str);

    impl Keyed for Pick {
        fn key(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn duplicate_pick_leaves_set_unchanged() {
        let mut set = SelectionSet::new();
        set.insert(Pick(1, "Namsan")).unwrap();
        set.insert(Pick(2, "Gwanghwamun")).unwrap();

        let err = set.insert(Pick(1, "Namsan again")).unwrap_err();
        assert_eq!(err, ValidationError::AlreadySelected { id: 1 });
        assert_eq!(set.keys(), vec![1, 2]);
        assert_eq!(set.iter().next().unwrap().1, "Namsan");
    }

    #[test]
    fn remove_filters_by_key() {
        let mut set = SelectionSet::from_items([Pick(3, "a"), Pick(4, "b"), Pick(3, "dup")]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.remove(3), Some(Pick(3, "a")));
        assert_eq!(set.remove(3), None);
        assert_eq!(set.keys(), vec![4]);
    }

    #[test]
    fn eleventh_tag_is_rejected() {
        let mut tags = TagList::new();
        for i in 0..MAX_TAGS {
            tags.add(&format!("tag{i}")).unwrap();
        }
        let err = tags.add("one-more").unwrap_err();
        assert_eq!(err, ValidationError::TagLimitReached { limit: 10 });
        assert_eq!(tags.len(), 10);
    }

    #[test]
    fn duplicate_and_blank_tags_are_rejected() {
        let mut tags = TagList::new();
        tags.add(" seoul ").unwrap();
        assert_eq!(tags.add("seoul"), Err(ValidationError::DuplicateTag("seoul".into())));
        assert_eq!(tags.add("   "), Err(ValidationError::EmptyTag));
        assert_eq!(tags.as_slice(), ["seoul"]);
        assert!(tags.remove("seoul"));
        assert!(tags.is_empty());
    }

    #[test]
    fn prefill_truncates_to_limit() {
        let raw: Vec<String> = (0..14).map(|i| format!("t{}", i % 12)).collect();
        let tags = TagList::from_prefill(&raw);
        assert_eq!(tags.len(), MAX_TAGS);
        assert_eq!(tags.as_slice()[0], "t0");
    }
}

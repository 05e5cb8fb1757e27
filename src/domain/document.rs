use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::text::{sanitize, MAX_LIST_NAME_LENGTH};
use super::todo::{ListId, TodoList};

const AUTO_NAME_PREFIX: &str = "List ";

/// The root object persisted to disk: every list, in sidebar order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub lists: Vec<TodoList>,
}

impl Document {
    pub fn list(&self, id: &ListId) -> Option<&TodoList> { self.lists.iter().find(|l| &l.id == id) }

    pub fn list_mut(&mut self, id: &ListId) -> Option<&mut TodoList> { self.lists.iter_mut().find(|l| &l.id == id) }

    /// Appends a new empty list.
    ///
    /// A blank `name` gets `"List N"`, where N follows the highest
    /// auto-numbered list currently present. An explicit name that is
    /// already taken (case-insensitively) gets a `" (k)"` suffix.
    pub fn create_list(&mut self, name: Option<&str>) -> &TodoList {
        let name = match name.map(|n| sanitize(n, MAX_LIST_NAME_LENGTH)) {
            Some(n) if !n.is_empty() => self.deduplicated_name(&n),
            _ => self.auto_name(),
        };
        self.lists.push(TodoList::with_name(name));
        &self.lists[self.lists.len() - 1]
    }

    /// Returns `Ok(false)` if no list has this id.
    pub fn rename_list(&mut self, id: &ListId, new_name: &str) -> Result<bool, ValidationError> {
        let name = sanitize(new_name, MAX_LIST_NAME_LENGTH);
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "list name" });
        }
        let lowered = name.to_lowercase();
        if self.lists.iter().any(|l| &l.id != id && l.name.to_lowercase() == lowered) {
            return Err(ValidationError::DuplicateName(name));
        }
        match self.list_mut(id) {
            Some(list) => {
                list.name = name;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drops the list together with all of its tasks.
    pub fn remove_list(&mut self, id: &ListId) -> bool {
        let before = self.lists.len();
        self.lists.retain(|l| &l.id != id);
        self.lists.len() != before
    }

    fn taken_names(&self) -> HashSet<String> { self.lists.iter().map(|l| l.name.to_lowercase()).collect() }

    /// One past the highest `"List N"` suffix. Suffixes that cannot be
    /// incremented (`u64::MAX`) are ignored.
    fn next_auto_number(&self) -> u64 {
        self.lists
            .iter()
            .filter_map(|l| l.name.strip_prefix(AUTO_NAME_PREFIX))
            .filter_map(|suffix| suffix.parse::<u64>().ok()?.checked_add(1))
            .max()
            .unwrap_or(1)
    }

    fn auto_name(&self) -> String {
        let taken = self.taken_names();
        let is_free = |n: u64| !taken.contains(&format!("list {n}"));
        let mut n = self.next_auto_number();
        while !is_free(n) {
            n = match n.checked_add(1) {
                Some(next) => next,
                // Top of the range is taken: reuse the lowest free number.
                None => (1..=u64::MAX).find(|&k| is_free(k)).unwrap_or(1),
            };
        }
        format!("{AUTO_NAME_PREFIX}{n}")
    }

    fn deduplicated_name(&self, base: &str) -> String {
        let taken = self.taken_names();
        if !taken.contains(&base.to_lowercase()) {
            return base.to_string();
        }
        let mut counter = 2u32;
        loop {
            let suffix = format!(" ({counter})");
            let room = MAX_LIST_NAME_LENGTH.saturating_sub(suffix.chars().count());
            let stem: String = base.chars().take(room).collect();
            let candidate = format!("{}{suffix}", stem.trim_end());
            if !taken.contains(&candidate.to_lowercase()) {
                return candidate;
            }
            counter += 1;
        }
    }
}

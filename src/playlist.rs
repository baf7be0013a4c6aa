//! The playlist cursor: which track of the catalog is current, and how it
//! moves. Navigation is circular in both directions.

use crate::library::{Catalog, Track};

/// Direction of a manual step through the playlist.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// `current` is `None` exactly when the catalog is empty.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    catalog: Catalog,
    current: Option<usize>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the catalog. `restored` is used when it addresses a track of the
    /// new catalog; otherwise the cursor starts at the first track.
    pub fn set_catalog(&mut self, catalog: Catalog, restored: Option<usize>) {
        self.current = if catalog.is_empty() {
            None
        } else {
            Some(restored.filter(|&i| i < catalog.len()).unwrap_or(0))
        };
        self.catalog = catalog;
    }

    /// Advance, wrapping from the last track to the first.
    pub fn next(&mut self) {
        let len = self.catalog.len();
        if let Some(i) = self.current {
            self.current = Some(if i + 1 >= len { 0 } else { i + 1 });
        }
    }

    /// Step back, wrapping from the first track to the last.
    pub fn previous(&mut self) {
        let len = self.catalog.len();
        if let Some(i) = self.current {
            self.current = Some(if i == 0 { len - 1 } else { i - 1 });
        }
    }

    pub fn step(&mut self, direction: Direction) {
        match direction {
            Direction::Next => self.next(),
            Direction::Previous => self.previous(),
        }
    }

    /// Make `index` current. Returns `false` (and changes nothing) when out of range.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index < self.catalog.len() {
            self.current = Some(index);
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.and_then(|i| self.catalog.get(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}

#[cfg(test)]
mod tests;

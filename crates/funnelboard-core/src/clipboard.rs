//! In-app clipboard for components.

use crate::component::Component;
use kurbo::Vec2;

/// Default offset applied to pasted copies.
pub const PASTE_OFFSET: Vec2 = Vec2::new(20.0, 20.0);

/// Holds copied components by value.
#[derive(Debug, Clone)]
pub struct Clipboard {
    items: Vec<Component>,
    /// Offset of each pasted copy relative to its original.
    pub paste_offset: Vec2,
}

impl Default for Clipboard {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            paste_offset: PASTE_OFFSET,
        }
    }
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the clipboard contents. Later edits to the originals don't
    /// affect what gets pasted.
    pub fn copy<'a>(&mut self, components: impl IntoIterator<Item = &'a Component>) -> usize {
        self.items = components.into_iter().cloned().collect();
        log::info!("Copied {} components", self.items.len());
        self.items.len()
    }

    /// Fresh copies of the clipboard contents, each with a new id.
    pub fn paste(&self) -> Vec<Component> {
        self.items
            .iter()
            .map(|component| component.duplicate(self.paste_offset))
            .collect()
    }

    pub fn items(&self) -> &[Component] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn test_copy_is_by_value() {
        let mut original = Component::with_id("c1", "wait", Point::new(10.0, 10.0));
        let mut clipboard = Clipboard::new();
        clipboard.copy([&original]);

        original.position = Point::new(500.0, 500.0);
        let pasted = clipboard.paste();
        assert_eq!(pasted[0].position, Point::new(30.0, 30.0));
    }

    #[test]
    fn test_paste_twice_gives_fresh_ids() {
        let original = Component::with_id("c1", "wait", Point::ZERO);
        let mut clipboard = Clipboard::new();
        clipboard.copy([&original]);

        let first = clipboard.paste();
        let second = clipboard.paste();
        assert_ne!(first[0].id, "c1");
        assert_ne!(first[0].id, second[0].id);
    }

    #[test]
    fn test_empty_paste() {
        let clipboard = Clipboard::new();
        assert!(clipboard.is_empty());
        assert!(clipboard.paste().is_empty());
    }
}

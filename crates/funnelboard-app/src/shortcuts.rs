//! Keyboard shortcut registry and documentation.

use funnelboard_core::{CanvasAction, Modifiers};

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub action: CanvasAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        action: CanvasAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// Check a key press against this shortcut. Cmd counts as Ctrl.
    pub fn matches(&self, key: &str, modifiers: Modifiers) -> bool {
        self.key.eq_ignore_ascii_case(key)
            && self.ctrl == modifiers.command()
            && self.shift == modifiers.shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, false, CanvasAction::Undo, "Undo"),
            Shortcut::new("Z", true, true, CanvasAction::Redo, "Redo"),
            Shortcut::new("Y", true, false, CanvasAction::Redo, "Redo"),
            Shortcut::new(
                "C",
                true,
                false,
                CanvasAction::Copy,
                "Copy selected component",
            ),
            Shortcut::new(
                "X",
                true,
                false,
                CanvasAction::Cut,
                "Cut selected component",
            ),
            Shortcut::new("V", true, false, CanvasAction::Paste, "Paste components"),
            Shortcut::new(
                "Delete",
                false,
                false,
                CanvasAction::DeleteSelection,
                "Delete selection",
            ),
            Shortcut::new(
                "Backspace",
                false,
                false,
                CanvasAction::DeleteSelection,
                "Delete selection",
            ),
            Shortcut::new("=", true, false, CanvasAction::ZoomIn, "Zoom in"),
            Shortcut::new("+", true, true, CanvasAction::ZoomIn, "Zoom in"),
            Shortcut::new("-", true, false, CanvasAction::ZoomOut, "Zoom out"),
            Shortcut::new("0", true, false, CanvasAction::ResetView, "Reset view"),
            Shortcut::new(
                "1",
                true,
                true,
                CanvasAction::FitToContent,
                "Fit all components",
            ),
            Shortcut::new(
                "Escape",
                false,
                false,
                CanvasAction::Cancel,
                "Cancel connection or drag",
            ),
        ]
    }

    /// Find the action bound to a key press.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<CanvasAction> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(key, modifiers))
            .map(|shortcut| shortcut.action)
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl() -> Modifiers {
        Modifiers {
            ctrl: true,
            ..Modifiers::default()
        }
    }

    #[test]
    fn test_undo_redo_bindings() {
        let undo = ShortcutRegistry::resolve("z", ctrl());
        assert_eq!(undo, Some(CanvasAction::Undo));
        let ctrl_shift = Modifiers {
            shift: true,
            ..ctrl()
        };
        let redo = ShortcutRegistry::resolve("Z", ctrl_shift);
        assert_eq!(redo, Some(CanvasAction::Redo));
        let redo = ShortcutRegistry::resolve("y", ctrl());
        assert_eq!(redo, Some(CanvasAction::Redo));
    }

    #[test]
    fn test_meta_counts_as_ctrl() {
        let meta = Modifiers {
            meta: true,
            ..Modifiers::default()
        };
        let paste = ShortcutRegistry::resolve("v", meta);
        assert_eq!(paste, Some(CanvasAction::Paste));
    }

    #[test]
    fn test_plain_letter_unbound() {
        let plain = ShortcutRegistry::resolve("z", Modifiers::default());
        assert_eq!(plain, None);
        assert_eq!(ShortcutRegistry::resolve("Delete", ctrl()), None);
    }

    #[test]
    fn test_format() {
        let shortcut = Shortcut::new("Z", true, true, CanvasAction::Redo, "Redo");
        assert_eq!(shortcut.format(), "Ctrl+Shift+Z");
    }
}

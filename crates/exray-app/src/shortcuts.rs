//! Keyboard and mouse binding registry and documentation.

use exray_core::ToolKind;

/// An input binding definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, description: &'static str) -> Self {
        Self { key, description }
    }
}

/// Registry of all bindings.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered bindings.
    pub fn all() -> Vec<Shortcut> {
        let mut shortcuts: Vec<Shortcut> = ToolKind::ALL
            .into_iter()
            .map(|tool| Shortcut::new(Self::key_label(tool), tool.label()))
            .collect();
        shortcuts.extend([
            Shortcut::new("Escape", "Cancel current drawing"),
            Shortcut::new("Wheel", "Zoom around the cursor"),
            Shortcut::new("Right drag", "Pan"),
            Shortcut::new("Left click", "Select shape"),
        ]);
        shortcuts
    }

    fn key_label(tool: ToolKind) -> &'static str {
        match tool {
            ToolKind::Select => "1",
            ToolKind::DrawRect => "2",
            ToolKind::DrawDiamond => "3",
            ToolKind::DrawEllipse => "4",
            ToolKind::DrawArrowLine => "5",
            ToolKind::DrawLine => "6",
        }
    }

    /// One-line summary of the tool keys for the log.
    pub fn summary() -> String {
        ToolKind::ALL
            .into_iter()
            .map(|tool| format!("{}={}", Self::key_label(tool), tool.label()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

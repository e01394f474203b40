use serde::{Deserialize, Serialize};

/// Drag controller settings, owned and updated by the UI layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragConfig {
    /// Whether drags may start at all (off while a modal is open)
    #[serde(default = "default_drag_enabled")]
    pub drag_enabled: bool,

    /// Pointer travel, in pixels, before a press becomes a drag
    #[serde(default = "default_activation_distance")]
    pub activation_distance: f64,

    /// How a commit touching several containers is written
    #[serde(default)]
    pub write_mode: WriteMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WriteMode {
    /// Independent concurrent writes, one per container
    #[default]
    Concurrent,

    /// A single all-or-nothing batch through `DocumentStore::update_many`
    Atomic,
}

fn default_drag_enabled() -> bool {
    true
}

fn default_activation_distance() -> f64 {
    8.0
}

impl DragConfig {
    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    pub fn with_activation_distance(mut self, distance: f64) -> Self {
        self.activation_distance = distance;
        self
    }

    pub fn with_drag_enabled(mut self, enabled: bool) -> Self {
        self.drag_enabled = enabled;
        self
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            drag_enabled: default_drag_enabled(),
            activation_distance: default_activation_distance(),
            write_mode: WriteMode::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "dragEnabled": false,
            "activationDistance": 4.5,
            "writeMode": "atomic"
        }"#;

        let config: DragConfig = serde_json::from_str(json).unwrap();
        assert!(!config.drag_enabled);
        assert_eq!(config.activation_distance, 4.5);
        assert_eq!(config.write_mode, WriteMode::Atomic);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: DragConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DragConfig::default());
        assert!(config.drag_enabled);
        assert_eq!(config.activation_distance, 8.0);
        assert_eq!(config.write_mode, WriteMode::Concurrent);
    }
}

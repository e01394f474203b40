//! Replay scripts: a JSON array of UI events, applied in order.
//!
//! ```json
//! [
//!   { "type": "start", "id": "T1", "kind": "task" },
//!   { "type": "over", "active": "T1", "over": "L2" },
//!   { "type": "end", "active": "T1", "over": "L2" }
//! ]
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use taskboard_dnd::DragKind;
use taskboard_model::BoardSnapshot;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScriptEvent {
    #[serde(rename_all = "camelCase")]
    PointerDown {
        id: String,
        kind: DragKind,
        x: f64,
        y: f64,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerUp {
        #[serde(default)]
        over: Option<String>,
    },
    Start {
        id: String,
        kind: DragKind,
    },
    Over {
        active: String,
        #[serde(default)]
        over: Option<String>,
    },
    End {
        active: String,
        #[serde(default)]
        over: Option<String>,
    },
    Cancel,
    #[serde(rename_all = "camelCase")]
    SetDragEnabled {
        enabled: bool,
    },
}

pub fn load_script(path: &Path) -> anyhow::Result<Vec<ScriptEvent>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read script {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid script {}", path.display()))
}

pub fn load_fixture(path: &Path) -> anyhow::Result<BoardSnapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read fixture {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid fixture {}", path.display()))
}

//! # Drag Session Controller
//!
//! Owns one drag gesture at a time:
//!
//! ```text
//! Idle → Dragging → Hovering* → Settling → Idle
//!          └──────────┴── cancel ──────────→ Idle
//! ```
//!
//! Every transition takes `&mut self`, so events are applied strictly in
//! arrival order. Hovering is synchronous; only drag start (fetching the
//! dragged record) and the returned [`Commit`] suspend.

use crate::{
    ActivationSensor, Activation, ActiveItem, Commit, CommitReport, DragConfig, DragError,
    DragKind, DragPayload, Point, PreviewResult, Reconciler, ResolveError,
};
use std::fmt;
use std::sync::Arc;
use taskboard_cache::{lock, prime_board, QueryKey, SharedCache};
use taskboard_model::{Board, BoardId, List, Task};
use taskboard_store::{fetch_record, DocumentStore};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
    Hovering,
    Settling,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StartOutcome {
    Started(ActiveItem),
    /// The item could not be resolved; the controller stayed idle
    Unresolved(ResolveError),
    /// Dragging is switched off
    Disabled,
}

impl StartOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, StartOutcome::Started(_))
    }
}

pub struct DragController {
    reconciler: Reconciler,
    store: Arc<dyn DocumentStore>,
    cache: SharedCache,
    config: DragConfig,
    sensor: ActivationSensor,
    phase: DragPhase,
    active: Option<ActiveItem>,
    /// Item under the pointer at press time, started once the sensor activates
    pressed: Option<(String, DragKind)>,
    last_over: Option<String>,
    /// Containers staged during the current gesture, in first-touch order
    touched: Vec<QueryKey>,
}

impl DragController {
    pub fn new(
        board_id: impl Into<BoardId>,
        store: Arc<dyn DocumentStore>,
        cache: SharedCache,
        config: DragConfig,
    ) -> Self {
        Self {
            reconciler: Reconciler::new(board_id),
            store,
            cache,
            sensor: ActivationSensor::new(config.activation_distance),
            config,
            phase: DragPhase::Idle,
            active: None,
            pressed: None,
            last_over: None,
            touched: Vec::new(),
        }
    }

    /// Load the board and its lists into the cache
    pub async fn load(&self) -> Result<Board, DragError> {
        let board = prime_board(
            &self.cache,
            self.store.as_ref(),
            self.reconciler.board_id().as_str(),
        )
        .await?;
        Ok(board)
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// The item to render as the drag overlay, if any
    pub fn active_item(&self) -> Option<&ActiveItem> {
        self.active.as_ref()
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    /// Turn dragging on or off. Disabling during a drag cancels it.
    pub fn set_drag_enabled(&mut self, enabled: bool) {
        self.config.drag_enabled = enabled;
        if !enabled {
            self.pressed = None;
            self.sensor.release();
            if self.active.is_some() {
                self.cancel();
            }
        }
        debug!(enabled, "Drag enablement changed");
    }

    pub fn pointer_down(&mut self, id: &str, kind: DragKind, at: Point) {
        if !self.config.drag_enabled {
            return;
        }
        self.pressed = Some((id.to_string(), kind));
        self.sensor.press(at);
    }

    /// Track the pointer; starts the pressed item's drag once the activation
    /// distance is crossed.
    pub async fn pointer_move(&mut self, to: Point) -> Activation {
        let activation = self.sensor.move_to(to);
        if activation != Activation::Started {
            return activation;
        }

        let Some((id, kind)) = self.pressed.take() else {
            self.sensor.release();
            return Activation::Idle;
        };
        if self.start(&id, kind).await.is_started() {
            Activation::Started
        } else {
            self.sensor.release();
            Activation::Idle
        }
    }

    /// Release the pointer over `over`. A press that never activated is a
    /// click and yields no commit.
    pub fn pointer_up(&mut self, over: Option<&str>) -> Option<Commit> {
        self.pressed = None;
        if !self.sensor.release() {
            return None;
        }
        let active_id = self.active.as_ref()?.id().to_string();
        Some(self.end(&active_id, over))
    }

    /// Begin dragging `id`.
    ///
    /// Refetches any board or list query invalidated by a failed commit,
    /// resolves where the item sits from the cache, then fetches its full
    /// record for the overlay. Any failure leaves the controller idle.
    pub async fn start(&mut self, id: &str, kind: DragKind) -> StartOutcome {
        if !self.config.drag_enabled {
            debug!(id, %kind, "Drag start ignored, dragging disabled");
            return StartOutcome::Disabled;
        }
        if self.active.is_some() {
            self.cancel();
        }

        // Fresh entries are served from the cache without a store read
        let refreshed = prime_board(
            &self.cache,
            self.store.as_ref(),
            self.reconciler.board_id().as_str(),
        )
        .await;
        if let Err(error) = refreshed {
            warn!(id, %kind, %error, "Drag aborted, board did not refresh");
            return StartOutcome::Unresolved(error.into());
        }

        let located = self.reconciler.locate(&lock(&self.cache), kind, id);
        let Some(item) = located else {
            let error = ResolveError::NotOnBoard {
                kind,
                id: id.to_string(),
                board: self.reconciler.board_id().clone(),
            };
            warn!(%error, "Drag aborted");
            return StartOutcome::Unresolved(error);
        };

        let store = self.store.as_ref();
        let payload = match kind {
            DragKind::Task => fetch_record::<Task>(store, id).await.map(DragPayload::Task),
            DragKind::List => fetch_record::<List>(store, id).await.map(DragPayload::List),
        };
        let payload = match payload {
            Ok(payload) => payload,
            Err(error) => {
                warn!(id, %kind, %error, "Drag aborted, item did not resolve");
                return StartOutcome::Unresolved(error.into());
            }
        };

        info!(
            id,
            %kind,
            source = %item.source_container,
            index = item.source_index,
            "Drag started"
        );
        let active = ActiveItem { item, payload };
        self.active = Some(active.clone());
        self.phase = DragPhase::Dragging;
        self.last_over = None;
        self.touched.clear();
        StartOutcome::Started(active)
    }

    /// Hover `over_id` with the active item, staging the preview
    pub fn over(&mut self, active_id: &str, over_id: Option<&str>) -> PreviewResult {
        if !self.is_active(active_id) {
            return PreviewResult::Noop {
                reason: "no matching drag",
            };
        }
        self.hover(over_id)
    }

    /// Drop the active item on `over_id`.
    ///
    /// The controller is idle again when this returns; the returned commit
    /// carries the writes. Dropping with no target cancels.
    pub fn end(&mut self, active_id: &str, over_id: Option<&str>) -> Commit {
        if !self.is_active(active_id) {
            debug!(active_id, "Drag end ignored, no matching drag");
            return self.empty_commit();
        }
        if over_id.is_none() {
            self.cancel();
            return self.empty_commit();
        }

        self.phase = DragPhase::Settling;
        // The drop target may differ from the last hover (a fast drop skips
        // the final over event), so the preview is brought up to date first
        self.hover(over_id);

        let orders = self
            .reconciler
            .plan_commit(&mut lock(&self.cache), &self.touched);
        info!(active_id, writes = orders.len(), "Drag ended");

        self.reset();
        Commit::new(
            Arc::clone(&self.store),
            Arc::clone(&self.cache),
            orders,
            self.config.write_mode,
        )
    }

    /// Abandon the gesture and roll back every order it staged
    pub fn cancel(&mut self) -> Vec<QueryKey> {
        if self.active.is_none() {
            return Vec::new();
        }
        let touched = std::mem::take(&mut self.touched);
        let discarded = lock(&self.cache).discard(&touched);
        info!(discarded, "Drag cancelled");

        self.sensor.release();
        self.reset();
        touched
    }

    pub async fn on_drag_start(&mut self, id: &str, kind: DragKind) -> StartOutcome {
        self.start(id, kind).await
    }

    pub fn on_drag_over(&mut self, active_id: &str, over_id: Option<&str>) -> PreviewResult {
        self.over(active_id, over_id)
    }

    /// End the drag and await its commit
    pub async fn on_drag_end(
        &mut self,
        active_id: &str,
        over_id: Option<&str>,
    ) -> Result<CommitReport, DragError> {
        self.end(active_id, over_id).run().await
    }

    fn is_active(&self, active_id: &str) -> bool {
        self.active
            .as_ref()
            .map_or(false, |active| active.id() == active_id)
    }

    fn hover(&mut self, over_id: Option<&str>) -> PreviewResult {
        let Some(over_id) = over_id else {
            return PreviewResult::Noop {
                reason: "no target",
            };
        };
        if self.last_over.as_deref() == Some(over_id) {
            return PreviewResult::Noop {
                reason: "repeated hover",
            };
        }
        let Some(active) = &self.active else {
            return PreviewResult::Noop {
                reason: "no matching drag",
            };
        };

        let result = self.reconciler.preview(
            &mut lock(&self.cache),
            active.kind(),
            active.id(),
            over_id,
        );
        self.last_over = Some(over_id.to_string());

        if let PreviewResult::Applied { keys } = &result {
            for key in keys {
                if !self.touched.contains(key) {
                    self.touched.push(key.clone());
                }
            }
            if self.phase == DragPhase::Dragging {
                self.phase = DragPhase::Hovering;
            }
        }
        result
    }

    fn reset(&mut self) {
        self.active = None;
        self.last_over = None;
        self.touched.clear();
        self.phase = DragPhase::Idle;
    }

    fn empty_commit(&self) -> Commit {
        Commit::new(
            Arc::clone(&self.store),
            Arc::clone(&self.cache),
            Vec::new(),
            self.config.write_mode,
        )
    }
}

impl fmt::Debug for DragController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragController")
            .field("board_id", self.reconciler.board_id())
            .field("phase", &self.phase)
            .field("active", &self.active)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_cache::{shared, QueryCache};
    use taskboard_model::BoardSnapshot;
    use taskboard_store::InMemoryDocumentStore;

    fn snapshot() -> BoardSnapshot {
        let board = Board::new("B", "Roadmap", "u1").with_lists(["L1", "L2"]);
        BoardSnapshot::new(
            board,
            vec![
                List::new("L1", "Todo", "B").with_tasks(["T1", "T2"]),
                List::new("L2", "Done", "B"),
            ],
        )
        .with_tasks(vec![Task::new("T1", "Write docs"), Task::new("T2", "Ship")])
    }

    async fn controller(config: DragConfig) -> DragController {
        let store = InMemoryDocumentStore::from_snapshot(&snapshot()).unwrap();
        let controller =
            DragController::new("B", Arc::new(store), shared(QueryCache::new()), config);
        controller.load().await.unwrap();
        controller
    }

    #[tokio::test]
    async fn test_start_sets_active_item() {
        let mut controller = controller(DragConfig::default()).await;

        let outcome = controller.start("T2", DragKind::Task).await;

        assert!(outcome.is_started());
        assert_eq!(controller.phase(), DragPhase::Dragging);
        let active = controller.active_item().unwrap();
        assert_eq!(active.payload.title(), "Ship");
        assert_eq!(active.item.source_container_id(), "L1");
        assert_eq!(active.item.source_index, 1);
    }

    #[tokio::test]
    async fn test_start_while_disabled() {
        let mut controller = controller(DragConfig::default().with_drag_enabled(false)).await;

        let outcome = controller.start("T1", DragKind::Task).await;

        assert_eq!(outcome, StartOutcome::Disabled);
        assert_eq!(controller.phase(), DragPhase::Idle);
        assert!(controller.active_item().is_none());
    }

    #[tokio::test]
    async fn test_disabling_cancels_drag() {
        let mut controller = controller(DragConfig::default()).await;
        controller.start("T1", DragKind::Task).await;
        controller.over("T1", Some("L2"));

        controller.set_drag_enabled(false);

        assert_eq!(controller.phase(), DragPhase::Idle);
        let cache = lock(controller.cache());
        assert_eq!(cache.read_list("L1").unwrap().tasks, vec!["T1", "T2"]);
        assert!(cache.read_list("L2").unwrap().tasks.is_empty());
    }

    #[tokio::test]
    async fn test_over_moves_to_hovering() {
        let mut controller = controller(DragConfig::default()).await;
        controller.start("T1", DragKind::Task).await;

        assert!(controller.over("T1", Some("L2")).is_applied());
        assert_eq!(controller.phase(), DragPhase::Hovering);
    }

    #[tokio::test]
    async fn test_over_with_wrong_active_id_is_ignored() {
        let mut controller = controller(DragConfig::default()).await;
        controller.start("T1", DragKind::Task).await;

        let result = controller.over("T2", Some("L2"));

        assert!(!result.is_applied());
        assert_eq!(controller.phase(), DragPhase::Dragging);
    }

    #[tokio::test]
    async fn test_end_returns_to_idle_before_commit_runs() {
        let mut controller = controller(DragConfig::default()).await;
        controller.start("T1", DragKind::Task).await;
        controller.over("T1", Some("L2"));

        let commit = controller.end("T1", Some("L2"));

        assert_eq!(controller.phase(), DragPhase::Idle);
        assert!(controller.active_item().is_none());
        assert_eq!(commit.orders().len(), 2);

        let report = commit.run().await.unwrap();
        assert_eq!(report.writes.len(), 2);
    }

    #[tokio::test]
    async fn test_end_without_target_cancels() {
        let mut controller = controller(DragConfig::default()).await;
        controller.start("T1", DragKind::Task).await;
        controller.over("T1", Some("L2"));

        let commit = controller.end("T1", None);

        assert!(commit.is_empty());
        assert_eq!(controller.phase(), DragPhase::Idle);
        let cache = lock(controller.cache());
        assert_eq!(cache.read_list("L1").unwrap().tasks, vec!["T1", "T2"]);
    }

    #[tokio::test]
    async fn test_click_does_not_start_drag() {
        let mut controller = controller(DragConfig::default()).await;

        controller.pointer_down("T1", DragKind::Task, Point::new(0.0, 0.0));
        let activation = controller.pointer_move(Point::new(2.0, 2.0)).await;

        assert_eq!(activation, Activation::Pending);
        assert!(controller.pointer_up(Some("L2")).is_none());
        assert_eq!(controller.phase(), DragPhase::Idle);
    }

    #[tokio::test]
    async fn test_pointer_gesture_drags_and_drops() {
        let mut controller = controller(DragConfig::default()).await;

        controller.pointer_down("T1", DragKind::Task, Point::new(0.0, 0.0));
        let activation = controller.pointer_move(Point::new(0.0, 20.0)).await;
        assert_eq!(activation, Activation::Started);
        assert_eq!(controller.phase(), DragPhase::Dragging);

        let commit = controller.pointer_up(Some("L2")).unwrap();
        let report = commit.run().await.unwrap();

        assert_eq!(report.writes.len(), 2);
        let cache = lock(controller.cache());
        assert_eq!(cache.read_list("L2").unwrap().tasks, vec!["T1"]);
    }
}

//! Interactive treemap session
//!
//! Holds the state a point-and-click front end needs between events: the
//! tree, the viewport it is drawn into, the selected leaf and the last
//! layout. Drawing and raw input decoding stay with the caller.

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    DomainResult, Mutation, NodeId, Point, Rect, Tile, WeightedTree, DEFAULT_GROWTH_FRACTION,
};

/// A user action, already decoded from raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Toggle selection of the leaf under the point.
    Select(Point),
    /// Delete the leaf under the point.
    Delete(Point),
    /// Grow the selected leaf.
    Grow,
    /// Shrink the selected leaf.
    Shrink,
}

/// What an action did, for the front end to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Selected(NodeId),
    Deselected,
    /// The point hit no leaf; nothing changed.
    Missed,
    Mutated(Mutation),
    /// Grow or shrink without a selection.
    NothingSelected,
}

#[derive(Debug)]
pub struct TreemapSession {
    tree: WeightedTree,
    viewport: Rect,
    fraction: f64,
    separator: String,
    selected: Option<NodeId>,
    /// Layout of `viewport`, dropped on every mutation
    tiles: Option<Vec<Tile>>,
}

impl TreemapSession {
    pub fn new(tree: WeightedTree, viewport: Rect) -> Self {
        Self {
            tree,
            viewport,
            fraction: DEFAULT_GROWTH_FRACTION,
            separator: std::path::MAIN_SEPARATOR.to_string(),
            selected: None,
            tiles: None,
        }
    }

    /// Session configured from `settings` (viewport, fraction, separator).
    pub fn from_settings(tree: WeightedTree, settings: &Settings) -> ApplicationResult<Self> {
        settings.validate()?;
        Ok(Self::new(tree, settings.viewport.rect())
            .with_growth_fraction(settings.growth_fraction)?
            .with_separator(settings.separator.clone()))
    }

    pub fn with_growth_fraction(mut self, fraction: f64) -> ApplicationResult<Self> {
        if !(fraction.is_finite() && fraction > 0.0 && fraction <= 1.0) {
            return Err(ApplicationError::Config {
                message: format!("growth_fraction {} outside (0, 1]", fraction),
            });
        }
        self.fraction = fraction;
        Ok(self)
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn tree(&self) -> &WeightedTree {
        &self.tree
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        self.tiles = None;
    }

    /// Current layout of the viewport, recomputed only after a change.
    pub fn tiles(&mut self) -> &[Tile] {
        let (tree, viewport) = (&self.tree, self.viewport);
        self.tiles.get_or_insert_with(|| tree.layout(viewport))
    }

    /// Clicking the selected leaf deselects it, clicking another leaf
    /// selects that one, clicking nothing changes nothing.
    #[instrument(level = "debug", skip(self))]
    pub fn select_at(&mut self, point: Point) -> SessionEvent {
        match self.tree.hit_test(point, self.viewport) {
            None => SessionEvent::Missed,
            Some(hit) if self.selected == Some(hit) => {
                self.selected = None;
                SessionEvent::Deselected
            }
            Some(hit) => {
                self.selected = Some(hit);
                SessionEvent::Selected(hit)
            }
        }
    }

    /// Deletes the leaf under `point`. The selection survives unless it was
    /// the deleted leaf.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_at(&mut self, point: Point) -> ApplicationResult<SessionEvent> {
        let Some(hit) = self.tree.hit_test(point, self.viewport) else {
            return Ok(SessionEvent::Missed);
        };
        let outcome = self.tree.delete(hit)?;
        self.tiles = None;
        if self.selected.is_some_and(|id| !self.tree.contains(id)) {
            self.selected = None;
        }
        info!(?outcome, "delete");
        Ok(SessionEvent::Mutated(outcome))
    }

    pub fn grow_selected(&mut self) -> ApplicationResult<SessionEvent> {
        let fraction = self.fraction;
        self.mutate_selected(|tree, id| tree.grow_by(id, fraction))
    }

    pub fn shrink_selected(&mut self) -> ApplicationResult<SessionEvent> {
        let fraction = self.fraction;
        self.mutate_selected(|tree, id| tree.shrink_by(id, fraction))
    }

    fn mutate_selected(
        &mut self,
        op: impl FnOnce(&mut WeightedTree, NodeId) -> DomainResult<Mutation>,
    ) -> ApplicationResult<SessionEvent> {
        let Some(id) = self.selected else {
            return Ok(SessionEvent::NothingSelected);
        };
        let outcome = op(&mut self.tree, id)?;
        if outcome.is_change() {
            self.tiles = None;
        }
        debug!(?outcome, "resize");
        Ok(SessionEvent::Mutated(outcome))
    }

    pub fn apply(&mut self, action: Action) -> ApplicationResult<SessionEvent> {
        match action {
            Action::Select(point) => Ok(self.select_at(point)),
            Action::Delete(point) => self.delete_at(point),
            Action::Grow => self.grow_selected(),
            Action::Shrink => self.shrink_selected(),
        }
    }

    /// `"<path> <weight>"` for the selected leaf, empty without a selection.
    pub fn status_line(&self) -> ApplicationResult<String> {
        match self.selected {
            None => Ok(String::new()),
            Some(id) => {
                let path = self.tree.path_string(id, &self.separator)?;
                let weight = self.tree.weight(id)?;
                Ok(format!("{} {}", path, weight))
            }
        }
    }
}

use serde::{Deserialize, Serialize};

use common::toggle::Toggle;

use crate::geo::{self, BoundingRegion, Coordinate, Side};

/// Half-extent in degrees of the rectangle created around a map click.
pub const CLICK_HALF_EXTENT_DEG: f64 = 0.01;

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum EditMode {
    #[default]
    Normal,
    Editing,
}

/// Path style of the active rectangle, handed to the map shell.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct RegionStyle {
    pub color: &'static str,
    pub weight: u32,
    pub dash: Option<&'static str>,
}

pub const NORMAL_STYLE: RegionStyle = RegionStyle {
    color: "#3388ff",
    weight: 3,
    dash: None,
};

pub const EDITING_STYLE: RegionStyle = RegionStyle {
    color: "#f59f1d",
    weight: 2,
    dash: Some("6 4"),
};

/// Distance label attached to one side of the active region. Derived data,
/// always regenerated as a whole set of four.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct EdgeLabel {
    pub side: Side,
    pub text: String,
    pub anchor: Coordinate,
}

/// Events forwarded from the map shell while the rectangle is manipulated.
#[derive(Clone, Debug)]
pub enum EditEvent {
    EditStarted,
    /// Drag end, vertex drag end or vertex deletion. Carries the rectangle's
    /// current corners; may arrive without a preceding `EditStarted`. These
    /// events end the edit session, so the style reverts to normal.
    ShapeChanged { corners: Vec<Coordinate> },
    EditEnded,
    /// Double interaction: flips edit mode, always reverts style to normal.
    EditToggled,
}

#[derive(Clone, Debug)]
struct ActiveRegion {
    region: BoundingRegion,
    editing: bool,
    styled_as_editing: bool,
    labels: Vec<EdgeLabel>,
}

/// Owns the single selectable rectangle, its edit-state machine and the
/// derived label set.
#[derive(Clone, Default, Debug)]
pub struct RegionSelector {
    active: Option<ActiveRegion>,
}

impl RegionSelector {
    /// A click replaces any existing rectangle with a fresh one of fixed
    /// half-extent around the click point. The old rectangle and its labels
    /// are discarded in the same step, so stale labels never survive.
    pub fn on_map_click(&mut self, at: Coordinate) {
        let region = BoundingRegion::around(at, CLICK_HALF_EXTENT_DEG);
        self.replace(region);
    }

    /// Replaces the active rectangle with an externally produced region,
    /// e.g. the footprint of a downloaded image.
    pub fn set_region(&mut self, region: BoundingRegion) {
        self.replace(region);
    }

    pub fn on_edit_event(&mut self, event: EditEvent) {
        let Some(active) = self.active.as_mut() else {
            return;
        };

        match event {
            EditEvent::EditStarted => {
                active.editing = true;
                active.styled_as_editing = true;
                // Bounds may have moved before the style update arrived.
                active.labels = edge_labels(&active.region);
            }
            EditEvent::ShapeChanged { corners } => {
                // Runs regardless of edit mode; drags can happen without an
                // explicit edit start.
                if let Some(region) = BoundingRegion::from_corners(corners) {
                    active.region = region;
                    active.labels = edge_labels(&region);
                }
                // A drag end is an edit-ending event: back to placed, normal
                // style.
                active.editing = false;
                active.styled_as_editing = false;
            }
            EditEvent::EditEnded => {
                active.editing = false;
                active.styled_as_editing = false;
            }
            EditEvent::EditToggled => {
                active.editing.toggle();
                active.styled_as_editing = false;
            }
        }
    }

    pub fn current_region(&self) -> Option<BoundingRegion> {
        self.active.as_ref().map(|active| active.region)
    }

    pub fn mode(&self) -> EditMode {
        match self.active.as_ref() {
            Some(active) if active.editing => EditMode::Editing,
            _ => EditMode::Normal,
        }
    }

    pub fn style(&self) -> RegionStyle {
        match self.active.as_ref() {
            Some(active) if active.styled_as_editing => EDITING_STYLE,
            _ => NORMAL_STYLE,
        }
    }

    /// The current label set: exactly four labels, one per side, or empty
    /// when no rectangle exists yet.
    pub fn labels(&self) -> &[EdgeLabel] {
        self.active
            .as_ref()
            .map(|active| active.labels.as_slice())
            .unwrap_or(&[])
    }

    fn replace(&mut self, region: BoundingRegion) {
        self.active = Some(ActiveRegion {
            region,
            editing: false,
            styled_as_editing: false,
            labels: edge_labels(&region),
        });
    }
}

fn edge_labels(region: &BoundingRegion) -> Vec<EdgeLabel> {
    Side::ALL
        .iter()
        .map(|&side| EdgeLabel {
            side,
            text: geo::format_distance(region.side_length_m(side)),
            anchor: geo::label_anchor(side, region.side_midpoint(side)),
        })
        .collect()
}

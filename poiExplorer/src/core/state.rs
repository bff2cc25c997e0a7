//! Coordinator state and the render-ready snapshot handed to the UI.
//!
//! The mode decides whether routing may run. It only changes when a new
//! anchor is accepted; failures and category changes leave it alone.

use serde::{Deserialize, Serialize};

use crate::data::poi::{Coordinate, PoiRecord};
use crate::error::{ExplorerError, NoticeKind};
use crate::geo::bounds::MapBounds;
use crate::services::anchor_resolver::{Anchor, Provenance};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    /// No anchor yet
    #[default]
    Idle,
    NamedPlaceActive,
    DeviceLocationActive,
}

impl Mode {
    /// Mode entered once an anchor of the given provenance is accepted.
    /// Either active mode is reachable from any other mode.
    pub fn after_anchor(self, provenance: Provenance) -> Mode {
        match provenance {
            Provenance::NamedPlace => Mode::NamedPlaceActive,
            Provenance::DeviceLocation => Mode::DeviceLocationActive,
        }
    }

    pub fn has_anchor(self) -> bool {
        self != Mode::Idle
    }
}

/// What the coordinator is waiting on, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Activity {
    #[default]
    Idle,
    ResolvingPlace,
    Locating,
    Searching,
    Routing,
}

impl Activity {
    /// Status line shown while a collaborator call is outstanding.
    pub fn status_text(self) -> Option<&'static str> {
        match self {
            Activity::Idle => None,
            Activity::ResolvingPlace | Activity::Searching => Some("Loading..."),
            Activity::Locating => Some("Fetching your location..."),
            Activity::Routing => Some("Finding route..."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Viewport {
    Centered { center: Coordinate, zoom: u8 },
    Fitted { bounds: MapBounds, padding_px: u32 },
}

impl Viewport {
    pub fn contains(&self, point: &Coordinate) -> bool {
        match self {
            Viewport::Centered { center, .. } => center == point,
            Viewport::Fitted { bounds, .. } => bounds.contains(point),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorMarker {
    pub coordinate: Coordinate,
    pub label: String,
    pub provenance: Provenance,
}

impl From<&Anchor> for AnchorMarker {
    fn from(anchor: &Anchor) -> Self {
        Self {
            coordinate: anchor.coordinate,
            label: anchor.label.clone(),
            provenance: anchor.provenance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl From<&ExplorerError> for Notice {
    fn from(err: &ExplorerError) -> Self {
        Self { kind: err.kind(), message: err.user_message() }
    }
}

/// The selected POI with its popup open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub index: usize,
    pub record: PoiRecord,
}

/// Everything the UI needs to draw one frame. `results` feeds both the list
/// and the POI markers, in the same order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: Mode,
    pub activity: Activity,
    pub category: String,
    pub anchor_marker: Option<AnchorMarker>,
    pub results: Vec<PoiRecord>,
    pub selected: Option<Selection>,
    pub route: Option<Vec<Coordinate>>,
    pub viewport: Viewport,
    pub notice: Option<Notice>,
}

impl Snapshot {
    pub fn list_labels(&self) -> Vec<String> {
        self.results.iter().map(PoiRecord::list_label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_idle() {
        assert_eq!(Mode::default(), Mode::Idle);
        assert!(!Mode::Idle.has_anchor());
    }

    #[test]
    fn anchors_switch_between_active_modes() {
        for mode in [Mode::Idle, Mode::NamedPlaceActive, Mode::DeviceLocationActive] {
            assert_eq!(mode.after_anchor(Provenance::NamedPlace), Mode::NamedPlaceActive);
            assert_eq!(mode.after_anchor(Provenance::DeviceLocation), Mode::DeviceLocationActive);
        }
    }

    #[test]
    fn viewport_serializes_with_kind_tag() {
        let viewport = Viewport::Centered { center: Coordinate::new(1.0, 2.0), zoom: 14 };
        let json = serde_json::to_value(viewport).unwrap();
        assert_eq!(json["kind"], "centered");
        assert_eq!(json["zoom"], 14);
    }

    #[test]
    fn status_text_for_waiting_states() {
        assert_eq!(Activity::Idle.status_text(), None);
        assert_eq!(Activity::Locating.status_text(), Some("Fetching your location..."));
    }
}

//! Track map layout and vehicle placement for a slot-car track panel.
//!
//! A scanned piece sequence is laid out on a grid (`layout`), optionally
//! mirrored (`mirror`), and vehicles reporting a track position and lane
//! offset are placed on it in scene pixels (`placement`).

pub mod config;
pub mod error;
pub mod fleet;
pub mod geom;
pub mod layout;
pub mod mirror;
pub mod model;
pub mod placement;
pub mod scene;
pub mod track;
pub mod trackmap;
pub mod util;

pub use crate::error::{LayoutError, PlacementError, TrackFileError};
pub use crate::geom::{Orientation, Rotation};
pub use crate::layout::generate;
pub use crate::mirror::flip_h;
pub use crate::model::{Element, LayerRef, Lookup, Piece, PieceType, TrackPiece, Vismap};
pub use crate::placement::{compute_position, Anchor, LaneGeometry, Placement};
pub use crate::trackmap::{Flip, TrackMap};

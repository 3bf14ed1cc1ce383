use log::*;
use serde::{Serialize, Deserialize};
use crate::error::{LayoutError, PlacementError};
use crate::fleet::Telemetry;
use crate::geom::Orientation;
use crate::layout;
use crate::mirror;
use crate::model::*;
use crate::placement::{self, LaneGeometry, Placement};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
pub struct Flip {
    pub horizontal :bool,
    pub vertical :bool,
}

/// A laid out track, read-only once built. Changing the track or the flip
/// means building a new one.
#[derive(Clone, Debug)]
#[derive(Serialize)]
pub struct TrackMap {
    pieces :Vec<TrackPiece>,
    orientation :Orientation,
    flip :Flip,
    vismap :Vismap,
    lookup :Lookup,
}

impl TrackMap {
    pub fn new(pieces :Vec<TrackPiece>, orientation :Orientation, flip :Flip) -> Result<TrackMap, LayoutError> {
        // Vertical flip = half turn, then horizontal flip.
        let mut horizontal = flip.horizontal;
        let mut walk_orientation = orientation;
        if flip.vertical {
            horizontal = !horizontal;
            walk_orientation = orientation.reversed();
        }

        let (mut vismap, mut lookup) = layout::generate(&pieces, walk_orientation)?;
        if horizontal {
            let (v, l) = mirror::flip_h(&vismap, &lookup);
            vismap = v;
            lookup = l;
        }
        debug!("Track map ready, flip {:?}", flip);

        Ok(TrackMap { pieces, orientation, flip, vismap, lookup })
    }

    pub fn pieces(&self) -> &[TrackPiece] { &self.pieces }
    pub fn orientation(&self) -> Orientation { self.orientation }
    pub fn flip(&self) -> Flip { self.flip }
    pub fn vismap(&self) -> &Vismap { &self.vismap }
    pub fn lookup(&self) -> &Lookup { &self.lookup }
    pub fn width(&self) -> usize { self.vismap.width() }
    pub fn height(&self) -> usize { self.vismap.height() }

    pub fn cell(&self, x :usize, y :usize) -> &[Element] { self.vismap.cell(x, y) }

    pub fn element(&self, position :usize) -> Option<(LayerRef, &Element)> {
        let r = self.lookup.get(position)?;
        Some((r, self.vismap.get(r)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (LayerRef, &Element)> + '_ {
        self.vismap.iter()
    }

    pub fn place(&self, vehicle :&Telemetry, lanes :&LaneGeometry) -> Result<Option<Placement>, PlacementError> {
        placement::compute_position(vehicle, &self.vismap, &self.lookup, lanes)
    }
}

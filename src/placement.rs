//! Scene position of a vehicle marker from its position on the track.

use nalgebra_glm as glm;
use serde::{Serialize, Deserialize};
use std::f32::consts::FRAC_PI_4;
use crate::error::PlacementError;
use crate::fleet::Telemetry;
use crate::geom::*;
use crate::model::*;

/// Scene scale and lane geometry, in pixels unless noted.
#[derive(Copy, Clone, Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct LaneGeometry {
    pub cell_size :f32,
    pub inner_radius :f32,
    pub outer_radius :f32,
    /// Road offset (telemetry units) at the outermost lane.
    pub full_segment_length :f32,
    /// Offset of the marker's top-left corner inside a straight cell.
    pub marker_inset :f32,
}

impl Default for LaneGeometry {
    fn default() -> Self {
        LaneGeometry {
            cell_size: 100.0,
            inner_radius: 5.0,
            outer_radius: 20.0,
            full_segment_length: 60.0,
            marker_inset: 40.0,
        }
    }
}

impl LaneGeometry {
    /// Perpendicular displacement of the lane a vehicle drives in.
    pub fn lane_offset(&self, road_offset :f32) -> f32 {
        (road_offset / self.full_segment_length) * (self.outer_radius - self.inner_radius)
    }
}

/// What point of the marker `Placement::position` refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
pub enum Anchor { TopLeft, Center }

#[derive(Copy, Clone, Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct Placement {
    #[serde(with = "ptc_serde")]
    pub position :PtC,
    /// Counter-clockwise degrees in [0,360).
    pub rotation :f32,
    pub anchor :Anchor,
}

/// Where to draw a vehicle this frame.
///
/// `Ok(None)` when the vehicle is not aligned to the track yet (missing
/// position, offset or piece); the caller skips it until telemetry arrives.
/// An error means the vehicle is driving on a different track from the map.
pub fn compute_position(vehicle :&Telemetry, vismap :&Vismap, lookup :&Lookup,
                        lanes :&LaneGeometry) -> Result<Option<Placement>, PlacementError> {
    let (position, road_offset, reported) = match vehicle.alignment() {
        Some(a) => a,
        None => return Ok(None),
    };

    let r = lookup.get(position).ok_or(PlacementError::UnknownPosition(position))?;
    let element = vismap.get(r).ok_or(PlacementError::Dangling(position))?;
    // Stricter than drawing the vehicle with the formula of the piece it
    // reports: a disagreement means the map is not the track being driven.
    if element.piece.kind() != reported {
        return Err(PlacementError::PieceMismatch { position, on_map: element.piece.kind(), reported });
    }

    // Mirroring swaps the sides of the track.
    let mut lane_offset = lanes.lane_offset(road_offset);
    if element.is_mirrored() { lane_offset = -lane_offset; }

    let cell = glm::vec2(r.x as f32, r.y as f32) * lanes.cell_size;
    let placement = match element.turns_clockwise() {
        Some(clockwise) => {
            let radius = if clockwise { -lane_offset } else { lane_offset } + lanes.cell_size / 2.0;
            let corner = to_ptc(element.rotation.corner()) * lanes.cell_size;
            let a = FRAC_PI_4 + element.rotation.radians();
            let towards_lane :PtC = glm::vec2(-a.cos(), a.sin());
            let rotation = element.rotation.degrees() as f32 - 135.0 + if clockwise { 180.0 } else { 0.0 };
            Placement {
                position: cell + corner + towards_lane * radius,
                rotation: normalize_degrees(rotation),
                anchor: Anchor::Center,
            }
        },
        None => {
            let o = element.orientation;
            let across :PtC = glm::vec2(-o.y() as f32, o.x() as f32);
            Placement {
                position: cell + glm::vec2(lanes.marker_inset, lanes.marker_inset) + across * lane_offset,
                rotation: normalize_degrees(o.angle_degrees() - 90.0),
                anchor: Anchor::TopLeft,
            }
        },
    };
    Ok(Some(placement))
}

mod ptc_serde {
    use serde::{Serialize, Serializer, Deserialize, Deserializer};
    use crate::geom::PtC;
    use nalgebra_glm as glm;

    pub fn serialize<S :Serializer>(p :&PtC, s :S) -> Result<S::Ok, S::Error> {
        (p.x, p.y).serialize(s)
    }

    pub fn deserialize<'de, D :Deserializer<'de>>(d :D) -> Result<PtC, D::Error> {
        let (x, y) = <(f32, f32)>::deserialize(d)?;
        Ok(glm::vec2(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::generate;
    use crate::mirror::flip_h;
    use crate::track;
    use matches::matches;

    fn close(a :PtC, b :PtC) -> bool { glm::distance(&a, &b) < 1e-3 }

    fn on(position :usize, piece :PieceType, offset :f32) -> Telemetry {
        Telemetry {
            map_position: Some(position),
            road_offset: Some(offset),
            current_piece: Some(piece),
            ..Telemetry::default()
        }
    }

    fn figure_eight() -> (Vismap, Lookup) {
        generate(&track::demo(), Orientation::EAST).unwrap()
    }

    #[test]
    fn unaligned_vehicles_get_no_placement() {
        let (map, lookup) = figure_eight();
        let lanes = LaneGeometry::default();
        let mut v = on(0, PieceType::Start, 0.0);
        v.map_position = None;
        assert_eq!(compute_position(&v, &map, &lookup, &lanes), Ok(None));
        let mut v = on(0, PieceType::Start, 0.0);
        v.road_offset = None;
        assert_eq!(compute_position(&v, &map, &lookup, &lanes), Ok(None));
        let mut v = on(0, PieceType::Start, 0.0);
        v.current_piece = None;
        assert_eq!(compute_position(&v, &map, &lookup, &lanes), Ok(None));
    }

    #[test]
    fn centred_on_straight_with_zero_offset() {
        let (map, lookup) = figure_eight();
        let lanes = LaneGeometry::default();
        // Piece 4 is the straight, placed in the start cell (2,1) going north.
        let p = compute_position(&on(4, PieceType::Straight, 0.0), &map, &lookup, &lanes)
            .unwrap().unwrap();
        assert!(close(p.position, glm::vec2(240.0, 140.0)));
        assert_eq!(p.anchor, Anchor::TopLeft);
        // atan2(-1, 0) = -90, minus 90
        assert_eq!(p.rotation, 180.0);
    }

    #[test]
    fn lane_offset_sweeps_linearly_across_a_straight() {
        let (map, lookup) = figure_eight();
        let lanes = LaneGeometry::default();
        let span = lanes.outer_radius - lanes.inner_radius;
        assert_eq!(lanes.lane_offset(-lanes.full_segment_length), -span);
        assert_eq!(lanes.lane_offset(lanes.full_segment_length), span);

        // Start piece travels east, so lanes spread along y.
        let mut last :Option<f32> = None;
        for step in -6..=6 {
            let offset = step as f32 * 10.0;
            let p = compute_position(&on(0, PieceType::Start, offset), &map, &lookup, &lanes)
                .unwrap().unwrap();
            assert!((p.position.x - 240.0).abs() < 1e-4);
            assert!((p.position.y - (140.0 + lanes.lane_offset(offset))).abs() < 1e-4);
            if let Some(prev) = last {
                assert!((p.position.y - prev - 2.5f32).abs() < 1e-4);
            }
            last = Some(p.position.y);
        }
    }

    #[test]
    fn curve_centre_line_is_half_a_cell_from_the_corner() {
        let (map, lookup) = figure_eight();
        let lanes = LaneGeometry::default();
        // Piece 1: clockwise curve at (3,1) entered going east, arc round the
        // bottom-left corner.
        let p = compute_position(&on(1, PieceType::Curve, 0.0), &map, &lookup, &lanes)
            .unwrap().unwrap();
        let corner = glm::vec2(300.0, 200.0);
        assert!((glm::distance(&p.position, &corner) - 50.0).abs() < 1e-3);
        let d = (FRAC_PI_4 + std::f32::consts::PI).cos() * -50.0;
        assert!(close(p.position, glm::vec2(300.0 + d, 200.0 - d)));
        assert_eq!(p.anchor, Anchor::Center);
        assert_eq!(p.rotation, 225.0);
    }

    #[test]
    fn curve_lanes_move_along_the_radius() {
        let (map, lookup) = figure_eight();
        let lanes = LaneGeometry::default();
        let corner = glm::vec2(300.0, 200.0);
        for offset in [-60.0f32, -30.0, 0.0, 30.0, 60.0].iter() {
            let p = compute_position(&on(1, PieceType::Curve, *offset), &map, &lookup, &lanes)
                .unwrap().unwrap();
            // Clockwise turn: the right-hand lanes are on the inside.
            let radius = 50.0 - lanes.lane_offset(*offset);
            assert!((glm::distance(&p.position, &corner) - radius).abs() < 1e-3);
        }
    }

    #[test]
    fn counter_clockwise_curve_rotation() {
        let (map, lookup) = figure_eight();
        let lanes = LaneGeometry::default();
        // Piece 5 enters going north and turns west: corner bottom-left, R180.
        let r = lookup.get(5).unwrap();
        assert_eq!(map.get(r).unwrap().rotation, Rotation::R180);
        let p = compute_position(&on(5, PieceType::Curve, 30.0), &map, &lookup, &lanes)
            .unwrap().unwrap();
        assert_eq!(p.rotation, 45.0);
        let corner = glm::vec2(r.x as f32 * 100.0, (r.y + 1) as f32 * 100.0);
        assert!((glm::distance(&p.position, &corner) - (50.0 + 7.5)).abs() < 1e-3);
    }

    #[test]
    fn unknown_position_is_reported() {
        let (map, lookup) = figure_eight();
        let r = compute_position(&on(42, PieceType::Straight, 0.0), &map, &lookup, &LaneGeometry::default());
        assert_eq!(r, Err(PlacementError::UnknownPosition(42)));
    }

    #[test]
    fn piece_type_disagreement_is_reported() {
        let (map, lookup) = figure_eight();
        let r = compute_position(&on(1, PieceType::Straight, 0.0), &map, &lookup, &LaneGeometry::default());
        assert!(matches!(r, Err(PlacementError::PieceMismatch { position: 1, .. })));
    }

    #[test]
    fn mirrored_map_mirrors_placements() {
        let (map, lookup) = figure_eight();
        let (fmap, flookup) = flip_h(&map, &lookup);
        let lanes = LaneGeometry::default();
        let width = map.width() as f32 * lanes.cell_size;
        for (pos, piece, offset) in [(1, PieceType::Curve, 20.0f32), (6, PieceType::Curve, -45.0),
                                     (8, PieceType::Curve, 10.0)].iter() {
            let v = on(*pos, *piece, *offset);
            let a = compute_position(&v, &map, &lookup, &lanes).unwrap().unwrap();
            let b = compute_position(&v, &fmap, &flookup, &lanes).unwrap().unwrap();
            assert!(close(b.position, glm::vec2(width - a.position.x, a.position.y)));
        }
    }
}

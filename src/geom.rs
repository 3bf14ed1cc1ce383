//! Grid points, cardinal orientations and the rotation table shared by
//! layout, mirroring and vehicle placement.
//!
//! Grid and scene coordinates grow to the right (x) and downwards (y), so
//! turning clockwise on screen takes (x,y) to (-y,x).

use nalgebra_glm as glm;
use serde::{Serialize, Deserialize};
use std::convert::TryFrom;
use std::fmt;
use crate::error::LayoutError;

pub type Pt = glm::I32Vec2;
pub type Vc = Pt;
pub type PtC = glm::Vec2;

pub fn to_ptc(v :Vc) -> PtC { glm::vec2(v.x as f32, v.y as f32) }

// Cardinal directions indexed clockwise, starting east.
pub fn v_index(v :Vc) -> Option<i8> {
    match (v.x, v.y) {
        ( 1, 0) => Some(0),
        ( 0, 1) => Some(1),
        (-1, 0) => Some(2),
        ( 0,-1) => Some(3),
        _ => None,
    }
}

pub fn index_v(a :i8) -> Vc {
    match modu(a, 4) {
        0 => glm::vec2( 1, 0),
        1 => glm::vec2( 0, 1),
        2 => glm::vec2(-1, 0),
        _ => glm::vec2( 0,-1),
    }
}

pub fn modu(a :i8, b :i8) -> i8 { (a % b + b) % b }

/// Direction of travel through a cell: one of the four unit vectors.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "(i32,i32)", into = "(i32,i32)")]
pub struct Orientation {
    idx :i8,
}

impl Orientation {
    pub const EAST :Orientation = Orientation { idx: 0 };
    pub const SOUTH :Orientation = Orientation { idx: 1 };
    pub const WEST :Orientation = Orientation { idx: 2 };
    pub const NORTH :Orientation = Orientation { idx: 3 };

    pub fn new(x :i32, y :i32) -> Option<Orientation> {
        v_index(glm::vec2(x, y)).map(|idx| Orientation { idx })
    }

    pub fn x(&self) -> i32 { self.as_vec().x }
    pub fn y(&self) -> i32 { self.as_vec().y }

    pub fn as_vec(&self) -> Vc { index_v(self.idx) }

    /// Quarter turn, clockwise as seen on screen.
    pub fn turn(&self, clockwise :bool) -> Orientation {
        Orientation { idx: modu(self.idx + if clockwise { 1 } else { -1 }, 4) }
    }

    pub fn reversed(&self) -> Orientation {
        Orientation { idx: modu(self.idx + 2, 4) }
    }

    /// Mirror image across a vertical axis (x component negated).
    pub fn mirrored_h(&self) -> Orientation {
        let v = self.as_vec();
        Orientation { idx: v_index(glm::vec2(-v.x, v.y)).unwrap_or(self.idx) }
    }

    pub fn is_horizontal(&self) -> bool { self.idx % 2 == 0 }

    /// atan2 of the vector components, in degrees.
    pub fn angle_degrees(&self) -> f32 {
        (self.y() as f32).atan2(self.x() as f32).to_degrees()
    }

    /// Visual rotation of a straight-through tile travelled in this direction.
    pub fn rotation(&self) -> Rotation {
        match self.idx {
            0 => Rotation::R0,
            3 => Rotation::R90,
            2 => Rotation::R180,
            _ => Rotation::R270,
        }
    }
}

impl fmt::Debug for Orientation {
    fn fmt(&self, f :&mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{})", self.x(), self.y())
    }
}

impl TryFrom<(i32,i32)> for Orientation {
    type Error = LayoutError;
    fn try_from((x,y) :(i32,i32)) -> Result<Self, Self::Error> {
        Orientation::new(x, y).ok_or(LayoutError::BadOrientation(x, y))
    }
}

impl From<Orientation> for (i32,i32) {
    fn from(o :Orientation) -> (i32,i32) { (o.x(), o.y()) }
}

/// Discretized tile rotation, counter-clockwise degrees on screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation { R0, R90, R180, R270 }

impl Rotation {
    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }

    pub fn radians(&self) -> f32 { (self.degrees() as f32).to_radians() }

    /// Cell corner the curve arc is centred on, as an offset from the
    /// cell's top-left corner in cells.
    pub fn corner(&self) -> Vc {
        match self {
            Rotation::R0 => glm::vec2(1, 0),
            Rotation::R90 => glm::vec2(0, 0),
            Rotation::R180 => glm::vec2(0, 1),
            Rotation::R270 => glm::vec2(1, 1),
        }
    }

    pub fn from_corner(c :Vc) -> Option<Rotation> {
        match (c.x, c.y) {
            (1, 0) => Some(Rotation::R0),
            (0, 0) => Some(Rotation::R90),
            (0, 1) => Some(Rotation::R180),
            (1, 1) => Some(Rotation::R270),
            _ => None,
        }
    }

    /// Curve rotation after mirroring the tile across a vertical axis.
    pub fn mirrored_h(&self) -> Rotation {
        match self {
            Rotation::R0 => Rotation::R90,
            Rotation::R90 => Rotation::R0,
            Rotation::R180 => Rotation::R270,
            Rotation::R270 => Rotation::R180,
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;
    fn try_from(d :u16) -> Result<Self, Self::Error> {
        match d {
            0 => Ok(Rotation::R0),
            90 => Ok(Rotation::R90),
            180 => Ok(Rotation::R180),
            270 => Ok(Rotation::R270),
            _ => Err(format!("rotation must be 0, 90, 180 or 270, got {}", d)),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(r :Rotation) -> u16 { r.degrees() }
}

/// The curve corner is where the entry edge and the exit edge meet.
/// Entry edge midpoint is centre - entry/2, exit edge midpoint is
/// centre + exit/2; in doubled coordinates the corner is (1,1) - entry + exit.
pub fn curve_corner(entry :Orientation, clockwise :bool) -> Option<Vc> {
    let exit = entry.turn(clockwise);
    let doubled = glm::vec2(1, 1) - entry.as_vec() + exit.as_vec();
    if doubled.x % 2 != 0 || doubled.y % 2 != 0 { return None; }
    Some(doubled / 2)
}

pub fn curve_rotation(entry :Orientation, clockwise :bool) -> Option<Rotation> {
    Rotation::from_corner(curve_corner(entry, clockwise)?)
}

/// Normalize an angle in degrees into [0,360).
pub fn normalize_degrees(d :f32) -> f32 {
    let r = d.rem_euclid(360.0);
    if r >= 360.0 { 0.0 } else { r }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL :[Orientation; 4] = [Orientation::EAST, Orientation::SOUTH,
                                   Orientation::WEST, Orientation::NORTH];

    #[test]
    fn only_cardinal_vectors_are_orientations() {
        assert!(Orientation::new(0, 0).is_none());
        assert!(Orientation::new(1, 1).is_none());
        assert!(Orientation::new(2, 0).is_none());
        assert_eq!(Orientation::new(0, -1), Some(Orientation::NORTH));
        assert_eq!(Orientation::try_from((-1, 0)).unwrap(), Orientation::WEST);
    }

    #[test]
    fn clockwise_turn_on_screen() {
        assert_eq!(Orientation::EAST.turn(true), Orientation::SOUTH);
        assert_eq!(Orientation::SOUTH.turn(true), Orientation::WEST);
        assert_eq!(Orientation::EAST.turn(false), Orientation::NORTH);
        for o in ALL.iter() {
            assert_eq!(o.turn(true).turn(false), *o);
            assert_eq!(o.turn(true).turn(true), o.reversed());
        }
    }

    #[test]
    fn corner_table_round_trips() {
        for r in [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270].iter() {
            assert_eq!(Rotation::from_corner(r.corner()), Some(*r));
        }
        assert_eq!(Rotation::R90.corner(), glm::vec2(0, 0));
        assert_eq!(Rotation::from_corner(glm::vec2(2, 0)), None);
    }

    #[test]
    fn every_turn_has_a_table_entry() {
        for o in ALL.iter() {
            for cw in [true, false].iter() {
                let corner = curve_corner(*o, *cw).unwrap();
                assert!(corner.x == 0 || corner.x == 1);
                assert!(corner.y == 0 || corner.y == 1);
                assert!(curve_rotation(*o, *cw).is_some());
            }
        }
    }

    #[test]
    fn east_to_south_curves_round_bottom_left() {
        // Enter from the left edge, leave through the bottom edge.
        assert_eq!(curve_rotation(Orientation::EAST, true), Some(Rotation::R180));
        // Enter from the left edge, leave through the top edge.
        assert_eq!(curve_rotation(Orientation::EAST, false), Some(Rotation::R90));
    }

    #[test]
    fn mirrored_curve_rotation_matches_mirrored_turn() {
        for o in ALL.iter() {
            for cw in [true, false].iter() {
                let r = curve_rotation(*o, *cw).unwrap();
                assert_eq!(curve_rotation(o.mirrored_h(), !*cw), Some(r.mirrored_h()));
            }
        }
    }

    #[test]
    fn straight_rotation_follows_screen_angle() {
        assert_eq!(Orientation::EAST.rotation(), Rotation::R0);
        assert_eq!(Orientation::NORTH.rotation(), Rotation::R90);
        assert_eq!(Orientation::WEST.rotation(), Rotation::R180);
        assert_eq!(Orientation::SOUTH.rotation(), Rotation::R270);
        assert_eq!(Orientation::SOUTH.angle_degrees(), 90.0);
    }

    #[test]
    fn degrees_are_normalized() {
        assert_eq!(normalize_degrees(-135.0), 225.0);
        assert_eq!(normalize_degrees(405.0), 45.0);
        assert_eq!(normalize_degrees(0.0), 0.0);
    }
}

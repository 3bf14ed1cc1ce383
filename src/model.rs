//! Track pieces and the placed grid map: `Vismap` cells hold stacked
//! `Element`s, `Lookup` maps track positions back to their cell and layer.

use serde::{Serialize, Deserialize};
use crate::geom::*;
use crate::util::VecMap;

/// Piece kind as reported by vehicle telemetry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
pub enum PieceType { Straight, Curve, Intersection, Start, Finish }

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
pub enum Piece {
    Straight,
    Curve { clockwise :bool },
    Intersection,
    Start,
    Finish,
}

impl Piece {
    pub fn kind(&self) -> PieceType {
        match self {
            Piece::Straight => PieceType::Straight,
            Piece::Curve { .. } => PieceType::Curve,
            Piece::Intersection => PieceType::Intersection,
            Piece::Start => PieceType::Start,
            Piece::Finish => PieceType::Finish,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
pub struct TrackPiece {
    pub piece :Piece,
    #[serde(default)]
    pub id :Option<u8>,
}

impl TrackPiece {
    pub fn new(piece :Piece) -> TrackPiece {
        TrackPiece { piece, id: None }
    }

    /// Build from a track scan, where every piece reports a clockwise bit.
    pub fn from_scan(t :PieceType, clockwise :bool, id :Option<u8>) -> TrackPiece {
        let piece = match t {
            PieceType::Straight => Piece::Straight,
            PieceType::Curve => Piece::Curve { clockwise },
            PieceType::Intersection => Piece::Intersection,
            PieceType::Start => Piece::Start,
            PieceType::Finish => Piece::Finish,
        };
        TrackPiece { piece, id }
    }

    pub fn kind(&self) -> PieceType { self.piece.kind() }
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct Element {
    pub piece :TrackPiece,
    /// Direction of travel when entering the cell.
    pub orientation :Orientation,
    pub rotation :Rotation,
    /// None for a map that was never mirrored, otherwise whether this element
    /// is currently mirrored relative to its piece.
    pub flipped :Option<bool>,
}

impl Element {
    /// Element for `piece` entered in direction `orientation`.
    pub fn place(piece :TrackPiece, orientation :Orientation) -> Option<Element> {
        let rotation = match piece.piece {
            Piece::Curve { clockwise } => curve_rotation(orientation, clockwise)?,
            Piece::Straight | Piece::Intersection | Piece::Start | Piece::Finish => orientation.rotation(),
        };
        Some(Element { piece, orientation, rotation, flipped: None })
    }

    pub fn is_mirrored(&self) -> bool { self.flipped == Some(true) }

    /// Turn direction as drawn: the piece's own, reversed while mirrored.
    pub fn turns_clockwise(&self) -> Option<bool> {
        match self.piece.piece {
            Piece::Curve { clockwise } => Some(clockwise != self.is_mirrored()),
            _ => None,
        }
    }

    pub fn exit_orientation(&self) -> Orientation {
        match self.turns_clockwise() {
            Some(cw) => self.orientation.turn(cw),
            None => self.orientation,
        }
    }

    pub fn mirrored_h(&self) -> Element {
        let orientation = self.orientation.mirrored_h();
        let rotation = match self.piece.piece {
            Piece::Curve { .. } => self.rotation.mirrored_h(),
            _ => orientation.rotation(),
        };
        Element {
            piece: self.piece,
            orientation,
            rotation,
            flipped: Some(!self.is_mirrored()),
        }
    }
}

/// Cell and layer of a placed element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
pub struct LayerRef {
    pub x :usize,
    pub y :usize,
    pub layer :usize,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct Vismap {
    width :usize,
    height :usize,
    cells :Vec<Vec<Element>>, // row-major
}

impl Vismap {
    pub fn new(width :usize, height :usize) -> Vismap {
        Vismap { width, height, cells: vec![Vec::new(); width * height] }
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }

    pub fn cell(&self, x :usize, y :usize) -> &[Element] {
        if x >= self.width || y >= self.height { return &[]; }
        &self.cells[y * self.width + x]
    }

    pub fn get(&self, r :LayerRef) -> Option<&Element> {
        self.cell(r.x, r.y).get(r.layer)
    }

    /// Stack an element on top of the cell, returning its layer.
    pub(crate) fn push(&mut self, x :usize, y :usize, e :Element) -> usize {
        let cell = &mut self.cells[y * self.width + x];
        cell.push(e);
        cell.len() - 1
    }

    pub fn iter(&self) -> impl Iterator<Item = (LayerRef, &Element)> + '_ {
        let w = self.width;
        self.cells.iter().enumerate().flat_map(move |(i,cell)| {
            cell.iter().enumerate().map(move |(layer,e)| {
                (LayerRef { x: i % w, y: i / w, layer }, e)
            })
        })
    }
}

/// Track position (index into the piece sequence) to cell and layer.
#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct Lookup {
    entries :Vec<Option<LayerRef>>,
}

impl Lookup {
    pub fn new() -> Lookup { Lookup { entries: Vec::new() } }

    pub fn insert(&mut self, position :usize, r :LayerRef) -> Option<LayerRef> {
        self.entries.vecmap_insert(position, r)
    }

    pub fn get(&self, position :usize) -> Option<LayerRef> {
        self.entries.vecmap_get(position).cloned()
    }

    pub fn len(&self) -> usize { self.entries.vecmap_len() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn iter(&self) -> impl Iterator<Item = (usize, LayerRef)> + '_ {
        self.entries.iter().enumerate().filter_map(|(i,r)| r.map(|r| (i,r)))
    }

    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.iter().map(|(i,_)| i)
    }
}

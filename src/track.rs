use log::*;
use serde::{Serialize, Deserialize};
use std::path::Path;
use crate::error::TrackFileError;
use crate::geom::Orientation;
use crate::model::*;

/// A track definition as stored on disk.
#[derive(Debug, Clone, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct TrackFile {
    #[serde(default = "east")]
    pub orientation :Orientation,
    pub pieces :Vec<TrackPiece>,
}

fn east() -> Orientation { Orientation::EAST }

/// Read a track file: RON for `.ron`, JSON for anything else.
pub fn load(path :impl AsRef<Path>) -> Result<TrackFile, TrackFileError> {
    let path = path.as_ref();
    info!("Loading track from {:?}", path);
    let data = std::fs::read_to_string(path)?;
    let track :TrackFile = match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => ron::de::from_str(&data)?,
        _ => serde_json::from_str(&data)?,
    };
    debug!("Track has {} pieces", track.pieces.len());
    Ok(track)
}

/// Figure eight crossing itself once, as a scan reports it: the start
/// line comes first and the finish line last.
pub fn demo() -> Vec<TrackPiece> {
    let t = |t, clockwise| TrackPiece::from_scan(t, clockwise, None);
    vec![
        t(PieceType::Start, false),
        t(PieceType::Curve, true),
        t(PieceType::Curve, true),
        t(PieceType::Curve, true),
        t(PieceType::Straight, true),
        t(PieceType::Curve, false),
        t(PieceType::Curve, false),
        t(PieceType::Intersection, false),
        t(PieceType::Curve, true),
        t(PieceType::Curve, true),
        t(PieceType::Curve, true),
        t(PieceType::Intersection, false),
        t(PieceType::Finish, false),
    ]
}

/// Random piece sequence of the given length, for exercising the layout.
#[cfg(test)]
pub fn random_pieces(rng :&mut impl rand::Rng, len :usize) -> Vec<TrackPiece> {
    (0..len).map(|_| {
        let t = match rng.gen_range(0, 5) {
            0 => PieceType::Straight,
            1 => PieceType::Curve,
            2 => PieceType::Intersection,
            3 => PieceType::Start,
            _ => PieceType::Finish,
        };
        TrackPiece::from_scan(t, rng.gen_bool(0.5), None)
    }).collect()
}

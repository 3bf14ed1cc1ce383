use log::*;
use nalgebra_glm as glm;
use crate::error::LayoutError;
use crate::geom::*;
use crate::model::*;
use crate::util;

/// Lay the piece sequence out on a grid by walking it like a turtle:
/// each piece takes the cell under the turtle, curves turn it, and every
/// piece but FINISH moves it one cell along its exit direction.
///
/// The walk starts at (0,0) and may wander into negative coordinates; the
/// result is translated so that the bounding box starts at (0,0).
/// The lookup is keyed by the index of each piece in `pieces`.
pub fn generate(pieces :&[TrackPiece], initial :Orientation) -> Result<(Vismap, Lookup), LayoutError> {
    if pieces.is_empty() { return Err(LayoutError::EmptyTrack); }

    let mut pos :Pt = glm::vec2(0, 0);
    let mut orientation = initial;
    let mut finished = false;
    let mut walk :Vec<(Pt, Element)> = Vec::with_capacity(pieces.len());

    for (i, piece) in pieces.iter().enumerate() {
        if finished {
            warn!("Track piece {} ({:?}) follows the finish, stacking it on the finish cell", i, piece.kind());
        }

        let element = Element::place(*piece, orientation)
            .ok_or(LayoutError::Malformed { position: i, x: orientation.x(), y: orientation.y() })?;
        let exit = element.exit_orientation();
        trace!("piece {:>3} {:?} at {:?} entering {:?} rot {}",
               i, piece.kind(), (pos.x, pos.y), orientation, element.rotation.degrees());
        walk.push((pos, element));

        if let Piece::Finish = piece.piece { finished = true; }
        if !finished { pos += exit.as_vec(); }
        orientation = exit;
    }

    let (lo, hi) = util::bounds(walk.iter().map(|(p,_)| *p)).ok_or(LayoutError::EmptyTrack)?;
    let size = hi - lo + glm::vec2(1, 1);
    let mut vismap = Vismap::new(size.x as usize, size.y as usize);
    let mut lookup = Lookup::new();
    for (i, (p, element)) in walk.into_iter().enumerate() {
        let p = p - lo;
        let (x, y) = (p.x as usize, p.y as usize);
        let layer = vismap.push(x, y, element);
        lookup.insert(i, LayerRef { x, y, layer });
    }

    info!("Laid out {} track pieces on a {}x{} grid", pieces.len(), vismap.width(), vismap.height());
    Ok((vismap, lookup))
}

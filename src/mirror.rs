use log::*;
use crate::model::*;

/// Mirror a laid out map across its vertical centre line.
///
/// Cell (x,y) moves to (width-1-x, y) keeping its layer order, every element
/// has its direction of travel mirrored and its tile rotation recomputed so
/// curves bend the mirrored way. Lookup keys are kept; only the cells they
/// point to change.
///
/// There is no vertical counterpart: a vertical flip is a 180 degree turn
/// followed by a horizontal flip, so callers lay the track out with the
/// initial orientation reversed and then call this.
pub fn flip_h(vismap :&Vismap, lookup :&Lookup) -> (Vismap, Lookup) {
    let max_x = vismap.width().saturating_sub(1);
    let mut flipped = Vismap::new(vismap.width(), vismap.height());
    for (r, element) in vismap.iter() {
        // Cells are visited in layer order, so layers come out unchanged.
        flipped.push(max_x - r.x, r.y, element.mirrored_h());
    }

    let mut new_lookup = Lookup::new();
    for (position, r) in lookup.iter() {
        if vismap.get(r).is_none() {
            warn!("Lookup entry {} points at {:?} which holds no element", position, r);
        }
        new_lookup.insert(position, LayerRef { x: max_x.saturating_sub(r.x), ..r });
    }

    debug!("Mirrored {}x{} map horizontally", vismap.width(), vismap.height());
    (flipped, new_lookup)
}

pub trait VecMap<V> {
    fn vecmap_insert(&mut self, key :usize, value :V) -> Option<V>;
    fn vecmap_get(&self, key :usize) -> Option<&V>;
    fn vecmap_len(&self) -> usize;
}

impl<V> VecMap<V> for Vec<Option<V>> {
    fn vecmap_insert(&mut self, key :usize, value :V) -> Option<V> {
        while self.len() < key+1 {
            self.push(None);
        }
        self[key].replace(value)
    }

    fn vecmap_get(&self, key :usize) -> Option<&V> {
        if let Some(Some(e)) = self.get(key) {
            return Some(e);
        }
        None
    }

    fn vecmap_len(&self) -> usize {
        self.iter().filter(|x| x.is_some()).count()
    }
}

/// Minimum and maximum corner of a set of points.
pub fn bounds(pts :impl IntoIterator<Item = crate::geom::Pt>) -> Option<(crate::geom::Pt, crate::geom::Pt)> {
    use nalgebra_glm as glm;
    pts.into_iter().fold(None, |acc, p| match acc {
        None => Some((p, p)),
        Some((lo, hi)) => Some((glm::min2(&lo, &p), glm::max2(&hi, &p))),
    })
}

use super::allocator::check_request;
use super::{PackError, Rect, RegionAllocator};
use crate::cli::PackingHeuristic;

/// MaxRects bin packer implementation
#[derive(Debug, Clone)]
pub struct MaxRectsPacker {
    bin_width: u32,
    bin_height: u32,
    heuristic: PackingHeuristic,
    free_rects: Vec<Rect>,
    used_rects: Vec<Rect>,
}

impl MaxRectsPacker {
    pub fn new(width: u32, height: u32, heuristic: PackingHeuristic) -> Self {
        let initial_rect = Rect::new(0, 0, width, height);
        Self {
            bin_width: width,
            bin_height: height,
            heuristic,
            free_rects: vec![initial_rect],
            used_rects: Vec::new(),
        }
    }

    pub fn heuristic(&self) -> PackingHeuristic {
        self.heuristic
    }

    /// Check if a rectangle of the given size can fit
    pub fn can_fit(&self, width: u32, height: u32) -> bool {
        self.free_rects
            .iter()
            .any(|r| width <= r.width && height <= r.height)
    }

    fn find_position(&self, width: u32, height: u32) -> Option<Rect> {
        let mut best_score = (i64::MAX, i64::MAX);
        let mut best_rect = None;

        for free_rect in &self.free_rects {
            if width <= free_rect.width && height <= free_rect.height {
                let score = self.score_rect(free_rect, width, height);
                if score < best_score {
                    best_score = score;
                    best_rect = Some(Rect::new(free_rect.x, free_rect.y, width, height));
                }
            }
        }

        best_rect
    }

    /// Lower is better
    fn score_rect(&self, free_rect: &Rect, width: u32, height: u32) -> (i64, i64) {
        let leftover_h = i64::from(free_rect.width - width);
        let leftover_v = i64::from(free_rect.height - height);
        let short = leftover_h.min(leftover_v);
        let long = leftover_h.max(leftover_v);

        match self.heuristic {
            PackingHeuristic::BestShortSideFit => (short, long),
            PackingHeuristic::BestLongSideFit => (long, short),
            PackingHeuristic::BestAreaFit => {
                let area = i64::try_from(free_rect.area()).unwrap_or(i64::MAX);
                (area, short)
            }
            PackingHeuristic::BottomLeft => {
                let top = i64::from(free_rect.y) + i64::from(height);
                (top, i64::from(free_rect.x))
            }
            PackingHeuristic::ContactPoint => {
                let candidate = Rect::new(free_rect.x, free_rect.y, width, height);
                (-self.contact_score(&candidate), i64::from(free_rect.y))
            }
        }
    }

    /// Length of the candidate's perimeter touching the bin edges or placed rects
    fn contact_score(&self, candidate: &Rect) -> i64 {
        let mut score = 0u64;

        if candidate.x == 0 || candidate.right() == self.bin_width {
            score += u64::from(candidate.height);
        }
        if candidate.y == 0 || candidate.bottom() == self.bin_height {
            score += u64::from(candidate.width);
        }

        for used in &self.used_rects {
            if used.x == candidate.right() || used.right() == candidate.x {
                score += common_interval(used.y, used.bottom(), candidate.y, candidate.bottom());
            }
            if used.y == candidate.bottom() || used.bottom() == candidate.y {
                score += common_interval(used.x, used.right(), candidate.x, candidate.right());
            }
        }

        i64::try_from(score).unwrap_or(i64::MAX)
    }

    fn place_rect(&mut self, rect: Rect) {
        let mut new_rects = Vec::new();

        self.free_rects.retain(|free_rect| {
            if !rect.intersects(free_rect) {
                return true;
            }

            // Split the free rectangle around the placed rectangle
            // Left portion
            if rect.x > free_rect.x {
                new_rects.push(Rect::new(
                    free_rect.x,
                    free_rect.y,
                    rect.x - free_rect.x,
                    free_rect.height,
                ));
            }

            // Right portion
            if rect.right() < free_rect.right() {
                new_rects.push(Rect::new(
                    rect.right(),
                    free_rect.y,
                    free_rect.right() - rect.right(),
                    free_rect.height,
                ));
            }

            // Top portion
            if rect.y > free_rect.y {
                new_rects.push(Rect::new(
                    free_rect.x,
                    free_rect.y,
                    free_rect.width,
                    rect.y - free_rect.y,
                ));
            }

            // Bottom portion
            if rect.bottom() < free_rect.bottom() {
                new_rects.push(Rect::new(
                    free_rect.x,
                    rect.bottom(),
                    free_rect.width,
                    free_rect.bottom() - rect.bottom(),
                ));
            }

            false
        });

        self.free_rects.extend(new_rects);
        self.prune_free_rects();
        self.used_rects.push(rect);
    }

    fn prune_free_rects(&mut self) {
        // Remove rectangles that are fully contained within others
        let mut i = 0;
        while i < self.free_rects.len() {
            let mut j = i + 1;
            while j < self.free_rects.len() {
                if self.free_rects[i].contains(&self.free_rects[j]) {
                    self.free_rects.swap_remove(j);
                } else if self.free_rects[j].contains(&self.free_rects[i]) {
                    self.free_rects.swap_remove(i);
                    j = i + 1;
                    continue;
                } else {
                    j += 1;
                }
            }
            i += 1;
        }
    }
}

impl RegionAllocator for MaxRectsPacker {
    fn insert(&mut self, width: u32, height: u32) -> Result<Rect, PackError> {
        check_request(width, height, self.bin_width, self.bin_height)?;

        let best_rect = self
            .find_position(width, height)
            .ok_or(PackError::NoSpace {
                width,
                height,
                bin_width: self.bin_width,
                bin_height: self.bin_height,
            })?;
        self.place_rect(best_rect);
        Ok(best_rect)
    }

    fn bin_size(&self) -> (u32, u32) {
        (self.bin_width, self.bin_height)
    }

    fn occupancy(&self) -> f64 {
        let total_area = u64::from(self.bin_width) * u64::from(self.bin_height);
        if total_area == 0 {
            return 0.0;
        }
        let used_area: u64 = self.used_rects.iter().map(Rect::area).sum();
        used_area as f64 / total_area as f64
    }
}

/// Overlap length of the intervals [a_start, a_end) and [b_start, b_end)
fn common_interval(a_start: u32, a_end: u32, b_start: u32, b_end: u32) -> u64 {
    if a_end <= b_start || b_end <= a_start {
        return 0;
    }
    u64::from(a_end.min(b_end) - a_start.max(b_start))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_HEURISTICS: [PackingHeuristic; 5] = [
        PackingHeuristic::BestShortSideFit,
        PackingHeuristic::BestLongSideFit,
        PackingHeuristic::BestAreaFit,
        PackingHeuristic::BottomLeft,
        PackingHeuristic::ContactPoint,
    ];

    #[test]
    fn test_single_insert() {
        let mut packer = MaxRectsPacker::new(100, 100, PackingHeuristic::BestShortSideFit);
        let rect = packer.insert(50, 50).unwrap();

        assert_eq!(rect, Rect::new(0, 0, 50, 50));
    }

    #[test]
    fn test_multiple_inserts_are_disjoint_for_every_heuristic() {
        for heuristic in ALL_HEURISTICS {
            let mut packer = MaxRectsPacker::new(100, 100, heuristic);
            let rects: Vec<Rect> = (0..4).map(|_| packer.insert(50, 50).unwrap()).collect();

            for (i, a) in rects.iter().enumerate() {
                for b in &rects[i + 1..] {
                    assert!(!a.intersects(b), "{:?}: {:?} overlaps {:?}", heuristic, a, b);
                }
            }
            // All four 50x50 rects fill the 100x100 bin
            assert_eq!(
                packer.insert(1, 1),
                Err(PackError::NoSpace {
                    width: 1,
                    height: 1,
                    bin_width: 100,
                    bin_height: 100,
                })
            );
        }
    }

    #[test]
    fn test_mixed_sizes_stay_inside_bin() {
        let bin = Rect::new(0, 0, 64, 64);
        let sizes = [(30, 20), (25, 15), (40, 10), (15, 35), (20, 20), (8, 8), (3, 17)];

        for heuristic in ALL_HEURISTICS {
            let mut packer = MaxRectsPacker::new(64, 64, heuristic);
            let mut placed = Vec::new();
            for (w, h) in sizes {
                if let Ok(rect) = packer.insert(w, h) {
                    assert_eq!((rect.width, rect.height), (w, h));
                    assert!(bin.contains(&rect));
                    assert!(placed.iter().all(|p: &Rect| !p.intersects(&rect)));
                    placed.push(rect);
                }
            }
            assert!(!placed.is_empty());
        }
    }

    #[test]
    fn test_too_large() {
        let mut packer = MaxRectsPacker::new(100, 100, PackingHeuristic::BestShortSideFit);
        let result = packer.insert(150, 50);
        assert!(matches!(result, Err(PackError::NoSpace { width: 150, .. })));
    }

    #[test]
    fn test_empty_request_rejected() {
        let mut packer = MaxRectsPacker::new(100, 100, PackingHeuristic::BestShortSideFit);
        assert_eq!(
            packer.insert(0, 10),
            Err(PackError::Empty {
                width: 0,
                height: 10
            })
        );
        // Nothing was consumed
        assert!(packer.can_fit(100, 100));
    }

    #[test]
    fn test_can_fit() {
        let mut packer = MaxRectsPacker::new(100, 100, PackingHeuristic::BestShortSideFit);
        assert!(packer.can_fit(50, 50));
        assert!(packer.can_fit(100, 100));
        assert!(!packer.can_fit(101, 100));

        packer.insert(100, 100).unwrap();
        assert!(!packer.can_fit(1, 1));
    }

    #[test]
    fn test_bottom_left_fills_rows_first() {
        let mut packer = MaxRectsPacker::new(100, 100, PackingHeuristic::BottomLeft);
        let a = packer.insert(40, 10).unwrap();
        let b = packer.insert(40, 10).unwrap();

        assert_eq!(a, Rect::new(0, 0, 40, 10));
        assert_eq!(b, Rect::new(40, 0, 40, 10));
    }

    #[test]
    fn test_contact_point_hugs_placed_rects() {
        let mut packer = MaxRectsPacker::new(100, 100, PackingHeuristic::ContactPoint);
        packer.insert(50, 50).unwrap();
        let second = packer.insert(50, 50).unwrap();

        // Either neighbour of the first rect touches it along a full side
        assert!(second == Rect::new(50, 0, 50, 50) || second == Rect::new(0, 50, 50, 50));
    }

    #[test]
    fn test_common_interval() {
        assert_eq!(common_interval(0, 10, 5, 15), 5);
        assert_eq!(common_interval(0, 10, 10, 20), 0);
        assert_eq!(common_interval(0, 10, 2, 4), 2);
    }

    #[test]
    fn test_occupancy() {
        let mut packer = MaxRectsPacker::new(100, 100, PackingHeuristic::BestShortSideFit);
        assert_eq!(packer.occupancy(), 0.0);

        packer.insert(50, 50).unwrap();
        assert!((packer.occupancy() - 0.25).abs() < 1e-9);

        for _ in 0..3 {
            packer.insert(50, 50).unwrap();
        }
        let occupancy = packer.occupancy();
        assert!(
            (occupancy - 1.0).abs() < 0.01,
            "Expected occupancy ~1.0, got {}",
            occupancy
        );
    }
}

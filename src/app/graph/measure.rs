use eframe::egui::Vec2;

/// Node box sizes measured from rendered titles.
///
/// Sizes are taken at scale 1 and stored both in pixels and as canvas-percent
/// half extents. A viewport resize only marks the measurements stale; the
/// remeasure happens once on the following frame however many resizes arrive.
#[derive(Debug, Default)]
pub struct BoxMeasurements {
    viewport_size: Vec2,
    pending: bool,
    pixel_sizes: Vec<Vec2>,
    half_extents: Vec<Vec2>,
}

impl BoxMeasurements {
    /// Returns `true` when this call scheduled a remeasure.
    pub fn note_viewport(&mut self, size: Vec2) -> bool {
        if size == self.viewport_size {
            return false;
        }

        self.viewport_size = size;
        let newly_pending = !self.pending;
        self.pending = true;
        newly_pending
    }

    /// Whether a remeasure must run now. Missing measurements are always due.
    pub fn take_due(&mut self, node_count: usize) -> bool {
        let missing = self.pixel_sizes.len() != node_count;
        let due = self.pending || missing;
        self.pending = false;
        due
    }

    pub fn store(&mut self, pixel_sizes: Vec<Vec2>) {
        let size = self.viewport_size;
        self.half_extents = pixel_sizes
            .iter()
            .map(|pixels| {
                if size.x > 0.0 && size.y > 0.0 {
                    Vec2::new(pixels.x / size.x, pixels.y / size.y) * 50.0
                } else {
                    Vec2::ZERO
                }
            })
            .collect();
        self.pixel_sizes = pixel_sizes;
    }

    pub fn pixel_size(&self, node: usize) -> Vec2 {
        self.pixel_sizes.get(node).copied().unwrap_or(Vec2::ZERO)
    }

    /// Canvas-percent half extents; zero when unmeasured.
    pub fn half_extent(&self, node: usize) -> Vec2 {
        self.half_extents.get(node).copied().unwrap_or(Vec2::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    #[test]
    fn resize_burst_collapses_into_one_remeasure() {
        let mut boxes = BoxMeasurements::default();
        assert!(boxes.note_viewport(vec2(800.0, 600.0)));
        assert!(!boxes.note_viewport(vec2(810.0, 600.0)));
        assert!(!boxes.note_viewport(vec2(820.0, 600.0)));

        assert!(boxes.take_due(0));
        boxes.store(Vec::new());
        assert!(!boxes.take_due(0));
    }

    #[test]
    fn half_extents_are_canvas_percent() {
        let mut boxes = BoxMeasurements::default();
        boxes.note_viewport(vec2(1000.0, 500.0));
        boxes.store(vec![vec2(100.0, 20.0)]);
        assert_eq!(boxes.half_extent(0), vec2(5.0, 2.0));
        assert_eq!(boxes.half_extent(7), Vec2::ZERO);
        assert_eq!(boxes.pixel_size(0), vec2(100.0, 20.0));
    }
}

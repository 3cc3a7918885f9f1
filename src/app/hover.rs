/// Coalesces raw hover updates so at most one lands per frame; the latest
/// value pushed during a frame wins and is applied by the next `flush`.
#[derive(Debug, Default)]
pub struct HoverBuffer {
    applied: Option<String>,
    pending: Option<Option<String>>,
}

impl HoverBuffer {
    pub fn push(&mut self, hovered: Option<String>) {
        self.pending = Some(hovered);
    }

    /// Applies the pending value; returns whether the hovered id changed.
    pub fn flush(&mut self) -> bool {
        let Some(next) = self.pending.take() else {
            return false;
        };

        if next == self.applied {
            return false;
        }

        self.applied = next;
        true
    }

    pub fn current(&self) -> Option<&str> {
        self.applied.as_deref()
    }

    pub fn clear(&mut self) {
        self.pending = None;
        self.applied = None;
    }
}

//! Camera state and the only code allowed to change it.
//!
//! The controller is a small state machine: `idle -> panning -> idle` and
//! `idle -> animating -> idle`. Time is passed in as seconds so frame ticks
//! can be driven by egui's clock or by tests.

use eframe::egui::{Pos2, Rect, Vec2, vec2};

pub const MIN_SCALE: f32 = 0.82;
pub const MAX_SCALE: f32 = 1.65;
pub const WHEEL_ZOOM_RATE: f32 = 0.0015;

const SNAP_DISTANCE: f32 = 0.5;
const SCALE_DISTANCE_WEIGHT: f32 = 400.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl ViewportState {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        scale: 1.0,
    };

    pub fn translation(&self) -> Vec2 {
        vec2(self.x, self.y)
    }

    /// Canvas percent -> absolute screen position inside `viewport`.
    pub fn canvas_to_screen(&self, viewport: Rect, pos: Pos2) -> Pos2 {
        viewport.min + self.canvas_to_local(viewport.size(), pos)
    }

    /// Canvas percent -> position relative to the viewport's top-left corner.
    pub fn canvas_to_local(&self, viewport_size: Vec2, pos: Pos2) -> Vec2 {
        let local = vec2(pos.x * viewport_size.x, pos.y * viewport_size.y) / 100.0;
        self.translation() + local * self.scale
    }

    pub fn screen_to_canvas(&self, viewport: Rect, screen: Pos2) -> Pos2 {
        let size = viewport.size();
        let local = (screen - viewport.min - self.translation()) / self.scale;
        Pos2::new(
            if size.x > 0.0 { local.x * 100.0 / size.x } else { 0.0 },
            if size.y > 0.0 { local.y * 100.0 / size.y } else { 0.0 },
        )
    }

    fn distance_to(&self, other: &Self) -> f32 {
        (other.translation() - self.translation()).length()
            + (other.scale - self.scale).abs() * SCALE_DISTANCE_WEIGHT
    }

    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            scale: self.scale + (other.scale - self.scale) * t,
        }
    }

    fn sanitized(self, fallback: Self) -> Self {
        let pick = |value: f32, fallback: f32| if value.is_finite() { value } else { fallback };
        Self {
            x: pick(self.x, fallback.x),
            y: pick(self.y, fallback.y),
            scale: clamp_scale(pick(self.scale, fallback.scale)),
        }
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportPhase {
    Idle,
    Panning,
    Animating,
}

#[derive(Clone, Copy, Debug)]
struct PanGesture {
    start_camera: Vec2,
    start_cursor: Pos2,
}

#[derive(Clone, Copy, Debug)]
struct Animation {
    token: u64,
    from: ViewportState,
    to: ViewportState,
    started_at: f64,
    duration: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationRequest {
    pub duration_secs: f64,
    pub reduced_motion: bool,
}

#[derive(Debug, Default)]
pub struct ViewportController {
    state: ViewportState,
    pan: Option<PanGesture>,
    animation: Option<Animation>,
    animation_token: u64,
}

impl ViewportController {
    pub fn new(state: ViewportState) -> Self {
        Self {
            state: state.sanitized(ViewportState::IDENTITY),
            ..Self::default()
        }
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn phase(&self) -> ViewportPhase {
        if self.pan.is_some() {
            ViewportPhase::Panning
        } else if self.animation.is_some() {
            ViewportPhase::Animating
        } else {
            ViewportPhase::Idle
        }
    }

    /// Starts a pan; returns `false` and changes nothing if one is active.
    pub fn begin_pan(&mut self, cursor: Pos2) -> bool {
        if self.pan.is_some() {
            return false;
        }

        self.cancel_animation();
        self.pan = Some(PanGesture {
            start_camera: self.state.translation(),
            start_cursor: cursor,
        });
        true
    }

    pub fn update_pan(&mut self, cursor: Pos2) {
        let Some(pan) = self.pan else {
            return;
        };

        let translation = pan.start_camera + (cursor - pan.start_cursor);
        if translation.x.is_finite() && translation.y.is_finite() {
            self.state.x = translation.x;
            self.state.y = translation.y;
        }
    }

    pub fn end_pan(&mut self) {
        self.pan = None;
    }

    pub fn zoom_by_wheel(&mut self, wheel_delta: f32, cursor: Vec2) {
        self.zoom_by_factor((-wheel_delta * WHEEL_ZOOM_RATE).exp(), cursor);
    }

    /// Scales around `cursor` (viewport-local) so the point under it stays put.
    pub fn zoom_by_factor(&mut self, factor: f32, cursor: Vec2) {
        if !factor.is_finite() || factor <= 0.0 || !cursor.x.is_finite() || !cursor.y.is_finite() {
            return;
        }

        let old_scale = self.state.scale;
        let new_scale = clamp_scale(old_scale * factor);
        if (new_scale - old_scale).abs() <= f32::EPSILON {
            return;
        }

        self.cancel_animation();
        let translation = self.state.translation();
        let next = translation + (cursor - translation) * (1.0 - new_scale / old_scale);
        // an active pan rebuilds the translation from its start, so carry the shift over
        if let Some(pan) = &mut self.pan {
            pan.start_camera += next - translation;
        }
        self.state = ViewportState {
            x: next.x,
            y: next.y,
            scale: new_scale,
        };
    }

    /// Replaces any in-flight animation. Returns the new animation token.
    pub fn animate_to(&mut self, target: ViewportState, now: f64, request: AnimationRequest) -> u64 {
        let target = target.sanitized(self.state);
        self.animation_token = self.animation_token.wrapping_add(1);

        let negligible = self.state.distance_to(&target) < SNAP_DISTANCE;
        if request.reduced_motion || negligible || request.duration_secs <= 0.0 {
            self.animation = None;
            self.state = target;
            tracing::trace!(token = self.animation_token, "camera snapped to target");
            return self.animation_token;
        }

        self.animation = Some(Animation {
            token: self.animation_token,
            from: self.state,
            to: target,
            started_at: now,
            duration: request.duration_secs,
        });
        tracing::trace!(token = self.animation_token, "camera animation started");
        self.animation_token
    }

    /// Advances the animation; returns `true` while another frame is needed.
    pub fn tick(&mut self, now: f64) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };

        if animation.token != self.animation_token {
            self.animation = None;
            return false;
        }

        let progress = ((now - animation.started_at) / animation.duration).clamp(0.0, 1.0) as f32;
        if progress >= 1.0 {
            self.state = animation.to;
            self.animation = None;
            return false;
        }

        self.state = animation.from.lerp(&animation.to, ease_out_cubic(progress));
        true
    }

    pub fn cancel_animation(&mut self) {
        if self.animation.take().is_some() {
            tracing::trace!(token = self.animation_token, "camera animation cancelled");
        }
        self.animation_token = self.animation_token.wrapping_add(1);
    }

    pub fn reset(&mut self, now: f64, request: AnimationRequest) -> u64 {
        self.animate_to(ViewportState::IDENTITY, now, request)
    }

    /// Recenters on `pos` (canvas percent) at the current scale when it sits
    /// inside `margin` of an edge, or always when `force` is set. Returns
    /// whether a move was requested.
    pub fn ensure_visible(
        &mut self,
        pos: Pos2,
        viewport_size: Vec2,
        margin: f32,
        force: bool,
        now: f64,
        request: AnimationRequest,
    ) -> bool {
        // judge against where the camera is heading, not where it is mid-flight
        let camera = self.animation.map_or(self.state, |animation| animation.to);
        let local = camera.canvas_to_local(viewport_size, pos);
        let margin = margin.max(0.0).min(viewport_size.x.min(viewport_size.y) * 0.5);
        let inside = local.x >= margin
            && local.y >= margin
            && local.x <= viewport_size.x - margin
            && local.y <= viewport_size.y - margin;

        if inside && !force {
            return false;
        }

        let unscaled = vec2(pos.x * viewport_size.x, pos.y * viewport_size.y) / 100.0;
        let target = viewport_size * 0.5 - unscaled * camera.scale;
        self.animate_to(
            ViewportState {
                x: target.x,
                y: target.y,
                scale: camera.scale,
            },
            now,
            request,
        );
        true
    }
}

pub fn clamp_scale(scale: f32) -> f32 {
    if scale.is_finite() {
        scale.clamp(MIN_SCALE, MAX_SCALE)
    } else {
        1.0
    }
}

pub fn ease_out_cubic(t: f32) -> f32 {
    let inverse = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inverse * inverse * inverse
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    const ANIMATED: AnimationRequest = AnimationRequest {
        duration_secs: 0.5,
        reduced_motion: false,
    };

    #[test]
    fn pan_follows_pointer_exactly() {
        let mut viewport = ViewportController::default();
        assert!(viewport.begin_pan(pos2(100.0, 100.0)));
        viewport.update_pan(pos2(130.0, 90.0));
        assert_eq!(viewport.state().translation(), vec2(30.0, -10.0));
        assert_eq!(viewport.phase(), ViewportPhase::Panning);
        viewport.end_pan();
        assert_eq!(viewport.phase(), ViewportPhase::Idle);
    }

    #[test]
    fn second_pan_is_ignored_while_active() {
        let mut viewport = ViewportController::default();
        assert!(viewport.begin_pan(pos2(0.0, 0.0)));
        assert!(!viewport.begin_pan(pos2(500.0, 500.0)));
        viewport.update_pan(pos2(10.0, 10.0));
        assert_eq!(viewport.state().translation(), vec2(10.0, 10.0));
    }

    #[test]
    fn doubling_zoom_clamps_and_keeps_cursor_point() {
        let mut viewport = ViewportController::default();
        let cursor = vec2(320.0, 180.0);
        let size = vec2(800.0, 600.0);
        let before = viewport.state();
        let under_cursor = pos2(cursor.x / size.x * 100.0, cursor.y / size.y * 100.0);

        viewport.zoom_by_wheel(-(2.0_f32.ln()) / WHEEL_ZOOM_RATE, cursor);

        let after = viewport.state();
        assert_eq!(after.scale, MAX_SCALE);
        assert!((before.canvas_to_local(size, under_cursor) - cursor).length() < 1e-3);
        let moved = after.canvas_to_local(size, under_cursor) - cursor;
        assert!(moved.length() < 1e-3, "cursor point drifted by {moved:?}");
    }

    #[test]
    fn zoom_out_clamps_to_minimum() {
        let mut viewport = ViewportController::default();
        for _ in 0..20 {
            viewport.zoom_by_wheel(400.0, vec2(10.0, 10.0));
        }
        assert_eq!(viewport.state().scale, MIN_SCALE);
    }

    #[test]
    fn animation_eases_and_snaps_exactly() {
        let mut viewport = ViewportController::default();
        let target = ViewportState {
            x: 120.0,
            y: -40.0,
            scale: 1.3,
        };
        viewport.animate_to(target, 10.0, ANIMATED);
        assert_eq!(viewport.phase(), ViewportPhase::Animating);

        assert!(viewport.tick(10.25));
        let midway = viewport.state();
        assert!(midway.x > 60.0 && midway.x < 120.0, "ease-out runs ahead of linear");

        assert!(!viewport.tick(10.5));
        assert_eq!(viewport.state(), target);
        assert_eq!(viewport.phase(), ViewportPhase::Idle);
    }

    #[test]
    fn reduced_motion_snaps() {
        let mut viewport = ViewportController::default();
        let target = ViewportState {
            x: 50.0,
            y: 50.0,
            scale: 1.2,
        };
        viewport.animate_to(
            target,
            0.0,
            AnimationRequest {
                reduced_motion: true,
                ..ANIMATED
            },
        );
        assert_eq!(viewport.state(), target);
        assert!(!viewport.tick(0.1));
    }

    #[test]
    fn newer_request_replaces_older() {
        let mut viewport = ViewportController::default();
        let first = viewport.animate_to(
            ViewportState {
                x: 400.0,
                y: 0.0,
                scale: 1.0,
            },
            0.0,
            ANIMATED,
        );
        viewport.tick(0.1);
        let second_target = ViewportState {
            x: -200.0,
            y: 30.0,
            scale: 0.9,
        };
        let second = viewport.animate_to(second_target, 0.1, ANIMATED);
        assert!(second > first);

        while viewport.tick(5.0) {}
        assert_eq!(viewport.state(), second_target);
    }

    #[test]
    fn zoom_during_pan_keeps_cursor_point() {
        let viewport = Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0));
        let mut controller = ViewportController::default();
        controller.begin_pan(pos2(100.0, 100.0));
        controller.update_pan(pos2(150.0, 120.0));

        let cursor = pos2(150.0, 120.0);
        let before = controller.state().screen_to_canvas(viewport, cursor);
        controller.zoom_by_factor(1.5, cursor - viewport.min);
        controller.update_pan(cursor);

        let after = controller.state().screen_to_canvas(viewport, cursor);
        assert_eq!(controller.state().scale, 1.5);
        assert!((after - before).length() < 1e-3, "{before:?} -> {after:?}");

        controller.update_pan(pos2(170.0, 120.0));
        let dragged = controller.state().screen_to_canvas(viewport, pos2(170.0, 120.0));
        assert!((dragged - before).length() < 1e-3, "{before:?} -> {dragged:?}");
    }

    #[test]
    fn pan_cancels_animation() {
        let mut viewport = ViewportController::default();
        viewport.animate_to(
            ViewportState {
                x: 400.0,
                y: 0.0,
                scale: 1.0,
            },
            0.0,
            ANIMATED,
        );
        viewport.begin_pan(pos2(0.0, 0.0));
        assert!(!viewport.tick(0.2));
        assert_eq!(viewport.state().x, 0.0);
    }

    #[test]
    fn reset_returns_to_identity() {
        let mut viewport = ViewportController::new(ViewportState {
            x: -321.5,
            y: 77.25,
            scale: 1.6,
        });
        viewport.reset(1.0, ANIMATED);
        while viewport.tick(2.0) {}
        assert_eq!(viewport.state(), ViewportState::IDENTITY);
    }

    #[test]
    fn ensure_visible_centers_offscreen_node() {
        let mut viewport = ViewportController::default();
        let size = vec2(1000.0, 500.0);
        let moved = viewport.ensure_visible(pos2(99.0, 50.0), size, 72.0, false, 0.0, ANIMATED);
        assert!(moved);
        while viewport.tick(1.0) {}
        let centered = viewport.state().canvas_to_local(size, pos2(99.0, 50.0));
        assert!((centered - size * 0.5).length() < 1e-3);
        assert_eq!(viewport.state().scale, 1.0);
    }

    #[test]
    fn ensure_visible_leaves_comfortable_node_alone() {
        let mut viewport = ViewportController::default();
        let size = vec2(1000.0, 500.0);
        assert!(!viewport.ensure_visible(pos2(50.0, 50.0), size, 72.0, false, 0.0, ANIMATED));
        assert!(viewport.ensure_visible(pos2(40.0, 50.0), size, 72.0, true, 0.0, ANIMATED));
    }

    #[test]
    fn screen_round_trip_through_camera() {
        let camera = ViewportState {
            x: 40.0,
            y: -12.0,
            scale: 1.25,
        };
        let viewport = Rect::from_min_size(pos2(300.0, 50.0), vec2(800.0, 400.0));
        let canvas = pos2(37.5, 62.5);
        let screen = camera.canvas_to_screen(viewport, canvas);
        let back = camera.screen_to_canvas(viewport, screen);
        assert!((back - canvas).length() < 1e-3);
    }
}

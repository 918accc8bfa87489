//! Evasive placement for the decline control.
//!
//! Once the decline control turns evasive it jumps to a random spot inside
//! its container whenever the pointer comes near, or when it gains hover or
//! focus. Placement samples a bounded number of random positions and keeps
//! the first one whose center is far enough from the pointer; if none is,
//! the last sample wins.

use rand::Rng;

use crate::surface::{Element, Point, Rect, Size, Surface};

use super::state::InteractionState;

/// Tuning for the avoidance behavior, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvasionParams {
    /// Margin kept between the control and every container edge.
    pub padding: f64,
    /// Preferred minimum distance between the control center and the pointer.
    pub min_distance: f64,
    /// Pointer distance from the control center that triggers a jump.
    pub flee_radius: f64,
    /// Random samples tried before accepting the last one.
    pub max_attempts: u32,
}

impl Default for EvasionParams {
    fn default() -> Self {
        Self {
            padding: 4.0,
            min_distance: 100.0,
            flee_radius: 170.0,
            max_attempts: 10,
        }
    }
}

/// Compute a new top-left position for a control, relative to `container`.
///
/// `repel` is in viewport coordinates and defaults to the container center.
/// The result always lies in `[padding, container - control - padding]` on
/// both axes; when the container is too small that range collapses to
/// `padding`.
pub fn place<R: Rng + ?Sized>(
    container: Rect,
    control: Size,
    repel: Option<Point>,
    params: &EvasionParams,
    rng: &mut R,
) -> Point {
    let padding = params.padding;
    let max_x = (container.width - control.width - padding).max(padding);
    let max_y = (container.height - control.height - padding).max(padding);
    let repel = repel.unwrap_or_else(|| container.center());

    let mut x = padding;
    let mut y = padding;
    for _ in 0..params.max_attempts.max(1) {
        x = padding + rng.random::<f64>() * (max_x - padding);
        y = padding + rng.random::<f64>() * (max_y - padding);

        let center = Point::new(
            container.left + x + control.width / 2.0,
            container.top + y + control.height / 2.0,
        );
        if center.distance_to(repel) > params.min_distance {
            break;
        }
    }

    Point::new(
        x.round().clamp(padding, max_x),
        y.round().clamp(padding, max_y),
    )
}

/// Whether `pointer` is close enough to `control` to make it flee.
pub fn within_flee_radius(control: Rect, pointer: Point, params: &EvasionParams) -> bool {
    control.center().distance_to(pointer) < params.flee_radius
}

/// Applies [`place`] to the decline control on the surface.
#[derive(Debug, Clone, Default)]
pub struct EvasiveControl {
    params: EvasionParams,
    position: Option<Point>,
}

impl EvasiveControl {
    pub fn new(params: EvasionParams) -> Self {
        Self {
            params,
            position: None,
        }
    }

    pub fn params(&self) -> &EvasionParams {
        &self.params
    }

    /// Last position assigned, relative to the container.
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    /// Forget any previous placement (a fresh prompt instance).
    pub fn reset(&mut self, surface: &mut dyn Surface) {
        self.position = None;
        surface.set_evasive(Element::DeclineButton, false);
    }

    /// Switch the control into evasive presentation and move it once,
    /// away from the container center.
    pub fn engage<R: Rng + ?Sized>(&mut self, surface: &mut dyn Surface, rng: &mut R) {
        surface.set_evasive(Element::DeclineButton, true);
        self.reposition(None, surface, rng);
    }

    /// Pointer moved anywhere; jump if it came within the flee radius.
    pub fn on_pointer_move<R: Rng + ?Sized>(
        &mut self,
        pointer: Point,
        state: &InteractionState,
        surface: &mut dyn Surface,
        rng: &mut R,
    ) -> bool {
        if !Self::is_live(state) {
            return false;
        }
        let control = surface.bounds(Element::DeclineButton);
        if !within_flee_radius(control, pointer, &self.params) {
            return false;
        }
        self.reposition(Some(pointer), surface, rng);
        true
    }

    /// Hover or focus reached the control; jump regardless of distance.
    pub fn on_approach<R: Rng + ?Sized>(
        &mut self,
        pointer: Option<Point>,
        state: &InteractionState,
        surface: &mut dyn Surface,
        rng: &mut R,
    ) -> bool {
        if !Self::is_live(state) {
            return false;
        }
        self.reposition(pointer, surface, rng);
        true
    }

    fn is_live(state: &InteractionState) -> bool {
        state.evasive_mode_active && !state.accept_chosen
    }

    fn reposition<R: Rng + ?Sized>(
        &mut self,
        repel: Option<Point>,
        surface: &mut dyn Surface,
        rng: &mut R,
    ) -> Point {
        let container = surface.bounds(Element::DecisionControls);
        let control = surface.bounds(Element::DeclineButton).size();
        let position = place(container, control, repel, &self.params, rng);

        surface.set_position(Element::DeclineButton, position);
        self.position = Some(position);
        tracing::debug!("Decline control moved to ({}, {})", position.x, position.y);
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MockSurface;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn placement_stays_inside_padded_container() {
        let params = EvasionParams::default();
        let mut rng = rng();

        for (cw, ch, bw, bh) in [
            (600.0, 300.0, 100.0, 40.0),
            (120.0, 60.0, 100.0, 40.0),
            (9.0, 9.0, 0.0, 0.0),
            (1920.0, 1080.0, 300.0, 200.0),
            (113.5, 57.25, 80.5, 30.75),
        ] {
            let container = Rect::new(50.0, 80.0, cw, ch);
            for _ in 0..200 {
                let pointer = Point::new(rng.random::<f64>() * 2000.0, rng.random::<f64>() * 1200.0);
                let pos = place(container, Size::new(bw, bh), Some(pointer), &params, &mut rng);
                assert!(pos.x >= 4.0 && pos.x <= cw - bw - 4.0, "x={} for {}x{}", pos.x, cw, ch);
                assert!(pos.y >= 4.0 && pos.y <= ch - bh - 4.0, "y={} for {}x{}", pos.y, cw, ch);
            }
        }
    }

    #[test]
    fn tiny_container_clamps_to_padding() {
        let params = EvasionParams::default();
        let pos = place(
            Rect::new(0.0, 0.0, 50.0, 20.0),
            Size::new(100.0, 40.0),
            None,
            &params,
            &mut rng(),
        );
        assert_eq!(pos, Point::new(4.0, 4.0));
    }

    #[test]
    fn prefers_positions_away_from_pointer() {
        let params = EvasionParams::default();
        let container = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let control = Size::new(100.0, 40.0);
        let pointer = Point::new(500.0, 400.0);
        let mut rng = rng();

        for _ in 0..200 {
            let pos = place(container, control, Some(pointer), &params, &mut rng);
            let center = Point::new(pos.x + 50.0, pos.y + 20.0);
            // Rounding can shift the center by under a pixel.
            assert!(center.distance_to(pointer) > params.min_distance - 1.0);
        }
    }

    #[test]
    fn bounded_attempts_when_separation_is_impossible() {
        let params = EvasionParams::default();
        // Every spot in this container is within 100px of its center.
        let container = Rect::new(0.0, 0.0, 120.0, 60.0);
        let pos = place(container, Size::new(20.0, 20.0), None, &params, &mut rng());

        assert!(pos.x >= 4.0 && pos.x <= 96.0);
        assert!(pos.y >= 4.0 && pos.y <= 36.0);
    }

    #[test]
    fn positions_are_whole_pixels() {
        let params = EvasionParams::default();
        let pos = place(
            Rect::new(0.0, 0.0, 600.0, 300.0),
            Size::new(100.0, 40.0),
            None,
            &params,
            &mut rng(),
        );
        assert_eq!(pos.x, pos.x.round());
        assert_eq!(pos.y, pos.y.round());
    }

    #[test]
    fn flee_radius_is_strict() {
        let params = EvasionParams::default();
        let control = Rect::new(0.0, 0.0, 0.0, 0.0);
        assert!(within_flee_radius(control, Point::new(169.9, 0.0), &params));
        assert!(!within_flee_radius(control, Point::new(170.0, 0.0), &params));
    }

    #[test]
    fn pointer_move_ignored_until_evasive() {
        let mut control = EvasiveControl::default();
        let mut surface = MockSurface::with_decision_layout();
        let state = InteractionState::new();

        let near = surface.bounds(Element::DeclineButton).center();
        assert!(!control.on_pointer_move(near, &state, &mut surface, &mut rng()));
        assert_eq!(surface.position(Element::DeclineButton), None);
    }

    #[test]
    fn pointer_near_control_moves_it() {
        let mut control = EvasiveControl::default();
        let mut surface = MockSurface::with_decision_layout();
        let mut state = InteractionState::new();
        state.evasive_mode_active = true;
        let mut rng = rng();

        control.engage(&mut surface, &mut rng);
        assert!(surface.is_evasive(Element::DeclineButton));
        let first = control.position().unwrap();

        let near = surface.bounds(Element::DeclineButton).center();
        assert!(control.on_pointer_move(near, &state, &mut surface, &mut rng));
        let second = surface.position(Element::DeclineButton).unwrap();

        let container = surface.bounds(Element::DecisionControls);
        let new_center = Point::new(
            container.left + second.x + 50.0,
            container.top + second.y + 20.0,
        );
        assert!(new_center.distance_to(near) > 99.0);
        assert_ne!(first, second);
    }

    #[test]
    fn pointer_far_away_leaves_control() {
        let mut control = EvasiveControl::default();
        let mut surface = MockSurface::with_decision_layout();
        let mut state = InteractionState::new();
        state.evasive_mode_active = true;
        let mut rng = rng();
        control.engage(&mut surface, &mut rng);

        let far = Point::new(5000.0, 5000.0);
        assert!(!control.on_pointer_move(far, &state, &mut surface, &mut rng));
    }

    #[test]
    fn approach_moves_even_without_pointer() {
        let mut control = EvasiveControl::default();
        let mut surface = MockSurface::with_decision_layout();
        let mut state = InteractionState::new();
        state.evasive_mode_active = true;

        assert!(control.on_approach(None, &state, &mut surface, &mut rng()));
        assert!(surface.position(Element::DeclineButton).is_some());
    }

    #[test]
    fn accepted_prompt_stops_fleeing() {
        let mut control = EvasiveControl::default();
        let mut surface = MockSurface::with_decision_layout();
        let mut state = InteractionState::new();
        state.evasive_mode_active = true;
        state.accept_chosen = true;

        assert!(!control.on_approach(None, &state, &mut surface, &mut rng()));
    }
}

//! Shared kinematics helpers for gravity-bound entities.
//!
//! Every mobile entity resolves solid geometry the same way: gravity is
//! accumulated into vertical velocity first, the body is integrated, and the
//! four side probes classify which face of a solid was struck so the body can
//! be snapped flush against it.

use girder_rescue_core::Rect;

/// Vertical acceleration added to every gravity-bound entity per update.
pub(crate) const GRAVITY: f32 = 0.5;

/// Probe rectangles derived from an entity body, one per collision face.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Probes {
    pub(crate) bottom: Rect,
    pub(crate) top: Rect,
    pub(crate) right: Rect,
    pub(crate) left: Rect,
}

/// Builds the four side probes for the given body rectangle.
pub(crate) fn probes(body: &Rect) -> Probes {
    Probes {
        bottom: Rect::new(
            body.x + body.w / 4.0,
            body.y + body.h / 2.0,
            body.w / 2.0,
            body.h / 2.0,
        ),
        top: Rect::new(body.x + body.w / 4.0, body.y, body.w / 2.0, body.h / 2.0),
        right: Rect::new(body.x + body.w - 5.0, body.y + 5.0, 5.0, body.h - 10.0),
        left: Rect::new(body.x, body.y + 5.0, 5.0, body.h - 10.0),
    }
}

/// Outcome of resolving one body against the level's solids.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Contact {
    /// The body landed on or remains resting on a solid top face.
    pub(crate) grounded: bool,
    /// The body struck a solid side face this update.
    pub(crate) hit_wall: bool,
}

/// Clamps accumulated vertical velocity to the entity's terminal speed.
pub(crate) fn apply_gravity(vy: &mut f32, fall_cap: f32) {
    *vy = (*vy + GRAVITY).min(fall_cap);
}

/// Snaps the body out of any solids it has penetrated.
///
/// Vertical penetration is resolved before horizontal so a landing body is
/// seated on the surface before its side probes are evaluated.
pub(crate) fn resolve_solids(body: &mut Rect, vy: &mut f32, solids: &[Rect]) -> Contact {
    let mut contact = Contact::default();
    for solid in solids {
        let side = probes(body);
        if *vy >= 0.0 && side.bottom.intersects(solid) {
            body.y = solid.y - body.h;
            *vy = 0.0;
            contact.grounded = true;
        } else if *vy < 0.0 && side.top.intersects(solid) {
            body.y = solid.y + solid.h;
            *vy = 0.0;
        }

        let side = probes(body);
        if side.right.intersects(solid) {
            body.x = solid.x - body.w;
            contact.hit_wall = true;
        } else if side.left.intersects(solid) {
            body.x = solid.x + solid.w;
            contact.hit_wall = true;
        }
    }
    contact
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gravity_accumulates_before_hitting_the_cap() {
        let mut vy = 0.0;
        for _ in 0..10 {
            apply_gravity(&mut vy, 10.0);
        }
        assert!((vy - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn gravity_clamps_to_fall_cap() {
        let mut vy = 9.9;
        apply_gravity(&mut vy, 10.0);
        assert!((vy - 10.0).abs() < f32::EPSILON);
        apply_gravity(&mut vy, 10.0);
        assert!((vy - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn falling_body_snaps_flush_onto_solid_top() {
        let mut body = Rect::new(10.0, 90.0, 24.0, 32.0);
        let mut vy = 6.0;
        let floor = Rect::new(0.0, 110.0, 200.0, 16.0);

        let contact = resolve_solids(&mut body, &mut vy, &[floor]);

        assert!(contact.grounded);
        assert!((body.y - (floor.y - body.h)).abs() < f32::EPSILON);
        assert!(vy.abs() < f32::EPSILON);
    }

    #[test]
    fn rising_body_snaps_below_solid_bottom() {
        let mut body = Rect::new(10.0, 50.0, 24.0, 32.0);
        let mut vy = -6.0;
        let ceiling = Rect::new(0.0, 40.0, 200.0, 16.0);

        let contact = resolve_solids(&mut body, &mut vy, &[ceiling]);

        assert!(!contact.grounded);
        assert!((body.y - (ceiling.y + ceiling.h)).abs() < f32::EPSILON);
        assert!(vy.abs() < f32::EPSILON);
    }

    #[test]
    fn side_contact_pushes_body_out_and_reports_wall() {
        let wall = Rect::new(100.0, 0.0, 16.0, 200.0);
        let mut body = Rect::new(80.0, 50.0, 24.0, 32.0);
        let mut vy = 0.0;

        let contact = resolve_solids(&mut body, &mut vy, &[wall]);

        assert!(contact.hit_wall);
        assert!((body.x - (wall.x - body.w)).abs() < f32::EPSILON);
    }

    #[test]
    fn clear_air_reports_no_contact() {
        let mut body = Rect::new(10.0, 10.0, 24.0, 32.0);
        let mut vy = 3.0;
        let far = Rect::new(500.0, 500.0, 16.0, 16.0);

        let contact = resolve_solids(&mut body, &mut vy, &[far]);

        assert!(!contact.grounded);
        assert!(!contact.hit_wall);
    }
}

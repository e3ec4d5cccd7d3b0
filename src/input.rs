use glam::{Vec2, Vec3};

use crate::scene::BlinnPhong;

/// Wraps an angle into (-360, 360) degrees, keeping the sign like the
/// remainder operator does.
pub fn wrap_degrees(angle: f32) -> f32 {
    angle % 360.0
}

/// In-flight mouse drag: the cursor anchor and the rotation snapshot taken
/// when the button went down. Horizontal motion turns the model about the
/// vertical axis, vertical motion about the horizontal axis.
#[derive(Debug, Clone, Copy)]
pub struct DragRotate {
    anchor: Vec2,
    start: Vec3,
}

impl DragRotate {
    pub fn begin(anchor: Vec2, current: Vec3) -> Self {
        Self {
            anchor,
            start: current,
        }
    }

    /// Rotation for the current cursor position: one degree per pixel of
    /// drag distance, wrapped, z untouched.
    pub fn rotation_at(&self, cursor: Vec2) -> Vec3 {
        Vec3::new(
            wrap_degrees(self.start.x + (cursor.x - self.anchor.x)),
            wrap_degrees(self.start.y + (cursor.y - self.anchor.y)),
            self.start.z,
        )
    }
}

/// Applies one light-control key to the rig. Returns false for keys the
/// demo does not recognize, which are no-ops by contract.
pub fn apply_light_key(key: char, rig: &mut BlinnPhong) -> bool {
    match key {
        'w' => rig.light_pos.z += 1.0,
        's' => rig.light_pos.z -= 1.0,
        'a' => rig.light_pos.x += 1.0,
        'd' => rig.light_pos.x -= 1.0,
        'q' => rig.light_pos.y += 1.0,
        'e' => rig.light_pos.y -= 1.0,
        'u' => rig.light_power += 1.0,
        'i' => rig.light_power -= 1.0,
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_keeps_sign_and_magnitude() {
        assert_eq!(wrap_degrees(90.0), 90.0);
        assert_eq!(wrap_degrees(450.0), 90.0);
        assert_eq!(wrap_degrees(-450.0), -90.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
    }

    #[test]
    fn drag_offsets_the_rotation_snapshot() {
        let drag = DragRotate::begin(Vec2::new(100.0, 100.0), Vec3::new(45.0, 45.0, 7.0));
        let rotation = drag.rotation_at(Vec2::new(130.0, 90.0));
        assert_eq!(rotation, Vec3::new(75.0, 35.0, 7.0));
    }

    #[test]
    fn drag_wraps_past_a_full_turn() {
        let drag = DragRotate::begin(Vec2::ZERO, Vec3::new(350.0, 0.0, 0.0));
        let rotation = drag.rotation_at(Vec2::new(20.0, 0.0));
        assert_eq!(rotation.x, 10.0);
    }

    #[test]
    fn light_keys_move_the_light_and_power() {
        let mut rig = BlinnPhong::default();
        assert!(apply_light_key('w', &mut rig));
        assert!(apply_light_key('a', &mut rig));
        assert!(apply_light_key('q', &mut rig));
        assert_eq!(rig.light_pos, Vec3::new(1.0, 1.0, -9.0));

        assert!(apply_light_key('u', &mut rig));
        assert!(apply_light_key('u', &mut rig));
        assert!(apply_light_key('i', &mut rig));
        assert_eq!(rig.light_power, 401.0);
    }

    #[test]
    fn unrecognized_keys_change_nothing() {
        let mut rig = BlinnPhong::default();
        let before = rig.clone();
        assert!(!apply_light_key('x', &mut rig));
        assert!(!apply_light_key('W', &mut rig));
        assert_eq!(rig, before);
    }
}

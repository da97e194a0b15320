use glam::{Mat4, Vec3};
use std::f32::consts::{FRAC_PI_2, PI};

pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            fov: 75.0_f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Zero-height surfaces keep the previous aspect.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn look_at(&mut self, point: Vec3) {
        if point.distance_squared(self.position) > f32::EPSILON {
            self.target = point;
        }
    }

    /// Default orientation: facing down -Z from wherever the camera is.
    pub fn look_forward(&mut self) {
        self.target = self.position + Vec3::NEG_Z;
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }
}

/// Damped spherical orbit around a centre point.
///
/// `phi` is the polar angle from +Y, `theta` the azimuth in the XZ plane.
pub struct OrbitController {
    pub center: Vec3,
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_phi: f32,
    pub max_phi: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub damping: f32,
    velocity_theta: f32,
    velocity_phi: f32,
    velocity_radius: f32,
    velocity_pan: Vec3,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 5.0,
            theta: FRAC_PI_2,
            phi: FRAC_PI_2,
            min_radius: 0.1,
            max_radius: 500.0,
            min_phi: 0.05,
            max_phi: PI - 0.05,
            rotate_speed: 0.005,
            pan_speed: 0.002,
            zoom_speed: 0.1,
            damping: 0.85,
            velocity_theta: 0.0,
            velocity_phi: 0.0,
            velocity_radius: 0.0,
            velocity_pan: Vec3::ZERO,
        }
    }
}

impl OrbitController {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            ..Default::default()
        }
    }

    /// Restricts the camera to the upper hemisphere (never below the
    /// centre's horizon).
    pub fn with_upper_hemisphere(mut self) -> Self {
        self.max_phi = FRAC_PI_2;
        self.phi = self.phi.clamp(self.min_phi, self.max_phi);
        self
    }

    /// Re-derives the spherical coordinates from a camera position and
    /// drops any pending motion.
    pub fn set_position(&mut self, position: Vec3) {
        let offset = position - self.center;
        let radius = offset.length();
        if radius > f32::EPSILON {
            self.radius = radius.clamp(self.min_radius, self.max_radius);
            self.phi = (offset.y / radius).clamp(-1.0, 1.0).acos().clamp(self.min_phi, self.max_phi);
            self.theta = offset.z.atan2(offset.x);
        }
        self.stop();
    }

    pub fn rotate(&mut self, delta_x: f32, delta_y: f32) {
        self.velocity_theta += delta_x * self.rotate_speed;
        self.velocity_phi -= delta_y * self.rotate_speed;
    }

    pub fn zoom(&mut self, delta: f32) {
        self.velocity_radius -= delta * self.zoom_speed * self.radius;
    }

    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let right = Vec3::new(-self.theta.sin(), 0.0, self.theta.cos());
        let up_dir = Vec3::new(
            -self.phi.cos() * self.theta.cos(),
            self.phi.sin(),
            -self.phi.cos() * self.theta.sin(),
        )
        .normalize();

        let pan_factor = self.pan_speed * self.radius;
        self.velocity_pan += right * delta_x * pan_factor + up_dir * delta_y * pan_factor;
    }

    pub fn stop(&mut self) {
        self.velocity_theta = 0.0;
        self.velocity_phi = 0.0;
        self.velocity_radius = 0.0;
        self.velocity_pan = Vec3::ZERO;
    }

    pub fn is_moving(&self) -> bool {
        self.velocity_theta != 0.0
            || self.velocity_phi != 0.0
            || self.velocity_radius != 0.0
            || self.velocity_pan != Vec3::ZERO
    }

    pub fn update(&mut self) {
        self.theta += self.velocity_theta;
        self.phi = (self.phi + self.velocity_phi).clamp(self.min_phi, self.max_phi);
        self.radius = (self.radius + self.velocity_radius).clamp(self.min_radius, self.max_radius);
        self.center += self.velocity_pan;

        self.velocity_theta *= self.damping;
        self.velocity_phi *= self.damping;
        self.velocity_radius *= self.damping;
        self.velocity_pan *= self.damping;

        if self.velocity_theta.abs() < 0.0001 {
            self.velocity_theta = 0.0;
        }
        if self.velocity_phi.abs() < 0.0001 {
            self.velocity_phi = 0.0;
        }
        if self.velocity_radius.abs() < 0.0001 {
            self.velocity_radius = 0.0;
        }
        if self.velocity_pan.length_squared() < 0.000001 {
            self.velocity_pan = Vec3::ZERO;
        }
    }

    pub fn camera_position(&self) -> Vec3 {
        let x = self.radius * self.phi.sin() * self.theta.cos();
        let y = self.radius * self.phi.cos();
        let z = self.radius * self.phi.sin() * self.theta.sin();
        self.center + Vec3::new(x, y, z)
    }

    pub fn update_camera(&self, camera: &mut Camera) {
        camera.position = self.camera_position();
        camera.target = self.center;
    }
}

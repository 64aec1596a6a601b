//! Pinhole camera for ray generation.

use glint_math::{Ray, Vec3};

/// Pinhole camera mapping image-plane coordinates to world-space rays.
///
/// Builder methods refresh the derived fields immediately. After changing
/// the image size with [`Camera::set_image_size`], call [`Camera::update`]
/// before generating rays.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    // Image settings
    image_width: u32,
    image_height: u32,

    // Camera positioning
    center: Vec3,
    direction: Vec3,
    up: Vec3,

    // Lens settings
    field_of_view: f32, // Vertical field of view in degrees
    focal_length: f32,

    // Cached computed values (set by update())
    sensor_width: f32,
    sensor_height: f32,
    delta_u: Vec3,
    delta_v: Vec3,
    top_left_pixel: Vec3,
}

impl Camera {
    /// Camera at the origin looking down -Z with a 45 degree field of view.
    pub fn new() -> Self {
        let mut camera = Self {
            image_width: 1,
            image_height: 1,
            center: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            up: Vec3::Y,
            field_of_view: 45.0,
            focal_length: 1.0,
            sensor_width: 0.0,
            sensor_height: 0.0,
            delta_u: Vec3::ZERO,
            delta_v: Vec3::ZERO,
            top_left_pixel: Vec3::ZERO,
        };
        camera.update();
        camera
    }

    /// Set camera position and orientation.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, up: Vec3) -> Self {
        self.center = look_from;
        self.direction = (look_at - look_from).normalize();
        self.up = up;
        self.update();
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, field_of_view: f32, focal_length: f32) -> Self {
        self.field_of_view = field_of_view;
        self.focal_length = focal_length;
        self.update();
        self
    }

    /// Set image resolution.
    pub fn with_image_size(mut self, width: u32, height: u32) -> Self {
        self.set_image_size(width, height);
        self.update();
        self
    }

    /// Record a new destination size. Takes effect on the next [`Camera::update`].
    pub fn set_image_size(&mut self, width: u32, height: u32) {
        self.image_width = width.max(1);
        self.image_height = height.max(1);
    }

    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn sensor_size(&self) -> (f32, f32) {
        (self.sensor_width, self.sensor_height)
    }

    /// Recompute the camera basis and the pixel grid on the image plane.
    pub fn update(&mut self) {
        let width = self.image_width as f32;
        let height = self.image_height as f32;
        let aspect = width / height;

        // Calculate camera basis vectors
        let w = (-self.direction).normalize();
        let u = self.up.cross(w).normalize();
        let v = w.cross(u);

        self.sensor_height = 2.0 * self.focal_length * (self.field_of_view.to_radians() / 2.0).tan();
        self.sensor_width = aspect * self.sensor_height;

        // Rows grow downward in screen space
        self.delta_u = u * (self.sensor_width / width);
        self.delta_v = -v * (self.sensor_height / height);

        let film_center = self.center + self.direction * self.focal_length;
        self.top_left_pixel = film_center - 0.5 * self.sensor_width * u
            + 0.5 * self.sensor_height * v
            + 0.5 * self.delta_u
            + 0.5 * self.delta_v;
    }

    /// Generate a ray through image-plane position (px, py), measured in
    /// pixels from the top-left pixel. Fractional positions are allowed.
    pub fn generate_ray(&self, px: f32, py: f32) -> Ray {
        let film_location = self.top_left_pixel + px * self.delta_u + py * self.delta_v;
        Ray::new(self.center, (film_location - self.center).normalize())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

//! Surface materials and their Whitted shading rules.
//!
//! Every variant implements `shade`, which turns an intersection into a
//! color. Reflective and refractive variants call back into the [`Tracer`]
//! with `depth - 1`; at `depth == 0` no variant recurses.

use crate::{Color, Intersection, Scene, Tracer, RAY_EPSILON};
use glint_math::{Ray, Vec2, Vec3};

/// Stable handle to a material stored in a [`Scene`]'s material arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub usize);

/// A surface material. Closed set of variants dispatched by `match`.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Diffuse(Diffuse),
    Mirror(Mirror),
    Glossy(Glossy),
    Dielectric(Dielectric),
    Checkerboard(Checkerboard),
}

impl Material {
    /// Color leaving the surface toward the incoming ray.
    pub fn shade(
        &self,
        hit: &Intersection,
        scene: &Scene,
        ray: &Ray,
        tracer: &dyn Tracer,
        depth: u32,
    ) -> Color {
        match self {
            Material::Diffuse(m) => m.shade(hit, scene),
            Material::Mirror(m) => m.shade(hit, scene, ray, tracer, depth),
            Material::Glossy(m) => m.shade(hit, scene, ray, tracer, depth),
            Material::Dielectric(m) => m.shade(hit, scene, ray, tracer, depth),
            Material::Checkerboard(m) => m.shade(hit, scene),
        }
    }

    /// Fraction of a light's contribution that passes through this material
    /// when it blocks a shadow ray. Opaque materials block everything.
    pub fn shadow_transmittance(&self, shadow_ray: &Ray, blocker: &Intersection) -> f32 {
        match self {
            Material::Dielectric(m) => m.shadow_transmittance(shadow_ray, blocker),
            _ => 0.0,
        }
    }
}

/// Lambertian material lit only by the scene's point lights.
#[derive(Debug, Clone, PartialEq)]
pub struct Diffuse {
    albedo: Color,
}

impl Diffuse {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    fn shade(&self, hit: &Intersection, scene: &Scene) -> Color {
        self.albedo * scene.direct_illumination(hit.point, hit.normal)
    }
}

/// Perfect mirror.
#[derive(Debug, Clone, PartialEq)]
pub struct Mirror {
    tint: Color,
}

impl Mirror {
    pub fn new(tint: Color) -> Self {
        Self { tint }
    }

    fn shade(
        &self,
        hit: &Intersection,
        scene: &Scene,
        ray: &Ray,
        tracer: &dyn Tracer,
        depth: u32,
    ) -> Color {
        if depth == 0 {
            return self.tint;
        }

        let reflected = reflected_ray(ray, hit);
        self.tint * tracer.trace(scene, &reflected, depth - 1)
    }
}

/// Diffuse base blended with a mirror reflection.
#[derive(Debug, Clone, PartialEq)]
pub struct Glossy {
    albedo: Color,
    specularity: f32,
    tint: Color,
}

impl Glossy {
    /// Create a glossy material.
    ///
    /// - `specularity`: weight of the reflection, clamped to [0, 1]
    /// - `tint`: color multiplied into the reflection
    pub fn new(albedo: Color, specularity: f32, tint: Color) -> Self {
        Self {
            albedo,
            specularity: specularity.clamp(0.0, 1.0),
            tint,
        }
    }

    /// Untinted glossy material.
    pub fn with_specularity(albedo: Color, specularity: f32) -> Self {
        Self::new(albedo, specularity, Color::ONE)
    }

    fn shade(
        &self,
        hit: &Intersection,
        scene: &Scene,
        ray: &Ray,
        tracer: &dyn Tracer,
        depth: u32,
    ) -> Color {
        let diffuse =
            self.albedo * (scene.ambient() + scene.direct_illumination(hit.point, hit.normal));

        if depth == 0 || self.specularity == 0.0 {
            return diffuse;
        }

        let reflected = reflected_ray(ray, hit);
        let specular = self.tint * tracer.trace(scene, &reflected, depth - 1);
        diffuse.lerp(specular, self.specularity)
    }
}

/// Transparent medium with Fresnel reflection and Beer-Lambert absorption.
#[derive(Debug, Clone, PartialEq)]
pub struct Dielectric {
    /// Ratio n_inside / n_outside
    index_of_refraction: f32,
    absorption: f32,
    diffuse_ratio: f32,
    albedo: Color,
}

impl Dielectric {
    /// Create a clear dielectric.
    ///
    /// - `index_of_refraction`: 1.0 = air, 1.5 = glass, 2.4 = diamond
    pub fn new(index_of_refraction: f32) -> Self {
        Self {
            index_of_refraction,
            absorption: 0.0,
            diffuse_ratio: 0.0,
            albedo: Color::ONE,
        }
    }

    /// Set the Beer-Lambert absorption coefficient (per unit distance).
    pub fn with_absorption(mut self, absorption: f32) -> Self {
        self.absorption = absorption.max(0.0);
        self
    }

    /// Mix in a diffuse surface term. `ratio` is clamped to [0, 1].
    pub fn with_diffuse(mut self, ratio: f32, albedo: Color) -> Self {
        self.diffuse_ratio = ratio.clamp(0.0, 1.0);
        self.albedo = albedo;
        self
    }

    pub fn index_of_refraction(&self) -> f32 {
        self.index_of_refraction
    }

    pub fn absorption(&self) -> f32 {
        self.absorption
    }

    pub fn diffuse_ratio(&self) -> f32 {
        self.diffuse_ratio
    }

    /// Relative index for a ray crossing the surface on the given side.
    fn eta(&self, front_face: bool) -> f32 {
        if front_face {
            1.0 / self.index_of_refraction
        } else {
            self.index_of_refraction
        }
    }

    /// Schlick's approximation for reflectance.
    pub fn reflectance(direction: Vec3, normal: Vec3, eta: f32) -> f32 {
        let cos_in = (-direction).dot(normal).clamp(0.0, 1.0);
        let r0 = ((1.0 - eta) / (1.0 + eta)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cos_in).powi(5)
    }

    fn shade(
        &self,
        hit: &Intersection,
        scene: &Scene,
        ray: &Ray,
        tracer: &dyn Tracer,
        depth: u32,
    ) -> Color {
        let mut result = 0.1 * self.albedo * scene.ambient();
        if self.diffuse_ratio > 0.0 {
            result +=
                self.diffuse_ratio * self.albedo * scene.direct_illumination(hit.point, hit.normal);
        }
        result.w = 1.0;

        if depth == 0 || self.diffuse_ratio >= 1.0 {
            return result;
        }

        let entering = hit.front_face;
        let eta = self.eta(entering);
        let direction = ray.direction().normalize();
        let mut reflectance = Self::reflectance(direction, hit.normal, eta);

        // Internal reflections are not followed; only rays arriving from
        // outside spawn a reflected branch.
        let reflected = if entering {
            tracer.trace(scene, &reflected_ray(ray, hit), depth - 1)
        } else {
            Color::ZERO
        };

        let transmitted = match refract(direction, hit.normal, eta) {
            Some(refracted_dir) => {
                let refracted = Ray::new(hit.point - RAY_EPSILON * hit.normal, refracted_dir);
                let falloff = (-self.absorption * hit.time).exp();
                tracer.trace(scene, &refracted, depth - 1) * falloff
            }
            None => {
                // Total internal reflection
                reflectance = 1.0;
                Color::ZERO
            }
        };

        result += (1.0 - self.diffuse_ratio) * transmitted.lerp(reflected, reflectance);
        result.w = 1.0;
        result
    }

    /// Share of light that reaches a shaded point through this medium when
    /// it is the nearest blocker of a shadow ray.
    pub fn shadow_transmittance(&self, shadow_ray: &Ray, blocker: &Intersection) -> f32 {
        let eta = self.eta(blocker.front_face);
        let reflectance = Self::reflectance(shadow_ray.direction().normalize(), blocker.normal, eta);
        let falloff = (-self.absorption * blocker.time).exp();
        self.diffuse_ratio + (1.0 - self.diffuse_ratio) * (1.0 - reflectance) * falloff
    }
}

/// Two-color checker pattern over the surface UVs.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkerboard {
    color1: Color,
    color2: Color,
    scale: f32,
}

impl Checkerboard {
    /// Create a checkerboard; `scale` is the number of squares per unit of UV.
    pub fn new(color1: Color, color2: Color, scale: f32) -> Self {
        Self {
            color1,
            color2,
            scale,
        }
    }

    /// Flat color of the square containing `uv`.
    pub fn color_at(&self, uv: Vec2) -> Color {
        let scaled = (uv * self.scale).floor();
        let parity = (scaled.x as i64 + scaled.y as i64).rem_euclid(2);
        if parity == 0 {
            self.color1
        } else {
            self.color2
        }
    }

    fn shade(&self, hit: &Intersection, scene: &Scene) -> Color {
        self.color_at(hit.uv) * scene.direct_illumination(hit.point, hit.normal)
    }
}

impl Default for Checkerboard {
    fn default() -> Self {
        Self::new(
            Color::new(0.0, 0.0, 1.0, 1.0),
            Color::new(1.0, 0.0, 0.0, 1.0),
            10.0,
        )
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Material {
                fn from(material: $variant) -> Self {
                    Material::$variant(material)
                }
            }
        )*
    };
}

impl_from_variant!(Diffuse, Mirror, Glossy, Dielectric, Checkerboard);

// =============================================================================
// Helper functions
// =============================================================================

/// Mirror reflection of `ray` at `hit`, offset off the surface.
fn reflected_ray(ray: &Ray, hit: &Intersection) -> Ray {
    let direction = reflect(ray.direction(), hit.normal).normalize();
    Ray::new(hit.point + RAY_EPSILON * hit.normal, direction)
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with relative index `eta`.
///
/// Returns `None` on total internal reflection.
#[inline]
fn refract(incident: Vec3, n: Vec3, eta: f32) -> Option<Vec3> {
    let cos_i = n.dot(incident);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return None;
    }
    Some(eta * incident - (eta * cos_i + k.sqrt()) * n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Camera, Light, PointLight, Sphere, WhittedTracer};
    use glint_math::Vec4;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Tracer that counts calls and returns a constant color.
    struct CountingTracer {
        calls: AtomicUsize,
        color: Color,
    }

    impl CountingTracer {
        fn new(color: Color) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                color,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Tracer for CountingTracer {
        fn trace(&self, _scene: &Scene, _ray: &Ray, _depth: u32) -> Color {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.color
        }
    }

    fn lit_scene() -> Scene {
        let mut scene = Scene::new(Camera::new());
        scene.add_light(PointLight::new(Vec3::new(0.0, 0.0, 5.0), Color::splat(50.0)));
        scene
    }

    /// Head-on hit of a surface facing +Z at the origin.
    fn front_hit() -> (Ray, Intersection) {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z);
        let hit = Intersection::new(&ray, Vec3::ZERO, Vec3::Z, Vec2::ZERO, 3.0, MaterialId(0));
        (ray, hit)
    }

    fn recursive_materials() -> Vec<Material> {
        vec![
            Mirror::new(Color::new(0.9, 0.9, 0.9, 1.0)).into(),
            Glossy::with_specularity(Color::new(0.8, 0.1, 0.1, 1.0), 0.5).into(),
            Dielectric::new(1.5).with_absorption(0.1).into(),
            Dielectric::new(1.5)
                .with_diffuse(0.3, Color::new(0.2, 0.4, 0.6, 1.0))
                .into(),
        ]
    }

    #[test]
    fn test_depth_zero_never_recurses() {
        let scene = lit_scene();
        let (ray, hit) = front_hit();

        for material in recursive_materials() {
            let tracer = CountingTracer::new(Color::ONE);
            let color = material.shade(&hit, &scene, &ray, &tracer, 0);

            assert_eq!(tracer.calls(), 0, "{material:?} recursed at depth 0");
            assert!(color.is_finite(), "{material:?} returned {color:?}");
        }
    }

    #[test]
    fn test_positive_depth_recurses() {
        let scene = lit_scene();
        let (ray, hit) = front_hit();

        for material in recursive_materials() {
            let tracer = CountingTracer::new(Color::ONE);
            material.shade(&hit, &scene, &ray, &tracer, 3);
            assert!(tracer.calls() > 0, "{material:?} did not recurse");
        }
    }

    #[test]
    fn test_mirror_depth_zero_returns_tint() {
        let scene = lit_scene();
        let (ray, hit) = front_hit();
        let tint = Color::new(0.2, 0.3, 0.4, 1.0);
        let tracer = CountingTracer::new(Color::ONE);

        let color = Material::from(Mirror::new(tint)).shade(&hit, &scene, &ray, &tracer, 0);
        assert_eq!(color, tint);
    }

    #[test]
    fn test_mirror_tints_traced_color() {
        let scene = lit_scene();
        let (ray, hit) = front_hit();
        let tracer = CountingTracer::new(Color::new(1.0, 0.5, 0.25, 1.0));

        let mirror = Material::from(Mirror::new(Color::splat(0.5)));
        let color = mirror.shade(&hit, &scene, &ray, &tracer, 4);
        assert_eq!(tracer.calls(), 1);
        assert_eq!(color, Color::new(0.5, 0.25, 0.125, 0.5));
    }

    #[test]
    fn test_glossy_zero_specularity_skips_reflection() {
        let scene = lit_scene();
        let (ray, hit) = front_hit();
        let tracer = CountingTracer::new(Color::ONE);

        let material = Material::from(Glossy::with_specularity(Color::ONE, 0.0));
        let color = material.shade(&hit, &scene, &ray, &tracer, 5);

        assert_eq!(tracer.calls(), 0);
        let expected = scene.ambient() + scene.direct_illumination(hit.point, hit.normal);
        assert!((color - expected).length() < 1e-6);
    }

    #[test]
    fn test_glossy_full_specularity_is_pure_reflection() {
        let scene = lit_scene();
        let (ray, hit) = front_hit();
        let traced = Color::new(0.3, 0.6, 0.9, 1.0);
        let tracer = CountingTracer::new(traced);

        let material = Material::from(Glossy::new(Color::ONE, 1.0, Color::splat(0.5)));
        let color = material.shade(&hit, &scene, &ray, &tracer, 5);
        assert!((color - traced * 0.5).length() < 1e-5);
    }

    #[test]
    fn test_diffuse_scales_direct_illumination() {
        let scene = lit_scene();
        let (ray, hit) = front_hit();
        let tracer = CountingTracer::new(Color::ONE);
        let albedo = Color::new(0.5, 0.25, 1.0, 1.0);

        let color = Material::from(Diffuse::new(albedo)).shade(&hit, &scene, &ray, &tracer, 5);
        let direct = scene.direct_illumination(hit.point, hit.normal);

        assert_eq!(tracer.calls(), 0);
        assert!(direct.x > 0.0);
        assert!((color - albedo * direct).length() < 1e-6);
    }

    #[test]
    fn test_checkerboard_parity() {
        let board = Checkerboard::new(Color::X, Color::Y, 2.0);

        assert_eq!(board.color_at(Vec2::new(0.1, 0.1)), Color::X);
        assert_eq!(board.color_at(Vec2::new(0.6, 0.1)), Color::Y);
        assert_eq!(board.color_at(Vec2::new(0.6, 0.6)), Color::X);
        // Negative coordinates keep alternating
        assert_eq!(board.color_at(Vec2::new(-0.1, 0.1)), Color::Y);
        assert_eq!(board.color_at(Vec2::new(-0.1, -0.1)), Color::X);
    }

    #[test]
    fn test_schlick_reflectance() {
        // Head-on glass: F0 = 0.04
        let r = Dielectric::reflectance(Vec3::NEG_Z, Vec3::Z, 1.0 / 1.5);
        assert!((r - 0.04).abs() < 1e-4);

        // Grazing incidence reflects everything
        let r = Dielectric::reflectance(Vec3::X, Vec3::Z, 1.0 / 1.5);
        assert!((r - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_refract_straight_through() {
        let out = refract(Vec3::NEG_Z, Vec3::Z, 1.0 / 1.5).unwrap();
        assert!((out - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_total_internal_reflection() {
        // Leaving glass at a steep angle
        let incident = Vec3::new(0.9, 0.0, -0.1).normalize();
        assert!(refract(incident, Vec3::Z, 1.5).is_none());
    }

    #[test]
    fn test_dielectric_exiting_ray_skips_reflection() {
        let scene = lit_scene();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        // Back-face hit: we are inside the medium
        let hit = Intersection::new(&ray, Vec3::NEG_Z, Vec3::NEG_Z, Vec2::ZERO, 1.0, MaterialId(0));
        assert!(!hit.front_face);

        let tracer = CountingTracer::new(Color::ONE);
        Material::from(Dielectric::new(1.5)).shade(&hit, &scene, &ray, &tracer, 3);
        assert_eq!(tracer.calls(), 1);
    }

    #[test]
    fn test_dielectric_total_internal_reflection_skips_transmission() {
        let scene = lit_scene();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.9, 0.0, -0.1).normalize());
        let hit = Intersection::new(&ray, ray.at(1.0), Vec3::NEG_Z, Vec2::ZERO, 1.0, MaterialId(0));

        let tracer = CountingTracer::new(Color::ONE);
        let color = Material::from(Dielectric::new(1.5)).shade(&hit, &scene, &ray, &tracer, 3);
        assert_eq!(tracer.calls(), 0);
        assert!(color.is_finite());
    }

    #[test]
    fn test_absorption_darkens_transmission() {
        let scene = lit_scene();
        let (ray, hit) = front_hit();

        let clear = Material::from(Dielectric::new(1.5));
        let murky = Material::from(Dielectric::new(1.5).with_absorption(1.0));

        let tracer = CountingTracer::new(Color::ONE);
        let clear_color = clear.shade(&hit, &scene, &ray, &tracer, 2);
        let murky_color = murky.shade(&hit, &scene, &ray, &tracer, 2);
        assert!(murky_color.x < clear_color.x);
    }

    #[test]
    fn test_opaque_materials_block_shadows() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        let hit = Intersection::new(&ray, Vec3::Y, Vec3::NEG_Y, Vec2::ZERO, 1.0, MaterialId(0));

        let opaque: Vec<Material> = vec![
            Diffuse::new(Color::ONE).into(),
            Mirror::new(Color::ONE).into(),
            Glossy::with_specularity(Color::ONE, 0.5).into(),
            Checkerboard::default().into(),
        ];
        for material in opaque {
            assert_eq!(material.shadow_transmittance(&ray, &hit), 0.0);
        }

        let glass = Material::from(Dielectric::new(1.5).with_absorption(0.1));
        let t = glass.shadow_transmittance(&ray, &hit);
        assert!(t > 0.0 && t < 1.0);
    }

    #[test]
    fn test_whitted_scene_mirror_sees_background() {
        // Mirror facing the camera reflects straight back into empty space
        let mut scene = Scene::new(Camera::new());
        let mirror = scene.add_material(Mirror::new(Color::splat(0.5)));
        scene.add_sphere(Vec3::new(0.0, 0.0, -5.0), 1.0, mirror).unwrap();
        scene.add_light(Light::from(PointLight::new(Vec3::Y * 5.0, Color::ONE)));

        let background = Vec4::new(0.6, 0.6, 0.8, 1.0);
        let tracer = WhittedTracer::new(background);
        let color = tracer.trace(&scene, &Ray::new(Vec3::ZERO, Vec3::NEG_Z), 4);
        assert!((color - background * 0.5).length() < 1e-5);
    }
}

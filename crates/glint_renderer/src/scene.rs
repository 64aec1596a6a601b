//! Scene: camera, primitives, lights and the material arena.

use crate::{
    Camera, Color, Intersection, Light, Material, MaterialId, Primitive, PrimitiveList, Sphere,
    TriangleMesh,
};
use glint_math::{Interval, Ray, Vec3};
use thiserror::Error;

/// Errors that can occur while building a scene.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("Material {0:?} is not in this scene (scene has {1} materials)")]
    UnknownMaterial(MaterialId, usize),
}

/// Result type for scene construction.
pub type SceneResult<T> = Result<T, SceneError>;

/// Everything a render needs: one camera, the primitives, the lights and
/// the materials the primitives refer to.
///
/// Topology is fixed while a render is in progress; queries take `&self`.
#[derive(Debug, Clone)]
pub struct Scene {
    camera: Camera,
    primitives: PrimitiveList,
    lights: Vec<Light>,
    materials: Vec<Material>,
    ambient: Color,
}

impl Scene {
    /// Ambient term used by materials that add a constant fill light.
    pub const DEFAULT_AMBIENT: Color = Color::new(0.3, 0.3, 0.3, 1.0);

    /// Create an empty scene viewed through `camera`.
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            primitives: PrimitiveList::new(),
            lights: Vec::new(),
            materials: Vec::new(),
            ambient: Self::DEFAULT_AMBIENT,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn ambient(&self) -> Color {
        self.ambient
    }

    pub fn set_ambient(&mut self, ambient: Color) {
        self.ambient = ambient;
    }

    /// Store a material and return its handle.
    pub fn add_material(&mut self, material: impl Into<Material>) -> MaterialId {
        self.materials.push(material.into());
        MaterialId(self.materials.len() - 1)
    }

    /// Look up a material by handle.
    ///
    /// Handles come from [`Scene::add_material`] and every primitive is
    /// checked on insertion, so lookups from intersections always succeed.
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0]
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Add a primitive whose material handle must belong to this scene.
    pub fn add_primitive(&mut self, primitive: impl Into<Primitive>) -> SceneResult<()> {
        let primitive = primitive.into();
        let id = primitive.material();
        if id.0 >= self.materials.len() {
            return Err(SceneError::UnknownMaterial(id, self.materials.len()));
        }
        self.primitives.add(primitive);
        Ok(())
    }

    pub fn add_sphere(&mut self, center: Vec3, radius: f32, material: MaterialId) -> SceneResult<()> {
        self.add_primitive(Sphere::new(center, radius, material))
    }

    pub fn add_mesh(&mut self, mesh: TriangleMesh) -> SceneResult<()> {
        self.add_primitive(mesh)
    }

    pub fn add_light(&mut self, light: impl Into<Light>) {
        self.lights.push(light.into());
    }

    pub fn primitives(&self) -> &PrimitiveList {
        &self.primitives
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Closest intersection along `ray` inside `ray_t`.
    pub fn intersect_nearest(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection> {
        self.primitives.intersect_nearest(ray, ray_t)
    }

    /// Any intersection along `ray` inside `ray_t`.
    pub fn intersect_any(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection> {
        self.primitives.intersect_any(ray, ray_t)
    }

    /// Sum of all lights' contributions at a surface point, with shadows.
    ///
    /// The nearest blocker on each shadow ray decides visibility: opaque
    /// materials block the light, dielectrics let part of it through.
    pub fn direct_illumination(&self, point: Vec3, normal: Vec3) -> Color {
        let mut result = Color::ZERO;

        for light in &self.lights {
            let (shadow_ray, max_distance) = light.shadow_ray(point);
            let contribution = light.illuminate(point, normal);

            match self.intersect_nearest(&shadow_ray, Interval::new(0.0, max_distance)) {
                None => result += contribution,
                Some(blocker) => {
                    let transmittance = self
                        .material(blocker.material)
                        .shadow_transmittance(&shadow_ray, &blocker);
                    if transmittance > 0.0 {
                        result += contribution * transmittance;
                    }
                }
            }
        }

        result.w = 1.0;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dielectric, Diffuse, PointLight};

    const LIGHT_POSITION: Vec3 = Vec3::new(0.0, 5.0, 0.0);

    fn scene_with_light() -> Scene {
        let mut scene = Scene::new(Camera::new());
        scene.add_light(PointLight::new(LIGHT_POSITION, Color::splat(100.0)));
        scene
    }

    #[test]
    fn test_unoccluded_light() {
        let scene = scene_with_light();
        let direct = scene.direct_illumination(Vec3::ZERO, Vec3::Y);
        let expected = scene.lights()[0].illuminate(Vec3::ZERO, Vec3::Y);

        assert!((direct.truncate() - expected.truncate()).length() < 1e-6);
        assert_eq!(direct.w, 1.0);
    }

    #[test]
    fn test_opaque_blocker_casts_full_shadow() {
        let mut scene = scene_with_light();
        let diffuse = scene.add_material(Diffuse::new(Color::ONE));
        scene.add_sphere(Vec3::new(0.0, 2.5, 0.0), 0.5, diffuse).unwrap();

        let direct = scene.direct_illumination(Vec3::ZERO, Vec3::Y);
        assert_eq!(direct.truncate(), Vec3::ZERO);
        assert_eq!(direct.w, 1.0);
    }

    #[test]
    fn test_dielectric_blocker_casts_partial_shadow() {
        let mut scene = scene_with_light();
        let glass = scene.add_material(Dielectric::new(1.5).with_absorption(0.1));
        scene.add_sphere(Vec3::new(0.0, 2.5, 0.0), 0.5, glass).unwrap();

        let unoccluded = scene.lights()[0].illuminate(Vec3::ZERO, Vec3::Y);
        let direct = scene.direct_illumination(Vec3::ZERO, Vec3::Y);

        assert!(direct.x > 0.0);
        assert!(direct.x < unoccluded.x);
    }

    #[test]
    fn test_blocker_behind_light_is_ignored() {
        let mut scene = scene_with_light();
        let diffuse = scene.add_material(Diffuse::new(Color::ONE));
        scene.add_sphere(Vec3::new(0.0, 8.0, 0.0), 1.0, diffuse).unwrap();

        let direct = scene.direct_illumination(Vec3::ZERO, Vec3::Y);
        assert!(direct.x > 0.0);
    }

    #[test]
    fn test_lights_accumulate() {
        let mut scene = scene_with_light();
        let single = scene.direct_illumination(Vec3::ZERO, Vec3::Y);
        scene.add_light(PointLight::new(LIGHT_POSITION, Color::splat(100.0)));
        let double = scene.direct_illumination(Vec3::ZERO, Vec3::Y);

        assert!((double.x - 2.0 * single.x).abs() < 1e-6);
    }

    #[test]
    fn test_surface_does_not_shadow_itself() {
        let mut scene = scene_with_light();
        let diffuse = scene.add_material(Diffuse::new(Color::ONE));
        scene.add_sphere(Vec3::ZERO, 1.0, diffuse).unwrap();

        // Top of the sphere faces the light
        let direct = scene.direct_illumination(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        assert!(direct.x > 0.0);
    }

    #[test]
    fn test_unknown_material_rejected() {
        let mut scene = Scene::new(Camera::new());
        let err = scene.add_sphere(Vec3::ZERO, 1.0, MaterialId(0)).unwrap_err();

        assert_eq!(err, SceneError::UnknownMaterial(MaterialId(0), 0));
        assert!(scene.primitives().is_empty());
    }

    #[test]
    fn test_shared_material_handles() {
        let mut scene = Scene::new(Camera::new());
        let shared = scene.add_material(Diffuse::new(Color::ONE));
        scene.add_sphere(Vec3::new(-2.0, 0.0, -5.0), 1.0, shared).unwrap();
        scene.add_sphere(Vec3::new(2.0, 0.0, -5.0), 1.0, shared).unwrap();

        assert_eq!(scene.materials().len(), 1);
        assert_eq!(scene.primitives().len(), 2);
        assert!(scene
            .primitives()
            .iter()
            .all(|primitive| primitive.material() == shared));
    }

    #[test]
    fn test_point_on_light_stays_finite() {
        let mut scene = scene_with_light();
        let diffuse = scene.add_material(Diffuse::new(Color::ONE));
        scene.add_sphere(Vec3::new(0.0, 2.5, 0.0), 0.5, diffuse).unwrap();

        let direct = scene.direct_illumination(LIGHT_POSITION, Vec3::Y);
        assert!(direct.is_finite());
        assert_eq!(direct, Color::new(0.0, 0.0, 0.0, 1.0));
    }
}

//! Built-in demo scene exercising every material.

use anyhow::Result;
use glint_math::Vec3;
use glint_renderer::{
    Camera, Checkerboard, Color, Dielectric, Diffuse, Glossy, Mirror, PointLight, Scene,
    TriangleMesh,
};

/// Three glossy spheres and a hollow glass ball on a large floor sphere,
/// with a mirror ball and a checkerboard wall behind them.
pub fn build() -> Result<Scene> {
    let camera = Camera::new()
        .with_position(
            Vec3::new(0.0, 1.0, 2.0),  // look_from
            Vec3::new(0.0, 0.5, -6.0), // look_at
            Vec3::Y,                   // up
        )
        .with_lens(45.0, 1.0);
    let mut scene = Scene::new(camera);

    let floor = scene.add_material(Diffuse::new(Color::new(0.6, 0.6, 0.2, 1.0)));
    let red = scene.add_material(Glossy::with_specularity(Color::new(0.8, 0.1, 0.1, 1.0), 0.1));
    let green = scene.add_material(Glossy::with_specularity(Color::new(0.1, 0.8, 0.1, 1.0), 0.1));
    let blue = scene.add_material(Glossy::with_specularity(Color::new(0.1, 0.0, 0.8, 1.0), 0.1));
    let glass = scene.add_material(Dielectric::new(1.5).with_absorption(0.1));
    // Inner surface of the glass shell: air relative to glass
    let air = scene.add_material(Dielectric::new(1.0 / 1.5));
    let mirror = scene.add_material(Mirror::new(Color::new(0.9, 0.9, 0.9, 1.0)));
    let checker = scene.add_material(Checkerboard::new(
        Color::new(0.9, 0.9, 0.9, 1.0),
        Color::new(0.1, 0.1, 0.1, 1.0),
        8.0,
    ));

    scene.add_sphere(Vec3::new(-2.0, 0.5, -6.0), 1.0, green)?;
    scene.add_sphere(Vec3::new(2.0, 0.5, -6.0), 1.0, red)?;
    scene.add_sphere(Vec3::new(0.0, 1.0, -10.0), 1.0, blue)?;
    scene.add_sphere(Vec3::new(0.0, -100.0, -15.0), 100.0, floor)?;

    scene.add_sphere(Vec3::new(-2.0, 0.5, -4.0), 1.0, glass)?;
    scene.add_sphere(Vec3::new(-2.0, 0.5, -4.0), 0.95, air)?;

    scene.add_sphere(Vec3::new(1.5, 0.6, -3.5), 0.6, mirror)?;

    scene.add_mesh(TriangleMesh::quad(
        [
            Vec3::new(-8.0, -0.5, -14.0),
            Vec3::new(8.0, -0.5, -14.0),
            Vec3::new(8.0, 7.5, -14.0),
            Vec3::new(-8.0, 7.5, -14.0),
        ],
        checker,
    ))?;

    scene.add_light(PointLight::new(Vec3::new(0.0, 4.0, -5.0), Color::splat(40.0)));
    scene.add_light(PointLight::new(Vec3::new(3.0, 6.0, 0.0), Color::splat(80.0)));

    log::info!(
        "Demo scene: {} primitives, {} materials, {} lights",
        scene.primitives().len(),
        scene.materials().len(),
        scene.lights().len()
    );

    Ok(scene)
}

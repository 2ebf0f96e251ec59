//! Built-in scenes

use super::SceneBuilder;
use core::error::*;
use core::geometry::*;
use core::material::*;
use core::pbrt::*;
use core::scene::*;
use core::shape::*;
use core::spectrum::*;
use lights::*;
use materials::*;
use shapes::*;
use std::sync::Arc;

/// Names of the built-in scenes.
pub const SCENE_NAMES: [&str; 7] = ["cornell", "floor", "mirror", "blocker", "point", "sun", "mixture"];

/// Returns a built-in scene.
///
/// * `name`   - Scene name. See `SCENE_NAMES`.
/// * `aspect` - Aspect ratio of the image (width / height).
pub fn canned_scene(name: &str, aspect: Float) -> Result<Scene> {
    let mut builder = SceneBuilder::new();
    match name {
        "cornell" => cornell_box(&mut builder, aspect),
        "floor" => floor(&mut builder, aspect),
        "mirror" => mirror(&mut builder, aspect),
        "blocker" => blocker(&mut builder, aspect),
        "point" => point(&mut builder, aspect),
        "sun" => sun(&mut builder, aspect),
        "mixture" => mixture(&mut builder, aspect),
        _ => return Err(RenderError::UnknownScene(name.to_owned())),
    };
    info!("Loaded scene '{name}'");
    Ok(builder.world_end())
}

fn quad(p: (Float, Float, Float), e1: (Float, Float, Float), e2: (Float, Float, Float)) -> ArcShape {
    Arc::new(Quad::new(
        Point3f::new(p.0, p.1, p.2),
        Vector3f::new(e1.0, e1.1, e1.2),
        Vector3f::new(e2.0, e2.1, e2.2),
    ))
}

fn diffuse(r: Float, g: Float, b: Float) -> ArcMaterial {
    Arc::new(DiffuseMaterial::new(Spectrum::from_rgb(r, g, b)))
}

fn grey() -> ArcMaterial {
    diffuse(0.75, 0.75, 0.75)
}

/// Floor facing up spanning [-h, h] in x and z at y = 0.
fn add_floor(builder: &mut SceneBuilder, h: Float) {
    builder.shape(quad((-h, 0.0, -h), (0.0, 0.0, 2.0 * h), (2.0 * h, 0.0, 0.0)));
}

/// Square area light facing down centred above the origin.
fn add_ceiling_light(builder: &mut SceneBuilder, y: Float, h: Float, l_emit: Spectrum) {
    builder
        .attribute_begin()
        .area_light_source(l_emit)
        .shape(quad((-h, y, -h), (2.0 * h, 0.0, 0.0), (0.0, 0.0, 2.0 * h)))
        .attribute_end();
}

fn cornell_box(builder: &mut SceneBuilder, aspect: Float) {
    builder.material(grey());
    add_floor(builder, 1.0);
    // Ceiling
    builder.shape(quad((-1.0, 2.0, -1.0), (2.0, 0.0, 0.0), (0.0, 0.0, 2.0)));
    // Back wall
    builder.shape(quad((-1.0, 0.0, -1.0), (2.0, 0.0, 0.0), (0.0, 2.0, 0.0)));

    builder
        .attribute_begin()
        .material(diffuse(0.63, 0.065, 0.05))
        .shape(quad((-1.0, 0.0, -1.0), (0.0, 2.0, 0.0), (0.0, 0.0, 2.0)))
        .material(diffuse(0.14, 0.45, 0.091))
        .shape(quad((1.0, 0.0, -1.0), (0.0, 0.0, 2.0), (0.0, 2.0, 0.0)))
        .attribute_end();

    add_ceiling_light(builder, 1.98, 0.25, Spectrum::new(17.0));
    builder.look_at(
        Point3f::new(0.0, 1.0, 3.5),
        Point3f::new(0.0, 1.0, 0.0),
        Vector3f::new(0.0, 1.0, 0.0),
        40.0,
        aspect,
    );
}

fn floor(builder: &mut SceneBuilder, aspect: Float) {
    builder.material(grey());
    add_floor(builder, 2.0);
    add_ceiling_light(builder, 1.0, 0.25, Spectrum::new(10.0));
    builder.look_at(
        Point3f::new(0.0, 1.5, 3.0),
        Point3f::new(0.0, 0.0, 0.0),
        Vector3f::new(0.0, 1.0, 0.0),
        45.0,
        aspect,
    );
}

fn mirror(builder: &mut SceneBuilder, aspect: Float) {
    builder.material(grey());
    add_floor(builder, 2.0);
    builder
        .attribute_begin()
        .material(Arc::new(MirrorMaterial::new(Spectrum::new(0.9))))
        .shape(quad((-1.5, 0.0, -1.0), (3.0, 0.0, 0.0), (0.0, 2.0, 0.0)))
        .attribute_end();
    add_ceiling_light(builder, 1.5, 0.25, Spectrum::new(10.0));
    builder.look_at(
        Point3f::new(0.0, 1.0, 3.0),
        Point3f::new(0.0, 0.5, 0.0),
        Vector3f::new(0.0, 1.0, 0.0),
        45.0,
        aspect,
    );
}

/// A blocker hangs between the light and the floor. Floor points with |x| and
/// |z| below 2.5 are fully shadowed; the camera looks at them from below the
/// blocker.
fn blocker(builder: &mut SceneBuilder, aspect: Float) {
    builder.material(grey());
    add_floor(builder, 4.0);
    builder.shape(quad((-1.0, 1.0, -1.0), (2.0, 0.0, 0.0), (0.0, 0.0, 2.0)));
    add_ceiling_light(builder, 1.5, 0.25, Spectrum::new(10.0));
    builder.look_at(
        Point3f::new(0.0, 0.5, 0.5),
        Point3f::new(0.0, 0.0, -0.5),
        Vector3f::new(0.0, 1.0, 0.0),
        60.0,
        aspect,
    );
}

fn point(builder: &mut SceneBuilder, aspect: Float) {
    builder.material(grey());
    add_floor(builder, 2.0);
    builder.shape(quad((-2.0, 0.0, -1.0), (4.0, 0.0, 0.0), (0.0, 2.0, 0.0)));
    builder.light_source(Arc::new(PointLight::new(Point3f::new(0.0, 1.5, 0.0), Spectrum::new(5.0))));
    builder.look_at(
        Point3f::new(0.0, 1.0, 3.0),
        Point3f::new(0.0, 0.5, 0.0),
        Vector3f::new(0.0, 1.0, 0.0),
        45.0,
        aspect,
    );
}

fn sun(builder: &mut SceneBuilder, aspect: Float) {
    builder.material(grey());
    add_floor(builder, 2.0);
    builder.shape(quad((-2.0, 0.0, -1.0), (4.0, 0.0, 0.0), (0.0, 2.0, 0.0)));
    builder.light_source(Arc::new(DistantLight::new(
        Spectrum::new(3.0),
        Vector3f::new(0.3, -1.0, -0.5).normalize(),
    )));
    builder.look_at(
        Point3f::new(0.0, 1.0, 3.0),
        Point3f::new(0.0, 0.5, 0.0),
        Vector3f::new(0.0, 1.0, 0.0),
        45.0,
        aspect,
    );
}

fn mixture(builder: &mut SceneBuilder, aspect: Float) {
    let glossy: ArcMaterial = Arc::new(MixtureMaterial::new(vec![
        (grey(), 0.7),
        (Arc::new(MirrorMaterial::new(Spectrum::ONE)) as ArcMaterial, 0.3),
    ]));
    builder.material(glossy);
    add_floor(builder, 2.0);
    builder.material(grey());
    builder.shape(quad((-2.0, 0.0, -1.0), (4.0, 0.0, 0.0), (0.0, 2.0, 0.0)));
    add_ceiling_light(builder, 1.5, 0.25, Spectrum::new(10.0));
    builder.look_at(
        Point3f::new(0.0, 1.0, 3.0),
        Point3f::new(0.0, 0.5, 0.0),
        Vector3f::new(0.0, 1.0, 0.0),
        45.0,
        aspect,
    );
}

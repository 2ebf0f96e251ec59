//! The API

#[macro_use]
extern crate log;

mod graphics_state;
mod scenes;

use cameras::*;
use core::camera::*;
use core::geometry::*;
use core::light::*;
use core::material::*;
use core::pbrt::*;
use core::scene::*;
use core::shape::*;
use core::spectrum::*;
use graphics_state::*;
use lights::*;
use std::sync::Arc;

pub use scenes::*;

/// Builds a scene one primitive at a time, in the spirit of a scene
/// description file: attributes such as the current material apply to every
/// shape defined after them.
#[derive(Default)]
pub struct SceneBuilder {
    /// Current graphics state.
    graphics_state: GraphicsState,

    /// Saved graphics states.
    pushed_graphics_states: Vec<GraphicsState>,

    /// Primitives defined so far.
    primitives: Vec<Primitive>,
}

impl SceneBuilder {
    /// Returns a new empty `SceneBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Save the current graphics state.
    pub fn attribute_begin(&mut self) -> &mut Self {
        self.pushed_graphics_states.push(self.graphics_state.clone());
        self
    }

    /// Restore the last saved graphics state.
    pub fn attribute_end(&mut self) -> &mut Self {
        if let Some(graphics_state) = self.pushed_graphics_states.pop() {
            self.graphics_state = graphics_state;
        } else {
            error!("Unmatched attribute_end() encountered. Ignoring it.");
        }
        self
    }

    /// Set the material of the shapes that follow.
    ///
    /// * `material` - The material.
    pub fn material(&mut self, material: ArcMaterial) -> &mut Self {
        self.graphics_state.current_material = Some(material);
        self
    }

    /// Make the shapes that follow emit light.
    ///
    /// * `l_emit` - Emitted radiance.
    pub fn area_light_source(&mut self, l_emit: Spectrum) -> &mut Self {
        self.graphics_state.area_light = Some(l_emit);
        self
    }

    /// Define a shape using the current material and area light.
    ///
    /// * `shape` - The shape.
    pub fn shape(&mut self, shape: ArcShape) -> &mut Self {
        let light = self.graphics_state.area_light.map(|l_emit| {
            let light: ArcLight = Arc::new(DiffuseAreaLight::new(l_emit, Arc::clone(&shape)));
            light
        });
        self.primitives.push(Primitive {
            shape: Some(shape),
            material: self.graphics_state.current_material.clone(),
            light,
            ..Primitive::default()
        });
        self
    }

    /// Define a light source that has no geometry.
    ///
    /// * `light` - The light.
    pub fn light_source(&mut self, light: ArcLight) -> &mut Self {
        self.primitives.push(Primitive {
            light: Some(light),
            ..Primitive::default()
        });
        self
    }

    /// Define the camera. A later camera replaces an earlier one.
    ///
    /// * `camera` - The camera.
    pub fn camera(&mut self, camera: ArcCamera) -> &mut Self {
        if let Some(p) = self.primitives.iter_mut().find(|p| p.camera.is_some()) {
            warn!("Camera defined twice. Using the last one.");
            p.camera = None;
        }
        self.primitives.push(Primitive {
            camera: Some(camera),
            ..Primitive::default()
        });
        self
    }

    /// Define a pinhole camera.
    ///
    /// * `position` - Camera position.
    /// * `center`   - Point the camera looks at.
    /// * `up`       - Up vector.
    /// * `vfov`     - Vertical field of view in degrees.
    /// * `aspect`   - Aspect ratio (width / height).
    pub fn look_at(&mut self, position: Point3f, center: Point3f, up: Vector3f, vfov: Float, aspect: Float) -> &mut Self {
        self.camera(Arc::new(PinholeCamera::new(position, center, up, vfov, aspect)))
    }

    /// Finish the scene.
    pub fn world_end(&mut self) -> Scene {
        if !self.pushed_graphics_states.is_empty() {
            warn!("Missing end to attribute_begin()");
            self.pushed_graphics_states.clear();
        }
        let primitives = std::mem::take(&mut self.primitives);
        self.graphics_state = GraphicsState::default();
        Scene::new(primitives)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use materials::*;
    use shapes::*;

    fn unit_quad(y: Float) -> ArcShape {
        Arc::new(Quad::new(
            Point3f::new(-0.5, y, -0.5),
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(1.0, 0.0, 0.0),
        ))
    }

    #[test]
    fn attributes_are_scoped() {
        let mut builder = SceneBuilder::new();
        builder
            .material(Arc::new(DiffuseMaterial::new(Spectrum::new(0.5))))
            .attribute_begin()
            .area_light_source(Spectrum::ONE)
            .shape(unit_quad(1.0))
            .attribute_end()
            .shape(unit_quad(0.0))
            .look_at(
                Point3f::new(0.0, 0.5, 2.0),
                Point3f::new(0.0, 0.5, 0.0),
                Vector3f::new(0.0, 1.0, 0.0),
                45.0,
                1.0,
            );
        let scene = builder.world_end();

        assert_eq!(scene.primitive_count(), 3);
        assert!(scene.primitive(0).light.is_some());
        assert!(scene.primitive(0).material.is_some());
        assert!(scene.primitive(1).light.is_none());
        assert!(scene.primitive(1).material.is_some());
        assert!(scene.require_renderable().is_ok());
    }

    #[test]
    fn scene_without_lights_is_not_renderable() {
        let mut builder = SceneBuilder::new();
        builder.shape(unit_quad(0.0)).look_at(
            Point3f::new(0.0, 0.5, 2.0),
            Point3f::new(0.0, 0.5, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            45.0,
            1.0,
        );
        assert!(builder.world_end().require_renderable().is_err());
    }
}

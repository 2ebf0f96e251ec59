//! Scene

use crate::camera::*;
use crate::error::*;
use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::material::*;
use crate::medium::*;
use crate::pbrt::*;
use crate::rng::RNG;
use crate::sampling::*;
use crate::shape::*;
use crate::spectrum::*;

/// An element of the scene. Any combination of roles is allowed, e.g. a
/// quad with a diffuse material that also emits light.
#[derive(Clone, Default)]
pub struct Primitive {
    /// Geometry that rays can hit.
    pub shape: Option<ArcShape>,

    /// Surface scattering.
    pub material: Option<ArcMaterial>,

    /// Emission.
    pub light: Option<ArcLight>,

    /// Importance emission.
    pub camera: Option<ArcCamera>,

    /// Volume scattering.
    pub phase: Option<ArcPhaseFunction>,
}

/// A primary ray sampled from a path endpoint.
#[derive(Copy, Clone, Debug)]
pub struct PrimaryRaySample {
    /// The endpoint.
    pub sp: SceneInteraction,

    /// Outgoing direction.
    pub wo: Vector3f,

    /// Throughput weight including the endpoint selection probability.
    pub weight: Spectrum,
}

/// Scene.
pub struct Scene {
    /// All primitives.
    primitives: Vec<Primitive>,

    /// Primitive indices of the light sources.
    lights: Vec<usize>,

    /// Maps a primitive index to its slot in `lights`.
    light_slots: Vec<Option<usize>>,

    /// Light selection distribution.
    light_distrib: DiscreteDistribution,

    /// Primitive index of the camera.
    camera: Option<usize>,

    /// The bounding box of the scene geometry.
    world_bound: Bounds3f,
}

impl Scene {
    /// Creates a new `Scene` and preprocesses its lights.
    ///
    /// * `primitives` - All primitives.
    pub fn new(primitives: Vec<Primitive>) -> Self {
        let world_bound = primitives
            .iter()
            .filter_map(|p| p.shape.as_ref())
            .fold(Bounds3f::empty(), |b, s| b.union(&s.bounds()));

        let lights: Vec<usize> = primitives
            .iter()
            .enumerate()
            .filter(|(_, p)| p.light.is_some())
            .map(|(i, _)| i)
            .collect();

        let mut light_slots = vec![None; primitives.len()];
        for (slot, &i) in lights.iter().enumerate() {
            light_slots[i] = Some(slot);
        }

        let camera = primitives.iter().position(|p| p.camera.is_some());

        let sphere = world_bound.bounding_sphere();
        for light in primitives.iter().filter_map(|p| p.light.as_ref()) {
            light.preprocess(&sphere);
        }

        debug!(
            "Scene with {} primitives, {} lights, camera {:?}",
            primitives.len(),
            lights.len(),
            camera
        );

        Self {
            light_distrib: DiscreteDistribution::uniform(lights.len()),
            primitives,
            lights,
            light_slots,
            camera,
            world_bound,
        }
    }

    /// Checks that the scene can be rendered.
    pub fn require_renderable(&self) -> Result<()> {
        if self.camera.is_none() {
            return Err(RenderError::NoCamera);
        }
        if !self.primitives.iter().any(|p| p.shape.is_some()) {
            return Err(RenderError::NoPrimitives);
        }
        if self.lights.is_empty() {
            return Err(RenderError::NoLights);
        }
        Ok(())
    }

    /// Returns the primitive at the given index.
    ///
    /// * `index` - Primitive index.
    pub fn primitive(&self, index: usize) -> &Primitive {
        &self.primitives[index]
    }

    /// Returns the number of primitives.
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    /// Returns the bounding box of the scene geometry.
    pub fn world_bound(&self) -> Bounds3f {
        self.world_bound
    }

    /// Returns the camera.
    pub fn camera(&self) -> Option<&ArcCamera> {
        self.camera.and_then(|i| self.primitives[i].camera.as_ref())
    }

    /// Traces the ray into the scene and returns the nearest surface
    /// interaction.
    ///
    /// * `ray` - The ray to trace.
    pub fn intersect(&self, ray: &Ray) -> Option<SceneInteraction> {
        self.intersect_range(ray, SHADOW_EPSILON, INFINITY)
    }

    /// Returns the nearest surface interaction with t in (t_min, t_max).
    ///
    /// * `ray`   - The ray to trace.
    /// * `t_min` - Minimum ray parameter.
    /// * `t_max` - Maximum ray parameter.
    fn intersect_range(&self, ray: &Ray, t_min: Float, t_max: Float) -> Option<SceneInteraction> {
        let mut nearest: Option<(usize, ShapeHit)> = None;
        for (i, primitive) in self.primitives.iter().enumerate() {
            let Some(shape) = &primitive.shape else {
                continue;
            };
            let t_far = nearest.as_ref().map_or(t_max, |(_, h)| h.t);
            if let Some(hit) = shape.intersect(ray, t_min, t_far) {
                nearest = Some((i, hit));
            }
        }
        nearest.map(|(i, hit)| SceneInteraction::surface(i, hit.geom))
    }

    /// Returns true if nothing blocks the segment between two points.
    ///
    /// * `a` - First point.
    /// * `b` - Second point.
    pub fn visible(&self, a: &SceneInteraction, b: &SceneInteraction) -> bool {
        let (ga, gb) = (&a.geom, &b.geom);
        match (ga.is_infinite(), gb.is_infinite()) {
            (true, true) => false,
            (true, false) => self.intersect(&Ray::new(gb.p(), -direction(ga, gb))).is_none(),
            (false, true) => self.intersect(&Ray::new(ga.p(), direction(ga, gb))).is_none(),
            (false, false) => {
                let d = gb.p() - ga.p();
                let dist = d.length();
                if dist == 0.0 {
                    return true;
                }
                let ray = Ray::new(ga.p(), d / dist);
                self.intersect_range(&ray, SHADOW_EPSILON, dist * (1.0 - SHADOW_EPSILON))
                    .is_none()
            }
        }
    }

    /// Returns the light selection probability for the light on a primitive.
    ///
    /// * `primitive` - Primitive index.
    fn light_selection_pdf(&self, primitive: usize) -> Float {
        self.light_slots[primitive].map_or(0.0, |slot| self.light_distrib.pmf(slot))
    }

    /// Samples a primary ray from the camera (`EL`) or from a light (`LE`).
    ///
    /// * `rng`       - Random number generator.
    /// * `trans_dir` - Transport direction of the subpath.
    pub fn sample_primary_ray(&self, rng: &mut RNG, trans_dir: TransDir) -> Option<PrimaryRaySample> {
        match trans_dir {
            TransDir::EL => {
                let index = self.camera?;
                let camera = self.primitives[index].camera.as_ref()?;
                let s = camera.sample_ray(&rng.uniform_point2())?;
                Some(PrimaryRaySample {
                    sp: SceneInteraction::camera_endpoint(index, s.geom),
                    wo: s.wo,
                    weight: s.weight,
                })
            }
            TransDir::LE => {
                if self.lights.is_empty() {
                    return None;
                }
                let slot = self.light_distrib.sample(rng.uniform_float());
                let index = self.lights[slot];
                let p_sel = self.light_distrib.pmf(slot);
                let light = self.primitives[index].light.as_ref()?;
                let u_pos = rng.uniform_point2();
                let u_dir = rng.uniform_point2();
                let s = light.sample_ray(&u_pos, &u_dir)?;
                Some(PrimaryRaySample {
                    sp: SceneInteraction::light_endpoint(index, s.geom),
                    wo: s.wo,
                    weight: s.weight / p_sel,
                })
            }
        }
    }

    /// Returns the density of `sample_primary_ray()` producing an endpoint
    /// and direction.
    ///
    /// * `sp`         - The endpoint.
    /// * `wo`         - Outgoing direction.
    /// * `eval_delta` - Evaluate delta components as distributions.
    pub fn pdf_primary_ray(&self, sp: &SceneInteraction, wo: &Vector3f, eval_delta: bool) -> Float {
        let primitive = &self.primitives[sp.primitive];
        match sp.kind {
            InteractionKind::CameraEndpoint => primitive
                .camera
                .as_ref()
                .map_or(0.0, |c| c.pdf_ray(&sp.geom, wo)),
            InteractionKind::LightEndpoint => primitive.light.as_ref().map_or(0.0, |l| {
                self.light_selection_pdf(sp.primitive) * l.pdf_ray(&sp.geom, wo, eval_delta)
            }),
            InteractionKind::Surface | InteractionKind::Medium => 0.0,
        }
    }

    /// Returns the positional density of an endpoint including the endpoint
    /// selection probability.
    ///
    /// * `sp` - The endpoint.
    pub fn pdf_position(&self, sp: &SceneInteraction) -> Float {
        let primitive = &self.primitives[sp.primitive];
        match sp.kind {
            InteractionKind::CameraEndpoint => primitive
                .camera
                .as_ref()
                .map_or(0.0, |c| c.pdf_position(&sp.geom)),
            InteractionKind::LightEndpoint => primitive.light.as_ref().map_or(0.0, |l| {
                self.light_selection_pdf(sp.primitive) * l.pdf_position(&sp.geom)
            }),
            InteractionKind::Surface | InteractionKind::Medium => 0.0,
        }
    }

    /// Selects a scattering component at an interaction.
    ///
    /// * `rng` - Random number generator.
    /// * `sp`  - The interaction.
    pub fn sample_component(&self, rng: &mut RNG, sp: &SceneInteraction) -> ComponentSample {
        match sp.kind {
            InteractionKind::Surface => match &self.primitives[sp.primitive].material {
                Some(material) => material.sample_component(rng.uniform_float(), &sp.geom),
                None => ComponentSample::SINGLE,
            },
            InteractionKind::Medium
            | InteractionKind::CameraEndpoint
            | InteractionKind::LightEndpoint => ComponentSample::SINGLE,
        }
    }

    /// Returns the probability of the component selected at an interaction.
    ///
    /// * `sp` - The interaction.
    pub fn pdf_component(&self, sp: &SceneInteraction) -> Float {
        match sp.kind {
            InteractionKind::Surface => self.primitives[sp.primitive]
                .material
                .as_ref()
                .map_or(1.0, |m| m.pdf_component(sp.comp, &sp.geom)),
            InteractionKind::Medium
            | InteractionKind::CameraEndpoint
            | InteractionKind::LightEndpoint => 1.0,
        }
    }

    /// Samples an outgoing direction at a scattering interaction.
    ///
    /// * `rng`       - Random number generator.
    /// * `sp`        - The interaction.
    /// * `wi`        - Incident direction.
    /// * `trans_dir` - Transport direction.
    pub fn sample_direction(
        &self,
        rng: &mut RNG,
        sp: &SceneInteraction,
        wi: &Vector3f,
        trans_dir: TransDir,
    ) -> Option<DirectionSample> {
        let primitive = &self.primitives[sp.primitive];
        match sp.kind {
            InteractionKind::Surface => {
                let material = primitive.material.as_ref()?;
                material.sample_direction(&rng.uniform_point2(), &sp.geom, wi, sp.comp, trans_dir)
            }
            InteractionKind::Medium => {
                let phase = primitive.phase.as_ref()?;
                let wo = phase.sample_p(wi, &rng.uniform_point2());
                Some(DirectionSample::new(wo, Spectrum::ONE))
            }
            InteractionKind::CameraEndpoint | InteractionKind::LightEndpoint => None,
        }
    }

    /// Returns the directional density of sampling `wo` at an interaction
    /// given `wi`. Endpoints ignore `wi`.
    ///
    /// * `sp`         - The interaction.
    /// * `wi`         - Incident direction.
    /// * `wo`         - Outgoing direction.
    /// * `eval_delta` - Evaluate delta components as distributions.
    pub fn pdf_direction(
        &self,
        sp: &SceneInteraction,
        wi: &Vector3f,
        wo: &Vector3f,
        eval_delta: bool,
    ) -> Float {
        let primitive = &self.primitives[sp.primitive];
        match sp.kind {
            InteractionKind::Surface => primitive
                .material
                .as_ref()
                .map_or(0.0, |m| m.pdf_direction(&sp.geom, wi, wo, sp.comp, eval_delta)),
            InteractionKind::Medium => primitive.phase.as_ref().map_or(0.0, |p| p.p(wi, wo)),
            InteractionKind::CameraEndpoint => primitive
                .camera
                .as_ref()
                .map_or(0.0, |c| c.pdf_direction(&sp.geom, wo)),
            InteractionKind::LightEndpoint => primitive
                .light
                .as_ref()
                .map_or(0.0, |l| l.pdf_direction(&sp.geom, wo)),
        }
    }

    /// Evaluates the scattering value at an interaction, or the emitted
    /// radiance/importance at an endpoint (which ignores `wi`).
    ///
    /// * `sp`         - The interaction.
    /// * `wi`         - Incident direction.
    /// * `wo`         - Outgoing direction.
    /// * `trans_dir`  - Transport direction.
    /// * `eval_delta` - Evaluate delta components as distributions.
    pub fn eval_contrb_direction(
        &self,
        sp: &SceneInteraction,
        wi: &Vector3f,
        wo: &Vector3f,
        trans_dir: TransDir,
        eval_delta: bool,
    ) -> Spectrum {
        let primitive = &self.primitives[sp.primitive];
        match sp.kind {
            InteractionKind::Surface => primitive.material.as_ref().map_or(Spectrum::ZERO, |m| {
                m.eval(&sp.geom, wi, wo, sp.comp, trans_dir, eval_delta)
            }),
            InteractionKind::Medium => primitive
                .phase
                .as_ref()
                .map_or(Spectrum::ZERO, |p| Spectrum::new(p.p(wi, wo))),
            InteractionKind::CameraEndpoint => primitive
                .camera
                .as_ref()
                .map_or(Spectrum::ZERO, |c| c.eval(&sp.geom, wo, eval_delta)),
            InteractionKind::LightEndpoint => primitive
                .light
                .as_ref()
                .map_or(Spectrum::ZERO, |l| l.eval(&sp.geom, wo, eval_delta)),
        }
    }

    /// Returns true if the selected component at an interaction is specular.
    ///
    /// * `sp` - The interaction.
    pub fn is_specular_component(&self, sp: &SceneInteraction) -> bool {
        let primitive = &self.primitives[sp.primitive];
        match sp.kind {
            InteractionKind::Surface => primitive
                .material
                .as_ref()
                .map_or(false, |m| m.is_specular_component(sp.comp)),
            InteractionKind::Medium => false,
            InteractionKind::CameraEndpoint => {
                primitive.camera.as_ref().map_or(false, |c| c.is_specular())
            }
            InteractionKind::LightEndpoint => {
                primitive.light.as_ref().map_or(false, |l| l.is_specular())
            }
        }
    }

    /// Returns true if an endpoint supports direct connection.
    ///
    /// * `sp` - The endpoint.
    pub fn is_connectable_endpoint(&self, sp: &SceneInteraction) -> bool {
        let primitive = &self.primitives[sp.primitive];
        match sp.kind {
            InteractionKind::CameraEndpoint => primitive
                .camera
                .as_ref()
                .map_or(false, |c| c.is_connectable(&sp.geom)),
            InteractionKind::LightEndpoint => primitive
                .light
                .as_ref()
                .map_or(false, |l| l.is_connectable(&sp.geom)),
            InteractionKind::Surface | InteractionKind::Medium => true,
        }
    }

    /// Returns true if the interaction lies on a light source.
    ///
    /// * `sp` - The interaction.
    pub fn is_light(&self, sp: &SceneInteraction) -> bool {
        self.primitives[sp.primitive].light.is_some()
    }

    /// Returns true if the interaction lies on the camera.
    ///
    /// * `sp` - The interaction.
    pub fn is_camera(&self, sp: &SceneInteraction) -> bool {
        self.primitives[sp.primitive].camera.is_some()
    }

    /// Maps a direction leaving the camera to a raster position.
    ///
    /// * `wo` - Direction leaving the camera.
    pub fn raster_position(&self, wo: &Vector3f) -> Option<Point2f> {
        self.camera()?.raster_position(wo)
    }
}

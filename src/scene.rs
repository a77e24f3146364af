//! Scene description and its YAML config

use std::path::Path;

use crate::{
    cameras::{Camera, CameraConfig},
    lights::{self, Light, LightConfig, SurfacePoint},
    objects::{HittableList, Sphere, SphereConfig},
    utils::SerdeVector,
    Color, Error, Point, Vec3,
};
use serde::{Deserialize, Serialize};

/// Offset along shadow rays that keeps a surface from shadowing itself
pub const DEFAULT_SHADOW_BIAS: f64 = 1e-3;

fn default_shadow_bias() -> f64 {
    DEFAULT_SHADOW_BIAS
}

/// Scene Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    #[serde(default = "default_background")]
    pub background: SerdeVector,
    #[serde(default = "default_shadow_bias")]
    pub shadow_bias: f64,
    #[serde(default)]
    pub objects: Vec<SphereConfig>,
    #[serde(default)]
    pub lights: Vec<LightConfig>,
}

fn default_background() -> SerdeVector {
    SerdeVector(0.0, 0.0, 0.0)
}

/// Everything a render reads. Built once, never mutated while rendering.
#[derive(Debug, Clone)]
pub struct Scene {
    pub camera: Camera,
    pub objects: HittableList,
    pub lights: Vec<Light>,
    pub background: Color,
    pub shadow_bias: f64,
}
impl Scene {
    pub fn new(
        camera: Camera,
        objects: HittableList,
        lights: Vec<Light>,
        background: Color,
    ) -> Self {
        Self {
            camera,
            objects,
            lights,
            background,
            shadow_bias: DEFAULT_SHADOW_BIAS,
        }
    }

    pub fn with_shadow_bias(mut self, shadow_bias: f64) -> Self {
        self.shadow_bias = shadow_bias;
        self
    }

    pub fn from_config(config: SceneConfig) -> Result<Self, Error> {
        if !(config.shadow_bias.is_finite() && config.shadow_bias > 0.0) {
            return Err(Error::InvalidScene(format!(
                "shadow bias must be positive, got {}",
                config.shadow_bias
            )));
        }
        let scene = Self::new(
            Camera::from_config(config.camera)?,
            HittableList::from_config(config.objects)?,
            config.lights.into_iter().map(Light::from_config).collect(),
            config.background.into(),
        )
        .with_shadow_bias(config.shadow_bias);
        log::debug!(
            "Built scene with {} spheres and {} lights",
            scene.objects.len(),
            scene.lights.len()
        );
        Ok(scene)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        let config: SceneConfig = serde_yaml::from_str(yaml)?;
        Self::from_config(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        log::info!("Loading scene from {}", path.display());
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// White sphere on a huge white floor sphere, lit by dim ambient plus a green and a blue
    /// point light
    pub fn demo() -> Self {
        let white = Color::new(255.0, 255.0, 255.0);
        let mut objects = HittableList::default();
        objects.add(Sphere::new(Point::new(0.0, 0.0, 5.0), 1.0, white, Some(100.0)));
        objects.add(Sphere::new(Point::new(0.0, -5001.0, 0.0), 5000.0, white, Some(0.0)));

        let lights = vec![
            Light::Ambient {
                intensity: Vec3::new(0.1, 0.1, 0.1),
            },
            Light::Point {
                position: Point::new(2.0, 3.0, 8.0),
                intensity: Vec3::new(0.0, 0.6, 0.0),
            },
            Light::Point {
                position: Point::new(-2.0, 3.0, 8.0),
                intensity: Vec3::new(0.0, 0.0, 0.6),
            },
        ];

        Self::new(
            Camera::new(Point::zeros(), 1.0, 1.0, 1.0),
            objects,
            lights,
            Color::zeros(),
        )
    }

    /// RGB gain from every light at a surface point, with shadows cast by the scene's spheres
    pub fn compute_lighting(&self, surface: &SurfacePoint) -> Vec3 {
        lights::compute_lighting(&self.lights, &self.objects, self.shadow_bias, surface)
    }
}

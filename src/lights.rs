//! Lights and the local illumination model

use crate::{objects::Hittable, utils::SerdeVector, Point, Ray, Vec3};
use serde::{Deserialize, Serialize};

/// Light source. Intensities are per-channel RGB gains.
#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    /// Applied unconditionally: no direction, never shadowed
    Ambient { intensity: Vec3 },
    Point { position: Point, intensity: Vec3 },
    /// `direction` points toward the light and need not be unit length
    Directional { intensity: Vec3, direction: Vec3 },
}
impl Light {
    pub fn from_config(config: LightConfig) -> Self {
        match config {
            LightConfig::Ambient(c) => Light::Ambient {
                intensity: c.intensity.into(),
            },
            LightConfig::Point(c) => Light::Point {
                position: c.position.into(),
                intensity: c.intensity.into(),
            },
            LightConfig::Directional(c) => Light::Directional {
                intensity: c.intensity.into(),
                direction: c.direction.into(),
            },
        }
    }

    pub fn intensity(&self) -> &Vec3 {
        match self {
            Light::Ambient { intensity }
            | Light::Point { intensity, .. }
            | Light::Directional { intensity, .. } => intensity,
        }
    }

    /// Un-normalized vector toward the light and the shadow-ray bound along it
    ///
    /// Occluders of a point light must sit between the surface and the light, so the bound is
    /// `t = 1` on `position - point`. Directional lights are infinitely far.
    fn to_light(&self, point: &Point) -> Option<(Vec3, f64)> {
        match self {
            Light::Ambient { .. } => None,
            Light::Point { position, .. } => Some((position - point, 1.0)),
            Light::Directional { direction, .. } => Some((*direction, f64::INFINITY)),
        }
    }

    /// Gain this light adds at a surface point
    pub fn illuminate(
        &self,
        surface: &SurfacePoint,
        occluders: &impl Hittable,
        shadow_bias: f64,
    ) -> Vec3 {
        let (l, t_max) = match self.to_light(&surface.point) {
            None => return *self.intensity(),
            Some(to_light) => to_light,
        };

        // Shadows
        let shadow_ray = Ray::new(surface.point, l);
        if occluders.try_hit(&shadow_ray, shadow_bias, t_max).is_some() {
            return Vec3::zeros();
        }

        let intensity = self.intensity();
        let mut gain = Vec3::zeros();

        // Diffuse
        let n_dot_l = surface.normal.dot(&l);
        if n_dot_l > 0.0 {
            gain += intensity * (n_dot_l / (surface.normal.norm() * l.norm()));
        }

        // Specular
        if let Some(exponent) = surface.specular {
            let r = surface.normal * (2.0 * l.dot(&surface.normal)) - l;
            let r_dot_v = r.dot(&surface.view);
            if r_dot_v > 0.0 {
                gain += intensity * (r_dot_v / (r.norm() * surface.view.norm())).powf(exponent);
            }
        }
        gain
    }
}

/// Geometry of the point being shaded
#[derive(Debug, Clone)]
pub struct SurfacePoint {
    pub point: Point,
    /// Unit surface normal
    pub normal: Vec3,
    /// Toward the ray origin; only its direction matters
    pub view: Vec3,
    /// Phong exponent, `None` for diffuse-only shading
    pub specular: Option<f64>,
}

/// Sum the contribution of every light into an RGB gain, not yet applied to the surface color
pub fn compute_lighting(
    lights: &[Light],
    occluders: &impl Hittable,
    shadow_bias: f64,
    surface: &SurfacePoint,
) -> Vec3 {
    lights.iter().fold(Vec3::zeros(), |acc, light| {
        acc + light.illuminate(surface, occluders, shadow_bias)
    })
}

/// Config for lights
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LightConfig {
    Ambient(AmbientConfig),
    Point(PointConfig),
    Directional(DirectionalConfig),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbientConfig {
    pub intensity: SerdeVector,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointConfig {
    pub position: SerdeVector,
    pub intensity: SerdeVector,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionalConfig {
    pub intensity: SerdeVector,
    pub direction: SerdeVector,
}

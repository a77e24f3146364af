//! Ray Casting Library
//!
//! One primary ray per pixel, nearest sphere hit, local Phong shading with hard shadows.

use nalgebra::Vector3;

pub mod cameras;
pub mod lights;
pub mod objects;
pub mod renderer;
pub mod scene;
pub mod utils;

pub type Vec3 = Vector3<f64>;
pub type Point = Vec3;
/// RGB on a 0..255 scale, unclamped until written to a surface
pub type Color = Vec3;

/// Prelude
pub mod prelude {
    pub use crate::cameras::Camera;
    pub use crate::lights::Light;
    pub use crate::objects::{Hittable, HittableList, Sphere};
    pub use crate::renderer::{ImageSurface, RenderConfig, RenderStats, Renderer, Surface};
    pub use crate::scene::Scene;
    pub use crate::{Color, Error, Point, Ray, Vec3};
}

/// Errors raised outside the numeric core: loading scenes, validating settings, writing images
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed scene document: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid scene: {0}")]
    InvalidScene(String),
    #[error("invalid render settings: {0}")]
    InvalidRender(String),
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

/// The ray in ray casting
///
/// `dir` is not normalized: primary rays end on the viewport at `t = 1`, and point-light shadow
/// rays end on the light at `t = 1`.
#[derive(Debug, Clone)]
pub struct Ray {
    pub orig: Point,
    pub dir: Vec3,
}
impl Ray {
    pub fn new(orig: Point, dir: Vec3) -> Self {
        Self { orig, dir }
    }

    pub fn get(&self, t: f64) -> Point {
        self.orig + t * self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_get_walks_unnormalized_direction() {
        let ray = Ray::new(Point::new(1.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(ray.get(0.0), Point::new(1.0, 0.0, 0.0));
        assert_eq!(ray.get(1.5), Point::new(1.0, 3.0, 0.0));
    }

    #[test]
    fn dot_is_commutative() {
        let a = Vec3::new(1.5, -2.0, 0.25);
        let b = Vec3::new(-3.0, 4.0, 8.0);
        assert_eq!(a.dot(&b), b.dot(&a));
    }

    #[test]
    fn normalize_gives_unit_length() {
        for v in [
            Vec3::new(3.0, 4.0, 0.0),
            Vec3::new(-0.001, 0.002, 0.0005),
            Vec3::new(1e6, -2e6, 3e6),
        ] {
            approx::assert_relative_eq!(v.normalize().norm(), 1.0, epsilon = 1e-12);
        }
    }
}

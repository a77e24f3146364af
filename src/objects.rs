//! Objects
use crate::{utils::SerdeVector, Color, Error, Point, Ray, Vec3};
use serde::{Deserialize, Serialize};

/// Specular exponent value that older scene files use to mean "no highlight"
pub const SPECULAR_DISABLED: f64 = -1.0;

pub trait Hittable {
    /// Nearest hit with `t_min < t < t_max`
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<Hit<'_>>;
}

/// Represents a hit
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    /// The sphere that was hit
    pub sphere: &'a Sphere,
    /// Ray parameter of the intersection
    pub t: f64,
}

/// Brute-force collection of spheres, scanned linearly for every query
#[derive(Debug, Default, Clone)]
pub struct HittableList(pub Vec<Sphere>);
impl HittableList {
    pub fn add(&mut self, sphere: Sphere) {
        self.0.push(sphere)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sphere> {
        self.0.iter()
    }

    pub fn from_config(configs: Vec<SphereConfig>) -> Result<Self, Error> {
        let mut s = Self::default();
        for obj_cfg in configs {
            s.add(Sphere::from_config(obj_cfg)?);
        }
        Ok(s)
    }
}
impl Hittable for HittableList {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<Hit<'_>> {
        let mut closest_so_far = t_max;
        let mut hit_final = None;

        // Strict bound keeps the first sphere on exact ties
        for obj in &self.0 {
            if let Some(hit) = obj.try_hit(ray, t_min, closest_so_far) {
                closest_so_far = hit.t;
                hit_final = Some(hit)
            }
        }
        hit_final
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub center: Point,
    pub radius: f64,
    pub color: Color,
    /// Phong exponent, `None` disables the highlight
    pub specular: Option<f64>,
}
impl Sphere {
    pub fn new(center: Point, radius: f64, color: Color, specular: Option<f64>) -> Self {
        Self {
            center,
            radius,
            color,
            specular,
        }
    }

    pub fn from_config(config: SphereConfig) -> Result<Self, Error> {
        if !(config.radius.is_finite() && config.radius > 0.0) {
            return Err(Error::InvalidScene(format!(
                "sphere radius must be positive, got {}",
                config.radius
            )));
        }
        let specular = match config.specular {
            None => None,
            Some(s) if s == SPECULAR_DISABLED => None,
            Some(s) if s >= 0.0 => Some(s),
            Some(s) => {
                return Err(Error::InvalidScene(format!(
                    "specular exponent must be non-negative or {SPECULAR_DISABLED}, got {s}"
                )))
            }
        };
        Ok(Self::new(
            config.center.into(),
            config.radius,
            config.color.into(),
            specular,
        ))
    }

    /// Both roots of |orig + t * dir - center|^2 = radius^2
    ///
    /// The first root uses `+sqrt`, the second `-sqrt`; they are not ordered by magnitude.
    /// A ray whose line misses the sphere yields `(inf, inf)`.
    pub fn intersect(&self, ray: &Ray) -> (f64, f64) {
        let oc = ray.orig - self.center;
        let a = ray.dir.dot(&ray.dir);
        let b = 2.0 * oc.dot(&ray.dir);
        let c = oc.dot(&oc) - self.radius.powi(2);
        let discriminant = b.powi(2) - 4.0 * a * c;
        if discriminant < 0.0 {
            return (f64::INFINITY, f64::INFINITY);
        }

        let sqrtd = discriminant.sqrt();
        ((-b + sqrtd) / (2.0 * a), (-b - sqrtd) / (2.0 * a))
    }

    /// Outward unit normal at a surface point, `None` when `p` sits on the center
    pub fn normal_at(&self, p: &Point) -> Option<Vec3> {
        let outward = p - self.center;
        let len = outward.norm();
        if len > 0.0 && len.is_finite() {
            Some(outward / len)
        } else {
            None
        }
    }
}
impl Hittable for Sphere {
    fn try_hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<Hit<'_>> {
        let (t1, t2) = self.intersect(ray);
        let mut closest = None;
        for t in [t1, t2] {
            if t > t_min && t < t_max && closest.map_or(true, |c| t < c) {
                closest = Some(t);
            }
        }
        closest.map(|t| Hit { sphere: self, t })
    }
}

/// Sphere config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SphereConfig {
    pub center: SerdeVector,
    pub radius: f64,
    pub color: SerdeVector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specular: Option<f64>,
}

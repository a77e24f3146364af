//! Cameras and configs for cameras
use crate::utils::SerdeVector;
use crate::{Error, Point, Ray, Vec3};
use serde::{Deserialize, Serialize};

/// Camera Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    pub position: SerdeVector,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub projection_distance: f64,
}

/// Fixed camera looking down +z through a viewport `projection_distance` ahead
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub projection_distance: f64,
}
impl Camera {
    pub fn new(
        position: Point,
        viewport_width: f64,
        viewport_height: f64,
        projection_distance: f64,
    ) -> Self {
        Self {
            position,
            viewport_width,
            viewport_height,
            projection_distance,
        }
    }

    pub fn from_config(config: CameraConfig) -> Result<Self, Error> {
        let camera = Self::new(
            config.position.into(),
            config.viewport_width,
            config.viewport_height,
            config.projection_distance,
        );
        camera.validate()?;
        Ok(camera)
    }

    fn validate(&self) -> Result<(), Error> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.viewport_width) || !positive(self.viewport_height) {
            return Err(Error::InvalidScene(format!(
                "viewport must be positive, got {}x{}",
                self.viewport_width, self.viewport_height
            )));
        }
        if !positive(self.projection_distance) {
            return Err(Error::InvalidScene(format!(
                "projection distance must be positive, got {}",
                self.projection_distance
            )));
        }
        Ok(())
    }

    /// Direction from the camera through the viewport point under canvas pixel (x, y)
    ///
    /// Canvas rows grow downward while the viewport's up axis grows upward, hence the flip on y.
    pub fn viewport_direction(
        &self,
        canvas_x: f64,
        canvas_y: f64,
        canvas_width: f64,
        canvas_height: f64,
    ) -> Vec3 {
        Vec3::new(
            (canvas_x - canvas_width / 2.0) * self.viewport_width / canvas_width,
            -(canvas_y - canvas_height / 2.0) * self.viewport_height / canvas_height,
            self.projection_distance,
        )
    }

    /// Primary ray for a canvas pixel, originating at the camera position
    pub fn get_ray(
        &self,
        canvas_x: u32,
        canvas_y: u32,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Ray {
        Ray::new(
            self.position,
            self.viewport_direction(
                canvas_x as f64,
                canvas_y as f64,
                canvas_width as f64,
                canvas_height as f64,
            ),
        )
    }
}

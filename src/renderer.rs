//! Per-pixel ray tracing and the frame driver

use std::path::PathBuf;
use std::time::{Duration, Instant};

use image::{Rgba, RgbaImage};

use crate::{lights::SurfacePoint, objects::Hittable, scene::Scene, utils, Color, Error, Ray};

/// Color seen along a ray: the nearest sphere lit by the scene, or the background on a miss
pub fn trace_ray(scene: &Scene, ray: &Ray, t_min: f64, t_max: f64) -> Color {
    shade(scene, ray, t_min, t_max).or_background(scene.background)
}

enum Shade {
    Miss,
    Surface(Color),
    /// Hit landed on a sphere center, so there is no normal to shade with
    Degenerate,
}
impl Shade {
    fn or_background(self, background: Color) -> Color {
        match self {
            Shade::Surface(color) => color,
            Shade::Miss | Shade::Degenerate => background,
        }
    }
}

fn shade(scene: &Scene, ray: &Ray, t_min: f64, t_max: f64) -> Shade {
    let hit = match scene.objects.try_hit(ray, t_min, t_max) {
        Some(hit) => hit,
        None => return Shade::Miss,
    };

    let point = ray.get(hit.t);
    let normal = match hit.sphere.normal_at(&point) {
        Some(normal) => normal,
        None => return Shade::Degenerate,
    };
    let gain = scene.compute_lighting(&SurfacePoint {
        point,
        normal,
        view: -ray.dir,
        specular: hit.sphere.specular,
    });
    // Left unclamped: saturation happens when the pixel is written
    Shade::Surface(hit.sphere.color.component_mul(&gain))
}

/// Pixel buffer the renderer writes into
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Write one opaque pixel, clamping the color. Out-of-bounds coordinates are ignored and
    /// return `false`.
    fn put_pixel(&mut self, x: i64, y: i64, color: &Color) -> bool;

    /// Make the finished frame visible
    fn present(&mut self) -> Result<(), Error>;
}

/// `Surface` over an in-memory RGBA image, saved to disk on `present`
pub struct ImageSurface {
    image: RgbaImage,
    output: Option<PathBuf>,
}
impl ImageSurface {
    /// Starts fully transparent so unwritten pixels stay distinguishable
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0])),
            output: None,
        }
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}
impl Surface for ImageSurface {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn put_pixel(&mut self, x: i64, y: i64, color: &Color) -> bool {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return false;
        }
        self.image.put_pixel(x as u32, y as u32, utils::get_pixel(color));
        true
    }

    fn present(&mut self) -> Result<(), Error> {
        if let Some(path) = &self.output {
            self.image.save(path)?;
            log::info!("Wrote {}", path.display());
        }
        Ok(())
    }
}

/// Render Config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Pixel stride in both axes; 1 renders every pixel
    pub quality: u32,
}
impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 700,
            height: 700,
            quality: 1,
        }
    }
}

/// Diagnostics from one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderStats {
    pub pixels_written: u64,
    /// Hits discarded because they fell on a sphere center
    pub degenerate_hits: u64,
    pub elapsed: Duration,
}

/// Frame driver: casts one primary ray per visited pixel and writes the result
#[derive(Debug, Clone)]
pub struct Renderer {
    config: RenderConfig,
}
impl Renderer {
    pub fn new(config: RenderConfig) -> Result<Self, Error> {
        if config.width == 0 || config.height == 0 {
            return Err(Error::InvalidRender(format!(
                "canvas must be non-empty, got {}x{}",
                config.width, config.height
            )));
        }
        if config.quality == 0 {
            return Err(Error::InvalidRender("quality must be at least 1".into()));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Surface sized to this renderer's canvas
    pub fn surface(&self) -> ImageSurface {
        ImageSurface::new(self.config.width, self.config.height)
    }

    pub fn render(&self, scene: &Scene, surface: &mut impl Surface) -> Result<RenderStats, Error> {
        self.render_with_progress(scene, surface, || {})
    }

    /// Render, calling `on_column` after each scanned column
    pub fn render_with_progress(
        &self,
        scene: &Scene,
        surface: &mut impl Surface,
        mut on_column: impl FnMut(),
    ) -> Result<RenderStats, Error> {
        let RenderConfig {
            width,
            height,
            quality,
        } = self.config;
        log::info!("Rendering {width}x{height} at quality {quality}");

        let start = Instant::now();
        let mut stats = RenderStats::default();
        let camera = &scene.camera;

        for x in (0..width).step_by(quality as usize) {
            for y in (0..height).step_by(quality as usize) {
                let ray = camera.get_ray(x, y, width, height);
                let shaded = shade(scene, &ray, camera.projection_distance, f64::INFINITY);
                if matches!(shaded, Shade::Degenerate) {
                    stats.degenerate_hits += 1;
                }
                let color = shaded.or_background(scene.background);
                if surface.put_pixel(x as i64, y as i64, &color) {
                    stats.pixels_written += 1;
                }
            }
            on_column();
        }
        surface.present()?;
        stats.elapsed = start.elapsed();

        if stats.degenerate_hits > 0 {
            log::warn!(
                "{} hits fell on a sphere center and were drawn as background",
                stats.degenerate_hits
            );
        }
        log::info!(
            "Rendered {} pixels in {:?}",
            stats.pixels_written,
            stats.elapsed
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    fn ambient_scene(spheres: Vec<Sphere>) -> Scene {
        Scene::new(
            Camera::new(Point::zeros(), 1.0, 1.0, 1.0),
            HittableList(spheres),
            vec![Light::Ambient {
                intensity: Vec3::new(0.1, 0.1, 0.1),
            }],
            Color::new(10.0, 20.0, 30.0),
        )
    }

    fn white(center: Point, radius: f64) -> Sphere {
        Sphere::new(center, radius, Color::new(255.0, 255.0, 255.0), None)
    }

    /// Counts writes and records coordinates instead of storing colors
    struct Recorder {
        width: u32,
        height: u32,
        written: Vec<(i64, i64)>,
        presented: usize,
    }
    impl Recorder {
        fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                written: Vec::new(),
                presented: 0,
            }
        }
    }
    impl Surface for Recorder {
        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn put_pixel(&mut self, x: i64, y: i64, _color: &Color) -> bool {
            self.written.push((x, y));
            true
        }

        fn present(&mut self) -> Result<(), Error> {
            self.presented += 1;
            Ok(())
        }
    }

    #[test]
    fn miss_returns_background_exactly() {
        let scene = ambient_scene(vec![white(Point::new(0.0, 0.0, 5.0), 1.0)]);
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(trace_ray(&scene, &ray, 1.0, f64::INFINITY), scene.background);
    }

    #[test]
    fn hit_multiplies_albedo_by_gain_unclamped() {
        let mut scene = ambient_scene(vec![white(Point::new(0.0, 0.0, 5.0), 1.0)]);
        scene.lights.push(Light::Ambient {
            intensity: Vec3::new(2.0, 0.0, 0.0),
        });
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, 1.0));
        let color = trace_ray(&scene, &ray, 1.0, f64::INFINITY);
        approx::assert_relative_eq!(color, Color::new(535.5, 25.5, 25.5), epsilon = 1e-9);
    }

    #[test]
    fn hit_at_sphere_center_traces_to_background() {
        let scene = ambient_scene(vec![white(Point::new(0.0, 0.0, 5.0), 0.0)]);
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, 1.0));
        assert!(matches!(
            shade(&scene, &ray, 1.0, f64::INFINITY),
            Shade::Degenerate
        ));
        assert_eq!(trace_ray(&scene, &ray, 1.0, f64::INFINITY), scene.background);
    }

    #[test]
    fn hit_at_sphere_center_is_degenerate() {
        let scene = ambient_scene(vec![white(Point::new(0.0, 0.0, 5.0), 0.0)]);
        // Only pixel (1, 1) of a 2x2 canvas looks straight down the axis
        let renderer = Renderer::new(RenderConfig {
            width: 2,
            height: 2,
            quality: 1,
        })
        .unwrap();
        let mut surface = renderer.surface();
        let stats = renderer.render(&scene, &mut surface).unwrap();
        assert_eq!(stats.degenerate_hits, 1);
        assert_eq!(surface.image().get_pixel(1, 1), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn stride_visits_ceil_grid_column_major() {
        let scene = ambient_scene(Vec::new());
        let renderer = Renderer::new(RenderConfig {
            width: 5,
            height: 4,
            quality: 2,
        })
        .unwrap();
        let mut surface = Recorder::new(5, 4);
        let stats = renderer.render(&scene, &mut surface).unwrap();

        assert_eq!(stats.pixels_written, 6);
        assert_eq!(
            surface.written,
            vec![(0, 0), (0, 2), (2, 0), (2, 2), (4, 0), (4, 2)]
        );
        assert_eq!(surface.presented, 1);
    }

    #[test]
    fn progress_called_once_per_column() {
        let scene = ambient_scene(Vec::new());
        let renderer = Renderer::new(RenderConfig {
            width: 7,
            height: 3,
            quality: 3,
        })
        .unwrap();
        let mut columns = 0;
        renderer
            .render_with_progress(&scene, &mut Recorder::new(7, 3), || columns += 1)
            .unwrap();
        assert_eq!(columns, 3);
    }

    #[test]
    fn out_of_bounds_pixels_are_dropped() {
        let mut surface = ImageSurface::new(4, 4);
        let red = Color::new(255.0, 0.0, 0.0);
        assert!(!surface.put_pixel(-1, 0, &red));
        assert!(!surface.put_pixel(0, -1, &red));
        assert!(!surface.put_pixel(4, 0, &red));
        assert!(!surface.put_pixel(0, 4, &red));
        assert!(surface.put_pixel(3, 3, &red));
        assert_eq!(surface.image().get_pixel(3, 3), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn canvas_larger_than_surface_only_counts_written_pixels() {
        let scene = ambient_scene(Vec::new());
        let renderer = Renderer::new(RenderConfig {
            width: 6,
            height: 6,
            quality: 1,
        })
        .unwrap();
        let mut surface = ImageSurface::new(4, 3);
        let stats = renderer.render(&scene, &mut surface).unwrap();
        assert_eq!(stats.pixels_written, 12);
    }

    #[test]
    fn rejects_empty_canvas_and_zero_quality() {
        let bad = [
            RenderConfig {
                width: 0,
                ..Default::default()
            },
            RenderConfig {
                height: 0,
                ..Default::default()
            },
            RenderConfig {
                quality: 0,
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(matches!(
                Renderer::new(config),
                Err(Error::InvalidRender(_))
            ));
        }
    }

    #[test]
    fn present_saves_image_to_output() {
        let path = std::env::temp_dir()
            .join(format!("ray-casting-present-{}.png", std::process::id()));
        let mut surface = ImageSurface::new(2, 2).with_output(&path);
        surface.put_pixel(0, 0, &Color::new(1.0, 2.0, 3.0));
        surface.present().unwrap();

        let saved = image::open(&path).unwrap().to_rgba8();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(saved.get_pixel(0, 0), &Rgba([1, 2, 3, 255]));
        assert_eq!(saved.get_pixel(1, 1), &Rgba([0, 0, 0, 0]));
    }
}

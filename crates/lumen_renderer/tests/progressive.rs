//! End-to-end progressive rendering scenarios.

use std::ops::RangeInclusive;

use lumen_core::{Camera, DirectionalLight, Material, Plane, Scene, Sphere};
use lumen_renderer::{PixelBuffer, ProgressiveRenderer, RenderConfig, Vec3};

const SIZE: u32 = 33;

/// White floor, white ball above the origin, sun straight down, camera
/// looking down at the origin from the side.
fn shadow_scene() -> Scene {
    let mut scene = Scene::new();
    let white = Material::from_rgb8([255, 255, 255], 1.0, 0.0);

    scene.add_plane("Floor", Plane::horizontal(Vec3::ZERO, 10.0), white);
    scene.add_sphere("Ball", Sphere::new(Vec3::new(0.0, 1.5, 0.0), 0.5), white);
    scene.add_light("Sun", DirectionalLight::new(Vec3::NEG_Y, 100.0, 1.0));

    let position = Vec3::new(0.0, 3.0, -6.0);
    let camera = Camera::new(position, -position)
        .with_optics(35.0, 35.0, 35.0)
        .with_exposure(2.8, 100.0, 100.0)
        .with_focus(position.length());
    scene.add_camera("Camera", camera);

    scene
}

/// Render `samples` in order and return the last frame.
fn render(renderer: &mut ProgressiveRenderer, samples: RangeInclusive<u32>) -> PixelBuffer {
    let scene = shadow_scene();
    let mut frame = PixelBuffer::black(renderer.width(), renderer.height());
    for s in samples {
        frame = renderer.render_sample(s, &scene);
    }
    frame
}

fn fresh(config: &RenderConfig) -> ProgressiveRenderer {
    let mut renderer = ProgressiveRenderer::new(config.clone());
    renderer.configure_viewport(SIZE, SIZE);
    renderer
}

fn mean_squared_difference(a: &PixelBuffer, b: &PixelBuffer) -> f64 {
    let n = a.as_bytes().len() as f64;
    a.as_bytes()
        .iter()
        .zip(b.as_bytes())
        .map(|(&x, &y)| (x as f64 - y as f64).powi(2))
        .sum::<f64>()
        / n
}

#[test]
fn shadow_under_sphere_is_darker() {
    let config = RenderConfig::default().with_max_depth(3);
    let mut renderer = fresh(&config);
    let frame = render(&mut renderer, 1..=32);

    // The center pixel looks at the origin, right under the ball
    let shadow = frame.get(SIZE / 2, SIZE / 2);
    // A few columns to the side the floor is in full sun
    let lit = frame.get(3, SIZE / 2);

    assert_eq!(shadow[3], 255);
    assert!(lit[0] > 40, "lit floor too dark: {:?}", lit);
    assert!(
        (shadow[0] as u32) * 3 < lit[0] as u32,
        "shadow {:?} not darker than lit {:?}",
        shadow,
        lit
    );
}

#[test]
fn frame_differences_shrink_as_samples_accumulate() {
    let config = RenderConfig::default().with_max_depth(2);
    let mut renderer = fresh(&config);
    let scene = shadow_scene();

    let mut frames = Vec::new();
    for s in 1..=32 {
        frames.push(renderer.render_sample(s, &scene));
    }

    let early = mean_squared_difference(&frames[0], &frames[1]);
    let late = mean_squared_difference(&frames[30], &frames[31]);
    assert!(late < early, "late {late} should be below early {early}");
}

#[test]
fn split_batches_match_single_run() {
    let config = RenderConfig::default().with_max_depth(2).with_seed(42);

    let mut single = fresh(&config);
    let single_frame = render(&mut single, 1..=8);

    let mut split = fresh(&config);
    render(&mut split, 1..=4);
    let split_frame = render(&mut split, 5..=8);

    assert_eq!(single_frame, split_frame);
    assert_eq!(single.accumulation(), split.accumulation());
}

#[test]
fn band_height_does_not_change_the_image() {
    let tall = RenderConfig::default().with_max_depth(2).with_rows_per_band(SIZE);
    let thin = RenderConfig::default().with_max_depth(2).with_rows_per_band(1);

    let a = render(&mut fresh(&tall), 1..=3);
    let b = render(&mut fresh(&thin), 1..=3);
    assert_eq!(a, b);
}

#[test]
fn missing_light_renders_opaque_black() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut scene = shadow_scene();
    let (sun, _) = scene.primary_light().unwrap();
    scene.despawn(sun);

    let mut renderer = fresh(&RenderConfig::default());
    let frame = renderer.render_sample(1, &scene);

    assert_eq!(frame.as_bytes().len(), (SIZE * SIZE * 4) as usize);
    assert!(frame.as_bytes().chunks(4).all(|p| p == [0, 0, 0, 255]));
}

//! Host windowing loop for the `rusterizer` library: owns a `minifb` window,
//! translates its keyboard/mouse/scroll events into the camera's numeric
//! input methods, and calls the library every frame. None of this file's
//! windowing logic lives in the library — see `lib.rs`'s module docs.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use minifb::{Key, MouseMode, Window, WindowOptions};

use rusterizer::camera::{Camera, CameraMovement};
use rusterizer::config::RasterConfig;
use rusterizer::framebuffer::Framebuffer;
use rusterizer::math::{ColorRGBA, Vec3};
use rusterizer::mesh;
use rusterizer::rasterizer;
use rusterizer::triangle::{self, ModelTransform};

#[derive(Parser)]
#[command(name = "rusterizer-demo")]
#[command(about = "Spins a lit mesh in a window via the rusterizer library", long_about = None)]
struct Cli {
    /// TOML config file overriding window/camera defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Which built-in mesh to draw.
    #[arg(long, value_enum, default_value = "cube")]
    mesh: MeshArg,

    /// Dump the first frame to this BMP path and exit (headless smoke test).
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[derive(Copy, Clone, clap::ValueEnum)]
enum MeshArg {
    Cube,
    Quad,
}

fn load_config(cli: &Cli) -> anyhow::Result<RasterConfig> {
    match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(RasterConfig::from_toml(&text)?)
        }
        None => Ok(RasterConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if let Err(e) = rasterizer::build_thread_pool() {
        log::warn!("falling back to rayon's default global pool: {e}");
    }

    let mesh_vertices = match cli.mesh {
        MeshArg::Cube => mesh::unit_cube(),
        MeshArg::Quad => mesh::unit_quad(),
    };

    let cam_cfg = config.camera;
    let mut camera = Camera::new(
        Vec3::new(cam_cfg.position[0], cam_cfg.position[1], cam_cfg.position[2]),
        Vec3::new(0.0, 1.0, 0.0),
        cam_cfg.yaw,
        cam_cfg.pitch,
    );
    camera.movement_speed = cam_cfg.movement_speed;
    camera.mouse_sensitivity = cam_cfg.mouse_sensitivity;
    camera.zoom = cam_cfg.zoom;

    let mut framebuffer = Framebuffer::new(config.width, config.height, config.pixel_scale);

    if let Some(path) = cli.snapshot {
        render_frame_rotating(&mut framebuffer, &camera, &mesh_vertices, 0.0, config.clear_color);
        framebuffer.write_bmp(path)?;
        return Ok(());
    }

    let mut window = Window::new(
        "rusterizer",
        framebuffer.window_width() as usize,
        framebuffer.window_height() as usize,
        WindowOptions::default(),
    )?;
    window.set_target_fps(60);

    let mut last_frame = Instant::now();
    let mut last_mouse: Option<(f32, f32)> = None;
    let mut yaw_accum = 0.0f32;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let now = Instant::now();
        let dt = (now - last_frame).as_secs_f32();
        last_frame = now;

        handle_keyboard(&window, &mut camera, dt);
        if let Some((mx, my)) = window.get_mouse_pos(MouseMode::Pass) {
            if let Some((lx, ly)) = last_mouse {
                camera.process_mouse_movement(mx - lx, ly - my, true);
            }
            last_mouse = Some((mx, my));
        }
        if let Some((_, scroll_y)) = window.get_scroll_wheel() {
            camera.process_mouse_scroll(scroll_y);
        }

        yaw_accum += dt * 20.0;
        render_frame_rotating(&mut framebuffer, &camera, &mesh_vertices, yaw_accum, config.clear_color);

        window.update_with_buffer(
            &framebuffer.pixels,
            framebuffer.width as usize,
            framebuffer.height as usize,
        )?;
    }

    Ok(())
}

fn handle_keyboard(window: &Window, camera: &mut Camera, dt: f32) {
    let bindings = [
        (Key::W, CameraMovement::Forward),
        (Key::S, CameraMovement::Backward),
        (Key::A, CameraMovement::Left),
        (Key::D, CameraMovement::Right),
        (Key::Space, CameraMovement::Up),
        (Key::LeftShift, CameraMovement::Down),
    ];
    for (key, direction) in bindings {
        if window.is_key_down(key) {
            camera.process_keyboard(direction, dt);
        }
    }
}

fn render_frame_rotating(
    framebuffer: &mut Framebuffer,
    camera: &Camera,
    mesh_vertices: &[f32],
    yaw_deg: f32,
    clear_color: u32,
) {
    framebuffer.clear(clear_color);
    let transform = ModelTransform {
        position: Vec3::ZERO,
        rotation: Vec3::new(0.0, yaw_deg, 0.0),
        scale: Vec3::new(1.0, 1.0, 1.0),
    };
    let viewport = (framebuffer.width, framebuffer.height);
    let triangles = triangle::build_triangles(mesh_vertices, transform, camera, viewport, ColorRGBA::WHITE);
    rasterizer::draw_triangles(framebuffer, &triangles, camera.position, rasterizer::DEFAULT_TILE_SIZE);
}

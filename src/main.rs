use std::env;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use glam::{Vec2, Vec3};
use glow::HasContext;
use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextApi, ContextAttributesBuilder};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::SwapInterval;
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{error, warn};
use raw_window_handle::HasRawWindowHandle;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::EventLoop;
use winit::platform::run_return::EventLoopExtRunReturn;
use winit::window::WindowBuilder;

use phong_viewer::{
    apply_light_key, assets, draw_scene, parse_mesh, shapes, Actor, DragRotate, Mesh, MeshBuffers,
    ShaderProgram, ShaderSource, SharedLighting, SharedRotation, Texture,
};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;

    // The whole startup batch loads up front; one bad asset fails the run.
    let [bp_vertex, bp_fragment, tbp_vertex, tbp_fragment, bt_vertex, bt_fragment, mesh_text] =
        load_startup_assets(&options.asset_dir)?;
    let mesh = parse_mesh(&mesh_text);

    let catalog = Catalog {
        blinn_phong: ShaderSource::blinn_phong(bp_vertex, bp_fragment),
        textured_blinn_phong: ShaderSource::textured_blinn_phong(tbp_vertex, tbp_fragment),
        basic_textured: ShaderSource::basic_textured(bt_vertex, bt_fragment),
    };

    if options.headless {
        print_summary(&mesh, &catalog);
        return Ok(());
    }

    run_windowed(options, mesh, catalog)
}

/// Full shader set loaded at startup. The scene only places the two
/// Blinn-Phong flavors; `basic_textured` stays available for actors that
/// want texture-only shading.
struct Catalog {
    blinn_phong: ShaderSource,
    textured_blinn_phong: ShaderSource,
    basic_textured: ShaderSource,
}

fn load_startup_assets(asset_dir: &std::path::Path) -> Result<[String; 7]> {
    let shader_dir = asset_dir.join("shaders");
    let paths = vec![
        shader_dir.join("blinn_phong.vert"),
        shader_dir.join("blinn_phong.frag"),
        shader_dir.join("textured_blinn_phong.vert"),
        shader_dir.join("textured_blinn_phong.frag"),
        shader_dir.join("basic_textured.vert"),
        shader_dir.join("basic_textured.frag"),
        asset_dir.join("models").join("gem.obj"),
    ];
    let texts = assets::load_all(&paths).context("failed to load startup assets")?;
    texts
        .try_into()
        .map_err(|_| anyhow!("startup asset batch changed size"))
}

fn print_summary(mesh: &Mesh, catalog: &Catalog) {
    println!(
        "Parsed mesh: {} corners ({} triangles)",
        mesh.element_count(),
        mesh.element_count() / 3
    );
    for source in [
        &catalog.blinn_phong,
        &catalog.textured_blinn_phong,
        &catalog.basic_textured,
    ] {
        println!(
            " - shader {} ({} attributes, {} uniforms)",
            source.name,
            source.attributes.len(),
            source.uniforms.len()
        );
    }
}

fn run_windowed(options: CliOptions, mesh: Mesh, catalog: Catalog) -> Result<()> {
    let mut event_loop = EventLoop::new();
    let window_builder = WindowBuilder::new()
        .with_title("Phong Viewer")
        .with_inner_size(LogicalSize::new(1280.0, 720.0));

    let template = ConfigTemplateBuilder::new().with_depth_size(24);
    let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
    let (window, gl_config) = display_builder
        .build(&event_loop, template, |mut configs| {
            configs.next().expect("no GL configs offered")
        })
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window = window.context("no window was created for the GL display")?;
    let raw_window_handle = window.raw_window_handle();
    let gl_display = gl_config.display();

    // GLES first so the WebGL-style shader sources are native; plain GL
    // drivers pick them up through ES compatibility.
    let context_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::Gles(None))
        .build(Some(raw_window_handle));
    let fallback_attributes = ContextAttributesBuilder::new().build(Some(raw_window_handle));
    let not_current = unsafe {
        gl_display
            .create_context(&gl_config, &context_attributes)
            .or_else(|_| gl_display.create_context(&gl_config, &fallback_attributes))
            .context("failed to create a GL context")?
    };

    let surface_attributes = window.build_surface_attributes(Default::default());
    let gl_surface = unsafe {
        gl_display
            .create_window_surface(&gl_config, &surface_attributes)
            .context("failed to create the window surface")?
    };
    let gl_context = not_current
        .make_current(&gl_surface)
        .context("failed to make the GL context current")?;
    if let Err(err) =
        gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::new(1).unwrap()))
    {
        warn!("vsync unavailable: {err}");
    }

    let gl =
        unsafe { glow::Context::from_loader_function_cstr(|s| gl_display.get_proc_address(s)) };

    let blinn_phong = Arc::new(ShaderProgram::compile(&gl, &catalog.blinn_phong)?);
    let textured_blinn_phong =
        Arc::new(ShaderProgram::compile(&gl, &catalog.textured_blinn_phong)?);

    let cube = shapes::cube();
    let mesh_buffers = MeshBuffers::upload(&gl, &mesh).map_err(anyhow::Error::msg)?;
    let cube_buffers = MeshBuffers::upload(&gl, &cube).map_err(anyhow::Error::msg)?;

    let mesh_texture = Texture::placeholder(&gl).map_err(anyhow::Error::msg)?;
    let mut cube_texture = Texture::placeholder(&gl).map_err(anyhow::Error::msg)?;
    let checker = options.asset_dir.join("textures").join("checker.png");
    let cube_shader = if checker.is_file() {
        match cube_texture.open(&gl, &checker) {
            Ok(()) => Arc::clone(&textured_blinn_phong),
            Err(err) => {
                warn!("cube texture unusable, rendering untextured: {err:#}");
                Arc::clone(&blinn_phong)
            }
        }
    } else {
        Arc::clone(&blinn_phong)
    };

    // Both actors alias one rotation handle so they turn together.
    let rotation = SharedRotation::new(Vec3::new(45.0, 45.0, 0.0));
    let lighting = SharedLighting::default();

    let scene = vec![
        Actor {
            mesh,
            buffers: mesh_buffers,
            shader: blinn_phong,
            texture: mesh_texture,
            position: Vec3::new(-6.0, 0.0, -20.0),
            rotation: rotation.clone(),
        },
        Actor {
            mesh: cube,
            buffers: cube_buffers,
            shader: cube_shader,
            texture: cube_texture,
            position: Vec3::new(6.0, 0.0, -20.0),
            rotation: rotation.clone(),
        },
    ];

    let size = window.inner_size();
    let mut viewport = (size.width, size.height);
    unsafe {
        gl.viewport(0, 0, size.width as i32, size.height as i32);
    }

    let mut cursor = Vec2::ZERO;
    let mut drag: Option<DragRotate> = None;

    event_loop.run_return(|event, _, control_flow| {
        control_flow.set_poll();
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => control_flow.set_exit(),
                WindowEvent::Resized(size) => {
                    viewport = (size.width, size.height);
                    if size.width > 0 && size.height > 0 {
                        gl_surface.resize(
                            &gl_context,
                            NonZeroU32::new(size.width).unwrap(),
                            NonZeroU32::new(size.height).unwrap(),
                        );
                        unsafe {
                            gl.viewport(0, 0, size.width as i32, size.height as i32);
                        }
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    cursor = Vec2::new(position.x as f32, position.y as f32);
                    if let Some(drag) = &drag {
                        rotation.set(drag.rotation_at(cursor));
                    }
                }
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => {
                    drag = match state {
                        ElementState::Pressed => Some(DragRotate::begin(cursor, rotation.get())),
                        ElementState::Released => None,
                    };
                }
                WindowEvent::CursorLeft { .. } => drag = None,
                WindowEvent::ReceivedCharacter(key) => {
                    lighting.update(|rig| {
                        apply_light_key(key, rig);
                    });
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                let rig = lighting.snapshot();
                draw_scene(&gl, &scene, viewport, Some(&rig));
                if let Err(err) = gl_surface.swap_buffers(&gl_context) {
                    error!("failed to present frame: {err}");
                }
            }
            Event::MainEventsCleared => window.request_redraw(),
            _ => {}
        }
    });

    Ok(())
}

struct CliOptions {
    asset_dir: PathBuf,
    headless: bool,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut asset_dir = None;
        let mut headless = false;
        for arg in env::args().skip(1) {
            match arg.as_str() {
                "--headless" => headless = true,
                "--help" | "-h" => {
                    println!("Usage: phong-viewer [ASSET_DIR] [--headless]");
                    std::process::exit(0);
                }
                other if !other.starts_with('-') && asset_dir.is_none() => {
                    asset_dir = Some(PathBuf::from(other));
                }
                other => {
                    return Err(anyhow!(
                        "Unknown argument: {other}. Usage: phong-viewer [ASSET_DIR] [--headless]"
                    ));
                }
            }
        }
        Ok(Self {
            asset_dir: asset_dir.unwrap_or_else(|| PathBuf::from("assets")),
            headless,
        })
    }
}

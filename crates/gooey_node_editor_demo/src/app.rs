// SPDX-License-Identifier: MIT OR Apache-2.0
//! Window setup, wgpu rendering and the egui frame hosting the editors.

use egui_wgpu::wgpu;
use gooey_node_editor::{
    feed_input, DataKind, EditorConfig, EditorEvent, EditorHost, EguiBackend, GraphError, NodeEditor,
    SocketDirection,
};
use std::sync::Arc;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Demo application errors
#[derive(Debug, Error)]
pub enum DemoError {
    /// Window creation failed
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// Surface creation failed
    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    /// No adapter can present to the surface
    #[error("No suitable GPU adapter found")]
    NoAdapter,

    /// Device request failed
    #[error("Failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// The surface reports no usable format or alpha mode
    #[error("Surface is not supported by the adapter")]
    UnsupportedSurface,

    /// Building the sample graph failed
    #[error("Failed to build sample graph: {0}")]
    Graph(#[from] GraphError),

    /// Event loop error
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Result type for demo operations
pub type Result<T> = std::result::Result<T, DemoError>;

/// Graphics state for wgpu rendering
struct GraphicsState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    egui_renderer: egui_wgpu::Renderer,
}

impl GraphicsState {
    fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(DemoError::NoAdapter)?;

        tracing::info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Node Editor Demo Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            },
            None,
        ))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(DemoError::UnsupportedSurface)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .ok_or(DemoError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            egui_renderer,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn render(
        &mut self,
        egui_ctx: &egui::Context,
        full_output: egui::FullOutput,
        window: &Window,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Demo Encoder"),
        });

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Demo Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color {
                                r: 0.1,
                                g: 0.1,
                                b: 0.1,
                                a: 1.0,
                            }),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        Ok(())
    }
}

/// Build the editor shown on startup
fn sample_editor(config: EditorConfig) -> Result<NodeEditor> {
    let mut editor = NodeEditor::with_config(0.0, 0.0, 1280.0, 720.0, config).with_callback(|event| match event {
        EditorEvent::NodeSelected(id) => tracing::info!("Selected {id}"),
        EditorEvent::ConnectionSelected(id) => tracing::info!("Selected {id}"),
        EditorEvent::Connected(id) => tracing::info!("Connected {id}"),
    });

    let constant = editor.add_node("Constant", 60.0, 80.0, 160.0, 80.0)?;
    let value = editor.add_socket(constant, "value", SocketDirection::Output, DataKind::Float)?;

    let counter = editor.add_node("Counter", 60.0, 240.0, 160.0, 80.0)?;
    editor.add_socket(counter, "count", SocketDirection::Output, DataKind::Int)?;

    let add = editor.add_node("Add", 360.0, 140.0, 180.0, 80.0)?;
    let lhs = editor.add_socket(add, "a", SocketDirection::Input, DataKind::Float)?;
    editor.add_socket(add, "b", SocketDirection::Input, DataKind::Int)?;
    let sum = editor.add_socket(add, "sum", SocketDirection::Output, DataKind::Float)?;

    let display = editor.add_node("Display", 660.0, 140.0, 180.0, 80.0)?;
    let shown = editor.add_socket(display, "value", SocketDirection::Input, DataKind::Float)?;
    editor.add_socket(display, "label", SocketDirection::Input, DataKind::String)?;
    editor.add_socket(display, "visible", SocketDirection::Input, DataKind::Bool)?;

    editor.connect(value, lhs)?;
    editor.connect(sum, shown)?;

    Ok(editor)
}

/// Running state of the demo
struct DemoRunning {
    window: Arc<Window>,
    graphics: GraphicsState,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    host: EditorHost,
}

impl DemoRunning {
    fn update(host: &mut EditorHost, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                if let Some(editor) = host.editor_mut(0) {
                    editor.core.x = rect.min.x;
                    editor.core.y = rect.min.y;
                    editor.core.width = rect.width();
                    editor.core.height = rect.height();
                }

                feed_input(ctx, host);
                host.draw(&mut EguiBackend::new(ui.painter()));
            });
    }
}

/// Demo application
pub struct DemoApp {
    config: EditorConfig,
    running: Option<DemoRunning>,
}

impl DemoApp {
    /// Create the application with the editor layout to use
    pub fn new(config: EditorConfig) -> Self {
        Self { config, running: None }
    }

    /// Run the event loop until the window closes
    pub fn run(config: EditorConfig) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = DemoApp::new(config);
        event_loop.run_app(&mut app)?;

        Ok(())
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> Result<DemoRunning> {
        let window_attrs = Window::default_attributes()
            .with_title("Gooey Node Editor")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
            .with_min_inner_size(winit::dpi::LogicalSize::new(640, 480));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        tracing::info!("Initializing graphics...");
        let graphics = GraphicsState::new(window.clone())?;

        let egui_ctx = egui::Context::default();
        egui_ctx.set_visuals(egui::Visuals::dark());

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2 * 1024),
        );

        let mut host = EditorHost::new();
        host.push(sample_editor(self.config.clone())?);

        Ok(DemoRunning {
            window,
            graphics,
            egui_ctx,
            egui_state,
            host,
        })
    }
}

impl ApplicationHandler for DemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        match self.start(event_loop) {
            Ok(running) => {
                tracing::info!("Window size: {:?}", running.window.inner_size());
                self.running = Some(running);
            }
            Err(e) => {
                tracing::error!("Failed to start demo: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(running) = &mut self.running else {
            return;
        };

        let response = running.egui_state.on_window_event(&running.window, &event);
        if response.repaint {
            running.window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                tracing::debug!("Window resized to {:?}", new_size);
                running.graphics.resize(new_size);
                running.window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let raw_input = running.egui_state.take_egui_input(&running.window);
                let host = &mut running.host;
                let full_output = running.egui_ctx.run(raw_input, |ctx| DemoRunning::update(host, ctx));

                running
                    .egui_state
                    .handle_platform_output(&running.window, full_output.platform_output.clone());

                match running.graphics.render(&running.egui_ctx, full_output, &running.window) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = running.window.inner_size();
                        running.graphics.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("Out of GPU memory!");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        tracing::warn!("Surface timeout");
                    }
                }
            }
            _ => {}
        }
    }
}

//! Viewer state and the windowed application

use crate::camera::Camera;
use crate::config::ViewerConfig;
use crate::controls::{
    InputEvent, InputResponse, InputTranslator, InteractionController, InteractionMode,
};
use crate::overlay::TooltipOverlay;
use crate::picking::pick_point;
use crate::render_loop::{FrameRenderer, FrameView, RenderLoop};
use crate::tooltip::Tooltip;
use loanscape_core::{Dataset, Error, Result, Scene};
use loanscape_gpu::{OverlayFrame, RenderConfig, SceneRenderer};
use loanscape_io::LoadError;
use nalgebra::{Point2, Vector2};
use std::path::Path;
use std::sync::Arc;
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoopBuilder},
    window::{Window, WindowBuilder},
};

/// Events sent to the event loop from background tasks
#[derive(Debug)]
pub enum AppEvent {
    DatasetLoaded(std::result::Result<Dataset, LoadError>),
}

/// Everything the viewer knows between frames.
///
/// Owned by the event loop; input, load completion and resize all go through
/// here so the rendering side only ever reads it.
#[derive(Debug)]
pub struct ViewerState {
    camera: Camera,
    controller: InteractionController,
    scene: Option<Scene>,
    tooltip: Tooltip,
    /// Logical viewport size
    viewport: Vector2<f32>,
    picking_threshold: f32,
}

impl ViewerState {
    pub fn new(config: &ViewerConfig, viewport: Vector2<f32>) -> Self {
        Self {
            camera: config.camera(viewport),
            controller: InteractionController::new(config.controls),
            scene: None,
            tooltip: Tooltip::new(config.tooltip_offset()),
            viewport,
            picking_threshold: config.picking_threshold,
        }
    }

    /// Run the camera controls, then refresh the hover tooltip on pointer moves
    pub fn handle_input(&mut self, event: &InputEvent) -> InputResponse {
        let response = self.controller.handle(&mut self.camera, event);
        if let InputEvent::PointerMoved { position } = *event {
            self.update_hover(position);
        }
        response
    }

    fn update_hover(&mut self, cursor: Point2<f32>) {
        let Some(scene) = &self.scene else {
            return;
        };

        let hit = pick_point(
            &self.camera,
            scene.points.positions(),
            cursor,
            self.viewport,
            self.picking_threshold,
        );
        match hit {
            Some(hit) => {
                if let Some(record) = scene.points.record(hit.index) {
                    self.tooltip.show(hit.index, record, cursor);
                }
            }
            None => self.tooltip.hide(),
        }
    }

    /// Build the scene for a freshly loaded dataset
    pub fn on_dataset_loaded(&mut self, dataset: Dataset) -> &Scene {
        let scene = Scene::from_dataset(Arc::new(dataset));
        self.scene.insert(scene)
    }

    /// Track a new logical viewport size
    pub fn resize(&mut self, viewport: Vector2<f32>) {
        if viewport.x > 0.0 && viewport.y > 0.0 {
            self.viewport = viewport;
            self.camera.set_aspect_ratio(viewport.x, viewport.y);
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn mode(&self) -> InteractionMode {
        self.controller.mode()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    pub fn viewport(&self) -> Vector2<f32> {
        self.viewport
    }

    pub fn frame_view(&self) -> FrameView<'_> {
        FrameView {
            camera: &self.camera,
            tooltip: &self.tooltip,
        }
    }
}

/// Draws the scene and tooltip overlay into the window
pub struct ViewportRenderer {
    window: Arc<Window>,
    scene_renderer: SceneRenderer,
    overlay: TooltipOverlay,
}

impl ViewportRenderer {
    pub async fn new(window: Arc<Window>, config: RenderConfig) -> Result<Self> {
        let overlay = TooltipOverlay::new(&window);
        let scene_renderer = SceneRenderer::new(window.clone(), config).await?;
        Ok(Self {
            window,
            scene_renderer,
            overlay,
        })
    }

    pub fn upload_scene(&mut self, scene: &Scene) {
        self.scene_renderer.upload_scene(scene);
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.scene_renderer.resize(size);
    }

    pub fn on_window_event(&mut self, event: &WindowEvent) {
        self.overlay.on_window_event(&self.window, event);
    }
}

impl FrameRenderer for ViewportRenderer {
    fn render_frame(&mut self, view: &FrameView<'_>) -> Result<()> {
        let camera = view.camera;
        self.scene_renderer.update_camera(
            camera.view_matrix(),
            camera.projection_matrix(),
            camera.right(),
            camera.up_axis(),
        );

        let overlay = self.overlay.run(&self.window, view.tooltip);
        self.scene_renderer.render(Some(&OverlayFrame {
            paint_jobs: &overlay.paint_jobs,
            textures_delta: &overlay.textures_delta,
            pixels_per_point: overlay.pixels_per_point,
        }))
    }
}

fn logical_viewport(size: PhysicalSize<u32>, scale_factor: f64) -> Vector2<f32> {
    let logical = size.to_logical::<f32>(scale_factor);
    Vector2::new(logical.width, logical.height)
}

fn report_load_failure(path: &Path, error: &LoadError) {
    log::error!("Error loading data: {error}");
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("Loan Applications 3D")
        .set_description(format!(
            "Error loading CSV file. Make sure the file exists at {}",
            path.display()
        ))
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

/// Open the viewer window and run until it is closed
pub fn run(config: ViewerConfig) -> Result<()> {
    let event_loop = EventLoopBuilder::<AppEvent>::with_user_event()
        .build()
        .map_err(|e| Error::Visualization(format!("Failed to create event loop: {e}")))?;

    let [width, height] = config.window_size;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.as_str())
            .with_inner_size(LogicalSize::new(width, height))
            .build(&event_loop)
            .map_err(|e| Error::Visualization(format!("Failed to create window: {e}")))?,
    );
    log::info!("Opened window \"{}\"", config.window_title);

    let scale_factor = window.scale_factor();
    let viewport = logical_viewport(window.inner_size(), scale_factor);
    let mut state = ViewerState::new(&config, viewport);
    let mut translator = InputTranslator::new(scale_factor);
    let mut renderer =
        pollster::block_on(ViewportRenderer::new(window.clone(), config.render_config()))?;
    let mut render_loop = RenderLoop::new();
    render_loop.start();
    window.request_redraw();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;
    let proxy = event_loop.create_proxy();
    let data_path = config.data_path.clone();
    runtime.spawn(async move {
        let result = loanscape_io::load(&data_path).await;
        if proxy.send_event(AppEvent::DatasetLoaded(result)).is_err() {
            log::warn!("Viewer closed before the dataset finished loading");
        }
    });

    event_loop
        .run(move |event, target| {
            target.set_control_flow(ControlFlow::Wait);

            match event {
                Event::UserEvent(AppEvent::DatasetLoaded(result)) => match result {
                    Ok(dataset) => {
                        let scene = state.on_dataset_loaded(dataset);
                        renderer.upload_scene(scene);
                    }
                    Err(error) => report_load_failure(&config.data_path, &error),
                },
                Event::WindowEvent { event, .. } => {
                    let response = translator
                        .translate(&event)
                        .map(|input| state.handle_input(&input))
                        .unwrap_or_default();
                    if !response.prevent_default {
                        renderer.on_window_event(&event);
                    }
                    if response.camera_changed {
                        window.request_redraw();
                    }

                    match event {
                        WindowEvent::CloseRequested => {
                            render_loop.stop();
                            target.exit();
                        }
                        WindowEvent::Resized(new_size) => {
                            renderer.resize(new_size);
                            state.resize(logical_viewport(new_size, window.scale_factor()));
                        }
                        WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                            translator.set_scale_factor(scale_factor);
                        }
                        WindowEvent::RedrawRequested => {
                            match render_loop.tick(&mut renderer, &state.frame_view()) {
                                Ok(true) => window.request_redraw(),
                                Ok(false) => {}
                                Err(e) => {
                                    log::error!("Render error: {e}");
                                    window.request_redraw();
                                }
                            }
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        })
        .map_err(|e| Error::Visualization(format!("Event loop error: {e}")))?;

    Ok(())
}

//! Window and event loop.
//!
//! Everything runs on the winit thread: window events update [`Input`] and the
//! panel, and each `RedrawRequested` runs one driver frame, renders it, and asks
//! for the next redraw.

use std::sync::Arc;

use tracing::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::ViewerConfig;
use crate::driver::FrameDriver;
use crate::error::ViewerError;
use crate::gpu::{EguiIntegration, GpuState};
use crate::host::HostInputs;
use crate::input::Input;
use crate::time::FrameTimer;
use crate::ui::{self, Status};

/// Open the viewer window and run until it is closed.
pub fn run(config: ViewerConfig) -> Result<(), ViewerError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// State that exists once the window is up.
struct Viewer {
    window: Arc<Window>,
    gpu: GpuState,
    egui: EguiIntegration,
    driver: FrameDriver,
}

struct App {
    config: ViewerConfig,
    viewer: Option<Viewer>,
    host: HostInputs,
    input: Input,
    timer: FrameTimer,
    /// Fatal setup error, returned from [`run`] after the loop exits.
    error: Option<ViewerError>,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        Self {
            host: HostInputs::from_config(&config),
            config,
            viewer: None,
            input: Input::new(),
            timer: FrameTimer::new(),
            error: None,
        }
    }

    fn create_viewer(&self, event_loop: &ActiveEventLoop) -> Result<Viewer, ViewerError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let mut gpu = pollster::block_on(GpuState::new(window.clone()))?;
        let egui = EguiIntegration::new(gpu.device(), gpu.surface_format(), &window);
        let driver = FrameDriver::new(self.config.clone(), &mut gpu);

        Ok(Viewer {
            window,
            gpu,
            egui,
            driver,
        })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(viewer) = self.viewer.as_mut() else {
            return;
        };

        let (width, height) = viewer.gpu.size();
        self.host.set_size(width, height);

        let frame = viewer.driver.frame(&self.host, &mut self.input, &mut viewer.gpu);

        let status = Status {
            tracers: viewer.driver.cloud().len(),
            points: viewer.driver.cloud().point_count(),
            fps: self.timer.fps(),
        };
        viewer.egui.begin_frame(&viewer.window);
        let ctx = viewer.egui.ctx.clone();
        ui::control_panel(&ctx, &mut self.host, &status);
        let ui_output = viewer.egui.end_frame(&viewer.window);

        match viewer.gpu.render(&frame, Some((&mut viewer.egui, &ui_output))) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => viewer.gpu.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory, exiting");
                event_loop.exit();
                return;
            }
            Err(e) => warn!("Render error: {e}"),
        }

        self.timer.tick();
        viewer.window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewer.is_some() {
            return;
        }
        match self.create_viewer(event_loop) {
            Ok(viewer) => {
                info!("Viewer ready");
                viewer.window.request_redraw();
                self.viewer = Some(viewer);
            }
            Err(err) => {
                error!("{err}");
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(viewer) = self.viewer.as_mut() else {
            return;
        };

        let consumed = viewer.egui.on_window_event(&viewer.window, &event);
        let captured = consumed || viewer.egui.wants_pointer();
        self.input.handle_event(&event, captured);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                viewer.gpu.resize(physical_size);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

use super::{FrameClock, Overlay, ViewerConfig, ViewerError, ViewerMode};
use crate::asset::{LoadEvent, LoadQueue, ModelData};
use crate::render::{GpuContext, SceneRenderer};
use crate::scene::SceneContext;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[cfg(not(target_arch = "wasm32"))]
use super::egui_overlay::EguiOverlay;
#[cfg(target_arch = "wasm32")]
use crate::web::dom::{DomOverlay, Page};

struct GpuState {
    context: GpuContext,
    renderer: SceneRenderer,
    #[cfg(not(target_arch = "wasm32"))]
    overlay: EguiOverlay,
}

/// Window, GPU and loader plumbing around one [`ViewerMode`].
pub struct Viewer<M: ViewerMode> {
    config: ViewerConfig,
    mode: M,
    scene: SceneContext,
    window: Option<Arc<Window>>,
    // Filled asynchronously on the web.
    gpu: Rc<RefCell<Option<GpuState>>>,
    loader: Option<LoadQueue>,
    pending_model: Option<ModelData>,
    clock: FrameClock,
    #[cfg(target_arch = "wasm32")]
    page: Option<(Page, DomOverlay)>,
}

impl<M: ViewerMode + 'static> Viewer<M> {
    pub fn new(config: ViewerConfig, mode: M) -> Self {
        let scene = SceneContext::new(mode.background());
        Self {
            config,
            mode,
            scene,
            window: None,
            gpu: Rc::new(RefCell::new(None)),
            loader: None,
            pending_model: None,
            clock: FrameClock::new(),
            #[cfg(target_arch = "wasm32")]
            page: None,
        }
    }

    /// Blocks until the window is closed.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn run(mut self) -> Result<(), ViewerError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    /// Hands the viewer to the browser's event loop and returns.
    #[cfg(target_arch = "wasm32")]
    pub fn run(self) -> Result<(), ViewerError> {
        use winit::platform::web::EventLoopExtWebSys;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.spawn_app(self);
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let attrs = Window::default_attributes()
            .with_title(self.mode.title())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let context = pollster::block_on(GpuContext::new(window.clone()))?;
        let renderer = SceneRenderer::new(&context, &self.scene.background);
        let overlay = EguiOverlay::new(&window, &context);
        *self.gpu.borrow_mut() = Some(GpuState {
            context,
            renderer,
            overlay,
        });

        log::info!("loading model from {}", self.config.model_path);
        self.loader = Some(crate::asset::spawn_file_load(self.config.model_path.as_str()));

        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        use winit::platform::web::WindowAttributesExtWebSys;

        let page = Page::attach()?;
        let (width, height) = Page::viewport_size();
        let attrs = Window::default_attributes()
            .with_title(self.mode.title())
            .with_canvas(Some(page.canvas()))
            .with_prevent_default(false)
            .with_inner_size(LogicalSize::new(width, height));
        let window = Arc::new(event_loop.create_window(attrs)?);

        if let Some(trigger) = self.mode.scroll_trigger_mut() {
            trigger.set_start_offset(page.section_top());
        }
        let overlay = DomOverlay::new(&page, &self.mode.overlay(&self.scene))?;
        self.page = Some((page, overlay));

        let gpu = self.gpu.clone();
        let background = self.scene.background.clone();
        let gpu_window = window.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match GpuContext::new(gpu_window.clone()).await {
                Ok(context) => {
                    let renderer = SceneRenderer::new(&context, &background);
                    *gpu.borrow_mut() = Some(GpuState { context, renderer });
                    gpu_window.request_redraw();
                }
                Err(err) => log::error!("failed to initialise WebGPU: {err}"),
            }
        });

        log::info!("loading model from {}", self.config.model_path);
        self.loader = Some(crate::web::fetch::spawn_fetch(self.config.model_path.clone()));

        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn poll_loader(&mut self) {
        let Some(loader) = self.loader.as_mut() else {
            return;
        };

        for event in loader.drain() {
            match event {
                LoadEvent::Progress(progress) => self.mode.on_load_progress(progress),
                LoadEvent::Finished(result) => {
                    self.loader = None;
                    match result {
                        Ok(model) => {
                            let bounds = self.scene.set_model(model.bounds).bounds;
                            log::info!(
                                "model loaded: {} meshes, {} triangles, size {:.2}, centre {:.2}",
                                model.meshes.len(),
                                model.triangle_count(),
                                bounds.size(),
                                bounds.center()
                            );
                            self.pending_model = Some(model);
                            self.mode.on_model_loaded(&mut self.scene);
                        }
                        Err(err) => {
                            log::error!("Error loading model: {err}");
                            self.mode.on_load_failed(&err);
                        }
                    }
                    break;
                }
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn sync_page_scroll(&self) {
        if let Some(position) = self.mode.scroll_position() {
            position.set(Page::scroll_y());
        }
    }

    fn frame(&mut self) {
        let dt = self.clock.tick();
        self.poll_loader();
        #[cfg(target_arch = "wasm32")]
        self.sync_page_scroll();

        let mut gpu = self.gpu.borrow_mut();
        if let Some(gpu) = gpu.as_mut() {
            self.scene.resize(gpu.context.size.width, gpu.context.size.height);
            if let Some(model) = self.pending_model.take() {
                gpu.renderer.upload_model(&gpu.context, &model);
            }
        }

        self.mode.update(&mut self.scene, dt);
        let overlay = self.mode.overlay(&self.scene);

        if let (Some(gpu), Some(window)) = (gpu.as_mut(), self.window.as_ref()) {
            render_frame(gpu, window, &self.scene, &overlay);
        }

        #[cfg(target_arch = "wasm32")]
        if let Some((_, dom)) = self.page.as_mut() {
            if let Err(err) = dom.present(&overlay) {
                log::warn!("failed to update page overlay: {err}");
            }
        }
    }
}

#[cfg_attr(target_arch = "wasm32", allow(unused_variables))]
fn render_frame(gpu: &mut GpuState, window: &Window, scene: &SceneContext, overlay: &Overlay) {
    let output = match gpu.context.surface.get_current_texture() {
        Ok(output) => output,
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
            gpu.context.reconfigure();
            return;
        }
        Err(wgpu::SurfaceError::Timeout) => {
            log::warn!("surface timed out, skipping frame");
            return;
        }
        Err(err) => {
            log::error!("Surface error: {err}");
            return;
        }
    };

    let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
    gpu.renderer.render(&gpu.context, &view, scene);

    #[cfg(not(target_arch = "wasm32"))]
    gpu.overlay.render(window, &gpu.context, &view, overlay);

    output.present();
}

impl<M: ViewerMode + 'static> ApplicationHandler for Viewer<M> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            log::error!("failed to start viewer: {err}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(not(target_arch = "wasm32"))]
        if let (Some(window), Some(gpu)) = (self.window.as_ref(), self.gpu.borrow_mut().as_mut()) {
            if gpu.overlay.on_window_event(window, &event) {
                return;
            }
        }

        match &event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(gpu) = self.gpu.borrow_mut().as_mut() {
                    gpu.context.resize(*size);
                }
            }
            #[cfg(not(target_arch = "wasm32"))]
            WindowEvent::KeyboardInput { event: key, .. }
                if key.state == winit::event::ElementState::Pressed
                    && key.physical_key
                        == winit::keyboard::PhysicalKey::Code(winit::keyboard::KeyCode::Escape) =>
            {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.frame();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
                return;
            }
            _ => {}
        }

        self.mode.handle_input(&event);
    }
}

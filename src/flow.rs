//! Application shell and window event loop.
//!
//! [`App`] owns the [`Diorama`] (scene, materials, camera) from the start and
//! the GPU [`Viewer`] once the window exists. It wires winit to the two
//! drivers:
//!
//! - `RedrawRequested` ticks the [`RenderLoop`] (animate, render once)
//! - `Resized` goes through the [`ViewportController`]
//!
//! Texture loads are started right after the viewer is created. They run
//! detached (tokio on native, `spawn_local` on the web) and report back as a
//! [`FlowEvent::TextureLoaded`] user event, so the scene is only ever touched
//! on the event loop.
//!
//! # Lifecycle
//!
//! 1. `resumed`: create the window and the viewer, start the loop
//! 2. every frame: tick, re-request a redraw
//! 3. stop requested (through a [`StopHandle`] or by closing the window):
//!    the next tick reports `Stopped`, the viewer is dropped and the event
//!    loop exits

use std::{fmt::Debug, sync::Arc};

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::Window,
};

use crate::{
    assembly::{Diorama, build_diorama},
    config::ViewerConfig,
    data_structures::material::TextureRequest,
    error::SceneError,
    render::Viewer,
    render_loop::{RenderLoop, StopHandle, Tick},
    resources::texture::load_binary,
    viewport::{Resize, ViewportController},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub(crate) enum FlowEvent {
    /// The viewer finished its asynchronous setup (web only).
    #[allow(dead_code)]
    Initialized(anyhow::Result<Viewer>),
    TextureLoaded {
        material: String,
        path: String,
        result: Result<Vec<u8>, SceneError>,
    },
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(result) => f
                .debug_tuple("Initialized")
                .field(&result.as_ref().map(|_| "Viewer"))
                .finish(),
            Self::TextureLoaded {
                material,
                path,
                result,
            } => f
                .debug_struct("TextureLoaded")
                .field("material", material)
                .field("path", path)
                .field("bytes", &result.as_ref().map(Vec::len))
                .finish(),
        }
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<FlowEvent>,
    config: ViewerConfig,
    diorama: Diorama,
    render_loop: RenderLoop,
    viewport: ViewportController,
    viewer: Option<Viewer>,
}

impl App {
    fn new(
        event_loop: &EventLoop<FlowEvent>,
        config: ViewerConfig,
        stop: StopHandle,
    ) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;

        let diorama = build_diorama(&config);
        for failure in &diorama.failures {
            log::warn!("'{}' is missing from the scene: {}", failure.object, failure.error);
        }
        log::info!(
            "Scene assembled: {} objects, {} lights",
            diorama.scene.object_count(),
            diorama.scene.light_count()
        );
        let render_loop = RenderLoop::with_stop_handle(diorama.spins.clone(), stop);

        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            config,
            diorama,
            render_loop,
            viewport: ViewportController::new(),
            viewer: None,
        })
    }

    /// Installs a freshly created viewer: apply the real window size, start
    /// the loop and kick off texture loads.
    fn on_viewer_ready(&mut self, mut viewer: Viewer) {
        let size = viewer.window().inner_size();
        self.resize(&mut viewer, size);
        self.render_loop.start();
        for request in self.diorama.registry.texture_requests() {
            self.spawn_texture_load(request);
        }
        viewer.request_redraw();
        self.viewer = Some(viewer);
    }

    fn resize(&mut self, viewer: &mut Viewer, size: PhysicalSize<u32>) {
        if let Resize::Applied { aspect, .. } =
            self.viewport
                .on_resize(&mut self.diorama.camera, viewer, size.width, size.height)
        {
            log::debug!("Viewport {}x{} (aspect {aspect})", size.width, size.height);
        }
    }

    fn spawn_texture_load(&self, request: TextureRequest) {
        let proxy = self.proxy.clone();
        let asset_root = self.config.asset_root.clone();
        let load = async move {
            let result = load_binary(&asset_root, &request.path).await;
            if proxy
                .send_event(FlowEvent::TextureLoaded {
                    material: request.material,
                    path: request.path,
                    result,
                })
                .is_err()
            {
                log::debug!("Event loop closed before a texture finished loading");
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        self.async_runtime.spawn(load);

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(load);
    }

    fn on_texture_loaded(
        &mut self,
        material: &str,
        path: &str,
        result: Result<Vec<u8>, SceneError>,
    ) {
        let outcome = result.and_then(|bytes| match &mut self.viewer {
            Some(viewer) => viewer.apply_texture(material, path, &bytes),
            None => Err(SceneError::ResourceLoad {
                path: path.to_string(),
                reason: "viewer was torn down".to_string(),
            }),
        });
        self.diorama.registry.resolve_texture(material, outcome);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewer.take().is_some() {
            log::info!("Viewer released after {} frames", self.render_loop.frames());
        }
        event_loop.exit();
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewer.is_some() {
            return;
        }

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Cannot create the window: {e}");
                event_loop.exit();
                return;
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            let viewer = self
                .async_runtime
                .block_on(Viewer::new(window, &self.config, &self.diorama));
            match viewer {
                Ok(viewer) => self.on_viewer_ready(viewer),
                Err(e) => {
                    log::error!("App initialization failed. Cannot create the viewer: {e:#}");
                    event_loop.exit();
                }
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            let config = self.config.clone();
            // The viewer only reads the diorama while uploading, a snapshot is enough
            let diorama = build_diorama(&config);
            wasm_bindgen_futures::spawn_local(async move {
                let viewer = Viewer::new(window, &config, &diorama).await;
                if proxy.send_event(FlowEvent::Initialized(viewer)).is_err() {
                    log::error!("Event loop closed during initialization");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            FlowEvent::Initialized(Ok(viewer)) => self.on_viewer_ready(viewer),
            FlowEvent::Initialized(Err(e)) => {
                log::error!("App initialization failed. Cannot create the viewer: {e:#}");
                event_loop.exit();
            }
            FlowEvent::TextureLoaded {
                material,
                path,
                result,
            } => self.on_texture_loaded(&material, &path, result),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(mut viewer) = self.viewer.take() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                self.render_loop.stop();
                self.viewer = Some(viewer);
                self.shutdown(event_loop);
                return;
            }
            WindowEvent::Resized(size) => self.resize(&mut viewer, size),
            WindowEvent::RedrawRequested => {
                match self.render_loop.tick(
                    &mut self.diorama.scene,
                    &self.diorama.camera,
                    &mut viewer,
                ) {
                    Ok(Tick::Rendered) | Ok(Tick::Idle) => (),
                    Ok(Tick::Stopped) => {
                        self.viewer = Some(viewer);
                        self.shutdown(event_loop);
                        return;
                    }
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        viewer.reconfigure();
                    }
                    Err(e) => {
                        log::error!("Unable to render {e}");
                    }
                }
            }
            _ => {}
        }
        self.viewer = Some(viewer);
    }
}

/// Opens a window and shows the café until it is closed.
pub fn run(config: ViewerConfig) -> anyhow::Result<()> {
    run_until(config, StopHandle::new())
}

/// Like [`run`], but the loop also ends once `stop` is triggered.
pub fn run_until(config: ViewerConfig, stop: StopHandle) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Could not initialize logger: {e}").into());
        }
    }

    config.validate()?;

    #[cfg(all(feature = "integration-tests", target_os = "linux"))]
    let event_loop: EventLoop<FlowEvent> = {
        use winit::platform::wayland::EventLoopBuilderExtWayland;

        EventLoop::with_user_event().with_any_thread(true).build()?
    };

    #[cfg(all(feature = "integration-tests", target_os = "windows"))]
    let event_loop: EventLoop<FlowEvent> = {
        use winit::platform::windows::EventLoopBuilderExtWindows;

        EventLoop::with_user_event().with_any_thread(true).build()?
    };

    #[cfg(not(all(
        feature = "integration-tests",
        any(target_os = "linux", target_os = "windows")
    )))]
    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;

    let mut app = App::new(&event_loop, config, stop)?;

    event_loop.run_app(&mut app)?;

    Ok(())
}

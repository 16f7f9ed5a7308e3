//! Windowed application: winit event loop, renderer, UI and viewer wiring.

use std::sync::Arc;

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::{
    anatomy::{apply_completion, AssetLoader, LoadPipeline, ModelRegistry, ObjLoader},
    config::ViewerConfig,
    gfx::{rendering::RenderEngine, scene::Scene},
    ui::{viewer_ui, UiAction, UiManager},
    viewer::{ClickGesture, ViewerController},
};

/// The feline skeleton viewer.
///
/// `new` queues every manifest entry for loading right away; bones appear as
/// their files finish, while the window is already interactive.
pub struct FelisApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    registry: ModelRegistry,
    loads: LoadPipeline,
    viewer: ViewerController,
    gesture: ClickGesture,
    cursor: Option<(f32, f32)>,
    fatal: Option<anyhow::Error>,
}

impl FelisApp {
    pub fn new(config: ViewerConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let event_loop = EventLoop::new().context("Failed to create event loop")?;

        let canvas = config
            .layout
            .canvas_rect(config.window.width as f32, config.window.height as f32);
        let scene = Scene::new(config.camera.build(canvas.aspect()));

        let mut loads = LoadPipeline::with_default_threads()?;
        let loader: Arc<dyn AssetLoader> = Arc::new(ObjLoader::new(config.asset_root.clone()));
        loads.spawn_all(&loader, config.manifest.iter().cloned());

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                viewer: ViewerController::new(&config),
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                scene,
                registry: ModelRegistry::new(),
                loads,
                gesture: ClickGesture::default(),
                cursor: None,
                fatal: None,
            },
        })
    }

    /// Runs the event loop until the window closes.
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("Event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop
            .run_app(&mut self.app_state)
            .context("Event loop terminated with an error")?;

        match self.app_state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn window_size(&self) -> (f32, f32) {
        self.window
            .as_ref()
            .map(|window| {
                let size = window.inner_size();
                (size.width as f32, size.height as f32)
            })
            .unwrap_or((
                self.config.window.width as f32,
                self.config.window.height as f32,
            ))
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(event_loop.create_window(attributes)?);
        let (width, height) = window.inner_size().into();

        let renderer = pollster::block_on(RenderEngine::new(window.clone(), width, height))?;
        let ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
        );

        self.window = Some(window);
        self.render_engine = Some(renderer);
        self.ui_manager = Some(ui_manager);
        self.resize(width, height);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        let canvas = self
            .viewer
            .layout()
            .canvas_rect(width as f32, height as f32);
        self.scene
            .camera_manager
            .camera
            .resize_projection(canvas.width as u32, canvas.height as u32);
        if let Some(render_engine) = self.render_engine.as_mut() {
            render_engine.resize(width, height);
        }
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            ui_manager.update_display_size(width, height);
        }
    }

    /// Moves finished loads into the scene. Failures are already logged.
    fn drain_loads(&mut self) {
        for completion in self.loads.poll_completed() {
            let _ = apply_completion(&mut self.scene, &mut self.registry, completion);
        }
    }

    fn in_canvas(&self, pointer: (f32, f32)) -> bool {
        let (width, height) = self.window_size();
        self.viewer
            .layout()
            .canvas_rect(width, height)
            .contains(pointer.0, pointer.1)
    }

    fn keyboard(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        let PhysicalKey::Code(key_code) = event.physical_key else {
            return;
        };
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }

        let shift_held = self.scene.camera_manager.controller.is_shift_held();
        if key_code == KeyCode::Escape {
            event_loop.exit();
        } else if is_return_shortcut(key_code, shift_held) {
            self.viewer.return_to_assembly(&mut self.scene);
        }
    }

    fn mouse_button(&mut self, state: ElementState, button: MouseButton) {
        let Some(pointer) = self.cursor else {
            return;
        };

        // Drags only start inside the canvas but always end
        if state == ElementState::Released || self.in_canvas(pointer) {
            self.scene
                .camera_manager
                .process_mouse_button(button, state);
        }
        if button != MouseButton::Left {
            return;
        }

        match state {
            ElementState::Pressed if self.in_canvas(pointer) => self.gesture.press(pointer),
            ElementState::Pressed => self.gesture.cancel(),
            ElementState::Released => {
                if self.gesture.release(pointer) {
                    let window_size = self.window_size();
                    self.viewer.click(&mut self.scene, pointer, window_size);
                }
            }
        }
    }

    fn redraw(&mut self) {
        self.drain_loads();
        self.scene.update();

        let (Some(window), Some(render_engine), Some(ui_manager)) = (
            self.window.as_ref(),
            self.render_engine.as_mut(),
            self.ui_manager.as_mut(),
        ) else {
            return;
        };
        render_engine.update(self.scene.camera_manager.camera.uniform);

        let size = window.inner_size();
        let canvas = self
            .viewer
            .layout()
            .canvas_rect(size.width as f32, size.height as f32);

        let mut action = UiAction::None;
        let viewer = &self.viewer;
        let title = self.config.window.title.as_str();
        let result = render_engine.render_frame(
            &self.scene,
            canvas,
            |device, queue, encoder, color_attachment| {
                ui_manager.draw(device, queue, encoder, window, color_attachment, |ui| {
                    action = viewer_ui(ui, viewer.state(), viewer.layout(), title);
                });
            },
        );

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_engine.reconfigure();
            }
            Err(e) => log::warn!("Skipped frame: {e}"),
        }

        if action == UiAction::ReturnToFullModel {
            self.viewer.return_to_assembly(&mut self.scene);
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.init_graphics(event_loop) {
            log::error!("Failed to initialise graphics: {err:#}");
            self.fatal = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // UI sees input first; while it wants the mouse the pointer is off the model
        let ui_captured = self.ui_manager.as_mut().is_some_and(|ui_manager| {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            ui_manager.handle_input(&window, &ui_event)
        });

        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let pointer = (position.x as f32, position.y as f32);
                self.cursor = Some(pointer);
                if ui_captured {
                    self.viewer.pointer_left(&mut self.scene);
                } else {
                    let window_size = self.window_size();
                    self.viewer
                        .pointer_moved(&mut self.scene, pointer, window_size);
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.gesture.cancel();
                self.viewer.pointer_left(&mut self.scene);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if ui_captured && state == ElementState::Pressed {
                    self.gesture.cancel();
                } else {
                    self.mouse_button(state, button);
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.scene.camera_manager.process_modifiers(&modifiers);
            }
            WindowEvent::KeyboardInput { event, .. } if !ui_captured => {
                self.keyboard(event_loop, &event);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.resize(width, height);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        if self
            .ui_manager
            .as_ref()
            .is_some_and(|ui_manager| ui_manager.wants_input())
        {
            return;
        }
        // Wheel zoom only over the canvas; drags are gated by the button state
        if matches!(event, winit::event::DeviceEvent::MouseWheel { .. })
            && !self.cursor.is_some_and(|pointer| self.in_canvas(pointer))
        {
            return;
        }

        self.scene.camera_manager.process_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

/// Backspace or Shift+C returns to the full model.
fn is_return_shortcut(key_code: KeyCode, shift_held: bool) -> bool {
    match key_code {
        KeyCode::Backspace => true,
        KeyCode::KeyC => shift_held,
        _ => false,
    }
}

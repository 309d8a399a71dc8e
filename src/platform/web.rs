//! JS-facing session wrapper
//!
//! The page owns the event listeners and frame loop. It forwards key and
//! pointer events here and calls `tick()` once per animation frame. A session
//! built with `withCanvas` also draws every tick through the wgpu renderer;
//! either way the returned JSON snapshot feeds the page's HUD.

use std::sync::Arc;

use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::commentary::CannedNarrator;
use crate::config::SimConfig;
use crate::input::KeyState;
use crate::renderer::{RenderError, RenderState};
use crate::session::GameSession;
use crate::sim::RenderSnapshot;

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

async fn create_renderer(canvas: HtmlCanvasElement) -> Result<RenderState, RenderError> {
    let (width, height) = (canvas.width(), canvas.height());
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
        ..Default::default()
    });
    let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await?;
    log::info!("Using adapter: {:?}", adapter.get_info().name);

    RenderState::new(surface, &adapter, width, height).await
}

#[wasm_bindgen]
pub struct WasmSession {
    session: GameSession,
    keys: KeyState,
    renderer: Option<RenderState>,
}

#[wasm_bindgen]
impl WasmSession {
    /// Create a headless session from an optional partial JSON config
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WasmSession, JsValue> {
        super::init_logging();
        let config = match config_json {
            Some(json) => SimConfig::from_json(&json),
            None => Ok(SimConfig::default()),
        }
        .map_err(js_error)?;
        let session =
            GameSession::new(config, Arc::new(CannedNarrator::new())).map_err(js_error)?;
        Ok(Self {
            session,
            keys: KeyState::default(),
            renderer: None,
        })
    }

    /// Create a session that renders into the canvas with id `canvas_id`
    #[wasm_bindgen(js_name = withCanvas)]
    pub async fn with_canvas(
        canvas_id: String,
        config_json: Option<String>,
    ) -> Result<WasmSession, JsValue> {
        let mut this = Self::new(config_json)?;

        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
        let canvas: HtmlCanvasElement = window
            .document()
            .and_then(|d| d.get_element_by_id(&canvas_id))
            .ok_or_else(|| js_error(format!("no element #{canvas_id}")))?
            .dyn_into()
            .map_err(|_| js_error(format!("#{canvas_id} is not a canvas")))?;

        let dpr = window.device_pixel_ratio();
        canvas.set_width((canvas.client_width() as f64 * dpr) as u32);
        canvas.set_height((canvas.client_height() as f64 * dpr) as u32);

        this.renderer = Some(create_renderer(canvas).await.map_err(js_error)?);
        Ok(this)
    }

    pub fn start(&mut self) -> bool {
        self.session.start()
    }

    /// Forward a `KeyboardEvent.code` (or "MouseLeft")
    pub fn key(&mut self, code: &str, pressed: bool) -> bool {
        self.keys.set_key(code, pressed)
    }

    /// Pointer position relative to a canvas element of the given CSS size
    pub fn pointer(&mut self, x: f32, y: f32, element_width: f32, element_height: f32) {
        let bounds = self.session.config().bounds;
        self.keys.set_pointer(
            glam::Vec2::new(x, y),
            glam::Vec2::ZERO,
            glam::Vec2::new(element_width, element_height),
            &bounds,
        );
    }

    /// Resize the drawing surface, in device pixels
    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(width, height);
        }
    }

    /// Advance one frame, draw it when a canvas is attached and return the
    /// render snapshot as JSON
    pub fn tick(&mut self) -> Result<String, JsValue> {
        let (snapshot, _) = self.session.tick(&self.keys.snapshot());
        self.draw(&snapshot);
        snapshot.to_json().map_err(js_error)
    }

    pub fn commentary(&self) -> String {
        self.session.commentary().to_string()
    }

    pub fn state(&self) -> String {
        self.session.phase().as_str().to_string()
    }

    #[wasm_bindgen(js_name = highScore)]
    pub fn high_score(&self) -> f64 {
        self.session.high_score() as f64
    }
}

impl WasmSession {
    fn draw(&mut self, snapshot: &RenderSnapshot) {
        let Some(renderer) = &mut self.renderer else {
            return;
        };
        match renderer.render(snapshot) {
            Ok(()) => {}
            Err(RenderError::Surface(wgpu::SurfaceError::Lost)) => {
                let (w, h) = renderer.size;
                renderer.resize(w, h);
            }
            Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

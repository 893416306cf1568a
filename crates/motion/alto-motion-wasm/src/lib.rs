use js_sys::Array;
use serde::Deserialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use alto_motion_core::{
    BindingOptions, Config, ElementId, Marker, MemoryDocument, MotionName, MotionScope, NodeSpec,
    Outputs, Rect,
};

/// Page mirror plus the motion scope driving it. The JS glue forwards DOM
/// insertions/removals, layout, animation frames and elapsed time, and applies
/// the returned outputs to the real elements.
#[wasm_bindgen]
pub struct AltoMotion {
    scope: MotionScope,
    doc: Option<MemoryDocument>,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn not_mounted() -> JsError {
    JsError::new("alto-motion: call mount() first")
}

fn id_to_js(id: ElementId) -> Result<u32, JsError> {
    u32::try_from(id.0).map_err(|_| JsError::new(&format!("element id {} exceeds u32", id.0)))
}

/// Measured layout sent after scroll/resize.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LayoutUpdate {
    viewport_height: Option<f32>,
    scroll_by: Option<f32>,
    rects: Vec<RectEntry>,
}

#[derive(Debug, Deserialize)]
struct RectEntry {
    id: u64,
    top: f32,
    bottom: f32,
}

#[wasm_bindgen]
impl AltoMotion {
    /// Create a new instance. Pass a config object or undefined/null for defaults.
    /// Example:
    ///   new AltoMotion({ refresh_cooldown_ms: 250 })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<AltoMotion, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        Ok(AltoMotion {
            scope: MotionScope::new(cfg),
            doc: None,
        })
    }

    /// Mirror the page from a node tree and run the initial scan. Returns the scan report.
    #[wasm_bindgen]
    pub fn mount(&mut self, tree: JsValue, viewport_height: f32) -> Result<JsValue, JsError> {
        let spec: NodeSpec =
            swb::from_value(tree).map_err(|e| JsError::new(&format!("mount parse error: {e}")))?;
        self.mount_spec(&spec, viewport_height)
    }

    /// Same as `mount`, from a JSON string.
    #[wasm_bindgen(js_name = mount_json)]
    pub fn mount_json(&mut self, json: &str, viewport_height: f32) -> Result<JsValue, JsError> {
        let spec: NodeSpec = serde_json::from_str(json)
            .map_err(|e| JsError::new(&format!("mount_json parse error: {e}")))?;
        self.mount_spec(&spec, viewport_height)
    }

    /// Mirror an inserted subtree under `parent`. Returns the subtree root id.
    #[wasm_bindgen]
    pub fn insert(&mut self, parent: u32, subtree: JsValue) -> Result<u32, JsError> {
        let spec: NodeSpec = swb::from_value(subtree)
            .map_err(|e| JsError::new(&format!("insert parse error: {e}")))?;
        let doc = self.doc.as_mut().ok_or_else(not_mounted)?;
        let id = doc
            .append(ElementId(u64::from(parent)), spec)
            .map_err(|e| JsError::new(&format!("insert error: {e}")))?;
        self.scope.notify_inserted(doc, &[id]);
        id_to_js(id)
    }

    /// Drop an element (and its subtree) from the mirror. Returns how many
    /// attached elements were released.
    #[wasm_bindgen]
    pub fn remove(&mut self, id: u32) -> Result<u32, JsError> {
        let doc = self.doc.as_mut().ok_or_else(not_mounted)?;
        let removed = doc.remove(ElementId(u64::from(id)));
        let released = self.scope.notify_removed(&removed);
        Ok(released as u32)
    }

    /// Apply measured rects / viewport changes and re-check triggers.
    #[wasm_bindgen(js_name = set_layout)]
    pub fn set_layout(&mut self, layout: JsValue) -> Result<(), JsError> {
        let layout: LayoutUpdate = if jsvalue_is_undefined_or_null(&layout) {
            LayoutUpdate::default()
        } else {
            swb::from_value(layout).map_err(|e| JsError::new(&format!("layout error: {e}")))?
        };
        let doc = self.doc.as_mut().ok_or_else(not_mounted)?;
        if let Some(vh) = layout.viewport_height {
            doc.set_viewport_height(vh);
        }
        if let Some(dy) = layout.scroll_by {
            doc.scroll_by(dy);
        }
        for r in layout.rects {
            doc.set_rect(
                ElementId(r.id),
                Rect {
                    top: r.top,
                    bottom: r.bottom,
                },
            );
        }
        self.scope.on_layout(doc);
        Ok(())
    }

    /// requestAnimationFrame callback. Returns the re-scan report, or undefined
    /// when no re-scan ran this frame.
    #[wasm_bindgen(js_name = animation_frame)]
    pub fn animation_frame(&mut self, now_ms: f64) -> Result<JsValue, JsError> {
        let doc = self.doc.as_mut().ok_or_else(not_mounted)?;
        match self.scope.animation_frame(doc, now_ms) {
            Some(report) => {
                swb::to_value(&report).map_err(|e| JsError::new(&format!("report error: {e}")))
            }
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// True while the glue should keep requesting animation frames for the watcher.
    #[wasm_bindgen(js_name = needs_frame)]
    pub fn needs_frame(&self) -> bool {
        self.scope.needs_frame()
    }

    /// Bind one element to a motion by name (`"fadeInUp"`, ...). `options` is an
    /// optional object matching BindingOptions. Returns false when already attached.
    #[wasm_bindgen]
    pub fn animate(&mut self, id: u32, motion: &str, options: JsValue) -> Result<bool, JsError> {
        let motion: MotionName = motion
            .parse()
            .map_err(|e| JsError::new(&format!("animate error: {e}")))?;
        let opts: BindingOptions = if jsvalue_is_undefined_or_null(&options) {
            BindingOptions::default()
        } else {
            swb::from_value(options).map_err(|e| JsError::new(&format!("options error: {e}")))?
        };
        let doc = self.doc.as_mut().ok_or_else(not_mounted)?;
        Ok(self
            .scope
            .animate(doc, ElementId(u64::from(id)), motion, opts))
    }

    /// Step tweens by dt (seconds). Returns Outputs JSON.
    #[wasm_bindgen]
    pub fn update(&mut self, dt: f32) -> Result<JsValue, JsError> {
        let out: &Outputs = self.scope.update(dt);
        swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    /// Disconnect the watcher and cancel every tween and trigger.
    #[wasm_bindgen]
    pub fn teardown(&mut self) {
        self.scope.teardown();
    }
}

impl AltoMotion {
    fn mount_spec(&mut self, spec: &NodeSpec, viewport_height: f32) -> Result<JsValue, JsError> {
        let mut doc = MemoryDocument::from_spec(spec, viewport_height)
            .map_err(|e| JsError::new(&format!("mount error: {e}")))?;
        let root = doc.root();
        let report = self.scope.mount(&mut doc, root);
        self.doc = Some(doc);
        swb::to_value(&report).map_err(|e| JsError::new(&format!("report error: {e}")))
    }
}

/// Marker class names, in precedence order, for building the glue's selectors.
#[wasm_bindgen(js_name = marker_classes)]
pub fn marker_classes() -> Array {
    Marker::all()
        .map(|m| JsValue::from_str(m.class_name()))
        .collect()
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}

use linear_quadtree::geometry::points_from_flat;
use linear_quadtree::LinearQuadtree;
use wasm_bindgen::prelude::*;

/// A linear quadtree owned by JavaScript.
///
/// Bodies are passed as a flat `Float32Array` of `[x, y, mass]` triples and the node array
/// comes back as raw bytes, 20 per node, ready for `GPUDevice.queue.writeBuffer`.
#[wasm_bindgen]
pub struct WasmQuadtree {
    tree: LinearQuadtree,
}

#[wasm_bindgen]
impl WasmQuadtree {
    #[wasm_bindgen(constructor)]
    pub fn new(max_depth: usize) -> Result<WasmQuadtree, JsValue> {
        let tree = LinearQuadtree::new(max_depth).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmQuadtree { tree })
    }

    /// Rebuilds the tree from `bodies`. The previous tree is kept when this fails.
    pub fn build(&mut self, bodies: &[f32]) -> Result<(), JsValue> {
        let result = points_from_flat(bodies).and_then(|points| self.tree.build(points));
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                web_sys::console::warn_1(&format!("Quadtree build rejected: {}", e).into());
                Err(JsValue::from_str(&e.to_string()))
            }
        }
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    #[wasm_bindgen(getter)]
    pub fn node_count(&self) -> usize {
        self.tree.capacity()
    }

    #[wasm_bindgen(getter)]
    pub fn max_depth(&self) -> usize {
        self.tree.max_depth()
    }

    pub fn node_bytes(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(self.tree.as_bytes())
    }

    /// `[x, y, mass]` of the whole system, or `undefined` for an empty tree.
    pub fn root_centroid(&self) -> Option<js_sys::Float32Array> {
        self.tree.root().centroid().map(|c| {
            let values = [c.x, c.y, c.mass];
            js_sys::Float32Array::from(&values[..])
        })
    }
}

//! WASM bindings for purchase-order ingestion.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.

use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

use poflow_core::models::config::PoflowConfig;
use poflow_core::{Grid, OrderLookups, OrderPipeline, ProcessedOrder, ProcessingError, Stage};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Process a cell grid (array of rows) with the default configuration.
#[wasm_bindgen]
pub fn process_grid(grid: JsValue, lookups: JsValue) -> Result<JsValue, JsValue> {
    OrderProcessor::new(JsValue::UNDEFINED)?.process_grid(grid, lookups)
}

/// Process the bytes of an `.xls` workbook with the default configuration.
#[wasm_bindgen]
pub fn process_workbook(bytes: &[u8], lookups: JsValue) -> Result<JsValue, JsValue> {
    OrderProcessor::new(JsValue::UNDEFINED)?.process_workbook(bytes, lookups)
}

/// Split a free-text address into address text, postal code and region.
#[wasm_bindgen]
pub fn normalize_address(text: &str) -> Result<JsValue, JsValue> {
    to_js(&poflow_core::normalize_address(Some(text)))
}

/// Purchase-order processor with its own configuration.
#[wasm_bindgen]
pub struct OrderProcessor {
    config: PoflowConfig,
}

#[wasm_bindgen]
impl OrderProcessor {
    /// Create a processor; `config` may be `undefined` for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<OrderProcessor, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            PoflowConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        Ok(Self { config })
    }

    /// Set the sender mailbox used for the sender extra field.
    #[wasm_bindgen]
    pub fn set_sender(&mut self, email: &str) {
        self.config.lookups.sender_email = email.to_string();
    }

    /// Current configuration as a plain object.
    #[wasm_bindgen]
    pub fn config(&self) -> Result<JsValue, JsValue> {
        to_js(&self.config)
    }

    /// Process a cell grid.
    #[wasm_bindgen]
    pub fn process_grid(&self, grid: JsValue, lookups: JsValue) -> Result<JsValue, JsValue> {
        let grid: Grid =
            serde_wasm_bindgen::from_value(grid).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let lookups = parse_lookups(lookups)?;

        let started = js_sys::Date::now();
        let result = self.pipeline().process(&grid, &lookups);
        finish(result, started)
    }

    /// Process the bytes of an `.xls` workbook.
    #[wasm_bindgen]
    pub fn process_workbook(&self, bytes: &[u8], lookups: JsValue) -> Result<JsValue, JsValue> {
        let lookups = parse_lookups(lookups)?;

        let started = js_sys::Date::now();
        let result = self.pipeline().process_workbook(bytes, &lookups);
        finish(result, started)
    }
}

impl OrderProcessor {
    fn pipeline(&self) -> OrderPipeline {
        OrderPipeline::new(self.config.clone())
    }
}

/// Error object thrown to JavaScript callers.
#[derive(Serialize)]
struct ErrorReport<'a> {
    error: String,
    completed: &'a [Stage],
    failed_at: Option<Stage>,
}

fn parse_lookups(lookups: JsValue) -> Result<OrderLookups, JsValue> {
    serde_wasm_bindgen::from_value(lookups).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn finish(result: Result<ProcessedOrder, ProcessingError>, started: f64) -> Result<JsValue, JsValue> {
    match result {
        Ok(mut processed) => {
            processed.processing_time_ms = (js_sys::Date::now() - started).max(0.0) as u64;
            to_js(&processed)
        }
        Err(err) => {
            let report = ErrorReport {
                error: err.to_string(),
                completed: err.checklist.completed(),
                failed_at: err.checklist.next_pending(),
            };
            Err(to_js(&report)?)
        }
    }
}

/// Serialize to plain JS objects (maps become objects, not `Map`s).
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    fn grid() -> JsValue {
        let value = serde_json::json!([
            ["ORDER DATE", "05-01-24"],
            ["SHIPPED TO ADDRESS", "Sector 18, Noida, Uttar Pradesh 201301"],
            ["ORDER DETAILS"],
            ["FSN/ISBN13", "Title", "Quantity", "Total Amount"],
            ["OIL 1", "Mustard Oil 1L", 2, "360"],
            [null, null, null, "INR 360"],
            ["Important Notification", "Total=", "INR 360"]
        ]);
        to_js(&value).unwrap()
    }

    fn lookups() -> JsValue {
        let value = serde_json::json!({
            "statuses": [{"id": 1, "name": "New orders"}],
            "sources": [{"id": "7", "name": "FLIPKART GROCERY"}]
        });
        to_js(&value).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[wasm_bindgen_test]
    fn test_process_grid() {
        let result = process_grid(grid(), lookups()).unwrap();
        let processed: serde_json::Value = serde_wasm_bindgen::from_value(result).unwrap();

        assert_eq!(processed["order"]["delivery_state"], "Uttar Pradesh");
        assert_eq!(processed["order"]["products"][0]["quantity"], 2);
    }

    #[wasm_bindgen_test]
    fn test_process_grid_reports_stage() {
        let err = process_grid(grid(), to_js(&serde_json::json!({})).unwrap()).unwrap_err();
        let report: serde_json::Value = serde_wasm_bindgen::from_value(err).unwrap();

        assert_eq!(report["failed_at"], "resolve_status");
    }

    #[wasm_bindgen_test]
    fn test_normalize_address() {
        let result = normalize_address("12 Residency Road, Bengaluru, Karnataka 560025").unwrap();
        let address: serde_json::Value = serde_wasm_bindgen::from_value(result).unwrap();

        assert_eq!(address["postal_code"], "560025");
        assert_eq!(address["region"], "Karnataka");
        assert_eq!(address["address"], "12 Residency Road, Bengaluru");
    }
}

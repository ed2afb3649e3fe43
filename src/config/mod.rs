use leptos::logging::warn;
use serde::{Deserialize, Serialize};

/// Selectors and user-facing text the page behaviors rely on.
///
/// Defaults match the markup rendered by the recipe server. A page can
/// override any subset through `window.ENV.RECIPE_UI`, e.g.
/// `window.ENV = { RECIPE_UI: { delete_message: "Really delete?" } }`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    pub delete_selector: String,
    pub delete_message: String,

    pub form_selector: String,
    pub required_selector: String,
    pub search_form_class: String,
    pub search_field_selector: String,
    pub invalid_border_color: String,
    pub validation_message: String,

    pub image_input_selector: String,
    pub preview_class: String,
    pub preview_max_width_px: u32,
    /// Same list the server accepts on upload. Files outside it get the
    /// unsupported notice instead of a preview, so an input whose `accept`
    /// attribute allows more (e.g. `image/*`) will not preview webp or svg.
    pub allowed_image_extensions: Vec<String>,
    pub unsupported_image_message: String,
    pub preview_failed_message: String,

    pub remove_selector: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            delete_selector: ".delete-btn".to_string(),
            delete_message: "Are you sure you want to delete this recipe?".to_string(),
            form_selector: "form".to_string(),
            required_selector: "[required]".to_string(),
            search_form_class: "search-form".to_string(),
            search_field_selector: r#"input[name="q"]"#.to_string(),
            invalid_border_color: "#dc3545".to_string(),
            validation_message: "Please fill in all required fields".to_string(),
            image_input_selector: r#"input[type="file"][name="image"]"#.to_string(),
            preview_class: "image-preview".to_string(),
            preview_max_width_px: 200,
            allowed_image_extensions: ["png", "jpg", "jpeg", "gif"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            unsupported_image_message: "Unsupported image type".to_string(),
            preview_failed_message: "Could not preview this image".to_string(),
            remove_selector: ".remove-btn".to_string(),
        }
    }
}

impl PageConfig {
    /// Defaults, overlaid with `window.ENV.RECIPE_UI` when the page provides it.
    pub fn new() -> Self {
        let Some(json) = read_window_overrides() else {
            return Self::default();
        };

        match Self::from_json(&json) {
            Ok(config) => config,
            Err(e) => {
                warn!("ignoring window.ENV.RECIPE_UI: {e}");
                Self::default()
            }
        }
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid page config: {e}"))
    }
}

fn read_window_overrides() -> Option<String> {
    let window = web_sys::window()?;
    let env = window.get("ENV")?;
    if env.is_undefined() || !env.is_object() {
        return None;
    }

    let ui = js_sys::Reflect::get(&env, &"RECIPE_UI".into()).ok()?;
    if ui.is_undefined() || ui.is_null() || !ui.is_object() {
        return None;
    }

    js_sys::JSON::stringify(&ui).ok().map(String::from)
}

use crate::config::PageConfig;
use crate::util::{append, create_element, listen, query_all, set_attr};
use leptos::logging::warn;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, File, FileReader, HtmlInputElement};

/// Whether the server will accept this upload, judged by extension only.
pub(crate) fn is_allowed_image(file_name: &str, allowed: &[String]) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

pub(crate) fn preview_image_style(max_width_px: u32) -> String {
    format!("max-width: {max_width_px}px; border-radius: 4px;")
}

enum PreviewContent<'a> {
    Image { data_url: &'a str },
    Notice { message: &'a str },
}

/// The element right after `input` if it is a preview, otherwise a new one
/// inserted there.
fn ensure_preview_container(input: &Element, config: &PageConfig) -> Result<Element, String> {
    if let Some(next) = input.next_element_sibling() {
        if next.class_list().contains(&config.preview_class) {
            return Ok(next);
        }
    }

    let document = input
        .owner_document()
        .ok_or_else(|| "image input has no owner document".to_string())?;
    let parent = input
        .parent_node()
        .ok_or_else(|| "image input is detached".to_string())?;

    let preview = create_element(&document, "div")?;
    preview.set_class_name(&format!("{} mt-3", config.preview_class));
    parent
        .insert_before(&preview, input.next_sibling().as_ref())
        .map_err(|e| format!("failed to insert preview: {e:?}"))?;
    Ok(preview)
}

fn render(input: &Element, config: &PageConfig, content: PreviewContent<'_>) -> Result<(), String> {
    let preview = ensure_preview_container(input, config)?;
    let document = input
        .owner_document()
        .ok_or_else(|| "image input has no owner document".to_string())?;

    preview.set_inner_html("");
    let child = match content {
        PreviewContent::Image { data_url } => {
            let img = create_element(&document, "img")?;
            set_attr(&img, "src", data_url)?;
            set_attr(&img, "alt", "Preview")?;
            set_attr(&img, "style", &preview_image_style(config.preview_max_width_px))?;
            img
        }
        PreviewContent::Notice { message } => {
            let p = create_element(&document, "p")?;
            p.set_class_name("text-danger small mb-0");
            p.set_text_content(Some(message));
            p
        }
    };
    append(&preview, &child)
}

pub(crate) fn render_preview_image(
    input: &Element,
    config: &PageConfig,
    data_url: &str,
) -> Result<(), String> {
    render(input, config, PreviewContent::Image { data_url })
}

pub(crate) fn render_preview_notice(
    input: &Element,
    config: &PageConfig,
    message: &str,
) -> Result<(), String> {
    render(input, config, PreviewContent::Notice { message })
}

/// Start reading `file`; the preview updates whenever the read settles.
/// Reads are not cancelled, so the last one to finish wins.
fn start_read(input: &HtmlInputElement, file: &File, config: &Rc<PageConfig>) -> Result<(), String> {
    let reader = FileReader::new().map_err(|e| format!("FileReader unavailable: {e:?}"))?;

    // `loadend` fires exactly once per read, after success, error or abort.
    let onloadend = {
        let reader = reader.clone();
        let input = input.clone();
        let config = config.clone();
        Closure::once_into_js(move || {
            let data_url = match reader.error() {
                Some(e) => {
                    warn!("image preview: read failed: {}", e.message());
                    None
                }
                None => reader.result().ok().and_then(|v| v.as_string()),
            };
            let rendered = match data_url {
                Some(data_url) => render_preview_image(&input, &config, &data_url),
                None => render_preview_notice(&input, &config, &config.preview_failed_message),
            };
            if let Err(e) = rendered {
                warn!("image preview: {e}");
            }
        })
    };

    reader.set_onloadend(Some(onloadend.unchecked_ref()));
    reader
        .read_as_data_url(file)
        .map_err(|e| format!("failed to start reading image: {e:?}"))
}

fn on_image_selected(input: &HtmlInputElement, config: &Rc<PageConfig>) {
    // Cleared selection: leave whatever preview is there.
    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        return;
    };

    let result = if is_allowed_image(&file.name(), &config.allowed_image_extensions) {
        start_read(input, &file, config)
    } else {
        render_preview_notice(input, config, &config.unsupported_image_message)
    };

    if let Err(e) = result {
        warn!("image preview: {e}");
    }
}

/// Preview the chosen file under every image upload input. Returns the number
/// of inputs wired.
pub(crate) fn attach_image_previews(
    document: &Document,
    config: &Rc<PageConfig>,
) -> Result<usize, String> {
    let mut wired = 0;

    for el in query_all(document, &config.image_input_selector)? {
        let Ok(input) = el.dyn_into::<HtmlInputElement>() else {
            continue;
        };
        let input_for_change = input.clone();
        let config = config.clone();
        listen(&input, "change", move |_ev: web_sys::Event| {
            on_image_selected(&input_for_change, &config);
        })?;
        wired += 1;
    }

    Ok(wired)
}


// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::util::query_all_in;
    use leptos::prelude::document;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const PIXEL: &str = "data:image/gif;base64,R0lGODlhAQABAAAAACw=";

    fn mount() -> (Element, Element) {
        let doc = document();
        doc.body().expect("body").set_inner_html(
            r#"<div id="wrap"><input id="img" type="file" name="image"><p id="after">hint</p></div>"#,
        );
        let wrap = doc.get_element_by_id("wrap").expect("wrapper");
        let input = doc.get_element_by_id("img").expect("input");
        (wrap, input)
    }

    #[wasm_bindgen_test]
    fn test_preview_is_inserted_right_after_input() {
        let (wrap, input) = mount();
        let config = PageConfig::default();
        render_preview_image(&input, &config, PIXEL).expect("render");

        let next = input.next_element_sibling().expect("preview follows input");
        assert!(next.class_list().contains("image-preview"));
        let imgs = query_all_in(&next, "img").expect("query");
        assert_eq!(imgs.len(), 1);
        assert_eq!(imgs[0].get_attribute("src").as_deref(), Some(PIXEL));
        assert_eq!(wrap.child_element_count(), 3);
    }

    #[wasm_bindgen_test]
    fn test_second_image_replaces_first() {
        let (wrap, input) = mount();
        let config = PageConfig::default();
        render_preview_image(&input, &config, PIXEL).expect("first render");
        render_preview_image(&input, &config, "data:image/png;base64,AA==").expect("second render");

        assert_eq!(query_all_in(&wrap, ".image-preview").expect("query").len(), 1);
        let imgs = query_all_in(&wrap, ".image-preview img").expect("query");
        assert_eq!(imgs.len(), 1);
        assert_eq!(
            imgs[0].get_attribute("src").as_deref(),
            Some("data:image/png;base64,AA==")
        );
    }

    #[wasm_bindgen_test]
    fn test_failure_notice_reuses_container() {
        let (wrap, input) = mount();
        let config = PageConfig::default();
        render_preview_image(&input, &config, PIXEL).expect("render");
        render_preview_notice(&input, &config, &config.preview_failed_message).expect("notice");

        let previews = query_all_in(&wrap, ".image-preview").expect("query");
        assert_eq!(previews.len(), 1);
        assert_eq!(
            previews[0].text_content().as_deref(),
            Some("Could not preview this image")
        );
        assert!(query_all_in(&wrap, "img").expect("query").is_empty());
    }

    async fn sleep_ms(ms: i32) {
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let _ = web_sys::window()
                .expect("window")
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
        });
        let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
    }

    fn mount_wired() -> (Element, HtmlInputElement) {
        let (wrap, input) = mount();
        let wired = attach_image_previews(&document(), &Rc::new(PageConfig::default()))
            .expect("previews attach");
        assert_eq!(wired, 1);
        (wrap, input.dyn_into().expect("file input"))
    }

    /// Put `files` (name, contents) on the input and fire `change` like a user pick.
    fn select(input: &HtmlInputElement, files: &[(&str, &str)]) {
        let transfer = web_sys::DataTransfer::new().expect("DataTransfer");
        for (name, body) in files {
            let parts = js_sys::Array::of1(&wasm_bindgen::JsValue::from_str(body));
            let file = File::new_with_str_sequence(&parts, name).expect("file");
            transfer.items().add_with_file(&file).expect("add file");
        }
        input.set_files(transfer.files().as_ref());
        let _ = input.dispatch_event(&web_sys::Event::new("change").expect("event"));
    }

    fn preview_src(wrap: &Element) -> Option<String> {
        query_all_in(wrap, ".image-preview img")
            .ok()
            .and_then(|imgs| imgs.first().and_then(|img| img.get_attribute("src")))
    }

    /// Wait for the read to land: an image whose src differs from `previous`.
    async fn wait_for_new_src(wrap: &Element, previous: Option<&str>) -> Option<String> {
        for _ in 0..50 {
            let src = preview_src(wrap);
            if src.is_some() && src.as_deref() != previous {
                return src;
            }
            sleep_ms(10).await;
        }
        None
    }

    #[wasm_bindgen_test]
    async fn test_selected_image_is_read_and_second_pick_replaces_it() {
        let (wrap, input) = mount_wired();

        select(&input, &[("cake.gif", "GIF89a first")]);
        let first = wait_for_new_src(&wrap, None).await.expect("first preview");
        assert!(first.starts_with("data:"));
        assert_eq!(query_all_in(&wrap, ".image-preview").expect("query").len(), 1);

        select(&input, &[("pie.png", "second picture")]);
        let second = wait_for_new_src(&wrap, Some(first.as_str())).await.expect("second preview");
        assert!(second.starts_with("data:"));
        assert_eq!(query_all_in(&wrap, ".image-preview").expect("query").len(), 1);
        assert_eq!(query_all_in(&wrap, ".image-preview img").expect("query").len(), 1);
    }

    #[wasm_bindgen_test]
    async fn test_unsupported_file_gets_notice_and_no_read() {
        let (wrap, input) = mount_wired();

        select(&input, &[("notes.txt", "not a picture")]);
        let previews = query_all_in(&wrap, ".image-preview").expect("query");
        assert_eq!(previews.len(), 1);
        assert_eq!(previews[0].text_content().as_deref(), Some("Unsupported image type"));

        sleep_ms(50).await;
        assert!(preview_src(&wrap).is_none());
    }

    #[wasm_bindgen_test]
    async fn test_cleared_selection_keeps_existing_preview() {
        let (wrap, input) = mount_wired();

        select(&input, &[("cake.jpg", "crumb")]);
        let shown = wait_for_new_src(&wrap, None).await.expect("preview");

        select(&input, &[]);
        sleep_ms(50).await;
        assert_eq!(preview_src(&wrap), Some(shown));
        assert_eq!(query_all_in(&wrap, ".image-preview").expect("query").len(), 1);
    }
}

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, EventTarget, NodeList};

pub(crate) fn node_list_elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .collect()
}

/// `document.querySelectorAll`, in document order.
pub(crate) fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, String> {
    let list = document
        .query_selector_all(selector)
        .map_err(|e| format!("bad selector `{selector}`: {e:?}"))?;
    Ok(node_list_elements(&list))
}

/// `element.querySelectorAll`, in document order.
pub(crate) fn query_all_in(root: &Element, selector: &str) -> Result<Vec<Element>, String> {
    let list = root
        .query_selector_all(selector)
        .map_err(|e| format!("bad selector `{selector}`: {e:?}"))?;
    Ok(node_list_elements(&list))
}

/// Attach `handler` for the lifetime of the page.
///
/// The closure is leaked on purpose: listeners stay bound until unload.
pub(crate) fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), String>
where
    F: FnMut(web_sys::Event) + 'static,
{
    let cb = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    target
        .add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())
        .map_err(|e| format!("failed to listen for `{event}`: {e:?}"))?;
    cb.forget();
    Ok(())
}

pub(crate) fn create_element(document: &Document, tag: &str) -> Result<Element, String> {
    document
        .create_element(tag)
        .map_err(|e| format!("failed to create <{tag}>: {e:?}"))
}

pub(crate) fn set_attr(el: &Element, name: &str, value: &str) -> Result<(), String> {
    el.set_attribute(name, value)
        .map_err(|e| format!("failed to set `{name}`: {e:?}"))
}

pub(crate) fn append(parent: &Element, child: &web_sys::Node) -> Result<(), String> {
    parent
        .append_child(child)
        .map(|_| ())
        .map_err(|e| format!("failed to append child: {e:?}"))
}

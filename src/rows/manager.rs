use crate::config::PageConfig;
use crate::models::{RowId, RowKind, RowRecord};
use crate::rows::list::{RowList, RowRegistry};
use crate::util::{append, create_element, listen, query_all, set_attr};
use leptos::logging::warn;
use std::cell::RefCell;
use std::rc::Rc;
use strum::IntoEnumIterator;
use web_sys::{Document, Element};

const ROW_ID_ATTR: &str = "data-row-id";
const REMOVE_BUTTON_CLASS: &str = "btn btn-danger btn-sm remove-btn";

pub(crate) type SharedRows = Rc<RefCell<RowRegistry>>;

pub(crate) struct RowManager {
    #[cfg(test)]
    pub rows: SharedRows,

    /// Kinds whose add trigger and container were both found.
    pub wired: Vec<RowKind>,
}

fn seed_from_container(kind: RowKind, container: &Element) -> Result<RowList, String> {
    let mut list = RowList::new(kind);
    let children = container.children();
    for i in 0..children.length() {
        let Some(child) = children.item(i) else {
            continue;
        };
        let record = list.adopt_existing();
        set_attr(&child, ROW_ID_ATTR, &record.id.to_string())?;
    }
    Ok(list)
}

/// Wire one removal control. Called exactly once per control.
fn bind_remove(button: &Element, rows: &SharedRows) -> Result<(), String> {
    let button_for_click = button.clone();
    let rows = rows.clone();
    listen(button, "click", move |_ev: web_sys::Event| {
        let Some(row) = button_for_click.parent_element() else {
            return;
        };
        if let Some(id) = row.get_attribute(ROW_ID_ATTR).as_deref().and_then(RowId::parse) {
            rows.borrow_mut().remove(id);
        }
        row.remove();
    })
}

/// Build the row element and return it with its removal control.
fn build_row(document: &Document, record: &RowRecord) -> Result<(Element, Element), String> {
    let kind = record.kind;

    let row = create_element(document, "div")?;
    row.set_class_name(kind.row_class());
    set_attr(&row, ROW_ID_ATTR, &record.id.to_string())?;

    let field = create_element(document, kind.field_tag())?;
    if kind.is_single_line() {
        set_attr(&field, "type", "text")?;
    }
    set_attr(&field, "name", kind.field_name())?;
    if let Some(n) = record.number {
        set_attr(&field, "placeholder", &kind.placeholder(n))?;
    }
    set_attr(&field, "class", "form-control")?;
    set_attr(&field, "required", "")?;

    let button = create_element(document, "button")?;
    set_attr(&button, "type", "button")?;
    set_attr(&button, "class", REMOVE_BUTTON_CLASS)?;
    set_attr(&button, "style", "margin-top: 0.5rem;")?;
    let icon = create_element(document, "i")?;
    icon.set_class_name("fas fa-times");
    append(&button, &icon)?;
    button
        .insert_adjacent_text("beforeend", " Remove")
        .map_err(|e| format!("failed to label remove button: {e:?}"))?;

    append(&row, &field)?;
    append(&row, &button)?;
    Ok((row, button))
}

fn add_row(
    document: &Document,
    container: &Element,
    rows: &SharedRows,
    kind: RowKind,
) -> Result<RowRecord, String> {
    let record = rows
        .borrow_mut()
        .get_mut(kind)
        .map(|list| list.push_new())
        .ok_or_else(|| format!("no {kind} rows are tracked"))?;

    let mounted = build_row(document, &record).and_then(|(row, button)| {
        append(container, &row)?;
        bind_remove(&button, rows)
    });

    if let Err(e) = mounted {
        rows.borrow_mut().remove(record.id);
        return Err(e);
    }
    Ok(record)
}

/// Seed one list from its container and bind its add trigger.
///
/// `Ok(false)` when the page has no add trigger for `kind`.
fn wire_kind(document: &Document, rows: &SharedRows, kind: RowKind) -> Result<bool, String> {
    let Some(trigger) = document.get_element_by_id(kind.add_trigger_id()) else {
        return Ok(false);
    };
    let container = document
        .get_element_by_id(kind.container_id())
        .ok_or_else(|| format!("#{} has no #{} to add to", kind.add_trigger_id(), kind.container_id()))?;

    rows.borrow_mut().insert(seed_from_container(kind, &container)?);

    let document_for_add = document.clone();
    let rows_for_add = rows.clone();
    listen(&trigger, "click", move |_ev: web_sys::Event| {
        if let Err(e) = add_row(&document_for_add, &container, &rows_for_add, kind) {
            warn!("adding {kind} row failed: {e}");
        }
    })?;
    Ok(true)
}

/// Wire the add triggers for ingredients and instructions, plus every removal
/// control already on the page. A list that fails to wire is logged and
/// skipped; removal controls are bound regardless.
pub(crate) fn attach_row_managers(
    document: &Document,
    config: &PageConfig,
) -> Result<RowManager, String> {
    let rows: SharedRows = Rc::new(RefCell::new(RowRegistry::default()));
    let mut wired = vec![];

    for kind in RowKind::iter() {
        match wire_kind(document, &rows, kind) {
            Ok(true) => wired.push(kind),
            Ok(false) => {}
            Err(e) => warn!("{kind} rows not attached: {e}"),
        }
    }

    for button in query_all(document, &config.remove_selector)? {
        if let Err(e) = bind_remove(&button, &rows) {
            warn!("remove control not attached: {e}");
        }
    }

    Ok(RowManager {
        #[cfg(test)]
        rows,
        wired,
    })
}

use crate::config::PageConfig;
use crate::models::FieldSnapshot;
use crate::prompt::UserPrompt;
use crate::util::{listen, query_all, query_all_in};
use leptos::logging::warn;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FieldVerdict {
    Filled,
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FocusTarget {
    /// Index into the required fields.
    Required(usize),
    Search,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ValidationReport {
    /// One verdict per required field, in document order.
    pub required: Vec<FieldVerdict>,

    /// Only present for search forms that actually contain a query field.
    pub search: Option<FieldVerdict>,

    /// The last empty field processed. Required fields are processed first,
    /// the search field after them.
    pub focus: Option<FocusTarget>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        !self.required.contains(&FieldVerdict::Empty) && self.search != Some(FieldVerdict::Empty)
    }
}

fn verdict(field: &FieldSnapshot) -> FieldVerdict {
    if field.is_blank() {
        FieldVerdict::Empty
    } else {
        FieldVerdict::Filled
    }
}

pub(crate) fn validate_fields(
    required: &[FieldSnapshot],
    search: Option<&FieldSnapshot>,
) -> ValidationReport {
    let mut focus = None;

    let required: Vec<FieldVerdict> = required
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let v = verdict(f);
            if v == FieldVerdict::Empty {
                focus = Some(FocusTarget::Required(i));
            }
            v
        })
        .collect();

    let search = search.map(verdict);
    if search == Some(FieldVerdict::Empty) {
        focus = Some(FocusTarget::Search);
    }

    ValidationReport {
        required,
        search,
        focus,
    }
}

/// Current value of a form control; other elements fall back to their text.
fn field_value(el: &Element) -> String {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        return input.value();
    }
    if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
        return area.value();
    }
    if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
        return select.value();
    }
    el.text_content().unwrap_or_default()
}

fn set_invalid(el: &Element, color: Option<&str>) {
    let Some(html) = el.dyn_ref::<HtmlElement>() else {
        return;
    };
    let style = html.style();
    let _ = match color {
        Some(c) => style.set_property("border-color", c),
        None => style.remove_property("border-color").map(|_| ()),
    };
}

fn focus(el: &Element) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.focus();
    }
}

/// Check a form against its required/search fields and paint the result.
/// Returns whether submission may proceed.
fn check_form(form: &Element, config: &PageConfig) -> bool {
    let required = match query_all_in(form, &config.required_selector) {
        Ok(fields) => fields,
        Err(e) => {
            // Leave it to the server rather than blocking the user.
            warn!("form validation skipped: {e}");
            return true;
        }
    };

    let search_field = if form.class_list().contains(&config.search_form_class) {
        form.query_selector(&config.search_field_selector)
            .ok()
            .flatten()
    } else {
        None
    };

    let snapshots: Vec<FieldSnapshot> = required
        .iter()
        .map(|f| FieldSnapshot::new(field_value(f)))
        .collect();
    let search_snapshot = search_field
        .as_ref()
        .map(|f| FieldSnapshot::new(field_value(f)));

    let report = validate_fields(&snapshots, search_snapshot.as_ref());

    for (field, v) in required.iter().zip(&report.required) {
        match v {
            FieldVerdict::Empty => set_invalid(field, Some(&config.invalid_border_color)),
            FieldVerdict::Filled => set_invalid(field, None),
        }
    }
    if let (Some(field), Some(FieldVerdict::Empty)) = (&search_field, report.search) {
        set_invalid(field, Some(&config.invalid_border_color));
    }

    match report.focus {
        Some(FocusTarget::Required(i)) => {
            if let Some(field) = required.get(i) {
                focus(field);
            }
        }
        Some(FocusTarget::Search) => {
            if let Some(field) = &search_field {
                focus(field);
            }
        }
        None => {}
    }

    report.is_valid()
}

/// Validate every form on submit. Returns the number of forms wired.
pub(crate) fn attach_form_validation(
    document: &Document,
    config: &Rc<PageConfig>,
    prompt: &Rc<dyn UserPrompt>,
) -> Result<usize, String> {
    let forms = query_all(document, &config.form_selector)?;

    for form in &forms {
        let form_for_submit = form.clone();
        let config = config.clone();
        let prompt = prompt.clone();
        listen(form, "submit", move |ev: web_sys::Event| {
            if !check_form(&form_for_submit, &config) {
                ev.prevent_default();
                prompt.alert(&config.validation_message);
            }
        })?;
    }

    Ok(forms.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(values: &[&str]) -> Vec<FieldSnapshot> {
        values.iter().map(|v| FieldSnapshot::new(*v)).collect()
    }

    #[test]
    fn test_all_filled_is_valid() {
        let report = validate_fields(&fields(&["Pancakes", "2 eggs"]), None);
        assert!(report.is_valid());
        assert_eq!(report.focus, None);
        assert_eq!(report.required, vec![FieldVerdict::Filled, FieldVerdict::Filled]);
    }

    #[test]
    fn test_whitespace_only_counts_as_empty() {
        let report = validate_fields(&fields(&["Pancakes", "   "]), None);
        assert!(!report.is_valid());
        assert_eq!(report.required[1], FieldVerdict::Empty);
    }

    #[test]
    fn test_focus_lands_on_last_empty_required_field() {
        let report = validate_fields(&fields(&["", "ok", " ", "ok"]), None);
        assert_eq!(report.focus, Some(FocusTarget::Required(2)));
    }

    #[test]
    fn test_empty_search_field_fails_even_when_required_fields_pass() {
        let q = FieldSnapshot::new("  ");
        let report = validate_fields(&fields(&["Pancakes"]), Some(&q));
        assert!(!report.is_valid());
        assert_eq!(report.search, Some(FieldVerdict::Empty));
    }

    #[test]
    fn test_search_field_is_checked_after_required_fields() {
        let q = FieldSnapshot::new("");
        let report = validate_fields(&fields(&["", "ok"]), Some(&q));
        assert_eq!(report.focus, Some(FocusTarget::Search));
    }

    #[test]
    fn test_filled_search_field_keeps_earlier_focus() {
        let q = FieldSnapshot::new("curry");
        let report = validate_fields(&fields(&["", "ok"]), Some(&q));
        assert_eq!(report.focus, Some(FocusTarget::Required(0)));
        assert!(!report.is_valid());
    }

    #[test]
    fn test_form_without_required_fields_passes() {
        let report = validate_fields(&[], None);
        assert!(report.is_valid());
    }
}

use crate::config::PageConfig;
use crate::delete_guard::attach_delete_guards;
use crate::preview::attach_image_previews;
use crate::prompt::UserPrompt;
use crate::rows::attach_row_managers;
use crate::util::listen;
use crate::validation::attach_form_validation;
use leptos::logging::{log, warn};
use std::rc::Rc;
use web_sys::Document;

/// What got wired on this page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AttachSummary {
    pub delete_triggers: usize,
    pub forms: usize,
    pub image_inputs: usize,
    pub row_lists: usize,
}

/// The page behavior controller: attaches every handler once per page.
#[derive(Clone)]
pub struct PageBehavior {
    config: Rc<PageConfig>,
    prompt: Rc<dyn UserPrompt>,
}

fn or_log<T: Default>(what: &str, result: Result<T, String>) -> T {
    result.unwrap_or_else(|e| {
        warn!("{what} not attached: {e}");
        T::default()
    })
}

impl PageBehavior {
    pub fn new(config: PageConfig, prompt: Rc<dyn UserPrompt>) -> Self {
        Self {
            config: Rc::new(config),
            prompt,
        }
    }

    /// Wire all handlers against `document`. A handler that fails to attach
    /// is logged and skipped; the others still attach.
    pub fn attach(&self, document: &Document) -> AttachSummary {
        let summary = AttachSummary {
            delete_triggers: or_log(
                "delete confirmation",
                attach_delete_guards(document, &self.config, &self.prompt),
            ),
            forms: or_log(
                "form validation",
                attach_form_validation(document, &self.config, &self.prompt),
            ),
            image_inputs: or_log(
                "image preview",
                attach_image_previews(document, &self.config),
            ),
            row_lists: or_log(
                "ingredient/instruction rows",
                attach_row_managers(document, &self.config).map(|m| m.wired.len()),
            ),
        };

        log!("recipe page behaviors attached: {summary:?}");
        summary
    }

    /// Attach on `DOMContentLoaded`, or right away if the document is past that.
    pub fn attach_when_ready(self) -> Result<(), String> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| "no document to attach to".to_string())?;

        if document.ready_state() != "loading" {
            self.attach(&document);
            return Ok(());
        }

        let target = document.clone();
        let mut pending = Some(self);
        listen(&target, "DOMContentLoaded", move |_ev: web_sys::Event| {
            if let Some(behavior) = pending.take() {
                behavior.attach(&document);
            }
        })
    }
}

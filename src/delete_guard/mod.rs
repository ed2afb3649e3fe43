use crate::config::PageConfig;
use crate::prompt::UserPrompt;
use crate::util::{listen, query_all};
use std::rc::Rc;
use web_sys::Document;

/// True when the user declined, i.e. the default action must not run.
pub(crate) fn should_cancel_delete(prompt: &dyn UserPrompt, message: &str) -> bool {
    !prompt.confirm(message)
}

/// Ask for confirmation before any delete trigger does its default action.
///
/// Returns the number of triggers guarded.
pub(crate) fn attach_delete_guards(
    document: &Document,
    config: &Rc<PageConfig>,
    prompt: &Rc<dyn UserPrompt>,
) -> Result<usize, String> {
    let triggers = query_all(document, &config.delete_selector)?;

    for trigger in &triggers {
        let config = config.clone();
        let prompt = prompt.clone();
        listen(trigger, "click", move |ev: web_sys::Event| {
            if should_cancel_delete(prompt.as_ref(), &config.delete_message) {
                ev.prevent_default();
            }
        })?;
    }

    Ok(triggers.len())
}

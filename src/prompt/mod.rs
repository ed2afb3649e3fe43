/// Blocking user dialogs.
///
/// Handlers talk to this instead of `window` directly so the decision logic
/// can run under a scripted prompt in tests.
pub trait UserPrompt {
    fn confirm(&self, message: &str) -> bool;
    fn alert(&self, message: &str);
}

/// `window.confirm` / `window.alert`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserPrompt;

impl UserPrompt for BrowserPrompt {
    fn confirm(&self, message: &str) -> bool {
        // A dialog that cannot be shown counts as "no".
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        if let Some(w) = web_sys::window() {
            let _ = w.alert_with_message(message);
        }
    }
}

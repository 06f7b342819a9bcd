use dioxus::prelude::*;
use hunterdash_shared::canvas::RequestOutcome;
use hunterdash_shared::error::MapError;

/// How long a toast stays up.
pub const TOAST_DURATION_MS: u32 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    fn class(self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast-success",
            ToastKind::Error => "toast toast-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastQueue {
    next_id: u64,
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        self.toasts.push(Toast {
            id: self.next_id,
            kind,
            message: message.into(),
        });
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

/// User-facing text for a failed marker operation.
pub fn error_message(error: &MapError) -> String {
    match error {
        MapError::Validation(e) => format!("Invalid marker: {}", e),
        MapError::Network(detail) => format!("Could not reach the server: {}", detail),
        MapError::Permission(detail) => format!("Not allowed: {}", detail),
        MapError::NotFound(_) => "The marker no longer exists. The map was refreshed.".to_string(),
    }
}

/// Toast for a finished request, if it deserves one.
pub fn outcome_toast(outcome: &RequestOutcome) -> Option<(ToastKind, String)> {
    match outcome {
        RequestOutcome::Completed { kind, .. } => {
            Some((ToastKind::Success, kind.done_message().to_string()))
        }
        RequestOutcome::Failed { error } => Some((ToastKind::Error, error_message(error))),
        RequestOutcome::Stale { .. } => None,
    }
}

/// Show a toast and remove it again after [`TOAST_DURATION_MS`].
pub fn show_toast(mut toasts: Signal<ToastQueue>, kind: ToastKind, message: impl Into<String>) {
    let id = toasts.write().push(kind, message);
    spawn(async move {
        gloo_timers::future::TimeoutFuture::new(TOAST_DURATION_MS).await;
        toasts.write().dismiss(id);
    });
}

#[component]
pub fn ToastStack(toasts: Signal<ToastQueue>) -> Element {
    let items: Vec<(u64, &'static str, String)> = toasts
        .read()
        .iter()
        .map(|t| (t.id, t.kind.class(), t.message.clone()))
        .collect();

    rsx! {
        div { class: "toast-stack",
            for (id, class, message) in items {
                div {
                    key: "{id}",
                    class: class,
                    role: "status",
                    onclick: move |_| {
                        toasts.write().dismiss(id);
                    },
                    "{message}"
                }
            }
        }
    }
}

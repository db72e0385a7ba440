use dioxus::prelude::*;

use crate::components::use_forms_config;
use crate::services::notify::{Notification, Notifier, NotifierRef, SilentNotifier};
use crate::utils::platform::sleep_ms;

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub notification: Notification,
}

/// Pushes toasts into the host's list and removes each after its duration.
#[derive(Clone, Copy, PartialEq)]
pub struct ToastNotifier {
    toasts: Signal<Vec<Toast>>,
    next_id: Signal<u64>,
    duration_ms: u32,
    low_emphasis_duration_ms: u32,
}

impl Notifier for ToastNotifier {
    fn notify(&self, notification: Notification) {
        let mut toasts = self.toasts;
        let mut next_id = self.next_id;
        let id = *next_id.peek();
        next_id.set(id + 1);

        let duration = if notification.low_emphasis {
            self.low_emphasis_duration_ms
        } else {
            self.duration_ms
        };
        toasts.write().push(Toast { id, notification });

        // Expiry runs in the root scope so it survives the caller unmounting.
        spawn_forever(async move {
            sleep_ms(duration).await;
            if let Ok(mut list) = toasts.try_write() {
                list.retain(|toast| toast.id != id);
            }
        });
    }
}

/// Notifier from context; notifications are dropped outside a [`ToastHost`].
pub fn use_notifier() -> NotifierRef {
    try_use_context::<NotifierRef>().unwrap_or_else(|| NotifierRef::new(SilentNotifier))
}

#[component]
pub fn ToastHost(children: Element) -> Element {
    let config = use_forms_config();
    let toasts = use_signal(Vec::<Toast>::new);
    let next_id = use_signal(|| 0u64);
    use_context_provider(|| {
        NotifierRef::new(ToastNotifier {
            toasts,
            next_id,
            duration_ms: config.notifications.toast_duration_ms,
            low_emphasis_duration_ms: config.notifications.low_emphasis_duration_ms,
        })
    });

    let visible: Vec<(u64, String, String)> = toasts()
        .into_iter()
        .map(|toast| {
            let mut class = toast.notification.level.css_class().to_string();
            if toast.notification.low_emphasis {
                class.push_str(" toast-subtle");
            }
            (toast.id, class, toast.notification.message)
        })
        .collect();

    rsx! {
        {children}
        div {
            class: "toast-container",
            "aria-live": "polite",
            for (id, class, message) in visible {
                div { key: "{id}", class: "{class}", role: "status", "{message}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dioxus::dioxus_core::{NoOpMutations, VirtualDom};
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    #[derive(Clone)]
    struct HostProps {
        live: Rc<Cell<usize>>,
        unmount_sender: bool,
    }

    fn host(props: HostProps) -> Element {
        let toasts = use_signal(Vec::<Toast>::new);
        let next_id = use_signal(|| 0u64);
        let show_sender = use_signal(|| true);
        use_context_provider(|| show_sender);
        use_context_provider(|| {
            NotifierRef::new(ToastNotifier {
                toasts,
                next_id,
                duration_ms: 20,
                low_emphasis_duration_ms: 20,
            })
        });
        props.live.set(toasts.read().len());
        let unmount = props.unmount_sender;

        rsx! {
            if show_sender() {
                SaveAnnouncer { unmount }
            }
        }
    }

    #[component]
    fn SaveAnnouncer(unmount: bool) -> Element {
        let notifier = use_notifier();
        let mut show_sender = use_context::<Signal<bool>>();
        use_hook(move || {
            spawn(async move {
                notifier.notify(Notification::info("Saved"));
                if unmount {
                    show_sender.set(false);
                }
            })
        });
        rsx! { span { "saving" } }
    }

    /// Drives the dom for a while and reports (peak, final) toast counts.
    async fn run_host(unmount_sender: bool) -> (usize, usize) {
        let live = Rc::new(Cell::new(0));
        let mut dom = VirtualDom::new_with_props(
            host,
            HostProps {
                live: live.clone(),
                unmount_sender,
            },
        );
        dom.rebuild_in_place();

        let deadline = tokio::time::Instant::now() + Duration::from_millis(250);
        let mut peak = live.get();
        while tokio::time::timeout_at(deadline, dom.wait_for_work())
            .await
            .is_ok()
        {
            dom.render_immediate(&mut NoOpMutations);
            peak = peak.max(live.get());
        }
        (peak, live.get())
    }

    #[tokio::test]
    async fn test_toast_expires_after_sender_unmounts() {
        let (peak, remaining) = run_host(true).await;
        assert_eq!(peak, 1);
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_toast_expires_while_sender_stays_mounted() {
        let (peak, remaining) = run_host(false).await;
        assert_eq!(peak, 1);
        assert_eq!(remaining, 0);
    }
}

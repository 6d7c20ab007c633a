//! Notifications
//!
//! A short stack of toasts shared by every page. Each notice expires on its
//! own timer and can be dismissed early.

use leptos::*;

/// At most this many notices are shown; older ones are dropped first
const MAX_VISIBLE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    /// Errors stay up longer
    fn lifetime_ms(self) -> u32 {
        match self {
            NoticeKind::Success => 3000,
            NoticeKind::Error => 5000,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub id: u32,
    pub kind: NoticeKind,
    pub message: String,
}

/// Append `notice`, trimming the oldest entries beyond `max`
fn push_bounded(notices: &mut Vec<Notice>, notice: Notice, max: usize) {
    notices.push(notice);
    if notices.len() > max {
        let excess = notices.len() - max;
        notices.drain(..excess);
    }
}

/// Handle for raising toasts, provided through context
#[derive(Clone, Copy)]
pub struct Notifier {
    notices: RwSignal<Vec<Notice>>,
    next_id: StoredValue<u32>,
}

pub fn provide_notifier() {
    provide_context(Notifier {
        notices: create_rw_signal(Vec::new()),
        next_id: store_value(0),
    });
}

pub fn use_notifier() -> Notifier {
    use_context::<Notifier>().expect("Notifier not found")
}

impl Notifier {
    pub fn success(&self, message: impl Into<String>) {
        self.push(NoticeKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeKind::Error, message.into());
    }

    pub fn dismiss(&self, id: u32) {
        self.notices.update(|notices| notices.retain(|n| n.id != id));
    }

    /// Notices currently on screen, oldest first
    pub fn notices(&self) -> Signal<Vec<Notice>> {
        self.notices.into()
    }

    fn push(&self, kind: NoticeKind, message: String) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id.wrapping_add(1));

        self.notices
            .update(|notices| push_bounded(notices, Notice { id, kind, message }, MAX_VISIBLE));

        let notifier = *self;
        gloo_timers::callback::Timeout::new(kind.lifetime_ms(), move || notifier.dismiss(id))
            .forget();
    }
}

use tracing::warn;

pub type NotifyCallback<'a> = Box<dyn Fn(&str) + Send + Sync + 'a>;

/// Sink for recoverable, user-facing conditions such as a request for an
/// unsupported monomer type.
///
/// Every message is logged at `WARN` level and forwarded to the optional
/// callback; presentation is left to the caller.
#[derive(Default)]
pub struct Notifier<'a> {
    callback: Option<NotifyCallback<'a>>,
}

impl<'a> Notifier<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: NotifyCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn notify(&self, message: &str) {
        warn!("{}", message);
        if let Some(cb) = &self.callback {
            cb(message);
        }
    }
}

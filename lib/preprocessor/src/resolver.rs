use std::{
    any::Any,
    backtrace::Backtrace,
    cell::RefCell,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Once},
};

use indexmap::IndexMap;
use sonic_rs::{JsonValueTrait, Value};
use tracing::error;

use crate::model::ObjectType;

#[derive(Clone, Debug, Default)]
pub struct ResolveParams {
    pub field_name: String,
    pub source: Value,
    pub args: IndexMap<String, Value>,
}

#[derive(Clone, Debug, Default)]
pub struct ResolveTypeParams {
    pub value: Value,
}

/// A field resolution failure, reported on the field instead of failing the whole request.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("{message}")]
pub struct FieldError {
    pub message: String,
    /// Diagnostic trace captured when the resolver panicked.
    pub trace: Option<String>,
    /// `file:line:column` of the panic, when the resolver panicked.
    pub location: Option<String>,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: None,
            location: None,
        }
    }
}

impl From<String> for FieldError {
    fn from(message: String) -> Self {
        FieldError::new(message)
    }
}

pub type ResolveResult = Result<Option<Value>, FieldError>;
pub type ResolveFn = Arc<dyn Fn(&ResolveParams) -> ResolveResult + Send + Sync>;
pub type ResolveTypeFn = Arc<dyn Fn(&ResolveTypeParams) -> Option<Arc<ObjectType>> + Send + Sync>;
pub type IsTypeOfFn = Arc<dyn Fn(&ResolveTypeParams) -> bool + Send + Sync>;

pub fn resolver<F>(resolve: F) -> ResolveFn
where
    F: Fn(&ResolveParams) -> ResolveResult + Send + Sync + 'static,
{
    Arc::new(resolve)
}

/// Wraps a resolver so that a panic becomes a [`FieldError`] carrying the panic
/// location and a trace, and a returned `null` value is reported as no value at all.
pub fn normalize_resolver(resolve: ResolveFn) -> ResolveFn {
    install_panic_hook();

    Arc::new(move |params: &ResolveParams| {
        LAST_PANIC.with(|last| last.borrow_mut().take());

        match panic::catch_unwind(AssertUnwindSafe(|| resolve(params))) {
            Ok(result) => result.map(normalize_output),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                let report = LAST_PANIC
                    .with(|last| last.borrow_mut().take())
                    .unwrap_or_else(|| PanicReport {
                        location: None,
                        trace: Backtrace::force_capture().to_string(),
                    });
                error!(
                    field = params.field_name.as_str(),
                    location = report.location.as_deref().unwrap_or("unknown"),
                    "resolver panicked: {}", message
                );

                Err(FieldError {
                    message,
                    trace: Some(report.trace),
                    location: report.location,
                })
            }
        }
    })
}

struct PanicReport {
    location: Option<String>,
    trace: String,
}

thread_local! {
    /// Filled by the panic hook, which still sees the panicking frame.
    static LAST_PANIC: RefCell<Option<PanicReport>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Records where the last panic of each thread happened, then defers to the hook that
/// was installed before.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let report = PanicReport {
                location: info
                    .location()
                    .map(|at| format!("{}:{}:{}", at.file(), at.line(), at.column())),
                trace: Backtrace::force_capture().to_string(),
            };
            // Thread locals are gone while a thread shuts down, such panics are not recorded.
            LAST_PANIC
                .try_with(|last| {
                    if let Ok(mut last) = last.try_borrow_mut() {
                        *last = Some(report);
                    }
                })
                .ok();

            previous(info);
        }));
    });
}

fn normalize_output(value: Option<Value>) -> Option<Value> {
    value.filter(|value| !value.is_null())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "resolver panicked with a non-string payload".to_string()
    }
}

use std::cell::RefCell;
use std::panic::{catch_unwind, set_hook, take_hook, UnwindSafe};

use backtrace::Backtrace;
use color_backtrace::termcolor::{ColorChoice, StandardStream};
use color_backtrace::BacktracePrinter;

thread_local! {
    static SAVED_PANIC: RefCell<Option<SavedPanic>> = RefCell::default();
}

struct SavedPanic {
    message: String,
    trace: Backtrace,
}

/// Run `f`, holding back any panic report until `f` has unwound.
///
/// The terminal is in raw mode on the alternate screen while the editor runs,
/// so the report is only printed once everything inside `f` (the terminal
/// included) has been dropped.
#[must_use]
pub fn catch_and_reprint_panic<T>(f: impl FnOnce() -> T + UnwindSafe) -> Option<T> {
    let prev_hook = take_hook();

    set_hook(Box::new(|panic_info| {
        let message = format!("{panic_info}");
        log::error!("{message}");

        let saved_panic = SavedPanic {
            message,
            trace: Backtrace::new(),
        };
        SAVED_PANIC.with(|saved| saved.replace(Some(saved_panic)));
    }));

    let result = catch_unwind(f);

    set_hook(prev_hook);

    match result {
        Ok(result) => Some(result),

        Err(_) => {
            let Some(saved_panic) = SAVED_PANIC.with(RefCell::take) else {
                eprintln!("panicked, but the panic message was lost");
                return None;
            };

            let printed = BacktracePrinter::new()
                .message(saved_panic.message)
                .print_trace(
                    &saved_panic.trace,
                    &mut StandardStream::stderr(ColorChoice::Auto),
                );

            if let Err(err) = printed {
                eprintln!("couldn't print backtrace: {err}");
            }

            None
        }
    }
}

use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Await `task` behind a `message ...` spinner that is cleared once it finishes.
pub async fn spin_while<F: Future>(message: &'static str, task: F) -> F::Output {
    let spinner = ProgressBar::new_spinner().with_message(message);
    if let Ok(style) = ProgressStyle::with_template("{msg} {spinner}") {
        spinner.set_style(style.tick_strings(&[".  ", ".. ", "...", "   "]));
    }
    spinner.enable_steady_tick(TICK_INTERVAL);

    let output = task.await;
    spinner.finish_and_clear();
    output
}

//! One-shot weather text for the status bar.

use log::{debug, info};
use std::{
    sync::mpsc::{self, Receiver},
    thread,
    time::Duration,
};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Starts the fetch on a background thread. The receiver yields the response
/// body once on success and nothing at all on failure.
pub fn spawn_fetch(url: String) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || match fetch(&url) {
        Ok(text) => {
            info!("weather fetched from {url}");
            let _ = tx.send(display_text(&text));
        }
        Err(err) => debug!("weather fetch from {url} failed: {err}"),
    });
    rx
}

/// The body as received, minus trailing line breaks a one-line status bar
/// cannot show.
pub fn display_text(body: &str) -> String {
    body.trim_end_matches(['\r', '\n']).to_string()
}

fn fetch(url: &str) -> Result<String, reqwest::Error> {
    reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()?
        .get(url)
        .send()?
        .error_for_status()?
        .text()
}

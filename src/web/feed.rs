use std::rc::Weak;

use gloo_net::http::Request;

use super::App;
use crate::project::{self, Project};

async fn fetch(url: &str) -> anyhow::Result<Vec<Project>> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("gallery request failed: {e}"))?;
    if !response.ok() {
        anyhow::bail!("gallery request returned HTTP {}", response.status());
    }
    let text = response
        .text()
        .await
        .map_err(|e| anyhow::anyhow!("gallery body unreadable: {e}"))?;
    Ok(project::parse_gallery(&text)?)
}

/// Fetches the feed and installs it into the gallery; a failure shows the retry state.
pub(super) async fn load(app: Weak<App>, url: String) {
    if let Some(app) = app.upgrade() {
        app.gallery.borrow_mut().loading();
    }
    let fetched = fetch(&url).await;
    let Some(app) = app.upgrade() else { return };
    match fetched {
        Ok(projects) => {
            log::info!("gallery loaded: {} project(s)", projects.len());
            app.gallery.borrow_mut().install(projects, &app.modal.borrow());
        }
        Err(e) => {
            log::error!("error loading gallery data from {url}: {e:#}");
            app.gallery.borrow_mut().failed();
        }
    }
}

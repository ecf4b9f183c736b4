use super::error::ShellError;
use crate::models::{NavigationDecision, NavigationRequest};
use url::Url;

/// Host of `raw`, with the port appended when one is given explicitly (`host:port`).
pub fn host_of(raw: &str) -> Result<String, ShellError> {
    let url = Url::parse(raw).map_err(|e| ShellError::MalformedNavigationTarget {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    Ok(match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    })
}

/// In-app navigation proceeds; anything pointing at another host is cancelled and handed to the
/// system browser. Targets without a usable host stay in the app.
pub fn decide(request: &NavigationRequest) -> NavigationDecision {
    let target_host = host_of(&request.target_url).unwrap_or_default();
    if target_host.is_empty() {
        return NavigationDecision::IN_APP;
    }

    let current_host = host_of(&request.current_url).unwrap_or_default();
    if target_host != current_host {
        NavigationDecision::EXTERNAL
    } else {
        NavigationDecision::IN_APP
    }
}

/// What to do with a page's request to open a new window. The webview's own popup is always
/// refused; this says what happens instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupAction {
    /// Same host: load the target in the existing main window.
    LoadInMainWindow,
    /// Other host: hand the target to the system browser.
    OpenExternally,
    /// Nothing to load (`about:blank`, `javascript:` and the like).
    Ignore,
}

pub fn route_new_window(request: &NavigationRequest) -> PopupAction {
    let decision = decide(request);
    if decision.open_externally {
        return PopupAction::OpenExternally;
    }
    // A host-less target would blank the app if loaded in place.
    match host_of(&request.target_url) {
        Ok(host) if decision.allow && !host.is_empty() => PopupAction::LoadInMainWindow,
        _ => PopupAction::Ignore,
    }
}

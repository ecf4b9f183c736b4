use super::app_log;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tauri::AppHandle;
use tauri_plugin_notification::NotificationExt;
use tauri_plugin_updater::{Update, UpdaterExt};

const STARTUP_GRACE: Duration = Duration::from_secs(5);
/// Retries after the first failed check, so at most `1 + MAX_FAILURE_RETRIES` checks run.
const MAX_FAILURE_RETRIES: u8 = 3;
const RETRY_STEP: Duration = Duration::from_secs(30);

static CHECKED_THIS_SESSION: AtomicBool = AtomicBool::new(false);
static UPDATE_IN_PROGRESS: AtomicBool = AtomicBool::new(false);

struct UpdateGuard;

impl UpdateGuard {
    fn try_acquire() -> Result<Self, String> {
        UPDATE_IN_PROGRESS
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| "Update already in progress".to_string())?;
        Ok(Self)
    }
}

impl Drop for UpdateGuard {
    fn drop(&mut self) {
        UPDATE_IN_PROGRESS.store(false, Ordering::SeqCst);
    }
}

/// Wait before the next check after `failures` failed ones, or `None` once retries are spent.
fn retry_delay(failures: u8) -> Option<Duration> {
    if failures == 0 || failures > MAX_FAILURE_RETRIES {
        return None;
    }
    Some(RETRY_STEP * u32::from(failures))
}

/// The updater plugin refuses unsigned artifacts, so a missing `pubkey` means there is nothing to
/// check against.
fn updater_configured(plugin_config: Option<&serde_json::Value>) -> bool {
    plugin_config
        .and_then(|config| config.get("pubkey"))
        .and_then(|key| key.as_str())
        .is_some_and(|key| !key.trim().is_empty())
}

async fn check_update(app_handle: &AppHandle) -> Result<Option<Update>, String> {
    let updater = app_handle
        .updater()
        .map_err(|e| format!("Failed to init updater: {e}"))?;

    updater
        .check()
        .await
        .map_err(|e| format!("Failed to check update: {e}"))
}

async fn download_and_install(update: Update) -> Result<u64, String> {
    let _guard = UpdateGuard::try_acquire()?;

    let mut downloaded: u64 = 0;
    update
        .download_and_install(
            |chunk_length, _content_length| {
                downloaded = downloaded.saturating_add(chunk_length as u64);
            },
            || {},
        )
        .await
        .map_err(|e| format!("Failed to download/install update: {e}"))?;

    Ok(downloaded)
}

fn notify_ready(app_handle: &AppHandle, version: &str) {
    let shown = app_handle
        .notification()
        .builder()
        .title("KanbanFlow update installed")
        .body(format!("Version {version} will be used after the next restart."))
        .show();
    if let Err(e) = shown {
        let _ = app_log::warn(
            "updater",
            "notify_failed",
            serde_json::json!({ "error": e.to_string() }),
        );
    }
}

/// Checks for an update once per session, installs it if there is one and tells the user.
pub fn check_once(app_handle: AppHandle) {
    if CHECKED_THIS_SESSION.swap(true, Ordering::SeqCst) {
        return;
    }
    if !updater_configured(app_handle.config().plugins.0.get("updater")) {
        let _ = app_log::info("updater", "unconfigured");
        return;
    }

    tauri::async_runtime::spawn(async move {
        tokio::time::sleep(STARTUP_GRACE).await;

        let mut failures: u8 = 0;
        loop {
            let update = match check_update(&app_handle).await {
                Ok(update) => update,
                Err(e) => {
                    failures = failures.saturating_add(1);
                    let _ = app_log::warn(
                        "updater",
                        "check_failed",
                        serde_json::json!({ "error": e, "attempt": failures }),
                    );
                    let Some(delay) = retry_delay(failures) else {
                        return;
                    };
                    tokio::time::sleep(delay).await;
                    continue;
                }
            };

            let Some(update) = update else {
                let _ = app_log::info("updater", "up_to_date");
                return;
            };

            let version = update.version.clone();
            match download_and_install(update).await {
                Ok(bytes) => {
                    let _ = app_log::append(app_log::AppLogRecord::now(
                        "info",
                        "updater",
                        "installed",
                        Some(serde_json::json!({ "version": version, "bytes": bytes })),
                    ));
                    notify_ready(&app_handle, &version);
                }
                Err(e) => {
                    let _ = app_log::error(
                        "updater",
                        "install_failed",
                        serde_json::json!({ "version": version, "error": e }),
                    );
                }
            }
            return;
        }
    });
}

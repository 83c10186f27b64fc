use crate::state;
use crate::templates;
use crate::types::Notification;

use axum::Extension;
use axum::extract::{Path, State};
use axum::response::Redirect;
use time::OffsetDateTime;
use time::macros::format_description;

use super::{CurrentUser, HandlerError, layout, not_found};

fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(format_description!("[day]/[month]/[year] [hour]:[minute]"))
        .unwrap_or_default()
}

fn notification_row(notification: &Notification) -> templates::NotificationRow {
    templates::NotificationRow {
        id: notification.id.clone(),
        title: notification.title.clone(),
        message: notification.message.clone(),
        kind: notification.kind.as_str(),
        created_at: format_timestamp(notification.created_at),
        read: notification.read,
    }
}

pub(crate) async fn notification_list(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<templates::NotificationsTemplate, HandlerError> {
    let notifications = state
        .notifications
        .lock()
        .expect("notifications lock")
        .list()
        .iter()
        .map(notification_row)
        .collect();

    Ok(templates::NotificationsTemplate {
        layout: layout(&state, &user, "notifications"),
        notifications,
    })
}

pub(crate) async fn notification_read(
    State(state): State<state::AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, HandlerError> {
    let found = state
        .notifications
        .lock()
        .expect("notifications lock")
        .mark_read(&id);
    if !found {
        return Err(not_found());
    }
    Ok(Redirect::to("/notifications"))
}

pub(crate) async fn notification_read_all(State(state): State<state::AppState>) -> Redirect {
    state
        .notifications
        .lock()
        .expect("notifications lock")
        .mark_all_read();
    Redirect::to("/notifications")
}

pub(crate) async fn notification_delete(
    State(state): State<state::AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, HandlerError> {
    let removed = state
        .notifications
        .lock()
        .expect("notifications lock")
        .delete(&id);
    if !removed {
        return Err(not_found());
    }
    Ok(Redirect::to("/notifications"))
}

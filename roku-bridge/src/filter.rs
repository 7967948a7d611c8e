use std::collections::HashSet;

use ecp_client::Application;

/// Narrow a device's applications to the configured channel names.
///
/// With an allow-list, keeps the applications whose name appears in it, in
/// the device's order. Names that match nothing are ignored. Without one,
/// every application passes through.
pub fn filter_apps(apps: Vec<Application>, allow_list: Option<&[String]>) -> Vec<Application> {
    let Some(allow_list) = allow_list else {
        return apps;
    };

    let wanted: HashSet<&str> = allow_list.iter().map(String::as_str).collect();
    apps.into_iter()
        .filter(|app| wanted.contains(app.name.as_str()))
        .collect()
}

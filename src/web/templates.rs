//! HTML page templates.
//!
//! Pages are embedded at compile time with `include_str!`. Dynamic values
//! go into `{{name}}` placeholders and are always HTML-escaped; lists are
//! fetched by the page itself from the JSON endpoints.

pub const HOME_TEMPLATE: &str = include_str!("templates/home.html");
pub const LOGIN_TEMPLATE: &str = include_str!("templates/login.html");
pub const REGISTER_TEMPLATE: &str = include_str!("templates/register.html");
pub const DASHBOARD_TEMPLATE: &str = include_str!("templates/dashboard.html");
pub const TASKS_TEMPLATE: &str = include_str!("templates/tasks.html");
pub const CREATE_TASK_TEMPLATE: &str = include_str!("templates/create_task.html");
pub const UPDATE_TASK_TEMPLATE: &str = include_str!("templates/update_task.html");
pub const ANALYTICS_TEMPLATE: &str = include_str!("templates/analytics.html");
pub const DOCUMENTS_TEMPLATE: &str = include_str!("templates/documents.html");

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Fill `{{name}}` placeholders. Unknown placeholders are left as they are.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = after[..end].trim();
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(&html_escape(value)),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

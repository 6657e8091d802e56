//! HTML template for the login prompt.
//!
//! A single server-rendered form. The three pass-through values from the
//! authorization request ride along as hidden fields; every interpolated
//! value is HTML-escaped because they are all caller-controlled.

/// Renders the login form.
///
/// `redirect_uri`, `state`, and `nonce` come straight from the authorization
/// request and are carried forward opaquely. Absent `state`/`nonce` render
/// as empty hidden fields.
#[must_use]
pub fn render_login_form(redirect_uri: &str, state: Option<&str>, nonce: Option<&str>) -> String {
    let mut html = String::with_capacity(1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str("    <title>Sign in</title>\n");
    html.push_str("</head>\n<body>\n");
    html.push_str("<form method=\"POST\" action=\"login\">\n");
    html.push_str("    <label>Username: <input name=\"username\" autofocus></label><br>\n");
    push_hidden_field(&mut html, "redirect_uri", redirect_uri);
    push_hidden_field(&mut html, "state", state.unwrap_or(""));
    push_hidden_field(&mut html, "nonce", nonce.unwrap_or(""));
    html.push_str("    <button type=\"submit\">Sign in</button>\n");
    html.push_str("</form>\n</body>\n</html>\n");
    html
}

fn push_hidden_field(html: &mut String, name: &str, value: &str) {
    html.push_str("    <input type=\"hidden\" name=\"");
    html.push_str(name);
    html.push_str("\" value=\"");
    html.push_str(&html_escape(value));
    html.push_str("\">\n");
}

/// Escapes a string for safe inclusion in HTML text and attribute values.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

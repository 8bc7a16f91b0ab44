use crate::models::PaymentRedirect;

impl PaymentRedirect {
    /// Render the same-window gateway handoff: an auto-submitting POST form
    /// with the token as a hidden `token_ws` field. The gateway does not
    /// accept GET/query-string redirects.
    pub fn to_html_form(&self) -> String {
        format!(
            concat!(
                "<!DOCTYPE html><html><body onload=\"document.forms[0].submit()\">",
                "<form method=\"POST\" action=\"{action}\">",
                "<input type=\"hidden\" name=\"token_ws\" value=\"{token}\" />",
                "<noscript><button type=\"submit\">Continuar al pago</button></noscript>",
                "</form></body></html>"
            ),
            action = escape_attr(&self.url),
            token = escape_attr(&self.token),
        )
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

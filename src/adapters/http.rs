use crate::config::Settings;
use crate::utils::error::Result;
use reqwest::Client;

/// Shared client for all three services; one connection pool per process.
pub fn build_client(settings: &Settings) -> Result<Client> {
    let mut builder = Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));

    if let Some(timeout) = settings.request_timeout() {
        builder = builder.timeout(timeout);
    }

    Ok(builder.build()?)
}

/// 錯誤訊息中的 body 只保留前段，避免整頁 HTML 灌進 log
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 512;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &body[..end])
}

//! Meme source for the platformer's "watch an ad" respawn

use serde::Deserialize;
use thiserror::Error;

/// Random meme endpoint. Answers with a JSON object carrying an image `url`.
pub const MEME_ENDPOINT: &str = "https://meme-api.com/gimme";

#[derive(Debug, Error)]
pub enum MemeError {
    #[error("network error: {0}")]
    Network(String),
    #[error("meme service answered HTTP {0}")]
    Status(u16),
    #[error("malformed meme response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("meme response has no image url")]
    MissingUrl,
}

/// The part of a meme response the game cares about
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meme {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subreddit: Option<String>,
    #[serde(default)]
    pub post_link: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMeme {
    url: Option<String>,
    title: Option<String>,
    subreddit: Option<String>,
    post_link: Option<String>,
}

/// Parse a response body. A missing or blank `url` is an error.
pub fn parse_meme(body: &str) -> Result<Meme, MemeError> {
    let raw: RawMeme = serde_json::from_str(body)?;
    let url = raw
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or(MemeError::MissingUrl)?;
    Ok(Meme {
        url,
        title: raw.title,
        subreddit: raw.subreddit,
        post_link: raw.post_link,
    })
}

/// Fetch one meme from [`MEME_ENDPOINT`]. No retry.
#[cfg(target_arch = "wasm32")]
pub async fn fetch_meme() -> Result<Meme, MemeError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

    let js_err = |e: wasm_bindgen::JsValue| MemeError::Network(format!("{e:?}"));

    let window = web_sys::window().ok_or_else(|| MemeError::Network("no window".to_string()))?;

    let headers = Headers::new().map_err(js_err)?;
    headers.set("Accept", "application/json").map_err(js_err)?;
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_headers(&headers.into());
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(MEME_ENDPOINT, &opts).map_err(js_err)?;
    let resp_val = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_err)?;
    let resp: Response = resp_val
        .dyn_into()
        .map_err(|_| MemeError::Network("not a Response".to_string()))?;

    if !resp.ok() {
        return Err(MemeError::Status(resp.status()));
    }

    let text = JsFuture::from(resp.text().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    let body = text
        .as_string()
        .ok_or_else(|| MemeError::Network("body is not text".to_string()))?;
    parse_meme(&body)
}

use crate::asset::{channel, parse_glb, LoadError, LoadEvent, LoadQueue, LoadSender, ModelData};
use js_sys::{Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{ReadableStreamDefaultReader, Response};

/// Starts an HTTP GET for `url`; the queue yields progress per received
/// chunk and then one `Finished`.
pub fn spawn_fetch(url: String) -> LoadQueue {
    let (tx, rx) = channel();
    wasm_bindgen_futures::spawn_local(async move {
        let result = fetch_model(&url, &tx).await;
        tx.send(LoadEvent::Finished(result));
    });
    rx
}

async fn fetch_model(url: &str, tx: &LoadSender) -> Result<ModelData, LoadError> {
    let bytes = fetch_bytes(url, |loaded, total| tx.progress(loaded, total)).await?;
    parse_glb(&bytes)
}

async fn fetch_bytes(url: &str, mut on_progress: impl FnMut(u64, Option<u64>)) -> Result<Vec<u8>, LoadError> {
    let network = |value: JsValue| LoadError::Network {
        url: url.to_owned(),
        message: value.as_string().unwrap_or_else(|| format!("{value:?}")),
    };

    let window = web_sys::window().ok_or_else(|| network(JsValue::from_str("no window")))?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(network)?
        .dyn_into()
        .map_err(network)?;

    if !response.ok() {
        return Err(LoadError::Http {
            url: url.to_owned(),
            status: response.status(),
        });
    }

    let total = response
        .headers()
        .get("Content-Length")
        .ok()
        .flatten()
        .and_then(|value| value.trim().parse::<u64>().ok());

    let Some(body) = response.body() else {
        let buffer = JsFuture::from(response.array_buffer().map_err(network)?)
            .await
            .map_err(network)?;
        let bytes = Uint8Array::new(&buffer).to_vec();
        on_progress(bytes.len() as u64, total);
        return Ok(bytes);
    };

    let reader: ReadableStreamDefaultReader = body.get_reader().dyn_into().map_err(network)?;
    let mut bytes = Vec::with_capacity(total.unwrap_or(0) as usize);
    loop {
        let chunk = JsFuture::from(reader.read()).await.map_err(network)?;
        let done = Reflect::get(&chunk, &JsValue::from_str("done"))
            .map_err(network)?
            .as_bool()
            .unwrap_or(true);
        if done {
            break;
        }
        let value = Reflect::get(&chunk, &JsValue::from_str("value")).map_err(network)?;
        bytes.extend(Uint8Array::new(&value).to_vec());
        on_progress(bytes.len() as u64, total);
    }

    Ok(bytes)
}

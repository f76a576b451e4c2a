use async_trait::async_trait;
use client::http::{HttpRequest, HttpResponse, Method, RequestBody};
use client::{ClientError, ClientResult, HttpTransport};
use gloo_net::http::{Request, RequestBuilder};
use js_sys::{Array, Uint8Array};
use wasm_bindgen::JsValue;
use web_sys::{Blob, FormData};

/// `fetch` transport. Any status is returned as a response; only network
/// failures become errors.
pub struct GlooTransport;

fn js_error(context: &str, value: JsValue) -> ClientError {
    ClientError::Encode(format!("{}: {:?}", context, value))
}

fn multipart(field: &str, file_name: &str, bytes: &[u8]) -> ClientResult<FormData> {
    let parts = Array::of1(&Uint8Array::from(bytes));
    let blob = Blob::new_with_u8_array_sequence(&parts).map_err(|e| js_error("blob", e))?;
    let form = FormData::new().map_err(|e| js_error("form data", e))?;
    form.append_with_blob_and_filename(field, &blob, file_name)
        .map_err(|e| js_error("form field", e))?;
    Ok(form)
}

fn builder(method: Method, url: &str) -> RequestBuilder {
    match method {
        Method::Get => Request::get(url),
        Method::Post => Request::post(url),
        Method::Put => Request::put(url),
        Method::Delete => Request::delete(url),
    }
}

#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = builder(method, &url);
        for (name, value) in &headers {
            builder = builder.header(name, value);
        }

        // The browser sets the multipart boundary header itself.
        let prepared = match body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::File {
                field,
                file_name,
                bytes,
            } => builder.body(multipart(&field, &file_name, &bytes)?),
        }
        .map_err(|e| ClientError::Encode(e.to_string()))?;

        let response = prepared
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("{} {}: {}", method, url, e)))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

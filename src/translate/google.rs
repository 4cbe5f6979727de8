//! Google Translate v2 client.

use std::time::Duration;

use serde::Deserialize;

use super::{TranslateError, TranslationProvider};
use crate::config::TranslationConfig;

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

/// Interpret a provider reply: HTTP 200 with
/// `data.translations[0].translatedText` is success, everything else fails.
/// HTML entities in the translated text are decoded.
pub fn interpret_response(status: u16, body: &str) -> Result<String, TranslateError> {
    if status != 200 {
        return Err(TranslateError::Status {
            status,
            body: body.to_string(),
        });
    }
    let parsed: TranslateResponse = serde_json::from_str(body)
        .map_err(|e| TranslateError::MalformedResponse(e.to_string()))?;
    let first = parsed
        .data
        .translations
        .into_iter()
        .next()
        .ok_or_else(|| TranslateError::MalformedResponse("no translations returned".into()))?;
    Ok(html_escape::decode_html_entities(&first.translated_text).into_owned())
}

/// Blocking client issuing one POST per call, with `q`, `target` and `key`
/// in the query string.
#[derive(Debug, Clone)]
pub struct GoogleTranslateClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
}

impl GoogleTranslateClient {
    pub fn new(config: &TranslationConfig) -> Result<Self, TranslateError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(TranslateError::MissingCredential)?;
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TranslateError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }
}

impl TranslationProvider for GoogleTranslateClient {
    fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError> {
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("q", text), ("target", target), ("key", self.api_key.as_str())])
            .send()
            .map_err(|e| TranslateError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| TranslateError::Transport(e.to_string()))?;
        interpret_response(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one canned HTTP reply on a local port and hand back the
    /// request head the client sent.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/language/translate/v2", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            let reply = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(reply.as_bytes()).unwrap();
            String::from_utf8_lossy(&head).to_string()
        });
        (endpoint, handle)
    }

    fn client_for(endpoint: String) -> GoogleTranslateClient {
        GoogleTranslateClient::new(&TranslationConfig {
            endpoint,
            api_key: Some("test-key".into()),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn success_is_unescaped() {
        let body = r#"{"data":{"translations":[{"translatedText":"x &amp; y __MATH_0__","detectedSourceLanguage":"en"}]}}"#;
        assert_eq!(interpret_response(200, body).unwrap(), "x & y __MATH_0__");
    }

    #[test]
    fn full_entity_table_is_decoded() {
        let body = r#"{"data":{"translations":[{"translatedText":"wait&hellip; x &mdash; y, it&rsquo;s 1&ndash;2 &#x915;"}]}}"#;
        assert_eq!(
            interpret_response(200, body).unwrap(),
            "wait\u{2026} x \u{2014} y, it\u{2019}s 1\u{2013}2 \u{915}"
        );
    }

    #[test]
    fn non_200_is_status_error() {
        let err = interpret_response(403, "quota exceeded").unwrap_err();
        match err {
            TranslateError::Status { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_translations_is_malformed() {
        let err = interpret_response(200, r#"{"data":{"translations":[]}}"#).unwrap_err();
        assert!(matches!(err, TranslateError::MalformedResponse(_)));
        let err = interpret_response(200, "<html>").unwrap_err();
        assert!(matches!(err, TranslateError::MalformedResponse(_)));
    }

    #[test]
    fn client_sends_fields_in_query_string() {
        let (endpoint, server) = serve_once(
            "200 OK",
            r#"{"data":{"translations":[{"translatedText":"नमस्ते &amp; __MATH_0__"}]}}"#,
        );
        let translated = client_for(endpoint).translate("hello & __MATH_0__", "hi").unwrap();
        assert_eq!(translated, "नमस्ते & __MATH_0__");

        let head = server.join().unwrap();
        let request_line = head.lines().next().unwrap();
        assert!(request_line.starts_with("POST /language/translate/v2?"), "{request_line}");
        assert!(request_line.contains("q=hello+%26+__MATH_0__"), "{request_line}");
        assert!(request_line.contains("target=hi"));
        assert!(request_line.contains("key=test-key"));
    }

    #[test]
    fn client_reports_non_200_status() {
        let (endpoint, server) = serve_once("403 Forbidden", r#"{"error":{"code":403}}"#);
        let err = client_for(endpoint).translate("hello", "hi").unwrap_err();
        server.join().unwrap();
        match err {
            TranslateError::Status { status, body } => {
                assert_eq!(status, 403);
                assert!(body.contains("403"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn client_failure_falls_back_to_input() {
        let (endpoint, server) = serve_once("500 Internal Server Error", "backend down");
        let client = client_for(endpoint);
        let out = crate::translate::translate(&client, "Solve for x.", qbank_ir::Language::Hindi);
        server.join().unwrap();
        assert_eq!(out.content, "Solve for x.");
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].message.contains("500"));
    }

    #[test]
    fn client_requires_key() {
        let err = GoogleTranslateClient::new(&TranslationConfig::default()).unwrap_err();
        assert!(matches!(err, TranslateError::MissingCredential));
    }
}

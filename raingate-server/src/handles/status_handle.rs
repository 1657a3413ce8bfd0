use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::response::{Html, IntoResponse, Response};

use crate::configs::{RainLevel, Server};
use crate::models::SensorReading;
use crate::services::ReadingStore;

#[derive(Clone)]
pub struct StatusState {
    pub reading: ReadingStore,
    pub rainlevel: RainLevel,
    pub server: Server,
    pub buttons: Arc<Vec<String>>,
}

/// Everything both renderings show.
struct Status<'a> {
    default: f64,
    threshold: f64,
    reading: SensorReading,
    buttons: &'a [String],
}

impl Status<'_> {
    fn verdict(&self) -> &'static str {
        if self.reading.is_raining(self.threshold) { "YES" } else { "NO" }
    }
}

pub async fn get_status(State(state): State<StatusState>, headers: HeaderMap) -> Response {
    let status = Status {
        default: state.rainlevel.default,
        threshold: state.rainlevel.threshold,
        reading: state.reading.get().await,
        buttons: &state.buttons,
    };

    let accepts_html = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"));

    if accepts_html {
        Html(render_page(&status)).into_response()
    } else {
        let host = headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| state.server.address());

        (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            render_text(&status, &host),
        )
            .into_response()
    }
}

/// `close-left` -> `Close Left`
pub fn button_label(action: &str) -> String {
    action
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn render_text(status: &Status, host: &str) -> String {
    let commands = status
        .buttons
        .iter()
        .map(|action| format!("  curl -sSL http://{host}/m/{action}  # {}", button_label(action)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Rain Sensor Data
----------------
Default: {default}
Threshold: {threshold}
Measured: {reading}
Is it raining: {verdict}

Manual Actions:
---------------
{commands}
",
        default = status.default,
        threshold = status.threshold,
        reading = status.reading,
        verdict = status.verdict(),
    )
}

fn render_page(status: &Status) -> String {
    let rows = status
        .buttons
        .chunks(2)
        .map(|row| {
            let buttons = row
                .iter()
                .map(|action| {
                    format!(
                        r#"<button onclick="fetch('/m/{action}').then(response => response.text()).then(data => alert(data))">{}</button>"#,
                        button_label(action)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n          ");

            format!("        <div class=\"button-row\">\n          {buttons}\n        </div>")
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Rain Sensor</title>
    <link rel="stylesheet" type="text/css" href="/style.css">
  </head>
  <body>
    <div class="content">
      <h3>RAIN SENSOR DATA</h3>
      <p><strong>Default:</strong> {default}</p>
      <p><strong>Threshold:</strong> {threshold}</p>
      <p><strong>Measured:</strong> <span id="measured-value">{reading}</span></p>
      <p><strong>Is it raining:</strong> <span id="rain-status">{verdict}</span></p>
      <div class="buttons">
{rows}
      </div>
    </div>
    <script>
      if (window.EventSource) {{
        const source = new EventSource('/live-rain-sensor');
        source.onmessage = function (event) {{
          const measured = parseFloat(event.data);
          const raining = !isNaN(measured) && measured < {threshold};
          document.getElementById('measured-value').textContent = event.data;
          document.getElementById('rain-status').textContent = raining ? 'YES' : 'NO';
        }};
      }}
    </script>
  </body>
</html>
"#,
        default = status.default,
        threshold = status.threshold,
        reading = status.reading,
        verdict = status.verdict(),
    )
}

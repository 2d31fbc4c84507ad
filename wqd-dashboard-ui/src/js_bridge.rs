//! Typed wrappers around JS interop via `js_sys::eval()`.
//!
//! The D3.js band chart lives in `assets/js/*.js` and is evaluated at
//! runtime as globals (no ES modules) exposed via `window.*`.
//! This module serializes data and calls those globals.

static TOOLTIP_JS: &str = include_str!("../assets/js/tooltip.js");
static BAND_CHART_JS: &str = include_str!("../assets/js/band-chart.js");

/// D3 v7 from the public CDN, injected when the page has not loaded it.
const D3_SRC: &str = "https://d3js.org/d3.v7.min.js";

/// Execute arbitrary JS, wrapping in try/catch to avoid panics.
pub fn call_js(code: &str) {
    let wrapped = format!(
        "try {{ {} }} catch(e) {{ console.warn('WQD JS call failed:', e); }}",
        code
    );
    let _ = js_sys::eval(&wrapped);
}

/// Escape a JSON payload for embedding in a single-quoted JS string.
fn escape_payload(json: &str) -> String {
    json.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "")
}

/// Load D3 if needed, then evaluate the chart scripts once it is ready.
///
/// The chart JS files define functions via `function` declarations. To make
/// them global (not block-scoped inside the polling callback) they are
/// evaluated with an indirect `eval` and then promoted to `window.*`.
pub fn init_charts() {
    let all_js = [TOOLTIP_JS, BAND_CHART_JS].join("\n");

    let store_js = format!(
        "window.__wqdChartScripts = {};",
        serde_json::to_string(&all_js).unwrap_or_default()
    );
    let _ = js_sys::eval(&store_js);

    let init_js = format!(
        r#"
        (function() {{
            if (typeof d3 === 'undefined' && !document.getElementById('wqd-d3')) {{
                var s = document.createElement('script');
                s.id = 'wqd-d3';
                s.src = '{D3_SRC}';
                document.head.appendChild(s);
            }}
            var waitForD3 = setInterval(function() {{
                if (typeof d3 !== 'undefined' && window.__wqdChartScripts) {{
                    clearInterval(waitForD3);
                    (0, eval)(window.__wqdChartScripts);
                    delete window.__wqdChartScripts;
                    if (typeof renderBandChart !== 'undefined') window.renderBandChart = renderBandChart;
                    if (typeof destroyBandChart !== 'undefined') window.destroyBandChart = destroyBandChart;
                    if (typeof initTooltip !== 'undefined') window.initTooltip = initTooltip;
                    if (typeof showTooltip !== 'undefined') window.showTooltip = showTooltip;
                    if (typeof hideTooltip !== 'undefined') window.hideTooltip = hideTooltip;
                    window.__wqdChartsReady = true;
                    console.log('WQD charts initialized');
                }}
            }}, 100);
        }})();
        "#
    );
    let _ = js_sys::eval(&init_js);
}

/// Poll attempts (100 ms apart) before a pending chart render gives up.
const MAX_RENDER_POLLS: u32 = 100;

/// Script that renders the prediction chart once D3, the chart scripts and
/// the container all exist.
///
/// At most one render is pending per container: a newer call cancels the
/// older poll, so only the latest data is drawn. The poll stops after
/// [`MAX_RENDER_POLLS`] attempts.
fn band_chart_script(container_id: &str, data_json: &str, config_json: &str) -> String {
    let escaped_data = escape_payload(data_json);
    let escaped_config = escape_payload(config_json);
    format!(
        r#"
        (function() {{
            var polls = window.__wqdChartPolls = window.__wqdChartPolls || {{}};
            if (polls['{container_id}']) clearInterval(polls['{container_id}']);
            var attempts = 0;
            var poll = setInterval(function() {{
                attempts += 1;
                if (window.__wqdChartsReady &&
                    typeof window.renderBandChart !== 'undefined' &&
                    document.getElementById('{container_id}')) {{
                    clearInterval(poll);
                    delete polls['{container_id}'];
                    try {{
                        window.renderBandChart('{container_id}', '{escaped_data}', '{escaped_config}');
                    }} catch(e) {{ console.error('[WQD] renderBandChart error:', e); }}
                }} else if (attempts >= {MAX_RENDER_POLLS}) {{
                    clearInterval(poll);
                    delete polls['{container_id}'];
                    console.warn('[WQD] chart container {container_id} not ready, render dropped');
                }}
            }}, 100);
            polls['{container_id}'] = poll;
        }})();
        "#,
    )
}

/// Render the prediction chart: predicted value line over a CI90 band.
///
/// `data_json` is an array of `{time_label, predicted_value, ci_low, ci_high, unit}`.
pub fn render_band_chart(container_id: &str, data_json: &str, config_json: &str) {
    call_js(&band_chart_script(container_id, data_json, config_json));
}

/// Cancel any pending render, then destroy/clean up the chart in the given
/// container.
pub fn destroy_chart(container_id: &str) {
    call_js(&format!(
        "var polls = window.__wqdChartPolls; if (polls && polls['{0}']) {{ clearInterval(polls['{0}']); delete polls['{0}']; }} \
         if (window.destroyBandChart) {{ window.destroyBandChart('{0}'); }} else {{ var el = document.getElementById('{0}'); if (el) el.innerHTML = ''; }}",
        container_id
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_escaping() {
        assert_eq!(escape_payload(r#"[{"a":"it's"}]"#), r#"[{"a":"it\'s"}]"#);
        assert_eq!(escape_payload("{\n}"), "{}");
        assert_eq!(escape_payload(r#""\n""#), r#""\\n""#);
    }

    #[test]
    fn band_chart_render_is_bounded_and_deduplicated() {
        let js = band_chart_script("chart-1", "[]", "{}");
        assert!(js.contains("if (polls['chart-1']) clearInterval(polls['chart-1']);"));
        assert!(js.contains("polls['chart-1'] = poll;"));
        assert!(js.contains(&format!("attempts >= {}", MAX_RENDER_POLLS)));
        assert_eq!(js.matches("clearInterval(poll);").count(), 2);
        assert!(js.contains("window.renderBandChart('chart-1', '[]', '{}')"));
    }
}

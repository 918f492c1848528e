use super::{sorted_by_risk, Summary};
use crate::scanner::ScoredResult;
use crate::scorer::RiskClass;
use chrono::{DateTime, Local};

const STYLE: &str = r#"
  :root { --bg: #0a0b0f; --surface: #111318; --border: #1e2130; --accent: #00d4ff;
          --red: #ff3b5c; --yellow: #f5c842; --green: #39e07d; --text: #e2e8f0; --muted: #64748b; }
  * { margin: 0; padding: 0; box-sizing: border-box; }
  body { background: var(--bg); color: var(--text); font-family: system-ui, sans-serif; }
  header { padding: 2rem 3rem; border-bottom: 1px solid var(--border); }
  header h1 { color: var(--accent); font-size: 1.8rem; }
  .meta { color: var(--muted); font-family: monospace; font-size: 0.8rem; margin-top: 0.5rem; }
  .stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(150px, 1fr)); gap: 1rem; padding: 2rem 3rem; }
  .stat { background: var(--surface); border: 1px solid var(--border); border-radius: 10px; padding: 1rem 1.25rem; }
  .stat .num { font-size: 2rem; font-weight: 800; }
  .stat .label { color: var(--muted); font-size: 0.75rem; text-transform: uppercase; }
  section { padding: 0 3rem 3rem; }
  table { width: 100%; border-collapse: collapse; background: var(--surface); font-size: 0.85rem; }
  th { text-align: left; padding: 0.75rem 1rem; color: var(--muted); font-size: 0.7rem; text-transform: uppercase; border-bottom: 1px solid var(--border); }
  td { padding: 0.6rem 1rem; border-bottom: 1px solid var(--border); }
  a { color: var(--accent); font-family: monospace; text-decoration: none; }
  .row-high { border-left: 3px solid var(--red); }
  .row-medium { border-left: 3px solid var(--yellow); }
  .row-low, .row-minimal { border-left: 3px solid var(--green); }
  .badge { font-family: monospace; font-weight: 700; padding: 0.2rem 0.6rem; border-radius: 12px; }
  .badge-high { background: rgba(255,59,92,0.15); color: var(--red); }
  .badge-medium { background: rgba(245,200,66,0.15); color: var(--yellow); }
  .badge-low, .badge-minimal { background: rgba(57,224,125,0.15); color: var(--green); }
  .threat { color: var(--red); font-weight: 700; }
  .muted { color: var(--muted); }
"#;

const REGISTRAR_WIDTH: usize = 25;
const TITLE_WIDTH: usize = 40;

/// Self-contained page: summary cards and the registered candidates.
pub fn render(target: &str, scan_time: &DateTime<Local>, results: &[ScoredResult]) -> String {
    let summary = Summary::from_results(results);

    let rows: String = sorted_by_risk(results)
        .into_iter()
        .filter(|r| r.registered)
        .map(render_row)
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Typosquatch Report - {target}</title>
<style>{STYLE}</style>
</head>
<body>
<header>
  <h1>Typosquatch</h1>
  <div class="meta">Target: {target} &middot; Scanned: {time}</div>
</header>
<div class="stats">
{cards}
</div>
<section>
<table>
  <thead>
    <tr><th>Domain</th><th>Type</th><th>HTTP</th><th>MX</th><th>SSL</th><th>IP</th><th>Registrar</th><th>Title</th><th>Threat</th><th>Risk</th></tr>
  </thead>
  <tbody>{rows}
  </tbody>
</table>
</section>
</body>
</html>
"#,
        target = html_escape(target),
        time = scan_time.format("%Y-%m-%d %H:%M:%S"),
        cards = render_cards(&summary),
        rows = rows,
    )
}

fn render_cards(summary: &Summary) -> String {
    [
        (summary.total, "Variations"),
        (summary.registered, "Registered"),
        (summary.active_web, "Active Web"),
        (summary.with_mx, "MX Records"),
        (summary.with_ssl, "Valid SSL"),
        (summary.threats, "Threat Hits"),
        (summary.high_risk, "High Risk"),
        (summary.medium_risk, "Medium Risk"),
    ]
    .iter()
    .map(|(count, label)| {
        format!(
            r#"  <div class="stat"><div class="num">{}</div><div class="label">{}</div></div>"#,
            count, label
        )
    })
    .collect::<Vec<_>>()
    .join("\n")
}

fn render_row(r: &ScoredResult) -> String {
    let s = &r.signals;
    let class = r.risk_class.as_str().to_lowercase();
    let domain = html_escape(&r.domain);
    let http = s
        .http_status()
        .map(|status| status.to_string())
        .unwrap_or_else(|| "-".to_string());
    let threat = if s.is_threat() {
        r#"<span class="threat">THREAT</span>"#
    } else {
        r#"<span class="muted">-</span>"#
    };

    format!(
        r#"
    <tr class="row-{class}">
      <td><a href="http://{domain}" target="_blank" rel="noopener noreferrer">{domain}</a></td>
      <td>{vtype}</td>
      <td>{http}</td>
      <td>{mx}</td>
      <td>{ssl}</td>
      <td>{ip}</td>
      <td class="muted">{registrar}</td>
      <td>{title}</td>
      <td>{threat}</td>
      <td><span class="badge badge-{class}">{score} {label}</span></td>
    </tr>"#,
        vtype = r.variation_type,
        mx = yes_no(!s.mx_records().is_empty()),
        ssl = yes_no(s.ssl_valid()),
        ip = html_escape(s.ip_address().unwrap_or("-")),
        registrar = html_escape(&truncate(s.whois_registrar().unwrap_or("-"), REGISTRAR_WIDTH)),
        title = html_escape(&truncate(s.page_title().unwrap_or("-"), TITLE_WIDTH)),
        score = r.risk_score,
        label = badge_label(r.risk_class),
    )
}

fn badge_label(class: RiskClass) -> &'static str {
    match class {
        RiskClass::Medium => "MED",
        other => other.as_str(),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let head: String = s.chars().take(width).collect();
        format!("{}…", head)
    } else {
        s.to_string()
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

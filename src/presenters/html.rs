//! Static HTML report
//!
//! Renders a `ReportView` into one UTF-8 document with embedded CSS, a tab
//! switcher and Chart.js charts fed from an embedded JSON payload.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

use super::{MetricCard, ReportView, ANALYSIS_TITLE};
use crate::reports::ReportKind;

const CHART_JS_URL: &str = "https://cdn.jsdelivr.net/npm/chart.js@4.4.0/dist/chart.umd.min.js";

const STYLE: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; padding: 20px; background: #f5f7fa; color: #2c3e50;
       font-family: 'Malgun Gothic', 'Apple SD Gothic Neo', sans-serif; }
.container { max-width: 1400px; margin: 0 auto; background: #fff; border-radius: 10px;
             box-shadow: 0 2px 12px rgba(0,0,0,0.08); overflow: hidden; }
.header { background: linear-gradient(135deg, #1f4e79 0%, #2e75b6 100%); color: #fff; padding: 30px 40px; }
.header h1 { margin: 0 0 10px 0; font-size: 2em; }
.header .meta { opacity: 0.85; font-size: 0.95em; }
.tabs { display: flex; border-bottom: 2px solid #e1e8ed; background: #fafbfc; }
.tab { padding: 15px 30px; cursor: pointer; border: none; background: none; font-size: 1em;
       color: #5a6c7d; border-bottom: 3px solid transparent; }
.tab.active { color: #1f4e79; border-bottom-color: #1f4e79; font-weight: bold; }
.tab-content { display: none; padding: 30px 40px; }
.tab-content.active { display: block; }
h2 { color: #1f4e79; border-left: 4px solid #2e75b6; padding-left: 12px; margin: 30px 0 15px 0; }
.metrics-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); gap: 20px; }
.metric-card { background: #f8fafc; border: 1px solid #e1e8ed; border-radius: 8px; padding: 20px; }
.metric-label { color: #5a6c7d; font-size: 0.9em; margin-bottom: 8px; }
.metric-value { font-size: 1.6em; font-weight: bold; color: #1f4e79; }
.metric-change { margin-top: 6px; font-size: 0.9em; }
.positive-change { color: #27ae60; }
.negative-change { color: #e74c3c; }
.charts-section { display: grid; grid-template-columns: repeat(auto-fit, minmax(450px, 1fr)); gap: 30px; margin: 30px 0; }
.chart-container { background: #fff; border: 1px solid #e1e8ed; border-radius: 8px; padding: 20px; }
.chart-container h3 { margin-top: 0; color: #2c3e50; }
.table-container { overflow-x: auto; }
.data-table { width: 100%; border-collapse: collapse; }
.data-table th { background: #1f4e79; color: #fff; padding: 12px; text-align: left; }
.data-table td { padding: 10px 12px; border-bottom: 1px solid #e1e8ed; }
.data-table td.num { text-align: right; font-variant-numeric: tabular-nums; }
.data-table tr:hover { background: #f5f7fa; }
.empty { color: #7f8c8d; padding: 40px; text-align: center; }
.total { text-align: right; font-size: 1.1em; margin-top: 12px; }
.footer { text-align: center; color: #95a5a6; padding: 20px; font-size: 0.85em; }
@media (max-width: 768px) {
  .charts-section { grid-template-columns: 1fr; }
  .tab-content { padding: 20px; }
}
"#;

const SCRIPT: &str = r#"
const reportData = JSON.parse(document.getElementById('report-data').textContent);
const palette = ['#3498db', '#2ecc71', '#e74c3c', '#f39c12', '#9b59b6', '#1abc9c', '#e67e22'];

function showTab(name) {
  document.querySelectorAll('.tab').forEach(t => t.classList.toggle('active', t.dataset.tab === name));
  document.querySelectorAll('.tab-content').forEach(c => c.classList.toggle('active', c.id === name + '-tab'));
}

function datasets(series) {
  return series.map((s, i) => ({
    label: s.label,
    data: s.data,
    borderColor: palette[i % palette.length],
    backgroundColor: palette[i % palette.length] + '40'
  }));
}

function chart(id, config) {
  const el = document.getElementById(id);
  if (el && typeof Chart !== 'undefined') { new Chart(el, config); }
}

document.addEventListener('DOMContentLoaded', () => {
  document.querySelectorAll('.tab').forEach(t => t.addEventListener('click', () => showTab(t.dataset.tab)));
  const c = reportData;
  chart('summaryChart', { type: 'bar', data: { labels: c.summary_labels,
    datasets: [{ label: '값', data: c.summary_values, backgroundColor: '#3498db80' }] } });
  chart('changeChart', { type: 'bar', data: { labels: c.summary_labels,
    datasets: [{ label: '변동률 (%)', data: c.summary_changes,
      backgroundColor: c.summary_changes.map(v => v >= 0 ? '#27ae6080' : '#e74c3c80') }] } });
  chart('incomeChart', { type: 'bar', data: { labels: c.income_years, datasets: datasets(c.income_all) } });
  chart('incomeTrendChart', { type: 'line', data: { labels: c.income_years, datasets: datasets(c.income_trend) } });
  chart('balancePieChart', { type: 'doughnut', data: { labels: c.balance_labels,
    datasets: [{ data: c.balance_values, backgroundColor: palette }] } });
  chart('balanceBarChart', { type: 'bar', data: { labels: c.balance_labels,
    datasets: [{ label: '금액', data: c.balance_values, backgroundColor: '#2e75b680' }] } });
});
"#;

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Keep embedded JSON from closing its script element
fn escape_script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn change_class(positive: Option<bool>) -> &'static str {
    match positive {
        Some(true) => "positive-change",
        Some(false) => "negative-change",
        None => "",
    }
}

fn empty_block(message: &str) -> String {
    format!("<p class=\"empty\">{}</p>\n", escape_html(message))
}

fn metric_cards(cards: &[MetricCard]) -> String {
    let mut html = String::from("<div class=\"metrics-grid\">\n");
    for card in cards {
        let _ = write!(
            html,
            "<div class=\"metric-card\"><div class=\"metric-label\">{}</div><div class=\"metric-value\">{}</div>",
            escape_html(&card.label),
            escape_html(&card.value)
        );
        if let Some(change) = &card.change {
            let _ = write!(
                html,
                "<div class=\"metric-change {}\">{} 전년 대비</div>",
                change_class(Some(change.positive)),
                escape_html(&change.text)
            );
        }
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n");
    html
}

fn chart_pair(left: (&str, &str), right: (&str, &str)) -> String {
    format!(
        "<div class=\"charts-section\">\n\
         <div class=\"chart-container\"><h3>{}</h3><canvas id=\"{}\"></canvas></div>\n\
         <div class=\"chart-container\"><h3>{}</h3><canvas id=\"{}\"></canvas></div>\n\
         </div>\n",
        left.0, left.1, right.0, right.1
    )
}

fn table(headers: &[String], rows: &[Vec<(String, &str)>]) -> String {
    let mut html = String::from("<div class=\"table-container\"><table class=\"data-table\">\n<thead><tr>");
    for header in headers {
        let _ = write!(html, "<th>{}</th>", escape_html(header));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in rows {
        html.push_str("<tr>");
        for (cell, class) in row {
            if class.is_empty() {
                let _ = write!(html, "<td>{}</td>", escape_html(cell));
            } else {
                let _ = write!(html, "<td class=\"{}\">{}</td>", class, escape_html(cell));
            }
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table></div>\n");
    html
}

fn headers(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}

fn summary_tab(view: &ReportView) -> String {
    let summary = &view.summary;
    if let Some(message) = &summary.empty_message {
        return empty_block(message);
    }

    let rows: Vec<Vec<(String, &str)>> = summary
        .rows
        .iter()
        .map(|line| {
            vec![
                (line.name.clone(), ""),
                (line.value.clone(), "num"),
                (line.change.clone(), change_class(line.change_positive)),
            ]
        })
        .collect();

    let mut html = String::from("<h2>주요 재무 지표</h2>\n");
    html.push_str(&metric_cards(&summary.cards));
    html.push_str(&chart_pair(("주요 지표 비교", "summaryChart"), ("변동률", "changeChart")));
    html.push_str("<h2>상세 내역</h2>\n");
    html.push_str(&table(&headers(&["항목", "값", "변동률"]), &rows));
    html
}

fn income_tab(view: &ReportView) -> String {
    let income = &view.income;
    if let Some(message) = &income.empty_message {
        return empty_block(message);
    }

    let mut column_headers = headers(&["항목"]);
    column_headers.extend(income.years.iter().cloned());
    let rows: Vec<Vec<(String, &str)>> = income
        .rows
        .iter()
        .map(|line| {
            std::iter::once((line.name.clone(), ""))
                .chain(line.amounts.iter().map(|a| (a.clone(), "num")))
                .collect()
        })
        .collect();

    let mut html = String::from("<h2>손익계산서</h2>\n");
    html.push_str(&chart_pair(("연도별 비교", "incomeChart"), ("주요 항목 트렌드", "incomeTrendChart")));
    html.push_str("<h2>상세 내역</h2>\n");
    html.push_str(&table(&column_headers, &rows));

    let _ = writeln!(html, "<h2>{}</h2>", ANALYSIS_TITLE);
    match &view.analysis.empty_message {
        Some(message) => html.push_str(&empty_block(message)),
        None => html.push_str(&metric_cards(&view.analysis.margins)),
    }

    if let Some((current, previous)) = &income.comparison_years {
        let yoy_rows: Vec<Vec<(String, &str)>> = income
            .year_over_year
            .iter()
            .map(|line| {
                vec![
                    (line.name.clone(), ""),
                    (line.previous.clone(), "num"),
                    (line.current.clone(), "num"),
                    (line.change.clone(), change_class(line.change_positive)),
                ]
            })
            .collect();
        html.push_str("<h2>전년 대비 증감</h2>\n");
        html.push_str(&table(
            &[
                "항목".to_string(),
                previous.clone(),
                current.clone(),
                "증감률".to_string(),
            ],
            &yoy_rows,
        ));
    }
    html
}

fn balance_tab(view: &ReportView) -> String {
    let balance = &view.balance;
    if let Some(message) = &balance.empty_message {
        return empty_block(message);
    }

    let category_rows: Vec<Vec<(String, &str)>> = balance
        .categories
        .iter()
        .map(|line| {
            vec![
                (line.category.clone(), ""),
                (line.total.clone(), "num"),
                (line.share.clone(), "num"),
            ]
        })
        .collect();
    let detail_rows: Vec<Vec<(String, &str)>> = balance
        .rows
        .iter()
        .map(|line| {
            vec![
                (line.name.clone(), ""),
                (line.value.clone(), "num"),
                (line.category.clone(), ""),
            ]
        })
        .collect();

    let mut html = String::from("<h2>재무상태표</h2>\n");
    html.push_str(&metric_cards(&balance.overview));
    html.push_str(&chart_pair(("분류별 구성", "balancePieChart"), ("분류별 금액", "balanceBarChart")));
    html.push_str("<h2>분류별 합계</h2>\n");
    html.push_str(&table(&headers(&["분류", "금액", "비중"]), &category_rows));
    html.push_str("<h2>상세 내역</h2>\n");
    html.push_str(&table(&headers(&["항목", "금액", "분류"]), &detail_rows));
    html.push_str(&format!(
        "<p class=\"total\">합계: <strong>{}</strong></p>\n",
        escape_html(&balance.total)
    ));
    html
}

/// Render the complete document
pub fn render_document(view: &ReportView, generated_on: NaiveDate) -> String {
    let payload = serde_json::to_string(&view.charts).unwrap_or_else(|_| "{}".to_string());
    let title = escape_html(&view.title);

    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{title}</title>\n<script src=\"{CHART_JS_URL}\"></script>\n\
         <style>{STYLE}</style>\n</head>\n<body>\n<div class=\"container\">\n"
    );

    let _ = write!(
        html,
        "<div class=\"header\"><h1>{}</h1><div class=\"meta\">생성일: {}",
        title,
        generated_on.format("%Y년 %m월 %d일")
    );
    if !view.source.is_empty() {
        let _ = write!(html, " · 데이터: {}", escape_html(&view.source));
    }
    html.push_str("</div></div>\n");

    let tabs = [
        ("summary", ReportKind::Summary, summary_tab(view)),
        ("income", ReportKind::Income, income_tab(view)),
        ("balance", ReportKind::Balance, balance_tab(view)),
    ];

    html.push_str("<div class=\"tabs\">\n");
    for (idx, (id, kind, _)) in tabs.iter().enumerate() {
        let active = if idx == 0 { " active" } else { "" };
        let _ = writeln!(
            html,
            "<button class=\"tab{}\" data-tab=\"{}\">{}</button>",
            active,
            id,
            kind.title()
        );
    }
    html.push_str("</div>\n");

    for (idx, (id, _, body)) in tabs.iter().enumerate() {
        let active = if idx == 0 { " active" } else { "" };
        let _ = write!(
            html,
            "<div class=\"tab-content{}\" id=\"{}-tab\">\n{}</div>\n",
            active, id, body
        );
    }

    let _ = write!(
        html,
        "<div class=\"footer\">{}</div>\n</div>\n\
         <script type=\"application/json\" id=\"report-data\">{}</script>\n\
         <script>{}</script>\n</body>\n</html>\n",
        title,
        escape_script_json(&payload),
        SCRIPT
    );
    html
}

/// Render and write the document, returning the number of bytes written
pub fn write_report<P: AsRef<Path>>(view: &ReportView, generated_on: NaiveDate, path: P) -> Result<usize> {
    let path = path.as_ref();
    let html = render_document(view, generated_on);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    std::fs::write(path, &html).with_context(|| format!("Failed to write report to {:?}", path))?;

    info!("Wrote HTML report to {:?} ({} bytes)", path, html.len());
    Ok(html.len())
}

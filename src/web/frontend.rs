//! Embedded HTML/CSS/JS frontend for the fuelwatch dashboard.
//!
//! The entire page is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>fuelwatch</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --yellow: #d29922;
  --red: #f85149;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

header {
  display: flex;
  justify-content: space-between;
  align-items: center;
  padding: 16px 24px;
  border-bottom: 1px solid var(--border);
}
header h1 { font-size: 18px; }
#status { font-size: 13px; color: var(--text-muted); }
#status.connected { color: var(--green); }
#status.disconnected { color: var(--red); }

main {
  display: grid;
  grid-template-columns: 340px 1fr;
  gap: 24px;
  padding: 24px;
  max-width: 1100px;
  margin: 0 auto;
}
.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
}
label { display: block; margin: 10px 0 4px; color: var(--text-muted); }
select {
  width: 100%;
  padding: 6px 8px;
  background: var(--bg);
  color: var(--text);
  border: 1px solid var(--border);
  border-radius: 4px;
}
button {
  margin-top: 16px;
  width: 100%;
  padding: 8px;
  border: none;
  border-radius: 4px;
  background: var(--accent);
  color: #fff;
  font-weight: 600;
  cursor: pointer;
}
button:disabled { opacity: 0.5; cursor: not-allowed; }
button.secondary { background: transparent; border: 1px solid var(--border); color: var(--text); }

#result h2 { font-size: 28px; margin-bottom: 4px; }
#result h2.efficient { color: var(--green); }
#result h2.inefficient { color: var(--red); }
#advisory { margin: 12px 0; padding: 8px 12px; border-left: 3px solid var(--yellow); color: var(--yellow); }
.metric { display: flex; justify-content: space-between; padding: 4px 0; border-bottom: 1px solid var(--border); }
.bar { height: 6px; background: var(--accent); border-radius: 3px; }
#recommendations li { margin: 6px 0 0 18px; }
.muted { color: var(--text-muted); }
#map-card { grid-column: 1 / -1; }
#map { width: 100%; height: 520px; border: 1px solid var(--border); border-radius: 4px; background: #fff; }
.hidden { display: none; }
</style>
</head>
<body>
<header>
  <h1>fuelwatch</h1>
  <span id="status"></span>
</header>

<main>
  <section class="card">
    <form id="form"></form>
    <button id="predict" disabled></button>
    <button id="view" class="secondary"></button>
    <p id="catalog-note" class="muted hidden"></p>
  </section>

  <section class="card" id="result">
    <p class="muted" id="placeholder"></p>
    <div id="result-body" class="hidden">
      <h2 id="title"></h2>
      <p id="description"></p>
      <div id="advisory" class="hidden"></div>
      <div id="metrics"></div>
      <h3 style="margin-top:16px" id="importance-title"></h3>
      <div id="importance"></div>
      <h3 style="margin-top:16px" id="recommendations-title" class="hidden"></h3>
      <ul id="recommendations"></ul>
    </div>
  </section>

  <section class="card hidden" id="map-card">
    <h3 id="map-title"></h3>
    <iframe id="map" title="map"></iframe>
  </section>
</main>

<script>
const FORM = {};
let FIELDS = [];
let COPY = {};

async function api(path, body) {
  const opts = body === undefined
    ? {}
    : { method: 'POST', headers: { 'Content-Type': 'application/json' }, body: JSON.stringify(body) };
  const resp = await fetch(path, opts);
  return { status: resp.status, data: await resp.json() };
}

function complete() {
  return FIELDS.every(f => (FORM[f.name] || '') !== '');
}

function applyCopy() {
  document.documentElement.lang = COPY.lang;
  document.getElementById('status').textContent = COPY.connecting;
  document.getElementById('predict').textContent = COPY.predict;
  document.getElementById('view').textContent = COPY.external_view;
  document.getElementById('placeholder').textContent = COPY.placeholder;
  document.getElementById('importance-title').textContent = COPY.importance;
  document.getElementById('recommendations-title').textContent = COPY.recommendations;
  document.getElementById('map-title').textContent = COPY.map;
}

function renderForm() {
  const form = document.getElementById('form');
  form.innerHTML = '';
  for (const field of FIELDS) {
    const label = document.createElement('label');
    label.textContent = field.label;
    const select = document.createElement('select');
    select.innerHTML = '<option value="">--</option>' +
      field.values.map(v => `<option value="${esc(v)}">${esc(v)}</option>`).join('');
    select.onchange = () => {
      FORM[field.name] = select.value;
      document.getElementById('predict').disabled = !complete();
    };
    form.append(label, select);
  }
}

function metric(name, value) {
  return `<div class="metric"><span>${esc(name)}</span><strong>${esc(value)}</strong></div>`;
}

function renderResult(data) {
  const r = data.result;
  document.getElementById('placeholder').classList.add('hidden');
  document.getElementById('result-body').classList.remove('hidden');

  const title = document.getElementById('title');
  title.textContent = data.title;
  title.className = r.label;
  document.getElementById('description').textContent = data.description;

  const advisory = document.getElementById('advisory');
  advisory.textContent = data.advisory || '';
  advisory.classList.toggle('hidden', !data.advisory);

  let metrics = '';
  if (r.probability_percentage || r.probability !== undefined) {
    metrics += metric(COPY.probability,
      r.probability_percentage || (r.probability * 100).toFixed(1) + '%');
  }
  if (r.confidence !== undefined) {
    metrics += metric(COPY.confidence, (r.confidence * 100).toFixed(1) + '%');
  }
  if (r.scores) {
    metrics += metric(COPY.driver_score, r.scores.driver_score.toFixed(2));
    metrics += metric(COPY.vehicle_score, r.scores.vehicle_score.toFixed(2));
    metrics += metric(COPY.driver_avg_efficiency, r.scores.driver_avg_efficiency.toFixed(2) + ' km/L');
    metrics += metric(COPY.vehicle_avg_efficiency, r.scores.vehicle_avg_efficiency.toFixed(2) + ' km/L');
  }
  document.getElementById('metrics').innerHTML = metrics;

  const entries = Object.entries(r.feature_importance || {}).sort((a, b) => b[1] - a[1]);
  const max = Math.max(...entries.map(e => e[1]), 0.0001);
  document.getElementById('importance').innerHTML = entries.map(([k, v]) =>
    `${metric(k, v.toFixed(3))}<div class="bar" style="width:${(v / max) * 100}%"></div>`
  ).join('');

  document.getElementById('recommendations-title')
    .classList.toggle('hidden', data.recommendations.length === 0);
  document.getElementById('recommendations').innerHTML = data.recommendations
    .map(rec => `<li><strong>${esc(rec.title)}:</strong> ${esc(rec.text)}</li>`).join('');
}

async function init() {
  const options = await api('/api/options');
  COPY = options.data.copy;
  applyCopy();

  FIELDS = options.data.fields;
  if (!options.data.ok) {
    const note = document.getElementById('catalog-note');
    note.textContent = COPY.catalog_fallback + ': ' + options.data.error;
    note.classList.remove('hidden');
  }
  renderForm();

  if (options.data.map) {
    document.getElementById('map').src = '/map';
    document.getElementById('map-card').classList.remove('hidden');
  }

  const health = await api('/api/health');
  const status = document.getElementById('status');
  status.textContent = health.data.status_text;
  status.className = health.data.status;
}

document.getElementById('predict').onclick = async () => {
  if (!complete()) return;
  const button = document.getElementById('predict');
  button.disabled = true;
  const resp = await api('/api/predict', FORM);
  button.disabled = !complete();
  if (resp.status === 200 && resp.data.displayed) renderResult(resp.data);
};

document.getElementById('view').onclick = async () => {
  const resp = await api('/api/view-url', FORM);
  if (resp.data.url) window.open(resp.data.url, '_blank');
};

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------
function esc(s) {
  if (s === undefined || s === null) return '';
  return String(s).replace(/&/g,'&amp;').replace(/</g,'&lt;').replace(/>/g,'&gt;').replace(/"/g,'&quot;');
}

init();
</script>
</body>
</html>
"##;

//! Server-rendered form page
//!
//! One page: farm details on the left, the selected taluka's typical
//! conditions on the right, and the outcome of the last submission (if any)
//! under the predict button. Nothing is kept between requests.
//!
//! Readings are printed with `f64` `Display`, the shortest text that reads
//! back to the same number: `1200.0` shows as `1200 mm`, `5.5` as `5.5`.

use std::fmt::Write;

use shared::{
    CaneVariety, CategoricalField, Choice, FarmSelection, IrrigationMethod, Season, SoilType,
    WeatherRecord,
};

/// Result of a form submission shown below the form
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Formatted estimate, e.g. "84.37 Tonnes/Ha"
    Estimate(String),
    /// Error description shown to the user
    Failed(String),
}

/// Everything needed to render the page
pub struct PageView<'a> {
    pub talukas: Vec<&'a str>,
    pub selection: &'a FarmSelection,
    pub weather: &'a WeatherRecord,
    pub outcome: Option<Outcome>,
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn select(html: &mut String, field: CategoricalField, options: &[&str], selected: &str, extra: &str) {
    let name = field.form_name();
    let _ = writeln!(
        html,
        r#"<label for="{name}">{label}</label>"#,
        label = field.display_name()
    );
    let _ = writeln!(html, r#"<select id="{name}" name="{name}"{extra}>"#);
    for option in options {
        let value = escape_html(option);
        let marker = if *option == selected { " selected" } else { "" };
        let _ = writeln!(html, r#"<option value="{value}"{marker}>{value}</option>"#);
    }
    html.push_str("</select>\n");
}

fn choice_select<T: Choice>(html: &mut String, selected: T) {
    select(html, T::FIELD, &T::labels(), selected.label(), "");
}

fn metric(html: &mut String, label: &str, value: f64, unit: &str) {
    let _ = writeln!(
        html,
        r#"<div class="metric"><span class="metric-label">{label}</span><span class="metric-value">{value}{unit}</span></div>"#
    );
}

/// Renders the full page
pub fn render_page(view: &PageView<'_>) -> String {
    let selection = view.selection;
    let taluka = escape_html(&selection.taluka);
    let mut html = String::with_capacity(4096);

    html.push_str(concat!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n",
        "<meta charset=\"utf-8\">\n",
        "<title>Sugarcane Yield Predictor (Farmer)</title>\n",
        "<style>\n",
        "body{font-family:sans-serif;margin:2rem;}\n",
        ".columns{display:flex;gap:2rem;}\n",
        ".columns>section{flex:1;}\n",
        "label{display:block;margin-top:.75rem;}\n",
        "select{width:100%;padding:.3rem;}\n",
        ".metrics{display:grid;grid-template-columns:1fr 1fr;gap:1rem;}\n",
        ".metric{display:flex;flex-direction:column;}\n",
        ".metric-value{font-size:1.6rem;}\n",
        ".success{background:#e6f4ea;padding:1rem;}\n",
        ".error{background:#fce8e6;padding:1rem;}\n",
        "button{width:100%;margin-top:1.5rem;padding:.6rem;}\n",
        "</style>\n</head>\n<body>\n",
        "<h1>Farmer Yield Predictor</h1>\n",
        "<p>Select your farm details. Weather conditions are automatically fetched based on your location.</p>\n",
    ));

    html.push_str("<form method=\"post\" action=\"/predict\">\n<div class=\"columns\">\n");

    // Farm details; changing the taluka reloads `/` with the whole selection
    html.push_str("<section>\n<h2>1. Farm Details</h2>\n");
    select(
        &mut html,
        CategoricalField::Taluka,
        &view.talukas,
        &selection.taluka,
        r#" onchange="window.location.href='/?'+new URLSearchParams(new FormData(this.form))""#,
    );
    choice_select::<Season>(&mut html, selection.season);
    choice_select::<CaneVariety>(&mut html, selection.variety);
    choice_select::<SoilType>(&mut html, selection.soil_type);
    choice_select::<IrrigationMethod>(&mut html, selection.irrigation);
    html.push_str("</section>\n");

    html.push_str("<section>\n<h2>2. Environmental Conditions</h2>\n");
    let _ = writeln!(
        html,
        "<p>Typical conditions for <strong>{taluka}</strong> during this period:</p>"
    );
    html.push_str("<div class=\"metrics\">\n");
    metric(&mut html, "Rainfall", view.weather.rainfall, " mm");
    metric(&mut html, "Max Temp", view.weather.max_temp, " °C");
    metric(&mut html, "Humidity", view.weather.humidity, "%");
    metric(&mut html, "Solar Rad", view.weather.solar, " kWh/m²");
    html.push_str("</div>\n</section>\n</div>\n");

    html.push_str("<button type=\"submit\">Predict Yield</button>\n</form>\n");

    match &view.outcome {
        Some(Outcome::Estimate(display)) => {
            let _ = writeln!(
                html,
                r#"<div class="success"><h3>Estimated Yield: {}</h3></div>"#,
                escape_html(display)
            );
        }
        Some(Outcome::Failed(message)) => {
            let _ = writeln!(
                html,
                r#"<div class="error">Prediction failed: {}</div>"#,
                escape_html(message)
            );
        }
        None => {}
    }

    html.push_str("</body>\n</html>\n");
    html
}

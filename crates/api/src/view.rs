use storecast_core::domain::contract::PredictionRequest;
use storecast_core::domain::record::{Assortment, StateHoliday, StoreType};

/// What the page says above the form after a submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    None,
    Prediction(i64),
    ModelUnavailable,
    PredictionFailed,
}

/// Field values to re-render the form with. Raw strings so a rejected submit
/// can still show exactly what the user typed.
#[derive(Debug, Clone)]
pub struct FormValues {
    pub storetype: String,
    pub assortment: String,
    pub stateholiday: String,
    pub customers: String,
    pub competitiondistance: String,
    pub promo: String,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            storetype: "a".to_string(),
            assortment: "a".to_string(),
            stateholiday: "0".to_string(),
            customers: "650".to_string(),
            competitiondistance: "450".to_string(),
            promo: "0".to_string(),
        }
    }
}

impl FormValues {
    pub fn from_request(request: &PredictionRequest) -> Self {
        Self {
            storetype: request.storetype.clone(),
            assortment: request.assortment.clone(),
            stateholiday: request.stateholiday.clone(),
            customers: request.customers.clone(),
            competitiondistance: request.competitiondistance.clone(),
            promo: request.promo.clone(),
        }
    }
}

pub fn page(values: &FormValues, banner: Banner, model: Option<(&str, &str)>) -> String {
    let banner_html = match banner {
        Banner::None => String::new(),
        Banner::Prediction(v) => format!(
            r#"<p class="banner success">Predicted store sales: &#8377; {}</p>"#,
            format_sales(v)
        ),
        Banner::ModelUnavailable => {
            r#"<p class="banner error">Model could not be loaded. Please check the model file.</p>"#
                .to_string()
        }
        Banner::PredictionFailed => {
            r#"<p class="banner error">Prediction failed. Please check input values.</p>"#
                .to_string()
        }
    };

    let disabled = if model.is_none() { " disabled" } else { "" };

    let footer = match model {
        Some((name, version)) => format!("Served by {} v{}.", escape(name), escape(version)),
        None => "Model unavailable.".to_string(),
    };

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Store Sales Predictor</title>
<style>
body {{ font-family: sans-serif; max-width: 40rem; margin: 2rem auto; padding: 0 1rem; }}
label {{ display: block; margin: 0.75rem 0 0.25rem; }}
select, input {{ width: 100%; padding: 0.4rem; box-sizing: border-box; }}
button {{ margin-top: 1rem; padding: 0.5rem 1.5rem; }}
.banner {{ padding: 0.75rem; border-radius: 4px; }}
.banner.success {{ background: #e6f4ea; }}
.banner.error {{ background: #fce8e6; }}
footer {{ margin-top: 2rem; color: #666; font-size: 0.85rem; }}
</style>
</head>
<body>
<main>
<h1>Store Sales Prediction</h1>
<p>Predict daily sales for a store based on store conditions.</p>
{banner_html}
<h2>Enter Store Details</h2>
<form method="post" action="/predict">
<label for="storetype">Store Type</label>
<select id="storetype" name="storetype">{storetype_options}</select>
<label for="assortment">Assortment Type</label>
<select id="assortment" name="assortment">{assortment_options}</select>
<label for="stateholiday">State Holiday</label>
<select id="stateholiday" name="stateholiday">{stateholiday_options}</select>
<label for="customers">Number of Customers</label>
<input id="customers" name="customers" type="number" min="0" value="{customers}">
<label for="competitiondistance">Competition Distance (meters)</label>
<input id="competitiondistance" name="competitiondistance" type="number" min="0" value="{competitiondistance}">
<label for="promo">Is Promotion Active?</label>
<select id="promo" name="promo">{promo_options}</select>
<button type="submit"{disabled}>Predict Sales</button>
</form>
<footer>Machine learning project for store sales forecasting. {footer}</footer>
</main>
</body>
</html>
"#,
        storetype_options = options(&StoreType::ALL.map(|v| v.as_str()), &values.storetype),
        assortment_options = options(&Assortment::ALL.map(|v| v.as_str()), &values.assortment),
        stateholiday_options = options(&StateHoliday::ALL.map(|v| v.as_str()), &values.stateholiday),
        promo_options = options(&["0", "1"], &values.promo),
        customers = escape(&values.customers),
        competitiondistance = escape(&values.competitiondistance),
    )
}

fn options(levels: &[&str], selected: &str) -> String {
    let selected = selected.trim();
    let mut out = String::new();
    for level in levels {
        let marker = if *level == selected { " selected" } else { "" };
        out.push_str(&format!(
            r#"<option value="{level}"{marker}>{level}</option>"#
        ));
    }
    out
}

pub fn format_sales(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        grouped.push('-');
    }
    grouped.chars().rev().collect()
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_sales_with_thousands_grouping() {
        assert_eq!(format_sales(0), "0");
        assert_eq!(format_sales(950), "950");
        assert_eq!(format_sales(8642), "8,642");
        assert_eq!(format_sales(1_234_567), "1,234,567");
        assert_eq!(format_sales(-8642), "-8,642");
    }

    #[test]
    fn escapes_html_in_user_supplied_values() {
        assert_eq!(escape(r#"<b>"x"</b>"#), "&lt;b&gt;&quot;x&quot;&lt;/b&gt;");

        let mut values = FormValues::default();
        values.customers = r#""><script>"#.to_string();
        let page = page(&values, Banner::None, Some(("m", "1")));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn marks_the_submitted_option_as_selected() {
        let mut values = FormValues::default();
        values.storetype = "c".to_string();
        let page = page(&values, Banner::None, Some(("m", "1")));
        assert!(page.contains(r#"<option value="c" selected>c</option>"#));
    }

    #[test]
    fn disables_the_button_without_a_model() {
        let page = page(&FormValues::default(), Banner::ModelUnavailable, None);
        assert!(page.contains("<button type=\"submit\" disabled>"));
        assert!(page.contains("Model could not be loaded"));
    }

    #[test]
    fn renders_the_prediction_banner() {
        let page = page(
            &FormValues::default(),
            Banner::Prediction(12345),
            Some(("sales_pipeline", "2026.07.28")),
        );
        assert!(page.contains("Predicted store sales: &#8377; 12,345"));
        assert!(page.contains("Served by sales_pipeline v2026.07.28."));
    }
}

//! The single HTML page: input form, optional result, optional PDF download.
use std::io::Write;

use anyhow::Result;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use stroke_core::types::{PatientForm, FEATURE_LABELS, FEATURE_NAMES};

/// Outcome shown under the form after a prediction.
#[derive(Debug, Clone)]
pub struct PredictionView {
    pub label: String,
    /// Trusted advice markup, embedded as-is.
    pub advice_markup: String,
}

#[derive(Debug, Clone, Default)]
pub struct IndexPage<'a> {
    pub form: Option<&'a PatientForm>,
    pub prediction: Option<PredictionView>,
}

enum Input {
    Select(&'static [(&'static str, &'static str)]),
    Number { step: &'static str, min: &'static str },
}

const YES_NO: &[(&str, &str)] = &[("Yes", "Yes"), ("No", "No")];
const FLAG: &[(&str, &str)] = &[("0", "No"), ("1", "Yes")];

fn input_for(name: &str) -> Input {
    match name {
        "gender" => Input::Select(&[("Male", "Male"), ("Female", "Female")]),
        "age" => Input::Number { step: "1", min: "0" },
        "hypertension" | "heart_disease" => Input::Select(FLAG),
        "ever_married" => Input::Select(YES_NO),
        "work_type" => Input::Select(&[
            ("Private", "Private"),
            ("Self-employed", "Self-employed"),
            ("Govt_job", "Government job"),
            ("children", "Children"),
        ]),
        "residence_type" => Input::Select(&[("Urban", "Urban"), ("Rural", "Rural")]),
        "smoking_status" => Input::Select(&[
            ("never smoked", "Never smoked"),
            ("formerly smoked", "Formerly smoked"),
            ("smokes", "Smokes"),
            ("Unknown", "Unknown"),
        ]),
        _ => Input::Number { step: "0.01", min: "0" },
    }
}

const STYLE: &str = "
body { font-family: Arial, sans-serif; max-width: 720px; margin: 2em auto; padding: 0 1em; }
label { display: block; margin-top: 0.8em; font-weight: bold; }
input, select { width: 100%; padding: 0.4em; }
button { margin-top: 1.2em; padding: 0.6em 1.4em; }
.result { margin-top: 2em; padding: 1em; border: 1px solid #ccc; border-radius: 6px; }
";

pub fn render_index(page: &IndexPage<'_>) -> Result<String> {
    let empty = PatientForm::default();
    let form = page.form.unwrap_or(&empty);
    let mut html = Writer::new_with_indent(Vec::new(), b' ', 2);

    html.write_event(Event::DocType(BytesText::from_escaped("html")))?;
    let mut root = BytesStart::new("html");
    root.push_attribute(("lang", "en"));
    html.write_event(Event::Start(root))?;

    html.write_event(Event::Start(BytesStart::new("head")))?;
    html.write_event(Event::Empty(BytesStart::new("meta").with_attributes([("charset", "utf-8")])))?;
    html.write_event(Event::Empty(
        BytesStart::new("meta")
            .with_attributes([("name", "viewport"), ("content", "width=device-width, initial-scale=1")]),
    ))?;
    write_text_element(&mut html, "title", "Brain Stroke Prediction")?;
    html.write_event(Event::Start(BytesStart::new("style")))?;
    html.write_event(Event::Text(BytesText::from_escaped(STYLE)))?;
    html.write_event(Event::End(BytesEnd::new("style")))?;
    html.write_event(Event::End(BytesEnd::new("head")))?;

    html.write_event(Event::Start(BytesStart::new("body")))?;
    write_text_element(&mut html, "h1", "Brain Stroke Prediction")?;

    html.write_event(Event::Start(
        BytesStart::new("form").with_attributes([("method", "post"), ("action", "/prediction")]),
    ))?;
    for ((name, label), value) in FEATURE_NAMES.iter().zip(FEATURE_LABELS.iter()).zip(form.values()) {
        html.write_event(Event::Start(BytesStart::new("label").with_attributes([("for", *name)])))?;
        html.write_event(Event::Text(BytesText::new(label)))?;
        html.write_event(Event::End(BytesEnd::new("label")))?;
        match input_for(name) {
            Input::Select(options) => write_select(&mut html, name, options, value)?,
            Input::Number { step, min } => {
                let input = BytesStart::new("input").with_attributes([
                    ("type", "number"),
                    ("id", *name),
                    ("name", *name),
                    ("step", step),
                    ("min", min),
                    ("value", value),
                    ("required", "required"),
                ]);
                html.write_event(Event::Empty(input))?;
            }
        }
    }
    write_button(&mut html, "Predict")?;
    html.write_event(Event::End(BytesEnd::new("form")))?;

    if let Some(prediction) = &page.prediction {
        html.write_event(Event::Start(BytesStart::new("div").with_attributes([("class", "result")])))?;
        write_text_element(&mut html, "h2", &format!("Prediction: {}", prediction.label))?;
        html.write_event(Event::Text(BytesText::from_escaped(prediction.advice_markup.as_str())))?;

        html.write_event(Event::Start(
            BytesStart::new("form").with_attributes([("method", "post"), ("action", "/generate_pdf")]),
        ))?;
        for (name, value) in form.named_values() {
            write_hidden(&mut html, name, value)?;
        }
        write_hidden(&mut html, "result", &prediction.label)?;
        write_hidden(&mut html, "diet_plan", &prediction.advice_markup)?;
        write_button(&mut html, "Download PDF")?;
        html.write_event(Event::End(BytesEnd::new("form")))?;
        html.write_event(Event::End(BytesEnd::new("div")))?;
    }

    html.write_event(Event::End(BytesEnd::new("body")))?;
    html.write_event(Event::End(BytesEnd::new("html")))?;
    Ok(String::from_utf8(html.into_inner())?)
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_select<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    options: &[(&str, &str)],
    selected: &str,
) -> Result<()> {
    writer.write_event(Event::Start(
        BytesStart::new("select").with_attributes([("id", name), ("name", name), ("required", "required")]),
    ))?;
    // Keep a submitted value the page does not offer so the form echoes it back.
    if !selected.is_empty() && !options.iter().any(|(value, _)| *value == selected) {
        write_option(writer, selected, selected, true)?;
    }
    for (value, text) in options {
        write_option(writer, value, text, *value == selected)?;
    }
    writer.write_event(Event::End(BytesEnd::new("select")))?;
    Ok(())
}

fn write_option<W: Write>(writer: &mut Writer<W>, value: &str, text: &str, selected: bool) -> Result<()> {
    let mut option = BytesStart::new("option");
    option.push_attribute(("value", value));
    if selected {
        option.push_attribute(("selected", "selected"));
    }
    writer.write_event(Event::Start(option))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new("option")))?;
    Ok(())
}

fn write_hidden<W: Write>(writer: &mut Writer<W>, name: &str, value: &str) -> Result<()> {
    let input = BytesStart::new("input").with_attributes([("type", "hidden"), ("name", name), ("value", value)]);
    writer.write_event(Event::Empty(input))?;
    Ok(())
}

fn write_button<W: Write>(writer: &mut Writer<W>, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("button").with_attributes([("type", "submit")])))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new("button")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PatientForm {
        PatientForm {
            gender: "Male".into(),
            age: "45".into(),
            hypertension: "0".into(),
            heart_disease: "0".into(),
            ever_married: "Yes".into(),
            work_type: "Private".into(),
            residence_type: "Urban".into(),
            avg_glucose_level: "90.0".into(),
            bmi: "22.5".into(),
            smoking_status: "never smoked".into(),
        }
    }

    #[test]
    fn empty_page_has_form_but_no_result() {
        let html = render_index(&IndexPage::default()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("action=\"/prediction\""));
        assert!(!html.contains("/generate_pdf"));
        for name in FEATURE_NAMES {
            assert!(html.contains(&format!("name=\"{name}\"")), "{name}");
        }
    }

    #[test]
    fn submitted_values_are_preselected() {
        let form = sample();
        let html = render_index(&IndexPage { form: Some(&form), prediction: None }).unwrap();
        assert!(html.contains("<option value=\"never smoked\" selected=\"selected\">"));
        assert!(html.contains("<option value=\"Private\" selected=\"selected\">"));
        assert!(html.contains("name=\"bmi\" step=\"0.01\" min=\"0\" value=\"22.5\""));
    }

    #[test]
    fn prediction_adds_advice_and_download_form() {
        let form = sample();
        let view = PredictionView { label: "No Stroke".into(), advice_markup: "<ul><li>Walk</li></ul>".into() };
        let html = render_index(&IndexPage { form: Some(&form), prediction: Some(view) }).unwrap();
        assert!(html.contains("<h2>Prediction: No Stroke</h2>"));
        assert!(html.contains("<ul><li>Walk</li></ul>"));
        assert!(html.contains("action=\"/generate_pdf\""));
        assert!(html.contains("name=\"result\" value=\"No Stroke\""));
        assert!(html.contains("name=\"diet_plan\" value=\"&lt;ul&gt;&lt;li&gt;Walk&lt;/li&gt;&lt;/ul&gt;\""));
        assert!(html.contains("name=\"smoking_status\" value=\"never smoked\""));
    }

    #[test]
    fn user_values_are_escaped() {
        let mut form = sample();
        form.work_type = "<script>\"x\"</script>".into();
        let html = render_index(&IndexPage { form: Some(&form), prediction: None }).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("value=\"&lt;script&gt;&quot;x&quot;&lt;/script&gt;\""));
    }
}

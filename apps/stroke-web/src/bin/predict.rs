use std::env;

use anyhow::{bail, Context};

use stroke_core::assess::Assessor;
use stroke_core::config::Config;
use stroke_core::encoder::FeatureEncoder;
use stroke_core::types::{PatientForm, FEATURE_NAMES};
use stroke_model::get_default_classifier;
use stroke_web::logging::{init_logging, LogConfig};

fn usage() -> String {
    format!("Usage: stroke-predict [--model <path>] [--fake] [--strict] <field>=<value>...\nFields: {}", FEATURE_NAMES.join(", "))
}

fn main() -> anyhow::Result<()> {
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let mut settings = config.settings()?;
    let mut form = PatientForm::default();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() { eprintln!("{}", usage()); std::process::exit(1); }
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--model" => settings.model.path = it.next().with_context(usage)?.clone(),
            "--fake" => settings.model.use_fake = true,
            "--strict" => settings.encoding.strict_categories = true,
            "-h" | "--help" => { println!("{}", usage()); return Ok(()); }
            pair => {
                let Some((name, value)) = pair.split_once('=') else { bail!("Expected <field>=<value>, got {pair:?}\n{}", usage()) };
                let Some(slot) = form.field_mut(name) else { bail!("Unknown field {name:?}\n{}", usage()) };
                *slot = value.to_string();
            }
        }
    }

    init_logging(&LogConfig::from_settings(&settings.logging))?;

    let base = env::current_dir()?;
    let classifier = get_default_classifier(&settings.model, &base)?;
    let assessor = Assessor::new(FeatureEncoder::new(settings.encoding.strict_categories), classifier);
    let assessment = assessor.assess(&form.parse()?)?;

    println!("features: {:?}", assessment.vector.as_slice());
    for unknown in &assessment.unknown {
        println!("unknown:  {} = {:?} (encoded as 0)", unknown.field, unknown.label);
    }
    println!("score:    {:.6}", assessment.score);
    println!("outcome:  {}", assessment.recommendation.outcome);
    Ok(())
}

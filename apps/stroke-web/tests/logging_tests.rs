use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

use stroke_core::config::LogFormat;
use stroke_core::encoder::FeatureEncoder;
use stroke_core::types::PatientForm;
use stroke_web::logging::{init_logging_with_writer, LogConfig};

#[derive(Clone, Default)]
struct CapturedLog {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLog {
    fn contents(&self) -> String { String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned() }
}

struct CapturedLogGuard {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl Write for CapturedLogGuard {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().map_err(|_| io::Error::other("log buffer lock poisoned"))?.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> { Ok(()) }
}

impl<'a> MakeWriter<'a> for CapturedLog {
    type Writer = CapturedLogGuard;

    fn make_writer(&'a self) -> Self::Writer { CapturedLogGuard { buf: Arc::clone(&self.buf) } }
}

// Only test in this binary: the subscriber is process-global.
#[test]
fn unknown_category_warning_names_the_field_but_not_the_value() {
    let log = CapturedLog::default();
    let config = LogConfig { level: "info".into(), format: LogFormat::Compact, with_ansi: false, with_target: false, log_data: false };
    init_logging_with_writer(&config, log.clone()).expect("install subscriber");

    let form = PatientForm {
        gender: "Male".into(),
        age: "45".into(),
        hypertension: "0".into(),
        heart_disease: "0".into(),
        ever_married: "Yes".into(),
        work_type: "Astronaut".into(),
        residence_type: "Urban".into(),
        avg_glucose_level: "90.0".into(),
        bmi: "22.5".into(),
        smoking_status: "never smoked".into(),
    };
    let encoded = FeatureEncoder::default().encode(&form.parse().unwrap()).unwrap();
    assert_eq!(encoded.unknown.len(), 1);

    let output = log.contents();
    assert!(output.contains("WARN"), "{output}");
    assert!(output.contains("unknown category label"), "{output}");
    assert!(output.contains("work_type"), "{output}");
    assert!(!output.contains("Astronaut"), "{output}");
}

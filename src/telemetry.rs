use prometheus::{CounterVec, Encoder, Opts, Registry, TextEncoder};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_tracing() {
    let mut fmt_layer = fmt::layer();
    if std::env::var("INCLUDE_SPAN_EVENTS").is_ok_and(|value| value.eq_ignore_ascii_case("true")) {
        fmt_layer = fmt_layer.with_span_events(FmtSpan::ENTER | FmtSpan::EXIT);
    }
    let filter_layer =
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

/// Counters exposed on `/metrics`, registered in a registry owned by the app.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub quiz_questions_served: CounterVec,
    pub question_mutations: CounterVec,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        let quiz_questions_served = CounterVec::new(
            Opts::new(
                "trivia_quiz_questions_served_total",
                "Number of quiz questions handed out",
            ),
            &["category"],
        )?;
        let question_mutations = CounterVec::new(
            Opts::new(
                "trivia_question_mutations_total",
                "Number of questions created or deleted",
            ),
            &["operation"],
        )?;
        registry.register(Box::new(quiz_questions_served.clone()))?;
        registry.register(Box::new(question_mutations.clone()))?;

        Ok(Self {
            registry,
            quiz_questions_served,
            question_mutations,
        })
    }

    /// Text exposition format, with its content type.
    pub fn encode(&self) -> prometheus::Result<(String, Vec<u8>)> {
        let encoder = TextEncoder::new();
        let mut buf = vec![];
        encoder.encode(&self.registry.gather(), &mut buf)?;
        Ok((encoder.format_type().to_owned(), buf))
    }
}

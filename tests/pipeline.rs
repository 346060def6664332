use async_trait::async_trait;
use sentiview::error::{PipelineError, TranslateError};
use sentiview::pipeline::{InputText, Pipeline, PipelineEvent, PipelineMessage, SubmissionId};
use sentiview::sentiment::{PolarityScores, SentimentLabel, SentimentScorer, VaderScorer};
use sentiview::translate::{IdentityTranslator, Translation, Translator};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

/// Pretends to translate Spanish by looking words up in a tiny table.
struct DictionaryTranslator {
    delay: Duration,
    running: AtomicUsize,
    peak: AtomicUsize,
}

impl DictionaryTranslator {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            running: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Translator for DictionaryTranslator {
    async fn translate(&self, text: &str) -> Result<Translation, TranslateError> {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.running.fetch_sub(1, Ordering::SeqCst);

        let translated = text
            .split_whitespace()
            .map(|word| match word {
                "me" => "I",
                "encanta" => "love",
                "odio" => "hate",
                "esto" => "this",
                other => other,
            })
            .collect::<Vec<_>>()
            .join(" ");

        Ok(Translation {
            text: translated,
            detected_language: Some("es".to_string()),
        })
    }

    fn name(&self) -> &str {
        "dictionary"
    }
}

struct UnavailableTranslator;

#[async_trait]
impl Translator for UnavailableTranslator {
    async fn translate(&self, _text: &str) -> Result<Translation, TranslateError> {
        Err(TranslateError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

struct CrashingTranslator;

#[async_trait]
impl Translator for CrashingTranslator {
    async fn translate(&self, _text: &str) -> Result<Translation, TranslateError> {
        panic!("translator blew up");
    }

    fn name(&self) -> &str {
        "crashing"
    }
}

struct HungTranslator;

#[async_trait]
impl Translator for HungTranslator {
    async fn translate(&self, _text: &str) -> Result<Translation, TranslateError> {
        std::future::pending().await
    }

    fn name(&self) -> &str {
        "hung"
    }
}

struct CrashingScorer;

impl SentimentScorer for CrashingScorer {
    fn polarity_scores(&self, _text: &str) -> PolarityScores {
        panic!("lexicon corrupted");
    }
}

fn input(text: &str) -> InputText {
    InputText::parse(text).expect("non-empty input")
}

/// Collect messages until every submission has produced a terminal event.
async fn collect(
    rx: &mut UnboundedReceiver<PipelineMessage>,
    submissions: usize,
) -> HashMap<SubmissionId, Vec<PipelineEvent>> {
    let mut events: HashMap<SubmissionId, Vec<PipelineEvent>> = HashMap::new();
    let mut terminal = 0;
    while terminal < submissions {
        let message = tokio::time::timeout(Duration::from_secs(10), rx.recv())
            .await
            .expect("pipeline stalled")
            .expect("channel closed");
        if message.event.is_terminal() {
            terminal += 1;
        }
        events.entry(message.submission).or_default().push(message.event);
    }
    events
}

#[tokio::test]
async fn translates_then_scores() {
    let (mut pipeline, mut rx) = Pipeline::new(
        Arc::new(DictionaryTranslator::new(Duration::from_millis(5))),
        Arc::new(VaderScorer::new()),
        4,
    );

    let id = pipeline.submit(input("me encanta esto"));
    let events = collect(&mut rx, 1).await.remove(&id).unwrap();

    assert_eq!(events.len(), 2);
    match &events[0] {
        PipelineEvent::Translated(translation) => {
            assert_eq!(translation.text, "I love this");
            assert_eq!(translation.detected_language.as_deref(), Some("es"));
        }
        other => panic!("expected translation first, got {:?}", other),
    }
    match &events[1] {
        PipelineEvent::Resolved(analysis) => {
            assert_eq!(analysis.input, "me encanta esto");
            assert_eq!(analysis.label, SentimentLabel::Positive);
            assert!(analysis.scores.compound > 0.0);
        }
        other => panic!("expected resolution, got {:?}", other),
    }
}

#[tokio::test]
async fn identity_translation_of_english() {
    let (mut pipeline, mut rx) = Pipeline::new(
        Arc::new(IdentityTranslator),
        Arc::new(VaderScorer::new()),
        4,
    );

    let love = pipeline.submit(input("I love this"));
    let hate = pipeline.submit(input("I hate this"));
    let table = pipeline.submit(input("the table"));
    let mut events = collect(&mut rx, 3).await;

    let label_of = |events: &mut HashMap<SubmissionId, Vec<PipelineEvent>>, id| {
        match events.remove(&id).unwrap().pop().unwrap() {
            PipelineEvent::Resolved(analysis) => analysis.label,
            other => panic!("expected resolution, got {:?}", other),
        }
    };
    assert_eq!(label_of(&mut events, love), SentimentLabel::Positive);
    assert_eq!(label_of(&mut events, hate), SentimentLabel::Negative);
    assert_eq!(label_of(&mut events, table), SentimentLabel::Neutral);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn every_submission_terminates_exactly_once() {
    let translator = Arc::new(DictionaryTranslator::new(Duration::from_millis(10)));
    let (mut pipeline, mut rx) = Pipeline::new(
        translator.clone(),
        Arc::new(VaderScorer::new()),
        3,
    );

    let ids: Vec<SubmissionId> = (0..12)
        .map(|i| pipeline.submit(input(&format!("odio esto {}", i))))
        .collect();
    let events = collect(&mut rx, ids.len()).await;

    assert_eq!(events.len(), ids.len());
    for id in &ids {
        let events = &events[id];
        let terminal = events.iter().filter(|e| e.is_terminal()).count();
        assert_eq!(terminal, 1, "submission {} terminated {} times", id, terminal);
        assert!(matches!(events[0], PipelineEvent::Translated(_)));
        assert!(matches!(events.last(), Some(PipelineEvent::Resolved(_))));
    }

    assert!(translator.peak.load(Ordering::SeqCst) <= 3);
    assert_eq!(pipeline.shutdown(Duration::from_secs(1)).await, 0);
    assert_eq!(pipeline.in_flight(), 0);
}

#[tokio::test]
async fn translation_failure_is_reported() {
    let (mut pipeline, mut rx) = Pipeline::new(
        Arc::new(UnavailableTranslator),
        Arc::new(VaderScorer::new()),
        4,
    );

    let id = pipeline.submit(input("hola"));
    let events = collect(&mut rx, 1).await.remove(&id).unwrap();

    assert_eq!(events.len(), 1);
    match &events[0] {
        PipelineEvent::Failed(error) => {
            assert!(matches!(
                error,
                PipelineError::Translation(TranslateError::Status(_))
            ));
            assert_eq!(error.title(), "Translation unavailable");
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn translator_panic_is_reported() {
    let (mut pipeline, mut rx) = Pipeline::new(
        Arc::new(CrashingTranslator),
        Arc::new(VaderScorer::new()),
        1,
    );

    // Two in a row: the single worker must be released after the first crash
    for _ in 0..2 {
        let id = pipeline.submit(input("hola"));
        let events = collect(&mut rx, 1).await.remove(&id).unwrap();
        assert_eq!(events.len(), 1);
        match &events[0] {
            PipelineEvent::Failed(PipelineError::Translation(TranslateError::Crashed(message))) => {
                assert_eq!(message, "translator blew up");
            }
            other => panic!("expected crash report, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn scorer_panic_is_reported() {
    let (mut pipeline, mut rx) = Pipeline::new(
        Arc::new(IdentityTranslator),
        Arc::new(CrashingScorer),
        2,
    );

    let id = pipeline.submit(input("I love this"));
    let events = collect(&mut rx, 1).await.remove(&id).unwrap();

    assert!(matches!(events[0], PipelineEvent::Translated(_)));
    match &events[1] {
        PipelineEvent::Failed(error @ PipelineError::Analysis(message)) => {
            assert!(message.contains("lexicon corrupted"));
            assert_eq!(error.title(), "Analysis failed");
        }
        other => panic!("expected analysis failure, got {:?}", other),
    }
}

#[tokio::test]
async fn shutdown_cancels_hung_translation() {
    let (mut pipeline, mut rx) = Pipeline::new(
        Arc::new(HungTranslator),
        Arc::new(VaderScorer::new()),
        2,
    );

    pipeline.submit(input("hola"));
    assert_eq!(pipeline.in_flight(), 1);

    assert_eq!(pipeline.shutdown(Duration::from_millis(20)).await, 1);
    assert_eq!(pipeline.in_flight(), 0);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn submission_ids_increase() {
    let (mut pipeline, mut rx) = Pipeline::new(
        Arc::new(IdentityTranslator),
        Arc::new(VaderScorer::new()),
        2,
    );

    let first = pipeline.submit(input("one"));
    let second = pipeline.submit(input("two"));
    assert!(second > first);
    collect(&mut rx, 2).await;
}

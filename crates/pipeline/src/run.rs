//! Pipeline orchestration.
//!
//! One run: fetch and chunk the document, build one index, then answer every
//! question concurrently against the shared read-only retriever. Results come
//! back in input order regardless of completion order. Ingestion and
//! index-build failures abort the run; a failure inside one question's task
//! degrades that question to a fallback answer and leaves its siblings alone.

use crate::decision::evaluate;
use crate::generator::AnswerGenerator;
use crate::types::{Citation, QuestionResult};
use std::sync::Arc;
use std::time::Duration;
use verdict_core::{AppConfig, AppResult};
use verdict_retrieval::{fetch_and_parse, ChunkConfig, ParsedDocument, Retriever, RetrievalResult};

/// The retrieval-and-decision pipeline.
pub struct Pipeline {
    config: AppConfig,
    generator: AnswerGenerator,
}

impl Pipeline {
    /// Build a pipeline from configuration.
    ///
    /// Backend selection happens here: an unusable vector or embedding
    /// configuration fails now, and missing generator credentials select the
    /// fallback mode for the lifetime of the pipeline.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        config.validate()?;

        let client = verdict_llm::create_client(&config.generator)?;
        let generator = AnswerGenerator::new(client);

        tracing::info!(
            generator_configured = generator.is_configured(),
            vector_backend = config.index.backend.as_str(),
            "Pipeline ready"
        );

        Ok(Self { config, generator })
    }

    #[cfg(test)]
    fn with_generator(config: AppConfig, generator: AnswerGenerator) -> Self {
        Self { config, generator }
    }

    /// Answer all questions about the document at `document_url`.
    ///
    /// Returns exactly one result per question, in input order.
    pub async fn run(
        &self,
        document_url: &str,
        questions: &[String],
    ) -> AppResult<Vec<QuestionResult>> {
        let document = fetch_and_parse(
            document_url,
            Duration::from_secs(self.config.fetch_timeout_secs),
            &ChunkConfig::default(),
        )
        .await?;

        tracing::info!(
            url = document_url,
            chunks = document.len(),
            questions = questions.len(),
            "Document ingested"
        );

        self.answer_questions(document, questions).await
    }

    /// Index an already-parsed document and answer all questions.
    pub async fn answer_questions(
        &self,
        document: ParsedDocument,
        questions: &[String],
    ) -> AppResult<Vec<QuestionResult>> {
        // Sequential prerequisite: the index must be complete before the
        // first search, including any batched remote upserts.
        let mut retriever = Retriever::from_config(&self.config)?;
        retriever.build(document.into_chunks()).await?;
        let retriever = Arc::new(retriever);

        // Fan out one task per question; join_all preserves input order.
        let tasks = questions
            .iter()
            .map(|question| self.answer_one(Arc::clone(&retriever), question));
        let results = futures::future::join_all(tasks).await;

        debug_assert_eq!(results.len(), questions.len());
        Ok(results)
    }

    /// Answer a single question. Infallible by contract: any error inside
    /// this task degrades to a best-effort result so the caller always gets
    /// one result per question.
    async fn answer_one(&self, retriever: Arc<Retriever>, question: &str) -> QuestionResult {
        let retrieved: Vec<RetrievalResult> =
            match retriever.search(question, self.config.top_k).await {
                Ok(results) => results,
                Err(error) => {
                    tracing::warn!(question, %error, "Retrieval failed; answering without evidence");
                    Vec::new()
                }
            };

        let generated = match self.generator.generate(question, &retrieved).await {
            Ok(generated) => generated,
            Err(error) => {
                tracing::warn!(question, %error, "Generation failed; using fallback answer");
                self.generator.fallback(&retrieved)
            }
        };

        let decision = evaluate(question, &generated.answer, &retrieved, generated.decision);

        QuestionResult {
            question: question.to_string(),
            answer: generated.answer,
            rationale: generated.rationale,
            citations: retrieved.iter().map(Citation::from_retrieval).collect(),
            decision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Decision;
    use verdict_core::config::VectorBackend;
    use verdict_core::AppError;

    fn local_pipeline() -> Pipeline {
        // Defaults: hashed embeddings, flat store, no generator credentials.
        Pipeline::new(AppConfig::default()).unwrap()
    }

    fn document(texts: &[&str]) -> ParsedDocument {
        ParsedDocument::unpaginated(texts.iter().map(|t| t.to_string()).collect())
    }

    #[tokio::test]
    async fn test_one_result_per_question_in_input_order() {
        let pipeline = local_pipeline();
        let doc = document(&[
            "Dental treatment is covered.",
            "Cosmetic surgery is excluded.",
            "Premiums are due on the first of the month.",
        ]);

        let questions = vec![
            "Is dental treatment covered?".to_string(),
            "Is cosmetic surgery covered?".to_string(),
            "When are premiums due?".to_string(),
        ];

        let results = pipeline.answer_questions(doc, &questions).await.unwrap();

        assert_eq!(results.len(), 3);
        for (result, question) in results.iter().zip(&questions) {
            assert_eq!(&result.question, question);
        }
    }

    #[tokio::test]
    async fn test_waiting_period_resolves_to_needs_more_info() {
        let pipeline = local_pipeline();
        let doc = document(&["Dental treatment is covered after a 6-month waiting period."]);

        let results = pipeline
            .answer_questions(doc, &["Is dental treatment covered?".to_string()])
            .await
            .unwrap();

        assert_eq!(results[0].decision, Decision::NeedsMoreInfo);
        assert!(results[0].answer.contains("covered"));
        assert!(!results[0].citations.is_empty());
    }

    #[tokio::test]
    async fn test_empty_document_reports_no_information() {
        let pipeline = local_pipeline();

        let results = pipeline
            .answer_questions(ParsedDocument::default(), &["Anything?".to_string()])
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].answer,
            "No information found in the document for this query."
        );
        assert_eq!(results[0].decision, Decision::NeedsMoreInfo);
        assert!(results[0].citations.is_empty());
    }

    #[tokio::test]
    async fn test_citations_are_truncated() {
        let pipeline = local_pipeline();
        let long_clause = format!("Hospitalization expenses are payable. {}", "x".repeat(900));
        let doc = document(&[long_clause.as_str()]);

        let results = pipeline
            .answer_questions(doc, &["Are hospitalization expenses payable?".to_string()])
            .await
            .unwrap();

        for citation in &results[0].citations {
            assert!(citation.text.chars().count() <= 500);
        }
    }

    #[tokio::test]
    async fn test_retrieval_caps_at_top_k() {
        let mut config = AppConfig::default();
        config.top_k = 2;
        let pipeline = Pipeline::new(config).unwrap();

        let texts: Vec<String> = (0..10).map(|i| format!("Clause {} applies.", i)).collect();
        let doc = ParsedDocument::unpaginated(texts);

        let results = pipeline
            .answer_questions(doc, &["What applies?".to_string()])
            .await
            .unwrap();

        assert_eq!(results[0].citations.len(), 2);
    }

    #[tokio::test]
    async fn test_neighbor_backend_runs_end_to_end() {
        let mut config = AppConfig::default();
        config.index.backend = VectorBackend::Neighbor;
        let pipeline = Pipeline::new(config).unwrap();

        let doc = document(&["Maternity benefits are included after two years."]);
        let results = pipeline
            .answer_questions(doc, &["Are maternity benefits included?".to_string()])
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert!(!results[0].citations.is_empty());
    }

    #[tokio::test]
    async fn test_failed_generation_degrades_without_dropping_questions() {
        struct FailingClient;

        #[async_trait::async_trait]
        impl verdict_llm::LlmClient for FailingClient {
            fn provider_name(&self) -> &str {
                "failing"
            }

            async fn complete(
                &self,
                _request: &verdict_llm::LlmRequest,
            ) -> AppResult<verdict_llm::LlmResponse> {
                Err(AppError::Generation("backend unavailable".to_string()))
            }
        }

        let generator = AnswerGenerator::new(Some(Arc::new(FailingClient)));
        let pipeline = Pipeline::with_generator(AppConfig::default(), generator);

        let doc = document(&["Dental treatment is covered.", "Day care is excluded."]);
        let questions = vec![
            "Is dental covered?".to_string(),
            "Is day care covered?".to_string(),
        ];

        let results = pipeline.answer_questions(doc, &questions).await.unwrap();

        // Every question still gets a result, in order, with the fallback
        // answer and a conservative decision.
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].question, questions[0]);
        assert_eq!(results[1].question, questions[1]);
        for result in &results {
            assert!(!result.answer.is_empty());
            assert_eq!(result.decision, Decision::NeedsMoreInfo);
        }
    }

    #[tokio::test]
    async fn test_remote_backend_without_settings_fails_fast() {
        let mut config = AppConfig::default();
        config.index.backend = VectorBackend::Remote;

        assert!(matches!(
            Pipeline::new(config),
            Err(AppError::Config(_))
        ));
    }
}

//! Query orchestration.
//!
//! Every question goes through the same ordered checks:
//!
//! ```text
//! safety gate ──blocked──▶ fixed referral message
//!     │
//! interaction pair? ──yes──▶ interaction analysis
//!     │
//! several drugs? ──yes──▶ per-drug answers (dosage / retrieval), merged
//!     │
//! dosage question? ──yes──▶ dosage guidance
//!     │
//! retrieval ─miss─▶ fetch + retry ─miss─▶ "not found" with suggestions
//!     │
//! generate ─▶ translate ─▶ answer
//! ```
//!
//! Collaborator failures never escape [`MedExplainRag::query`]; they come
//! back as Low-confidence answers carrying the error text.

mod retrieval;

pub use retrieval::*;

use medexplain_llm::{build_answer_prompt, clean_completion, CompletionError, TextGenerator};
use thiserror::Error;

use crate::config::PipelineConfig;
use crate::conversation::{ConversationContext, SmartInteractionDetector};
use crate::dosage::DosageAdvisor;
use crate::interaction::InteractionAnalyzer;
use crate::models::{Confidence, DrugOverview, QueryResponse, SafetyVerdict, SearchHit, Source};
use crate::multi_drug::{DrugAnswer, MultiDrugParser};
use crate::resolver::{fuzzy_match, DrugNameNormalizer};
use crate::safety::{SafetyDisclaimer, SafetyFilter};
use crate::store::{DrugFetcher, FetchError, StoreError, VectorStore};
use crate::translator::PlainEnglishTranslator;

pub const INTERACTION_DISCLAIMER: &str = "This interaction analysis is based on general medical knowledge and drug classification patterns. Individual responses may vary.";

const INTERACTION_REMINDER: &str = "🏥 **Remember:** Always inform your doctor and pharmacist about all medications you're taking, including over-the-counter drugs and supplements.";

/// Cutoff for fuzzy drug suggestions when no name contains the input.
const SUGGEST_CUTOFF: f64 = 0.6;

/// Pipeline errors.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Routes questions to the right component and assembles answers.
pub struct MedExplainRag<'a> {
    store: &'a dyn VectorStore,
    generator: &'a dyn TextGenerator,
    fetcher: Option<&'a dyn DrugFetcher>,
    translator: PlainEnglishTranslator<'a>,
    config: PipelineConfig,
    safety: SafetyFilter,
    disclaimers: SafetyDisclaimer,
    normalizer: DrugNameNormalizer,
    detector: SmartInteractionDetector,
    dosage: DosageAdvisor,
    multi_drug: MultiDrugParser,
    interactions: InteractionAnalyzer,
}

impl<'a> MedExplainRag<'a> {
    pub fn new(store: &'a dyn VectorStore, generator: &'a dyn TextGenerator) -> Self {
        Self {
            store,
            generator,
            fetcher: None,
            translator: PlainEnglishTranslator::new(),
            config: PipelineConfig::default(),
            safety: SafetyFilter::new(),
            disclaimers: SafetyDisclaimer,
            normalizer: DrugNameNormalizer::new(),
            detector: SmartInteractionDetector::new(),
            dosage: DosageAdvisor::new(),
            multi_drug: MultiDrugParser::new(),
            interactions: InteractionAnalyzer::new(),
        }
    }

    /// Fetch unknown drugs on demand and index them before retrying.
    pub fn with_fetcher(mut self, fetcher: &'a dyn DrugFetcher) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Let the translator ask this generator for full plain-English rewrites.
    pub fn with_translation_generator(mut self, generator: &'a dyn TextGenerator) -> Self {
        self.translator = PlainEnglishTranslator::with_generator(generator);
        self
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        let normalizer = DrugNameNormalizer::new().with_suggestion_limit(config.suggestion_limit);
        self.dosage = DosageAdvisor::with_normalizer(normalizer.clone());
        self.multi_drug = MultiDrugParser::with_normalizer(normalizer.clone());
        self.normalizer = normalizer;
        self.config = config;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// A context sized by this pipeline's configuration.
    pub fn new_context(&self) -> ConversationContext {
        ConversationContext::with_limits(self.config.context_timeout_secs, self.config.context_capacity)
    }

    /// Answer one question. Never fails.
    pub fn query(
        &self,
        question: &str,
        include_safety_check: bool,
        context: &mut ConversationContext,
    ) -> QueryResponse {
        if include_safety_check {
            let verdict = self.safety.check(question);
            if !verdict.is_safe {
                return self.blocked_response(question, verdict);
            }
        }

        if let Some((drug1, drug2)) = self.detector.detect(question, context, true) {
            tracing::info!(%drug1, %drug2, "interaction question");
            return self.interaction_response(&drug1, &drug2, question);
        }

        if self.multi_drug.is_multi_drug(question) {
            tracing::info!("multi-drug question");
            return self.multi_drug_response(question, context);
        }

        self.answer_single(question, context)
    }

    /// Every stored section for one drug.
    pub fn get_drug_overview(&self, drug_name: &str) -> crate::Result<DrugOverview> {
        let docs = self.store.get_by_drug_name(drug_name)?;
        let Some(first) = docs.first() else {
            return Ok(DrugOverview::not_found(drug_name));
        };

        let meta = first.metadata.clone();
        let sections = docs
            .into_iter()
            .map(|doc| (doc.metadata.section.as_str().to_string(), doc.content))
            .collect();

        Ok(DrugOverview {
            drug_name: drug_name.to_string(),
            found: true,
            generic_name: Some(meta.generic_name).filter(|g| !g.is_empty()),
            brand_names: meta.brand_names,
            sections,
            source_url: meta.source_url,
            last_updated: meta.last_updated,
            disclaimer: Some(self.disclaimers.general().to_string()),
            message: None,
        })
    }

    /// Stored drug names containing `partial`, or close to it when none do.
    pub fn suggest_drugs(&self, partial: &str, limit: usize) -> crate::Result<Vec<String>> {
        let wanted = partial.trim().to_lowercase();
        if wanted.is_empty() {
            return Ok(Vec::new());
        }
        let all = self.store.list_all_drugs()?;

        let containing: Vec<String> = all
            .iter()
            .filter(|drug| drug.to_lowercase().contains(&wanted))
            .take(limit)
            .cloned()
            .collect();
        if !containing.is_empty() {
            return Ok(containing);
        }

        let mut scored: Vec<(f64, &String)> = all
            .iter()
            .map(|drug| (fuzzy_match(&wanted, &drug.to_lowercase()), drug))
            .filter(|(score, _)| *score >= SUGGEST_CUTOFF)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(_, drug)| drug.clone())
            .collect())
    }

    /// Dosage guidance or retrieval, for a question about one drug.
    fn answer_single(&self, question: &str, context: &mut ConversationContext) -> QueryResponse {
        if self.dosage.is_dosage_query(question) {
            tracing::info!("dosage question");
            return self.dosage.handle_dosage_query(question, Some(&self.translator));
        }

        match self.retrieve_and_generate(question, context) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "failed to answer question");
                self.error_response(question, &e)
            }
        }
    }

    fn retrieve_and_generate(
        &self,
        question: &str,
        context: &mut ConversationContext,
    ) -> PipelineResult<QueryResponse> {
        let extracted = self.normalizer.extract_and_normalize(question);

        let mut hits = self.relevant_hits(question, &extracted.name)?;
        if hits.is_empty() {
            if !extracted.is_found() {
                tracing::info!("no relevant documents and no drug recognised");
                return self.not_found_response(question, &[]);
            }
            if !self.fetch_on_demand(&extracted.name) {
                return self.not_found_response(question, &extracted.suggestions);
            }
            hits = self.relevant_hits(question, &extracted.name)?;
            if hits.is_empty() {
                tracing::info!(drug = %extracted.name, "still no relevant documents after fetch");
                return self.not_found_response(question, &extracted.suggestions);
            }
        }

        let context_text = build_context(&hits, self.config.max_document_chars);
        let prompt = build_answer_prompt(&context_text, question);
        let raw = self.generator.complete(&prompt)?;
        let answer = self.translator.translate(&clean_completion(&raw)?);

        if extracted.is_found() {
            context.add_mention(&extracted.name);
        }

        let sources = sources_from_hits(&hits);
        let confidence = confidence_for(sources.len(), context_text.chars().count());
        let kind = self.safety.classify(question);

        Ok(
            QueryResponse::new(answer, confidence, self.disclaimers.disclaimer_for(kind), question)
                .with_sources(sources),
        )
    }

    fn relevant_hits(&self, question: &str, drug: &str) -> PipelineResult<Vec<SearchHit>> {
        let hits = self.store.search(question, self.config.search_results)?;
        let best = hits
            .first()
            .map(|h| (h.document.metadata.drug_name.clone(), h.distance));
        let relevant = filter_relevant(hits, drug, &self.config);

        if relevant.is_empty() {
            let drug = if drug.is_empty() { "unknown" } else { drug };
            tracing::info!(%drug, best_match = ?best, "no relevant documents");
        }
        Ok(relevant)
    }

    /// Fetch and index a drug missing from the store. Failures are logged
    /// and reported as `false`.
    fn fetch_on_demand(&self, drug: &str) -> bool {
        let Some(fetcher) = self.fetcher else {
            return false;
        };

        tracing::info!(%drug, "fetching drug on demand");
        match fetcher.fetch_drug_info(drug) {
            Ok(Some(record)) => match self.store.add(&record) {
                Ok(added) => {
                    if !added {
                        tracing::warn!(%drug, "fetched record had nothing to index");
                    }
                    added
                }
                Err(e) => {
                    tracing::warn!(%drug, error = %e, "failed to index fetched drug");
                    false
                }
            },
            Ok(None) => {
                tracing::info!(%drug, "no data found for drug");
                false
            }
            Err(e) => {
                tracing::warn!(%drug, error = %e, "drug fetch failed");
                false
            }
        }
    }

    fn multi_drug_response(&self, question: &str, context: &mut ConversationContext) -> QueryResponse {
        let mut drugs = self.multi_drug.extract_drug_list(question);
        if drugs.is_empty() {
            return self
                .not_found_response(question, &[])
                .unwrap_or_else(|e| self.error_response(question, &e));
        }
        if drugs.len() > self.config.max_multi_drug {
            tracing::warn!(
                requested = drugs.len(),
                limit = self.config.max_multi_drug,
                "too many drugs, answering the first ones only"
            );
            drugs.truncate(self.config.max_multi_drug);
        }

        let queries = self.multi_drug.create_individual_queries(&drugs, question);
        let answers: Vec<DrugAnswer> = drugs
            .into_iter()
            .zip(queries)
            .enumerate()
            .map(|(i, (drug, sub_question))| {
                tracing::debug!(index = i + 1, %drug, "answering sub-question");
                DrugAnswer {
                    response: self.answer_single(&sub_question, context),
                    drug_name: drug,
                }
            })
            .collect();

        self.multi_drug.format_combined_response(&answers, question)
    }

    fn interaction_response(&self, drug1: &str, drug2: &str, question: &str) -> QueryResponse {
        let result = self.interactions.analyze(drug1, drug2);

        let mut body = result.description.clone();
        if !result.advice.is_empty() {
            body.push_str(&format!("\n\n💡 **Practical advice:** {}", result.advice));
        }
        body.push_str("\n\n");
        body.push_str(INTERACTION_REMINDER);

        QueryResponse::new(
            self.translator.translate(&body),
            result.confidence,
            INTERACTION_DISCLAIMER,
            question,
        )
        .with_warning(result.severity.needs_warning())
        .with_sources(vec![
            Source::new(drug1, "Drug Interaction Analysis").with_url("Clinical Database"),
            Source::new(drug2, "Drug Interaction Analysis").with_url("Clinical Database"),
        ])
    }

    fn blocked_response(&self, question: &str, verdict: SafetyVerdict) -> QueryResponse {
        QueryResponse::new(
            verdict.message,
            Confidence::NotApplicable,
            self.disclaimers.emergency(),
            question,
        )
        .with_warning(true)
    }

    fn not_found_response(&self, question: &str, suggestions: &[String]) -> PipelineResult<QueryResponse> {
        let all = self.store.list_all_drugs()?;
        let listed = self.config.known_drugs_listed;

        let mut message = String::from(
            "I don't have information about this specific medication in my current database. ",
        );

        if !suggestions.is_empty() {
            message.push_str("\n\n🤔 **Did you mean one of these?**\n");
            for (i, suggestion) in suggestions
                .iter()
                .take(self.config.suggestion_limit)
                .enumerate()
            {
                message.push_str(&format!("{}. {}\n", i + 1, suggestion));
            }
            message.push_str("\nYou can ask about any of these instead.");
        }

        if all.is_empty() {
            message.push_str("\n\nPlease consult your healthcare provider or pharmacist for accurate information about this medication.");
        } else {
            let shown: Vec<&str> = all.iter().take(listed).map(String::as_str).collect();
            message.push_str(&format!(
                "\n\n📋 **I currently have information about these medications:**\n{}.",
                shown.join(", ")
            ));
            if all.len() > listed {
                message.push_str(&format!("\n(and {} more...)", all.len() - listed));
            }
            message.push_str("\n\nYou can ask about any of these, or contact your healthcare provider for information about other medications.");
        }

        Ok(QueryResponse::new(
            message,
            Confidence::Low,
            self.disclaimers.general(),
            question,
        ))
    }

    fn error_response(&self, question: &str, error: &PipelineError) -> QueryResponse {
        let mut response = QueryResponse::new(
            format!(
                "I apologize, but I encountered an error processing your question: {}",
                error
            ),
            Confidence::Low,
            self.disclaimers.general(),
            question,
        );
        response.error = Some(error.to_string());
        response
    }
}

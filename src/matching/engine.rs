//! Matching engine: dimension scorers and the score aggregator
//!
//! The engine owns an [`EmbeddingProvider`] and a [`MatchConfig`] and is
//! otherwise stateless: identical inputs plus identical provider responses
//! yield identical reports. Every embedding request is issued fresh; there
//! is no cross-call caching or deduplication.

use crate::config::MatchConfig;
use crate::embedding::{cosine, validate_response, EmbeddingProvider};
use crate::error::Result;
use crate::matching::dates::calculate_experience_years;
use crate::matching::degree::{extract_field, extract_highest_degree_level};
use crate::matching::experience::{calculate_experience_match, extract_years_from_sentence};
use crate::matching::location::calculate_location_match;
use crate::matching::skills::calculate_weighted_skills_match;
use crate::matching::status::{
    calculate_match_status, generate_match_summary, SummaryInputs,
};
use crate::models::{
    Candidate, Education, Experience, JobDescription, MatchDetails, MatchReport, Qualifications,
    Skill, SkillCategories, SkillPresence, SkillsMatchType,
};
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

const REQUIRED_YEARS_QUERY: &str = "How many years of experience are required?";

/// Round a score to four decimals for reporting.
fn round4(value: f32) -> f32 {
    (value * 10_000.0).round() / 10_000.0
}

pub struct MatchEngine {
    provider: Arc<dyn EmbeddingProvider>,
    config: MatchConfig,
}

impl MatchEngine {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, config: MatchConfig) -> Self {
        Self { provider, config }
    }

    /// Batch embed with the per-input count enforced, so a misbehaving
    /// provider fails the match as a provider error rather than leaving the
    /// scorers to index past the end of a short batch.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let vectors = self.provider.embed(texts).await?;
        validate_response(texts, &vectors)?;
        Ok(vectors)
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        Ok(vectors.pop().unwrap_or_default())
    }

    /// How well the candidate's role history fits the JD title.
    ///
    /// A suggested-role label from upstream analytics takes precedence over
    /// the raw job-title history. Scores are floored at 0.3; a candidate
    /// with no history at all gets a neutral 0.5.
    pub async fn calculate_role_relevance(
        &self,
        jd_title: &str,
        suggested_role: Option<&str>,
        experiences: &[Experience],
    ) -> Result<f32> {
        if jd_title.trim().is_empty() {
            return Ok(0.5);
        }

        if let Some(role) = suggested_role.filter(|r| !r.trim().is_empty()) {
            let jd_emb = self.embed_one(&jd_title.to_lowercase()).await?;
            let role_emb = self.embed_one(&role.to_lowercase()).await?;
            return Ok(cosine(&jd_emb, &role_emb).max(0.3));
        }

        if experiences.is_empty() {
            return Ok(0.5);
        }

        let titles_text = joined_job_titles(experiences).to_lowercase();
        if titles_text.trim().is_empty() {
            return Ok(0.5);
        }

        let jd_emb = self.embed_one(&jd_title.to_lowercase()).await?;
        let cv_emb = self.embed_one(&titles_text).await?;
        Ok(cosine(&jd_emb, &cv_emb).max(0.3))
    }

    /// Semantic similarity between the JD title and the candidate's title
    /// text (suggested role, else all experience titles). 0.0 when the
    /// candidate has no title text at all.
    async fn calculate_title_similarity(
        &self,
        jd_title: &str,
        suggested_role: Option<&str>,
        experiences: &[Experience],
    ) -> Result<f32> {
        let cv_title_text = match suggested_role.filter(|r| !r.trim().is_empty()) {
            Some(role) => role.to_string(),
            None => joined_job_titles(experiences),
        };
        if cv_title_text.trim().is_empty() || jd_title.trim().is_empty() {
            return Ok(0.0);
        }

        let jd_emb = self.embed_one(jd_title).await?;
        let cv_emb = self.embed_one(&cv_title_text).await?;
        Ok(cosine(&jd_emb, &cv_emb))
    }

    /// Responsibility coverage: for each JD responsibility, blend the two
    /// most similar CV description bullets (0.7/0.3), average across
    /// responsibilities and rescale into [0.3, 1.0]. Empty inputs score 0.0.
    pub async fn calculate_responsibilities_similarity(
        &self,
        responsibilities: &[String],
        experiences: &[Experience],
    ) -> Result<f32> {
        let responsibilities: Vec<String> = responsibilities
            .iter()
            .filter(|r| !r.trim().is_empty())
            .cloned()
            .collect();
        if responsibilities.is_empty() || experiences.is_empty() {
            return Ok(0.0);
        }

        let descriptions: Vec<String> = experiences
            .iter()
            .flat_map(|exp| exp.description.iter())
            .filter(|d| !d.trim().is_empty())
            .cloned()
            .collect();
        if descriptions.is_empty() {
            return Ok(0.0);
        }

        let resp_embeddings = self.embed_batch(&responsibilities).await?;
        let desc_embeddings = self.embed_batch(&descriptions).await?;

        let mut best_matches = Vec::with_capacity(resp_embeddings.len());
        for resp_emb in &resp_embeddings {
            let mut similarities: Vec<f32> = desc_embeddings
                .iter()
                .map(|desc_emb| cosine(resp_emb, desc_emb))
                .collect();
            similarities.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

            let weighted = if similarities.len() >= 2 {
                0.7 * similarities[0] + 0.3 * similarities[1]
            } else {
                similarities[0]
            };
            best_matches.push(weighted);
        }

        let mean = best_matches.iter().sum::<f32>() / best_matches.len() as f32;
        Ok((0.3 + mean * 0.7).min(1.0))
    }

    /// Required years of experience from the JD's qualification sentences.
    ///
    /// The sentence most similar to a fixed "how many years" query is
    /// searched with the ordered year patterns. 0.0 when there are no
    /// qualifications or no pattern matches.
    pub async fn extract_required_experience(
        &self,
        qualifications: &Qualifications,
    ) -> Result<f32> {
        let sentences: Vec<String> = qualifications
            .required
            .iter()
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .collect();
        if sentences.is_empty() {
            return Ok(0.0);
        }

        let sentence_embeddings = self.embed_batch(&sentences).await?;
        let query_embedding = self.embed_one(REQUIRED_YEARS_QUERY).await?;

        let best_idx = sentence_embeddings
            .iter()
            .enumerate()
            .map(|(i, emb)| (i, cosine(&query_embedding, emb)))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or(0);

        let best_sentence = &sentences[best_idx];
        debug!("best qualification sentence for years: {:?}", best_sentence);
        Ok(extract_years_from_sentence(best_sentence))
    }

    /// Education relevance: pairwise cosine between JD requirement texts and
    /// CV entry texts, plus a 0.25 bonus when the candidate's degree level
    /// strictly exceeds a stated requirement and a field bonus (0.3 exact,
    /// 0.2 × similarity otherwise). Best CV entry per requirement, best
    /// requirement overall.
    pub async fn calculate_education_match(
        &self,
        cv_education: &[Education],
        jd_education: &[String],
    ) -> Result<f32> {
        if jd_education.iter().all(|req| req.trim().is_empty()) {
            return Ok(1.0);
        }
        if cv_education.is_empty() {
            return Ok(0.0);
        }

        struct EduFacts {
            text: String,
            level: i32,
            field: String,
        }

        let jd_facts: Vec<EduFacts> = jd_education
            .iter()
            .filter(|req| !req.trim().is_empty())
            .map(|req| EduFacts {
                text: req.clone(),
                level: extract_highest_degree_level(req),
                field: extract_field(req),
            })
            .collect();

        let cv_facts: Vec<EduFacts> = cv_education
            .iter()
            .map(|edu| {
                let degree = edu.degree.trim().to_lowercase();
                let mut parts = vec![degree.clone()];
                if let Some(field) = &edu.field_of_study {
                    parts.push(format!("in {}", field));
                }
                if let Some(institution) = &edu.institution {
                    parts.push(format!("from {}", institution));
                }
                EduFacts {
                    text: parts.into_iter().filter(|p| !p.is_empty()).collect::<Vec<_>>().join(" "),
                    level: extract_highest_degree_level(&degree),
                    field: extract_field(edu.field_of_study.as_deref().unwrap_or(&degree)),
                }
            })
            .filter(|facts| !facts.text.trim().is_empty())
            .collect();
        if cv_facts.is_empty() {
            return Ok(0.0);
        }

        let jd_texts: Vec<String> = jd_facts.iter().map(|f| f.text.clone()).collect();
        let cv_texts: Vec<String> = cv_facts.iter().map(|f| f.text.clone()).collect();
        let jd_embeddings = self.embed_batch(&jd_texts).await?;
        let cv_embeddings = self.embed_batch(&cv_texts).await?;

        let mut best_overall: f32 = 0.0;
        for (i, jd_fact) in jd_facts.iter().enumerate() {
            let mut best_for_requirement: f32 = 0.0;
            for (j, cv_fact) in cv_facts.iter().enumerate() {
                let base = cosine(&jd_embeddings[i], &cv_embeddings[j]);

                let level_bonus = if jd_fact.level >= 0 && cv_fact.level > jd_fact.level {
                    0.25
                } else {
                    0.0
                };

                let field_bonus = if !jd_fact.field.is_empty() && !cv_fact.field.is_empty() {
                    if jd_fact.field == cv_fact.field {
                        0.3
                    } else {
                        0.2 * self.field_similarity(&cv_fact.field, &jd_fact.field).await?
                    }
                } else {
                    0.0
                };

                let total = (base + level_bonus + field_bonus).min(1.0);
                best_for_requirement = best_for_requirement.max(total);
            }
            best_overall = best_overall.max(best_for_requirement);
        }

        Ok(best_overall.min(1.0))
    }

    async fn field_similarity(&self, cv_field: &str, jd_field: &str) -> Result<f32> {
        let cv_emb = self.embed_one(cv_field).await?;
        let jd_emb = self.embed_one(jd_field).await?;
        Ok(cosine(&cv_emb, &jd_emb))
    }

    /// Semantic skills match over the concatenated skill lists.
    ///
    /// A JD with no stated skills scores a neutral 0.7; a candidate with no
    /// skills scores 0.3; otherwise the similarity is clamped to [0.3, 1.0].
    pub async fn calculate_skills_match(
        &self,
        jd_required_skills: &[String],
        cv_skills: &[Skill],
    ) -> Result<f32> {
        if jd_required_skills.iter().all(|s| s.trim().is_empty()) {
            return Ok(0.7);
        }
        let cv_skill_names: Vec<&str> = cv_skills
            .iter()
            .map(|s| s.skill_name.as_str())
            .filter(|s| !s.trim().is_empty())
            .collect();
        if cv_skill_names.is_empty() {
            return Ok(0.3);
        }

        let jd_text = jd_required_skills.join(" ");
        let cv_text = cv_skill_names.join(" ");
        let jd_emb = self.embed_one(&jd_text).await?;
        let cv_emb = self.embed_one(&cv_text).await?;
        Ok(cosine(&jd_emb, &cv_emb).clamp(0.3, 1.0))
    }

    /// Compute the composite match between a JD and a candidate.
    ///
    /// This is the single entry point the rest of the system depends on.
    /// Skill categories and presence flags switch the skills dimension onto
    /// the weighted path when both are supplied and non-trivial; otherwise
    /// the semantic path over the raw skill lists is used.
    pub async fn compute_match(
        &self,
        jd: &JobDescription,
        cv: &Candidate,
        skill_categories: Option<&SkillCategories>,
        skill_presence: Option<&SkillPresence>,
    ) -> Result<MatchReport> {
        let suggested_role = cv.suggested_role.as_deref();

        let role_relevance = self
            .calculate_role_relevance(&jd.job_title, suggested_role, &cv.experiences)
            .await?;

        let cv_experience_years = calculate_experience_years(&cv.experiences);
        let jd_required_years = self.extract_required_experience(&jd.qualifications).await?;

        let sim_title = self
            .calculate_title_similarity(&jd.job_title, suggested_role, &cv.experiences)
            .await?;
        let sim_resp = self
            .calculate_responsibilities_similarity(&jd.key_responsibilities, &cv.experiences)
            .await?;

        let experience_match =
            calculate_experience_match(cv_experience_years, jd_required_years, role_relevance);
        let education_match = self
            .calculate_education_match(&cv.education, &jd.education_required)
            .await?;
        let location_match = calculate_location_match(&cv.location, &jd.location);

        let (skills_match, skills_details, skills_match_type) =
            match (skill_categories, skill_presence) {
                (Some(categories), Some(presence))
                    if categories.values().any(|skills| !skills.is_empty()) =>
                {
                    let (score, details) = calculate_weighted_skills_match(
                        categories,
                        presence,
                        &self.config.skill_weights,
                    );
                    (score, details, SkillsMatchType::Weighted)
                }
                _ => {
                    let score = self
                        .calculate_skills_match(&jd.required_skills, &cv.skills)
                        .await?;
                    (score, HashMap::new(), SkillsMatchType::Semantic)
                }
            };

        let weights = &self.config.weights;
        let final_score = (weights.title * sim_title
            + weights.responsibilities * sim_resp
            + weights.experience * experience_match
            + weights.education * education_match
            + weights.skills * skills_match
            + weights.location * location_match)
            .clamp(0.0, 1.0);

        let status = calculate_match_status(
            skills_match,
            &skills_details,
            skills_match_type,
            &self.config.thresholds,
        );

        let match_summary = generate_match_summary(&SummaryInputs {
            experience_suitability: experience_match,
            education_relevance: education_match,
            location_compatibility: location_match,
            role_relevance,
            candidate_exp_years: cv_experience_years,
            required_exp_years: jd_required_years,
        });

        debug!(
            "match computed: score={:.4} status={} skills_path={:?}",
            final_score, status, skills_match_type
        );

        Ok(MatchReport {
            score: round4(final_score),
            details: MatchDetails {
                job_title_similarity: round4(sim_title),
                responsibilities_similarity: round4(sim_resp),
                experience_suitability: round4(experience_match),
                education_relevance: round4(education_match),
                skills_match: round4(skills_match),
                skills_match_type,
                skills_details,
                location_compatibility: round4(location_match),
                role_relevance: round4(role_relevance),
                candidate_exp_years: cv_experience_years,
                required_exp_years: jd_required_years,
                suggested_role: cv.suggested_role.clone(),
                status,
                match_summary,
            },
        })
    }
}

fn joined_job_titles(experiences: &[Experience]) -> String {
    experiences
        .iter()
        .filter_map(|exp| exp.job_title.as_deref())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::MockEmbeddingProvider;
    use crate::error::MatcherError;
    use async_trait::async_trait;

    fn engine(mock: MockEmbeddingProvider) -> MatchEngine {
        MatchEngine::new(Arc::new(mock), MatchConfig::default())
    }

    /// Misbehaving provider that always drops the last row of a batch.
    struct ShortBatchProvider;

    #[async_trait]
    impl EmbeddingProvider for ShortBatchProvider {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .take(texts.len().saturating_sub(1))
                .map(|_| vec![1.0, 0.0])
                .collect())
        }
    }

    fn exp_with_title(title: &str) -> Experience {
        Experience {
            job_title: Some(title.to_string()),
            start_date: None,
            end_date: None,
            description: vec![],
        }
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.123_456), 0.1235);
        assert_eq!(round4(1.0), 1.0);
    }

    #[tokio::test]
    async fn test_role_relevance_floor() {
        // Orthogonal vectors give cosine 0; the floor lifts it to 0.3.
        let mock = MockEmbeddingProvider::new()
            .with_vector("accountant", vec![1.0, 0.0])
            .with_vector("zookeeper", vec![0.0, 1.0]);
        let engine = engine(mock);
        let score = engine
            .calculate_role_relevance("Accountant", Some("Zookeeper"), &[])
            .await
            .unwrap();
        assert!((score - 0.3).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_role_relevance_no_history() {
        let engine = engine(MockEmbeddingProvider::new());
        let score = engine
            .calculate_role_relevance("Engineer", None, &[])
            .await
            .unwrap();
        assert_eq!(score, 0.5);
    }

    #[tokio::test]
    async fn test_role_relevance_suggested_role_identical() {
        let mock = MockEmbeddingProvider::new()
            .with_vector("software engineer", vec![1.0, 0.0]);
        let engine = engine(mock);
        let score = engine
            .calculate_role_relevance("Software Engineer", Some("Software Engineer"), &[])
            .await
            .unwrap();
        assert!((score - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_title_similarity_empty_history_is_zero() {
        let engine = engine(MockEmbeddingProvider::new());
        let score = engine
            .calculate_title_similarity("Engineer", None, &[])
            .await
            .unwrap();
        assert_eq!(score, 0.0);
    }

    #[tokio::test]
    async fn test_title_similarity_uses_joined_titles() {
        let mock = MockEmbeddingProvider::new()
            .with_vector("Data Engineer", vec![1.0, 0.0])
            .with_vector("Data Analyst Data Engineer", vec![1.0, 0.0]);
        let engine = engine(mock);
        let exps = vec![exp_with_title("Data Analyst"), exp_with_title("Data Engineer")];
        let score = engine
            .calculate_title_similarity("Data Engineer", None, &exps)
            .await
            .unwrap();
        assert!((score - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_responsibilities_empty_inputs() {
        let engine = engine(MockEmbeddingProvider::new());
        assert_eq!(
            engine
                .calculate_responsibilities_similarity(&[], &[exp_with_title("x")])
                .await
                .unwrap(),
            0.0
        );
        assert_eq!(
            engine
                .calculate_responsibilities_similarity(&["build".to_string()], &[])
                .await
                .unwrap(),
            0.0
        );
    }

    #[tokio::test]
    async fn test_responsibilities_top_two_blend() {
        // One responsibility, two bullets: best 1.0, second 0.0.
        // blended = 0.7; rescaled = 0.3 + 0.7×0.7 = 0.79.
        let mock = MockEmbeddingProvider::new()
            .with_vector("ship features", vec![1.0, 0.0])
            .with_vector("shipped features weekly", vec![1.0, 0.0])
            .with_vector("watered office plants", vec![0.0, 1.0]);
        let engine = engine(mock);
        let exps = vec![Experience {
            job_title: None,
            start_date: None,
            end_date: None,
            description: vec![
                "shipped features weekly".to_string(),
                "watered office plants".to_string(),
            ],
        }];
        let score = engine
            .calculate_responsibilities_similarity(&["ship features".to_string()], &exps)
            .await
            .unwrap();
        assert!((score - 0.79).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_responsibilities_single_bullet() {
        // Only one bullet: no second-best term, rescaled = 0.3 + 0.7×1.0.
        let mock = MockEmbeddingProvider::new()
            .with_vector("ship features", vec![1.0, 0.0])
            .with_vector("shipped features weekly", vec![1.0, 0.0]);
        let engine = engine(mock);
        let exps = vec![Experience {
            job_title: None,
            start_date: None,
            end_date: None,
            description: vec!["shipped features weekly".to_string()],
        }];
        let score = engine
            .calculate_responsibilities_similarity(&["ship features".to_string()], &exps)
            .await
            .unwrap();
        assert!((score - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_required_experience_no_qualifications() {
        let engine = engine(MockEmbeddingProvider::new());
        let years = engine
            .extract_required_experience(&Qualifications::default())
            .await
            .unwrap();
        assert_eq!(years, 0.0);
    }

    #[tokio::test]
    async fn test_required_experience_picks_most_similar_sentence() {
        let mock = MockEmbeddingProvider::new()
            .with_vector(REQUIRED_YEARS_QUERY, vec![1.0, 0.0])
            .with_vector("5+ years of backend experience", vec![0.9, 0.1])
            .with_vector("excellent communication skills", vec![0.0, 1.0]);
        let engine = engine(mock);
        let quals = Qualifications {
            required: vec![
                "excellent communication skills".to_string(),
                "5+ years of backend experience".to_string(),
            ],
        };
        let years = engine.extract_required_experience(&quals).await.unwrap();
        assert_eq!(years, 5.0);
    }

    #[tokio::test]
    async fn test_education_match_defaults() {
        let engine = engine(MockEmbeddingProvider::new());
        assert_eq!(
            engine.calculate_education_match(&[], &[]).await.unwrap(),
            1.0
        );
        assert_eq!(
            engine
                .calculate_education_match(&[], &["Bachelor's degree".to_string()])
                .await
                .unwrap(),
            0.0
        );
    }

    #[tokio::test]
    async fn test_education_level_bonus_applies() {
        // Text similarity 0.5, candidate's master's beats the bachelor's
        // requirement for a 0.25 level bonus. Field vectors are orthogonal
        // ("bachelor" yields "arts" through the "ba" abbreviation), so the
        // field term contributes nothing here.
        let mock = MockEmbeddingProvider::new()
            .with_vector("bachelor degree required", vec![1.0, 0.0])
            .with_vector("master of science in physics from MIT", vec![0.5, 0.866_025_4])
            .with_vector("physics", vec![1.0, 0.0])
            .with_vector("arts", vec![0.0, 1.0]);
        let engine = engine(mock);
        let education = vec![Education {
            degree: "Master of Science".to_string(),
            field_of_study: Some("physics".to_string()),
            institution: Some("MIT".to_string()),
        }];
        let score = engine
            .calculate_education_match(&education, &["bachelor degree required".to_string()])
            .await
            .unwrap();
        assert!((score - 0.75).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_short_batch_is_a_provider_error() {
        // Two CV entries, one vector back: the match must fail cleanly.
        let engine = MatchEngine::new(Arc::new(ShortBatchProvider), MatchConfig::default());
        let education = vec![
            Education {
                degree: "Bachelor of Science".to_string(),
                field_of_study: None,
                institution: None,
            },
            Education {
                degree: "Master of Science".to_string(),
                field_of_study: None,
                institution: None,
            },
        ];
        let err = engine
            .calculate_education_match(&education, &["Bachelor's degree".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, MatcherError::Provider(_)));
    }

    #[tokio::test]
    async fn test_skills_semantic_defaults() {
        let engine = engine(MockEmbeddingProvider::new());
        assert_eq!(
            engine.calculate_skills_match(&[], &[]).await.unwrap(),
            0.7
        );
        assert_eq!(
            engine
                .calculate_skills_match(&["Rust".to_string()], &[])
                .await
                .unwrap(),
            0.3
        );
    }

    #[tokio::test]
    async fn test_skills_semantic_clamped() {
        let mock = MockEmbeddingProvider::new()
            .with_vector("Rust Tokio", vec![1.0, 0.0])
            .with_vector("Gardening Cooking", vec![-1.0, 0.0]);
        let engine = engine(mock);
        let skills = vec![
            Skill { skill_name: "Gardening".to_string() },
            Skill { skill_name: "Cooking".to_string() },
        ];
        let score = engine
            .calculate_skills_match(
                &["Rust".to_string(), "Tokio".to_string()],
                &skills,
            )
            .await
            .unwrap();
        assert_eq!(score, 0.3);
    }
}

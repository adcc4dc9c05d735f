use super::template_loader::load_template;
use crate::shared::config::TemplatesConfig;
use crate::shared::gist::LibraryStore;
use crate::shared::llm::{ChatMessage, LlmProvider};
use contracts::domain::a001_prompt_library::normalizer::use_case_to_persisted;
use contracts::usecases::u503_prompt_assistant::{
    build_meta_prompt, extract_json_object, AssistantMode, MetaPromptRequest, MetaPromptResponse,
};
use std::sync::Arc;

const SYSTEM_PROMPT: &str =
    "You are an expert prompt engineer. Reply with exactly one JSON object and nothing else.";

/// Executor для UseCase ассистента промптов
pub struct AssistantExecutor {
    store: Arc<LibraryStore>,
    templates: TemplatesConfig,
    llm: Option<Arc<dyn LlmProvider>>,
}

impl AssistantExecutor {
    pub fn new(
        store: Arc<LibraryStore>,
        templates: TemplatesConfig,
        llm: Option<Arc<dyn LlmProvider>>,
    ) -> Self {
        Self {
            store,
            templates,
            llm,
        }
    }

    /// Мета-промпт по данным формы и, по запросу, ответ LLM
    pub async fn build(&self, mut request: MetaPromptRequest) -> MetaPromptResponse {
        let mut warnings = Vec::new();

        if request.mode == AssistantMode::ImproveExisting && request.current_config.is_none() {
            let current = self
                .store
                .read(|library| {
                    library
                        .use_case(&request.family, &request.use_case_name)
                        .map(use_case_to_persisted)
                })
                .await;
            if current.is_none() {
                warnings.push(format!(
                    "Use case '{}' was not found in '{}', the current configuration is empty.",
                    request.use_case_name, request.family
                ));
            }
            request.current_config = current;
        }

        let (template, template_source) = load_template(&self.templates, request.mode);
        let meta_prompt = build_meta_prompt(&template, &request);

        let mut llm_reply = None;
        let mut suggested_payload = None;
        if request.send_to_llm {
            match &self.llm {
                None => warnings.push("No LLM is configured; copy the meta-prompt instead.".into()),
                Some(llm) => {
                    let messages = vec![
                        ChatMessage::system(SYSTEM_PROMPT),
                        ChatMessage::user(meta_prompt.clone()),
                    ];
                    match llm.chat_completion(messages).await {
                        Ok(response) => {
                            tracing::info!(
                                "{} replied with {} chars (model {})",
                                llm.provider_name(),
                                response.content.len(),
                                response.model
                            );
                            suggested_payload = extract_json_object(&response.content);
                            if suggested_payload.is_none() {
                                warnings.push("The LLM reply contains no JSON object.".into());
                            }
                            llm_reply = Some(response.content);
                        }
                        Err(e) => {
                            tracing::error!("LLM request failed: {}", e);
                            warnings.push(format!("LLM request failed: {}", e));
                        }
                    }
                }
            }
        }

        MetaPromptResponse {
            meta_prompt,
            template_source,
            llm_reply,
            suggested_payload,
            warning: if warnings.is_empty() {
                None
            } else {
                Some(warnings.join(" "))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::llm::{LlmError, LlmResponse};
    use async_trait::async_trait;
    use contracts::usecases::u503_prompt_assistant::TemplateSource;

    struct CannedLlm(String);

    #[async_trait]
    impl LlmProvider for CannedLlm {
        async fn chat_completion(
            &self,
            messages: Vec<ChatMessage>,
        ) -> Result<LlmResponse, LlmError> {
            assert_eq!(messages.len(), 2);
            Ok(LlmResponse {
                content: self.0.clone(),
                tokens_used: None,
                model: "canned".into(),
            })
        }

        fn provider_name(&self) -> &str {
            "Canned"
        }
    }

    fn templates() -> TemplatesConfig {
        TemplatesConfig {
            create_prompt: "missing/create.md".into(),
            improve_prompt: "missing/improve.md".into(),
        }
    }

    fn executor(llm: Option<Arc<dyn LlmProvider>>) -> AssistantExecutor {
        AssistantExecutor::new(Arc::new(LibraryStore::new(None)), templates(), llm)
    }

    #[tokio::test]
    async fn test_improve_pulls_current_config_from_library() {
        let response = executor(None)
            .build(MetaPromptRequest {
                mode: AssistantMode::ImproveExisting,
                family: "Engineering".into(),
                use_case_name: "Code review".into(),
                improvement_goals: "more structure".into(),
                ..Default::default()
            })
            .await;

        assert_eq!(response.template_source, TemplateSource::Builtin);
        assert!(response.meta_prompt.contains("Review the following {language} code"));
        assert!(response.meta_prompt.contains("Improvement goals: more structure"));
        assert!(response.warning.is_none());
    }

    #[tokio::test]
    async fn test_llm_reply_becomes_payload() {
        let llm: Arc<dyn LlmProvider> = Arc::new(CannedLlm(
            "```json\n{\"Cold email\": {\"template\": \"Hi {name}\"}}\n```".into(),
        ));
        let response = executor(Some(llm))
            .build(MetaPromptRequest {
                family: "Sales".into(),
                use_case_name: "Cold email".into(),
                send_to_llm: true,
                ..Default::default()
            })
            .await;

        let payload = response.suggested_payload.unwrap();
        assert_eq!(payload["Cold email"]["template"], "Hi {name}");
        assert!(response.llm_reply.is_some());
    }

    #[tokio::test]
    async fn test_send_without_llm_warns() {
        let response = executor(None)
            .build(MetaPromptRequest {
                send_to_llm: true,
                ..Default::default()
            })
            .await;
        assert!(response.warning.unwrap().contains("No LLM"));
        assert!(response.llm_reply.is_none());
    }
}

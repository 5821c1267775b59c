use super::{AnthropicAdapter, OpenAiCompatibleAdapter, ProviderAdapter, ProviderKind};
use crate::config::{FileModelConfig, resolve_api_key};
use async_trait::async_trait;
use roundtable_application::{InvokeError, ModelInvoker};
use roundtable_domain::ModelId;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// How a configured model id is served
enum Route {
    Ready(Arc<dyn ProviderAdapter>),
    /// Configured but unusable (missing key, unknown provider); calls fail
    /// with the stored reason.
    Unavailable(String),
}

/// Routes model calls to the adapter built for each configured model id
pub struct RoutingInvoker {
    routes: HashMap<ModelId, Route>,
}

impl RoutingInvoker {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Build one route per `[models]` entry.
    ///
    /// Entries that cannot be served are still registered so their calls
    /// fail per call instead of aborting the whole run.
    pub fn from_config(models: &BTreeMap<String, FileModelConfig>) -> Self {
        let mut invoker = Self::new();
        for (id, entry) in models {
            let route = match build_adapter(entry) {
                Ok(adapter) => {
                    debug!("Routing {} to {} ({})", id, adapter.kind(), entry.model);
                    Route::Ready(adapter)
                }
                Err(reason) => {
                    warn!("Model {} is unavailable: {}", id, reason);
                    Route::Unavailable(reason)
                }
            };
            invoker.routes.insert(ModelId::new(id.trim()), route);
        }
        invoker
    }

    pub fn with_adapter(mut self, id: impl Into<ModelId>, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.routes.insert(id.into(), Route::Ready(adapter));
        self
    }

    pub fn is_ready(&self, id: &ModelId) -> bool {
        matches!(self.routes.get(id), Some(Route::Ready(_)))
    }

    /// Why `id` cannot be called, if it is configured but unusable
    pub fn unavailable_reason(&self, id: &ModelId) -> Option<&str> {
        match self.routes.get(id) {
            Some(Route::Unavailable(reason)) => Some(reason),
            _ => None,
        }
    }
}

impl Default for RoutingInvoker {
    fn default() -> Self {
        Self::new()
    }
}

fn build_adapter(entry: &FileModelConfig) -> Result<Arc<dyn ProviderAdapter>, String> {
    let kind: ProviderKind = entry.provider.parse()?;
    let api_key = resolve_api_key(entry.api_key.as_deref()).map_err(|e| e.to_string())?;
    let endpoint = entry.endpoint.as_deref();

    let adapter: Arc<dyn ProviderAdapter> = match (kind, api_key) {
        (ProviderKind::Anthropic, Some(key)) => Arc::new(
            AnthropicAdapter::new(&entry.model, key, endpoint)
                .with_sampling(entry.max_tokens, entry.temperature),
        ),
        (kind, None) if kind.requires_api_key() => {
            return Err(format!("no api_key configured for {} model", kind));
        }
        (kind, key) => Arc::new(
            OpenAiCompatibleAdapter::new(kind, &entry.model, key, endpoint)
                .with_sampling(entry.max_tokens, entry.temperature),
        ),
    };
    Ok(adapter)
}

#[async_trait]
impl ModelInvoker for RoutingInvoker {
    async fn invoke(
        &self,
        model: &ModelId,
        prompt: &str,
        timeout: Duration,
    ) -> Result<String, InvokeError> {
        match self.routes.get(model) {
            Some(Route::Ready(adapter)) => adapter.complete(prompt, timeout).await,
            Some(Route::Unavailable(reason)) => Err(InvokeError::ModelNotAvailable(format!(
                "{}: {}",
                model, reason
            ))),
            None => Err(InvokeError::ModelNotAvailable(format!(
                "{} is not configured",
                model
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // -- Mock ProviderAdapter --------------------------------------------------

    struct MockProvider {
        reply: &'static str,
        prompts: Mutex<Vec<String>>,
    }

    impl MockProvider {
        fn new(reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ProviderAdapter for MockProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::OpenAi
        }

        async fn complete(&self, prompt: &str, _timeout: Duration) -> Result<String, InvokeError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.to_string())
        }
    }

    // -- Tests -------------------------------------------------------------------

    #[tokio::test]
    async fn test_routes_by_model_id() {
        let a = MockProvider::new("from a");
        let b = MockProvider::new("from b");
        let invoker = RoutingInvoker::new()
            .with_adapter("x/a", a.clone())
            .with_adapter("x/b", b.clone());

        let reply = invoker
            .invoke(&ModelId::new("x/b"), "hi", Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(reply, "from b");
        assert!(a.prompts.lock().unwrap().is_empty());
        assert_eq!(b.prompts.lock().unwrap().as_slice(), ["hi".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_model_not_available() {
        let invoker = RoutingInvoker::new();
        let err = invoker
            .invoke(&ModelId::new("ghost"), "hi", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, InvokeError::ModelNotAvailable(_)));
    }

    #[tokio::test]
    async fn test_from_config_marks_unusable_entries() {
        let mut models = BTreeMap::new();
        models.insert(
            "local/llama".to_string(),
            FileModelConfig::new("ollama", "llama2"),
        );
        models.insert(
            "remote/gpt".to_string(),
            FileModelConfig::new("openai", "gpt-4"),
        );
        models.insert(
            "odd/thing".to_string(),
            FileModelConfig::new("bedrock", "titan").with_api_key("k"),
        );
        models.insert(
            "remote/claude".to_string(),
            FileModelConfig::new("anthropic", "claude-3").with_api_key("sk-ant-literal"),
        );

        let invoker = RoutingInvoker::from_config(&models);

        assert!(invoker.is_ready(&ModelId::new("local/llama")));
        assert!(invoker.is_ready(&ModelId::new("remote/claude")));
        assert!(
            invoker
                .unavailable_reason(&ModelId::new("remote/gpt"))
                .unwrap()
                .contains("no api_key")
        );
        assert!(
            invoker
                .unavailable_reason(&ModelId::new("odd/thing"))
                .unwrap()
                .contains("unknown provider")
        );

        let err = invoker
            .invoke(&ModelId::new("remote/gpt"), "hi", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, InvokeError::ModelNotAvailable(_)));
    }
}

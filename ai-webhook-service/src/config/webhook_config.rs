/// Configuration for the evidence-extraction webhook.
///
/// The webhook is a plain `GET` endpoint: the prompt and a caller-supplied
/// identifier travel as query parameters, no authentication header is sent.
///
/// # Fields
///
/// - `endpoint`: Full webhook URL (`https://...`).
/// - `timeout_secs`: Optional request timeout in seconds.
/// - `prompt_param`: Query parameter carrying the free-text prompt.
/// - `id_param`: Query parameter carrying the caller identifier.
/// - `allow_http`: Accept a plain `http://` endpoint (local development only).
///
/// # Examples
///
/// ```
/// use ai_webhook_service::config::webhook_config::WebhookConfig;
///
/// let cfg = WebhookConfig {
///     endpoint: "https://hooks.example.com/webhook/evidence".to_string(),
///     timeout_secs: Some(120),
///     prompt_param: "message".to_string(),
///     id_param: "session_id".to_string(),
///     allow_http: false,
/// };
/// assert_eq!(cfg.base_url(), "https://hooks.example.com/webhook/evidence");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    /// Webhook URL.
    pub endpoint: String,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,

    /// Name of the prompt query parameter.
    pub prompt_param: String,

    /// Name of the caller-id query parameter.
    pub id_param: String,

    /// `http://` is rejected unless this is set.
    pub allow_http: bool,
}

impl WebhookConfig {
    /// Endpoint without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim().trim_end_matches('/')
    }
}

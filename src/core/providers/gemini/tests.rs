use super::types::CandidateContent;
use super::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "getUnreadEmails".into(),
            description: "Fetch unread emails".into(),
            parameters: json!({"type": "object", "properties": {}}),
        },
        ToolSpec {
            name: "submitSummary".into(),
            description: "Submit the final summary".into(),
            parameters: json!({
                "type": "object",
                "properties": {"headline": {"type": "string"}},
                "required": ["headline"]
            }),
        },
    ]
}

fn request_json(messages: &[ProviderMessage], tool_choice: &ToolChoice) -> Value {
    let tools = specs();
    let request = ChatRequest {
        system_prompt: Some("You are an assistant"),
        messages,
        tools: &tools,
        tool_choice,
        model: DEFAULT_MODEL,
        temperature: 0.2,
    };
    serde_json::to_value(GeminiProvider::build_tools_request(&request)).unwrap()
}

#[test]
fn provider_creates_with_key() {
    let provider = GeminiProvider::new(Some("test-api-key"));
    assert_eq!(provider.api_key.as_deref(), Some("test-api-key"));
}

#[test]
fn model_name_formatting() {
    assert_eq!(
        GeminiProvider::model_name("gemini-2.0-flash"),
        "models/gemini-2.0-flash"
    );
    assert_eq!(
        GeminiProvider::model_name("models/gemini-1.5-pro"),
        "models/gemini-1.5-pro"
    );
}

#[test]
fn auto_choice_serializes_auto_mode() {
    let value = request_json(&[ProviderMessage::user("hi")], &ToolChoice::Auto);
    assert_eq!(value["toolConfig"]["functionCallingConfig"]["mode"], "AUTO");
    assert!(
        value["toolConfig"]["functionCallingConfig"]
            .get("allowedFunctionNames")
            .is_none()
    );
    assert_eq!(value["systemInstruction"]["parts"][0]["text"], "You are an assistant");
    assert_eq!(value["generationConfig"]["maxOutputTokens"], 8192);
}

#[test]
fn forced_choice_restricts_allowed_functions() {
    let value = request_json(
        &[ProviderMessage::user("submit now")],
        &ToolChoice::only("submitSummary"),
    );
    let config = &value["toolConfig"]["functionCallingConfig"];
    assert_eq!(config["mode"], "ANY");
    assert_eq!(config["allowedFunctionNames"], json!(["submitSummary"]));
}

#[test]
fn parameterless_tool_omits_schema() {
    let value = request_json(&[ProviderMessage::user("hi")], &ToolChoice::Auto);
    let declarations = &value["tools"][0]["functionDeclarations"];
    assert!(declarations[0].get("parameters").is_none());
    assert_eq!(declarations[1]["parameters"]["required"], json!(["headline"]));
}

#[test]
fn tool_result_maps_to_function_response_with_tool_name() {
    let messages = vec![
        ProviderMessage::user("summarize"),
        ProviderResponse::tool_calls([("getUnreadEmails", json!({}))]).to_assistant_message(),
        ProviderMessage::tool_result("call_1", r#"{"emails":[]}"#, false),
    ];
    let value = request_json(&messages, &ToolChoice::Auto);
    let contents = value["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[1]["role"], "model");
    assert_eq!(contents[1]["parts"][0]["functionCall"]["name"], "getUnreadEmails");
    assert_eq!(
        contents[2]["parts"][0]["functionResponse"]["name"],
        "getUnreadEmails"
    );
}

#[test]
fn parse_content_blocks_generates_ids_and_wraps_args() {
    let parts = vec![
        ResponsePart {
            text: Some("Fetching".into()),
            function_call: None,
        },
        ResponsePart {
            text: None,
            function_call: Some(GeminiFunctionCall {
                name: "getUnreadEmails".into(),
                args: Value::Null,
                id: None,
            }),
        },
    ];
    let blocks = GeminiProvider::parse_content_blocks(&parts);
    assert_eq!(blocks.len(), 2);
    match &blocks[1] {
        ContentBlock::ToolUse { id, name, input } => {
            assert_eq!(id, "gemini_call_1");
            assert_eq!(name, "getUnreadEmails");
            assert_eq!(input, &json!({}));
        }
        other => panic!("expected tool use, got {other:?}"),
    }
}

#[test]
fn stop_reason_prefers_function_calls() {
    let candidate = Candidate {
        content: CandidateContent {
            parts: vec![ResponsePart {
                text: None,
                function_call: Some(GeminiFunctionCall {
                    name: "submitSummary".into(),
                    args: json!({}),
                    id: None,
                }),
            }],
        },
        finish_reason: Some("STOP".into()),
    };
    assert_eq!(GeminiProvider::map_stop_reason(&candidate), StopReason::ToolUse);

    let text_only = Candidate {
        content: CandidateContent::default(),
        finish_reason: Some("MAX_TOKENS".into()),
    };
    assert_eq!(GeminiProvider::map_stop_reason(&text_only), StopReason::MaxTokens);
}

#[tokio::test]
async fn chat_with_tools_parses_function_call_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"functionCall": {"name": "getUnreadEmails", "args": {}}}]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 3},
            "modelVersion": "gemini-2.0-flash-001"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider =
        GeminiProvider::new(Some("test-key")).with_base_url(format!("{}/v1beta", server.uri()));
    let tools = specs();
    let messages = vec![ProviderMessage::user("summarize current inbox")];
    let response = provider
        .chat_with_tools(ChatRequest {
            system_prompt: None,
            messages: &messages,
            tools: &tools,
            tool_choice: &ToolChoice::Auto,
            model: DEFAULT_MODEL,
            temperature: 0.2,
        })
        .await
        .unwrap();

    assert!(response.has_tool_use());
    assert_eq!(response.stop_reason, Some(StopReason::ToolUse));
    assert_eq!(response.total_tokens(), Some(15));
    assert_eq!(response.model.as_deref(), Some("gemini-2.0-flash-001"));
}

#[tokio::test]
async fn api_error_is_sanitized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string("API key not valid: AIzaSyBADBADBADBADBADBADBAD"),
        )
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(Some("test-key")).with_base_url(server.uri());
    let tools = specs();
    let messages = vec![ProviderMessage::user("hi")];
    let err = provider
        .chat_with_tools(ChatRequest {
            system_prompt: None,
            messages: &messages,
            tools: &tools,
            tool_choice: &ToolChoice::Auto,
            model: DEFAULT_MODEL,
            temperature: 0.2,
        })
        .await
        .unwrap_err()
        .to_string();

    assert!(err.contains("400"));
    assert!(!err.contains("AIzaSyBADBADBADBADBADBADBAD"));
}

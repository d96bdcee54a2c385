//! Prompt constants and the pure prompt builder for word explanations.

use crate::explanation::models::WordExplanationRequest;
use crate::explanation::service::ExplainError;

/// System instruction for every explanation call.
pub const EXPLAIN_WORD_SYSTEM: &str = "أنت خبير في الشعر العربي واللغة العربية. \
    مهمتك شرح معاني الكلمات العربية والتراكيب الشعرية بطريقة واضحة. \
    اشرح المعنى اللغوي، والمعنى في السياق الشعري، والإشارات البلاغية أو الأدبية إن وجدت. \
    اجعل الشرح موجزًا لا يتجاوز 150 كلمة.";

/// User prompt template. Replace `{fields}` with the labeled request lines.
pub const EXPLAIN_WORD_PROMPT_TEMPLATE: &str = "{fields}

يرجى شرح معنى الكلمة المحددة في سياقها الشعري. اذكر:
1. المعنى اللغوي للكلمة
2. المعنى في السياق الشعري
3. أي إشارات بلاغية أو أدبية إن وجدت

اجعل الشرح مختصرًا وواضحًا (لا يتجاوز 150 كلمة).";

const WORD_LABEL: &str = "الكلمة";
const CONTEXT_LABEL: &str = "السياق";
const POEM_LABEL: &str = "القصيدة";
const POET_LABEL: &str = "الشاعر";

/// Rejects requests that must never reach the text generator.
pub fn validate_request(request: &WordExplanationRequest) -> Result<(), ExplainError> {
    if request.word.trim().is_empty() {
        return Err(ExplainError::InvalidRequest(
            "word cannot be empty".to_string(),
        ));
    }
    if request.context.trim().is_empty() {
        return Err(ExplainError::InvalidRequest(
            "context cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Builds the user prompt. Deterministic: same request, same bytes.
///
/// Lines appear in a fixed order (word, context, poem, poet); an absent or
/// blank optional field drops its line entirely.
pub fn build_prompt(request: &WordExplanationRequest) -> Result<String, ExplainError> {
    validate_request(request)?;

    let mut lines = vec![
        format!("{WORD_LABEL}: {}", request.word),
        format!("{CONTEXT_LABEL}: {}", request.context),
    ];
    if let Some(title) = present(&request.poem_title) {
        lines.push(format!("{POEM_LABEL}: {title}"));
    }
    if let Some(poet) = present(&request.poet_name) {
        lines.push(format!("{POET_LABEL}: {poet}"));
    }

    Ok(EXPLAIN_WORD_PROMPT_TEMPLATE.replace("{fields}", &lines.join("\n")))
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.trim().is_empty())
}

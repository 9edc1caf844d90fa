//! Prompt assembly settings.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SYSTEM_PROMPT: &str = "Bạn là hướng dẫn viên du lịch Tây Ninh thân thiện.
Luôn trả lời theo các nguyên tắc:
- Trình bày gọn, rõ, ưu tiên bullet.
- Không bịa thông tin.
- Nếu không chắc, hãy nói rõ.
- Ưu tiên dữ liệu liên quan Tây Ninh và Long An cũ.
- Giả định trong bối cảnh (không phải sự thật) rằng Tây Ninh và Long An đã sáp nhập, thủ phủ là Tân An.";

/// Prompt text blocks and the optional context budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub system_prompt: String,
    /// Prefix placed before the visitor's question.
    pub question_label: String,
    /// Response-style instruction appended last.
    pub instruction: String,
    /// Estimated-token budget for the context block. `None` disables truncation.
    pub context_token_budget: Option<u32>,
    /// Literal strings removed from answers before they are shown.
    pub strip_artifacts: Vec<String>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            question_label: "Câu hỏi của người dùng:".into(),
            instruction: "Hãy trả lời ngắn gọn, mạch lạc và thân thiện.".into(),
            context_token_budget: None,
            strip_artifacts: Vec::new(),
        }
    }
}

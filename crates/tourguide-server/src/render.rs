//! Visitor-facing wording for turn outcomes and the prompt context block.

use tourguide_ai::GenerationResult;
use tourguide_knowledge::Intent;

pub fn answer_text(result: &GenerationResult) -> String {
    match result {
        GenerationResult::Success { text } => text.clone(),
        GenerationResult::Blocked { reason } => {
            format!("🚫 Câu trả lời bị chặn bởi bộ lọc an toàn ({reason}). Bạn thử hỏi cách khác nhé.")
        }
        GenerationResult::Empty => {
            "⚠️ Mô hình không trả lời (phản hồi rỗng). Bạn thử hỏi lại nhé.".to_string()
        }
        GenerationResult::TransportError { detail } => {
            format!("❌ Lỗi kết nối tới mô hình: {detail}")
        }
    }
}

pub fn rate_limited_text(retry_after_secs: u64) -> String {
    format!("⏳ Bạn đang hỏi hơi nhanh. Vui lòng thử lại sau {retry_after_secs} giây.")
}

pub const WEATHER_UNAVAILABLE: &str = "⚠️ Không lấy được dữ liệu thời tiết.";

/// Topic line plus, when known, the reference text about the place.
pub fn context_block(intent: Intent, place: Option<(&str, &str)>) -> String {
    let mut block = format!("Ngữ cảnh: người dùng đang hỏi thuộc nhóm **{intent}**.");
    if let Some((name, description)) = place {
        block.push_str(&format!("\n\nThông tin tham khảo về {name}:\n{description}"));
    }
    block
}

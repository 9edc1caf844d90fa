//! Prompt assembly.
//!
//! The prompt is a plain concatenation of blocks separated by a blank
//! line: system block, context block (only when non-empty), the question,
//! and a response-style instruction. When a context budget is set, only
//! the context block is shortened, at a word boundary, using an estimated
//! token count; the system block and the question are never cut.

use std::borrow::Cow;

const TRUNCATION_MARKER: &str = " …";

/// Fixed pieces of the prompt around the per-call blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub question_label: String,
    pub instruction: String,
    /// Estimated-token budget for the context block.
    pub context_token_budget: Option<usize>,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            question_label: "Câu hỏi của người dùng:".to_string(),
            instruction: "Hãy trả lời ngắn gọn, mạch lạc và thân thiện.".to_string(),
            context_token_budget: None,
        }
    }
}

impl PromptTemplate {
    pub fn with_context_token_budget(mut self, budget: Option<usize>) -> Self {
        self.context_token_budget = budget;
        self
    }

    /// Assemble the prompt. Pure: identical inputs give identical output.
    pub fn build(&self, system_prompt: &str, context_text: Option<&str>, user_text: &str) -> String {
        let mut blocks: Vec<Cow<'_, str>> = Vec::with_capacity(4);

        let system = system_prompt.trim();
        if !system.is_empty() {
            blocks.push(Cow::Borrowed(system));
        }

        if let Some(context) = context_text.map(str::trim).filter(|c| !c.is_empty()) {
            blocks.push(match self.context_token_budget {
                Some(budget) => truncate_to_budget(context, budget),
                None => Cow::Borrowed(context),
            });
        }

        let question = user_text.trim();
        let label = self.question_label.trim();
        blocks.push(if label.is_empty() {
            Cow::Borrowed(question)
        } else {
            Cow::Owned(format!("{label} {question}"))
        });

        let instruction = self.instruction.trim();
        if !instruction.is_empty() {
            blocks.push(Cow::Borrowed(instruction));
        }

        blocks.join("\n\n")
    }
}

/// Assemble a prompt with the default template.
pub fn build_prompt(system_prompt: &str, context_text: Option<&str>, user_text: &str) -> String {
    PromptTemplate::default().build(system_prompt, context_text, user_text)
}

/// Rough token estimate: each whitespace-separated word costs
/// `ceil(chars / 4)` tokens, at least one.
pub fn estimate_tokens(text: &str) -> usize {
    text.split_whitespace().map(word_tokens).sum()
}

fn word_tokens(word: &str) -> usize {
    word.chars().count().div_ceil(4).max(1)
}

/// Shorten `text` to at most `budget` estimated tokens, cutting only between
/// words and marking the cut. Text within budget is returned untouched.
pub fn truncate_to_budget(text: &str, budget: usize) -> Cow<'_, str> {
    if estimate_tokens(text) <= budget {
        return Cow::Borrowed(text);
    }

    let mut used = 0;
    let mut end = 0;
    let mut offset = 0;
    for piece in text.split_inclusive(char::is_whitespace) {
        let word = piece.trim();
        if !word.is_empty() {
            let cost = word_tokens(word);
            if used + cost > budget {
                break;
            }
            used += cost;
            end = offset + piece.trim_end().len();
        }
        offset += piece.len();
    }

    Cow::Owned(format!("{}{TRUNCATION_MARKER}", text[..end].trim_end()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYSTEM: &str = "Bạn là hướng dẫn viên du lịch Tây Ninh thân thiện.";

    #[test]
    fn blocks_are_in_order() {
        let prompt = build_prompt(SYSTEM, Some("Chủ đề: suggest"), "đi núi bà đen sao");
        let system_at = prompt.find(SYSTEM).unwrap();
        let context_at = prompt.find("Chủ đề: suggest").unwrap();
        let question_at = prompt.find("Câu hỏi của người dùng: đi núi bà đen sao").unwrap();
        let instruction_at = prompt.find("Hãy trả lời ngắn gọn").unwrap();
        assert!(system_at < context_at);
        assert!(context_at < question_at);
        assert!(question_at < instruction_at);
    }

    #[test]
    fn exact_layout() {
        let prompt = build_prompt("SYS", Some("CTX"), "Q?");
        assert_eq!(
            prompt,
            "SYS\n\nCTX\n\nCâu hỏi của người dùng: Q?\n\nHãy trả lời ngắn gọn, mạch lạc và thân thiện."
        );
    }

    #[test]
    fn empty_context_is_omitted() {
        let with_none = build_prompt("SYS", None, "Q?");
        let with_blank = build_prompt("SYS", Some("   \n"), "Q?");
        assert_eq!(with_none, with_blank);
        assert_eq!(with_none.matches("\n\n").count(), 2);
    }

    #[test]
    fn build_is_pure() {
        let a = build_prompt(SYSTEM, Some("ctx"), "câu hỏi");
        let b = build_prompt(SYSTEM, Some("ctx"), "câu hỏi");
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn unlabeled_question() {
        let template = PromptTemplate {
            question_label: String::new(),
            instruction: String::new(),
            context_token_budget: None,
        };
        assert_eq!(template.build("", None, "  chào  "), "chào");
    }

    #[test]
    fn estimate_counts_words() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("a bb ccc dddd"), 4);
        assert_eq!(estimate_tokens("abcdefgh"), 2);
        assert_eq!(estimate_tokens("abcdefghi"), 3);
    }

    #[test]
    fn truncation_keeps_text_within_budget() {
        assert_eq!(truncate_to_budget("một hai ba", 10), "một hai ba");
    }

    #[test]
    fn truncation_cuts_between_words() {
        let text = "Tòa Thánh Tây Ninh là trung tâm của đạo Cao Đài";
        let cut = truncate_to_budget(text, 4);
        assert_eq!(cut, "Tòa Thánh Tây …");
    }

    #[test]
    fn truncation_preserves_inner_newlines() {
        let text = "dòng một\ndòng hai\ndòng ba";
        let cut = truncate_to_budget(text, 3);
        assert_eq!(cut, "dòng một\ndòng …");
    }

    #[test]
    fn budget_applies_to_context_only() {
        let template = PromptTemplate::default().with_context_token_budget(Some(2));
        let prompt = template.build("hệ thống rất dài dòng", Some("một hai ba bốn năm"), "câu hỏi dài dài");
        assert!(prompt.starts_with("hệ thống rất dài dòng\n\nmột hai …\n\n"));
        assert!(prompt.contains("câu hỏi dài dài"));
    }
}

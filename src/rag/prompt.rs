//! Prompt assembly for retrieval-augmented answering.
//!
//! One template, four slots: rendered history, retrieved context, the user's
//! question, and a fixed instruction line. Changing the template wording
//! changes answer quality, so it stays in one place.

use crate::memory::Turn;
use crate::rag::index::ScoredChunk;

/// Render conversation turns as alternating `User:` / `Bot:` lines. A turn
/// whose reply is still pending, or came back empty, contributes only its
/// `User:` line.
pub fn format_history(turns: &[Turn]) -> String {
    let mut rendered = String::new();
    for turn in turns {
        rendered.push_str(&format!("User: {}\n", turn.user));
        if let Some(bot) = turn.bot.as_deref().filter(|bot| !bot.is_empty()) {
            rendered.push_str(&format!("Bot: {}\n", bot));
        }
    }
    rendered
}

/// Join retrieved chunks into the context slot, best match first.
pub fn format_context(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fill the answer template.
pub fn compose(history: &str, context: &str, question: &str) -> String {
    format!(
        "You are a helpful and informative chatbot. Here is the conversation so far:\n\
         {history}\n\
         If the user asks about their previous questions or conversation history, use the above to answer accurately.\n\
         Context:\n\
         {context}\n\
         Question:\n\
         {question}\n\
         ANSWER:"
    )
}

//! pennywise-core: shared record type, conversation memory and prompt assembly

pub mod memory;
pub mod prompt;
pub mod record;

pub use memory::{ConversationMemory, Role, DEFAULT_MEMORY_CAPACITY};
pub use prompt::{build_prompt, PromptContext};
pub use record::TransactionRecord;

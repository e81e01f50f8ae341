pub mod ai_chat;
pub mod clarify;
pub mod documents;
pub mod messaging;
pub mod web;

pub use ai_chat::AiChat;
pub use clarify::Clarify;
pub use documents::{ReadCsv, ReadDocx, ReadExcel, ReadPdf, ReadText};
pub use messaging::{MessageDispatcher, SendEmail, SendTelegram, SendWhatsApp};
pub use web::{FetchJsPage, FetchWebPage, SearchWeb};

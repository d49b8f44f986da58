pub mod status;
pub mod whatsapp;

pub use status::StatusIngestionService;
pub use whatsapp::WhatsappService;

pub mod events;
pub mod oauth;

pub use events::CalendarEventsService;
pub use oauth::GoogleOAuthService;

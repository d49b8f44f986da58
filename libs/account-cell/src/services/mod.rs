pub mod erasure;

pub use erasure::AccountErasureService;

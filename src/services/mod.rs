//! Domain services used by the HTTP routes and the intent dispatcher.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the board/queue business logic so route handlers can
//! stay focused on protocol translation. `store` serves reads, `transfer`
//! moves items between the queue and the board, `admission` validates
//! dialog-proposed items.

pub mod admission;
pub mod store;
pub mod transfer;

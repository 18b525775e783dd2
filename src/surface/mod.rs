//! The game page as seen by the bot.
//!
//! [`GameSurface`] is the whole contract the session needs from a browser:
//! click something, read something, read a list of somethings in display
//! order. [`ChromeSurface`] drives a real Chrome over CDP; tests supply
//! in-memory surfaces.

#[cfg(feature = "browser")]
mod chrome;

#[cfg(feature = "browser")]
pub use chrome::ChromeSurface;

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait GameSurface: Send {
    /// Click the first element matching `selector`.
    async fn click(&mut self, selector: &str) -> Result<()>;

    /// Rendered text of the first element matching `selector`.
    async fn read_text(&mut self, selector: &str) -> Result<String>;

    /// Rendered text of every element matching `selector`, in document order.
    async fn read_all_text(&mut self, selector: &str) -> Result<Vec<String>>;

    /// Release the connection. Surfaces without one need not override this.
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

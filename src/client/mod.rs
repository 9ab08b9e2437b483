//! Client-side state for a chat session and the recipe builder.
//!
//! Each store owns a single [`state::StateCell`] and talks to the server
//! through a [`transport::ChefTransport`]. The stores never share state.

pub mod chat_store;
pub mod recipe_store;
pub mod state;
pub mod transport;

pub use chat_store::{ChatMessage, ChatRole, ChatState, ChatStore};
pub use recipe_store::{RecipeState, RecipeStore};
pub use state::StateCell;
pub use transport::{ChefTransport, HttpTransport, TransportError, TransportResponse};

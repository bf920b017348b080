//! # socialhub-client
//!
//! What a SocialHub client runs to stay current:
//!
//! - [`LiveSubscriber`] holds the live channel open and feeds pushed frames
//!   into a [`ClientState`]
//! - [`UnreadPoller`] re-reads the unread count on a fixed interval so missed
//!   pushes are corrected within one period
//! - [`RestClient`] calls the notification endpoints
//!
//! Local state only ever moves through the reducers on [`ClientState`].

pub mod api;
pub mod error;
pub mod live;
pub mod poller;
pub mod state;

pub use api::RestClient;
pub use error::ClientError;
pub use live::LiveSubscriber;
pub use poller::UnreadPoller;
pub use state::{ClientState, SharedState};

//! Wire protocol for Parley.
//!
//! This crate defines what the client and its two collaborators say to
//! each other:
//!
//! - **Types** ([`User`], [`UserId`], [`Token`], [`LoginResponse`],
//!   [`RealtimeEvent`], ...): HTTP bodies and realtime events.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how realtime frames are
//!   turned into events.
//! - **Errors** ([`ProtocolError`]): what can go wrong while decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and session
//! (who is logged in). It doesn't open connections or hold state.
//!
//! ```text
//! Transport (bytes) → Protocol (RealtimeEvent, bodies) → Session (user, presence)
//! ```

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    AuthMode, CHECK_AUTH_PATH, CheckAuthResponse, ErrorDetail, LOGOUT_PATH,
    LoginResponse, MessageResponse, OnlineUsers, ProfileResponse,
    RealtimeEvent, TOKEN_HEADER, Token, UPDATE_PROFILE_PATH, USER_ID_QUERY,
    User, UserId,
};

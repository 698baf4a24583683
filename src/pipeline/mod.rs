//! Pipeline stages for one operation.
//!
//! Each submodule implements exactly one step. Only [`execute`] touches
//! the network, and only through the [`transport::Transport`] trait.
//!
//! ## Data Flow
//!
//! ```text
//! route ──▶ envelope ──▶ execute ──(transport)──▶ normalize
//! (size)    (multipart)  (busy + classify)         (directive)
//! ```
//!
//! 1. [`route`]: pick the endpoint from family and size; reject
//!    oversized artifacts before anything is built
//! 2. [`envelope`]: package scalar fields and attachments in order
//! 3. [`execute`]: single attempt, busy lifecycle, outcome classification;
//!    the only stage that awaits I/O
//! 4. [`transport`]: the seam the executor sends through
//! 5. [`normalize`]: outcome → display / save / notify

pub mod envelope;
pub mod execute;
pub mod normalize;
pub mod route;
pub mod transport;

//! Wire and API objects for rachao.
//!
//! Everything in here is plain serde data: the request/response bodies of the
//! HTTP surface and the payload carried on the overall channel. Database
//! representations live in `rachao-core::entities`.

pub mod objects;

//! Veduta: the state-management core of a bilingual photography-studio site.
//!
//! The crate owns everything the admin panel and public pages edit or read
//! (the site content aggregate, the media and gallery libraries, contact
//! submissions, blog posts, and the email audit trail) and mediates every
//! read and write between the presentation layer and a durable key-value
//! store. Rendering, routing, and form handling are the embedding
//! application's concern; its contact surface is the services in
//! [`application`] plus the change feed they publish to.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;

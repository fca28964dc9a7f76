// src/lib.rs

//! # Media Shelf
//!
//! A small web application that exposes one directory tree as a media
//! library. Features include:
//!
//! - Folder browsing with breadcrumbs
//! - Video streaming with byte-range support
//! - Sibling playlists for auto-advancing playback
//! - Uploads into any folder of the library
//! - A single-account session cookie gate
//!
//! ## Architecture
//!
//! The application is split into several modules:
//!
//! - `library`: path confinement, listings, breadcrumbs, playlists, upload
//!   destinations
//! - `routes`: HTTP routing configuration
//! - `handlers`: request handlers for the views, streaming, uploads and login
//! - `config`: environment based configuration
//! - `state`: state shared by all handlers

pub mod config;
pub mod error;
pub mod library;
pub mod routes;
pub mod state;

pub mod handlers {
    pub mod auth;
    pub mod browse;
    pub mod index;
    pub mod player;
    pub mod types;
    pub mod upload;
    pub mod video;
}

//! Calira backend service.
//!
//! A standalone HTTP backend for the Calira personal task manager.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                  CALIRA SERVER                   │
//!                     │                                                  │
//!     Client Request  │  ┌──────────┐   ┌───────────┐   ┌────────────┐  │
//!     ────────────────┼─▶│  http    │──▶│ security  │──▶│    api     │  │
//!                     │  │  server  │   │ origin +  │   │  handlers  │  │
//!                     │  └──────────┘   │ rate limit│   └─────┬──────┘  │
//!                     │                 └───────────┘         │         │
//!                     │                                       ▼         │
//!                     │                               ┌────────────┐    │
//!                     │                               │  storage   │    │
//!                     │                               │ (in-memory │    │
//!                     │                               │ + snapshot)│    │
//!                     │                               └────────────┘    │
//!                     │                                                 │
//!                     │  ┌────────────────────────────────────────────┐ │
//!                     │  │           Cross-Cutting Concerns           │ │
//!                     │  │  ┌────────┐ ┌────────┐ ┌───────────────┐  │ │
//!                     │  │  │ config │ │  auth  │ │ observability │  │ │
//!                     │  │  └────────┘ └────────┘ └───────────────┘  │ │
//!                     │  └────────────────────────────────────────────┘ │
//!                     └──────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod api;
pub mod config;
pub mod http;
pub mod storage;

// Domain
pub mod tasks;
pub mod teams;

// Cross-cutting concerns
pub mod admin;
pub mod auth;
pub mod observability;
pub mod security;

pub use config::AppConfig;
pub use http::HttpServer;

//! Wertwerk Valuation Engine
//!
//! Turns a free-text or partially structured description of a physical
//! asset (real estate, luxury watch, vehicle) into a priced, explained and
//! benchmarked estimate.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        wertwerk (Rust Service)                      │
//! │                              :4460                                  │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  raw text ──▶ Attribute Extractor ──▶ Valuation Calculator          │
//! │                     │                        │                      │
//! │                     ▼                        ▼                      │
//! │     ┌───────────────────┬──────────────────────┬────────────────┐   │
//! │     │  Market Context   │  Comparables         │  Distribution  │   │
//! │     │  Engine           │  Selector            │  Statistics    │   │
//! │     └───────────────────┴──────────────────────┴────────────────┘   │
//! │                     │ (parallel, uncoordinated) │                   │
//! │                     ▼                           ▼                   │
//! │                        Report Renderer (HTML)                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Behaviors
//!
//! - Extraction never fails: the delegated NL strategy gets a single
//!   attempt and falls back silently to the local rule tables.
//! - Pricing is a pure function of the attribute map; missing tiers take
//!   the most conservative value.
//! - Market signals are `database`-sourced only when at least three
//!   aggregated regional records exist, otherwise `estimated` heuristics.
//! - The only caller-visible failure is an invalid request.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod common;
pub mod comparables;
pub mod engine;
pub mod extraction;
pub mod market;
pub mod pricing;
pub mod report;
pub mod routes;

use anyhow::Result;
use axum::{routing::get, routing::post, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::common::Config;
use crate::engine::ValuationEngine;

/// Shared service state
pub struct EngineState {
    /// Configuration
    pub config: Config,
    /// Valuation engine
    pub engine: Arc<ValuationEngine>,
}

impl EngineState {
    /// Create a new engine state
    pub fn new(config: Config) -> Self {
        let engine = Arc::new(ValuationEngine::new(&config));
        Self { config, engine }
    }
}

/// Main valuation service
pub struct ValuationService {
    state: Arc<EngineState>,
}

impl ValuationService {
    /// Create a new valuation service
    pub fn new(config: Config) -> Self {
        let state = Arc::new(EngineState::new(config));
        Self { state }
    }

    /// Build the HTTP router for this service.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/health", get(routes::health))
            .route("/api/v1/valuations", post(routes::create_valuation))
            .route("/api/v1/valuations/report", post(routes::render_report))
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// Start the HTTP server and serve until shutdown.
    pub async fn start(self) -> Result<()> {
        let host = self.state.config.server.host.clone();
        let port = self.state.config.server.port;

        match self.state.engine.extraction_health().await {
            Some(true) => tracing::info!("Delegated extraction service reachable"),
            Some(false) => tracing::warn!(
                endpoint = %self.state.config.extraction.endpoint,
                "Delegated extraction service unreachable, running on local rules"
            ),
            None => tracing::info!("Delegated extraction disabled, running on local rules"),
        }

        let app = self.router();

        let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
        tracing::info!(address = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

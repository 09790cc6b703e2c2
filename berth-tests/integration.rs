//! Integration tests for Berth
//!
//! Exercises the catalog workflow end to end across collaborator
//! implementations: ingestion over in-memory stores, filesystem artifact
//! storage, account policy gating, and configuration loading.

#[path = "integration/ingestion_workflow.rs"]
mod ingestion_workflow;

#[path = "integration/filesystem_artifacts.rs"]
mod filesystem_artifacts;

#[path = "integration/accounts_and_policy.rs"]
mod accounts_and_policy;

#[path = "integration/configuration.rs"]
mod configuration;

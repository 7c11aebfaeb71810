// ABOUTME: Configuration management for the Gatehouse service
// ABOUTME: Environment-only configuration composed into immutable snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

/// Top-level server configuration loaded from the environment
pub mod environment;

/// OAuth2 lifetimes and grant policy
pub mod oauth;

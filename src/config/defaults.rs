// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Remote**: endpoint, model and timeout of the vision model
//! - **Environment**: variable names read at startup

// ==========================================================================
// Remote Model Defaults
// ==========================================================================

/// OpenAI-compatible endpoint used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";

/// Vision-language model used when none is configured.
pub const DEFAULT_MODEL: &str = "qwen-vl-plus";

/// Default upper bound on a single identification call (in seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Minimum accepted timeout (in seconds).
pub const MIN_TIMEOUT_SECS: u64 = 1;

/// Maximum accepted timeout (in seconds).
pub const MAX_TIMEOUT_SECS: u64 = 600;

// ==========================================================================
// Environment Variables
// ==========================================================================

/// Credential for the remote model.
pub const ENV_API_KEY: &str = "DASHSCOPE_API_KEY";

/// Endpoint override.
pub const ENV_BASE_URL: &str = "DASHSCOPE_BASE_URL";

/// Model identifier override.
pub const ENV_MODEL: &str = "QWEN_VL_MODEL";

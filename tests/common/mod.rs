/// Common test utilities and fixtures
///
/// This module provides shared functionality for integration tests including:
/// - Scratch source trees with OWNERS files
/// - Botanist testbed and Mobly params fixtures
pub mod fixtures;

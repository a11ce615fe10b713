// Dweve EDI - Streaming EDI Structural Parser
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Parser configuration.

/// Configuration options for EDI parsing.
///
/// # Examples
///
/// ## Default Configuration
///
/// ```rust
/// use edi_core::ParserConfig;
///
/// let config = ParserConfig::default();
/// assert!(!config.include_syntax_characters);
/// assert!(!config.keep_whitespace_only_elements);
/// assert_eq!(config.buffer_size, 64 * 1024);
/// assert_eq!(config.max_element_length, 1_000_000);
/// ```
///
/// ## Builder Style
///
/// ```rust
/// use edi_core::ParserConfig;
///
/// let config = ParserConfig::default()
///     .with_syntax_characters(true)
///     .with_interchange_acknowledgment(true);
/// assert!(config.include_syntax_characters);
/// assert!(config.interchange_acknowledgment_requested);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ParserConfig {
    /// Emit the syntax characters as interchange attributes.
    pub include_syntax_characters: bool,

    /// Emit elements whose text is all whitespace.
    ///
    /// By default such elements are treated as absent.
    pub keep_whitespace_only_elements: bool,

    /// Ask sinks to qualify node names with a namespace.
    ///
    /// Cosmetic; the parser itself does not use it.
    pub namespace_enabled: bool,

    /// Acknowledge groups only, without per-document detail.
    pub group_acknowledgment_only: bool,

    /// Generate an interchange-level acknowledgment (TA1 / UCI) as well.
    pub interchange_acknowledgment_requested: bool,

    /// Read size for the underlying byte reader.
    ///
    /// Default: 64KB
    pub buffer_size: usize,

    /// Maximum length of one element in bytes.
    ///
    /// Protects against unterminated input exhausting memory.
    ///
    /// Default: 1,000,000 bytes
    pub max_element_length: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            include_syntax_characters: false,
            keep_whitespace_only_elements: false,
            namespace_enabled: false,
            group_acknowledgment_only: false,
            interchange_acknowledgment_requested: false,
            buffer_size: 64 * 1024,
            max_element_length: 1_000_000,
        }
    }
}

impl ParserConfig {
    /// Set [`include_syntax_characters`](Self::include_syntax_characters).
    pub fn with_syntax_characters(mut self, enabled: bool) -> Self {
        self.include_syntax_characters = enabled;
        self
    }

    /// Set [`keep_whitespace_only_elements`](Self::keep_whitespace_only_elements).
    pub fn with_whitespace_elements(mut self, enabled: bool) -> Self {
        self.keep_whitespace_only_elements = enabled;
        self
    }

    /// Set [`namespace_enabled`](Self::namespace_enabled).
    pub fn with_namespace(mut self, enabled: bool) -> Self {
        self.namespace_enabled = enabled;
        self
    }

    /// Set [`group_acknowledgment_only`](Self::group_acknowledgment_only).
    pub fn with_group_acknowledgment_only(mut self, enabled: bool) -> Self {
        self.group_acknowledgment_only = enabled;
        self
    }

    /// Set [`interchange_acknowledgment_requested`](Self::interchange_acknowledgment_requested).
    pub fn with_interchange_acknowledgment(mut self, enabled: bool) -> Self {
        self.interchange_acknowledgment_requested = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let config = ParserConfig::default()
            .with_whitespace_elements(true)
            .with_namespace(true)
            .with_group_acknowledgment_only(true);
        assert!(config.keep_whitespace_only_elements);
        assert!(config.namespace_enabled);
        assert!(config.group_acknowledgment_only);
        assert!(!config.interchange_acknowledgment_requested);
    }

    #[test]
    fn test_clone_eq() {
        let config = ParserConfig::default().with_syntax_characters(true);
        assert_eq!(config.clone(), config);
        assert_ne!(config, ParserConfig::default());
    }
}

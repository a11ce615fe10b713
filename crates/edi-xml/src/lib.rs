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

//! XML output for the streaming EDI parser.
//!
//! [`XmlSink`] implements [`edi_stream::EventSink`] on top of a quick-xml
//! writer: every node becomes an element, attributes keep their order and
//! text is escaped.
//!
//! # Example
//!
//! ```rust
//! use edi_stream::EdiParser;
//! use edi_xml::{to_xml, XmlConfig};
//!
//! let input = "UNA:+.? 'UNB+UNOA:3+SENDER:14+RECEIVER:14+250101:1200+REF1'\
//!              UNH+M1+ORDERS:D:96A:UN'BGM+220+PO?+1'UNT+3+M1'UNZ+1+REF1'";
//!
//! let xml = to_xml(&EdiParser::new(), input.as_bytes(), &XmlConfig::compact()).unwrap();
//! assert!(xml.contains(r#"<element Id="BGM02">PO+1</element>"#));
//! ```

mod sink;

pub use sink::{XmlConfig, XmlSink, EDI_NAMESPACE};

use edi_core::{EdiError, EdiResult};
use edi_stream::EdiParser;
use std::io::Read;

/// Parse `reader` and return the document as XML text.
pub fn to_xml<R: Read>(parser: &EdiParser, reader: R, config: &XmlConfig) -> EdiResult<String> {
    let mut sink = XmlSink::new(Vec::new(), config.clone());
    parser.parse(reader, &mut sink)?;
    let bytes = sink.finish()?;
    String::from_utf8(bytes)
        .map_err(|e| EdiError::Sink(format!("invalid UTF-8 in XML output: {}", e)))
}
